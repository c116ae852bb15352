//! Digests of remote payloads: funnel conversion rates and taxonomy
//! summaries. Every tool reply pairs one of these with the raw JSON.

use serde_json::Value;

use ampmcp_types::{TaxonomyEvent, TaxonomyProperty};

pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Percentage to one decimal place; "0" when the denominator is zero.
pub fn percent(numerator: f64, denominator: f64) -> String {
    if denominator > 0.0 {
        format!("{:.1}", numerator / denominator * 100.0)
    } else {
        "0".to_string()
    }
}

/// Per-step conversion rates for a funnel response.
///
/// Overall rate is against step 0, step rate against the previous step.
/// Step 0's "from prev" rate is computed against itself, so it reads 100%
/// unless the step count is 0. That boundary rule is intentional and
/// matches what the summary has always reported.
pub fn funnel_summary(result: &Value) -> String {
    let mut summary = String::from("Funnel Analysis Results:\n");

    let steps: Vec<f64> = result
        .get("data")
        .and_then(|d| d.get("series"))
        .and_then(Value::as_array)
        .map(|series| series.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default();

    for (i, &count) in steps.iter().enumerate() {
        let prev = if i > 0 { steps[i - 1] } else { count };
        let overall = percent(count, steps[0]);
        let from_prev = percent(count, prev);
        summary.push_str(&format!(
            "Step {}: {} users ({}% overall, {}% from prev)\n",
            i + 1,
            count,
            overall,
            from_prev
        ));
    }

    summary
}

/// Active event types sorted descending by volume, as a markdown list.
pub fn events_summary(rows: &[TaxonomyEvent]) -> String {
    let mut active: Vec<&TaxonomyEvent> = rows.iter().filter(|e| e.is_active()).collect();
    active.sort_by(|a, b| b.totals.unwrap_or(0).cmp(&a.totals.unwrap_or(0)));

    let mut summary = format!(
        "Found {} active event types (sorted by volume):\n\n",
        active.len()
    );
    for event in active {
        let name = event.event_type();
        summary.push_str(&format!("- **{}**", name));
        if event.display_name() != name {
            summary.push_str(&format!(" - \"{}\"", event.display_name()));
        }
        if let Some(totals) = event.totals {
            summary.push_str(&format!(" ({} total)", totals));
        }
        summary.push('\n');
    }
    summary
}

/// Property list with inferred types; enum values capped at
/// `max_enum_values` with a trailing ellipsis when truncated.
pub fn properties_summary(
    title: &str,
    rows: &[TaxonomyProperty],
    max_enum_values: usize,
) -> String {
    let mut summary = format!("{}\n\n", title);
    for prop in rows {
        summary.push_str(&format!("- **{}** ({})", prop.display_name(), prop.kind()));
        if prop.is_enum.unwrap_or(false)
            && let Some(values) = &prop.enum_values
            && !values.is_empty()
        {
            let shown: Vec<&str> = values
                .iter()
                .take(max_enum_values)
                .map(String::as_str)
                .collect();
            summary.push_str(&format!(" - values: {}", shown.join(", ")));
            if values.len() > max_enum_values {
                summary.push_str("...");
            }
        }
        summary.push('\n');
        if let Some(description) = &prop.description {
            summary.push_str(&format!("  {}\n", description));
        }
    }
    summary
}
