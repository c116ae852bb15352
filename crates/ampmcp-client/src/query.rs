//! Pure query builders for the Dashboard REST API.
//!
//! Each builder maps a validated request to the list of query-string pairs
//! for one GET. Event objects, filters, and segments are JSON-encoded into
//! individual parameter values, per the API's convention. Funnel steps are
//! appended as repeated `e` parameters; segmentation inlines a single `e`.

use serde_json::{Value, json};

use ampmcp_types::{
    Breakdown, EventQuery, FunnelArgs, PropertyFilter, PropertyValue, Result, RetentionArgs,
    RetentionEvent, SegmentCondition, SegmentationParams,
};

/// Map an interval token to the numeric code the API expects.
/// Unrecognized tokens pass through unchanged.
pub fn interval_code(token: &str) -> &str {
    match token {
        "day" => "1",
        "week" => "7",
        "month" => "30",
        other => other,
    }
}

/// Convert a property filter to the `subprop_*` wire shape.
/// Scalar values are wrapped into a single-element list.
pub fn wire_filter(filter: &PropertyFilter) -> Value {
    let values = match &filter.value {
        PropertyValue::List(items) => json!(items),
        PropertyValue::Bool(b) => json!([b]),
        PropertyValue::Number(n) => json!([n]),
        PropertyValue::String(s) => json!([s]),
    };
    json!({
        "subprop_type": "event",
        "subprop_key": filter.property_name,
        "subprop_op": filter.op,
        "subprop_value": values,
    })
}

/// Build the segmentation event object from the first event in the request.
///
/// Multi-event segmentation is not supported by this endpoint even though
/// the tool input accepts a list; only `events[0]` is sent. A breakdown on
/// `eventType` is dropped rather than forwarded, since it is not a real
/// property and the API rejects it.
pub fn wire_event(event: &EventQuery, breakdowns: &[Breakdown]) -> Value {
    let mut obj = json!({ "event_type": event.event_type });

    if let Some(filters) = &event.property_filters
        && !filters.is_empty()
    {
        obj["filters"] = Value::Array(filters.iter().map(wire_filter).collect());
    }

    let group_by: Vec<Value> = breakdowns
        .iter()
        .filter(|b| b.property_name != "eventType")
        .map(|b| json!({ "type": b.kind, "value": b.property_name }))
        .collect();
    if !group_by.is_empty() {
        obj["group_by"] = Value::Array(group_by);
    }

    obj
}

fn wire_retention_event(event: &RetentionEvent) -> Value {
    let mut obj = json!({ "event_type": event.event_type });
    if let Some(filters) = &event.filters
        && !filters.is_empty()
    {
        obj["filters"] = Value::Array(filters.iter().map(wire_filter).collect());
    }
    obj
}

fn wire_segment(conditions: &[SegmentCondition]) -> Value {
    json!(conditions)
}

/// Query pairs for `/events/segmentation`.
pub fn segmentation_params(params: &SegmentationParams) -> Result<Vec<(String, String)>> {
    params.validate()?;

    let breakdowns = params.breakdowns.as_slice();
    let event = wire_event(&params.events[0], breakdowns);

    let mut pairs = vec![
        ("e".to_string(), event.to_string()),
        ("start".to_string(), params.start.clone()),
        ("end".to_string(), params.end.clone()),
    ];
    if let Some(interval) = &params.interval {
        pairs.push(("i".to_string(), interval_code(interval).to_string()));
    }
    Ok(pairs)
}

/// Query pairs for `/funnels`. Each step becomes its own `e` parameter.
pub fn funnel_params(args: &FunnelArgs) -> Result<Vec<(String, String)>> {
    args.validate()?;

    let mut pairs: Vec<(String, String)> = args
        .events
        .iter()
        .map(|event| ("e".to_string(), wire_event(event, &[]).to_string()))
        .collect();

    pairs.push(("start".to_string(), args.start.clone()));
    pairs.push(("end".to_string(), args.end.clone()));
    pairs.push(("mode".to_string(), args.mode.code().to_string()));

    if let Some(window) = args.conversion_window {
        pairs.push(("cs".to_string(), window.to_string()));
    }
    if let Some(segment) = &args.segment {
        pairs.push(("s".to_string(), wire_segment(segment).to_string()));
    }
    if let Some(group_by) = &args.group_by {
        pairs.push(("g".to_string(), group_by.clone()));
    }
    Ok(pairs)
}

/// Query pairs for `/retention`.
pub fn retention_params(args: &RetentionArgs) -> Result<Vec<(String, String)>> {
    args.validate()?;

    let mut pairs = vec![
        ("se".to_string(), wire_retention_event(&args.start_event).to_string()),
        ("re".to_string(), wire_retention_event(&args.return_event).to_string()),
        ("rm".to_string(), args.retention_type.as_token().to_string()),
        ("start".to_string(), args.start.clone()),
        ("end".to_string(), args.end.clone()),
    ];
    if let Some(segment) = &args.segment {
        pairs.push(("s".to_string(), wire_segment(segment).to_string()));
    }
    if let Some(group_by) = &args.group_by {
        pairs.push(("g".to_string(), group_by.clone()));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ampmcp_types::{BreakdownKind, FilterOp, FunnelMode, RetentionType};

    fn event(name: &str) -> EventQuery {
        EventQuery {
            event_type: name.to_string(),
            property_filters: None,
        }
    }

    #[test]
    fn interval_tokens_map_to_numeric_codes() {
        assert_eq!(interval_code("day"), "1");
        assert_eq!(interval_code("week"), "7");
        assert_eq!(interval_code("month"), "30");
        assert_eq!(interval_code("quarter"), "quarter");
        assert_eq!(interval_code("1"), "1");
    }

    #[test]
    fn scalar_filter_values_are_wrapped_in_a_list() {
        let filter = PropertyFilter {
            property_name: "platform".to_string(),
            op: FilterOp::Is,
            value: PropertyValue::String("iOS".to_string()),
        };
        let wire = wire_filter(&filter);
        assert_eq!(wire["subprop_type"], "event");
        assert_eq!(wire["subprop_key"], "platform");
        assert_eq!(wire["subprop_op"], "is");
        assert_eq!(wire["subprop_value"], json!(["iOS"]));
    }

    #[test]
    fn list_filter_values_pass_through() {
        let filter = PropertyFilter {
            property_name: "country".to_string(),
            op: FilterOp::IsNot,
            value: PropertyValue::List(vec!["US".to_string(), "DE".to_string()]),
        };
        let wire = wire_filter(&filter);
        assert_eq!(wire["subprop_op"], "is not");
        assert_eq!(wire["subprop_value"], json!(["US", "DE"]));
    }

    #[test]
    fn segmentation_uses_only_the_first_event() {
        let params = SegmentationParams {
            events: vec![event("first"), event("second")],
            start: "20250101".to_string(),
            end: "20250131".to_string(),
            interval: Some("week".to_string()),
            breakdowns: vec![],
        };
        let pairs = segmentation_params(&params).unwrap();
        let e: Vec<_> = pairs.iter().filter(|(k, _)| k == "e").collect();
        assert_eq!(e.len(), 1);
        let obj: Value = serde_json::from_str(&e[0].1).unwrap();
        assert_eq!(obj["event_type"], "first");
        assert!(pairs.contains(&("i".to_string(), "7".to_string())));
    }

    #[test]
    fn breakdowns_become_group_by_pairs() {
        let breakdowns = vec![
            Breakdown {
                kind: BreakdownKind::Event,
                property_name: "platform".to_string(),
            },
            Breakdown {
                kind: BreakdownKind::User,
                property_name: "country".to_string(),
            },
        ];
        let obj = wire_event(&event("page_viewed"), &breakdowns);
        assert_eq!(
            obj["group_by"],
            json!([
                {"type": "event", "value": "platform"},
                {"type": "user", "value": "country"}
            ])
        );
    }

    #[test]
    fn event_type_breakdown_is_dropped() {
        let breakdowns = vec![Breakdown {
            kind: BreakdownKind::Event,
            property_name: "eventType".to_string(),
        }];
        let obj = wire_event(&event("page_viewed"), &breakdowns);
        assert!(obj.get("group_by").is_none());
    }

    #[test]
    fn funnel_steps_append_repeated_e_parameters() {
        let args = FunnelArgs {
            events: vec![event("view"), event("add_to_cart"), event("purchase")],
            start: "20250101".to_string(),
            end: "20250131".to_string(),
            mode: FunnelMode::AnyOrder,
            conversion_window: Some(86400),
            segment: Some(vec![SegmentCondition {
                prop: "gp:plan".to_string(),
                op: ampmcp_types::SegmentOp::Is,
                values: vec!["pro".to_string()],
            }]),
            group_by: Some("platform".to_string()),
        };
        let pairs = funnel_params(&args).unwrap();

        let steps: Vec<_> = pairs.iter().filter(|(k, _)| k == "e").collect();
        assert_eq!(steps.len(), 3);
        let first: Value = serde_json::from_str(&steps[0].1).unwrap();
        assert_eq!(first["event_type"], "view");

        assert!(pairs.contains(&("mode".to_string(), "unordered".to_string())));
        assert!(pairs.contains(&("cs".to_string(), "86400".to_string())));
        assert!(pairs.contains(&("g".to_string(), "platform".to_string())));

        let segment = pairs.iter().find(|(k, _)| k == "s").unwrap();
        let parsed: Value = serde_json::from_str(&segment.1).unwrap();
        assert_eq!(parsed, json!([{"prop": "gp:plan", "op": "is", "values": ["pro"]}]));
    }

    #[test]
    fn retention_encodes_start_and_return_events_independently() {
        let args = RetentionArgs {
            start_event: RetentionEvent {
                event_type: "sign_up".to_string(),
                filters: Some(vec![PropertyFilter {
                    property_name: "source".to_string(),
                    op: FilterOp::Is,
                    value: PropertyValue::String("organic".to_string()),
                }]),
            },
            return_event: RetentionEvent {
                event_type: "page_viewed".to_string(),
                filters: None,
            },
            start: "20250101".to_string(),
            end: "20250131".to_string(),
            retention_type: RetentionType::Rolling,
            segment: None,
            group_by: None,
        };
        let pairs = retention_params(&args).unwrap();

        let se: Value =
            serde_json::from_str(&pairs.iter().find(|(k, _)| k == "se").unwrap().1).unwrap();
        assert_eq!(se["event_type"], "sign_up");
        assert_eq!(se["filters"][0]["subprop_value"], json!(["organic"]));

        let re: Value =
            serde_json::from_str(&pairs.iter().find(|(k, _)| k == "re").unwrap().1).unwrap();
        assert!(re.get("filters").is_none());

        assert!(pairs.contains(&("rm".to_string(), "rolling".to_string())));
    }

    #[test]
    fn invalid_dates_are_rejected_before_building() {
        let params = SegmentationParams {
            events: vec![event("a")],
            start: "2025-01-01".to_string(),
            end: "20250131".to_string(),
            interval: None,
            breakdowns: vec![],
        };
        assert!(segmentation_params(&params).is_err());
    }
}
