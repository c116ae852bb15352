//! MCP tool handlers.
//!
//! Each handler returns the text blocks of a successful reply, or an
//! already-formatted error message. The server converts an `Err` into an
//! error-flagged result rather than a JSON-RPC fault, so the calling agent
//! always receives a well-formed reply.

use serde_json::Value;

use ampmcp_client::Client;
use ampmcp_types::{
    FunnelArgs, ListEventPropertiesArgs, QueryEventsArgs, RetentionArgs, SegmentEventsArgs,
    SegmentationParams, TaxonomyEvent, TaxonomyProperty,
};

use super::format::{events_summary, funnel_summary, pretty, properties_summary};

/// Decode the `data` rows of a taxonomy response, tolerating absent or
/// oddly shaped payloads by yielding no rows.
fn taxonomy_rows<T: serde::de::DeserializeOwned>(result: &Value) -> Vec<T> {
    result
        .get("data")
        .cloned()
        .and_then(|data| serde_json::from_value(data).ok())
        .unwrap_or_default()
}

pub async fn handle_query_events(
    client: &Client,
    args: QueryEventsArgs,
) -> Result<Vec<String>, String> {
    let params = SegmentationParams {
        events: args.events,
        start: args.start,
        end: args.end,
        interval: Some(args.interval.as_token().to_string()),
        breakdowns: vec![],
    };

    let result = client
        .query_segmentation(&params)
        .await
        .map_err(|e| format!("Error querying events: {}", e))?;

    Ok(vec![
        "Event data retrieved successfully:".to_string(),
        pretty(&result),
    ])
}

pub async fn handle_segment_events(
    client: &Client,
    args: SegmentEventsArgs,
) -> Result<Vec<String>, String> {
    let params = SegmentationParams {
        events: args.events,
        start: args.start,
        end: args.end,
        interval: Some(args.interval.as_token().to_string()),
        breakdowns: args.breakdowns.unwrap_or_default(),
    };

    let result = client
        .query_segmentation(&params)
        .await
        .map_err(|e| format!("Error segmenting events: {}", e))?;

    Ok(vec![
        "Segmented event data retrieved successfully:".to_string(),
        pretty(&result),
    ])
}

pub async fn handle_analyze_funnel(
    client: &Client,
    args: FunnelArgs,
) -> Result<Vec<String>, String> {
    let result = client
        .query_funnel(&args)
        .await
        .map_err(|e| format!("Error analyzing funnel: {}", e))?;

    Ok(vec![funnel_summary(&result), pretty(&result)])
}

pub async fn handle_analyze_retention(
    client: &Client,
    args: RetentionArgs,
) -> Result<Vec<String>, String> {
    let result = client
        .query_retention(&args)
        .await
        .map_err(|e| format!("Error analyzing retention: {}", e))?;

    Ok(vec![
        "Retention Analysis Results:".to_string(),
        pretty(&result),
    ])
}

pub async fn handle_list_events(client: &Client) -> Result<Vec<String>, String> {
    let result = client
        .list_events()
        .await
        .map_err(|e| format!("Error listing events: {}", e))?;

    let rows: Vec<TaxonomyEvent> = taxonomy_rows(&result);
    if rows.is_empty() {
        return Ok(vec![
            "No events found in this Amplitude project.".to_string(),
        ]);
    }

    let raw = result.get("data").cloned().unwrap_or(Value::Null);
    Ok(vec![events_summary(&rows), pretty(&raw)])
}

pub async fn handle_list_event_properties(
    client: &Client,
    args: ListEventPropertiesArgs,
) -> Result<Vec<String>, String> {
    let result = client
        .event_properties(&args.event_type)
        .await
        .map_err(|e| format!("Error getting properties: {}", e))?;

    let rows: Vec<TaxonomyProperty> = taxonomy_rows(&result);
    if rows.is_empty() {
        return Ok(vec![format!(
            "No properties found for event \"{}\". Try checking if the event name is correct using list_events first.",
            args.event_type
        )]);
    }

    let title = format!("Properties for \"{}\":", args.event_type);
    let raw = result.get("data").cloned().unwrap_or(Value::Null);
    Ok(vec![properties_summary(&title, &rows, 10), pretty(&raw)])
}

pub async fn handle_list_user_properties(client: &Client) -> Result<Vec<String>, String> {
    let result = client
        .user_properties()
        .await
        .map_err(|e| format!("Error listing user properties: {}", e))?;

    let rows: Vec<TaxonomyProperty> = taxonomy_rows(&result);
    if rows.is_empty() {
        return Ok(vec!["No user properties found.".to_string()]);
    }

    let title = format!("Found {} user properties:", rows.len());
    let raw = result.get("data").cloned().unwrap_or(Value::Null);
    Ok(vec![properties_summary(&title, &rows, 5), pretty(&raw)])
}
