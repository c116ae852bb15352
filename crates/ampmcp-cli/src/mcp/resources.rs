//! The `amplitude://events/{eventType}/{start}/{end}` resource.
//!
//! Reads resolve to the same segmentation call as the basic query tool. A
//! fixed set of example URIs is advertised for discovery. Errors here
//! degrade to plain-text contents instead of an error flag; resource reads
//! always produce a well-formed contents list.

use chrono::{Duration, Utc};
use serde_json::{Value, json};

use ampmcp_client::Client;
use ampmcp_types::{EventQuery, SegmentationParams};

use super::format::pretty;

pub const EVENTS_URI_TEMPLATE: &str = "amplitude://events/{eventType}/{start}/{end}";

const MISSING_PARAMS_TEXT: &str =
    "Missing required parameters. Format: amplitude://events/{eventType}/{start}/{end}";

/// `YYYYMMDD` window ending today.
fn date_window(days_ago: i64) -> (String, String) {
    let end = Utc::now();
    let start = end - Duration::days(days_ago);
    (
        start.format("%Y%m%d").to_string(),
        end.format("%Y%m%d").to_string(),
    )
}

/// `resources/templates/list` result payload.
pub fn templates() -> Value {
    json!({
        "resourceTemplates": [{
            "uriTemplate": EVENTS_URI_TEMPLATE,
            "name": "amplitude_events",
            "description": "Event segmentation data for one event type over a date range",
            "mimeType": "application/json",
        }]
    })
}

/// `resources/list` result payload: example URIs so clients can discover
/// the address format.
pub fn examples() -> Value {
    let (last7_start, last7_end) = date_window(7);
    let (last30_start, last30_end) = date_window(30);

    json!({
        "resources": [
            {
                "uri": format!("amplitude://events/_active/{}/{}", last7_start, last7_end),
                "name": "Active Events - Last 7 Days",
                "description": "All active events from the last 7 days",
                "mimeType": "application/json",
            },
            {
                "uri": format!("amplitude://events/_all/{}/{}", last7_start, last7_end),
                "name": "All Events - Last 7 Days",
                "description": "All tracked events from the last 7 days",
                "mimeType": "application/json",
            },
            {
                "uri": format!("amplitude://events/_active/{}/{}", last30_start, last30_end),
                "name": "Active Events - Last 30 Days",
                "description": "All active events from the last 30 days",
                "mimeType": "application/json",
            }
        ]
    })
}

#[derive(Debug, PartialEq)]
pub struct EventsPath {
    pub event_type: String,
    pub start: String,
    pub end: String,
}

/// Parse an events URI into its path parameters. `None` when the scheme
/// doesn't match or any of the three segments is missing or empty.
pub fn parse_events_uri(uri: &str) -> Option<EventsPath> {
    let rest = uri.strip_prefix("amplitude://events/")?;
    let segments: Vec<&str> = rest.split('/').collect();
    if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(EventsPath {
        event_type: segments[0].to_string(),
        start: segments[1].to_string(),
        end: segments[2].to_string(),
    })
}

/// `resources/read` result payload.
pub async fn read(client: &Client, uri: &str) -> Value {
    let Some(path) = parse_events_uri(uri) else {
        return json!({
            "contents": [{
                "uri": uri,
                "mimeType": "text/plain",
                "text": MISSING_PARAMS_TEXT,
            }]
        });
    };

    let params = SegmentationParams {
        events: vec![EventQuery {
            event_type: path.event_type.clone(),
            property_filters: None,
        }],
        start: path.start.clone(),
        end: path.end.clone(),
        interval: None,
        breakdowns: vec![],
    };

    match client.query_segmentation(&params).await {
        Ok(result) => json!({
            "contents": [{
                "uri": uri,
                "name": format!("{} Events ({} - {})", path.event_type, path.start, path.end),
                "description": format!(
                    "Event data for {} from {} to {}",
                    path.event_type, path.start, path.end
                ),
                "mimeType": "application/json",
                "text": pretty(&result),
            }]
        }),
        Err(e) => json!({
            "contents": [{
                "uri": uri,
                "mimeType": "text/plain",
                "text": format!("Error accessing event data: {}", e),
            }]
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_uri_parses_into_path_parameters() {
        let path = parse_events_uri("amplitude://events/page_viewed/20250101/20250131").unwrap();
        assert_eq!(
            path,
            EventsPath {
                event_type: "page_viewed".to_string(),
                start: "20250101".to_string(),
                end: "20250131".to_string(),
            }
        );
    }

    #[test]
    fn incomplete_uris_are_rejected() {
        assert!(parse_events_uri("amplitude://events/page_viewed/20250101").is_none());
        assert!(parse_events_uri("amplitude://events/page_viewed//20250131").is_none());
        assert!(parse_events_uri("amplitude://events/a/b/c/d").is_none());
        assert!(parse_events_uri("other://events/a/20250101/20250131").is_none());
    }

    #[test]
    fn examples_advertise_three_resources() {
        let listed = examples();
        let resources = listed["resources"].as_array().unwrap();
        assert_eq!(resources.len(), 3);
        for resource in resources {
            let uri = resource["uri"].as_str().unwrap();
            assert!(parse_events_uri(uri).is_some(), "example {} must parse", uri);
        }
    }
}
