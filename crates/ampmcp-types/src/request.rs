//! Tool argument types and their pre-network validation.
//!
//! Field names follow the wire casing of the MCP tool catalog
//! (`eventType`, `propertyFilters`, ...), so the generated JSON Schemas and
//! the serde deserializers stay in lockstep.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A property filter value: a scalar or a list of strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<String>),
}

/// Comparison operators accepted for event property filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FilterOp {
    #[serde(rename = "is")]
    Is,
    #[serde(rename = "is not")]
    IsNot,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "does not contain")]
    DoesNotContain,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
}

/// A single comparison on an event property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilter {
    /// Name of the event property to filter on
    pub property_name: String,
    /// Value to match
    pub value: PropertyValue,
    /// Comparison operator
    pub op: FilterOp,
}

/// An event to query, with optional property filters.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    /// Event name to query (e.g., 'page_viewed', 'button_clicked')
    pub event_type: String,
    /// Optional filters on event properties
    #[serde(default)]
    pub property_filters: Option<Vec<PropertyFilter>>,
}

/// Grouping dimension kind for segmentation breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BreakdownKind {
    Event,
    User,
}

/// A dimension used to split aggregate results into subgroups.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Breakdown {
    /// 'event' for event properties, 'user' for user properties
    #[serde(rename = "type")]
    pub kind: BreakdownKind,
    /// Actual property name like 'platform', 'country', 'device_type'
    #[serde(rename = "propertyName")]
    pub property_name: String,
}

/// Time interval for grouping event counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeInterval {
    #[default]
    Day,
    Week,
    Month,
}

impl TimeInterval {
    pub fn as_token(&self) -> &'static str {
        match self {
            TimeInterval::Day => "day",
            TimeInterval::Week => "week",
            TimeInterval::Month => "month",
        }
    }
}

/// Comparison operators accepted for user segment conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SegmentOp {
    #[serde(rename = "is")]
    Is,
    #[serde(rename = "is not")]
    IsNot,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "does not contain")]
    DoesNotContain,
    #[serde(rename = "less")]
    LessThan,
    #[serde(rename = "less or equal")]
    LessOrEqual,
    #[serde(rename = "greater")]
    GreaterThan,
    #[serde(rename = "greater or equal")]
    GreaterOrEqual,
    #[serde(rename = "set is")]
    SetIs,
    #[serde(rename = "set is not")]
    SetIsNot,
}

/// One condition of a user segment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SegmentCondition {
    /// Property name (use 'gp:name' for custom user properties)
    pub prop: String,
    /// Comparison operator
    pub op: SegmentOp,
    /// Values to match
    pub values: Vec<String>,
}

/// Funnel ordering mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FunnelMode {
    /// Users must do the steps in order, other events may occur in between
    #[default]
    #[serde(rename = "this order")]
    ThisOrder,
    /// Steps may be completed in any order
    #[serde(rename = "any order")]
    AnyOrder,
    /// Steps must be completed in order with no other events in between
    #[serde(rename = "exact order")]
    ExactOrder,
}

impl FunnelMode {
    /// Wire token expected by the Dashboard REST API's `mode` parameter.
    pub fn code(&self) -> &'static str {
        match self {
            FunnelMode::ThisOrder => "ordered",
            FunnelMode::AnyOrder => "unordered",
            FunnelMode::ExactOrder => "sequential",
        }
    }
}

/// Retention bucketing mode, sent verbatim to the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RetentionType {
    /// Specific day ranges
    #[default]
    Bracket,
    /// Cumulative retention
    Rolling,
}

impl RetentionType {
    pub fn as_token(&self) -> &'static str {
        match self {
            RetentionType::Bracket => "bracket",
            RetentionType::Rolling => "rolling",
        }
    }
}

/// Query event counts over a date range.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryEventsArgs {
    /// Events to query
    pub events: Vec<EventQuery>,
    /// Start date in YYYYMMDD format
    pub start: String,
    /// End date in YYYYMMDD format
    pub end: String,
    /// Time interval for grouping (default: day)
    #[serde(default)]
    pub interval: TimeInterval,
}

/// Query events with segmentation and property breakdowns.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SegmentEventsArgs {
    /// Events to query
    pub events: Vec<EventQuery>,
    /// Start date in YYYYMMDD format
    pub start: String,
    /// End date in YYYYMMDD format
    pub end: String,
    /// Time interval for grouping (default: day)
    #[serde(default)]
    pub interval: TimeInterval,
    /// Break down results by properties
    #[serde(default)]
    pub breakdowns: Option<Vec<Breakdown>>,
}

/// Analyze conversion through an ordered sequence of events.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FunnelArgs {
    /// Ordered sequence of events in the funnel (2-10 events)
    pub events: Vec<EventQuery>,
    /// Start date in YYYYMMDD format
    pub start: String,
    /// End date in YYYYMMDD format
    pub end: String,
    /// Funnel mode: 'this order' (sequential), 'any order', or 'exact order' (no other events between)
    #[serde(default)]
    pub mode: FunnelMode,
    /// Max seconds between first and last event for conversion (default: no limit)
    #[serde(default)]
    pub conversion_window: Option<u64>,
    /// Filter to a specific user segment
    #[serde(default)]
    pub segment: Option<Vec<SegmentCondition>>,
    /// Property to group results by (e.g., 'platform', 'gp:country')
    #[serde(default)]
    pub group_by: Option<String>,
}

/// An event bounding a retention window, with optional filters.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetentionEvent {
    /// Event name (e.g., 'sign_up', 'page_viewed')
    pub event_type: String,
    /// Optional filters on the event
    #[serde(default)]
    pub filters: Option<Vec<PropertyFilter>>,
}

/// Analyze user retention between a starting event and a return event.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetentionArgs {
    /// The starting event for retention analysis
    pub start_event: RetentionEvent,
    /// The return event for retention analysis
    pub return_event: RetentionEvent,
    /// Start date in YYYYMMDD format
    pub start: String,
    /// End date in YYYYMMDD format
    pub end: String,
    /// 'bracket' = specific day ranges, 'rolling' = cumulative retention
    #[serde(default)]
    pub retention_type: RetentionType,
    /// Filter to a specific user segment
    #[serde(default)]
    pub segment: Option<Vec<SegmentCondition>>,
    /// Property to group results by
    #[serde(default)]
    pub group_by: Option<String>,
}

/// List properties available for a specific event type.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListEventPropertiesArgs {
    /// Event type name to get properties for
    pub event_type: String,
}

/// Internal parameters for one segmentation call, shared by the query tools
/// and the events resource.
#[derive(Debug, Clone)]
pub struct SegmentationParams {
    pub events: Vec<EventQuery>,
    pub start: String,
    pub end: String,
    pub interval: Option<String>,
    pub breakdowns: Vec<Breakdown>,
}

/// Check the 8-digit `YYYYMMDD` prefix the Dashboard REST API expects.
pub fn validate_date(label: &str, value: &str) -> Result<()> {
    let digits = value.len() >= 8 && value.as_bytes()[..8].iter().all(u8::is_ascii_digit);
    if !digits {
        return Err(Error::Validation(format!(
            "{} must be an 8-digit YYYYMMDD date, got \"{}\"",
            label, value
        )));
    }
    Ok(())
}

impl SegmentationParams {
    pub fn validate(&self) -> Result<()> {
        if self.events.is_empty() {
            return Err(Error::Validation("at least one event is required".to_string()));
        }
        validate_date("start", &self.start)?;
        validate_date("end", &self.end)
    }
}

impl FunnelArgs {
    pub fn validate(&self) -> Result<()> {
        if self.events.len() < 2 || self.events.len() > 10 {
            return Err(Error::Validation(format!(
                "funnel requires 2-10 events, got {}",
                self.events.len()
            )));
        }
        validate_date("start", &self.start)?;
        validate_date("end", &self.end)
    }
}

impl RetentionArgs {
    pub fn validate(&self) -> Result<()> {
        validate_date("start", &self.start)?;
        validate_date("end", &self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_filter_deserializes_wire_casing() {
        let filter: PropertyFilter = serde_json::from_str(
            r#"{"propertyName": "platform", "op": "is", "value": "iOS"}"#,
        )
        .unwrap();
        assert_eq!(filter.property_name, "platform");
        assert_eq!(filter.op, FilterOp::Is);
        assert_eq!(filter.value, PropertyValue::String("iOS".to_string()));
    }

    #[test]
    fn property_value_accepts_scalars_and_lists() {
        let v: PropertyValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, PropertyValue::Bool(true));
        let v: PropertyValue = serde_json::from_str("3.5").unwrap();
        assert_eq!(v, PropertyValue::Number(3.5));
        let v: PropertyValue = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(v, PropertyValue::List(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn funnel_mode_defaults_to_this_order() {
        let args: FunnelArgs = serde_json::from_str(
            r#"{
                "events": [{"eventType": "a"}, {"eventType": "b"}],
                "start": "20250101",
                "end": "20250131"
            }"#,
        )
        .unwrap();
        assert_eq!(args.mode, FunnelMode::ThisOrder);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn funnel_rejects_out_of_range_step_counts() {
        let one_event = FunnelArgs {
            events: vec![EventQuery {
                event_type: "a".to_string(),
                property_filters: None,
            }],
            start: "20250101".to_string(),
            end: "20250131".to_string(),
            mode: FunnelMode::ThisOrder,
            conversion_window: None,
            segment: None,
            group_by: None,
        };
        assert!(one_event.validate().is_err());

        let mut eleven = one_event.clone();
        eleven.events = (0..11)
            .map(|i| EventQuery {
                event_type: format!("e{}", i),
                property_filters: None,
            })
            .collect();
        assert!(eleven.validate().is_err());
    }

    #[test]
    fn dates_require_eight_digit_prefix() {
        assert!(validate_date("start", "20250101").is_ok());
        assert!(validate_date("start", "20250101T00").is_ok());
        assert!(validate_date("start", "2025-01-01").is_err());
        assert!(validate_date("start", "2025").is_err());
    }

    #[test]
    fn retention_args_deserialize_nested_events() {
        let args: RetentionArgs = serde_json::from_str(
            r#"{
                "startEvent": {"eventType": "sign_up"},
                "returnEvent": {"eventType": "page_viewed", "filters": [
                    {"propertyName": "page", "op": "is", "value": "home"}
                ]},
                "start": "20250101",
                "end": "20250131",
                "retentionType": "rolling"
            }"#,
        )
        .unwrap();
        assert_eq!(args.start_event.event_type, "sign_up");
        assert_eq!(args.retention_type, RetentionType::Rolling);
        assert_eq!(args.return_event.filters.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn funnel_mode_codes() {
        assert_eq!(FunnelMode::ThisOrder.code(), "ordered");
        assert_eq!(FunnelMode::AnyOrder.code(), "unordered");
        assert_eq!(FunnelMode::ExactOrder.code(), "sequential");
    }
}
