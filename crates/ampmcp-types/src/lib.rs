//! Shared types for the ampmcp server.
//!
//! Tool argument types live here with both `serde` and `schemars` derives so
//! the MCP input schemas are generated from the same definitions that
//! deserialize incoming calls.

pub mod error;
pub mod request;
pub mod response;

pub use error::{Error, RemoteMessageSource, Result};
pub use request::{
    Breakdown, BreakdownKind, EventQuery, FilterOp, FunnelArgs, FunnelMode,
    ListEventPropertiesArgs, PropertyFilter, PropertyValue, QueryEventsArgs, RetentionArgs,
    RetentionEvent, RetentionType, SegmentCondition, SegmentEventsArgs, SegmentOp,
    SegmentationParams, TimeInterval, validate_date,
};
pub use response::{TaxonomyEnvelope, TaxonomyEvent, TaxonomyProperty};
