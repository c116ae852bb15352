//! Typed views over the taxonomy endpoints.
//!
//! The remote API is inconsistent about field naming (`name` vs
//! `property_name`, `type` vs `property_type`), so the rows model both
//! spellings as optional fields and the accessors document the fallback
//! order. Query endpoints are passed through as raw `serde_json::Value`
//! instead; only taxonomy rows get local interpretation.

use serde::{Deserialize, Serialize};

/// The `{"data": [...]}` wrapper the taxonomy endpoints respond with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// One event type known to the project taxonomy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomyEvent {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub totals: Option<u64>,
    #[serde(default)]
    pub deleted: Option<bool>,
    #[serde(default)]
    pub hidden: Option<bool>,
}

impl TaxonomyEvent {
    /// Canonical event name: `value`, falling back to `name`.
    pub fn event_type(&self) -> &str {
        self.value
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("unknown")
    }

    /// Human-facing name: `display`, then `name`, then `value`.
    pub fn display_name(&self) -> &str {
        self.display
            .as_deref()
            .or(self.name.as_deref())
            .or(self.value.as_deref())
            .unwrap_or("unknown")
    }

    /// Soft-deleted and hidden events are excluded from summaries.
    pub fn is_active(&self) -> bool {
        !self.deleted.unwrap_or(false) && !self.hidden.unwrap_or(false)
    }
}

/// One event or user property from the taxonomy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomyProperty {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub property_name: Option<String>,
    #[serde(default, rename = "type")]
    pub value_type: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_enum: Option<bool>,
    #[serde(default)]
    pub enum_values: Option<Vec<String>>,
}

impl TaxonomyProperty {
    /// `name` preferred over `property_name` when both are present.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.property_name.as_deref())
            .unwrap_or("unknown")
    }

    /// `type` preferred over `property_type`; "string" when neither is set.
    pub fn kind(&self) -> &str {
        self.value_type
            .as_deref()
            .or(self.property_type.as_deref())
            .unwrap_or("string")
    }
}
