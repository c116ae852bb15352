//! Amplitude Dashboard REST API client.
//!
//! One method per analytics operation; every call issues exactly one GET
//! and returns the decoded JSON body verbatim. Query construction lives in
//! [`query`] as pure functions, transport and error interpretation in
//! [`transport`].
//!
//! ```no_run
//! # use ampmcp_client::{Client, Credentials, Region};
//! # #[tokio::main]
//! # async fn main() -> ampmcp_types::Result<()> {
//! let client = Client::new(Credentials::new(
//!     "api-key".into(),
//!     "secret-key".into(),
//!     Region::Us,
//! ));
//! let events = client.list_events().await?;
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod query;
pub mod transport;

pub use credentials::{Credentials, Region};

use serde_json::Value;

use ampmcp_types::{FunnelArgs, Result, RetentionArgs, SegmentationParams};

/// Client for the Dashboard REST API. Cheap to clone; holds the resolved
/// credentials and a shared connection pool.
#[derive(Clone)]
pub struct Client {
    credentials: Credentials,
    http: reqwest::Client,
}

impl Client {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            http: reqwest::Client::new(),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Event segmentation: counts of one event over time, optionally
    /// filtered and broken down by properties.
    pub async fn query_segmentation(&self, params: &SegmentationParams) -> Result<Value> {
        let pairs = query::segmentation_params(params)?;
        transport::execute(&self.http, &self.credentials, "/events/segmentation", &pairs).await
    }

    /// Funnel analysis over an ordered sequence of 2-10 events.
    pub async fn query_funnel(&self, args: &FunnelArgs) -> Result<Value> {
        let pairs = query::funnel_params(args)?;
        transport::execute(&self.http, &self.credentials, "/funnels", &pairs).await
    }

    /// Retention between a start event and a return event.
    pub async fn query_retention(&self, args: &RetentionArgs) -> Result<Value> {
        let pairs = query::retention_params(args)?;
        transport::execute(&self.http, &self.credentials, "/retention", &pairs).await
    }

    /// All event types known to the project taxonomy.
    pub async fn list_events(&self) -> Result<Value> {
        transport::execute(&self.http, &self.credentials, "/taxonomy/event", &[]).await
    }

    /// Properties of one event type.
    pub async fn event_properties(&self, event_type: &str) -> Result<Value> {
        let pairs = [("event_type".to_string(), event_type.to_string())];
        transport::execute(&self.http, &self.credentials, "/taxonomy/event-property", &pairs).await
    }

    /// User-level properties of the project.
    pub async fn user_properties(&self) -> Result<Value> {
        transport::execute(&self.http, &self.credentials, "/taxonomy/user-property", &[]).await
    }
}
