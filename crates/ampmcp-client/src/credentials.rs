//! Credentials and data-residency region for the Dashboard REST API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Data residency region selecting the API base host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Region {
    #[default]
    Us,
    Eu,
}

impl Region {
    /// `"eu"` selects the EU residency host; anything else (including an
    /// absent value) falls back to the standard host.
    pub fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("eu") {
            Region::Eu
        } else {
            Region::Us
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Region::Us => "https://amplitude.com/api/2",
            Region::Eu => "https://analytics.eu.amplitude.com/api/2",
        }
    }
}

/// Auth for the remote API. Resolved once at startup, never persisted.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub secret_key: String,
    pub region: Region,
}

impl Credentials {
    pub fn new(api_key: String, secret_key: String, region: Region) -> Self {
        Self {
            api_key,
            secret_key,
            region,
        }
    }

    /// `Authorization` header value: base64 of `api-key:secret-key`.
    pub fn basic_auth(&self) -> String {
        let pair = format!("{}:{}", self.api_key, self.secret_key);
        format!("Basic {}", BASE64.encode(pair))
    }
}
