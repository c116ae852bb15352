//! Single-shot GET transport with Basic auth.
//!
//! Interpretation of a non-2xx response is factored out as a pure function
//! of the status and body text so the fallback chain stays unit-testable.

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::credentials::Credentials;
use ampmcp_types::{Error, RemoteMessageSource, Result};

/// Issue one GET against `path` under the region's base URL.
///
/// No retries, no timeout override; an in-flight request runs to the
/// transport's own default timeout.
pub async fn execute(
    http: &reqwest::Client,
    credentials: &Credentials,
    path: &str,
    params: &[(String, String)],
) -> Result<Value> {
    let raw = format!("{}{}", credentials.region.base_url(), path);
    let mut url = reqwest::Url::parse(&raw)
        .map_err(|e| Error::Transport(format!("invalid request URL {}: {}", raw, e)))?;
    url.query_pairs_mut().extend_pairs(params.iter().map(|(k, v)| (k, v)));

    let response = http
        .get(url)
        .header(AUTHORIZATION, credentials.basic_auth())
        .header(CONTENT_TYPE, "application/json")
        .send()
        .await
        .map_err(|e| Error::Transport(format!("request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return match response.text().await {
            Ok(body) => Err(remote_error(status, &body)),
            // Reading the body itself failed; all we have is the status line.
            Err(_) => Err(Error::Remote {
                status: status.as_u16(),
                message: status_line(status),
                source: RemoteMessageSource::StatusLine,
            }),
        };
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| Error::Transport(format!("malformed response body: {}", e)))
}

fn status_line(status: StatusCode) -> String {
    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )
}

/// Build a `Remote` error from a non-2xx status and its body text.
///
/// Fallback order: a string `error`, `message`, or `code` field of a JSON
/// body; otherwise the raw body text; otherwise (empty body) the status
/// line.
pub fn remote_error(status: StatusCode, body: &str) -> Error {
    if body.is_empty() {
        return Error::Remote {
            status: status.as_u16(),
            message: status_line(status),
            source: RemoteMessageSource::StatusLine,
        };
    }

    if let Ok(parsed) = serde_json::from_str::<Value>(body) {
        let field = parsed
            .get("error")
            .or_else(|| parsed.get("message"))
            .or_else(|| parsed.get("code"));
        if let Some(Value::String(message)) = field {
            return Error::Remote {
                status: status.as_u16(),
                message: message.clone(),
                source: RemoteMessageSource::ParsedBody,
            };
        }
    }

    Error::Remote {
        status: status.as_u16(),
        message: body.to_string(),
        source: RemoteMessageSource::RawBody,
    }
}
