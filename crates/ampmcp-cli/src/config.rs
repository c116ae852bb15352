//! Credential and prompt-directory resolution.
//!
//! Precedence for every value: explicit flag > environment variable >
//! default. Credentials are resolved once at startup and passed to every
//! handler; a missing secret is a fatal startup error since all downstream
//! calls require auth. Diagnostics name the missing variable, never its
//! value.

use std::path::PathBuf;

use ampmcp_client::{Credentials, Region};
use ampmcp_types::{Error, Result};

use crate::args::Cli;

pub const API_KEY_ENV: &str = "AMPLITUDE_API_KEY";
pub const SECRET_KEY_ENV: &str = "AMPLITUDE_SECRET_KEY";
pub const REGION_ENV: &str = "AMPLITUDE_REGION";
pub const PROMPTS_DIR_ENV: &str = "AMPLITUDE_MCP_PROMPTS_DIR";

pub fn resolve_credentials(cli: &Cli) -> Result<Credentials> {
    resolve_credentials_from(cli, |key| std::env::var(key).ok())
}

/// Resolution with an injectable environment lookup, so tests can run
/// without touching the process environment.
pub fn resolve_credentials_from(
    cli: &Cli,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Credentials> {
    let api_key = cli
        .api_key
        .clone()
        .or_else(|| env(API_KEY_ENV))
        .unwrap_or_default();
    let secret_key = cli
        .secret_key
        .clone()
        .or_else(|| env(SECRET_KEY_ENV))
        .unwrap_or_default();

    let mut missing = Vec::new();
    if api_key.is_empty() {
        missing.push("API key (--api-key or AMPLITUDE_API_KEY)");
    }
    if secret_key.is_empty() {
        missing.push("secret key (--secret-key or AMPLITUDE_SECRET_KEY)");
    }
    if !missing.is_empty() {
        return Err(Error::Config(format!(
            "missing Amplitude {}",
            missing.join(" and ")
        )));
    }

    let region = cli
        .region
        .clone()
        .or_else(|| env(REGION_ENV))
        .map(|token| Region::from_token(&token))
        .unwrap_or_default();

    Ok(Credentials::new(api_key, secret_key, region))
}

pub fn resolve_prompts_dir(cli: &Cli) -> Option<PathBuf> {
    resolve_prompts_dir_from(cli, |key| std::env::var(key).ok())
}

pub fn resolve_prompts_dir_from(
    cli: &Cli,
    env: impl Fn(&str) -> Option<String>,
) -> Option<PathBuf> {
    cli.prompts_dir
        .clone()
        .or_else(|| env(PROMPTS_DIR_ENV))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn flags_take_precedence_over_environment() {
        let cli = Cli {
            api_key: Some("flag-key".to_string()),
            secret_key: Some("flag-secret".to_string()),
            region: Some("eu".to_string()),
            prompts_dir: None,
        };
        let env = |key: &str| Some(format!("env-{}", key));
        let creds = resolve_credentials_from(&cli, env).unwrap();
        assert_eq!(creds.api_key, "flag-key");
        assert_eq!(creds.secret_key, "flag-secret");
        assert_eq!(creds.region, Region::Eu);
    }

    #[test]
    fn environment_fills_missing_flags() {
        let cli = Cli::default();
        let env = |key: &str| match key {
            API_KEY_ENV => Some("env-key".to_string()),
            SECRET_KEY_ENV => Some("env-secret".to_string()),
            _ => None,
        };
        let creds = resolve_credentials_from(&cli, env).unwrap();
        assert_eq!(creds.api_key, "env-key");
        assert_eq!(creds.region, Region::Us);
    }

    #[test]
    fn missing_secrets_fail_fast_without_leaking_values() {
        let cli = Cli {
            api_key: Some("present".to_string()),
            ..Cli::default()
        };
        let err = resolve_credentials_from(&cli, no_env).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("secret key"));
        assert!(message.contains("AMPLITUDE_SECRET_KEY"));
        assert!(!message.contains("present"));
    }

    #[test]
    fn both_secrets_missing_are_reported_together() {
        let err = resolve_credentials_from(&Cli::default(), no_env).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("API key"));
        assert!(message.contains("secret key"));
    }

    #[test]
    fn prompts_dir_resolves_flag_then_env() {
        let cli = Cli {
            prompts_dir: Some("/from/flag".to_string()),
            ..Cli::default()
        };
        let env = |_: &str| Some("/from/env".to_string());
        assert_eq!(
            resolve_prompts_dir_from(&cli, env),
            Some(PathBuf::from("/from/flag"))
        );
        assert_eq!(
            resolve_prompts_dir_from(&Cli::default(), |_| Some("/from/env".to_string())),
            Some(PathBuf::from("/from/env"))
        );
        assert_eq!(resolve_prompts_dir_from(&Cli::default(), no_env), None);
    }
}
