//! Prompt catalog: four built-in analysis prompts plus optional
//! per-deployment definitions loaded from `<dir>/prompts/*.json`.
//!
//! Rendering is plain string substitution of `{argName}` placeholders.
//! Missing arguments substitute to the empty string; there is no escaping,
//! nesting, or control flow. Prompts declaring a `time_range` argument also
//! get derived `{start_date}`, `{end_date}`, and `{range_description}`
//! placeholders computed from the current date.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptArgument {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    pub name: String,
    pub description: String,
    pub template: String,
    #[serde(default)]
    pub arguments: Vec<PromptArgument>,
}

pub struct PromptRegistry {
    prompts: Vec<PromptDefinition>,
}

fn arg(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        description: description.to_string(),
        required,
    }
}

const TIME_RANGE_DESCRIPTION: &str =
    "Time range for analysis: last_7_days, last_30_days, or last_90_days (default: last_30_days)";

/// Date window for a time-range token, as (start, end, description).
/// Unknown tokens fall back to the last 30 days.
fn time_range_window(token: &str) -> (String, String, &'static str) {
    let (days, description) = match token {
        "last_7_days" => (7, "last 7 days"),
        "last_90_days" => (90, "last 90 days"),
        _ => (30, "last 30 days"),
    };
    let end = Utc::now();
    let start = end - Duration::days(days);
    (
        start.format("%Y%m%d").to_string(),
        end.format("%Y%m%d").to_string(),
        description,
    )
}

impl PromptRegistry {
    pub fn builtin() -> Self {
        let prompts = vec![
            PromptDefinition {
                name: "analyze_user_journey".to_string(),
                description: "Analyze a specific user's event history and behavior patterns"
                    .to_string(),
                template: "Analyze the journey for user \"{user_identifier}\" over the {range_description}.\n\n\
                    Steps:\n\
                    1. Use list_events to discover which events this project tracks\n\
                    2. Query the most relevant events with query_events from {start_date} to {end_date}\n\
                    3. Identify key patterns:\n   \
                       - Most frequent events\n   \
                       - Session patterns\n   \
                       - Any conversion events\n   \
                       - Drop-off points\n\
                    4. Provide insights and recommendations"
                    .to_string(),
                arguments: vec![
                    arg(
                        "user_identifier",
                        "User ID, device ID, or Amplitude ID to analyze",
                        true,
                    ),
                    arg("time_range", TIME_RANGE_DESCRIPTION, false),
                ],
            },
            PromptDefinition {
                name: "conversion_funnel".to_string(),
                description: "Analyze conversion rates through a sequence of events".to_string(),
                template: "Analyze the conversion funnel from \"{start_event}\" to \"{end_event}\" over the {range_description}.\n\n\
                    Use the analyze_funnel tool with:\n\
                    - events: [{ eventType: \"{start_event}\" }, { eventType: \"{end_event}\" }]\n\
                    - start: \"{start_date}\"\n\
                    - end: \"{end_date}\"\n\n\
                    Then analyze:\n\
                    1. Overall conversion rate\n\
                    2. Drop-off between steps\n\
                    3. Suggestions for improving conversion"
                    .to_string(),
                arguments: vec![
                    arg(
                        "start_event",
                        "The starting event of the funnel (e.g., 'page_viewed')",
                        true,
                    ),
                    arg(
                        "end_event",
                        "The goal/conversion event (e.g., 'purchase_completed')",
                        true,
                    ),
                    arg("time_range", TIME_RANGE_DESCRIPTION, false),
                ],
            },
            PromptDefinition {
                name: "engagement_report".to_string(),
                description: "Generate a comprehensive engagement report for key events"
                    .to_string(),
                template: "Generate an engagement report for \"{event_name}\" over the {range_description}.\n\n\
                    Steps:\n\
                    1. Query event data using query_events with:\n   \
                       - events: [{ eventType: \"{event_name}\" }]\n   \
                       - start: \"{start_date}\"\n   \
                       - end: \"{end_date}\"\n   \
                       - interval: \"day\"\n\n\
                    2. Analyze and report:\n   \
                       - Total event count and trend\n   \
                       - Daily/weekly patterns\n   \
                       - Peak usage times\n   \
                       - Comparison to previous period\n   \
                       - Key insights and recommendations"
                    .to_string(),
                arguments: vec![
                    arg(
                        "event_type",
                        "Specific event to analyze (leave empty for all active events)",
                        false,
                    ),
                    arg("time_range", TIME_RANGE_DESCRIPTION, false),
                ],
            },
            PromptDefinition {
                name: "retention_analysis".to_string(),
                description: "Analyze user retention between two events".to_string(),
                template: "Analyze user retention from \"{start_event}\" to \"{return_event}\" over the {range_description}.\n\n\
                    Use the analyze_retention tool with:\n\
                    - startEvent: { eventType: \"{start_event}\" }\n\
                    - returnEvent: { eventType: \"{return_event}\" }\n\
                    - start: \"{start_date}\"\n\
                    - end: \"{end_date}\"\n\n\
                    Analyze:\n\
                    1. Day 1, Day 7, Day 30 retention rates\n\
                    2. Retention curve shape\n\
                    3. Comparison to industry benchmarks\n\
                    4. Recommendations for improving retention"
                    .to_string(),
                arguments: vec![
                    arg(
                        "start_event",
                        "Event that defines user acquisition (e.g., 'sign_up')",
                        true,
                    ),
                    arg(
                        "return_event",
                        "Event that indicates user return (e.g., 'page_viewed')",
                        true,
                    ),
                    arg("time_range", TIME_RANGE_DESCRIPTION, false),
                ],
            },
        ];

        Self { prompts }
    }

    /// Load per-deployment prompt definitions from `<dir>/prompts/*.json`.
    /// Files that fail to read or parse are skipped with a stderr
    /// diagnostic; they never abort startup.
    pub fn load_project_prompts(&mut self, dir: &Path) {
        let prompts_dir = dir.join("prompts");
        if !prompts_dir.exists() {
            return;
        }

        let entries = match std::fs::read_dir(&prompts_dir) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!("Failed to read prompts directory {}: {}", prompts_dir.display(), e);
                return;
            }
        };

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in paths {
            let parsed = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|content| {
                    serde_json::from_str::<PromptDefinition>(&content).map_err(|e| e.to_string())
                });
            match parsed {
                Ok(definition) => self.prompts.push(definition),
                Err(e) => eprintln!("Failed to load prompt from {}: {}", path.display(), e),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&PromptDefinition> {
        self.prompts.iter().find(|p| p.name == name)
    }

    /// `prompts/list` result payload.
    pub fn list(&self) -> Value {
        let prompts: Vec<Value> = self
            .prompts
            .iter()
            .map(|p| {
                json!({
                    "name": p.name,
                    "description": p.description,
                    "arguments": p.arguments.iter().map(|a| json!({
                        "name": a.name,
                        "description": a.description,
                        "required": a.required,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();
        json!({ "prompts": prompts })
    }

    /// `prompts/get` result payload, or `None` for an unknown prompt.
    pub fn get(&self, name: &str, arguments: &Map<String, Value>) -> Option<Value> {
        let definition = self.find(name)?;
        let text = render(definition, arguments);
        Some(json!({
            "description": definition.description,
            "messages": [{
                "role": "user",
                "content": { "type": "text", "text": text }
            }]
        }))
    }
}

/// Substitute `{argName}` placeholders with supplied argument values.
pub fn render(definition: &PromptDefinition, arguments: &Map<String, Value>) -> String {
    let mut values: BTreeMap<String, String> = BTreeMap::new();

    for declared in &definition.arguments {
        let value = arguments
            .get(&declared.name)
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_default();
        values.insert(declared.name.clone(), value);
    }

    // Derived placeholders for prompts that take a time range, mirroring
    // how the built-in templates phrase their date windows.
    if definition.arguments.iter().any(|a| a.name == "time_range") {
        let token = values.get("time_range").cloned().unwrap_or_default();
        let (start, end, description) = time_range_window(&token);
        values.insert("start_date".to_string(), start);
        values.insert("end_date".to_string(), end);
        values.insert("range_description".to_string(), description.to_string());
    }
    if let Some(event_type) = values.get("event_type") {
        let event_name = if event_type.is_empty() {
            "_active".to_string()
        } else {
            event_type.clone()
        };
        values.insert("event_name".to_string(), event_name);
    }

    let mut text = definition.template.clone();
    for (name, value) in &values {
        text = text.replace(&format!("{{{}}}", name), value);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn substitution_leaves_no_placeholder_tokens() {
        let definition = PromptDefinition {
            name: "weekly_journey".to_string(),
            description: "test".to_string(),
            template: "Review {user_identifier} activity over {time_range}.".to_string(),
            arguments: vec![
                arg("user_identifier", "user", true),
                arg("time_range", "range", false),
            ],
        };
        let rendered = render(
            &definition,
            &args(&[("user_identifier", "u1"), ("time_range", "last_7_days")]),
        );
        assert_eq!(rendered, "Review u1 activity over last_7_days.");
        assert!(!rendered.contains('{'));
    }

    #[test]
    fn missing_arguments_substitute_to_empty_string() {
        let definition = PromptDefinition {
            name: "p".to_string(),
            description: "test".to_string(),
            template: "user=<{user_identifier}>".to_string(),
            arguments: vec![arg("user_identifier", "user", false)],
        };
        let rendered = render(&definition, &Map::new());
        assert_eq!(rendered, "user=<>");
    }

    #[test]
    fn builtin_conversion_funnel_renders_dates() {
        let registry = PromptRegistry::builtin();
        let result = registry
            .get(
                "conversion_funnel",
                &args(&[
                    ("start_event", "page_viewed"),
                    ("end_event", "purchase"),
                    ("time_range", "last_7_days"),
                ]),
            )
            .unwrap();

        let text = result["messages"][0]["content"]["text"].as_str().unwrap();
        assert!(text.contains("from \"page_viewed\" to \"purchase\""));
        assert!(text.contains("last 7 days"));
        assert!(!text.contains("{start_date}"));
        assert!(!text.contains("{end_event}"));
    }

    #[test]
    fn engagement_report_defaults_to_active_events() {
        let registry = PromptRegistry::builtin();
        let result = registry.get("engagement_report", &Map::new()).unwrap();
        let text = result["messages"][0]["content"]["text"].as_str().unwrap();
        assert!(text.contains("eventType: \"_active\""));
    }

    #[test]
    fn builtin_registry_lists_four_prompts() {
        let registry = PromptRegistry::builtin();
        let listed = registry.list();
        let names: Vec<&str> = listed["prompts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "analyze_user_journey",
                "conversion_funnel",
                "engagement_report",
                "retention_analysis"
            ]
        );
    }

    #[test]
    fn unknown_prompt_returns_none() {
        let registry = PromptRegistry::builtin();
        assert!(registry.get("nope", &Map::new()).is_none());
    }

    #[test]
    fn project_prompts_load_from_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let prompts_dir = dir.path().join("prompts");
        std::fs::create_dir(&prompts_dir).unwrap();
        std::fs::write(
            prompts_dir.join("churn.json"),
            r#"{
                "name": "churn_check",
                "description": "Check churn",
                "template": "Check churn for {cohort}",
                "arguments": [{"name": "cohort", "description": "Cohort name", "required": true}]
            }"#,
        )
        .unwrap();
        std::fs::write(prompts_dir.join("broken.json"), "{ not json").unwrap();
        std::fs::write(prompts_dir.join("notes.txt"), "ignored").unwrap();

        let mut registry = PromptRegistry::builtin();
        let before = registry.len();
        registry.load_project_prompts(dir.path());

        assert_eq!(registry.len(), before + 1);
        let rendered = registry
            .get("churn_check", &args(&[("cohort", "trial users")]))
            .unwrap();
        let text = rendered["messages"][0]["content"]["text"].as_str().unwrap();
        assert_eq!(text, "Check churn for trial users");
    }

    #[test]
    fn missing_prompts_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = PromptRegistry::builtin();
        let before = registry.len();
        registry.load_project_prompts(dir.path());
        assert_eq!(registry.len(), before);
    }
}
