//! MCP JSON-RPC server over stdio.
//!
//! One request per line. Tool input schemas are generated from the Rust
//! argument types with `schema_for!`, so the catalog and the deserializers
//! share one definition. Handler failures become error-flagged results,
//! never JSON-RPC faults; only malformed requests (bad JSON, unknown
//! method, undecodable arguments) produce protocol-level errors.

use schemars::schema_for;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::io::{BufRead, BufReader, Write};

use ampmcp_client::Client;
use ampmcp_types::{
    FunnelArgs, ListEventPropertiesArgs, QueryEventsArgs, RetentionArgs, SegmentEventsArgs,
};

use super::prompts::PromptRegistry;
use super::resources;
use super::tools::{
    handle_analyze_funnel, handle_analyze_retention, handle_list_event_properties,
    handle_list_events, handle_list_user_properties, handle_query_events, handle_segment_events,
};

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

fn success(id: Value, result: Value) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result: Some(result),
        error: None,
    }
}

fn failure(id: Value, code: i32, message: String) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message,
            data: None,
        }),
    }
}

pub struct AmpServer {
    client: Client,
    prompts: PromptRegistry,
}

impl AmpServer {
    pub fn new(client: Client, prompts: PromptRegistry) -> Self {
        Self { client, prompts }
    }

    /// `None` for notifications, which must not be answered.
    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.id.is_none() && request.method.starts_with("notifications/") {
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);

        Some(match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            "resources/templates/list" => success(id, resources::templates()),
            "resources/list" => success(id, resources::examples()),
            "resources/read" => self.handle_read_resource(id, request.params).await,
            "prompts/list" => success(id, self.prompts.list()),
            "prompts/get" => self.handle_get_prompt(id, request.params),
            _ => failure(id, -32601, format!("Method not found: {}", request.method)),
        })
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {},
                    "resources": {},
                    "prompts": {}
                },
                "serverInfo": {
                    "name": "ampmcp",
                    "version": env!("CARGO_PKG_VERSION")
                },
                "instructions": "Amplitude Analytics MCP server. Use list_events first to discover tracked events, then query counts, segmentation, funnels, and retention. Dates are YYYYMMDD."
            }),
        )
    }

    fn handle_list_tools(&self, id: Value) -> JsonRpcResponse {
        let query_events_schema = schema_for!(QueryEventsArgs);
        let segment_events_schema = schema_for!(SegmentEventsArgs);
        let funnel_schema = schema_for!(FunnelArgs);
        let retention_schema = schema_for!(RetentionArgs);
        let event_properties_schema = schema_for!(ListEventPropertiesArgs);

        success(
            id,
            json!({
                "tools": [
                    {
                        "name": "list_events",
                        "description": "List all event types tracked in Amplitude. Use this FIRST to discover available events before querying. Returns event names, descriptions, and categories.",
                        "inputSchema": {
                            "type": "object",
                            "properties": {}
                        }
                    },
                    {
                        "name": "list_event_properties",
                        "description": "List properties available for a specific event type. Use this to understand what filters and breakdowns are available.",
                        "inputSchema": serde_json::to_value(&event_properties_schema).unwrap(),
                    },
                    {
                        "name": "list_user_properties",
                        "description": "List all user properties tracked in Amplitude. Useful for understanding available segmentation options.",
                        "inputSchema": {
                            "type": "object",
                            "properties": {}
                        }
                    },
                    {
                        "name": "query_events",
                        "description": "Query Amplitude event counts over a date range. Returns daily/weekly/monthly totals.",
                        "inputSchema": serde_json::to_value(&query_events_schema).unwrap(),
                    },
                    {
                        "name": "segment_events",
                        "description": "Query events with advanced segmentation and breakdowns by properties.",
                        "inputSchema": serde_json::to_value(&segment_events_schema).unwrap(),
                    },
                    {
                        "name": "analyze_funnel",
                        "description": "Analyze conversion through a sequence of events (funnel). Shows how users progress through steps and where they drop off.",
                        "inputSchema": serde_json::to_value(&funnel_schema).unwrap(),
                    },
                    {
                        "name": "analyze_retention",
                        "description": "Analyze user retention between a starting event and return event. Shows what percentage of users come back over time.",
                        "inputSchema": serde_json::to_value(&retention_schema).unwrap(),
                    }
                ]
            }),
        )
    }

    async fn handle_call_tool(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return failure(id, -32602, "Missing params".to_string());
        };

        let Some(tool_name) = params.get("name").and_then(|v| v.as_str()) else {
            return failure(id, -32602, "Missing tool name".to_string());
        };

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        let result = match tool_name {
            "list_events" => handle_list_events(&self.client).await,
            "list_user_properties" => handle_list_user_properties(&self.client).await,
            "list_event_properties" => {
                match parse_args::<ListEventPropertiesArgs>(tool_name, arguments) {
                    Ok(args) => handle_list_event_properties(&self.client, args).await,
                    Err(response) => return respond_invalid(id, response),
                }
            }
            "query_events" => match parse_args::<QueryEventsArgs>(tool_name, arguments) {
                Ok(args) => handle_query_events(&self.client, args).await,
                Err(response) => return respond_invalid(id, response),
            },
            "segment_events" => match parse_args::<SegmentEventsArgs>(tool_name, arguments) {
                Ok(args) => handle_segment_events(&self.client, args).await,
                Err(response) => return respond_invalid(id, response),
            },
            "analyze_funnel" => match parse_args::<FunnelArgs>(tool_name, arguments) {
                Ok(args) => handle_analyze_funnel(&self.client, args).await,
                Err(response) => return respond_invalid(id, response),
            },
            "analyze_retention" => match parse_args::<RetentionArgs>(tool_name, arguments) {
                Ok(args) => handle_analyze_retention(&self.client, args).await,
                Err(response) => return respond_invalid(id, response),
            },
            _ => return failure(id, -32602, format!("Unknown tool: {}", tool_name)),
        };

        match result {
            Ok(texts) => {
                let content: Vec<Value> = texts
                    .into_iter()
                    .map(|text| json!({ "type": "text", "text": text }))
                    .collect();
                success(id, json!({ "content": content }))
            }
            Err(message) => success(
                id,
                json!({
                    "content": [{ "type": "text", "text": message }],
                    "isError": true
                }),
            ),
        }
    }

    async fn handle_read_resource(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let Some(uri) = params
            .as_ref()
            .and_then(|p| p.get("uri"))
            .and_then(|v| v.as_str())
        else {
            return failure(id, -32602, "Missing resource uri".to_string());
        };

        success(id, resources::read(&self.client, uri).await)
    }

    fn handle_get_prompt(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let Some(name) = params
            .as_ref()
            .and_then(|p| p.get("name"))
            .and_then(|v| v.as_str())
        else {
            return failure(id, -32602, "Missing prompt name".to_string());
        };

        let arguments: Map<String, Value> = params
            .as_ref()
            .and_then(|p| p.get("arguments"))
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default();

        match self.prompts.get(name, &arguments) {
            Some(result) => success(id, result),
            None => failure(id, -32602, format!("Unknown prompt: {}", name)),
        }
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(
    tool_name: &str,
    arguments: Value,
) -> Result<T, String> {
    serde_json::from_value(arguments)
        .map_err(|e| format!("Invalid arguments for {}: {}", tool_name, e))
}

fn respond_invalid(id: Value, message: String) -> JsonRpcResponse {
    failure(id, -32602, message)
}

/// Run the MCP server over stdio until the host closes the stream.
pub async fn run_server(client: Client, prompts: PromptRegistry) -> anyhow::Result<()> {
    let server = AmpServer::new(client, prompts);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let reader = BufReader::new(stdin);

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(trimmed) {
            Ok(request) => request,
            Err(e) => {
                let error_response = failure(Value::Null, -32700, format!("Parse error: {}", e));
                writeln!(stdout, "{}", serde_json::to_string(&error_response)?)?;
                stdout.flush()?;
                continue;
            }
        };

        if let Some(response) = server.handle_request(request).await {
            writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
