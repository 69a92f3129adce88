//! Anthropic Messages API model
//!
//! Structured output is obtained by forcing a single tool call whose input
//! schema is the recipe schema; the tool input is the answer.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::model::{GenerationRequest, GenerativeModel};
use super::GenerationError;
use crate::app::config::ModelConfig;
use crate::error::{Error, Result};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
    tools: Vec<Tool<'a>>,
    tool_choice: ToolChoice<'a>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool<'a> {
    name: &'a str,
    description: &'static str,
    input_schema: &'a Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
}

/// Anthropic Messages API client, one request per generation
pub struct AnthropicModel {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl AnthropicModel {
    /// Create a new client from model configuration
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl GenerativeModel for AnthropicModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<Option<Value>, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::NotConfigured("API key is not set".to_string()))?;

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
            tools: vec![Tool {
                name: request.schema_name,
                description: "Record the generated recipe.",
                input_schema: &request.output_schema,
            }],
            tool_choice: ToolChoice {
                kind: "tool",
                name: request.schema_name,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(format!("API request failed: {}", e)))?;

        match response.status() {
            StatusCode::OK => {
                let api_response: ApiResponse = response.json().await.map_err(|e| {
                    GenerationError::Transport(format!("Failed to parse response: {}", e))
                })?;

                debug!(
                    model = %api_response.model,
                    stop_reason = ?api_response.stop_reason,
                    input_tokens = api_response.usage.input_tokens,
                    output_tokens = api_response.usage.output_tokens,
                    "Model responded"
                );

                Ok(extract_tool_input(api_response.content, request.schema_name))
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                warn!(status = status.as_u16(), "Model provider returned an error");
                Err(GenerationError::Provider {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

/// Pick the structured answer out of the response content blocks
fn extract_tool_input(content: Vec<ContentBlock>, tool_name: &str) -> Option<Value> {
    content.into_iter().find_map(|block| match block {
        ContentBlock::ToolUse { name, input } if name == tool_name => Some(input),
        _ => None,
    })
}

// Internal API response structures
#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    model: String,
    stop_reason: Option<String>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    ToolUse {
        name: String,
        input: Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_tool_input_from_response() {
        let response: ApiResponse = serde_json::from_value(json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-3-5-haiku-latest",
            "stop_reason": "tool_use",
            "content": [
                { "type": "text", "text": "Hier is je recept." },
                {
                    "type": "tool_use",
                    "id": "toolu_01",
                    "name": "recipe",
                    "input": {
                        "title": "Omelet",
                        "preparationTime": "10 minuten",
                        "steps": ["Klop de eieren.", "Bak de omelet."]
                    }
                }
            ],
            "usage": { "input_tokens": 40, "output_tokens": 60 }
        }))
        .unwrap();

        let input = extract_tool_input(response.content, "recipe").unwrap();
        assert_eq!(input["title"], "Omelet");
    }

    #[test]
    fn test_extract_tool_input_without_tool_call() {
        let content = vec![ContentBlock::Other];
        assert!(extract_tool_input(content, "recipe").is_none());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_not_configured() {
        let config = ModelConfig {
            api_key: None,
            ..ModelConfig::default()
        };
        let model = AnthropicModel::new(&config).unwrap();
        let request = GenerationRequest {
            prompt: "test".to_string(),
            schema_name: "recipe",
            output_schema: json!({}),
        };

        let err = model.generate(&request).await.unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured(_)));
    }
}
