//! Tool-calling loop: ask the model, run the tools it requests, feed the
//! results back and repeat until it answers in plain text.

use chrono::Utc;
use concierge_core::event::{DomainEvent, EventBus};
use concierge_core::message::Message;
use concierge_core::provider::{Provider, ProviderRequest};
use concierge_core::tool::{ToolCall, ToolRegistry};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub const ITERATION_LIMIT_REPLY: &str =
    "I've reached the maximum number of tool call iterations. Please provide further guidance.";

/// One tool execution inside the loop.
#[derive(Debug, Clone, Serialize)]
pub struct ToolRun {
    pub call_id: String,
    pub name: String,
    pub arguments: Value,
    pub success: bool,
    pub output: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoopOutcome {
    pub reply: String,
    pub tool_runs: Vec<ToolRun>,
    pub iterations: u32,
    pub hit_limit: bool,
}

pub struct ToolLoop {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    tools: Arc<ToolRegistry>,
    max_iterations: u32,
    events: Arc<EventBus>,
}

impl ToolLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            tools,
            max_iterations: 10,
            events,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Run the loop over `messages`, appending every assistant turn and tool
    /// result to it.
    pub async fn run(&self, messages: &mut Vec<Message>) -> Result<LoopOutcome, concierge_core::Error> {
        let definitions = self.tools.definitions();
        let mut tool_runs = Vec::new();
        let mut iteration = 0;

        while iteration < self.max_iterations {
            iteration += 1;
            debug!(iteration, messages = messages.len(), "Tool loop iteration");

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: messages.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: definitions.clone(),
                stop: vec![],
            };
            let response = self.provider.complete(request).await?;

            if response.message.tool_calls.is_empty() {
                let reply = response.message.content.clone();
                messages.push(response.message);
                info!(iterations = iteration, tools = tool_runs.len(), "Tool loop finished");
                return Ok(LoopOutcome {
                    reply,
                    tool_runs,
                    iterations: iteration,
                    hit_limit: false,
                });
            }

            let calls = response.message.tool_calls.clone();
            messages.push(response.message);

            for tc in &calls {
                let call = ToolCall {
                    id: tc.id.clone(),
                    name: tc.name.clone(),
                    arguments: serde_json::from_str(&tc.arguments).unwrap_or_default(),
                };

                let start = Instant::now();
                let result = self.tools.execute(&call).await;
                let duration_ms = start.elapsed().as_millis() as u64;

                let (success, output) = match result {
                    Ok(result) => {
                        let output = result.data.unwrap_or(Value::String(result.output));
                        (result.success, output)
                    }
                    Err(e) => {
                        warn!(tool = %tc.name, error = %e, "Tool call failed");
                        (false, serde_json::json!({ "success": false, "error": e.to_string() }))
                    }
                };

                self.events.publish(DomainEvent::ToolExecuted {
                    tool_name: tc.name.clone(),
                    success,
                    duration_ms,
                    timestamp: Utc::now(),
                });

                messages.push(Message::tool_result(&tc.id, output.to_string()));
                tool_runs.push(ToolRun {
                    call_id: tc.id.clone(),
                    name: tc.name.clone(),
                    arguments: call.arguments,
                    success,
                    output,
                });
            }
        }

        warn!(iterations = iteration, "Max tool iterations reached");
        Ok(LoopOutcome {
            reply: ITERATION_LIMIT_REPLY.to_string(),
            tool_runs,
            iterations: iteration,
            hit_limit: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedProvider, text_response, tool_call, tool_call_response};
    use concierge_core::Role;

    fn tool_loop(provider: Arc<ScriptedProvider>) -> ToolLoop {
        ToolLoop::new(
            provider,
            "mock-model",
            Arc::new(concierge_tools::default_registry()),
            Arc::new(EventBus::default()),
        )
    }

    #[tokio::test]
    async fn text_reply_ends_loop() {
        let provider = Arc::new(ScriptedProvider::texts(&["Hi! How can I help?"]));
        let mut messages = vec![Message::user("hello")];

        let outcome = tool_loop(provider.clone()).run(&mut messages).await.unwrap();
        assert_eq!(outcome.reply, "Hi! How can I help?");
        assert_eq!(outcome.iterations, 1);
        assert!(outcome.tool_runs.is_empty());
        assert_eq!(messages.len(), 2);
        assert_eq!(provider.request(0).tools.len(), 19);
    }

    #[tokio::test]
    async fn tool_results_are_fed_back() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(tool_call_response(vec![tool_call(
                "call_1",
                "get_profile_info",
                serde_json::json!({"query": "passport number"}),
            )])),
            Ok(text_response("Your passport number is P11223344.")),
        ]));
        let mut messages = vec![Message::user("What's my passport number?")];

        let outcome = tool_loop(provider.clone()).run(&mut messages).await.unwrap();
        assert_eq!(outcome.reply, "Your passport number is P11223344.");
        assert_eq!(outcome.tool_runs.len(), 1);
        assert!(outcome.tool_runs[0].success);
        assert_eq!(outcome.tool_runs[0].output["info"], "P11223344");

        let second = provider.request(1);
        let tool_msg = second.messages.iter().find(|m| m.role == Role::Tool).unwrap();
        assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_1"));
        assert!(tool_msg.content.contains("P11223344"));
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_to_model() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(tool_call_response(vec![tool_call("call_x", "teleport", serde_json::json!({}))])),
            Ok(text_response("Sorry, I can't do that.")),
        ]));
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let runner = ToolLoop::new(
            provider,
            "mock-model",
            Arc::new(concierge_tools::default_registry()),
            bus,
        );

        let mut messages = vec![Message::user("teleport me")];
        let outcome = runner.run(&mut messages).await.unwrap();
        assert!(!outcome.tool_runs[0].success);
        assert_eq!(outcome.tool_runs[0].output["error"], "Unknown tool: teleport");

        match rx.recv().await.unwrap().as_ref() {
            DomainEvent::ToolExecuted { tool_name, success, .. } => {
                assert_eq!(tool_name, "teleport");
                assert!(!success);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn stops_at_iteration_limit() {
        let call = || {
            Ok(tool_call_response(vec![tool_call(
                "call_t",
                "get_current_datetime",
                serde_json::json!({}),
            )]))
        };
        let provider = Arc::new(ScriptedProvider::new(vec![call(), call()]));
        let mut messages = vec![Message::user("loop forever")];

        let outcome = tool_loop(provider.clone())
            .with_max_iterations(2)
            .run(&mut messages)
            .await
            .unwrap();
        assert!(outcome.hit_limit);
        assert_eq!(outcome.reply, ITERATION_LIMIT_REPLY);
        assert_eq!(provider.call_count(), 2);
    }
}
