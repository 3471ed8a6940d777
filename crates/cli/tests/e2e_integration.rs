//! End-to-end tests for the concierge.
//!
//! These drive the full pipeline from a user query to the final reply:
//! routing, sub-agent dispatch, LLM enhancement, tool calling and session
//! bookkeeping, with a scripted provider standing in for the model.

use std::sync::{Arc, Mutex};

use concierge_agent::concierge::render_text;
use concierge_agent::evaluation;
use concierge_agent::{Concierge, Route};
use concierge_config::AppConfig;
use concierge_core::error::{Error, ProviderError};
use concierge_core::event::DomainEvent;
use concierge_core::message::{Message, MessageToolCall, Role};
use concierge_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use serde_json::{Value, json};

// ── Mock Provider ────────────────────────────────────────────────────────

/// Returns scripted responses in sequence and records every request.
struct ScriptedProvider {
    responses: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<Result<ProviderResponse, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn texts(texts: &[&str]) -> Arc<Self> {
        Self::new(texts.iter().map(|t| Ok(text_response(t))).collect())
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn prompt(&self, index: usize) -> String {
        let requests = self.requests.lock().unwrap();
        requests[index]
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            panic!("ScriptedProvider exhausted at call #{}", requests.len());
        }
        requests.push(request);
        responses.remove(0)
    }
}

fn text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock".into(),
    }
}

fn tool_response(calls: Vec<MessageToolCall>) -> ProviderResponse {
    let mut message = Message::assistant("");
    message.tool_calls = calls;
    ProviderResponse {
        message,
        usage: None,
        model: "mock".into(),
    }
}

fn make_tool_call(name: &str, args: Value) -> MessageToolCall {
    MessageToolCall {
        id: format!("call_{name}"),
        name: name.to_string(),
        arguments: args.to_string(),
    }
}

fn demo() -> Concierge {
    Concierge::with_provider(AppConfig::default(), None)
}

// ── Demo mode ────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_demo_profile_lookup() {
    let mut concierge = demo();
    let outcome = concierge
        .process_query("What's my driver's license number?", None)
        .await;

    assert_eq!(outcome.routing.routed_to, Route::ProfileAgent);
    assert!(outcome.response.response.contains("D99887766"));
    assert!(!outcome.response.llm_enhanced);

    let session = concierge.sessions_mut().get_session(&outcome.session_id).unwrap();
    assert_eq!(session.history.len(), 2);
    assert_eq!(session.history[0].role, Role::User);
    assert_eq!(session.history[1].role, Role::Assistant);
    assert_eq!(session.metadata.agents_invoked, vec!["profile_agent"]);
}

#[tokio::test]
async fn e2e_demo_renewals_list_urgent_items() {
    let mut concierge = demo();
    let outcome = concierge.process_query("What renewals do I have coming up?", None).await;

    assert_eq!(outcome.routing.routed_to, Route::AdminAgent);
    assert_eq!(outcome.response.details["action"], "renewal_status");
    assert_eq!(outcome.response.response, render_text(&outcome.response.details));
    assert!(outcome.response.response.starts_with("Found "));
    let record = outcome.response.details.to_string().to_lowercase();
    assert!(record.contains("insurance"));
}

#[tokio::test]
async fn e2e_session_carries_across_turns() {
    let mut concierge = demo();
    let first = concierge.process_query("I'm tired today", None).await;
    let second = concierge
        .process_query("Draft an email about my insurance renewal", Some(&first.session_id))
        .await;

    assert_eq!(first.session_id, second.session_id);
    let session = concierge.sessions_mut().get_session(&first.session_id).unwrap();
    assert_eq!(session.metadata.message_count, 4);
    assert_eq!(
        session.metadata.agents_invoked,
        vec!["productivity_agent", "admin_agent"]
    );
    assert_eq!(concierge.system_status().requests_processed, 2);
}

#[tokio::test]
async fn e2e_unmatched_query_gets_general_help() {
    let mut concierge = demo();
    let outcome = concierge.process_query("hello there", None).await;

    assert_eq!(outcome.routing.routed_to, Route::GeneralAgent);
    assert_eq!(outcome.routing.confidence, 0.5);
    assert_eq!(outcome.response.details["agent"], "general");
    assert!(outcome.response.response.contains("Eisenhower Matrix"));
}

// ── LLM enhancement ──────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_enhancement_rewrites_the_record() {
    let provider = ScriptedProvider::texts(&["Your passport number is P11223344."]);
    let mut concierge = Concierge::with_provider(AppConfig::default(), Some(provider.clone()));

    let outcome = concierge.process_query("What's my passport number?", None).await;

    assert!(outcome.response.llm_enhanced);
    assert_eq!(outcome.response.response, "Your passport number is P11223344.");
    assert_eq!(provider.calls(), 1);

    let prompt = provider.prompt(0);
    assert!(prompt.contains("User Query: What's my passport number?"));
    assert!(prompt.contains("=== AGENT RESULT ==="));
    assert!(prompt.contains("P11223344"));
}

#[tokio::test]
async fn e2e_prioritization_with_stored_tasks() {
    let plan = json!({
        "analysis": "Insurance lapses soon; the dentist can wait.",
        "quick_wins": ["Renew car insurance"],
        "defer_to_tomorrow": ["Book dentist"]
    });
    let provider = ScriptedProvider::texts(&[
        &format!("Here is your plan:\n{plan}\nGood luck!"),
        "Start with your car insurance renewal.",
    ]);
    let mut concierge = Concierge::with_provider(AppConfig::default(), Some(provider.clone()));

    let session_id = {
        let session = concierge.sessions_mut().create_session(None);
        session.set_state("task_list", json!("renew car insurance, book dentist"));
        session.set_state("energy_level", json!("HIGH"));
        session.id.clone()
    };

    let outcome = concierge
        .process_query("Help me prioritize my tasks", Some(&session_id))
        .await;

    assert_eq!(outcome.routing.routed_to, Route::ProductivityAgent);
    assert_eq!(outcome.response.details["action"], "prioritize");
    assert_eq!(outcome.response.details["energy_level"], "HIGH");
    assert_eq!(provider.calls(), 2);
    assert!(provider.prompt(0).contains("renew car insurance, book dentist"));

    let prioritization = outcome.response.prioritization.as_ref().unwrap();
    assert_eq!(prioritization["quick_wins"][0], "Renew car insurance");
    assert_eq!(prioritization["defer_to_tomorrow"][0], "Book dentist");
    assert!(provider.prompt(1).contains("Renew car insurance"));
    assert_eq!(outcome.response.response, "Start with your car insurance renewal.");
}

#[tokio::test]
async fn e2e_enhancement_failure_falls_back_to_record() {
    let provider = ScriptedProvider::new(vec![Err(ProviderError::Network("connection reset".into()))]);
    let mut concierge = Concierge::with_provider(AppConfig::default(), Some(provider));
    let mut events = concierge.events().subscribe();

    let outcome = concierge.process_query("What's my phone number?", None).await;

    assert!(!outcome.response.llm_enhanced);
    let parsed: Value = serde_json::from_str(&outcome.response.response).unwrap();
    assert_eq!(parsed["found"], true);

    let mut saw_error = false;
    while let Ok(event) = events.try_recv() {
        if let DomainEvent::ErrorOccurred { context, .. } = event.as_ref() {
            assert_eq!(context, "llm_enhancement");
            saw_error = true;
        }
    }
    assert!(saw_error);
}

#[tokio::test]
async fn e2e_enhancement_can_be_disabled() {
    let config: AppConfig = toml::from_str("[agent]\nllm_enhancement = false\n").unwrap();
    let provider = ScriptedProvider::texts(&[]);
    let mut concierge = Concierge::with_provider(config, Some(provider.clone()));

    let outcome = concierge.process_query("What's my license number?", None).await;

    assert_eq!(provider.calls(), 0);
    assert!(!outcome.response.llm_enhanced);
    assert!(outcome.response.response.contains("D99887766"));
}

// ── Tool calling ─────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_converse_creates_calendar_event() {
    let provider = ScriptedProvider::new(vec![
        Ok(tool_response(vec![make_tool_call(
            "create_calendar_event",
            json!({"title": "DMV appointment", "start_time": "2025-12-10T14:00:00"}),
        )])),
        Ok(text_response("Done! Your DMV appointment is on the calendar.")),
    ]);
    let mut concierge = Concierge::with_provider(AppConfig::default(), Some(provider.clone()));
    let mut events = concierge.events().subscribe();

    let turn = concierge
        .converse("Put my DMV appointment on Dec 10 at 2pm on the calendar", None)
        .await
        .unwrap();

    assert_eq!(turn.reply, "Done! Your DMV appointment is on the calendar.");
    assert_eq!(turn.tools_used, vec!["create_calendar_event"]);
    assert_eq!(turn.iterations, 2);
    assert_eq!(provider.calls(), 2);
    assert!(provider.prompt(0).contains("Current date and time"));
    assert!(provider.prompt(1).contains("mock_event_"));

    let session = concierge.sessions_mut().get_session(&turn.session_id).unwrap();
    assert!(session.history.iter().any(|m| m.role == Role::Tool));
    assert_eq!(session.metadata.tools_used, vec!["create_calendar_event"]);
    assert_eq!(session.metadata.agents_invoked, vec!["concierge"]);

    let mut tool_events = 0;
    while let Ok(event) = events.try_recv() {
        if let DomainEvent::ToolExecuted { tool_name, success, .. } = event.as_ref() {
            assert_eq!(tool_name, "create_calendar_event");
            assert!(success);
            tool_events += 1;
        }
    }
    assert_eq!(tool_events, 1);
}

#[tokio::test]
async fn e2e_converse_needs_a_provider() {
    let mut concierge = demo();
    let err = concierge.converse("hello", None).await.unwrap_err();
    assert!(matches!(err, Error::Provider(ProviderError::NotConfigured(_))));
}

#[tokio::test]
async fn e2e_direct_tool_execution() {
    let concierge = demo();

    let status = concierge.execute_tool("get_renewal_status", json!({})).await.unwrap();
    assert!(status.success);
    assert!(status.data.unwrap()["action_required"].as_u64().unwrap() > 0);

    let draft = concierge
        .execute_tool(
            "create_gmail_draft",
            json!({"to": "nope", "subject": "Hi", "body": "Hello"}),
        )
        .await
        .unwrap();
    assert!(!draft.success);

    assert!(concierge.execute_tool("teleport", json!({})).await.is_err());
}

// ── Evaluation ───────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_evaluation_passes_in_demo_mode() {
    let mut concierge = demo();
    let report = evaluation::run_all(&mut concierge).await;

    assert!(report.all_passed(), "{report:#?}");
    assert_eq!(report.summary.passed_suites, report.summary.total_suites);
}
