//! The concierge coordinator.
//!
//! Owns the router, sub-agents, sessions, tools and the optional LLM
//! provider. A query is routed to a sub-agent, which produces a structured
//! record; when a provider is configured the record is rewritten into prose.

use crate::a2a::{self, AgentMessage};
use crate::admin::AdminAgent;
use crate::eisenhower;
use crate::productivity::{AgentContext, EndOfDaySummary, ProductivityAgent};
use crate::router::{Route, Router, RoutingDecision};
use crate::tool_loop::ToolLoop;
use chrono::{DateTime, Local, Utc};
use concierge_config::AppConfig;
use concierge_core::error::{ProviderError, ToolError};
use concierge_core::event::{DomainEvent, EventBus};
use concierge_core::message::Message;
use concierge_core::provider::{Provider, ProviderRequest};
use concierge_core::tool::{ToolCall, ToolRegistry, ToolResult};
use concierge_session::{SessionManager, SessionStats, SessionSummary};
use concierge_tools::profile;
use concierge_tools::profile_data::{RENEWAL_REMINDERS, USER_PROFILE};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

/// Context injected ahead of every model call.
pub fn system_context() -> String {
    format!(
        r#"
You are a Life Admin Concierge Agent - a helpful assistant for managing personal life administration.

=== USER PROFILE (Context Injection) ===
{USER_PROFILE}

=== RENEWAL CALENDAR ===
{RENEWAL_REMINDERS}

=== YOUR CAPABILITIES ===
1. **Profile Lookup**: Answer questions about user's personal information (license #, insurance, etc.)
2. **Calendar Events**: Create reminders and calendar events for deadlines
3. **Email Drafts**: Draft emails for renewals, appointments, and communications
4. **Task Prioritization**: Use Eisenhower Matrix to prioritize tasks based on urgency/importance
5. **Energy-Based Scheduling**: Recommend tasks appropriate for user's current energy level

=== GUIDELINES ===
- Be proactive about upcoming deadlines (check RENEWAL CALENDAR)
- When user asks about personal info, retrieve from USER PROFILE
- For task prioritization, consider both urgency and user's energy level
- Always confirm before taking actions (creating events, drafting emails)
- Be concise but thorough in your responses
"#
    )
}

const TOOL_GUIDELINES: &str = "\
=== TOOL USE ===
- Call get_current_datetime before working with relative dates like \"tomorrow\" or \"next week\"
- Create drafts rather than sending email unless the user explicitly asks to send
- Report tool errors to the user plainly and suggest a fix";

#[derive(Debug, Clone, Serialize)]
struct GeneralReply {
    agent: &'static str,
    message: &'static str,
    capabilities: &'static [&'static str],
    quick_actions: &'static [&'static str],
}

const GENERAL_REPLY: GeneralReply = GeneralReply {
    agent: "general",
    message: "I'm your Life Admin Concierge. I can help you with:",
    capabilities: &[
        "📋 Looking up your personal information (license, insurance, etc.)",
        "📅 Creating calendar events and reminders",
        "📧 Drafting emails for renewals and communications",
        "✅ Prioritizing tasks using the Eisenhower Matrix",
        "⚡ Suggesting tasks based on your energy level",
    ],
    quick_actions: &[
        "What renewals do I have coming up?",
        "What's my driver's license number?",
        "I'm tired, what should I work on?",
        "Help me prioritize my tasks",
    ],
};

/// A sub-agent's record plus the text shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    #[serde(flatten)]
    pub details: Value,
    pub response: String,
    pub llm_enhanced: bool,
    /// Parsed Eisenhower plan (or parse failure) when the model prioritized tasks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prioritization: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub query: String,
    pub response: AgentResponse,
    pub routing: RoutingDecision,
    pub session_id: String,
    pub timestamp: String,
}

/// One turn of tool-calling conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationTurn {
    pub session_id: String,
    pub reply: String,
    pub tools_used: Vec<String>,
    pub iterations: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub status: &'static str,
    pub llm_connected: bool,
    pub model: String,
    pub sessions: SessionStats,
    pub agents: BTreeMap<&'static str, &'static str>,
    pub tools: usize,
    pub observability: bool,
    pub requests_processed: u64,
}

const LIST_FIELDS: &[&str] = &[
    "required_info",
    "capabilities",
    "recommendations",
    "avoid",
    "suggested_actions",
    "quick_actions",
    "quick_tips",
];

/// Plain-text rendering of a sub-agent record, used when no model rewrites it.
pub fn render_text(details: &Value) -> String {
    if let Some(found) = details.get("found").and_then(Value::as_bool) {
        return match (found, details.get("info").and_then(Value::as_str)) {
            (true, Some(info)) => match details.get("type").and_then(Value::as_str) {
                Some(kind) => format!("{kind}: {info}"),
                None => info.to_string(),
            },
            _ => "I couldn't find that in your profile.".to_string(),
        };
    }

    let Some(message) = details.get("message").and_then(Value::as_str) else {
        return serde_json::to_string_pretty(details).unwrap_or_default();
    };

    let mut lines = vec![message.to_string()];
    if let Some(items) = details
        .get("status")
        .and_then(|s| s.get("urgent_items"))
        .and_then(Value::as_array)
    {
        for item in items {
            lines.push(format!(
                "  - {} ({}): {}",
                item["item"].as_str().unwrap_or_default(),
                item["priority"].as_str().unwrap_or_default(),
                item["action"].as_str().unwrap_or_default(),
            ));
        }
    }
    if let Some(blocks) = details.get("suggested_blocks").and_then(Value::as_array) {
        for b in blocks {
            lines.push(format!(
                "  {:>8}  {} ({})",
                b["time"].as_str().unwrap_or_default(),
                b["activity"].as_str().unwrap_or_default(),
                b["duration"].as_str().unwrap_or_default(),
            ));
        }
    }
    for field in LIST_FIELDS {
        if let Some(items) = details.get(*field).and_then(Value::as_array) {
            lines.extend(items.iter().filter_map(Value::as_str).map(|s| format!("  - {s}")));
        }
    }
    for field in ["prompt", "note", "example", "time_suggestion"] {
        if let Some(text) = details.get(field).and_then(Value::as_str) {
            lines.push(text.to_string());
        }
    }
    lines.join("\n")
}

pub struct Concierge {
    config: AppConfig,
    router: Router,
    admin: AdminAgent,
    productivity: ProductivityAgent,
    sessions: SessionManager,
    tools: Arc<ToolRegistry>,
    events: Arc<EventBus>,
    provider: Option<Arc<dyn Provider>>,
    requests_processed: u64,
}

impl Concierge {
    /// Build a concierge from config. Without an API key it runs in demo mode.
    pub fn new(config: AppConfig) -> Self {
        let provider = concierge_providers::build_from_config(&config);
        Self::with_provider(config, provider)
    }

    pub fn with_provider(config: AppConfig, provider: Option<Arc<dyn Provider>>) -> Self {
        let timezone = config.google.timezone.clone();
        let concierge = Self {
            router: Router::new(),
            admin: AdminAgent::new(timezone.clone()),
            productivity: ProductivityAgent::new(),
            sessions: SessionManager::new(config.session.timeout_minutes),
            tools: Arc::new(concierge_tools::registry_for_timezone(&timezone)),
            events: Arc::new(EventBus::default()),
            provider,
            requests_processed: 0,
            config,
        };
        match &concierge.provider {
            Some(p) => info!(provider = p.name(), model = %concierge.config.model, "Concierge initialized"),
            None => info!("Concierge initialized in demo mode (no API key)"),
        }
        concierge
    }

    pub fn is_demo_mode(&self) -> bool {
        self.provider.is_none()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn admin(&self) -> &AdminAgent {
        &self.admin
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn sessions_mut(&mut self) -> &mut SessionManager {
        &mut self.sessions
    }

    /// Route a query to a sub-agent and return its (possibly LLM-enhanced)
    /// response.
    pub async fn process_query(&mut self, query: &str, session_id: Option<&str>) -> QueryOutcome {
        let now = Local::now();
        self.requests_processed += 1;

        let session = self.sessions.get_or_create_session(session_id);
        session.add_user_message(query);
        let session_id = session.id.clone();
        let context = AgentContext::from_session(query, session);

        info!(session = %short(&session_id), query = %preview(query), "Processing query");

        let routing = self.router.route(query);
        let route = routing.routed_to;
        self.events.publish(DomainEvent::QueryRouted {
            session_id: session_id.clone(),
            route: route.as_str().to_string(),
            confidence: routing.confidence,
            timestamp: Utc::now(),
        });
        a2a::send(&self.events, &AgentMessage::new("router", route.as_str(), query));

        let (details, prioritization_prompt) = self.dispatch(route, query, &context, now);

        let mut response = AgentResponse {
            response: render_text(&details),
            details,
            llm_enhanced: false,
            prioritization: None,
        };

        if let (Some(provider), Some(prompt)) = (self.provider.clone(), prioritization_prompt) {
            response.prioritization = self.prioritize(provider.as_ref(), prompt).await;
        }
        let enhancer = self.provider.clone().filter(|_| self.config.agent.llm_enhancement);
        if let Some(provider) = enhancer {
            self.enhance(provider.as_ref(), query, &mut response).await;
        }

        let session = self.sessions.get_or_create_session(Some(&session_id));
        session.add_assistant_message(response.response.clone(), None);
        session.record_agent(route.as_str());

        self.events.publish(DomainEvent::ResponseGenerated {
            session_id: session_id.clone(),
            agent: route.as_str().to_string(),
            llm_enhanced: response.llm_enhanced,
            timestamp: Utc::now(),
        });
        info!(agent = %route, llm_enhanced = response.llm_enhanced, "Response generated");

        QueryOutcome {
            query: query.to_string(),
            response,
            routing,
            session_id,
            timestamp: now.naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        }
    }

    fn dispatch(
        &self,
        route: Route,
        query: &str,
        context: &AgentContext,
        now: DateTime<Local>,
    ) -> (Value, Option<String>) {
        let (record, prompt) = match route {
            Route::AdminAgent => (serde_json::to_value(self.admin.process(query, now)), None),
            Route::ProductivityAgent => {
                let reply = self.productivity.process(query, context, now);
                let prompt = reply.prioritization_prompt().map(str::to_string);
                (serde_json::to_value(reply), prompt)
            }
            Route::ProfileAgent => (serde_json::to_value(profile::get_profile_info(query)), None),
            Route::GeneralAgent => (serde_json::to_value(GENERAL_REPLY), None),
        };
        (record.unwrap_or_default(), prompt)
    }

    fn request(&self, prompt: String) -> ProviderRequest {
        ProviderRequest {
            temperature: self.config.temperature,
            max_tokens: Some(self.config.max_tokens),
            ..ProviderRequest::prompt(&self.config.model, prompt)
        }
    }

    async fn prioritize(&self, provider: &dyn Provider, prompt: String) -> Option<Value> {
        match provider.complete(self.request(prompt)).await {
            Ok(reply) => {
                let parsed = match eisenhower::parse_priority_response(&reply.message.content) {
                    Ok(plan) => serde_json::to_value(plan),
                    Err(failure) => {
                        warn!("Prioritization reply was not valid JSON");
                        serde_json::to_value(failure)
                    }
                };
                parsed.ok()
            }
            Err(e) => {
                self.report_error("prioritization", &e);
                None
            }
        }
    }

    async fn enhance(&self, provider: &dyn Provider, query: &str, response: &mut AgentResponse) {
        let mut result = response.details.clone();
        if let (Some(obj), Some(plan)) = (result.as_object_mut(), &response.prioritization) {
            obj.insert("prioritization".into(), plan.clone());
        }
        let result_text = serde_json::to_string_pretty(&result).unwrap_or_default();

        let prompt = format!(
            "{}\n=== CURRENT CONVERSATION ===\nUser Query: {query}\n\n\
             === AGENT RESULT ===\n{result_text}\n\n\
             === INSTRUCTIONS ===\n\
             Based on the user's query and the agent result above, provide a helpful, \
             natural language response. If there are action items or recommendations, \
             list them clearly. Be concise but thorough.\n",
            system_context()
        );

        match provider.complete(self.request(prompt)).await {
            Ok(reply) => {
                response.response = reply.message.content;
                response.llm_enhanced = true;
            }
            Err(e) => {
                self.report_error("llm_enhancement", &e);
                response.response = result_text;
                response.llm_enhanced = false;
            }
        }
    }

    fn report_error(&self, context: &str, error: &ProviderError) {
        warn!(context, error = %error, "LLM call failed");
        self.events.publish(DomainEvent::ErrorOccurred {
            context: context.to_string(),
            error_message: error.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// Run one tool directly by name.
    pub async fn execute_tool(&self, name: &str, arguments: Value) -> Result<ToolResult, ToolError> {
        info!(tool = name, "Executing tool");
        let start = Instant::now();
        let result = self
            .tools
            .execute(&ToolCall {
                id: format!("direct_{name}"),
                name: name.to_string(),
                arguments,
            })
            .await;

        self.events.publish(DomainEvent::ToolExecuted {
            tool_name: name.to_string(),
            success: result.as_ref().is_ok_and(|r| r.success),
            duration_ms: start.elapsed().as_millis() as u64,
            timestamp: Utc::now(),
        });
        result
    }

    /// Free-form conversation where the model calls tools itself.
    pub async fn converse(
        &mut self,
        query: &str,
        session_id: Option<&str>,
    ) -> Result<ConversationTurn, concierge_core::Error> {
        let provider = self.provider.clone().ok_or_else(|| {
            ProviderError::NotConfigured("no API key; set GEMINI_API_KEY to enable tool calling".into())
        })?;
        self.requests_processed += 1;

        let now = Local::now();
        let session = self.sessions.get_or_create_session(session_id);
        session.add_user_message(query);
        let session_id = session.id.clone();

        let mut messages = vec![Message::system(format!(
            "{}\n{TOOL_GUIDELINES}\n\nCurrent date and time: {}",
            system_context(),
            now.format("%A, %Y-%m-%d %H:%M")
        ))];
        messages.extend(
            session
                .context_window(self.config.session.context_window_tokens)
                .into_iter()
                .map(|m| m.to_message()),
        );
        if messages.len() == 1 {
            messages.push(Message::user(query));
        }
        debug!(session = %short(&session_id), messages = messages.len(), "Starting tool conversation");

        let runner = ToolLoop::new(provider, &self.config.model, self.tools.clone(), self.events.clone())
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens)
            .with_max_iterations(self.config.agent.max_tool_iterations);
        let outcome = runner.run(&mut messages).await?;

        let session = self.sessions.get_or_create_session(Some(&session_id));
        for run in &outcome.tool_runs {
            session.add_tool_result(&run.name, &run.output);
        }
        let calls: Vec<Value> = outcome
            .tool_runs
            .iter()
            .map(|r| serde_json::json!({ "name": r.name, "arguments": r.arguments }))
            .collect();
        session.add_assistant_message(outcome.reply.clone(), (!calls.is_empty()).then(|| Value::Array(calls)));
        session.record_agent("concierge");

        self.events.publish(DomainEvent::ResponseGenerated {
            session_id: session_id.clone(),
            agent: "concierge".into(),
            llm_enhanced: true,
            timestamp: Utc::now(),
        });

        Ok(ConversationTurn {
            session_id,
            reply: outcome.reply,
            tools_used: outcome.tool_runs.into_iter().map(|r| r.name).collect(),
            iterations: outcome.iterations,
        })
    }

    pub fn end_of_day_summary(&self, completed: &[String], pending: &[String]) -> EndOfDaySummary {
        self.productivity
            .end_of_day_summary(completed, pending, Local::now().date_naive())
    }

    pub fn session_summary(&mut self, session_id: &str) -> Result<SessionSummary, concierge_core::Error> {
        Ok(self.sessions.require_session(session_id)?.summary())
    }

    /// Forget a session's history, keeping its id and state.
    pub fn clear_session(&mut self, session_id: &str) -> Result<(), concierge_core::Error> {
        self.sessions.require_session(session_id)?.clear_history();
        Ok(())
    }

    pub fn system_status(&self) -> SystemStatus {
        SystemStatus {
            status: "operational",
            llm_connected: self.provider.is_some(),
            model: self.config.model.clone(),
            sessions: self.sessions.stats(),
            agents: BTreeMap::from([
                ("router", "active"),
                ("admin_agent", "active"),
                ("productivity_agent", "active"),
            ]),
            tools: self.tools.len(),
            observability: self.config.logging.observability,
            requests_processed: self.requests_processed,
        }
    }
}

/// Log every domain event at debug level until the bus is dropped.
pub fn spawn_event_logger(events: &EventBus) -> tokio::task::JoinHandle<()> {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => debug!(event = ?event, "Domain event"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event logger lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn short(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::productivity::TASKS_STATE_KEY;
    use crate::test_helpers::{ScriptedProvider, text_response, tool_call, tool_call_response};

    fn demo() -> Concierge {
        Concierge::with_provider(AppConfig::default(), None)
    }

    fn with_llm(provider: Arc<ScriptedProvider>) -> Concierge {
        Concierge::with_provider(AppConfig::default(), Some(provider))
    }

    #[tokio::test]
    async fn profile_query_in_demo_mode() {
        let mut concierge = demo();
        let outcome = concierge
            .process_query("What's my driver's license number?", None)
            .await;

        assert_eq!(outcome.routing.routed_to, Route::ProfileAgent);
        assert_eq!(outcome.response.details["info"], "D99887766");
        assert!(outcome.response.response.contains("D99887766"));
        assert!(!outcome.response.llm_enhanced);

        let session = concierge.sessions_mut().get_session(&outcome.session_id).unwrap();
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.metadata.agents_invoked, vec!["profile_agent"]);
    }

    #[tokio::test]
    async fn session_is_reused() {
        let mut concierge = demo();
        let first = concierge.process_query("hello", None).await;
        let second = concierge.process_query("Help me prioritize my tasks", Some(&first.session_id)).await;
        assert_eq!(first.session_id, second.session_id);
        assert_eq!(concierge.sessions().stats().total_sessions, 1);
        assert_eq!(concierge.system_status().requests_processed, 2);
    }

    #[tokio::test]
    async fn general_reply_lists_quick_actions() {
        let outcome = demo().process_query("hello there", None).await;
        assert_eq!(outcome.response.details["agent"], "general");
        assert_eq!(outcome.response.details["quick_actions"].as_array().unwrap().len(), 4);
        assert!(outcome.response.response.contains("Eisenhower Matrix"));
    }

    #[tokio::test]
    async fn routing_publishes_events() {
        let mut concierge = demo();
        let mut rx = concierge.events().subscribe();
        concierge.process_query("What renewals do I have coming up?", None).await;

        let first = rx.recv().await.unwrap();
        assert!(matches!(first.as_ref(), DomainEvent::QueryRouted { route, .. } if route == "admin_agent"));
        let second = rx.recv().await.unwrap();
        assert!(matches!(second.as_ref(), DomainEvent::AgentMessageSent { sender, .. } if sender == "router"));
    }

    #[tokio::test]
    async fn llm_rewrites_response() {
        let provider = Arc::new(ScriptedProvider::texts(&["You have two urgent renewals."]));
        let mut concierge = with_llm(provider.clone());
        let outcome = concierge.process_query("What renewals do I have coming up?", None).await;

        assert!(outcome.response.llm_enhanced);
        assert_eq!(outcome.response.response, "You have two urgent renewals.");
        assert_eq!(outcome.response.details["action"], "renewal_status");

        let prompt = &provider.request(0).messages[0].content;
        assert!(prompt.contains("=== AGENT RESULT ==="));
        assert!(prompt.contains("User Query: What renewals do I have coming up?"));
        assert!(prompt.contains("D99887766"));
    }

    #[tokio::test]
    async fn llm_failure_falls_back_to_record() {
        let provider = Arc::new(ScriptedProvider::failing(ProviderError::Network("offline".into())));
        let mut concierge = with_llm(provider);
        let mut rx = concierge.events().subscribe();
        let outcome = concierge.process_query("What's my passport number?", None).await;

        assert!(!outcome.response.llm_enhanced);
        assert!(outcome.response.response.contains("\"info\": \"P11223344\""));

        let mut saw_error = false;
        while let Ok(event) = rx.try_recv() {
            saw_error |= matches!(event.as_ref(), DomainEvent::ErrorOccurred { .. });
        }
        assert!(saw_error);
    }

    #[tokio::test]
    async fn prioritization_plan_is_attached() {
        let plan = r#"{"analysis": "One urgent task", "quadrants": {"Q1_do_first": ["Renew insurance"]}}"#;
        let provider = Arc::new(ScriptedProvider::texts(&[plan, "Renew your insurance first."]));
        let mut concierge = with_llm(provider.clone());

        let outcome = concierge
            .process_query("Prioritize these: renew insurance, browse social media", None)
            .await;

        let prioritization = outcome.response.prioritization.unwrap();
        assert_eq!(prioritization["quadrants"]["Q1_do_first"][0], "Renew insurance");
        assert!(provider.request(0).messages[0].content.contains("renew insurance, browse social media"));
        assert_eq!(outcome.response.response, "Renew your insurance first.");
    }

    #[tokio::test]
    async fn stored_task_list_feeds_prioritization() {
        let mut concierge = demo();
        let session_id = concierge.sessions_mut().create_session(None).id.clone();
        concierge
            .sessions_mut()
            .get_session(&session_id)
            .unwrap()
            .set_state(TASKS_STATE_KEY, Value::from("file taxes"));

        let outcome = concierge.process_query("help me prioritize", Some(&session_id)).await;
        assert_eq!(outcome.response.details["action"], "prioritize");
        assert!(outcome.response.prioritization.is_none());
    }

    #[tokio::test]
    async fn enhancement_can_be_disabled() {
        let provider = Arc::new(ScriptedProvider::texts(&[]));
        let mut config = AppConfig::default();
        config.agent.llm_enhancement = false;
        let mut concierge = Concierge::with_provider(config, Some(provider.clone()));

        let outcome = concierge.process_query("hello", None).await;
        assert!(!outcome.response.llm_enhanced);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn execute_tool_by_name() {
        let concierge = demo();
        let result = concierge
            .execute_tool(
                "create_gmail_draft",
                serde_json::json!({"to": "not-an-email", "subject": "s", "body": "b"}),
            )
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.data.unwrap()["error"], "Invalid email address: not-an-email");

        let err = concierge.execute_tool("teleport", Value::Null).await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: teleport");
    }

    #[tokio::test]
    async fn converse_requires_llm() {
        let err = demo().converse("hi", None).await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }

    #[tokio::test]
    async fn converse_runs_tools_and_records_them() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(tool_call_response(vec![tool_call(
                "call_1",
                "get_renewal_status",
                serde_json::json!({}),
            )])),
            Ok(text_response("Car insurance is overdue; renew it today.")),
        ]));
        let mut concierge = with_llm(provider.clone());

        let turn = concierge.converse("Anything urgent?", None).await.unwrap();
        assert_eq!(turn.tools_used, vec!["get_renewal_status"]);
        assert_eq!(turn.iterations, 2);

        let first = provider.request(0);
        assert!(first.messages[0].content.contains("=== TOOL USE ==="));
        assert_eq!(first.messages.last().unwrap().content, "Anything urgent?");

        let session = concierge.sessions_mut().get_session(&turn.session_id).unwrap();
        assert_eq!(session.metadata.tools_used, vec!["get_renewal_status"]);
        assert_eq!(session.history.len(), 3);
    }

    #[test]
    fn status_reports_demo_mode() {
        let status = demo().system_status();
        assert_eq!(status.status, "operational");
        assert!(!status.llm_connected);
        assert_eq!(status.model, "gemini-2.0-flash");
        assert_eq!(status.tools, 19);
        assert_eq!(status.agents.len(), 3);
    }

    #[tokio::test]
    async fn session_summary_and_clear() {
        let mut concierge = demo();
        let outcome = concierge.process_query("What's my passport number?", None).await;

        let summary = concierge.session_summary(&outcome.session_id).unwrap();
        assert_eq!(summary.history_length, 2);
        assert_eq!(summary.agents_invoked, vec!["profile_agent"]);

        concierge.clear_session(&outcome.session_id).unwrap();
        assert_eq!(concierge.session_summary(&outcome.session_id).unwrap().history_length, 0);

        let err = concierge.session_summary("missing").unwrap_err();
        assert_eq!(err.to_string(), "Session error: Session not found: missing");
    }

    #[test]
    fn render_lists_items() {
        let text = render_text(&serde_json::json!({
            "message": "Low energy tips",
            "recommendations": ["walk", "email"],
            "avoid": ["big decisions"]
        }));
        assert_eq!(text, "Low energy tips\n  - walk\n  - email\n  - big decisions");

        let missing = render_text(&serde_json::json!({"found": false, "query": "ssn"}));
        assert_eq!(missing, "I couldn't find that in your profile.");
    }
}
