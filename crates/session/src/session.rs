//! A single conversation session: history, key/value state and usage metadata.

use chrono::{DateTime, Duration, Utc};
use concierge_core::message::{Message, Role};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

/// One entry in a session's history. Ids are 1-based positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMessage {
    pub id: usize,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl SessionMessage {
    /// Convert to a provider message. Tool entries have no call id to answer,
    /// so they are replayed as system notes.
    pub fn to_message(&self) -> Message {
        match self.role {
            Role::User => Message::user(&self.content),
            Role::Assistant => Message::assistant(&self.content),
            Role::System => Message::system(&self.content),
            Role::Tool => {
                let tool = self
                    .metadata
                    .get("tool_name")
                    .and_then(Value::as_str)
                    .unwrap_or("tool");
                Message::system(format!("[{tool} result] {}", self.content))
            }
        }
    }
}

/// Usage counters kept alongside the history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub message_count: usize,
    pub tools_used: Vec<String>,
    pub agents_invoked: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub message_count: usize,
    pub tools_used: Vec<String>,
    pub agents_invoked: Vec<String>,
    pub is_expired: bool,
    pub history_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub timeout_minutes: u32,
    pub history: Vec<SessionMessage>,
    pub state: Map<String, Value>,
    pub metadata: SessionMetadata,
}

impl Session {
    /// Create a session. A fresh UUID is generated when no id is given.
    pub fn new(id: Option<String>, timeout_minutes: u32) -> Self {
        let now = Utc::now();
        Self {
            id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            created_at: now,
            last_activity: now,
            timeout_minutes,
            history: Vec::new(),
            state: Map::new(),
            metadata: SessionMetadata::default(),
        }
    }

    /// First eight characters of the id, for log lines.
    pub fn short_id(&self) -> &str {
        short_id(&self.id)
    }

    pub fn add_message(
        &mut self,
        role: Role,
        content: impl Into<String>,
        metadata: Map<String, Value>,
    ) -> &SessionMessage {
        let now = Utc::now();
        let index = self.history.len();
        self.history.push(SessionMessage {
            id: index + 1,
            role,
            content: content.into(),
            timestamp: now,
            metadata,
        });
        self.last_activity = now;
        self.metadata.message_count += 1;

        info!(session = %self.short_id(), role = %role, "Added message");
        &self.history[index]
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) -> &SessionMessage {
        self.add_message(Role::User, content, Map::new())
    }

    pub fn add_assistant_message(
        &mut self,
        content: impl Into<String>,
        tool_calls: Option<Value>,
    ) -> &SessionMessage {
        let mut metadata = Map::new();
        metadata.insert("tool_calls".into(), tool_calls.unwrap_or(Value::Null));
        self.add_message(Role::Assistant, content, metadata)
    }

    /// Record a tool result and remember the tool in `tools_used`.
    pub fn add_tool_result(&mut self, tool_name: &str, result: &Value) -> &SessionMessage {
        if !self.metadata.tools_used.iter().any(|t| t == tool_name) {
            self.metadata.tools_used.push(tool_name.to_string());
        }
        let mut metadata = Map::new();
        metadata.insert("tool_name".into(), Value::String(tool_name.to_string()));
        let content = match result {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        self.add_message(Role::Tool, content, metadata)
    }

    /// Remember that a sub-agent handled a query in this session.
    pub fn record_agent(&mut self, agent: &str) {
        if !self.metadata.agents_invoked.iter().any(|a| a == agent) {
            self.metadata.agents_invoked.push(agent.to_string());
        }
    }

    /// The whole history, or only the last `n` messages.
    pub fn history(&self, last_n: Option<usize>) -> &[SessionMessage] {
        match last_n {
            Some(n) if n > 0 => {
                let start = self.history.len().saturating_sub(n);
                &self.history[start..]
            }
            _ => &self.history,
        }
    }

    /// The most recent messages that fit a token budget (about four
    /// characters per token), oldest first.
    pub fn context_window(&self, max_tokens: usize) -> Vec<&SessionMessage> {
        let char_limit = max_tokens * 4;
        let mut total = 0;
        let mut window = Vec::new();

        for msg in self.history.iter().rev() {
            let len = msg.content.chars().count();
            if total + len > char_limit {
                break;
            }
            total += len;
            window.push(msg);
        }

        window.reverse();
        window
    }

    pub fn set_state(&mut self, key: impl Into<String>, value: Value) {
        self.state.insert(key.into(), value);
        self.last_activity = Utc::now();
    }

    pub fn get_state(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    /// Merge several state values at once.
    pub fn update_state(&mut self, updates: Map<String, Value>) {
        self.state.extend(updates);
        self.last_activity = Utc::now();
    }

    /// Drop the history but keep the session, its state and tool records.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.metadata.message_count = 0;
        info!(session = %self.short_id(), "History cleared");
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.last_activity + Duration::minutes(i64::from(self.timeout_minutes))
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id.clone(),
            created_at: self.created_at,
            last_activity: self.last_activity,
            message_count: self.metadata.message_count,
            tools_used: self.metadata.tools_used.clone(),
            agents_invoked: self.metadata.agents_invoked.clone(),
            is_expired: self.is_expired(),
            history_length: self.history.len(),
        }
    }

    /// History as `(role, content)` pairs.
    pub fn as_role_pairs(&self) -> Vec<(Role, &str)> {
        self.history
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .collect()
    }
}

pub(crate) fn short_id(id: &str) -> &str {
    id.char_indices().nth(8).map_or(id, |(i, _)| &id[..i])
}
