//! Agent-to-agent message passing.
//!
//! Agents all live in one process, so "sending" a message means publishing
//! it on the event bus and returning a delivery receipt.

use chrono::{Local, Utc};
use concierge_core::event::{DomainEvent, EventBus};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Request,
    Response,
    Notification,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Request => "request",
            MessageKind::Response => "response",
            MessageKind::Notification => "notification",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMessage {
    pub sender: String,
    pub receiver: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Local ISO timestamp with microseconds
    pub timestamp: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl AgentMessage {
    /// A request message stamped with the current local time.
    pub fn new(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            content: content.into(),
            kind: MessageKind::Request,
            timestamp: Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            metadata: Map::new(),
        }
    }

    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub delivered: bool,
    pub message_id: String,
    pub sender: String,
    pub receiver: String,
    pub timestamp: String,
}

/// `msg_` followed by the timestamp without `:` and `-`.
pub fn message_id(timestamp: &str) -> String {
    let compact: String = timestamp.chars().filter(|c| !matches!(c, ':' | '-')).collect();
    format!("msg_{compact}")
}

/// Deliver a message: publish it on the bus and return a receipt.
pub fn send(bus: &EventBus, message: &AgentMessage) -> DeliveryReceipt {
    let message_id = message_id(&message.timestamp);
    info!(sender = %message.sender, receiver = %message.receiver, %message_id, "A2A message");

    bus.publish(DomainEvent::AgentMessageSent {
        message_id: message_id.clone(),
        sender: message.sender.clone(),
        receiver: message.receiver.clone(),
        kind: message.kind.as_str().to_string(),
        timestamp: Utc::now(),
    });

    DeliveryReceipt {
        delivered: true,
        message_id,
        sender: message.sender.clone(),
        receiver: message.receiver.clone(),
        timestamp: message.timestamp.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_id_strips_separators() {
        assert_eq!(
            message_id("2025-11-30T09:15:00.123456"),
            "msg_20251130T091500.123456"
        );
    }

    #[test]
    fn serializes_kind_as_type() {
        let msg = AgentMessage::new("router", "admin_agent", "renew my license")
            .with_kind(MessageKind::Notification);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "notification");
        assert_eq!(json["receiver"], "admin_agent");
    }

    #[tokio::test]
    async fn send_publishes_event() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        let msg = AgentMessage::new("router", "productivity_agent", "I'm tired");

        let receipt = send(&bus, &msg);
        assert!(receipt.delivered);
        assert!(receipt.message_id.starts_with("msg_"));
        assert!(!receipt.message_id.contains(':'));

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            DomainEvent::AgentMessageSent { message_id, receiver, kind, .. } => {
                assert_eq!(message_id, &receipt.message_id);
                assert_eq!(receiver, "productivity_agent");
                assert_eq!(kind, "request");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
