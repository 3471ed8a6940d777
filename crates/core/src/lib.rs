//! # Concierge Core
//!
//! Domain types, traits, and error definitions for the Life Admin Concierge.
//! This crate has no HTTP or storage dependencies. It defines the model
//! every other crate implements against.
//!
//! Each seam (LLM provider, tool) is a trait here so implementations can be
//! swapped for scripted mocks in tests.

pub mod energy;
pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use energy::EnergyLevel;
pub use error::{Error, Result};
pub use event::{DomainEvent, EventBus};
pub use message::{Message, MessageToolCall, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, StreamChunk, ToolDefinition, Usage};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
