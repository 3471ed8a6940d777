//! The concierge's agents.
//!
//! A query flows through the system like this:
//!
//! 1. **Route**: the keyword [`Router`] picks a sub-agent
//! 2. **Dispatch**: an A2A message is sent and the sub-agent builds a record
//! 3. **Enhance**: with an LLM configured, the record is rewritten as prose
//! 4. **Remember**: both sides of the exchange land in the session
//!
//! [`Concierge::converse`] is the alternative mode, where the model drives
//! the conversation and calls tools itself through the [`ToolLoop`].

pub mod a2a;
pub mod admin;
pub mod concierge;
pub mod eisenhower;
pub mod evaluation;
pub mod productivity;
pub mod router;
pub mod tool_loop;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use a2a::{AgentMessage, DeliveryReceipt, MessageKind};
pub use admin::{AdminAction, AdminAgent, AdminReply};
pub use concierge::{AgentResponse, Concierge, ConversationTurn, QueryOutcome, SystemStatus};
pub use eisenhower::{EisenhowerMatrix, PrioritizationPlan, Quadrant};
pub use evaluation::EvaluationReport;
pub use productivity::{AgentContext, EndOfDaySummary, ProductivityAction, ProductivityAgent, ProductivityReply};
pub use router::{Route, Router, RoutingDecision};
pub use tool_loop::{LoopOutcome, ToolLoop, ToolRun};
