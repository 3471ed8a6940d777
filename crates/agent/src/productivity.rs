//! Productivity sub-agent: prioritization, energy-aware suggestions and
//! time-blocked days.

use crate::eisenhower;
use chrono::{DateTime, Local, NaiveDate, Timelike};
use concierge_core::EnergyLevel;
use concierge_session::Session;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

pub const PRODUCTIVITY_AGENT_NAME: &str = "ProductivityAgent";

const CAPABILITIES: &[&str] = &[
    "prioritize_tasks",
    "suggest_schedule",
    "energy_based_recommendations",
    "create_time_blocks",
];

const LOW_ENERGY_WORDS: &[&str] = &["tired", "exhausted", "low", "lazy", "sleepy"];
const HIGH_ENERGY_WORDS: &[&str] = &["energetic", "motivated", "pumped", "high"];

const PRIORITIZE_KEYWORDS: &[&str] = &["prioritize", "priority", "eisenhower", "important"];
const SCHEDULE_KEYWORDS: &[&str] = &["schedule", "time block", "plan", "daily"];
const LOW_ENERGY_KEYWORDS: &[&str] = &["tired", "low energy", "exhausted", "lazy"];
const HIGH_ENERGY_KEYWORDS: &[&str] = &["productive", "focus", "motivated", "energetic"];

/// Session state key holding the user's stated energy level.
pub const ENERGY_STATE_KEY: &str = "energy_level";
/// Session state key holding the user's task list.
pub const TASKS_STATE_KEY: &str = "task_list";

/// What the productivity agent knows beyond the query text.
#[derive(Debug, Clone, Default)]
pub struct AgentContext {
    pub energy_level: Option<EnergyLevel>,
    pub task_list: Option<String>,
}

impl AgentContext {
    /// Build the context for a query. The task list is whatever follows the
    /// first `:` in the query, falling back to the session's stored list.
    pub fn from_session(query: &str, session: &Session) -> Self {
        let energy_level = session
            .get_state(ENERGY_STATE_KEY)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok());

        let task_list = task_list_in_query(query).or_else(|| {
            session
                .get_state(TASKS_STATE_KEY)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        });

        Self {
            energy_level,
            task_list,
        }
    }
}

fn task_list_in_query(query: &str) -> Option<String> {
    let (_, rest) = query.split_once(':')?;
    let rest = rest.trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

fn mentions(query: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| query.contains(kw))
}

/// Energy from the words in the query, then the context, then the hour.
pub fn extract_energy_level(query: &str, context: &AgentContext, hour: u32) -> EnergyLevel {
    let query = query.to_lowercase();
    if mentions(&query, LOW_ENERGY_WORDS) {
        EnergyLevel::Low
    } else if mentions(&query, HIGH_ENERGY_WORDS) {
        EnergyLevel::High
    } else {
        context
            .energy_level
            .unwrap_or_else(|| EnergyLevel::for_hour(hour))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayBlock {
    pub time: &'static str,
    pub activity: &'static str,
    pub duration: &'static str,
}

const fn block(time: &'static str, activity: &'static str, duration: &'static str) -> DayBlock {
    DayBlock {
        time,
        activity,
        duration,
    }
}

const LOW_ENERGY_DAY: [DayBlock; 5] = [
    block("9:00 AM", "Easy admin tasks", "1h"),
    block("10:00 AM", "Email and messages", "30m"),
    block("10:30 AM", "Short break", "15m"),
    block("10:45 AM", "Light work", "1h"),
    block("12:00 PM", "Lunch break", "1h"),
];

const MEDIUM_ENERGY_DAY: [DayBlock; 5] = [
    block("9:00 AM", "Planning and review", "30m"),
    block("9:30 AM", "Focused work", "1.5h"),
    block("11:00 AM", "Meetings", "1h"),
    block("12:00 PM", "Lunch break", "1h"),
    block("1:00 PM", "Collaborative work", "2h"),
];

const HIGH_ENERGY_DAY: [DayBlock; 5] = [
    block("9:00 AM", "Deep work - Priority task", "2h"),
    block("11:00 AM", "Short break", "15m"),
    block("11:15 AM", "Important meetings/calls", "1h"),
    block("12:15 PM", "Lunch break", "45m"),
    block("1:00 PM", "Creative work", "2h"),
];

/// The default time-blocked morning for an energy level.
pub fn default_time_blocks(level: EnergyLevel) -> &'static [DayBlock] {
    match level {
        EnergyLevel::Low => &LOW_ENERGY_DAY,
        EnergyLevel::Medium => &MEDIUM_ENERGY_DAY,
        EnergyLevel::High => &HIGH_ENERGY_DAY,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ProductivityAction {
    RequestTasks {
        message: &'static str,
        prompt: &'static str,
        energy_level: EnergyLevel,
        note: String,
    },
    Prioritize {
        energy_level: EnergyLevel,
        prioritization_prompt: String,
        message: String,
    },
    Schedule {
        energy_level: EnergyLevel,
        suggested_blocks: &'static [DayBlock],
        message: &'static str,
    },
    LowEnergyMode {
        energy_level: EnergyLevel,
        recommendations: &'static [&'static str],
        avoid: &'static [&'static str],
        message: &'static str,
    },
    HighEnergyMode {
        energy_level: EnergyLevel,
        recommendations: &'static [&'static str],
        time_suggestion: &'static str,
        message: &'static str,
    },
    GeneralHelp {
        message: &'static str,
        capabilities: &'static [&'static str],
        quick_tips: &'static [&'static str],
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductivityReply {
    pub agent: &'static str,
    #[serde(flatten)]
    pub action: ProductivityAction,
}

impl ProductivityReply {
    /// The rendered Eisenhower prompt, when the reply is ready for the model.
    pub fn prioritization_prompt(&self) -> Option<&str> {
        match &self.action {
            ProductivityAction::Prioritize {
                prioritization_prompt,
                ..
            } => Some(prioritization_prompt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletedSection {
    pub count: usize,
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingSection {
    pub count: usize,
    pub tasks: Vec<String>,
    pub carry_over: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndOfDaySummary {
    pub agent: &'static str,
    pub report_type: &'static str,
    pub date: String,
    pub completed: CompletedSection,
    pub pending: PendingSection,
    pub productivity_score: u32,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProductivityAgent;

impl ProductivityAgent {
    pub fn new() -> Self {
        Self
    }

    pub fn capabilities(&self) -> &'static [&'static str] {
        CAPABILITIES
    }

    pub fn process(&self, query: &str, context: &AgentContext, now: DateTime<Local>) -> ProductivityReply {
        let query_lower = query.to_lowercase();
        let energy = extract_energy_level(&query_lower, context, now.hour());

        let action = if mentions(&query_lower, PRIORITIZE_KEYWORDS) {
            info!(energy = %energy, has_tasks = context.task_list.is_some(), "Prioritization requested");
            match context.task_list.as_deref() {
                None => ProductivityAction::RequestTasks {
                    message: "I'll help you prioritize your tasks using the Eisenhower Matrix.",
                    prompt: "Please share your task list, and I'll categorize them by urgency and importance.",
                    energy_level: energy,
                    note: format!(
                        "Based on your {energy} energy, I'll suggest appropriate tasks to focus on."
                    ),
                },
                Some(tasks) => ProductivityAction::Prioritize {
                    energy_level: energy,
                    prioritization_prompt: eisenhower::prioritization_prompt(tasks, energy, now),
                    message: format!("Ready to prioritize tasks for {energy} energy level."),
                },
            }
        } else if mentions(&query_lower, SCHEDULE_KEYWORDS) {
            info!(energy = %energy, "Schedule requested");
            ProductivityAction::Schedule {
                energy_level: energy,
                suggested_blocks: default_time_blocks(energy),
                message: "Here's a suggested time-blocked schedule based on your energy patterns.",
            }
        } else if mentions(&query_lower, LOW_ENERGY_KEYWORDS) {
            info!("Low energy recommendations");
            ProductivityAction::LowEnergyMode {
                energy_level: EnergyLevel::Low,
                recommendations: &[
                    "✅ Quick email responses (5-10 min each)",
                    "✅ File organization and cleanup",
                    "✅ Review and update to-do list",
                    "✅ Schedule future appointments",
                    "✅ Light reading or research",
                    "✅ Take a short walk or stretch break",
                ],
                avoid: &[
                    "❌ Complex problem-solving",
                    "❌ Important decisions",
                    "❌ Deep work requiring focus",
                    "❌ Difficult conversations",
                ],
                message: "When energy is low, focus on easy wins and administrative tasks. \
                          Save deep work for when you're more energized.",
            }
        } else if mentions(&query_lower, HIGH_ENERGY_KEYWORDS) {
            info!("High energy recommendations");
            ProductivityAction::HighEnergyMode {
                energy_level: EnergyLevel::High,
                recommendations: &[
                    "🚀 Tackle your most important project",
                    "🚀 Work on tasks requiring deep focus",
                    "🚀 Make important decisions",
                    "🚀 Creative work and brainstorming",
                    "🚀 Difficult conversations or negotiations",
                    "🚀 Learn something new",
                ],
                time_suggestion: "Block 2-3 hours for uninterrupted deep work",
                message: "High energy is prime time! Focus on your most important and \
                          challenging tasks now.",
            }
        } else {
            ProductivityAction::GeneralHelp {
                message: "I can help optimize your productivity.",
                capabilities: CAPABILITIES,
                quick_tips: &[
                    "Share your task list for Eisenhower Matrix prioritization",
                    "Tell me your current energy level for personalized recommendations",
                    "Ask for a time-blocked schedule for today",
                ],
            }
        };

        ProductivityReply {
            agent: PRODUCTIVITY_AGENT_NAME,
            action,
        }
    }

    /// End-of-day highlights: what got done and what carries over.
    pub fn end_of_day_summary(&self, completed: &[String], pending: &[String], date: NaiveDate) -> EndOfDaySummary {
        info!(completed = completed.len(), pending = pending.len(), "End of day summary");
        let score = u32::try_from(completed.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(20)
            .min(100);

        EndOfDaySummary {
            agent: PRODUCTIVITY_AGENT_NAME,
            report_type: "end_of_day_summary",
            date: date.format("%Y-%m-%d").to_string(),
            completed: CompletedSection {
                count: completed.len(),
                tasks: completed.to_vec(),
            },
            pending: PendingSection {
                count: pending.len(),
                tasks: pending.to_vec(),
                carry_over: "These will be prioritized for tomorrow",
            },
            productivity_score: score,
            message: format!(
                "Great work today! You completed {} tasks. {} tasks will carry over to tomorrow.",
                completed.len(),
                pending.len()
            ),
        }
    }
}
