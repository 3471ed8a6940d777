//! Admin sub-agent: calendar events, email drafts and renewal deadlines.

use chrono::{DateTime, Local};
use concierge_tools::calendar::{self, CalendarEvent, NewEvent};
use concierge_tools::gmail::{self, Draft, NewDraft, RenewalEmailRequest};
use concierge_tools::profile::{self, RenewalStatus};
use serde::Serialize;
use tracing::info;

pub const ADMIN_AGENT_NAME: &str = "AdminAgent";

const CAPABILITIES: &[&str] = &[
    "create_calendar_event",
    "create_gmail_draft",
    "check_renewals",
    "set_reminder",
];

const CALENDAR_KEYWORDS: &[&str] = &["calendar", "event", "appointment", "schedule"];
const EMAIL_KEYWORDS: &[&str] = &["email", "draft", "mail", "write"];
const RENEWAL_KEYWORDS: &[&str] = &["renewal", "renew", "expir", "deadline", "due"];

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AdminAction {
    CalendarSuggestion {
        message: &'static str,
        required_info: &'static [&'static str],
        example: &'static str,
        tool_available: &'static str,
    },
    EmailSuggestion {
        message: &'static str,
        required_info: &'static [&'static str],
        tool_available: &'static str,
    },
    RenewalStatus {
        status: Box<RenewalStatus>,
        message: String,
        suggested_actions: &'static [&'static str],
    },
    GeneralHelp {
        message: &'static str,
        capabilities: &'static [&'static str],
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminReply {
    pub agent: &'static str,
    #[serde(flatten)]
    pub action: AdminAction,
}

fn mentions(query: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| query.contains(kw))
}

#[derive(Debug, Clone)]
pub struct AdminAgent {
    timezone: String,
}

impl AdminAgent {
    /// Calendar events created by this agent are stamped with `timezone`.
    pub fn new(timezone: impl Into<String>) -> Self {
        Self {
            timezone: timezone.into(),
        }
    }

    pub fn capabilities(&self) -> &'static [&'static str] {
        CAPABILITIES
    }

    pub fn process(&self, query: &str, now: DateTime<Local>) -> AdminReply {
        let query_lower = query.to_lowercase();

        let action = if mentions(&query_lower, CALENDAR_KEYWORDS) {
            info!(action = "calendar", "Admin agent handling request");
            AdminAction::CalendarSuggestion {
                message: "I can help you create a calendar event. Please provide:",
                required_info: &[
                    "Event title",
                    "Date and time",
                    "Duration (optional)",
                    "Description (optional)",
                ],
                example: "Example: 'Create a calendar event for DMV appointment on Dec 10 at 2pm'",
                tool_available: "create_calendar_event",
            }
        } else if mentions(&query_lower, EMAIL_KEYWORDS) {
            info!(action = "email", "Admin agent handling request");
            AdminAction::EmailSuggestion {
                message: "I can draft an email for you. Please provide:",
                required_info: &["Recipient email", "Subject", "Key points to include"],
                tool_available: "create_gmail_draft",
            }
        } else if mentions(&query_lower, RENEWAL_KEYWORDS) {
            info!(action = "renewal", "Admin agent handling request");
            let status = profile::get_renewal_status(now);
            AdminAction::RenewalStatus {
                message: format!("Found {} items requiring attention.", status.action_required),
                status: Box::new(status),
                suggested_actions: &[
                    "Create calendar reminder for upcoming deadlines",
                    "Draft renewal emails for urgent items",
                ],
            }
        } else {
            AdminAction::GeneralHelp {
                message: "I can help with life admin tasks.",
                capabilities: CAPABILITIES,
            }
        };

        AdminReply {
            agent: ADMIN_AGENT_NAME,
            action,
        }
    }

    /// Put a half-hour reminder on the calendar.
    pub fn create_reminder(
        &self,
        title: &str,
        date: &str,
        description: &str,
        now: DateTime<Local>,
    ) -> Result<CalendarEvent, String> {
        info!(title, "Creating reminder");
        let request = NewEvent {
            duration_hours: 0.5,
            description: description.to_string(),
            ..NewEvent::new(format!("⏰ Reminder: {title}"), date)
        };
        calendar::create_event(&request, &self.timezone, now)
    }

    /// Fill the renewal template and save it as a draft to the provider's
    /// support address.
    pub fn draft_renewal_email(
        &self,
        request: &RenewalEmailRequest,
        now: DateTime<Local>,
    ) -> Result<Draft, String> {
        info!(renewal_type = %request.renewal_type, "Drafting renewal email");
        let email = gmail::generate_renewal_email(request);
        gmail::create_draft(
            &NewDraft {
                to: email.suggested_recipient,
                subject: email.subject,
                body: email.body,
                cc: None,
                bcc: None,
            },
            now,
        )
    }
}

impl Default for AdminAgent {
    fn default() -> Self {
        Self::new(concierge_tools::DEFAULT_TIMEZONE)
    }
}
