//! Mock Gmail tools: drafts, sending, and renewal email templates.

use crate::{mock_id, record};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use concierge_core::error::ToolError;
use concierge_core::tool::{Tool, ToolResult, parse_arguments};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const PREVIEW_CHARS: usize = 100;

fn validate_recipient(to: &str) -> Result<(), String> {
    if to.contains('@') {
        Ok(())
    } else {
        warn!(to, "Rejected email recipient");
        Err(format!("Invalid email address: {to}"))
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > PREVIEW_CHARS {
        let cut: String = body.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        body.to_string()
    }
}

fn timestamp(now: DateTime<Local>) -> String {
    now.naive_local().format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub cc: Option<String>,
    #[serde(default)]
    pub bcc: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Draft {
    pub draft_id: String,
    pub to: String,
    pub cc: Option<String>,
    pub bcc: Option<String>,
    pub subject: String,
    pub body_preview: String,
    pub created_at: String,
    pub status: &'static str,
    pub message: &'static str,
}

/// Create a (mock) draft. Nothing is sent.
pub fn create_draft(request: &NewDraft, now: DateTime<Local>) -> Result<Draft, String> {
    info!(to = %request.to, subject = %request.subject, body_len = request.body.len(), "Creating Gmail draft");
    validate_recipient(&request.to)?;

    let draft = Draft {
        draft_id: mock_id("draft", now),
        to: request.to.clone(),
        cc: request.cc.clone(),
        bcc: request.bcc.clone(),
        subject: request.subject.clone(),
        body_preview: preview(&request.body),
        created_at: timestamp(now),
        status: "draft",
        message: "Draft created successfully. Review and send from Gmail.",
    };
    info!(draft_id = %draft.draft_id, "Draft created");
    Ok(draft)
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentEmail {
    pub message_id: String,
    pub to: String,
    pub subject: String,
    pub sent_at: String,
    pub status: &'static str,
}

/// Mock send: validates the recipient and reports the message as sent.
pub fn send_email(request: &OutgoingEmail, now: DateTime<Local>) -> Result<SentEmail, String> {
    info!(to = %request.to, subject = %request.subject, "Sending email");
    validate_recipient(&request.to)?;
    Ok(SentEmail {
        message_id: mock_id("sent", now),
        to: request.to.clone(),
        subject: request.subject.clone(),
        sent_at: timestamp(now),
        status: "sent",
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenewalEmailRequest {
    pub renewal_type: String,
    pub provider: String,
    pub policy_number: String,
    pub expiration_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenewalEmail {
    pub renewal_type: String,
    pub subject: String,
    pub body: String,
    pub suggested_recipient: String,
}

/// Fill the renewal email template for a policy or document.
pub fn generate_renewal_email(request: &RenewalEmailRequest) -> RenewalEmail {
    let RenewalEmailRequest {
        renewal_type,
        provider,
        policy_number,
        expiration_date,
    } = request;
    info!(renewal_type = %renewal_type, "Generating renewal email");

    let (subject, body) = match renewal_type.as_str() {
        "auto_insurance" => (
            format!("Auto Insurance Policy Renewal - {policy_number}"),
            format!(
                "Dear {provider} Team,\n\n\
                 I am writing to inquire about renewing my auto insurance policy.\n\n\
                 Policy Details:\n\
                 - Policy Number: {policy_number}\n\
                 - Expiration Date: {expiration_date}\n\n\
                 Please provide me with:\n\
                 1. Renewal options and pricing\n\
                 2. Any available discounts\n\
                 3. Coverage recommendations\n\n\
                 I would appreciate a response at your earliest convenience.\n\n\
                 Best regards,\n\
                 John Doe\n\
                 Phone: (555) 123-4567\n\
                 Email: johndoe@email.com"
            ),
        ),
        "license" => (
            "Driver's License Renewal Inquiry".to_string(),
            format!(
                "To Whom It May Concern,\n\n\
                 I am writing regarding the renewal of my driver's license.\n\n\
                 License Details:\n\
                 - License Number: {policy_number}\n\
                 - Expiration Date: {expiration_date}\n\n\
                 Could you please confirm:\n\
                 1. If I am eligible for online renewal\n\
                 2. Required documents for renewal\n\
                 3. Current processing times\n\n\
                 Thank you for your assistance.\n\n\
                 Sincerely,\n\
                 John Doe"
            ),
        ),
        other => (
            format!("Renewal Request - {other}"),
            format!(
                "Requesting renewal for {other}. Policy/ID: {policy_number}. Expires: {expiration_date}."
            ),
        ),
    };

    let domain: String = provider
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ')
        .collect();

    RenewalEmail {
        renewal_type: renewal_type.clone(),
        subject,
        body,
        suggested_recipient: format!("support@{domain}.com"),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftSummary {
    pub id: &'static str,
    pub subject: &'static str,
    pub to: &'static str,
    pub created: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftList {
    pub count: usize,
    pub drafts: Vec<DraftSummary>,
}

pub fn list_drafts(max_results: usize) -> DraftList {
    let drafts: Vec<DraftSummary> = [DraftSummary {
        id: "draft_001",
        subject: "Insurance Renewal",
        to: "geico@support.com",
        created: "2025-11-28T10:00:00",
    }]
    .into_iter()
    .take(max_results)
    .collect();

    DraftList {
        count: drafts.len(),
        drafts,
    }
}

// --- Tool wrappers ---

pub struct CreateGmailDraftTool;

#[async_trait]
impl Tool for CreateGmailDraftTool {
    fn name(&self) -> &str {
        "create_gmail_draft"
    }

    fn description(&self) -> &str {
        "Creates a Gmail draft email. Use this when the user wants to compose an email for renewals, reminders, or other communications. The email is saved as a draft and NOT sent automatically."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "to": { "type": "string", "description": "Recipient email address" },
                "subject": { "type": "string", "description": "Email subject line" },
                "body": { "type": "string", "description": "Email body content" },
                "cc": { "type": "string", "description": "CC recipients (optional)" },
                "bcc": { "type": "string", "description": "BCC recipients (optional)" }
            },
            "required": ["to", "subject", "body"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let request: NewDraft = parse_arguments(arguments)?;
        Ok(record(create_draft(&request, Local::now())))
    }
}

pub struct SendEmailTool;

#[async_trait]
impl Tool for SendEmailTool {
    fn name(&self) -> &str {
        "send_email"
    }

    fn description(&self) -> &str {
        "Sends an email immediately. Only use this when the user explicitly asks to send, otherwise create a draft."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "to": { "type": "string", "description": "Recipient email address" },
                "subject": { "type": "string", "description": "Email subject line" },
                "body": { "type": "string", "description": "Email body content" }
            },
            "required": ["to", "subject", "body"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let request: OutgoingEmail = parse_arguments(arguments)?;
        Ok(record(send_email(&request, Local::now())))
    }
}

pub struct GenerateRenewalEmailTool;

#[async_trait]
impl Tool for GenerateRenewalEmailTool {
    fn name(&self) -> &str {
        "generate_renewal_email"
    }

    fn description(&self) -> &str {
        "Generates a renewal request email (subject, body and suggested recipient) for an insurance policy, license or other document."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "renewal_type": { "type": "string", "description": "Type of renewal, e.g. 'auto_insurance' or 'license'" },
                "provider": { "type": "string", "description": "Service provider name" },
                "policy_number": { "type": "string", "description": "Policy or account number" },
                "expiration_date": { "type": "string", "description": "Expiration date" }
            },
            "required": ["renewal_type", "provider", "policy_number", "expiration_date"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let request: RenewalEmailRequest = parse_arguments(arguments)?;
        Ok(ToolResult::ok(&generate_renewal_email(&request)))
    }
}

pub struct ListGmailDraftsTool;

#[derive(Deserialize)]
struct ListArgs {
    #[serde(default = "default_max_results")]
    max_results: usize,
}

fn default_max_results() -> usize {
    10
}

#[async_trait]
impl Tool for ListGmailDraftsTool {
    fn name(&self) -> &str {
        "list_gmail_drafts"
    }

    fn description(&self) -> &str {
        "Lists existing Gmail drafts."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "max_results": { "type": "integer", "description": "Maximum number of drafts to return (default: 10)" }
            }
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: ListArgs = parse_arguments(arguments)?;
        Ok(ToolResult::ok(&list_drafts(args.max_results)))
    }
}
