//! Profile lookup tools: personal details, renewal status and task templates.

use crate::profile_data::{
    RENEWAL_REMINDERS, RenewalEntry, TaskTemplate, USER_PROFILE, UrgentItem, renewal_calendar,
    task_template, template_names, urgent_items,
};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use concierge_core::error::ToolError;
use concierge_core::tool::{Tool, ToolResult, parse_arguments};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{error, info};

/// How the surrounding context for a match is taken from the profile.
enum ContextRule {
    /// From the header up to the next blank line
    Block(&'static str),
    /// The rest of the header's line
    Line(&'static str),
}

struct LookupPattern {
    key: &'static str,
    value: &'static str,
    context: ContextRule,
    description: &'static str,
}

/// Tried in order; the first key contained in the query wins.
const LOOKUP_PATTERNS: &[LookupPattern] = &[
    LookupPattern {
        key: "license",
        value: r"License Number:\s*([A-Z0-9]+)",
        context: ContextRule::Block("DRIVER'S LICENSE:"),
        description: "Driver's License",
    },
    LookupPattern {
        key: "passport",
        value: r"Passport Number:\s*([A-Z0-9]+)",
        context: ContextRule::Block("PASSPORT:"),
        description: "Passport",
    },
    LookupPattern {
        key: "insurance",
        value: r"Policy Number:\s*([0-9-]+)",
        context: ContextRule::Block("AUTO INSURANCE:"),
        description: "Auto Insurance",
    },
    LookupPattern {
        key: "address",
        value: r"ADDRESS:\s*\n\s*(.+)\n\s*(.+)",
        context: ContextRule::Block("ADDRESS:"),
        description: "Home Address",
    },
    LookupPattern {
        key: "phone",
        value: r"PHONE:\s*(\+?[\d\s()-]+)",
        context: ContextRule::Line("PHONE:"),
        description: "Phone Number",
    },
    LookupPattern {
        key: "email",
        value: r"EMAIL:\s*(\S+@\S+)",
        context: ContextRule::Line("EMAIL:"),
        description: "Email Address",
    },
    LookupPattern {
        key: "emergency",
        value: r"EMERGENCY CONTACT:[\s\S]*?Phone:\s*(\+?[\d\s()-]+)",
        context: ContextRule::Block("EMERGENCY CONTACT:"),
        description: "Emergency Contact",
    },
];

/// `LOOKUP_PATTERNS` compiled once, index for index. A pattern that fails to
/// compile is logged and never matches.
static COMPILED_PATTERNS: LazyLock<Vec<Option<Regex>>> = LazyLock::new(|| {
    LOOKUP_PATTERNS
        .iter()
        .map(|p| {
            Regex::new(p.value)
                .inspect_err(|e| error!(key = p.key, error = %e, "Invalid profile lookup pattern"))
                .ok()
        })
        .collect()
});

impl ContextRule {
    fn extract<'a>(&self, text: &'a str) -> Option<&'a str> {
        match self {
            ContextRule::Block(header) => {
                let start = text.find(header)?;
                let rest = &text[start..];
                let end = rest.find("\n\n").unwrap_or(rest.len());
                Some(rest[..end].trim())
            }
            ContextRule::Line(header) => {
                let start = text.find(header)?;
                let rest = &text[start..];
                let end = rest.find('\n').unwrap_or(rest.len());
                Some(rest[..end].trim())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileLookup {
    pub found: bool,
    pub query: String,
    pub info: Option<String>,
    pub context: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Look up a piece of personal information in the profile.
pub fn get_profile_info(query: &str) -> ProfileLookup {
    info!(query, "Profile lookup");
    let query_lower = query.to_lowercase();

    let mut result = ProfileLookup {
        found: false,
        query: query.to_string(),
        info: None,
        context: None,
        kind: None,
    };

    if let Some(index) = LOOKUP_PATTERNS.iter().position(|p| query_lower.contains(p.key)) {
        let pattern = &LOOKUP_PATTERNS[index];
        let captured = COMPILED_PATTERNS[index].as_ref().and_then(|re| {
            re.captures(USER_PROFILE).and_then(|caps| {
                caps.get(1)
                    .or_else(|| caps.get(0))
                    .map(|m| m.as_str().trim().to_string())
            })
        });
        if let Some(value) = captured {
            result.found = true;
            result.info = Some(value);
            result.kind = Some(pattern.description.to_string());
        }
        result.context = pattern.context.extract(USER_PROFILE).map(str::to_string);
    }

    if !result.found {
        let terms: Vec<&str> = query_lower.split_whitespace().collect();
        let matching: Vec<&str> = USER_PROFILE
            .lines()
            .filter(|line| {
                let lower = line.to_lowercase();
                terms.iter().any(|t| lower.contains(t))
            })
            .map(str::trim)
            .take(5)
            .collect();

        if !matching.is_empty() {
            result.found = true;
            result.info = Some(matching.join("\n"));
            result.kind = Some("General Search".to_string());
        }
    }

    info!(found = result.found, "Profile lookup finished");
    result
}

#[derive(Debug, Clone, Serialize)]
pub struct RenewalStatus {
    pub success: bool,
    pub timestamp: String,
    pub urgent_items: Vec<UrgentItem>,
    pub full_renewal_list: &'static str,
    pub action_required: usize,
    pub by_tier: BTreeMap<&'static str, Vec<RenewalEntry>>,
}

/// Status of every renewal and deadline.
pub fn get_renewal_status(now: DateTime<Local>) -> RenewalStatus {
    let urgent = urgent_items();
    let action_required = urgent.iter().filter(|i| i.needs_action()).count();

    let mut by_tier: BTreeMap<&'static str, Vec<RenewalEntry>> = BTreeMap::new();
    for entry in renewal_calendar() {
        by_tier.entry(entry.tier.as_str()).or_default().push(entry);
    }

    info!(urgent = urgent.len(), action_required, "Renewal status checked");

    RenewalStatus {
        success: true,
        timestamp: now.naive_local().format("%Y-%m-%dT%H:%M:%S").to_string(),
        urgent_items: urgent,
        full_renewal_list: RENEWAL_REMINDERS,
        action_required,
        by_tier,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateLookup {
    pub task_type: String,
    pub template: &'static TaskTemplate,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateNotFound {
    pub error: String,
    pub available_templates: Vec<&'static str>,
}

pub fn get_task_template(task_type: &str) -> Result<TemplateLookup, TemplateNotFound> {
    info!(task_type, "Task template requested");
    match task_template(task_type) {
        Some(template) => Ok(TemplateLookup {
            task_type: task_type.to_string(),
            template,
        }),
        None => Err(TemplateNotFound {
            error: format!("Template '{task_type}' not found"),
            available_templates: template_names(),
        }),
    }
}

/// The complete profile and renewal text, as injected into the model context.
pub fn get_full_profile() -> String {
    format!("{USER_PROFILE}\n\n{RENEWAL_REMINDERS}")
}

// --- Tool wrappers ---

pub struct GetProfileInfoTool;

#[derive(Deserialize)]
struct ProfileArgs {
    query: String,
}

#[async_trait]
impl Tool for GetProfileInfoTool {
    fn name(&self) -> &str {
        "get_profile_info"
    }

    fn description(&self) -> &str {
        "Retrieves the user's personal information from their profile. Use this when the user asks about their license number, passport, insurance details, address, phone, email, or any other personal information."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What information to look up (e.g., 'driver's license number', 'insurance policy', 'address')"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: ProfileArgs = parse_arguments(arguments)?;
        Ok(ToolResult::ok(&get_profile_info(&args.query)))
    }
}

pub struct GetRenewalStatusTool;

#[async_trait]
impl Tool for GetRenewalStatusTool {
    fn name(&self) -> &str {
        "get_renewal_status"
    }

    fn description(&self) -> &str {
        "Gets the status of all upcoming renewals, deadlines, and bills. Use this when the user asks about what's due, upcoming renewals, or deadlines."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        Ok(ToolResult::ok(&get_renewal_status(Local::now())))
    }
}

pub struct GetTaskTemplateTool;

#[derive(Deserialize)]
struct TemplateArgs {
    task_type: String,
}

#[async_trait]
impl Tool for GetTaskTemplateTool {
    fn name(&self) -> &str {
        "get_task_template"
    }

    fn description(&self) -> &str {
        "Gets a step-by-step checklist for a common life admin task: license_renewal, insurance_renewal, travel_prep or doctor_visit."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "task_type": {
                    "type": "string",
                    "enum": template_names(),
                    "description": "Which checklist to fetch"
                }
            },
            "required": ["task_type"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: TemplateArgs = parse_arguments(arguments)?;
        Ok(match get_task_template(&args.task_type) {
            Ok(found) => ToolResult::ok(&found),
            Err(missing) => {
                let mut result = ToolResult::failure(missing.error.clone());
                result.data = Some(serde_json::json!({
                    "success": false,
                    "error": missing.error,
                    "available_templates": missing.available_templates,
                }));
                result
            }
        })
    }
}

pub struct GetFullProfileTool;

#[async_trait]
impl Tool for GetFullProfileTool {
    fn name(&self) -> &str {
        "get_full_profile"
    }

    fn description(&self) -> &str {
        "Returns the user's complete profile and renewal calendar as text."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        Ok(ToolResult::ok(&serde_json::json!({ "profile": get_full_profile() })))
    }
}
