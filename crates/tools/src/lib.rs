//! Tools for the Life Admin Concierge.
//!
//! Profile tools read the hardcoded demo profile. The Google tools (Calendar,
//! Gmail, Tasks, Photos) are mocks: they validate their inputs and echo them
//! back with synthesized identifiers, without touching any Google API.

pub mod calendar;
pub mod datetime;
pub mod gmail;
pub mod photos;
pub mod profile;
pub mod profile_data;
pub mod tasks;

use chrono::{DateTime, Local};
use concierge_core::tool::{ToolRegistry, ToolResult};
use serde::Serialize;

pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// `{prefix}_YYYYMMDDHHMMSS`, the id format of every mock record.
pub fn mock_id(prefix: &str, now: DateTime<Local>) -> String {
    format!("{prefix}_{}", now.format("%Y%m%d%H%M%S"))
}

/// Turn a validated outcome into a tool result: the record on success,
/// `{ "success": false, "error": ... }` otherwise.
pub fn record<T: Serialize>(outcome: Result<T, String>) -> ToolResult {
    match outcome {
        Ok(value) => ToolResult::ok(&value),
        Err(error) => ToolResult::failure(error),
    }
}

/// Create a registry with every concierge tool.
pub fn default_registry() -> ToolRegistry {
    registry_for_timezone(DEFAULT_TIMEZONE)
}

/// Like `default_registry`, with calendar events stamped in `timezone`.
pub fn registry_for_timezone(timezone: &str) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Box::new(profile::GetProfileInfoTool));
    registry.register(Box::new(profile::GetRenewalStatusTool));
    registry.register(Box::new(profile::GetTaskTemplateTool));
    registry.register(Box::new(profile::GetFullProfileTool));

    registry.register(Box::new(calendar::CreateCalendarEventTool::new(timezone)));
    registry.register(Box::new(calendar::ListCalendarEventsTool));
    registry.register(Box::new(calendar::DeleteCalendarEventTool));

    registry.register(Box::new(gmail::CreateGmailDraftTool));
    registry.register(Box::new(gmail::SendEmailTool));
    registry.register(Box::new(gmail::GenerateRenewalEmailTool));
    registry.register(Box::new(gmail::ListGmailDraftsTool));

    registry.register(Box::new(tasks::ListTaskListsTool));
    registry.register(Box::new(tasks::ListTasksTool));
    registry.register(Box::new(tasks::CreateTaskTool));
    registry.register(Box::new(tasks::CompleteTaskTool));

    registry.register(Box::new(photos::SearchGooglePhotosTool));
    registry.register(Box::new(photos::ListPhotoAlbumsTool));
    registry.register(Box::new(photos::GetPhotosFromAlbumTool));

    registry.register(Box::new(datetime::GetCurrentDatetimeTool));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use concierge_core::tool::ToolCall;

    #[test]
    fn registry_has_all_tools() {
        let registry = default_registry();
        assert_eq!(registry.len(), 19);
        for name in [
            "get_profile_info",
            "get_renewal_status",
            "create_calendar_event",
            "create_gmail_draft",
            "create_task",
            "search_google_photos",
            "get_current_datetime",
        ] {
            assert!(registry.get(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn definitions_have_object_schemas() {
        for def in default_registry().definitions() {
            assert_eq!(def.parameters["type"], "object", "{}", def.name);
            assert!(!def.description.is_empty());
        }
    }

    #[test]
    fn mock_id_format() {
        let now = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(mock_id("draft", now), "draft_20250102030405");
    }

    #[tokio::test]
    async fn registry_dispatch_sets_call_id() {
        let registry = default_registry();
        let result = registry
            .execute(&ToolCall {
                id: "call_9".into(),
                name: "get_profile_info".into(),
                arguments: serde_json::json!({"query": "passport"}),
            })
            .await
            .unwrap();
        assert_eq!(result.call_id, "call_9");
        assert_eq!(result.data.unwrap()["info"], "P11223344");
    }
}
