//! Current date and time, with the energy level the profile suggests for it.

use async_trait::async_trait;
use chrono::{DateTime, Local, Timelike};
use concierge_core::EnergyLevel;
use concierge_core::error::ToolError;
use concierge_core::tool::{Tool, ToolResult};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CurrentDateTime {
    pub datetime: String,
    pub date: String,
    pub time: String,
    pub day_of_week: String,
    pub suggested_energy_level: String,
}

pub fn current_datetime(now: DateTime<Local>) -> CurrentDateTime {
    CurrentDateTime {
        datetime: now.naive_local().format("%Y-%m-%dT%H:%M:%S").to_string(),
        date: now.format("%Y-%m-%d").to_string(),
        time: now.format("%H:%M").to_string(),
        day_of_week: now.format("%A").to_string(),
        suggested_energy_level: EnergyLevel::for_hour(now.hour()).as_str().to_lowercase(),
    }
}

pub struct GetCurrentDatetimeTool;

#[async_trait]
impl Tool for GetCurrentDatetimeTool {
    fn name(&self) -> &str {
        "get_current_datetime"
    }

    fn description(&self) -> &str {
        "Returns today's date, the current time and day of week. Call this before creating calendar events or tasks with relative dates."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        Ok(ToolResult::ok(&current_datetime(Local::now())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fields_and_energy() {
        let now = Local.with_ymd_and_hms(2025, 12, 1, 11, 5, 0).unwrap();
        let dt = current_datetime(now);
        assert_eq!(dt.date, "2025-12-01");
        assert_eq!(dt.time, "11:05");
        assert_eq!(dt.day_of_week, "Monday");
        assert_eq!(dt.suggested_energy_level, "high");
    }

    #[tokio::test]
    async fn tool_returns_success() {
        let result = GetCurrentDatetimeTool
            .execute(serde_json::json!({}))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.data.unwrap()["day_of_week"].is_string());
    }
}
