//! Mock Google Calendar tools.
//!
//! Events are not stored anywhere: creation echoes the request back with a
//! synthesized id, the way the real API response would look.

use crate::{mock_id, record};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeDelta};
use concierge_core::error::ToolError;
use concierge_core::tool::{Tool, ToolResult, parse_arguments};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A start time as given: either with an explicit offset or local wall time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventTime {
    Naive(NaiveDateTime),
    Offset(DateTime<FixedOffset>),
}

impl EventTime {
    pub fn to_iso(&self) -> String {
        match self {
            EventTime::Naive(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            EventTime::Offset(dt) => dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
        }
    }

    /// `None` when the result falls outside chrono's representable range.
    fn checked_plus(&self, duration: TimeDelta) -> Option<Self> {
        match self {
            EventTime::Naive(dt) => dt.checked_add_signed(duration).map(EventTime::Naive),
            EventTime::Offset(dt) => dt.checked_add_signed(duration).map(EventTime::Offset),
        }
    }
}

/// Parse an ISO 8601 date or date-time. A trailing `Z` means UTC.
pub fn parse_iso_datetime(input: &str) -> Result<EventTime, String> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(EventTime::Offset(dt));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%:z", "%Y-%m-%dT%H:%M%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(EventTime::Offset(dt));
        }
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(EventTime::Naive(dt));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(EventTime::Naive(date.and_time(chrono::NaiveTime::MIN)));
    }

    Err(format!("Invalid date format: invalid isoformat string: '{input}'"))
}

fn default_duration() -> f64 {
    1.0
}
fn default_reminder() -> u32 {
    30
}
fn default_max_results() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub start_time: String,
    #[serde(default = "default_duration")]
    pub duration_hours: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_reminder")]
    pub reminder_minutes: u32,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, start_time: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start_time: start_time.into(),
            duration_hours: default_duration(),
            description: String::new(),
            location: String::new(),
            reminder_minutes: default_reminder(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarEvent {
    pub event_id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub description: String,
    pub location: String,
    pub timezone: String,
    pub html_link: String,
    pub reminder: String,
    pub status: &'static str,
}

/// Create a (mock) calendar event.
pub fn create_event(
    request: &NewEvent,
    timezone: &str,
    now: DateTime<Local>,
) -> Result<CalendarEvent, String> {
    info!(title = %request.title, start = %request.start_time, duration_hours = request.duration_hours, "Creating calendar event");

    let start = parse_iso_datetime(&request.start_time).inspect_err(|e| {
        warn!(error = %e, "Rejected calendar event");
    })?;
    if !request.duration_hours.is_finite() || request.duration_hours < 0.0 {
        return Err(format!("Invalid duration: {}", request.duration_hours));
    }
    let end = TimeDelta::try_milliseconds((request.duration_hours * 3_600_000.0).round() as i64)
        .and_then(|duration| start.checked_plus(duration))
        .ok_or_else(|| {
            warn!(duration_hours = request.duration_hours, "Rejected calendar event");
            format!(
                "Failed to create event: end time out of range for a {} hour event",
                request.duration_hours
            )
        })?;

    let event = CalendarEvent {
        event_id: mock_id("mock_event", now),
        title: request.title.clone(),
        start: start.to_iso(),
        end: end.to_iso(),
        description: request.description.clone(),
        location: request.location.clone(),
        timezone: timezone.to_string(),
        html_link: "https://calendar.google.com/calendar/event?eid=mock123".into(),
        reminder: format!("{} minutes before", request.reminder_minutes),
        status: "confirmed",
    };

    info!(event_id = %event.event_id, "Calendar event created");
    Ok(event)
}

#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub id: &'static str,
    pub title: &'static str,
    pub start: &'static str,
    pub end: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventList {
    pub count: usize,
    pub events: Vec<EventSummary>,
}

pub fn list_events(max_results: usize) -> EventList {
    let events: Vec<EventSummary> = [
        EventSummary {
            id: "event1",
            title: "Team Meeting",
            start: "2025-12-01T10:00:00",
            end: "2025-12-01T11:00:00",
        },
        EventSummary {
            id: "event2",
            title: "License Renewal Reminder",
            start: "2025-12-10T09:00:00",
            end: "2025-12-10T09:30:00",
        },
    ]
    .into_iter()
    .take(max_results)
    .collect();

    EventList {
        count: events.len(),
        events,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedEvent {
    pub deleted_event_id: String,
    pub message: &'static str,
}

pub fn delete_event(event_id: &str) -> DeletedEvent {
    info!(event_id, "Deleting calendar event");
    DeletedEvent {
        deleted_event_id: event_id.to_string(),
        message: "Event deleted successfully",
    }
}

// --- Tool wrappers ---

pub struct CreateCalendarEventTool {
    timezone: String,
}

impl CreateCalendarEventTool {
    pub fn new(timezone: impl Into<String>) -> Self {
        Self {
            timezone: timezone.into(),
        }
    }
}

#[async_trait]
impl Tool for CreateCalendarEventTool {
    fn name(&self) -> &str {
        "create_calendar_event"
    }

    fn description(&self) -> &str {
        "Creates a Google Calendar event for reminders, appointments, or deadlines. Use this when the user wants to schedule something or set a reminder. Call get_current_datetime first to know today's date."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": { "type": "string", "description": "The title/summary of the calendar event" },
                "start_time": { "type": "string", "description": "Start time in ISO format (e.g., '2025-12-15T10:00:00')" },
                "duration_hours": { "type": "number", "description": "Duration of the event in hours (default: 1)" },
                "description": { "type": "string", "description": "Additional details or notes for the event" },
                "location": { "type": "string", "description": "Location of the event" },
                "reminder_minutes": { "type": "integer", "description": "Minutes before the event to send a reminder (default: 30)" }
            },
            "required": ["title", "start_time"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let request: NewEvent = parse_arguments(arguments)?;
        Ok(record(create_event(&request, &self.timezone, Local::now())))
    }
}

pub struct ListCalendarEventsTool;

#[derive(Deserialize)]
struct ListArgs {
    #[serde(default = "default_max_results")]
    max_results: usize,
}

#[async_trait]
impl Tool for ListCalendarEventsTool {
    fn name(&self) -> &str {
        "list_calendar_events"
    }

    fn description(&self) -> &str {
        "Lists upcoming Google Calendar events."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "max_results": { "type": "integer", "description": "Maximum number of events to return (default: 10)" }
            }
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: ListArgs = parse_arguments(arguments)?;
        Ok(ToolResult::ok(&list_events(args.max_results)))
    }
}

pub struct DeleteCalendarEventTool;

#[derive(Deserialize)]
struct DeleteArgs {
    event_id: String,
}

#[async_trait]
impl Tool for DeleteCalendarEventTool {
    fn name(&self) -> &str {
        "delete_calendar_event"
    }

    fn description(&self) -> &str {
        "Deletes a Google Calendar event by id."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "event_id": { "type": "string", "description": "The id of the event to delete" }
            },
            "required": ["event_id"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: DeleteArgs = parse_arguments(arguments)?;
        Ok(ToolResult::ok(&delete_event(&args.event_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 11, 30, 9, 15, 0).unwrap()
    }

    #[test]
    fn parses_naive_offset_and_zulu() {
        assert_eq!(
            parse_iso_datetime("2025-12-15T10:00:00").unwrap().to_iso(),
            "2025-12-15T10:00:00"
        );
        assert_eq!(
            parse_iso_datetime("2025-12-15T10:00:00Z").unwrap().to_iso(),
            "2025-12-15T10:00:00+00:00"
        );
        assert_eq!(
            parse_iso_datetime("2025-12-15T10:00:00-08:00").unwrap().to_iso(),
            "2025-12-15T10:00:00-08:00"
        );
        assert_eq!(
            parse_iso_datetime("2025-12-15").unwrap().to_iso(),
            "2025-12-15T00:00:00"
        );
    }

    #[test]
    fn create_event_computes_end_and_id() {
        let mut request = NewEvent::new("DMV Appointment", "2025-12-10T14:00:00");
        request.duration_hours = 1.5;
        request.location = "DMV San Francisco".into();

        let event = create_event(&request, "America/Los_Angeles", fixed_now()).unwrap();
        assert_eq!(event.event_id, "mock_event_20251130091500");
        assert_eq!(event.start, "2025-12-10T14:00:00");
        assert_eq!(event.end, "2025-12-10T15:30:00");
        assert_eq!(event.reminder, "30 minutes before");
        assert_eq!(event.status, "confirmed");
    }

    #[test]
    fn bad_date_is_rejected() {
        let request = NewEvent::new("Oops", "next tuesday");
        let err = create_event(&request, "UTC", fixed_now()).unwrap_err();
        assert!(err.starts_with("Invalid date format:"));
    }

    #[test]
    fn huge_duration_is_rejected() {
        let mut request = NewEvent::new("Forever", "2025-12-10T09:00:00");
        request.duration_hours = 1e10;
        let err = create_event(&request, "UTC", fixed_now()).unwrap_err();
        assert!(err.starts_with("Failed to create event:"));

        let mut request = NewEvent::new("Forever", "2025-12-10T09:00:00+02:00");
        request.duration_hours = 1e10;
        assert!(create_event(&request, "UTC", fixed_now()).is_err());
    }

    #[test]
    fn list_respects_max_results() {
        assert_eq!(list_events(10).count, 2);
        assert_eq!(list_events(1).events.len(), 1);
    }

    #[tokio::test]
    async fn tool_reports_validation_failure() {
        let tool = CreateCalendarEventTool::new("UTC");
        let result = tool
            .execute(serde_json::json!({"title": "x", "start_time": "2025-13-45"}))
            .await
            .unwrap();
        assert!(!result.success);
        let data = result.data.unwrap();
        assert_eq!(data["success"], false);
        assert!(data["error"].as_str().unwrap().contains("Invalid date format"));
    }

    #[tokio::test]
    async fn tool_reports_out_of_range_duration() {
        let tool = CreateCalendarEventTool::new("UTC");
        let result = tool
            .execute(serde_json::json!({
                "title": "x",
                "start_time": "2025-12-10T09:00:00",
                "duration_hours": 1e10
            }))
            .await
            .unwrap();
        assert!(!result.success);
        let data = result.data.unwrap();
        assert_eq!(data["success"], false);
        assert!(data["error"].as_str().unwrap().starts_with("Failed to create event:"));
    }

    #[tokio::test]
    async fn tool_success_record() {
        let tool = CreateCalendarEventTool::new("America/Los_Angeles");
        let result = tool
            .execute(serde_json::json!({
                "title": "Renew license",
                "start_time": "2025-12-10T09:00:00",
                "reminder_minutes": 60
            }))
            .await
            .unwrap();
        assert!(result.success);
        let data = result.data.unwrap();
        assert_eq!(data["success"], true);
        assert_eq!(data["reminder"], "60 minutes before");
        assert_eq!(data["timezone"], "America/Los_Angeles");
        assert!(data["event_id"].as_str().unwrap().starts_with("mock_event_"));
    }

    #[tokio::test]
    async fn delete_echoes_id() {
        let result = DeleteCalendarEventTool
            .execute(serde_json::json!({"event_id": "abc"}))
            .await
            .unwrap();
        assert_eq!(result.data.unwrap()["deleted_event_id"], "abc");
    }
}
