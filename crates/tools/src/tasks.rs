//! Mock Google Tasks tools.

use crate::{mock_id, record};
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate};
use concierge_core::error::ToolError;
use concierge_core::tool::{Tool, ToolResult, parse_arguments};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_TASKLIST: &str = "@default";

fn default_tasklist() -> String {
    DEFAULT_TASKLIST.to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskListSummary {
    pub id: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskLists {
    pub count: usize,
    pub task_lists: Vec<TaskListSummary>,
}

pub fn list_task_lists() -> TaskLists {
    let task_lists = vec![
        TaskListSummary {
            id: DEFAULT_TASKLIST,
            title: "My Tasks",
        },
        TaskListSummary {
            id: "life_admin",
            title: "Life Admin",
        },
    ];
    TaskLists {
        count: task_lists.len(),
        task_lists,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub id: &'static str,
    pub title: &'static str,
    pub due: Option<&'static str>,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskListing {
    pub tasklist_id: String,
    pub count: usize,
    pub tasks: Vec<TaskSummary>,
}

pub fn list_tasks(tasklist_id: &str, show_completed: bool) -> TaskListing {
    let tasks: Vec<TaskSummary> = [
        TaskSummary {
            id: "task_001",
            title: "Renew car insurance",
            due: Some("2024-12-01"),
            status: "needsAction",
        },
        TaskSummary {
            id: "task_002",
            title: "Book DMV appointment",
            due: Some("2025-12-10"),
            status: "needsAction",
        },
        TaskSummary {
            id: "task_003",
            title: "Cancel unused streaming service",
            due: None,
            status: "completed",
        },
    ]
    .into_iter()
    .filter(|t| show_completed || t.status != "completed")
    .collect();

    TaskListing {
        tasklist_id: tasklist_id.to_string(),
        count: tasks.len(),
        tasks,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default = "default_tasklist")]
    pub tasklist_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedTask {
    pub task_id: String,
    pub tasklist_id: String,
    pub title: String,
    pub notes: Option<String>,
    pub due: Option<String>,
    pub status: &'static str,
}

/// Create a (mock) task. Google Tasks only keeps the date part of a due time.
pub fn create_task(request: &NewTask, now: DateTime<Local>) -> Result<CreatedTask, String> {
    info!(title = %request.title, tasklist = %request.tasklist_id, "Creating task");

    let due = match request.due_date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| format!("Invalid due date format: {raw} (expected YYYY-MM-DD)"))?;
            Some(format!("{}T00:00:00.000Z", date.format("%Y-%m-%d")))
        }
        None => None,
    };

    Ok(CreatedTask {
        task_id: mock_id("task", now),
        tasklist_id: request.tasklist_id.clone(),
        title: request.title.clone(),
        notes: request.notes.clone(),
        due,
        status: "needsAction",
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletedTask {
    pub task_id: String,
    pub tasklist_id: String,
    pub status: &'static str,
    pub completed_at: String,
}

pub fn complete_task(task_id: &str, tasklist_id: &str, now: DateTime<Local>) -> CompletedTask {
    info!(task_id, "Completing task");
    CompletedTask {
        task_id: task_id.to_string(),
        tasklist_id: tasklist_id.to_string(),
        status: "completed",
        completed_at: now.naive_local().format("%Y-%m-%dT%H:%M:%S").to_string(),
    }
}

// --- Tool wrappers ---

pub struct ListTaskListsTool;

#[async_trait]
impl Tool for ListTaskListsTool {
    fn name(&self) -> &str {
        "list_task_lists"
    }

    fn description(&self) -> &str {
        "Lists the user's Google Tasks lists."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        Ok(ToolResult::ok(&list_task_lists()))
    }
}

pub struct ListTasksTool;

#[derive(Deserialize)]
struct ListTasksArgs {
    #[serde(default = "default_tasklist")]
    tasklist_id: String,
    #[serde(default)]
    show_completed: bool,
}

#[async_trait]
impl Tool for ListTasksTool {
    fn name(&self) -> &str {
        "list_tasks"
    }

    fn description(&self) -> &str {
        "Lists tasks in a Google Tasks list."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "tasklist_id": { "type": "string", "description": "Task list id (default: '@default')" },
                "show_completed": { "type": "boolean", "description": "Include completed tasks" }
            }
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: ListTasksArgs = parse_arguments(arguments)?;
        Ok(ToolResult::ok(&list_tasks(&args.tasklist_id, args.show_completed)))
    }
}

pub struct CreateTaskTool;

#[async_trait]
impl Tool for CreateTaskTool {
    fn name(&self) -> &str {
        "create_task"
    }

    fn description(&self) -> &str {
        "Creates a Google Task. Tasks only support a due date, so put any time of day in the notes."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "title": { "type": "string", "description": "Task title" },
                "notes": { "type": "string", "description": "Additional notes" },
                "due_date": { "type": "string", "description": "Due date in YYYY-MM-DD format" },
                "tasklist_id": { "type": "string", "description": "Task list id (default: '@default')" }
            },
            "required": ["title"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let request: NewTask = parse_arguments(arguments)?;
        Ok(record(create_task(&request, Local::now())))
    }
}

pub struct CompleteTaskTool;

#[derive(Deserialize)]
struct CompleteArgs {
    task_id: String,
    #[serde(default = "default_tasklist")]
    tasklist_id: String,
}

#[async_trait]
impl Tool for CompleteTaskTool {
    fn name(&self) -> &str {
        "complete_task"
    }

    fn description(&self) -> &str {
        "Marks a Google Task as completed."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "task_id": { "type": "string", "description": "The task id" },
                "tasklist_id": { "type": "string", "description": "Task list id (default: '@default')" }
            },
            "required": ["task_id"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let args: CompleteArgs = parse_arguments(arguments)?;
        Ok(ToolResult::ok(&complete_task(&args.task_id, &args.tasklist_id, Local::now())))
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
    fn create_task_with_due_date() {
        let task = create_task(
            &NewTask {
                title: "Renew license".into(),
                notes: Some("bring proof of residency, 3pm".into()),
                due_date: Some("2025-12-10".into()),
                tasklist_id: DEFAULT_TASKLIST.into(),
            },
            fixed_now(),
        )
        .unwrap();
        assert_eq!(task.task_id, "task_20251130091500");
        assert_eq!(task.due.as_deref(), Some("2025-12-10T00:00:00.000Z"));
        assert_eq!(task.status, "needsAction");
    }

    #[test]
    fn bad_due_date_rejected() {
        let err = create_task(
            &NewTask {
                title: "x".into(),
                notes: None,
                due_date: Some("12/10/2025".into()),
                tasklist_id: DEFAULT_TASKLIST.into(),
            },
            fixed_now(),
        )
        .unwrap_err();
        assert!(err.starts_with("Invalid due date format"));
    }

    #[test]
    fn completed_tasks_hidden_by_default() {
        assert_eq!(list_tasks(DEFAULT_TASKLIST, false).count, 2);
        assert_eq!(list_tasks(DEFAULT_TASKLIST, true).count, 3);
    }

    #[tokio::test]
    async fn create_task_tool_defaults_list() {
        let result = CreateTaskTool
            .execute(serde_json::json!({"title": "Call Geico"}))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.data.unwrap()["tasklist_id"], "@default");
    }

    #[tokio::test]
    async fn complete_task_tool() {
        let result = CompleteTaskTool
            .execute(serde_json::json!({"task_id": "task_002"}))
            .await
            .unwrap();
        assert_eq!(result.data.unwrap()["status"], "completed");
    }
}
