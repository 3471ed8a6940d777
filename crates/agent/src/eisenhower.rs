//! Eisenhower matrix: urgent/important quadrants, energy-aware picks and the
//! prioritization prompt sent to the model.

use chrono::{DateTime, Local};
use concierge_core::EnergyLevel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    #[serde(rename = "Q1_do_first")]
    DoFirst,
    #[serde(rename = "Q2_schedule")]
    Schedule,
    #[serde(rename = "Q3_delegate")]
    Delegate,
    #[serde(rename = "Q4_eliminate")]
    Eliminate,
}

impl Quadrant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::DoFirst => "Q1_do_first",
            Quadrant::Schedule => "Q2_schedule",
            Quadrant::Delegate => "Q3_delegate",
            Quadrant::Eliminate => "Q4_eliminate",
        }
    }
}

pub fn categorize(urgent: bool, important: bool) -> Quadrant {
    match (urgent, important) {
        (true, true) => Quadrant::DoFirst,
        (false, true) => Quadrant::Schedule,
        (true, false) => Quadrant::Delegate,
        (false, false) => Quadrant::Eliminate,
    }
}

/// Tasks sorted into the four quadrants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quadrants {
    #[serde(rename = "Q1_do_first", default)]
    pub do_first: Vec<String>,
    #[serde(rename = "Q2_schedule", default)]
    pub schedule: Vec<String>,
    #[serde(rename = "Q3_delegate", default)]
    pub delegate: Vec<String>,
    #[serde(rename = "Q4_eliminate", default)]
    pub eliminate: Vec<String>,
}

impl Quadrants {
    fn bucket_mut(&mut self, quadrant: Quadrant) -> &mut Vec<String> {
        match quadrant {
            Quadrant::DoFirst => &mut self.do_first,
            Quadrant::Schedule => &mut self.schedule,
            Quadrant::Delegate => &mut self.delegate,
            Quadrant::Eliminate => &mut self.eliminate,
        }
    }

    pub fn len(&self) -> usize {
        self.do_first.len() + self.schedule.len() + self.delegate.len() + self.eliminate.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FocusAreas {
    pub critical: usize,
    pub important: usize,
    pub delegatable: usize,
    pub eliminatable: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatrixSummary {
    pub total_tasks: usize,
    pub quadrants: Quadrants,
    pub focus_areas: FocusAreas,
}

/// A task to lay out in a time-blocked schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannedTask {
    pub name: String,
    #[serde(default = "default_duration_min")]
    pub duration_min: u32,
}

fn default_duration_min() -> u32 {
    30
}

impl PlannedTask {
    pub fn new(name: impl Into<String>, duration_min: u32) -> Self {
        Self {
            name: name.into(),
            duration_min,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub time: String,
    pub task: String,
    pub duration: String,
}

#[derive(Debug, Clone, Default)]
pub struct EisenhowerMatrix {
    quadrants: Quadrants,
}

impl EisenhowerMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// File a task under its quadrant and return the quadrant.
    pub fn categorize_task(&mut self, task: impl Into<String>, urgent: bool, important: bool) -> Quadrant {
        let quadrant = categorize(urgent, important);
        self.quadrants.bucket_mut(quadrant).push(task.into());
        quadrant
    }

    pub fn quadrants(&self) -> &Quadrants {
        &self.quadrants
    }

    /// Tasks worth doing at this energy level: easy wins when low, deep work
    /// when high.
    pub fn energy_adjusted_tasks(&self, level: EnergyLevel) -> Vec<String> {
        let q = &self.quadrants;
        let (first, second) = match level {
            EnergyLevel::Low => (&q.delegate, &q.eliminate),
            EnergyLevel::Medium => (&q.schedule, &q.delegate),
            EnergyLevel::High => (&q.do_first, &q.schedule),
        };
        first.iter().chain(second).cloned().collect()
    }

    pub fn summary(&self) -> MatrixSummary {
        let q = &self.quadrants;
        MatrixSummary {
            total_tasks: q.len(),
            quadrants: q.clone(),
            focus_areas: FocusAreas {
                critical: q.do_first.len(),
                important: q.schedule.len(),
                delegatable: q.delegate.len(),
                eliminatable: q.eliminate.len(),
            },
        }
    }
}

/// Lay tasks out back to back from `start_hour:00`.
pub fn create_time_blocks(tasks: &[PlannedTask], start_hour: u32) -> Vec<TimeBlock> {
    let mut minutes = start_hour * 60;
    tasks
        .iter()
        .map(|task| {
            let block = TimeBlock {
                time: format!("{:02}:{:02}", minutes / 60, minutes % 60),
                task: task.name.clone(),
                duration: format!("{} min", task.duration_min),
            };
            minutes += task.duration_min;
            block
        })
        .collect()
}

const PRIORITIZATION_PROMPT: &str = r#"
You are a productivity expert using the Eisenhower Matrix framework.

CONTEXT:
- Current date/time: {current_time}
- User's energy level: {energy_level}
- User's work hours: 9 AM - 5 PM PST

USER'S TASK LIST:
{task_list}

INSTRUCTIONS:
1. Categorize each task into one of four quadrants:
   - Q1 (DO FIRST): Urgent AND Important - Crisis, deadlines, problems
   - Q2 (SCHEDULE): Important NOT Urgent - Planning, development, prevention
   - Q3 (DELEGATE): Urgent NOT Important - Interruptions, some meetings, some calls
   - Q4 (ELIMINATE): NOT Urgent NOT Important - Time wasters, pleasant activities

2. Consider the user's current energy level:
   - If LOW energy: Prioritize Q3/Q4 tasks (easy wins, low cognitive load)
   - If MEDIUM energy: Mix of Q2/Q3 tasks
   - If HIGH energy: Prioritize Q1/Q2 tasks (deep work, complex problems)

3. Create a time-blocked schedule for today based on the prioritization.

OUTPUT FORMAT (JSON):
{
    "analysis": "Brief analysis of the task list",
    "quadrants": {
        "Q1_do_first": ["task1", "task2"],
        "Q2_schedule": ["task3", "task4"],
        "Q3_delegate": ["task5"],
        "Q4_eliminate": ["task6"]
    },
    "energy_adjusted_recommendation": "Based on {energy_level} energy, here's what to focus on...",
    "suggested_schedule": [
        {"time": "9:00 AM", "task": "task_name", "duration": "30 min", "quadrant": "Q1"},
        {"time": "9:30 AM", "task": "task_name", "duration": "1 hour", "quadrant": "Q2"}
    ],
    "quick_wins": ["Easy tasks to build momentum"],
    "defer_to_tomorrow": ["Tasks that can wait"]
}
"#;

/// Render the prioritization prompt for a raw task list.
pub fn prioritization_prompt(task_list: &str, energy: EnergyLevel, now: DateTime<Local>) -> String {
    PRIORITIZATION_PROMPT
        .replace("{current_time}", &now.format("%Y-%m-%d %H:%M %Z").to_string())
        .replace("{energy_level}", energy.as_str())
        .replace("{task_list}", task_list)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub quadrant: String,
}

/// The model's answer to the prioritization prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrioritizationPlan {
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub quadrants: Quadrants,
    #[serde(default)]
    pub energy_adjusted_recommendation: String,
    #[serde(default)]
    pub suggested_schedule: Vec<ScheduledTask>,
    #[serde(default)]
    pub quick_wins: Vec<String>,
    #[serde(default)]
    pub defer_to_tomorrow: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseFailure {
    pub error: &'static str,
    pub raw_response: String,
}

/// Pull the JSON object out of a model reply, which may wrap it in prose or
/// a code fence.
pub fn parse_priority_response(response: &str) -> Result<PrioritizationPlan, ParseFailure> {
    let failure = || ParseFailure {
        error: "Could not parse response",
        raw_response: response.to_string(),
    };

    let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) else {
        return Err(failure());
    };
    if end <= start {
        return Err(failure());
    }
    serde_json::from_str(&response[start..=end]).map_err(|_| failure())
}
