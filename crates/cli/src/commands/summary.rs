//! `concierge summary`: end-of-day report.

use concierge_agent::Concierge;
use concierge_config::AppConfig;

fn clean(tasks: Vec<String>) -> Vec<String> {
    tasks
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

pub async fn run(
    config: AppConfig,
    done: Vec<String>,
    pending: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let concierge = Concierge::new(config);
    let summary = concierge.end_of_day_summary(&clean(done), &clean(pending));

    println!("🌙 End of Day: {}", summary.date);
    println!("======================");
    println!("  ✅ Completed ({})", summary.completed.count);
    for task in &summary.completed.tasks {
        println!("     • {task}");
    }
    println!("  ⏳ Pending ({})", summary.pending.count);
    for task in &summary.pending.tasks {
        println!("     • {task}");
    }
    if summary.pending.count > 0 {
        println!("     {}", summary.pending.carry_over);
    }
    println!();
    println!("  Productivity score: {}%", summary.productivity_score);
    println!("  {}", summary.message);
    Ok(())
}
