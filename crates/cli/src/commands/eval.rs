//! `concierge eval`: run the evaluation suite.

use concierge_agent::Concierge;
use concierge_agent::evaluation;
use concierge_config::AppConfig;

pub async fn run(config: AppConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut concierge = Concierge::new(config);
    let report = evaluation::run_all(&mut concierge).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("🧪 Life Admin Concierge Evaluation");
        println!("=================================");
        if concierge.is_demo_mode() {
            println!("  (demo mode: no API key)");
        }
        for suite in &report.suites {
            println!();
            println!("  📋 {}", suite.name);
            for check in &suite.checks {
                let mark = if check.passed { "✅" } else { "❌" };
                match &check.detail {
                    Some(detail) => println!("     {mark} {}: {detail}", check.name),
                    None => println!("     {mark} {}", check.name),
                }
            }
        }

        let s = &report.summary;
        println!();
        println!(
            "  Suites: {}/{} passed  Checks: {}/{}  Success rate: {}",
            s.passed_suites, s.total_suites, s.passed_checks, s.total_checks, s.success_rate
        );
    }

    if report.all_passed() {
        Ok(())
    } else {
        Err(format!(
            "{} of {} suites failed",
            report.summary.total_suites - report.summary.passed_suites,
            report.summary.total_suites
        )
        .into())
    }
}
