//! `concierge demo`: walk through a fixed set of queries.

use super::print_reply;
use concierge_agent::Concierge;
use concierge_config::AppConfig;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

pub const DEMO_QUERIES: [&str; 5] = [
    "What's my driver's license number?",
    "What renewals do I have coming up?",
    "I'm feeling tired today, what should I work on?",
    "Create a calendar event for my DMV appointment on December 10th at 2pm",
    "Draft an email to renew my car insurance",
];

pub async fn run(config: AppConfig, pause: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut concierge = Concierge::new(config);
    let rule = "=".repeat(60);

    println!();
    println!("{rule}");
    println!("🛎️  LIFE ADMIN CONCIERGE - DEMO");
    println!("{rule}");
    if concierge.is_demo_mode() {
        println!("  ⚠️  No API key: showing structured agent output.");
    }

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    for (i, query) in DEMO_QUERIES.iter().enumerate() {
        println!();
        println!("{rule}");
        println!("  🧑 {query}");

        let outcome = concierge.process_query(query, None).await;
        println!("  🧭 {}", outcome.routing.routed_to);
        print_reply("📤 Result:", &outcome.response.response);
        println!("{rule}");

        if pause && i + 1 < DEMO_QUERIES.len() {
            print!("\nPress Enter for next demo...");
            std::io::stdout().flush()?;
            if stdin.next_line().await?.is_none() {
                break;
            }
        }
    }

    println!();
    Ok(())
}
