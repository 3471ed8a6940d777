pub mod ask;
pub mod chat;
pub mod demo;
pub mod doctor;
pub mod eval;
pub mod onboard;
pub mod status;
pub mod summary;
pub mod tools;

use concierge_agent::SystemStatus;

/// Print a multi-line reply indented under a header line.
pub fn print_reply(header: &str, text: &str) {
    println!();
    println!("  {header}");
    for line in text.lines() {
        println!("     {line}");
    }
}

pub fn print_status(status: &SystemStatus) {
    println!("  Status:       {}", status.status);
    println!(
        "  LLM:          {}",
        if status.llm_connected { "connected" } else { "demo mode" }
    );
    println!("  Model:        {}", status.model);
    println!(
        "  Sessions:     {} active / {} total (timeout {} min)",
        status.sessions.active_sessions, status.sessions.total_sessions, status.sessions.default_timeout
    );
    for (agent, state) in &status.agents {
        println!("  Agent:        {agent} ({state})");
    }
    println!("  Tools:        {}", status.tools);
    println!(
        "  Observability: {}",
        if status.observability { "enabled" } else { "disabled" }
    );
    println!("  Requests:     {}", status.requests_processed);
}
