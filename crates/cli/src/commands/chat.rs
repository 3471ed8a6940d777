//! `concierge chat`: interactive session.

use super::{print_reply, print_status};
use concierge_agent::Concierge;
use concierge_agent::concierge::spawn_event_logger;
use concierge_agent::productivity::{ENERGY_STATE_KEY, TASKS_STATE_KEY};
use concierge_config::AppConfig;
use concierge_core::EnergyLevel;
use serde_json::Value;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// A line typed at the prompt, after slash commands are recognised.
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Empty,
    Quit,
    Status,
    Help,
    Session,
    Clear,
    Energy(&'a str),
    Tasks(&'a str),
    Query(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let lower = line.to_lowercase();
    match lower.as_str() {
        "quit" | "exit" | "/quit" => return Input::Quit,
        "status" | "/status" => return Input::Status,
        "help" | "/help" => return Input::Help,
        "/session" => return Input::Session,
        "/clear" => return Input::Clear,
        _ => {}
    }
    if let Some(rest) = strip_command(line, &lower, "/energy") {
        return Input::Energy(rest);
    }
    if let Some(rest) = strip_command(line, &lower, "/tasks") {
        return Input::Tasks(rest);
    }
    Input::Query(line)
}

/// The argument after `command`, matched case-insensitively. The argument
/// keeps its original case.
fn strip_command<'a>(line: &'a str, lower: &str, command: &str) -> Option<&'a str> {
    let rest = lower.strip_prefix(command)?;
    if !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
        return None;
    }
    line.get(command.len()..).map(str::trim)
}

fn print_help() {
    println!();
    println!("  Commands:");
    println!("     status              Show system status");
    println!("     /energy <level>     Set your energy level (low, medium, high)");
    println!("     /tasks <list>       Remember a task list for prioritization");
    println!("     /session            Show this session's summary");
    println!("     /clear              Forget this session's history");
    println!("     quit                Exit");
}

pub async fn run(config: AppConfig, tools: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut concierge = Concierge::new(config);
    let logger = concierge
        .config()
        .logging
        .observability
        .then(|| spawn_event_logger(concierge.events()));

    if tools && concierge.is_demo_mode() {
        return Err("Tool mode needs an API key. Set GEMINI_API_KEY or run `concierge doctor`.".into());
    }

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        🛎️  Life Admin Concierge               ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Your personal assistant for life administration tasks.");
    println!("  Model:     {}", concierge.config().model);
    println!("  Mode:      {}", if tools { "tool calling" } else { "routed agents" });
    if concierge.is_demo_mode() {
        println!();
        println!("  ⚠️  No GEMINI_API_KEY found. Running in demo mode.");
        println!("     Set your API key in .env for full functionality.");
    }
    println!();
    println!("  Type 'quit' to exit, 'status' for system info, 'help' for commands.");

    let mut session_id: Option<String> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\n  🧑 You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Help => print_help(),
            Input::Status => {
                println!();
                println!("  📊 System Status");
                print_status(&concierge.system_status());
            }
            Input::Session | Input::Clear if session_id.is_none() => {
                println!("  ⚠️  No session yet. Ask something first.");
            }
            input @ (Input::Session | Input::Clear) => {
                let id = session_id.clone().unwrap_or_default();
                let result = if input == Input::Clear {
                    concierge.clear_session(&id).map(|()| println!("  ✅ History cleared"))
                } else {
                    concierge.session_summary(&id).map(|summary| {
                        println!();
                        println!("  🗂️  Session {}", summary.session_id);
                        println!("     Messages:  {}", summary.message_count);
                        println!("     Agents:    {}", summary.agents_invoked.join(", "));
                        println!("     Tools:     {}", summary.tools_used.join(", "));
                        println!("     Started:   {}", summary.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
                    })
                };
                if let Err(e) = result {
                    println!("  ❌ {e}");
                    session_id = None;
                }
            }
            Input::Energy(level) => match level.parse::<EnergyLevel>() {
                Ok(level) => {
                    let session = concierge.sessions_mut().get_or_create_session(session_id.as_deref());
                    session.set_state(ENERGY_STATE_KEY, Value::from(level.as_str()));
                    session_id = Some(session.id.clone());
                    println!("  ✅ Energy level set to {level}");
                }
                Err(e) => println!("  ❌ {e}"),
            },
            Input::Tasks(list) if list.is_empty() => println!("  ❌ Usage: /tasks <task, task, ...>"),
            Input::Tasks(list) => {
                let session = concierge.sessions_mut().get_or_create_session(session_id.as_deref());
                session.set_state(TASKS_STATE_KEY, Value::from(list));
                session_id = Some(session.id.clone());
                println!("  ✅ Task list saved. Ask me to prioritize it.");
            }
            Input::Query(query) if tools => match concierge.converse(query, session_id.as_deref()).await {
                Ok(turn) => {
                    session_id = Some(turn.session_id);
                    if !turn.tools_used.is_empty() {
                        println!("  🔧 Tools: {}", turn.tools_used.join(", "));
                    }
                    print_reply("🤖 Concierge:", &turn.reply);
                }
                Err(e) => println!("\n  ❌ Error: {e}"),
            },
            Input::Query(query) => {
                let outcome = concierge.process_query(query, session_id.as_deref()).await;
                session_id = Some(outcome.session_id);
                print_reply("🤖 Concierge:", &outcome.response.response);
            }
        }
    }

    println!();
    println!("  👋 Goodbye! Stay organized!");
    println!();

    drop(concierge);
    if let Some(handle) = logger {
        handle.await.ok();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_commands() {
        assert_eq!(parse_input("   "), Input::Empty);
        assert_eq!(parse_input("QUIT"), Input::Quit);
        assert_eq!(parse_input("status"), Input::Status);
        assert_eq!(parse_input("/session"), Input::Session);
        assert_eq!(parse_input("/CLEAR"), Input::Clear);
        assert_eq!(parse_input("/energy high"), Input::Energy("high"));
        assert_eq!(parse_input("/tasks taxes, gym"), Input::Tasks("taxes, gym"));
    }

    #[test]
    fn argument_commands_ignore_case() {
        assert_eq!(parse_input("/Energy high"), Input::Energy("high"));
        assert_eq!(parse_input("/TASKS Renew Passport, gym"), Input::Tasks("Renew Passport, gym"));
        assert_eq!(parse_input("/ENERGY"), Input::Energy(""));
        assert_eq!(parse_input("/energetic morning"), Input::Query("/energetic morning"));
    }

    #[test]
    fn everything_else_is_a_query() {
        assert_eq!(
            parse_input(" What's my passport number? "),
            Input::Query("What's my passport number?")
        );
        assert_eq!(parse_input("statuses please"), Input::Query("statuses please"));
    }
}
