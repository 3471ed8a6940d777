//! `concierge ask`: answer one message and exit.

use super::print_reply;
use concierge_agent::Concierge;
use concierge_config::AppConfig;

pub async fn run(
    config: AppConfig,
    message: &str,
    tools: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut concierge = Concierge::new(config);

    if tools {
        let turn = concierge.converse(message, None).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&turn)?);
        } else {
            print_reply("🤖 Concierge:", &turn.reply);
        }
        return Ok(());
    }

    let outcome = concierge.process_query(message, None).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!(
            "  🧭 Routed to {} ({:.0}% confidence)",
            outcome.routing.routed_to,
            outcome.routing.confidence * 100.0
        );
        print_reply("🤖 Concierge:", &outcome.response.response);
    }
    Ok(())
}
