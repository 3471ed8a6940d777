//! `concierge status`: show system status.

use super::print_status;
use concierge_agent::Concierge;
use concierge_config::AppConfig;
use concierge_tools::profile_data::profile_summary;

pub async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let timezone = config.google.timezone.clone();
    let enhancement = config.agent.llm_enhancement;
    let concierge = Concierge::new(config);

    println!("🛎️  Life Admin Concierge Status");
    println!("==============================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    print_status(&concierge.system_status());
    println!("  Time zone:    {timezone}");
    println!("  Enhancement:  {}", if enhancement { "enabled" } else { "disabled" });

    println!("\n  Routes:");
    for agent in concierge.router().available_agents() {
        println!("     {:<20} {}", agent.agent.as_str(), agent.description);
    }

    println!();
    for line in profile_summary().lines() {
        println!("  {line}");
    }

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file. Run `concierge onboard` to create one");
    }

    Ok(())
}
