//! `concierge tools` and `concierge tool <name>`.

use concierge_agent::Concierge;
use concierge_config::AppConfig;
use serde_json::Value;

pub async fn list(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let concierge = Concierge::new(config);
    let definitions = concierge.tools().definitions();

    println!("🔧 Available tools ({})", definitions.len());
    println!("======================");
    for def in &definitions {
        println!("  {:<28} {}", def.name, def.description);
    }
    Ok(())
}

fn parse_args(raw: &str) -> Result<Value, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| format!("Invalid --args JSON: {e}"))?;
    if value.is_object() {
        Ok(value)
    } else {
        Err("--args must be a JSON object".into())
    }
}

pub async fn run(config: AppConfig, name: &str, args: &str) -> Result<(), Box<dyn std::error::Error>> {
    let arguments = parse_args(args)?;
    let concierge = Concierge::new(config);

    let result = concierge.execute_tool(name, arguments).await?;
    let output = match result.data {
        Some(data) => serde_json::to_string_pretty(&data)?,
        None => result.output,
    };

    if result.success {
        println!("  ✅ {name}");
    } else {
        println!("  ❌ {name}");
    }
    println!("{output}");
    Ok(())
}
