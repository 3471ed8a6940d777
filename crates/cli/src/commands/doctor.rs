//! `concierge doctor`: diagnose configuration and credentials.

use concierge_config::AppConfig;
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Life Admin Concierge Doctor");
    println!("==============================\n");

    let mut issues = 0;

    let default_path = AppConfig::config_dir().join("config.toml");
    let path = config_path.unwrap_or(default_path.as_path());
    if path.exists() {
        println!("  ✅ Config file found at {}", path.display());
    } else {
        println!("  ⚠️  No config file at {}, using defaults (run `concierge onboard`)", path.display());
    }

    let config = match AppConfig::load_with_env(path) {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ {e}");
            println!("\n  ⚠️  Fix the config file and re-run doctor.");
            return Ok(());
        }
    };

    if let Some(provider) = concierge_providers::build_from_config(&config) {
        println!("  ✅ API key configured (model {})", config.model);
        match provider.health_check().await {
            Ok(true) => println!("  ✅ {} API reachable", provider.name()),
            Ok(false) => {
                println!("  ❌ {} API rejected the request; check the key", provider.name());
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ {} API unreachable: {e}", provider.name());
                issues += 1;
            }
        }
    } else {
        println!("  ⚠️  No API key. Set GEMINI_API_KEY to leave demo mode");
        issues += 1;
    }

    let credentials = Path::new(&config.google.credentials_path);
    if credentials.exists() {
        println!("  ✅ Google credentials found at {}", credentials.display());
    } else {
        println!(
            "  ⚠️  No Google credentials at {}; calendar and Gmail tools use mock responses",
            credentials.display()
        );
        issues += 1;
    }

    let token = Path::new(&config.google.token_path);
    if token.exists() {
        println!("  ✅ Google token found at {}", token.display());
    } else {
        println!("  ⚠️  No Google token at {}", token.display());
        issues += 1;
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
