use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::Config;

const CONFIG_TEMPLATE: &str = r#"# hc configuration
#
# API keys are read from environment variables (or a .env file) by default:
#   OPENAI_API_KEY, SERPER_API_KEY
# Any key below can also be set as HC_<KEY>, e.g. HC_MAX_TOKENS=1000.

model = "gpt-4o"
temperature = 0.1
max_tokens = 2000

# JSON file with the allowed search domains (supports ~ and $VAR)
domains_file = "seameo_urls.json"

# Search results requested per query
num_results = 5

# Model calls allowed per pipeline stage
max_iterations = 15

# openai_base_url = "https://api.openai.com/v1"
# serper_base_url = "https://google.serper.dev"
"#;

const DOMAINS_TEMPLATE: &str = r#"{
  "search_domains": [
    "seameo-spafa.org",
    "www.seameo-spafa.org"
  ]
}
"#;

/// Shown instead of the chat when API keys are missing.
pub fn setup_message(missing: &[&str]) -> String {
    let mut message = format!(
        "Missing API credentials: {}\n\n\
         Set them in your environment or in a .env file in the working directory:\n\n",
        missing.join(", ")
    );
    for key in missing {
        message.push_str(&format!("  {}=...\n", key));
    }
    message.push_str(
        "\nOptional: OPENAI_MODEL (default gpt-4o), TEMPERATURE (default 0.1), \
         MAX_TOKENS (default 2000).\n\
         Run `hc setup` to create a config file and a default domain file.",
    );
    message
}

pub fn run() -> Result<()> {
    let config_dir = Config::config_dir()?;
    let config_path = config_dir.join("config.toml");

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory: {}", config_dir.display()))?;

    if config_path.exists() {
        println!("Existing config file found:\n  {}", config_path.display());
        print!("\nOverwrite? (The existing file will be backed up) [y/N] ");

        use std::io::Write;
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Setup cancelled.");
            return Ok(());
        }

        backup_file(&config_path)?;
    }

    std::fs::write(&config_path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {}", config_path.display());

    let domains_path = PathBuf::from(hc_tools::DEFAULT_DOMAINS_FILE);
    if domains_path.exists() {
        println!("Keeping existing {}", domains_path.display());
    } else {
        std::fs::write(&domains_path, DOMAINS_TEMPLATE)
            .with_context(|| format!("Failed to write {}", domains_path.display()))?;
        println!("Created {}", domains_path.display());
    }

    println!("\nNext steps:");
    println!("  1. Set your API keys:  export OPENAI_API_KEY=\"sk-...\" SERPER_API_KEY=\"...\"");
    println!("  2. Start chatting:     hc");
    println!("  3. Or ask once:        hc -p \"What is SEAMEO SPAFA?\"");

    Ok(())
}

/// Back up a file to <name>.bak, appending a timestamp if .bak already exists.
fn backup_file(path: &Path) -> Result<()> {
    let mut backup = path.with_extension("toml.bak");

    if backup.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        backup = path.with_extension(format!("toml.bak.{}", timestamp));
    }

    std::fs::rename(path, &backup)
        .with_context(|| format!("Failed to back up {} to {}", path.display(), backup.display()))?;
    println!("  Backed up to {}", backup.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_message_lists_missing_keys() {
        let message = setup_message(&["OPENAI_API_KEY", "SERPER_API_KEY"]);
        assert!(message.starts_with("Missing API credentials: OPENAI_API_KEY, SERPER_API_KEY"));
        assert!(message.contains("  SERPER_API_KEY=...\n"));
        assert!(message.contains(".env"));
    }

    #[test]
    fn test_templates_parse() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, Config::default());

        let domains = hc_tools::DomainConfig::from_json(DOMAINS_TEMPLATE).unwrap();
        assert_eq!(domains.search_domains.len(), 2);
    }
}
