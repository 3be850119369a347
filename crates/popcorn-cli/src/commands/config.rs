use super::prompts;
use super::Session;
use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Table};
use owo_colors::OwoColorize;
use popcorn_config::{Config, API_KEY_ENV};
use serde_json::json;

pub async fn run_config(session: &Session, cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(session, full, output),
        ConfigCommands::Init { force } => init_config(session, force, output),
        ConfigCommands::ApiKey { key } => configure_api_key(session, key, output),
    }
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(2).collect();
    format!("{}{}", visible, "*".repeat(secret.chars().count().saturating_sub(2).min(12)))
}

fn show_config(session: &Session, full: bool, output: &Output) -> Result<()> {
    let config_file = session.config_file();
    let exists = config_file.exists();
    let config = session.load_config()?;

    let api_key = if !config.is_api_key_configured() {
        "not configured".to_string()
    } else if full {
        config.omdb.api_key.clone()
    } else {
        mask(&config.omdb.api_key)
    };
    let storage_dir = session.storage_dir(&config);

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            if !exists {
                output.warn(format!("Configuration file not found at: {} (showing defaults)", config_file.display()));
            }

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Setting").add_attribute(Attribute::Bold),
                Cell::new("Value").add_attribute(Attribute::Bold),
            ]);
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
            table.add_row(vec![Cell::new("Config file"), Cell::new(config_file.display().to_string())]);
            table.add_row(vec![Cell::new("OMDb API key"), Cell::new(&api_key)]);
            table.add_row(vec![Cell::new("OMDb URL"), Cell::new(&config.omdb.base_url)]);
            table.add_row(vec![Cell::new("Timeout"), Cell::new(format!("{}s", config.omdb.timeout_secs))]);
            table.add_row(vec![Cell::new("Min query length"), Cell::new(config.search.min_query_len)]);
            table.add_row(vec![Cell::new("Storage key"), Cell::new(&config.storage.key)]);
            table.add_row(vec![Cell::new("Storage dir"), Cell::new(storage_dir.display().to_string())]);
            println!("{}", table);

            if !config.is_api_key_configured() {
                println!(
                    "{} Run {} or set {}",
                    "→".bright_cyan(),
                    "popcorn config api-key".bold(),
                    API_KEY_ENV
                );
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "exists": exists,
                "omdb": {
                    "api_key": api_key,
                    "base_url": config.omdb.base_url,
                    "timeout_secs": config.omdb.timeout_secs,
                },
                "search": { "min_query_len": config.search.min_query_len },
                "storage": {
                    "key": config.storage.key,
                    "dir": storage_dir.display().to_string(),
                },
            }));
        }
    }
    Ok(())
}

fn init_config(session: &Session, force: bool, output: &Output) -> Result<()> {
    let config_file = session.config_file().to_path_buf();
    if config_file.exists() && !force {
        output.warn(format!("Configuration already exists at: {}", config_file.display()));
        output.info("Use --force to overwrite it");
        return Ok(());
    }

    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write config to {}: {}", config_file.display(), e))?;
    output.success(format!("Configuration written to {}", config_file.display()));
    Ok(())
}

fn configure_api_key(session: &Session, key: Option<String>, output: &Output) -> Result<()> {
    let config_file = session.config_file().to_path_buf();
    let mut config = if config_file.exists() {
        Config::load_from_file(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?
    } else {
        Config::default()
    };

    if config.is_api_key_configured() && key.is_none()
        && !prompts::prompt_yes_no("An API key is already configured. Replace it?", false)?
    {
        output.info("API key unchanged");
        return Ok(());
    }

    let key = match key {
        Some(key) => key,
        None => prompts::prompt_password("OMDb API key")?,
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(eyre!("API key cannot be empty"));
    }

    config.omdb.api_key = key;
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write config to {}: {}", config_file.display(), e))?;
    output.success(format!("API key saved to {}", config_file.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_prefix() {
        assert_eq!(mask("abcd1234"), "ab******");
        assert_eq!(mask("ab"), "ab");
    }
}
