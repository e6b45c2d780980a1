use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, save_config, Config};
use crate::priority::{FactorDefaults, PriorityConfig};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Accept only absolute http(s) URLs.
fn validate_api_url(s: &str) -> Result<(), String> {
    let url = reqwest::Url::parse(s.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}

/// Config written when the user accepts every default.
pub fn starter_config(api_url: String) -> Config {
    Config {
        api_url: Some(api_url),
        timeout: Some("15s".to_string()),
        priority: Some(PriorityConfig {
            prefer_budget: Some(true),
            service_values: None,
            defaults: Some(FactorDefaults {
                business_type: Some("Individual".to_string()),
                response_urgency: Some("normal".to_string()),
                customer_history: Some("new".to_string()),
                service_complexity: Some("medium".to_string()),
            }),
        }),
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("leaddesk configuration");
    println!("======================");
    println!();

    let api_url = loop {
        let input = prompt_with_default("Backend API URL", "http://localhost:5000")?;
        match validate_api_url(&input) {
            Ok(()) => break input.trim().trim_end_matches('/').to_string(),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    let mut config = starter_config(api_url);

    println!();
    println!("Leads are scored by their stated budget when they give one.");
    let prefer_budget = prompt_yes_no("Score leads by budget?", true)?;
    if let Some(priority) = config.priority.as_mut() {
        priority.prefer_budget = Some(prefer_budget);
    }

    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    save_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `leaddesk` to see the dashboard.");

    Ok(())
}
