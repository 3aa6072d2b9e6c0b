use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();
    print_value("defaults.duration", &format!("{} min", config.duration_minutes()));
    print_value("defaults.theme", config.theme_name());
    print_value("defaults.feed", &config.feed().to_string());
    print_value("defaults.check_updates", &config.check_updates().to_string());
    let pdfium = config
        .pdfium_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(executable dir or system)".to_string());
    print_value("defaults.pdfium_path", &pdfium);
    Ok(())
}

fn print_value(key: &str, value: &str) {
    println!("  {:<24} {}", key.cyan(), value);
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {} = {}",
        "Saved".green().bold(),
        key,
        value.yellow()
    );
    println!("{}", format!("  in {}", path.display()).dimmed());
    Ok(())
}
