//! CLI entry point for the hook scanner.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use hookguard::{
    cli::{Cli, Commands},
    config::{generate_default_config, Config},
    discovery::Discovery,
    reporters::{report, HookReport, OutputFormat},
    Language, RiskLevel, ScanOptions, ScanResult, Scanner,
};
use std::collections::BTreeMap;
use std::io;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    // Load config file if specified, otherwise use defaults
    let base_config = if let Some(ref config_path) = cli.config {
        Config::load(config_path)?
    } else {
        Config::load_default()
    };

    let format: OutputFormat = cli.format.parse().map_err(|e| anyhow::anyhow!("{}", e))?;

    match cli.command {
        Commands::Scan {
            path,
            fail_on,
            output,
            no_syntax,
        } => {
            let fail_on_level = fail_on
                .as_deref()
                .map(str::parse::<RiskLevel>)
                .transpose()
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            let mut config = base_config;
            if no_syntax {
                config.scanner.enable_syntax = false;
            }

            let scanner = Scanner::with_config(config.to_scan_config()?);
            let discovery = Discovery::new(&config.discovery.ignore)?;
            let mut found = discovery.discover(&path)?;

            scanner.scan_hooks(&mut found.hooks);

            let prefix_addresses = found.settings.len() > 1;
            let mut inline: BTreeMap<String, ScanResult> = BTreeMap::new();
            for settings in &found.settings {
                for (address, result) in scanner.scan_configuration_tree(&settings.tree) {
                    let key = if prefix_addresses {
                        format!("{}:{}", settings.label, address)
                    } else {
                        address
                    };
                    inline.insert(key, result);
                }
            }

            let scan_report = HookReport::new(found.hooks, inline);

            // Write output
            if let Some(output_path) = output {
                let mut file = std::fs::File::create(&output_path)?;
                report(&scan_report, format, &mut file)?;
                eprintln!("Report written to: {}", output_path.display());
            } else {
                let mut stdout = io::stdout().lock();
                report(&scan_report, format, &mut stdout)?;
            }

            // Check fail condition
            if let Some(fail_level) = fail_on_level {
                if let Some(max_level) = scan_report.max_risk_level() {
                    if max_level >= fail_level {
                        std::process::exit(1);
                    }
                }
            }
        }

        Commands::Catalog { json } => {
            let scanner = Scanner::with_config(base_config.to_scan_config()?);
            let rules: Vec<_> = scanner
                .catalog()
                .entries()
                .iter()
                .map(|entry| &entry.rule)
                .collect();

            if json || format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&rules)?);
            } else {
                println!("{}", "Detection Catalog".bold().underline());
                for rule in &rules {
                    println!("\n{}", rule.category.to_string().bold());
                    println!("Weight:      {}", rule.weight);
                    println!(
                        "Flag:        {}",
                        rule.category.flag().map(|f| f.as_str()).unwrap_or("-")
                    );
                    println!("Description: {}", rule.description);
                    println!("Pattern:     {}", truncate(&rule.pattern, 80).dimmed());
                }
                println!();
                println!("Total: {} categories", rules.len());
            }
        }

        Commands::Check { text, language } => {
            let language = language
                .as_deref()
                .map(str::parse::<Language>)
                .transpose()
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            let scanner = Scanner::with_config(base_config.to_scan_config()?);
            let options = ScanOptions {
                filename_hint: None,
                language,
            };
            let result = scanner.scan(&text, &options);

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Text => {
                    let level = result.risk_level();
                    let label = format!("{} {}", level.glyph(), level);
                    let label = match level {
                        RiskLevel::Safe => label.green(),
                        RiskLevel::Warning => label.yellow(),
                        RiskLevel::Dangerous => label.red().bold(),
                    };
                    println!("Score: {}", result.score);
                    println!("Level: {}", label);
                    if !result.evidence.is_empty() {
                        println!("{}", "Evidence:".bold());
                        for item in &result.evidence {
                            println!("  - {}", item);
                        }
                    }
                }
            }
        }

        Commands::Init { output } => {
            if output.exists() {
                eprintln!(
                    "{}",
                    format!("Config file already exists: {}", output.display()).yellow()
                );
                eprintln!("Use a different path or remove the existing file.");
                std::process::exit(1);
            }

            std::fs::write(&output, generate_default_config())?;
            println!(
                "{}",
                format!("Created config file: {}", output.display()).green()
            );
            println!("Edit this file to tune category weights and ignored paths.");
        }
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
