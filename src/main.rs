//! slidefx CLI - slider-driven convolution filters
//!
//! Runs the demo sequence headlessly: initial trackbar positions come from
//! a TOML config and `--set` overrides instead of a GUI.

use anyhow::{bail, Context, Result};
use slidefx::app::{self, Session};
use slidefx::config::AppConfig;
use slidefx::prelude::*;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("slidefx");

    match args.get(1).map(String::as_str) {
        None => run(&[], false),
        Some("run") => run(&args[2..], false),
        Some("edges") => run(&args[2..], true),
        Some("list") => list_filters(args.iter().any(|a| a == "--json")),
        Some("info") => match args.get(2) {
            Some(id) => filter_info(id, args.iter().any(|a| a == "--json")),
            None => bail!("Please specify a filter ID"),
        },
        Some("help" | "--help" | "-h") => {
            print_usage(program);
            Ok(())
        }
        Some(other) => {
            print_usage(program);
            bail!("Unknown command: {}", other)
        }
    }
}

fn print_usage(program: &str) {
    println!("slidefx v{}", slidefx::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  run [config.toml] [--set name=value]...   Run the filter windows (default)");
    println!("  edges [config.toml] [--set name=value]... Run with the edge preview enabled");
    println!("  list [--json]                             List all available filters");
    println!("  info <filter> [--json]                    Show detailed info about a filter");
    println!("  help                                      Show this help message");
    println!();
    println!("Overrides:");
    println!("  --set enhance=<0-100>        Enhancement intensity");
    println!("  --set emboss=<0-7>           Emboss intensity");
    println!("  --set kernel_size=<0-2>      Kernel size selector (3x3, 5x5, 7x7)");
    println!("  --set edges.<name>=<value>   Edge trackbar: sigma, threshold1, threshold2,");
    println!("                               aperture, l2_gradient");
}

fn run(args: &[String], edges: bool) -> Result<()> {
    let config = parse_run_args(args, edges)?;

    let session = match &config.preview_dir {
        Some(dir) => {
            let mut display = Tee(HeadlessDisplay::new(), PreviewDirDisplay::new(dir.clone()));
            app::run(&config, &mut display)
        }
        None => app::run(&config, &mut HeadlessDisplay::new()),
    }
    .inspect_err(|err| {
        if let Some(fix) = err.suggested_fix() {
            eprintln!("hint: {}", fix);
        }
    })
    .with_context(|| format!("Failed to run filters on {}", config.input.display()))?;

    report(&session);
    Ok(())
}

fn parse_run_args(args: &[String], edges: bool) -> Result<AppConfig> {
    let mut config_path: Option<&str> = None;
    let mut overrides: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--set" => {
                let Some(assignment) = args.get(i + 1) else {
                    bail!("--set needs a name=value argument");
                };
                overrides.push(assignment);
                i += 2;
            }
            flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
            path if config_path.is_none() => {
                config_path = Some(path);
                i += 1;
            }
            extra => bail!("Unexpected argument: {}", extra),
        }
    }

    let mut config = match config_path {
        Some(path) => AppConfig::from_file(Path::new(path))
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => AppConfig::default(),
    };
    config.edges.enabled |= edges;

    for assignment in overrides {
        config
            .apply_override(assignment)
            .with_context(|| format!("Invalid override '{}'", assignment))?;
    }
    Ok(config)
}

fn report(session: &Session) {
    let mut windows = Vec::new();
    if let Some(edges) = &session.edges {
        windows.push(edges);
    }
    windows.push(&session.effects);

    for window in windows {
        println!("{}", window.name());
        for trackbar in window.trackbars() {
            println!("  {:<14} {:>3} / {}", trackbar.label, trackbar.value, trackbar.max);
        }
    }
}

fn list_filters(json: bool) -> Result<()> {
    let registry = FilterRegistry::with_builtins();
    if json {
        println!("{}", registry.to_json().context("Failed to serialize filter metadata")?);
        return Ok(());
    }

    let grouped = registry.grouped_by_category();

    println!("Available filters ({} total):", registry.len());
    println!();

    for (category, filters) in grouped {
        println!("  {}", category.display_name());
        for metadata in filters {
            println!("      • {} - {}", metadata.id, metadata.description);
        }
        println!();
    }
    Ok(())
}

fn filter_info(filter_id: &str, json: bool) -> Result<()> {
    let registry = FilterRegistry::with_builtins();
    let Some(metadata) = registry.get_metadata(filter_id) else {
        bail!("Filter not found: {} (use 'list' to see available filters)", filter_id);
    };
    if json {
        println!("{}", serde_json::to_string_pretty(metadata)?);
        return Ok(());
    }

    println!("Filter: {}", metadata.name);
    println!("ID: {}", metadata.id);
    println!("Category: {}", metadata.category.display_name());
    println!("Version: {}", metadata.version);
    println!();
    println!("Description:");
    println!("  {}", metadata.description);
    println!();

    if !metadata.inputs.is_empty() {
        println!("Inputs:");
        for port in &metadata.inputs {
            println!("  • {} [{}]", port.name, port.port_type);
            if !port.description.is_empty() {
                println!("    {}", port.description);
            }
        }
        println!();
    }

    if !metadata.outputs.is_empty() {
        println!("Outputs:");
        for port in &metadata.outputs {
            println!("  • {} [{}]", port.name, port.port_type);
            if !port.description.is_empty() {
                println!("    {}", port.description);
            }
        }
        println!();
    }

    if !metadata.parameters.is_empty() {
        println!("Parameters:");
        for param in &metadata.parameters {
            match param.slider_range() {
                Some((min, max)) => println!(
                    "  • {} \"{}\" slider {}..={} = {}",
                    param.name, param.display_name, min, max, param.default_value
                ),
                None => println!("  • {} [{}] = {}", param.name, param.param_type, param.default_value),
            }
            if !param.description.is_empty() {
                println!("    {}", param.description);
            }
        }
    }
    Ok(())
}
