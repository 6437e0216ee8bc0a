//! Doctor command - shows bridge status

use camino::Utf8PathBuf;
use std::process::Command;
use verdict_core::args_with_json_format;

use crate::cli::DoctorArgs;
use crate::config::load_config;

pub fn run_doctor(_args: DoctorArgs, config_path: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let config = load_config(config_path.as_ref())?;

    let default_path = Utf8PathBuf::from(".verdict.toml");
    let config_display = config_path.as_ref().unwrap_or(&default_path);
    let config_exists = config_display.exists();

    println!("Bridge Status");
    println!("─────────────");
    println!();

    if config_exists {
        println!("Config: {config_display} (found)");
    } else {
        println!("Config: {config_display} (not found - using defaults)");
    }
    println!();

    let checker = config.map(|c| c.checker).unwrap_or_default();

    match checker.command.as_deref() {
        Some(command) => {
            let available = is_command_available(command);
            let status = if available { "✓" } else { "✗" };
            let state = if available { "available" } else { "not found" };
            println!("Checker: {status} {command} ({state})");
        }
        None => println!("Checker: (none configured - set [checker].command or pass --bin)"),
    }

    let base_args = checker.effective_args();
    let (json_args, injected) = args_with_json_format(&base_args);
    println!("Base args: {}", base_args.join(" "));
    if injected {
        println!("Format negotiation: will inject --format=json, text fallback re-invokes");
    } else {
        println!("Format negotiation: caller controls --format, text fallback reuses output");
    }
    println!("Effective JSON attempt: {}", json_args.join(" "));
    println!("Timeout: {} ms", checker.effective_timeout_ms());

    match checker.extensions.as_ref() {
        Some(exts) if !exts.is_empty() => println!("Watch extensions: {}", exts.join(", ")),
        _ => println!("Watch extensions: (all files)"),
    }

    Ok(())
}

fn is_command_available(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
