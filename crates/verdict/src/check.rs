//! Check command implementation

use std::time::Duration;

use anyhow::{Result, bail};
use camino::Utf8PathBuf;
use verdict_core::{CheckerSettings, run_check};

use crate::cli::{CheckArgs, OutputFormat};
use crate::config::load_config;
use crate::output::{SerializableDiagnostic, print_diagnostic};
use crate::process::ProcessInvoker;
use crate::project;
use crate::sink::CollectedDiagnostics;

pub fn run_once(args: CheckArgs, config_path: Option<Utf8PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_ref())?;
    let checker = config.map(|c| c.checker).unwrap_or_default();

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    let sink = check_file(&args.file, args.bin.as_deref(), &args.extra_args, &checker)?;
    let found = sink.total();

    match format {
        OutputFormat::Human => {
            for (file, diagnostics) in sink.files() {
                for diag in diagnostics {
                    print_diagnostic(file, diag);
                }
            }
        }
        OutputFormat::Json => {
            let out: Vec<SerializableDiagnostic> = sink
                .files()
                .iter()
                .flat_map(|(file, diagnostics)| {
                    diagnostics
                        .iter()
                        .map(|d| SerializableDiagnostic::new(file, d))
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    if found > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Run the pipeline once for `file` and return the collected batch.
pub fn check_file(
    file: &Utf8PathBuf,
    bin_override: Option<&str>,
    extra_args: &[String],
    checker: &CheckerSettings,
) -> Result<CollectedDiagnostics> {
    let Some(bin) = bin_override
        .map(ToString::to_string)
        .or_else(|| checker.command.clone())
    else {
        bail!("no checker configured - set [checker].command in .verdict.toml or pass --bin");
    };

    let mut user_args = checker.effective_args();
    user_args.extend_from_slice(extra_args);

    let cwd = project::root_for(file);
    let active_file = verdict_core::paths::resolve(&cwd, file.as_str());

    tracing::debug!("checking {active_file} with '{bin}' in {cwd}");

    let invoker = ProcessInvoker::new(Duration::from_millis(checker.effective_timeout_ms()));
    let mut sink = CollectedDiagnostics::new();
    run_check(&invoker, &mut sink, &bin, &user_args, &cwd, &active_file);

    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_checker_command_is_an_error() {
        let checker = CheckerSettings::default();
        let err = check_file(&Utf8PathBuf::from("src/main.x"), None, &[], &checker)
            .unwrap_err()
            .to_string();
        assert!(err.contains("no checker configured"));
    }

    #[test]
    fn missing_binary_degrades_to_clean_run() {
        // Startup failures never error out of the pipeline; the triggering
        // file is explicitly cleared instead.
        let checker = CheckerSettings {
            command: Some("definitely-not-a-real-binary-4521".to_string()),
            ..Default::default()
        };
        let sink = check_file(&Utf8PathBuf::from("src/main.x"), None, &[], &checker).unwrap();
        assert_eq!(sink.total(), 0);
        assert_eq!(sink.files().len(), 1);
    }
}
