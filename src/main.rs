//! PDF Link Remover - CLI Interface
//! Author: kartik4091
//!
//! Command-line front end: writes `no_links_<name>.pdf` next to each input
//! with link annotations, link actions and link text removed.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command, ValueEnum};
use pdf_unlink::utils::{init_logging, LogLevel as FilterLevel, TracingProgress};
use pdf_unlink::{
    CatalogMode, Error, OutputVerifier, Pipeline, ReportConfig, ReportFormat, ReportGenerator, Result, RunSummary,
    Session, StripConfig, StripReport,
};
use tracing::{error, info, warn};

#[derive(Debug, Clone, ValueEnum)]
enum ReportFormatArg {
    /// JSON report (default)
    Json,
    /// YAML report
    Yaml,
    /// Plain text report
    Text,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    /// Error messages only
    Error,
    /// Warning and error messages
    Warn,
    /// Info, warning, and error messages (default)
    Info,
    /// Debug and all messages
    Debug,
    /// Trace and all messages (most verbose)
    Trace,
}

impl From<&LogLevel> for FilterLevel {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => FilterLevel::Error,
            LogLevel::Warn => FilterLevel::Warn,
            LogLevel::Info => FilterLevel::Info,
            LogLevel::Debug => FilterLevel::Debug,
            LogLevel::Trace => FilterLevel::Trace,
        }
    }
}

#[tokio::main]
async fn main() {
    let matches = build_cli().get_matches();

    let log_level = if matches.get_flag("quiet") {
        FilterLevel::Error
    } else {
        matches
            .get_one::<LogLevel>("verbose")
            .map(FilterLevel::from)
            .unwrap_or(FilterLevel::Info)
    };
    init_logging(log_level);

    info!("🚀 PDF Link Remover v{} - Starting...", env!("CARGO_PKG_VERSION"));

    match run(&matches).await {
        Ok(true) => info!("🎉 All files processed successfully!"),
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("❌ {}", e);
            process::exit(1);
        }
    }
}

async fn run(matches: &ArgMatches) -> Result<bool> {
    let inputs: Vec<PathBuf> = matches
        .get_many::<PathBuf>("input")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let output_file = matches.get_one::<PathBuf>("output");
    let output_dir = matches.get_one::<PathBuf>("output-dir");
    let dry_run = matches.get_flag("dry-run");
    let verify = matches.get_flag("verify");

    if output_file.is_some() && inputs.len() > 1 {
        return Err(Error::InvalidInput("--output accepts a single input file".into()));
    }

    let config = build_config(matches)?;
    let pipeline = Arc::new(Pipeline::new(config)?);
    display_config_summary(pipeline.config(), inputs.len(), dry_run);

    let mut summary = RunSummary::new();
    let mut session = Session::new();

    for input in &inputs {
        if dry_run {
            match pipeline.clone().dry_run_in_background(input.clone(), Arc::new(TracingProgress)).await {
                Ok(report) => {
                    info!("🔍 {} (dry run): {}", input.display(), report.summary_line());
                    summary.push_report(report);
                }
                Err(e) => {
                    error!("❌ {}: {}", input.display(), e);
                    summary.push_failure(input, e);
                }
            }
            continue;
        }

        session.reset();
        if let Err(e) = session.select(input) {
            error!("❌ {}", e);
            summary.push_failure(input, e);
            continue;
        }
        if let Some(dir) = output_dir {
            session.set_output_dir(dir);
        }
        if let Some(file) = output_file {
            session.set_output_file(file);
        }

        match session.process(pipeline.clone()).await {
            Ok(report) => {
                if verify {
                    verify_output_file(pipeline.config(), &report);
                }
                summary.push_report(report);
            }
            Err(e) => summary.push_failure(input, e),
        }
    }

    let mut success = summary.is_success();

    if let Some(report_path) = matches.get_one::<PathBuf>("report") {
        info!("📊 Generating processing report...");
        let format = match matches.get_one::<ReportFormatArg>("format") {
            Some(ReportFormatArg::Yaml) => ReportFormat::Yaml,
            Some(ReportFormatArg::Text) => ReportFormat::PlainText,
            _ => ReportFormat::Json,
        };
        let report_config = ReportConfig {
            output_path: report_path.clone(),
            format,
        };
        if let Err(e) = ReportGenerator::generate(&summary, &report_config).await {
            error!("❌ Failed to generate report: {}", e);
            success = false;
        } else {
            info!("📋 Report generated: {}", report_path.display());
        }
    }

    info!(
        "📊 Processed {} file(s), {} failed",
        summary.reports.len(),
        summary.failures.len()
    );
    Ok(success)
}

fn build_config(matches: &ArgMatches) -> Result<StripConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => StripConfig::from_file(path)?,
        None => StripConfig::default(),
    };

    // Override config with CLI arguments
    if let Some(prefix) = matches.get_one::<String>("prefix") {
        config.output_prefix = prefix.clone();
    }
    if matches.get_flag("no-content-scrub") {
        config.scrub_content = false;
    }
    if matches.get_flag("keep-catalog") {
        config.catalog = CatalogMode::Preserve;
    }
    if matches.get_flag("no-prune") {
        config.prune_unreferenced = false;
    }
    if matches.get_flag("compress") {
        config.compress_output = true;
    }
    if matches.get_flag("force") {
        config.overwrite = true;
    }
    if let Some(patterns) = matches.get_many::<String>("pattern") {
        config.extra_patterns.extend(patterns.cloned());
    }

    Ok(config)
}

fn build_cli() -> Command {
    Command::new("pdf-unlink")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Removes hyperlinks, link actions and link text from PDF files")
        .long_about(
            "Writes a copy of each input with page annotations, additional actions, open actions \
             and form dictionaries removed, and with URI, GoTo and web-address text scrubbed from \
             page content streams. The copy is named no_links_<input name> and placed next to \
             the input unless told otherwise.",
        )
        // Input/Output
        .arg(Arg::new("input")
            .value_name("FILE")
            .help("Input PDF file(s)")
            .required(true)
            .num_args(1..)
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("FILE")
            .help("Output PDF file path (single input only)")
            .value_parser(value_parser!(PathBuf))
            .conflicts_with("output-dir"))
        .arg(Arg::new("output-dir")
            .long("output-dir")
            .value_name("DIR")
            .help("Directory for output files instead of the input's directory")
            .value_parser(value_parser!(PathBuf)))
        // Configuration
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .value_name("FILE")
            .help("Configuration file (JSON/YAML)")
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("prefix")
            .long("prefix")
            .value_name("PREFIX")
            .help("Prefix for output file names [default: no_links_]"))
        // Processing options
        .arg(Arg::new("no-content-scrub")
            .long("no-content-scrub")
            .action(ArgAction::SetTrue)
            .help("Only remove dictionary entries; leave content streams alone"))
        .arg(Arg::new("keep-catalog")
            .long("keep-catalog")
            .action(ArgAction::SetTrue)
            .help("Keep the document catalog, removing only its action entries"))
        .arg(Arg::new("no-prune")
            .long("no-prune")
            .action(ArgAction::SetTrue)
            .help("Keep objects that are no longer referenced"))
        .arg(Arg::new("compress")
            .long("compress")
            .action(ArgAction::SetTrue)
            .help("Compress streams in the output"))
        .arg(Arg::new("pattern")
            .long("pattern")
            .value_name("REGEX")
            .action(ArgAction::Append)
            .help("Additional case-insensitive pattern to delete from content streams"))
        // Advanced options
        .arg(Arg::new("force")
            .long("force")
            .action(ArgAction::SetTrue)
            .help("Force overwrite existing output files"))
        .arg(Arg::new("dry-run")
            .long("dry-run")
            .action(ArgAction::SetTrue)
            .help("Show what would be removed without writing files"))
        .arg(Arg::new("verify")
            .long("verify")
            .action(ArgAction::SetTrue)
            .help("Re-read each output file and report leftover links"))
        // Output and reporting
        .arg(Arg::new("report")
            .short('r')
            .long("report")
            .value_name("FILE")
            .help("Write a processing report")
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("format")
            .short('f')
            .long("format")
            .value_parser(value_parser!(ReportFormatArg))
            .default_value("json")
            .help("Report format"))
        // Logging
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .value_parser(value_parser!(LogLevel))
            .default_value("info")
            .help("Set logging verbosity"))
        .arg(Arg::new("quiet")
            .short('q')
            .long("quiet")
            .action(ArgAction::SetTrue)
            .conflicts_with("verbose")
            .help("Suppress all output except errors"))
}

fn display_config_summary(config: &StripConfig, inputs: usize, dry_run: bool) {
    info!("📋 Configuration Summary:");
    info!("   Inputs: {}", inputs);
    info!("   Page keys: {}", config.page_keys.join(", "));
    info!("   Root keys: {}", config.root_keys.join(", "));
    info!("   Content scrub: {}", if config.scrub_content { "on" } else { "off" });
    info!("   Catalog: {:?}", config.catalog);
    info!("   Output prefix: {}", config.output_prefix);
    if dry_run {
        info!("🔍 Dry run mode - no files will be written");
    }
}

fn verify_output_file(config: &StripConfig, report: &StripReport) {
    let Some(output) = &report.output else {
        return;
    };
    info!("🔍 Verifying {}...", output.display());

    let result = OutputVerifier::from_config(config).and_then(|verifier| verifier.verify_file(output));
    match result {
        Ok(verification) if verification.passed => info!("✅ Output file verification passed"),
        Ok(verification) => warn!(
            "⚠️  {} leftover finding(s) in {}",
            verification.issues.len(),
            output.display()
        ),
        Err(e) => warn!("⚠️  Output verification failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let matches = build_cli()
            .try_get_matches_from([
                "pdf-unlink",
                "a.pdf",
                "--prefix",
                "clean_",
                "--keep-catalog",
                "--no-content-scrub",
                "--pattern",
                "www\\.",
                "--force",
            ])
            .unwrap();
        let config = build_config(&matches).unwrap();

        assert_eq!(config.output_prefix, "clean_");
        assert_eq!(config.catalog, CatalogMode::Preserve);
        assert!(!config.scrub_content);
        assert!(config.overwrite);
        assert_eq!(config.extra_patterns, ["www\\."]);
    }

    #[test]
    fn accepts_several_inputs() {
        let matches = build_cli()
            .try_get_matches_from(["pdf-unlink", "a.pdf", "b.pdf", "-f", "text"])
            .unwrap();
        assert_eq!(matches.get_many::<PathBuf>("input").unwrap().count(), 2);
        assert!(matches!(
            matches.get_one::<ReportFormatArg>("format"),
            Some(ReportFormatArg::Text)
        ));
    }

    #[test]
    fn output_conflicts_with_output_dir() {
        let result = build_cli().try_get_matches_from(["pdf-unlink", "a.pdf", "-o", "x.pdf", "--output-dir", "out"]);
        assert!(result.is_err());
    }
}
