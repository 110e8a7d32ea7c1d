//! SENTINEL - Ensemble Fraud Scoring CLI
//!
//! The main entry point for sentinel, handling:
//! - Scoring a response from a JSON request
//! - Inspecting and validating the scoring configuration
//! - Stand-alone interval, voting and calibration utilities
//! - JSON Schema and shell completion generation

use clap::{Args, CommandFactory, Parser, Subcommand};
use sentinel_common::{
    format_error_human, Detector, Error, ErrorCategory, OutputFormat, StructuredError,
    SCHEMA_VERSION,
};
use sentinel_core::calibrate::{interval_for, vote, CalibrationCurve, Estimate, VotingMethod};
use sentinel_core::config::{
    load_config, validate_survey_config, ConfigError, ResolvedConfig, SurveyThresholdConfig,
};
use sentinel_core::exit_codes::ExitCode;
use sentinel_core::logging::{
    event_names, generate_run_id, get_host_id, init_logging, verbosity, LogConfig, LogContext,
    LogFormat, Stage,
};
use sentinel_core::{log_event, score_response, EnsembleScoreResult, ScoreRequest};
use sentinel_math::ConfidenceLevel;
use serde::Serialize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// SENTINEL - Bayesian ensemble fraud scoring for survey responses
#[derive(Parser)]
#[command(name = "sentinel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Scoring config file (JSON or TOML); SENTINEL_CONFIG is used when absent
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one response
    Score(ScoreArgs),

    /// Print the threshold tables in effect
    Thresholds(ThresholdsArgs),

    /// Resolve and validate configuration
    Check,

    /// Wilson-score interval for a probability
    Interval(IntervalArgs),

    /// Combine independent probability estimates
    Vote(VoteArgs),

    /// Map a raw score through a calibration curve
    Calibrate(CalibrateArgs),

    /// Print the JSON Schema of the scoring result
    Schema,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Score request JSON ("-" or absent reads stdin)
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Override the request's prior fraud rate
    #[arg(long)]
    prior: Option<f64>,

    /// Survey threshold config JSON, replacing the request's
    #[arg(long)]
    survey_config: Option<PathBuf>,

    /// Calibration curve JSON, replacing the request's
    #[arg(long)]
    calibration: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ThresholdsArgs {
    /// Only print this detector's table
    #[arg(long)]
    detector: Option<Detector>,
}

#[derive(Args, Debug)]
struct IntervalArgs {
    /// Probability in [0,1]
    #[arg(long)]
    p: f64,

    /// Sample size (raised to 10 when smaller)
    #[arg(long)]
    n: f64,

    /// Confidence level: 90, 95 or 99
    #[arg(long, default_value = "95")]
    level: ConfidenceLevel,
}

#[derive(Args, Debug)]
struct VoteArgs {
    /// JSON array of {probability, confidence} estimates
    #[arg(long, short)]
    input: PathBuf,

    #[arg(long, value_enum, default_value_t = VotingMethod::Weighted)]
    method: VotingMethod,
}

#[derive(Args, Debug)]
struct CalibrateArgs {
    /// JSON array of {predicted, actual} points
    #[arg(long)]
    curve: PathBuf,

    /// Raw score to calibrate
    score: f64,
}

fn main() {
    let cli = Cli::parse();

    init_logging(&LogConfig::from_env(
        verbosity(cli.global.verbose, cli.global.quiet),
        cli.global.log_format,
    ));

    let ctx = LogContext::new(generate_run_id(), get_host_id());

    let exit_code = match &cli.command {
        Commands::Score(args) => run_score(&cli.global, &ctx, args),
        Commands::Thresholds(args) => run_thresholds(&cli.global, &ctx, args),
        Commands::Check => run_check(&cli.global, &ctx),
        Commands::Interval(args) => run_interval(&cli.global, &ctx, args),
        Commands::Vote(args) => run_vote(&cli.global, &ctx, args),
        Commands::Calibrate(args) => run_calibrate(&cli.global, &ctx, args),
        Commands::Schema => run_schema(),
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(*shell, &mut command, "sentinel", &mut std::io::stdout());
            ExitCode::Clean
        }
        Commands::Version => print_version(&cli.global),
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_score(global: &GlobalOpts, ctx: &LogContext, args: &ScoreArgs) -> ExitCode {
    let resolved = match load_config(global.config.as_deref()) {
        Ok(resolved) => resolved,
        Err(e) => return output_config_error(global, ctx, &e),
    };

    let mut request = match read_request(args) {
        Ok(request) => request,
        Err(e) => return output_error(global, ctx, &e),
    };

    if let Some(prior) = args.prior {
        request.prior_fraud_rate = Some(prior);
    }
    if let Some(path) = &args.survey_config {
        match read_survey_config(path) {
            Ok(survey) => request.survey_threshold_config = Some(survey),
            Err(e) => return output_error(global, ctx, &e),
        }
    }
    if let Some(path) = &args.calibration {
        match read_curve(path) {
            Ok(curve) => request.calibration_curve = Some(curve),
            Err(e) => return output_error(global, ctx, &e),
        }
    }

    let result = score_response(&request, &resolved.config);
    let ctx = ctx.clone().with_assessment_id(result.assessment_id.as_str());
    log_event!(
        ctx,
        INFO,
        event_names::SCORE_FINISHED,
        Stage::Report,
        "response scored",
        fraud_score = result.fraud_score,
        risk_level = result.risk_level.as_str(),
        action = result.decision.action.as_str()
    );

    let printed = match global.format {
        OutputFormat::Json => print_json(&result),
        OutputFormat::Summary => {
            print!("{}", render_score_summary(&result));
            ExitCode::Clean
        }
        OutputFormat::Md => {
            print!("{}", render_score_markdown(&result));
            ExitCode::Clean
        }
    };
    if printed != ExitCode::Clean {
        return printed;
    }

    ExitCode::for_action(result.decision.action)
}

fn run_thresholds(global: &GlobalOpts, ctx: &LogContext, args: &ThresholdsArgs) -> ExitCode {
    let resolved = match load_config(global.config.as_deref()) {
        Ok(resolved) => resolved,
        Err(e) => return output_config_error(global, ctx, &e),
    };
    let config = &resolved.config;

    let detectors: Vec<Detector> = match args.detector {
        Some(detector) => vec![detector],
        None => Detector::ALL.to_vec(),
    };

    match global.format {
        OutputFormat::Json => {
            let tables: serde_json::Map<String, serde_json::Value> = detectors
                .iter()
                .map(|&d| {
                    let profile = config.detectors.get(d);
                    let value = serde_json::json!({
                        "label": profile.label,
                        "base_weight": profile.base_weight,
                        "likelihood": profile.likelihood,
                        "observed_above": profile.observed_above,
                        "bands": profile.bands,
                    });
                    (d.as_str().to_string(), value)
                })
                .collect();
            let mut response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "model_version": config.model_version,
                "detectors": tables,
            });
            if args.detector.is_none() {
                response["ensemble_bands"] = serde_json::json!(config.ensemble_bands);
            }
            print_json(&response)
        }
        OutputFormat::Summary => {
            if args.detector.is_none() {
                for band in &config.ensemble_bands {
                    println!(
                        "ensemble {:<11} [{:.2}, {:.2}) {:<8} {:<6} floor {:.2}",
                        band.name, band.min, band.max, band.risk_level, band.action, band.confidence_floor
                    );
                }
            }
            for d in detectors {
                let profile = config.detectors.get(d);
                for band in &profile.bands {
                    println!(
                        "{:<18} [{:.2}, {:.2}) {:<8} floor {:.2}  {}",
                        d, band.min, band.max, band.risk_level, band.confidence_floor, band.description
                    );
                }
            }
            ExitCode::Clean
        }
        OutputFormat::Md => {
            println!("# Threshold Tables");
            if args.detector.is_none() {
                println!();
                println!("## Ensemble");
                println!();
                println!("| Band | Range | Risk | Action | Confidence floor |");
                println!("|---|---|---|---|---|");
                for band in &config.ensemble_bands {
                    println!(
                        "| {} | {:.2} - {:.2} | {} | {} | {:.2} |",
                        band.name, band.min, band.max, band.risk_level, band.action, band.confidence_floor
                    );
                }
            }
            for d in detectors {
                let profile = config.detectors.get(d);
                println!();
                println!("## {} (`{}`)", profile.label, d);
                println!();
                println!("| Range | Risk | Confidence floor | Description |");
                println!("|---|---|---|---|");
                for band in &profile.bands {
                    println!(
                        "| {:.2} - {:.2} | {} | {:.2} | {} |",
                        band.min, band.max, band.risk_level, band.confidence_floor, band.description
                    );
                }
            }
            ExitCode::Clean
        }
    }
}

fn run_check(global: &GlobalOpts, ctx: &LogContext) -> ExitCode {
    let resolved = match load_config(global.config.as_deref()) {
        Ok(resolved) => resolved,
        Err(e) => return output_config_error(global, ctx, &e),
    };
    let snapshot = resolved.snapshot();

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "valid",
                "using_defaults": resolved.using_defaults(),
                "config": snapshot,
            });
            print_json(&response)
        }
        OutputFormat::Summary => {
            println!(
                "config check: OK ({}, {})",
                describe_source(&resolved),
                snapshot.short_id()
            );
            ExitCode::Clean
        }
        OutputFormat::Md => {
            println!("# Configuration Check");
            println!();
            println!("Status: valid");
            println!("Source: {}", describe_source(&resolved));
            println!("Hash: `{}`", snapshot.hash);
            println!("Model version: {}", snapshot.summary.model_version);
            println!("Default prior: {:.2}", snapshot.summary.default_prior);
            println!("Likely-fraud cutoff: {:.2}", snapshot.summary.likely_fraud_cutoff);
            println!("Ensemble bands: {}", snapshot.summary.ensemble_band_count);
            ExitCode::Clean
        }
    }
}

fn run_interval(global: &GlobalOpts, ctx: &LogContext, args: &IntervalArgs) -> ExitCode {
    if !(0.0..=1.0).contains(&args.p) {
        let err = Error::InvalidRequest(format!("--p must lie in [0,1], got {}", args.p));
        return output_error(global, ctx, &err);
    }
    let interval = interval_for(args.p, args.n, args.level);

    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "p": args.p,
            "interval": interval,
        })),
        _ => {
            println!(
                "{:.4} in [{:.4}, {:.4}] at {}% (n = {}, width {:.4})",
                args.p, interval.lower, interval.upper, interval.level, interval.sample_size, interval.width
            );
            ExitCode::Clean
        }
    }
}

fn run_vote(global: &GlobalOpts, ctx: &LogContext, args: &VoteArgs) -> ExitCode {
    let estimates: Vec<Estimate> = match read_json_file(&args.input, Error::InvalidRequest) {
        Ok(estimates) => estimates,
        Err(e) => return output_error(global, ctx, &e),
    };
    let result = vote(&estimates, args.method);

    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "method": args.method,
            "estimates": estimates.len(),
            "probability": result.probability,
            "confidence": result.confidence,
        })),
        _ => {
            println!(
                "{} vote over {} estimates: probability {:.4}, confidence {:.4}",
                args.method,
                estimates.len(),
                result.probability,
                result.confidence
            );
            ExitCode::Clean
        }
    }
}

fn run_calibrate(global: &GlobalOpts, ctx: &LogContext, args: &CalibrateArgs) -> ExitCode {
    let curve = match read_curve(&args.curve) {
        Ok(curve) => curve,
        Err(e) => return output_error(global, ctx, &e),
    };
    let calibrated = curve.apply(args.score);

    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "raw": args.score,
            "calibrated": calibrated,
            "points": curve.points().len(),
        })),
        _ => {
            println!("{:.4} -> {:.4}", args.score, calibrated);
            ExitCode::Clean
        }
    }
}

fn run_schema() -> ExitCode {
    let schema = schemars::schema_for!(EnsembleScoreResult);
    print_json(&schema)
}

fn print_version(global: &GlobalOpts) -> ExitCode {
    let config = sentinel_core::config::ScoringConfig::default();
    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "schema_version": SCHEMA_VERSION,
            "sentinel_version": env!("CARGO_PKG_VERSION"),
            "model_version": config.model_version,
            "rust_version": env!("CARGO_PKG_RUST_VERSION"),
        })),
        _ => {
            println!("sentinel {}", env!("CARGO_PKG_VERSION"));
            println!("model version: {}", config.model_version);
            println!("schema version: {}", SCHEMA_VERSION);
            ExitCode::Clean
        }
    }
}

// ============================================================================
// Input helpers
// ============================================================================

fn read_text(path: Option<&Path>) -> Result<String, Error> {
    match path {
        None => Ok(std::io::read_to_string(std::io::stdin())?),
        Some(p) if p.as_os_str() == "-" => Ok(std::io::read_to_string(std::io::stdin())?),
        Some(p) => Ok(std::fs::read_to_string(p)?),
    }
}

fn read_json_file<T>(path: &Path, invalid: fn(String) -> Error) -> Result<T, Error>
where
    T: serde::de::DeserializeOwned,
{
    let text = read_text(Some(path))?;
    serde_json::from_str(&text).map_err(|e| invalid(format!("{}: {}", path.display(), e)))
}

fn read_request(args: &ScoreArgs) -> Result<ScoreRequest, Error> {
    let text = read_text(args.input.as_deref())?;
    ScoreRequest::from_json(&text)
}

fn read_survey_config(path: &Path) -> Result<SurveyThresholdConfig, Error> {
    let survey: SurveyThresholdConfig = read_json_file(path, Error::InvalidSurveyConfig)?;
    validate_survey_config(&survey).map_err(|e| Error::InvalidSurveyConfig(e.to_string()))?;
    Ok(survey)
}

fn read_curve(path: &Path) -> Result<CalibrationCurve, Error> {
    let curve: CalibrationCurve = read_json_file(path, Error::InvalidCurve)?;
    if curve.is_empty() {
        return Err(Error::InvalidCurve(format!(
            "{}: no finite calibration points",
            path.display()
        )));
    }
    Ok(curve)
}

fn describe_source(resolved: &ResolvedConfig) -> String {
    match resolved.path() {
        Some(path) => format!("{} via {}", path.display(), resolved.paths.source),
        None => "built-in defaults".to_string(),
    }
}

// ============================================================================
// Output helpers
// ============================================================================

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::Clean
        }
        Err(e) => {
            let err = Error::Internal(format!("failed to serialize output: {e}"));
            eprintln!("{}", StructuredError::from(&err).to_json());
            ExitCode::InternalError
        }
    }
}

fn render_score_summary(result: &EnsembleScoreResult) -> String {
    let ci = &result.confidence_interval;
    let mut out = format!(
        "[{}] {} risk, action {}: fraud score {:.1}% (CI {:.1}%-{:.1}%, confidence {:.0}%)\n",
        result.assessment_id,
        result.risk_level.as_str().to_uppercase(),
        result.decision.action,
        result.fraud_score * 100.0,
        ci.lower * 100.0,
        ci.upper * 100.0,
        result.confidence * 100.0
    );
    for factor in &result.reasoning.key_factors {
        out.push_str(&format!("  {}\n", factor));
    }
    out.push_str(&result.reasoning.recommendation);
    out.push('\n');
    out
}

fn render_score_markdown(result: &EnsembleScoreResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Fraud Assessment `{}`\n\n", result.assessment_id));
    out.push_str("| Field | Value |\n|---|---|\n");
    out.push_str(&format!("| Fraud score | {:.1}% |\n", result.fraud_score * 100.0));
    if let Some(raw) = result.raw_score {
        out.push_str(&format!("| Raw posterior | {:.1}% |\n", raw * 100.0));
    }
    out.push_str(&format!("| Risk level | {} |\n", result.risk_level));
    out.push_str(&format!("| Action | {} |\n", result.decision.action));
    out.push_str(&format!("| Band | {} |\n", result.decision.band));
    out.push_str(&format!("| Confidence | {:.0}% |\n", result.confidence * 100.0));
    out.push_str(&format!(
        "| {}% interval | {:.1}% - {:.1}% |\n",
        result.confidence_interval.level,
        result.confidence_interval.lower * 100.0,
        result.confidence_interval.upper * 100.0
    ));
    out.push_str(&format!("| Likely fraud | {} |\n", result.is_likely_fraud));
    if let Some(survey) = &result.survey_id {
        out.push_str(&format!("| Survey | {} |\n", survey));
    }
    if let Some(reason) = &result.decision.override_reason {
        out.push_str(&format!("| Override | {} |\n", reason));
    }

    out.push_str("\n## Summary\n\n```text\n");
    out.push_str(&result.reasoning.summary);
    out.push_str("\n```\n");

    let sections = [
        ("Key factors", &result.reasoning.key_factors),
        ("Mitigating factors", &result.reasoning.mitigating_factors),
        ("Alternative explanations", &result.reasoning.alternative_explanations),
    ];
    for (title, items) in sections {
        if items.is_empty() {
            continue;
        }
        out.push_str(&format!("\n## {}\n\n", title));
        for item in items {
            out.push_str(&format!("- {}\n", item));
        }
    }

    out.push_str("\n## Bayesian trace\n\n");
    out.push_str(&result.bayesian_analysis.reasoning_text);
    out.push_str("\n\n## Recommendation\n\n");
    out.push_str(&result.reasoning.recommendation);
    out.push('\n');
    out
}

// ============================================================================
// Error output
// ============================================================================

fn exit_code_for(err: &Error) -> ExitCode {
    match err.category() {
        ErrorCategory::Config => ExitCode::ConfigError,
        ErrorCategory::Input => ExitCode::ArgsError,
        ErrorCategory::Io => ExitCode::IoError,
        ErrorCategory::Internal => ExitCode::InternalError,
    }
}

/// Output an error in the appropriate format.
fn output_error(global: &GlobalOpts, ctx: &LogContext, err: &Error) -> ExitCode {
    let exit_code = exit_code_for(err);
    // Event targets must be constants.
    match exit_code {
        ExitCode::ConfigError => log_event!(
            ctx,
            WARN,
            event_names::CONFIG_ERROR,
            Stage::Init,
            "command failed",
            code = err.code()
        ),
        ExitCode::InternalError => log_event!(
            ctx,
            ERROR,
            event_names::INTERNAL_ERROR,
            Stage::Init,
            "command failed",
            code = err.code()
        ),
        _ => log_event!(
            ctx,
            WARN,
            event_names::INPUT_REJECTED,
            Stage::Init,
            "command failed",
            code = err.code(),
            exit_code = exit_code.as_i32()
        ),
    }

    match global.format {
        OutputFormat::Json => {
            let structured = StructuredError::from(err);
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "error",
                "error": structured,
            });
            match serde_json::to_string_pretty(&response) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", structured.to_json()),
            }
        }
        _ => {
            eprintln!("{}", format_error_human(err, std::io::stderr().is_terminal()));
        }
    }

    exit_code
}

/// Output a config error in the appropriate format.
fn output_config_error(global: &GlobalOpts, ctx: &LogContext, error: &ConfigError) -> ExitCode {
    let exit_code = match error {
        ConfigError::NotFound { .. }
        | ConfigError::ParseError { .. }
        | ConfigError::ValidationError(_) => ExitCode::ConfigError,
        ConfigError::IoError { .. } => ExitCode::IoError,
    };
    log_event!(
        ctx,
        ERROR,
        event_names::CONFIG_ERROR,
        Stage::Init,
        "configuration rejected",
        error = error.to_string().as_str()
    );

    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "status": "error",
        "error": {
            "code": exit_code.as_i32(),
            "kind": exit_code.code_name(),
            "message": error.to_string(),
        }
    });

    match global.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&response) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("config error: {}", error),
        },
        OutputFormat::Summary => {
            eprintln!("config error: {}", error);
        }
        OutputFormat::Md => {
            eprintln!("# Configuration Error");
            eprintln!();
            eprintln!("Error: {}", error);
        }
    }

    exit_code
}
