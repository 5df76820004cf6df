use crate::server;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use psyrisk_core::config::AppConfig;
use psyrisk_core::error::AppError;
use psyrisk_core::intake::{IntakeLayout, ResponseImporter};
use psyrisk_core::scoring::{BatchReport, ScoringConfig, ScoringEngine, ScoringMode};
use psyrisk_core::telemetry;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "psyrisk",
    about = "Score psychosocial risk surveys into auditable indicator reports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a CSV survey export and write the batch report as JSON
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Survey export to score
    #[arg(long)]
    input: PathBuf,
    /// Scoring configuration (defaults to PSYRISK_SCORING_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where to write the JSON report (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Produce one record per organizational unit instead of per respondent
    #[arg(long)]
    by_unit: bool,
    /// Column holding the respondent id
    #[arg(long, default_value = "id")]
    id_column: String,
    /// Column holding the organizational unit
    #[arg(long, default_value = "unit")]
    unit_column: String,
    /// Column holding the monthly payroll answer
    #[arg(long, default_value = "payroll")]
    payroll_column: String,
    /// Column holding the respondent profile
    #[arg(long, default_value = "profile")]
    profile_column: String,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
    }
}

fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        input,
        config,
        output,
        by_unit,
        id_column,
        unit_column,
        payroll_column,
        profile_column,
    } = args;

    let app_config = AppConfig::load()?;
    telemetry::init(&app_config.telemetry)?;

    let config_path = config.unwrap_or(app_config.scoring.config_path);
    let engine = ScoringEngine::new(ScoringConfig::from_path(&config_path)?);
    let layout = IntakeLayout {
        id_column,
        unit_column,
        payroll_column,
        profile_column,
        ..IntakeLayout::default()
    };

    let rows = ResponseImporter::from_path(&input, &layout, engine.config())?;
    let mode = if by_unit {
        ScoringMode::Unit
    } else {
        ScoringMode::Respondent
    };
    let report = engine.score_batch(&rows, mode, Utc::now());
    let rendered = serde_json::to_string_pretty(&report)?;

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            info!(path = %path.display(), "report written");
            render_summary(&report, mode);
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

fn render_summary(report: &BatchReport, mode: ScoringMode) {
    let subject = match mode {
        ScoringMode::Respondent => "respondent",
        ScoringMode::Unit => "unit",
    };

    println!("Psychosocial risk report ({subject} mode)");
    println!(
        "{} records scored, {} excluded",
        report.records.len(),
        report.exclusions.len()
    );

    if !report.records.is_empty() {
        println!("\nRecords");
        for record in &report.records {
            let indices = record.indices();
            let priority = record.diagnosis().priority.label();
            println!(
                "- {}: risk {:.1} ({}), impact {:.1} ({}), maturity {:.1} ({}), priority {}",
                record.source_id(),
                indices.risk.score,
                indices.risk.status,
                indices.impact.score,
                indices.impact.status,
                indices.maturity.score,
                indices.maturity.band,
                priority
            );
            for combination in record.combinations() {
                println!("    ! {}: {}", combination.id, combination.description);
            }
        }
    }

    if !report.exclusions.is_empty() {
        println!("\nExcluded");
        for exclusion in &report.exclusions {
            println!(
                "- {} [{}]: {}",
                exclusion.source_id, exclusion.kind, exclusion.reason
            );
        }
    }
}
