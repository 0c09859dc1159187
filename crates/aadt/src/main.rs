use std::path::{Path, PathBuf};

use aadt_core::config::AadtConfig;
use aadt_core::parser::RepairDialect;
use aadt_core::{pipeline, report, ReportFormat, TrafficReport};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_FILE: &str = "aadt.toml";

#[derive(Parser, Debug)]
#[command(author, version, about = "Repair AADT count exports and project future traffic", long_about = None)]
struct Cli {
    /// TOML settings file (defaults to ./aadt.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Repair a raw count export so every row is labelled and full width
    Repair(RepairArgs),
    /// Project future counts from a repaired file and print the report
    Extrapolate(ExtrapolateArgs),
    /// Repair the export, then extrapolate the repaired file
    Run(RunArgs),
}

#[derive(Args, Debug, Default)]
struct RepairArgs {
    /// Raw export to repair
    #[arg(long)]
    input: Option<PathBuf>,
    /// Where to write the repaired file
    #[arg(long)]
    output: Option<PathBuf>,
    /// Repaired file layout: csv or tsv
    #[arg(long, value_parser = parse_dialect)]
    dialect: Option<RepairDialect>,
}

#[derive(Args, Debug, Default)]
struct ProjectionArgs {
    /// Annual growth factor applied to the latest known count
    #[arg(long)]
    growth_factor: Option<f64>,
    /// Number of years to project
    #[arg(long)]
    projected_years: Option<usize>,
    /// Report format: text, table or json
    #[arg(long, value_parser = parse_format)]
    format: Option<ReportFormat>,
}

#[derive(Args, Debug, Default)]
struct ExtrapolateArgs {
    /// Repaired file to read
    #[arg(long)]
    input: Option<PathBuf>,
    /// Layout of the repaired file: csv or tsv
    #[arg(long, value_parser = parse_dialect)]
    dialect: Option<RepairDialect>,
    #[command(flatten)]
    projection: ProjectionArgs,
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    #[command(flatten)]
    repair: RepairArgs,
    #[command(flatten)]
    projection: ProjectionArgs,
}

fn parse_dialect(value: &str) -> std::result::Result<RepairDialect, String> {
    RepairDialect::try_from(value)
}

fn parse_format(value: &str) -> std::result::Result<ReportFormat, String> {
    ReportFormat::try_from(value)
}

impl RepairArgs {
    fn apply(self, config: &mut AadtConfig) {
        if let Some(input) = self.input {
            config.repair.input = input;
        }
        if let Some(output) = self.output {
            config.repair.output = output;
        }
        if let Some(dialect) = self.dialect {
            config.repair.dialect = dialect;
        }
    }
}

impl ProjectionArgs {
    fn apply(self, config: &mut AadtConfig) {
        if let Some(growth_factor) = self.growth_factor {
            config.extrapolate.growth_factor = growth_factor;
        }
        if let Some(projected_years) = self.projected_years {
            config.extrapolate.projected_years = projected_years;
        }
        if let Some(format) = self.format {
            config.extrapolate.format = format;
        }
    }
}

impl ExtrapolateArgs {
    fn apply(self, config: &mut AadtConfig) {
        if let Some(input) = self.input {
            config.extrapolate.input = Some(input);
        }
        if let Some(dialect) = self.dialect {
            config.repair.dialect = dialect;
        }
        self.projection.apply(config);
    }
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Repair(args) => {
            args.apply(&mut config);
            let summary = pipeline::run_repair(&config).with_context(|| {
                format!("failed to repair '{}'", config.repair.input.display())
            })?;
            info!(
                records = summary.records,
                trailing_cells_dropped = summary.trailing_cells_dropped,
                "Repair finished"
            );
            Ok(())
        }
        Command::Extrapolate(args) => {
            args.apply(&mut config);
            let report = pipeline::run_extrapolation(&config).with_context(|| {
                format!("failed to extrapolate '{}'", config.extrapolate_input().display())
            })?;
            print_report(&report, config.extrapolate.format)
        }
        Command::Run(args) => {
            args.repair.apply(&mut config);
            args.projection.apply(&mut config);
            let (_, report) = pipeline::run(&config).context("AADT pipeline failed")?;
            print_report(&report, config.extrapolate.format)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AadtConfig> {
    match path {
        Some(path) => AadtConfig::load(path)
            .with_context(|| format!("failed to load config '{}'", path.display())),
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            info!(path = DEFAULT_CONFIG_FILE, "Using config from working directory");
            AadtConfig::load(Path::new(DEFAULT_CONFIG_FILE))
                .with_context(|| format!("failed to load config '{DEFAULT_CONFIG_FILE}'"))
        }
        None => Ok(AadtConfig::default()),
    }
}

fn print_report(report: &TrafficReport, format: ReportFormat) -> Result<()> {
    let rendered = report::render(report, format).context("failed to render report")?;
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    Ok(())
}
