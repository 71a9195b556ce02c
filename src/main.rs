use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use grab_sheets::aggregate::{self, AggregateOutcome};
use grab_sheets::codec::OUTPUT_DATE_FORMAT;
use grab_sheets::config::{self, AggregateConfig, CopyConfig, DEFAULT_EXTENSION};
use grab_sheets::copy;
use grab_sheets::prompt::{AssumeYes, Confirm, TerminalPrompt};
use grab_sheets::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Copy(args) => execute_copy(args),
        Command::Aggregate(args) => execute_aggregate(args),
    }
}

fn execute_copy(args: CopyArgs) -> Result<()> {
    if !args.data_folder.is_dir() {
        return Err(ToolError::MissingInput(args.data_folder));
    }

    let config = CopyConfig {
        data_folder: args.data_folder,
        start_date: args.start_date,
        end_date: args.end_date.unwrap_or_else(config::today),
        sheet_name: args.sheet_name,
        save_path: args.save_path,
        extension: args.extension,
    };

    let summary = copy::run_copy(&config)?;
    if summary.saved {
        println!(
            "Copied {} tab(s) into {}",
            summary.tabs.len(),
            config.save_path.display()
        );
    } else {
        println!("No files found to copy.");
    }
    Ok(())
}

fn execute_aggregate(args: AggregateArgs) -> Result<()> {
    let mut config = AggregateConfig::load(&args.config)?;
    if let Some(start_date) = args.start_date {
        config.start_date = start_date;
    }
    if let Some(end_date) = args.end_date {
        config.end_date = end_date;
    }
    if args.overwrite {
        config.overwrite_existing = true;
    }
    if !config.data_folder.is_dir() {
        return Err(ToolError::MissingInput(config.data_folder));
    }

    let mut prompt: Box<dyn Confirm> = if args.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalPrompt)
    };

    match aggregate::run_aggregate(&config, prompt.as_mut())? {
        AggregateOutcome::UpToDate { last_date } => {
            println!("All data previously processed.");
            if let Some(date) = last_date {
                println!("Last date: {}", date.format(OUTPUT_DATE_FORMAT));
            }
        }
        AggregateOutcome::OverwriteDeclined => println!("Exiting without processing..."),
        AggregateOutcome::SaveDeclined { .. } => println!("Exiting without saving..."),
        AggregateOutcome::Saved(report) => {
            // interactive runs already listed these in the save prompt
            if args.yes && !report.errors.is_empty() {
                eprintln!("The following errors occurred:");
                for error in &report.errors {
                    eprintln!("* {error}");
                }
            }
            println!(
                "Output saved to {} ({} new row(s) from {} file(s))",
                report.path.display(),
                report.new_rows,
                report.files
            );
        }
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Consolidate one worksheet from a folder of daily workbooks."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy the sheet from each daily workbook into one tab per date.
    Copy(CopyArgs),
    /// Filter, group, and sum the sheet into a cumulative CSV table.
    Aggregate(AggregateArgs),
}

#[derive(clap::Args)]
struct CopyArgs {
    /// Folder containing the daily workbooks.
    #[arg(long)]
    data_folder: PathBuf,

    /// Name of the sheet to copy from each workbook.
    #[arg(long)]
    sheet_name: String,

    /// Output workbook path.
    #[arg(long)]
    save_path: PathBuf,

    /// First date to include (YYYY-MM-DD).
    #[arg(long)]
    start_date: NaiveDate,

    /// Last date to include (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Extension of the daily workbooks.
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,
}

#[derive(clap::Args)]
struct AggregateArgs {
    /// JSON file describing the run and the per-sheet rules.
    #[arg(long)]
    config: PathBuf,

    /// Overrides the configured first date (YYYY-MM-DD).
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Overrides the configured last date (YYYY-MM-DD).
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Discard previously saved output instead of appending to it.
    #[arg(long)]
    overwrite: bool,

    /// Answer yes to every confirmation prompt.
    #[arg(long)]
    yes: bool,
}
