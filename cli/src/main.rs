//! docsplit CLI - document split planning tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use docsplit::{Docsplit, JsonFormat, LayoutSplitConfig, SplitPolicy, Submission};

#[derive(Parser)]
#[command(name = "docsplit")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Plan and apply document splits on classified scan submissions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the reconciled segment map of a first-pass submission
    Plan {
        /// First-pass submission snapshot (JSON)
        #[arg(short, long, value_name = "FILE")]
        submission: PathBuf,

        /// Layout split configuration (JSON)
        #[arg(short, long, value_name = "FILE", env = "DOCSPLIT_CONFIG")]
        config: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Annotate a first-pass submission with manual review directives
    Review {
        /// First-pass submission snapshot (JSON)
        #[arg(short, long, value_name = "FILE")]
        submission: PathBuf,

        /// Layout split configuration (JSON)
        #[arg(short, long, value_name = "FILE", env = "DOCSPLIT_CONFIG")]
        config: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Carve a second-pass submission into split documents
    Split {
        /// Second-pass submission snapshot (JSON)
        #[arg(short, long, value_name = "FILE")]
        submission: PathBuf,

        /// Segment map produced by `plan` (JSON)
        #[arg(long, value_name = "FILE")]
        segments: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show how a submission would be split
    Info {
        /// Submission snapshot (JSON)
        #[arg(short, long, value_name = "FILE")]
        submission: PathBuf,

        /// Layout split configuration (JSON)
        #[arg(short, long, value_name = "FILE", env = "DOCSPLIT_CONFIG")]
        config: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan {
            submission,
            config,
            output,
            compact,
        } => cmd_plan(&submission, &config, output.as_deref(), compact),
        Commands::Review {
            submission,
            config,
            output,
            compact,
        } => cmd_review(&submission, &config, output.as_deref(), compact),
        Commands::Split {
            submission,
            segments,
            output,
            compact,
        } => cmd_split(&submission, &segments, output.as_deref(), compact),
        Commands::Info { submission, config } => cmd_info(&submission, &config),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn write_output(json: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }
    Ok(())
}

fn cmd_plan(
    submission: &Path,
    config: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let splitter = Docsplit::from_config_path(config)?;
    let submission = Submission::from_path(submission)?;

    let (plan, stats) = splitter.plan_with_stats(&submission);
    log::info!(
        "Planned {} segment(s) in {} group(s), {} page(s) filled",
        stats.segments,
        stats.groups,
        stats.pages_filled
    );
    if stats.documents_unresolved > 0 {
        log::warn!(
            "{} document(s) had no identifier and produced no segments",
            stats.documents_unresolved
        );
    }

    let json = docsplit::to_json(&plan, json_format(compact))?;
    write_output(&json, output)
}

fn cmd_review(
    submission: &Path,
    config: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let splitter = Docsplit::from_config_path(config)?;
    let submission = Submission::from_path(submission)?;

    let reviewed = splitter.review(&submission);

    let json = docsplit::to_json(&reviewed, json_format(compact))?;
    write_output(&json, output)
}

fn cmd_split(
    submission: &Path,
    segments: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let submission = Submission::from_path(submission)?;
    let segments = docsplit::load_segments(segments)?;

    let (documents, stats) = docsplit::synthesize_with_stats(&submission, &segments);
    log::info!(
        "Emitted {} document(s), dropped {} segment(s)",
        stats.documents_emitted,
        stats.segments_dropped
    );

    let json = docsplit::to_json(&documents, json_format(compact))?;
    write_output(&json, output)
}

fn describe_policy(policy: &SplitPolicy) -> String {
    match policy {
        SplitPolicy::FieldTracking(field) => format!("by field '{}'", field),
        SplitPolicy::FixedCount(count) => format!("every {} page(s)", count),
        SplitPolicy::NoSplit => "not split".to_string(),
    }
}

fn cmd_info(submission: &Path, config: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = LayoutSplitConfig::from_path(config)?;
    let submission = Submission::from_path(submission)?;
    let splitter = Docsplit::new(config);
    let (plan, stats) = splitter.plan_with_stats(&submission);

    println!("{}", "Submission".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Id".bold(), submission.id);
    println!("{}: {}", "Documents".bold(), submission.documents.len());
    println!("{}: {}", "Pages".bold(), submission.total_pages());
    println!(
        "{}: {}",
        "Unassigned pages".bold(),
        submission.unassigned_pages.len()
    );

    println!();
    println!("{}", "Split Plan".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for (key, segments) in plan.iter() {
        let layout = splitter
            .config()
            .layout_name(&key.layout_uuid)
            .unwrap_or(&key.layout_uuid);
        let policy = describe_policy(splitter.config().policy_for(&key.layout_uuid));
        println!("{} {} ({})", layout.bold(), key.file_uuid.dimmed(), policy);

        for (index, segment) in segments.iter().enumerate() {
            let branch = if index + 1 == segments.len() {
                "└─"
            } else {
                "├─"
            };
            let value = segment
                .value
                .as_deref()
                .map(|v| format!(" [{}]", v))
                .unwrap_or_default();
            println!(
                "  {} pages {}-{}{}",
                branch.dimmed(),
                segment.start(),
                segment.end(),
                value
            );
        }
    }

    println!();
    println!("{}: {}", "Segments".bold(), stats.segments);
    println!("{}: {}", "Pages filled".bold(), stats.pages_filled);
    if stats.documents_unresolved > 0 {
        println!(
            "{}: {}",
            "Unresolved documents".yellow().bold(),
            stats.documents_unresolved
        );
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docsplit".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document split planning tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/docsplit".dimmed());
    println!("License: MIT");
}
