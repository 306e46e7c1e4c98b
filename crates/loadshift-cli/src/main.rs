//! loadshift CLI - Resource Workload Analysis
//!
//! Command-line interface for ingesting MSPDI schedules, aggregating
//! workload and recommending task shifts. Multiple input files merge into
//! one dataset before analysis (resources by name, higher max_units wins).

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use loadshift_core::{OptimizeMode, OptimizeSettings, Project};
use loadshift_parser::{parse_file, ParseSummary};
use loadshift_render::{render_report, suggestions_csv, workload_csv};
use loadshift_solver::{
    aggregate, classify, optimize, recommend, unmatched_assignments, weekly_timeline,
};

#[derive(Parser)]
#[command(name = "loadshift")]
#[command(author, version, about = "Resource workload analysis and task-shifting engine", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse schedule files and report what was ingested
    Check {
        /// Input MSPDI files (merged when more than one)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Aggregate workload per resource and classify it
    Analyze {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Analysis window start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Analysis window end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the weekly load series per resource
    Timeline {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        #[arg(long)]
        from: Option<NaiveDate>,

        #[arg(long)]
        to: Option<NaiveDate>,

        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Recommend task shifts out of overloaded weeks
    Optimize {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        #[arg(long)]
        from: Option<NaiveDate>,

        #[arg(long)]
        to: Option<NaiveDate>,

        /// Maximum days a task may be shifted
        #[arg(long)]
        max_shift: Option<i64>,

        /// Target load percentage for underloaded weeks
        #[arg(long)]
        target_load: Option<f64>,

        /// Optimization mode (balance, minimize-peaks)
        #[arg(long)]
        mode: Option<OptimizeMode>,

        /// Only optimize these resources (comma-separated names)
        #[arg(long, value_delimiter = ',')]
        resources: Vec<String>,

        /// TOML settings file; explicit flags override its values
        #[arg(long)]
        settings: Option<PathBuf>,

        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { files } => check(&files),
        Commands::Analyze {
            files,
            from,
            to,
            format,
            output,
        } => analyze(&files, window(from, to)?, format, output.as_deref()),
        Commands::Timeline {
            files,
            from,
            to,
            format,
        } => timeline(&files, window(from, to)?, format),
        Commands::Optimize {
            files,
            from,
            to,
            max_shift,
            target_load,
            mode,
            resources,
            settings,
            format,
            output,
        } => {
            let settings = load_settings(settings.as_deref(), max_shift, target_load, mode)?;
            run_optimize(
                &files,
                window(from, to)?,
                &settings,
                &resources,
                format,
                output.as_deref(),
            )
        }
    }
}

/// Both bounds or neither; a half-open window is a usage error.
fn window(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Option<(NaiveDate, NaiveDate)>> {
    match (from, to) {
        (Some(from), Some(to)) => Ok(Some((from, to))),
        (None, None) => Ok(None),
        _ => bail!("--from and --to must be given together"),
    }
}

/// Parse every input file and merge into one dataset, logging dropped
/// records at the ingestion boundary.
fn load_projects(files: &[PathBuf]) -> Result<Project> {
    let mut merged: Option<Project> = None;
    let mut totals = ParseSummary::default();

    for file in files {
        let (project, summary) = parse_file(file)
            .with_context(|| format!("failed to parse {}", file.display()))?;
        tracing::debug!(
            file = %file.display(),
            tasks = project.tasks.len(),
            resources = project.resources.len(),
            assignments = project.assignments.len(),
            "parsed schedule"
        );
        totals.dropped_tasks += summary.dropped_tasks;
        totals.dropped_resources += summary.dropped_resources;
        totals.dropped_assignments += summary.dropped_assignments;

        match &mut merged {
            Some(m) => m.merge(project),
            None => merged = Some(project),
        }
    }

    let project = merged.unwrap_or_default();
    if !totals.is_clean() {
        tracing::warn!(
            dropped_tasks = totals.dropped_tasks,
            dropped_resources = totals.dropped_resources,
            dropped_assignments = totals.dropped_assignments,
            "some records were dropped during ingestion"
        );
    }

    let dangling = unmatched_assignments(&project).len();
    if dangling > 0 {
        tracing::warn!(count = dangling, "assignments will not match any task");
    }

    Ok(project)
}

fn check(files: &[PathBuf]) -> Result<()> {
    let mut totals = ParseSummary::default();
    let mut merged: Option<Project> = None;

    for file in files {
        let (project, summary) = parse_file(file)
            .with_context(|| format!("failed to parse {}", file.display()))?;
        println!(
            "{}: {} tasks, {} resources, {} assignments",
            file.display(),
            project.tasks.len(),
            project.resources.len(),
            project.assignments.len()
        );
        totals.dropped_tasks += summary.dropped_tasks;
        totals.dropped_resources += summary.dropped_resources;
        totals.dropped_assignments += summary.dropped_assignments;
        match &mut merged {
            Some(m) => m.merge(project),
            None => merged = Some(project),
        }
    }

    let project = merged.unwrap_or_default();
    if files.len() > 1 {
        println!(
            "merged: {} tasks, {} resources, {} assignments",
            project.tasks.len(),
            project.resources.len(),
            project.assignments.len()
        );
    }
    println!(
        "dropped: {} tasks, {} resources, {} assignments",
        totals.dropped_tasks, totals.dropped_resources, totals.dropped_assignments
    );
    println!(
        "unmatched assignments: {}",
        unmatched_assignments(&project).len()
    );
    Ok(())
}

fn analyze(
    files: &[PathBuf],
    range: Option<(NaiveDate, NaiveDate)>,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let project = load_projects(files)?;
    let records = aggregate(&project, range);
    let analysis = classify(records.clone());

    let rendered = match format {
        OutputFormat::Text => {
            let recommendations = recommend(&analysis);
            render_report(&records, &analysis, &[], &recommendations)
        }
        OutputFormat::Json => serde_json::to_string_pretty(&analysis)?,
        OutputFormat::Csv => workload_csv(&records),
    };

    emit(&rendered, output)
}

fn timeline(
    files: &[PathBuf],
    range: Option<(NaiveDate, NaiveDate)>,
    format: OutputFormat,
) -> Result<()> {
    let project = load_projects(files)?;
    let timeline = weekly_timeline(&project, range);

    match format {
        OutputFormat::Text => {
            if timeline.is_empty() {
                println!("No dated tasks; nothing to show.");
                return Ok(());
            }
            // HashMap iteration is unordered; present resources in roster order
            for resource in &project.resources {
                let Some(loads) = timeline.get(&resource.name) else {
                    continue;
                };
                println!("{}:", resource.name);
                for load in loads {
                    println!(
                        "  {}  {:>6.1}h / {:>5.1}h  {:>6.1}%",
                        load.week.label, load.hours, load.capacity, load.percentage
                    );
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&timeline)?),
        OutputFormat::Csv => bail!("csv output is not supported for timeline"),
    }
    Ok(())
}

fn run_optimize(
    files: &[PathBuf],
    range: Option<(NaiveDate, NaiveDate)>,
    settings: &OptimizeSettings,
    resources: &[String],
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let project = load_projects(files)?;
    let selected = (!resources.is_empty()).then_some(resources);
    let suggestions = optimize(&project, settings, range, selected);
    tracing::info!(count = suggestions.len(), "optimization pass complete");

    let rendered = match format {
        OutputFormat::Text => {
            if suggestions.is_empty() {
                "Schedule is balanced; no shifts needed.\n".to_string()
            } else {
                let mut out = String::new();
                for (i, s) in suggestions.iter().enumerate() {
                    out.push_str(&format!(
                        "{}. [{}] Shift \"{}\" ({}) by {} days: {} -> {}\n   {}\n",
                        i + 1,
                        s.priority,
                        s.task_name,
                        s.resource_name,
                        s.shift_days,
                        s.original_start,
                        s.suggested_start,
                        s.reason,
                    ));
                }
                out
            }
        }
        OutputFormat::Json => serde_json::to_string_pretty(&suggestions)?,
        OutputFormat::Csv => suggestions_csv(&suggestions),
    };

    emit(&rendered, output)
}

/// Merge the TOML settings file (when given) with explicit flag overrides.
fn load_settings(
    path: Option<&Path>,
    max_shift: Option<i64>,
    target_load: Option<f64>,
    mode: Option<OptimizeMode>,
) -> Result<OptimizeSettings> {
    let mut settings = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read settings {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("invalid settings in {}", path.display()))?
        }
        None => OptimizeSettings::default(),
    };

    if let Some(max_shift) = max_shift {
        settings.max_shift_days = max_shift;
    }
    if let Some(target_load) = target_load {
        settings.target_load_pct = target_load;
    }
    if let Some(mode) = mode {
        settings.mode = mode;
    }
    Ok(settings)
}

fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn window_requires_both_bounds() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert!(window(from, None).is_err());
        assert!(window(None, from).is_err());
        assert_eq!(window(None, None).unwrap(), None);
        assert!(window(from, from).unwrap().is_some());
    }

    #[test]
    fn settings_file_with_flag_overrides() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "max_shift_days = 7\ntarget_load_pct = 90.0\nmode = \"minimize_peaks\"")
            .unwrap();

        let settings = load_settings(Some(file.path()), Some(21), None, None).unwrap();
        assert_eq!(settings.max_shift_days, 21); // flag wins
        assert_eq!(settings.target_load_pct, 90.0); // file value
        assert_eq!(settings.mode, OptimizeMode::MinimizePeaks);
    }

    #[test]
    fn settings_default_without_file() {
        let settings = load_settings(None, None, None, None).unwrap();
        assert_eq!(settings.max_shift_days, 14);
        assert_eq!(settings.target_load_pct, 85.0);
    }

    #[test]
    fn settings_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "max_shift_days = 30").unwrap();

        let settings = load_settings(Some(file.path()), None, None, None).unwrap();
        assert_eq!(settings.max_shift_days, 30);
        assert_eq!(settings.target_load_pct, 85.0);
        assert_eq!(settings.mode, OptimizeMode::Balance);
    }
}
