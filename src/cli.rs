use crate::calendar::{Calendar, build_calendar, validate_year};
use crate::config::{Config, load_config_from_env};
use crate::force::{ForceSimulation, LayoutEngine};
use crate::history::{GitCli, HistoryReader, build_histogram};
use crate::ir::Graph;
use crate::raster::{ImageEncoder, RasterOptions, ResvgEncoder, write_output_png};
use crate::render::{render_calendar_svg, render_graph_svg};
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "graph.png";

#[derive(Parser, Debug)]
#[command(
    name = "commitviz-graph",
    version,
    about = "Render a force-directed node/link diagram to PNG"
)]
pub struct GraphArgs {
    /// Output PNG path
    #[arg(value_name = "OUTPUT_PATH", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,
}

#[derive(Parser, Debug)]
#[command(
    name = "commitviz-calendar",
    version,
    about = "Render a git contribution calendar for one year to PNG"
)]
pub struct CalendarArgs {
    /// Path to a git repository
    #[arg(value_name = "REPO_PATH")]
    pub repo: PathBuf,

    /// Calendar year (1970-2100)
    #[arg(value_name = "YEAR")]
    pub year: String,

    /// Output PNG path
    #[arg(value_name = "OUTPUT_PATH", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("{0}")]
    Arguments(#[from] clap::Error),
    #[error("invalid year '{input}': expected an integer between 1970 and 2100\n\n{usage}")]
    Year { input: String, usage: String },
}

/// Parses and range-checks the year argument.
pub fn parse_year(input: &str) -> Result<i32, UsageError> {
    let year_error = || UsageError::Year {
        input: input.to_string(),
        usage: CalendarArgs::command().render_usage().to_string(),
    };
    let year: i32 = input.trim().parse().map_err(|_| year_error())?;
    validate_year(year).map_err(|_| year_error())
}

/// Parses argv, or returns `Ok(None)` after printing `--help`/`--version`.
fn parse_args<P, I, T>(args: I) -> Result<Option<P>>
where
    P: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match P::try_parse_from(args) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err)
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            err.print()?;
            Ok(None)
        }
        Err(err) => Err(UsageError::Arguments(err).into()),
    }
}

/// Lays out `graph` with `engine` and writes it to `output` as PNG.
pub fn render_graph(
    graph: &Graph,
    engine: &dyn LayoutEngine,
    encoder: &dyn ImageEncoder,
    output: &Path,
    config: &Config,
) -> Result<()> {
    let positioned = engine
        .layout(graph, &config.graph)
        .context("failed to lay out graph")?;
    let svg = render_graph_svg(&positioned, &config.theme, &config.graph);
    write_output_png(encoder, &svg, output, &RasterOptions::default())
        .context("failed to produce graph PNG")?;
    Ok(())
}

/// Reads `year` of history from `repo` and writes the calendar to `output` as PNG.
pub fn render_calendar(
    reader: &dyn HistoryReader,
    encoder: &dyn ImageEncoder,
    repo: &Path,
    year: i32,
    output: &Path,
    config: &Config,
) -> Result<Calendar> {
    let histogram = build_histogram(reader, repo, year)
        .with_context(|| format!("failed to read commit history from {}", repo.display()))?;
    let calendar = build_calendar(year, &histogram)?;
    let svg = render_calendar_svg(&calendar, &config.theme, &config.calendar);
    let options = RasterOptions::flatten_on(&config.theme.background);
    write_output_png(encoder, &svg, output, &options).context("failed to produce calendar PNG")?;
    Ok(calendar)
}

pub fn run_graph<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let Some(args) = parse_args::<GraphArgs, _, _>(args)? else {
        return Ok(());
    };
    let config = load_config_from_env().context("failed to load configuration")?;
    render_graph(
        &Graph::sample(),
        &ForceSimulation,
        &ResvgEncoder,
        &args.output,
        &config,
    )
}

pub fn run_calendar<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let Some(args) = parse_args::<CalendarArgs, _, _>(args)? else {
        return Ok(());
    };
    let year = parse_year(&args.year)?;
    let config = load_config_from_env().context("failed to load configuration")?;
    render_calendar(
        &GitCli::new(),
        &ResvgEncoder,
        &args.repo,
        year,
        &args.output,
        &config,
    )?;
    Ok(())
}

/// Prints a top-level failure to stderr; usage errors carry their usage text.
pub fn report(err: &anyhow::Error) {
    match err.downcast_ref::<UsageError>() {
        Some(UsageError::Arguments(clap_err)) => eprint!("{clap_err}"),
        Some(usage) => eprintln!("error: {usage}"),
        None => eprintln!("error: {err:#}"),
    }
}

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
