use anyhow::{Context as AnyhowContext, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use config::{discover_config, BuildSettings, OutputFormat, Overrides};
use modeldoc_graph::{EquationTrace, ModelAssembler, TraceStrategy, TracedEquation};
use pipeline::Pipeline;
use render::renderer_for;
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

mod config;
mod pipeline;
mod render;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "modeldoc")]
#[command(about = "Cross-referenced documentation for equation model files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (per-equation, per-link and per-substitution traces)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, link and enrich a model file, then write the documentation
    Build(BuildArgs),

    /// Show what an equation depends on and what depends on it
    Trace(TraceArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Model file (read as Latin-1)
    #[arg(short, long)]
    input: PathBuf,

    /// Output document
    #[arg(short, long)]
    output: PathBuf,

    /// Parameter table, `name;value` per line
    #[arg(short, long, visible_alias = "paramfile")]
    params: Option<PathBuf>,

    /// Legend table, `name;legend` per line
    #[arg(short, long, visible_alias = "legendfile")]
    legends: Option<PathBuf>,

    /// Output format (default: html)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Document title
    #[arg(long)]
    title: Option<String>,

    /// Configuration file (default: ./modeldoc.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct TraceArgs {
    /// Model file (read as Latin-1)
    #[arg(short, long)]
    input: PathBuf,

    /// Equation name (case-insensitive)
    equation: String,

    /// Traversal depth (1 = direct references only)
    #[arg(long, default_value_t = 1)]
    depth: usize,

    /// Output JSON format
    #[arg(long)]
    json: bool,
}

pub fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // keep stdout clean for JSON consumers
    if matches!(&cli.command, Commands::Trace(args) if args.json) {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Build(args) => run_build(args)?,
        Commands::Trace(args) => run_trace(args)?,
    }

    Ok(())
}

fn run_build(args: BuildArgs) -> Result<()> {
    let cwd = env::current_dir().context("Failed to resolve current directory")?;
    let config = discover_config(args.config.as_deref(), &cwd);
    if let Some(path) = &config {
        log::debug!("Using config {}", path.display());
    }
    let settings = BuildSettings::resolve(
        config.as_deref(),
        Overrides {
            params: args.params,
            legends: args.legends,
            format: args.format,
            title: args.title,
        },
    )?;

    let generated_at = Local::now()
        .format(&settings.timestamp_format)
        .to_string();
    let assembled = Pipeline::new().build(&args.input, &settings, generated_at)?;

    log::info!("Generating {} output...", settings.format.as_str());
    let document = renderer_for(settings.format, &settings.title).render(&assembled)?;
    fs::write(&args.output, document)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let stats = assembled.stats();
    print_stdout(&format!(
        "{} equations in {} regions, {} references.",
        stats.equations, stats.regions, stats.references
    ))?;
    print_stdout(&format!("Done. Output in file {}.", args.output.display()))?;
    Ok(())
}

fn run_trace(args: TraceArgs) -> Result<()> {
    let linked = Pipeline::new().link(&args.input)?;
    let assembler = ModelAssembler::new(linked.graph);
    let strategy = match args.depth {
        1 => TraceStrategy::Direct,
        2 => TraceStrategy::Extended,
        3 => TraceStrategy::Deep,
        depth => TraceStrategy::Custom(depth),
    };
    let trace = assembler.trace(&linked.model, &args.equation, strategy)?;

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&trace)?)?;
    } else {
        print_stdout(&format_trace(&trace))?;
    }
    Ok(())
}

fn format_trace(trace: &EquationTrace) -> String {
    fn push_section(out: &mut String, heading: &str, items: &[TracedEquation]) {
        out.push_str(heading);
        out.push('\n');
        if items.is_empty() {
            out.push_str("  (none)\n");
        }
        for item in items {
            out.push_str(&format!("  {} (distance {})", item.name, item.distance));
            if let Some(region) = &item.region {
                out.push_str(&format!(" [{region}]"));
            }
            out.push('\n');
        }
    }

    let mut out = format!("Equation: {}\n", trace.equation);
    push_section(&mut out, "Depends on:", &trace.upstream);
    push_section(&mut out, "Appears in:", &trace.downstream);
    out.trim_end().to_string()
}
