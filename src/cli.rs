use crate::config::{Config, load_config};
use crate::dataset::parse_stations;
use crate::layout::{DiagramRequest, Viewport, compute_layout};
use crate::layout_dump::write_layout_dump;
use crate::lint::{lint_stations, log_issues};
use crate::render::{render_svg, write_output_svg};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "png")]
use crate::render::write_output_png;

#[derive(Parser, Debug)]
#[command(
    name = "metro-diagram",
    version,
    about = "Schematic metro line diagrams from GeoJSON station data"
)]
pub struct Args {
    /// Station dataset (GeoJSON feature collection) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Line code to draw (case-insensitive). Defaults to the first configured line.
    #[arg(short = 'l', long = "line")]
    pub line: Option<String>,

    /// Viewport width in px
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Force the narrow (mobile) layout regardless of width
    #[arg(long = "narrow")]
    pub narrow: bool,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file (line colors, anchor rules, geometry)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Report dataset problems to stderr before rendering
    #[arg(long = "lint")]
    pub lint: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let stations = parse_stations(&input).context("failed to load station dataset")?;

    if args.lint {
        log_issues(&lint_stations(&stations, &config.layout.catalog));
    }

    let request = build_request(&args, &config);
    let plan = compute_layout(&request, &stations, &config.theme, &config.layout);
    if plan.is_empty() {
        tracing::warn!(line = %request.line, "no stations to draw for line");
    }

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&plan, &config.theme);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Json => {
            write_layout_dump(args.output.as_deref(), &plan, &request)?;
        }
        OutputFormat::Png => write_png(&args, &config, &plan)?,
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(args: &Args, config: &Config, plan: &crate::layout::LayoutPlan) -> Result<()> {
    let output = ensure_output(&args.output, "png")?;
    let svg = render_svg(plan, &config.theme);
    let mut render = config.render.clone();
    render.width = plan.width;
    render.height = plan.height.max(1.0);
    write_output_png(&svg, &output, &render)
}

#[cfg(not(feature = "png"))]
fn write_png(_args: &Args, _config: &Config, _plan: &crate::layout::LayoutPlan) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn build_request(args: &Args, config: &Config) -> DiagramRequest {
    let layout = &config.layout;
    let width = args.width.unwrap_or(layout.default_width);
    let viewport = if args.narrow {
        Viewport::narrow(width)
    } else {
        Viewport::classify(width, layout.narrow_breakpoint)
    };
    let line = args
        .line
        .clone()
        .or_else(|| layout.catalog.codes().next().map(str::to_string))
        .unwrap_or_default();
    DiagramRequest::new(line, viewport)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
