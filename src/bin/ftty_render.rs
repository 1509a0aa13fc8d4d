//! Renders an image file as a grid of Unicode block glyphs.
//!
//! By default the grid fills the terminal height, keeps the image's aspect
//! ratio and is drawn at the cursor with truecolor escapes. `--format json`
//! prints the match results instead.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::{Parser, ValueEnum};
use crossterm::{cursor::MoveTo, execute};
use fidelitty::frontend::{self, TermDims, UnicodeImage};
use fidelitty::{Context, ContextConfig, Region, UnicodePixel};
use log::info;
use serde::Serialize;

/// Grid height used when the terminal size cannot be queried.
const FALLBACK_ROWS: u16 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Ansi,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "ftty-render")]
#[command(about = "Render an image with Unicode block glyphs")]
#[command(version = env!("FIDELITTY_BUILD_VERSION"))]
struct Cli {
    image: PathBuf,
    /// Grid height in cells (default: terminal height).
    #[arg(long)]
    rows: Option<u16>,
    /// Grid width in cells (default: derived from the image aspect ratio).
    #[arg(long)]
    cols: Option<u16>,
    /// Only match this part of the grid, as `x,y,w,h` in cells.
    #[arg(long, value_parser = parse_region)]
    region: Option<Region>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Ansi)]
    format: OutputFormat,
    /// YAML context configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    max_pipelines: Option<u8>,
    #[arg(long)]
    threads: Option<usize>,
    /// Raise log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Serialize)]
struct JsonGrid<'a> {
    cols: u16,
    rows: u16,
    cells: &'a [UnicodePixel],
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = load_config(&cli)?;
    let image = image::open(&cli.image)
        .with_context(|| format!("failed to decode {}", cli.image.display()))?
        .to_rgb8();
    let (image_w, image_h) = image.dimensions();
    if image_w == 0 || image_h == 0 {
        bail!("{} has no pixels", cli.image.display());
    }

    let term = frontend::terminal_dims().ok();
    let (cols, rows) = grid_size(&cli, term, image_w, image_h);
    info!("rendering {image_w}x{image_h} image into {cols}x{rows} cells");

    let mut context = Context::with_config(&config).context("failed to create context")?;
    let handle = context
        .create_render_pipeline(cols, rows)
        .context("failed to create render pipeline")?;
    context
        .pipeline_mut(handle)?
        .sample_from(image.as_raw(), image_w as usize, image_h as usize)
        .context("failed to sample image")?;

    let region = cli.region.unwrap_or(Region::full(cols, rows));
    context
        .execute_region(handle, region)
        .context("failed to start rendering")?;
    context.wait(handle).context("rendering failed")?;

    let cells = context.pipeline(handle)?.output_surface()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut out, &JsonGrid { cols, rows, cells })?;
            writeln!(out)?;
        }
        OutputFormat::Ansi => draw_at_cursor(&mut out, cells, cols, rows, region)?,
    }

    context.destroy_render_pipeline(handle)?;
    context.destroy()?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ContextConfig> {
    let mut config = match &cli.config {
        Some(path) => ContextConfig::load(path)?,
        None => ContextConfig::default(),
    };
    if let Some(max_pipelines) = cli.max_pipelines {
        config.max_pipelines = max_pipelines;
    }
    if cli.threads.is_some() {
        config.worker_threads = cli.threads;
    }
    config.validate()?;
    Ok(config)
}

/// Fills the terminal height by default and derives the missing dimension
/// from the image aspect ratio, corrected for the cell shape.
fn grid_size(cli: &Cli, term: Option<TermDims>, image_w: u32, image_h: u32) -> (u16, u16) {
    let (cell_w, cell_h) = term
        .map(|dims| (dims.cell_w, dims.cell_h))
        .unwrap_or((
            frontend::terminal::FALLBACK_CELL_WIDTH,
            frontend::terminal::FALLBACK_CELL_HEIGHT,
        ));
    let aspect = image_w as f64 / image_h as f64;
    let cell_aspect = f64::from(cell_h) / f64::from(cell_w);

    match (cli.cols, cli.rows) {
        (Some(cols), Some(rows)) => (cols.max(1), rows.max(1)),
        (Some(cols), None) => (cols.max(1), to_cells(f64::from(cols) / aspect / cell_aspect)),
        (None, rows) => {
            let rows = rows
                .or(term.map(|dims| dims.rows))
                .filter(|rows| *rows > 0)
                .unwrap_or(FALLBACK_ROWS);
            (to_cells(f64::from(rows) * cell_aspect * aspect), rows)
        }
    }
}

fn to_cells(value: f64) -> u16 {
    value.clamp(1.0, f64::from(u16::MAX)) as u16
}

fn draw_at_cursor<W: Write>(
    out: &mut W,
    cells: &[UnicodePixel],
    cols: u16,
    rows: u16,
    region: Region,
) -> Result<()> {
    let mut image = UnicodeImage::new(cols, rows)?;
    image.read_pixels_region(cells, region)?;

    frontend::reserve_vertical_space(out, rows)?;
    let cursor = frontend::cursor_pos().context("failed to query cursor position")?;
    image.set_pos(cursor.col, cursor.row);
    image.draw_region(out, region)?;

    execute!(out, MoveTo(0, cursor.row.saturating_add(rows)))?;
    writeln!(out)?;
    Ok(())
}

fn parse_region(raw: &str) -> std::result::Result<Region, String> {
    let parts = raw
        .split(',')
        .map(|part| part.trim().parse::<u16>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|error| format!("invalid region '{raw}': {error}"))?;
    match parts.as_slice() {
        [x, y, width, height] => Ok(Region::new(*x, *y, *width, *height)),
        _ => Err(format!("region must be x,y,w,h (got '{raw}')")),
    }
}
