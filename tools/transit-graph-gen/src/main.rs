use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use transit_graph::{TransitGraphBuilder, TransitInput};

mod preview;

#[derive(Parser, Debug)]
#[command(
    name = "transit-graph-gen",
    author,
    version,
    about = "Generate a renderable transit graph from raw transit schema data",
    long_about = "Reads a transit schema document (stops, routes, transfers), merges \
                  transfer-connected stops into interchange nodes, deduplicates the \
                  segments shared by lines, generates smooth curve geometry for each \
                  of them, and writes the assembled graph as JSON.\n\n\
                  With --preview, a GeoJSON rendering of the scheme (curves plus \
                  stop/interchange points) is written next to the output for visual \
                  inspection."
)]
struct Args {
    /// Input file name of transit data
    input_file: PathBuf,

    /// Output file name of the generated graph
    /// (defaults to transit_graph_<input name> next to the input)
    output_file: Option<PathBuf>,

    /// Write a GeoJSON preview of the transit scheme
    #[arg(short, long)]
    preview: bool,

    /// The curves generator parameter value ALPHA
    #[arg(short, long, default_value_t = 0.5, value_name = "ALPHA")]
    alpha: f64,

    /// The number NUM of points in a generated curve
    #[arg(short, long, default_value_t = 100, value_name = "NUM")]
    num: usize,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    if !args.input_file.exists() {
        bail!("File {} not found", args.input_file.display());
    }

    log::info!("Input: {}", args.input_file.display());

    let data = std::fs::read_to_string(&args.input_file)
        .with_context(|| format!("Failed to read {}", args.input_file.display()))?;
    let input: TransitInput = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse {}", args.input_file.display()))?;

    let mut builder = TransitGraphBuilder::with_curve_params(input, args.num, args.alpha);
    let graph = builder.build().context("Failed to build transit graph")?;

    let output_file = args
        .output_file
        .unwrap_or_else(|| default_output_path(&args.input_file));

    let json = serde_json::to_string_pretty(graph).context("Failed to serialize transit graph")?;
    std::fs::write(&output_file, json)
        .with_context(|| format!("Failed to write {}", output_file.display()))?;
    log::info!("Transit graph generated: {}", output_file.display());

    if args.preview {
        let preview_path = preview_path(&output_file);
        preview::write_preview_geojson(graph, &preview_path)
            .context("Failed to write preview GeoJSON")?;
        log::info!("Preview written to: {}", preview_path.display());
    }

    Ok(())
}

/// The default output lands next to the input, prefixed `transit_graph_`.
fn default_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("transit_graph_{name}"))
}

fn preview_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{name}.preview.geojson"))
}
