//! Command-line entry point: import a directory of SVG icons, normalize
//! them, and write the icon-set document.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use iconset_builder::{IconPipeline, PipelineOptions, import_directory};

#[derive(Debug, Parser)]
#[command(
    name = "iconset-builder",
    about = "Build a normalized icon-set document from a directory of SVG files"
)]
struct Cli {
    /// Directory containing the source SVG files.
    source: PathBuf,

    /// Namespace prefix for the icon set.
    #[arg(long)]
    prefix: String,

    /// Where to write the icon-set document.
    #[arg(long, default_value = "icons.json")]
    out: PathBuf,

    /// Expand each icon's view rectangle by a proportional margin.
    #[arg(long)]
    pad: bool,

    /// Margin factor relative to the icon's larger dimension.
    #[arg(long, default_value_t = 0.10)]
    pad_factor: f64,

    /// Distinct flat-fill count above which an icon keeps its palette.
    #[arg(long, default_value_t = 2)]
    color_threshold: usize,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let set = import_directory(&cli.source, &cli.prefix)?;
    log::debug!("imported {} entries from {}", set.len(), cli.source.display());

    let pipeline = IconPipeline::new(PipelineOptions {
        pad: cli.pad,
        pad_factor: cli.pad_factor,
        color_threshold: cli.color_threshold,
    });

    let document = set.build(&pipeline);
    document.write_to(&cli.out)?;
    log::info!(
        "icon set with {} icons saved to {}",
        document.icons.len(),
        cli.out.display()
    );
    Ok(())
}
