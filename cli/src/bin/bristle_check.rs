use bristle::{
    InspectionConfig, OverlayStyle, Pipeline, StationStatus,
    io::{OverlayDisplay, SnapshotDisplay},
    render,
};
use bristle_cli::StationConfig;
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the inspection station until quit
    Run {
        /// Path to the TOML or JSON station configuration
        #[arg(short, long)]
        config: PathBuf,
        /// Stop after this many completed passes
        #[arg(long)]
        max_passes: Option<u64>,
    },
    /// Analyse a single image and print its verdict
    Inspect {
        /// Station configuration; built-in defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Image to analyse
        #[arg(short, long)]
        image: PathBuf,
        /// Directory to write the overlays to
        #[arg(long)]
        overlay_dir: Option<PathBuf>,
    },
    /// Write a configuration file with every default filled in
    InitConfig {
        /// Destination, .toml or .json
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the JSON schema of the station configuration
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Run { config, max_passes } => {
            run_station(config, *max_passes).await?;
        }
        Commands::Inspect { config, image, overlay_dir } => {
            inspect_image(config.as_deref(), image, overlay_dir.as_deref())?;
        }
        Commands::InitConfig { output } => {
            StationConfig::default().to_file(output)?;
            info!("Configuration saved to: {:?}", output);
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(StationConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

async fn run_station(config_path: &Path, max_passes: Option<u64>) -> Result<()> {
    let config = StationConfig::from_file(config_path)?;
    let mut station = config.open_station()?;

    let mut ticker = time::interval(Duration::from_millis(config.tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut commands = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!("Type r + Enter to refresh the status, q + Enter or Ctrl+C to quit");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                station.tick()?;
                if max_passes.is_some_and(|max| station.passes() >= max) {
                    info!("Reached {} passes", station.passes());
                    break;
                }
                if station.is_finished() {
                    info!("Frame source exhausted");
                    break;
                }
            }
            line = commands.next_line(), if stdin_open => {
                match line? {
                    Some(line) => match line.trim() {
                        "r" | "refresh" => station.refresh(),
                        "q" | "quit" => {
                            info!("Quit requested");
                            break;
                        }
                        "" => {}
                        other => warn!("Unknown command '{}', expected r or q", other),
                    },
                    // Detached from a terminal; keep running until Ctrl+C
                    None => stdin_open = false,
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
        }
    }

    info!(
        "Stopped after {} passes, {} skipped",
        station.passes(),
        station.skipped()
    );
    Ok(())
}

fn inspect_image(config_path: Option<&Path>, image_path: &Path, overlay_dir: Option<&Path>) -> Result<()> {
    let inspection_config = match config_path {
        Some(path) => StationConfig::from_file(path)?.inspection,
        None => InspectionConfig::default(),
    };
    let pipeline = Pipeline::from_config(&inspection_config)?;

    let frame = image::open(image_path)?.to_rgb8();
    let inspection = pipeline.process(&frame)?;

    for (i, classified) in inspection.contours.iter().enumerate() {
        info!(
            "Contour {}: perimeter {:.1}, {} vertices, {:?}",
            i, classified.perimeter, classified.vertices, classified.kind
        );
    }
    info!("{} short contours ignored", inspection.excluded);

    if let Some(dir) = overlay_dir {
        let overlay = render(&frame, &inspection, &OverlayStyle::default())?;
        SnapshotDisplay::new(dir, 1)?.show(&overlay, &StationStatus::Reported(inspection.report))?;
        info!("Overlays written to {:?}", dir);
    }

    println!("{}", inspection.report);
    Ok(())
}
