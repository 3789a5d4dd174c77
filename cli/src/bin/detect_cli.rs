use clap::{Parser, Subcommand};
use cli::{DetectionReport, collect_image_paths, load_images, output_path};
use color_eyre::eyre::Result;
use detection::{DetectionConfig, DetectionPipeline, Stage, render};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect candidate regions and write annotated images
    Detect {
        /// Image file or directory of images
        #[arg(short, long)]
        input: PathBuf,
        /// Directory for the annotated images
        #[arg(short, long)]
        output_dir: PathBuf,
        /// Detection configuration (.toml or .json); defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Downscale factor applied to every image before detection
        #[arg(long, default_value = "8")]
        scale: u32,
        /// Maximum number of images taken from a directory
        #[arg(long, default_value = "100")]
        limit: usize,
        /// Which boxes to draw: color, shape or fused
        #[arg(long, default_value = "fused")]
        stage: Stage,
        /// Write every stage's boxes to this JSON file
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Write the default detection configuration as TOML
    DefaultConfig {
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the JSON schema of the detection configuration
    Schema,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Detect {
            input,
            output_dir,
            config,
            scale,
            limit,
            stage,
            report,
        } => {
            detect(
                input,
                output_dir,
                config.as_deref(),
                *scale,
                *limit,
                *stage,
                report.as_deref(),
            )?;
        }
        Commands::DefaultConfig { output } => {
            DetectionConfig::default().to_toml_file(output)?;
            info!("Default configuration saved to: {:?}", output);
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&DetectionConfig::schema())?);
        }
    }

    Ok(())
}

fn detect(
    input: &Path,
    output_dir: &Path,
    config_path: Option<&Path>,
    scale: u32,
    limit: usize,
    stage: Stage,
    report_path: Option<&Path>,
) -> Result<()> {
    let config = match config_path {
        Some(path) => DetectionConfig::from_file(path)?,
        None => DetectionConfig::default(),
    };
    let pipeline = DetectionPipeline::from_config(config);
    info!("{}", pipeline.info());

    let paths = collect_image_paths(input, limit)?;
    info!("Loading {} images from {:?} (scale 1/{})", paths.len(), input, scale);
    let mut images = load_images(&paths, scale)?;

    let detections = pipeline.process(&images)?;
    info!(
        "Found {} color, {} shape, {} fused boxes",
        detections.color_boxes.len(),
        detections.shape_boxes.len(),
        detections.fused_boxes.len()
    );

    std::fs::create_dir_all(output_dir)?;
    render(detections.boxes(stage), &mut images)?;
    for (path, image) in paths.iter().zip(&images) {
        let target = output_path(output_dir, path, stage);
        image.save(&target)?;
        info!("Wrote {:?}", target);
    }

    if let Some(report_path) = report_path {
        DetectionReport::new(&paths, detections).to_json_file(report_path)?;
        info!("Report saved to: {:?}", report_path);
    }

    Ok(())
}
