use beamdelta::io::{load_gray16_image, load_gray_image};
use beamdelta::{
    AlignmentSession, Centroid, CentroidEstimator, EstimatorConfig, FrameSequence, Imager,
    OwnedImage, Sample, Snapshot, SpotImager,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

const MAX_CAMERAS: usize = 2;

#[derive(Parser, Debug)]
#[command(author, version, about = "BeamDelta beam alignment CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for estimation and tracker updates.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct EstimatorConfigJson {
    edge_margin: usize,
    bins: usize,
    parallel: bool,
}

impl Default for EstimatorConfigJson {
    fn default() -> Self {
        let cfg = EstimatorConfig::default();
        Self {
            edge_margin: cfg.edge_margin,
            bins: cfg.bins,
            parallel: cfg.parallel,
        }
    }
}

impl From<&EstimatorConfigJson> for EstimatorConfig {
    fn from(value: &EstimatorConfigJson) -> Self {
        Self {
            edge_margin: value.edge_margin,
            bins: value.bins,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SourceConfig {
    Files {
        paths: Vec<PathBuf>,
        #[serde(default)]
        sixteen_bit: bool,
    },
    Synthetic {
        width: usize,
        height: usize,
        sigma: f64,
        spots: Vec<[f64; 2]>,
    },
}

#[derive(Debug, Deserialize)]
struct CameraConfig {
    #[serde(default)]
    name: Option<String>,
    source: SourceConfig,
    #[serde(default)]
    exposure: Option<f64>,
    #[serde(default)]
    reference_clears: BTreeSet<usize>,
    #[serde(default)]
    reference_updates: BTreeSet<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    estimator: EstimatorConfigJson,
    cameras: Vec<CameraConfig>,
    output_path: Option<String>,
}

#[derive(Debug, Serialize)]
struct CentroidRecord {
    row: f64,
    col: f64,
}

impl From<Centroid> for CentroidRecord {
    fn from(value: Centroid) -> Self {
        Self {
            row: value.row,
            col: value.col,
        }
    }
}

/// Offset as shown to the operator: x is the column distance, y the row distance.
#[derive(Debug, Serialize)]
struct OffsetRecord {
    x: f64,
    y: f64,
}

#[derive(Debug, Serialize)]
struct FrameRecord {
    frame: usize,
    current: CentroidRecord,
    reference: Option<CentroidRecord>,
    offset: Option<OffsetRecord>,
    degenerate: Option<&'static str>,
    reference_cleared: bool,
    reference_updated: bool,
}

impl FrameRecord {
    fn new(frame: usize, snapshot: &Snapshot, action: ReferenceAction) -> Self {
        Self {
            frame,
            current: snapshot.current.into(),
            reference: snapshot.reference.map(Into::into),
            offset: snapshot.offset.map(|offset| OffsetRecord {
                x: offset.x(),
                y: offset.y(),
            }),
            degenerate: snapshot.degeneracy.map(|d| d.as_str()),
            reference_cleared: action.cleared,
            reference_updated: action.updated,
        }
    }
}

/// Operator actions applied after a frame was processed.
#[derive(Clone, Copy, Debug, Default)]
struct ReferenceAction {
    cleared: bool,
    updated: bool,
}

struct Replay<'a> {
    estimator: CentroidEstimator,
    exposure: Option<f64>,
    reference_clears: &'a BTreeSet<usize>,
    reference_updates: &'a BTreeSet<usize>,
}

impl<'a> Replay<'a> {
    fn new(camera: &'a CameraConfig, estimator: CentroidEstimator) -> Self {
        Self {
            estimator,
            exposure: camera.exposure,
            reference_clears: &camera.reference_clears,
            reference_updates: &camera.reference_updates,
        }
    }

    fn action(&self, frame: usize) -> ReferenceAction {
        ReferenceAction {
            cleared: self.reference_clears.contains(&frame),
            updated: self.reference_updates.contains(&frame),
        }
    }
}

#[derive(Debug, Serialize)]
struct CameraOutput {
    name: String,
    shape: [usize; 2],
    frames: Vec<FrameRecord>,
}

#[derive(Debug, Serialize)]
struct Output {
    cameras: Vec<CameraOutput>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("beamdelta=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.cameras.is_empty() || config.cameras.len() > MAX_CAMERAS {
        return Err(format!("expected 1 to {MAX_CAMERAS} cameras in the config").into());
    }

    #[cfg(not(feature = "rayon"))]
    if config.estimator.parallel {
        tracing::warn!("`parallel` requested but the CLI was built without the `rayon` feature");
    }

    let estimator = CentroidEstimator::new().with_config((&config.estimator).into());
    let mut cameras = Vec::with_capacity(config.cameras.len());
    for (idx, camera) in config.cameras.iter().enumerate() {
        let name = camera
            .name
            .clone()
            .unwrap_or_else(|| format!("camera {}", idx + 1));
        let replay = Replay::new(camera, estimator);
        let output = match &camera.source {
            SourceConfig::Files { paths, sixteen_bit } => {
                if *sixteen_bit {
                    let frames = paths
                        .iter()
                        .map(load_gray16_image)
                        .collect::<Result<Vec<_>, _>>()?;
                    run(name, frames, &replay)?
                } else {
                    let frames = paths
                        .iter()
                        .map(load_gray_image)
                        .collect::<Result<Vec<_>, _>>()?;
                    run(name, frames, &replay)?
                }
            }
            SourceConfig::Synthetic {
                width,
                height,
                sigma,
                spots,
            } => {
                let mut spot = SpotImager::new(*width, *height, *sigma)?;
                if let Some(seconds) = camera.exposure {
                    spot.set_exposure(seconds)?;
                }
                let mut frames = Vec::with_capacity(spots.len());
                for [row, col] in spots {
                    spot.set_spot(Centroid::new(*row, *col));
                    frames.push(spot.render()?);
                }
                run(name, frames, &replay)?
            }
        };
        tracing::info!(
            camera = %output.name,
            frames = output.frames.len(),
            degenerate = output.frames.iter().filter(|f| f.degenerate.is_some()).count(),
            "camera replayed"
        );
        cameras.push(output);
    }

    let json = serde_json::to_string_pretty(&Output { cameras })?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}

/// Feeds recorded frames through a live session. After each frame index
/// listed in `reference_clears` the reference is dropped, and after each one
/// in `reference_updates` it is re-sampled; a clear runs first when a frame
/// is listed in both.
fn run<T: Sample>(
    name: String,
    frames: Vec<OwnedImage<T>>,
    replay: &Replay<'_>,
) -> Result<CameraOutput, Box<dyn std::error::Error>> {
    let count = frames.len();
    let sequence = FrameSequence::new(frames)?;
    let (height, width) = sequence.shape();
    let mut session = AlignmentSession::new(sequence, replay.estimator);
    if let Some(seconds) = replay.exposure {
        session.set_exposure(seconds)?;
    }
    session.set_live(true)?;

    let mut records = Vec::with_capacity(count);
    for frame in 0..count {
        let Some(mut snapshot) = session.poll()? else {
            break;
        };
        let action = replay.action(frame);
        if action.cleared {
            snapshot = session.clear_reference()?;
        }
        if action.updated {
            session.update_reference()?;
            if let Some(updated) = session.tracker().snapshot() {
                snapshot = updated;
            }
        }
        records.push(FrameRecord::new(frame, &snapshot, action));
    }
    session.set_live(false)?;

    Ok(CameraOutput {
        name,
        shape: [height, width],
        frames: records,
    })
}
