use clap::Parser;
use patchpick::io::load_raster;
use patchpick::patch::export::write_patches;
use patchpick::{
    extract_patches, ClassTag, Command, DetectConfig, Detector, PatchError, Region,
    SelectionState,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "patchpick CLI (JSON config driven)")]
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
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
enum ClassTagConfig {
    #[default]
    Positive,
    Negative,
    Ambiguous,
    Background,
}

impl From<ClassTagConfig> for ClassTag {
    fn from(value: ClassTagConfig) -> Self {
        match value {
            ClassTagConfig::Positive => ClassTag::Positive,
            ClassTagConfig::Negative => ClassTag::Negative,
            ClassTagConfig::Ambiguous => ClassTag::Ambiguous,
            ClassTagConfig::Background => ClassTag::Background,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
struct RegionJson {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl From<RegionJson> for Region {
    fn from(value: RegionJson) -> Self {
        Region::new(value.x, value.y, value.width, value.height)
    }
}

impl From<Region> for RegionJson {
    fn from(value: Region) -> Self {
        Self {
            x: value.x,
            y: value.y,
            width: value.width,
            height: value.height,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DragJson {
    index: usize,
    dx: isize,
    dy: isize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DetectConfigJson {
    parallel: bool,
    min_var_i: f32,
}

impl Default for DetectConfigJson {
    fn default() -> Self {
        let cfg = DetectConfig::default();
        Self {
            parallel: cfg.parallel,
            min_var_i: cfg.min_var_i,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    region: Option<RegionJson>,
    output_dir: String,
    base_name: Option<String>,
    class_tag: ClassTagConfig,
    threshold: Option<f32>,
    drags: Vec<DragJson>,
    toggles: Vec<usize>,
    detect: DetectConfigJson,
    dry_run: bool,
    session_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_path: String::new(),
            region: None,
            output_dir: "patches".to_string(),
            base_name: None,
            class_tag: ClassTagConfig::default(),
            threshold: None,
            drags: Vec::new(),
            toggles: Vec::new(),
            detect: DetectConfigJson::default(),
            dry_run: false,
            session_path: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct CandidateRecord {
    index: usize,
    x: usize,
    y: usize,
    raw_score: f32,
    score: f32,
    bad: bool,
    manual_good: bool,
    manual_bad: bool,
    included: bool,
}

#[derive(Debug, Serialize)]
struct SessionRecord {
    image_path: String,
    template: RegionJson,
    class_tag: ClassTagConfig,
    threshold: f32,
    candidates: Vec<CandidateRecord>,
    written: Vec<String>,
}

fn candidate_records(selection: &SelectionState) -> Vec<CandidateRecord> {
    let mask = selection.inclusion_mask();
    selection
        .candidates()
        .iter()
        .zip(mask)
        .enumerate()
        .map(|(index, (c, included))| {
            let (x, y) = c.center();
            CandidateRecord {
                index,
                x,
                y,
                raw_score: c.raw_score(),
                score: c.score(),
                bad: c.is_bad(),
                manual_good: c.manual_good(),
                manual_bad: c.manual_bad(),
                included,
            }
        })
        .collect()
}

fn apply_edits(selection: &mut SelectionState, config: &Config) -> Result<(), PatchError> {
    if let Some(threshold) = config.threshold {
        selection.apply(Command::SetThreshold(threshold))?;
    }
    for drag in &config.drags {
        selection.apply(Command::BeginDrag {
            index: drag.index,
            at: (0, 0),
        })?;
        selection.apply(Command::UpdateDrag {
            index: drag.index,
            at: (drag.dx, drag.dy),
        })?;
        selection.apply(Command::CommitDrag(drag.index))?;
    }
    for &index in &config.toggles {
        selection.apply(Command::Toggle(index))?;
    }
    Ok(())
}

fn base_name(config: &Config) -> String {
    config.base_name.clone().unwrap_or_else(|| {
        Path::new(&config.image_path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string())
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("patchpick=info".parse()?))
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
    if config.image_path.is_empty() {
        return Err("image_path must be set in the config".into());
    }
    let Some(region) = config.region else {
        return Err("region must be set in the config".into());
    };

    let raster = load_raster(&config.image_path)?;
    let detector = Detector::new().with_config(DetectConfig {
        parallel: config.detect.parallel,
        min_var_i: config.detect.min_var_i,
    });
    let mut detection = detector.compute(&raster, region.into())?;
    tracing::info!(
        candidates = detection.selection().len(),
        threshold = detection.selection().threshold(),
        "detection finished"
    );

    apply_edits(detection.selection_mut(), &config)?;
    let selection = detection.selection();

    let mut written = Vec::new();
    if !config.dry_run {
        let patches = extract_patches(&raster, selection)?;
        let tag = ClassTag::from(config.class_tag);
        let paths = write_patches(&config.output_dir, &base_name(&config), tag, &patches)?;
        tracing::info!(count = paths.len(), dir = %config.output_dir, "patches written");
        written = paths
            .iter()
            .map(|path| path.display().to_string())
            .collect();
    }

    let record = SessionRecord {
        image_path: config.image_path.clone(),
        template: detection.template().region().into(),
        class_tag: config.class_tag,
        threshold: selection.threshold(),
        candidates: candidate_records(selection),
        written,
    };
    let json = serde_json::to_string_pretty(&record)?;

    match config.session_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
