//! enclosure: build a parametric enclosure and write its export files.
//!
//! Set `RUST_LOG` to control log output, e.g. `RUST_LOG=enclosure_lib=debug`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use enclosure_lib::import::StlDirectory;
use enclosure_lib::state::{EnclosureConfig, ParameterStore};
use enclosure_lib::{Result, Workspace};
use shared::{ComponentKind, ScrewClass, StlFormat};

/// Parametric enclosure generator.
///
/// Derives the shell, lid and screw posts, places library components and writes
/// the enclosure STL, the lid STL and the placement manifest.
#[derive(Parser)]
#[command(name = "enclosure")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to the per-user config)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Component STL library root
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// STL encoding
    #[arg(long)]
    format: Option<Format>,

    /// Library component to place (repeatable)
    #[arg(short, long = "component")]
    components: Vec<Component>,

    #[arg(long)]
    length: Option<f64>,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    #[arg(long)]
    wall: Option<f64>,
    #[arg(long)]
    base: Option<f64>,
    #[arg(long)]
    lid: Option<f64>,

    /// Lid screw size
    #[arg(long)]
    screw: Option<Screw>,

    /// Store the effective settings as the per-user config
    #[arg(long)]
    save_config: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Binary,
    Ascii,
}

#[derive(Clone, Copy, ValueEnum)]
enum Component {
    ArduinoUno,
    Esp32,
    LedRgb,
    LcdI2c16x2,
    Cube,
}

#[derive(Clone, Copy, ValueEnum)]
enum Screw {
    M2,
    M3,
    M4,
}

impl From<Format> for StlFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Binary => StlFormat::Binary,
            Format::Ascii => StlFormat::Ascii,
        }
    }
}

impl From<Component> for ComponentKind {
    fn from(component: Component) -> Self {
        match component {
            Component::ArduinoUno => ComponentKind::ArduinoUno,
            Component::Esp32 => ComponentKind::Esp32,
            Component::LedRgb => ComponentKind::LedRgb,
            Component::LcdI2c16x2 => ComponentKind::LcdI2c16x2,
            Component::Cube => ComponentKind::AdditionalCube,
        }
    }
}

impl From<Screw> for ScrewClass {
    fn from(screw: Screw) -> Self {
        match screw {
            Screw::M2 => ScrewClass::M2,
            Screw::M3 => ScrewClass::M3,
            Screw::M4 => ScrewClass::M4,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "enclosure=info,enclosure_lib=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => EnclosureConfig::load_from(path)?,
        None => EnclosureConfig::load(),
    };
    if let Some(assets) = cli.assets {
        config.assets_root = assets;
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if let Some(format) = cli.format {
        config.stl_format = format.into();
    }

    let mut store = ParameterStore::new(config.defaults.clone());
    let overrides = [
        ("length", cli.length),
        ("width", cli.width),
        ("height", cli.height),
        ("wall_thickness", cli.wall),
        ("base_thickness", cli.base),
        ("lid_thickness", cli.lid),
    ];
    for (name, value) in overrides {
        if let Some(value) = value {
            store.set(name, value)?;
        }
    }
    if let Some(screw) = cli.screw {
        store.set_screw(screw.into());
    }
    config.defaults = store.params().clone();

    if cli.save_config {
        config.save()?;
    }

    let source = Arc::new(StlDirectory::new(&config.assets_root));
    let mut workspace = Workspace::new(config.defaults.clone())?
        .with_imports(source, tokio::runtime::Handle::current());

    for component in cli.components {
        workspace.request_import(component.into())?;
    }
    workspace.wait_for_imports().await;
    for failure in workspace.take_import_failures() {
        tracing::warn!(
            "{} was not placed: {}",
            failure.component.display_name(),
            failure.error
        );
    }

    workspace.tick()?;
    let bundle = workspace.export(config.stl_format)?;
    let written = bundle.write_to_dir(&config.output_dir, &config.export_names)?;
    tracing::info!(
        "Exported {} files to {}",
        written.len(),
        config.output_dir.display()
    );
    Ok(())
}
