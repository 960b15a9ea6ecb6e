use anyhow::{Context, Result, bail};
use chart_annotations::chart::{Chart, ChartModel, ChartSpec};
use chart_annotations::config::Config;
use chart_annotations::draw::Scene;
use clap::{ArgAction, Parser};
use std::fs;
use std::path::{Path, PathBuf};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CHART_ANNOTATIONS_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "chart-annotations")]
#[command(version = VERSION, about = "Lay out annotation overlays for a chart scene")]
struct Cli {
    /// Scene file describing the chart and its annotations (.json or .toml)
    #[arg(value_name = "SCENE")]
    scene: Option<PathBuf>,

    /// Config file to use instead of ~/.config/chart-annotations/config.toml
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the rendered scene graph as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    dump: bool,

    /// Print the effective options of every annotation as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    options: bool,

    /// Print the label graphics taking part in overlap avoidance
    #[arg(long, action = ArgAction::SetTrue)]
    labels: bool,

    /// Remove the annotation with this id before output (repeatable)
    #[arg(long, value_name = "ID")]
    remove: Vec<String>,

    /// Hide the annotation with this id before output (repeatable)
    #[arg(long, value_name = "ID")]
    hide: Vec<String>,

    /// Paint the scene to a PNG file (requires the `cairo` feature)
    #[arg(long, value_name = "PATH")]
    png: Option<PathBuf>,

    /// Write the default configuration file and exit
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "scene")]
    init_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::get_config_path()?;
        if path.exists() {
            bail!("Config file already exists at {}", path.display());
        }
        let path = Config::default().save()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let Some(scene_path) = cli.scene.as_deref() else {
        println!("chart-annotations: Lay out annotation overlays for a chart scene");
        println!();
        println!("Usage:");
        println!("  chart-annotations SCENE            Summarize annotations in SCENE");
        println!("  chart-annotations SCENE --dump     Print the scene graph as JSON");
        println!("  chart-annotations --init-config    Write the default config file");
        println!("  chart-annotations --help           Show help");
        return Ok(());
    };

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let spec = read_scene(scene_path)?;
    let model = ChartModel::from_spec(spec.model);
    let mut chart = Chart::with_config(model, Scene::new(), &config, spec.annotations);

    for id in &cli.remove {
        if !chart.remove_annotation(id) {
            log::warn!("No annotation with id '{}' to remove", id);
        }
    }
    for id in &cli.hide {
        if chart.set_annotation_visibility(id, Some(false)).is_none() {
            log::warn!("No annotation with id '{}' to hide", id);
        }
    }
    for event in chart.drain_events() {
        log::debug!("Event: {:?}", event);
    }

    if let Some(png) = &cli.png {
        write_png(&chart, png)?;
    }

    if cli.dump {
        let snapshot = chart.renderer().snapshot();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else if cli.options {
        println!(
            "{}",
            serde_json::to_string_pretty(&chart.annotation_options())?
        );
    } else if cli.labels {
        let labels = chart.collect_labels();
        println!("{}", serde_json::to_string_pretty(&labels)?);
    } else {
        print_summary(&chart);
    }

    Ok(())
}

/// Reads a scene file, picking the format from the extension.
fn read_scene(path: &Path) -> Result<ChartSpec> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene from {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let spec = if is_json {
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse scene JSON from {}", path.display()))?
    } else {
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse scene TOML from {}", path.display()))?
    };

    log::info!("Loaded scene from {}", path.display());
    Ok(spec)
}

fn print_summary(chart: &Chart<Scene>) {
    let annotations = chart.annotations();
    println!("{} annotation(s)", annotations.len());
    for annotation in annotations {
        println!(
            "{} [{}] shapes={} labels={}",
            annotation.id().unwrap_or("<no id>"),
            if annotation.is_visible() {
                "visible"
            } else {
                "hidden"
            },
            annotation.shapes().len(),
            annotation.labels().len()
        );
        for label in annotation.labels() {
            println!("  label: {}", label.text());
        }
    }
}

#[cfg(feature = "cairo")]
fn write_png(chart: &Chart<Scene>, path: &Path) -> Result<()> {
    let plot = chart.model().plot_box();
    let width = (plot.right() + plot.x).ceil() as i32;
    let height = (plot.bottom() + plot.y).ceil() as i32;

    let surface = chart_annotations::draw::render_to_surface(chart.renderer(), width, height)
        .context("Failed to create drawing surface")?;
    let mut file = fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    surface
        .write_to_png(&mut file)
        .with_context(|| format!("Failed to write PNG to {}", path.display()))?;

    log::info!("Wrote {}x{} PNG to {}", width, height, path.display());
    Ok(())
}

#[cfg(not(feature = "cairo"))]
fn write_png(_chart: &Chart<Scene>, path: &Path) -> Result<()> {
    bail!(
        "Cannot write {}: built without the `cairo` feature",
        path.display()
    )
}
