//! Configuration file support for chart-annotations.
//!
//! This module handles loading and validating the annotation defaults from the
//! configuration file located at `~/.config/chart-annotations/config.toml`.
//! Settings cover annotation behaviour, label and shape styling, control point
//! handles and the chart-level annotation layer.
//!
//! If no config file exists, the built-in defaults are used automatically.

pub mod types;

// Re-export commonly used types at module level
pub use types::{AnnotationConfig, ChartConfig, ControlPointConfig, LabelConfig, ShapeConfig};

use crate::annotation::{
    AnnotationOptions, ControlPointOptions, ControlPointStyle, LabelOptions, ShapeOptions,
    TextStyle,
};
use crate::draw::Color;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// All fields have defaults matching the built-in annotation defaults, so an
/// empty file behaves exactly like no file.
///
/// # Example TOML
/// ```toml
/// [annotation]
/// draggable = "xy"
/// z_index = 6
///
/// [label]
/// background_color = "rgba(255, 255, 255, 0.9)"
/// border_color = "#335cad"
/// font_size = 12.0
///
/// [shape]
/// stroke = "red"
/// stroke_width = 2.0
///
/// [control_point]
/// symbol = "square"
/// visible = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Behaviour shared by every annotation
    #[serde(default)]
    pub annotation: AnnotationConfig,

    /// Label defaults
    #[serde(default)]
    pub label: LabelConfig,

    /// Shape defaults
    #[serde(default)]
    pub shape: ShapeConfig,

    /// Control point handle defaults
    #[serde(default)]
    pub control_point: ControlPointConfig,

    /// Annotation layer settings
    #[serde(default)]
    pub chart: ChartConfig,
}

/// Clamps a value into a range, logging when it was out of range.
fn clamp_logged(name: &str, value: &mut f64, min: f64, max: f64) {
    if !(min..=max).contains(value) {
        warn!(
            "Invalid {} {:.1}, clamping to {:.1}-{:.1} range",
            name, value, min, max
        );
        *value = if value.is_nan() { min } else { (*value).clamp(min, max) };
    }
}

/// Replaces an unparseable color with a fallback, logging it.
fn check_color(name: &str, value: &mut String, fallback: &str) {
    if value.parse::<Color>().is_err() {
        warn!("Invalid {} '{}', falling back to '{}'", name, value, fallback);
        *value = fallback.to_string();
    }
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped (numbers) or replaced by the default
    /// (colors and names) and a warning is logged.
    ///
    /// Validated ranges:
    /// - `label.padding`, `label.border_radius`: 0.0 - 50.0
    /// - `label.border_width`, `shape.stroke_width`, `shape.snap`: 0.0 - 20.0
    /// - `label.font_size`: 6.0 - 72.0
    /// - `shape.r`: 0.0 - 500.0
    /// - `control_point.width`, `control_point.height`: 2.0 - 50.0
    /// - `control_point.stroke_width`: 0.0 - 10.0
    pub fn validate_and_clamp(&mut self) {
        let label = &mut self.label;
        clamp_logged("label padding", &mut label.padding, 0.0, 50.0);
        clamp_logged("label border_radius", &mut label.border_radius, 0.0, 50.0);
        clamp_logged("label border_width", &mut label.border_width, 0.0, 20.0);
        clamp_logged("label font_size", &mut label.font_size, 6.0, 72.0);

        if !matches!(
            label.shape.as_str(),
            "callout" | "rect" | "circle" | "connector"
        ) {
            warn!(
                "Invalid label shape '{}', falling back to 'callout'",
                label.shape
            );
            label.shape = "callout".to_string();
        }

        let valid_weight = matches!(label.font_weight.to_lowercase().as_str(), "normal" | "bold")
            || label
                .font_weight
                .parse::<u32>()
                .is_ok_and(|w| (100..=900).contains(&w));
        if !valid_weight {
            warn!(
                "Invalid label font_weight '{}', falling back to 'normal'",
                label.font_weight
            );
            label.font_weight = "normal".to_string();
        }

        check_color("label background_color", &mut label.background_color, "rgba(0, 0, 0, 0.75)");
        check_color("label border_color", &mut label.border_color, "black");
        if label.color != "contrast" {
            check_color("label color", &mut label.color, "contrast");
        }

        let shape = &mut self.shape;
        clamp_logged("shape stroke_width", &mut shape.stroke_width, 0.0, 20.0);
        clamp_logged("shape snap", &mut shape.snap, 0.0, 20.0);
        clamp_logged("shape r", &mut shape.r, 0.0, 500.0);
        check_color("shape stroke", &mut shape.stroke, "rgba(0, 0, 0, 0.75)");
        check_color("shape fill", &mut shape.fill, "rgba(0, 0, 0, 0.75)");

        let handle = &mut self.control_point;
        clamp_logged("control_point width", &mut handle.width, 2.0, 50.0);
        clamp_logged("control_point height", &mut handle.height, 2.0, 50.0);
        clamp_logged("control_point stroke_width", &mut handle.stroke_width, 0.0, 10.0);
        if !matches!(handle.symbol.as_str(), "circle" | "square") {
            warn!(
                "Invalid control_point symbol '{}', falling back to 'circle'",
                handle.symbol
            );
            handle.symbol = "circle".to_string();
        }
        check_color("control_point stroke", &mut handle.stroke, "black");
        check_color("control_point fill", &mut handle.fill, "white");
    }

    /// Annotation options every user annotation is merged over.
    pub fn annotation_defaults(&self) -> AnnotationOptions {
        let label = &self.label;
        let shape = &self.shape;
        let handle = &self.control_point;

        AnnotationOptions {
            visible: Some(self.annotation.visible),
            draggable: Some(self.annotation.draggable),
            z_index: Some(self.annotation.z_index),
            label_options: Some(LabelOptions {
                align: Some(label.align),
                allow_overlap: Some(label.allow_overlap),
                background_color: Some(label.background_color.clone()),
                border_color: Some(label.border_color.clone()),
                border_radius: Some(label.border_radius),
                border_width: Some(label.border_width),
                class_name: Some(label.class_name.clone()),
                crop: Some(label.crop),
                overflow: Some(label.overflow),
                padding: Some(label.padding),
                shadow: Some(label.shadow),
                shape: Some(label.shape.clone()),
                style: Some(TextStyle {
                    font_size: Some(label.font_size),
                    font_weight: Some(label.font_weight.clone()),
                    color: Some(label.color.clone()),
                }),
                use_html: Some(label.use_html),
                vertical_align: Some(label.vertical_align),
                x: Some(label.x),
                y: Some(label.y),
                ..Default::default()
            }),
            shape_options: Some(ShapeOptions {
                stroke: Some(shape.stroke.clone()),
                stroke_width: Some(shape.stroke_width),
                fill: Some(shape.fill.clone()),
                r: Some(shape.r),
                snap: Some(shape.snap),
                ..Default::default()
            }),
            control_point_options: Some(ControlPointOptions {
                symbol: Some(handle.symbol.clone()),
                width: Some(handle.width),
                height: Some(handle.height),
                style: Some(ControlPointStyle {
                    stroke: Some(handle.stroke.clone()),
                    stroke_width: Some(handle.stroke_width),
                    fill: Some(handle.fill.clone()),
                }),
                visible: Some(handle.visible),
            }),
            ..Default::default()
        }
    }

    /// JSON schema of the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/chart-annotations/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("chart-annotations");

        Ok(config_dir.join("config.toml"))
    }

    /// Parses and validates configuration TOML.
    pub fn from_toml(config_str: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(config_str).context("Invalid config TOML")?;
        config.validate_and_clamp();
        Ok(config)
    }

    /// Loads configuration from file, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let config = Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Saves the current configuration to file, creating the directory if needed.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory cannot be created
    /// - The config cannot be serialized to TOML
    /// - The file cannot be written
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Draggable;

    #[test]
    fn empty_file_equals_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(
            config.annotation_defaults(),
            Config::default().annotation_defaults()
        );
    }

    #[test]
    fn builtin_label_defaults() {
        let defaults = Config::default().annotation_defaults();
        let label = defaults.label_options.unwrap();
        assert_eq!(label.y, Some(-16.0));
        assert_eq!(label.padding, Some(5.0));
        assert_eq!(label.shape.as_deref(), Some("callout"));
        assert_eq!(label.allow_overlap, Some(false));
        assert_eq!(defaults.z_index, Some(6));
        assert_eq!(defaults.draggable, Some(Draggable::Xy));
        assert_eq!(
            defaults.control_point_options.and_then(|c| c.visible),
            Some(false)
        );
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = Config::from_toml(
            r#"
            [label]
            padding = 500.0
            shape = "star"
            background_color = "not-a-color"

            [control_point]
            width = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.label.padding, 50.0);
        assert_eq!(config.label.shape, "callout");
        assert_eq!(config.label.background_color, "rgba(0, 0, 0, 0.75)");
        assert_eq!(config.control_point.width, 2.0);
    }

    #[test]
    fn sections_parse_enums() {
        let config = Config::from_toml(
            r#"
            [annotation]
            draggable = ""

            [label]
            align = "left"
            overflow = "none"
            "#,
        )
        .unwrap();
        assert_eq!(config.annotation.draggable, Draggable::Disabled);
        let label = config.annotation_defaults().label_options.unwrap();
        assert_eq!(label.align, Some(crate::annotation::Align::Left));
        assert_eq!(label.overflow, Some(crate::annotation::Overflow::Allow));
    }

    #[test]
    fn schema_names_every_section() {
        let schema = serde_json::to_string(&Config::json_schema()).unwrap();
        for section in ["annotation", "label", "shape", "control_point", "chart"] {
            assert!(schema.contains(section), "missing {section}");
        }
    }
}
