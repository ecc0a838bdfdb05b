use crate::model::ShapeMetrics;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Every tunable constant of the editor. Missing keys fall back to the
/// defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub node_radius: f32,
    /// Node pick slack, in screen pixels.
    pub pick_tolerance: f32,
    /// Width of the invisible band around an edge that still counts as a hit,
    /// in diagram units.
    pub edge_hit_width: f32,
    pub label_text_size: f32,
    pub label_char_width: f32,
    pub label_padding: f32,
    pub wheel_zoom_factor: f32,
    pub button_zoom_factor: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub reset_padding: f32,
    pub cancel_edge_on_empty_click: bool,
    pub seed_sample_network: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            node_radius: 25.0,
            pick_tolerance: 10.0,
            edge_hit_width: 16.0,
            label_text_size: 11.0,
            label_char_width: 0.6,
            label_padding: 2.0,
            wheel_zoom_factor: 1.15,
            button_zoom_factor: 1.2,
            min_zoom: 0.1,
            max_zoom: 8.0,
            reset_padding: 100.0,
            cancel_edge_on_empty_click: true,
            seed_sample_network: true,
        }
    }
}

impl EditorSettings {
    pub fn shape_metrics(&self) -> ShapeMetrics {
        ShapeMetrics {
            node_radius: self.node_radius,
            label_text_size: self.label_text_size,
            label_char_width: self.label_char_width,
            label_padding: self.label_padding,
            ..ShapeMetrics::default()
        }
    }

    /// Rejects values the viewport and hit-testing cannot work with: zoom
    /// limits must form a positive range, zoom steps must zoom in, sizes
    /// must be finite.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("node_radius", self.node_radius),
            ("label_text_size", self.label_text_size),
            ("label_char_width", self.label_char_width),
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must be a finite number above zero",
                });
            }
        }
        let non_negative = [
            ("pick_tolerance", self.pick_tolerance),
            ("edge_hit_width", self.edge_hit_width),
            ("label_padding", self.label_padding),
            ("reset_padding", self.reset_padding),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must be a finite number, zero or more",
                });
            }
        }
        for (field, value) in [
            ("wheel_zoom_factor", self.wheel_zoom_factor),
            ("button_zoom_factor", self.button_zoom_factor),
        ] {
            if !value.is_finite() || value <= 1.0 {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must be a finite number above one",
                });
            }
        }
        if self.min_zoom > self.max_zoom {
            return Err(SettingsError::Invalid {
                field: "min_zoom",
                reason: "must not exceed max_zoom",
            });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("cannot encode settings as TOML: {0}")]
    TomlEncode(#[from] toml::ser::Error),
    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// `$HOME/.config/netsim.toml` if it exists, else `./netsim.toml` if it
/// exists.
pub fn config_path() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".config").join("netsim.toml");
        if path.exists() {
            return Some(path);
        }
    }
    let local = PathBuf::from("netsim.toml");
    local.exists().then_some(local)
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

/// Parses and validates. The preferred format's error is reported when
/// neither format parses.
pub fn parse_settings(text: &str, toml_first: bool) -> Result<EditorSettings, SettingsError> {
    let settings = parse_either(text, toml_first)?;
    settings.validate()?;
    Ok(settings)
}

fn parse_either(text: &str, toml_first: bool) -> Result<EditorSettings, SettingsError> {
    if toml_first {
        toml::from_str::<EditorSettings>(text).or_else(|err| {
            serde_json::from_str::<EditorSettings>(text).map_err(|_| SettingsError::Toml(err))
        })
    } else {
        serde_json::from_str::<EditorSettings>(text).or_else(|err| {
            toml::from_str::<EditorSettings>(text).map_err(|_| SettingsError::Json(err))
        })
    }
}

pub fn load_settings(path: &Path) -> Result<EditorSettings, SettingsError> {
    let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&text, is_toml(path))
}

/// Loads from `config_path()`, falling back to defaults when there is no
/// file or it cannot be read, parsed or validated.
pub fn load_or_default() -> EditorSettings {
    let Some(path) = config_path() else {
        tracing::debug!("no settings file found, using defaults");
        return EditorSettings::default();
    };
    match load_settings(&path) {
        Ok(settings) => {
            tracing::info!(path = %path.display(), "loaded settings");
            settings
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "falling back to default settings");
            EditorSettings::default()
        }
    }
}

pub fn save_settings(path: &Path, settings: &EditorSettings) -> Result<(), SettingsError> {
    let text = if is_toml(path) {
        toml::to_string_pretty(settings)?
    } else {
        serde_json::to_string_pretty(settings)?
    };
    std::fs::write(path, text).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}
