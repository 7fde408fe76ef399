use crate::engine::FloorConfig;
use crate::model::{ItemKind, Rgba};
use eframe::egui;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML settings: {0}")]
    TomlRead(#[from] toml::de::Error),
    #[error("cannot write TOML settings: {0}")]
    TomlWrite(#[from] toml::ser::Error),
    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// How one item kind is drawn. Unset fields fall back to built-in values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KindStyle {
    pub kind: ItemKind,
    #[serde(default)]
    pub color: Option<Rgba>,
    #[serde(default)]
    pub glyph: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub floor_path: String,
    pub last_room: Option<u64>,
    pub floor: FloorConfig,
    pub kind_styles: Vec<KindStyle>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            floor_path: "floor.json".to_string(),
            last_room: None,
            floor: FloorConfig::default(),
            kind_styles: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KindLook {
    pub fill: egui::Color32,
    pub glyph: String,
}

/// Display style per item kind, resolved once from the settings.
#[derive(Clone, Debug, PartialEq)]
pub struct KindPalette {
    looks: [KindLook; ItemKind::ALL.len()],
}

impl KindPalette {
    pub fn resolve(styles: &[KindStyle]) -> Self {
        let looks = ItemKind::ALL.map(|kind| {
            let mut look = builtin_look(kind);
            for style in styles.iter().filter(|s| s.kind == kind) {
                if let Some(color) = style.color {
                    look.fill = color.to_color32();
                }
                if let Some(glyph) = &style.glyph {
                    look.glyph = glyph.clone();
                }
            }
            look
        });
        Self { looks }
    }

    pub fn look(&self, kind: ItemKind) -> &KindLook {
        &self.looks[kind.index()]
    }
}

impl Default for KindPalette {
    fn default() -> Self {
        Self::resolve(&[])
    }
}

fn builtin_look(kind: ItemKind) -> KindLook {
    let (rgba, glyph) = match kind {
        ItemKind::Rack => (Rgba::rgb(70, 110, 170), "R"),
        ItemKind::CoolingUnit => (Rgba::rgb(60, 150, 170), "C"),
        ItemKind::PowerPanel => (Rgba::rgb(190, 140, 50), "P"),
        ItemKind::Ups => (Rgba::rgb(160, 80, 60), "U"),
        ItemKind::Pdu => (Rgba::rgb(130, 100, 170), "D"),
        ItemKind::Other => (Rgba::rgb(110, 110, 110), "?"),
    };
    KindLook {
        fill: rgba.to_color32(),
        glyph: glyph.to_string(),
    }
}

pub fn config_path() -> Option<String> {
    if let Some(home) = std::env::var_os("HOME") {
        let path = std::path::PathBuf::from(home).join(".config").join("rackfloor.toml");
        if path.exists() {
            return Some(path.display().to_string());
        }
    }
    if std::path::Path::new("settings.toml").exists() {
        return Some("settings.toml".to_string());
    }
    None
}

/// Reads settings in the format the extension names, trying the other
/// format if that fails.
pub fn load_settings(path: &str) -> Result<AppSettings, SettingsError> {
    let s = std::fs::read_to_string(path)?;
    let settings = if path.ends_with(".toml") {
        match toml::from_str::<AppSettings>(&s) {
            Ok(settings) => settings,
            Err(toml_err) => serde_json::from_str::<AppSettings>(&s).map_err(|_| toml_err)?,
        }
    } else {
        match serde_json::from_str::<AppSettings>(&s) {
            Ok(settings) => settings,
            Err(json_err) => toml::from_str::<AppSettings>(&s).map_err(|_| json_err)?,
        }
    };
    Ok(AppSettings {
        floor: settings.floor.sanitized(),
        ..settings
    })
}

pub fn save_settings(path: &str, settings: &AppSettings) -> Result<(), SettingsError> {
    let text = if path.ends_with(".toml") {
        toml::to_string_pretty(settings)?
    } else {
        serde_json::to_string_pretty(settings)?
    };
    std::fs::write(path, text)?;
    Ok(())
}

/// Settings from the first readable source, else defaults. Returns the
/// path later saves should go to: the file the settings came from, or the
/// preferred config path when nothing was readable.
pub fn load_or_default() -> (String, AppSettings) {
    let path = config_path().unwrap_or_else(|| "settings.toml".to_string());
    let candidates = [path.clone(), "settings.json".to_string()];
    load_first(&candidates).unwrap_or_else(|| (path, AppSettings::default()))
}

fn load_first(candidates: &[String]) -> Option<(String, AppSettings)> {
    for candidate in candidates {
        match load_settings(candidate) {
            Ok(settings) => {
                tracing::info!(path = %candidate, "settings loaded");
                return Some((candidate.clone(), settings));
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %candidate, error = %e, "ignoring unreadable settings"),
        }
    }
    None
}
