// Copyright 2025 the Schemcanvas Authors
// SPDX-License-Identifier: Apache-2.0

//! Runtime configuration loaded from a TOML file.
//!
//! Every field is optional; missing values fall back to the defaults in
//! `settings.rs`. Lengths are written either as a bare number (pixels) or
//! as a string with a unit suffix:
//!
//! ```toml
//! [grid]
//! major_size = "1cm"
//! subdivisions = 4
//! visible = true
//!
//! [view]
//! min_zoom = 0.25
//! max_zoom = 10.0
//!
//! [snap]
//! max_distance = "0.5cm"
//!
//! [[symbols]]
//! id = "diode"
//! width = "1.5cm"
//! height = "0.5cm"
//! pins = [
//!     { name = "a", x = "-0.75cm", y = 0 },
//!     { name = "k", x = "0.75cm", y = 0 },
//! ]
//! ```

use crate::editing::grid::GridSettings;
use crate::editing::EditSession;
use crate::geometry::{Length, UnitError, ensure_in_px};
use crate::model::{Symbol, SymbolLibrary};
use crate::settings;
use anyhow::{Context, Result};
use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A length as written in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LengthValue {
    /// Pixels
    Number(f64),
    /// Number with an optional unit suffix, e.g. `"2.5mm"`
    Text(String),
}

impl LengthValue {
    /// The length with its unit. Text with an unknown unit suffix falls
    /// back to pixels, as `ensure_in_px` does.
    pub fn to_length(&self) -> Result<Length, UnitError> {
        match self {
            LengthValue::Number(v) => Ok(Length::px(*v)),
            LengthValue::Text(s) => match s.parse::<Length>() {
                Err(UnitError::InvalidUnit(_)) => self.to_px().map(Length::px),
                parsed => parsed,
            },
        }
    }

    pub fn to_px(&self) -> Result<f64, UnitError> {
        match self {
            LengthValue::Number(v) => ensure_in_px(*v),
            LengthValue::Text(s) => ensure_in_px(s.as_str()),
        }
    }
}

impl From<Length> for LengthValue {
    fn from(length: Length) -> Self {
        LengthValue::Text(length.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub major_size: LengthValue,
    pub subdivisions: u32,
    pub visible: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            major_size: Length::cm(settings::grid::MAJOR_SIZE_CM).into(),
            subdivisions: settings::grid::SUBDIVISIONS,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: settings::view::MIN_ZOOM,
            max_zoom: settings::view::MAX_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    pub max_distance: LengthValue,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            max_distance: Length::cm(settings::snap::MAX_DISTANCE_CM).into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinConfig {
    pub name: String,
    pub x: LengthValue,
    pub y: LengthValue,
}

/// An extra library symbol. Its outline is centered on the reference
/// point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub width: LengthValue,
    pub height: LengthValue,
    #[serde(default)]
    pub pins: Vec<PinConfig>,
}

impl SymbolConfig {
    fn to_symbol(&self) -> Result<Symbol> {
        let width = self.width.to_px().context("width")?;
        let height = self.height.to_px().context("height")?;
        if !(width >= 0.0 && height >= 0.0) {
            anyhow::bail!("negative size {width}x{height}");
        }
        let bbox = Rect::from_center_size((0.0, 0.0), (width, height));
        let name = self.name.clone().unwrap_or_else(|| self.id.clone());
        let mut symbol = Symbol::new(self.id.clone(), name, bbox);
        for pin in &self.pins {
            let x = pin.x.to_px().with_context(|| format!("pin '{}'", pin.name))?;
            let y = pin.y.to_px().with_context(|| format!("pin '{}'", pin.name))?;
            symbol = symbol.with_pin(pin.name.clone(), Vec2::new(x, y));
        }
        Ok(symbol)
    }
}

/// Editor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub grid: GridConfig,
    pub view: ViewConfig,
    pub snap: SnapConfig,
    pub symbols: Vec<SymbolConfig>,
}

impl EditorConfig {
    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn grid_settings(&self) -> Result<GridSettings> {
        let grid = GridSettings {
            major_size: self.grid.major_size.to_length().context("grid.major_size")?,
            subdivisions: self.grid.subdivisions,
            visible: self.grid.visible,
        };
        grid.validate().context("grid")?;
        Ok(grid)
    }

    /// Maximum snap distance in pixels
    pub fn snap_distance(&self) -> Result<f64> {
        let px = self
            .snap
            .max_distance
            .to_px()
            .context("snap.max_distance")?;
        if !(px.is_finite() && px >= 0.0) {
            anyhow::bail!("snap.max_distance must be a non-negative length, got {px}px");
        }
        Ok(px)
    }

    /// Built-in symbols plus the ones declared in the file
    pub fn symbol_library(&self) -> Result<SymbolLibrary> {
        let mut library = SymbolLibrary::builtin();
        for entry in &self.symbols {
            let symbol = entry
                .to_symbol()
                .with_context(|| format!("symbol '{}'", entry.id))?;
            library.insert(symbol);
        }
        Ok(library)
    }

    /// Create an edit session for a canvas element at `element`
    pub fn build_session(&self, element: Rect) -> Result<EditSession> {
        let mut session = EditSession::new(element, self.grid_settings()?, self.symbol_library()?);
        let ViewConfig { min_zoom, max_zoom } = self.view;
        if !(min_zoom > 0.0 && min_zoom <= max_zoom) {
            anyhow::bail!("view zoom limits [{min_zoom}, {max_zoom}] are not a valid range");
        }
        session.viewport.set_zoom_limits(min_zoom, max_zoom);
        session.snap.set_max_distance(self.snap_distance()?);
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = EditorConfig::parse("").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.grid_settings().unwrap(), GridSettings::default());
        assert!((config.snap_distance().unwrap() - 18.897637795275593).abs() < 1e-9);
    }

    #[test]
    fn parse_full_file() {
        let config = EditorConfig::parse(
            r#"
            [grid]
            major_size = "5mm"
            subdivisions = 2
            visible = false

            [view]
            max_zoom = 4.0

            [snap]
            max_distance = 12

            [[symbols]]
            id = "diode"
            name = "Diode"
            width = "1in"
            height = 24
            pins = [
                { name = "a", x = "-0.5in", y = 0 },
                { name = "k", x = "0.5in", y = 0 },
            ]
            "#,
        )
        .unwrap();

        let grid = config.grid_settings().unwrap();
        assert_eq!(grid.major_size, Length::mm(5.0));
        assert_eq!(grid.subdivisions, 2);
        assert!(!grid.visible);
        assert_eq!(config.view.min_zoom, settings::view::MIN_ZOOM);
        assert_eq!(config.snap_distance().unwrap(), 12.0);

        let library = config.symbol_library().unwrap();
        let diode = library.get("diode").unwrap();
        assert_eq!(diode.bbox, Rect::new(-48.0, -12.0, 48.0, 12.0));
        assert_eq!(diode.pins[1].offset, Vec2::new(48.0, 0.0));
        assert!(library.contains("resistor"));

        let session = config.build_session(Rect::new(0.0, 0.0, 800.0, 600.0)).unwrap();
        assert_eq!(session.viewport.zoom_limits(), (settings::view::MIN_ZOOM, 4.0));
        assert_eq!(session.snap.max_distance(), 12.0);
        assert_eq!(session.snap.grid(), &grid);
    }

    #[test]
    fn bad_values_are_reported() {
        let config = EditorConfig::parse("[grid]\nsubdivisions = 0\n").unwrap();
        assert!(config.grid_settings().is_err());

        let config = EditorConfig::parse("[snap]\nmax_distance = \"far\"\n").unwrap();
        let err = config.snap_distance().unwrap_err();
        assert!(format!("{err:#}").contains("snap.max_distance"));

        let config = EditorConfig::parse("[view]\nmin_zoom = 5.0\nmax_zoom = 1.0\n").unwrap();
        assert!(config.build_session(Rect::new(0.0, 0.0, 100.0, 100.0)).is_err());

        assert!(EditorConfig::parse("[grid]\nsubdivisions = \"many\"\n").is_err());
    }

    #[test]
    fn unknown_unit_falls_back_to_px() {
        let config = EditorConfig::parse(
            "[grid]\nmajor_size = \"30furlongs\"\n[snap]\nmax_distance = \"3furlongs\"\n",
        )
        .unwrap();
        assert_eq!(config.snap_distance().unwrap(), 3.0);
        assert_eq!(config.grid_settings().unwrap().major_size, Length::px(30.0));
        assert_eq!(LengthValue::Text("2in".into()).to_px().unwrap(), 192.0);
    }

    #[test]
    fn missing_file_has_context() {
        let err = EditorConfig::load(Path::new("/nonexistent/editor.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/editor.toml"));
    }
}
