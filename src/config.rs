use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;

use crate::{
    foundation::{
        core::{Canvas, Rect, Rgba8},
        error::{CardError, CardResult},
    },
    layout::radial::MAX_SHRINK_STEPS,
};

/// Full configuration for rendering outfit cards.
///
/// Every section has defaults matching the production card profile, so a config file only
/// needs to list the values it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Upstream collaborators.
    pub endpoints: Endpoints,
    /// Canvas size and fixed regions.
    pub canvas: CanvasProfile,
    /// Radial layout tuning.
    pub layout: LayoutParams,
    /// Colors, stroke widths and image scaling.
    pub style: CardStyle,
    /// Per-request network timeout in milliseconds.
    pub timeout_ms: u64,
}

/// Upstream URLs.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Player profile endpoint; the profile id is sent as the `id` query parameter.
    pub profile_url: String,
    /// Item catalog (`[{itemID, icon, description}]`).
    pub catalog_url: String,
    /// Fallback CDN map (`[{"<id>": "<url>"}, ...]`).
    pub fallback_map_url: String,
    /// Base of the primary image path; images live at `{base}/{icon}.png`.
    pub primary_image_base: String,
}

/// Canvas size and the two fixed regions the layout works around.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CanvasProfile {
    pub width: u32,
    pub height: u32,
    /// Region the character sprite is fitted into.
    pub character_box: Rect,
    /// Region reserved for the banner; item hexagons never enter it.
    pub banner_box: Rect,
}

/// Constants consumed by the radial layout engine.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    pub preferred_hex_radius: f64,
    pub hex_radius_floor: f64,
    pub shrink_step: f64,
    pub margin: f64,
    pub orbit_offset: f64,
}

/// Visual style of the card.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CardStyle {
    pub background: Rgba8,
    pub hex_fill: Rgba8,
    pub hex_outline: Rgba8,
    pub hex_outline_width: f64,
    pub shadow: Rgba8,
    pub shadow_offset: f64,
    pub connector: Rgba8,
    pub connector_width: f64,
    /// Distance both connector endpoints are pulled inside their shapes.
    pub connector_inset: f64,
    /// Item images are drawn this much larger than the hexagon so the clip crops them.
    pub item_overscale: f64,
    pub header: HeaderStyle,
}

/// Player name drawn across the top of the card.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HeaderStyle {
    /// TrueType/OpenType font file. Without one the header is not drawn.
    pub font_path: Option<PathBuf>,
    pub size_px: f32,
    pub color: Rgba8,
    /// Baseline of the text; the text is centered horizontally on the canvas.
    pub baseline_y: f64,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            canvas: CanvasProfile::default(),
            layout: LayoutParams::default(),
            style: CardStyle::default(),
            timeout_ms: 10_000,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            profile_url: "https://world-ecletix.onrender.com/api/infoff2".to_owned(),
            catalog_url: "https://0xme.github.io/ItemID2/assets/itemData.json".to_owned(),
            fallback_map_url: "https://0xme.github.io/ItemID2/assets/cdn.json".to_owned(),
            primary_image_base:
                "https://raw.githubusercontent.com/0xme/ff-resources/refs/heads/main/pngs/300x300"
                    .to_owned(),
        }
    }
}

impl Default for CanvasProfile {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1200,
            character_box: Rect::new(470.0, 260.0, 730.0, 780.0),
            banner_box: Rect::new(300.0, 1030.0, 900.0, 1180.0),
        }
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            preferred_hex_radius: 90.0,
            hex_radius_floor: 40.0,
            shrink_step: 4.0,
            margin: 16.0,
            orbit_offset: 24.0,
        }
    }
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            background: Rgba8::rgb(0x8b, 0x00, 0x00),
            hex_fill: Rgba8::rgb(0x1a, 0x0a, 0x0a),
            hex_outline: Rgba8::rgb(0xf5, 0xf5, 0xf5),
            hex_outline_width: 5.0,
            shadow: Rgba8::rgba(0, 0, 0, 110),
            shadow_offset: 6.0,
            connector: Rgba8::rgb(0xff, 0xff, 0xff),
            connector_width: 4.0,
            connector_inset: 8.0,
            item_overscale: 1.15,
            header: HeaderStyle::default(),
        }
    }
}

impl Default for HeaderStyle {
    fn default() -> Self {
        Self {
            font_path: None,
            size_px: 70.0,
            color: Rgba8::rgb(0xff, 0x00, 0x00),
            baseline_y: 80.0,
        }
    }
}

impl CardConfig {
    /// Load a JSON config file. Missing sections fall back to defaults.
    pub fn from_path(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `OUTFIT_CARD_*` environment overrides on top of `self`.
    pub fn with_env_overrides(mut self) -> Self {
        fn var(name: &str) -> Option<String> {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        }

        if let Some(v) = var("OUTFIT_CARD_PROFILE_URL") {
            self.endpoints.profile_url = v;
        }
        if let Some(v) = var("OUTFIT_CARD_CATALOG_URL") {
            self.endpoints.catalog_url = v;
        }
        if let Some(v) = var("OUTFIT_CARD_FALLBACK_URL") {
            self.endpoints.fallback_map_url = v;
        }
        if let Some(v) = var("OUTFIT_CARD_IMAGE_BASE") {
            self.endpoints.primary_image_base = v;
        }
        if let Some(v) = var("OUTFIT_CARD_HEADER_FONT") {
            self.style.header.font_path = Some(PathBuf::from(v));
        }
        if let Some(ms) = var("OUTFIT_CARD_TIMEOUT_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&n| n > 0)
        {
            self.timeout_ms = ms;
        }
        self
    }

    /// Per-request network timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn canvas(&self) -> CardResult<Canvas> {
        Canvas::new(self.canvas.width, self.canvas.height)
    }

    pub fn validate(&self) -> CardResult<()> {
        let canvas = self.canvas()?.rect();

        let within = |r: Rect| {
            r.x0 >= canvas.x0 && r.y0 >= canvas.y0 && r.x1 <= canvas.x1 && r.y1 <= canvas.y1
        };
        let cb = self.canvas.character_box;
        if cb.width() <= 0.0 || cb.height() <= 0.0 || !within(cb) {
            return Err(CardError::validation(
                "character_box must be non-empty and inside the canvas",
            ));
        }
        let bb = self.canvas.banner_box;
        if bb.width() <= 0.0 || bb.height() <= 0.0 || !within(bb) {
            return Err(CardError::validation(
                "banner_box must be non-empty and inside the canvas",
            ));
        }

        let l = &self.layout;
        if !(l.hex_radius_floor > 0.0 && l.hex_radius_floor.is_finite()) {
            return Err(CardError::validation("hex_radius_floor must be > 0"));
        }
        if !(l.preferred_hex_radius.is_finite() && l.preferred_hex_radius >= l.hex_radius_floor) {
            return Err(CardError::validation(
                "preferred_hex_radius must be >= hex_radius_floor",
            ));
        }
        if !(l.shrink_step > 0.0 && l.shrink_step.is_finite()) {
            return Err(CardError::validation("shrink_step must be > 0"));
        }
        if (l.preferred_hex_radius - l.hex_radius_floor) / l.shrink_step
            > MAX_SHRINK_STEPS as f64
        {
            return Err(CardError::validation(format!(
                "shrink_step must reach hex_radius_floor within {MAX_SHRINK_STEPS} steps"
            )));
        }
        if !(l.margin >= 0.0 && l.margin.is_finite()) {
            return Err(CardError::validation("margin must be >= 0"));
        }
        if !(l.orbit_offset >= 0.0 && l.orbit_offset.is_finite()) {
            return Err(CardError::validation("orbit_offset must be >= 0"));
        }

        let s = &self.style;
        if !(s.item_overscale >= 1.0 && s.item_overscale.is_finite()) {
            return Err(CardError::validation("item_overscale must be >= 1"));
        }
        if s.hex_outline_width < 0.0 || s.connector_width < 0.0 || s.connector_inset < 0.0 {
            return Err(CardError::validation(
                "stroke widths and connector_inset must be >= 0",
            ));
        }

        let h = &s.header;
        if !(h.size_px.is_finite() && h.size_px > 0.0) {
            return Err(CardError::validation("header size_px must be > 0"));
        }
        if !h.baseline_y.is_finite() {
            return Err(CardError::validation("header baseline_y must be finite"));
        }

        if self.timeout_ms == 0 {
            return Err(CardError::validation("timeout_ms must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
