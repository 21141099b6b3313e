use std::sync::Arc;

use crate::{
    config::HeaderStyle,
    foundation::{
        core::Rgba8,
        error::{CardError, CardResult},
    },
    render::cpu::color_to_cpu,
};

/// Label used when the profile carries no nickname.
pub const DEFAULT_HEADER: &str = "PLAYER";

/// Header label for a profile: the nickname, or [`DEFAULT_HEADER`] when it is blank.
pub fn header_label(nickname: Option<&str>) -> &str {
    nickname
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_HEADER)
}

/// Shaped header line plus the font needed to draw its glyphs.
#[derive(Clone)]
pub struct HeaderText {
    layout: Arc<parley::Layout<Rgba8>>,
    font: vello_cpu::peniko::FontData,
    baseline_y: f64,
}

impl std::fmt::Debug for HeaderText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderText")
            .field("width", &self.layout.width())
            .field("lines", &self.layout.lines().count())
            .field("baseline_y", &self.baseline_y)
            .finish_non_exhaustive()
    }
}

impl HeaderText {
    /// Shape `text` on one line with the given font bytes and header style.
    pub fn shape(text: &str, font_bytes: &[u8], style: &HeaderStyle) -> CardResult<Self> {
        let layout =
            TextLayoutEngine::new().layout_line(text, font_bytes, style.size_px, style.color)?;
        let font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes.to_vec()), 0);
        Ok(Self {
            layout: Arc::new(layout),
            font,
            baseline_y: style.baseline_y,
        })
    }

    /// Laid-out width in pixels.
    pub fn width(&self) -> f64 {
        f64::from(self.layout.width())
    }

    /// Draw centered on `center_x` with the first line's baseline at the configured y.
    pub(crate) fn draw(&self, ctx: &mut vello_cpu::RenderContext, center_x: f64) {
        let first_baseline = self
            .layout
            .lines()
            .next()
            .map_or(0.0, |line| f64::from(line.metrics().baseline));
        let origin = vello_cpu::kurbo::Vec2::new(
            center_x - 0.5 * self.width(),
            self.baseline_y - first_baseline,
        );
        ctx.set_transform(vello_cpu::kurbo::Affine::translate(origin));

        for line in self.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                ctx.set_paint(color_to_cpu(run.style().brush));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

/// Parley contexts for shaping text from raw font bytes.
struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
}

impl TextLayoutEngine {
    fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    fn layout_line(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: Rgba8,
    ) -> CardResult<parley::Layout<Rgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CardError::validation(
                "header size_px must be finite and > 0",
            ));
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CardError::validation("header font holds no font family"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::validation("header font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
