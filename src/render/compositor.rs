use crate::{
    assets::{
        decode::{PreparedImage, decode_image},
        resolver::ResolvedImage,
    },
    config::CardStyle,
    foundation::{
        core::{Affine, Point, Rect, Vec2},
        error::{CardError, CardResult},
    },
    layout::{geometry, radial::LayoutPlan},
    render::{
        FrameRGBA,
        cpu::{
            affine_to_cpu, bezpath_to_cpu, color_to_cpu, encode_png, image_paint, line_to_cpu,
            rect_to_cpu,
        },
        text::HeaderText,
    },
};

/// Decoded images for one card.
#[derive(Clone, Debug, Default)]
pub struct CardImages {
    pub character: Option<PreparedImage>,
    pub banner: Option<PreparedImage>,
    /// Ring images; entry `i` is drawn at layout position `i`.
    pub items: Vec<PreparedImage>,
}

impl CardImages {
    /// Decode downloaded bytes.
    ///
    /// Corrupt or undrawable character or banner bytes fail the card. Item slots that are
    /// missing, do not decode, or cannot be drawn are dropped, so `items` holds only
    /// drawable images in ring order.
    pub fn decode(
        character: Option<&[u8]>,
        banner: Option<&[u8]>,
        items: &[Option<ResolvedImage>],
    ) -> CardResult<Self> {
        let character = character
            .map(|bytes| {
                decode_drawable(bytes)
                    .map_err(|e| CardError::render(format!("character image: {e}")))
            })
            .transpose()?;
        let banner = banner
            .map(|bytes| {
                decode_drawable(bytes).map_err(|e| CardError::render(format!("banner image: {e}")))
            })
            .transpose()?;

        let items = items
            .iter()
            .flatten()
            .filter_map(|item| match decode_drawable(&item.bytes) {
                Ok(img) => Some(img),
                Err(e) => {
                    tracing::warn!(id = %item.source_id, error = %e, "item image dropped");
                    None
                }
            })
            .collect();

        Ok(Self {
            character,
            banner,
            items,
        })
    }
}

/// Decode and check that the rasterizer can hold the image as a pixmap.
fn decode_drawable(bytes: &[u8]) -> CardResult<PreparedImage> {
    let img = decode_image(bytes)?;
    let max = u32::from(u16::MAX);
    if img.width == 0 || img.height == 0 || img.width > max || img.height > max {
        return Err(CardError::render(format!(
            "image size {}x{} is outside 1..={max}",
            img.width, img.height
        )));
    }
    Ok(img)
}

/// Draws a laid-out card onto a CPU canvas.
///
/// Z-order is fixed: background, header, banner, ring slots (connector, shadow, clipped
/// image, outline), then the character on top.
#[derive(Clone, Debug)]
pub struct Compositor {
    style: CardStyle,
    header: Option<HeaderText>,
}

impl Compositor {
    pub fn new(style: CardStyle) -> Self {
        Self {
            style,
            header: None,
        }
    }

    /// Draw `header` across the top of the card. `None` leaves the band empty.
    pub fn with_header(mut self, header: Option<HeaderText>) -> Self {
        self.header = header;
        self
    }

    /// Render and encode to PNG.
    pub fn render(&self, plan: &LayoutPlan, images: &CardImages) -> CardResult<Vec<u8>> {
        let frame = self.render_frame(plan, images)?;
        encode_png(&frame)
    }

    /// Render to premultiplied RGBA8 pixels.
    #[tracing::instrument(level = "debug", skip_all, fields(slots = plan.positions.len()))]
    pub fn render_frame(&self, plan: &LayoutPlan, images: &CardImages) -> CardResult<FrameRGBA> {
        let width: u16 = plan
            .canvas
            .width
            .try_into()
            .map_err(|_| CardError::render("canvas width exceeds u16"))?;
        let height: u16 = plan
            .canvas
            .height
            .try_into()
            .map_err(|_| CardError::render("canvas height exceeds u16"))?;
        if images.items.len() != plan.positions.len() {
            return Err(CardError::render(format!(
                "layout has {} slots but {} item images were supplied",
                plan.positions.len(),
                images.items.len()
            )));
        }

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_paint(color_to_cpu(self.style.background));
        ctx.fill_rect(&rect_to_cpu(plan.canvas.rect()));

        if let Some(header) = &self.header {
            header.draw(&mut ctx, 0.5 * f64::from(plan.canvas.width));
        }

        if let Some(banner) = &images.banner {
            draw_image(&mut ctx, banner, stretch_into(banner.size(), plan.banner_box))?;
        }

        for (&center, image) in plan.positions.iter().zip(&images.items) {
            self.draw_slot(&mut ctx, plan, center, image)?;
        }

        if let Some(character) = &images.character {
            let fit = fit_contain(character.size(), plan.character_box);
            draw_image(&mut ctx, character, fit)?;
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: plan.canvas.width,
            height: plan.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn draw_slot(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        plan: &LayoutPlan,
        center: Point,
        image: &PreparedImage,
    ) -> CardResult<()> {
        let style = &self.style;
        let radius = plan.hex_radius;

        // The hexagon is drawn over the connector's far end.
        if style.connector_width > 0.0
            && let Some((a, b)) = geometry::connector_endpoints(
                plan.character_center(),
                plan.character_radius(),
                center,
                radius,
                style.connector_inset,
            )
        {
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(style.connector_width));
            ctx.set_paint(color_to_cpu(style.connector));
            ctx.stroke_path(&line_to_cpu(a, b));
        }

        if style.shadow_offset > 0.0 && style.shadow.a > 0 {
            let offset = Vec2::new(style.shadow_offset, style.shadow_offset);
            let shadow = geometry::hexagon_path(center + offset, radius);
            ctx.set_paint(color_to_cpu(style.shadow));
            ctx.fill_path(&bezpath_to_cpu(&shadow));
        }

        let hex = bezpath_to_cpu(&geometry::hexagon_path(center, radius));
        ctx.push_clip_layer(&hex);
        ctx.set_paint(color_to_cpu(style.hex_fill));
        ctx.fill_path(&hex);
        let side = 2.0 * radius * style.item_overscale;
        draw_image(ctx, image, fit_cover(image.size(), center, side))?;
        ctx.pop_layer();

        if style.hex_outline_width > 0.0 {
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(style.hex_outline_width));
            ctx.set_paint(color_to_cpu(style.hex_outline));
            ctx.stroke_path(&hex);
        }
        Ok(())
    }
}

fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    image: &PreparedImage,
    transform: Affine,
) -> CardResult<()> {
    let paint = image_paint(image)?;
    let (w, h) = image.size();

    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    Ok(())
}

/// Map an image of size `src` onto `dst` exactly, ignoring aspect ratio.
pub(crate) fn stretch_into(src: (f64, f64), dst: Rect) -> Affine {
    let (w, h) = src;
    Affine::translate(Vec2::new(dst.x0, dst.y0))
        * Affine::scale_non_uniform(dst.width() / w, dst.height() / h)
}

/// Largest aspect-preserving fit of `src` inside `dst`, centered.
pub(crate) fn fit_contain(src: (f64, f64), dst: Rect) -> Affine {
    let (w, h) = src;
    let s = (dst.width() / w).min(dst.height() / h);
    centered_scale(src, dst.center(), s)
}

/// Smallest aspect-preserving scale of `src` covering a `side`×`side` square at `center`.
pub(crate) fn fit_cover(src: (f64, f64), center: Point, side: f64) -> Affine {
    let (w, h) = src;
    let s = side / w.min(h);
    centered_scale(src, center, s)
}

fn centered_scale(src: (f64, f64), center: Point, s: f64) -> Affine {
    let (w, h) = src;
    Affine::translate(center.to_vec2() - Vec2::new(0.5 * w * s, 0.5 * h * s)) * Affine::scale(s)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
