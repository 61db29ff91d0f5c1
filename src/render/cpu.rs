use std::sync::Arc;

use kurbo::Shape;

use crate::assets::recolor::TintedImage;
use crate::foundation::core::{Affine, Rgba8Premul};
use crate::foundation::error::{KaleidoError, KaleidoResult};
use crate::foundation::math::mul_div255_u8;
use crate::render::backend::{Compositor, FrameRGBA};
use crate::scene::fragment::{Fragment, aspect_fit};
use crate::scene::kaleidoscope::Kaleidoscope;
use crate::scene::layout::ClipCircle;

/// Options for [`CpuCompositor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuCompositorOpts {
    pub(crate) clear_rgba: Option<[u8; 4]>,
}

impl CpuCompositorOpts {
    /// Return options with a straight-alpha background drawn behind the composition.
    ///
    /// `None` leaves the area outside the clip transparent.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }
}

struct CachedPaint {
    source: Arc<TintedImage>,
    paint: vello_cpu::Image,
}

/// Software compositor built on `vello_cpu`.
///
/// Fragments are rasterized into a transparent layer, the layer is multiplied by a rasterized
/// clip-circle mask, and the result is laid over the background.
pub struct CpuCompositor {
    opts: CpuCompositorOpts,
    ctx: Option<vello_cpu::RenderContext>,
    paint_cache: Vec<CachedPaint>,
}

impl CpuCompositor {
    /// Create a compositor.
    pub fn new(opts: CpuCompositorOpts) -> Self {
        Self {
            opts,
            ctx: None,
            paint_cache: Vec::new(),
        }
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> KaleidoResult<R>,
    ) -> KaleidoResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    // Tinted images change every tick; keep only the ones some fragment still shows.
    fn retain_live_paints(&mut self, scene: &Kaleidoscope) {
        self.paint_cache.retain(|c| {
            scene.fragments().iter().any(|f| {
                f.slots()
                    .iter()
                    .flatten()
                    .any(|img| Arc::ptr_eq(img, &c.source))
            })
        });
    }

    fn paint_for(&mut self, img: &Arc<TintedImage>) -> KaleidoResult<vello_cpu::Image> {
        if let Some(c) = self
            .paint_cache
            .iter()
            .find(|c| Arc::ptr_eq(&c.source, img))
        {
            return Ok(c.paint.clone());
        }
        let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.paint_cache.push(CachedPaint {
            source: Arc::clone(img),
            paint: paint.clone(),
        });
        Ok(paint)
    }

    fn draw_fragment(
        &mut self,
        fragment: &Fragment,
        world: Affine,
        ctx: &mut vello_cpu::RenderContext,
    ) -> KaleidoResult<()> {
        let bounds = fragment.bounds();
        for img in fragment.slots().iter().flatten() {
            if img.width == 0 || img.height == 0 {
                continue;
            }
            let paint = self.paint_for(img)?;
            // Aspect fit keeps the image inside the fragment bounds.
            let fit = aspect_fit(img.width, img.height, bounds);
            let tr = world
                * Affine::translate((fit.x0, fit.y0))
                * Affine::scale_non_uniform(
                    fit.width() / f64::from(img.width),
                    fit.height() / f64::from(img.height),
                );

            ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(affine_to_cpu(tr));
            ctx.set_paint(paint);
            let opacity = img.opacity.clamp(0.0, 1.0);
            if opacity < 1.0 {
                ctx.push_opacity_layer(opacity);
            }
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(img.width),
                f64::from(img.height),
            ));
            if opacity < 1.0 {
                ctx.pop_layer();
            }
        }
        Ok(())
    }

    fn render_fragments_to(
        &mut self,
        scene: &Kaleidoscope,
        elapsed_secs: f64,
        dst: &mut vello_cpu::Pixmap,
    ) -> KaleidoResult<()> {
        self.with_ctx_mut(dst.width(), dst.height(), |this, ctx| {
            for fragment in scene.fragments() {
                let world = scene.fragment_transform(fragment, elapsed_secs);
                this.draw_fragment(fragment, world, ctx)?;
            }
            ctx.flush();
            ctx.render_to_pixmap(dst);
            Ok(())
        })
    }

    fn render_clip_mask_to(
        &mut self,
        clip: ClipCircle,
        dst: &mut vello_cpu::Pixmap,
    ) -> KaleidoResult<()> {
        self.with_ctx_mut(dst.width(), dst.height(), |_, ctx| {
            let circle = kurbo::Circle::new(clip.center, clip.radius).to_path(0.1);
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            ctx.fill_path(&bezpath_to_cpu(&circle));
            ctx.flush();
            ctx.render_to_pixmap(dst);
            Ok(())
        })
    }
}

impl Compositor for CpuCompositor {
    fn compose(&mut self, scene: &Kaleidoscope, elapsed_secs: f64) -> KaleidoResult<FrameRGBA> {
        let canvas = scene.canvas();
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| KaleidoError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| KaleidoError::render("canvas height exceeds u16"))?;

        self.retain_live_paints(scene);

        let mut layer = vello_cpu::Pixmap::new(width, height);
        self.render_fragments_to(scene, elapsed_secs, &mut layer)?;

        let mut mask = vello_cpu::Pixmap::new(width, height);
        self.render_clip_mask_to(scene.clip(), &mut mask)?;

        mask_apply_alpha_in_place(layer.data_as_u8_slice_mut(), mask.data_as_u8_slice())?;

        let clear = self
            .opts
            .clear_rgba
            .map(|[r, g, b, a]| Rgba8Premul::from_straight_rgba(r, g, b, a))
            .unwrap_or_else(Rgba8Premul::transparent)
            .to_array();
        let mut data = clear.repeat(usize::from(width) * usize::from(height));
        premul_over_in_place(&mut data, layer.data_as_u8_slice())?;

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: true,
        })
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> KaleidoResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| KaleidoError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| KaleidoError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(KaleidoError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn mask_apply_alpha_in_place(dst: &mut [u8], mask: &[u8]) -> KaleidoResult<()> {
    if dst.len() != mask.len() || !dst.len().is_multiple_of(4) {
        return Err(KaleidoError::render(
            "mask_apply_alpha_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, m) in dst.chunks_exact_mut(4).zip(mask.chunks_exact(4)) {
        let w = u16::from(m[3]);
        if w == 255 {
            continue;
        }
        for c in d.iter_mut() {
            *c = mul_div255_u8(u16::from(*c), w);
        }
    }
    Ok(())
}

fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> KaleidoResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(KaleidoError::render(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3];
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255u16 - u16::from(sa);
        for c in 0..4 {
            d[c] = s[c].saturating_add(mul_div255_u8(u16::from(d[c]), inv));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
