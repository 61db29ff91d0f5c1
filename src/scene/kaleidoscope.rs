use std::path::Path;
use std::sync::Arc;

use crate::animation::color_cycle::ColorCycle;
use crate::animation::spin::{SpinConfig, spin_angle};
use crate::assets::decode::{SourceImage, load_image};
use crate::assets::recolor::{TintChannel, TintColor, TintedImage, tint_silhouette};
use crate::foundation::core::{Affine, Canvas};
use crate::foundation::error::{KaleidoError, KaleidoResult};
use crate::scene::config::{KaleidoscopeConfig, TintConfig};
use crate::scene::fragment::Fragment;
use crate::scene::layout::{ClipCircle, WedgeLayout, layout_wedges};

#[derive(Clone, Debug)]
struct Source {
    image: SourceImage,
    channel: TintChannel,
}

/// The kaleidoscope scene graph.
///
/// Owns the fragments, the source images and the color-cycle state. Fragment and slot counts
/// are fixed by [`Kaleidoscope::set_up`]; ticks only swap the images inside the slots.
#[derive(Clone, Debug)]
pub struct Kaleidoscope {
    canvas: Canvas,
    layout: WedgeLayout,
    sources: Vec<Source>,
    tint: TintConfig,
    spin: SpinConfig,
    fragments: Vec<Fragment>,
    cycle: ColorCycle,
    ticks_applied: u64,
    shown_level: f64,
}

impl Kaleidoscope {
    /// Build the scene from already decoded sources and apply the first color tick.
    ///
    /// `sources` pairs by position with `config.sources`.
    #[tracing::instrument(skip_all, fields(fragments = config.fragment_count))]
    pub fn set_up(config: &KaleidoscopeConfig, sources: Vec<SourceImage>) -> KaleidoResult<Self> {
        config.validate()?;
        if sources.len() != config.sources.len() {
            return Err(KaleidoError::validation(format!(
                "config names {} source images, got {}",
                config.sources.len(),
                sources.len()
            )));
        }

        let layout = layout_wedges(config.canvas, config.fragment_count, config.clip_inset)?;
        let slot_count = sources.len();
        let fragments = layout
            .placements
            .iter()
            .map(|p| Fragment::new(*p, slot_count))
            .collect();
        let sources = sources
            .into_iter()
            .zip(&config.sources)
            .map(|(image, spec)| Source {
                image,
                channel: spec.channel,
            })
            .collect();

        let mut scene = Self {
            canvas: config.canvas,
            layout,
            sources,
            tint: config.tint,
            spin: config.spin,
            fragments,
            cycle: ColorCycle::new(&config.color_cycle)?,
            ticks_applied: 0,
            shown_level: 0.0,
        };
        scene.tick()?;

        tracing::debug!(
            fragments = scene.fragments.len(),
            slots = slot_count,
            clip_radius = scene.layout.clip.radius,
            "kaleidoscope set up"
        );
        Ok(scene)
    }

    /// Load the configured source images from `assets_root` and set up the scene.
    pub fn load(config: &KaleidoscopeConfig, assets_root: &Path) -> KaleidoResult<Self> {
        let sources = config
            .sources
            .iter()
            .map(|spec| load_image(assets_root, &spec.path))
            .collect::<KaleidoResult<Vec<_>>>()?;
        Self::set_up(config, sources)
    }

    /// One color-cycle step: recolor every source with the current scalar, hand the same image
    /// set to every fragment, then advance the scalar.
    ///
    /// All images are built before any fragment is touched, so a failed recolor leaves the
    /// previous tick on screen.
    pub fn tick(&mut self) -> KaleidoResult<()> {
        let level = self.cycle.value();
        let images = self
            .sources
            .iter()
            .map(|s| {
                let color = TintColor::cycled(s.channel, level, self.tint.base, self.tint.alpha);
                tint_silhouette(&s.image, color).map(Arc::new)
            })
            .collect::<KaleidoResult<Vec<Arc<TintedImage>>>>()?;

        for fragment in &mut self.fragments {
            fragment.set_images(&images)?;
        }

        self.shown_level = level;
        self.cycle.advance();
        self.ticks_applied += 1;
        tracing::trace!(tick = self.ticks_applied, level, "color tick");
        Ok(())
    }

    /// Bring the scene to the state after exactly `ticks` ticks (the set-up tick included).
    ///
    /// Only the last tick is recolored; skipped ticks just move the oscillator. Going backwards
    /// is allowed.
    pub fn advance_to_tick(&mut self, ticks: u64) -> KaleidoResult<()> {
        let ticks = ticks.max(1);
        if ticks == self.ticks_applied {
            return Ok(());
        }
        if ticks == self.ticks_applied + 1 {
            return self.tick();
        }
        self.cycle.seek(ticks - 1);
        self.ticks_applied = ticks - 1;
        self.tick()
    }

    /// Viewport-space transform of `fragment` at `elapsed_secs`, spin included.
    pub fn fragment_transform(&self, fragment: &Fragment, elapsed_secs: f64) -> Affine {
        let p = fragment.placement();
        p.transform(spin_angle(&self.spin, p.index, elapsed_secs))
    }

    /// Fragments in drawing order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Wedge geometry.
    pub fn layout(&self) -> &WedgeLayout {
        &self.layout
    }

    /// Circular clip.
    pub fn clip(&self) -> ClipCircle {
        self.layout.clip
    }

    /// Viewport size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Number of ticks applied so far, the set-up tick included.
    pub fn ticks_applied(&self) -> u64 {
        self.ticks_applied
    }

    /// Scalar used for the images currently on screen.
    pub fn color_level(&self) -> f64 {
        self.shown_level
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/kaleidoscope.rs"]
mod tests;
