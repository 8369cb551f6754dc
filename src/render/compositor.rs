use std::collections::BTreeSet;

use crate::{
    animation::{clip::Pivot, engine::AnimationEngine, playback::AnimationState},
    foundation::core::{Affine, Point},
    foundation::error::{AutorigError, AutorigResult},
    raster::pool::{LayerPool, LayerPoolStats},
    render::{composite::draw_layer, frame::FrameRGBA},
    rig::model::CharacterModel,
};

/// Compositor options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositorOpts {
    /// Straight RGBA the frame is cleared to before drawing.
    pub clear_rgba: [u8; 4],
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            clear_rgba: [0, 0, 0, 0],
        }
    }
}

/// Caller-owned set of hidden layer ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerVisibility {
    hidden: BTreeSet<String>,
}

impl LayerVisibility {
    /// Everything visible.
    pub fn all_visible() -> Self {
        Self::default()
    }

    /// Hide a layer by id.
    pub fn hide(&mut self, id: impl Into<String>) {
        self.hidden.insert(id.into());
    }

    /// Show a previously hidden layer.
    pub fn show(&mut self, id: &str) {
        self.hidden.remove(id);
    }

    /// True unless the id was hidden.
    pub fn is_visible(&self, id: &str) -> bool {
        !self.hidden.contains(id)
    }
}

/// Draws one [`CharacterModel`] frame by frame.
///
/// The compositor borrows its model, so the prepared [`LayerPool`] and the layers it is
/// drawn against can never come from different models. Layer pixels are converted once at
/// construction and reused by every call to [`Compositor::render_frame`].
#[derive(Debug)]
pub struct Compositor<'m> {
    model: &'m CharacterModel,
    opts: CompositorOpts,
    pool: LayerPool,
}

impl<'m> Compositor<'m> {
    /// Prepare `model`'s layers for drawing.
    pub fn new(model: &'m CharacterModel, opts: CompositorOpts) -> Self {
        let pool = LayerPool::prepare(model.layers());
        let stats = pool.stats();
        tracing::debug!(
            prepared = stats.prepared_layers,
            bytes = stats.prepared_bytes,
            skipped = stats.skipped_empty,
            "layer pool ready"
        );
        Self { model, opts, pool }
    }

    /// The model being drawn.
    pub fn model(&self) -> &'m CharacterModel {
        self.model
    }

    /// Options in use.
    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    /// Pool counters.
    pub fn pool_stats(&self) -> LayerPoolStats {
        self.pool.stats()
    }

    /// Composite the model at `now_ms` into `frame`.
    ///
    /// Hidden and empty layers are skipped. Every other layer is drawn in ascending z-order
    /// with the transform the active clip gives its type.
    #[tracing::instrument(skip_all, fields(now_ms = now_ms))]
    pub fn render_frame(
        &self,
        state: &AnimationState,
        now_ms: f64,
        visibility: &LayerVisibility,
        frame: &mut FrameRGBA,
    ) -> AutorigResult<()> {
        let model = self.model;
        if frame.width != model.width() || frame.height != model.height() {
            return Err(AutorigError::validation(format!(
                "frame is {}x{}, model is {}x{}",
                frame.width,
                frame.height,
                model.width(),
                model.height()
            )));
        }
        frame.clear(self.opts.clear_rgba);
        frame.premultiplied = true;

        let clip = state.active_clip();
        let elapsed = state.elapsed_ms(now_ms);
        let pivot = clip.map_or_else(
            || canvas_center(model),
            |c| resolve_pivot(&c.clip.pivot, model),
        );

        for layer in model.layers() {
            if !layer.has_content || !visibility.is_visible(&layer.id) {
                continue;
            }
            let Some(prepared) = self.pool.get(&layer.id) else {
                continue;
            };
            let sample = AnimationEngine::transform_for(layer.layer_type, clip, elapsed);
            let t = sample.transform;
            let affine = if t.is_geometric_identity() {
                Affine::IDENTITY
            } else {
                t.to_affine(pivot)
            };
            if !draw_layer(frame, prepared, affine, t.opacity) {
                tracing::trace!(layer = %layer.id, "layer not drawn");
            }
        }
        Ok(())
    }

    /// Allocate a frame of the model's size and render into it.
    pub fn render(
        &self,
        state: &AnimationState,
        now_ms: f64,
        visibility: &LayerVisibility,
    ) -> AutorigResult<FrameRGBA> {
        let mut frame = FrameRGBA::new(self.model.width(), self.model.height())?;
        self.render_frame(state, now_ms, visibility, &mut frame)?;
        Ok(frame)
    }
}

fn canvas_center(model: &CharacterModel) -> Point {
    Point::new(
        f64::from(model.width()) / 2.0,
        f64::from(model.height()) / 2.0,
    )
}

/// Joint pivots missing from the model fall back to the canvas centre.
pub(crate) fn resolve_pivot(pivot: &Pivot, model: &CharacterModel) -> Point {
    match pivot {
        Pivot::Center => canvas_center(model),
        Pivot::Point { x, y } => Point::new(*x, *y),
        Pivot::Joint { name } => model
            .joints()
            .get(name)
            .copied()
            .unwrap_or_else(|| canvas_center(model)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
