use anyhow::Context;
use winit::window::Window;

use crate::coords::{Resolution, Vec2};
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::InputState;
use crate::lighting::{LightingEngine, composite_viewport};
use crate::render::RenderTarget;
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Context passed to `App::init`.
pub struct SetupCtx<'a> {
    pub window: &'a Window,
    pub engine: &'a mut LightingEngine,
}

/// Per-frame context passed to `App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub engine: &'a mut LightingEngine,
    pub input: &'a InputState,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Current drawable size in physical pixels.
    pub fn surface_size(&self) -> Resolution {
        let size = self.gpu.size();
        Resolution::new(size.width, size.height)
    }

    /// Maps a physical window position into native pixels, following the
    /// composite viewport. `None` outside the viewport.
    pub fn window_to_native(&self, p: Vec2) -> Option<Vec2> {
        let native = self.engine.native_res();
        let [x, y, w, h] = composite_viewport(
            self.surface_size(),
            native,
            self.engine.config().display.integer_scale,
        );
        let local = Vec2::new((p.x - x) / w, (p.y - y) / h);
        if !(0.0..=1.0).contains(&local.x) || !(0.0..=1.0).contains(&local.y) {
            return None;
        }
        Some(local.scale(native.as_vec2()))
    }

    /// Pointer position in native pixels, if over the composite viewport.
    pub fn pointer_native(&self) -> Option<Vec2> {
        self.input.pointer_pos.and_then(|p| self.window_to_native(p))
    }

    /// Renders the lit scene into the next surface texture and presents it.
    ///
    /// Surface loss is handled here; a frame may be skipped. Lighting errors
    /// (capacity overflow) are returned and nothing is presented.
    pub fn present(&mut self) -> anyhow::Result<AppControl> {
        let size = self.surface_size();
        if size.width == 0 || size.height == 0 {
            // Minimized.
            self.engine.flush();
            return Ok(AppControl::Continue);
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => match self.gpu.handle_surface_error(err) {
                SurfaceErrorAction::Fatal => anyhow::bail!("GPU out of memory while acquiring a frame"),
                SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                    self.engine.flush();
                    return Ok(AppControl::Continue);
                }
            },
        };

        // `target` borrows the encoder until the block ends.
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view, size);
            self.engine
                .render(&mut target)
                .context("failed to render lighting frame")?;
        }

        self.window.pre_present_notify();
        self.gpu.submit(frame);

        Ok(AppControl::Continue)
    }
}
