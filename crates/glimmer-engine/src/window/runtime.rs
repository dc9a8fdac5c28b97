use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, SetupCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::{InputEvent, InputState, Key, MouseButton};
use crate::lighting::{DisplayConfig, EngineConfig, LightingEngine};
use crate::time::{FrameClock, FrameTime};

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.commands.push(Command::SetTitle(title.into()));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    SetTitle(String),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window described by `config.display`, creates the GPU context
    /// and the lighting engine, then drives `app` until it exits.
    ///
    /// Returns the first fatal error (GPU or engine creation, `App::init`,
    /// `App::on_frame`).
    pub fn run<A>(config: EngineConfig, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: EngineConfig,
    app: A,

    window: Option<WindowEntry>,
    engine: Option<LightingEngine>,
    fatal: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: EngineConfig, app: A) -> Self {
        Self {
            config,
            app,
            window: None,
            engine: None,
            fatal: None,
            exit_requested: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.exit_requested = true;
        event_loop.exit();
    }

    /// Window, GPU, engine, then `App::init`, in that order.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let display = &self.config.display;
        let window = event_loop
            .create_window(window_attributes(event_loop, display, &self.config))
            .context("failed to create window")?;

        let gpu_init = GpuInit::with_vsync(display.vsync);
        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let mut engine = entry
            .with_gpu(|gpu| LightingEngine::new(gpu, self.config.clone()))
            .context("failed to create lighting engine")?;

        entry.with_window(|window| {
            let mut ctx = SetupCtx {
                window,
                engine: &mut engine,
            };
            self.app.init(&mut ctx)
        })?;

        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
        self.engine = Some(engine);
        Ok(())
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::SetTitle(title) => {
                    if let Some(entry) = &self.window {
                        entry.with_window(|w| w.set_title(&title));
                    }
                }
                Command::Exit => self.exit_requested = true,
            }
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(entry), Some(engine)) = (self.window.as_mut(), self.engine.as_mut()) else {
            return;
        };
        let app = &mut self.app;
        let mut runtime_ctx = RuntimeCtx::default();

        let result = entry.with_mut(|fields| {
            let ft: FrameTime = fields.clock.tick();

            let result = {
                let mut ctx = FrameCtx {
                    window: fields.window,
                    gpu: fields.gpu,
                    engine,
                    input: fields.input_state,
                    time: ft,
                    runtime: &mut runtime_ctx,
                };
                app.on_frame(&mut ctx)
            };

            // Clear per-frame transitions after the frame is consumed.
            fields.input_state.end_frame();
            result
        });

        match result {
            Ok(AppControl::Continue) => {}
            Ok(AppControl::Exit) => runtime_ctx.exit(),
            Err(err) => {
                self.fail(event_loop, err);
                return;
            }
        }

        self.apply_commands(event_loop, runtime_ctx);
    }
}

fn window_attributes(
    event_loop: &ActiveEventLoop,
    display: &DisplayConfig,
    config: &EngineConfig,
) -> winit::window::WindowAttributes {
    let mut attrs = Window::default_attributes()
        .with_title(display.title.clone())
        .with_inner_size(PhysicalSize::new(config.screen_res.width, config.screen_res.height))
        .with_resizable(display.resizable)
        .with_decorations(!display.frameless);

    if display.fullscreen {
        let monitor = event_loop.available_monitors().nth(display.display);
        if monitor.is_none() {
            log::warn!("display {} not found; using the current monitor", display.display);
        }
        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(monitor)));
    }

    attrs
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.exit_requested {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Lights move every frame: redraw continuously.
        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            return;
        }

        let Some(entry) = self.window.as_mut() else {
            return;
        };

        if let Some(ev) = translate_input_event(&event) {
            entry.with_input_state_mut(|input| input.apply_event(ev));
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.exit_requested = true;
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.exit_requested = true;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

fn translate_input_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::PointerMoved {
            x: position.x as f32,
            y: position.y as f32,
        }),

        WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::Button {
            button: map_mouse_button(*button),
            pressed: *state == ElementState::Pressed,
        }),

        WindowEvent::KeyboardInput { event, .. } => Some(InputEvent::Key {
            key: map_key(event.physical_key),
            pressed: event.state == ElementState::Pressed,
            repeat: event.repeat,
        }),

        _ => None,
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Other(3),
        WinitMouseButton::Forward => MouseButton::Other(4),
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

const LETTERS: [(KeyCode, char); 26] = [
    (KeyCode::KeyA, 'a'),
    (KeyCode::KeyB, 'b'),
    (KeyCode::KeyC, 'c'),
    (KeyCode::KeyD, 'd'),
    (KeyCode::KeyE, 'e'),
    (KeyCode::KeyF, 'f'),
    (KeyCode::KeyG, 'g'),
    (KeyCode::KeyH, 'h'),
    (KeyCode::KeyI, 'i'),
    (KeyCode::KeyJ, 'j'),
    (KeyCode::KeyK, 'k'),
    (KeyCode::KeyL, 'l'),
    (KeyCode::KeyM, 'm'),
    (KeyCode::KeyN, 'n'),
    (KeyCode::KeyO, 'o'),
    (KeyCode::KeyP, 'p'),
    (KeyCode::KeyQ, 'q'),
    (KeyCode::KeyR, 'r'),
    (KeyCode::KeyS, 's'),
    (KeyCode::KeyT, 't'),
    (KeyCode::KeyU, 'u'),
    (KeyCode::KeyV, 'v'),
    (KeyCode::KeyW, 'w'),
    (KeyCode::KeyX, 'x'),
    (KeyCode::KeyY, 'y'),
    (KeyCode::KeyZ, 'z'),
];

const DIGITS: [KeyCode; 10] = [
    KeyCode::Digit0,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

fn map_key(pk: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = pk else {
        return Key::Unknown(0);
    };

    match code {
        KeyCode::Escape => return Key::Escape,
        KeyCode::Enter => return Key::Enter,
        KeyCode::Space => return Key::Space,
        KeyCode::Tab => return Key::Tab,
        KeyCode::ArrowUp => return Key::ArrowUp,
        KeyCode::ArrowDown => return Key::ArrowDown,
        KeyCode::ArrowLeft => return Key::ArrowLeft,
        KeyCode::ArrowRight => return Key::ArrowRight,
        _ => {}
    }

    if let Some(&(_, c)) = LETTERS.iter().find(|(k, _)| *k == code) {
        return Key::Letter(c);
    }
    if let Some(d) = DIGITS.iter().position(|k| *k == code) {
        return Key::Digit(d as u8);
    }
    Key::Unknown(code as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_bound_keys() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Space)), Key::Space);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyB)), Key::Letter('b'));
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyZ)), Key::Letter('z'));
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Digit7)), Key::Digit(7));
        assert!(matches!(map_key(PhysicalKey::Code(KeyCode::F5)), Key::Unknown(_)));
    }

    #[test]
    fn maps_extra_mouse_buttons_to_other() {
        assert_eq!(map_mouse_button(WinitMouseButton::Back), MouseButton::Other(3));
        assert_eq!(map_mouse_button(WinitMouseButton::Left), MouseButton::Left);
    }
}
