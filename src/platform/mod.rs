//=========================================================================
// Platform Subsystem
//
// Drives a `Context` from a real Winit event loop and gilrs.
//
// Architecture:
// ```text
//  Main Thread:
//  ┌─────────────────────────────────────────────────────────┐
//  │  Winit Event Loop                                       │
//  │   ├─ resumed        → create window, register it        │
//  │   ├─ window_event   → WinitTranslator → dispatch → app  │
//  │   └─ about_to_wait  → GamepadPump     → dispatch → app  │
//  │                     → advance_frame(dt)                 │
//  │                     → drain pending   → app             │
//  └─────────────────────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **Single thread**: the context is not shared; every native event is
//   dispatched on the thread running the loop, in arrival order
// - **Frame boundary = about_to_wait**: gamepads are pumped and frame time
//   advanced once per loop iteration, after all window events
// - **Close means quit**: a close request on the window is delivered as
//   `WindowClose` and followed by a synthesized `Quit`
// - **Main thread requirement**: Winit mandates the main thread on
//   macOS/iOS, so `run` must be called from it
//
//=========================================================================

//=== Submodules ==========================================================

mod gamepad;
mod winit_translator;

//=== External Crates =====================================================

use std::time::Instant;

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::context::Context;
use crate::core::error::{Error, Result};
use crate::core::input::{CanonicalEvent, EventKind};
use crate::core::platform_bridge::{NativeEvent, NativeKind};
use gamepad::GamepadPump;
use winit_translator::WinitTranslator;

//=== Flow ================================================================

/// What the application wants the loop to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

//=== Entry Point =========================================================

/// Opens one window titled `title` and runs the event loop until the
/// application returns [`Flow::Exit`] or a `Quit` event is delivered.
///
/// `app` receives every delivered event, native and synthesized, after
/// the context has been updated for it. The context is handed back when
/// the loop ends.
///
/// # Errors
///
/// [`Error::EventLoop`] if Winit fails, [`Error::ResourceCreation`] if
/// the window cannot be created, [`Error::Backend`] if gilrs cannot be
/// initialized.
///
/// # Examples
///
/// ```no_run
/// use aetheric_platform::{ContextBuilder, platform::{self, Flow}};
/// use aetheric_platform::core::input::EventKind;
///
/// let context = ContextBuilder::new().build();
/// platform::run(context, "Input Monitor", |_ctx, event| {
///     println!("{:?}", event.kind);
///     match event.kind {
///         EventKind::Quit => Flow::Exit,
///         _ => Flow::Continue,
///     }
/// })?;
/// # Ok::<(), aetheric_platform::Error>(())
/// ```
pub fn run<F>(context: Context, title: &str, app: F) -> Result<Context>
where
    F: FnMut(&mut Context, &CanonicalEvent) -> Flow,
{
    debug!(target: "platform", "Starting Winit event loop");
    let origin = Instant::now();

    let event_loop = EventLoop::new()?;
    let mut runner = Runner {
        context,
        app,
        title: title.to_owned(),
        window: None,
        translator: WinitTranslator::new(origin),
        gamepads: GamepadPump::new(origin)?,
        last_frame: Instant::now(),
        failure: None,
    };

    event_loop.run_app(&mut runner)?;

    match runner.failure {
        Some(err) => Err(err),
        None => {
            info!(target: "platform", "Event loop finished");
            Ok(runner.context)
        }
    }
}

//=== Runner ==============================================================

struct Runner<F> {
    context: Context,
    app: F,
    title: String,

    /// OS window (None until `resumed()` is called).
    window: Option<Window>,

    translator: WinitTranslator,
    gamepads: GamepadPump,
    last_frame: Instant,

    /// Fatal error that ended the loop early.
    failure: Option<Error>,
}

impl<F> Runner<F>
where
    F: FnMut(&mut Context, &CanonicalEvent) -> Flow,
{
    /// Dispatches one native event and hands the result to the app.
    fn deliver(&mut self, event_loop: &ActiveEventLoop, native: NativeEvent) {
        if let Some(event) = self.context.dispatch(native) {
            self.hand_to_app(event_loop, &event);
        }
    }

    /// Hands synthesized events (animations, timers) to the app.
    fn drain_pending(&mut self, event_loop: &ActiveEventLoop) {
        while let Some(event) = self.context.poll_pending() {
            self.hand_to_app(event_loop, &event);
        }
    }

    fn hand_to_app(&mut self, event_loop: &ActiveEventLoop, event: &CanonicalEvent) {
        let flow = (self.app)(&mut self.context, event);
        if flow == Flow::Exit || event.kind == EventKind::Quit {
            info!(target: "platform", "Leaving event loop");
            event_loop.exit();
        }
    }
}

//=== Winit Integration ===================================================

impl<F> ApplicationHandler for Runner<F>
where
    F: FnMut(&mut Context, &CanonicalEvent) -> Flow,
{
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }
        event_loop.set_control_flow(ControlFlow::Poll);

        let attrs = WindowAttributes::default()
            .with_title(self.title.as_str())
            .with_inner_size(LogicalSize::new(800, 600));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                self.context
                    .open_window(u64::from(window.id()), &self.title, size.width, size.height);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.failure = Some(Error::ResourceCreation(e.to_string()));
                event_loop.exit();
                return;
            }
        }

        for native in self.gamepads.connected() {
            self.deliver(event_loop, native);
        }
        self.last_frame = Instant::now();
    }

    /// Handles per-window events.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let window = u64::from(window_id);
        let native = self.translator.translate(window, &event);
        if native.kind == NativeKind::Unsupported {
            return;
        }

        let close = matches!(native.kind, NativeKind::WindowCloseRequested { .. });
        self.deliver(event_loop, native);

        if close {
            info!(target: "platform", "Window close requested");
            let quit = NativeEvent::new(self.translator.timestamp(), NativeKind::Quit);
            self.deliver(event_loop, quit);
        }
    }

    /// Frame boundary: controllers, frame time, synthesized events.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        for native in self.gamepads.drain() {
            self.deliver(event_loop, native);
        }

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        self.context.advance_frame(dt);
        self.drain_pending(event_loop);
    }
}
