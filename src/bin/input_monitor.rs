//=========================================================================
// Input Monitor
//
// Opens a window and logs every canonical event: keys, mouse, hot-plugged
// controllers (with shaped stick/trigger values) and a one-second
// heartbeat timer. Escape or closing the window exits.
//
// Usage:
//   RUST_LOG=info cargo run --bin input-monitor
//
//=========================================================================

use aetheric_platform::core::input::{EventKind, KeyCode};
use aetheric_platform::platform::{self, Flow};
use aetheric_platform::ContextBuilder;

fn main() {
    env_logger::init();

    let mut context = ContextBuilder::new().build();
    let heartbeat = context.create_clock();
    if let Err(e) = context.add_timer(heartbeat, "heartbeat", 1.0, true) {
        log::error!("{}", e);
        std::process::exit(1);
    }
    context.set_auto_update(heartbeat, true);

    let result = platform::run(context, "Aetheric Input Monitor", |ctx, event| {
        match &event.kind {
            EventKind::KeyPress { key: KeyCode::Escape, .. } => return Flow::Exit,
            EventKind::TimerFired { fire_count, .. } => {
                let (x, y) = ctx.mouse_position();
                log::info!(
                    "[{:8.3}] heartbeat #{} (cursor at {:.0},{:.0}, {} controller(s))",
                    event.timestamp,
                    fire_count,
                    x,
                    y,
                    ctx.controllers().len()
                );
            }
            EventKind::MouseMotion { .. } => log::debug!("[{:8.3}] {:?}", event.timestamp, event.kind),
            other => log::info!("[{:8.3}] {:?}", event.timestamp, other),
        }
        Flow::Continue
    });

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
