//! Scheduler loop shared by the two binaries.
//!
//! An explicit 200 ms tick: drain the link task's events, ask the
//! controller for effects, execute them. Display errors never stop the
//! loop; the panel is best-effort output.

use embassy_time::{Duration, Instant, Ticker};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::ble;
use crate::controller::{Effect, Effects, TickController, TICK_MS};
use crate::display::paint;

/// Run the controller against the display forever.
pub async fn drive<D, C>(display: &mut D, mut controller: C) -> !
where
    D: DrawTarget<Color = Rgb565>,
    C: TickController,
{
    let now = Instant::now().as_millis();
    if paint(display, &controller.initial_render(now)).is_err() {
        log::warn!("initial paint failed");
    }

    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));
    loop {
        ticker.next().await;
        let now = Instant::now().as_millis();

        while let Ok(event) = ble::LINK_EVENTS.try_receive() {
            apply_all(display, controller.handle_event(event, now));
        }
        apply_all(display, controller.on_tick(now));
    }
}

fn apply_all<D>(display: &mut D, effects: Effects)
where
    D: DrawTarget<Color = Rgb565>,
{
    for effect in effects {
        match effect {
            Effect::Render(render) => {
                if paint(display, &render).is_err() {
                    log::warn!("display paint failed");
                }
            }
            Effect::Notify(payload) => {
                if ble::OUTBOX.try_send(payload).is_err() {
                    log::warn!("outbox full, notification dropped");
                }
            }
            Effect::Readvertise => ble::ADVERTISE_GATE.signal(()),
            Effect::LogHeap => log::info!("heap: {}", esp_alloc::HEAP.stats()),
        }
    }
}
