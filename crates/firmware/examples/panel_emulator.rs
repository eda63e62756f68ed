//! Desktop rendition of the panel.
//!
//! Replays a scripted connect / write / disconnect session through the real
//! `PanelController` and the real `ui` renderers inside a simulator window.
//! Time is synthetic (one tick = 200 ms) so the script is deterministic.
//!
//! Run with:
//!
//! ```bash
//! cargo run -p firmware --example panel_emulator --features emulator
//! ```

#![allow(clippy::expect_used, clippy::unwrap_used)] // desktop tooling

use bluetooth::LinkEvent;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, Window,
};
use firmware::controller::{Effect, PanelController, TICK_MS};
use firmware::display::{paint, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use tracing::info;
use ui::RsaBadge;

/// One scripted moment: at tick `at`, inject `event`.
struct Cue {
    at: u64,
    event: LinkEvent,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut display: SimulatorDisplay<Rgb565> =
        SimulatorDisplay::new(Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let title = format!("{} (emulator)", platform::config::app_title());
    let mut window = Window::new(&title, &output_settings);

    // Desktop has no SD card: boots degraded, like a device without a key.
    let mut controller = PanelController::new(RsaBadge::Disabled, 0);

    let script = [
        Cue {
            at: 10,
            event: LinkEvent::Connected {
                peer: [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01],
            },
        },
        Cue {
            at: 25,
            event: LinkEvent::inbox_write(b"Hello from the desk!"),
        },
        Cue {
            at: 60,
            event: LinkEvent::Disconnected,
        },
        Cue {
            at: 80,
            event: LinkEvent::Connected {
                peer: [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x02],
            },
        },
        Cue {
            at: 95,
            event: LinkEvent::inbox_write(b"Second visitor"),
        },
        Cue {
            at: 120,
            event: LinkEvent::Disconnected,
        },
    ];

    paint(&mut display, &controller.initial_render(0)).expect("paint");
    window.update(&display);

    for tick in 0u64..200 {
        let now_ms = tick * TICK_MS;

        for cue in script.iter().filter(|cue| cue.at == tick) {
            info!("injecting {:?}", cue.event);
            apply(&mut display, controller.handle_event(cue.event.clone(), now_ms));
        }
        apply(&mut display, controller.on_tick(now_ms));

        window.update(&display);
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    info!("script finished");
}

fn apply(display: &mut SimulatorDisplay<Rgb565>, effects: firmware::Effects) {
    for effect in effects {
        match effect {
            Effect::Render(render) => paint(display, &render).expect("paint"),
            Effect::Notify(payload) => info!("notify -> {payload}"),
            Effect::Readvertise => info!("advertising restart released"),
            Effect::LogHeap => info!("heartbeat"),
        }
    }
}
