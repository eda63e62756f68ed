//! End-to-end controller scenarios: whole sessions of events and ticks,
//! with every render effect pushed through the real paint pipeline.
//!
//! Run with: cargo test -p firmware --test integration_controller

#![allow(clippy::unwrap_used, clippy::panic, clippy::arithmetic_side_effects)]

use bluetooth::LinkEvent;
use embedded_graphics::mock_display::MockDisplay;
use embedded_graphics::pixelcolor::Rgb565;
use firmware::controller::{
    BeaconController, Effect, PanelController, Render, TickController, HEARTBEAT_MS,
    IDLE_REFRESH_MS, TICK_MS,
};
use firmware::display::paint;
use ui::RsaBadge;

const PEER: [u8; 6] = [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0x01];

/// Drives a controller on the real 200 ms cadence and paints every render.
struct Harness<C: TickController> {
    controller: C,
    tick: u64,
    renders: Vec<Render>,
    notifies: Vec<String>,
    readvertises: u32,
}

impl<C: TickController> Harness<C> {
    fn new(controller: C) -> Self {
        Self {
            controller,
            tick: 0,
            renders: Vec::new(),
            notifies: Vec::new(),
            readvertises: 0,
        }
    }

    fn now_ms(&self) -> u64 {
        self.tick * TICK_MS
    }

    fn inject(&mut self, event: LinkEvent) {
        let fx = self.controller.handle_event(event, self.now_ms());
        self.absorb(fx);
    }

    /// Advance whole ticks, running the scheduler each time.
    fn run_ticks(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick += 1;
            let fx = self.controller.on_tick(self.now_ms());
            self.absorb(fx);
        }
    }

    fn absorb(&mut self, effects: firmware::Effects) {
        for effect in effects {
            match effect {
                Effect::Render(render) => {
                    // Every render must actually paint.
                    let mut display: MockDisplay<Rgb565> = MockDisplay::new();
                    display.set_allow_overdraw(true);
                    display.set_allow_out_of_bounds_drawing(true);
                    paint(&mut display, &render).unwrap();
                    self.renders.push(render);
                }
                Effect::Notify(payload) => self.notifies.push(payload.as_str().to_string()),
                Effect::Readvertise => self.readvertises += 1,
                Effect::LogHeap => {}
            }
        }
    }
}

#[test]
fn panel_full_session() {
    let mut h = Harness::new(PanelController::new(RsaBadge::Enabled, 0));

    // Idle for 5 s: one time-row refresh, nothing else.
    h.run_ticks(IDLE_REFRESH_MS / TICK_MS);
    assert!(matches!(
        h.renders.as_slice(),
        [Render::TimeRow { uptime_s: 5, .. }]
    ));

    // Peer connects; the green screen appears exactly once.
    h.inject(LinkEvent::Connected { peer: PEER });
    h.run_ticks(3);
    assert!(matches!(
        h.renders.last().unwrap(),
        Render::Connected {
            rsa: Some(RsaBadge::Enabled)
        }
    ));

    // Two writes: two message paints, two acks, count climbing.
    h.inject(LinkEvent::inbox_write(b"first"));
    h.inject(LinkEvent::inbox_write(b"second"));
    h.run_ticks(1);
    assert_eq!(h.notifies, vec!["Received!", "Received!"]);
    match h.renders.last().unwrap() {
        Render::Message { count, body } => {
            assert_eq!(*count, 2);
            assert_eq!(body.as_str(), "second");
        }
        other => panic!("expected message render, got {other:?}"),
    }

    // Empty write: no paint, no ack.
    let renders_before = h.renders.len();
    h.inject(LinkEvent::inbox_write(b""));
    h.run_ticks(1);
    assert_eq!(h.renders.len(), renders_before);
    assert_eq!(h.notifies.len(), 2);

    // Disconnect: waiting screen with the message tally, one readvertise.
    h.inject(LinkEvent::Disconnected);
    h.run_ticks(1);
    assert_eq!(h.readvertises, 1);
    match h.renders.last().unwrap() {
        Render::Waiting { messages, .. } => assert_eq!(*messages, 2),
        other => panic!("expected waiting render, got {other:?}"),
    }

    // Second cycle: the tally and the readvertise accounting both hold.
    h.inject(LinkEvent::Connected { peer: PEER });
    h.run_ticks(1);
    h.inject(LinkEvent::Disconnected);
    h.run_ticks(1);
    assert_eq!(h.readvertises, 2);
}

#[test]
fn panel_degraded_mode_still_serves_writes() {
    // Key never loaded: badge disabled, but connect/write/ack unaffected.
    let mut h = Harness::new(PanelController::new(RsaBadge::Disabled, 0));

    h.inject(LinkEvent::Connected { peer: PEER });
    h.run_ticks(1);
    assert!(matches!(
        h.renders.last().unwrap(),
        Render::Connected {
            rsa: Some(RsaBadge::Disabled)
        }
    ));

    h.inject(LinkEvent::inbox_write(b"plain text"));
    assert_eq!(h.notifies, vec!["Received!"]);
}

#[test]
fn panel_message_suppresses_idle_refresh_until_transition() {
    let mut h = Harness::new(PanelController::new(RsaBadge::Enabled, 0));
    h.inject(LinkEvent::Connected { peer: PEER });
    h.run_ticks(1);
    h.inject(LinkEvent::inbox_write(b"sticky"));
    h.inject(LinkEvent::Disconnected);
    h.run_ticks(1); // waiting screen replaces the message

    let renders_before = h.renders.len();
    // A long idle stretch: time rows resume because the transition cleared
    // the message.
    h.run_ticks(2 * IDLE_REFRESH_MS / TICK_MS);
    assert!(h.renders.len() > renders_before);
    assert!(h
        .renders
        .iter()
        .skip(renders_before)
        .all(|render| matches!(render, Render::TimeRow { .. })));
}

#[test]
fn beacon_pings_on_the_wire_cadence() {
    let mut h = Harness::new(BeaconController::new(0));

    h.inject(LinkEvent::Connected { peer: PEER });
    // 10 s connected: 5 pings, strictly increasing.
    h.run_ticks(10_000 / TICK_MS);
    assert_eq!(h.notifies, vec!["ping 1", "ping 2", "ping 3", "ping 4", "ping 5"]);

    h.inject(LinkEvent::Disconnected);
    h.run_ticks(1);
    assert_eq!(h.readvertises, 1);

    // Disconnected: silence.
    let pings_before = h.notifies.len();
    h.run_ticks(10_000 / TICK_MS);
    assert_eq!(h.notifies.len(), pings_before);

    // Reconnect: the counter resumes, it does not reset.
    h.inject(LinkEvent::Connected { peer: PEER });
    h.run_ticks(2_000 / TICK_MS);
    assert_eq!(h.notifies.last().unwrap(), "ping 6");
}

#[test]
fn beacon_echoes_writes_like_the_panel() {
    let mut h = Harness::new(BeaconController::new(0));
    h.inject(LinkEvent::Connected { peer: PEER });
    h.run_ticks(1);

    h.inject(LinkEvent::inbox_write(b"echo"));
    match h.renders.last().unwrap() {
        Render::Message { count, body } => {
            assert_eq!(*count, 1);
            assert_eq!(body.as_str(), "echo");
        }
        other => panic!("expected message render, got {other:?}"),
    }
    assert_eq!(h.notifies, vec!["Received!"]);
}

#[test]
fn heartbeat_cadence_is_ten_seconds() {
    let mut h = Harness::new(PanelController::new(RsaBadge::Enabled, 0));
    h.inject(LinkEvent::Connected { peer: PEER }); // suppress time rows
    let mut heartbeats = 0u32;
    for _ in 0..(3 * HEARTBEAT_MS / TICK_MS) {
        h.tick += 1;
        let now = h.now_ms();
        for effect in h.controller.on_tick(now) {
            if effect == Effect::LogHeap {
                heartbeats += 1;
            }
        }
    }
    assert_eq!(heartbeats, 3);
}
