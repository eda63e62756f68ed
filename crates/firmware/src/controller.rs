//! Application controllers — pure effect machines over the link state.
//!
//! The controllers own every piece of mutable application state (no ambient
//! globals) and never touch hardware. The binaries feed them [`LinkEvent`]s
//! drained from the link task's channel plus a 200 ms scheduler tick, and
//! execute the returned effects against the display, the GATT server and
//! the logger. Keeping the controllers free of I/O makes the whole loop
//! behaviour testable on the host.

use bluetooth::{ConnectionTracker, LinkEvent, MessageLog, PingBeacon, Transition};
use ui::RsaBadge;

/// Scheduler tick period for the main loop.
pub const TICK_MS: u64 = 200;

/// Idle uptime-row refresh period while waiting for a connection.
pub const IDLE_REFRESH_MS: u64 = 5_000;

/// Allocator-statistics heartbeat period.
pub const HEARTBEAT_MS: u64 = 10_000;

/// Delay between a disconnect and the advertising restart.
pub const READVERTISE_DELAY_MS: u64 = 500;

/// Payload for an outgoing notification (ack or ping).
pub type NotifyPayload = heapless::String<16>;

/// Message body as shown on screen. Capacity matches the inbox buffer.
pub type MessageBody = heapless::String<512>;

/// One full- or partial-screen paint requested by a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Render {
    /// Full waiting screen (blue).
    Waiting {
        /// Decrypt badge, `None` for the beacon firmware.
        rsa: Option<RsaBadge>,
        /// Seconds since boot.
        uptime_s: u32,
        /// Accepted message count.
        messages: u32,
    },
    /// Partial refresh of the uptime row on the waiting screen.
    TimeRow {
        /// Decrypt badge carried so the repaint matches the full screen.
        rsa: Option<RsaBadge>,
        /// Seconds since boot.
        uptime_s: u32,
        /// Accepted message count.
        messages: u32,
    },
    /// Full connected screen (green).
    Connected {
        /// Decrypt badge, `None` for the beacon firmware.
        rsa: Option<RsaBadge>,
    },
    /// Full message screen (green).
    Message {
        /// Accepted message count.
        count: u32,
        /// Body text.
        body: MessageBody,
    },
}

/// Side effects a controller asks its binary to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Repaint the display.
    Render(Render),
    /// Write this payload to the characteristic and notify subscribers.
    Notify(NotifyPayload),
    /// Release the link task to start a fresh advertising cycle.
    Readvertise,
    /// Emit the periodic allocator-statistics log line.
    LogHeap,
}

/// Effect list returned per event or tick. Bounded: the widest case is
/// a disconnect tick (render + readvertise + heartbeat).
pub type Effects = heapless::Vec<Effect, 4>;

fn notify_payload(text: &str) -> NotifyPayload {
    let mut payload = NotifyPayload::new();
    // Ack and ping strings are all under 16 bytes.
    let _ = payload.push_str(text);
    payload
}

fn body_from(log: &MessageLog) -> MessageBody {
    let mut body = MessageBody::new();
    match log.last_text() {
        // Capacity equals the inbox buffer; this cannot truncate.
        Some(text) => {
            let _ = body.push_str(text);
        }
        None => {
            use core::fmt::Write as _;
            let _ = write!(body, "<{} binary bytes>", log.last_bytes().len());
        }
    }
    body
}

/// Common surface of the two controllers, so one driver loop serves both
/// binaries and the emulator.
pub trait TickController {
    /// The first paint after boot completes.
    fn initial_render(&self, now_ms: u64) -> Render;
    /// Absorb one link event.
    fn handle_event(&mut self, event: LinkEvent, now_ms: u64) -> Effects;
    /// One scheduler tick.
    fn on_tick(&mut self, now_ms: u64) -> Effects;
}

/// Controller for the `panel` binary (message display + RSA badge).
pub struct PanelController {
    tracker: ConnectionTracker,
    log: MessageLog,
    rsa: RsaBadge,
    started_ms: u64,
    last_idle_refresh_ms: u64,
    last_heartbeat_ms: u64,
    message_on_screen: bool,
}

impl PanelController {
    /// Create a controller; `now_ms` anchors the uptime display.
    pub fn new(rsa: RsaBadge, now_ms: u64) -> Self {
        Self {
            tracker: ConnectionTracker::new(),
            log: MessageLog::new(),
            rsa,
            started_ms: now_ms,
            last_idle_refresh_ms: now_ms,
            last_heartbeat_ms: now_ms,
            message_on_screen: false,
        }
    }

    /// The first paint after boot completes: the blue waiting screen.
    pub fn initial_render(&self, now_ms: u64) -> Render {
        Render::Waiting {
            rsa: Some(self.rsa),
            uptime_s: self.uptime_s(now_ms),
            messages: self.log.count(),
        }
    }

    /// Absorb one link event.
    ///
    /// Connection edges only mutate state — the paint happens on the next
    /// tick, where the transition is observed exactly once. Writes paint
    /// immediately and queue the ack notification.
    pub fn handle_event(&mut self, event: LinkEvent, _now_ms: u64) -> Effects {
        let mut effects = Effects::new();
        match event {
            LinkEvent::Connected { peer } => {
                self.tracker.on_connected(peer);
            }
            LinkEvent::Disconnected => {
                self.tracker.on_disconnected();
            }
            LinkEvent::InboxWrite(payload) => {
                if let Some(accepted) = self.log.record(&payload) {
                    self.message_on_screen = true;
                    let _ = effects.push(Effect::Render(Render::Message {
                        count: self.log.count(),
                        body: body_from(&self.log),
                    }));
                    let _ = effects.push(Effect::Notify(notify_payload(accepted.ack)));
                }
                // Empty write: logged by the link task, nothing changes here.
            }
        }
        effects
    }

    /// One scheduler tick: observe transitions, refresh the idle clock,
    /// emit the heartbeat.
    pub fn on_tick(&mut self, now_ms: u64) -> Effects {
        let mut effects = Effects::new();

        if let Some(edge) = self.tracker.take_transition() {
            // A transition always clears whatever message was on screen.
            self.message_on_screen = false;
            self.last_idle_refresh_ms = now_ms;
            match edge {
                Transition::Connected => {
                    let _ = effects.push(Effect::Render(Render::Connected {
                        rsa: Some(self.rsa),
                    }));
                }
                Transition::Disconnected => {
                    let _ = effects.push(Effect::Render(Render::Waiting {
                        rsa: Some(self.rsa),
                        uptime_s: self.uptime_s(now_ms),
                        messages: self.log.count(),
                    }));
                    if self.tracker.take_readvertise() {
                        let _ = effects.push(Effect::Readvertise);
                    }
                }
            }
        } else if !self.tracker.connected()
            && !self.message_on_screen
            && now_ms.saturating_sub(self.last_idle_refresh_ms) >= IDLE_REFRESH_MS
        {
            self.last_idle_refresh_ms = now_ms;
            let _ = effects.push(Effect::Render(Render::TimeRow {
                rsa: Some(self.rsa),
                uptime_s: self.uptime_s(now_ms),
                messages: self.log.count(),
            }));
        }

        if now_ms.saturating_sub(self.last_heartbeat_ms) >= HEARTBEAT_MS {
            self.last_heartbeat_ms = now_ms;
            let _ = effects.push(Effect::LogHeap);
        }

        effects
    }

    /// Connection bookkeeping, exposed for logging and tests.
    pub fn tracker(&self) -> &ConnectionTracker {
        &self.tracker
    }

    /// Accepted message count.
    pub fn message_count(&self) -> u32 {
        self.log.count()
    }

    #[allow(clippy::cast_possible_truncation)] // uptime in seconds fits u32 for ~136 years
    fn uptime_s(&self, now_ms: u64) -> u32 {
        (now_ms.saturating_sub(self.started_ms) / 1000) as u32
    }
}

impl TickController for PanelController {
    fn initial_render(&self, now_ms: u64) -> Render {
        PanelController::initial_render(self, now_ms)
    }
    fn handle_event(&mut self, event: LinkEvent, now_ms: u64) -> Effects {
        PanelController::handle_event(self, event, now_ms)
    }
    fn on_tick(&mut self, now_ms: u64) -> Effects {
        PanelController::on_tick(self, now_ms)
    }
}

/// Controller for the `beacon` binary (periodic ping notifier).
pub struct BeaconController {
    tracker: ConnectionTracker,
    log: MessageLog,
    beacon: PingBeacon,
    started_ms: u64,
    last_heartbeat_ms: u64,
}

impl BeaconController {
    /// Create a controller; `now_ms` anchors the uptime display.
    pub fn new(now_ms: u64) -> Self {
        Self {
            tracker: ConnectionTracker::new(),
            log: MessageLog::new(),
            beacon: PingBeacon::new(),
            started_ms: now_ms,
            last_heartbeat_ms: now_ms,
        }
    }

    /// The first paint after boot completes.
    pub fn initial_render(&self, now_ms: u64) -> Render {
        Render::Waiting {
            rsa: None,
            uptime_s: self.uptime_s(now_ms),
            messages: self.log.count(),
        }
    }

    /// Absorb one link event. Connect arms the ping period, disconnect
    /// disarms it (the counter carries across reconnects), writes echo to
    /// the display and ack like the panel.
    pub fn handle_event(&mut self, event: LinkEvent, now_ms: u64) -> Effects {
        let mut effects = Effects::new();
        match event {
            LinkEvent::Connected { peer } => {
                self.tracker.on_connected(peer);
                self.beacon.arm(now_ms);
            }
            LinkEvent::Disconnected => {
                self.tracker.on_disconnected();
                self.beacon.disarm();
            }
            LinkEvent::InboxWrite(payload) => {
                if let Some(accepted) = self.log.record(&payload) {
                    let _ = effects.push(Effect::Render(Render::Message {
                        count: self.log.count(),
                        body: body_from(&self.log),
                    }));
                    let _ = effects.push(Effect::Notify(notify_payload(accepted.ack)));
                }
            }
        }
        effects
    }

    /// One scheduler tick: transitions first, then the ping deadline.
    pub fn on_tick(&mut self, now_ms: u64) -> Effects {
        let mut effects = Effects::new();

        if let Some(edge) = self.tracker.take_transition() {
            match edge {
                Transition::Connected => {
                    let _ = effects.push(Effect::Render(Render::Connected { rsa: None }));
                }
                Transition::Disconnected => {
                    let _ = effects.push(Effect::Render(Render::Waiting {
                        rsa: None,
                        uptime_s: self.uptime_s(now_ms),
                        messages: self.log.count(),
                    }));
                    if self.tracker.take_readvertise() {
                        let _ = effects.push(Effect::Readvertise);
                    }
                }
            }
        } else if let Some(ping) = self.beacon.poll(now_ms) {
            let _ = effects.push(Effect::Notify(notify_payload(&ping)));
        }

        if now_ms.saturating_sub(self.last_heartbeat_ms) >= HEARTBEAT_MS {
            self.last_heartbeat_ms = now_ms;
            let _ = effects.push(Effect::LogHeap);
        }

        effects
    }

    /// Connection bookkeeping, exposed for logging and tests.
    pub fn tracker(&self) -> &ConnectionTracker {
        &self.tracker
    }

    #[allow(clippy::cast_possible_truncation)] // uptime in seconds fits u32 for ~136 years
    fn uptime_s(&self, now_ms: u64) -> u32 {
        (now_ms.saturating_sub(self.started_ms) / 1000) as u32
    }
}

impl TickController for BeaconController {
    fn initial_render(&self, now_ms: u64) -> Render {
        BeaconController::initial_render(self, now_ms)
    }
    fn handle_event(&mut self, event: LinkEvent, now_ms: u64) -> Effects {
        BeaconController::handle_event(self, event, now_ms)
    }
    fn on_tick(&mut self, now_ms: u64) -> Effects {
        BeaconController::on_tick(self, now_ms)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    const PEER: [u8; 6] = [0x10, 0x20, 0x30, 0x40, 0x50, 0x60];

    fn connect(c: &mut PanelController, now: u64) {
        let fx = c.handle_event(LinkEvent::Connected { peer: PEER }, now);
        assert!(fx.is_empty(), "connect paints on the next tick, not inline");
    }

    #[test]
    fn test_connect_paints_green_on_next_tick() {
        let mut c = PanelController::new(RsaBadge::Enabled, 0);
        connect(&mut c, 100);
        let fx = c.on_tick(200);
        assert_eq!(
            fx.as_slice(),
            &[Effect::Render(Render::Connected {
                rsa: Some(RsaBadge::Enabled)
            })]
        );
        // No repeated paint while the state holds.
        assert!(c.on_tick(400).is_empty());
    }

    #[test]
    fn test_disconnect_paints_waiting_and_readvertises_once() {
        let mut c = PanelController::new(RsaBadge::Disabled, 0);
        connect(&mut c, 100);
        let _ = c.on_tick(200);

        let fx = c.handle_event(LinkEvent::Disconnected, 300);
        assert!(fx.is_empty());
        let fx = c.on_tick(400);
        assert_eq!(fx.len(), 2);
        assert!(matches!(
            fx[0],
            Effect::Render(Render::Waiting {
                rsa: Some(RsaBadge::Disabled),
                ..
            })
        ));
        assert_eq!(fx[1], Effect::Readvertise);
        // Exactly once per disconnect.
        assert!(c.on_tick(600).is_empty());
    }

    #[test]
    fn test_write_paints_message_and_acks() {
        let mut c = PanelController::new(RsaBadge::Enabled, 0);
        connect(&mut c, 0);
        let _ = c.on_tick(200);

        let fx = c.handle_event(LinkEvent::inbox_write(b"hello"), 300);
        assert_eq!(fx.len(), 2);
        match &fx[0] {
            Effect::Render(Render::Message { count, body }) => {
                assert_eq!(*count, 1);
                assert_eq!(body.as_str(), "hello");
            }
            other => panic!("expected message render, got {other:?}"),
        }
        match &fx[1] {
            Effect::Notify(payload) => assert_eq!(payload.as_str(), "Received!"),
            other => panic!("expected ack notify, got {other:?}"),
        }
        assert_eq!(c.message_count(), 1);
    }

    #[test]
    fn test_empty_write_changes_nothing() {
        let mut c = PanelController::new(RsaBadge::Enabled, 0);
        connect(&mut c, 0);
        let _ = c.on_tick(200);

        let fx = c.handle_event(LinkEvent::inbox_write(b""), 300);
        assert!(fx.is_empty());
        assert_eq!(c.message_count(), 0);
        // And no display update sneaks in on the following ticks.
        assert!(c.on_tick(400).is_empty());
    }

    #[test]
    fn test_binary_write_gets_placeholder_body() {
        let mut c = PanelController::new(RsaBadge::Enabled, 0);
        let fx = c.handle_event(LinkEvent::inbox_write(&[0xFF, 0xFE, 0x00]), 0);
        match &fx[0] {
            Effect::Render(Render::Message { body, .. }) => {
                assert_eq!(body.as_str(), "<3 binary bytes>");
            }
            other => panic!("expected message render, got {other:?}"),
        }
    }

    #[test]
    fn test_idle_time_row_refresh_every_five_seconds() {
        let mut c = PanelController::new(RsaBadge::Enabled, 0);
        // Nothing before the deadline.
        assert!(c.on_tick(4_800).is_empty());
        let fx = c.on_tick(5_000);
        assert!(matches!(
            fx.as_slice(),
            &[Effect::Render(Render::TimeRow { uptime_s: 5, .. })]
        ));
        // Re-phased from the refresh, not from boot.
        assert!(c.on_tick(9_800).is_empty());
        let fx = c.on_tick(10_000);
        // 10 s mark also carries the heartbeat.
        assert_eq!(fx.len(), 2);
        assert!(matches!(
            fx[0],
            Effect::Render(Render::TimeRow { uptime_s: 10, .. })
        ));
        assert_eq!(fx[1], Effect::LogHeap);
    }

    #[test]
    fn test_no_time_row_while_connected_or_message_shown() {
        let mut c = PanelController::new(RsaBadge::Enabled, 0);
        connect(&mut c, 0);
        let _ = c.on_tick(200);
        // Connected: no idle refresh.
        assert!(c.on_tick(6_000).is_empty());

        let mut c = PanelController::new(RsaBadge::Enabled, 0);
        let _ = c.handle_event(LinkEvent::inbox_write(b"shown"), 100);
        // Message on screen suppresses the idle overlay.
        assert!(c.on_tick(6_000).is_empty());
    }

    #[test]
    fn test_transition_clears_message_suppression() {
        let mut c = PanelController::new(RsaBadge::Enabled, 0);
        let _ = c.handle_event(LinkEvent::inbox_write(b"shown"), 0);
        connect(&mut c, 100);
        let _ = c.on_tick(200);
        let _ = c.handle_event(LinkEvent::Disconnected, 300);
        let _ = c.on_tick(400);
        // Back to waiting; the idle clock runs again (rephased at 400).
        let fx = c.on_tick(5_400);
        assert!(matches!(
            fx.as_slice(),
            &[Effect::Render(Render::TimeRow { .. })]
        ));
    }

    #[test]
    fn test_heartbeat_every_ten_seconds() {
        let mut c = PanelController::new(RsaBadge::Enabled, 0);
        connect(&mut c, 0); // connected: isolate the heartbeat from TimeRow
        let _ = c.on_tick(100);
        assert!(c.on_tick(9_900).is_empty());
        assert_eq!(c.on_tick(10_100).as_slice(), &[Effect::LogHeap]);
        assert!(c.on_tick(15_000).is_empty());
        assert_eq!(c.on_tick(20_200).as_slice(), &[Effect::LogHeap]);
    }

    #[test]
    fn test_message_count_survives_reconnect_cycles() {
        let mut c = PanelController::new(RsaBadge::Enabled, 0);
        for round in 1..=3u32 {
            connect(&mut c, 0);
            let _ = c.on_tick(0);
            let _ = c.handle_event(LinkEvent::inbox_write(b"m"), 0);
            let _ = c.handle_event(LinkEvent::Disconnected, 0);
            let fx = c.on_tick(0);
            match &fx[0] {
                Effect::Render(Render::Waiting { messages, .. }) => {
                    assert_eq!(*messages, round);
                }
                other => panic!("expected waiting render, got {other:?}"),
            }
        }
        assert_eq!(c.tracker().connection_count(), 0);
    }

    // ---- BeaconController ----------------------------------------------

    #[test]
    fn test_beacon_pings_every_two_seconds_while_connected() {
        let mut b = BeaconController::new(0);
        let _ = b.handle_event(LinkEvent::Connected { peer: PEER }, 1_000);
        let _ = b.on_tick(1_000); // paints Connected

        assert!(b.on_tick(2_900).is_empty());
        let fx = b.on_tick(3_000);
        assert_eq!(fx.len(), 1);
        match &fx[0] {
            Effect::Notify(payload) => assert_eq!(payload.as_str(), "ping 1"),
            other => panic!("expected ping, got {other:?}"),
        }
        let fx = b.on_tick(5_000);
        match &fx[0] {
            Effect::Notify(payload) => assert_eq!(payload.as_str(), "ping 2"),
            other => panic!("expected ping, got {other:?}"),
        }
    }

    #[test]
    fn test_beacon_silent_while_disconnected_counter_carries_over() {
        let mut b = BeaconController::new(0);
        let _ = b.handle_event(LinkEvent::Connected { peer: PEER }, 0);
        let _ = b.on_tick(0);
        let _ = b.on_tick(2_000); // ping 1
        let _ = b.handle_event(LinkEvent::Disconnected, 2_500);
        let fx = b.on_tick(2_600);
        assert!(matches!(fx[0], Effect::Render(Render::Waiting { rsa: None, .. })));
        assert_eq!(fx[1], Effect::Readvertise);

        // Long idle: no pings.
        assert!(b.on_tick(30_000).iter().all(|e| *e == Effect::LogHeap));

        let _ = b.handle_event(LinkEvent::Connected { peer: PEER }, 40_000);
        let _ = b.on_tick(40_000);
        let fx = b.on_tick(42_000);
        match &fx[0] {
            Effect::Notify(payload) => assert_eq!(payload.as_str(), "ping 2"),
            other => panic!("expected ping, got {other:?}"),
        }
    }

    #[test]
    fn test_beacon_echoes_writes() {
        let mut b = BeaconController::new(0);
        let _ = b.handle_event(LinkEvent::Connected { peer: PEER }, 0);
        let fx = b.handle_event(LinkEvent::inbox_write(b"echo me"), 100);
        assert!(matches!(
            &fx[0],
            Effect::Render(Render::Message { count: 1, body }) if body.as_str() == "echo me"
        ));
    }
}
