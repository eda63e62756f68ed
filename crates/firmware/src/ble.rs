//! BLE link task — trouble-host GATT server over the esp-radio controller.
//!
//! One service, one characteristic (read | write | notify). The task owns
//! the radio end of the two channels: characteristic writes become
//! [`LinkEvent`]s for the controller, and the controller's ack/ping
//! payloads arrive on [`OUTBOX`] to be written back and notified.
//!
//! Advertising restarts after each connection ends: a fixed short delay,
//! then the [`ADVERTISE_GATE`] permit the controller releases when it
//! observes the disconnect.

use bluetooth::service::{CHARACTERISTIC_LEN, SERVICE_UUID};
use bluetooth::LinkEvent;
use bt_hci::controller::ExternalController;
use embassy_futures::join::join;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_time::Timer;
use esp_radio::ble::controller::BleConnector;
use trouble_host::prelude::*;

use crate::controller::{NotifyPayload, READVERTISE_DELAY_MS};

/// Single-peer device, like the original.
pub const CONNECTIONS_MAX: usize = 1;

/// L2CAP channels: signalling + ATT.
pub const L2CAP_CHANNELS_MAX: usize = 2;

/// HCI command slots for the external controller.
pub const HCI_SLOTS: usize = 20;

/// Events from the link task to the controller loop.
pub static LINK_EVENTS: Channel<CriticalSectionRawMutex, LinkEvent, 4> = Channel::new();

/// Ack/ping payloads from the controller loop to the link task.
pub static OUTBOX: Channel<CriticalSectionRawMutex, NotifyPayload, 4> = Channel::new();

/// Released by the controller once it has observed a disconnect; gates the
/// next advertising cycle so state and screen are consistent first.
pub static ADVERTISE_GATE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

// GATT server definition. The UUID literals are pinned against
// bluetooth::service by that crate's unit tests.
#[gatt_server]
struct PanelServer {
    panel: PanelService,
}

#[gatt_service(uuid = "4fafc201-1fb5-459e-8fcc-c5c9c331914b")]
struct PanelService {
    /// Inbox: peers write payloads here; acks and pings are notified back.
    #[characteristic(uuid = "beb5483e-36e1-4688-b7f5-ea07361b26a8", read, write, notify, value = [0u8; 247])]
    inbox: [u8; CHARACTERISTIC_LEN],
}

/// Zero-pad `text` into one characteristic-sized value.
fn padded(text: &str) -> [u8; CHARACTERISTIC_LEN] {
    let mut value = [0u8; CHARACTERISTIC_LEN];
    let take = text.len().min(CHARACTERISTIC_LEN);
    if let (Some(dst), Some(src)) = (value.get_mut(..take), text.as_bytes().get(..take)) {
        dst.copy_from_slice(src);
    }
    value
}

/// Service UUID in the little-endian order advertising wants.
fn service_uuid_le() -> [u8; 16] {
    let mut uuid = bluetooth::service::parse_uuid(SERVICE_UUID).unwrap_or([0u8; 16]);
    uuid.reverse();
    uuid
}

/// Run the BLE stack: advertise, accept connections, shuttle events.
///
/// Never returns under normal operation.
pub async fn run(controller: ExternalController<BleConnector<'_>, HCI_SLOTS>, initial_value: &str) {
    let address: Address = Address::random([0x4e, 0x5a, 0x24, 0x01, 0x9b, 0xff]);
    log::info!("[ble] address = {address:?}");

    let mut resources: HostResources<DefaultPacketPool, CONNECTIONS_MAX, L2CAP_CHANNELS_MAX> =
        HostResources::new();
    let stack = trouble_host::new(controller, &mut resources).set_random_address(address);
    let Host {
        mut peripheral,
        mut runner,
        ..
    } = stack.build();

    let server = match PanelServer::new_with_config(GapConfig::Peripheral(PeripheralConfig {
        name: platform::config::DEVICE_NAME,
        appearance: &appearance::UNKNOWN,
    })) {
        Ok(server) => server,
        Err(e) => {
            log::error!("[ble] GATT server creation failed: {e:?}");
            return;
        }
    };

    // Readable before the first write: tells the peer which mode we booted in.
    if server.panel.inbox.set(&server, &padded(initial_value)).is_err() {
        log::warn!("[ble] failed to seed characteristic value");
    }

    log::info!("[ble] GATT server created, starting stack");

    let _ = join(
        // HCI runner — must run forever alongside everything else
        async {
            loop {
                if let Err(e) = runner.run().await {
                    log::warn!("[ble] runner error: {e:?}");
                }
            }
        },
        // Advertising + connection handling loop
        async {
            loop {
                match advertise(&mut peripheral, &server).await {
                    Ok(conn) => {
                        let mut peer = [0u8; 6];
                        peer.copy_from_slice(conn.raw().peer_address().raw());
                        log::info!("[ble] connected");
                        LINK_EVENTS.send(LinkEvent::Connected { peer }).await;
                        serve_connection(&server, &conn).await;
                        LINK_EVENTS.send(LinkEvent::Disconnected).await;

                        // Fixed settle delay, then wait for the controller
                        // to release the next advertising cycle.
                        Timer::after_millis(READVERTISE_DELAY_MS).await;
                        ADVERTISE_GATE.wait().await;
                        log::info!("[ble] restarting advertising");
                    }
                    Err(e) => {
                        log::warn!("[ble] advertising error: {e:?}");
                        Timer::after_millis(1000).await;
                    }
                }
            }
        },
    )
    .await;
}

async fn advertise<'values, 'server, C: Controller>(
    peripheral: &mut Peripheral<'values, C, DefaultPacketPool>,
    server: &'server PanelServer<'values>,
) -> Result<GattConnection<'values, 'server, DefaultPacketPool>, BleHostError<C::Error>> {
    // 128-bit service UUID fills the advertising PDU; the device name rides
    // in the scan response.
    let uuid = service_uuid_le();
    let mut adv_data = [0; 31];
    let adv_len = AdStructure::encode_slice(
        &[
            AdStructure::Flags(LE_GENERAL_DISCOVERABLE | BR_EDR_NOT_SUPPORTED),
            AdStructure::ServiceUuids128(&[uuid]),
        ],
        &mut adv_data[..],
    )?;

    let mut scan_data = [0; 31];
    let scan_len = AdStructure::encode_slice(
        &[AdStructure::CompleteLocalName(
            platform::config::DEVICE_NAME.as_bytes(),
        )],
        &mut scan_data[..],
    )?;

    let advertiser = peripheral
        .advertise(
            &Default::default(),
            Advertisement::ConnectableScannableUndirected {
                adv_data: adv_data.get(..adv_len).unwrap_or(&[]),
                scan_data: scan_data.get(..scan_len).unwrap_or(&[]),
            },
        )
        .await?;

    log::info!("[ble] advertising...");
    let conn = advertiser.accept().await?.with_attribute_server(server)?;
    Ok(conn)
}

/// Pump one connection: GATT events outward, notify payloads inward.
async fn serve_connection<P: PacketPool>(server: &PanelServer<'_>, conn: &GattConnection<'_, '_, P>) {
    let inbox_handle = server.panel.inbox.handle;
    loop {
        match select(conn.next(), OUTBOX.receive()).await {
            Either::First(event) => match event {
                GattConnectionEvent::Disconnected { reason } => {
                    log::info!("[ble] disconnected: {reason:?}");
                    break;
                }
                GattConnectionEvent::Gatt { event } => {
                    if let GattEvent::Write(ref write_event) = event {
                        if write_event.handle() == inbox_handle {
                            on_inbox_write(write_event.data());
                        }
                    }
                    match event.accept() {
                        Ok(reply) => reply.send().await,
                        Err(e) => log::warn!("[ble] error sending response: {e:?}"),
                    }
                }
                _ => {}
            },
            Either::Second(payload) => {
                let value = padded(&payload);
                if server.panel.inbox.set(server, &value).is_err() {
                    log::warn!("[ble] characteristic value update failed");
                }
                // Best effort, like the original: the notify result is
                // logged and otherwise ignored.
                if server.panel.inbox.notify(conn, &value).await.is_err() {
                    log::warn!("[ble] notify failed (no subscriber?)");
                }
            }
        }
    }
}

/// Log and forward one inbox write. Empty writes are forwarded too — the
/// controller treats them as a no-op — but flagged in the log.
fn on_inbox_write(data: &[u8]) {
    if data.is_empty() {
        log::warn!("[ble] empty write received");
    } else {
        log::info!("[ble] write received: {} bytes", data.len());
        log_hex(data);
        match core::str::from_utf8(data) {
            Ok(text) => log::info!("[ble] text: {text}"),
            Err(_) => log::info!("[ble] text: <not valid UTF-8>"),
        }
    }

    // Non-blocking send — drop if the controller loop is behind.
    if LINK_EVENTS.try_send(LinkEvent::inbox_write(data)).is_err() {
        log::warn!("[ble] event channel full, write dropped");
    }
}

/// Hex-dump `data` to the log, 16 bytes per line.
fn log_hex(data: &[u8]) {
    use core::fmt::Write as _;
    for chunk in data.chunks(16) {
        let mut line: heapless::String<48> = heapless::String::new();
        for byte in chunk {
            let _ = write!(line, "{byte:02X} ");
        }
        log::debug!("[ble] hex: {line}");
    }
}
