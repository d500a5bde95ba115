//! Integration tests for StateApplier → LedController → bus.
//!
//! Drives the real controller over a simulated chip so register order,
//! frame opcodes and the interleaving of dwell delays are all checked
//! together.

use ethutild::app::ports::LedPort;
use ethutild::drivers::led_controller::LedController;
use ethutild::error::{Error, LedSet};
use ethutild::protocol::LedId;
use ethutild::protocol::frame::{LedMode, checksum};
use ethutild::state::{StateApplier, VisualState};

use super::mock_hw::{MockChip, SharedDelay};

const RGB: u8 = 0x02;
const BRIGHTNESS: u8 = 0x01;
const ONOFF: u8 = 0x03;

fn rig(chip: MockChip) -> (LedController<MockChip, SharedDelay>, StateApplier<SharedDelay>, SharedDelay) {
    let delay = SharedDelay::default();
    let leds = LedController::new(chip, delay.clone());
    let applier = StateApplier::new(255, delay.clone());
    (leds, applier, delay)
}

#[test]
fn low_state_reaches_the_bus_in_order() {
    let (mut leds, mut applier, delay) = rig(MockChip::new());
    applier.apply(VisualState::Low, &mut leds).unwrap();

    let (chip, _) = leds.into_parts();
    assert_eq!(
        chip.ops(),
        vec![
            (0, RGB),
            (0, BRIGHTNESS),
            (0, ONOFF),
            (1, RGB),
            (1, BRIGHTNESS),
            (1, ONOFF),
            (2, ONOFF),
            (3, ONOFF),
        ]
    );
    // netdev colour is green; disk LEDs are switched off
    assert_eq!(&chip.writes[3].1[6..9], &[0x00, 0xff, 0x00]);
    assert_eq!(chip.writes[6].1[6], 0);
    assert_eq!(chip.writes[7].1[6], 0);

    // controller latches (10) nested inside the applier's per-LED dwell (100)
    assert_eq!(delay.log(), vec![10, 10, 100, 10, 10, 100, 100]);
}

#[test]
fn every_frame_on_the_wire_carries_the_placeholder_checksum() {
    let (mut leds, mut applier, _) = rig(MockChip::new());
    applier.apply(VisualState::High, &mut leds).unwrap();

    let (chip, _) = leds.into_parts();
    for (reg, frame) in &chip.writes {
        assert_eq!(frame.len(), 12);
        assert_eq!(frame[0], *reg, "LED index doubles as command register");
        let sum = checksum(&frame[1..10]);
        assert_eq!(u32::from(u16::from_be_bytes([frame[10], frame[11]])), sum);
    }
}

#[test]
fn failed_netdev_still_drives_disk_leds() {
    let mut chip = MockChip::new();
    chip.fail_regs.push(LedId::Netdev.command_reg());
    let (mut leds, mut applier, _) = rig(chip);

    let err = applier.apply(VisualState::Medium, &mut leds).unwrap_err();
    assert_eq!(err, Error::LedsFailed(LedSet::from(LedId::Netdev)));
    assert_eq!(applier.current_state(), VisualState::Off);

    let (chip, _) = leds.into_parts();
    // netdev stops after the rejected colour write, disks still get theirs
    assert_eq!(
        chip.ops(),
        vec![
            (0, RGB),
            (0, BRIGHTNESS),
            (0, ONOFF),
            (1, RGB),
            (2, RGB),
            (2, BRIGHTNESS),
            (2, ONOFF),
            (3, ONOFF),
        ]
    );
}

#[test]
fn turn_off_all_checks_write_ack() {
    let mut chip = MockChip::new();
    chip.ack = 0;
    let (mut leds, _, delay) = rig(chip);

    assert_eq!(leds.turn_off_all(), Err(Error::AckMismatch { value: 0 }));
    assert_eq!(delay.log(), vec![20, 20, 20, 50]);

    let (chip, _) = leds.into_parts();
    assert_eq!(chip.ops(), vec![(0, ONOFF), (1, ONOFF), (2, ONOFF), (3, ONOFF)]);
    assert!(chip.writes.iter().all(|(_, f)| f[6] == 0));
}

#[test]
fn turn_off_all_reports_each_failed_led_and_skips_ack() {
    let mut chip = MockChip::new();
    chip.fail_regs.extend([LedId::Power.command_reg(), LedId::Disk2.command_reg()]);
    let (mut leds, _, delay) = rig(chip);

    let expected = LedSet::from(LedId::Power) | LedSet::from(LedId::Disk2);
    assert_eq!(leds.turn_off_all(), Err(Error::LedsFailed(expected)));
    assert_eq!(delay.log(), vec![20, 20, 20]);
}

#[test]
fn status_readback_decodes_chip_frame() {
    // on, brightness 200, white, no timing
    let body = [1u8, 200, 255, 255, 255, 0, 0, 0, 0];
    let sum = checksum(&body) as u16;
    let mut raw = body.to_vec();
    raw.extend_from_slice(&sum.to_be_bytes());

    let mut chip = MockChip::new();
    chip.status.insert(LedId::Power.status_reg(), raw);
    let (mut leds, _, _) = rig(chip);

    let status = leds.get_status(LedId::Power).unwrap();
    assert_eq!(status.mode, LedMode::On);
    assert_eq!(status.brightness, 200);
}

#[test]
fn short_status_read_is_a_transport_error() {
    let mut chip = MockChip::new();
    chip.status.insert(LedId::Disk1.status_reg(), vec![1, 2, 3]);
    let (mut leds, _, _) = rig(chip);

    assert!(matches!(
        leds.get_status(LedId::Disk1),
        Err(Error::Transport(ethutild::error::TransportError::ShortRead { expected: 11, got: 3 }))
    ));
}
