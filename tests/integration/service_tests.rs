//! Integration tests for MonitorService → sampler → state manager → LEDs.

use std::num::NonZeroU32;
use std::time::Instant;

use ethutild::app::events::AppEvent;
use ethutild::app::service::{CancelToken, MonitorService, run_demo, shutdown};
use ethutild::config::{ServiceConfig, ThresholdSet};
use ethutild::error::{Error, SamplingError};
use ethutild::protocol::{COLOR_BLUE, COLOR_GREEN, COLOR_RED, COLOR_WHITE, LedId};
use ethutild::sensors::bandwidth::BandwidthSampler;
use ethutild::state::{LedStateManager, VisualState};

use super::mock_hw::{
    CancelAfter, LedCall, MockLeds, RecordingSink, ScriptedCounters, SharedDelay, sample_at,
};

/// 1 Gbps link: 1 % utilisation is 1.25 MB over one second.
const BYTES_PER_PERCENT: u64 = 1_250_000;

fn service(
    samples: Vec<Result<ethutild::sensors::bandwidth::CounterSample, SamplingError>>,
) -> MonitorService<ScriptedCounters, SharedDelay> {
    let config = ServiceConfig::default();
    let sampler = BandwidthSampler::new(ScriptedCounters::new(samples), NonZeroU32::new(1000).unwrap());
    let manager = LedStateManager::new(config.thresholds, config.brightness, SharedDelay::default());
    MonitorService::new(sampler, manager, &config)
}

#[test]
fn fifteen_percent_lights_netdev_green() {
    let t0 = Instant::now();
    let mut svc = service(vec![
        sample_at(t0, 0, 0, 0),
        sample_at(t0, 1000, 15 * BYTES_PER_PERCENT, 0),
    ]);
    let mut leds = MockLeds::new();
    let mut sink = RecordingSink::default();

    svc.start(&mut sink).unwrap();
    svc.tick(&mut leds, &mut sink).unwrap();

    assert_eq!(
        leds.calls,
        vec![
            LedCall::On(LedId::Power, COLOR_WHITE),
            LedCall::On(LedId::Netdev, COLOR_GREEN),
            LedCall::Off(LedId::Disk1),
            LedCall::Off(LedId::Disk2),
        ]
    );
    assert_eq!(svc.manager().current_state(), VisualState::Low);
    assert!(matches!(sink.events[0], AppEvent::Started { capacity_mbps: 1000, .. }));
    assert!(matches!(sink.events[1], AppEvent::Telemetry(r) if (r.usage_percentage - 15.0).abs() < 1e-9));
    assert_eq!(
        sink.events[2],
        AppEvent::StateChanged {
            from: VisualState::Off,
            to: VisualState::Low
        }
    );
}

#[test]
fn unchanged_band_writes_nothing() {
    let t0 = Instant::now();
    let mut svc = service(vec![
        sample_at(t0, 0, 0, 0),
        sample_at(t0, 1000, 50 * BYTES_PER_PERCENT, 0),
        sample_at(t0, 2000, 100 * BYTES_PER_PERCENT, 0),
    ]);
    let mut leds = MockLeds::new();
    let mut sink = RecordingSink::default();
    svc.start(&mut sink).unwrap();

    svc.tick(&mut leds, &mut sink).unwrap();
    assert_eq!(leds.calls.len(), 4);
    svc.tick(&mut leds, &mut sink).unwrap();
    assert_eq!(leds.calls.len(), 4, "second 50% reading must not touch the bus");
    assert_eq!(svc.manager().current_state(), VisualState::Medium);
}

#[test]
fn start_fails_without_interface() {
    let mut svc = {
        let config = ServiceConfig::default();
        let mut counters = ScriptedCounters::new(Vec::new());
        counters.exists = false;
        let sampler = BandwidthSampler::new(counters, NonZeroU32::new(1000).unwrap());
        let manager = LedStateManager::new(config.thresholds, 255, SharedDelay::default());
        MonitorService::new(sampler, manager, &config)
    };
    let mut sink = RecordingSink::default();
    assert_eq!(
        svc.start(&mut sink),
        Err(Error::Sampling(SamplingError::InterfaceMissing))
    );
    assert!(sink.events.is_empty());
}

#[test]
fn ten_consecutive_invalid_samples_are_fatal() {
    let t0 = Instant::now();
    let mut svc = service(vec![sample_at(t0, 0, 0, 0)]);
    let mut leds = MockLeds::new();
    let mut sink = RecordingSink::default();
    svc.start(&mut sink).unwrap();

    for n in 1..10 {
        svc.tick(&mut leds, &mut sink).unwrap();
        assert_eq!(svc.consecutive_failures(), n);
    }
    assert_eq!(
        svc.tick(&mut leds, &mut sink),
        Err(Error::Sampling(SamplingError::CountersUnavailable))
    );
    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::SampleRejected {
            consecutive: 10,
            max: 10,
            ..
        })
    ));
    assert!(leds.calls.is_empty());
}

#[test]
fn valid_sample_resets_failure_count() {
    let t0 = Instant::now();
    let mut svc = service(vec![
        sample_at(t0, 0, 0, 0),
        Err(SamplingError::CountersUnavailable),
        // too soon after the baseline: counted as a failure too
        sample_at(t0, 50, 0, 0),
        sample_at(t0, 1000, 0, 0),
    ]);
    let mut leds = MockLeds::new();
    let mut sink = RecordingSink::default();
    svc.start(&mut sink).unwrap();

    svc.tick(&mut leds, &mut sink).unwrap();
    svc.tick(&mut leds, &mut sink).unwrap();
    assert_eq!(svc.consecutive_failures(), 2);
    svc.tick(&mut leds, &mut sink).unwrap();
    assert_eq!(svc.consecutive_failures(), 0);
}

#[test]
fn led_failure_is_reported_not_fatal() {
    let t0 = Instant::now();
    let mut svc = service(vec![
        sample_at(t0, 0, 0, 0),
        sample_at(t0, 1000, 90 * BYTES_PER_PERCENT, 0),
    ]);
    let mut leds = MockLeds::failing(LedId::Disk1);
    let mut sink = RecordingSink::default();
    svc.start(&mut sink).unwrap();

    svc.tick(&mut leds, &mut sink).unwrap();
    assert!(leds.calls.contains(&LedCall::On(LedId::Disk2, COLOR_RED)));
    assert!(matches!(
        sink.events.last(),
        Some(AppEvent::ApplyFailed {
            target: VisualState::High,
            error: Error::LedsFailed(_)
        })
    ));
    assert_eq!(svc.manager().current_state(), VisualState::Off);
}

#[test]
fn run_stops_between_cycles_when_cancelled() {
    let t0 = Instant::now();
    let mut svc = service(vec![
        sample_at(t0, 0, 0, 0),
        sample_at(t0, 1000, 0, 0),
        sample_at(t0, 2000, 0, 0),
    ]);
    let mut leds = MockLeds::new();
    let mut sink = RecordingSink::default();
    svc.start(&mut sink).unwrap();

    let cancel = CancelToken::new();
    // initial wait, then one sleep after each of two cycles
    let mut sleeper = CancelAfter::new(cancel.clone(), 3);
    svc.run(&cancel, &mut leds, &mut sink, &mut sleeper).unwrap();

    assert_eq!(svc.cycles(), 2);
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped { cycles: 2 }));
}

#[test]
fn run_ends_with_error_after_failure_limit() {
    let t0 = Instant::now();
    let mut svc = service(vec![sample_at(t0, 0, 0, 0)]);
    let mut leds = MockLeds::new();
    let mut sink = RecordingSink::default();
    svc.start(&mut sink).unwrap();

    let cancel = CancelToken::new();
    let mut sleeper = CancelAfter::new(cancel.clone(), usize::MAX);
    let result = svc.run(&cancel, &mut leds, &mut sink, &mut sleeper);

    assert!(matches!(result, Err(Error::Sampling(_))));
    assert_eq!(svc.cycles(), 10);
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped { cycles: 10 }));

    shutdown(&mut leds);
    assert_eq!(leds.calls.last(), Some(&LedCall::AllOff));
}

#[test]
fn demo_cycles_through_every_state() {
    let mut manager = LedStateManager::new(ThresholdSet::default(), 255, SharedDelay::default());
    let mut leds = MockLeds::new();
    let cancel = CancelToken::new();
    let mut sleeper = CancelAfter::new(cancel.clone(), 4);

    run_demo(&cancel, &mut manager, &mut leds, &mut sleeper, 1000).unwrap();

    assert_eq!(manager.current_state(), VisualState::High);
    let colours: Vec<_> = leds
        .calls
        .iter()
        .filter_map(|c| match c {
            LedCall::On(LedId::Netdev, colour) => Some(*colour),
            _ => None,
        })
        .collect();
    // 5 % matches the initial Off state and writes nothing
    assert_eq!(colours, vec![COLOR_GREEN, COLOR_BLUE, COLOR_RED]);
}

#[test]
fn demo_stops_on_apply_failure() {
    let mut manager = LedStateManager::new(ThresholdSet::default(), 255, SharedDelay::default());
    let mut leds = MockLeds::failing(LedId::Power);
    let cancel = CancelToken::new();
    let mut sleeper = CancelAfter::new(cancel.clone(), usize::MAX);

    let result = run_demo(&cancel, &mut manager, &mut leds, &mut sleeper, 1000);
    assert!(matches!(result, Err(Error::LedsFailed(_))));
    assert_eq!(sleeper.calls, 1, "the 5% step succeeds before 25% fails");
}
