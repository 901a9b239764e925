//! Property tests for the timing-critical building blocks.
//!
//! Runs on host (x86_64) only: proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use motionlight::config::ChannelList;
use motionlight::inputs::button::{ButtonClassifier, PressClass};
use motionlight::inputs::motion::MotionDebounce;
use motionlight::lighting::waveform::Waveform;
use motionlight::lighting::zone::LedZone;
use proptest::prelude::*;

const HOLD_MS: u32 = 10_000;
const SHORT_MS: u32 = 50;
const LONG_MS: u32 = 1_000;

fn expected_class(held_ms: u32) -> PressClass {
    if held_ms >= LONG_MS {
        PressClass::Long
    } else if held_ms >= SHORT_MS {
        PressClass::Short
    } else {
        PressClass::NoPress
    }
}

// ── Motion hold ───────────────────────────────────────────────

proptest! {
    /// After one edge, motion stays on exactly while less than the hold
    /// time has been counted down, however the ticks are batched.
    #[test]
    fn motion_held_iff_within_hold(chunks in proptest::collection::vec(1u32..=700, 1..40)) {
        let mut m = MotionDebounce::new(HOLD_MS);
        m.on_edge();
        let mut elapsed = 0u32;
        for chunk in chunks {
            m.count_down(chunk);
            elapsed += chunk;
            prop_assert_eq!(m.poll(), elapsed < HOLD_MS, "elapsed {}", elapsed);
        }
    }

    /// An edge at any point restores the full hold.
    #[test]
    fn motion_edge_restarts_full_hold(before in 0u32..30_000) {
        let mut m = MotionDebounce::new(HOLD_MS);
        m.on_edge();
        m.count_down(before);
        m.poll();
        m.on_edge();
        prop_assert!(m.poll());
        prop_assert_eq!(m.remaining_ms(), HOLD_MS);
    }
}

// ── Button classification ─────────────────────────────────────

proptest! {
    /// Contact bounce at press start and repeated same-level interrupts
    /// never change the class decided by the held time.
    #[test]
    fn press_class_survives_bounce_and_duplicates(
        bounces in 0usize..6,
        duplicates in 0usize..4,
        held_ms in 0u32..2_500,
    ) {
        let mut b = ButtonClassifier::new(SHORT_MS, LONG_MS, true);

        // Active-low: each bounce is a press/release pair within the same tick.
        for _ in 0..bounces {
            b.on_edge(false);
            b.on_edge(true);
        }
        b.on_edge(false);
        for _ in 0..duplicates {
            b.on_edge(false);
        }
        prop_assert!(b.is_pressed());

        for _ in 0..held_ms {
            b.count_down(1);
        }
        b.on_edge(true);
        for _ in 0..duplicates {
            b.on_edge(true);
        }

        prop_assert!(!b.is_pressed());
        prop_assert_eq!(b.take_event(), Some(expected_class(held_ms)));
        prop_assert_eq!(b.take_event(), None);
    }
}

// ── Fade continuity ───────────────────────────────────────────

proptest! {
    /// Retargeting a zone mid-fade never jumps, every level lies between
    /// the fade's start and target, and the target is reached on time.
    #[test]
    fn fade_is_continuous_across_retargets(
        steps in proptest::collection::vec((0u32..600, 0u8..=63, 0u32..800), 1..8),
    ) {
        let channels: ChannelList = (0u8..4).collect();
        let mut zone = LedZone::new(channels, 63);
        let mut now = 0u32;

        for (wait_ms, target, duration_ms) in steps {
            now += wait_ms;
            let from = zone.run(now);
            zone.fade_to(now, target, duration_ms);
            if duration_ms > 0 {
                prop_assert_eq!(zone.level(), from, "jump on retarget");
            }

            let (lo, hi) = (from.min(target), from.max(target));
            for t in 0..=duration_ms {
                let level = zone.run(now + t);
                prop_assert!(lo <= level && level <= hi, "{} outside {}..={}", level, lo, hi);
            }
            prop_assert_eq!(zone.run(now + duration_ms), target);
            prop_assert!(zone.is_settled());
        }
    }
}

// ── Waveforms ─────────────────────────────────────────────────

proptest! {
    /// A double indicator is at max for exactly both flash windows each
    /// period, and every period starts dark.
    #[test]
    fn double_indicator_on_time_matches_duties(
        period_ms in 10u32..4_000,
        duty1 in 0.0f32..0.3,
        gap in 0.0f32..0.3,
        duty2 in 0.0f32..0.3,
    ) {
        let w = Waveform::double_indicator(period_ms, duty1, gap, duty2, 0, 63);
        let Waveform::DoubleIndicator { rest_ms, on1_ms, gap_ms, .. } = w else {
            unreachable!("constructor returns a double indicator");
        };
        let on2_ms = period_ms - rest_ms - on1_ms - gap_ms;

        let lit = (0..period_ms).filter(|&p| w.sample(p) == 63).count() as u32;
        prop_assert_eq!(lit, on1_ms + on2_ms);
        prop_assert!(rest_ms >= 1);
        prop_assert_eq!(w.sample(0), 0);
    }

    /// A pulse rises to max at half period and is dark at both ends.
    #[test]
    fn pulse_peaks_mid_period(period_ms in 2u32..5_000, max in 1u8..=63) {
        let w = Waveform::pulse(period_ms, max);
        prop_assert_eq!(w.sample(0), 0);
        prop_assert_eq!(w.sample(period_ms / 2), max);
        for p in 0..period_ms {
            prop_assert!(w.sample(p) <= max);
        }
    }
}
