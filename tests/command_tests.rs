//! Integration tests for command handling, display-mode cycling and the
//! anti-brick counter

mod common;
use common::*;

use palette::Srgb;
use saber_blade::config::RESET_THRESHOLD_COUNT;
use saber_blade::{
    BladeContext, ColorState, CommandEngine, CommandSlot, DisplayMode, FlickerVariant, Palette,
    Phase, PhaseKind, TickStatus,
};

fn lit_context() -> BladeContext {
    let mut ctx = BladeContext::new();
    ctx.state.phase = Phase::On;
    ctx.segments.set_blade_brightness(100);
    ctx.segments.set_blade_ceiling(100);
    ctx
}

// ============================================================================
// Ignition through the full blade
// ============================================================================

#[test]
fn ignite_ramps_ceiling_to_full() {
    let clock = MockClock::new();
    let slot = CommandSlot::new();
    let mut blade = blade(&clock);

    assert_eq!(send(&mut blade, &slot, IGNITE_SAVI | 3), TickStatus::Active);
    assert_eq!(blade.state().phase, Phase::PowerOn { step: 1 });
    assert_eq!(blade.state().color_state, ColorState::new(Palette::Savi, 3));
    assert_eq!(blade.state().display_mode, DisplayMode::Stock);
    assert!(blade.hardware().power);
    assert_eq!(blade.sequencer().next_event(), Some(saber_blade::Millis(85)));

    // Only the hilt end has started to light
    let segments = &blade.context().segments;
    assert_eq!(segments.raw_ceiling(0), 127);
    assert_eq!(segments.raw_ceiling(1), 0);
    assert_eq!(segments.raw_ceiling(3), 0);

    run_for(&mut blade, &clock, &slot, 254);
    assert_eq!(blade.state().phase, Phase::PowerOn { step: 3 });
    let segments = &blade.context().segments;
    assert_eq!(segments.raw_ceiling(1), 255);
    assert_eq!(segments.raw_ceiling(2), 127);
    assert_eq!(segments.raw_ceiling(3), 0);

    run_for(&mut blade, &clock, &slot, 1);
    assert_eq!(blade.state().phase, Phase::On);
    assert_eq!(blade.frame().brightness, [255; 4]);
    assert_eq!(blade.frame().colors[0], Srgb::new(120, 152, 0));
}

#[test]
fn short_off_gap_advances_display_mode() {
    let clock = MockClock::new();
    let slot = CommandSlot::new();
    let mut blade = blade(&clock);

    send(&mut blade, &slot, IGNITE_SAVI | 2);
    run_for(&mut blade, &clock, &slot, 99);
    send(&mut blade, &slot, EXTINGUISH);
    run_for(&mut blade, &clock, &slot, 399);
    assert_eq!(blade.state().display_mode, DisplayMode::Stock);

    send(&mut blade, &slot, IGNITE_SAVI | 2);
    assert_eq!(blade.state().display_mode, DisplayMode::ColorPicker);
    assert_eq!(blade.state().display_submode, 0);
}

// ============================================================================
// Display-mode cycling
// ============================================================================

#[test]
fn off_gap_selects_mode_or_submode() {
    let mut engine = CommandEngine::new(true);
    let mut ctx = lit_context();

    apply(&mut engine, &mut ctx, EXTINGUISH, 1_000);
    apply(&mut engine, &mut ctx, IGNITE_SAVI, 1_999);
    assert_eq!(ctx.state.display_mode, DisplayMode::ColorPicker);
    assert_eq!(ctx.state.display_submode, 0);

    apply(&mut engine, &mut ctx, EXTINGUISH, 5_000);
    apply(&mut engine, &mut ctx, IGNITE_SAVI, 6_000);
    assert_eq!(ctx.state.display_mode, DisplayMode::ColorPicker);
    assert_eq!(ctx.state.display_submode, 1);

    apply(&mut engine, &mut ctx, EXTINGUISH, 10_000);
    apply(&mut engine, &mut ctx, IGNITE_SAVI, 12_999);
    assert_eq!(ctx.state.display_submode, 2);

    // Off long enough: nothing changes
    apply(&mut engine, &mut ctx, EXTINGUISH, 20_000);
    apply(&mut engine, &mut ctx, IGNITE_SAVI, 23_000);
    assert_eq!(ctx.state.display_mode, DisplayMode::ColorPicker);
    assert_eq!(ctx.state.display_submode, 2);
}

#[test]
fn first_ignite_never_cycles() {
    let mut engine = CommandEngine::new(true);
    let mut ctx = BladeContext::new();

    apply(&mut engine, &mut ctx, IGNITE_SAVI, 10);
    assert_eq!(ctx.state.display_mode, DisplayMode::Stock);
    assert_eq!(engine.reset_count(), RESET_THRESHOLD_COUNT);
}

#[test]
fn mode_cycling_wraps_to_stock() {
    let mut engine = CommandEngine::new(true);
    let mut ctx = BladeContext::new();
    ctx.state.display_mode = DisplayMode::MultiMode;
    ctx.state.display_submode = 4;
    ctx.state.phase = Phase::On;

    apply(&mut engine, &mut ctx, EXTINGUISH, 10_000);
    apply(&mut engine, &mut ctx, IGNITE_LEGACY | 6, 10_800);
    assert_eq!(ctx.state.display_mode, DisplayMode::Stock);
    assert_eq!(ctx.state.display_submode, 0);
    assert_eq!(ctx.state.color_state, ColorState::new(Palette::Legacy, 6));
}

#[test]
fn non_stock_ignite_keeps_color_state() {
    let mut engine = CommandEngine::new(true);
    let mut ctx = BladeContext::new();
    ctx.state.display_mode = DisplayMode::BladeWheel;
    ctx.state.color_state = ColorState::new(Palette::Savi, 4);

    apply(&mut engine, &mut ctx, IGNITE_LEGACY | 9, 0);
    assert_eq!(ctx.state.color_state, ColorState::new(Palette::Savi, 4));
}

#[test]
fn disabled_cycling_leaves_mode_and_counter() {
    let mut engine = CommandEngine::new(false);
    let mut ctx = BladeContext::new();

    for i in 0..20u32 {
        apply(&mut engine, &mut ctx, IGNITE_SAVI, i * 200);
        apply(&mut engine, &mut ctx, EXTINGUISH, i * 200 + 100);
    }
    assert_eq!(ctx.state.display_mode, DisplayMode::Stock);
    assert_eq!(engine.reset_count(), RESET_THRESHOLD_COUNT);
    assert_ne!(ctx.state.phase, Phase::Reset);
}

// ============================================================================
// Anti-brick counter
// ============================================================================

#[test]
fn rapid_cycling_resets_exactly_at_seventh_pair() {
    let mut engine = CommandEngine::new(true);
    let mut ctx = BladeContext::new();
    let mut now = 1_000;

    for pair in 1..=7 {
        apply(&mut engine, &mut ctx, IGNITE_SAVI, now);
        assert_ne!(ctx.state.phase, Phase::Reset, "ignite {pair}");
        apply(&mut engine, &mut ctx, EXTINGUISH, now + 100);
        now += 200;

        if pair < 7 {
            assert_ne!(ctx.state.phase, Phase::Reset, "extinguish {pair}");
            assert_eq!(engine.reset_count(), RESET_THRESHOLD_COUNT + 1 - 2 * pair);
        }
    }

    assert_eq!(ctx.state.phase, Phase::Reset);
    assert_eq!(ctx.state.display_mode, DisplayMode::Stock);
    assert_eq!(ctx.state.display_submode, 0);
    assert_eq!(engine.reset_count(), RESET_THRESHOLD_COUNT);
}

#[test]
fn slow_pair_rearms_counter() {
    let mut engine = CommandEngine::new(true);
    let mut ctx = BladeContext::new();

    apply(&mut engine, &mut ctx, IGNITE_SAVI, 1_000);
    apply(&mut engine, &mut ctx, EXTINGUISH, 1_100);
    apply(&mut engine, &mut ctx, IGNITE_SAVI, 1_200);
    assert_eq!(engine.reset_count(), RESET_THRESHOLD_COUNT - 2);

    // Stayed on too long
    apply(&mut engine, &mut ctx, EXTINGUISH, 2_000);
    assert_eq!(engine.reset_count(), RESET_THRESHOLD_COUNT);
}

// ============================================================================
// Context rules
// ============================================================================

#[test]
fn ignite_is_ignored_while_igniting() {
    let mut engine = CommandEngine::new(true);
    let mut ctx = BladeContext::new();

    apply(&mut engine, &mut ctx, IGNITE_SAVI | 6, 0);
    ctx.state.phase = Phase::PowerOn { step: 2 };
    apply(&mut engine, &mut ctx, IGNITE_SAVI | 1, 50);
    assert_eq!(ctx.state.phase, Phase::PowerOn { step: 2 });
    assert_eq!(ctx.state.color_state, ColorState::new(Palette::Savi, 6));
}

#[test]
fn set_color_requires_lit_stock_blade() {
    let mut engine = CommandEngine::new(true);

    let mut ctx = lit_context();
    ctx.segments.set_blade_brightness(10);
    apply(&mut engine, &mut ctx, SET_COLOR_LEGACY | 2, 0);
    assert_eq!(ctx.state.color_state, ColorState::new(Palette::Legacy, 2));
    assert_eq!(ctx.segments.color(0), Srgb::new(0, 0, 255));
    assert_eq!(ctx.segments.raw_brightness(3), 255);

    let mut ctx = lit_context();
    ctx.state.display_submode = 1;
    apply(&mut engine, &mut ctx, SET_COLOR_SAVI | 4, 0);
    assert_eq!(ctx.state.color_state, ColorState::default());

    let mut ctx = lit_context();
    ctx.state.display_mode = DisplayMode::MultiMode;
    apply(&mut engine, &mut ctx, SET_COLOR_SAVI | 4, 0);
    assert_eq!(ctx.state.color_state, ColorState::default());

    let mut ctx = BladeContext::new();
    apply(&mut engine, &mut ctx, SET_COLOR_SAVI | 4, 0);
    assert_eq!(ctx.state.color_state, ColorState::default());
    assert_eq!(ctx.state.phase, Phase::Off);
}

#[test]
fn flicker_requires_lit_stock_blade() {
    let mut engine = CommandEngine::new(true);

    let mut ctx = lit_context();
    apply(&mut engine, &mut ctx, FLICKER_HIGH | 0x0A, 0);
    assert_eq!(
        ctx.state.phase,
        Phase::Flicker {
            step: 0,
            variant: FlickerVariant::High,
            intensity: 10
        }
    );

    let mut ctx = lit_context();
    ctx.state.display_mode = DisplayMode::BladeWheel;
    apply(&mut engine, &mut ctx, FLICKER_LOW | 3, 0);
    assert_eq!(ctx.state.phase, Phase::On);

    let mut ctx = BladeContext::new();
    apply(&mut engine, &mut ctx, FLICKER_LOW | 3, 0);
    assert_eq!(ctx.state.phase, Phase::Off);
}

#[test]
fn flash_only_while_lit() {
    let mut engine = CommandEngine::new(true);

    let mut ctx = lit_context();
    apply(&mut engine, &mut ctx, FLASH, 0);
    assert_eq!(ctx.state.phase, Phase::Clash { step: 0 });

    let mut ctx = BladeContext::new();
    apply(&mut engine, &mut ctx, FLASH, 0);
    assert_eq!(ctx.state.phase, Phase::Off);

    let mut ctx = BladeContext::new();
    ctx.state.phase = Phase::PowerOn { step: 1 };
    apply(&mut engine, &mut ctx, FLASH, 0);
    assert_eq!(ctx.state.phase, Phase::PowerOn { step: 1 });
}

#[test]
fn extinguish_ignored_when_already_going_dark() {
    let mut engine = CommandEngine::new(true);

    for phase in [Phase::Off, Phase::PowerOff { step: 3 }, Phase::Reset] {
        let mut ctx = BladeContext::new();
        ctx.state.phase = phase;
        apply(&mut engine, &mut ctx, EXTINGUISH, 0);
        assert_eq!(ctx.state.phase, phase);
    }
}

#[test]
fn hard_off_drops_blade_immediately() {
    let mut engine = CommandEngine::new(true);
    let mut ctx = lit_context();
    ctx.power_enabled = true;

    apply(&mut engine, &mut ctx, HARD_OFF, 0);
    assert_eq!(ctx.state.phase, Phase::Off);
    assert!(!ctx.power_enabled);
    for i in 0..4 {
        assert_eq!(ctx.segments.raw_ceiling(i), 0);
    }
}

#[test]
fn unknown_and_empty_bytes_change_nothing() {
    let mut engine = CommandEngine::new(true);
    let mut ctx = lit_context();
    let before = ctx.state;

    for byte in [0x00, 0x05, 0x1F, 0xE3, 0xFF] {
        apply(&mut engine, &mut ctx, byte, 0);
    }
    assert_eq!(ctx.state, before);
}

#[test]
fn every_transition_starts_at_step_zero() {
    let mut engine = CommandEngine::new(true);
    let mut ctx = BladeContext::new();

    apply(&mut engine, &mut ctx, IGNITE_SAVI, 0);
    assert_eq!(ctx.state.phase, Phase::PowerOn { step: 0 });

    ctx.state.phase = Phase::On;
    apply(&mut engine, &mut ctx, FLASH, 10);
    assert_eq!(ctx.state.phase, Phase::Clash { step: 0 });

    ctx.state.phase = Phase::Flicker {
        step: 1,
        variant: FlickerVariant::Low,
        intensity: 2,
    };
    apply(&mut engine, &mut ctx, EXTINGUISH, 20);
    assert_eq!(ctx.state.phase, Phase::PowerOff { step: 0 });
    assert_eq!(ctx.state.phase.kind(), PhaseKind::PowerOff);
    assert_eq!(ctx.state.phase.step(), 0);
}

#[test]
fn slot_consumes_command_once() {
    let mut engine = CommandEngine::new(true);
    let mut ctx = BladeContext::new();
    let slot = CommandSlot::new();

    slot.post(IGNITE_SAVI);
    assert!(engine.process(&mut ctx, &slot, saber_blade::Millis(0)).is_some());
    assert!(!slot.is_pending());
    assert!(engine.process(&mut ctx, &slot, saber_blade::Millis(1)).is_none());
}
