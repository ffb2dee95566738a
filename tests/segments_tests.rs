//! Integration tests for segment brightness and the clash memento

use palette::Srgb;
use saber_blade::segments::{MAX_BRIGHTNESS, SEGMENT_COUNT, percent_to_raw};
use saber_blade::{BladeContext, ColorState, Palette, Phase, RenderMode, Segments};

#[test]
fn brightness_setters_clamp_every_input() {
    let mut segments = Segments::new();

    for percent in 0..=u8::MAX {
        segments.set_blade_brightness(percent);
        segments.set_blade_ceiling(percent);
        let expected = percent_to_raw(percent.min(100));
        for i in 0..SEGMENT_COUNT {
            assert_eq!(segments.raw_brightness(i), expected);
            assert_eq!(segments.raw_ceiling(i), expected);
        }
    }

    segments.set_blade_brightness(101);
    assert_eq!(segments.raw_brightness(0), MAX_BRIGHTNESS);
}

#[test]
fn segment_index_wraps() {
    let mut segments = Segments::new();
    segments.set_segment_color(5, 1, 2, 3);
    assert_eq!(segments.color(1), Srgb::new(1, 2, 3));

    segments.set_segment_brightness(SEGMENT_COUNT + 2, 0);
    assert_eq!(segments.raw_brightness(2), 0);
}

#[test]
fn derived_never_exceeds_either_input() {
    let mut segments = Segments::new();

    for current in (0..=255u16).step_by(15) {
        for ceiling in (0..=255u16).step_by(15) {
            segments.set_raw_brightness(0, current as u8);
            segments.set_raw_ceiling(0, ceiling as u8);
            segments.update_derived();
            let derived = segments.derived()[0] as u16;
            assert!(derived <= current && derived <= ceiling);
        }
    }

    segments.set_raw_brightness(0, 255);
    segments.set_raw_ceiling(0, 255);
    segments.update_derived();
    assert_eq!(segments.derived()[0], 255);
}

#[test]
fn derived_only_changes_on_update() {
    let mut segments = Segments::new();
    segments.set_blade_ceiling(100);
    assert_eq!(segments.derived(), &[0; SEGMENT_COUNT]);

    segments.update_derived();
    assert_eq!(segments.derived(), &[255; SEGMENT_COUNT]);
}

#[test]
fn power_up_pattern_is_dark_until_ceiling_opens() {
    let mut segments = Segments::new();
    segments.update_derived();
    let frame = segments.frame();

    assert_eq!(frame.brightness, [0; SEGMENT_COUNT]);
    assert_eq!(frame.colors[0], Srgb::new(255, 0, 0));
    assert_eq!(frame.colors[3], Srgb::new(255, 255, 255));
    assert_eq!(frame.render_mode, RenderMode::SingleColor);
}

#[test]
fn render_mode_travels_with_frame() {
    let mut segments = Segments::new();
    assert_eq!(segments.render_mode(), RenderMode::SingleColor);

    segments.set_render_mode(RenderMode::MultiColor);
    assert_eq!(segments.render_mode(), RenderMode::MultiColor);
    assert_eq!(segments.frame().render_mode, RenderMode::MultiColor);
}

#[test]
fn restore_returns_exact_backup() {
    let mut ctx = BladeContext::new();
    ctx.state.phase = Phase::On;
    ctx.state.color_state = ColorState::new(Palette::Legacy, 3);
    ctx.segments.set_segment_color(0, 10, 20, 30);
    ctx.segments.set_segment_color(3, 40, 50, 60);
    ctx.segments.set_segment_brightness(1, 33);
    ctx.segments.set_segment_ceiling(2, 66);

    let before = ctx.segments;
    ctx.backup();

    ctx.segments.set_blade_rgb(Srgb::new(255, 255, 255));
    ctx.segments.set_blade_brightness(100);
    ctx.segments.set_blade_ceiling(100);
    ctx.state.phase = Phase::clash();
    ctx.state.color_state = ColorState::new(Palette::Savi, 1);

    ctx.restore();
    assert_eq!(ctx.segments, before);
    assert_eq!(ctx.state.phase, Phase::On);
    assert_eq!(ctx.state.color_state, ColorState::new(Palette::Legacy, 3));

    // The slot stays filled
    ctx.segments.clear();
    ctx.restore();
    assert_eq!(ctx.segments, before);
}

#[test]
fn second_backup_overwrites_first() {
    let mut ctx = BladeContext::new();
    ctx.segments.set_blade_rgb(Srgb::new(1, 1, 1));
    ctx.backup();
    ctx.segments.set_blade_rgb(Srgb::new(2, 2, 2));
    ctx.backup();
    ctx.segments.set_blade_rgb(Srgb::new(3, 3, 3));

    ctx.restore();
    assert_eq!(ctx.segments.color(0), Srgb::new(2, 2, 2));
}

#[test]
fn restore_without_backup_is_a_no_op() {
    let mut ctx = BladeContext::new();
    ctx.segments.set_blade_rgb(Srgb::new(9, 8, 7));
    let before = ctx.segments;

    ctx.restore();
    assert_eq!(ctx.segments, before);
}
