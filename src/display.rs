//! Display-mode engine: the secondary color and brightness layer.
//!
//! Runs after the [`AnimationSequencer`](crate::AnimationSequencer) on every
//! tick the blade is not off. It stands aside while a clash is showing, sets
//! the blade up whenever the display mode changes or a persisted state was
//! loaded, and drives the per-mode effect on its own re-arm deadline.

use crate::colors::multi_color_preset;
use crate::config::{
    EFFECT_DEFAULT_MS, PICKER_ADVANCE_MS, PICKER_CLASH_PAUSE_MS, WHEEL_BASE_MS, WHEEL_SPEEDS,
    WHEEL_SPEEDUP_MS,
};
use crate::context::BladeContext;
use crate::effects::StockEffect;
use crate::picker::{ColorPicker, DCP_MIDDLE_START, picker_color};
use crate::random::RandomSource;
use crate::segments::{RenderMode, SEGMENT_COUNT, Segments};
use crate::time::{Deadline, Millis};
use crate::types::{DisplayMode, PhaseKind};

/// Hue distance between neighbouring segments in the segment wheel.
const SEGMENT_WHEEL_OFFSET: u8 = 16;

/// Number of evenly spaced starting hues for the wheel modes.
const WHEEL_START_HUES: u16 = 16;
const WHEEL_START_SPACING: u8 = 17;

/// Step period of the hue wheels; higher submodes spin faster.
pub const fn wheel_period_ms(submode: u8) -> u32 {
    WHEEL_BASE_MS - (submode % WHEEL_SPEEDS) as u32 * WHEEL_SPEEDUP_MS
}

/// Paints the segment wheel: segment 3 shows `hue`, each segment closer to
/// the hilt is one offset further along the wheel.
fn paint_segment_wheel(segments: &mut Segments, hue: u8) {
    for i in 0..SEGMENT_COUNT {
        let offset = (SEGMENT_COUNT - 1 - i) as u8 * SEGMENT_WHEEL_OFFSET;
        segments.set_segment_hue(i, hue.wrapping_add(offset));
    }
}

/// Drives the active display mode.
pub struct DisplayEngine<R: RandomSource> {
    last_mode: DisplayMode,
    last_submode: Option<u8>,
    last_phase: PhaseKind,
    next_step: Deadline,
    picker: ColorPicker,
    rng: R,
}

impl<R: RandomSource> DisplayEngine<R> {
    pub fn new(rng: R) -> Self {
        Self {
            last_mode: DisplayMode::Stock,
            last_submode: None,
            last_phase: PhaseKind::Off,
            next_step: Deadline::NOW,
            picker: ColorPicker::new(),
            rng,
        }
    }

    /// The color picker's bookkeeping.
    pub fn picker(&self) -> &ColorPicker {
        &self.picker
    }

    /// When the active effect runs next, if it is waiting.
    pub fn next_step(&self) -> Option<Millis> {
        self.next_step.at()
    }

    /// Runs one tick of the display layer.
    pub fn run(&mut self, ctx: &mut BladeContext, now: Millis) {
        let phase = ctx.state.phase.kind();

        if self.last_phase == PhaseKind::Clash
            && phase == PhaseKind::On
            && ctx.state.display_mode == DisplayMode::ColorPicker
        {
            // A clash steps the picker's brightness and holds off the
            // automatic advance for a while.
            self.next_step.arm(now, PICKER_CLASH_PAUSE_MS);
            ctx.state.display_step = self.picker.next_band(ctx.state.display_step);
            ctx.segments.set_blade_rgb(picker_color(ctx.state.display_step));
            debug!("picker band changed to {}", ctx.state.display_step);
        }
        self.last_phase = phase;

        if phase == PhaseKind::Clash {
            return;
        }

        let loaded = ctx.take_state_loaded();
        if loaded || ctx.state.display_mode != self.last_mode {
            self.last_mode = ctx.state.display_mode;
            self.set_up_mode(ctx);
            self.last_submode = None;
        }

        let submode = ctx.state.display_submode;
        if self.last_submode != Some(submode) {
            self.last_submode = Some(submode);
            self.set_up_submode(ctx);
            self.next_step.clear();
        }

        if !self.next_step.is_due(now) {
            return;
        }
        self.next_step.arm(now, EFFECT_DEFAULT_MS);
        self.step(ctx, phase, now);
    }

    fn set_up_mode(&mut self, ctx: &mut BladeContext) {
        let mode = ctx.state.display_mode;
        info!("display mode {} set up", mode);

        // The picked mode's step is the picked color.
        if mode != DisplayMode::ColorPickerPicked {
            ctx.state.display_step = 0;
        }

        let render_mode = match mode {
            DisplayMode::SegmentWheel | DisplayMode::MultiMode => RenderMode::MultiColor,
            _ => RenderMode::SingleColor,
        };
        ctx.segments.set_render_mode(render_mode);

        match mode {
            DisplayMode::Stock => ctx.render_stock_color(),
            DisplayMode::ColorPicker => {
                ctx.state.display_step = DCP_MIDDLE_START;
                ctx.segments.set_blade_rgb(picker_color(DCP_MIDDLE_START));
            }
            DisplayMode::ColorPickerPicked => {
                ctx.segments.set_blade_rgb(picker_color(ctx.state.display_step));
            }
            DisplayMode::BladeWheel => {
                let hue = self.random_start_hue();
                ctx.state.display_step = hue;
                ctx.segments.set_blade_hue(hue);
            }
            DisplayMode::SegmentWheel => {
                let hue = self.random_start_hue();
                ctx.state.display_step = hue;
                paint_segment_wheel(&mut ctx.segments, hue);
            }
            // Painted by the submode setup.
            DisplayMode::MultiMode => {}
        }
    }

    fn set_up_submode(&mut self, ctx: &mut BladeContext) {
        debug!("display submode {}", ctx.state.display_submode);
        ctx.segments.set_blade_brightness(100);

        if ctx.state.display_mode == DisplayMode::MultiMode {
            let preset = multi_color_preset(ctx.state.display_submode);
            for (i, color) in preset.iter().enumerate() {
                ctx.segments.set_segment_rgb(i, *color);
            }
        }
    }

    fn step(&mut self, ctx: &mut BladeContext, phase: PhaseKind, now: Millis) {
        let submode = ctx.state.display_submode;

        match ctx.state.display_mode {
            DisplayMode::Stock | DisplayMode::ColorPickerPicked => {
                let effect = StockEffect::from_submode(submode);
                if let Some(delay) = effect.apply(&mut ctx.segments, &mut self.rng) {
                    self.next_step.arm(now, delay);
                }
            }
            DisplayMode::ColorPicker => {
                // Only pick while fully lit, not during ignition or extinguish.
                if phase == PhaseKind::On {
                    ctx.state.display_step = self.picker.advance(ctx.state.display_step, submode);
                }
                ctx.segments.set_blade_rgb(picker_color(ctx.state.display_step));
                self.next_step.arm(now, PICKER_ADVANCE_MS);
            }
            DisplayMode::BladeWheel => {
                ctx.state.display_step = ctx.state.display_step.wrapping_add(1);
                ctx.segments.set_blade_hue(ctx.state.display_step);
                self.next_step.arm(now, wheel_period_ms(submode));
            }
            DisplayMode::SegmentWheel => {
                ctx.state.display_step = ctx.state.display_step.wrapping_add(1);
                paint_segment_wheel(&mut ctx.segments, ctx.state.display_step);
                self.next_step.arm(now, wheel_period_ms(submode));
            }
            DisplayMode::MultiMode => {}
        }
    }

    fn random_start_hue(&mut self) -> u8 {
        self.rng.below(WHEEL_START_HUES) as u8 * WHEEL_START_SPACING
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::color_by_hue;

    #[test]
    fn wheel_speeds_up_with_submode() {
        assert_eq!(wheel_period_ms(0), 25);
        assert_eq!(wheel_period_ms(5), 5);
        assert_eq!(wheel_period_ms(6), 25);
    }

    #[test]
    fn segment_wheel_offsets_toward_hilt() {
        let mut segments = Segments::new();
        paint_segment_wheel(&mut segments, 250);
        assert_eq!(segments.color(3), color_by_hue(250));
        assert_eq!(segments.color(2), color_by_hue(10));
        assert_eq!(segments.color(1), color_by_hue(26));
        assert_eq!(segments.color(0), color_by_hue(42));
    }
}
