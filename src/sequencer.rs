//! Stock blade animations: ignition, extinguish, clash and flicker.
//!
//! Provides [`AnimationSequencer`], a step-indexed state machine gated by a
//! millisecond deadline. Every animated [`Phase`] runs its step 0 on the first
//! tick it is seen; later steps wait for the deadline armed by the step
//! before. Ramps animate the segment *ceiling* so the brightness a display
//! effect set survives ignition and extinguish.

use crate::config::{CLASH_MS, FLICKER_PULSE_MS, RAMP_STEP_MS};
use crate::context::BladeContext;
use crate::time::{Deadline, Millis};
use crate::types::{ColorState, FlickerVariant, Palette, Phase};
use palette::Srgb;

/// How the extinguish ramp starts for one stock color.
///
/// Different crystals and legacy hilts start their shutdown at different times
/// on stock blades; these values line the single ramp used here up with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExtinguishStart {
    /// Start ramping on the next tick, skipping the first `skip` ramp steps.
    Immediate { skip: u8 },

    /// Start ramping one ramp step plus `extra_ms` later.
    Delayed { extra_ms: u32 },
}

use ExtinguishStart::{Delayed, Immediate};

const IMMEDIATE: ExtinguishStart = Immediate { skip: 0 };

const SAVI_EXTINGUISH: [ExtinguishStart; 16] = [
    Delayed { extra_ms: 255 }, // white
    Delayed { extra_ms: 765 }, // red
    Immediate { skip: 2 },     // orange
    Immediate { skip: 2 },     // yellow
    Delayed { extra_ms: 85 },  // green
    Delayed { extra_ms: 170 }, // cyan
    Delayed { extra_ms: 170 }, // blue
    Delayed { extra_ms: 425 }, // purple
    Delayed { extra_ms: 765 }, // dark purple
    IMMEDIATE,
    IMMEDIATE,
    IMMEDIATE,
    IMMEDIATE,
    IMMEDIATE,
    IMMEDIATE,
    IMMEDIATE,
];

const LEGACY_EXTINGUISH: [ExtinguishStart; 16] = [
    Immediate { skip: 1 },     // temple guard
    Delayed { extra_ms: 680 }, // kylo ren
    Delayed { extra_ms: 425 }, // rey
    Delayed { extra_ms: 595 }, // mace windu
    Delayed { extra_ms: 510 }, // ventress
    Delayed { extra_ms: 85 },  // ahsoka
    Delayed { extra_ms: 85 },  // luke
    Delayed { extra_ms: 510 }, // vader
    Delayed { extra_ms: 595 }, // maul
    Delayed { extra_ms: 425 }, // obi-wan
    IMMEDIATE,
    IMMEDIATE,
    IMMEDIATE,
    IMMEDIATE,
    IMMEDIATE,
    IMMEDIATE,
];

/// Extinguish start behaviour for a stock color.
pub fn extinguish_start(color_state: ColorState) -> ExtinguishStart {
    let table = match color_state.palette {
        Palette::Savi => &SAVI_EXTINGUISH,
        Palette::Legacy => &LEGACY_EXTINGUISH,
    };
    table[color_state.index() as usize]
}

/// Red channel offsets of the flicker pulse: (bright half, dim half).
const fn flicker_offsets(variant: FlickerVariant) -> (u8, u8) {
    match variant {
        FlickerVariant::Low => (64, 0),
        FlickerVariant::High => (128, 64),
    }
}

/// Runs the stock animations on the shared [`BladeContext`].
#[derive(Debug, Clone, Default)]
pub struct AnimationSequencer {
    next_event: Deadline,
}

impl AnimationSequencer {
    pub const fn new() -> Self {
        Self {
            next_event: Deadline::NOW,
        }
    }

    /// When the current animation step ends, if one is pending.
    pub fn next_event(&self) -> Option<Millis> {
        self.next_event.at()
    }

    /// Advances the animation of the current phase by at most one step.
    ///
    /// Steady phases (`Off`, `On`, `Reset`) are left alone.
    pub fn run(&mut self, ctx: &mut BladeContext, now: Millis) {
        match ctx.state.phase {
            Phase::Clash { step } => self.clash(ctx, step, now),
            Phase::PowerOn { step } => self.power_on(ctx, step, now),
            Phase::PowerOff { step } => self.power_off(ctx, step, now),
            Phase::Flicker {
                step,
                variant,
                intensity,
            } => self.flicker(ctx, step, variant, intensity, now),
            Phase::Off | Phase::On | Phase::Reset => {}
        }
    }

    fn due(&self, step: u8, now: Millis) -> bool {
        step == 0 || self.next_event.is_due(now)
    }

    fn clash(&mut self, ctx: &mut BladeContext, step: u8, now: Millis) {
        if step == 0 {
            ctx.backup();
            ctx.render_clash_color();
            ctx.segments.set_blade_brightness(100);
            self.next_event.arm(now, CLASH_MS);
            ctx.state.phase = ctx.state.phase.advanced(1);
        } else if self.next_event.is_due(now) {
            ctx.restore();
            ctx.state.phase = Phase::On;
            debug!("clash done");
        }
    }

    fn power_on(&mut self, ctx: &mut BladeContext, step: u8, now: Millis) {
        if !self.due(step, now) {
            return;
        }
        self.next_event.arm(now, RAMP_STEP_MS);

        let segments = &mut ctx.segments;
        match step {
            0 => {
                segments.set_blade_ceiling(0);
                ctx.power_enabled = true;
                segments.set_segment_ceiling(0, 50);
            }
            1 => {
                segments.set_segment_ceiling(0, 100);
                segments.set_segment_ceiling(1, 50);
            }
            2 => {
                segments.set_segment_ceiling(1, 100);
                segments.set_segment_ceiling(2, 50);
            }
            _ => {
                segments.set_segment_ceiling(2, 100);
                segments.set_segment_ceiling(3, 100);
                ctx.state.phase = Phase::On;
                info!("ignition complete");
                return;
            }
        }
        ctx.state.phase = ctx.state.phase.advanced(1);
    }

    fn power_off(&mut self, ctx: &mut BladeContext, step: u8, now: Millis) {
        if !self.due(step, now) {
            return;
        }
        self.next_event.arm(now, RAMP_STEP_MS);

        let segments = &mut ctx.segments;
        match step {
            0 => {
                segments.set_blade_ceiling(100);
                let skip = match extinguish_start(ctx.state.color_state) {
                    Immediate { skip } => {
                        self.next_event.clear();
                        skip
                    }
                    Delayed { extra_ms } => {
                        self.next_event.extend(now, extra_ms);
                        0
                    }
                };
                ctx.state.phase = ctx.state.phase.advanced(1 + skip);
                return;
            }
            1 => {
                segments.set_segment_ceiling(3, 66);
            }
            2 => {
                segments.set_segment_ceiling(3, 33);
                segments.set_segment_ceiling(2, 66);
            }
            3 => {
                segments.set_segment_ceiling(3, 0);
                segments.set_segment_ceiling(2, 33);
                segments.set_segment_ceiling(1, 66);
            }
            4 => {
                segments.set_segment_ceiling(2, 0);
                segments.set_segment_ceiling(1, 33);
                segments.set_segment_ceiling(0, 66);
            }
            5 => {
                segments.set_segment_ceiling(1, 0);
                segments.set_segment_ceiling(0, 33);
            }
            _ => {
                segments.set_segment_ceiling(0, 0);
                ctx.power_enabled = false;
                ctx.state.phase = Phase::Off;
                info!("extinguish complete");
                return;
            }
        }

        ctx.state.phase = ctx.state.phase.advanced(1);
    }

    fn flicker(
        &mut self,
        ctx: &mut BladeContext,
        step: u8,
        variant: FlickerVariant,
        intensity: u8,
        now: Millis,
    ) {
        let (bright, dim) = flicker_offsets(variant);
        let base = (intensity & 0x0F) * 4;

        if step == 0 {
            ctx.segments.set_blade_rgb(Srgb::new(base + bright, 0, 0));
            self.next_event.arm(now, FLICKER_PULSE_MS);
            ctx.state.phase = ctx.state.phase.advanced(1);
        } else if self.next_event.is_due(now) {
            ctx.segments.set_blade_rgb(Srgb::new(base + dim, 0, 0));
            ctx.state.color_state = ColorState::new(Palette::Savi, 1);
            ctx.state.phase = Phase::On;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_kylo_ren_waits_longest() {
        let start = extinguish_start(ColorState::new(Palette::Legacy, 1));
        assert_eq!(start, Delayed { extra_ms: 680 });
    }

    #[test]
    fn savi_orange_and_yellow_skip_two_steps() {
        for index in [2, 3] {
            let start = extinguish_start(ColorState::new(Palette::Savi, index));
            assert_eq!(start, Immediate { skip: 2 });
        }
    }

    #[test]
    fn unlisted_indices_start_immediately() {
        assert_eq!(
            extinguish_start(ColorState::new(Palette::Savi, 12)),
            IMMEDIATE
        );
        assert_eq!(
            extinguish_start(ColorState::new(Palette::Legacy, 15)),
            IMMEDIATE
        );
    }
}
