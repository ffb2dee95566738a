//! Brightness effects layered over stock colors.
//!
//! Procedural effects work on raw 0-255 brightness and are re-armed at their
//! own rate; static presets only need re-applying once a second.

use crate::config::{EFFECT_BREATHING_HOLD_MS, EFFECT_BREATHING_MS, EFFECT_FLICKER_MS};
use crate::random::RandomSource;
use crate::segments::{MAX_BRIGHTNESS, SEGMENT_COUNT, Segments};

/// Brightness effect selected by the display submode in Stock-like modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StockEffect {
    /// No effect.
    Normal,
    /// Whole blade dims and randomly pops back up.
    FlickerFull,
    /// Every segment dims; one random segment pops up each step.
    FlickerSegmented,
    /// Segment 0 dims with rare bright pops that travel up the blade.
    FlickerBright,
    /// Segment 0 stays bright with rare dark dips that travel up the blade.
    FlickerDark,
    /// Segment 0 flickers; the others follow at fixed fractions.
    FlickerGradient,
    /// Slow fade down and back up, holding at full brightness.
    Breathing,
    /// 100/80/60/40 %.
    StaticGradient1,
    /// 100/75/50/25 %.
    StaticGradient2,
    Brightness66,
    Brightness33,
    Brightness10,
}

impl StockEffect {
    /// Number of effects; submodes wrap at this value.
    pub const COUNT: u8 = 12;

    /// The effect selected by a submode value.
    pub const fn from_submode(submode: u8) -> Self {
        match submode % Self::COUNT {
            0 => StockEffect::Normal,
            1 => StockEffect::FlickerFull,
            2 => StockEffect::FlickerSegmented,
            3 => StockEffect::FlickerBright,
            4 => StockEffect::FlickerDark,
            5 => StockEffect::FlickerGradient,
            6 => StockEffect::Breathing,
            7 => StockEffect::StaticGradient1,
            8 => StockEffect::StaticGradient2,
            9 => StockEffect::Brightness66,
            10 => StockEffect::Brightness33,
            _ => StockEffect::Brightness10,
        }
    }

    /// Applies one step of the effect.
    ///
    /// Returns the delay until the next step, or `None` to use the default
    /// re-arm period.
    pub fn apply<R: RandomSource>(self, segments: &mut Segments, rng: &mut R) -> Option<u32> {
        match self {
            StockEffect::Normal => None,
            StockEffect::FlickerFull => {
                let mut level = dim(segments.raw_brightness(0), 40);
                if rng.below(3) == 0 {
                    level = pop(level);
                }
                fill(segments, level);
                Some(EFFECT_FLICKER_MS)
            }
            StockEffect::FlickerSegmented => {
                for i in 0..SEGMENT_COUNT {
                    segments.set_raw_brightness(i, dim(segments.raw_brightness(i), 40));
                }
                let lucky = rng.below(SEGMENT_COUNT as u16) as usize;
                segments.set_raw_brightness(lucky, pop(segments.raw_brightness(lucky)));
                Some(EFFECT_FLICKER_MS)
            }
            StockEffect::FlickerBright => {
                propagate(segments);
                let head = segments.raw_brightness(0);
                let head = if rng.below(5) == 0 {
                    head + rng.below((MAX_BRIGHTNESS - head) as u16) as u8
                } else {
                    dim(head, 20)
                };
                segments.set_raw_brightness(0, head);
                Some(EFFECT_FLICKER_MS)
            }
            StockEffect::FlickerDark => {
                let (b0, b1, b2) = (
                    segments.raw_brightness(0),
                    segments.raw_brightness(1),
                    segments.raw_brightness(2),
                );
                segments.set_raw_brightness(3, b2);
                segments.set_raw_brightness(2, b1);
                // Segment 1 moves 80 % of the way toward segment 0.
                segments.set_raw_brightness(1, ((b1 as u16 + 4 * b0 as u16) / 5) as u8);

                let head = if rng.below(10) == 0 {
                    rng.below(60) as u8 + 20
                } else {
                    pop(b0)
                };
                segments.set_raw_brightness(0, head);
                Some(EFFECT_FLICKER_MS)
            }
            StockEffect::FlickerGradient => {
                let head = segments.raw_brightness(0) as u16;
                segments.set_raw_brightness(1, (head * 7 / 10) as u8);
                segments.set_raw_brightness(2, (head / 2) as u8);
                segments.set_raw_brightness(3, (head * 3 / 10) as u8);

                let head = if rng.below(5) == 0 {
                    MAX_BRIGHTNESS
                } else {
                    dim(head as u8, 40)
                };
                segments.set_raw_brightness(0, head);
                Some(EFFECT_FLICKER_MS)
            }
            StockEffect::Breathing => {
                // Odd levels fade down, even levels fade up; the turning
                // points switch parity.
                let level = segments.raw_brightness(0);
                let level = if level % 2 == 1 {
                    if level < 12 { 8 } else { level - 4 }
                } else if level > 250 {
                    MAX_BRIGHTNESS
                } else {
                    level + 4
                };
                fill(segments, level);

                if level == MAX_BRIGHTNESS {
                    Some(EFFECT_BREATHING_MS + EFFECT_BREATHING_HOLD_MS)
                } else {
                    Some(EFFECT_BREATHING_MS)
                }
            }
            StockEffect::StaticGradient1 => {
                gradient(segments, [100, 80, 60, 40]);
                None
            }
            StockEffect::StaticGradient2 => {
                gradient(segments, [100, 75, 50, 25]);
                None
            }
            StockEffect::Brightness66 => {
                segments.set_blade_brightness(66);
                None
            }
            StockEffect::Brightness33 => {
                segments.set_blade_brightness(33);
                None
            }
            StockEffect::Brightness10 => {
                segments.set_blade_brightness(10);
                None
            }
        }
    }
}

/// Decays a level by 20 %, stopping at `floor`. Levels already below the
/// floor are left alone.
#[inline]
fn dim(level: u8, floor: u8) -> u8 {
    if level > floor {
        ((level as u16 * 4 / 5) as u8).max(floor)
    } else {
        level
    }
}

/// Moves a level halfway toward full brightness.
#[inline]
fn pop(level: u8) -> u8 {
    level + (MAX_BRIGHTNESS - level) / 2
}

fn fill(segments: &mut Segments, level: u8) {
    for i in 0..SEGMENT_COUNT {
        segments.set_raw_brightness(i, level);
    }
}

/// Shifts every level one segment away from segment 0.
fn propagate(segments: &mut Segments) {
    for i in (1..SEGMENT_COUNT).rev() {
        segments.set_raw_brightness(i, segments.raw_brightness(i - 1));
    }
}

fn gradient(segments: &mut Segments, percents: [u8; SEGMENT_COUNT]) {
    for (i, percent) in percents.into_iter().enumerate() {
        segments.set_segment_brightness(i, percent);
    }
}
