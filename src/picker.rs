//! Dynamic color picker (DCP).
//!
//! A picker value packs a brightness band and a color position into one
//! byte: `value = band * DCP_COLOR_COUNT + color`. Within a band the color
//! position runs through three formula segments of [`DCP_FORMULA_SEPARATOR`]
//! each (red→green, green→blue, blue→red), so positions `0`, `17` and `34`
//! are the exact primaries. [`DCP_WHITE`] is reserved for pure white.
//!
//! Advancing never overshoots a primary and never leaves the current band;
//! band changes only happen through [`ColorPicker::next_band`].

use crate::colors::{WHITE, color_by_hue};
use heapless::Vec;
use palette::{Mix, Srgb};

/// Number of brightness bands.
pub const DCP_BRIGHTNESS_LEVELS: u8 = 5;

/// Color positions per band.
pub const DCP_COLOR_COUNT: u8 = 255 / DCP_BRIGHTNESS_LEVELS;

/// Width of one hue formula segment within a band.
pub const DCP_FORMULA_SEPARATOR: u8 = DCP_COLOR_COUNT / 3;

/// Band rendered without any blend.
pub const DCP_MIDDLE_LEVEL: u8 = (DCP_BRIGHTNESS_LEVELS - 1) / 2;

/// Picker value at the start of the middle band (pure red, normal brightness).
pub const DCP_MIDDLE_START: u8 = DCP_MIDDLE_LEVEL * DCP_COLOR_COUNT;

/// Capacity of the step table.
pub const DCP_STEP_TABLE_MAX: usize = 32;

/// Sentinel picker value meaning pure white.
pub const DCP_WHITE: u8 = 255;

/// Exponent of the white/black blend curve.
const BLEND_GAMMA: f32 = 2.2;

/// Hue wheel units per color position.
const HUE_PER_POSITION: u8 = 5;

/// Picker bookkeeping: the lazily built step table and the value saved while
/// white is shown.
#[derive(Debug, Clone, Default)]
pub struct ColorPicker {
    steps: Vec<u8, DCP_STEP_TABLE_MAX>,
    saved: Option<u8>,
}

impl ColorPicker {
    pub const fn new() -> Self {
        Self {
            steps: Vec::new(),
            saved: None,
        }
    }

    /// Step sizes by submode, coarse first, ending at 1.
    pub fn step_table(&mut self) -> &[u8] {
        if self.steps.is_empty() {
            let mut previous = 0;
            let mut divisor = 2;
            loop {
                let step = DCP_FORMULA_SEPARATOR / divisor;
                if step != previous {
                    if self.steps.push(step).is_err() {
                        break;
                    }
                    previous = step;
                }
                if step <= 1 {
                    break;
                }
                divisor += 1;
            }
            debug!("picker step table built with {} entries", self.steps.len());
        }
        &self.steps
    }

    /// The step size used at `submode`, wrapping at the table length.
    pub fn step_for(&mut self, submode: u8) -> u8 {
        let table = self.step_table();
        table[submode as usize % table.len()]
    }

    /// Moves `value` one step along the hue wheel within its band.
    ///
    /// Results that land within half a step of the next primary snap onto it;
    /// results that crossed a primary fall back onto it. Wrapping past the
    /// last position returns to the band's red. White is left unchanged.
    pub fn advance(&mut self, value: u8, submode: u8) -> u8 {
        if value == DCP_WHITE {
            return value;
        }

        let step = self.step_for(submode);
        let band = value / DCP_COLOR_COUNT;
        let mut color = value % DCP_COLOR_COUNT + step;
        let mut formula = color % DCP_FORMULA_SEPARATOR;

        if DCP_FORMULA_SEPARATOR - formula <= step / 2 {
            color += DCP_FORMULA_SEPARATOR - formula;
            formula = 0;
        }

        if color >= DCP_FORMULA_SEPARATOR * 3 - step / 2 {
            color = 0;
        } else if formula > 0 && formula < step {
            color -= formula;
        }

        band * DCP_COLOR_COUNT + color
    }

    /// Moves to the next brightness band.
    ///
    /// Past the brightest band the picker shows white and remembers the value
    /// it left; leaving white restores that color position in the darkest
    /// band.
    pub fn next_band(&mut self, value: u8) -> u8 {
        if value == DCP_WHITE {
            let restored = self.saved.take().unwrap_or(DCP_MIDDLE_START);
            return restored % DCP_COLOR_COUNT;
        }

        if value / DCP_COLOR_COUNT + 1 < DCP_BRIGHTNESS_LEVELS {
            value + DCP_COLOR_COUNT
        } else {
            self.saved = Some(value);
            DCP_WHITE
        }
    }

    /// The value that leaving white would restore, if any.
    pub fn saved(&self) -> Option<u8> {
        self.saved
    }
}

/// Color shown for a picker value.
///
/// Bands above the middle blend the hue toward white, bands below toward
/// black, along a power curve so the perceived steps are even.
pub fn picker_color(value: u8) -> Srgb<u8> {
    if value == DCP_WHITE {
        return WHITE;
    }

    let band = value / DCP_COLOR_COUNT;
    let color = value % DCP_COLOR_COUNT;
    let hue = color_by_hue(color * HUE_PER_POSITION);

    if band == DCP_MIDDLE_LEVEL {
        return hue;
    }

    let base: Srgb<f32> = hue.into_format();
    let levels = (DCP_BRIGHTNESS_LEVELS - DCP_MIDDLE_LEVEL) as f32;
    let blended = if band > DCP_MIDDLE_LEVEL {
        let t = (band - DCP_MIDDLE_LEVEL) as f32 / levels;
        base.mix(Srgb::new(1.0, 1.0, 1.0), libm::powf(t, BLEND_GAMMA))
    } else {
        let t = (DCP_MIDDLE_LEVEL - band) as f32 / levels;
        base.mix(Srgb::new(0.0, 0.0, 0.0), 1.0 - libm::powf(1.0 - t, BLEND_GAMMA))
    };

    blended.into_format()
}
