//! Byte image of [`BladeState`] kept in non-volatile memory across sleep.
//!
//! Layout, 9 bytes:
//!
//! | offset | content                                   |
//! |--------|-------------------------------------------|
//! | 0..4   | magic `"SWGE"`                            |
//! | 4      | phase (high nibble) and step (low nibble) |
//! | 5      | palette (high nibble) and color index     |
//! | 6      | display mode                              |
//! | 7      | display submode                           |
//! | 8      | display step                              |

use crate::types::{BladeState, ColorState, DisplayMode, FlickerVariant, Palette, Phase};

/// Marker at the start of a valid image.
pub const MAGIC: [u8; 4] = *b"SWGE";

/// Length of the encoded [`BladeState`] without the magic.
pub const STATE_LEN: usize = 5;

/// Length of a complete image.
pub const IMAGE_LEN: usize = MAGIC.len() + STATE_LEN;

/// Image written when persisted state is erased; decodes to the default state.
pub const BLANK_IMAGE: [u8; IMAGE_LEN] = [b'S', b'W', b'G', b'E', 0, 0, 0, 0, 0];

const PHASE_OFF: u8 = 0x0;
const PHASE_POWER_ON: u8 = 0x1;
const PHASE_ON: u8 = 0x2;
const PHASE_CLASH: u8 = 0x3;
const PHASE_POWER_OFF: u8 = 0x4;
const PHASE_FLICKER: u8 = 0x5;
const PHASE_RESET: u8 = 0xF;

const FLICKER_HIGH_BIT: u8 = 0x04;
const FLICKER_STEP_MASK: u8 = 0x03;

const PALETTE_SAVI: u8 = 0x0;
const PALETTE_LEGACY: u8 = 0x2;

/// Errors that can occur while decoding a persisted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// The image is shorter than [`IMAGE_LEN`].
    Truncated {
        expected: usize,
        actual: usize,
    },
    /// The image does not start with [`MAGIC`].
    BadMagic,
    /// Unknown phase nibble.
    InvalidPhase(u8),
    /// Unknown palette nibble.
    InvalidPalette(u8),
    /// Display mode out of range.
    InvalidDisplayMode(u8),
}

impl core::fmt::Display for PersistError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PersistError::Truncated { expected, actual } => {
                write!(
                    f,
                    "truncated image: expected {} bytes, got {}",
                    expected, actual
                )
            }
            PersistError::BadMagic => write!(f, "image magic missing"),
            PersistError::InvalidPhase(raw) => write!(f, "invalid phase nibble {:#x}", raw),
            PersistError::InvalidPalette(raw) => write!(f, "invalid palette nibble {:#x}", raw),
            PersistError::InvalidDisplayMode(raw) => write!(f, "invalid display mode {}", raw),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PersistError {}

fn encode_phase(phase: Phase) -> u8 {
    match phase {
        Phase::Off => PHASE_OFF << 4,
        Phase::PowerOn { step } => PHASE_POWER_ON << 4 | (step & 0x0F),
        Phase::On => PHASE_ON << 4,
        Phase::Clash { step } => PHASE_CLASH << 4 | (step & 0x0F),
        Phase::PowerOff { step } => PHASE_POWER_OFF << 4 | (step & 0x0F),
        Phase::Flicker { step, variant, .. } => {
            let high = match variant {
                FlickerVariant::Low => 0,
                FlickerVariant::High => FLICKER_HIGH_BIT,
            };
            PHASE_FLICKER << 4 | high | (step & FLICKER_STEP_MASK)
        }
        Phase::Reset => PHASE_RESET << 4,
    }
}

fn decode_phase(raw: u8) -> Result<Phase, PersistError> {
    let step = raw & 0x0F;
    let phase = match raw >> 4 {
        PHASE_OFF => Phase::Off,
        PHASE_POWER_ON => Phase::PowerOn { step },
        PHASE_ON => Phase::On,
        PHASE_CLASH => Phase::Clash { step },
        PHASE_POWER_OFF => Phase::PowerOff { step },
        PHASE_FLICKER => {
            let variant = if step & FLICKER_HIGH_BIT != 0 {
                FlickerVariant::High
            } else {
                FlickerVariant::Low
            };
            Phase::Flicker {
                step: step & FLICKER_STEP_MASK,
                variant,
                intensity: 0,
            }
        }
        PHASE_RESET => Phase::Reset,
        other => return Err(PersistError::InvalidPhase(other)),
    };
    Ok(phase)
}

fn encode_color_state(color_state: ColorState) -> u8 {
    let palette = match color_state.palette {
        Palette::Savi => PALETTE_SAVI,
        Palette::Legacy => PALETTE_LEGACY,
    };
    palette << 4 | color_state.index()
}

fn decode_color_state(raw: u8) -> Result<ColorState, PersistError> {
    // Odd table numbers are the clash tables of the palette below them.
    let palette = match raw >> 4 {
        0 | 1 => Palette::Savi,
        2 | 3 => Palette::Legacy,
        other => return Err(PersistError::InvalidPalette(other)),
    };
    Ok(ColorState::new(palette, raw & 0x0F))
}

/// Encodes a state into a complete image.
pub fn encode(state: &BladeState) -> [u8; IMAGE_LEN] {
    let mut image = BLANK_IMAGE;
    image[4] = encode_phase(state.phase);
    image[5] = encode_color_state(state.color_state);
    image[6] = state.display_mode as u8;
    image[7] = state.display_submode;
    image[8] = state.display_step;
    image
}

/// Decodes an image produced by [`encode`].
///
/// Flicker intensity is not part of the image and decodes as 0.
pub fn decode(image: &[u8]) -> Result<BladeState, PersistError> {
    if image.len() < IMAGE_LEN {
        return Err(PersistError::Truncated {
            expected: IMAGE_LEN,
            actual: image.len(),
        });
    }
    if image[..MAGIC.len()] != MAGIC {
        return Err(PersistError::BadMagic);
    }

    let display_mode =
        DisplayMode::from_u8(image[6]).ok_or(PersistError::InvalidDisplayMode(image[6]))?;

    Ok(BladeState {
        phase: decode_phase(image[4])?,
        color_state: decode_color_state(image[5])?,
        display_mode,
        display_submode: image[7],
        display_step: image[8],
    })
}
