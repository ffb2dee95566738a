//! Core types describing the blade's shared state record.

/// Number of entries in every stock color table (4-bit index).
pub const COLORS_PER_TABLE: u8 = 16;

/// Which hilt family a stock color index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Palette {
    /// Savi's Workshop hilts (kyber crystal colors).
    #[default]
    Savi,

    /// Legacy hilts (one color per character saber).
    Legacy,
}

/// Palette selector plus a 4-bit index into that palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorState {
    pub palette: Palette,
    index: u8,
}

impl ColorState {
    /// Creates a color state; the index is wrapped into the table.
    #[inline]
    pub const fn new(palette: Palette, index: u8) -> Self {
        Self {
            palette,
            index: index % COLORS_PER_TABLE,
        }
    }

    /// The index into the palette, always below [`COLORS_PER_TABLE`].
    #[inline]
    pub const fn index(&self) -> u8 {
        self.index
    }
}

/// Flicker pulse energy, selected by the hilt command variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlickerVariant {
    Low,
    High,
}

/// The blade's top-level phase.
///
/// Animated phases carry a step counter that belongs to that phase only;
/// entering a phase through its constructor always starts at step 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Dark and unpowered. Steady.
    #[default]
    Off,

    /// Ignition ramp.
    PowerOn { step: u8 },

    /// Lit. Steady.
    On,

    /// Short full-brightness flash after an impact.
    Clash { step: u8 },

    /// Extinguish ramp, including the per-color start delay.
    PowerOff { step: u8 },

    /// Red flicker pulse; `intensity` is the 4-bit command parameter.
    Flicker {
        step: u8,
        variant: FlickerVariant,
        intensity: u8,
    },

    /// Anti-brick reset period.
    Reset,
}

/// Discriminant of [`Phase`] without its step data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhaseKind {
    Off,
    PowerOn,
    On,
    Clash,
    PowerOff,
    Flicker,
    Reset,
}

impl Phase {
    /// Ignition at step 0.
    pub const fn power_on() -> Self {
        Phase::PowerOn { step: 0 }
    }

    /// Clash at step 0.
    pub const fn clash() -> Self {
        Phase::Clash { step: 0 }
    }

    /// Extinguish at step 0.
    pub const fn power_off() -> Self {
        Phase::PowerOff { step: 0 }
    }

    /// Flicker pulse at step 0.
    pub const fn flicker(variant: FlickerVariant, intensity: u8) -> Self {
        Phase::Flicker {
            step: 0,
            variant,
            intensity: intensity & 0x0F,
        }
    }

    /// The phase without its step data.
    pub const fn kind(&self) -> PhaseKind {
        match self {
            Phase::Off => PhaseKind::Off,
            Phase::PowerOn { .. } => PhaseKind::PowerOn,
            Phase::On => PhaseKind::On,
            Phase::Clash { .. } => PhaseKind::Clash,
            Phase::PowerOff { .. } => PhaseKind::PowerOff,
            Phase::Flicker { .. } => PhaseKind::Flicker,
            Phase::Reset => PhaseKind::Reset,
        }
    }

    /// Current step counter; steady phases report 0.
    pub const fn step(&self) -> u8 {
        match self {
            Phase::PowerOn { step }
            | Phase::Clash { step }
            | Phase::PowerOff { step }
            | Phase::Flicker { step, .. } => *step,
            Phase::Off | Phase::On | Phase::Reset => 0,
        }
    }

    /// Same phase advanced by `by` steps (4-bit counter). Steady phases are unchanged.
    pub const fn advanced(self, by: u8) -> Self {
        match self {
            Phase::PowerOn { step } => Phase::PowerOn {
                step: step.wrapping_add(by) & 0x0F,
            },
            Phase::Clash { step } => Phase::Clash {
                step: step.wrapping_add(by) & 0x0F,
            },
            Phase::PowerOff { step } => Phase::PowerOff {
                step: step.wrapping_add(by) & 0x0F,
            },
            Phase::Flicker {
                step,
                variant,
                intensity,
            } => Phase::Flicker {
                step: step.wrapping_add(by) & 0x0F,
                variant,
                intensity,
            },
            other => other,
        }
    }
}

/// Number of display modes; cycling wraps at this value.
pub const DISPLAY_MODE_COUNT: u8 = 6;

/// User-selectable secondary display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DisplayMode {
    /// Stock colors with an optional brightness effect.
    #[default]
    Stock = 0,

    /// Dynamic color picker, automatically stepping through hues.
    ColorPicker = 1,

    /// The color last shown by the picker, held steady.
    ColorPickerPicked = 2,

    /// Whole blade cycles through the hue wheel.
    BladeWheel = 3,

    /// Hue wheel with a fixed offset per segment.
    SegmentWheel = 4,

    /// Fixed per-segment color presets.
    MultiMode = 5,
}

impl DisplayMode {
    /// The next mode in cycling order, wrapping back to `Stock`.
    pub const fn next(self) -> Self {
        match self {
            DisplayMode::Stock => DisplayMode::ColorPicker,
            DisplayMode::ColorPicker => DisplayMode::ColorPickerPicked,
            DisplayMode::ColorPickerPicked => DisplayMode::BladeWheel,
            DisplayMode::BladeWheel => DisplayMode::SegmentWheel,
            DisplayMode::SegmentWheel => DisplayMode::MultiMode,
            DisplayMode::MultiMode => DisplayMode::Stock,
        }
    }

    /// Decodes a raw mode number.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(DisplayMode::Stock),
            1 => Some(DisplayMode::ColorPicker),
            2 => Some(DisplayMode::ColorPickerPicked),
            3 => Some(DisplayMode::BladeWheel),
            4 => Some(DisplayMode::SegmentWheel),
            5 => Some(DisplayMode::MultiMode),
            _ => None,
        }
    }
}

/// Submode value meaning "no secondary effect".
pub const SUBMODE_NORMAL: u8 = 0;

/// The blade's shared state record.
///
/// This is the record that gets persisted before sleep; see
/// [`crate::persist`] for its byte layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BladeState {
    pub phase: Phase,
    pub color_state: ColorState,
    pub display_mode: DisplayMode,

    /// Effect variant or color resolution within the display mode.
    pub display_submode: u8,

    /// Scratch value owned by the active display mode.
    pub display_step: u8,
}

impl BladeState {
    /// Puts display mode, submode and step back to their stock defaults.
    pub fn reset_display(&mut self) {
        self.display_mode = DisplayMode::Stock;
        self.display_submode = SUBMODE_NORMAL;
        self.display_step = 0;
    }
}
