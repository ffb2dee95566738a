//! Boot-time configuration and behavioural constants.

/// Off duration below which an ignite cycles to the next display mode.
pub const DMODE_THRESHOLD_MS: u32 = 1000;

/// Off duration below which an ignite cycles to the next submode.
pub const DSUBMODE_THRESHOLD_MS: u32 = 3000;

/// On/off gaps shorter than this count toward the anti-brick reset.
pub const RESET_THRESHOLD_MS: u32 = 750;

/// Anti-brick counter start value: enough fast cycles to walk every display
/// mode twice, plus one.
pub const RESET_THRESHOLD_COUNT: u8 = 2 * crate::types::DISPLAY_MODE_COUNT + 1;

/// Length of the clash flash.
pub const CLASH_MS: u32 = 40;

/// Duration of one ignition or extinguish ramp step.
pub const RAMP_STEP_MS: u32 = 85;

/// Duration of the bright half of a flicker pulse.
pub const FLICKER_PULSE_MS: u32 = 10;

/// Re-arm period of the procedural flicker effects.
pub const EFFECT_FLICKER_MS: u32 = 50;

/// Re-arm period of the breathing effect.
pub const EFFECT_BREATHING_MS: u32 = 12;

/// Extra hold at the top of a breath.
pub const EFFECT_BREATHING_HOLD_MS: u32 = 1500;

/// Default re-arm period of display effects.
pub const EFFECT_DEFAULT_MS: u32 = 1000;

/// Interval between automatic color picker advances.
pub const PICKER_ADVANCE_MS: u32 = 2000;

/// Pause of the automatic color picker after a clash changed the band.
pub const PICKER_CLASH_PAUSE_MS: u32 = 4000;

/// Slowest hue wheel step period; each submode shaves off [`WHEEL_SPEEDUP_MS`].
pub const WHEEL_BASE_MS: u32 = 25;

pub const WHEEL_SPEEDUP_MS: u32 = 4;

/// Number of distinct wheel speeds.
pub const WHEEL_SPEEDS: u8 = 6;

/// Positions of the two hardware option switches, read once at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OptionSwitches {
    /// Disables display-mode cycling and the anti-brick counter.
    pub dmode_disabled: bool,

    /// Protects persisted state from being written.
    pub write_protect: bool,
}

impl OptionSwitches {
    pub const fn new(dmode_disabled: bool, write_protect: bool) -> Self {
        Self {
            dmode_disabled,
            write_protect,
        }
    }

    /// Whether rapid power cycling changes display modes and counts toward a reset.
    #[inline]
    pub const fn cycling_enabled(&self) -> bool {
        !self.dmode_disabled
    }

    /// Whether the display-mode engine runs at all.
    ///
    /// Only the dmode switch on its own turns the blade into a pure stock
    /// blade; together with write protect the stored mode stays active but
    /// locked.
    #[inline]
    pub const fn display_modes_active(&self) -> bool {
        !(self.dmode_disabled && !self.write_protect)
    }

    /// Whether persisted state may be written or erased.
    #[inline]
    pub const fn persistence_writable(&self) -> bool {
        !self.dmode_disabled && !self.write_protect
    }
}

/// Configuration for a [`Blade`](crate::Blade).
///
/// ```
/// use saber_blade::{BladeConfig, OptionSwitches};
///
/// let config = BladeConfig::new()
///     .with_switches(OptionSwitches::new(false, true))
///     .with_off_to_sleep_ms(30_000);
/// assert!(!config.switches.persistence_writable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BladeConfig {
    pub switches: OptionSwitches,

    /// How long the blade stays off before it is allowed to sleep.
    pub off_to_sleep_ms: u32,

    /// How long the anti-brick reset keeps the blade dark and deaf.
    pub reset_period_ms: u32,
}

impl BladeConfig {
    pub const fn new() -> Self {
        Self {
            switches: OptionSwitches::new(false, false),
            off_to_sleep_ms: 10_000,
            reset_period_ms: 5_000,
        }
    }

    pub const fn with_switches(mut self, switches: OptionSwitches) -> Self {
        self.switches = switches;
        self
    }

    pub const fn with_off_to_sleep_ms(mut self, millis: u32) -> Self {
        self.off_to_sleep_ms = millis;
        self
    }

    pub const fn with_reset_period_ms(mut self, millis: u32) -> Self {
        self.reset_period_ms = millis;
        self
    }
}

impl Default for BladeConfig {
    fn default() -> Self {
        Self::new()
    }
}
