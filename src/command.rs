//! Hilt command decoding and the command engine.
//!
//! A command byte carries the command kind in its high nibble and a 4-bit
//! parameter (color index or flicker intensity) in its low nibble. Kinds come
//! in pairs; the even kind is the Savi's Workshop variant and the odd kind the
//! Legacy variant. A byte of 0 means no command is pending.

use crate::config::{
    DMODE_THRESHOLD_MS, DSUBMODE_THRESHOLD_MS, RESET_THRESHOLD_COUNT, RESET_THRESHOLD_MS,
};
use crate::context::BladeContext;
use crate::time::Millis;
use crate::types::{
    ColorState, DisplayMode, FlickerVariant, Palette, Phase, PhaseKind, SUBMODE_NORMAL,
};
use core::cell::Cell;
use critical_section::Mutex;

/// A decoded hilt command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Start the ignition animation; `index` selects the stock color.
    Ignite { palette: Palette, index: u8 },

    /// Start the extinguish animation.
    Extinguish,

    /// Red flicker pulse at the given 4-bit intensity.
    Flicker {
        variant: FlickerVariant,
        intensity: u8,
    },

    /// Drop the blade immediately, without animation.
    HardOff,

    /// Change the stock color of a lit blade.
    SetColor { palette: Palette, index: u8 },

    /// Clash flash.
    Flash,

    /// Any other kind; carries the raw byte.
    Unknown(u8),
}

impl Command {
    /// Decodes a raw command byte. Returns `None` for 0 (nothing pending).
    pub const fn decode(byte: u8) -> Option<Self> {
        if byte == 0 {
            return None;
        }

        let param = byte & 0x0F;
        let palette = if byte & 0x10 == 0 {
            Palette::Savi
        } else {
            Palette::Legacy
        };

        let command = match byte >> 4 {
            0x2 | 0x3 => Command::Ignite {
                palette,
                index: param,
            },
            0x4 | 0x5 => Command::Extinguish,
            0x6 => Command::Flicker {
                variant: FlickerVariant::Low,
                intensity: param,
            },
            0x7 => Command::Flicker {
                variant: FlickerVariant::High,
                intensity: param,
            },
            0x8 | 0x9 => Command::HardOff,
            0xA | 0xB => Command::SetColor {
                palette,
                index: param,
            },
            0xC | 0xD => Command::Flash,
            _ => Command::Unknown(byte),
        };
        Some(command)
    }
}

/// Single-byte inbox between the protocol decoder interrupt and the tick.
///
/// The tick takes the byte and clears the slot inside one critical section,
/// so a command is consumed exactly once and taking it acknowledges it.
pub struct CommandSlot {
    pending: Mutex<Cell<u8>>,
}

impl CommandSlot {
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(Cell::new(0)),
        }
    }

    /// Publishes a decoded byte, replacing any unconsumed one.
    pub fn post(&self, byte: u8) {
        critical_section::with(|cs| self.pending.borrow(cs).set(byte));
    }

    /// Takes the pending byte, leaving the slot empty.
    pub fn take(&self) -> Option<u8> {
        let byte = critical_section::with(|cs| self.pending.borrow(cs).replace(0));
        if byte == 0 { None } else { Some(byte) }
    }

    /// True while a byte waits to be taken.
    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.pending.borrow(cs).get() != 0)
    }
}

impl Default for CommandSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies hilt commands to the blade state.
///
/// Also owns the on/off timestamps that drive display-mode cycling and the
/// anti-brick reset counter.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    last_off: Option<Millis>,
    last_on: Option<Millis>,
    reset_count: u8,
    cycling_enabled: bool,
}

impl CommandEngine {
    /// Creates an engine. With `cycling_enabled` false neither display-mode
    /// cycling nor the anti-brick counter run.
    pub const fn new(cycling_enabled: bool) -> Self {
        Self {
            last_off: None,
            last_on: None,
            reset_count: RESET_THRESHOLD_COUNT,
            cycling_enabled,
        }
    }

    /// Current anti-brick counter value.
    pub fn reset_count(&self) -> u8 {
        self.reset_count
    }

    /// Takes at most one command from `slot` and applies it.
    pub fn process(
        &mut self,
        ctx: &mut BladeContext,
        slot: &CommandSlot,
        now: Millis,
    ) -> Option<Command> {
        let command = Command::decode(slot.take()?)?;
        self.handle(ctx, command, now);
        Some(command)
    }

    /// Applies one command. Out-of-context and unknown commands are ignored.
    pub fn handle(&mut self, ctx: &mut BladeContext, command: Command, now: Millis) {
        let phase = ctx.state.phase.kind();
        debug!("command {} in phase {}", command, phase);

        match command {
            Command::Ignite { palette, index } => {
                if phase == PhaseKind::PowerOn {
                    return;
                }
                self.ignite(ctx, palette, index, now);
            }
            Command::SetColor { palette, index } => {
                if ctx.state.display_mode != DisplayMode::Stock
                    || ctx.state.display_submode != SUBMODE_NORMAL
                    || phase != PhaseKind::On
                {
                    return;
                }
                ctx.state.color_state = ColorState::new(palette, index);
                ctx.render_stock_color();
                ctx.segments.set_blade_brightness(100);
            }
            Command::Flicker { variant, intensity } => {
                if ctx.state.display_mode != DisplayMode::Stock || phase != PhaseKind::On {
                    return;
                }
                ctx.state.phase = Phase::flicker(variant, intensity);
            }
            Command::Flash => {
                if phase == PhaseKind::On {
                    ctx.state.phase = Phase::clash();
                }
            }
            Command::Extinguish => {
                if matches!(phase, PhaseKind::Off | PhaseKind::PowerOff | PhaseKind::Reset) {
                    return;
                }
                self.last_off = Some(now);
                ctx.state.phase = Phase::power_off();
                if self.cycling_enabled {
                    self.count_short_on(ctx, now);
                }
            }
            Command::HardOff => {
                if matches!(phase, PhaseKind::Off | PhaseKind::PowerOff | PhaseKind::Reset) {
                    return;
                }
                self.last_off = Some(now);
                ctx.segments.set_blade_ceiling(0);
                ctx.power_enabled = false;
                ctx.state.phase = Phase::Off;
            }
            Command::Unknown(byte) => {
                debug!("ignoring unknown command {:#x}", byte);
            }
        }
    }

    fn ignite(&mut self, ctx: &mut BladeContext, palette: Palette, index: u8, now: Millis) {
        self.last_on = Some(now);
        ctx.state.phase = Phase::power_on();
        ctx.segments.set_blade_ceiling(0);

        if self.cycling_enabled {
            let off_for = self.last_off.map(|off| now.elapsed_since(off));
            self.cycle_display_mode(ctx, off_for);
            self.count_short_off(off_for);
        }

        if ctx.state.display_mode == DisplayMode::Stock {
            ctx.state.color_state = ColorState::new(palette, index);
            ctx.render_stock_color();
        }
    }

    fn cycle_display_mode(&mut self, ctx: &mut BladeContext, off_for: Option<u32>) {
        let Some(off_for) = off_for else {
            return;
        };

        if off_for < DMODE_THRESHOLD_MS {
            ctx.state.display_mode = ctx.state.display_mode.next();
            ctx.state.display_submode = SUBMODE_NORMAL;
        } else if off_for < DSUBMODE_THRESHOLD_MS {
            ctx.state.display_submode = ctx.state.display_submode.wrapping_add(1);
        } else {
            return;
        }

        info!(
            "display mode {}, submode {} after {} ms off",
            ctx.state.display_mode,
            ctx.state.display_submode,
            off_for
        );
    }

    // Short off gap on ignite. Never reaches zero here so the reset always
    // fires from an extinguish, with the blade going dark.
    fn count_short_off(&mut self, off_for: Option<u32>) {
        match off_for {
            Some(gap) if gap < RESET_THRESHOLD_MS => {
                if self.reset_count > 1 {
                    self.reset_count -= 1;
                    debug!("reset count {}", self.reset_count);
                }
            }
            _ => self.reset_count = RESET_THRESHOLD_COUNT,
        }
    }

    fn count_short_on(&mut self, ctx: &mut BladeContext, now: Millis) {
        let short = self
            .last_on
            .is_some_and(|on| now.elapsed_since(on) < RESET_THRESHOLD_MS);

        if !short {
            self.reset_count = RESET_THRESHOLD_COUNT;
            return;
        }

        self.reset_count = self.reset_count.saturating_sub(1);
        debug!("reset count {}", self.reset_count);

        if self.reset_count == 0 {
            warn!("rapid power cycling, resetting blade state");
            ctx.state.reset_display();
            ctx.state.phase = Phase::Reset;
            self.reset_count = RESET_THRESHOLD_COUNT;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_covers_every_kind() {
        assert_eq!(Command::decode(0x00), None);
        assert_eq!(
            Command::decode(0x23),
            Some(Command::Ignite {
                palette: Palette::Savi,
                index: 3
            })
        );
        assert_eq!(
            Command::decode(0x31),
            Some(Command::Ignite {
                palette: Palette::Legacy,
                index: 1
            })
        );
        assert_eq!(Command::decode(0x50), Some(Command::Extinguish));
        assert_eq!(
            Command::decode(0x7A),
            Some(Command::Flicker {
                variant: FlickerVariant::High,
                intensity: 10
            })
        );
        assert_eq!(Command::decode(0x80), Some(Command::HardOff));
        assert_eq!(
            Command::decode(0xB2),
            Some(Command::SetColor {
                palette: Palette::Legacy,
                index: 2
            })
        );
        assert_eq!(Command::decode(0xC0), Some(Command::Flash));
        assert_eq!(Command::decode(0x10), Some(Command::Unknown(0x10)));
        assert_eq!(Command::decode(0x05), Some(Command::Unknown(0x05)));
        assert_eq!(Command::decode(0xE0), Some(Command::Unknown(0xE0)));
    }

    #[test]
    fn slot_take_clears() {
        let slot = CommandSlot::new();
        assert_eq!(slot.take(), None);
        slot.post(0x23);
        assert!(slot.is_pending());
        assert_eq!(slot.take(), Some(0x23));
        assert_eq!(slot.take(), None);
    }
}
