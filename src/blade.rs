//! The blade: shared context, the three engines and the policy around them.
//!
//! Provides [`Blade`], which runs one cooperative tick at a time in a fixed
//! order: reset supervision, sleep bookkeeping, the [`CommandEngine`], then
//! (unless the blade is off) the [`AnimationSequencer`] and the
//! [`DisplayEngine`], and finally the derived brightness and the hardware
//! lines.

use crate::command::{CommandEngine, CommandSlot};
use crate::config::BladeConfig;
use crate::context::BladeContext;
use crate::display::DisplayEngine;
use crate::hardware::BladeHardware;
use crate::persist::{self, PersistError};
use crate::random::RandomSource;
use crate::segments::{FrameCell, SegmentFrame};
use crate::sequencer::AnimationSequencer;
use crate::time::{Millis, TimeSource};
use crate::types::{BladeState, Phase};

/// What the blade needs from its host after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickStatus {
    /// Lit or animating. Tick again soon.
    Active,

    /// Dark and waiting for the hilt.
    Off,

    /// Off long enough to sleep; state has been persisted. Call
    /// [`Blade::wake`] after the MCU wakes up.
    SleepDue,

    /// Anti-brick reset in progress; commands are being discarded.
    Resetting,
}

/// A complete blade controller.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `T` - Time source implementation type
/// * `R` - Random source for effects
/// * `H` - Hardware implementation type
pub struct Blade<'t, T: TimeSource, R: RandomSource, H: BladeHardware> {
    time_source: &'t T,
    hardware: H,
    config: BladeConfig,
    ctx: BladeContext,
    commands: CommandEngine,
    sequencer: AnimationSequencer,
    display: DisplayEngine<R>,
    reset_started: Option<Millis>,
    off_since: Option<Millis>,
    state_stored: bool,
    power_line: bool,
    reception_line: bool,
}

impl<'t, T: TimeSource, R: RandomSource, H: BladeHardware> Blade<'t, T, R, H> {
    /// Creates a blade in the default state with power off and reception on.
    pub fn new(time_source: &'t T, mut hardware: H, rng: R, config: BladeConfig) -> Self {
        hardware.set_power(false);
        hardware.set_command_reception(true);

        let mut ctx = BladeContext::new();
        ctx.mark_state_loaded();

        let mut blade = Self {
            time_source,
            hardware,
            config,
            ctx,
            commands: CommandEngine::new(config.switches.cycling_enabled()),
            sequencer: AnimationSequencer::new(),
            display: DisplayEngine::new(rng),
            reset_started: None,
            off_since: None,
            state_stored: false,
            power_line: false,
            reception_line: true,
        };
        blade.apply_switch_policy();
        blade
    }

    /// Replaces the state with a persisted image.
    ///
    /// The blade always comes up dark, so a stored phase other than `Off` is
    /// dropped; colors and display mode are kept. A bad image leaves the state
    /// untouched and, when persistence is writable, wipes the stored copy so
    /// the next boot starts clean.
    pub fn load_persisted(&mut self, image: &[u8]) -> Result<(), PersistError> {
        match persist::decode(image) {
            Ok(mut state) => {
                if state.phase != Phase::Off {
                    debug!("dropping stored phase {}", state.phase);
                    state.phase = Phase::Off;
                }
                self.ctx.state = state;
                self.apply_switch_policy();
                self.ctx.mark_state_loaded();
                info!("persisted state loaded");
                Ok(())
            }
            Err(error) => {
                warn!("persisted state rejected: {}", error);
                if self.config.switches.persistence_writable() {
                    self.hardware.erase_state();
                }
                Err(error)
            }
        }
    }

    // Only the dmode switch on its own makes this a pure stock blade.
    fn apply_switch_policy(&mut self) {
        if !self.config.switches.display_modes_active() {
            self.ctx.state.reset_display();
        }
    }

    /// Restarts the off timer after the host woke from sleep.
    pub fn wake(&mut self) {
        self.off_since = Some(self.time_source.now());
        self.state_stored = false;
        info!("awake");
    }

    /// Runs one tick, consuming at most one command from `commands`.
    pub fn tick(&mut self, commands: &CommandSlot) -> TickStatus {
        let now = self.time_source.now();

        if self.ctx.state.phase == Phase::Reset {
            self.supervise_reset(now);
            if self.ctx.state.phase == Phase::Reset {
                let _ = commands.take();
                self.finish_tick();
                return TickStatus::Resetting;
            }
        }

        let sleep_due = self.check_sleep(now);

        self.commands.process(&mut self.ctx, commands, now);

        if self.ctx.state.phase != Phase::Off {
            self.sequencer.run(&mut self.ctx, now);
            if self.config.switches.display_modes_active() {
                self.display.run(&mut self.ctx, now);
            }
        }

        self.finish_tick();

        match self.ctx.state.phase {
            Phase::Reset => TickStatus::Resetting,
            Phase::Off if sleep_due => TickStatus::SleepDue,
            Phase::Off => TickStatus::Off,
            _ => TickStatus::Active,
        }
    }

    fn supervise_reset(&mut self, now: Millis) {
        match self.reset_started {
            None => {
                info!("reset started");
                self.reset_started = Some(now);
                self.ctx.segments.clear();
                self.ctx.segments.set_blade_ceiling(0);
                self.ctx.power_enabled = false;
                self.ctx.reception_enabled = false;
                if self.config.switches.persistence_writable() {
                    self.hardware.erase_state();
                }
            }
            Some(started) if now.elapsed_since(started) >= self.config.reset_period_ms => {
                info!("reset finished");
                self.reset_started = None;
                self.ctx.state = BladeState::default();
                self.ctx.mark_state_loaded();
                self.ctx.reception_enabled = true;
            }
            Some(_) => {}
        }
    }

    // Sleep is due once the blade has been off for longer than the
    // configured time. The state is stored once per off period.
    fn check_sleep(&mut self, now: Millis) -> bool {
        if self.ctx.state.phase != Phase::Off {
            self.off_since = None;
            self.state_stored = false;
            return false;
        }

        let since = *self.off_since.get_or_insert(now);
        if now.elapsed_since(since) <= self.config.off_to_sleep_ms {
            return false;
        }

        if !self.state_stored {
            self.state_stored = true;
            if self.config.switches.persistence_writable() {
                self.hardware.store_state(&persist::encode(&self.ctx.state));
            }
            info!("sleep due");
        }
        true
    }

    fn finish_tick(&mut self) {
        self.ctx.segments.update_derived();

        if self.ctx.power_enabled != self.power_line {
            self.power_line = self.ctx.power_enabled;
            self.hardware.set_power(self.power_line);
        }
        if self.ctx.reception_enabled != self.reception_line {
            self.reception_line = self.ctx.reception_enabled;
            self.hardware.set_command_reception(self.reception_line);
        }
    }

    /// The renderer's view of the segments after the last tick.
    pub fn frame(&self) -> SegmentFrame {
        self.ctx.segments.frame()
    }

    /// Publishes the current frame for the PWM interrupt.
    pub fn publish(&self, cell: &FrameCell) {
        cell.publish(self.frame());
    }

    pub fn state(&self) -> &BladeState {
        &self.ctx.state
    }

    pub fn context(&self) -> &BladeContext {
        &self.ctx
    }

    /// Mutable access to the shared context, for bring-up code that edits the
    /// state directly.
    pub fn context_mut(&mut self) -> &mut BladeContext {
        &mut self.ctx
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// Current anti-brick counter value.
    pub fn reset_count(&self) -> u8 {
        self.commands.reset_count()
    }

    pub fn display(&self) -> &DisplayEngine<R> {
        &self.display
    }

    pub fn sequencer(&self) -> &AnimationSequencer {
        &self.sequencer
    }
}
