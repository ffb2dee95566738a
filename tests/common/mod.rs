//! Shared test infrastructure for saber-blade integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use saber_blade::persist::IMAGE_LEN;
use saber_blade::{
    Blade, BladeConfig, BladeContext, BladeHardware, CommandEngine, CommandSlot, Millis,
    RandomSource, TickStatus, TimeSource,
};

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock millisecond clock with controllable time advancement
pub struct MockClock {
    current_time: core::cell::Cell<u32>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            current_time: core::cell::Cell::new(0),
        }
    }

    pub fn starting_at(millis: u32) -> Self {
        Self {
            current_time: core::cell::Cell::new(millis),
        }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u32) {
        let current = self.current_time.get();
        self.current_time.set(current.wrapping_add(millis));
    }

    pub fn set_time(&self, millis: u32) {
        self.current_time.set(millis);
    }

    pub fn millis(&self) -> Millis {
        Millis(self.current_time.get())
    }
}

impl TimeSource for MockClock {
    fn now(&self) -> Millis {
        Millis(self.current_time.get())
    }
}

// ============================================================================
// Mock Hardware
// ============================================================================

/// Mock hardware that records every line change and persisted image
#[derive(Debug, Default)]
pub struct MockHardware {
    pub power: bool,
    pub reception: bool,
    pub power_history: Vec<bool>,
    pub reception_history: Vec<bool>,
    pub stored: Vec<[u8; IMAGE_LEN]>,
    pub erase_count: usize,
}

impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BladeHardware for MockHardware {
    fn set_power(&mut self, enabled: bool) {
        self.power = enabled;
        self.power_history.push(enabled);
    }

    fn set_command_reception(&mut self, enabled: bool) {
        self.reception = enabled;
        self.reception_history.push(enabled);
    }

    fn store_state(&mut self, image: &[u8; IMAGE_LEN]) {
        self.stored.push(*image);
    }

    fn erase_state(&mut self) {
        self.erase_count += 1;
    }
}

// ============================================================================
// Scripted Random Source
// ============================================================================

/// Random source that replays a fixed script, repeating the last value
pub struct ScriptedRandom {
    values: Vec<u16>,
    position: usize,
}

impl ScriptedRandom {
    pub fn new(values: &[u16]) -> Self {
        Self {
            values: values.to_vec(),
            position: 0,
        }
    }

    /// Always returns the same value
    pub fn constant(value: u16) -> Self {
        Self::new(&[value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_u16(&mut self) -> u16 {
        let value = self.values[self.position.min(self.values.len() - 1)];
        self.position += 1;
        value
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub type TestBlade<'t> = Blade<'t, MockClock, ScriptedRandom, MockHardware>;

pub fn blade(clock: &MockClock) -> TestBlade<'_> {
    blade_with_config(clock, BladeConfig::new())
}

pub fn blade_with_config(clock: &MockClock, config: BladeConfig) -> TestBlade<'_> {
    Blade::new(clock, MockHardware::new(), ScriptedRandom::constant(0), config)
}

/// Posts a command byte and runs one tick
pub fn send(blade: &mut TestBlade<'_>, slot: &CommandSlot, byte: u8) -> TickStatus {
    slot.post(byte);
    blade.tick(slot)
}

/// Ticks once per millisecond for `millis` milliseconds
pub fn run_for(blade: &mut TestBlade<'_>, clock: &MockClock, slot: &CommandSlot, millis: u32) {
    for _ in 0..millis {
        clock.advance(1);
        blade.tick(slot);
    }
}

/// Applies a raw command byte straight to a context
pub fn apply(engine: &mut CommandEngine, ctx: &mut BladeContext, byte: u8, now: u32) {
    let slot = CommandSlot::new();
    slot.post(byte);
    engine.process(ctx, &slot, Millis(now));
}

// ============================================================================
// Command bytes
// ============================================================================

pub const IGNITE_SAVI: u8 = 0x20;
pub const IGNITE_LEGACY: u8 = 0x30;
pub const EXTINGUISH: u8 = 0x40;
pub const FLICKER_LOW: u8 = 0x60;
pub const FLICKER_HIGH: u8 = 0x70;
pub const HARD_OFF: u8 = 0x80;
pub const SET_COLOR_SAVI: u8 = 0xA0;
pub const SET_COLOR_LEGACY: u8 = 0xB0;
pub const FLASH: u8 = 0xC0;
