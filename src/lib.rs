#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Blade`**: Owns the shared state and runs one tick of every engine in order
//! - **`BladeContext`**: The shared state record plus the segment arrays and clash memento
//! - **`CommandEngine`**: Applies hilt commands, cycles display modes, counts toward the anti-brick reset
//! - **`AnimationSequencer`**: Ignition, extinguish, clash and flicker animations
//! - **`DisplayEngine`**: Display modes, brightness effects and the dynamic color picker
//! - **`Segments`**: Per-segment color, current/ceiling/derived brightness
//! - **`CommandSlot`** / **`FrameCell`**: Values shared with the decoder and PWM interrupts
//! - **`BladeHardware`**: Trait to implement for the power, data line and storage pins
//! - **`TimeSource`**: Trait to implement for your millisecond counter
//!
//! Segment colors are `Srgb<u8>` PWM duty values; brightness is on a 0-255 scale
//! with percent-based setters.

#[macro_use]
mod fmt;

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod blade;
pub mod colors;
pub mod command;
pub mod config;
pub mod context;
pub mod display;
pub mod effects;
pub mod hardware;
pub mod persist;
pub mod picker;
pub mod random;
pub mod segments;
pub mod sequencer;
pub mod time;
pub mod types;

pub use blade::{Blade, TickStatus};
pub use colors::{ColorTable, StockColor, color_by_hue};
pub use command::{Command, CommandEngine, CommandSlot};
pub use config::{BladeConfig, OptionSwitches};
pub use context::BladeContext;
pub use display::DisplayEngine;
pub use effects::StockEffect;
pub use hardware::BladeHardware;
pub use persist::PersistError;
pub use picker::{ColorPicker, picker_color};
pub use random::{RandomSource, XorShift32};
pub use segments::{FrameCell, RenderMode, SegmentFrame, Segments};
pub use sequencer::{AnimationSequencer, ExtinguishStart};
pub use time::{Deadline, Millis, TimeSource};
pub use types::{
    BladeState, ColorState, DisplayMode, FlickerVariant, Palette, Phase, PhaseKind,
};
