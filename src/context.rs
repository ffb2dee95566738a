//! The explicit context object every engine receives by reference.

use crate::segments::{SEGMENT_COUNT, Segments};
use crate::types::{BladeState, ColorState, Phase};
use palette::Srgb;

/// Snapshot taken before a clash so the blade can resume afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Memento {
    colors: [Srgb<u8>; SEGMENT_COUNT],
    brightness: [u8; SEGMENT_COUNT],
    ceiling: [u8; SEGMENT_COUNT],
    phase: Phase,
    color_state: ColorState,
}

/// Shared mutable state of one blade.
///
/// Owned by [`Blade`](crate::Blade); components are handed `&mut BladeContext`
/// in a fixed order, one after the other, within a tick.
#[derive(Debug, Clone, Default)]
pub struct BladeContext {
    pub state: BladeState,
    pub segments: Segments,
    memento: Option<Memento>,
    state_loaded: bool,

    /// Level requested for the blade's power output line.
    pub power_enabled: bool,

    /// Level requested for the hilt command receiver.
    pub reception_enabled: bool,
}

impl BladeContext {
    /// Fresh context: blade off, Stock mode, command reception on.
    pub fn new() -> Self {
        Self {
            reception_enabled: true,
            ..Self::default()
        }
    }

    /// Records colors, brightness, ceiling, phase and color state.
    ///
    /// There is a single slot; a second backup overwrites the first.
    pub fn backup(&mut self) {
        let mut colors = [Srgb::new(0, 0, 0); SEGMENT_COUNT];
        let mut brightness = [0; SEGMENT_COUNT];
        let mut ceiling = [0; SEGMENT_COUNT];
        for i in 0..SEGMENT_COUNT {
            colors[i] = self.segments.color(i);
            brightness[i] = self.segments.raw_brightness(i);
            ceiling[i] = self.segments.raw_ceiling(i);
        }

        self.memento = Some(Memento {
            colors,
            brightness,
            ceiling,
            phase: self.state.phase,
            color_state: self.state.color_state,
        });
    }

    /// Puts back whatever the last [`backup`](Self::backup) recorded.
    ///
    /// Without a prior backup this does nothing. The slot stays filled, so
    /// restoring twice yields the same result.
    pub fn restore(&mut self) {
        let Some(memento) = self.memento else {
            return;
        };

        for i in 0..SEGMENT_COUNT {
            self.segments.set_segment_rgb(i, memento.colors[i]);
            self.segments.set_raw_brightness(i, memento.brightness[i]);
            self.segments.set_raw_ceiling(i, memento.ceiling[i]);
        }
        self.state.phase = memento.phase;
        self.state.color_state = memento.color_state;
    }

    /// Paints the blade with the current stock color.
    pub fn render_stock_color(&mut self) {
        let color_state = self.state.color_state;
        self.segments
            .render_color_from_table(color_state.palette.table(), color_state.index());
    }

    /// Paints the blade with the flash color matching the current stock color.
    pub fn render_clash_color(&mut self) {
        let color_state = self.state.color_state;
        self.segments
            .render_color_from_table(color_state.palette.clash_table(), color_state.index());
    }

    /// Signals that `state` was just overwritten from outside the engines.
    pub fn mark_state_loaded(&mut self) {
        self.state_loaded = true;
    }

    /// Consumes the state-loaded flag.
    pub fn take_state_loaded(&mut self) -> bool {
        core::mem::take(&mut self.state_loaded)
    }
}
