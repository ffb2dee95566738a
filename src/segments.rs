//! Per-segment color and brightness arrays.
//!
//! Each of the four segments carries an RGB value plus two brightness inputs:
//! the *current* brightness that display effects write, and a *ceiling* the
//! ignition/extinguish ramps animate. The renderer only ever sees the
//! *derived* brightness, `current * ceiling / 255`, recomputed once per tick.

use crate::colors::{BLACK, ColorTable, color_by_hue};
use core::cell::Cell;
use critical_section::Mutex;
use palette::Srgb;

/// Number of addressable zones along the blade.
pub const SEGMENT_COUNT: usize = 4;

/// Raw brightness corresponding to 100 %.
pub const MAX_BRIGHTNESS: u8 = 255;

/// Converts a percentage to the raw 0-255 scale, clamping at 100 %.
#[inline]
pub const fn percent_to_raw(percent: u8) -> u8 {
    let percent = if percent > 100 { 100 } else { percent };
    (percent as u16 * MAX_BRIGHTNESS as u16 / 100) as u8
}

/// How the PWM stage multiplexes the segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderMode {
    /// All segments share one color; only brightness differs.
    #[default]
    SingleColor,

    /// Every segment is driven with its own color.
    MultiColor,
}

/// A complete, self-consistent snapshot handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentFrame {
    pub colors: [Srgb<u8>; SEGMENT_COUNT],
    pub brightness: [u8; SEGMENT_COUNT],
    pub render_mode: RenderMode,
}

impl SegmentFrame {
    /// All segments black at zero brightness.
    pub const DARK: Self = SegmentFrame {
        colors: [BLACK; SEGMENT_COUNT],
        brightness: [0; SEGMENT_COUNT],
        render_mode: RenderMode::SingleColor,
    };
}

impl Default for SegmentFrame {
    fn default() -> Self {
        Self::DARK
    }
}

/// Color and brightness state for all four segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segments {
    colors: [Srgb<u8>; SEGMENT_COUNT],
    brightness: [u8; SEGMENT_COUNT],
    ceiling: [u8; SEGMENT_COUNT],
    derived: [u8; SEGMENT_COUNT],
    render_mode: RenderMode,
}

impl Default for Segments {
    fn default() -> Self {
        Self::new()
    }
}

impl Segments {
    /// Power-up contents: a red/green/blue/white test pattern at full current
    /// brightness behind a closed ceiling.
    pub const fn new() -> Self {
        Self {
            colors: [
                Srgb::new(255, 0, 0),
                Srgb::new(0, 255, 0),
                Srgb::new(0, 0, 255),
                Srgb::new(255, 255, 255),
            ],
            brightness: [MAX_BRIGHTNESS; SEGMENT_COUNT],
            ceiling: [0; SEGMENT_COUNT],
            derived: [0; SEGMENT_COUNT],
            render_mode: RenderMode::SingleColor,
        }
    }

    #[inline]
    const fn wrap(segment: usize) -> usize {
        segment % SEGMENT_COUNT
    }

    /// Sets one segment's color; the index wraps at the segment count.
    pub fn set_segment_color(&mut self, segment: usize, red: u8, green: u8, blue: u8) {
        self.colors[Self::wrap(segment)] = Srgb::new(red, green, blue);
    }

    /// Sets one segment's color from a palette value.
    pub fn set_segment_rgb(&mut self, segment: usize, color: Srgb<u8>) {
        self.colors[Self::wrap(segment)] = color;
    }

    /// Writes the same color to every segment.
    pub fn set_blade_rgb(&mut self, color: Srgb<u8>) {
        self.colors = [color; SEGMENT_COUNT];
    }

    /// Sets one segment's current brightness in percent (clamped to 100).
    pub fn set_segment_brightness(&mut self, segment: usize, percent: u8) {
        self.brightness[Self::wrap(segment)] = percent_to_raw(percent);
    }

    /// Sets every segment's current brightness in percent.
    pub fn set_blade_brightness(&mut self, percent: u8) {
        self.brightness = [percent_to_raw(percent); SEGMENT_COUNT];
    }

    /// Sets one segment's ceiling brightness in percent (clamped to 100).
    pub fn set_segment_ceiling(&mut self, segment: usize, percent: u8) {
        self.ceiling[Self::wrap(segment)] = percent_to_raw(percent);
    }

    /// Sets every segment's ceiling brightness in percent.
    pub fn set_blade_ceiling(&mut self, percent: u8) {
        self.ceiling = [percent_to_raw(percent); SEGMENT_COUNT];
    }

    /// Raw current brightness of one segment.
    #[inline]
    pub fn raw_brightness(&self, segment: usize) -> u8 {
        self.brightness[Self::wrap(segment)]
    }

    /// Writes a raw current brightness, bypassing the percent scale.
    ///
    /// Procedural effects work directly on the 0-255 scale.
    #[inline]
    pub fn set_raw_brightness(&mut self, segment: usize, raw: u8) {
        self.brightness[Self::wrap(segment)] = raw;
    }

    /// Raw ceiling brightness of one segment.
    #[inline]
    pub fn raw_ceiling(&self, segment: usize) -> u8 {
        self.ceiling[Self::wrap(segment)]
    }

    #[inline]
    pub fn set_raw_ceiling(&mut self, segment: usize, raw: u8) {
        self.ceiling[Self::wrap(segment)] = raw;
    }

    /// Paints every segment with one entry of a stock table.
    pub fn render_color_from_table(&mut self, table: ColorTable, index: u8) {
        self.set_blade_rgb(table.lookup(index).rgb());
    }

    /// Paints one segment with a point on the hue wheel.
    pub fn set_segment_hue(&mut self, segment: usize, hue: u8) {
        self.set_segment_rgb(segment, color_by_hue(hue));
    }

    /// Paints every segment with the same point on the hue wheel.
    pub fn set_blade_hue(&mut self, hue: u8) {
        self.set_blade_rgb(color_by_hue(hue));
    }

    /// Blacks out all segment colors.
    pub fn clear(&mut self) {
        self.set_blade_rgb(BLACK);
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    #[inline]
    pub fn color(&self, segment: usize) -> Srgb<u8> {
        self.colors[Self::wrap(segment)]
    }

    /// Brightness as last computed by [`update_derived`](Self::update_derived).
    #[inline]
    pub fn derived(&self) -> &[u8; SEGMENT_COUNT] {
        &self.derived
    }

    /// Recomputes the brightness the renderer sees from current and ceiling.
    ///
    /// The product is scaled back by 255, so the result never exceeds
    /// either input.
    pub fn update_derived(&mut self) {
        for i in 0..SEGMENT_COUNT {
            let product = self.brightness[i] as u16 * self.ceiling[i] as u16;
            self.derived[i] = (product / MAX_BRIGHTNESS as u16) as u8;
        }
    }

    /// Snapshot of everything the renderer consumes.
    pub fn frame(&self) -> SegmentFrame {
        SegmentFrame {
            colors: self.colors,
            brightness: self.derived,
            render_mode: self.render_mode,
        }
    }
}

/// Hands complete [`SegmentFrame`]s from the tick to the PWM interrupt.
///
/// Both sides go through a critical section, so the renderer never observes a
/// color without its matching brightness.
pub struct FrameCell {
    inner: Mutex<Cell<SegmentFrame>>,
}

impl FrameCell {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(SegmentFrame::DARK)),
        }
    }

    /// Replaces the published frame.
    pub fn publish(&self, frame: SegmentFrame) {
        critical_section::with(|cs| self.inner.borrow(cs).set(frame));
    }

    /// Copy of the most recently published frame.
    pub fn read(&self) -> SegmentFrame {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }
}

impl Default for FrameCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_scale_endpoints() {
        assert_eq!(percent_to_raw(0), 0);
        assert_eq!(percent_to_raw(50), 127);
        assert_eq!(percent_to_raw(100), 255);
        assert_eq!(percent_to_raw(250), 255);
    }

    #[test]
    fn derived_is_product_of_inputs() {
        let mut segments = Segments::new();
        segments.set_blade_brightness(100);
        segments.set_segment_ceiling(0, 100);
        segments.set_segment_ceiling(1, 50);
        segments.update_derived();
        assert_eq!(segments.derived(), &[255, 127, 0, 0]);
    }

    #[test]
    fn frame_cell_returns_published_copy() {
        let cell = FrameCell::new();
        assert_eq!(cell.read(), SegmentFrame::DARK);

        let mut segments = Segments::new();
        segments.set_blade_ceiling(100);
        segments.update_derived();
        cell.publish(segments.frame());
        assert_eq!(cell.read().brightness, [255; SEGMENT_COUNT]);
        assert_eq!(cell.read().colors[3], Srgb::new(255, 255, 255));
    }
}
