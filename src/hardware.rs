//! Hardware seam for the outputs the blade engine drives directly.

use crate::persist::{BLANK_IMAGE, IMAGE_LEN};

/// Trait for abstracting the blade controller's I/O.
///
/// Implement this over the pins and memory of your board. The blade only
/// calls the line setters when the requested level actually changes. None of
/// these methods can fail; handle hardware errors internally.
pub trait BladeHardware {
    /// Switches the regulator that powers the LED segments.
    fn set_power(&mut self, enabled: bool);

    /// Enables or disables the hilt data line receiver.
    fn set_command_reception(&mut self, enabled: bool);

    /// Writes a persisted state image to non-volatile memory.
    fn store_state(&mut self, image: &[u8; IMAGE_LEN]) {
        let _ = image;
    }

    /// Wipes persisted state back to defaults.
    fn erase_state(&mut self) {
        self.store_state(&BLANK_IMAGE);
    }
}
