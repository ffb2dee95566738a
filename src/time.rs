//! Millisecond clock abstraction and deadline bookkeeping.

/// A point on the free-running millisecond counter.
///
/// The counter wraps after roughly 49 days; every comparison in this crate
/// goes through wrapping arithmetic, so instants deliberately don't implement
/// `PartialOrd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl Millis {
    /// The counter value at boot.
    pub const ZERO: Self = Millis(0);

    /// Returns the instant `millis` after this one.
    #[inline]
    pub const fn wrapping_add(self, millis: u32) -> Self {
        Millis(self.0.wrapping_add(millis))
    }

    /// Milliseconds elapsed since an earlier instant.
    #[inline]
    pub const fn elapsed_since(self, earlier: Millis) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// True once this instant is at or past `deadline`.
    ///
    /// Valid as long as the two instants are less than ~24 days apart.
    #[inline]
    pub const fn has_reached(self, deadline: Millis) -> bool {
        (self.0.wrapping_sub(deadline.0) as i32) >= 0
    }
}

/// Source of the monotonic millisecond counter.
///
/// Implement this over the hardware timer that maintains the tick count.
pub trait TimeSource {
    /// Returns the current counter value.
    fn now(&self) -> Millis;
}

/// An optional point in time after which a component acts again.
///
/// An unset deadline is always due, which is how a freshly entered phase or
/// a re-armed effect gets serviced on the very next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Deadline(Option<Millis>);

impl Deadline {
    /// A deadline that is already due.
    pub const NOW: Self = Deadline(None);

    /// Arms the deadline `millis` after `now`.
    #[inline]
    pub fn arm(&mut self, now: Millis, millis: u32) {
        self.0 = Some(now.wrapping_add(millis));
    }

    /// Pushes an armed deadline further out; an unset deadline is armed from `now`.
    #[inline]
    pub fn extend(&mut self, now: Millis, millis: u32) {
        let base = self.0.unwrap_or(now);
        self.0 = Some(base.wrapping_add(millis));
    }

    /// Makes the deadline due immediately.
    #[inline]
    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// True when unset or when `now` has reached the armed instant.
    #[inline]
    pub fn is_due(&self, now: Millis) -> bool {
        match self.0 {
            None => true,
            Some(at) => now.has_reached(at),
        }
    }

    /// The armed instant, if any.
    #[inline]
    pub fn at(&self) -> Option<Millis> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_reached_survives_counter_wrap() {
        let deadline = Millis(u32::MAX - 10).wrapping_add(40);
        assert!(!Millis(u32::MAX - 5).has_reached(deadline));
        assert!(Millis(29).has_reached(deadline));
        assert!(Millis(100).has_reached(deadline));
    }

    #[test]
    fn unset_deadline_is_due() {
        let deadline = Deadline::NOW;
        assert!(deadline.is_due(Millis(0)));
        assert!(deadline.is_due(Millis(3_000_000_000)));
    }

    #[test]
    fn extend_accumulates_from_armed_instant() {
        let mut deadline = Deadline::default();
        deadline.arm(Millis(1000), 85);
        deadline.extend(Millis(1000), 680);
        assert_eq!(deadline.at(), Some(Millis(1765)));
        assert!(!deadline.is_due(Millis(1764)));
        assert!(deadline.is_due(Millis(1765)));
    }
}
