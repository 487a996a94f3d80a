use embassy_time::Instant;

/// A monotonic clock fine enough to time a sort in microseconds.
///
/// The polling loop passes `now` into every tick; this is only consulted by handlers
/// that measure work done inside a single tick.
pub trait Timebase {
    fn now(&self) -> Instant;
}

impl<T: Timebase + ?Sized> Timebase for &T {
    fn now(&self) -> Instant {
        (**self).now()
    }
}
