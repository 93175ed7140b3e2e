// Elapsed-time inputs for the filter and a helper turning timestamps into sample periods
// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use core::fmt::Debug;
use core::ops::Add;
use core::time::Duration;

use num_traits::float::FloatCore;
use num_traits::NumCast;

/// Anything that can be read as an elapsed time in seconds.
///
/// The filter floors whatever this yields to its minimum sample period, so implementations are
/// free to return zero, negative or even NaN values; they are never rejected.
pub trait IntoSeconds<F> {
    /// Returns the elapsed time in seconds
    fn into_seconds(self) -> F;
}

impl<F: FloatCore> IntoSeconds<F> for Duration {
    fn into_seconds(self) -> F {
        cast(self.as_secs_f64())
    }
}

/// Raw seconds; may be zero or negative
impl<F: FloatCore> IntoSeconds<F> for f64 {
    fn into_seconds(self) -> F {
        cast(self)
    }
}

/// Raw seconds; may be zero or negative
impl<F: FloatCore> IntoSeconds<F> for f32 {
    fn into_seconds(self) -> F {
        <F as NumCast>::from(self).unwrap_or_else(F::nan)
    }
}

// Float-to-float casts through NumCast never fail for f32/f64; NaN flows into the sample period
// floor if an exotic scalar type refuses the conversion.
pub(crate) fn cast<F: FloatCore>(value: f64) -> F {
    <F as NumCast>::from(value).unwrap_or_else(F::nan)
}

/// A trait for time-like objects that can be used to measure elapsed time.
/// [`SampleClock`] uses this trait to turn successive timestamps into the elapsed time fed to the
/// filter on every iteration.
pub trait InstantLike: Sized + Add<Duration, Output = Self> + Clone + Copy + Debug {
    /// Returns the amount of time elapsed from another instant to this one
    #[must_use]
    fn duration_since(&self, earlier: Self) -> Duration;
}

/// A wrapper around an unsigned 64-bit integer representing milliseconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Millis(pub u64);

impl InstantLike for Millis {
    fn duration_since(&self, earlier: Self) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Millis {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Millis(self.0 + rhs.as_millis() as u64)
    }
}

/// A wrapper around an unsigned 64-bit integer representing microseconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Micros(pub u64);

impl InstantLike for Micros {
    fn duration_since(&self, earlier: Self) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Micros {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Micros(self.0 + rhs.as_micros() as u64)
    }
}

/// Seconds since an arbitrary epoch
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeF64(pub f64);

impl InstantLike for TimeF64 {
    fn duration_since(&self, earlier: Self) -> Duration {
        let secs = self.0 - earlier.0;
        if secs > 0.0 && secs.is_finite() {
            Duration::from_secs_f64(secs)
        } else {
            Duration::ZERO // saturate
        }
    }
}

impl Add<Duration> for TimeF64 {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        TimeF64(self.0 + rhs.as_secs_f64())
    }
}

/// Turns the timestamps of successive control steps into the elapsed time between them.
///
/// The first tick has no predecessor and yields [`Duration::ZERO`], which the filter floors to its
/// minimum sample period. Time running backwards also yields zero for the wrappers in this module.
///
/// ```rust
/// use core::time::Duration;
/// use tustin_pid::time::{Millis, SampleClock};
///
/// let mut clock = SampleClock::new();
/// assert_eq!(clock.tick(Millis(100)), Duration::ZERO);
/// assert_eq!(clock.tick(Millis(112)), Duration::from_millis(12));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SampleClock<I: InstantLike> {
    last_time: Option<I>,
}

impl<I: InstantLike> Default for SampleClock<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: InstantLike> SampleClock<I> {
    /// Creates a clock that has not observed any timestamp yet
    pub fn new() -> Self {
        Self { last_time: None }
    }

    /// Records `now` and returns the time elapsed since the previous tick
    pub fn tick(&mut self, now: I) -> Duration {
        let elapsed = self
            .last_time
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last_time = Some(now);
        elapsed
    }

    /// Returns the timestamp of the last tick, if any
    pub fn last_time(&self) -> Option<I> {
        self.last_time
    }

    /// Forgets the last timestamp so the next tick yields zero again
    pub fn reset(&mut self) {
        self.last_time = None;
    }
}

/// A convenient wrapper around `std::time::Instant` satisfying the `InstantLike` trait.
#[cfg(feature = "std")]
mod std_instant {

    use super::{Add, Duration, InstantLike};

    /// `std::time::Instant` with an [`InstantLike`] implementation
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct StdInstant(pub std::time::Instant);

    impl StdInstant {
        /// Returns the current instant
        pub fn now() -> Self {
            StdInstant(std::time::Instant::now())
        }
    }

    impl InstantLike for StdInstant {
        fn duration_since(&self, other: Self) -> Duration {
            self.0.saturating_duration_since(other.0)
        }
    }

    impl Add<Duration> for StdInstant {
        type Output = Self;

        fn add(self, rhs: Duration) -> Self::Output {
            StdInstant(self.0 + rhs)
        }
    }

    /// Tests that StdInstant is just one constructor call away from std::time::Instant
    /// and calling duration_since is equivalent to calling the same method on the underlying Instant.
    #[cfg(test)]
    #[test]
    fn test_std_instant_wrapper() {
        let start = StdInstant::now();
        let end = StdInstant(std::time::Instant::now());
        let result = end.duration_since(start);
        let expected = end.0.duration_since(start.0);
        assert_eq!(result, expected);
    }
}

#[cfg(feature = "std")]
pub use std_instant::StdInstant;
