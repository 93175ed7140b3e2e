#![warn(missing_docs)]

//! # Tustin PID Filter Library
//!
//! This library provides a discrete PID (Proportional-Integral-Derivative) filter in Rust, obtained
//! by discretizing a PID law with a first-order filtered derivative through the bilinear (Tustin)
//! transform.
//!
//! It includes both functional and stateful implementations, allowing users to choose the approach that best suits their needs.
//!
//! ## Features
//!
//! - A second-order recursive (biquad) filter whose coefficients are recomputed from the gains
//!   and the **elapsed time of every iteration**, so the control loop need not run at a fixed
//!   rate:
//!   - Elapsed times below a configurable minimum sample period (1ms by default) are floored to
//!     it, which keeps the coefficients finite on the first call or when the clock stalls.
//!
//! - Tuning that stays out of the way:
//!   - Gains, derivative filter coefficient and limits are plain values that may be changed at any
//!     time. Nothing is validated unless you ask for it.
//!   - Hard output clamping. There is no anti-windup beyond that.
//!
//! - `no_std` with optional `tracing` instrumentation.
//!
//! ## Usage
//!
//! ### Functional PID Filter
//!
//! The functional PID filter lets you explicitly manage the history of the filter.
//!
//! In exchange, the filter holds no mutable state and the `iterate` method is **functionally
//! pure**, making it exceptionally easy to test and validate, or to make thread-safe.
//!
//! ```rust
//! use core::time::Duration;
//!
//! use tustin_pid::pid::{FuncPidFilter, PidConfigBuilder, PidContext};
//!
//! let config = PidConfigBuilder::default()
//!     .kp(2.0)
//!     .ki(0.2)
//!     .output_limits(-10.0, 10.0)
//!     .build();
//! let pid = FuncPidFilter::new(config);
//! let context = PidContext::<f64>::new();
//!
//! let pos_feedback = 1.0;
//! let pos_setpoint = 2.0;
//!
//! let (output, updated_context) = pid.iterate(
//!     context,
//!     pos_setpoint,
//!     pos_feedback,
//!     Duration::from_millis(10),
//! );
//! assert_eq!(updated_context.output(), output);
//! ```
//!
//! ### Stateful PID Filter
//!
//! The stateful PID filter manages a `PidContext` internally. The filter **must** be `mut`.
//!
//! ```rust
//! use tustin_pid::pid::DiscretePidFilter;
//!
//! let mut pid = DiscretePidFilter::<f64>::new(1.0, 0.0, 0.0, 1.0, 10.0, -10.0);
//!
//! // Freely change the tuning; the change takes effect on the next iteration
//! pid.set_kp(2.0);
//!
//! // Elapsed time may be given as raw seconds too
//! let output = pid.iterate(5.0, 4.0, 0.01);
//! assert!((output - 2.0).abs() < 1e-12);
//! ```
//!
//! ### Feeding timestamps
//!
//! ``` rust
//! use tustin_pid::pid::DiscretePidFilter;
//! use tustin_pid::time::{Millis, SampleClock};
//!
//! let mut pid = DiscretePidFilter::<f64>::new(1.0, 1.0, 0.0, 100.0, 10.0, -10.0);
//! let mut clock = SampleClock::new();
//!
//! for ms in [0, 10, 20, 35] {
//!     // The first tick yields zero, which the filter floors to its minimum sample period
//!     let output = pid.iterate(1.0, 0.0, clock.tick(Millis(ms)));
//!     assert!(output > 0.0);
//! }
//! ```
//!
//! ## License
//!
//! MIT
#![no_std]

#[cfg(feature = "std")]
extern crate std;

/// The main module for the PID filter library.
pub mod pid;

/// The module containing elapsed-time inputs and timestamp utilities
pub mod time;

#[doc(hidden)]
#[cfg(feature = "simulation")]
pub mod sim;

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
