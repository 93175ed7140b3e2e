// Tustin-discretized PID filter with a filtered derivative and output clamping
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

use num_traits::float::FloatCore;

use crate::time::{cast, IntoSeconds};

/// Minimum sample period, in seconds, assigned to every new configuration.
pub const DEFAULT_MIN_SAMPLE_PERIOD: f64 = 0.001;

/// Errors reported by [`PidConfig::validate`] and [`PidConfigBuilder::build_checked`].
///
/// The filter itself never produces these; it accepts any configuration and only clamps its
/// output. Validation is an opt-in sanity check for callers that want one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum PidConfigError {
    /// The upper output limit is below the lower output limit, or either limit is NaN.
    #[cfg_attr(
        feature = "std",
        error("Output upper limit must not be less than the lower limit, and neither may be NaN")
    )]
    InvertedOutputLimits,

    /// One of kp, ki or kd is NaN or infinite.
    #[cfg_attr(feature = "std", error("PID gains must be finite"))]
    NonFiniteGain,

    /// The derivative filter coefficient is NaN or infinite.
    #[cfg_attr(feature = "std", error("Derivative filter coefficient must be finite"))]
    NonFiniteFilterCoefficient,

    /// The minimum sample period is not strictly positive and finite.
    #[cfg_attr(
        feature = "std",
        error("Minimum sample period must be strictly positive and finite")
    )]
    InvalidMinSamplePeriod,
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for PidConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            PidConfigError::InvertedOutputLimits => {
                "Output upper limit must not be less than the lower limit, and neither may be NaN"
            }
            PidConfigError::NonFiniteGain => "PID gains must be finite",
            PidConfigError::NonFiniteFilterCoefficient => {
                "Derivative filter coefficient must be finite"
            }
            PidConfigError::InvalidMinSamplePeriod => {
                "Minimum sample period must be strictly positive and finite"
            }
        };
        f.write_str(msg)
    }
}

/// Tuning parameters of the filter.
///
/// Every field is a plain value: setters store what they are given and never reject anything.
/// A change takes effect from the next iteration; consider resetting the filter history after a
/// drastic change.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidConfig<F> {
    /// Proportional gain.
    kp: F,

    /// Integral gain.
    ki: F,

    /// Derivative gain.
    kd: F,

    /// Derivative filter coefficient. Smaller values filter the derivative term more heavily.
    n: F,

    /// Upper output limit.
    output_upper_limit: F,

    /// Lower output limit.
    output_lower_limit: F,

    /// Floor applied to the elapsed time of every iteration, in seconds.
    /// Defaults to 1ms.
    min_sample_period: F,
}

impl<F: FloatCore> Default for PidConfig<F> {
    /// Unit proportional gain, no integral or derivative action, a derivative filter coefficient
    /// of 100 and no output limits.
    fn default() -> Self {
        Self::new(
            F::one(),
            F::zero(),
            F::zero(),
            cast(100.0),
            F::infinity(),
            F::neg_infinity(),
        )
    }
}

impl<F: FloatCore> PidConfig<F> {
    /// Creates a configuration from the gains, the derivative filter coefficient and the output
    /// limits. Nothing is validated.
    pub fn new(kp: F, ki: F, kd: F, n: F, output_upper_limit: F, output_lower_limit: F) -> Self {
        Self {
            kp,
            ki,
            kd,
            n,
            output_upper_limit,
            output_lower_limit,
            min_sample_period: cast(DEFAULT_MIN_SAMPLE_PERIOD),
        }
    }

    /// Returns the proportional gain.
    pub fn kp(&self) -> F {
        self.kp
    }

    /// Returns the integral gain.
    pub fn ki(&self) -> F {
        self.ki
    }

    /// Returns the derivative gain.
    pub fn kd(&self) -> F {
        self.kd
    }

    /// Returns the derivative filter coefficient.
    pub fn n(&self) -> F {
        self.n
    }

    /// Convenience method that returns the proportional, integral, and derivative gains together as a tuple.
    pub fn gains(&self) -> (F, F, F) {
        (self.kp, self.ki, self.kd)
    }

    /// Returns the upper output limit.
    pub fn output_upper_limit(&self) -> F {
        self.output_upper_limit
    }

    /// Returns the lower output limit.
    pub fn output_lower_limit(&self) -> F {
        self.output_lower_limit
    }

    /// Returns the minimum sample period in seconds.
    pub fn min_sample_period(&self) -> F {
        self.min_sample_period
    }

    /// Sets the proportional gain.
    pub fn set_kp(&mut self, kp: F) {
        self.kp = kp;
    }

    /// Sets the integral gain.
    pub fn set_ki(&mut self, ki: F) {
        self.ki = ki;
    }

    /// Sets the derivative gain.
    pub fn set_kd(&mut self, kd: F) {
        self.kd = kd;
    }

    /// Sets the derivative filter coefficient.
    pub fn set_n(&mut self, n: F) {
        self.n = n;
    }

    /// Convenience method to set the proportional, integral, and derivative gains together
    pub fn set_gains(&mut self, kp: F, ki: F, kd: F) {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
    }

    /// Sets the upper output limit. It should be numerically greater than the lower limit.
    pub fn set_output_upper_limit(&mut self, output_upper_limit: F) {
        self.output_upper_limit = output_upper_limit;
    }

    /// Sets the lower output limit. It should be numerically less than the upper limit.
    pub fn set_output_lower_limit(&mut self, output_lower_limit: F) {
        self.output_lower_limit = output_lower_limit;
    }

    /// Sets both output limits at once. Infinite limits disable clamping on that side.
    pub fn set_output_limits(&mut self, output_lower_limit: F, output_upper_limit: F) {
        self.output_lower_limit = output_lower_limit;
        self.output_upper_limit = output_upper_limit;
    }

    /// Sets the minimum sample period in seconds.
    ///
    /// This guards the coefficient computation against a zero or vanishingly small elapsed time,
    /// which is easy to pass by mistake on the first iteration.
    pub fn set_min_sample_period(&mut self, min_sample_period: F) {
        self.min_sample_period = min_sample_period;
    }

    /// Checks the configuration for values that make the filter misbehave.
    ///
    /// The filter runs with any configuration regardless of the outcome of this check.
    pub fn validate(&self) -> Result<(), PidConfigError> {
        if !(self.kp.is_finite() && self.ki.is_finite() && self.kd.is_finite()) {
            return Err(PidConfigError::NonFiniteGain);
        }
        if !self.n.is_finite() {
            return Err(PidConfigError::NonFiniteFilterCoefficient);
        }
        if !(self.min_sample_period > F::zero() && self.min_sample_period.is_finite()) {
            return Err(PidConfigError::InvalidMinSamplePeriod);
        }
        // Also rejects NaN limits, since every comparison with NaN is false
        if !(self.output_upper_limit >= self.output_lower_limit) {
            return Err(PidConfigError::InvertedOutputLimits);
        }
        Ok(())
    }
}

/// Fluent builder for [`PidConfig`], starting from [`PidConfig::default`].
///
/// ```rust
/// use tustin_pid::pid::PidConfigBuilder;
///
/// let config = PidConfigBuilder::default()
///     .kp(2.0)
///     .ki(0.5)
///     .output_limits(-10.0, 10.0)
///     .build_checked()
///     .expect("Invalid PID config");
/// assert_eq!(config.gains(), (2.0, 0.5, 0.0));
/// ```
#[derive(Copy, Clone, Debug)]
pub struct PidConfigBuilder<F> {
    config: PidConfig<F>,
}

impl<F: FloatCore> Default for PidConfigBuilder<F> {
    fn default() -> Self {
        Self {
            config: PidConfig::default(),
        }
    }
}

impl<F: FloatCore> PidConfigBuilder<F> {
    /// Sets the proportional gain.
    pub fn kp(mut self, kp: F) -> Self {
        self.config.kp = kp;
        self
    }

    /// Sets the integral gain.
    pub fn ki(mut self, ki: F) -> Self {
        self.config.ki = ki;
        self
    }

    /// Sets the derivative gain.
    pub fn kd(mut self, kd: F) -> Self {
        self.config.kd = kd;
        self
    }

    /// Sets the derivative filter coefficient.
    pub fn n(mut self, n: F) -> Self {
        self.config.n = n;
        self
    }

    /// Sets the lower and upper output limits.
    pub fn output_limits(mut self, output_lower_limit: F, output_upper_limit: F) -> Self {
        self.config.output_lower_limit = output_lower_limit;
        self.config.output_upper_limit = output_upper_limit;
        self
    }

    /// Sets the minimum sample period in seconds.
    pub fn min_sample_period(mut self, min_sample_period: F) -> Self {
        self.config.min_sample_period = min_sample_period;
        self
    }

    /// Returns the configuration as-is.
    pub fn build(self) -> PidConfig<F> {
        self.config
    }

    /// Returns the configuration if it passes [`PidConfig::validate`].
    pub fn build_checked(self) -> Result<PidConfig<F>, PidConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Coefficients of the biquad obtained by discretizing
///
/// ```text
///                Ki      Kd·N·s
/// C(s) = Kp  +  ----  +  ------
///                s        s + N
/// ```
///
/// with the Tustin substitution `s = K·(z - 1)/(z + 1)`, `K = 2/Ts`, and clearing denominators.
///
/// They depend only on the configuration and the sample period, and are recomputed on every
/// iteration so that gain and period changes take effect immediately.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coefficients<F> {
    ts: F,
    k: F,
    b0: F,
    b1: F,
    b2: F,
    a0: F,
    a1: F,
    a2: F,
}

impl<F: FloatCore> Coefficients<F> {
    /// Derives the coefficients for an elapsed time of `elapsed` seconds.
    ///
    /// The elapsed time is floored to the configured minimum sample period; a NaN elapsed time is
    /// floored as well.
    pub fn compute(config: &PidConfig<F>, elapsed: F) -> Self {
        let ts = if elapsed >= config.min_sample_period {
            elapsed
        } else {
            config.min_sample_period
        };

        let PidConfig { kp, ki, kd, n, .. } = *config;
        let two = F::one() + F::one();
        let k = two / ts;
        let k_sq = k * k;

        // Evaluated term by term in expanded form; algebraically simpler forms round differently
        let b0 = k_sq * kp + k * ki + ki * n + k * kp * n + k_sq * kd * n;
        let b1 = two * ki * n - two * k_sq * kp - two * k_sq * kd * n;
        let b2 = k_sq * kp - k * ki + ki * n - k * kp * n + k_sq * kd * n;
        let a0 = k_sq + n * k;
        let a1 = -two * k_sq;
        let a2 = k_sq - k * n;

        Self {
            ts,
            k,
            b0,
            b1,
            b2,
            a0,
            a1,
            a2,
        }
    }

    /// Returns the sample period the coefficients were derived for, after flooring.
    pub fn sample_period(&self) -> F {
        self.ts
    }

    /// Returns the Tustin substitution constant `2/Ts`.
    pub fn k(&self) -> F {
        self.k
    }

    /// Returns `[b0, b1, b2]`, the coefficients applied to the error history.
    pub fn numerator(&self) -> [F; 3] {
        [self.b0, self.b1, self.b2]
    }

    /// Returns `[a0, a1, a2]`, the coefficients applied to the output history.
    pub fn denominator(&self) -> [F; 3] {
        [self.a0, self.a1, self.a2]
    }

    /// Applies the normalized recurrence to the aged histories, where `errors[0]` and `outputs[0]`
    /// are the newest samples and `outputs[0]` is about to be overwritten.
    fn apply(&self, errors: &[F; 3], outputs: &[F; 3]) -> F {
        let Self {
            b0,
            b1,
            b2,
            a0,
            a1,
            a2,
            ..
        } = *self;
        let [e0, e1, e2] = *errors;
        let [_, y1, y2] = *outputs;
        -a1 / a0 * y1 - a2 / a0 * y2 + b0 / a0 * e0 + b1 / a0 * e1 + b2 / a0 * e2
    }
}

/// The memory of the filter: the three most recent errors and outputs, newest first, plus the
/// coefficients used in the last iteration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidContext<F> {
    errors: [F; 3],
    outputs: [F; 3],
    coefficients: Option<Coefficients<F>>,
}

impl<F: FloatCore> Default for PidContext<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FloatCore> PidContext<F> {
    /// Creates a context with zeroed history.
    pub fn new() -> Self {
        Self {
            errors: [F::zero(); 3],
            outputs: [F::zero(); 3],
            coefficients: None,
        }
    }

    /// Returns the last (clamped) output, or zero before the first iteration.
    pub fn output(&self) -> F {
        self.outputs[0]
    }

    /// Returns the last error, or zero before the first iteration.
    pub fn error(&self) -> F {
        self.errors[0]
    }

    /// Returns `[e0, e1, e2]`, newest first.
    pub fn errors(&self) -> [F; 3] {
        self.errors
    }

    /// Returns `[y0, y1, y2]`, newest first.
    pub fn outputs(&self) -> [F; 3] {
        self.outputs
    }

    /// Returns the coefficients used by the last iteration; `None` until the first iteration and
    /// after a reset.
    pub fn coefficients(&self) -> Option<Coefficients<F>> {
        self.coefficients
    }

    /// Zeroes the error and output history.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// A functional implementation of the Tustin PID filter.
///
/// The filter holds only its configuration; the history lives in a [`PidContext`] that is passed
/// into and returned from every call to [`iterate`](Self::iterate), which is therefore pure.
#[derive(Copy, Clone, Debug)]
pub struct FuncPidFilter<F> {
    config: PidConfig<F>,
}

impl<F: FloatCore> FuncPidFilter<F> {
    /// Creates a filter with the given configuration.
    pub fn new(config: PidConfig<F>) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PidConfig<F> {
        &self.config
    }

    /// Returns the configuration for tuning.
    pub fn config_mut(&mut self) -> &mut PidConfig<F> {
        &mut self.config
    }

    /// Computes the next control output.
    ///
    /// # Arguments
    /// - `ctx`: The history left by the previous call.
    /// - `set_point`: The desired value.
    /// - `process_value`: The measured value, in the same units as `set_point`.
    /// - `elapsed`: The time since the previous call. Anything below the minimum sample period,
    ///   including zero, negative or NaN values, is floored to it.
    ///
    /// # Returns
    /// The output clamped to the configured limits, and the updated history.
    pub fn iterate(
        &self,
        mut ctx: PidContext<F>,
        set_point: F,
        process_value: F,
        elapsed: impl IntoSeconds<F>,
    ) -> (F, PidContext<F>) {
        let coefficients = Coefficients::compute(&self.config, elapsed.into_seconds());

        let [e0, e1, _] = ctx.errors;
        ctx.errors = [set_point - process_value, e0, e1];
        let [y0, y1, _] = ctx.outputs;
        ctx.outputs = [y0, y0, y1];

        let raw_output = coefficients.apply(&ctx.errors, &ctx.outputs);
        let output = self.clamp_output(raw_output);

        #[cfg(feature = "tracing")]
        {
            tracing::trace!(
                ts = to_f64(coefficients.ts),
                error = to_f64(ctx.errors[0]),
                raw_output = to_f64(raw_output),
                output = to_f64(output),
                "pid filter iteration"
            );
            if output != raw_output {
                tracing::debug!(
                    raw_output = to_f64(raw_output),
                    output = to_f64(output),
                    "pid filter output clamped"
                );
            }
        }

        ctx.outputs[0] = output;
        ctx.coefficients = Some(coefficients);
        (output, ctx)
    }

    // Upper limit is checked first; with inverted limits the result depends on this order.
    fn clamp_output(&self, output: F) -> F {
        if output > self.config.output_upper_limit {
            self.config.output_upper_limit
        } else if output < self.config.output_lower_limit {
            self.config.output_lower_limit
        } else {
            output
        }
    }
}

#[cfg(feature = "tracing")]
fn to_f64<F: FloatCore>(value: F) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// A stateful implementation of the Tustin PID filter.
///
/// This struct owns its history and forwards every iteration to a [`FuncPidFilter`], so it is
/// numerically identical to threading a [`PidContext`] through the functional filter by hand.
///
/// ```rust
/// use core::time::Duration;
/// use tustin_pid::pid::DiscretePidFilter;
///
/// let mut pid = DiscretePidFilter::<f64>::new(1.0, 0.5, 0.0, 100.0, 10.0, -10.0);
/// let output = pid.iterate(5.0, 0.0, Duration::from_millis(10));
/// assert!(output > 5.0 && output <= 10.0);
///
/// pid.reset();
/// assert_eq!(pid.context().outputs(), [0.0; 3]);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct DiscretePidFilter<F> {
    ctx: PidContext<F>,
    filter: FuncPidFilter<F>,
}

impl<F: FloatCore> DiscretePidFilter<F> {
    /// Creates a filter with zeroed history and the default minimum sample period of 1ms.
    ///
    /// Nothing is validated: signs of the gains, ordering of the limits and positivity of `n`
    /// are the caller's responsibility.
    pub fn new(kp: F, ki: F, kd: F, n: F, output_upper_limit: F, output_lower_limit: F) -> Self {
        Self::from_config(PidConfig::new(
            kp,
            ki,
            kd,
            n,
            output_upper_limit,
            output_lower_limit,
        ))
    }

    /// Creates a filter with zeroed history from an existing configuration.
    pub fn from_config(config: PidConfig<F>) -> Self {
        Self {
            ctx: PidContext::new(),
            filter: FuncPidFilter::new(config),
        }
    }

    /// Returns a filter with `config` that carries forward the current history.
    pub fn with_config(self, config: PidConfig<F>) -> Self {
        Self {
            ctx: self.ctx,
            filter: FuncPidFilter::new(config),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PidConfig<F> {
        self.filter.config()
    }

    /// Returns the configuration for tuning.
    pub fn config_mut(&mut self) -> &mut PidConfig<F> {
        self.filter.config_mut()
    }

    /// Returns the history.
    pub fn context(&self) -> &PidContext<F> {
        &self.ctx
    }

    /// Returns the last output, or zero before the first iteration.
    pub fn output(&self) -> F {
        self.ctx.output()
    }

    /// Returns the coefficients used by the last iteration.
    pub fn coefficients(&self) -> Option<Coefficients<F>> {
        self.ctx.coefficients()
    }

    /// Computes the next control output. Call this once per control step.
    ///
    /// See [`FuncPidFilter::iterate`].
    pub fn iterate(&mut self, set_point: F, process_value: F, elapsed: impl IntoSeconds<F>) -> F {
        let (output, ctx) = self
            .filter
            .iterate(self.ctx, set_point, process_value, elapsed);
        self.ctx = ctx;
        output
    }

    /// Zeroes the error and output history, keeping the configuration.
    pub fn reset(&mut self) {
        self.ctx.reset();
        #[cfg(feature = "tracing")]
        tracing::debug!("pid filter history reset");
    }

    /// Returns the proportional gain.
    pub fn kp(&self) -> F {
        self.config().kp()
    }

    /// Returns the integral gain.
    pub fn ki(&self) -> F {
        self.config().ki()
    }

    /// Returns the derivative gain.
    pub fn kd(&self) -> F {
        self.config().kd()
    }

    /// Returns the derivative filter coefficient.
    pub fn n(&self) -> F {
        self.config().n()
    }

    /// Returns the minimum sample period in seconds.
    pub fn min_sample_period(&self) -> F {
        self.config().min_sample_period()
    }

    /// Returns the upper output limit.
    pub fn output_upper_limit(&self) -> F {
        self.config().output_upper_limit()
    }

    /// Returns the lower output limit.
    pub fn output_lower_limit(&self) -> F {
        self.config().output_lower_limit()
    }

    /// Sets the proportional gain. Consider resetting the filter after a drastic change.
    pub fn set_kp(&mut self, kp: F) {
        self.config_mut().set_kp(kp);
    }

    /// Sets the integral gain. Consider resetting the filter after a drastic change.
    pub fn set_ki(&mut self, ki: F) {
        self.config_mut().set_ki(ki);
    }

    /// Sets the derivative gain. Consider resetting the filter after a drastic change.
    pub fn set_kd(&mut self, kd: F) {
        self.config_mut().set_kd(kd);
    }

    /// Sets the derivative filter coefficient. Consider resetting the filter after a drastic
    /// change.
    pub fn set_n(&mut self, n: F) {
        self.config_mut().set_n(n);
    }

    /// Sets the minimum sample period in seconds.
    pub fn set_min_sample_period(&mut self, min_sample_period: F) {
        self.config_mut().set_min_sample_period(min_sample_period);
    }

    /// Sets the upper output limit.
    pub fn set_output_upper_limit(&mut self, output_upper_limit: F) {
        self.config_mut().set_output_upper_limit(output_upper_limit);
    }

    /// Sets the lower output limit.
    pub fn set_output_lower_limit(&mut self, output_lower_limit: F) {
        self.config_mut().set_output_lower_limit(output_lower_limit);
    }
}
