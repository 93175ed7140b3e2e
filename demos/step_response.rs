//! Example of step response of a mass-spring-damper system under PID control
//! This example requires the `--features simulation` flag to be enabled.
//!
//! Prints `time,setpoint,control,output` as CSV on stdout; pipe it into your plotting tool of
//! choice.
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

#[cfg(feature = "simulation")]
pub fn main() {
    use nalgebra as na;

    use std::time::Duration;

    use tustin_pid::{
        pid::{DiscretePidFilter, PidConfigBuilder},
        sim,
        sim::SignalGenerator,
        time::{Millis, SampleClock},
    };

    const FIXED_STEP_SIZE_MS: u64 = 10;

    let cfg = PidConfigBuilder::default()
        .kp(10.0)
        .ki(25.0)
        .kd(1.0)
        .n(100.0)
        .output_limits(-20.0, 20.0)
        .build_checked();
    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Invalid PID config: {e}");
            return;
        }
    };
    let mut pid = DiscretePidFilter::from_config(cfg);
    let mut clock = SampleClock::new();

    let mut state = na::Vector2::<f64>::zeros();
    let mut output: f64 = 0.0;

    let mdl = sim::MassSpringDamper {
        natural_frequency: 0.5 * std::f64::consts::PI,
        damping_ratio: 0.2,
    };

    let square = SignalGenerator::new(sim::WaveForm::Square, Millis(0), 0.5, 0.5);

    println!("time,setpoint,control,output");
    let mut timestamp = Millis(0);
    for _ in 0..1000usize {
        let elapsed = clock.tick(timestamp);
        let setpoint = square.generate(timestamp);
        let control = pid.iterate(setpoint, output, elapsed);

        let step = Duration::from_millis(FIXED_STEP_SIZE_MS);
        state = sim::rk4_step(|x| mdl.f(x, control), state, step.as_secs_f64());
        output = mdl.h(state);

        println!(
            "{:.3},{setpoint:.4},{control:.4},{output:.4}",
            timestamp.0 as f64 / 1000.0
        );
        timestamp = timestamp + step;
    }
}

#[cfg(not(feature = "simulation"))]
fn main() {
    eprintln!("This example requires `--features simulation` to run.");
}
