use std::f64::consts::TAU;

use super::waveform::{wave_value, Waveform};

/// Generator settings, edited by the GUI and read by the tick loop.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorParams {
    pub amplitude: f64,
    pub frequency_hz: f64,
    pub dc_offset: f64,
    pub waveform: Waveform,
    /// Samples per second, >= 1.
    pub sample_rate_hz: u32,
    /// Samples serialized per outbound line, >= 1.
    pub packet_samples: usize,
    /// When false, ticks announce the parameters instead of sample data.
    pub send_samples: bool,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            frequency_hz: 1.0,
            dc_offset: 0.0,
            waveform: Waveform::Sine,
            sample_rate_hz: 50,
            packet_samples: 10,
            send_samples: true,
        }
    }
}

impl GeneratorParams {
    /// Timer period for one tick. Integer milliseconds cannot represent
    /// rates above 1 kHz exactly; the interval clamps to 1 ms there.
    pub fn tick_interval_ms(&self) -> u64 {
        let ms = (1000.0 / self.sample_rate_hz.max(1) as f64).round() as u64;
        ms.max(1)
    }
}

/// Phase/time state owned by the generator between ticks.
#[derive(Clone, Debug, Default)]
pub struct GeneratorState {
    pub elapsed_secs: f64,
}

impl GeneratorState {
    /// Called on every generator (re)start; never on stop.
    pub fn reset(&mut self) {
        self.elapsed_secs = 0.0;
    }
}

/// Produces one outbound protocol line and advances elapsed time by
/// `packet_samples / sample_rate_hz`.
///
/// With `send_samples` set the line is `OUT=1,<s1>,...,<sn>` (channel index
/// fixed to 1, samples at 4 decimal places). Otherwise it is a
/// `PARAM=<amp>,<freq>,<dc>,<wave>` announcement, but the sample loop still
/// runs so phase stays continuous when sample sending is toggled back on.
pub fn generate_tick(params: &GeneratorParams, state: &mut GeneratorState) -> String {
    let dt = 1.0 / params.sample_rate_hz.max(1) as f64;

    let mut samples = Vec::with_capacity(params.packet_samples);
    for _ in 0..params.packet_samples {
        let phase = TAU * params.frequency_hz * state.elapsed_secs;
        let value = params.dc_offset + params.amplitude * wave_value(params.waveform, phase);
        samples.push(format!("{value:.4}"));
        state.elapsed_secs += dt;
    }

    if params.send_samples {
        format!("OUT=1,{}", samples.join(","))
    } else {
        format!(
            "PARAM={:.4},{:.4},{:.4},{}",
            params.amplitude, params.frequency_hz, params.dc_offset, params.waveform
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::protocol::{parse_line, ParsedLine};

    fn params() -> GeneratorParams {
        GeneratorParams {
            amplitude: 2.0,
            frequency_hz: 5.0,
            dc_offset: 0.5,
            waveform: Waveform::Sine,
            sample_rate_hz: 100,
            packet_samples: 8,
            send_samples: true,
        }
    }

    #[test]
    fn out_line_round_trips_through_parser() {
        let mut state = GeneratorState::default();
        let line = generate_tick(&params(), &mut state);
        assert!(line.starts_with("OUT=1,"));

        let ParsedLine::OutSamples(values) = parse_line(&line) else {
            panic!("generated line did not parse as OUT: {line}");
        };
        assert_eq!(values.len(), 8);

        // Values must equal the generated ones modulo 4-decimal rounding.
        let p = params();
        for (i, v) in values.iter().enumerate() {
            let phase = TAU * p.frequency_hz * (i as f64 / p.sample_rate_hz as f64);
            let expected = p.dc_offset + p.amplitude * wave_value(p.waveform, phase);
            assert!(
                (v - expected).abs() < 5e-5,
                "sample {i}: {v} vs {expected}"
            );
        }
    }

    #[test]
    fn param_line_is_not_chartable() {
        let mut state = GeneratorState::default();
        let mut p = params();
        p.send_samples = false;
        p.waveform = Waveform::Sawtooth;
        let line = generate_tick(&p, &mut state);
        assert_eq!(line, "PARAM=2.0000,5.0000,0.5000,saw");
        assert_eq!(parse_line(&line), ParsedLine::Unrecognized);
    }

    #[test]
    fn elapsed_time_advances_regardless_of_mode() {
        for send_samples in [true, false] {
            let mut p = params();
            p.send_samples = send_samples;
            let mut state = GeneratorState::default();
            generate_tick(&p, &mut state);
            let expected = p.packet_samples as f64 / p.sample_rate_hz as f64;
            assert!((state.elapsed_secs - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn restart_resets_elapsed_time() {
        let mut state = GeneratorState::default();
        generate_tick(&params(), &mut state);
        assert!(state.elapsed_secs > 0.0);
        state.reset();
        assert_eq!(state.elapsed_secs, 0.0);
    }

    #[test]
    fn tick_interval_rounds_and_clamps() {
        let mut p = params();
        p.sample_rate_hz = 50;
        assert_eq!(p.tick_interval_ms(), 20);
        p.sample_rate_hz = 3;
        assert_eq!(p.tick_interval_ms(), 333);
        p.sample_rate_hz = 5000;
        assert_eq!(p.tick_interval_ms(), 1);
    }

    #[test]
    fn samples_are_fixed_point_not_scientific() {
        let mut p = params();
        p.amplitude = 1e6;
        let mut state = GeneratorState::default();
        let line = generate_tick(&p, &mut state);
        assert!(!line.contains('e') && !line.contains('E'), "{line}");
    }
}
