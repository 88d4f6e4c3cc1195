use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

/// Waveform shapes the generator can produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::Sawtooth,
    ];

    /// Name used on the wire in `PARAM=` lines.
    pub fn wire_name(self) -> &'static str {
        match self {
            Waveform::Sine => "sin",
            Waveform::Square => "square",
            Waveform::Triangle => "triangle",
            Waveform::Sawtooth => "saw",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for Waveform {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sin" => Ok(Waveform::Sine),
            "square" => Ok(Waveform::Square),
            "triangle" => Ok(Waveform::Triangle),
            "saw" => Ok(Waveform::Sawtooth),
            _ => Err(()),
        }
    }
}

/// Evaluates one waveform sample at the given phase (radians), in [-1, 1].
///
/// The phase is folded into [0, 2pi) for the piecewise shapes; negative
/// phases wrap forward. Sine and square use the raw phase, which is
/// equivalent since both are periodic in 2pi.
pub fn wave_value(kind: Waveform, phase_rad: f64) -> f64 {
    let t = phase_rad.rem_euclid(TAU) / TAU; // 0..1
    match kind {
        Waveform::Sine => phase_rad.sin(),
        Waveform::Square => {
            if phase_rad.sin() >= 0.0 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Triangle => {
            // 0 -> 1 -> -1 -> 0 over one period, starting at 0.
            if t < 0.25 {
                4.0 * t
            } else if t < 0.75 {
                2.0 - 4.0 * t
            } else {
                -4.0 + 4.0 * t
            }
        }
        Waveform::Sawtooth => 2.0 * t - 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn sine_starts_at_zero() {
        assert_eq!(wave_value(Waveform::Sine, 0.0), 0.0);
        assert!((wave_value(Waveform::Sine, PI / 2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn square_is_high_on_positive_half() {
        assert_eq!(wave_value(Waveform::Square, 0.001), 1.0);
        assert_eq!(wave_value(Waveform::Square, 0.0), 1.0);
        assert_eq!(wave_value(Waveform::Square, PI + 0.001), -1.0);
    }

    #[test]
    fn triangle_corners() {
        assert_eq!(wave_value(Waveform::Triangle, 0.0), 0.0);
        assert!((wave_value(Waveform::Triangle, TAU * 0.25) - 1.0).abs() < 1e-12);
        assert!((wave_value(Waveform::Triangle, TAU * 0.5)).abs() < 1e-12);
        assert!((wave_value(Waveform::Triangle, TAU * 0.75) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn sawtooth_ramps_from_minus_one() {
        assert_eq!(wave_value(Waveform::Sawtooth, 0.0), -1.0);
        assert!((wave_value(Waveform::Sawtooth, TAU * 0.5)).abs() < 1e-12);
    }

    #[test]
    fn negative_phase_wraps_forward() {
        let a = wave_value(Waveform::Sawtooth, -TAU * 0.25);
        let b = wave_value(Waveform::Sawtooth, TAU * 0.75);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn wire_names_round_trip() {
        for kind in Waveform::ALL {
            assert_eq!(kind.wire_name().parse::<Waveform>(), Ok(kind));
        }
        assert!("noise".parse::<Waveform>().is_err());
    }
}
