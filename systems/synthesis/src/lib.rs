#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure waveform synthesis: the target-wave evaluator and series synthesizer.
//!
//! Both entry points are total over all real phases and any well-formed
//! inputs, perform no I/O, and retain no state between calls. Callers are
//! expected to enforce term invariants (finite amplitudes, harmonics of at
//! least one) before invocation; violations are caller bugs, not runtime
//! errors.

use std::f32::consts::PI;

use harmonics_core::{Phase, TargetWave, Term};

/// Peak value of a unit-amplitude component, in display units.
///
/// Every waveform definition scales by this constant so the built-in shapes
/// and unit-amplitude sinusoids share the same nominal peak.
pub const AMPLITUDE_SCALE: f32 = 50.0;

/// Threshold the sine must exceed for the pulse wave's high plateau.
const PULSE_DUTY_THRESHOLD: f32 = 0.7;

/// Evaluates the target waveform at the provided phase.
///
/// The four built-in shapes follow fixed closed forms; the custom variant
/// sums its embedded terms exactly like [`synthesize`]. An empty custom term
/// list yields zero everywhere.
#[must_use]
pub fn evaluate(wave: &TargetWave, phase: Phase) -> f32 {
    match wave {
        TargetWave::Square => sign(phase.get().sin()) * AMPLITUDE_SCALE,
        TargetWave::Sawtooth => (phase.wrapped() / PI - 1.0) * 25.0,
        TargetWave::Triangle => ((phase.wrapped() - PI).abs() / PI - 0.5) * 100.0,
        TargetWave::Pulse => {
            if phase.get().sin() > PULSE_DUTY_THRESHOLD {
                AMPLITUDE_SCALE
            } else {
                -AMPLITUDE_SCALE
            }
        }
        TargetWave::Custom { terms } => synthesize(terms, phase),
    }
}

/// Sums the instantaneous values of the provided sinusoidal terms.
///
/// Computes `Σ amplitude * sin(frequency * phase) * 50` over the sequence in
/// order. An empty sequence yields `0`.
#[must_use]
pub fn synthesize(terms: &[Term], phase: Phase) -> f32 {
    terms.iter().fold(0.0, |sum, term| {
        sum + term.amplitude() * (term.frequency().get() as f32 * phase.get()).sin() * AMPLITUDE_SCALE
    })
}

/// Sign function with the mathematical zero case.
///
/// `f32::signum` maps `0.0` to `1.0`, but the square wave must yield exactly
/// zero at its crossings.
fn sign(value: f32) -> f32 {
    if value == 0.0 {
        0.0
    } else {
        value.signum()
    }
}

#[cfg(test)]
mod tests {
    use super::{evaluate, synthesize, AMPLITUDE_SCALE};
    use harmonics_core::{Harmonic, Phase, TargetWave, Term};
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    fn phases() -> impl Iterator<Item = Phase> {
        (0..256).map(|i| Phase::new(i as f32 / 256.0 * TAU))
    }

    #[test]
    fn square_only_emits_peak_values_or_zero() {
        for phase in phases() {
            let value = evaluate(&TargetWave::Square, phase);
            assert!(
                value == AMPLITUDE_SCALE || value == -AMPLITUDE_SCALE || value == 0.0,
                "unexpected square sample {value} at phase {}",
                phase.get()
            );
        }
    }

    #[test]
    fn square_is_zero_exactly_at_phase_zero() {
        assert_eq!(evaluate(&TargetWave::Square, Phase::ZERO), 0.0);
    }

    #[test]
    fn sawtooth_ramps_linearly_across_the_period() {
        assert_eq!(evaluate(&TargetWave::Sawtooth, Phase::ZERO), -25.0);
        let midpoint = evaluate(&TargetWave::Sawtooth, Phase::new(PI));
        assert!(midpoint.abs() < 1e-5);
        let near_end = evaluate(&TargetWave::Sawtooth, Phase::new(TAU - 1e-3));
        assert!(near_end > 24.9 && near_end < 25.0);
    }

    #[test]
    fn sawtooth_reduces_negative_phases_with_a_non_negative_remainder() {
        let negative = evaluate(&TargetWave::Sawtooth, Phase::new(-FRAC_PI_2));
        let canonical = evaluate(&TargetWave::Sawtooth, Phase::new(TAU - FRAC_PI_2));
        assert!((negative - canonical).abs() < 1e-4);
    }

    #[test]
    fn triangle_stays_within_its_peak_range() {
        for phase in phases() {
            let value = evaluate(&TargetWave::Triangle, phase);
            assert!((-AMPLITUDE_SCALE..=AMPLITUDE_SCALE).contains(&value));
        }
    }

    #[test]
    fn triangle_peaks_at_period_boundaries_and_troughs_at_the_midpoint() {
        assert_eq!(evaluate(&TargetWave::Triangle, Phase::ZERO), AMPLITUDE_SCALE);
        assert_eq!(
            evaluate(&TargetWave::Triangle, Phase::new(PI)),
            -AMPLITUDE_SCALE
        );
    }

    #[test]
    fn triangle_is_piecewise_linear_between_samples() {
        // Slope magnitude is 100/π everywhere away from the fold at π.
        let expected_slope = 100.0 / PI;
        let h = 1e-3;
        for raw in [0.5f32, 1.0, 2.0, 4.0, 5.5] {
            let left = evaluate(&TargetWave::Triangle, Phase::new(raw));
            let right = evaluate(&TargetWave::Triangle, Phase::new(raw + h));
            let slope = (right - left) / h;
            assert!(
                (slope.abs() - expected_slope).abs() < 0.5,
                "slope {slope} at phase {raw}"
            );
        }
    }

    #[test]
    fn triangle_repeats_with_the_canonical_period() {
        for phase in phases() {
            let base = evaluate(&TargetWave::Triangle, phase);
            let shifted = evaluate(&TargetWave::Triangle, Phase::new(phase.get() + TAU));
            assert!((base - shifted).abs() < 1e-3);
        }
    }

    #[test]
    fn pulse_is_narrower_than_the_square_wave() {
        let mut square_high = 0;
        let mut pulse_high = 0;
        for phase in phases() {
            if evaluate(&TargetWave::Square, phase) > 0.0 {
                square_high += 1;
            }
            if evaluate(&TargetWave::Pulse, phase) > 0.0 {
                pulse_high += 1;
            }
        }
        assert!(pulse_high > 0);
        assert!(pulse_high < square_high);
    }

    #[test]
    fn empty_term_sequence_synthesizes_to_zero() {
        for phase in phases() {
            assert_eq!(synthesize(&[], phase), 0.0);
        }
    }

    #[test]
    fn unit_fundamental_synthesizes_a_scaled_sine() {
        let terms = [Term::new(1.0, Harmonic::FUNDAMENTAL)];
        for phase in phases() {
            let expected = AMPLITUDE_SCALE * phase.get().sin();
            assert_eq!(synthesize(&terms, phase), expected);
        }
    }

    #[test]
    fn custom_target_matches_the_synthesizer_exactly() {
        let terms = vec![
            Term::new(0.8, Harmonic::FUNDAMENTAL),
            Term::new(-0.25, Harmonic::new(4)),
        ];
        let wave = TargetWave::Custom {
            terms: terms.clone(),
        };
        for phase in phases() {
            assert_eq!(evaluate(&wave, phase), synthesize(&terms, phase));
        }
    }

    #[test]
    fn evaluation_is_idempotent() {
        let wave = TargetWave::Custom {
            terms: vec![Term::new(1.3, Harmonic::new(7))],
        };
        let phase = Phase::new(2.318);
        assert_eq!(
            evaluate(&wave, phase).to_bits(),
            evaluate(&wave, phase).to_bits()
        );
    }
}
