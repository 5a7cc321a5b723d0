#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scoring system that grades the approximation against the target wave.
//!
//! The grade is derived from the root-mean-square error between the two
//! waveforms sampled at a fixed number of phase points across one period,
//! rescaled and inverted into a `[0, 100]` similarity percentage. The
//! normalization denominator is the sum of the nominal peak amplitudes of
//! both waveforms; that bound is a heuristic inherited from the scoring
//! rules this engine must stay compatible with, so it is preserved verbatim
//! rather than replaced with a tight worst-case RMSE bound.

use std::f64::consts::TAU;

use harmonics_core::{Command, Event, Phase, Score, TargetWave, Term};
use harmonics_system_synthesis::{evaluate, synthesize, AMPLITUDE_SCALE};

/// Number of phase points sampled across one period when grading.
pub const DEFAULT_SAMPLE_COUNT: usize = 100;

/// Grades how closely the term sequence approximates the target wave.
///
/// Samples both waveforms at `sample_count` evenly spaced phases in
/// `[0, 2π)`, computes the RMSE of the pointwise differences, normalizes it
/// by the combined nominal peaks of both waveforms, and rounds the inverted
/// percentage to the nearest integer (halves away from zero) clamped to
/// `[0, 100]`.
///
/// When both waveforms are identically zero across all terms the
/// normalization denominator vanishes; that degenerate case is defined as a
/// perfect match and returns `100` rather than propagating a division by
/// zero. A `sample_count` of zero degenerates the same way.
#[must_use]
pub fn score(target: &TargetWave, terms: &[Term], sample_count: usize) -> Score {
    let max_possible_error = target_peak(target) + combined_peak(terms);
    if max_possible_error == 0.0 || sample_count == 0 {
        return Score::PERFECT;
    }

    let mut total_squared_error = 0.0f64;
    for i in 0..sample_count {
        let phase = Phase::new((i as f64 / sample_count as f64 * TAU) as f32);
        let difference = f64::from(evaluate(target, phase)) - f64::from(synthesize(terms, phase));
        total_squared_error += difference * difference;
    }

    let rmse = (total_squared_error / sample_count as f64).sqrt();
    let normalized = 100.0 * (1.0 - rmse / max_possible_error);
    Score::new(normalized.clamp(0.0, 100.0).round() as u8)
}

/// Nominal peak amplitude of the target wave in display units.
///
/// The four built-in shapes share the fixed peak of `50`; a custom wave
/// contributes the sum of its absolute term amplitudes scaled to display
/// units.
fn target_peak(target: &TargetWave) -> f64 {
    match target.custom_terms() {
        Some(terms) => combined_peak(terms),
        None => f64::from(AMPLITUDE_SCALE),
    }
}

/// Upper bound on the summed magnitude of the term sequence.
fn combined_peak(terms: &[Term]) -> f64 {
    terms.iter().fold(0.0, |sum, term| {
        sum + f64::from(term.amplitude().abs()) * f64::from(AMPLITUDE_SCALE)
    })
}

/// Configuration parameters required to construct the scoring system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    sample_count: usize,
}

impl Config {
    /// Creates a new configuration using the provided sample count.
    #[must_use]
    pub const fn new(sample_count: usize) -> Self {
        Self { sample_count }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_COUNT)
    }
}

/// Pure system that recomputes the score whenever the session's waveforms
/// change.
///
/// The system reacts to term edits, term additions and target changes; the
/// animation clock never affects the grade because both waveforms are
/// sampled at canonical phases independent of the running offset.
#[derive(Debug)]
pub struct Scoring {
    sample_count: usize,
}

impl Scoring {
    /// Creates a new scoring system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            sample_count: config.sample_count,
        }
    }

    /// Grades the provided session state directly.
    ///
    /// Adapters use this at boot to seed the world with a truthful score
    /// before any edit occurs.
    #[must_use]
    pub fn grade(&self, target: &TargetWave, terms: &[Term]) -> Score {
        score(target, terms, self.sample_count)
    }

    /// Consumes events and immutable views to emit score commands.
    ///
    /// Emits at most one [`Command::RecordScore`] per batch, computed from
    /// the final state of the batch rather than once per triggering event.
    pub fn handle(
        &self,
        events: &[Event],
        target: &TargetWave,
        terms: &[Term],
        out: &mut Vec<Command>,
    ) {
        let waveforms_changed = events.iter().any(|event| {
            matches!(
                event,
                Event::TermUpdated { .. } | Event::TermAdded { .. } | Event::TargetChanged { .. }
            )
        });

        if !waveforms_changed {
            return;
        }

        out.push(Command::RecordScore {
            score: self.grade(target, terms),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{score, Score, DEFAULT_SAMPLE_COUNT};
    use harmonics_core::{Harmonic, TargetWave, Term};

    #[test]
    fn custom_target_scored_against_its_own_terms_is_perfect() {
        let terms = vec![
            Term::new(1.0, Harmonic::FUNDAMENTAL),
            Term::new(-0.4, Harmonic::new(3)),
        ];
        let target = TargetWave::Custom {
            terms: terms.clone(),
        };
        assert_eq!(score(&target, &terms, DEFAULT_SAMPLE_COUNT), Score::PERFECT);
    }

    #[test]
    fn degenerate_normalization_is_a_defined_perfect_match() {
        let target = TargetWave::Custom { terms: Vec::new() };
        assert_eq!(score(&target, &[], DEFAULT_SAMPLE_COUNT), Score::PERFECT);
    }

    #[test]
    fn zero_amplitude_terms_still_degenerate_to_a_perfect_match() {
        let target = TargetWave::Custom {
            terms: vec![Term::new(0.0, Harmonic::new(2))],
        };
        let approximation = [Term::new(0.0, Harmonic::new(5))];
        assert_eq!(
            score(&target, &approximation, DEFAULT_SAMPLE_COUNT),
            Score::PERFECT
        );
    }

    #[test]
    fn silent_approximation_of_a_square_scores_low_but_in_range() {
        let graded = score(&TargetWave::Square, &[], DEFAULT_SAMPLE_COUNT);
        assert!(graded < Score::PERFECT);
        assert!(graded >= Score::MIN);
    }
}
