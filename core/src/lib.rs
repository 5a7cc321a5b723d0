#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Harmonics engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.
//!
//! The numeric vocabulary lives here as well: a [`Term`] is one sinusoidal
//! component of a truncated Fourier series, a [`TargetWave`] is the periodic
//! reference shape the player tries to approximate, a [`Phase`] is a position
//! within one period, and a [`Score`] is the normalized similarity grade in
//! `[0, 100]`.

use std::f32::consts::TAU;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Harmonics.";

/// Describes whether the animation clock is advancing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayMode {
    /// The phase clock advances every tick, animating the approximation.
    Running,
    /// The phase clock is frozen; edits and scoring still apply.
    Paused,
}

impl PlayMode {
    /// Returns the opposite play mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Running => Self::Paused,
            Self::Paused => Self::Running,
        }
    }
}

/// Integer frequency multiplier of a sinusoidal term.
///
/// Harmonics are always at least `1`; interactive controls clamp them to
/// `[1, 10]`, but the engine places no upper bound. Constructing a harmonic
/// of zero is a caller bug and is not runtime-checked.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Harmonic(u32);

impl Harmonic {
    /// The fundamental frequency multiplier.
    pub const FUNDAMENTAL: Self = Self(1);

    /// Creates a new harmonic from the provided multiplier.
    ///
    /// The multiplier must be at least `1`.
    #[must_use]
    pub const fn new(multiplier: u32) -> Self {
        Self(multiplier)
    }

    /// Retrieves the numeric frequency multiplier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One sinusoidal component `amplitude * sin(frequency * phase)`.
///
/// Terms are held in ordered sequences; insertion order determines display
/// order but has no effect on the summed value. Two terms may share a
/// frequency. Amplitudes may be any finite value; interactive controls clamp
/// them to `[-2, 2]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Term {
    amplitude: f32,
    frequency: Harmonic,
}

impl Term {
    /// Creates a new term from an amplitude and a frequency multiplier.
    #[must_use]
    pub const fn new(amplitude: f32, frequency: Harmonic) -> Self {
        Self {
            amplitude,
            frequency,
        }
    }

    /// Dimensionless amplitude applied to the sinusoid.
    #[must_use]
    pub const fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Integer frequency multiplier applied to the phase.
    #[must_use]
    pub const fn frequency(&self) -> Harmonic {
        self.frequency
    }

    /// Returns a copy of the term with the provided amplitude.
    #[must_use]
    pub const fn with_amplitude(self, amplitude: f32) -> Self {
        Self { amplitude, ..self }
    }

    /// Returns a copy of the term with the provided frequency.
    #[must_use]
    pub const fn with_frequency(self, frequency: Harmonic) -> Self {
        Self { frequency, ..self }
    }
}

/// Copyable discriminant naming the available target wave shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetWaveKind {
    /// Alternating plateaus at the positive and negative peak.
    Square,
    /// Linear ramp repeating once per period.
    Sawtooth,
    /// Symmetric rising and falling ramps.
    Triangle,
    /// Narrow duty-cycle pulse.
    Pulse,
    /// Player-authored sum of sinusoidal terms.
    Custom,
}

impl TargetWaveKind {
    /// Every selectable kind in canonical display order.
    pub const ALL: [Self; 5] = [
        Self::Square,
        Self::Sawtooth,
        Self::Triangle,
        Self::Pulse,
        Self::Custom,
    ];
}

/// Tagged specification of the periodic reference shape.
///
/// The four built-in variants carry no parameters; their shape is fixed by
/// definition. The custom variant carries its own ordered term sequence,
/// which may be empty, in which case the waveform is identically zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TargetWave {
    /// `sign(sin(phase)) * 50`.
    Square,
    /// Linear ramp from `-25` to `+25` repeating every period.
    Sawtooth,
    /// Symmetric triangular ramp spanning `[-50, 50]`.
    Triangle,
    /// `+50` while `sin(phase) > 0.7`, `-50` otherwise.
    Pulse,
    /// Sum of the embedded sinusoidal terms.
    Custom {
        /// Ordered terms composing the custom waveform.
        terms: Vec<Term>,
    },
}

impl TargetWave {
    /// Returns the discriminant naming this wave's shape.
    #[must_use]
    pub const fn kind(&self) -> TargetWaveKind {
        match self {
            Self::Square => TargetWaveKind::Square,
            Self::Sawtooth => TargetWaveKind::Sawtooth,
            Self::Triangle => TargetWaveKind::Triangle,
            Self::Pulse => TargetWaveKind::Pulse,
            Self::Custom { .. } => TargetWaveKind::Custom,
        }
    }

    /// Returns the embedded term sequence when the wave is custom.
    #[must_use]
    pub fn custom_terms(&self) -> Option<&[Term]> {
        match self {
            Self::Custom { terms } => Some(terms),
            _ => None,
        }
    }
}

/// Position within one period of oscillation.
///
/// One period spans `[0, 2π)`. Values outside that range are legal inputs;
/// [`Phase::wrapped`] reduces them with a non-negative remainder so negative
/// phases map into the canonical period correctly.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Phase(f32);

impl Phase {
    /// The start of the canonical period.
    pub const ZERO: Self = Self(0.0);

    /// Creates a phase from a raw radian value.
    #[must_use]
    pub const fn new(radians: f32) -> Self {
        Self(radians)
    }

    /// Retrieves the raw radian value.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.0
    }

    /// Reduces the phase into `[0, 2π)` using a non-negative remainder.
    #[must_use]
    pub fn wrapped(&self) -> f32 {
        self.0.rem_euclid(TAU)
    }

    /// Returns this phase advanced by `radians` and wrapped into `[0, 2π)`.
    ///
    /// Every waveform in the engine is `2π`-periodic, so wrapping the stored
    /// clock keeps long sessions free of floating-point precision decay
    /// without changing any observable sample.
    #[must_use]
    pub fn advanced(self, radians: f32) -> Self {
        Self((self.0 + radians).rem_euclid(TAU))
    }

    /// Returns this phase shifted by the other phase, without wrapping.
    #[must_use]
    pub fn offset_by(self, offset: Phase) -> Self {
        Self(self.0 + offset.0)
    }
}

/// Normalized similarity grade between approximation and target.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Score(u8);

impl Score {
    /// Lowest possible grade.
    pub const MIN: Self = Self(0);

    /// Grade reported for an exact match.
    pub const PERFECT: Self = Self(100);

    /// Creates a score, saturating values above `100`.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        if value > 100 {
            Self(100)
        } else {
            Self(value)
        }
    }

    /// Retrieves the numeric grade in `[0, 100]`.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the animation clock by the provided delta time.
    Tick {
        /// Duration of real time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the world transition to the provided play mode.
    SetPlayMode {
        /// Mode the world should activate.
        mode: PlayMode,
    },
    /// Rewinds the animation clock to phase zero.
    ResetPhase,
    /// Replaces the approximation term at the provided index.
    UpdateTerm {
        /// Zero-based position of the term within the ordered sequence.
        index: usize,
        /// Replacement term value.
        term: Term,
    },
    /// Appends a new term to the approximation sequence.
    AddTerm {
        /// Term appended after the existing sequence.
        term: Term,
    },
    /// Replaces the target waveform specification.
    SelectTarget {
        /// Specification the world should adopt, including custom terms.
        wave: TargetWave,
    },
    /// Stores the score computed by the scoring system.
    RecordScore {
        /// Normalized similarity grade to retain for display.
        score: Score,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the animation clock advanced.
    TimeAdvanced {
        /// Duration of real time that elapsed in the tick.
        dt: Duration,
        /// Phase of the clock after advancing.
        phase: Phase,
    },
    /// Announces that the session entered a new play mode.
    PlayModeChanged {
        /// Mode that became active after processing commands.
        mode: PlayMode,
    },
    /// Confirms that the animation clock rewound to phase zero.
    PhaseReset,
    /// Confirms that an approximation term was replaced.
    TermUpdated {
        /// Zero-based position of the replaced term.
        index: usize,
        /// Value now stored at the position.
        term: Term,
    },
    /// Reports that a term update named a position outside the sequence.
    TermUpdateRejected {
        /// Out-of-range position provided in the update request.
        index: usize,
    },
    /// Confirms that a term was appended to the approximation sequence.
    TermAdded {
        /// Zero-based position assigned to the new term.
        index: usize,
        /// Term appended to the sequence.
        term: Term,
    },
    /// Confirms that the target waveform specification changed.
    TargetChanged {
        /// Shape discriminant of the newly adopted target.
        kind: TargetWaveKind,
    },
    /// Confirms that a freshly computed score was retained.
    ScoreRecorded {
        /// Grade now available for display.
        score: Score,
    },
}

#[cfg(test)]
mod tests {
    use super::{Harmonic, Phase, PlayMode, Score, TargetWave, TargetWaveKind, Term};
    use serde::{de::DeserializeOwned, Serialize};
    use std::f32::consts::{PI, TAU};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn term_round_trips_through_bincode() {
        let term = Term::new(-1.5, Harmonic::new(3));
        assert_round_trip(&term);
    }

    #[test]
    fn target_wave_round_trips_through_bincode() {
        let wave = TargetWave::Custom {
            terms: vec![
                Term::new(1.0, Harmonic::FUNDAMENTAL),
                Term::new(0.0, Harmonic::new(2)),
            ],
        };
        assert_round_trip(&wave);
        assert_round_trip(&TargetWave::Pulse);
    }

    #[test]
    fn target_wave_kind_round_trips_through_bincode() {
        assert_round_trip(&TargetWaveKind::Sawtooth);
    }

    #[test]
    fn kind_matches_every_variant() {
        assert_eq!(TargetWave::Square.kind(), TargetWaveKind::Square);
        assert_eq!(TargetWave::Sawtooth.kind(), TargetWaveKind::Sawtooth);
        assert_eq!(TargetWave::Triangle.kind(), TargetWaveKind::Triangle);
        assert_eq!(TargetWave::Pulse.kind(), TargetWaveKind::Pulse);
        assert_eq!(
            TargetWave::Custom { terms: Vec::new() }.kind(),
            TargetWaveKind::Custom
        );
    }

    #[test]
    fn phase_wraps_negative_values_into_the_canonical_period() {
        let phase = Phase::new(-PI);
        assert!((phase.wrapped() - PI).abs() < 1e-6);
    }

    #[test]
    fn phase_advance_wraps_past_a_full_period() {
        let phase = Phase::new(TAU - 0.1).advanced(0.2);
        assert!(phase.get() >= 0.0 && phase.get() < TAU);
        assert!((phase.get() - 0.1).abs() < 1e-5);
    }

    #[test]
    fn score_saturates_above_one_hundred() {
        assert_eq!(Score::new(250), Score::PERFECT);
        assert_eq!(Score::new(42).get(), 42);
    }

    #[test]
    fn play_mode_toggles_between_states() {
        assert_eq!(PlayMode::Running.toggled(), PlayMode::Paused);
        assert_eq!(PlayMode::Paused.toggled(), PlayMode::Running);
    }
}
