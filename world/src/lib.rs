#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Harmonics.
//!
//! The world owns every piece of mutable state in a session: the player's
//! approximation terms, the selected target wave, the animation clock, the
//! play mode and the last recorded score. Adapters and systems never mutate
//! it directly; they submit [`Command`] values through [`apply`], observe
//! the broadcast [`Event`] values, and read immutable snapshots through the
//! [`query`] module. The numeric engine itself lives in the synthesis and
//! scoring systems and is stateless.

use std::time::Duration;

use harmonics_core::{
    Command, Event, Harmonic, Phase, PlayMode, Score, TargetWave, Term, WELCOME_BANNER,
};

/// Radians the animation clock advances per second of real time while
/// running.
pub const PHASE_RATE: f32 = 1.25;

/// Term sequence every fresh session starts from.
const DEFAULT_TERMS: [Term; 3] = [
    Term::new(1.0, Harmonic::new(1)),
    Term::new(0.0, Harmonic::new(2)),
    Term::new(0.0, Harmonic::new(3)),
];

/// Represents the authoritative Harmonics session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    terms: Vec<Term>,
    target: TargetWave,
    custom_seed_terms: Vec<Term>,
    phase: Phase,
    play_mode: PlayMode,
    score: Score,
}

impl World {
    /// Creates a new session with the canonical starting configuration: the
    /// fundamental at unit amplitude plus two silent harmonics, a square
    /// target, and a running clock at phase zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            terms: DEFAULT_TERMS.to_vec(),
            target: TargetWave::Square,
            custom_seed_terms: DEFAULT_TERMS.to_vec(),
            phase: Phase::ZERO,
            play_mode: PlayMode::Running,
            score: Score::MIN,
        }
    }

    /// Replaces the initial term sequence and target before the session
    /// starts, used by adapters that load session presets.
    pub fn seed_session(&mut self, terms: Vec<Term>, target: TargetWave) {
        if let Some(custom) = target.custom_terms() {
            self.custom_seed_terms = custom.to_vec();
        }
        self.terms = terms;
        self.target = target;
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state
/// deterministically and pushing the resulting events onto `out_events`.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            if world.play_mode == PlayMode::Running {
                world.phase = world.phase.advanced(dt.as_secs_f32() * PHASE_RATE);
            }
            out_events.push(Event::TimeAdvanced {
                dt,
                phase: world.phase,
            });
        }
        Command::SetPlayMode { mode } => {
            if world.play_mode != mode {
                world.play_mode = mode;
                out_events.push(Event::PlayModeChanged { mode });
            }
        }
        Command::ResetPhase => {
            world.phase = Phase::ZERO;
            out_events.push(Event::PhaseReset);
        }
        Command::UpdateTerm { index, term } => match world.terms.get_mut(index) {
            Some(slot) => {
                *slot = term;
                out_events.push(Event::TermUpdated { index, term });
            }
            None => out_events.push(Event::TermUpdateRejected { index }),
        },
        Command::AddTerm { term } => {
            world.terms.push(term);
            out_events.push(Event::TermAdded {
                index: world.terms.len() - 1,
                term,
            });
        }
        Command::SelectTarget { wave } => {
            if let Some(custom) = wave.custom_terms() {
                world.custom_seed_terms = custom.to_vec();
            }
            let kind = wave.kind();
            world.target = wave;
            out_events.push(Event::TargetChanged { kind });
        }
        Command::RecordScore { score } => {
            world.score = score;
            out_events.push(Event::ScoreRecorded { score });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use harmonics_core::{Phase, PlayMode, Score, TargetWave, Term};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Ordered approximation terms currently held by the session.
    #[must_use]
    pub fn terms(world: &World) -> &[Term] {
        &world.terms
    }

    /// Target wave specification the player is approximating.
    #[must_use]
    pub fn target(world: &World) -> &TargetWave {
        &world.target
    }

    /// Terms that seed the custom-wave editor when it opens.
    ///
    /// These track the most recently committed custom target so reopening
    /// the editor resumes from the player's last design rather than the
    /// session default.
    #[must_use]
    pub fn custom_seed_terms(world: &World) -> &[Term] {
        &world.custom_seed_terms
    }

    /// Current position of the animation clock.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Whether the animation clock is currently advancing.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.play_mode
    }

    /// Last score recorded by the scoring system.
    #[must_use]
    pub fn score(world: &World) -> Score {
        world.score
    }
}
