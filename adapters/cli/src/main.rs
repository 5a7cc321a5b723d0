#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Harmonics experience.
//!
//! The binary wires the authoritative world, the pure systems and the
//! Macroquad rendering backend together: per frame it translates the
//! backend's input snapshot into world commands, lets the scoring system
//! react to the resulting events, and repopulates the scene from world
//! queries.

mod config;
mod scene_sync;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use harmonics_core::{Command, Event, Harmonic, TargetWave, TargetWaveKind, Term};
use harmonics_rendering::{FrameInput, Presentation, RenderingBackend};
use harmonics_rendering_macroquad::MacroquadBackend;
use harmonics_system_bootstrap::Bootstrap;
use harmonics_system_scoring::Scoring;
use harmonics_world::{apply, query, World};

use crate::config::Config;

/// Title used by the created window.
const WINDOW_TITLE: &str = "Harmonics";

/// Command-line arguments accepted by the Harmonics binary.
#[derive(Debug, Parser)]
#[command(name = "harmonics", about = "Interactive Fourier series visualizer")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Overrides the configured vertical sync behaviour.
    #[arg(long, value_name = "BOOL")]
    vsync: Option<bool>,
    /// Prints frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,
    /// Overrides the number of phase samples used when grading.
    #[arg(long, value_name = "COUNT")]
    sample_count: Option<usize>,
}

/// Entry point for the Harmonics command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("invalid configuration at {}", path.display()))?,
        None => Config::default(),
    };

    let mut world = World::new();
    if let Some(session) = &config.session {
        let (terms, target) = session.resolve();
        world.seed_session(terms, target);
    }

    let bootstrap = Bootstrap::default();
    println!("{}", bootstrap.welcome_banner(&world));

    let scoring_config = args
        .sample_count
        .map(harmonics_system_scoring::Config::new)
        .unwrap_or_default();
    let scoring = Scoring::new(scoring_config);
    seed_initial_score(&mut world, &scoring);

    let scene = scene_sync::build_scene(&world)
        .context("oscilloscope presentation rejected the canonical configuration")?;
    let presentation = Presentation::new(WINDOW_TITLE, scene_sync::CLEAR_COLOR, scene);

    let backend = MacroquadBackend::new()
        .with_window_size(config.window.width, config.window.height)
        .with_vsync(args.vsync.unwrap_or(config.window.vsync))
        .with_show_fps(args.show_fps);

    backend.run(presentation, move |dt, input, scene| {
        drive_frame(&mut world, &scoring, dt, input);
        scene_sync::sync_scene(scene, &world);
    })
}

/// Records a truthful score before the first frame so the panel never
/// displays the placeholder zero.
fn seed_initial_score(world: &mut World, scoring: &Scoring) {
    let score = scoring.grade(query::target(world), query::terms(world));
    let mut events = Vec::new();
    apply(world, Command::RecordScore { score }, &mut events);
}

/// Advances one frame: translates input into commands, applies them, and
/// lets the scoring system react to the emitted events.
fn drive_frame(world: &mut World, scoring: &Scoring, dt: Duration, input: FrameInput) {
    let mut events: Vec<Event> = Vec::new();

    if input.play_toggle {
        let mode = query::play_mode(world).toggled();
        apply(world, Command::SetPlayMode { mode }, &mut events);
    }
    if input.reset {
        apply(world, Command::ResetPhase, &mut events);
    }
    if input.add_term {
        let term = next_term(query::terms(world));
        apply(world, Command::AddTerm { term }, &mut events);
    }
    for edit in &input.term_edits {
        apply(
            world,
            Command::UpdateTerm {
                index: edit.index,
                term: edit.term,
            },
            &mut events,
        );
    }
    if let Some(kind) = input.target_selected {
        if let Some(wave) = builtin_wave(kind) {
            apply(world, Command::SelectTarget { wave }, &mut events);
        }
    }
    if let Some(terms) = input.custom_committed {
        apply(
            world,
            Command::SelectTarget {
                wave: TargetWave::Custom { terms },
            },
            &mut events,
        );
    }

    apply(world, Command::Tick { dt }, &mut events);

    let mut commands = Vec::new();
    scoring.handle(&events, query::target(world), query::terms(world), &mut commands);
    for command in commands {
        apply(world, command, &mut events);
    }
}

/// Fresh term appended by the Add Term action: silent, at the next
/// harmonic after the current sequence.
fn next_term(terms: &[Term]) -> Term {
    Term::new(0.0, Harmonic::new(terms.len() as u32 + 1))
}

/// Resolves a selector choice into a built-in target wave.
///
/// The custom kind resolves to `None`; its term list travels through the
/// editor's commit channel instead of the selector.
fn builtin_wave(kind: TargetWaveKind) -> Option<TargetWave> {
    match kind {
        TargetWaveKind::Square => Some(TargetWave::Square),
        TargetWaveKind::Sawtooth => Some(TargetWave::Sawtooth),
        TargetWaveKind::Triangle => Some(TargetWave::Triangle),
        TargetWaveKind::Pulse => Some(TargetWave::Pulse),
        TargetWaveKind::Custom => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{builtin_wave, drive_frame, next_term, seed_initial_score};
    use harmonics_core::{Harmonic, PlayMode, Score, TargetWave, TargetWaveKind, Term};
    use harmonics_rendering::{FrameInput, TermEdit};
    use harmonics_system_scoring::Scoring;
    use harmonics_world::{query, World};
    use std::time::Duration;

    fn scoring() -> Scoring {
        Scoring::new(harmonics_system_scoring::Config::default())
    }

    #[test]
    fn frames_advance_the_clock() {
        let mut world = World::new();
        drive_frame(
            &mut world,
            &scoring(),
            Duration::from_millis(16),
            FrameInput::default(),
        );
        assert!(query::phase(&world).get() > 0.0);
    }

    #[test]
    fn play_toggles_alternate_the_mode() {
        let mut world = World::new();
        let input = FrameInput {
            play_toggle: true,
            ..FrameInput::default()
        };

        drive_frame(&mut world, &scoring(), Duration::ZERO, input.clone());
        assert_eq!(query::play_mode(&world), PlayMode::Paused);

        drive_frame(&mut world, &scoring(), Duration::ZERO, input);
        assert_eq!(query::play_mode(&world), PlayMode::Running);
    }

    #[test]
    fn term_edits_trigger_a_rescore() {
        let mut world = World::new();
        seed_initial_score(&mut world, &scoring());
        let before = query::score(&world);

        let input = FrameInput {
            term_edits: vec![TermEdit {
                index: 1,
                term: Term::new(1.0 / 3.0, Harmonic::new(3)),
            }],
            ..FrameInput::default()
        };
        drive_frame(&mut world, &scoring(), Duration::ZERO, input);

        assert_eq!(query::terms(&world)[1], Term::new(1.0 / 3.0, Harmonic::new(3)));
        assert!(query::score(&world) > before);
    }

    #[test]
    fn target_selection_triggers_a_rescore() {
        let mut world = World::new();
        seed_initial_score(&mut world, &scoring());

        let input = FrameInput {
            target_selected: Some(TargetWaveKind::Sawtooth),
            ..FrameInput::default()
        };
        drive_frame(&mut world, &scoring(), Duration::ZERO, input);

        assert_eq!(query::target(&world), &TargetWave::Sawtooth);
    }

    #[test]
    fn committed_custom_terms_become_the_target() {
        let mut world = World::new();
        let terms = vec![Term::new(1.0, Harmonic::FUNDAMENTAL)];
        let input = FrameInput {
            custom_committed: Some(terms.clone()),
            ..FrameInput::default()
        };

        drive_frame(&mut world, &scoring(), Duration::ZERO, input);

        assert_eq!(query::target(&world).custom_terms(), Some(terms.as_slice()));
        assert_eq!(query::custom_seed_terms(&world), terms.as_slice());
    }

    #[test]
    fn matching_custom_targets_grade_perfect() {
        let mut world = World::new();
        let terms = query::terms(&world).to_vec();
        let input = FrameInput {
            custom_committed: Some(terms),
            ..FrameInput::default()
        };

        drive_frame(&mut world, &scoring(), Duration::ZERO, input);

        assert_eq!(query::score(&world), Score::PERFECT);
    }

    #[test]
    fn added_terms_take_the_next_harmonic() {
        let mut world = World::new();
        let input = FrameInput {
            add_term: true,
            ..FrameInput::default()
        };

        drive_frame(&mut world, &scoring(), Duration::ZERO, input);

        let terms = query::terms(&world);
        assert_eq!(terms.len(), 4);
        assert_eq!(terms[3], Term::new(0.0, Harmonic::new(4)));
    }

    #[test]
    fn next_terms_are_silent() {
        let term = next_term(&[Term::new(1.0, Harmonic::FUNDAMENTAL)]);
        assert_eq!(term, Term::new(0.0, Harmonic::new(2)));
    }

    #[test]
    fn resets_rewind_the_clock() {
        let mut world = World::new();
        drive_frame(
            &mut world,
            &scoring(),
            Duration::from_secs(1),
            FrameInput::default(),
        );
        assert!(query::phase(&world).get() > 0.0);

        let input = FrameInput {
            reset: true,
            ..FrameInput::default()
        };
        drive_frame(&mut world, &scoring(), Duration::ZERO, input);
        assert_eq!(query::phase(&world).get(), 0.0);
    }

    #[test]
    fn every_builtin_kind_resolves_to_a_wave() {
        assert_eq!(builtin_wave(TargetWaveKind::Square), Some(TargetWave::Square));
        assert_eq!(
            builtin_wave(TargetWaveKind::Sawtooth),
            Some(TargetWave::Sawtooth)
        );
        assert_eq!(
            builtin_wave(TargetWaveKind::Triangle),
            Some(TargetWave::Triangle)
        );
        assert_eq!(builtin_wave(TargetWaveKind::Pulse), Some(TargetWave::Pulse));
        assert_eq!(builtin_wave(TargetWaveKind::Custom), None);
    }

    #[test]
    fn seeded_scores_reflect_the_session() {
        let mut world = World::new();
        seed_initial_score(&mut world, &scoring());
        assert!(query::score(&world) > Score::MIN);
    }
}
