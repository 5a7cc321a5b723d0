//! Translates world snapshots into declarative rendering scenes.
//!
//! The oscilloscope traces are sampled here, in phase/value space, so the
//! rendering backend never needs to know how waveforms are computed. The
//! target trace is always drawn at canonical phase; the approximation trace
//! applies the running clock offset, which is what animates the plot.

use std::f32::consts::TAU;

use glam::Vec2;
use harmonics_core::{Phase, TargetWave, Term};
use harmonics_rendering::{
    Color, ControlPanelView, OscilloscopePresentation, RenderingError, Scene, WaveTrace,
};
use harmonics_system_synthesis::{evaluate, synthesize};
use harmonics_world::{query, World};

/// Number of points sampled per trace across one period.
pub(crate) const DISPLAY_SAMPLE_COUNT: usize = 256;

/// Solid color used to clear each frame.
pub(crate) const CLEAR_COLOR: Color = Color::from_rgb_u8(17, 24, 39);

/// Waveform value mapped to the plot's top and bottom edges, leaving
/// headroom above the built-in peak of 50.
const VERTICAL_RANGE: f32 = 110.0;

/// Width in pixels of the control panel anchored to the right edge.
const PANEL_WIDTH: f32 = 300.0;

const PLOT_BACKGROUND: Color = Color::from_rgb_u8(55, 65, 81);
const AXIS_COLOR: Color = Color::from_rgb_u8(75, 85, 99);
const PANEL_BACKGROUND: Color = Color::from_rgb_u8(31, 41, 55);
const TARGET_COLOR: Color = Color::from_rgb_u8(239, 68, 68);
const APPROXIMATION_COLOR: Color = Color::from_rgb_u8(59, 130, 246);
const TRACE_THICKNESS: f32 = 2.0;

/// Builds the initial scene from a freshly seeded world.
pub(crate) fn build_scene(world: &World) -> Result<Scene, RenderingError> {
    let oscilloscope =
        OscilloscopePresentation::new(TAU, VERTICAL_RANGE, AXIS_COLOR, PLOT_BACKGROUND)?;

    let mut scene = Scene::new(
        oscilloscope,
        WaveTrace::new(TARGET_COLOR, TRACE_THICKNESS, Vec::new()),
        WaveTrace::new(APPROXIMATION_COLOR, TRACE_THICKNESS, Vec::new()),
        Vec::new(),
        Vec::new(),
        query::target(world).kind(),
        query::play_mode(world),
        query::score(world),
        Some(ControlPanelView::new(PANEL_WIDTH, PANEL_BACKGROUND)),
    );
    sync_scene(&mut scene, world);
    Ok(scene)
}

/// Repopulates the scene from the world's current state.
pub(crate) fn sync_scene(scene: &mut Scene, world: &World) {
    let target = query::target(world);
    scene.target_trace.points = sample_target(target);
    scene.approximation_trace.points =
        sample_approximation(query::terms(world), query::phase(world));
    scene.terms = query::terms(world).to_vec();
    scene.custom_seed_terms = query::custom_seed_terms(world).to_vec();
    scene.target_kind = target.kind();
    scene.play_mode = query::play_mode(world);
    scene.score = query::score(world);
}

/// Samples the target wave at canonical phase across one period.
fn sample_target(target: &TargetWave) -> Vec<Vec2> {
    sample_phases()
        .map(|phase| Vec2::new(phase, evaluate(target, Phase::new(phase))))
        .collect()
}

/// Samples the approximation with the running clock offset applied.
fn sample_approximation(terms: &[Term], offset: Phase) -> Vec<Vec2> {
    sample_phases()
        .map(|phase| {
            let shifted = Phase::new(phase).offset_by(offset);
            Vec2::new(phase, synthesize(terms, shifted))
        })
        .collect()
}

/// Evenly spaced phases covering `[0, 2π]` inclusive of both endpoints, so
/// the polyline spans the full plot width.
fn sample_phases() -> impl Iterator<Item = f32> {
    (0..DISPLAY_SAMPLE_COUNT)
        .map(|i| i as f32 / (DISPLAY_SAMPLE_COUNT - 1) as f32 * TAU)
}
