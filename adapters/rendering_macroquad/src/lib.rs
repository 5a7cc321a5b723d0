#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Harmonics.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Consumers that need sound playback can opt back
//! in by enabling `macroquad/audio` in their own `Cargo.toml` dependency
//! specification.
//!
//! The adapter uses Macroquad's immediate-mode UI module so the control
//! panel can host widgets. All UI-specific calls live inside the local `ui`
//! module to avoid leaking Macroquad UI types throughout the renderer.

mod ui;

use self::ui::{draw_control_panel_ui, ControlPanelUiContext, ControlPanelUiState};
use anyhow::Result;
use glam::Vec2;
use harmonics_core::{TargetWaveKind, Term};
use harmonics_rendering::{
    Color, ControlPanelView, FrameInput, OscilloscopePresentation, Presentation,
    RenderingBackend, Scene, TermEdit, WaveTrace,
};
use macroquad::input::{is_key_pressed, KeyCode};
use macroquad::math::Vec2 as MacroquadVec2;
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

/// Tracks UI-sourced interactions so they can be merged with physical input
/// on the next frame.
///
/// Widget presses observed while drawing a frame are latched here and
/// drained into the following frame's [`FrameInput`], keeping UI handling a
/// single deterministic step behind the widgets that produced it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlPanelInputState {
    play_toggle_latched: bool,
    reset_latched: bool,
    add_term_latched: bool,
    term_edits_latched: Vec<TermEdit>,
    target_latched: Option<TargetWaveKind>,
    custom_latched: Option<Vec<Term>>,
}

impl ControlPanelInputState {
    /// Latches a play/pause toggle press.
    pub fn register_play_toggle(&mut self) {
        self.play_toggle_latched = true;
    }

    /// Latches a phase reset press.
    pub fn register_reset(&mut self) {
        self.reset_latched = true;
    }

    /// Latches an add-term press.
    pub fn register_add_term(&mut self) {
        self.add_term_latched = true;
    }

    /// Latches a slider edit, preserving widget order.
    pub fn register_term_edit(&mut self, edit: TermEdit) {
        self.term_edits_latched.push(edit);
    }

    /// Latches a built-in target selection, superseding earlier ones.
    pub fn register_target(&mut self, kind: TargetWaveKind) {
        self.target_latched = Some(kind);
    }

    /// Latches a committed custom term list, superseding earlier ones.
    pub fn register_custom_terms(&mut self, terms: Vec<Term>) {
        self.custom_latched = Some(terms);
    }

    /// Drains every latched interaction into a frame input, clearing the
    /// latches so each action fires only once.
    pub fn take_into(&mut self, input: &mut FrameInput) {
        input.play_toggle |= std::mem::take(&mut self.play_toggle_latched);
        input.reset |= std::mem::take(&mut self.reset_latched);
        input.add_term |= std::mem::take(&mut self.add_term_latched);
        input.term_edits.append(&mut self.term_edits_latched);
        if let Some(kind) = self.target_latched.take() {
            input.target_selected = Some(kind);
        }
        if let Some(terms) = self.custom_latched.take() {
            input.custom_committed = Some(terms);
        }
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single
/// frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the render loop.
    quit_requested: bool,
    /// `Space` toggles between running and paused.
    play_toggle: bool,
    /// `R` rewinds the animation clock to zero.
    reset: bool,
    /// `A` appends a fresh approximation term.
    add_term: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let play_toggle = is_key_pressed(KeyCode::Space);
        let reset = is_key_pressed(KeyCode::R);
        let add_term = is_key_pressed(KeyCode::A);

        Self {
            quit_requested,
            play_toggle,
            reset,
            add_term,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    window_size: (i32, i32),
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            window_size: (960, 540),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the
    /// platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the
    /// display refresh rate or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per
    /// second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures the initial window dimensions in pixels.
    #[must_use]
    pub fn with_window_size(mut self, width: i32, height: i32) -> Self {
        self.window_size = (width, height);
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing
    /// ten-second averages once one second has elapsed.
    fn record_frame(&mut self, frame: Duration, render: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.render_accum += render;

        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        if seconds <= f32::EPSILON {
            self.reset_accumulators();
            return None;
        }

        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let avg_render = if self.frames == 0 {
            Duration::ZERO
        } else {
            self.render_accum / self.frames
        };

        self.reset_accumulators();
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_render,
        })
    }

    fn reset_accumulators(&mut self) {
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.render_accum = Duration::ZERO;
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            window_size,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: window_size.0,
            window_height: window_size.1,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut control_panel_input = ControlPanelInputState::default();
            let mut panel_ui_state = ControlPanelUiState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let mut frame_input = gather_frame_input(keyboard);
                control_panel_input.take_into(&mut frame_input);

                update_scene(frame_dt, frame_input, &mut scene);

                let metrics = PlotMetrics::from_scene(&scene, screen_width, screen_height);

                let render_start = Instant::now();
                draw_oscilloscope(&scene.oscilloscope, &metrics);
                draw_trace(&scene.target_trace, &scene.oscilloscope, &metrics);
                draw_trace(&scene.approximation_trace, &scene.oscilloscope, &metrics);

                if let Some(panel_context) =
                    panel_layout(&scene, screen_width, screen_height)
                {
                    let mut panel_ui = macroquad::ui::root_ui();
                    let result =
                        draw_control_panel_ui(&mut panel_ui, panel_context, &mut panel_ui_state);
                    if result.play_toggle {
                        control_panel_input.register_play_toggle();
                    }
                    if result.reset {
                        control_panel_input.register_reset();
                    }
                    if result.add_term {
                        control_panel_input.register_add_term();
                    }
                    for edit in result.term_edits {
                        control_panel_input.register_term_edit(edit);
                    }
                    if let Some(kind) = result.target_selected {
                        control_panel_input.register_target(kind);
                    }
                    if let Some(terms) = result.custom_committed {
                        control_panel_input.register_custom_terms(terms);
                    }
                }
                let render_duration = render_start.elapsed();

                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_render,
                    }) = fps_counter.record_frame(frame_dt, render_duration)
                    {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                } else {
                    let _ = fps_counter.record_frame(frame_dt, render_duration);
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Pixel-space layout of the oscilloscope plot for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PlotMetrics {
    plot_left: f32,
    plot_top: f32,
    plot_width: f32,
    plot_height: f32,
}

impl PlotMetrics {
    /// Margin in pixels between the plot and the window edges.
    const MARGIN: f32 = 16.0;

    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let panel_width = scene
            .control_panel
            .map(|panel| panel.width.max(0.0))
            .unwrap_or(0.0)
            .min(screen_width);
        let available_width = (screen_width - panel_width).max(0.0);

        let plot_width = (available_width - 2.0 * Self::MARGIN).max(0.0);
        let plot_height = (screen_height - 2.0 * Self::MARGIN).max(0.0);

        Self {
            plot_left: Self::MARGIN,
            plot_top: Self::MARGIN,
            plot_width,
            plot_height,
        }
    }

    /// Vertical centre of the plot where the zero axis lies.
    fn center_y(&self) -> f32 {
        self.plot_top + self.plot_height * 0.5
    }

    /// Maps a phase/value point into pixel coordinates.
    fn point_to_pixels(&self, point: Vec2, oscilloscope: &OscilloscopePresentation) -> Vec2 {
        let x = self.plot_left + point.x / oscilloscope.period * self.plot_width;
        let y = self.center_y()
            - point.y / oscilloscope.vertical_range * (self.plot_height * 0.5);
        Vec2::new(x, y)
    }

    /// Whether the plot collapsed to a degenerate area.
    fn is_degenerate(&self) -> bool {
        self.plot_width <= f32::EPSILON || self.plot_height <= f32::EPSILON
    }
}

fn gather_frame_input(keyboard: KeyboardShortcuts) -> FrameInput {
    FrameInput {
        play_toggle: keyboard.play_toggle,
        reset: keyboard.reset,
        add_term: keyboard.add_term,
        ..FrameInput::default()
    }
}

fn panel_layout(
    scene: &Scene,
    screen_width: f32,
    screen_height: f32,
) -> Option<ControlPanelUiContext<'_>> {
    let ControlPanelView { width, background } = scene.control_panel?;
    if width <= f32::EPSILON {
        return None;
    }

    let left = (screen_width - width).max(0.0);
    let background_color = to_macroquad_color(background);
    macroquad::shapes::draw_rectangle(left, 0.0, width, screen_height, background_color);

    Some(ControlPanelUiContext {
        origin: MacroquadVec2::new(left, 0.0),
        size: MacroquadVec2::new(width, screen_height),
        background: background_color,
        screen: MacroquadVec2::new(screen_width, screen_height),
        play_mode: scene.play_mode,
        score: scene.score,
        target_kind: scene.target_kind,
        terms: &scene.terms,
        custom_seed_terms: &scene.custom_seed_terms,
    })
}

fn draw_oscilloscope(oscilloscope: &OscilloscopePresentation, metrics: &PlotMetrics) {
    if metrics.is_degenerate() {
        return;
    }

    macroquad::shapes::draw_rectangle(
        metrics.plot_left,
        metrics.plot_top,
        metrics.plot_width,
        metrics.plot_height,
        to_macroquad_color(oscilloscope.background),
    );

    let axis_color = to_macroquad_color(oscilloscope.axis_color);
    for (start, end) in axis_dash_segments(metrics) {
        macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, 1.0, axis_color);
    }
}

/// Dash segments composing the horizontal zero axis.
fn axis_dash_segments(metrics: &PlotMetrics) -> Vec<(Vec2, Vec2)> {
    if metrics.is_degenerate() {
        return Vec::new();
    }

    let y = metrics.center_y();
    let step =
        OscilloscopePresentation::AXIS_DASH_LENGTH + OscilloscopePresentation::AXIS_DASH_GAP;
    let right = metrics.plot_left + metrics.plot_width;

    let mut segments = Vec::new();
    let mut x = metrics.plot_left;
    while x < right {
        let dash_end = (x + OscilloscopePresentation::AXIS_DASH_LENGTH).min(right);
        segments.push((Vec2::new(x, y), Vec2::new(dash_end, y)));
        x += step;
    }
    segments
}

fn draw_trace(
    trace: &WaveTrace,
    oscilloscope: &OscilloscopePresentation,
    metrics: &PlotMetrics,
) {
    let color = to_macroquad_color(trace.color);
    for (start, end) in trace_segments(trace, oscilloscope, metrics) {
        macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, trace.thickness, color);
    }
}

/// Pixel-space segments connecting consecutive trace samples.
fn trace_segments(
    trace: &WaveTrace,
    oscilloscope: &OscilloscopePresentation,
    metrics: &PlotMetrics,
) -> Vec<(Vec2, Vec2)> {
    if metrics.is_degenerate() || trace.points.len() < 2 {
        return Vec::new();
    }

    trace
        .points
        .windows(2)
        .map(|pair| {
            (
                metrics.point_to_pixels(pair[0], oscilloscope),
                metrics.point_to_pixels(pair[1], oscilloscope),
            )
        })
        .collect()
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
