#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Harmonics adapters.
//!
//! Backends receive a declarative [`Scene`] describing the oscilloscope and
//! its control panel, gather per-frame [`FrameInput`], and hand both to the
//! driver through the [`RenderingBackend::run`] loop. Nothing in this crate
//! knows how waveforms are computed; traces arrive pre-sampled in
//! phase/value space and backends only map them to pixels.

use anyhow::Result as AnyResult;
use glam::Vec2;
use harmonics_core::{PlayMode, Score, TargetWaveKind, Term};
use std::time::Duration;
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Pre-sampled waveform polyline expressed in phase/value space.
///
/// Point `x` coordinates are phases within `[0, period]` and `y` coordinates
/// are waveform values in display units. Backends connect consecutive points
/// with line segments after mapping both axes to pixels.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct WaveTrace {
    /// Stroke color applied to the polyline.
    pub color: Color,
    /// Stroke thickness in pixels.
    pub thickness: f32,
    /// Ordered samples along one period.
    pub points: Vec<Vec2>,
}

impl WaveTrace {
    /// Creates a trace from pre-sampled points.
    #[must_use]
    pub const fn new(color: Color, thickness: f32, points: Vec<Vec2>) -> Self {
        Self {
            color,
            thickness,
            points,
        }
    }
}

/// Describes the plotting surface shared by both traces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OscilloscopePresentation {
    /// Phase span drawn across the plot's width, in radians.
    pub period: f32,
    /// Waveform value mapped to the plot's top and bottom edges.
    pub vertical_range: f32,
    /// Color of the dashed zero axis.
    pub axis_color: Color,
    /// Solid fill behind the traces.
    pub background: Color,
}

impl OscilloscopePresentation {
    /// Length in pixels of each dash in the zero axis.
    pub const AXIS_DASH_LENGTH: f32 = 5.0;

    /// Gap in pixels between zero-axis dashes.
    pub const AXIS_DASH_GAP: f32 = 5.0;

    /// Creates a new oscilloscope descriptor.
    ///
    /// Returns an error when the period or vertical range is not strictly
    /// positive, which would collapse the pixel mapping.
    pub fn new(
        period: f32,
        vertical_range: f32,
        axis_color: Color,
        background: Color,
    ) -> Result<Self, RenderingError> {
        if !(period > 0.0) {
            return Err(RenderingError::InvalidPeriod { period });
        }
        if !(vertical_range > 0.0) {
            return Err(RenderingError::InvalidVerticalRange { vertical_range });
        }

        Ok(Self {
            period,
            vertical_range,
            axis_color,
            background,
        })
    }
}

/// Solid side panel hosting the interactive controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPanelView {
    /// Panel width in pixels, anchored to the window's right edge.
    pub width: f32,
    /// Background color painted behind the widgets.
    pub background: Color,
}

impl ControlPanelView {
    /// Largest amplitude magnitude the sliders offer.
    pub const AMPLITUDE_LIMIT: f32 = 2.0;

    /// Granularity of the amplitude sliders.
    pub const AMPLITUDE_STEP: f32 = 0.1;

    /// Largest harmonic multiplier the sliders offer.
    pub const MAX_HARMONIC: u32 = 10;

    /// Creates a new control panel descriptor.
    #[must_use]
    pub const fn new(width: f32, background: Color) -> Self {
        Self { width, background }
    }
}

/// Scene description combining the oscilloscope, traces and panel state.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Plotting surface shared by both traces.
    pub oscilloscope: OscilloscopePresentation,
    /// Target waveform drawn at canonical phase.
    pub target_trace: WaveTrace,
    /// Player approximation drawn at the running phase offset.
    pub approximation_trace: WaveTrace,
    /// Ordered approximation terms mirrored by the panel sliders.
    pub terms: Vec<Term>,
    /// Terms that seed the custom-wave editor when it opens.
    pub custom_seed_terms: Vec<Term>,
    /// Shape discriminant of the active target, mirrored by the selector.
    pub target_kind: TargetWaveKind,
    /// Whether the animation clock is advancing.
    pub play_mode: PlayMode,
    /// Last recorded similarity grade.
    pub score: Score,
    /// Optional side panel hosting the interactive controls.
    pub control_panel: Option<ControlPanelView>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    #[allow(clippy::too_many_arguments)] // Scene construction intentionally enumerates every channel explicitly.
    pub fn new(
        oscilloscope: OscilloscopePresentation,
        target_trace: WaveTrace,
        approximation_trace: WaveTrace,
        terms: Vec<Term>,
        custom_seed_terms: Vec<Term>,
        target_kind: TargetWaveKind,
        play_mode: PlayMode,
        score: Score,
        control_panel: Option<ControlPanelView>,
    ) -> Self {
        Self {
            oscilloscope,
            target_trace,
            approximation_trace,
            terms,
            custom_seed_terms,
            target_kind,
            play_mode,
            score,
            control_panel,
        }
    }
}

/// Single slider edit captured from the control panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TermEdit {
    /// Zero-based position of the edited term.
    pub index: usize,
    /// Full replacement value carrying the edited field.
    pub term: Term,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Whether the adapter detected a play/pause toggle on this frame.
    pub play_toggle: bool,
    /// Whether the adapter detected a phase reset request on this frame.
    pub reset: bool,
    /// Whether the adapter detected an add-term request on this frame.
    pub add_term: bool,
    /// Slider edits captured during this frame, in widget order.
    pub term_edits: Vec<TermEdit>,
    /// Built-in target selected from the wave selector, if any.
    pub target_selected: Option<TargetWaveKind>,
    /// Custom term list committed from the editor dialog, if any.
    pub custom_committed: Option<Vec<Term>>,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Harmonics scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and may mutate the scene
    /// before it is rendered, allowing drivers to animate world snapshots
    /// deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Error)]
pub enum RenderingError {
    /// The plotted period must be strictly positive.
    #[error("oscilloscope period must be positive (received {period})")]
    InvalidPeriod {
        /// Provided period that failed validation.
        period: f32,
    },
    /// The vertical range must be strictly positive.
    #[error("oscilloscope vertical range must be positive (received {vertical_range})")]
    InvalidVerticalRange {
        /// Provided vertical range that failed validation.
        vertical_range: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::{Color, OscilloscopePresentation, RenderingError};
    use std::f32::consts::TAU;

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::from_rgb_u8(100, 0, 255).lighten(0.5);
        assert!(color.red > 100.0 / 255.0);
        assert!(color.green > 0.0);
        assert!((color.blue - 1.0).abs() < f32::EPSILON);
        assert!((color.alpha - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn lighten_clamps_the_amount() {
        let color = Color::from_rgb_u8(10, 20, 30).lighten(2.0);
        assert_eq!(color, Color::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn oscilloscope_rejects_a_degenerate_period() {
        let result = OscilloscopePresentation::new(
            0.0,
            110.0,
            Color::default(),
            Color::default(),
        );
        assert_eq!(
            result,
            Err(RenderingError::InvalidPeriod { period: 0.0 })
        );
    }

    #[test]
    fn oscilloscope_rejects_a_degenerate_vertical_range() {
        let result = OscilloscopePresentation::new(
            TAU,
            -1.0,
            Color::default(),
            Color::default(),
        );
        assert_eq!(
            result,
            Err(RenderingError::InvalidVerticalRange {
                vertical_range: -1.0
            })
        );
    }

    #[test]
    fn oscilloscope_accepts_the_canonical_configuration() {
        let result = OscilloscopePresentation::new(
            TAU,
            110.0,
            Color::from_rgb_u8(75, 85, 99),
            Color::from_rgb_u8(55, 65, 81),
        );
        assert!(result.is_ok());
    }
}
