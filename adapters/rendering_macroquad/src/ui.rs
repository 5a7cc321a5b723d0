//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter
//! can remain agnostic of Macroquad's UI types. The control panel exposes
//! the term sliders, transport buttons, target selector and score readout;
//! the custom-wave editor dialog lives here as well.

use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

use harmonics_core::{Harmonic, PlayMode, Score, TargetWaveKind, Term};
use harmonics_rendering::{ControlPanelView, TermEdit};

/// Display labels for the wave selector, ordered like
/// [`TargetWaveKind::ALL`].
const TARGET_LABELS: [&str; 5] = [
    "Square Wave",
    "Sawtooth Wave",
    "Triangle Wave",
    "Pulse Wave",
    "Custom Wave",
];

/// Working state of the custom-wave editor dialog.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct CustomEditorState {
    /// Editable copy of the custom target's terms.
    pub terms: Vec<Term>,
}

/// UI state that must survive across frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ControlPanelUiState {
    /// Selector index mirrored into the combo box widget.
    target_selection: usize,
    /// Editor dialog working copy while the dialog is open.
    editor: Option<CustomEditorState>,
}

/// Snapshot of the control panel's layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ControlPanelUiContext<'a> {
    /// Top-left corner of the panel in screen coordinates.
    pub origin: Vec2,
    /// Panel dimensions in screen space.
    pub size: Vec2,
    /// Background colour applied to the window skin so the UI matches the
    /// adapter's solid rectangle.
    pub background: Color,
    /// Full screen dimensions, used to centre the editor dialog.
    pub screen: Vec2,
    /// Current play mode, displayed on the transport button.
    pub play_mode: PlayMode,
    /// Last recorded similarity grade.
    pub score: Score,
    /// Shape discriminant of the active target.
    pub target_kind: TargetWaveKind,
    /// Ordered approximation terms mirrored by the sliders.
    pub terms: &'a [Term],
    /// Terms seeding the editor dialog when it opens.
    pub custom_seed_terms: &'a [Term],
}

/// Outcome of rendering the control panel UI during the current frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ControlPanelUiResult {
    /// Whether the play/pause button was pressed during this frame.
    pub play_toggle: bool,
    /// Whether the reset button was pressed during this frame.
    pub reset: bool,
    /// Whether the add-term button was pressed during this frame.
    pub add_term: bool,
    /// Slider edits captured during this frame.
    pub term_edits: Vec<TermEdit>,
    /// Built-in target chosen from the selector, if any.
    pub target_selected: Option<TargetWaveKind>,
    /// Custom term list committed by the editor's save button, if any.
    pub custom_committed: Option<Vec<Term>>,
}

/// Renders the control panel's interactive elements for the current frame.
pub(crate) fn draw_control_panel_ui(
    ui: &mut Ui,
    context: ControlPanelUiContext<'_>,
    state: &mut ControlPanelUiState,
) -> ControlPanelUiResult {
    apply_panel_skin(ui, context.background);

    let mut result = ControlPanelUiResult::default();

    if state.editor.is_none() {
        state.target_selection = kind_index(context.target_kind);
    }

    let _ = ui.window(
        hash!("control_panel"),
        context.origin,
        context.size,
        |ui| {
            ui.label(None, &format!("Score: {}", context.score.get()));
            ui.separator();

            let transport_label = match context.play_mode {
                PlayMode::Running => "Pause",
                PlayMode::Paused => "Play",
            };
            if ui.button(None, transport_label) {
                result.play_toggle = true;
            }
            ui.same_line(0.0);
            if ui.button(None, "Reset") {
                result.reset = true;
            }

            ui.separator();
            let previous_selection = state.target_selection;
            let _ = ui.combo_box(
                hash!("target_wave"),
                "Target",
                &TARGET_LABELS,
                &mut state.target_selection,
            );
            if state.target_selection != previous_selection && state.editor.is_none() {
                let chosen = kind_from_index(state.target_selection);
                if chosen == TargetWaveKind::Custom {
                    state.editor = Some(CustomEditorState {
                        terms: context.custom_seed_terms.to_vec(),
                    });
                } else {
                    result.target_selected = Some(chosen);
                }
            }

            ui.separator();
            for (index, term) in context.terms.iter().enumerate() {
                if let Some(edit) = draw_term_sliders(ui, hash!("term", index), index, term) {
                    result.term_edits.push(edit);
                }
            }

            if ui.button(None, "Add Term") {
                result.add_term = true;
            }
        },
    );

    if let Some(editor) = state.editor.as_mut() {
        let mut committed = None;
        let mut cancelled = false;

        let dialog_size = Vec2::new(320.0, 120.0 + editor.terms.len() as f32 * 96.0);
        let dialog_origin = (context.screen - dialog_size) * 0.5;

        let _ = ui.window(hash!("custom_editor"), dialog_origin, dialog_size, |ui| {
            ui.label(None, "Set Custom Wave");
            ui.separator();

            for index in 0..editor.terms.len() {
                let term = editor.terms[index];
                if let Some(edit) =
                    draw_term_sliders(ui, hash!("custom_term", index), index, &term)
                {
                    editor.terms[index] = edit.term;
                }
            }

            ui.separator();
            if ui.button(None, "Save") {
                committed = Some(editor.terms.clone());
            }
            ui.same_line(0.0);
            if ui.button(None, "Cancel") {
                cancelled = true;
            }
        });

        if let Some(terms) = committed {
            result.custom_committed = Some(terms);
            state.editor = None;
        } else if cancelled {
            state.editor = None;
            state.target_selection = kind_index(context.target_kind);
        }
    }

    ui.pop_skin();

    result
}

/// Draws the amplitude and frequency sliders for one term.
///
/// Returns the captured edit when either slider moved beyond its snapping
/// granularity.
fn draw_term_sliders(ui: &mut Ui, id: u64, index: usize, term: &Term) -> Option<TermEdit> {
    ui.label(None, &format!("Term {}", index + 1));

    let mut amplitude = term.amplitude();
    ui.slider(
        id,
        "Amplitude",
        -ControlPanelView::AMPLITUDE_LIMIT..ControlPanelView::AMPLITUDE_LIMIT,
        &mut amplitude,
    );
    let amplitude = snap_amplitude(amplitude);

    let mut frequency = term.frequency().get() as f32;
    ui.slider(
        id.wrapping_add(1),
        "Frequency",
        1.0..ControlPanelView::MAX_HARMONIC as f32,
        &mut frequency,
    );
    let frequency = snap_harmonic(frequency);

    let edited = Term::new(amplitude, frequency);
    if edited != *term {
        Some(TermEdit {
            index,
            term: edited,
        })
    } else {
        None
    }
}

/// Snaps a slider amplitude to the panel's 0.1 granularity within limits.
pub(crate) fn snap_amplitude(value: f32) -> f32 {
    let clamped = value.clamp(
        -ControlPanelView::AMPLITUDE_LIMIT,
        ControlPanelView::AMPLITUDE_LIMIT,
    );
    (clamped / ControlPanelView::AMPLITUDE_STEP).round() * ControlPanelView::AMPLITUDE_STEP
}

/// Snaps a slider frequency to a whole harmonic within the panel's range.
pub(crate) fn snap_harmonic(value: f32) -> Harmonic {
    let clamped = value
        .round()
        .clamp(1.0, ControlPanelView::MAX_HARMONIC as f32);
    Harmonic::new(clamped as u32)
}

/// Selector index of the provided wave kind.
pub(crate) fn kind_index(kind: TargetWaveKind) -> usize {
    TargetWaveKind::ALL
        .iter()
        .position(|candidate| *candidate == kind)
        .unwrap_or(0)
}

/// Wave kind named by the provided selector index.
pub(crate) fn kind_from_index(index: usize) -> TargetWaveKind {
    TargetWaveKind::ALL
        .get(index)
        .copied()
        .unwrap_or(TargetWaveKind::Square)
}

fn apply_panel_skin(ui: &mut Ui, background: Color) {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(background)
        .color_hovered(background)
        .color_clicked(background)
        .color_selected(background)
        .color_selected_hovered(background)
        .color_inactive(background)
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(37, 99, 235, 255))
        .color_hovered(Color::from_rgba(29, 78, 216, 255))
        .color_clicked(Color::from_rgba(30, 64, 175, 255))
        .color_selected(Color::from_rgba(37, 99, 235, 255))
        .color_selected_hovered(Color::from_rgba(29, 78, 216, 255))
        .color_inactive(Color::from_rgba(30, 64, 175, 200))
        .margin(RectOffset::new(0.0, 0.0, 8.0, 8.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);
}

#[cfg(test)]
mod tests {
    use super::{kind_from_index, kind_index, snap_amplitude, snap_harmonic};
    use harmonics_core::{Harmonic, TargetWaveKind};

    #[test]
    fn amplitudes_snap_to_tenths() {
        assert!((snap_amplitude(0.349) - 0.3).abs() < 1e-6);
        assert!((snap_amplitude(-1.96) + 2.0).abs() < 1e-6);
    }

    #[test]
    fn amplitudes_clamp_to_the_slider_limit() {
        assert!((snap_amplitude(5.0) - 2.0).abs() < 1e-6);
        assert!((snap_amplitude(-5.0) + 2.0).abs() < 1e-6);
    }

    #[test]
    fn harmonics_snap_to_whole_multipliers() {
        assert_eq!(snap_harmonic(3.4), Harmonic::new(3));
        assert_eq!(snap_harmonic(3.6), Harmonic::new(4));
    }

    #[test]
    fn harmonics_clamp_to_the_slider_range() {
        assert_eq!(snap_harmonic(0.0), Harmonic::new(1));
        assert_eq!(snap_harmonic(99.0), Harmonic::new(10));
    }

    #[test]
    fn selector_indices_round_trip_every_kind() {
        for kind in TargetWaveKind::ALL {
            assert_eq!(kind_from_index(kind_index(kind)), kind);
        }
    }

    #[test]
    fn out_of_range_selector_indices_fall_back_to_square() {
        assert_eq!(kind_from_index(17), TargetWaveKind::Square);
    }
}
