use harmonics_core::{Harmonic, TargetWaveKind, Term};
use harmonics_rendering::{FrameInput, TermEdit};
use harmonics_rendering_macroquad::ControlPanelInputState;

fn run_toggle_sequence(sequence: &[bool]) -> Vec<bool> {
    let mut state = ControlPanelInputState::default();
    let mut toggles = Vec::new();
    for &pressed in sequence {
        let mut input = FrameInput::default();
        state.take_into(&mut input);
        toggles.push(input.play_toggle);
        if pressed {
            state.register_play_toggle();
        }
    }

    // Flush any trailing latched press so the harness observes the final toggle.
    let mut input = FrameInput::default();
    state.take_into(&mut input);
    toggles.push(input.play_toggle);
    toggles
}

#[test]
fn play_toggle_sequence_is_deterministic() {
    let button_sequence = [false, true, false, true, true, false];
    let expected = vec![false, false, true, false, true, true, false];

    let first_run = run_toggle_sequence(&button_sequence);
    let second_run = run_toggle_sequence(&button_sequence);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn term_edits_replay_in_widget_order() {
    let mut state = ControlPanelInputState::default();
    let first = TermEdit {
        index: 0,
        term: Term::new(0.5, Harmonic::FUNDAMENTAL),
    };
    let second = TermEdit {
        index: 2,
        term: Term::new(-0.3, Harmonic::new(5)),
    };
    state.register_term_edit(first);
    state.register_term_edit(second);

    let mut input = FrameInput::default();
    state.take_into(&mut input);
    assert_eq!(input.term_edits, vec![first, second]);

    let mut drained = FrameInput::default();
    state.take_into(&mut drained);
    assert!(drained.term_edits.is_empty());
}

#[test]
fn later_target_selections_supersede_earlier_ones() {
    let mut state = ControlPanelInputState::default();
    state.register_target(TargetWaveKind::Sawtooth);
    state.register_target(TargetWaveKind::Pulse);

    let mut input = FrameInput::default();
    state.take_into(&mut input);
    assert_eq!(input.target_selected, Some(TargetWaveKind::Pulse));
}

#[test]
fn committed_custom_terms_survive_one_frame_only() {
    let mut state = ControlPanelInputState::default();
    let terms = vec![Term::new(1.0, Harmonic::FUNDAMENTAL)];
    state.register_custom_terms(terms.clone());

    let mut input = FrameInput::default();
    state.take_into(&mut input);
    assert_eq!(input.custom_committed, Some(terms));

    let mut drained = FrameInput::default();
    state.take_into(&mut drained);
    assert_eq!(drained.custom_committed, None);
}
