//! Handler for the fuzzy picker.

use crossterm::event::{KeyCode, KeyModifiers};

use super::super::app::PickerState;

/// Action to apply after handling a picker key.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PickerAction {
    Close,
    /// Index into the unfiltered label list.
    Select(usize),
    /// No action; keep the picker open.
    Keep,
}

/// Handle a key while the picker is open.
pub(crate) fn handle_picker_key(
    key_code: KeyCode,
    key_modifiers: KeyModifiers,
    picker: &mut PickerState,
) -> PickerAction {
    let ctrl = key_modifiers.contains(KeyModifiers::CONTROL);

    // Filter input
    match key_code {
        KeyCode::Backspace => {
            picker.filter.pop();
        }
        KeyCode::Char(c) if !ctrl => {
            picker.filter.push(c);
        }
        _ => {}
    }

    let filtered_len = picker.filtered().len();
    match key_code {
        KeyCode::Esc => PickerAction::Close,
        KeyCode::Char('c') if ctrl => PickerAction::Close,
        KeyCode::Up => {
            picker.selected_index = picker.selected_index.saturating_sub(1);
            PickerAction::Keep
        }
        KeyCode::Char('p') if ctrl => {
            picker.selected_index = picker.selected_index.saturating_sub(1);
            PickerAction::Keep
        }
        KeyCode::Down => {
            move_down(picker, filtered_len);
            PickerAction::Keep
        }
        KeyCode::Char('n') if ctrl => {
            move_down(picker, filtered_len);
            PickerAction::Keep
        }
        KeyCode::Enter => picker
            .filtered()
            .get(picker.selected_index)
            .map(|(i, _)| PickerAction::Select(*i))
            .unwrap_or(PickerAction::Keep),
        KeyCode::Backspace | KeyCode::Char(_) => {
            picker.selected_index = picker.selected_index.min(filtered_len.saturating_sub(1));
            PickerAction::Keep
        }
        _ => PickerAction::Keep,
    }
}

fn move_down(picker: &mut PickerState, filtered_len: usize) {
    if filtered_len > 0 {
        picker.selected_index = (picker.selected_index + 1).min(filtered_len - 1);
    }
}
