//! Picker state: candidate labels, filter query, selection.

use ratatui::widgets::ListState;

use crate::core::util;

pub struct PickerState {
    pub(super) title: String,
    pub(super) labels: Vec<String>,
    pub(super) selected_index: usize,
    pub(super) list_state: ListState,
    /// Fuzzy filter typed by the user.
    pub(super) filter: String,
}

impl PickerState {
    pub fn new(title: &str, labels: &[String]) -> Self {
        Self {
            title: title.to_string(),
            labels: labels.to_vec(),
            selected_index: 0,
            list_state: ListState::default(),
            filter: String::new(),
        }
    }

    /// Labels matching the filter, with their index in the original list.
    pub(super) fn filtered(&self) -> Vec<(usize, &str)> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| util::fuzzy_match(l, &self.filter))
            .map(|(i, l)| (i, l.as_str()))
            .collect()
    }
}
