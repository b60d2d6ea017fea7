//! Key handling for the picker.

mod picker;

pub(crate) use picker::{PickerAction, handle_picker_key};
