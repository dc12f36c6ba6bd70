/// State management module
///
/// This module holds the GUI-free data model:
/// - File selection and validation (selection.rs)
/// - The upload control state machine (upload.rs)

pub mod selection;
pub mod upload;
