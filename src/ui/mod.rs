/// View functions for the application
///
/// - `upload.rs` - drop zone, preview pane, error banner, analyze button
/// - `modal.rs` - the diagnosis result dialog

pub mod modal;
pub mod upload;
