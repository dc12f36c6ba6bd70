/// The upload control state machine
///
/// Pure state, no widgets: `main.rs` feeds events in and reads the
/// current phase back out to build the view. Keeping this GUI-free is
/// what makes the transition rules unit-testable.

use crate::api::client::ApiError;
use crate::api::schema::AnalysisResult;
use super::selection::{SelectedFile, SelectionError};

/// Pick-button label when nothing is selected
pub const DEFAULT_PICK_LABEL: &str = "Choose a file";

/// Banner copy when analysis is requested with no selection
pub const NO_FILE_MESSAGE: &str = "Please select a file to analyze.";

/// Where the control currently is in its lifecycle.
///
/// `Submitting` and `ResultShown` keep the file so a failed or finished
/// analysis drops back to a usable selection instead of an empty control.
#[derive(Debug, Clone)]
pub enum Phase {
    Empty,
    Selected(SelectedFile),
    Submitting(SelectedFile),
    ResultShown {
        file: SelectedFile,
        result: AnalysisResult,
    },
}

/// The upload control: one selection slot, one error banner.
#[derive(Debug, Clone)]
pub struct UploadControl {
    phase: Phase,
    error: Option<String>,
}

impl UploadControl {
    pub fn new() -> Self {
        UploadControl {
            phase: Phase::Empty,
            error: None,
        }
    }

    /// Apply the outcome of loading and validating a file.
    ///
    /// A valid file replaces any previous selection; a rejected file
    /// clears the control back to `Empty` and raises the banner.
    /// Returns true when a new file was accepted, so the caller knows
    /// to kick off a preview decode.
    ///
    /// Selection changes are ignored while a submission is in flight;
    /// the control supports a single in-flight operation.
    pub fn select(&mut self, outcome: Result<SelectedFile, SelectionError>) -> bool {
        if matches!(self.phase, Phase::Submitting(_)) {
            return false;
        }

        match outcome {
            Ok(file) => {
                self.error = None;
                self.phase = Phase::Selected(file);
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.phase = Phase::Empty;
                false
            }
        }
    }

    /// Start a submission.
    ///
    /// Returns the file to upload, or None when the transition is not
    /// allowed: no selection raises the banner, and a submission already
    /// in flight is silently ignored (double-click guard).
    pub fn begin_submit(&mut self) -> Option<SelectedFile> {
        self.error = None;

        match &self.phase {
            Phase::Submitting(_) => None,
            Phase::Empty => {
                self.error = Some(NO_FILE_MESSAGE.to_string());
                None
            }
            Phase::Selected(file) | Phase::ResultShown { file, .. } => {
                let file = file.clone();
                self.phase = Phase::Submitting(file.clone());
                Some(file)
            }
        }
    }

    /// Apply the analysis outcome.
    ///
    /// Success moves to `ResultShown`; failure reverts to `Selected`
    /// with the error in the banner, so the user can simply retry.
    /// A response arriving when the control is no longer submitting
    /// (the file was removed meanwhile) is dropped.
    pub fn complete(&mut self, outcome: Result<AnalysisResult, ApiError>) {
        let phase = std::mem::replace(&mut self.phase, Phase::Empty);

        match phase {
            Phase::Submitting(file) => match outcome {
                Ok(result) => {
                    self.phase = Phase::ResultShown { file, result };
                }
                Err(err) => {
                    self.error = Some(err.to_string());
                    self.phase = Phase::Selected(file);
                }
            },
            // Stale response, nothing was in flight
            other => self.phase = other,
        }
    }

    /// Explicit remove: back to the exact initial state.
    pub fn remove(&mut self) {
        self.phase = Phase::Empty;
        self.error = None;
    }

    /// The currently selected file, whatever the phase.
    pub fn file(&self) -> Option<&SelectedFile> {
        match &self.phase {
            Phase::Empty => None,
            Phase::Selected(file)
            | Phase::Submitting(file)
            | Phase::ResultShown { file, .. } => Some(file),
        }
    }

    /// The last analysis result, if one is being shown.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            Phase::ResultShown { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting(_))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Invariant: the pick button always reflects the selection slot.
    pub fn button_label(&self) -> &str {
        self.file()
            .map(|file| file.name.as_str())
            .unwrap_or(DEFAULT_PICK_LABEL)
    }

    /// Invariant: the preview pane is visible exactly when a file is selected.
    pub fn preview_visible(&self) -> bool {
        self.file().is_some()
    }
}

impl Default for UploadControl {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::schema::Diagnosis;

    fn valid_file() -> SelectedFile {
        SelectedFile {
            name: "chest.png".to_string(),
            mime: "image/png",
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    fn normal_result() -> AnalysisResult {
        serde_json::from_str(r#"{"diagnosis": "normal"}"#).unwrap()
    }

    #[test]
    fn test_initial_state_is_empty() {
        let control = UploadControl::new();
        assert!(control.file().is_none());
        assert!(!control.preview_visible());
        assert_eq!(control.button_label(), DEFAULT_PICK_LABEL);
        assert!(control.error().is_none());
    }

    #[test]
    fn test_accepted_selection_updates_label_and_preview() {
        let mut control = UploadControl::new();
        let accepted = control.select(Ok(valid_file()));

        assert!(accepted);
        assert_eq!(control.button_label(), "chest.png");
        assert!(control.preview_visible());
        assert!(control.error().is_none());
    }

    #[test]
    fn test_rejected_selection_clears_control_and_raises_banner() {
        let mut control = UploadControl::new();
        control.select(Ok(valid_file()));

        let accepted = control.select(Err(SelectionError::TooLarge));

        assert!(!accepted);
        assert!(control.file().is_none());
        assert!(!control.preview_visible());
        assert_eq!(control.button_label(), DEFAULT_PICK_LABEL);
        assert_eq!(
            control.error(),
            Some("File is too large. The limit is 5 MB.")
        );
    }

    #[test]
    fn test_submit_without_file_raises_banner_and_stays_empty() {
        let mut control = UploadControl::new();
        let upload = control.begin_submit();

        assert!(upload.is_none());
        assert!(!control.is_submitting());
        assert_eq!(control.error(), Some(NO_FILE_MESSAGE));
    }

    #[test]
    fn test_submit_with_file_enters_submitting() {
        let mut control = UploadControl::new();
        control.select(Ok(valid_file()));

        let upload = control.begin_submit();

        assert_eq!(upload, Some(valid_file()));
        assert!(control.is_submitting());
        // The file is still shown while the request is in flight
        assert_eq!(control.button_label(), "chest.png");
    }

    #[test]
    fn test_double_submit_is_guarded() {
        let mut control = UploadControl::new();
        control.select(Ok(valid_file()));

        assert!(control.begin_submit().is_some());
        assert!(control.begin_submit().is_none());
        // Silently ignored, no error banner
        assert!(control.error().is_none());
    }

    #[test]
    fn test_selection_ignored_while_submitting() {
        let mut control = UploadControl::new();
        control.select(Ok(valid_file()));
        control.begin_submit();

        let mut other = valid_file();
        other.name = "other.png".to_string();
        let accepted = control.select(Ok(other));

        assert!(!accepted);
        assert_eq!(control.button_label(), "chest.png");
    }

    #[test]
    fn test_successful_analysis_shows_result() {
        let mut control = UploadControl::new();
        control.select(Ok(valid_file()));
        control.begin_submit();

        control.complete(Ok(normal_result()));

        assert!(!control.is_submitting());
        let result = control.result().unwrap();
        assert_eq!(result.diagnosis, Diagnosis::Normal);
        // The selection survives, allowing re-submission
        assert_eq!(control.button_label(), "chest.png");
    }

    #[test]
    fn test_failed_analysis_reverts_to_selected_with_banner() {
        let mut control = UploadControl::new();
        control.select(Ok(valid_file()));
        control.begin_submit();

        control.complete(Err(ApiError::Network("connection refused".to_string())));

        assert!(!control.is_submitting());
        assert!(control.result().is_none());
        assert_eq!(control.button_label(), "chest.png");
        assert!(control.error().unwrap().contains("connection refused"));
        // The control recovered: submitting again works
        assert!(control.begin_submit().is_some());
    }

    #[test]
    fn test_stale_response_after_remove_is_dropped() {
        let mut control = UploadControl::new();
        control.select(Ok(valid_file()));
        control.begin_submit();
        control.remove();

        control.complete(Ok(normal_result()));

        assert!(control.file().is_none());
        assert!(control.result().is_none());
    }

    #[test]
    fn test_remove_is_idempotent_reset() {
        let mut control = UploadControl::new();
        control.select(Ok(valid_file()));
        control.begin_submit();
        control.complete(Ok(normal_result()));

        control.remove();
        control.remove();

        assert!(control.file().is_none());
        assert!(!control.preview_visible());
        assert_eq!(control.button_label(), DEFAULT_PICK_LABEL);
        assert!(control.error().is_none());
        assert!(control.result().is_none());
    }

    #[test]
    fn test_resubmission_allowed_from_result_shown() {
        let mut control = UploadControl::new();
        control.select(Ok(valid_file()));
        control.begin_submit();
        control.complete(Ok(normal_result()));

        assert!(control.begin_submit().is_some());
        assert!(control.is_submitting());
    }
}
