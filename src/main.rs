use iced::widget::{center, container, image, mouse_area, opaque, stack};
use iced::{window, Color, Element, Event, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;

mod api;
mod preview;
mod state;
mod ui;

use api::client::{AnalysisClient, ApiError};
use api::schema::AnalysisResult;
use state::selection::{SelectedFile, SelectionError, MAX_UPLOAD_BYTES};
use state::upload::UploadControl;

/// Main application state
struct PneumoScan {
    /// The upload control state machine
    control: UploadControl,
    /// Client for the analysis service
    client: AnalysisClient,
    /// Decoded preview of the selected file
    preview: Option<image::Handle>,
    /// Bumped on every selection change; stale preview decodes carrying
    /// an older generation are discarded on arrival
    preview_generation: u64,
    /// Decoded heatmap from the last verdict, if one was returned
    heatmap: Option<image::Handle>,
    /// Whether the result modal is open
    modal_open: bool,
    /// Whether a file is currently hovering over the window
    drag_active: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the pick button
    PickFile,
    /// OS drag entered the window
    FileHovered,
    /// OS drag left the window without dropping
    FileHoverLeft,
    /// A file was dropped onto the window
    FileDropped(PathBuf),
    /// Background file load and validation finished
    FileLoaded(Result<SelectedFile, SelectionError>),
    /// Background preview decode finished (tagged with its generation)
    PreviewDecoded(u64, Result<image::Handle, String>),
    /// User clicked the analyze button
    Analyze,
    /// The analysis round trip finished
    AnalysisComplete(Result<AnalysisResult, ApiError>),
    /// User removed the current selection
    RemoveFile,
    /// User dismissed the result modal
    CloseModal,
}

impl PneumoScan {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let client = AnalysisClient::new();
        println!("🩺 PneumoScan ready, analysis service at {}", client.analyze_url());

        (
            PneumoScan {
                control: UploadControl::new(),
                client,
                preview: None,
                preview_generation: 0,
                heatmap: None,
                modal_open: false,
                drag_active: false,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickFile => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Select a chest X-ray image")
                    .add_filter("Images", &["jpg", "jpeg", "png", "webp"])
                    .pick_file();

                if let Some(path) = file {
                    return Task::perform(load_file(path), Message::FileLoaded);
                }

                Task::none()
            }
            Message::FileHovered => {
                self.drag_active = true;
                Task::none()
            }
            Message::FileHoverLeft => {
                self.drag_active = false;
                Task::none()
            }
            Message::FileDropped(path) => {
                self.drag_active = false;
                Task::perform(load_file(path), Message::FileLoaded)
            }
            Message::FileLoaded(outcome) => {
                // One in-flight operation at a time: ignore selection
                // changes while a submission is running
                if self.control.is_submitting() {
                    return Task::none();
                }

                self.preview = None;
                self.preview_generation += 1;
                self.modal_open = false;

                if self.control.select(outcome) {
                    if let Some(file) = self.control.file() {
                        println!("🖼️  Selected {} ({} bytes, {})", file.name, file.bytes.len(), file.mime);

                        let generation = self.preview_generation;
                        return Task::perform(
                            preview::decode_preview(file.bytes.clone()),
                            move |result| Message::PreviewDecoded(generation, result),
                        );
                    }
                }

                Task::none()
            }
            Message::PreviewDecoded(generation, outcome) => {
                // The selection changed while this decode was in flight
                if generation != self.preview_generation {
                    return Task::none();
                }

                match outcome {
                    Ok(handle) if self.control.preview_visible() => {
                        self.preview = Some(handle);
                    }
                    Ok(_) => {}
                    Err(err) => {
                        // The bytes passed validation, so keep the
                        // selection and let the service have its say
                        eprintln!("⚠️  Preview decode failed: {}", err);
                    }
                }

                Task::none()
            }
            Message::Analyze => {
                if let Some(file) = self.control.begin_submit() {
                    println!("🔬 Analyzing {}...", file.name);
                    self.modal_open = false;

                    let client = self.client.clone();
                    return Task::perform(
                        async move { client.analyze(file).await },
                        Message::AnalysisComplete,
                    );
                }

                Task::none()
            }
            Message::AnalysisComplete(outcome) => {
                match &outcome {
                    Ok(result) => {
                        println!("✅ Verdict: {}", result.diagnosis.label());

                        self.heatmap = result.heatmap_image.as_ref().and_then(|heatmap| {
                            match preview::decode_heatmap(heatmap) {
                                Ok(handle) => Some(handle),
                                Err(err) => {
                                    eprintln!("⚠️  Heatmap decode failed: {}", err);
                                    None
                                }
                            }
                        });
                        self.modal_open = true;
                    }
                    Err(err) => {
                        eprintln!("❌ Analysis failed: {}", err);
                        self.heatmap = None;
                    }
                }

                self.control.complete(outcome);
                Task::none()
            }
            Message::RemoveFile => {
                self.control.remove();
                self.preview = None;
                self.preview_generation += 1;
                self.heatmap = None;
                self.modal_open = false;
                Task::none()
            }
            Message::CloseModal => {
                // Dismissing the modal leaves the upload control untouched
                self.modal_open = false;
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let base = ui::upload::view(&self.control, self.preview.as_ref(), self.drag_active);

        if self.modal_open {
            if let Some(result) = self.control.result() {
                let dialog = ui::modal::view(result, self.heatmap.as_ref());

                // Dimmed backdrop; clicking outside the dialog closes it
                let overlay = opaque(
                    mouse_area(
                        center(opaque(dialog)).style(|_theme| container::Style {
                            background: Some(
                                Color {
                                    a: 0.8,
                                    ..Color::BLACK
                                }
                                .into(),
                            ),
                            ..container::Style::default()
                        }),
                    )
                    .on_press(Message::CloseModal),
                );

                return stack![base, overlay].into();
            }
        }

        base
    }

    /// Listen for OS drag-and-drop events on the window
    fn subscription(&self) -> Subscription<Message> {
        iced::event::listen_with(handle_window_event)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Map window events to drag-and-drop messages
fn handle_window_event(
    event: Event,
    _status: iced::event::Status,
    _window: window::Id,
) -> Option<Message> {
    match event {
        Event::Window(window::Event::FileHovered(_)) => Some(Message::FileHovered),
        Event::Window(window::Event::FilesHoveredLeft) => Some(Message::FileHoverLeft),
        // First file only; further drops simply replace the selection
        Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
        _ => None,
    }
}

fn main() -> iced::Result {
    iced::application("PneumoScan", PneumoScan::update, PneumoScan::view)
        .subscription(PneumoScan::subscription)
        .theme(PneumoScan::theme)
        .window_size((540.0, 720.0))
        .centered()
        .run_with(PneumoScan::new)
}

/// Async function to load and validate a file from disk
/// Runs off the UI loop so large files never block rendering
async fn load_file(path: PathBuf) -> Result<SelectedFile, SelectionError> {
    let metadata = tokio::fs::metadata(&path)
        .await
        .map_err(|e| SelectionError::Io(e.to_string()))?;

    // Reject oversized files before pulling them into memory
    if metadata.len() > MAX_UPLOAD_BYTES as u64 {
        return Err(SelectionError::TooLarge);
    }

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| SelectionError::Io(e.to_string()))?;

    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    SelectedFile::from_bytes(name, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_file_missing_path_is_io_error() {
        let result = load_file(PathBuf::from("/nonexistent/scan.png")).await;
        assert!(matches!(result, Err(SelectionError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_file_sniffs_and_names() {
        let path = std::env::temp_dir().join("pneumoscan_test_scan.png");
        let png_magic = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        std::fs::write(&path, png_magic).unwrap();

        let file = load_file(path.clone()).await.unwrap();
        assert_eq!(file.name, "pneumoscan_test_scan.png");
        assert_eq!(file.mime, "image/png");

        std::fs::remove_file(path).ok();
    }
}
