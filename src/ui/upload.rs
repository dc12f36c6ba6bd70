/// The upload surface
///
/// Renders the drop zone, pick button, preview pane, error banner and
/// the analyze button from the current `UploadControl` state. Pure
/// view code; every interaction is reported upward as a `Message`.

use iced::widget::{button, column, container, image, text, Column};
use iced::{Alignment, Element, Length};

use crate::state::upload::UploadControl;
use crate::Message;

/// Build the main upload view.
pub fn view<'a>(
    control: &'a UploadControl,
    preview: Option<&'a image::Handle>,
    drag_active: bool,
) -> Element<'a, Message> {
    let mut content: Column<Message> = column![
        text("PneumoScan").size(36),
        text("Chest X-ray pneumonia screening").size(16),
        drop_zone(control, drag_active),
    ]
    .spacing(20)
    .padding(40)
    .align_x(Alignment::Center);

    if let (true, Some(handle)) = (control.preview_visible(), preview) {
        content = content.push(preview_pane(handle));
    }

    if let Some(message) = control.error() {
        content = content.push(text(message).size(14).style(text::danger));
    }

    content = content.push(analyze_controls(control));

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .into()
}

/// The file intake zone: pick button, or the drag overlay while a file
/// is hovering over the window.
fn drop_zone<'a>(control: &'a UploadControl, drag_active: bool) -> Element<'a, Message> {
    let inner: Element<Message> = if drag_active {
        text("Drop the image here").size(18).into()
    } else {
        column![
            button(text(control.button_label()).size(16))
                .on_press(Message::PickFile)
                .padding(10)
                .style(button::secondary),
            text("or drag an image into the window").size(13),
        ]
        .spacing(8)
        .align_x(Alignment::Center)
        .into()
    };

    container(inner)
        .padding(30)
        .center_x(Length::Fixed(360.0))
        .style(container::bordered_box)
        .into()
}

/// Preview of the selected image with its remove affordance.
fn preview_pane(handle: &image::Handle) -> Element<'_, Message> {
    column![
        image(handle.clone()).width(Length::Fixed(280.0)),
        button(text("Remove").size(13))
            .on_press(Message::RemoveFile)
            .style(button::danger),
    ]
    .spacing(8)
    .align_x(Alignment::Center)
    .into()
}

/// The submit button, swapped for a loading indicator while a request
/// is in flight.
fn analyze_controls(control: &UploadControl) -> Element<'_, Message> {
    if control.is_submitting() {
        column![
            button(text("Analyzing...").size(16)).padding(10),
            text("Contacting the analysis service...").size(13),
        ]
        .spacing(8)
        .align_x(Alignment::Center)
        .into()
    } else {
        button(text("Start diagnosis").size(16))
            .on_press(Message::Analyze)
            .padding(10)
            .style(button::primary)
            .into()
    }
}
