/// The result modal
///
/// One fixed copy template per diagnosis category, a probability
/// breakdown when the service sent one, the heatmap when present, and
/// a model-metadata footer.

use iced::widget::{button, column, container, horizontal_space, image, row, text, Column};
use iced::{Alignment, Element, Length};

use crate::api::schema::{AnalysisResult, Diagnosis};
use crate::Message;

/// Fixed copy shown for one diagnosis category.
pub struct DiagnosisCopy {
    pub headline: &'static str,
    pub verdict: &'static str,
    pub recommendation: &'static str,
}

/// The three literal templates, one per category.
pub fn diagnosis_copy(diagnosis: Diagnosis) -> DiagnosisCopy {
    match diagnosis {
        Diagnosis::Normal => DiagnosisCopy {
            headline: "All clear!",
            verdict: "Verdict: no signs of pneumonia were found.",
            recommendation: "Recommendation: no further examination is required.",
        },
        Diagnosis::ViralPneumonia => DiagnosisCopy {
            headline: "Signs of viral pneumonia",
            verdict: "Verdict: the scan shows patterns consistent with viral pneumonia.",
            recommendation:
                "Recommendation: consult a physician to confirm the finding and discuss treatment.",
        },
        Diagnosis::BacterialPneumonia => DiagnosisCopy {
            headline: "Signs of bacterial pneumonia",
            verdict: "Verdict: the scan shows patterns consistent with bacterial pneumonia.",
            recommendation:
                "Recommendation: see a physician promptly; bacterial pneumonia usually requires antibiotics.",
        },
    }
}

/// Build the modal dialog for an analysis result.
pub fn view<'a>(
    result: &'a AnalysisResult,
    heatmap: Option<&'a image::Handle>,
) -> Element<'a, Message> {
    let copy = diagnosis_copy(result.diagnosis);

    let header = row![
        text(copy.headline).size(24),
        horizontal_space(),
        button(text("Close").size(13))
            .on_press(Message::CloseModal)
            .style(button::text),
    ]
    .align_y(Alignment::Center);

    let mut content: Column<Message> = column![
        header,
        text(copy.verdict).size(15),
        text(copy.recommendation).size(15),
    ]
    .spacing(12);

    if !result.probabilities.is_empty() {
        content = content.push(probability_breakdown(result));
    }

    if let Some(handle) = heatmap {
        content = content.push(
            column![
                text("Model attention heatmap").size(13),
                image(handle.clone()).width(Length::Fixed(280.0)),
            ]
            .spacing(4),
        );
    }

    if !result.base_model_name.is_empty() {
        content = content.push(
            text(format!(
                "{} on {} in {:.2}s",
                result.base_model_name, result.processing_device, result.processing_time
            ))
            .size(11),
        );
    }

    container(content)
        .width(Length::Fixed(360.0))
        .padding(24)
        .style(container::rounded_box)
        .into()
}

/// One line per category, fixed order.
fn probability_breakdown(result: &AnalysisResult) -> Element<'_, Message> {
    let mut rows: Column<Message> = Column::new().spacing(4);

    for diagnosis in Diagnosis::ALL {
        rows = rows.push(
            text(format!(
                "{}: {:.0}%",
                diagnosis.label(),
                result.probability(diagnosis) * 100.0
            ))
            .size(13),
        );
    }

    rows.into()
}
