/// Image decoding for on-screen display
///
/// Turns raw file bytes into widget handles: the preview of the
/// selected file and the heatmap returned by the analysis service.
/// Decoding goes through the `image` crate so the preview shows what
/// was actually parsed, not just what the bytes claim to be.

use iced::widget::image::Handle;
use tokio::task;

use crate::api::schema::HeatmapImage;

/// Decode selected-file bytes into a displayable preview handle.
///
/// Runs on the blocking pool because decoding a multi-megabyte image
/// would stall the UI loop. The caller is responsible for discarding
/// the result if the selection changed while this was in flight.
pub async fn decode_preview(bytes: Vec<u8>) -> Result<Handle, String> {
    task::spawn_blocking(move || decode_to_handle(&bytes))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

/// Decode a heatmap payload into a displayable handle.
///
/// Heatmaps are small (model input resolution), so this stays
/// synchronous and runs inline when the verdict arrives.
pub fn decode_heatmap(heatmap: &HeatmapImage) -> Result<Handle, String> {
    let bytes = heatmap.decoded_bytes()?;
    decode_to_handle(&bytes)
}

/// Decode encoded image bytes into an RGBA widget handle.
fn decode_to_handle(bytes: &[u8]) -> Result<Handle, String> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| format!("Failed to decode image: {}", e))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(Handle::from_rgba(width, height, rgba.into_raw()))
}
