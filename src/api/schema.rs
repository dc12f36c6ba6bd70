/// Wire schema for the analysis service
///
/// Mirrors the backend's response model field for field. Everything
/// beyond `diagnosis` is optional or defaulted so the client keeps
/// working against older service builds that omit the extras.

use std::collections::HashMap;

use base64::Engine;
use serde::{Deserialize, Serialize};

/// The enumerated classification result from the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    Normal,
    ViralPneumonia,
    BacterialPneumonia,
}

impl Diagnosis {
    /// Fixed display order for probability breakdowns.
    pub const ALL: [Diagnosis; 3] = [
        Diagnosis::Normal,
        Diagnosis::ViralPneumonia,
        Diagnosis::BacterialPneumonia,
    ];

    /// Short human-readable category name.
    pub fn label(&self) -> &'static str {
        match self {
            Diagnosis::Normal => "Normal",
            Diagnosis::ViralPneumonia => "Viral pneumonia",
            Diagnosis::BacterialPneumonia => "Bacterial pneumonia",
        }
    }
}

/// Auxiliary class-activation visualization returned alongside a diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapImage {
    /// Base64-encoded image bytes
    pub base64: String,
    /// MIME type of the encoded bytes (the service sends image/png)
    pub mime: String,
    /// Pixel dimensions (width, height) of the encoded image
    #[serde(default)]
    pub dimensions: Option<(u32, u32)>,
}

impl HeatmapImage {
    /// Decode the base64 payload back into raw image bytes.
    pub fn decoded_bytes(&self) -> Result<Vec<u8>, String> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.base64)
            .map_err(|e| format!("Invalid base64 heatmap payload: {}", e))
    }
}

/// A single activation point on the source image.
/// Serialized by the service as a `[x, y, intensity]` tuple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPoint(pub u32, pub u32, pub f32);

/// Full analyze response.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResult {
    pub diagnosis: Diagnosis,
    /// Per-category confidence, each in 0.0..=1.0
    #[serde(default)]
    pub probabilities: HashMap<Diagnosis, f32>,
    #[serde(default)]
    pub heatmap_image: Option<HeatmapImage>,
    #[serde(default)]
    pub heatmap_points: Option<Vec<HeatmapPoint>>,
    /// Name of the model the verdict came from
    #[serde(default)]
    pub base_model_name: String,
    /// Server-side processing time in seconds
    #[serde(default)]
    pub processing_time: f32,
    /// Device the model ran on ("cpu", "cuda", ...)
    #[serde(default)]
    pub processing_device: String,
}

impl AnalysisResult {
    /// Confidence for one category, 0.0 when the service omitted it.
    pub fn probability(&self, diagnosis: Diagnosis) -> f32 {
        self.probabilities.get(&diagnosis).copied().unwrap_or(0.0)
    }
}
