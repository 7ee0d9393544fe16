use serde::Serialize;

/// Lowest AQI the service ever reports.
pub const AQI_MIN: f64 = 0.0;
/// Highest AQI the service ever reports.
pub const AQI_MAX: f64 = 500.0;

/// Health bands, upper bound inclusive, scanned in order.
const AQI_BANDS: [(f64, &str, &str); 5] = [
    (50.0, "Good", "#00e400"),
    (100.0, "Moderate", "#ffff00"),
    (150.0, "Unhealthy for Sensitive Groups", "#ff7e00"),
    (200.0, "Unhealthy", "#ff0000"),
    (300.0, "Very Unhealthy", "#8f3f97"),
];

const HAZARDOUS: (&str, &str) = ("Hazardous", "#7e0023");

/// Maps an AQI value to its health category and display color.
///
/// Total over all reals: anything at or below 50, negatives included, is
/// "Good" and anything above 300 is "Hazardous".
pub fn categorize_aqi(aqi: f64) -> (&'static str, &'static str) {
    AQI_BANDS
        .iter()
        .find(|(upper, _, _)| aqi <= *upper)
        .map(|(_, category, color)| (*category, *color))
        .unwrap_or(HAZARDOUS)
}

pub fn clamp_aqi(raw: f64) -> f64 {
    raw.clamp(AQI_MIN, AQI_MAX)
}

/// Rounds to two decimal places for the wire.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PredictionResult {
    pub aqi: f64,
    pub category: String,
    pub color: String,
}

impl PredictionResult {
    /// Builds the reported result from a raw model output.
    pub fn from_raw(raw: f64) -> Self {
        let aqi = clamp_aqi(raw);
        let (category, color) = categorize_aqi(aqi);

        PredictionResult {
            aqi: round2(aqi),
            category: category.to_string(),
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct FeatureInfo {
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct ModelInfo {
    pub format: &'static str,
    pub feature_count: usize,
    pub features: Vec<FeatureInfo>,
}

#[derive(Debug, Serialize, Clone)]
pub struct HealthStatus {
    pub status: &'static str,
    pub features: usize,
}

/// Envelope shared by every JSON endpoint.
///
/// The payload is flattened next to `success`, so a prediction serializes as
/// `{"success": true, "aqi": .., "category": .., "color": ..}` and a failure
/// as `{"success": false, "error": ..}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: &str) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }
    }
}
