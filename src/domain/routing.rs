use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutingMode {
    Automatic,
    Manual,
}

impl RoutingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingMode::Automatic => "AUTOMATIC",
            RoutingMode::Manual => "MANUAL",
        }
    }

    pub fn parse(s: &str) -> Option<RoutingMode> {
        match s {
            "AUTOMATIC" => Some(RoutingMode::Automatic),
            "MANUAL" => Some(RoutingMode::Manual),
            _ => None,
        }
    }
}

/// Weight entry for AUTOMATIC mode. Weight 0 means configured but never drawn.
#[derive(Debug, Clone, Serialize)]
pub struct PspWeight {
    pub psp_id: String,
    pub psp_name: String,
    pub weight: f64,
}

/// Sequence entry for MANUAL mode and for the fallback walk.
/// Lower `order` is tried first; orders need not be contiguous.
#[derive(Debug, Clone, Serialize)]
pub struct FallbackEntry {
    pub psp_id: String,
    pub psp_name: String,
    pub order: i32,
}

/// Fully resolved routing configuration for one store: base fields plus the
/// weight table and fallback sequence joined with PSP display names. The
/// sequence is sorted ascending by `order` when loaded.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingConfig {
    pub store_id: String,
    pub mode: RoutingMode,
    pub fallback_enabled: bool,
    pub max_retries: i32,
    pub psp_weights: Vec<PspWeight>,
    pub fallback_sequence: Vec<FallbackEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeightInput {
    pub psp_id: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SequenceInput {
    pub psp_id: String,
    pub order: i32,
}
