//! Immutable per-request generation settings.

use serde::{Deserialize, Serialize};

use crate::theme::Complexity;

/// Outline synthesis algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisMode {
    /// Model-assisted narrative expansion
    #[default]
    Expand,
    /// Deterministic, model-free row partitioning
    Split,
}

/// Settings for one generation request. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub mode: SynthesisMode,

    /// Target slide count, at least 1
    pub page_count: usize,

    pub complexity: Complexity,

    /// Theme preset name (unknown names fall back to the default preset)
    pub theme: String,

    /// Free-text design instructions forwarded to the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// Ordered structural template ids the model should follow
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<String>,

    /// Generative model identifier
    pub model: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            mode: SynthesisMode::Expand,
            page_count: 8,
            complexity: Complexity::Standard,
            theme: "modern".to_string(),
            instructions: None,
            templates: Vec::new(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

impl GenerationConfig {
    /// Clamp the page count to the supported minimum.
    pub fn effective_page_count(&self) -> usize {
        self.page_count.max(1)
    }
}
