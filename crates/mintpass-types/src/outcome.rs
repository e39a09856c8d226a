use serde::Serialize;

/// Result of one remedial mint invocation. Produced exactly once per call
/// and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    /// Reference identifier suitable for external verification (tx hash).
    pub reference: String,
    /// Block-explorer link for the reference.
    pub explorer_url: String,
}

impl ActionOutcome {
    pub fn confirmed(reference: impl Into<String>, explorer_url: impl Into<String>) -> Self {
        Self {
            success: true,
            reference: reference.into(),
            explorer_url: explorer_url.into(),
        }
    }
}
