use serde::{Deserialize, Serialize};

/// A connected display output, addressable by name for gamma adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputInfo {
    pub name: String, // X11 output name as reported by RandR, e.g. "eDP-1"
}
