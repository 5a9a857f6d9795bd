pub mod gamma;
pub mod model;

pub use gamma::{format_gamma, gamma_triplet, preset_label, GAMMA_PRESETS};
pub use model::OutputInfo;
