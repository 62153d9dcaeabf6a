// Inference contract and batch scoring
pub mod ml;
