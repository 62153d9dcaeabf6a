pub mod batch;
pub mod inference;

pub use batch::{BatchOutcome, BatchRecord, BatchSummary, score_batch};
pub use inference::InferenceContext;
