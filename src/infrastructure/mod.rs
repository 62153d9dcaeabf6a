pub mod artifacts;
pub mod batch_csv;
pub mod observability;

pub use artifacts::{ArtifactPaths, load_artifacts};
