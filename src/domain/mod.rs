// Customer input domain
pub mod customer;

// Feature registry and vector layout
pub mod ml;

// Classifier output
pub mod prediction;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
