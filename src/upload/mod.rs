//! Upload module for pushing layer blobs in parts

pub mod chunked;
pub mod progress;

pub use chunked::{DEFAULT_PART_SIZE, LayerUploader, UploadError, UploadOutcome};
pub use progress::ProgressTracker;
