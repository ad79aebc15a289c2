//! IO modules - external system interfaces
//!
//! This module contains all external IO operations:
//! - `frames` - landmark frame wire format and JSONL replay source
//! - `capture` - frame feed lifecycle (start/stop)
//! - `export` - session history output to file (JSONL format)
//! - `cloud` - remote session store client

pub mod capture;
pub mod cloud;
pub mod export;
pub mod frames;

// Re-export commonly used types
pub use capture::FrameFeed;
pub use cloud::CloudClient;
pub use export::SessionExport;
pub use frames::{FrameMessage, FrameRecord, ReplaySource};
