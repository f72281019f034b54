//! Storage abstraction layer for bidx.
//!
//! Index files are addressed by name inside a [`Storage`]. The file system
//! backend is used by the command line tools; the memory backend keeps tests
//! self-contained.

pub mod file;
pub mod memory;
pub mod structured;
pub mod traits;

// Re-export commonly used types
pub use file::*;
pub use memory::*;
pub use structured::*;
pub use traits::*;
