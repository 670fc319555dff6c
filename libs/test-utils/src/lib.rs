pub mod builders;
pub mod memory_store;
pub mod origin;

pub use builders::*;
pub use memory_store::MemoryStore;
pub use origin::RecordingOrigin;
