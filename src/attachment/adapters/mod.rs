//! Blob store adapters.

mod directory;
mod memory;

pub use directory::DirectoryBlobStore;
pub use memory::InMemoryBlobStore;
