//! File attachments stored in a blob store, with metadata kept beside the
//! ticket.

pub mod adapters;
mod service;
mod store;

pub use service::{AttachmentError, AttachmentService, DownloadedFile, UploadRequest};
pub use store::{BlobStore, BlobStoreError};
