//! # vitrine-blob: Blob Storage Gateway
//!
//! Every product image goes through this crate on its way to storage.
//!
//! ## Upload Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ImageUpload { file_name: "mug.PNG", bytes }                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  blob_key(Some("png")) ──► "9b2d…e41f.png"   (UUID v4 + extension)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BlobStore::put(key, bytes, "image/png")     (always overwrites)        │
//! │       │                                                                 │
//! │       ├── AzureBlobStore  ──► PUT {endpoint}/{container}/{key}          │
//! │       └── MemoryBlobStore ──► HashMap (tests, local runs)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  public URL ──► stored in Produtos.imagem_url                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Blobs are never deleted: replacing an image or deleting a product leaves
//! the old blob in the container.

pub mod azure;
pub mod error;
pub mod memory;
pub mod store;

pub use azure::{AzureBlobStore, ConnectionString};
pub use error::{BlobError, BlobResult};
pub use memory::MemoryBlobStore;
pub use store::{blob_key, upload_image, BlobStore};
