//! # Domain Types
//!
//! The product record and the shapes it takes on its way in and out of the
//! gateways.
//!
//! ## Type Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Create                                         │
//! │                                                                         │
//! │  ProductForm ──validate──► NewProductDraft ──upload image──► NewProduct │
//! │  (raw text)                (typed, image bytes)              (image url)│
//! │                                                                         │
//! │                          Update                                         │
//! │                                                                         │
//! │  ProductForm ──validate──► ProductEdit ──upload if any──► ProductChanges│
//! │                            (image optional)               (url optional)│
//! │                                                                         │
//! │                          Read                                           │
//! │                                                                         │
//! │  Produtos row ──────────────────────────────────────────────► Product   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Identifier generated by the database on insert.
pub type ProductId = i64;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Generated by storage, immutable.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Free text description.
    pub description: String,

    /// Unit price.
    pub price: Money,

    /// Public URL of the product image, `None` until one is uploaded.
    pub image_url: Option<String>,
}

// =============================================================================
// Image Upload
// =============================================================================

/// An image file received from a product form.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name as sent by the client (only the extension is kept).
    pub file_name: String,

    /// MIME type as sent by the client, if any.
    pub content_type: Option<String>,

    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        ImageUpload {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Lowercased extension of the original file name, without the dot.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Content type to store the blob with. Derived from the extension when
    /// the client did not send one.
    pub fn resolved_content_type(&self) -> String {
        if let Some(content_type) = &self.content_type {
            if !content_type.is_empty() {
                return content_type.clone();
            }
        }
        match self.extension().as_deref() {
            Some("jpg") | Some("jpeg") => "image/jpeg".to_string(),
            Some("png") => "image/png".to_string(),
            _ => "application/octet-stream".to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Raw product form input, exactly as submitted.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    /// Price as typed (e.g. "19.90").
    pub price: String,
    pub image: Option<ImageUpload>,
}

/// A validated create request still holding the image bytes.
#[derive(Debug, Clone)]
pub struct NewProductDraft {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub image: ImageUpload,
}

impl NewProductDraft {
    /// Attaches the URL the image was uploaded to.
    pub fn into_new_product(self, image_url: String) -> NewProduct {
        NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            image_url: Some(image_url),
        }
    }
}

/// A row ready to be inserted into `Produtos`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub image_url: Option<String>,
}

/// A validated update request still holding the optional image bytes.
#[derive(Debug, Clone)]
pub struct ProductEdit {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub image: Option<ImageUpload>,
}

impl ProductEdit {
    /// Attaches the URL of the replacement image, if one was uploaded.
    pub fn into_changes(self, image_url: Option<String>) -> ProductChanges {
        ProductChanges {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            image_url,
        }
    }
}

/// An update ready for `Produtos`.
///
/// Name, description and price are always overwritten. `image_url` is only
/// written when `Some`; `None` leaves the stored URL untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductChanges {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub image_url: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
