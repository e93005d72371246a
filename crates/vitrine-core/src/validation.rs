//! # Validation Module
//!
//! Product form validation.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Handler (storefront)                                          │
//! │  └── Multipart decoding into a ProductForm                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── name / description non-empty                                       │
//! │  ├── price parses and is > 0                                            │
//! │  └── image present on create, allowed extension when given              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  └── NOT NULL constraints                                               │
//! │                                                                         │
//! │  A form rejected here never reaches the blob store or the database.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{ImageUpload, NewProductDraft, ProductEdit, ProductForm, ProductId};
use crate::{ALLOWED_IMAGE_EXTENSIONS, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a product name and returns it trimmed.
///
/// ## Example
/// ```rust
/// use vitrine_core::validation::validate_product_name;
///
/// assert_eq!(validate_product_name("  Mug ").unwrap(), "Mug");
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    validate_text("name", name, MAX_NAME_LENGTH)
}

/// Validates a product description and returns it trimmed.
pub fn validate_description(description: &str) -> ValidationResult<String> {
    validate_text("description", description, MAX_DESCRIPTION_LENGTH)
}

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Parses and validates a price.
///
/// ## Rules
/// - Must parse as a decimal with at most two places
/// - Must be strictly positive (zero is rejected)
///
/// ## Example
/// ```rust
/// use vitrine_core::validation::validate_price;
///
/// assert_eq!(validate_price("19.90").unwrap().cents(), 1990);
/// assert!(validate_price("0").is_err());
/// assert!(validate_price("-5").is_err());
/// ```
pub fn validate_price(price: &str) -> ValidationResult<Money> {
    let money = Money::parse_decimal(price)?;

    if !money.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(money)
}

/// Validates an uploaded image.
///
/// ## Rules
/// - Must not be empty
/// - Extension must be one of jpg, jpeg, png
pub fn validate_image(image: &ImageUpload) -> ValidationResult<()> {
    if image.is_empty() {
        return Err(ValidationError::Required {
            field: "image".to_string(),
        });
    }

    let allowed = || {
        ALLOWED_IMAGE_EXTENSIONS
            .iter()
            .map(|ext| ext.to_string())
            .collect::<Vec<_>>()
    };

    match image.extension() {
        Some(ext) if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(ValidationError::NotAllowed {
            field: "image".to_string(),
            allowed: allowed(),
        }),
    }
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates a create form.
///
/// All fields are required: name, description, a positive price and a
/// non-empty image.
pub fn validate_new_product(form: ProductForm) -> ValidationResult<NewProductDraft> {
    let name = validate_product_name(&form.name)?;
    let description = validate_description(&form.description)?;
    let price = validate_price(&form.price)?;

    let image = form.image.ok_or_else(|| ValidationError::Required {
        field: "image".to_string(),
    })?;
    validate_image(&image)?;

    Ok(NewProductDraft {
        name,
        description,
        price,
        image,
    })
}

/// Validates an update form.
///
/// Same field rules as create, but the image is optional. An image part that
/// arrived with no bytes is treated as "no new image".
pub fn validate_product_update(id: ProductId, form: ProductForm) -> ValidationResult<ProductEdit> {
    let name = validate_product_name(&form.name)?;
    let description = validate_description(&form.description)?;
    let price = validate_price(&form.price)?;

    let image = match form.image {
        Some(image) if !image.is_empty() => {
            validate_image(&image)?;
            Some(image)
        }
        _ => None,
    };

    Ok(ProductEdit {
        id,
        name,
        description,
        price,
        image,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            name: "Mug".to_string(),
            description: "Ceramic mug".to_string(),
            price: "25.00".to_string(),
            image: Some(ImageUpload::new("mug.png", None, vec![0x89, 0x50])),
        }
    }

    #[test]
    fn test_valid_create_form() {
        let draft = validate_new_product(form()).unwrap();
        assert_eq!(draft.name, "Mug");
        assert_eq!(draft.price.cents(), 2500);
        assert_eq!(draft.image.file_name, "mug.png");
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let mut f = form();
        f.name = "   ".to_string();
        assert_eq!(
            validate_new_product(f).unwrap_err(),
            ValidationError::Required {
                field: "name".to_string()
            }
        );
    }

    #[test]
    fn test_create_rejects_empty_description() {
        let mut f = form();
        f.description = String::new();
        assert!(validate_new_product(f).is_err());
    }

    #[test]
    fn test_create_rejects_non_positive_price() {
        for price in ["0", "0.00", "-1", "-0.01"] {
            let mut f = form();
            f.price = price.to_string();
            assert!(validate_new_product(f).is_err(), "price {price} accepted");
        }
    }

    #[test]
    fn test_create_requires_image() {
        let mut f = form();
        f.image = None;
        assert_eq!(
            validate_new_product(f).unwrap_err(),
            ValidationError::Required {
                field: "image".to_string()
            }
        );

        let mut f = form();
        f.image = Some(ImageUpload::new("mug.png", None, Vec::new()));
        assert!(validate_new_product(f).is_err());
    }

    #[test]
    fn test_create_rejects_unsupported_extension() {
        let mut f = form();
        f.image = Some(ImageUpload::new("mug.gif", None, vec![1]));
        assert!(matches!(
            validate_new_product(f),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_update_image_is_optional() {
        let mut f = form();
        f.image = None;
        let edit = validate_product_update(3, f).unwrap();
        assert_eq!(edit.id, 3);
        assert!(edit.image.is_none());

        let mut f = form();
        f.image = Some(ImageUpload::new("", None, Vec::new()));
        assert!(validate_product_update(3, f).unwrap().image.is_none());
    }

    #[test]
    fn test_update_still_validates_fields() {
        let mut f = form();
        f.price = "0".to_string();
        assert!(validate_product_update(3, f).is_err());
    }

    #[test]
    fn test_name_length_limit() {
        assert!(validate_product_name(&"A".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(validate_product_name(&"A".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }
}
