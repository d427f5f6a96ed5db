//! Shared field validators for API requests
//!
//! DTOs in the module crates derive `validator::Validate` and point their
//! custom rules at these functions.

use validator::ValidationError;

/// Maximum length for product_id field
pub const MAX_PRODUCT_ID_LENGTH: usize = 64;

/// Maximum quantity accepted on a single order or batch
pub const MAX_QUANTITY: i32 = 1_000_000;

/// Maximum unit price in minor units
pub const MAX_PRICE: i64 = 1_000_000_000;

/// Validate product_id format
///
/// Product id must:
/// - Not be empty
/// - Not exceed MAX_PRODUCT_ID_LENGTH characters
/// - Contain only alphanumeric characters, dots, hyphens, and underscores
pub fn validate_product_id(product_id: &str) -> Result<(), ValidationError> {
    if product_id.trim().is_empty() {
        return Err(ValidationError::new("product_id_empty"));
    }
    if product_id.len() > MAX_PRODUCT_ID_LENGTH {
        return Err(ValidationError::new("product_id_too_long"));
    }
    if !product_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_')
    {
        return Err(ValidationError::new("product_id_invalid_chars"));
    }
    Ok(())
}

/// Validate order/batch quantity bounds
pub fn validate_quantity(quantity: i32) -> Result<(), ValidationError> {
    if quantity < 1 {
        return Err(ValidationError::new("quantity_below_minimum"));
    }
    if quantity > MAX_QUANTITY {
        return Err(ValidationError::new("quantity_too_large"));
    }
    Ok(())
}

/// Validate unit price bounds (minor units, non-negative)
pub fn validate_price(price: i64) -> Result<(), ValidationError> {
    if price < 0 {
        return Err(ValidationError::new("price_negative"));
    }
    if price > MAX_PRICE {
        return Err(ValidationError::new("price_too_large"));
    }
    Ok(())
}

/// Validate a batch expiry timestamp string (RFC 3339 or naive datetime).
///
/// Expired timestamps are accepted: seeding already-expired stock is a
/// legitimate operation (it is simply never deducted).
pub fn validate_expires_at(expires_at: &str) -> Result<(), ValidationError> {
    if expires_at.is_empty() {
        return Err(ValidationError::new("expires_at_empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_rules() {
        assert!(validate_product_id("apple-01").is_ok());
        assert!(validate_product_id("a.b_c").is_ok());
        assert!(validate_product_id("").is_err());
        assert!(validate_product_id("   ").is_err());
        assert!(validate_product_id("has space").is_err());
        assert!(validate_product_id(&"x".repeat(MAX_PRODUCT_ID_LENGTH + 1)).is_err());
    }

    #[test]
    fn quantity_rules() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(MAX_QUANTITY + 1).is_err());
    }

    #[test]
    fn price_rules() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(999).is_ok());
        assert!(validate_price(-1).is_err());
        assert!(validate_price(MAX_PRICE + 1).is_err());
    }
}
