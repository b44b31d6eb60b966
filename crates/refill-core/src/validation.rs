//! # Validation Module
//!
//! Field-level business rules for catalog, customer and sale input.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (React)                                             │
//! │  └── Required fields, immediate feedback                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: API handler (Rust)                                           │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK (current_stock >= 0)                             │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use refill_core::validation::{validate_item_name, validate_quantity};
//!
//! validate_item_name("Round 5gal refill").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::{CustomerUpdate, ItemUpdate, NewCustomer, NewItem};
use crate::{MAX_LINE_QUANTITY, MAX_PRICE_CENTS, MAX_STOCK_LEVEL};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted item name.
pub const MAX_ITEM_NAME_LEN: usize = 120;

const MAX_CUSTOMER_NAME_LEN: usize = 120;
const MAX_SEARCH_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

fn max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.trim().chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty
/// - At most 120 characters
///
/// ```rust
/// use refill_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Slim 5gal refill").is_ok());
/// assert!(validate_item_name("  ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    required("name", name)?;
    max_len("name", name, MAX_ITEM_NAME_LEN)
}

/// Validates a unit of measure ("gallon", "pc"...).
pub fn validate_uom(uom: &str) -> ValidationResult<()> {
    required("uom", uom)?;
    max_len("uom", uom, 20)
}

/// Validates a customer name.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    required("name", name)?;
    max_len("name", name, MAX_CUSTOMER_NAME_LEN)
}

/// Validates a phone number.
///
/// ## Rules
/// - Digits, `+`, `-` and spaces only
/// - 7 to 20 characters
///
/// ```rust
/// use refill_core::validation::validate_phone;
///
/// assert!(validate_phone("+63 917 555 0101").is_ok());
/// assert!(validate_phone("0917-CALL-ME").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    required("phone", phone)?;

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, '+', '-' and spaces".to_string(),
        });
    }

    let len = phone.chars().count();
    if !(7..=20).contains(&len) {
        return Err(ValidationError::OutOfRange {
            field: "phone length".to_string(),
            min: 7,
            max: 20,
        });
    }

    Ok(())
}

/// Validates an optional email. Empty means "no email".
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Ok(());
    }

    let mut parts = email.split('@');
    let valid = matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
    );
    if !valid || email.contains(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Returns
/// The trimmed query string (may be empty).
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();
    max_len("query", query, MAX_SEARCH_LEN)?;
    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale line quantity.
///
/// ## User Workflow
/// ```text
/// Sales form: quantity field
///      │
///      ├── qty <= 0?     → "quantity must be positive"
///      ├── qty > 9999?   → "quantity must be between 1 and 9999"
///      └── OK            → line accepted
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in centavos. Zero is allowed (free caps, promos).
///
/// ```rust
/// use refill_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(2500).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(i64::MAX).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    if cents > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a manual stock adjustment. Either sign, at most
/// [`MAX_STOCK_LEVEL`] units.
pub fn validate_stock_delta(delta: i64) -> ValidationResult<()> {
    if !(-MAX_STOCK_LEVEL..=MAX_STOCK_LEVEL).contains(&delta) {
        return Err(ValidationError::OutOfRange {
            field: "delta".to_string(),
            min: -MAX_STOCK_LEVEL,
            max: MAX_STOCK_LEVEL,
        });
    }
    Ok(())
}

fn not_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates reorder thresholds: `0 <= min <= max`.
pub fn validate_stock_levels(min_stock: i64, max_stock: i64) -> ValidationResult<()> {
    not_negative("minStock", min_stock)?;
    if max_stock < min_stock {
        return Err(ValidationError::OutOfRange {
            field: "maxStock".to_string(),
            min: min_stock,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a new catalog item.
pub fn validate_new_item(item: &NewItem) -> ValidationResult<()> {
    validate_item_name(&item.name)?;
    validate_price_cents(item.price_cents)?;
    validate_uom(&item.uom)?;
    not_negative("initialStock", item.initial_stock)?;
    if item.initial_stock > MAX_STOCK_LEVEL {
        return Err(ValidationError::OutOfRange {
            field: "initialStock".to_string(),
            min: 0,
            max: MAX_STOCK_LEVEL,
        });
    }
    validate_stock_levels(item.min_stock, item.max_stock)
}

/// Validates the present fields of an item update.
///
/// Threshold consistency is checked on the merged record by the caller via
/// [`validate_stock_levels`].
pub fn validate_item_update(update: &ItemUpdate) -> ValidationResult<()> {
    if let Some(name) = &update.name {
        validate_item_name(name)?;
    }
    if let Some(price) = update.price_cents {
        validate_price_cents(price)?;
    }
    if let Some(uom) = &update.uom {
        validate_uom(uom)?;
    }
    if let Some(min) = update.min_stock {
        not_negative("minStock", min)?;
    }
    Ok(())
}

/// Validates a new customer.
pub fn validate_new_customer(customer: &NewCustomer) -> ValidationResult<()> {
    validate_customer_name(&customer.name)?;
    validate_phone(&customer.phone)?;
    if let Some(email) = &customer.email {
        validate_email(email)?;
    }
    Ok(())
}

/// Validates the present fields of a customer update.
pub fn validate_customer_update(update: &CustomerUpdate) -> ValidationResult<()> {
    if let Some(name) = &update.name {
        validate_customer_name(name)?;
    }
    if let Some(phone) = &update.phone {
        validate_phone(phone)?;
    }
    if let Some(email) = &update.email {
        validate_email(email)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Round 5gal refill").is_ok());
        assert!(validate_item_name("").is_err());
        assert_eq!(
            validate_item_name(&"A".repeat(121)),
            Err(ValidationError::TooLong {
                field: "name".to_string(),
                max: 120
            })
        );
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0917 555 0101").is_ok());
        assert!(validate_phone("+63-917-555-0101").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("0917abc5550").is_err());
        assert!(validate_phone(&"1".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("").is_ok());
        assert!(validate_email("store@example.ph").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.ph").is_err());
        assert!(validate_email("a@b@c").is_err());
        assert!(validate_email("a b@c.ph").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(9_999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(10_000).is_err());
    }

    #[test]
    fn test_validate_bounds() {
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());
        assert!(matches!(
            validate_price_cents(MAX_PRICE_CENTS + 1),
            Err(ValidationError::OutOfRange { .. })
        ));

        assert!(validate_stock_delta(-25).is_ok());
        assert!(validate_stock_delta(MAX_STOCK_LEVEL).is_ok());
        assert!(validate_stock_delta(i64::MAX).is_err());
        assert!(validate_stock_delta(i64::MIN).is_err());
    }

    #[test]
    fn test_validate_new_item() {
        let mut item = NewItem {
            name: "Slim 5gal refill".to_string(),
            category: "Refill".to_string(),
            price_cents: 2500,
            uom: "gallon".to_string(),
            initial_stock: 40,
            min_stock: 10,
            max_stock: 200,
        };
        assert!(validate_new_item(&item).is_ok());

        item.max_stock = 5;
        assert!(validate_new_item(&item).is_err());

        item.max_stock = 200;
        item.initial_stock = -1;
        assert!(validate_new_item(&item).is_err());

        item.initial_stock = MAX_STOCK_LEVEL + 1;
        assert!(validate_new_item(&item).is_err());

        item.initial_stock = 0;
        item.uom = " ".to_string();
        assert_eq!(validate_new_item(&item), Err(ValidationError::required("uom")));
    }

    #[test]
    fn test_validate_customer_update() {
        let update = CustomerUpdate {
            email: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_customer_update(&update).is_ok());

        let update = CustomerUpdate {
            phone: Some("call me".to_string()),
            ..Default::default()
        };
        assert!(validate_customer_update(&update).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  slim ").unwrap(), "slim");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }
}
