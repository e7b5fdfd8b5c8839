//! Fixed-point prices and the market-order sentinels.
//!
//! ## Overview
//!
//! Prices are stored as `u64` scaled by 10^8, so `10.05` is
//! `1_005_000_000`. Queue priority comparisons are exact integer
//! comparisons; no floating point is involved anywhere in matching.
//!
//! ## Sentinels
//!
//! Market orders carry no price of their own. For queue priority they
//! report an extremal sentinel instead:
//!
//! | Variant      | `price()`              |
//! |--------------|------------------------|
//! | `BuyMarket`  | [`MARKET_BUY_PRICE`]   |
//! | `SellMarket` | [`MARKET_SELL_PRICE`]  |
//!
//! Limit prices are only accepted strictly between the two sentinels
//! ([`MIN_LIMIT_PRICE`]..=[`MAX_LIMIT_PRICE`]), so a market buy always
//! outranks every bid and a market sell always outranks every ask.
//!
//! ## Examples
//!
//! ```
//! use market_core::types::price::{to_fixed, from_fixed, MARKET_BUY_PRICE};
//!
//! let price = to_fixed("10.05").unwrap();
//! assert_eq!(price, 1_005_000_000);
//! assert_eq!(from_fixed(price), "10.05000000");
//! assert_eq!(from_fixed(MARKET_BUY_PRICE), "1000000.00000000");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Scaling factor for fixed-point prices: 10^8
pub const SCALE: u64 = 100_000_000;

/// Priority reported by a `BuyMarket` order: 1,000,000.00000000
pub const MARKET_BUY_PRICE: u64 = 1_000_000 * SCALE;

/// Priority reported by a `SellMarket` order: 0
pub const MARKET_SELL_PRICE: u64 = 0;

/// Lowest accepted limit price (one tick above the sell sentinel)
pub const MIN_LIMIT_PRICE: u64 = MARKET_SELL_PRICE + 1;

/// Highest accepted limit price (one tick below the buy sentinel)
pub const MAX_LIMIT_PRICE: u64 = MARKET_BUY_PRICE - 1;

/// Whether `price` may be used as a bid or ask on a limit order.
///
/// ```
/// use market_core::types::price::{is_valid_limit_price, MARKET_BUY_PRICE};
///
/// assert!(is_valid_limit_price(1_005_000_000));
/// assert!(!is_valid_limit_price(0));
/// assert!(!is_valid_limit_price(MARKET_BUY_PRICE));
/// ```
#[inline]
pub fn is_valid_limit_price(price: u64) -> bool {
    (MIN_LIMIT_PRICE..=MAX_LIMIT_PRICE).contains(&price)
}

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to fixed-point u64
///
/// Returns `None` if parsing fails, the value is negative, or it does not
/// fit in a `u64` after scaling.
///
/// ```
/// use market_core::types::price::to_fixed;
///
/// assert_eq!(to_fixed("1.0"), Some(100_000_000));
/// assert_eq!(to_fixed("10.10"), Some(1_010_000_000));
/// assert_eq!(to_fixed("0.00000001"), Some(1));
/// assert_eq!(to_fixed("-1"), None);
/// ```
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point u64, rounding to 8 decimal places
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    scaled.round_dp(0).to_u64()
}

/// Convert fixed-point u64 to a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Convert fixed-point u64 to a string with 8 decimal places
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}

/// Convert fixed-point u64 to a string with trailing zeros trimmed
///
/// ```
/// use market_core::types::price::from_fixed_trimmed;
///
/// assert_eq!(from_fixed_trimmed(1_005_000_000), "10.05");
/// assert_eq!(from_fixed_trimmed(100_000_000), "1");
/// ```
pub fn from_fixed_trimmed(value: u64) -> String {
    format!("{}", fixed_to_decimal(value).normalize())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_extremal() {
        assert_eq!(MARKET_BUY_PRICE, 100_000_000_000_000);
        assert_eq!(MARKET_SELL_PRICE, 0);
        assert!(MAX_LIMIT_PRICE < MARKET_BUY_PRICE);
        assert!(MIN_LIMIT_PRICE > MARKET_SELL_PRICE);
    }

    #[test]
    fn test_limit_price_range() {
        assert!(is_valid_limit_price(MIN_LIMIT_PRICE));
        assert!(is_valid_limit_price(MAX_LIMIT_PRICE));
        assert!(!is_valid_limit_price(MARKET_SELL_PRICE));
        assert!(!is_valid_limit_price(MARKET_BUY_PRICE));
        assert!(!is_valid_limit_price(u64::MAX));
    }

    #[test]
    fn test_to_fixed_basic() {
        assert_eq!(to_fixed("10.05"), Some(1_005_000_000));
        assert_eq!(to_fixed("10.00"), Some(1_000_000_000));
        assert_eq!(to_fixed("10.10"), Some(1_010_000_000));
        assert_eq!(to_fixed("1000000"), Some(MARKET_BUY_PRICE));
        assert_eq!(to_fixed("0"), Some(0));
    }

    #[test]
    fn test_to_fixed_rejects() {
        assert_eq!(to_fixed("-1.0"), None);
        assert_eq!(to_fixed("abc"), None);
        assert_eq!(to_fixed(""), None);
    }

    #[test]
    fn test_from_fixed() {
        assert_eq!(from_fixed(1_005_000_000), "10.05000000");
        assert_eq!(from_fixed(0), "0.00000000");
        assert_eq!(from_fixed(1), "0.00000001");
    }

    #[test]
    fn test_precision() {
        let value = "123456.12345678";
        let fixed = to_fixed(value).unwrap();
        assert_eq!(from_fixed(fixed), value);
    }
}
