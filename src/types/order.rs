//! Order types for the matching core.
//!
//! ## Variants
//!
//! An [`Order`] is one of four closed variants sharing a [`BaseOrder`]:
//!
//! | Variant      | Intent | `price()`                 |
//! |--------------|--------|---------------------------|
//! | `BuyLimit`   | Buy    | the bid                   |
//! | `BuyMarket`  | Buy    | `MARKET_BUY_PRICE`        |
//! | `SellLimit`  | Sell   | the ask                   |
//! | `SellMarket` | Sell   | `MARKET_SELL_PRICE`       |
//!
//! The variant and intent never change after creation. Only the order book
//! mutates `shares` and `state`.
//!
//! ## Known limitation
//!
//! `price()` is a priority key, not an execution price. Trade notifications
//! carry the order itself, so a filled market order reports its sentinel.

use crate::error::InvalidOrder;
use crate::types::price::{is_valid_limit_price, MARKET_BUY_PRICE, MARKET_SELL_PRICE};

// ============================================================================
// Intent enum
// ============================================================================

/// Which side of the book an order rests on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Intent {
    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Intent::Buy => Intent::Sell,
            Intent::Sell => Intent::Buy,
        }
    }
}

// ============================================================================
// OrderState enum
// ============================================================================

/// Lifecycle of an order: `Open -> Partial -> Filled`, or `Open -> Filled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderState {
    /// Accepted, nothing matched yet
    #[default]
    Open,
    /// Some shares matched, the rest still resting
    Partial,
    /// Terminal: no shares left, removed from the book
    Filled,
}

impl OrderState {
    /// Whether an order in this state may still rest on the book
    #[inline]
    pub fn is_live(self) -> bool {
        !matches!(self, OrderState::Filled)
    }
}

/// Limit or market, independent of side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderKind {
    Limit,
    Market,
}

// ============================================================================
// BaseOrder struct
// ============================================================================

/// Attributes shared by every order variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseOrder {
    /// Who placed the order
    pub actor: String,

    /// Creation timestamp; together with `actor` forms the identity
    pub created_at: u64,

    /// Buy or sell; must agree with the variant
    pub intent: Intent,

    /// Outstanding shares, decremented on every fill
    pub shares: u64,

    /// Lifecycle state
    pub state: OrderState,
}

impl BaseOrder {
    /// Create an `Open` base record
    pub fn new(actor: impl Into<String>, created_at: u64, intent: Intent, shares: u64) -> Self {
        Self {
            actor: actor.into(),
            created_at,
            intent,
            shares,
            state: OrderState::Open,
        }
    }
}

// ============================================================================
// Order enum
// ============================================================================

/// A buy or sell order, limit or market.
///
/// ## Example
///
/// ```
/// use market_core::types::{Order, Intent};
/// use market_core::types::price::MARKET_BUY_PRICE;
///
/// let bid = Order::buy_limit("Bob", 1_700_000_000, 100, 1_005_000_000);
/// assert_eq!(bid.price(), 1_005_000_000);
/// assert_eq!(bid.intent(), Intent::Buy);
///
/// let market = Order::buy_market("Tim", 1_700_000_000, 100);
/// assert_eq!(market.price(), MARKET_BUY_PRICE);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    BuyLimit { bid: u64, base: BaseOrder },
    BuyMarket { base: BaseOrder },
    SellLimit { ask: u64, base: BaseOrder },
    SellMarket { base: BaseOrder },
}

impl Order {
    /// Buy at `bid` or better
    pub fn buy_limit(actor: impl Into<String>, created_at: u64, shares: u64, bid: u64) -> Self {
        Order::BuyLimit {
            bid,
            base: BaseOrder::new(actor, created_at, Intent::Buy, shares),
        }
    }

    /// Buy at any price
    pub fn buy_market(actor: impl Into<String>, created_at: u64, shares: u64) -> Self {
        Order::BuyMarket {
            base: BaseOrder::new(actor, created_at, Intent::Buy, shares),
        }
    }

    /// Sell at `ask` or better
    pub fn sell_limit(actor: impl Into<String>, created_at: u64, shares: u64, ask: u64) -> Self {
        Order::SellLimit {
            ask,
            base: BaseOrder::new(actor, created_at, Intent::Sell, shares),
        }
    }

    /// Sell at any price
    pub fn sell_market(actor: impl Into<String>, created_at: u64, shares: u64) -> Self {
        Order::SellMarket {
            base: BaseOrder::new(actor, created_at, Intent::Sell, shares),
        }
    }

    /// Queue priority key. Market orders return their sentinel.
    #[inline]
    pub fn price(&self) -> u64 {
        match self {
            Order::BuyLimit { bid, .. } => *bid,
            Order::BuyMarket { .. } => MARKET_BUY_PRICE,
            Order::SellLimit { ask, .. } => *ask,
            Order::SellMarket { .. } => MARKET_SELL_PRICE,
        }
    }

    /// Index key derived from actor and creation time, e.g. `"Bob:1700000000"`.
    ///
    /// Two orders from the same actor with the same timestamp collide; the
    /// book rejects the second one while the first is still live.
    pub fn identity(&self) -> String {
        let base = self.base();
        format!("{}:{}", base.actor, base.created_at)
    }

    /// Shared attributes
    #[inline]
    pub fn base(&self) -> &BaseOrder {
        match self {
            Order::BuyLimit { base, .. }
            | Order::BuyMarket { base }
            | Order::SellLimit { base, .. }
            | Order::SellMarket { base } => base,
        }
    }

    #[inline]
    pub(crate) fn base_mut(&mut self) -> &mut BaseOrder {
        match self {
            Order::BuyLimit { base, .. }
            | Order::BuyMarket { base }
            | Order::SellLimit { base, .. }
            | Order::SellMarket { base } => base,
        }
    }

    /// Side implied by the variant
    #[inline]
    pub fn variant_intent(&self) -> Intent {
        match self {
            Order::BuyLimit { .. } | Order::BuyMarket { .. } => Intent::Buy,
            Order::SellLimit { .. } | Order::SellMarket { .. } => Intent::Sell,
        }
    }

    /// Limit or market
    #[inline]
    pub fn kind(&self) -> OrderKind {
        match self {
            Order::BuyLimit { .. } | Order::SellLimit { .. } => OrderKind::Limit,
            Order::BuyMarket { .. } | Order::SellMarket { .. } => OrderKind::Market,
        }
    }

    /// Variant name, for logs and errors
    pub fn variant_name(&self) -> &'static str {
        match self {
            Order::BuyLimit { .. } => "BuyLimit",
            Order::BuyMarket { .. } => "BuyMarket",
            Order::SellLimit { .. } => "SellLimit",
            Order::SellMarket { .. } => "SellMarket",
        }
    }

    #[inline]
    pub fn intent(&self) -> Intent {
        self.base().intent
    }

    #[inline]
    pub fn shares(&self) -> u64 {
        self.base().shares
    }

    #[inline]
    pub fn state(&self) -> OrderState {
        self.base().state
    }

    #[inline]
    pub fn actor(&self) -> &str {
        &self.base().actor
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.state() == OrderState::Filled
    }

    /// Check that the order may be placed on a book.
    ///
    /// Rejects zero shares, limit prices outside the accepted range, an
    /// `intent` that disagrees with the variant, and any state but `Open`.
    pub fn validate(&self) -> Result<(), InvalidOrder> {
        let base = self.base();

        if base.shares == 0 {
            return Err(InvalidOrder::ZeroShares);
        }

        if base.intent != self.variant_intent() {
            return Err(InvalidOrder::IntentMismatch {
                variant: self.variant_name(),
                intent: base.intent,
            });
        }

        if base.state != OrderState::Open {
            return Err(InvalidOrder::NotOpen { state: base.state });
        }

        if self.kind() == OrderKind::Limit && !is_valid_limit_price(self.price()) {
            return Err(InvalidOrder::PriceOutOfRange { price: self.price() });
        }

        Ok(())
    }

    /// Take `quantity` shares off the order and advance its state.
    ///
    /// Returns the shares left. `quantity` never exceeds the outstanding
    /// shares when called from the matching loop.
    pub(crate) fn fill(&mut self, quantity: u64) -> u64 {
        let base = self.base_mut();
        debug_assert!(quantity <= base.shares, "overfill");
        base.shares = base.shares.saturating_sub(quantity);
        base.state = if base.shares == 0 {
            OrderState::Filled
        } else {
            OrderState::Partial
        };
        base.shares
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::price::{to_fixed, MAX_LIMIT_PRICE};

    #[test]
    fn test_intent_opposite() {
        assert_eq!(Intent::Buy.opposite(), Intent::Sell);
        assert_eq!(Intent::Sell.opposite(), Intent::Buy);
    }

    #[test]
    fn test_limit_prices() {
        let bid = Order::buy_limit("Bob", 0, 100, to_fixed("10.05").unwrap());
        let ask = Order::sell_limit("Larry", 0, 100, to_fixed("10.10").unwrap());

        assert_eq!(bid.price(), 1_005_000_000);
        assert_eq!(ask.price(), 1_010_000_000);
        assert_eq!(bid.kind(), OrderKind::Limit);
    }

    #[test]
    fn test_market_sentinels() {
        let buy = Order::buy_market("Tim", 0, 100);
        let sell = Order::sell_market("Sam", 0, 100);

        assert_eq!(buy.price(), MARKET_BUY_PRICE);
        assert_eq!(sell.price(), MARKET_SELL_PRICE);
        assert!(buy.price() > MAX_LIMIT_PRICE);
        assert_eq!(sell.kind(), OrderKind::Market);
    }

    #[test]
    fn test_identity() {
        let order = Order::buy_limit("Bob", 1_703_577_600, 100, 1_005_000_000);
        assert_eq!(order.identity(), "Bob:1703577600");
        assert!(order.identity().starts_with("Bob"));
    }

    #[test]
    fn test_constructors_set_intent_and_state() {
        let order = Order::sell_market("Terry", 7, 100);
        assert_eq!(order.intent(), Intent::Sell);
        assert_eq!(order.variant_intent(), Intent::Sell);
        assert_eq!(order.state(), OrderState::Open);
        assert_eq!(order.shares(), 100);
        assert_eq!(order.actor(), "Terry");
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        assert!(Order::buy_limit("Bob", 0, 1, 1_005_000_000).validate().is_ok());
        assert!(Order::sell_market("Sam", 0, 1).validate().is_ok());
    }

    #[test]
    fn test_validate_zero_shares() {
        let order = Order::buy_market("Tim", 0, 0);
        assert_eq!(order.validate(), Err(InvalidOrder::ZeroShares));
    }

    #[test]
    fn test_validate_price_range() {
        let order = Order::sell_limit("Larry", 0, 100, 0);
        assert_eq!(order.validate(), Err(InvalidOrder::PriceOutOfRange { price: 0 }));

        let order = Order::buy_limit("Bob", 0, 100, MARKET_BUY_PRICE);
        assert_eq!(
            order.validate(),
            Err(InvalidOrder::PriceOutOfRange { price: MARKET_BUY_PRICE })
        );
    }

    #[test]
    fn test_validate_intent_mismatch() {
        let order = Order::BuyLimit {
            bid: 1_000_000_000,
            base: BaseOrder::new("Gary", 0, Intent::Sell, 100),
        };
        assert_eq!(
            order.validate(),
            Err(InvalidOrder::IntentMismatch { variant: "BuyLimit", intent: Intent::Sell })
        );
    }

    #[test]
    fn test_validate_not_open() {
        let mut order = Order::buy_market("Tim", 0, 100);
        order.base_mut().state = OrderState::Partial;
        assert_eq!(
            order.validate(),
            Err(InvalidOrder::NotOpen { state: OrderState::Partial })
        );
    }

    #[test]
    fn test_fill_transitions() {
        let mut order = Order::buy_market("Tim", 0, 100);

        assert_eq!(order.fill(30), 70);
        assert_eq!(order.state(), OrderState::Partial);

        assert_eq!(order.fill(70), 0);
        assert_eq!(order.state(), OrderState::Filled);
        assert!(order.is_filled());
        assert!(!order.state().is_live());
    }
}
