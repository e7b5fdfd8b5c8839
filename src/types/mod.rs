//! Core data types for the matching core
//!
//! ## Types
//!
//! - [`Order`]: one of BuyLimit, BuyMarket, SellLimit, SellMarket
//! - [`BaseOrder`]: attributes shared by every variant
//! - [`Intent`]: Buy or Sell
//! - [`OrderState`]: Open, Partial or Filled
//!
//! ## Fixed-Point Arithmetic
//!
//! All prices are stored as `u64` scaled by 10^8, see [`price`].

mod order;
pub mod price;

pub use order::{BaseOrder, Intent, Order, OrderKind, OrderState};
