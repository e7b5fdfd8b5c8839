//! Error types for the matching core.
//!
//! All errors are local and recoverable: a rejected `add` leaves the book
//! untouched and the caller may resubmit a corrected order. Inconsistencies
//! discovered while matching are bugs and panic instead of surfacing here.

use thiserror::Error;

use crate::types::{Intent, OrderState};

/// Why an order was refused at submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidOrder {
    #[error("order must carry at least one share")]
    ZeroShares,

    #[error("limit price {price} is outside the accepted range")]
    PriceOutOfRange { price: u64 },

    #[error("{variant} order carries intent {intent:?}")]
    IntentMismatch { variant: &'static str, intent: Intent },

    #[error("order submitted in state {state:?}, expected Open")]
    NotOpen { state: OrderState },
}

/// Errors returned by [`OrderBook::add`](crate::orderbook::OrderBook::add).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("invalid order: {0}")]
    Invalid(#[from] InvalidOrder),

    #[error("an order with identity {identity} is already on the book")]
    DuplicateIdentity { identity: String },
}

/// Errors returned by the threaded book service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("matcher thread has stopped")]
    Stopped,

    #[error("failed to start worker thread: {0}")]
    Spawn(String),
}

/// Errors raised while loading a [`BookConfig`](crate::config::BookConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
