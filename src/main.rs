//! Market Core - demo entry point
//!
//! Seeds the matcher with a small mixed book, runs one matching pass and
//! prints what is left. An optional first argument names a JSON config
//! file (see `BookConfig`).

use std::process::ExitCode;

use market_core::types::price::{from_fixed, to_fixed};
use market_core::{BookConfig, BookService, EngineError, Intent, Order, TradeDispatcher};

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match BookConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(%path, error = %e, "failed to load config");
                return ExitCode::FAILURE;
            }
        },
        None => BookConfig::default(),
    };

    match demo(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "demo failed");
            ExitCode::FAILURE
        }
    }
}

fn demo(config: BookConfig) -> Result<(), EngineError> {
    let dispatcher = TradeDispatcher::from_config(&config, |order: Order| {
        tracing::info!(
            identity = %order.identity(),
            price = %from_fixed(order.price()),
            state = ?order.state(),
            shares = order.shares(),
            "trade"
        );
    })?;

    let service = BookService::spawn(config)?;
    let handle = service.handle();
    handle.set_trade_handler(dispatcher.trade_handler())?;

    let now = 1_703_577_600;
    let bid = |s: &str| to_fixed(s).unwrap_or_default();
    for order in [
        Order::buy_limit("Bob", now, 100, bid("10.05")),
        Order::buy_market("Tim", now, 100),
        Order::buy_limit("Gary", now, 100, bid("10.00")),
        Order::sell_market("Terry", now, 100),
        Order::sell_limit("Larry", now, 100, bid("10.10")),
        Order::sell_market("Sam", now, 100),
    ] {
        handle.add(order)?;
    }
    handle.run()?;

    let show = |price: Option<u64>| price.map(from_fixed).unwrap_or_else(|| "-".to_string());
    println!("best bid:   {}", show(handle.best_price(Intent::Buy)?));
    println!("best ask:   {}", show(handle.best_price(Intent::Sell)?));
    println!("resting:    {}", handle.len()?);
    println!("state root: {}", hex::encode(handle.state_root()?));

    // the book owns the dispatcher's sender, drop it before draining
    drop(service.shutdown()?);
    let delivered = dispatcher.join()?;
    println!("trades:     {delivered}");
    Ok(())
}
