//! Single-writer service around an [`OrderBook`].
//!
//! The book has no internal locking, so `add`, `run` and handler
//! registration must never overlap. [`BookService`] gives the book to one
//! dedicated thread and lets any number of [`BookHandle`]s send it commands
//! over a channel. Each command is applied to completion before the next
//! one is read, and the caller blocks until its reply arrives.

use std::thread::{self, JoinHandle};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::config::BookConfig;
use crate::error::{EngineError, OrderError};
use crate::orderbook::{OrderBook, TradeHandler};
use crate::types::{Intent, Order};

enum Command {
    Add {
        order: Order,
        reply: oneshot::Sender<Result<(), OrderError>>,
    },
    Run {
        reply: oneshot::Sender<()>,
    },
    SetTradeHandler {
        handler: TradeHandler,
        reply: oneshot::Sender<()>,
    },
    BestPrice {
        intent: Intent,
        reply: oneshot::Sender<Option<u64>>,
    },
    Prices {
        intent: Intent,
        reply: oneshot::Sender<Vec<u64>>,
    },
    Len {
        reply: oneshot::Sender<usize>,
    },
    StateRoot {
        reply: oneshot::Sender<[u8; 32]>,
    },
    Shutdown,
}

/// Owner of the matcher thread.
///
/// ## Example
///
/// ```
/// use market_core::config::BookConfig;
/// use market_core::engine::BookService;
/// use market_core::types::{Intent, Order};
///
/// let service = BookService::spawn(BookConfig::default()).unwrap();
/// let handle = service.handle();
///
/// handle.add(Order::buy_limit("Bob", 1, 100, 1_005_000_000)).unwrap();
/// handle.add(Order::sell_market("Sam", 1, 100)).unwrap();
/// handle.run().unwrap();
///
/// assert_eq!(handle.len().unwrap(), 0);
/// let book = service.shutdown().unwrap();
/// assert_eq!(book.match_count(), 1);
/// ```
pub struct BookService {
    handle: BookHandle,
    worker: JoinHandle<OrderBook>,
}

impl BookService {
    /// Start the matcher thread with an empty book built from `config`.
    pub fn spawn(config: BookConfig) -> Result<Self, EngineError> {
        let (commands, receiver) = mpsc::unbounded_channel();
        let book = OrderBook::from_config(&config);
        let run_on_add = config.run_on_add;

        let worker = thread::Builder::new()
            .name("matcher".to_string())
            .spawn(move || serve(book, receiver, run_on_add))
            .map_err(|e| EngineError::Spawn(e.to_string()))?;

        info!(capacity = config.capacity, run_on_add, "matcher started");
        Ok(Self {
            handle: BookHandle { commands },
            worker,
        })
    }

    /// A new handle for submitting commands
    pub fn handle(&self) -> BookHandle {
        self.handle.clone()
    }

    /// Stop the matcher and return the book as it was left.
    ///
    /// Commands still queued behind the shutdown are dropped and their
    /// callers see [`EngineError::Stopped`].
    pub fn shutdown(self) -> Result<OrderBook, EngineError> {
        // The matcher may already be gone; joining reports that.
        let _ = self.handle.commands.send(Command::Shutdown);
        self.worker.join().map_err(|_| EngineError::Stopped)
    }
}

fn serve(
    mut book: OrderBook,
    mut commands: mpsc::UnboundedReceiver<Command>,
    run_on_add: bool,
) -> OrderBook {
    // Reply send failures mean the caller gave up waiting; nothing to do.
    while let Some(command) = commands.blocking_recv() {
        match command {
            Command::Add { order, reply } => {
                let result = book.add(order);
                if result.is_ok() && run_on_add {
                    book.run();
                }
                let _ = reply.send(result);
            }
            Command::Run { reply } => {
                book.run();
                let _ = reply.send(());
            }
            Command::SetTradeHandler { handler, reply } => {
                book.set_trade_handler(handler);
                debug!("trade handler replaced");
                let _ = reply.send(());
            }
            Command::BestPrice { intent, reply } => {
                let _ = reply.send(book.best_price(intent));
            }
            Command::Prices { intent, reply } => {
                let _ = reply.send(book.prices(intent));
            }
            Command::Len { reply } => {
                let _ = reply.send(book.len());
            }
            Command::StateRoot { reply } => {
                let _ = reply.send(book.state_root());
            }
            Command::Shutdown => break,
        }
    }

    info!(resting = book.len(), matches = book.match_count(), "matcher stopped");
    book
}

/// Cloneable, thread-safe front end to a [`BookService`].
///
/// Every method blocks until the matcher has applied the command, and
/// fails with [`EngineError::Stopped`] once the matcher is gone. Do not
/// call these from inside an async runtime.
#[derive(Clone)]
pub struct BookHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl BookHandle {
    fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, EngineError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .map_err(|_| EngineError::Stopped)?;
        response.blocking_recv().map_err(|_| EngineError::Stopped)
    }

    /// See [`OrderBook::add`]
    pub fn add(&self, order: Order) -> Result<(), EngineError> {
        Ok(self.request(|reply| Command::Add { order, reply })??)
    }

    /// See [`OrderBook::run`]
    pub fn run(&self) -> Result<(), EngineError> {
        self.request(|reply| Command::Run { reply })
    }

    /// Replace the trade handler. It will run on the matcher thread.
    ///
    /// The handler must not call back into any [`BookHandle`]. The request
    /// waits for a reply only the matcher thread can send, and that thread
    /// is the one running the handler, so the service deadlocks.
    pub fn set_trade_handler<F>(&self, handler: F) -> Result<(), EngineError>
    where
        F: FnMut(&Order) + Send + 'static,
    {
        let handler: TradeHandler = Box::new(handler);
        self.request(|reply| Command::SetTradeHandler { handler, reply })
    }

    pub fn best_price(&self, intent: Intent) -> Result<Option<u64>, EngineError> {
        self.request(|reply| Command::BestPrice { intent, reply })
    }

    pub fn prices(&self, intent: Intent) -> Result<Vec<u64>, EngineError> {
        self.request(|reply| Command::Prices { intent, reply })
    }

    pub fn len(&self) -> Result<usize, EngineError> {
        self.request(|reply| Command::Len { reply })
    }

    pub fn state_root(&self) -> Result<[u8; 32], EngineError> {
        self.request(|reply| Command::StateRoot { reply })
    }
}
