//! Refresh timers and the background fetch dispatcher.

use crate::api::QuoteSource;
use crate::event::{AppEvent, Tick};
use crate::models::Symbol;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{Instant, Sleep, sleep};
use tracing::{debug, trace};

/// Two one-shot timers that the event loop re-arms after handling each tick.
///
/// A timer does not fire again until it is re-armed, so a slow handler
/// delays the next tick instead of queueing a backlog.
pub struct RefreshScheduler {
    data_interval: Duration,
    repaint_interval: Duration,
    data_timer: Pin<Box<Sleep>>,
    repaint_timer: Pin<Box<Sleep>>,
}

impl RefreshScheduler {
    /// Arm both timers starting from now.
    pub fn new(data_interval: Duration, repaint_interval: Duration) -> Self {
        Self {
            data_interval,
            repaint_interval,
            data_timer: Box::pin(sleep(data_interval)),
            repaint_timer: Box::pin(sleep(repaint_interval)),
        }
    }

    pub fn data_interval(&self) -> Duration {
        self.data_interval
    }

    /// Wait for the next due timer. Data wins when both are due.
    ///
    /// Cancel safe. A fired timer stays ready until [`rearm`](Self::rearm)
    /// is called for it.
    pub async fn next_tick(&mut self) -> Tick {
        tokio::select! {
            biased;
            _ = self.data_timer.as_mut() => Tick::Data,
            _ = self.repaint_timer.as_mut() => Tick::Repaint,
        }
    }

    /// Schedule the next firing of `tick` one period from now.
    pub fn rearm(&mut self, tick: Tick) {
        let now = Instant::now();
        match tick {
            Tick::Data => self.data_timer.as_mut().reset(now + self.data_interval),
            Tick::Repaint => self.repaint_timer.as_mut().reset(now + self.repaint_interval),
        }
    }
}

/// Runs quote fetches as fire-and-forget tasks that report back over the
/// event channel.
pub struct FetchDispatcher<S> {
    source: Arc<S>,
    events: UnboundedSender<AppEvent>,
}

impl<S: QuoteSource> FetchDispatcher<S> {
    pub fn new(source: Arc<S>, events: UnboundedSender<AppEvent>) -> Self {
        Self { source, events }
    }

    /// Spawn one independent task per symbol.
    pub fn dispatch(&self, symbols: Vec<Symbol>) {
        if symbols.is_empty() {
            return;
        }
        debug!(count = symbols.len(), "dispatching fetches");

        for symbol in symbols {
            let source = Arc::clone(&self.source);
            let events = self.events.clone();
            tokio::spawn(async move {
                let quote = source.fetch_quote(&symbol).await;
                trace!(%symbol, price = quote.price, "fetch finished");
                // The loop is gone once the user quits; nobody to tell.
                let _ = events.send(AppEvent::QuoteFetched { symbol, quote });
            });
        }
    }
}
