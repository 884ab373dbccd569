//! Debounced, last-write-wins tracking of the displayed price
//!
//! Each submission takes the next sequence number. A price is published only
//! while its sequence is the newest one issued, and publication never moves
//! the displayed sequence backwards, so a slow backend answer for old input
//! cannot replace a price computed from newer input.

use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::pricing::ShipmentPricingRequest;
use crate::quote::QuoteContext;
use crate::resolver::{PriceResolver, ResolvedPrice};

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedPrice {
    pub sequence: u64,
    /// Instant local estimate shown while the debounced resolution is pending
    pub provisional: bool,
    pub price: ResolvedPrice,
}

pub struct PriceTracker {
    resolver: Arc<PriceResolver>,
    debounce: Duration,
    latest: AtomicU64,
    displayed: ArcSwapOption<TrackedPrice>,
}

impl PriceTracker {
    pub fn new(resolver: Arc<PriceResolver>, debounce: Duration) -> Self {
        Self {
            resolver,
            debounce,
            latest: AtomicU64::new(0),
            displayed: ArcSwapOption::empty(),
        }
    }

    /// Currently displayed price
    pub fn current(&self) -> Option<Arc<TrackedPrice>> {
        self.displayed.load_full()
    }

    /// Sequence number of the newest submission
    pub fn latest_sequence(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Submit new input
    ///
    /// Publishes the local estimate immediately, then resolves after the
    /// debounce interval. Returns the resolved price if it was published, or
    /// `None` when newer input superseded this submission.
    pub async fn submit(
        &self,
        request: ShipmentPricingRequest,
        context: QuoteContext,
    ) -> Option<Arc<TrackedPrice>> {
        let sequence = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        self.publish(TrackedPrice {
            sequence,
            provisional: true,
            price: self.resolver.resolve_local(&request),
        });

        tokio::time::sleep(self.debounce).await;
        if self.is_stale(sequence) {
            debug!(sequence, "Submission superseded during debounce");
            return None;
        }

        let price = self.resolver.resolve(&request, &context).await;
        if self.is_stale(sequence) {
            debug!(sequence, source = price.source.as_str(), "Discarding stale price");
            return None;
        }

        self.publish(TrackedPrice {
            sequence,
            provisional: false,
            price,
        })
    }

    fn is_stale(&self, sequence: u64) -> bool {
        self.latest.load(Ordering::SeqCst) != sequence
    }

    /// Store unless a newer sequence is already displayed
    fn publish(&self, tracked: TrackedPrice) -> Option<Arc<TrackedPrice>> {
        let candidate = Arc::new(tracked);
        let mut accepted = false;

        self.displayed.rcu(|current| match current {
            Some(existing) if existing.sequence > candidate.sequence => {
                accepted = false;
                Some(Arc::clone(existing))
            }
            _ => {
                accepted = true;
                Some(Arc::clone(&candidate))
            }
        });

        accepted.then_some(candidate)
    }
}
