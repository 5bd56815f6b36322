use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use invtrack_allocation::LowStockItem;
use invtrack_core::DomainResult;

/// Minimum gap between two alert sends, in hours.
pub const DEFAULT_RESEND_INTERVAL_HOURS: i64 = 48;

/// Single stored last-sent timestamp. No concurrency control — last write
/// wins, matching the rest of the system.
pub trait AlertLog: Send + Sync {
    fn last_sent(&self) -> DomainResult<Option<DateTime<Utc>>>;
    fn record_sent(&self, at: DateTime<Utc>) -> DomainResult<()>;
}

/// Delivery channel for a low-stock alert (email in production).
pub trait AlertSender: Send + Sync {
    fn send(&self, items: &[LowStockItem]) -> DomainResult<()>;
}

impl<L> AlertLog for Arc<L>
where
    L: AlertLog + ?Sized,
{
    fn last_sent(&self) -> DomainResult<Option<DateTime<Utc>>> {
        (**self).last_sent()
    }

    fn record_sent(&self, at: DateTime<Utc>) -> DomainResult<()> {
        (**self).record_sent(at)
    }
}

impl<S> AlertSender for Arc<S>
where
    S: AlertSender + ?Sized,
{
    fn send(&self, items: &[LowStockItem]) -> DomainResult<()> {
        (**self).send(items)
    }
}

/// What happened to a notify request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertOutcome {
    Sent,
    /// An alert already went out within the resend interval.
    Throttled,
    /// Nothing is low on stock; no send attempted.
    NothingToReport,
}

/// Clock-gated low-stock notifier.
pub struct LowStockAlerter {
    log: Arc<dyn AlertLog>,
    sender: Arc<dyn AlertSender>,
    resend_interval: Duration,
}

impl LowStockAlerter {
    pub fn new(log: Arc<dyn AlertLog>, sender: Arc<dyn AlertSender>) -> Self {
        Self::with_interval(log, sender, Duration::hours(DEFAULT_RESEND_INTERVAL_HOURS))
    }

    pub fn with_interval(
        log: Arc<dyn AlertLog>,
        sender: Arc<dyn AlertSender>,
        resend_interval: Duration,
    ) -> Self {
        Self {
            log,
            sender,
            resend_interval,
        }
    }

    /// Send a low-stock alert unless one went out within the resend
    /// interval. Records the send time only after a successful send.
    pub fn notify(&self, items: &[LowStockItem], now: DateTime<Utc>) -> DomainResult<AlertOutcome> {
        if items.is_empty() {
            return Ok(AlertOutcome::NothingToReport);
        }

        if let Some(last) = self.log.last_sent()? {
            if now - last < self.resend_interval {
                tracing::debug!(?last, "low-stock alert throttled");
                return Ok(AlertOutcome::Throttled);
            }
        }

        self.sender.send(items)?;
        self.log.record_sent(now)?;
        tracing::info!(items = items.len(), "low-stock alert sent");
        Ok(AlertOutcome::Sent)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use invtrack_core::ItemId;
    use rust_decimal_macros::dec;

    use super::*;

    #[derive(Default)]
    struct MemoryLog(Mutex<Option<DateTime<Utc>>>);

    impl AlertLog for MemoryLog {
        fn last_sent(&self) -> DomainResult<Option<DateTime<Utc>>> {
            Ok(*self.0.lock().unwrap())
        }

        fn record_sent(&self, at: DateTime<Utc>) -> DomainResult<()> {
            *self.0.lock().unwrap() = Some(at);
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingSender(Mutex<usize>);

    impl AlertSender for CountingSender {
        fn send(&self, _items: &[LowStockItem]) -> DomainResult<()> {
            *self.0.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn low_item() -> LowStockItem {
        LowStockItem {
            item_id: ItemId::new(),
            name: "Teflon Tape".to_string(),
            category: Some("Plumbing items".to_string()),
            remaining: dec!(2),
            threshold: dec!(10),
        }
    }

    #[test]
    fn second_notify_inside_window_is_throttled() {
        let sender = Arc::new(CountingSender::default());
        let alerter = LowStockAlerter::new(Arc::new(MemoryLog::default()), sender.clone());
        let now = Utc::now();

        assert_eq!(
            alerter.notify(&[low_item()], now).unwrap(),
            AlertOutcome::Sent
        );
        assert_eq!(
            alerter
                .notify(&[low_item()], now + Duration::hours(47))
                .unwrap(),
            AlertOutcome::Throttled
        );
        assert_eq!(*sender.0.lock().unwrap(), 1);
    }

    #[test]
    fn notify_after_window_sends_again() {
        let sender = Arc::new(CountingSender::default());
        let alerter = LowStockAlerter::new(Arc::new(MemoryLog::default()), sender.clone());
        let now = Utc::now();

        alerter.notify(&[low_item()], now).unwrap();
        assert_eq!(
            alerter
                .notify(&[low_item()], now + Duration::hours(49))
                .unwrap(),
            AlertOutcome::Sent
        );
        assert_eq!(*sender.0.lock().unwrap(), 2);
    }

    #[test]
    fn empty_report_never_sends() {
        let sender = Arc::new(CountingSender::default());
        let alerter = LowStockAlerter::new(Arc::new(MemoryLog::default()), sender.clone());

        assert_eq!(
            alerter.notify(&[], Utc::now()).unwrap(),
            AlertOutcome::NothingToReport
        );
        assert_eq!(*sender.0.lock().unwrap(), 0);
    }
}
