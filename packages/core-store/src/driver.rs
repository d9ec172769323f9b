//! A tokio task that runs buffered flushes when they become due.
//!
//! Without the driver, the host calls [`EntryIndex::run_due`] on each turn
//! of its loop. With it, flushes run on their own once the deadline passes.
//!
//! The driver sleeps for however long the index's own clock says is left
//! before the deadline, so any [`Clock`](crate::Clock) works. With
//! [`TokioClock`](crate::TokioClock), `tokio::time::pause` and `advance` move
//! both the deadlines and the driver's sleeps.
//!
//! ```rust,ignore
//! let entries = EntryIndex::with_clock(StoreConfig::default(), TokioClock);
//! let driver = spawn_flush_driver(entries.clone());
//!
//! entries.set("a", 1);
//! tokio::time::sleep(Duration::from_millis(150)).await;
//! assert!(entries.get("a").is_ready());
//!
//! driver.abort();
//! ```

use tokio::task::JoinHandle;

use crate::EntryIndex;

/// Spawn a task that flushes `entries` whenever its flush is due.
///
/// The task runs until the returned handle is aborted.
pub fn spawn_flush_driver<T>(entries: EntryIndex<T>) -> JoinHandle<()>
where
    T: Send + Sync + 'static,
{
    tokio::spawn(async move {
        loop {
            match entries.until_due() {
                Some(delay) if delay.is_zero() => {
                    entries.run_due();
                }
                Some(delay) => tokio::time::sleep(delay).await,
                None => entries.armed().notified().await,
            }
        }
    })
}
