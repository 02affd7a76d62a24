//! Cached `Date` header bytes.
//!
//! Formatting a date on every response is wasteful when the value only
//! changes once per second. [`DateHeader`] keeps the complete
//! `"\r\nDate: <IMF-fixdate>\r\n\r\n"` sequence pre-rendered and lets a
//! background task refresh it once per second, responses just copy the bytes.
//!
//! Two buffers are kept: the master, published through an [`ArcSwap`] and read
//! without locking, and the scratch, which only the refresher touches (under a
//! mutex). A refresh renders into the scratch and swaps it with the master.
//! A reader still holding an old master keeps it alive, the refresher then
//! renders into a copy instead of the shared buffer, so readers never observe
//! a partially written date.

use std::io::{Cursor, Write};
use std::ops::Deref;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::{Duration, SystemTime};

use arc_swap::{ArcSwap, Guard};
use httpdate::HttpDate;
use once_cell::sync::Lazy;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

const PREFIX: &[u8] = b"\r\nDate: ";
const SUFFIX: &[u8] = b"\r\n\r\n";

/// Length of an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub const DATE_LENGTH: usize = 29;

/// Length of the complete cached sequence
pub const HEADER_LENGTH: usize = PREFIX.len() + DATE_LENGTH + SUFFIX.len();

const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

type HeaderBuf = [u8; HEADER_LENGTH];

static DATE_HEADER: Lazy<Arc<DateHeader>> = Lazy::new(|| Arc::new(DateHeader::new()));

/// The double buffered `Date` header cache.
#[derive(Debug)]
pub struct DateHeader {
    master: ArcSwap<HeaderBuf>,
    scratch: Mutex<Arc<HeaderBuf>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

/// A lock-free snapshot of the master buffer.
///
/// Holding it does not block refreshes, it only pins the snapshot.
#[derive(Debug)]
pub struct HeaderBytes(Guard<Arc<HeaderBuf>>);

impl Deref for HeaderBytes {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        let buf: &HeaderBuf = &self.0;
        buf
    }
}

impl DateHeader {
    /// Creates a cache rendered with the current time, no refresher is running yet.
    pub fn new() -> Self {
        Self::at(SystemTime::now())
    }

    /// Creates a cache rendered with `now`, no refresher is running yet.
    pub fn at(now: SystemTime) -> Self {
        let date_header = Self {
            master: ArcSwap::from_pointee(empty_header()),
            scratch: Mutex::new(Arc::new(empty_header())),
            timer: Mutex::new(None),
        };
        date_header.refresh(now);
        date_header
    }

    /// Returns the process wide instance.
    ///
    /// The first call renders the current time synchronously, call
    /// [`sync_timer`](DateHeader::sync_timer) from within a tokio runtime to
    /// keep it fresh.
    pub fn global() -> &'static Arc<DateHeader> {
        &DATE_HEADER
    }

    /// The current `"\r\nDate: ...\r\n\r\n"` bytes.
    #[inline]
    pub fn current_header_bytes(&self) -> HeaderBytes {
        HeaderBytes(self.master.load())
    }

    /// Renders `now` into the scratch buffer and publishes it as the new master.
    ///
    /// # Panics
    ///
    /// Panics if the date does not render to exactly [`DATE_LENGTH`] bytes.
    pub fn refresh(&self, now: SystemTime) {
        let mut scratch = self.scratch.lock().unwrap_or_else(PoisonError::into_inner);

        // copies only when a reader still pins the old master
        let buf = Arc::make_mut(&mut scratch);
        let mut cursor = Cursor::new(&mut buf[PREFIX.len()..PREFIX.len() + DATE_LENGTH]);
        let formatted = write!(cursor, "{}", HttpDate::from(now));
        let written = usize::try_from(cursor.position()).unwrap_or(usize::MAX);
        assert!(formatted.is_ok() && written == DATE_LENGTH, "date time format failed, {written} bytes written");

        let rendered = Arc::clone(&scratch);
        *scratch = self.master.swap(rendered);
        trace!("date header refreshed");
    }

    /// (Re)starts the once per second refresher, the first tick fires immediately.
    ///
    /// A running refresher is cancelled first, so calling this again re-aligns
    /// the cadence. The task stops by itself once the cache is dropped.
    pub fn sync_timer(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(refresh_loop(weak));

        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = timer.replace(handle) {
            previous.abort();
        }
        debug!("date header timer synced");
    }
}

impl Default for DateHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DateHeader {
    fn drop(&mut self) {
        let timer = self.timer.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = timer.take() {
            handle.abort();
        }
    }
}

async fn refresh_loop(date_header: Weak<DateHeader>) {
    let mut interval = tokio::time::interval(REFRESH_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        match date_header.upgrade() {
            Some(date_header) => date_header.refresh(SystemTime::now()),
            None => {
                debug!("date header dropped, refresher stopped");
                return;
            }
        }
    }
}

fn empty_header() -> HeaderBuf {
    let mut buf = [b' '; HEADER_LENGTH];
    buf[..PREFIX.len()].copy_from_slice(PREFIX);
    buf[HEADER_LENGTH - SUFFIX.len()..].copy_from_slice(SUFFIX);
    buf
}
