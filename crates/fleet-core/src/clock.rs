//! Injectable time and identity sources.
//!
//! Every component that stamps a record or mints an id takes an [`Env`]
//! rather than calling `Utc::now()` / `Uuid::new_v4()` directly, so tests can
//! pin the clock and get predictable ids.

use std::sync::{
  Arc, Mutex,
  atomic::{AtomicU64, Ordering},
};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

// ─── Clock ───────────────────────────────────────────────────────────────────

pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;

  /// The current calendar date in UTC.
  fn today(&self) -> NaiveDate { self.now().date_naive() }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
  now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
  pub fn new(now: DateTime<Utc>) -> Self { Self { now: Mutex::new(now) } }

  pub fn set(&self, now: DateTime<Utc>) {
    *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
  }

  pub fn advance(&self, by: Duration) {
    let mut guard = self.now.lock().unwrap_or_else(|e| e.into_inner());
    *guard += by;
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> {
    *self.now.lock().unwrap_or_else(|e| e.into_inner())
  }
}

// ─── Ids ─────────────────────────────────────────────────────────────────────

/// Source of record identifiers. Must never hand out the same id twice within
/// a process, however quickly it is called.
pub trait IdGenerator: Send + Sync {
  fn next_id(&self) -> Uuid;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
  fn next_id(&self) -> Uuid { Uuid::new_v4() }
}

/// Monotonic ids `00000000-0000-0000-0000-000000000001`, `...02`, and so on.
#[derive(Debug, Default)]
pub struct SequentialIds {
  next: AtomicU64,
}

impl IdGenerator for SequentialIds {
  fn next_id(&self) -> Uuid {
    let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
    Uuid::from_u128(u128::from(n))
  }
}

// ─── Env ─────────────────────────────────────────────────────────────────────

/// The clock and id generator shared by every component of a workspace.
///
/// Cloning is cheap; both halves are reference-counted.
#[derive(Clone)]
pub struct Env {
  pub clock: Arc<dyn Clock>,
  pub ids:   Arc<dyn IdGenerator>,
}

impl Env {
  pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
    Self { clock, ids }
  }

  /// Wall-clock time and random UUIDs.
  pub fn system() -> Self { Self::new(Arc::new(SystemClock), Arc::new(RandomIds)) }

  pub fn now(&self) -> DateTime<Utc> { self.clock.now() }

  pub fn today(&self) -> NaiveDate { self.clock.today() }

  pub fn next_id(&self) -> Uuid { self.ids.next_id() }
}

impl Default for Env {
  fn default() -> Self { Self::system() }
}
