//! [`Committed`]: the result of a mutation that has already been applied in
//! memory.

use tracing::warn;

use crate::{Error, Result};

/// A mutation's outcome together with any failures from persisting it.
///
/// The in-memory state is the source of truth for the session; a failed save
/// does not roll it back. Callers inspect `failures` (or call
/// [`Committed::into_result`]) to warn the user that the change may not
/// survive a restart.
#[derive(Debug)]
#[must_use = "persistence failures are only reported through `Committed`"]
pub struct Committed<T> {
  pub value:    T,
  pub failures: Vec<Error>,
}

impl<T> Committed<T> {
  pub(crate) fn new(value: T) -> Self {
    Self {
      value,
      failures: Vec::new(),
    }
  }

  /// Record the outcome of one save.
  pub(crate) fn note(&mut self, outcome: Result<()>) {
    if let Err(e) = outcome {
      warn!(error = %e, "change kept in memory but not persisted");
      self.failures.push(e);
    }
  }

  pub(crate) fn absorb<U>(&mut self, other: Committed<U>) -> U {
    self.failures.extend(other.failures);
    other.value
  }

  /// `true` if every save succeeded.
  pub fn is_durable(&self) -> bool { self.failures.is_empty() }

  /// Discard the value if any save failed, returning the first failure.
  pub fn into_result(self) -> Result<T> {
    match self.failures.into_iter().next() {
      Some(e) => Err(e),
      None => Ok(self.value),
    }
  }

  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Committed<U> {
    Committed {
      value:    f(self.value),
      failures: self.failures,
    }
  }
}
