//! Bounded-retry connection to the review store at process start.
//!
//! ```text
//! Disconnected { attempt: 1 } ──ok──▶ Connected
//!        │ err
//!        ▼ wait `delay`
//! Disconnected { attempt: 2 } ──ok──▶ Connected
//!        │ err
//!        ▼ ...
//! Disconnected { attempt: max } ──err──▶ Failed
//! ```
//!
//! The delay is fixed (no backoff, no jitter) and is supplied through the
//! [`Delay`] trait so tests never sleep.

use std::{fmt::Display, future::Future, time::Duration};

use tracing::{info, warn};

use crate::{Error, Result};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// How many times to try, and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  pub max_attempts: u32,
  pub delay:        Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: DEFAULT_MAX_ATTEMPTS,
      delay:        DEFAULT_RETRY_DELAY,
    }
  }
}

/// Where the connector is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
  /// About to make attempt number `attempt` (1-based).
  Disconnected { attempt: u32 },
  Connected,
  Failed,
}

/// Waits between connection attempts.
pub trait Delay: Send + Sync {
  fn wait(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Drive `connect` until it yields a handle or `policy.max_attempts` is used
/// up.
///
/// Returns [`Error::StoreUnavailable`] carrying the last failure once every
/// attempt has failed. No wait follows the final attempt.
pub async fn establish<T, E, F, Fut, D>(
  policy: &RetryPolicy,
  delay: &D,
  mut connect: F,
) -> Result<T>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = std::result::Result<T, E>>,
  E: Display,
  D: Delay,
{
  let max_attempts = policy.max_attempts.max(1);
  let mut state = ConnectionState::Disconnected { attempt: 1 };
  let mut last_error = String::new();

  while let ConnectionState::Disconnected { attempt } = state {
    match connect().await {
      Ok(handle) => {
        state = ConnectionState::Connected;
        info!(attempt, ?state, "store connection established");
        return Ok(handle);
      }
      Err(e) => {
        last_error = e.to_string();
        warn!(attempt, max_attempts, error = %last_error, "store connection attempt failed");

        if attempt >= max_attempts {
          state = ConnectionState::Failed;
        } else {
          delay.wait(policy.delay).await;
          state = ConnectionState::Disconnected { attempt: attempt + 1 };
        }
      }
    }
  }

  warn!(?state, attempts = max_attempts, "giving up on store connection");
  Err(Error::StoreUnavailable {
    attempts: max_attempts,
    last_error,
  })
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Mutex,
    atomic::{AtomicU32, Ordering},
  };

  use super::*;

  /// Records requested waits instead of sleeping.
  #[derive(Default)]
  struct RecordingDelay {
    waits: Mutex<Vec<Duration>>,
  }

  impl Delay for RecordingDelay {
    async fn wait(&self, duration: Duration) {
      self.waits.lock().unwrap().push(duration);
    }
  }

  /// A connect function that fails the first `failures` calls.
  fn flaky(
    failures: u32,
    calls: &AtomicU32,
  ) -> impl FnMut() -> std::future::Ready<std::result::Result<&'static str, String>> + '_ {
    move || {
      let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
      std::future::ready(if n <= failures {
        Err(format!("connection refused (attempt {n})"))
      } else {
        Ok("handle")
      })
    }
  }

  #[tokio::test]
  async fn connects_on_first_try_without_waiting() {
    let delay = RecordingDelay::default();
    let calls = AtomicU32::new(0);

    let handle = establish(&RetryPolicy::default(), &delay, flaky(0, &calls))
      .await
      .unwrap();

    assert_eq!(handle, "handle");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(delay.waits.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn two_failures_then_success_reaches_connected() {
    let delay = RecordingDelay::default();
    let calls = AtomicU32::new(0);

    let handle = establish(&RetryPolicy::default(), &delay, flaky(2, &calls))
      .await
      .unwrap();

    assert_eq!(handle, "handle");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(*delay.waits.lock().unwrap(), vec![
      Duration::from_secs(5),
      Duration::from_secs(5)
    ]);
  }

  #[tokio::test]
  async fn three_failures_is_store_unavailable() {
    let delay = RecordingDelay::default();
    let calls = AtomicU32::new(0);

    let err = establish(&RetryPolicy::default(), &delay, flaky(u32::MAX, &calls))
      .await
      .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // No wait after the final attempt.
    assert_eq!(delay.waits.lock().unwrap().len(), 2);
    match err {
      Error::StoreUnavailable { attempts, last_error } => {
        assert_eq!(attempts, 3);
        assert_eq!(last_error, "connection refused (attempt 3)");
      }
      other => panic!("unexpected error: {other:?}"),
    }
  }

  #[tokio::test]
  async fn custom_policy_is_honoured() {
    let delay = RecordingDelay::default();
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy {
      max_attempts: 5,
      delay:        Duration::from_millis(250),
    };

    establish(&policy, &delay, flaky(4, &calls)).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 5);
    let waits = delay.waits.lock().unwrap();
    assert_eq!(waits.len(), 4);
    assert!(waits.iter().all(|d| *d == Duration::from_millis(250)));
  }

  #[tokio::test]
  async fn zero_attempts_still_tries_once() {
    let delay = RecordingDelay::default();
    let calls = AtomicU32::new(0);
    let policy = RetryPolicy { max_attempts: 0, ..RetryPolicy::default() };

    let err = establish(&policy, &delay, flaky(u32::MAX, &calls))
      .await
      .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(err, Error::StoreUnavailable { attempts: 1, .. }));
  }
}
