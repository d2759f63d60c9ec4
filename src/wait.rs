//! Waiting for the page to reach a state.
//!
//! Pages render asynchronously: an element a test is about to look at may not exist yet, may
//! exist but still be hidden, or may be replaced while it is being used. [`Wait`] reconciles a
//! check made at an arbitrary instant with that moving target by polling a condition against the
//! live page until it holds or the [`WaitPolicy`] timeout expires.
//!
//! The condition is evaluated once immediately, then once per poll interval, and one last time at
//! the deadline itself. A condition that becomes true at any point up to and including the
//! deadline is therefore observed, and one that only becomes true after it is not.
//!
//! What an expired wait *means* is decided by the caller:
//!
//! - [`Wait::presence`] never fails for absence. It reports a [`Presence`], whose
//!   [`is_visible`](Presence::is_visible) view is what page queries return.
//! - [`Wait::for_visible`], [`Wait::for_clickable`] and [`Wait::for_url_containing`] fail with
//!   [`Error::Timeout`], tagged with the [`TimeoutKind`] the caller passes in.
//!
//! Nothing is cached between calls; every wait starts from the page as it is now.

use crate::driver::Driver;
use crate::error::{DriverError, Error, Result, TimeoutKind};
use crate::wd::Locator;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_millis(500);
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// How long a wait may take and how often it re-checks the page.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WaitPolicy {
    timeout: Duration,
    poll_interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl WaitPolicy {
    /// A policy with the given timeout and the default poll interval of 500ms.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: DEFAULT_POLLING_INTERVAL,
        }
    }

    /// Replace the poll interval.
    ///
    /// A zero interval is bumped to one millisecond so a wait never spins.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }

    /// The longest a single wait may take.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Time between two evaluations of a condition.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

/// What a visibility query saw when it finished.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Presence {
    /// The element was found and displayed.
    Visible,
    /// The element was found at least once, but was never displayed before the timeout.
    Hidden,
    /// No element matched before the timeout.
    Absent,
}

impl Presence {
    /// Collapse to the boolean answer page queries give.
    pub fn is_visible(self) -> bool {
        matches!(self, Presence::Visible)
    }
}

/// A wait against one driver, bounded by one [`WaitPolicy`].
#[derive(Debug)]
pub struct Wait<'a, D: ?Sized> {
    driver: &'a D,
    policy: WaitPolicy,
}

impl<'a, D> Wait<'a, D>
where
    D: Driver + ?Sized,
{
    /// Prepare a wait on `driver`.
    pub fn new(driver: &'a D, policy: WaitPolicy) -> Self {
        Self { driver, policy }
    }

    /// The policy bounding this wait.
    pub fn policy(&self) -> WaitPolicy {
        self.policy
    }

    /// Evaluate `condition` until it yields a value or the timeout expires.
    ///
    /// `Ok(None)` from the condition means "not yet", and so do driver errors for which
    /// [`DriverError::is_miss`] holds. Any other driver error ends the wait immediately.
    /// Returns `Ok(None)` if the timeout expired.
    pub async fn poll<F, FF, R>(&self, mut condition: F) -> std::result::Result<Option<R>, DriverError>
    where
        F: FnMut(&'a D) -> FF,
        FF: Future<Output = std::result::Result<Option<R>, DriverError>>,
    {
        let start = Instant::now();
        // an unrepresentable deadline means "never give up"
        let deadline = start
            .checked_add(self.policy.timeout)
            .unwrap_or_else(|| start + FAR_FUTURE);
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match condition(self.driver).await {
                Ok(Some(result)) => {
                    tracing::trace!(attempts, elapsed = ?start.elapsed(), "condition met");
                    return Ok(Some(result));
                }
                Ok(None) => (),
                Err(e) if e.is_miss() => tracing::trace!(attempts, error = %e, "not yet"),
                Err(e) => return Err(e),
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::trace!(attempts, "deadline reached");
                return Ok(None);
            }
            tokio::time::sleep((deadline - now).min(self.policy.poll_interval)).await;
        }
    }

    /// Like [`Wait::poll`], but an expired timeout is an [`Error::Timeout`] of the given kind.
    pub async fn until<F, FF, R>(&self, condition: &str, kind: TimeoutKind, check: F) -> Result<R>
    where
        F: FnMut(&'a D) -> FF,
        FF: Future<Output = std::result::Result<Option<R>, DriverError>>,
    {
        tracing::debug!(%condition, timeout = ?self.policy.timeout, "waiting");
        match self.poll(check).await? {
            Some(r) => Ok(r),
            None => {
                tracing::debug!(%condition, %kind, "wait timed out");
                Err(Error::Timeout {
                    condition: condition.to_string(),
                    timeout: self.policy.timeout,
                    kind,
                })
            }
        }
    }

    /// Wait for `locator` to resolve to a displayed element, and return it.
    pub async fn for_visible(&self, locator: &Locator, kind: TimeoutKind) -> Result<D::Element> {
        self.until(&format!("{} to be visible", locator), kind, |d| async move {
            let element = d.find(locator).await?;
            Ok::<_, DriverError>(d.is_displayed(&element).await?.then_some(element))
        })
        .await
    }

    /// Wait for `locator` to resolve to an element that is displayed and enabled, and return it.
    pub async fn for_clickable(&self, locator: &Locator, kind: TimeoutKind) -> Result<D::Element> {
        self.until(&format!("{} to be clickable", locator), kind, |d| async move {
            let element = d.find(locator).await?;
            let clickable = d.is_displayed(&element).await? && d.is_enabled(&element).await?;
            Ok::<_, DriverError>(clickable.then_some(element))
        })
        .await
    }

    /// Wait for the current URL to contain `fragment`, and return that URL.
    pub async fn for_url_containing(&self, fragment: &str, kind: TimeoutKind) -> Result<Url> {
        self.until(&format!("url to contain `{}`", fragment), kind, |d| async move {
            let url = d.current_url().await?;
            Ok::<_, DriverError>(url.as_str().contains(fragment).then_some(url))
        })
        .await
    }

    /// Wait for `locator` to become visible, reporting what was seen instead of failing.
    pub async fn presence(&self, locator: &Locator) -> Result<Presence> {
        let found = AtomicBool::new(false);
        let found = &found;
        let visible = self
            .poll(|d| async move {
                let element = d.find(locator).await?;
                found.store(true, Ordering::Relaxed);
                Ok::<_, DriverError>(d.is_displayed(&element).await?.then_some(()))
            })
            .await?;

        let presence = match visible {
            Some(()) => Presence::Visible,
            None if found.load(Ordering::Relaxed) => Presence::Hidden,
            None => Presence::Absent,
        };
        tracing::debug!(%locator, ?presence, "visibility query");
        Ok(presence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeDriver, FakeElement};
    use std::sync::atomic::AtomicU32;

    #[test]
    fn default_policy_matches_explicit_wait() {
        let p = WaitPolicy::default();
        assert_eq!(p.timeout(), Duration::from_secs(10));
        assert_eq!(p.poll_interval(), Duration::from_millis(500));
    }

    #[test]
    fn zero_interval_is_bumped() {
        let p = WaitPolicy::new(Duration::from_secs(1)).with_poll_interval(Duration::ZERO);
        assert_eq!(p.poll_interval(), Duration::from_millis(1));
    }

    #[test]
    fn only_visible_is_true() {
        assert!(Presence::Visible.is_visible());
        assert!(!Presence::Hidden.is_visible());
        assert!(!Presence::Absent.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn polls_once_per_interval_plus_final_check() {
        let d = FakeDriver::new("http://shuttle.test/");
        let policy = WaitPolicy::new(Duration::from_secs(2)).with_poll_interval(Duration::from_millis(500));
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let r: Option<()> = Wait::new(&d, policy)
            .poll(|_| async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })
            .await
            .unwrap();
        assert_eq!(r, None);
        // t = 0, 0.5, 1.0, 1.5, 2.0
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_is_clipped_to_deadline() {
        let d = FakeDriver::new("http://shuttle.test/");
        let policy = WaitPolicy::new(Duration::from_millis(1200)).with_poll_interval(Duration::from_millis(500));
        let start = Instant::now();
        let r: Option<()> = Wait::new(&d, policy).poll(|_| async { Ok(None) }).await.unwrap();
        assert_eq!(r, None);
        assert_eq!(start.elapsed(), Duration::from_millis(1200));
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_driver_error_aborts_immediately() {
        let d = FakeDriver::new("http://shuttle.test/");
        let start = Instant::now();
        let r: std::result::Result<Option<()>, _> = Wait::new(&d, WaitPolicy::default())
            .poll(|_| async { Err(DriverError::Session("window closed".into())) })
            .await;
        assert!(matches!(r, Err(DriverError::Session(..))));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn huge_timeout_does_not_overflow() {
        let header = Locator::xpath("//h2");
        let d = FakeDriver::new("http://shuttle.test/").with_element(header.clone(), FakeElement::new());
        let start = Instant::now();
        let presence = Wait::new(&d, WaitPolicy::new(Duration::MAX))
            .presence(&header)
            .await
            .unwrap();
        assert_eq!(presence, Presence::Visible);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn hidden_element_is_reported_as_hidden() {
        let header = Locator::xpath("//h2");
        let d = FakeDriver::new("http://shuttle.test/")
            .with_element(header.clone(), FakeElement::new().hidden());
        let presence = Wait::new(&d, WaitPolicy::new(Duration::from_secs(1)))
            .presence(&header)
            .await
            .unwrap();
        assert_eq!(presence, Presence::Hidden);
    }
}
