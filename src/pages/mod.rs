//! Page adapters for the MyShuttle web application.
//!
//! Each adapter binds one page's [`Locator`]s to named operations, and routes every driver
//! interaction through a [`Wait`]. Adapters follow two rules:
//!
//! - **Queries** (`is_*`) wait for an element to become visible and answer `Ok(true)`, or
//!   `Ok(false)` once the timeout expires. Absence is a legitimate answer, never an error. Only
//!   driver failures that waiting cannot fix (such as a lost session) come back as `Err`.
//! - **Actions** (`enter_*`, `click_*`) wait for their target to become usable and fail with an
//!   [`Error::Timeout`](crate::error::Error::Timeout) if it never does, since the action cannot
//!   have happened.
//!
//! No call relies on state left behind by an earlier one; each re-waits for the element it
//! needs.

use crate::driver::Driver;
use crate::error::{Result, TimeoutKind};
use crate::wait::{Presence, Wait, WaitPolicy};
use crate::wd::Locator;
use url::Url;

mod dashboard;
mod fare_history;
mod login;

pub use self::dashboard::{DashboardLayout, DashboardPage};
pub use self::fare_history::{FareHistoryLayout, FareHistoryPage};
pub use self::login::{LoginLayout, LoginPage};

/// The driver handle and wait policy shared by every page adapter.
///
/// The driver is borrowed: its lifetime belongs to whoever opened the browser session.
#[derive(Debug)]
pub struct PageContext<'a, D: ?Sized> {
    driver: &'a D,
    policy: WaitPolicy,
}

impl<'a, D: ?Sized> Clone for PageContext<'a, D> {
    fn clone(&self) -> Self {
        Self {
            driver: self.driver,
            policy: self.policy,
        }
    }
}

impl<'a, D> PageContext<'a, D>
where
    D: Driver + ?Sized,
{
    /// Bind `driver` and `policy`.
    pub fn new(driver: &'a D, policy: WaitPolicy) -> Self {
        Self { driver, policy }
    }

    /// The driver this page talks to.
    pub fn driver(&self) -> &'a D {
        self.driver
    }

    /// The policy every wait on this page uses.
    pub fn policy(&self) -> WaitPolicy {
        self.policy
    }

    /// A fresh wait against the live page.
    pub fn wait(&self) -> Wait<'a, D> {
        Wait::new(self.driver, self.policy)
    }

    /// The URL the browser currently shows.
    pub async fn current_url(&self) -> Result<Url> {
        Ok(self.driver.current_url().await?)
    }

    /// What became of `locator` within the timeout.
    pub async fn presence(&self, locator: &Locator) -> Result<Presence> {
        self.wait().presence(locator).await
    }

    /// Whether `locator` became visible within the timeout.
    pub async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        Ok(self.presence(locator).await?.is_visible())
    }

    /// Wait for the field at `locator` to become visible, clear it and type `text` into it.
    pub async fn fill(&self, locator: &Locator, text: &str) -> Result<()> {
        let field = self
            .wait()
            .for_visible(locator, TimeoutKind::Precondition)
            .await?;
        self.driver.clear(&field).await?;
        self.driver.send_keys(&field, text).await?;
        tracing::debug!(%locator, "filled");
        Ok(())
    }

    /// Wait for the element at `locator` to become clickable, and click it.
    pub async fn click(&self, locator: &Locator) -> Result<()> {
        let target = self
            .wait()
            .for_clickable(locator, TimeoutKind::Precondition)
            .await?;
        self.driver.click(&target).await?;
        tracing::debug!(%locator, "clicked");
        Ok(())
    }

    /// Click `locator`, then wait for the browser to land on a URL containing `fragment`.
    pub async fn click_and_expect_url(&self, locator: &Locator, fragment: &str) -> Result<Url> {
        self.click(locator).await?;
        self.wait()
            .for_url_containing(fragment, TimeoutKind::Postcondition)
            .await
    }
}

/// The shape every page adapter shares.
///
/// A page is built from a driver, a wait policy and a layout describing where its elements live.
/// Layouts default to the MyShuttle markup and can be replaced from configuration.
pub trait Page<'a, D>: Sized
where
    D: Driver + ?Sized,
{
    /// Where the page's elements live.
    type Layout: Clone + Default;

    /// A short human readable name, used in logs.
    const NAME: &'static str;

    /// Bind the page to `driver`, with an explicit layout.
    fn with_layout(driver: &'a D, policy: WaitPolicy, layout: Self::Layout) -> Self;

    /// The driver and wait policy of this page.
    fn context(&self) -> &PageContext<'a, D>;

    /// The layout this page was built with.
    fn layout(&self) -> &Self::Layout;

    /// Bind the page to `driver` using the default layout.
    fn new(driver: &'a D, policy: WaitPolicy) -> Self {
        Self::with_layout(driver, policy, Self::Layout::default())
    }
}
