//! Page adapters for verifying the MyShuttle web UI through WebDriver.
//!
//! This crate drives a conforming browser through [`fantoccini`] and exposes the three pages of
//! the MyShuttle employee portal as named, self-synchronizing operations: the login form, the
//! dashboard, and the fare history. Every interaction goes through a polling [`Wait`], so callers
//! never sleep or retry on their own.
//!
//! Adapters answer questions (`is_*`) with `Ok(true)` or `Ok(false)`, and perform actions
//! (`enter_*`, `click_*`) that fail with [`Error::Timeout`] when the element they need never
//! becomes usable. See [`pages`] for the details.
//!
//! # Examples
//!
//! These examples assume a [WebDriver compatible] process is listening on port 4444, and that a
//! MyShuttle deployment is reachable at the configured `base_url`.
//!
//! ```no_run
//! use shuttle_pages::pages::{DashboardPage, LoginPage, Page};
//! use shuttle_pages::{Config, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), shuttle_pages::Error> {
//!     let config = Config::load(None)?;
//!     let policy = config.wait_policy();
//!     Session::run(&config, |c| async move {
//!         let login = LoginPage::new(&c, policy);
//!         login.login("fred", "fredpassword").await?;
//!         assert!(login.is_login_successful().await?);
//!
//!         let dashboard = DashboardPage::new(&c, policy);
//!         dashboard.click_sign_out().await?;
//!         Ok::<_, shuttle_pages::Error>(())
//!     })
//!     .await
//! }
//! ```
//!
//! Page locators can be overridden from `shuttle.toml` or `SHUTTLE_*` environment variables; see
//! [`Config`].
//!
//! Tests do not need a browser at all. With the `test_helpers` feature, [`testing::FakeDriver`]
//! implements [`Driver`] in memory, with element render delays measured on tokio's clock.
//!
//! [WebDriver compatible]: https://github.com/Fyrd/caniuse/issues/2757#issuecomment-304529217
#![deny(missing_docs)]
#![warn(missing_debug_implementations, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod common;
pub mod config;
pub mod driver;
pub mod error;
pub mod pages;
pub mod scenarios;
pub mod session;
pub mod wait;
pub mod wd;

#[cfg(any(test, feature = "test_helpers"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test_helpers")))]
pub mod testing;

pub use crate::config::Config;
pub use crate::driver::Driver;
pub use crate::error::{Error, Result};
pub use crate::session::{Closeable, Session};
pub use crate::wait::{Presence, Wait, WaitPolicy};
pub use crate::wd::{Locator, Strategy};
