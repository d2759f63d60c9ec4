//! Opening and closing browser sessions.

use crate::config::Config;
use crate::error::{DriverError, Error, Result};
use async_trait::async_trait;
use fantoccini::Client;
use futures_util::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// A handle to a browser session that can be shut down.
///
/// Handles are cheap clones of one session; closing through any clone ends it for all of them.
#[async_trait]
pub trait Closeable: Send + Sync {
    /// End the session and release the browser.
    async fn close_session(&self) -> std::result::Result<(), DriverError>;
}

#[async_trait]
impl Closeable for Client {
    async fn close_session(&self) -> std::result::Result<(), DriverError> {
        Client::close(self.clone()).await?;
        Ok(())
    }
}

#[async_trait]
impl<C> Closeable for Arc<C>
where
    C: Closeable + ?Sized,
{
    async fn close_session(&self) -> std::result::Result<(), DriverError> {
        (**self).close_session().await
    }
}

/// A browser session on the configured WebDriver server.
///
/// The session owns the browser; page adapters only borrow the [`Client`].
#[derive(Debug)]
pub struct Session;

impl Session {
    /// Open a browser, maximize it and load [`Config::base_url`].
    ///
    /// If any step after the session is created fails, the browser is closed before the error is
    /// returned.
    pub async fn connect(config: &Config) -> Result<Client> {
        let client = Self::new_client(config).await?;
        let setup = async {
            client.maximize_window().await?;
            client.goto(config.base_url.as_str()).await?;
            Ok::<_, fantoccini::error::CmdError>(())
        };
        if let Err(e) = setup.await {
            if let Err(close) = client.close().await {
                tracing::warn!(error = %close, "failed to close browser after setup error");
            }
            return Err(Error::from(crate::error::DriverError::from(e)));
        }
        tracing::info!(browser = %config.browser, url = %config.base_url, "session started");
        Ok(client)
    }

    #[cfg(feature = "native-tls")]
    async fn new_client(config: &Config) -> Result<Client> {
        let caps = crate::common::make_capabilities(config.browser, config.headless);
        let client = fantoccini::ClientBuilder::native()
            .capabilities(caps)
            .connect(config.webdriver_url.as_str())
            .await?;
        Ok(client)
    }

    #[cfg(not(feature = "native-tls"))]
    async fn new_client(_config: &Config) -> Result<Client> {
        Err(Error::NewSession(
            "built without a TLS backend; enable the `native-tls` feature".to_string(),
        ))
    }

    /// Run `f` against a fresh session, then close the browser.
    ///
    /// See [`Session::scope`] for how the browser is released.
    pub async fn run<F, Fut, T>(config: &Config, f: F) -> Result<T>
    where
        F: FnOnce(Client) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let client = Self::connect(config).await?;
        Self::scope(client, f).await
    }

    /// Run `f` against `handle`, then close the session behind it.
    ///
    /// The session is closed whether `f` succeeds, fails or panics; a panic is resumed once the
    /// session is gone. A failure to close is logged, and never replaces the result of `f`.
    pub async fn scope<C, F, Fut, T>(handle: C, f: F) -> Result<T>
    where
        C: Closeable + Clone,
        F: FnOnce(C) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let body = handle.clone();
        let outcome = AssertUnwindSafe(async move { f(body).await })
            .catch_unwind()
            .await;
        if let Err(e) = handle.close_session().await {
            tracing::warn!(error = %e, "failed to close browser session");
        }
        match outcome {
            Ok(r) => r,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}
