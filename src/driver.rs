//! The browser capability page adapters are written against.

use crate::error::DriverError;
use crate::wd::{Locator, Strategy};
use async_trait::async_trait;
use url::Url;

/// The primitive browser operations a page adapter needs.
///
/// Every method maps onto a single WebDriver command. Implementations must not retry or wait on
/// their own; synchronization with the page is the job of [`Wait`](crate::wait::Wait).
///
/// The trait is implemented for [`fantoccini::Client`], and for
/// [`FakeDriver`](crate::testing::FakeDriver) when the `test_helpers` feature is enabled.
#[async_trait]
pub trait Driver: Send + Sync {
    /// A handle to an element found on the current page.
    type Element: Send + Sync;

    /// Navigate directly to the given URL.
    async fn goto(&self, url: &str) -> Result<(), DriverError>;

    /// Retrieve the URL of the page currently loaded.
    async fn current_url(&self) -> Result<Url, DriverError>;

    /// Find the first element matching `locator`.
    ///
    /// Fails with [`DriverError::NoSuchElement`] if nothing matches right now.
    async fn find(&self, locator: &Locator) -> Result<Self::Element, DriverError>;

    /// Whether the element is rendered visibly.
    async fn is_displayed(&self, element: &Self::Element) -> Result<bool, DriverError>;

    /// Whether the element accepts interaction.
    async fn is_enabled(&self, element: &Self::Element) -> Result<bool, DriverError>;

    /// Click the element.
    async fn click(&self, element: &Self::Element) -> Result<(), DriverError>;

    /// Clear the contents of an editable element.
    async fn clear(&self, element: &Self::Element) -> Result<(), DriverError>;

    /// Type `text` into the element.
    async fn send_keys(&self, element: &Self::Element, text: &str) -> Result<(), DriverError>;
}

#[async_trait]
impl Driver for fantoccini::Client {
    type Element = fantoccini::elements::Element;

    async fn goto(&self, url: &str) -> Result<(), DriverError> {
        fantoccini::Client::goto(self, url).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<Url, DriverError> {
        Ok(fantoccini::Client::current_url(self).await?)
    }

    async fn find(&self, locator: &Locator) -> Result<Self::Element, DriverError> {
        let css = locator.css();
        let search = match (locator.strategy(), css.as_deref()) {
            (_, Some(css)) => fantoccini::Locator::Css(css),
            (Strategy::XPath, None) => fantoccini::Locator::XPath(locator.value()),
            (_, None) => fantoccini::Locator::LinkText(locator.value()),
        };
        match fantoccini::Client::find(self, search).await {
            Ok(e) => Ok(e),
            // keep the locator in the message; the driver's own text rarely names it
            Err(e) if e.is_no_such_element() => {
                Err(DriverError::NoSuchElement(locator.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn is_displayed(&self, element: &Self::Element) -> Result<bool, DriverError> {
        Ok(element.is_displayed().await?)
    }

    async fn is_enabled(&self, element: &Self::Element) -> Result<bool, DriverError> {
        Ok(element.is_enabled().await?)
    }

    async fn click(&self, element: &Self::Element) -> Result<(), DriverError> {
        element.click().await?;
        Ok(())
    }

    async fn clear(&self, element: &Self::Element) -> Result<(), DriverError> {
        element.clear().await?;
        Ok(())
    }

    async fn send_keys(&self, element: &Self::Element, text: &str) -> Result<(), DriverError> {
        element.send_keys(text).await?;
        Ok(())
    }
}
