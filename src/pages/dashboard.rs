use super::{Page, PageContext};
use crate::driver::Driver;
use crate::error::Result;
use crate::wait::WaitPolicy;
use crate::wd::Locator;
use serde::{Deserialize, Serialize};

/// Where the dashboard keeps its elements.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardLayout {
    /// The dashboard title.
    pub header: Locator,
    /// The "Access Your Fare History" link.
    pub fare_history_link: Locator,
    /// The "Sign Out" link.
    pub sign_out_link: Locator,
}

impl Default for DashboardLayout {
    fn default() -> Self {
        Self {
            header: Locator::xpath("/html/body/div/section/div/div[1]/h2"),
            fare_history_link: Locator::link_text("Access Your Fare History"),
            sign_out_link: Locator::link_text("Sign Out"),
        }
    }
}

/// The MyShuttle employee dashboard.
#[derive(Debug)]
pub struct DashboardPage<'a, D: ?Sized> {
    cx: PageContext<'a, D>,
    layout: DashboardLayout,
}

impl<'a, D> Page<'a, D> for DashboardPage<'a, D>
where
    D: Driver + ?Sized,
{
    type Layout = DashboardLayout;
    const NAME: &'static str = "dashboard";

    fn with_layout(driver: &'a D, policy: WaitPolicy, layout: DashboardLayout) -> Self {
        Self {
            cx: PageContext::new(driver, policy),
            layout,
        }
    }

    fn context(&self) -> &PageContext<'a, D> {
        &self.cx
    }

    fn layout(&self) -> &DashboardLayout {
        &self.layout
    }
}

impl<'a, D> DashboardPage<'a, D>
where
    D: Driver + ?Sized,
{
    /// Whether the dashboard title is shown.
    pub async fn is_dashboard_displayed(&self) -> Result<bool> {
        self.cx.is_visible(&self.layout.header).await
    }

    /// Follow the fare history link.
    ///
    /// Does not wait for the fare history page; assert on the resulting page or URL instead.
    pub async fn click_access_fare_history(&self) -> Result<()> {
        self.cx.click(&self.layout.fare_history_link).await
    }

    /// Follow the sign out link.
    pub async fn click_sign_out(&self) -> Result<()> {
        self.cx.click(&self.layout.sign_out_link).await
    }
}
