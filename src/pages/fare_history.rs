use super::{Page, PageContext};
use crate::driver::Driver;
use crate::error::Result;
use crate::wait::WaitPolicy;
use crate::wd::Locator;
use serde::{Deserialize, Serialize};

/// Where the fare history page keeps its elements.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FareHistoryLayout {
    /// The MyShuttle logo at the top of the page.
    pub title_logo: Locator,
    /// The heading under the logo.
    pub subtitle: Locator,
    /// The body of the fares table.
    pub fares_table: Locator,
}

impl Default for FareHistoryLayout {
    fn default() -> Self {
        Self {
            title_logo: Locator::xpath("/html/body/div/section/div/div[1]/div/img"),
            subtitle: Locator::xpath("/html/body/div/section/div/div[1]/h2"),
            fares_table: Locator::xpath("/html/body/div/section/div/div[2]/div/table/tbody"),
        }
    }
}

/// The MyShuttle fare history page.
#[derive(Debug)]
pub struct FareHistoryPage<'a, D: ?Sized> {
    cx: PageContext<'a, D>,
    layout: FareHistoryLayout,
}

impl<'a, D> Page<'a, D> for FareHistoryPage<'a, D>
where
    D: Driver + ?Sized,
{
    type Layout = FareHistoryLayout;
    const NAME: &'static str = "fare history";

    fn with_layout(driver: &'a D, policy: WaitPolicy, layout: FareHistoryLayout) -> Self {
        Self {
            cx: PageContext::new(driver, policy),
            layout,
        }
    }

    fn context(&self) -> &PageContext<'a, D> {
        &self.cx
    }

    fn layout(&self) -> &FareHistoryLayout {
        &self.layout
    }
}

impl<'a, D> FareHistoryPage<'a, D>
where
    D: Driver + ?Sized,
{
    /// Whether the title logo is shown.
    pub async fn is_title_logo_displayed(&self) -> Result<bool> {
        self.cx.is_visible(&self.layout.title_logo).await
    }

    /// Whether the subtitle is shown.
    pub async fn is_subtitle_displayed(&self) -> Result<bool> {
        self.cx.is_visible(&self.layout.subtitle).await
    }

    /// Whether the table of past fares is shown.
    pub async fn is_table_of_fares_displayed(&self) -> Result<bool> {
        self.cx.is_visible(&self.layout.fares_table).await
    }
}
