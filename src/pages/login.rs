use super::{Page, PageContext};
use crate::driver::Driver;
use crate::error::{Error, Result};
use crate::wait::WaitPolicy;
use crate::wd::Locator;
use serde::{Deserialize, Serialize};

/// Where the login page keeps its elements.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginLayout {
    /// The employee email field.
    pub email: Locator,
    /// The password field.
    pub password: Locator,
    /// The "Log In" button.
    pub submit: Locator,
    /// The banner shown when credentials are rejected.
    pub error: Locator,
    /// An element that only the dashboard shows.
    pub dashboard_header: Locator,
    /// Where the form posts to, relative to the page showing the form.
    pub submitted_path: String,
}

impl Default for LoginLayout {
    fn default() -> Self {
        Self {
            email: Locator::name("email"),
            password: Locator::name("password"),
            submit: Locator::xpath("/html/body/div/section/div/div/div[2]/form/div[2]/input"),
            error: Locator::class_name("jumbotron"),
            dashboard_header: Locator::xpath("/html/body/div/section/div/div[1]/h2"),
            submitted_path: "login".to_string(),
        }
    }
}

/// The MyShuttle login page.
#[derive(Debug)]
pub struct LoginPage<'a, D: ?Sized> {
    cx: PageContext<'a, D>,
    layout: LoginLayout,
}

impl<'a, D> Page<'a, D> for LoginPage<'a, D>
where
    D: Driver + ?Sized,
{
    type Layout = LoginLayout;
    const NAME: &'static str = "login";

    fn with_layout(driver: &'a D, policy: WaitPolicy, layout: LoginLayout) -> Self {
        Self {
            cx: PageContext::new(driver, policy),
            layout,
        }
    }

    fn context(&self) -> &PageContext<'a, D> {
        &self.cx
    }

    fn layout(&self) -> &LoginLayout {
        &self.layout
    }
}

impl<'a, D> LoginPage<'a, D>
where
    D: Driver + ?Sized,
{
    /// Type `email` into the email field, replacing whatever it held.
    ///
    /// Fails with a precondition timeout if the field never becomes visible.
    pub async fn enter_email(&self, email: &str) -> Result<()> {
        self.cx.fill(&self.layout.email, email).await
    }

    /// Type `password` into the password field, replacing whatever it held.
    ///
    /// Fails with a precondition timeout if the field never becomes visible.
    pub async fn enter_password(&self, password: &str) -> Result<()> {
        self.cx.fill(&self.layout.password, password).await
    }

    /// Submit the form and wait for the browser to reach the post-submit URL.
    ///
    /// The post-submit URL is the same whether or not the credentials were accepted, so this
    /// only proves the form was submitted. Use [`LoginPage::is_login_successful`] or
    /// [`LoginPage::is_error_displayed`] to learn the outcome.
    ///
    /// [`LoginLayout::submitted_path`] is resolved against the URL shown before the click, and
    /// the wait matches on the path of the result. A browser already on that path (after
    /// signing out, say) satisfies the wait without navigating.
    ///
    /// Fails with a precondition timeout if the button never becomes clickable, and with a
    /// postcondition timeout if the navigation never happens.
    pub async fn click_login(&self) -> Result<()> {
        let path = &self.layout.submitted_path;
        let target = self
            .cx
            .current_url()
            .await?
            .join(path)
            .map_err(|source| Error::InvalidUrl {
                path: path.clone(),
                source,
            })?;
        self.cx
            .click_and_expect_url(&self.layout.submit, target.path())
            .await?;
        Ok(())
    }

    /// Whether the credentials-rejected banner is shown.
    pub async fn is_error_displayed(&self) -> Result<bool> {
        self.cx.is_visible(&self.layout.error).await
    }

    /// Whether the dashboard appeared.
    pub async fn is_login_successful(&self) -> Result<bool> {
        self.cx.is_visible(&self.layout.dashboard_header).await
    }

    /// Fill in both fields and submit.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        tracing::info!(page = Self::NAME, %email, "logging in");
        self.enter_email(email).await?;
        self.enter_password(password).await?;
        self.click_login().await
    }
}
