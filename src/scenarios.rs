//! The MyShuttle smoke suite.
//!
//! Every scenario expects a browser freshly pointed at [`Config::base_url`], drives the page
//! adapters, and reports an [`Outcome`]. A failed check is an `Ok` outcome with `passed` unset;
//! `Err` is reserved for scenarios that could not run to the end, such as a login form that never
//! rendered or a lost session.

use crate::config::Config;
use crate::driver::Driver;
use crate::error::{Result, TimeoutKind};
use crate::pages::{DashboardPage, FareHistoryPage, LoginPage, Page};
use std::fmt;

/// The result of one scenario.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Outcome {
    /// The scenario that ran.
    pub name: &'static str,
    /// Whether its check held.
    pub passed: bool,
    /// What was observed.
    pub detail: String,
}

impl Outcome {
    fn check(scenario: Scenario, passed: bool, detail: impl Into<String>) -> Self {
        Outcome {
            name: scenario.name(),
            passed,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.passed { "ok" } else { "FAILED" };
        write!(f, "{} ... {} ({})", self.name, verdict, self.detail)
    }
}

/// A set of scenarios exercising one page.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum Group {
    /// The login form.
    Login,
    /// The dashboard shown after logging in.
    Dashboard,
    /// The fare history page.
    FareHistory,
}

/// One smoke scenario.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[allow(missing_docs)]
pub enum Scenario {
    LoginValid,
    LoginInvalid,
    LoginEmpty,
    LoginOnlyEmail,
    LoginOnlyPassword,
    DashboardDisplayed,
    AccessFareHistory,
    SignOut,
    FareHistoryDisplayed,
}

impl Scenario {
    /// Every scenario, in the order the suite runs them.
    pub const ALL: [Scenario; 9] = [
        Scenario::LoginValid,
        Scenario::LoginInvalid,
        Scenario::LoginEmpty,
        Scenario::LoginOnlyEmail,
        Scenario::LoginOnlyPassword,
        Scenario::DashboardDisplayed,
        Scenario::AccessFareHistory,
        Scenario::SignOut,
        Scenario::FareHistoryDisplayed,
    ];

    /// The scenarios of `group`, or all of them.
    pub fn select(group: Option<Group>) -> impl Iterator<Item = Scenario> {
        Self::ALL
            .into_iter()
            .filter(move |s| group.map_or(true, |g| s.group() == g))
    }

    /// The name outcomes are reported under.
    pub fn name(self) -> &'static str {
        match self {
            Scenario::LoginValid => "login_with_valid_credentials",
            Scenario::LoginInvalid => "login_with_invalid_credentials",
            Scenario::LoginEmpty => "login_with_empty_fields",
            Scenario::LoginOnlyEmail => "login_with_only_email",
            Scenario::LoginOnlyPassword => "login_with_only_password",
            Scenario::DashboardDisplayed => "dashboard_is_displayed",
            Scenario::AccessFareHistory => "access_fare_history",
            Scenario::SignOut => "sign_out",
            Scenario::FareHistoryDisplayed => "fare_history_is_displayed",
        }
    }

    /// The page this scenario exercises.
    pub fn group(self) -> Group {
        match self {
            Scenario::LoginValid
            | Scenario::LoginInvalid
            | Scenario::LoginEmpty
            | Scenario::LoginOnlyEmail
            | Scenario::LoginOnlyPassword => Group::Login,
            Scenario::DashboardDisplayed | Scenario::AccessFareHistory | Scenario::SignOut => {
                Group::Dashboard
            }
            Scenario::FareHistoryDisplayed => Group::FareHistory,
        }
    }

    /// Run this scenario against `driver`.
    pub async fn run<D>(self, driver: &D, config: &Config) -> Result<Outcome>
    where
        D: Driver + ?Sized,
    {
        tracing::debug!(scenario = self.name(), "running");
        let outcome = match self {
            Scenario::LoginValid => login_with_valid_credentials(driver, config).await?,
            Scenario::LoginInvalid => login_with_invalid_credentials(driver, config).await?,
            Scenario::LoginEmpty => login_with_empty_fields(driver, config).await?,
            Scenario::LoginOnlyEmail => login_with_only_email(driver, config).await?,
            Scenario::LoginOnlyPassword => login_with_only_password(driver, config).await?,
            Scenario::DashboardDisplayed => dashboard_is_displayed(driver, config).await?,
            Scenario::AccessFareHistory => access_fare_history(driver, config).await?,
            Scenario::SignOut => sign_out(driver, config).await?,
            Scenario::FareHistoryDisplayed => fare_history_is_displayed(driver, config).await?,
        };
        if outcome.passed {
            tracing::info!(scenario = outcome.name, detail = %outcome.detail, "passed");
        } else {
            tracing::warn!(scenario = outcome.name, detail = %outcome.detail, "failed");
        }
        Ok(outcome)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Log in through the login page with the given credentials.
///
/// Returns the login page so callers can ask how the attempt went.
pub async fn login_as<'a, D>(
    driver: &'a D,
    config: &Config,
    email: &str,
    password: &str,
) -> Result<LoginPage<'a, D>>
where
    D: Driver + ?Sized,
{
    let page = LoginPage::with_layout(driver, config.wait_policy(), config.pages.login.clone());
    page.login(email, password).await?;
    Ok(page)
}

async fn login_with_configured_account<'a, D>(
    driver: &'a D,
    config: &Config,
) -> Result<LoginPage<'a, D>>
where
    D: Driver + ?Sized,
{
    let c = &config.credentials;
    login_as(driver, config, &c.email, &c.password).await
}

fn dashboard<'a, D>(driver: &'a D, config: &Config) -> DashboardPage<'a, D>
where
    D: Driver + ?Sized,
{
    DashboardPage::with_layout(
        driver,
        config.wait_policy(),
        config.pages.dashboard.clone(),
    )
}

/// The configured account reaches the dashboard.
pub async fn login_with_valid_credentials<D>(driver: &D, config: &Config) -> Result<Outcome>
where
    D: Driver + ?Sized,
{
    let page = login_with_configured_account(driver, config).await?;
    let ok = page.is_login_successful().await?;
    let detail = if ok {
        "dashboard shown"
    } else {
        "dashboard never appeared"
    };
    Ok(Outcome::check(Scenario::LoginValid, ok, detail))
}

async fn rejected_login<D>(
    scenario: Scenario,
    driver: &D,
    config: &Config,
    email: &str,
    password: &str,
) -> Result<Outcome>
where
    D: Driver + ?Sized,
{
    let page = login_as(driver, config, email, password).await?;
    let ok = page.is_error_displayed().await?;
    let detail = if ok {
        "credentials rejected"
    } else {
        "no error shown"
    };
    Ok(Outcome::check(scenario, ok, detail))
}

/// Made-up credentials are rejected.
pub async fn login_with_invalid_credentials<D>(driver: &D, config: &Config) -> Result<Outcome>
where
    D: Driver + ?Sized,
{
    rejected_login(
        Scenario::LoginInvalid,
        driver,
        config,
        "invalidUser",
        "wrongPassword",
    )
    .await
}

/// Submitting an empty form is rejected.
pub async fn login_with_empty_fields<D>(driver: &D, config: &Config) -> Result<Outcome>
where
    D: Driver + ?Sized,
{
    rejected_login(Scenario::LoginEmpty, driver, config, "", "").await
}

/// An email without a password is rejected.
pub async fn login_with_only_email<D>(driver: &D, config: &Config) -> Result<Outcome>
where
    D: Driver + ?Sized,
{
    let email = &config.credentials.email;
    rejected_login(Scenario::LoginOnlyEmail, driver, config, email, "").await
}

/// A password without an email is rejected.
pub async fn login_with_only_password<D>(driver: &D, config: &Config) -> Result<Outcome>
where
    D: Driver + ?Sized,
{
    rejected_login(Scenario::LoginOnlyPassword, driver, config, "", "password123").await
}

/// The dashboard shows after logging in.
pub async fn dashboard_is_displayed<D>(driver: &D, config: &Config) -> Result<Outcome>
where
    D: Driver + ?Sized,
{
    login_with_configured_account(driver, config).await?;
    let ok = dashboard(driver, config).is_dashboard_displayed().await?;
    let detail = if ok {
        "dashboard header visible"
    } else {
        "dashboard header not visible"
    };
    Ok(Outcome::check(Scenario::DashboardDisplayed, ok, detail))
}

/// The fare history link lands exactly on the fare history URL.
pub async fn access_fare_history<D>(driver: &D, config: &Config) -> Result<Outcome>
where
    D: Driver + ?Sized,
{
    login_with_configured_account(driver, config).await?;
    let page = dashboard(driver, config);
    page.click_access_fare_history().await?;

    let expected = config.url(&config.paths.fare_history)?;
    let landed = page
        .context()
        .wait()
        .for_url_containing(&config.paths.fare_history, TimeoutKind::Postcondition)
        .await;
    let outcome = match landed {
        Ok(url) if url == expected => Outcome::check(
            Scenario::AccessFareHistory,
            true,
            format!("landed on {}", url),
        ),
        Ok(url) => Outcome::check(
            Scenario::AccessFareHistory,
            false,
            format!("expected {}, landed on {}", expected, url),
        ),
        Err(e) if e.is_timeout() => {
            Outcome::check(Scenario::AccessFareHistory, false, e.to_string())
        }
        Err(e) => return Err(e),
    };
    Ok(outcome)
}

/// Signing out lands on a login URL.
pub async fn sign_out<D>(driver: &D, config: &Config) -> Result<Outcome>
where
    D: Driver + ?Sized,
{
    login_with_configured_account(driver, config).await?;
    let page = dashboard(driver, config);
    page.click_sign_out().await?;

    let landed = page
        .context()
        .wait()
        .for_url_containing(&config.paths.signed_out, TimeoutKind::Postcondition)
        .await;
    let outcome = match landed {
        Ok(url) => Outcome::check(Scenario::SignOut, true, format!("landed on {}", url)),
        Err(e) if e.is_timeout() => Outcome::check(Scenario::SignOut, false, e.to_string()),
        Err(e) => return Err(e),
    };
    Ok(outcome)
}

/// Loading the fare history URL shows the logo, the subtitle and the fares table.
pub async fn fare_history_is_displayed<D>(driver: &D, config: &Config) -> Result<Outcome>
where
    D: Driver + ?Sized,
{
    let url = config.url(&config.paths.fare_history)?;
    driver.goto(url.as_str()).await?;

    let page = FareHistoryPage::with_layout(
        driver,
        config.wait_policy(),
        config.pages.fare_history.clone(),
    );
    let mut missing = Vec::new();
    if !page.is_title_logo_displayed().await? {
        missing.push("title logo");
    }
    if !page.is_subtitle_displayed().await? {
        missing.push("subtitle");
    }
    if !page.is_table_of_fares_displayed().await? {
        missing.push("table of fares");
    }
    let outcome = if missing.is_empty() {
        Outcome::check(Scenario::FareHistoryDisplayed, true, "all sections shown")
    } else {
        Outcome::check(
            Scenario::FareHistoryDisplayed,
            false,
            format!("missing: {}", missing.join(", ")),
        )
    };
    Ok(outcome)
}
