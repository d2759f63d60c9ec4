//! Tests against a real MyShuttle deployment and WebDriver server.
//!
//! These are ignored by default. Point `shuttle.toml` or `SHUTTLE_BASE_URL` and
//! `SHUTTLE_WEBDRIVER_URL` at a running deployment and run `cargo test -- --ignored`.

use fantoccini::Client;
use serial_test::serial;
use shuttle_pages::pages::{DashboardPage, FareHistoryPage, LoginPage, Page};
use shuttle_pages::scenarios::Scenario;
use shuttle_pages::{Config, Driver, Result};

mod common;

async fn login_and_sign_out(c: Client, config: &Config) -> Result<()> {
    let login = LoginPage::with_layout(&c, config.wait_policy(), config.pages.login.clone());
    login
        .login(&config.credentials.email, &config.credentials.password)
        .await?;
    assert!(login.is_login_successful().await?);

    let dashboard = DashboardPage::with_layout(
        &c,
        config.wait_policy(),
        config.pages.dashboard.clone(),
    );
    dashboard.click_sign_out().await?;
    let url = Driver::current_url(&c).await?;
    assert!(url.as_str().contains(&config.paths.signed_out), "{}", url);
    Ok(())
}

async fn fare_history(c: Client, config: &Config) -> Result<()> {
    let url = config.url(&config.paths.fare_history)?;
    Driver::goto(&c, url.as_str()).await?;
    let page = FareHistoryPage::new(&c, config.wait_policy());
    assert!(page.is_title_logo_displayed().await?);
    assert!(page.is_subtitle_displayed().await?);
    assert!(page.is_table_of_fares_displayed().await?);
    Ok(())
}

async fn rejected_login(c: Client, config: &Config) -> Result<()> {
    let outcome = Scenario::LoginInvalid.run(&c, config).await?;
    assert!(outcome.passed, "{}", outcome);
    Ok(())
}

#[tokio::test]
#[serial]
#[ignore]
async fn live_login_and_sign_out() {
    live_tester!(login_and_sign_out)
}

#[tokio::test]
#[serial]
#[ignore]
async fn live_fare_history() {
    live_tester!(fare_history)
}

#[tokio::test]
#[serial]
#[ignore]
async fn live_rejected_login() {
    live_tester!(rejected_login)
}
