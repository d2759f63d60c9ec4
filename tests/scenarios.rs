use shuttle_pages::error::TimeoutKind;
use shuttle_pages::scenarios::{self, Group, Scenario};
use shuttle_pages::testing::shuttle_site;
use shuttle_pages::Locator;

mod common;

#[tokio::test(start_paused = true)]
async fn whole_suite_passes_against_a_healthy_site() {
    for scenario in Scenario::ALL {
        let (config, site) = common::site();
        let outcome = scenario.run(&site, &config).await.unwrap();
        assert!(outcome.passed, "{}", outcome);
        assert_eq!(outcome.name, scenario.name());
    }
}

#[test]
fn groups_partition_the_suite() {
    assert_eq!(Scenario::select(Some(Group::Login)).count(), 5);
    assert_eq!(Scenario::select(Some(Group::Dashboard)).count(), 3);
    assert_eq!(
        Scenario::select(Some(Group::FareHistory)).collect::<Vec<_>>(),
        vec![Scenario::FareHistoryDisplayed]
    );
    assert_eq!(Scenario::select(None).count(), Scenario::ALL.len());
}

#[tokio::test(start_paused = true)]
async fn rejected_account_fails_login_checks() {
    let (mut config, site) = common::site();
    config.credentials.password = "not-freds".to_string();

    let outcome = scenarios::login_with_valid_credentials(&site, &config)
        .await
        .unwrap();
    assert!(!outcome.passed);
    assert_eq!(outcome.detail, "dashboard never appeared");
}

#[tokio::test(start_paused = true)]
async fn unusable_dashboard_aborts_the_scenario() {
    let (mut config, site) = common::site();
    config.credentials.password = "not-freds".to_string();

    let err = scenarios::access_fare_history(&site, &config)
        .await
        .unwrap_err();
    assert_eq!(err.timeout_kind(), Some(TimeoutKind::Precondition));
}

#[tokio::test(start_paused = true)]
async fn missing_table_is_reported_by_name() {
    let config = common::config();
    let site = shuttle_site(&config);

    let mut expecting = config.clone();
    expecting.pages.fare_history.fares_table = Locator::xpath("//table[@id='fares']");
    let outcome = scenarios::fare_history_is_displayed(&site, &expecting)
        .await
        .unwrap();
    assert!(!outcome.passed);
    assert_eq!(outcome.detail, "missing: table of fares");
}

#[tokio::test(start_paused = true)]
async fn login_as_returns_the_page_it_used() {
    let (config, site) = common::site();
    let page = scenarios::login_as(&site, &config, "fred", "fredpassword")
        .await
        .unwrap();
    assert!(page.is_login_successful().await.unwrap());
}
