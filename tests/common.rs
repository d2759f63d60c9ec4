#![allow(dead_code)]

use shuttle_pages::testing::{shuttle_site, FakeDriver};
use shuttle_pages::{Config, WaitPolicy};
use std::time::Duration;
use url::Url;

pub const BASE_URL: &str = "http://shuttle.test/myshuttledev/";

/// The default configuration, pointed at the fake site.
pub fn config() -> Config {
    Config {
        base_url: Url::parse(BASE_URL).unwrap(),
        ..Config::default()
    }
}

/// A fresh fake MyShuttle site showing its login page, and the config it was built from.
pub fn site() -> (Config, FakeDriver) {
    let config = config();
    let site = shuttle_site(&config);
    (config, site)
}

/// A policy short enough to keep boundary arithmetic readable.
pub fn policy(timeout_ms: u64, poll_ms: u64) -> WaitPolicy {
    WaitPolicy::new(Duration::from_millis(timeout_ms))
        .with_poll_interval(Duration::from_millis(poll_ms))
}

/// Configuration for the live suite.
///
/// Reads `shuttle.toml` and `SHUTTLE_*` like the smoke binary does, but defaults to a headless
/// browser unless `SHUTTLE_HEADLESS` says otherwise.
pub fn live_config() -> Config {
    let mut config = Config::load(None).expect("live tests need a loadable configuration");
    if std::env::var_os("SHUTTLE_HEADLESS").is_none() {
        config.headless = true;
    }
    config
}

#[macro_export]
macro_rules! live_tester {
    // Ident should identify an async fn that takes a Client and a Config.
    ($f:ident) => {{
        let config = common::live_config();
        let config = &config;
        let res = shuttle_pages::Session::run(config, |c| async move { $f(c, config).await }).await;
        if let Err(e) = res {
            panic!("live test failed: {}", e);
        }
    }};
}
