//! Layered configuration.
//!
//! Values are merged in this order, later sources winning:
//!
//! 1. built-in defaults, which describe the MyShuttle dev deployment;
//! 2. a TOML file (`shuttle.toml` in the working directory unless a path is given);
//! 3. environment variables prefixed with `SHUTTLE_`, nested keys separated by `__`
//!    (`SHUTTLE_CREDENTIALS__PASSWORD`, `SHUTTLE_PAGES__LOGIN__SUBMITTED_PATH`).

use crate::error::{Error, Result};
use crate::pages::{DashboardLayout, FareHistoryLayout, LoginLayout};
use crate::wait::WaitPolicy;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

const DEFAULT_CONFIG_FILE: &str = "shuttle.toml";
const ENV_PREFIX: &str = "SHUTTLE_";

/// The browser a session drives.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    /// Firefox through geckodriver.
    Firefox,
    /// Chrome or Chromium through chromedriver.
    #[default]
    Chrome,
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Browser::Firefox => write!(f, "firefox"),
            Browser::Chrome => write!(f, "chrome"),
        }
    }
}

/// The account scenarios log in with.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Employee email (MyShuttle accepts a bare user name here).
    pub email: String,
    /// Employee password.
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: "fred".to_string(),
            password: "fredpassword".to_string(),
        }
    }
}

/// URL paths, relative to [`Config::base_url`], that scenarios check against.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    /// Where the fare history lives.
    pub fare_history: String,
    /// Fragment of the URL shown after signing out.
    pub signed_out: String,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            fare_history: "home.jsp".to_string(),
            signed_out: "/login".to_string(),
        }
    }
}

/// Element layouts of every page.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layouts {
    /// The login page.
    pub login: LoginLayout,
    /// The dashboard.
    pub dashboard: DashboardLayout,
    /// The fare history page.
    pub fare_history: FareHistoryLayout,
}

/// Everything needed to point the page adapters at a deployment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the application; sessions start here.
    pub base_url: Url,
    /// The WebDriver server to open sessions on.
    pub webdriver_url: Url,
    /// Which browser to ask the WebDriver server for.
    pub browser: Browser,
    /// Run the browser without a window.
    pub headless: bool,
    /// How long any single wait may take, in seconds.
    pub timeout_secs: u64,
    /// How often waits re-check the page, in milliseconds.
    pub poll_interval_ms: u64,
    /// The account to log in with.
    pub credentials: Credentials,
    /// Paths scenarios navigate to or expect.
    pub paths: Paths,
    /// Where each page keeps its elements.
    pub pages: Layouts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://192.168.0.102:8080/myshuttledev/")
                .expect("default base url is valid"),
            webdriver_url: Url::parse("http://localhost:4444")
                .expect("default webdriver url is valid"),
            browser: Browser::default(),
            headless: false,
            timeout_secs: 10,
            poll_interval_ms: 500,
            credentials: Credentials::default(),
            paths: Paths::default(),
            pages: Layouts::default(),
        }
    }
}

impl Config {
    /// The provider stack [`Config::load`] extracts from.
    ///
    /// A config file that does not exist contributes nothing.
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration from defaults, the config file and the environment.
    ///
    /// Unlike the default `shuttle.toml`, an explicitly given `path` must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path.filter(|p| !p.exists()) {
            let e = figment::Error::from(format!("config file {} not found", path.display()));
            return Err(e.into());
        }
        let config: Config = Self::figment(path).extract()?;
        tracing::debug!(base_url = %config.base_url, browser = %config.browser, "configuration loaded");
        Ok(config)
    }

    /// The wait policy every page adapter should use.
    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy::new(Duration::from_secs(self.timeout_secs))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
    }

    /// Resolve `path` against [`Config::base_url`].
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|source| Error::InvalidUrl {
                path: path.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wd::Locator;
    use figment::Jail;

    #[test]
    fn defaults_describe_dev_deployment() {
        let c = Config::default();
        assert_eq!(c.credentials.email, "fred");
        assert_eq!(c.pages.login.email, Locator::name("email"));
        assert_eq!(c.wait_policy(), WaitPolicy::default());
        assert_eq!(
            c.url(&c.paths.fare_history).unwrap().as_str(),
            "http://192.168.0.102:8080/myshuttledev/home.jsp"
        );
    }

    #[test]
    fn file_then_env_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "shuttle.toml",
                r#"
                base_url = "http://shuttle.test/app/"
                browser = "firefox"
                timeout_secs = 3

                [pages.dashboard.sign_out_link]
                strategy = "xpath"
                value = "//a[@id='logout']"
                "#,
            )?;
            jail.set_env("SHUTTLE_TIMEOUT_SECS", "5");
            jail.set_env("SHUTTLE_CREDENTIALS__PASSWORD", "hunter2");

            let c: Config = Config::figment(None).extract()?;
            assert_eq!(c.base_url.as_str(), "http://shuttle.test/app/");
            assert_eq!(c.browser, Browser::Firefox);
            assert_eq!(c.timeout_secs, 5);
            assert_eq!(c.credentials.email, "fred");
            assert_eq!(c.credentials.password, "hunter2");
            assert_eq!(
                c.pages.dashboard.sign_out_link,
                Locator::xpath("//a[@id='logout']")
            );
            // untouched siblings keep their defaults
            assert_eq!(
                c.pages.dashboard.fare_history_link,
                Locator::link_text("Access Your Fare History")
            );
            Ok(())
        });
    }

    #[test]
    fn unresolvable_path_is_a_configuration_error() {
        let c = Config {
            base_url: Url::parse("mailto:ops@shuttle.test").unwrap(),
            ..Config::default()
        };
        let e = c.url("home.jsp").unwrap_err();
        assert!(matches!(e, Error::InvalidUrl { ref path, .. } if path == "home.jsp"), "{:?}", e);
        assert!(e.to_string().contains("home.jsp"), "{}", e);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        Jail::expect_with(|_| {
            let e = Config::load(Some(Path::new("nope.toml"))).unwrap_err();
            assert!(e.to_string().contains("nope.toml"), "{}", e);
            assert!(Config::load(None).is_ok());
            Ok(())
        });
    }
}
