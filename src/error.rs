//! Error types.

use std::time::Duration;
use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error reported by a [`Driver`](crate::Driver) while executing a single command.
#[derive(Debug, Error)]
pub enum DriverError {
    /// No element was found matching the given locator.
    #[error("no element found matching {0}")]
    NoSuchElement(String),

    /// The element was found earlier but is no longer attached to the page.
    ///
    /// This happens when the page navigates or re-renders between finding an element and using
    /// it.
    #[error("stale element reference: {0}")]
    StaleElement(String),

    /// The element exists but cannot currently receive the interaction.
    #[error("element not interactable: {0}")]
    NotInteractable(String),

    /// The browser session or window is gone.
    #[error("browser session lost: {0}")]
    Session(String),

    /// Any other failure of the underlying driver.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl DriverError {
    /// Returns true if this error only means "the element is not usable yet".
    ///
    /// Waits treat such errors as an unmet condition and keep polling; every other error aborts
    /// the wait.
    pub fn is_miss(&self) -> bool {
        matches!(
            self,
            DriverError::NoSuchElement(..)
                | DriverError::StaleElement(..)
                | DriverError::NotInteractable(..)
        )
    }
}

impl From<fantoccini::error::CmdError> for DriverError {
    fn from(e: fantoccini::error::CmdError) -> Self {
        use fantoccini::error::{CmdError, ErrorStatus};

        let message = match e {
            CmdError::Standard(ref wd) => wd.message.to_string(),
            ref other => other.to_string(),
        };
        if e.is_no_such_element() {
            DriverError::NoSuchElement(message)
        } else if e.is_stale_element_reference() {
            DriverError::StaleElement(message)
        } else if e.is_element_not_interactable()
            || matches!(e, CmdError::Standard(ref wd) if wd.error == ErrorStatus::ElementClickIntercepted)
        {
            DriverError::NotInteractable(message)
        } else if e.is_invalid_session_id()
            || e.is_no_such_window()
            || matches!(e, CmdError::Lost(..))
        {
            DriverError::Session(message)
        } else {
            DriverError::Other(Box::new(e))
        }
    }
}

/// Which side of an action a timed-out wait was guarding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimeoutKind {
    /// The target of an action never became usable, so the action did not happen.
    Precondition,
    /// The action happened but its expected effect never showed up.
    Postcondition,
}

impl std::fmt::Display for TimeoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeoutKind::Precondition => write!(f, "precondition"),
            TimeoutKind::Postcondition => write!(f, "postcondition"),
        }
    }
}

/// Errors surfaced by page adapters and the session harness.
#[derive(Debug, Error)]
pub enum Error {
    /// The driver failed in a way that waiting cannot fix.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// A wait expired before its condition held.
    #[error("{kind} timed out after {timeout:?}: {condition}")]
    Timeout {
        /// What was being waited for.
        condition: String,
        /// The timeout that expired.
        timeout: Duration,
        /// Whether the wait guarded the start or the effect of an action.
        kind: TimeoutKind,
    },

    /// A WebDriver session could not be created.
    #[error("could not start browser session: {0}")]
    NewSession(String),

    /// Configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// A configured path does not resolve to a URL.
    #[error("cannot resolve `{path}` to a url: {source}")]
    InvalidUrl {
        /// The path as configured.
        path: String,
        /// Why it did not resolve.
        #[source]
        source: url::ParseError,
    },
}

impl Error {
    /// Returns true if this error is an expired wait.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// The kind of wait that expired, if this is a timeout.
    pub fn timeout_kind(&self) -> Option<TimeoutKind> {
        match self {
            Error::Timeout { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<fantoccini::error::NewSessionError> for Error {
    fn from(e: fantoccini::error::NewSessionError) -> Self {
        Error::NewSession(e.to_string())
    }
}

impl From<figment::Error> for Error {
    fn from(e: figment::Error) -> Self {
        Error::Config(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn misses_are_retryable() {
        assert!(DriverError::NoSuchElement("x".into()).is_miss());
        assert!(DriverError::StaleElement("x".into()).is_miss());
        assert!(DriverError::NotInteractable("x".into()).is_miss());
        assert!(!DriverError::Session("gone".into()).is_miss());
    }

    #[test]
    fn timeout_display_names_kind_and_condition() {
        let e = Error::Timeout {
            condition: "name `email` to be visible".into(),
            timeout: Duration::from_secs(10),
            kind: TimeoutKind::Precondition,
        };
        assert!(e.is_timeout());
        assert_eq!(e.timeout_kind(), Some(TimeoutKind::Precondition));
        assert_eq!(
            e.to_string(),
            "precondition timed out after 10s: name `email` to be visible"
        );
    }

    fn webdriver(status: fantoccini::error::ErrorStatus) -> fantoccini::error::CmdError {
        fantoccini::error::CmdError::Standard(fantoccini::error::WebDriver::new(
            status,
            "from the browser",
        ))
    }

    #[test]
    fn webdriver_codes_map_onto_driver_errors() {
        use fantoccini::error::ErrorStatus;

        let e = DriverError::from(webdriver(ErrorStatus::NoSuchElement));
        assert!(matches!(e, DriverError::NoSuchElement(ref m) if m == "from the browser"));
        assert!(matches!(
            DriverError::from(webdriver(ErrorStatus::StaleElementReference)),
            DriverError::StaleElement(..)
        ));
        assert!(matches!(
            DriverError::from(webdriver(ErrorStatus::ElementNotInteractable)),
            DriverError::NotInteractable(..)
        ));
        assert!(matches!(
            DriverError::from(webdriver(ErrorStatus::ElementClickIntercepted)),
            DriverError::NotInteractable(..)
        ));
        assert!(matches!(
            DriverError::from(webdriver(ErrorStatus::InvalidSessionId)),
            DriverError::Session(..)
        ));
        assert!(matches!(
            DriverError::from(webdriver(ErrorStatus::NoSuchWindow)),
            DriverError::Session(..)
        ));
        assert!(!DriverError::from(webdriver(ErrorStatus::UnknownError)).is_miss());
    }

    #[test]
    fn lost_connection_is_a_lost_session() {
        let lost = fantoccini::error::CmdError::Lost(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "webdriver went away",
        ));
        let e = DriverError::from(lost);
        assert!(matches!(e, DriverError::Session(..)));
        assert!(!e.is_miss());
    }

    #[test]
    fn driver_errors_are_not_timeouts() {
        let e = Error::from(DriverError::Session("closed".into()));
        assert!(!e.is_timeout());
        assert_eq!(e.timeout_kind(), None);
        println!("{}", e);
    }
}
