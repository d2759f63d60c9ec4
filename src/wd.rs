//! Element locator types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a [`Locator`] addresses an element.
///
/// See [the WebDriver specification][1] for the strategies a driver understands natively.
/// `Name` and `ClassName` are lowered to CSS selectors before they reach the driver.
///
/// [1]: https://www.w3.org/TR/webdriver1/#locator-strategies
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Match the element whose `name` attribute equals the value.
    Name,

    /// Match the element selected by the given [XPath expression][1].
    ///
    /// [1]: https://developer.mozilla.org/en-US/docs/Web/XPath
    #[serde(rename = "xpath")]
    XPath,

    /// Match a link element whose text equals the value exactly.
    LinkText,

    /// Match an element carrying the given CSS class.
    ClassName,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::XPath => write!(f, "xpath"),
            Self::LinkText => write!(f, "link text"),
            Self::ClassName => write!(f, "class name"),
        }
    }
}

/// A declarative reference to one element of a rendered page.
///
/// Locators are pure data: they say nothing about whether the element exists, and are only
/// interpreted when handed to a [`Driver`](crate::Driver).
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    value: String,
}

impl Locator {
    /// Build a locator from a strategy and its value.
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Match by `name` attribute.
    pub fn name(value: impl Into<String>) -> Self {
        Self::new(Strategy::Name, value)
    }

    /// Match by XPath expression.
    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, value)
    }

    /// Match a link by its exact text.
    pub fn link_text(value: impl Into<String>) -> Self {
        Self::new(Strategy::LinkText, value)
    }

    /// Match by CSS class.
    pub fn class_name(value: impl Into<String>) -> Self {
        Self::new(Strategy::ClassName, value)
    }

    /// The strategy used by this locator.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The raw value interpreted according to [`Locator::strategy`].
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The CSS selector this locator lowers to, if its strategy has no native WebDriver form.
    pub(crate) fn css(&self) -> Option<String> {
        match self.strategy {
            Strategy::Name => Some(format!("[name={}]", css_string(&self.value))),
            Strategy::ClassName => Some(format!(".{}", css_ident(&self.value))),
            Strategy::XPath | Strategy::LinkText => None,
        }
    }
}

/// Serialize `value` as a CSS identifier, following the CSSOM escaping rules.
///
/// Whitespace is escaped like any other character, so a compound class name such as `"a b"`
/// selects nothing rather than producing an invalid selector.
fn css_ident(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let first_is_dash = value.starts_with('-');
    for (i, c) in value.chars().enumerate() {
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => out.push_str(&format!("\\{:x} ", c as u32)),
            '0'..='9' if i == 0 || (i == 1 && first_is_dash) => {
                out.push_str(&format!("\\{:x} ", c as u32))
            }
            '-' if i == 0 && value.len() == 1 => out.push_str("\\-"),
            c if c >= '\u{80}' || c == '-' || c == '_' || c.is_ascii_alphanumeric() => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

/// Serialize `value` as a double-quoted CSS string.
fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => out.push_str(&format!("\\{:x} ", c as u32)),
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.strategy, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_class_lower_to_css() {
        assert_eq!(
            Locator::name("email").css().as_deref(),
            Some("[name=\"email\"]")
        );
        assert_eq!(
            Locator::class_name("jumbotron").css().as_deref(),
            Some(".jumbotron")
        );
        assert_eq!(Locator::xpath("//h2").css(), None);
        assert_eq!(Locator::link_text("Sign Out").css(), None);
    }

    #[test]
    fn name_quotes_are_escaped() {
        assert_eq!(
            Locator::name("a\"b").css().as_deref(),
            Some("[name=\"a\\\"b\"]")
        );
    }

    #[test]
    fn name_backslashes_are_escaped() {
        assert_eq!(
            Locator::name("a\\b").css().as_deref(),
            Some("[name=\"a\\\\b\"]")
        );
    }

    #[test]
    fn awkward_class_names_stay_valid_selectors() {
        let css = |v: &str| Locator::class_name(v).css().unwrap();
        assert_eq!(css("2col"), ".\\32 col");
        assert_eq!(css("-2col"), ".-\\32 col");
        assert_eq!(css("nav bar"), ".nav\\ bar");
        assert_eq!(css("sm:hidden"), ".sm\\:hidden");
        assert_eq!(css("-"), ".\\-");
        assert_eq!(css("jumbo_tron-2"), ".jumbo_tron-2");
    }

    #[test]
    fn deserializes_from_config_shape() {
        let l: Locator =
            serde_json::from_str(r#"{ "strategy": "xpath", "value": "/html/body" }"#).unwrap();
        assert_eq!(l, Locator::xpath("/html/body"));
        let l: Locator =
            serde_json::from_str(r#"{ "strategy": "link_text", "value": "Sign Out" }"#).unwrap();
        assert_eq!(l.strategy(), Strategy::LinkText);
    }

    #[test]
    fn display_names_strategy_and_value() {
        assert_eq!(Locator::name("email").to_string(), "name `email`");
        assert_eq!(
            Locator::link_text("Sign Out").to_string(),
            "link text `Sign Out`"
        );
    }
}
