//! WebDriver capability presets.

use crate::config::Browser;
use serde_json::map;

/// Makes capabilities for the given browser.
pub fn make_capabilities(browser: Browser, headless: bool) -> map::Map<String, serde_json::Value> {
    let mut caps = serde_json::map::Map::new();
    match browser {
        Browser::Firefox => {
            let args: &[&str] = if headless { &["--headless"] } else { &[] };
            caps.insert(
                "moz:firefoxOptions".to_string(),
                serde_json::json!({ "args": args }),
            );
        }
        Browser::Chrome => {
            let mut args = vec!["--disable-dev-shm-usage", "--start-maximized"];
            if headless {
                args.extend(["--headless", "--disable-gpu", "--no-sandbox"]);
            }
            caps.insert(
                "goog:chromeOptions".to_string(),
                serde_json::json!({ "args": args }),
            );
        }
    }
    caps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_chrome_gets_sandbox_flags() {
        let caps = make_capabilities(Browser::Chrome, true);
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless"));
        assert!(args.iter().any(|a| a == "--no-sandbox"));
    }

    #[test]
    fn windowed_firefox_has_no_args() {
        let caps = make_capabilities(Browser::Firefox, false);
        assert_eq!(
            caps["moz:firefoxOptions"]["args"],
            serde_json::json!([])
        );
        assert!(!caps.contains_key("goog:chromeOptions"));
    }
}
