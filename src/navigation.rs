//! Navigation hand-off to an external maps application
//!
//! Native platforms get a maps deep link. When the platform has none, or the
//! OS says it cannot open it, the Google Maps directions page is used instead.

use crate::destination::Coordinate;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Platform whose URL handlers receive the navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    /// Anything without a native maps scheme
    Web,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::Web => "web",
        }
    }

    /// Platform of the machine we are running on
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else {
            Platform::Web
        }
    }

    /// Deep-link scheme of the native maps app
    pub fn maps_scheme(&self) -> Option<&'static str> {
        match self {
            Platform::Ios => Some("maps:"),
            Platform::Android => Some("google.navigation:"),
            Platform::Web => None,
        }
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ios" | "iphone" | "apple" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            "web" | "browser" | "desktop" => Ok(Platform::Web),
            _ => Err(Error::Navigation(format!("unknown platform: {}", s))),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The OS-level URL opener
pub trait UrlDispatcher {
    /// Whether some installed handler accepts `url`
    fn can_open(&self, url: &str) -> Result<bool>;

    fn open(&self, url: &str) -> Result<()>;
}

/// Native navigation deep link, if the platform has one
pub fn native_url(platform: Platform, to: Coordinate) -> Option<String> {
    platform
        .maps_scheme()
        .map(|scheme| format!("{}q={},{}", scheme, to.latitude, to.longitude))
}

/// Directions page in the browser
pub fn browser_url(to: Coordinate) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        to.latitude, to.longitude
    )
}

/// Open turn-by-turn navigation to `to` and return the URL that was opened.
///
/// Dispatcher failures are reported as [`Error::Navigation`].
pub fn launch<D: UrlDispatcher + ?Sized>(
    dispatcher: &D,
    platform: Platform,
    to: Coordinate,
) -> Result<String> {
    let url = match native_url(platform, to) {
        Some(native) => {
            if dispatcher.can_open(&native).map_err(navigation_error)? {
                native
            } else {
                tracing::debug!(url = %native, "native maps link not supported, using browser");
                browser_url(to)
            }
        }
        None => browser_url(to),
    };

    dispatcher.open(&url).map_err(navigation_error)?;
    tracing::info!(%url, %platform, "opened navigation");
    Ok(url)
}

fn navigation_error(e: Error) -> Error {
    match e {
        Error::Navigation(_) => e,
        other => Error::Navigation(other.to_string()),
    }
}

/// Dispatcher that hands URLs to the desktop opener
/// (`open`, `xdg-open` or `start`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl UrlDispatcher for SystemOpener {
    fn can_open(&self, url: &str) -> Result<bool> {
        // Desktop openers only reliably handle web links
        Ok(url.starts_with("https://") || url.starts_with("http://"))
    }

    fn open(&self, url: &str) -> Result<()> {
        #[cfg(target_os = "macos")]
        let status = std::process::Command::new("open").arg(url).status()?;

        #[cfg(windows)]
        let status = std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .status()?;

        #[cfg(not(any(target_os = "macos", windows)))]
        let status = std::process::Command::new("xdg-open").arg(url).status()?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Navigation(format!("opener exited with {}", status)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeDispatcher {
        supports_native: bool,
        fail_open: bool,
        opened: RefCell<Vec<String>>,
    }

    impl FakeDispatcher {
        fn new(supports_native: bool) -> Self {
            Self {
                supports_native,
                fail_open: false,
                opened: RefCell::new(Vec::new()),
            }
        }
    }

    impl UrlDispatcher for FakeDispatcher {
        fn can_open(&self, url: &str) -> Result<bool> {
            Ok(self.supports_native || url.starts_with("https://"))
        }

        fn open(&self, url: &str) -> Result<()> {
            if self.fail_open {
                return Err(Error::Io(std::io::Error::other("no handler")));
            }
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    const LOGAN: Coordinate = Coordinate {
        latitude: 42.3656,
        longitude: -71.0096,
    };

    #[test]
    fn test_native_urls() {
        assert_eq!(native_url(Platform::Ios, LOGAN).unwrap(), "maps:q=42.3656,-71.0096");
        assert_eq!(
            native_url(Platform::Android, LOGAN).unwrap(),
            "google.navigation:q=42.3656,-71.0096"
        );
        assert!(native_url(Platform::Web, LOGAN).is_none());
    }

    #[test]
    fn test_browser_url() {
        assert_eq!(
            browser_url(LOGAN),
            "https://www.google.com/maps/dir/?api=1&destination=42.3656,-71.0096"
        );
    }

    #[test]
    fn test_launch_prefers_native_link() {
        let dispatcher = FakeDispatcher::new(true);
        let url = launch(&dispatcher, Platform::Android, LOGAN).unwrap();

        assert_eq!(url, "google.navigation:q=42.3656,-71.0096");
        assert_eq!(dispatcher.opened.borrow().as_slice(), [url]);
    }

    #[test]
    fn test_launch_falls_back_to_browser() {
        let dispatcher = FakeDispatcher::new(false);
        let url = launch(&dispatcher, Platform::Ios, LOGAN).unwrap();
        assert_eq!(url, browser_url(LOGAN));

        let url = launch(&dispatcher, Platform::Web, LOGAN).unwrap();
        assert_eq!(url, browser_url(LOGAN));
        assert_eq!(dispatcher.opened.borrow().len(), 2);
    }

    #[test]
    fn test_open_failure_is_navigation_error() {
        let mut dispatcher = FakeDispatcher::new(true);
        dispatcher.fail_open = true;

        let err = launch(&dispatcher, Platform::Ios, LOGAN).unwrap_err();
        assert!(matches!(err, Error::Navigation(_)));
    }

    #[test]
    fn test_platform_parse() {
        assert_eq!("iOS".parse::<Platform>().unwrap(), Platform::Ios);
        assert_eq!("browser".parse::<Platform>().unwrap(), Platform::Web);
        assert!("symbian".parse::<Platform>().is_err());
    }
}
