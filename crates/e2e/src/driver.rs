//! Automation driver - a thin capability layer over a WebDriver session
//!
//! Wraps `fantoccini::Client` behind the handful of operations the scenario
//! needs: navigate, locate, read text/attributes, click, type, wait, and
//! capture a screenshot. Fixed sleeps are deliberately absent; callers wait
//! on observed state with a bounded timeout instead.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::error::{E2eError, E2eResult};

/// An element selector, kept as an owned value so the scenario can build
/// indexed selectors at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Css(String),
    Id(String),
    XPath(String),
}

impl Target {
    fn locator(&self) -> Locator<'_> {
        match self {
            Target::Css(s) => Locator::Css(s),
            Target::Id(s) => Locator::Id(s),
            Target::XPath(s) => Locator::XPath(s),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Css(s) => write!(f, "css:{}", s),
            Target::Id(s) => write!(f, "id:{}", s),
            Target::XPath(s) => write!(f, "xpath:{}", s),
        }
    }
}

/// Configuration for the WebDriver session
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// WebDriver endpoint (chromedriver / geckodriver / Selenium hub)
    pub webdriver_url: String,

    /// Run the browser without a visible window
    pub headless: bool,

    /// Upper bound for every wait operation
    pub wait_timeout: Duration,

    /// Interval between state probes while waiting
    pub poll_interval: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            headless: true,
            wait_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Chrome capabilities for the session
fn chrome_caps(headless: bool) -> serde_json::Map<String, serde_json::Value> {
    let mut args: Vec<String> = vec!["--disable-gpu".to_string()];
    if headless {
        args.push("--headless=new".to_string());
    }

    let mut caps = serde_json::Map::new();
    caps.insert(
        "goog:chromeOptions".to_string(),
        serde_json::json!({ "args": args }),
    );
    caps
}

/// Handle to a live browser session
pub struct Driver {
    client: Client,
    wait_timeout: Duration,
    poll_interval: Duration,
}

impl Driver {
    /// Open a WebDriver session against the configured endpoint
    pub async fn connect(config: DriverConfig) -> E2eResult<Self> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(chrome_caps(config.headless));

        let client = builder.connect(&config.webdriver_url).await?;
        info!(url = %config.webdriver_url, "WebDriver session established");

        Ok(Self {
            client,
            wait_timeout: config.wait_timeout,
            poll_interval: config.poll_interval,
        })
    }

    /// Navigate to an absolute URL
    pub async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!(url, "navigating");
        self.client.goto(url).await?;
        Ok(())
    }

    /// Maximize the browser window
    pub async fn maximize(&self) -> E2eResult<()> {
        self.client.maximize_window().await?;
        Ok(())
    }

    /// Block until the element is located, or fail after the wait timeout
    pub async fn wait_for(&self, target: &Target) -> E2eResult<()> {
        self.client
            .wait()
            .at_most(self.wait_timeout)
            .every(self.poll_interval)
            .for_element(target.locator())
            .await
            .map(|_| ())
            .map_err(|e| match e {
                CmdError::WaitTimeout => E2eError::ElementNotFound {
                    selector: target.to_string(),
                    timeout_ms: self.wait_timeout.as_millis() as u64,
                },
                other => other.into(),
            })
    }

    /// Whether the element is rendered visible
    pub async fn is_displayed(&self, target: &Target) -> E2eResult<bool> {
        let elem = self.client.find(target.locator()).await?;
        Ok(elem.is_displayed().await?)
    }

    /// Read the text content of an element
    pub async fn text(&self, target: &Target) -> E2eResult<String> {
        let elem = self.client.find(target.locator()).await?;
        Ok(elem.text().await?)
    }

    /// Read an attribute of an element; missing attributes are an error
    pub async fn attribute(&self, target: &Target, name: &str) -> E2eResult<String> {
        let elem = self.client.find(target.locator()).await?;
        elem.attr(name)
            .await?
            .ok_or_else(|| E2eError::MissingAttribute {
                selector: target.to_string(),
                name: name.to_string(),
            })
    }

    /// Click an element
    pub async fn click(&self, target: &Target) -> E2eResult<()> {
        debug!(%target, "click");
        let elem = self.client.find(target.locator()).await?;
        elem.click().await?;
        Ok(())
    }

    /// Type text into an element
    pub async fn send_keys(&self, target: &Target, text: &str) -> E2eResult<()> {
        debug!(%target, text, "send keys");
        let elem = self.client.find(target.locator()).await?;
        elem.send_keys(text).await?;
        Ok(())
    }

    /// Poll an attribute until it matches the expected value.
    ///
    /// Replaces fixed post-action sleeps: the UI may re-render
    /// asynchronously, so we wait on the observed state with a bounded
    /// timeout. Only lookup misses are tolerated during the poll (the
    /// element may not be attached yet); any other driver failure, such as
    /// a dead session, propagates immediately.
    pub async fn wait_for_attribute(
        &self,
        target: &Target,
        name: &str,
        expected: &str,
    ) -> E2eResult<()> {
        let deadline = Instant::now() + self.wait_timeout;
        let mut last_seen: Option<String> = None;

        loop {
            match self.attribute(target, name).await {
                Ok(actual) if actual == expected => return Ok(()),
                Ok(actual) => last_seen = Some(actual),
                Err(e) if is_lookup_miss(&e) => {}
                Err(e) => return Err(e),
            }

            if Instant::now() >= deadline {
                return Err(E2eError::mismatch(
                    format!("{} of {}", name, target),
                    expected,
                    last_seen.unwrap_or_else(|| "<element not located>".to_string()),
                ));
            }

            sleep(self.poll_interval).await;
        }
    }

    /// Capture a full-page screenshot and write it as PNG
    pub async fn screenshot_to(&self, path: &Path) -> E2eResult<PathBuf> {
        let png = self.client.screenshot().await?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &png)?;

        info!(path = %path.display(), "screenshot captured");
        Ok(path.to_path_buf())
    }

    /// Close the session, releasing the browser and all driver resources
    pub async fn quit(self) -> E2eResult<()> {
        self.client.close().await?;
        Ok(())
    }
}

/// Whether the error means "element not there yet", which a bounded poll
/// may keep waiting through
fn is_lookup_miss(err: &E2eError) -> bool {
    match err {
        E2eError::MissingAttribute { .. } => true,
        E2eError::Driver(e) => e.is_no_such_element(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DriverConfig::default();
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert!(config.headless);
        assert!(config.wait_timeout > config.poll_interval);
    }

    #[test]
    fn test_target_display() {
        assert_eq!(Target::Css("h2".into()).to_string(), "css:h2");
        assert_eq!(Target::Id("addbutton".into()).to_string(), "id:addbutton");
        assert_eq!(
            Target::XPath("//span".into()).to_string(),
            "xpath://span"
        );
    }

    #[test]
    fn test_chrome_caps_headless() {
        let caps = chrome_caps(true);
        let opts = caps.get("goog:chromeOptions").unwrap();
        let args = opts.get("args").unwrap().as_array().unwrap();
        assert!(args.iter().any(|a| a == "--headless=new"));
    }

    #[test]
    fn test_chrome_caps_headed() {
        let caps = chrome_caps(false);
        let opts = caps.get("goog:chromeOptions").unwrap();
        let args = opts.get("args").unwrap().as_array().unwrap();
        assert!(!args.iter().any(|a| a == "--headless=new"));
    }

    #[test]
    fn test_missing_attribute_is_a_lookup_miss() {
        let err = E2eError::MissingAttribute {
            selector: "xpath://span".to_string(),
            name: "class".to_string(),
        };
        assert!(is_lookup_miss(&err));
    }

    #[test]
    fn test_other_driver_failures_are_not_lookup_misses() {
        // A dead session must propagate instead of burning the poll timeout.
        assert!(!is_lookup_miss(&E2eError::Driver(CmdError::WaitTimeout)));
        assert!(!is_lookup_miss(&E2eError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "session gone",
        ))));
    }
}
