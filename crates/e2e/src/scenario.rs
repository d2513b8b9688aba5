//! Scenario runner for the sample to-do application
//!
//! Drives a fixed check sequence: verify the initial page, toggle each of
//! the five pre-seeded items to done while checking the remaining counter
//! and per-item status class, then append one new item and repeat the
//! toggle-and-verify sequence for it. A small in-memory model of the list
//! is kept alongside and mirrored against the rendered state after every
//! action.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::driver::{Driver, DriverConfig, Target};
use crate::error::{E2eError, E2eResult};
use crate::report::{ScenarioReport, StepOutcome};

/// The application under test
pub const APP_URL: &str = "https://lambdatest.github.io/sample-todo-app/";

/// Items pre-seeded by the application
pub const INITIAL_ITEMS: u32 = 5;

/// Text entered for the appended item
pub const NEW_ITEM_TEXT: &str = "New Item";

/// Fixed filename for the failure screenshot
pub const SCREENSHOT_NAME: &str = "screenshot_error.png";

const DONE_FALSE: &str = "done-false";
const DONE_TRUE: &str = "done-true";

fn page_title() -> Target {
    Target::Css("h2".to_string())
}

fn remaining_label() -> Target {
    Target::XPath("//span[@class='ng-binding']".to_string())
}

fn item_toggle(index: u32) -> Target {
    Target::Css(format!("input[name='li{}']", index))
}

fn item_status(index: u32) -> Target {
    Target::XPath(format!(
        "//input[@name='li{}']/following-sibling::span",
        index
    ))
}

fn todo_input() -> Target {
    Target::Id("sampletodotext".to_string())
}

fn add_button() -> Target {
    Target::Id("addbutton".to_string())
}

/// In-memory mirror of the list state.
///
/// `remaining` only ever moves down by one per toggle and up by one per
/// append; there is no transition back from done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListModel {
    total: u32,
    remaining: u32,
}

impl ListModel {
    pub fn new(initial: u32) -> Self {
        Self {
            total: initial,
            remaining: initial,
        }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Mark one item done. Returns the new `remaining`, or `None` if every
    /// item is already done.
    pub fn toggle_done(&mut self) -> Option<u32> {
        self.remaining = self.remaining.checked_sub(1)?;
        Some(self.remaining)
    }

    /// Append one not-done item. Returns the new item's 1-based index.
    pub fn append(&mut self) -> u32 {
        self.total += 1;
        self.remaining += 1;
        self.total
    }

    /// The label text the application must render for this state
    pub fn expected_label(&self) -> String {
        format!("{} of {} remaining", self.remaining, self.total)
    }
}

/// Configuration for one scenario run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// URL of the to-do application
    pub app_url: String,

    /// WebDriver session settings
    pub driver: DriverConfig,

    /// Directory for the report and failure screenshot
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            app_url: APP_URL.to_string(),
            driver: DriverConfig::default(),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

/// Executes the ordered check sequence against a live driver session
pub struct Scenario {
    app_url: String,
    model: ListModel,
    outcomes: Vec<StepOutcome>,
}

impl Scenario {
    pub fn new(app_url: String) -> Self {
        Self {
            app_url,
            model: ListModel::new(INITIAL_ITEMS),
            outcomes: Vec::new(),
        }
    }

    /// Current model state
    pub fn model(&self) -> &ListModel {
        &self.model
    }

    /// Consume the scenario, yielding the recorded phase outcomes
    pub fn into_outcomes(self) -> Vec<StepOutcome> {
        self.outcomes
    }

    /// Run the full sequence. The first failed check aborts the rest.
    pub async fn run(&mut self, driver: &Driver) -> E2eResult<()> {
        let started = Instant::now();
        let res = self.open_app(driver).await;
        self.record("open app", started, &res);
        res?;

        for index in 1..=INITIAL_ITEMS {
            let name = format!("toggle item {}", index);
            let started = Instant::now();
            let res = self.toggle_and_verify(driver, index).await;
            self.record(&name, started, &res);
            res?;
        }

        let started = Instant::now();
        let res = self.append_and_verify(driver).await;
        self.record("append and toggle new item", started, &res);
        res
    }

    fn record(&mut self, name: &str, started: Instant, res: &E2eResult<()>) {
        self.outcomes.push(StepOutcome {
            name: name.to_string(),
            passed: res.is_ok(),
            duration_ms: started.elapsed().as_millis() as u64,
            detail: res.as_ref().err().map(|e| e.to_string()),
        });
    }

    /// Navigate to the app and confirm the page title is rendered
    async fn open_app(&mut self, driver: &Driver) -> E2eResult<()> {
        driver.goto(&self.app_url).await?;
        driver.maximize().await?;

        driver.wait_for(&page_title()).await?;
        if !driver.is_displayed(&page_title()).await? {
            return Err(E2eError::mismatch(
                "page title visibility",
                "displayed",
                "hidden",
            ));
        }

        info!(url = %self.app_url, "application loaded");
        Ok(())
    }

    /// Verify item `index` is not done, toggle it, verify it became done
    /// and the remaining counter dropped by exactly one.
    async fn toggle_and_verify(&mut self, driver: &Driver, index: u32) -> E2eResult<()> {
        self.verify_label(driver).await?;
        self.verify_item_class(driver, index, DONE_FALSE).await?;

        let before = self.model.remaining();

        driver.click(&item_toggle(index)).await?;
        self.model.toggle_done().ok_or_else(|| {
            E2eError::mismatch(
                format!("model remaining before toggling item {}", index),
                "at least 1",
                "0",
            )
        })?;

        driver
            .wait_for_attribute(&item_status(index), "class", DONE_TRUE)
            .await?;
        self.verify_label(driver).await?;
        self.verify_count(
            &format!("remaining after toggling item {}", index),
            self.model.remaining(),
            before - 1,
        )?;

        debug!(index, remaining = self.model.remaining(), "item marked done");
        Ok(())
    }

    /// Append the new item, verify both counters grew by one, toggle it and
    /// verify remaining returned to its pre-append value.
    async fn append_and_verify(&mut self, driver: &Driver) -> E2eResult<()> {
        let before_total = self.model.total();
        let before_remaining = self.model.remaining();

        driver.send_keys(&todo_input(), NEW_ITEM_TEXT).await?;
        driver.click(&add_button()).await?;
        let new_index = self.model.append();

        driver
            .wait_for_attribute(&item_status(new_index), "class", DONE_FALSE)
            .await?;
        self.verify_label(driver).await?;
        self.verify_count("total after append", self.model.total(), before_total + 1)?;
        self.verify_count(
            "remaining after append",
            self.model.remaining(),
            before_remaining + 1,
        )?;

        driver.click(&item_toggle(new_index)).await?;
        self.model.toggle_done().ok_or_else(|| {
            E2eError::mismatch("model remaining before toggling new item", "at least 1", "0")
        })?;

        driver
            .wait_for_attribute(&item_status(new_index), "class", DONE_TRUE)
            .await?;
        self.verify_label(driver).await?;
        self.verify_count(
            "remaining after toggling new item",
            self.model.remaining(),
            before_remaining,
        )?;

        info!(index = new_index, "new item appended and marked done");
        Ok(())
    }

    /// The rendered remaining/total label must match the model exactly.
    /// Read twice: observation must not disturb the observed state.
    async fn verify_label(&self, driver: &Driver) -> E2eResult<()> {
        let first = driver.text(&remaining_label()).await?;
        let second = driver.text(&remaining_label()).await?;
        verify_stable("remaining label re-read", &first, &second)?;

        let expected = self.model.expected_label();
        if second != expected {
            return Err(E2eError::mismatch("remaining label", expected, second));
        }
        Ok(())
    }

    async fn verify_item_class(
        &self,
        driver: &Driver,
        index: u32,
        expected: &str,
    ) -> E2eResult<()> {
        let status = item_status(index);
        let first = driver.attribute(&status, "class").await?;
        let second = driver.attribute(&status, "class").await?;
        verify_stable(
            &format!("status class re-read of item {}", index),
            &first,
            &second,
        )?;

        if second != expected {
            return Err(E2eError::mismatch(
                format!("status class of item {}", index),
                expected,
                second,
            ));
        }
        Ok(())
    }

    fn verify_count(&self, check: &str, actual: u32, expected: u32) -> E2eResult<()> {
        if actual != expected {
            return Err(E2eError::mismatch(
                check,
                expected.to_string(),
                actual.to_string(),
            ));
        }
        Ok(())
    }
}

/// Two consecutive reads of the same element must agree; a read-only
/// assertion has no side effects on the page.
fn verify_stable(check: &str, first: &str, second: &str) -> E2eResult<()> {
    if first != second {
        return Err(E2eError::mismatch(check, first, second));
    }
    Ok(())
}

/// Run the full scenario with scoped driver acquisition.
///
/// Connection failures propagate as `Err`; check failures are folded into
/// the returned report (`passed = false`) after a best-effort failure
/// screenshot. The driver session is closed on every exit path.
pub async fn run_scenario(config: &RunConfig) -> E2eResult<ScenarioReport> {
    let driver = Driver::connect(config.driver.clone()).await?;

    let started_at = Utc::now();
    let t0 = Instant::now();

    let mut scenario = Scenario::new(config.app_url.clone());
    let outcome = scenario.run(&driver).await;

    let mut screenshot = None;
    if let Err(err) = &outcome {
        error!("scenario failed: {}", err);
        let path = config.output_dir.join(SCREENSHOT_NAME);
        match driver.screenshot_to(&path).await {
            Ok(written) => screenshot = Some(written),
            Err(shot_err) => warn!("failure screenshot could not be captured: {}", shot_err),
        }
    }

    if let Err(err) = driver.quit().await {
        warn!("WebDriver teardown failed: {}", err);
    }

    Ok(ScenarioReport {
        app_url: config.app_url.clone(),
        started_at,
        duration_ms: t0.elapsed().as_millis() as u64,
        passed: outcome.is_ok(),
        error: outcome.err().map(|e| e.to_string()),
        steps: scenario.into_outcomes(),
        screenshot,
    })
}
