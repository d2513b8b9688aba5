//! Browser verification scenario for the sample to-do application
//!
//! This crate drives a real browser through a fixed checklist against
//! <https://lambdatest.github.io/sample-todo-app/> and asserts the rendered
//! state after every interaction:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Scenario Runner (Rust)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario                                                   │
//! │    ├── open_app()           verify page title               │
//! │    ├── toggle_and_verify(i) items 1..=5 -> done-true        │
//! │    ├── append_and_verify()  "New Item" -> item 6            │
//! │    └── ListModel            remaining/total mirror          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Driver (fantoccini / WebDriver)                            │
//! │    ├── goto, click, send_keys, text, attribute              │
//! │    ├── wait_for, wait_for_attribute (bounded polling)       │
//! │    └── screenshot_to, quit                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first failed check aborts the run; a best-effort screenshot is
//! captured and the WebDriver session is always closed. Results are written
//! as a JSON report.

pub mod driver;
pub mod error;
pub mod report;
pub mod scenario;

pub use driver::{Driver, DriverConfig, Target};
pub use error::{E2eError, E2eResult};
pub use report::{ScenarioReport, StepOutcome};
pub use scenario::{run_scenario, ListModel, RunConfig, Scenario};
