//! # Rollover Core Library
//!
//! Moves overdue Asana tasks to tomorrow without losing their time of day,
//! and without landing them on "today" when UTC and local calendars disagree.
//!
//! ## Core Modules
//!
//! - [`scheduler`]: Pure due/rollover decisions over task snapshots
//! - [`pass`]: Fetch, filter, reschedule and update sweep with a structured report
//! - [`service`]: The `TaskService` boundary to the task-tracking service
//! - [`asana`]: `TaskService` implementation over the Asana REST API
//! - [`models`]: Wire records, parsed tasks and due values
//! - [`timezone`]: Timezone parsing and display helpers
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use rollover_core::{
//!     asana::{AsanaClient, DEFAULT_API_BASE_URL},
//!     models::TaskSelector,
//!     pass::{PassMode, RolloverPass},
//!     scheduler::DueDateScheduler,
//!     timezone::parse_timezone,
//! };
//!
//! # async fn example() -> Result<(), rollover_core::error::CoreError> {
//! let client = AsanaClient::new("token", DEFAULT_API_BASE_URL.parse().unwrap());
//! let scheduler = DueDateScheduler::new(parse_timezone("America/New_York")?);
//! let selector = TaskSelector::Project("1200000000000000".to_string());
//!
//! let report = RolloverPass::new(&client, &scheduler)
//!     .run(&selector, scheduler.now(), PassMode::Apply)
//!     .await?;
//! println!("Moved {} of {} tasks", report.moved(), report.fetched);
//! # Ok(())
//! # }
//! ```

pub mod asana;
pub mod error;
pub mod models;
pub mod pass;
pub mod scheduler;
pub mod service;
pub mod timezone;
