// Library surface for the demo binary, headless integration tests and reuse.
// The two engines (controller, pause) know nothing about terminals; runtime,
// page and app are the host side that feeds them.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod metrics;
pub mod page;
pub mod pause;
pub mod progress;
pub mod runtime;

pub use error::{Error, Result};
