pub mod analyzer;
pub mod boundary;
pub mod chart;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod history;
pub mod patch;
pub mod release;
pub mod resolver;
pub mod ui;

pub use chart::Chart;
pub use error::{HelmReleaseError, Result};
pub use release::{run_release, ReleaseOptions, ReleaseOutcome};
pub use resolver::Environment;
