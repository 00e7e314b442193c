//! End-to-end release flow
//!
//! load chart → inspect history → resolve version → patch descriptor →
//! patch values (only when a tag was supplied).

use std::path::PathBuf;

use semver::Version;

use crate::analyzer::VersionAnalyzer;
use crate::boundary::BoundaryWarning;
use crate::chart::Chart;
use crate::config::Config;
use crate::domain::TagConvention;
use crate::error::Result;
use crate::history::HistoryInspector;
use crate::patch::{FieldPath, PatchResult};
use crate::resolver::{Environment, ResolverSettings, VersionResolver};
use crate::ui;

/// Inputs of a single run
#[derive(Debug, Clone, Default)]
pub struct ReleaseOptions {
    /// Directory holding `Chart.yaml`
    pub chart_dir: PathBuf,
    /// Image tag to write into the values file
    pub tag: Option<String>,
    /// Dotted path of the image tag; falls back to the configured path
    pub tag_path: Option<String>,
    /// Resolve only, modify nothing
    pub print_only: bool,
    /// No status output
    pub silent: bool,
}

/// What a run did
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    pub version: Version,
    /// Last released version, if any
    pub previous: Option<Version>,
    pub chart_updated: bool,
    pub values_updated: bool,
    pub warnings: Vec<BoundaryWarning>,
}

/// Resolve the next version of the chart in `options.chart_dir` and write it
pub fn run_release(options: &ReleaseOptions, config: &Config, env: &Environment) -> Result<ReleaseOutcome> {
    let mut chart = Chart::load(&options.chart_dir)?;
    if options.tag.is_some() {
        let tag_path = options
            .tag_path
            .as_deref()
            .unwrap_or(&config.values.tag_path);
        chart.set_tag_path(FieldPath::parse(tag_path)?);
    }

    let inspector = HistoryInspector::new(
        TagConvention::new(&config.release.tag_patterns)?,
        VersionAnalyzer::new(config.conventional_commits.clone()),
    );
    let report = !options.silent;
    if report && !options.print_only {
        ui::display_status(&format!("Inspecting history of chart '{}'", chart.name()));
    }
    let facts = inspector.inspect_dir(chart.root())?;

    for warning in &facts.warnings {
        tracing::debug!(%warning, "history warning");
        if report {
            ui::display_boundary_warning(warning);
        }
    }
    if report && !options.print_only {
        ui::display_change_summary(&facts);
    }

    let resolver = VersionResolver::new(ResolverSettings::from(&config.release));
    let version = resolver.resolve(&facts, env)?;
    let previous = facts.last_version().cloned();
    tracing::info!(
        chart = chart.name(),
        %version,
        previous = ?previous.as_ref().map(ToString::to_string),
        "resolved version"
    );

    let mut outcome = ReleaseOutcome {
        version,
        previous,
        chart_updated: false,
        values_updated: false,
        warnings: facts.warnings,
    };

    if options.print_only {
        return Ok(outcome);
    }

    if report {
        ui::display_version_change(outcome.previous.as_ref(), &outcome.version);
    }

    outcome.chart_updated =
        chart.update_chart_version(&outcome.version)? == PatchResult::Updated;
    if report {
        ui::display_success(&format!(
            "{} version set to {}",
            chart.descriptor_path().display(),
            outcome.version
        ));
    }

    if let Some(tag) = &options.tag {
        outcome.values_updated = chart.update_image_tag(tag)? == PatchResult::Updated;
        if report {
            ui::display_success(&format!(
                "{} {} set to {}",
                chart.values_path().display(),
                chart.tag_path(),
                tag
            ));
        }
    }

    Ok(outcome)
}
