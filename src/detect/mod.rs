// ABOUTME: Project service detection - turns marker files into runnable service descriptors
//
// Each detector checks for a single ecosystem marker (compose file,
// package.json, manage.py, ...) and contributes zero or more service
// descriptors. Detection is deliberately shallow: file existence checks and
// one package.json read, no recursive entrypoint searching.

mod detectors;

use crate::models::ServiceDescriptor;
use std::path::Path;
use tracing::debug;

/// A detector knows how to recognize one project ecosystem and name its
/// run commands.
pub trait Detector {
    /// Ecosystem label used in log lines, e.g. "node" or "compose".
    fn name(&self) -> &'static str;

    /// Whether this detector applies to the project at `root`.
    fn matches(&self, root: &Path) -> bool;

    /// The run commands this detector contributes. Only called after
    /// `matches` returned true.
    fn services(&self, root: &Path) -> Vec<ServiceDescriptor>;
}

fn all_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(detectors::ComposeDetector),
        Box::new(detectors::SailDetector),
        Box::new(detectors::NodeDetector),
        Box::new(detectors::DjangoDetector),
        Box::new(detectors::GoDetector),
        Box::new(detectors::CargoDetector),
        Box::new(detectors::MakeDetector),
    ]
}

/// Run every detector against `root` and collect the descriptors in
/// detector order. An empty result means nothing recognizable was found.
pub fn detect_services(root: &Path) -> Vec<ServiceDescriptor> {
    let mut services = Vec::new();
    for detector in all_detectors() {
        if !detector.matches(root) {
            continue;
        }
        let found = detector.services(root);
        debug!(
            detector = detector.name(),
            count = found.len(),
            "detector matched"
        );
        services.extend(found);
    }
    services
}
