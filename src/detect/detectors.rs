// ABOUTME: Concrete marker-file detectors for the ecosystems devmux recognizes

use super::Detector;
use crate::models::ServiceDescriptor;
use std::path::Path;
use tracing::warn;

fn has_file(root: &Path, name: &str) -> bool {
    root.join(name).is_file()
}

/// docker-compose.yml / compose.yaml projects.
pub struct ComposeDetector;

impl Detector for ComposeDetector {
    fn name(&self) -> &'static str {
        "compose"
    }

    fn matches(&self, root: &Path) -> bool {
        ["docker-compose.yml", "docker-compose.yaml", "compose.yml", "compose.yaml"]
            .iter()
            .any(|f| has_file(root, f))
    }

    fn services(&self, _root: &Path) -> Vec<ServiceDescriptor> {
        vec![ServiceDescriptor::new(
            "docker compose",
            "docker compose up",
            true,
        )]
    }
}

/// Laravel Sail projects (compose wrapper shipped inside vendor/).
pub struct SailDetector;

impl Detector for SailDetector {
    fn name(&self) -> &'static str {
        "sail"
    }

    fn matches(&self, root: &Path) -> bool {
        root.join("vendor/bin/sail").is_file()
    }

    fn services(&self, _root: &Path) -> Vec<ServiceDescriptor> {
        vec![ServiceDescriptor::new(
            "laravel sail",
            "./vendor/bin/sail up",
            true,
        )]
    }
}

/// Node projects: reads package.json scripts and offers the ones present.
pub struct NodeDetector;

impl NodeDetector {
    fn scripts(root: &Path) -> Option<serde_json::Map<String, serde_json::Value>> {
        let data = std::fs::read_to_string(root.join("package.json")).ok()?;
        let pkg: serde_json::Value = serde_json::from_str(&data)
            .map_err(|e| warn!("unparseable package.json: {e}"))
            .ok()?;
        pkg.get("scripts")?.as_object().cloned()
    }
}

impl Detector for NodeDetector {
    fn name(&self) -> &'static str {
        "node"
    }

    fn matches(&self, root: &Path) -> bool {
        has_file(root, "package.json")
    }

    fn services(&self, root: &Path) -> Vec<ServiceDescriptor> {
        let mut services = Vec::new();
        let Some(scripts) = Self::scripts(root) else {
            return services;
        };
        if scripts.contains_key("dev") {
            services.push(ServiceDescriptor::new("npm dev server", "npm run dev", true));
        } else if scripts.contains_key("start") {
            services.push(ServiceDescriptor::new("npm start", "npm start", true));
        }
        if scripts.contains_key("build") {
            services.push(ServiceDescriptor::new("npm build", "npm run build", false));
        }
        services
    }
}

/// Django projects via manage.py.
pub struct DjangoDetector;

impl Detector for DjangoDetector {
    fn name(&self) -> &'static str {
        "django"
    }

    fn matches(&self, root: &Path) -> bool {
        has_file(root, "manage.py")
    }

    fn services(&self, _root: &Path) -> Vec<ServiceDescriptor> {
        vec![ServiceDescriptor::new(
            "django dev server",
            "python manage.py runserver",
            true,
        )]
    }
}

/// Go modules.
pub struct GoDetector;

impl Detector for GoDetector {
    fn name(&self) -> &'static str {
        "go"
    }

    fn matches(&self, root: &Path) -> bool {
        has_file(root, "go.mod")
    }

    fn services(&self, _root: &Path) -> Vec<ServiceDescriptor> {
        vec![ServiceDescriptor::new("go run", "go run .", true)]
    }
}

/// Rust crates.
pub struct CargoDetector;

impl Detector for CargoDetector {
    fn name(&self) -> &'static str {
        "cargo"
    }

    fn matches(&self, root: &Path) -> bool {
        has_file(root, "Cargo.toml")
    }

    fn services(&self, _root: &Path) -> Vec<ServiceDescriptor> {
        vec![ServiceDescriptor::new("cargo run", "cargo run", true)]
    }
}

/// Plain Makefile projects.
pub struct MakeDetector;

impl Detector for MakeDetector {
    fn name(&self) -> &'static str {
        "make"
    }

    fn matches(&self, root: &Path) -> bool {
        has_file(root, "Makefile") || has_file(root, "makefile")
    }

    fn services(&self, _root: &Path) -> Vec<ServiceDescriptor> {
        vec![ServiceDescriptor::new("make", "make", false)]
    }
}
