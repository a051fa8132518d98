//! Detection orchestrator.
//!
//! Sequences the normalizers, the bitness fallback chain, and the
//! Linux release lookup into one pass, assembles the classifier, and
//! writes every derived value into the caller's output map.

use crate::arch::{guess_bitness_from_architecture, normalize_arch};
use crate::error::{DetectError, Result};
use crate::os::{Os, normalize_os};
use crate::provider::{FileProvider, SystemPropertyProvider};
use crate::release::{LinuxRelease, detect_linux_release};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DETECTED_NAME: &str = "detected.name";
pub const DETECTED_ARCH: &str = "detected.arch";
pub const DETECTED_BITNESS: &str = "detected.bitness";
pub const DETECTED_VERSION: &str = "detected.version";
pub const DETECTED_VERSION_MAJOR: &str = "detected.version.major";
pub const DETECTED_VERSION_MINOR: &str = "detected.version.minor";
pub const DETECTED_RELEASE: &str = "detected.release";
pub const DETECTED_RELEASE_VERSION: &str = "detected.release.version";
pub const DETECTED_RELEASE_LIKE_PREFIX: &str = "detected.release.like.";
pub const DETECTED_CLASSIFIER: &str = "detected.classifier";

const PROP_FAIL_ON_UNKNOWN_OS: &str = "failOnUnknownOS";
const BITNESS_PROPERTIES: [&str; 2] = ["sun.arch.data.model", "com.ibm.vm.bitmode"];

/// Everything derived by one detection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub name: String,
    pub arch: String,
    pub bitness: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_major: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_minor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<LinuxRelease>,
    pub classifier: String,
}

/// Runs the detection against injected property and file access.
pub struct Detector<'a> {
    properties: &'a dyn SystemPropertyProvider,
    files: &'a dyn FileProvider,
    mirror: bool,
}

impl<'a> Detector<'a> {
    pub fn new(
        properties: &'a dyn SystemPropertyProvider,
        files: &'a dyn FileProvider,
    ) -> Detector<'a> {
        Detector {
            properties,
            files,
            mirror: true,
        }
    }

    /// Toggle mirroring of `detected.name`/`arch`/`bitness` back into
    /// the live property store (on by default, for consumers that read
    /// that store directly).
    pub fn mirror_properties(mut self, enabled: bool) -> Detector<'a> {
        self.mirror = enabled;
        self
    }

    /// Run one detection pass.
    ///
    /// Populates `output` with the `detected.*` keys and returns the
    /// typed classification. Fails only when `os.name` is unrecognized
    /// and the `failOnUnknownOS` policy is enabled; in that case
    /// nothing has been written to `output`.
    pub fn detect(
        &self,
        output: &mut BTreeMap<String, String>,
        classifier_qualifiers: &[String],
    ) -> Result<Classification> {
        info!("Detecting the operating system and CPU architecture");

        let os_name = self.properties.get_property("os.name").unwrap_or_default();
        let os_arch = self.properties.get_property("os.arch").unwrap_or_default();
        let os_version = self.properties.get_property("os.version").unwrap_or_default();

        let name = normalize_os(&os_name);
        if name == Os::Unknown && self.fail_on_unknown_os() {
            return Err(DetectError::UnknownOs(os_name));
        }
        let arch = normalize_arch(&os_arch);

        let bitness = self.resolve_bitness(&os_arch);
        let (version, version_major, version_minor) = parse_version(&os_version);

        let release = if name == Os::Linux {
            detect_linux_release(self.files)
        } else {
            None
        };

        let classifier = build_classifier(name, arch, classifier_qualifiers, release.as_ref());

        let classification = Classification {
            name: name.to_string(),
            arch: arch.to_string(),
            bitness,
            version,
            version_major,
            version_minor,
            release,
            classifier,
        };
        self.write_output(output, &classification);
        Ok(classification)
    }

    fn fail_on_unknown_os(&self) -> bool {
        self.properties
            .get_property(PROP_FAIL_ON_UNKNOWN_OS)
            .as_deref()
            != Some("false")
    }

    /// Ordered fallback: explicit data-model property, IBM VM bit-mode
    /// property, inference from the raw architecture, then 32.
    fn resolve_bitness(&self, os_arch: &str) -> u8 {
        for property in BITNESS_PROPERTIES {
            match self
                .properties
                .get_property(property)
                .unwrap_or_default()
                .trim()
            {
                "32" => return 32,
                "64" => return 64,
                _ => {}
            }
        }
        guess_bitness_from_architecture(os_arch).unwrap_or(32)
    }

    fn write_output(&self, output: &mut BTreeMap<String, String>, c: &Classification) {
        self.put(output, DETECTED_NAME, &c.name);
        self.put(output, DETECTED_ARCH, &c.arch);
        self.put(output, DETECTED_BITNESS, &c.bitness.to_string());
        if let Some(version) = &c.version {
            self.put(output, DETECTED_VERSION, version);
        }
        if let Some(major) = &c.version_major {
            self.put(output, DETECTED_VERSION_MAJOR, major);
        }
        if let Some(minor) = &c.version_minor {
            self.put(output, DETECTED_VERSION_MINOR, minor);
        }
        if let Some(release) = &c.release {
            if let Some(id) = &release.id {
                self.put(output, DETECTED_RELEASE, id);
            }
            if let Some(version) = &release.version {
                self.put(output, DETECTED_RELEASE_VERSION, version);
            }
            for alias in &release.like {
                let key = format!("{DETECTED_RELEASE_LIKE_PREFIX}{alias}");
                self.put(output, &key, "true");
            }
        }
        self.put(output, DETECTED_CLASSIFIER, &c.classifier);

        if self.mirror {
            self.properties.set_property(DETECTED_NAME, &c.name);
            self.properties.set_property(DETECTED_ARCH, &c.arch);
            self.properties
                .set_property(DETECTED_BITNESS, &c.bitness.to_string());
        }
    }

    fn put(&self, output: &mut BTreeMap<String, String>, key: &str, value: &str) {
        debug!("{key}={value}");
        output.insert(key.to_string(), value.to_string());
    }
}

/// `name-arch`, then each caller qualifier verbatim in order. The
/// release id is auto-appended only when the caller supplied no
/// qualifiers, so a caller-chosen qualifier set is never widened or
/// duplicated behind its back.
fn build_classifier(
    name: Os,
    arch: crate::arch::Arch,
    qualifiers: &[String],
    release: Option<&LinuxRelease>,
) -> String {
    let mut classifier = format!("{name}-{arch}");
    for qualifier in qualifiers {
        classifier.push('-');
        classifier.push_str(qualifier);
    }
    if qualifiers.is_empty() {
        if let Some(id) = release.and_then(|r| r.id.as_deref()) {
            classifier.push('-');
            classifier.push_str(id);
        }
    }
    classifier
}

/// Split `os.version` into the leading digits of its first two
/// dot-separated components. Absent components stay absent rather than
/// being zero-filled.
fn parse_version(raw: &str) -> (Option<String>, Option<String>, Option<String>) {
    let mut components = raw.split('.');
    let major = components
        .next()
        .map(leading_digits)
        .filter(|digits| !digits.is_empty());
    let Some(major) = major else {
        return (None, None, None);
    };
    let minor = components
        .next()
        .map(leading_digits)
        .filter(|digits| !digits.is_empty());
    let version = match &minor {
        Some(minor) => format!("{major}.{minor}"),
        None => major.clone(),
    };
    (Some(version), Some(major), minor)
}

fn leading_digits(component: &str) -> String {
    component
        .chars()
        .take_while(char::is_ascii_digit)
        .collect()
}
