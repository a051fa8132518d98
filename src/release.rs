//! Linux distribution release lookup.
//!
//! Reads the standard os-release files (with a redhat-release
//! fallback) to find out which distribution the detector is running
//! on and which distributions it claims compatibility with. Every
//! failure here is non-fatal: an unreadable or unparseable source is
//! silently skipped.

use crate::provider::FileProvider;
use log::debug;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::{BufRead, BufReader, Read};

const OS_RELEASE_FILES: [&str; 2] = ["/etc/os-release", "/usr/lib/os-release"];
const REDHAT_RELEASE_FILE: &str = "/etc/redhat-release";

// Distributions every redhat-release member is treated as "like".
const REDHAT_FAMILY: [&str; 2] = ["rhel", "fedora"];

/// Distribution identity parsed from a release file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinuxRelease {
    /// Distribution id, e.g. `ubuntu`.
    pub id: Option<String>,
    /// Release version, e.g. `20.04` (major-only from redhat-release).
    pub version: Option<String>,
    /// Ids this distribution is compatible with, including its own.
    pub like: BTreeSet<String>,
}

/// Inspect the release files through `files`, first readable source
/// wins. Returns `None` when no source is readable or recognized.
pub fn detect_linux_release(files: &dyn FileProvider) -> Option<LinuxRelease> {
    for path in OS_RELEASE_FILES {
        if let Ok(reader) = files.read(path) {
            debug!("reading linux release information from {path}");
            if let Some(release) = parse_os_release(reader) {
                return Some(release);
            }
        }
    }
    let reader = files.read(REDHAT_RELEASE_FILE).ok()?;
    debug!("reading linux release information from {REDHAT_RELEASE_FILE}");
    parse_redhat_release(reader)
}

/// Parse os-release `KEY=VALUE` lines, values optionally quoted.
///
/// Returns `None` on a read failure mid-stream so the caller can move
/// on to the next source.
fn parse_os_release(reader: Box<dyn Read>) -> Option<LinuxRelease> {
    let mut release = LinuxRelease::default();
    for line in BufReader::new(reader).lines() {
        let line = line.ok()?;
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = unquote(value.trim());
        match key.trim() {
            "ID" => release.id = Some(value),
            "VERSION_ID" => release.version = Some(value),
            "ID_LIKE" => {
                for alias in value.split_whitespace() {
                    release.like.insert(alias.to_string());
                }
            }
            _ => {}
        }
    }
    if let Some(id) = &release.id {
        release.like.insert(id.clone());
    }
    Some(release)
}

/// Parse redhat-release free text, e.g.
/// `Red Hat Enterprise Linux release 8.6 (Ootpa)`.
fn parse_redhat_release(reader: Box<dyn Read>) -> Option<LinuxRelease> {
    let mut line = String::new();
    BufReader::new(reader).read_line(&mut line).ok()?;
    let line = line.to_lowercase();

    let id = if line.contains("centos") {
        "centos"
    } else if line.contains("fedora") {
        "fedora"
    } else if line.contains("red hat enterprise linux") {
        "rhel"
    } else {
        return None;
    };

    // Major version only; this source has no finer precision worth
    // trusting.
    let version = line.split_once("release ").and_then(|(_, rest)| {
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        (!digits.is_empty()).then_some(digits)
    });

    let mut like: BTreeSet<String> = REDHAT_FAMILY.iter().map(|s| s.to_string()).collect();
    like.insert(id.to_string());
    Some(LinuxRelease {
        id: Some(id.to_string()),
        version,
        like,
    })
}

fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}
