//! Operating system name normalization.

use crate::arch::normalize_token;
use serde::Serialize;
use std::fmt;

/// Canonical operating system vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Os {
    Linux,
    Osx,
    Windows,
    Freebsd,
    Openbsd,
    Netbsd,
    Sunos,
    Aix,
    Hpux,
    Os400,
    Zos,
    Unknown,
}

impl Os {
    pub fn token(self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Osx => "osx",
            Os::Windows => "windows",
            Os::Freebsd => "freebsd",
            Os::Openbsd => "openbsd",
            Os::Netbsd => "netbsd",
            Os::Sunos => "sunos",
            Os::Aix => "aix",
            Os::Hpux => "hpux",
            Os::Os400 => "os400",
            Os::Zos => "zos",
            Os::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl From<Os> for String {
    fn from(os: Os) -> Self {
        os.token().to_string()
    }
}

/// Map a raw `os.name` value onto the canonical vocabulary.
///
/// The value is stripped of separators and lowercased first, so
/// `Mac OS X`, `HP-UX` and `z/OS` match their prefixes.
pub fn normalize_os(value: &str) -> Os {
    let v = normalize_token(value);
    if v.starts_with("aix") {
        Os::Aix
    } else if v.starts_with("hpux") {
        Os::Hpux
    } else if v.starts_with("os400") && (v.len() <= 5 || !v.as_bytes()[5].is_ascii_digit()) {
        // os400 followed by a digit would be a version of another OS
        Os::Os400
    } else if v.starts_with("linux") {
        Os::Linux
    } else if v.starts_with("mac") || v.starts_with("osx") || v.starts_with("darwin") {
        Os::Osx
    } else if v.starts_with("freebsd") {
        Os::Freebsd
    } else if v.starts_with("openbsd") {
        Os::Openbsd
    } else if v.starts_with("netbsd") {
        Os::Netbsd
    } else if v.starts_with("solaris") || v.starts_with("sunos") {
        Os::Sunos
    } else if v.starts_with("windows") {
        Os::Windows
    } else if v.starts_with("zos") {
        Os::Zos
    } else {
        Os::Unknown
    }
}
