//! Injected capabilities for property and file access.
//!
//! The detector never touches the OS directly; it goes through these
//! two traits so tests can substitute fixed values and production code
//! proxies to the real system.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::sync::{Mutex, OnceLock};
use sysinfo::System;

/// Read/write access to named string properties.
///
/// Production code is backed by a process-wide store seeded from the
/// live system; test doubles substitute fixed values.
pub trait SystemPropertyProvider {
    /// Look up a property, `None` when unset.
    fn get_property(&self, name: &str) -> Option<String>;

    /// Set a property, returning the previous value if any.
    fn set_property(&self, name: &str, value: &str) -> Option<String>;
}

/// Open named files for reading.
pub trait FileProvider {
    /// Open a file as a byte stream. Missing or unreadable paths fail
    /// with the underlying `io::Error` (`ErrorKind::NotFound` for
    /// absent files).
    fn read(&self, path: &str) -> io::Result<Box<dyn Read>>;
}

#[cfg(target_pointer_width = "64")]
const DATA_MODEL: &str = "64";

#[cfg(target_pointer_width = "32")]
const DATA_MODEL: &str = "32";

/// Process-wide property store, seeded once from the running system.
static PROPERTIES: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();

fn store() -> &'static Mutex<HashMap<String, String>> {
    PROPERTIES.get_or_init(|| Mutex::new(seed_from_system()))
}

fn seed_from_system() -> HashMap<String, String> {
    let mut map = HashMap::new();
    map.insert("os.name".to_string(), std::env::consts::OS.to_string());
    map.insert("os.arch".to_string(), current_raw_arch().to_string());
    map.insert("sun.arch.data.model".to_string(), DATA_MODEL.to_string());
    let version = if cfg!(target_os = "linux") {
        System::kernel_version()
    } else {
        System::os_version()
    };
    if let Some(version) = version {
        map.insert("os.version".to_string(), version);
    }
    map
}

/// Raw architecture name of the running process, in the spelling the
/// normalizer's alias table knows.
fn current_raw_arch() -> &'static str {
    #[cfg(target_arch = "x86_64")]
    return "x86_64";

    #[cfg(target_arch = "x86")]
    return "x86";

    #[cfg(target_arch = "aarch64")]
    return "aarch64";

    #[cfg(target_arch = "arm")]
    return "arm";

    #[cfg(target_arch = "powerpc64")]
    {
        #[cfg(target_endian = "little")]
        return "ppc64le";
        #[cfg(target_endian = "big")]
        return "ppc64";
    }

    #[cfg(target_arch = "powerpc")]
    return "ppc";

    #[cfg(target_arch = "s390x")]
    return "s390x";

    #[cfg(target_arch = "riscv64")]
    return "riscv64";

    #[cfg(target_arch = "loongarch64")]
    return "loongarch64";

    #[cfg(not(any(
        target_arch = "x86_64",
        target_arch = "x86",
        target_arch = "aarch64",
        target_arch = "arm",
        target_arch = "powerpc64",
        target_arch = "powerpc",
        target_arch = "s390x",
        target_arch = "riscv64",
        target_arch = "loongarch64"
    )))]
    return std::env::consts::ARCH;
}

/// Production property provider over the process-wide store.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdSystemProperties;

impl SystemPropertyProvider for StdSystemProperties {
    fn get_property(&self, name: &str) -> Option<String> {
        store()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned()
    }

    fn set_property(&self, name: &str, value: &str) -> Option<String> {
        store()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.to_string(), value.to_string())
    }
}

/// Production file provider over the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileSystem;

impl FileProvider for StdFileSystem {
    fn read(&self, path: &str) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(File::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::normalize_arch;
    use crate::os::normalize_os;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_property_get_set_roundtrip() {
        let provider = StdSystemProperties;
        let previous = provider.set_property("test.property.key", "test.property.value");
        assert_eq!(
            provider.get_property("test.property.key").as_deref(),
            Some("test.property.value")
        );
        assert_eq!(
            provider.set_property("test.property.key", "other").as_deref(),
            Some("test.property.value")
        );
        assert!(previous.is_none());
        assert!(provider.get_property("non.existent.key").is_none());
    }

    #[test]
    #[serial]
    fn test_seeded_values_normalize() {
        let provider = StdSystemProperties;
        let os_name = provider.get_property("os.name").unwrap();
        let os_arch = provider.get_property("os.arch").unwrap();
        assert_ne!(normalize_os(&os_name), crate::os::Os::Unknown);
        assert_ne!(normalize_arch(&os_arch), crate::arch::Arch::Unknown);
        let model = provider.get_property("sun.arch.data.model").unwrap();
        assert!(model == "32" || model == "64");
    }

    #[test]
    fn test_file_read() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test-file.txt");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"Test file content")
            .unwrap();

        let provider = StdFileSystem;
        let mut content = String::new();
        provider
            .read(path.to_str().unwrap())
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "Test file content");
    }

    #[test]
    fn test_file_read_not_found() {
        let provider = StdFileSystem;
        let err = provider.read("/path/to/nonexistent/file").err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
