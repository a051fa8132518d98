//! CPU architecture normalization.
//!
//! Raw `os.arch` values come from many JVMs, toolchains, and kernels
//! under inconsistent spellings (`amd64`, `x86_64`, `em64t`, ...).
//! This module maps them onto a closed canonical vocabulary and can
//! guess the process bitness from an architecture token alone.

use serde::Serialize;
use std::fmt;

/// Canonical CPU architecture vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Arch {
    X64,
    X86,
    Sparc32,
    Sparc64,
    Arm32,
    Aarch64,
    Ppc32,
    Ppc64,
    Ppc64le,
    S390,
    S390x,
    Riscv,
    Riscv64,
    Loongarch64,
    Unknown,
}

impl Arch {
    /// The canonical token used in classifiers and property values.
    pub fn token(self) -> &'static str {
        match self {
            Arch::X64 => "x86_64",
            Arch::X86 => "x86_32",
            Arch::Sparc32 => "sparc_32",
            Arch::Sparc64 => "sparc_64",
            Arch::Arm32 => "arm_32",
            Arch::Aarch64 => "aarch_64",
            Arch::Ppc32 => "ppc_32",
            Arch::Ppc64 => "ppc_64",
            Arch::Ppc64le => "ppcle_64",
            Arch::S390 => "s390_32",
            Arch::S390x => "s390_64",
            Arch::Riscv => "riscv",
            Arch::Riscv64 => "riscv64",
            Arch::Loongarch64 => "loongarch_64",
            Arch::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl From<Arch> for String {
    fn from(arch: Arch) -> Self {
        arch.token().to_string()
    }
}

/// Strip separators and lowercase so that `PPC64LE`, `ppc64le` and
/// `ppc-64-le` all compare equal.
pub(crate) fn normalize_token(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Map a raw architecture string onto the canonical vocabulary.
///
/// Matching is exact-token over the stripped, lowercased value rather
/// than substring, so `arm64` is never misread as `arm`.
pub fn normalize_arch(value: &str) -> Arch {
    match normalize_token(value).as_str() {
        "x8664" | "amd64" | "ia32e" | "em64t" | "x64" => Arch::X64,
        "x8632" | "x86" | "i386" | "i486" | "i586" | "i686" | "ia32" | "x32" => Arch::X86,
        "sparc" | "sparc32" => Arch::Sparc32,
        "sparcv9" | "sparc64" => Arch::Sparc64,
        "arm" | "arm32" => Arch::Arm32,
        "aarch64" => Arch::Aarch64,
        "ppc" | "ppc32" => Arch::Ppc32,
        "ppc64" => Arch::Ppc64,
        "ppc64le" => Arch::Ppc64le,
        "s390" => Arch::S390,
        "s390x" => Arch::S390x,
        "riscv" => Arch::Riscv,
        "riscv64" => Arch::Riscv64,
        "loongarch64" => Arch::Loongarch64,
        _ => Arch::Unknown,
    }
}

// Aliases whose bitness is not visible from a trailing 64/32.
const ALIASES_64: &[&str] = &["sparcv9", "ia32e", "em64t"];
const ALIASES_32: &[&str] = &[
    "x86", "i386", "i486", "i586", "i686", "ia32", "arm", "sparc", "ppc", "s390",
];

/// Guess process bitness from an architecture token, raw or canonical.
///
/// Returns `None` when the token carries no bitness signal; the caller
/// decides the fallback.
pub fn guess_bitness_from_architecture(arch: &str) -> Option<u8> {
    let token = normalize_token(arch);
    if token.ends_with("64") || ALIASES_64.contains(&token.as_str()) {
        Some(64)
    } else if token.ends_with("32") || ALIASES_32.contains(&token.as_str()) {
        Some(32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_arch_aliases() {
        let cases = [
            ("x8664", Arch::X64),
            ("amd64", Arch::X64),
            ("ia32e", Arch::X64),
            ("em64t", Arch::X64),
            ("x64", Arch::X64),
            ("x86_64", Arch::X64),
            ("x8632", Arch::X86),
            ("x86", Arch::X86),
            ("i386", Arch::X86),
            ("i486", Arch::X86),
            ("i586", Arch::X86),
            ("i686", Arch::X86),
            ("ia32", Arch::X86),
            ("x32", Arch::X86),
            ("sparc", Arch::Sparc32),
            ("sparcv9", Arch::Sparc64),
            ("arm", Arch::Arm32),
            ("arm32", Arch::Arm32),
            ("aarch64", Arch::Aarch64),
            ("ppc", Arch::Ppc32),
            ("ppc64", Arch::Ppc64),
            ("ppc64le", Arch::Ppc64le),
            ("PPC64LE", Arch::Ppc64le),
            ("s390", Arch::S390),
            ("s390x", Arch::S390x),
            ("riscv", Arch::Riscv),
            ("riscv64", Arch::Riscv64),
            ("loongarch64", Arch::Loongarch64),
            ("unknown_arch", Arch::Unknown),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_arch(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_exact_token_matching() {
        // arm64 is not a known alias and must not fall back to arm
        assert_eq!(normalize_arch("arm64"), Arch::Unknown);
        assert_eq!(normalize_arch("x86_64_extra"), Arch::Unknown);
    }

    #[test]
    fn test_canonical_tokens() {
        assert_eq!(Arch::X64.to_string(), "x86_64");
        assert_eq!(Arch::Aarch64.to_string(), "aarch_64");
        assert_eq!(Arch::Ppc64le.to_string(), "ppcle_64");
        assert_eq!(Arch::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_guess_bitness() {
        let cases = [
            ("x86_64", Some(64)),
            ("amd64", Some(64)),
            ("ppc64", Some(64)),
            ("aarch_64", Some(64)),
            ("sparcv9", Some(64)),
            ("em64t", Some(64)),
            ("x86_32", Some(32)),
            ("x86", Some(32)),
            ("arm_32", Some(32)),
            ("sparc", Some(32)),
            ("riscv", None),
            ("mystery", None),
        ];
        for (input, expected) in cases {
            assert_eq!(
                guess_bitness_from_architecture(input),
                expected,
                "input: {input}"
            );
        }
    }
}
