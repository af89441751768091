//! Host platform detection.
//!
//! A `Platform` names one supported OS/architecture pair and knows the
//! relative paths of that platform's native binaries inside an unpacked
//! natives package. Detection is a pure function of the host strings; the
//! value is computed once at startup and threaded through explicitly rather
//! than held in global state.

use serde::{Deserialize, Serialize};

/// A supported host platform for the native schema compiler toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// 64-bit Linux.
    Linux64,
    /// 64-bit macOS.
    Osx64,
    /// Windows (any supported architecture).
    Win32,
}

impl Platform {
    /// Classify an OS/architecture string pair. Case-insensitive, first
    /// match wins; returns `None` for anything without a native mapping.
    pub fn classify(os: &str, arch: &str) -> Option<Platform> {
        let os = os.to_ascii_lowercase();
        let arch = arch.to_ascii_lowercase();

        if os.starts_with("linux") && arch.contains("64") {
            return Some(Platform::Linux64);
        }
        if (os.starts_with("macos") || os.starts_with("darwin") || os.starts_with("osx"))
            && arch.contains("64")
        {
            return Some(Platform::Osx64);
        }
        if os.starts_with("windows") {
            return Some(Platform::Win32);
        }

        None
    }

    /// Detect the platform of the current process.
    pub fn detect() -> Option<Platform> {
        Self::classify(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// All supported platforms, for diagnostics.
    pub fn all() -> &'static [Platform] {
        &[Platform::Linux64, Platform::Osx64, Platform::Win32]
    }

    /// Canonical lowercase classifier (e.g. "linux64").
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Linux64 => "linux64",
            Platform::Osx64 => "osx64",
            Platform::Win32 => "win32",
        }
    }

    /// Relative path of the schema compiler inside a natives package.
    pub fn compiler_resource(&self) -> &'static str {
        match self {
            Platform::Linux64 => "compiler/linux/x64/capnp",
            Platform::Osx64 => "compiler/osx/x64/capnp",
            Platform::Win32 => "compiler/windows/x86/capnp.exe",
        }
    }

    /// Relative path of the codegen plugin inside a natives package.
    pub fn plugin_resource(&self) -> &'static str {
        match self {
            Platform::Linux64 => "plugin/linux/x64/capnpc-gen",
            Platform::Osx64 => "plugin/osx/x64/capnpc-gen",
            Platform::Win32 => "plugin/windows/x64/capnpc-gen.exe",
        }
    }

    /// Relative path of the plugin's support schema inside a natives package.
    /// The schema is platform-independent; every package ships one copy.
    pub fn schema_resource(&self) -> &'static str {
        "plugin/gen.capnp"
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_linux() {
        assert_eq!(Platform::classify("linux", "x86_64"), Some(Platform::Linux64));
        assert_eq!(
            Platform::classify("linux", "aarch64"),
            Some(Platform::Linux64)
        );
        assert_eq!(Platform::classify("Linux", "X86_64"), Some(Platform::Linux64));
    }

    #[test]
    fn classify_macos() {
        assert_eq!(Platform::classify("macos", "x86_64"), Some(Platform::Osx64));
        assert_eq!(Platform::classify("darwin", "aarch64"), Some(Platform::Osx64));
    }

    #[test]
    fn classify_windows_any_arch() {
        assert_eq!(Platform::classify("windows", "x86"), Some(Platform::Win32));
        assert_eq!(Platform::classify("windows", "x86_64"), Some(Platform::Win32));
    }

    #[test]
    fn classify_unsupported() {
        assert_eq!(Platform::classify("solaris", "sparc"), None);
        assert_eq!(Platform::classify("linux", "x86"), None);
        assert_eq!(Platform::classify("plan9", "mips"), None);
    }

    #[test]
    fn windows_resources_carry_exe() {
        assert!(Platform::Win32.compiler_resource().ends_with(".exe"));
        assert!(Platform::Win32.plugin_resource().ends_with(".exe"));
        assert!(!Platform::Linux64.compiler_resource().ends_with(".exe"));
    }

    #[test]
    fn names_are_lowercase_classifiers() {
        for p in Platform::all() {
            assert_eq!(p.name(), p.name().to_ascii_lowercase());
        }
    }
}
