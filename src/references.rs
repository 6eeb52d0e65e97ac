//! The type libraries the add-in's VBA project references.
//!
//! Where a library lives depends on the Office version and on whether Windows is 64 bit, so the
//! paths are templated from those two facts rather than hard coded.

use std::fmt::Display;

use crate::error::{BuildError, BuildResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    X86,
    X64,
}

impl Platform {
    /// The platform this binary was built for
    pub const fn current() -> Self {
        if cfg!(target_pointer_width = "64") {
            Self::X64
        } else {
            Self::X86
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X86 => write!(f, "32 bit"),
            Self::X64 => write!(f, "64 bit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSpec {
    pub name: String,
    pub path: String,
    /// Failing to add a required reference aborts the build, others are only reported
    pub required: bool,
}

impl ReferenceSpec {
    fn optional(name: &str, path: impl Into<String>) -> Self {
        Self {
            name: name.to_owned(),
            path: path.into(),
            required: false,
        }
    }
}

pub trait ReferencePolicy {
    fn resolve(&self, host_version: u32, platform: Platform) -> Vec<ReferenceSpec>;
}

/// The libraries a standard install of Office provides
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardReferences;

pub const ADO: &str = "Microsoft ActiveX Data Objects 6.1 Library";
pub const VBIDE: &str = "VBIDE";
pub const MSXML: &str = "Microsoft XML, v6.0";
pub const EXCEL: &str = "Microsoft Excel";
pub const COMMON_CONTROLS: &str = "Microsoft Windows Common Controls 6.0 (SP6)";

impl ReferencePolicy for StandardReferences {
    fn resolve(&self, host_version: u32, platform: Platform) -> Vec<ReferenceSpec> {
        let excel = match platform {
            Platform::X64 => format!(
                r"C:\Program Files\Microsoft Office 15\Root\Office{host_version}\EXCEL.EXE"
            ),
            Platform::X86 => format!(
                r"C:\Program Files (x86)\Microsoft Office\Office{host_version}\EXCEL.EXE"
            ),
        };
        let system = match platform {
            Platform::X64 => "SysWOW64",
            Platform::X86 => "System32",
        };

        vec![
            ReferenceSpec::optional(
                ADO,
                r"C:\Program Files (x86)\Common Files\System\ado\msado15.dll",
            ),
            ReferenceSpec::optional(
                VBIDE,
                r"C:\Program Files (x86)\Common Files\Microsoft Shared\VBA\VBA6\VBE6EXT.OLB",
            ),
            ReferenceSpec::optional(MSXML, r"C:\Windows\System32\msxml6.dll"),
            ReferenceSpec::optional(EXCEL, excel),
            ReferenceSpec::optional(COMMON_CONTROLS, format!(r"C:\Windows\{system}\MSCOMCTL.OCX")),
        ]
    }
}

/// The major version from the host's version string, `16.0` -> 16
pub fn parse_host_version(version: &str) -> BuildResult<u32> {
    let trimmed = version.trim();
    let major = trimmed.split('.').next().unwrap_or_default();
    major
        .parse()
        .map_err(|_| BuildError::HostVersion(trimmed.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_of<'a>(refs: &'a [ReferenceSpec], name: &str) -> &'a str {
        &refs.iter().find(|r| r.name == name).unwrap().path
    }

    #[test]
    fn resolve_x86() {
        let refs = StandardReferences.resolve(14, Platform::X86);
        assert_eq!(refs.len(), 5);
        assert_eq!(
            path_of(&refs, EXCEL),
            r"C:\Program Files (x86)\Microsoft Office\Office14\EXCEL.EXE"
        );
        assert_eq!(
            path_of(&refs, COMMON_CONTROLS),
            r"C:\Windows\System32\MSCOMCTL.OCX"
        );
        assert!(refs.iter().all(|r| !r.required));
    }

    #[test]
    fn resolve_x64() {
        let refs = StandardReferences.resolve(16, Platform::X64);
        assert_eq!(
            path_of(&refs, EXCEL),
            r"C:\Program Files\Microsoft Office 15\Root\Office16\EXCEL.EXE"
        );
        assert_eq!(
            path_of(&refs, COMMON_CONTROLS),
            r"C:\Windows\SysWOW64\MSCOMCTL.OCX"
        );
    }

    #[test]
    fn resolve_is_pure() {
        assert_eq!(
            StandardReferences.resolve(15, Platform::X64),
            StandardReferences.resolve(15, Platform::X64)
        );
    }

    #[test]
    fn platform_only_moves_excel_and_controls() {
        let x86 = StandardReferences.resolve(16, Platform::X86);
        let x64 = StandardReferences.resolve(16, Platform::X64);
        let changed: Vec<_> = x86
            .iter()
            .zip(&x64)
            .filter(|(a, b)| a != b)
            .map(|(a, _)| a.name.as_str())
            .collect();
        assert_eq!(changed, vec![EXCEL, COMMON_CONTROLS]);
    }

    #[test]
    fn host_versions() {
        assert_eq!(parse_host_version("16.0").unwrap(), 16);
        assert_eq!(parse_host_version(" 14 ").unwrap(), 14);
        assert!(matches!(
            parse_host_version("sixteen"),
            Err(BuildError::HostVersion(v)) if v == "sixteen"
        ));
        assert!(parse_host_version("").is_err());
    }
}
