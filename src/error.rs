use std::{
    fmt::{Debug, Display},
    io,
    path::PathBuf,
};

use crate::host::HostError;

pub type BuildResult<T> = Result<T, BuildError>;

#[allow(clippy::module_name_repetitions)]
pub enum BuildError {
    FileOpen(io::Error),
    Zip(zip::result::ZipError),
    Xml(quick_xml::Error),
    Host(HostError),
    HostVersion(String),
    ModuleImport(PathBuf, HostError),
    RequiredReference(String, HostError),
    Housekeeping(PathBuf, io::Error),
    NoContentTypes,
    ContentTypesRoot(String),
    AlreadyCustomised(String),
    ScratchExists(PathBuf),
    UnsupportedImage(String),
    NotAFile(PathBuf),
    DuplicateRelationshipId(String),
    Relationship(String),
    NoVBAFile,
    CFBOpen(io::Error),
    ProjectStructure(ProjectStructure),
}

impl From<io::Error> for BuildError {
    fn from(value: io::Error) -> Self {
        Self::FileOpen(value)
    }
}

impl From<zip::result::ZipError> for BuildError {
    fn from(value: zip::result::ZipError) -> Self {
        Self::Zip(value)
    }
}

impl From<quick_xml::Error> for BuildError {
    fn from(value: quick_xml::Error) -> Self {
        Self::Xml(value)
    }
}

impl From<quick_xml::events::attributes::AttrError> for BuildError {
    fn from(value: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(value.into())
    }
}

impl From<HostError> for BuildError {
    fn from(value: HostError) -> Self {
        Self::Host(value)
    }
}

impl From<ProjectStructure> for BuildError {
    fn from(value: ProjectStructure) -> Self {
        Self::ProjectStructure(value)
    }
}

impl Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileOpen(e) => write!(f, "{e}"),
            Self::Zip(e) => write!(
                f,
                "Problem with the zip representation of the PowerPoint file: {e}"
            ),
            Self::Xml(e) => write!(f, "Could not process the package XML: {e}"),
            Self::Host(e) => write!(f, "{e}"),
            Self::HostVersion(v) => write!(
                f,
                "The host application reported a version of '{v}', which is not a number"
            ),
            Self::ModuleImport(path, e) => write!(
                f,
                "Failed to import the module {}. The build has been abandoned: {e}",
                path.display()
            ),
            Self::RequiredReference(name, e) => {
                write!(f, "The required reference '{name}' could not be added: {e}")
            }
            Self::Housekeeping(path, e) => write!(
                f,
                "Could not remove the stale file {} ahead of saving: {e}",
                path.display()
            ),
            Self::NoContentTypes => write!(
                f,
                "Could not find the '[Content_Types].xml' file within the package"
            ),
            Self::ContentTypesRoot(name) => write!(
                f,
                "The content types part should have a root element of 'Types', not '{name}'"
            ),
            Self::AlreadyCustomised(part) => write!(
                f,
                "The package already has a custom UI ({part}). Refusing to add another one"
            ),
            Self::ScratchExists(path) => write!(
                f,
                "The scratch archive {} already exists. Remove it and try again",
                path.display()
            ),
            Self::UnsupportedImage(file) => write!(
                f,
                "{file} cannot be used as a ribbon logo. Use a jpg, png, gif or bmp named with letters, digits, `_`, `-` or `.`, starting with a letter"
            ),
            Self::NotAFile(path) => write!(f, "{} does not name a file", path.display()),
            Self::DuplicateRelationshipId(id) => write!(
                f,
                "The relationship id '{id}' is already in use within this relationships part"
            ),
            Self::Relationship(e) => write!(f, "Malformed relationship: {e}"),
            Self::NoVBAFile => write!(
                f,
                "Could not find the 'ppt/vbaProject.bin' file within the package"
            ),
            Self::CFBOpen(e) => write!(
                f,
                "There was a problem reading the CFB format vbaProject.bin file: {e}"
            ),
            Self::ProjectStructure(e) => write!(f, "{e}"),
        }
    }
}

impl Debug for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ProjectStructure {
    Record(Vec<u8>),
    ModuleName(String),
}

impl Display for ProjectStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Record(rest) => write!(
                f,
                "Could not parse the PROJECT stream record starting: {}",
                String::from_utf8_lossy(&rest[..rest.len().min(40)])
            ),
            Self::ModuleName(name) => write!(
                f,
                "'{name}' is not a valid VBA module identifier"
            ),
        }
    }
}
