//! Inject a custom ribbon into a saved macro-enabled PowerPoint package.
//!
//! The package is a zip archive. A new archive is built alongside it which is a clone of the
//! original, save for:
//!  - `[Content_Types].xml`, which gains a `Default` for the logo's extension
//!  - `_rels/.rels`, which is regenerated with a ui-extensibility relationship
//!  - the custom UI xml, its logo and the logo's relationship, which are new
//!
//! Once complete the new archive replaces the original with a single rename. The scratch archive
//! is removed on every failure path, so a failed rewrite leaves the original untouched.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::ZipArchive;

use crate::consts;
use crate::error::{BuildError, BuildResult};
use crate::opc::content_types::{self, image_content_type};
use crate::opc::relationships::Relationships;

#[derive(Debug)]
pub struct RewriteReport {
    pub copied: usize,
    pub injected: Vec<String>,
    pub ui_relationship_id: String,
}

/// The logo to show on the ribbon, resolved to where it will live in the package
#[derive(Debug)]
struct Logo {
    id: String,
    file_name: String,
    extension: String,
    content_type: &'static str,
}

impl Logo {
    fn from_path(path: &Path) -> BuildResult<Self> {
        let unsupported = || BuildError::UnsupportedImage(path.to_string_lossy().to_string());
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(unsupported)?
            .to_owned();
        // The stem becomes the relationship id, and the file name its target, so it has to be
        // usable as both an xsd:ID and a URI segment
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| is_relationship_id(s))
            .ok_or_else(unsupported)?
            .to_owned();
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(unsupported)?
            .to_owned();
        let content_type = image_content_type(&extension).ok_or_else(unsupported)?;
        Ok(Self {
            id,
            file_name,
            extension,
            content_type,
        })
    }

    fn part_name(&self) -> String {
        format!("{}{}", consts::CUSTOM_UI_IMAGES_DIR, self.file_name)
    }

    /// Target relative to the custom UI part
    fn target(&self) -> String {
        format!("images/{}", self.file_name)
    }
}

/// An ASCII NCName: a letter or underscore, then letters, digits, `_`, `-` or `.`
fn is_relationship_id(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// A file that is deleted when dropped, unless it has been persisted
struct Scratch {
    path: PathBuf,
    armed: bool,
}

impl Scratch {
    fn create(path: &Path) -> BuildResult<(Self, File)> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => BuildError::ScratchExists(path.to_owned()),
                _ => BuildError::FileOpen(e),
            })?;
        Ok((
            Self {
                path: path.to_owned(),
                armed: true,
            },
            file,
        ))
    }

    fn persist(mut self, destination: &Path) -> BuildResult<()> {
        std::fs::rename(&self.path, destination)?;
        self.armed = false;
        Ok(())
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::warn!("could not remove scratch archive {}: {e}", self.path.display());
            }
        }
    }
}

/// The scratch path used when the caller doesn't name one: `<stem>_copy.zip` next to the package
pub fn default_scratch_path(document: &Path) -> BuildResult<PathBuf> {
    let stem = document
        .file_stem()
        .ok_or_else(|| BuildError::NotAFile(document.to_owned()))?;
    let mut name = stem.to_owned();
    name.push("_copy.zip");
    Ok(document.with_file_name(name))
}

pub fn rewrite(
    document: &Path,
    ribbon_xml: &Path,
    ribbon_logo: &Path,
    scratch: &Path,
) -> BuildResult<RewriteReport> {
    tracing::info!("adding custom UI to {}", document.display());
    let logo = Logo::from_path(ribbon_logo)?;
    let ribbon_bytes = std::fs::read(ribbon_xml)?;
    let logo_bytes = std::fs::read(ribbon_logo)?;

    let mut archive = ZipArchive::new(File::open(document)?)?;
    let content_types = updated_content_types(&mut archive, &logo)?;
    // Part names compare case insensitively, so `CustomUI/` counts too
    let custom_ui_dir = consts::CUSTOM_UI_DIR.to_ascii_lowercase();
    if let Some(existing) = archive
        .file_names()
        .find(|n| n.to_ascii_lowercase().starts_with(&custom_ui_dir))
    {
        return Err(BuildError::AlreadyCustomised(existing.to_owned()));
    }

    let (guard, file) = Scratch::create(scratch)?;
    let report = write_package(
        &mut archive,
        file,
        &content_types,
        &logo,
        &logo_bytes,
        &ribbon_bytes,
    )?;
    drop(archive);

    guard.persist(document)?;
    tracing::info!(
        "custom UI added with relationship id {}",
        report.ui_relationship_id
    );
    Ok(report)
}

/// Read the content types part and register the logo's extension in it
fn updated_content_types<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    logo: &Logo,
) -> BuildResult<Vec<u8>> {
    let Ok(mut file) = archive.by_name(consts::CONTENT_TYPES_PATH) else {
        return Err(BuildError::NoContentTypes);
    };
    let mut buffer = Vec::with_capacity(2048);
    file.read_to_end(&mut buffer)?;
    content_types::register_default(&buffer, &logo.extension, logo.content_type)
}

fn write_package<R: Read + Seek, W: Write + Seek>(
    archive: &mut ZipArchive<R>,
    out: W,
    content_types: &[u8],
    logo: &Logo,
    logo_bytes: &[u8],
    ribbon_bytes: &[u8],
) -> BuildResult<RewriteReport> {
    let mut new_archive = zip::ZipWriter::new(out);
    let mut copied = 0;
    let mut injected = Vec::with_capacity(4);

    // Loop through the original archive:
    //  - Skip the root relationships, they get written from scratch below
    //  - Write the content types from the updated bytes, keeping the original entry settings
    //  - Copy everything else across as raw, so the compressed bytes are untouched
    for i in 0..archive.len() {
        let file = archive.by_index_raw(i)?;
        let name = file.name().to_owned();
        match name.as_str() {
            consts::ROOT_RELS_PATH => {
                tracing::debug!("dropping {}", consts::ROOT_RELS_PATH);
            }
            consts::CONTENT_TYPES_PATH => {
                let options = FileOptions::default()
                    .compression_method(file.compression())
                    .last_modified_time(file.last_modified());
                new_archive.start_file(consts::CONTENT_TYPES_PATH, options)?;
                new_archive.write_all(content_types)?;

                let logo_part = logo.part_name();
                new_archive.start_file(logo_part.as_str(), FileOptions::default())?;
                new_archive.write_all(logo_bytes)?;
                injected.push(logo_part);
            }
            _ => {
                tracing::debug!("copying {name}");
                new_archive.raw_copy_file(file)?;
                copied += 1;
            }
        }
    }

    new_archive.start_file(consts::CUSTOM_UI_PATH, FileOptions::default())?;
    new_archive.write_all(ribbon_bytes)?;
    injected.push(consts::CUSTOM_UI_PATH.to_owned());

    new_archive.start_file(consts::CUSTOM_UI_RELS_PATH, FileOptions::default())?;
    new_archive.write_all(&custom_ui_relationships(logo)?.to_xml()?)?;
    injected.push(consts::CUSTOM_UI_RELS_PATH.to_owned());

    let (root, ui_relationship_id) = package_relationships()?;
    new_archive.start_file(consts::ROOT_RELS_PATH, FileOptions::default())?;
    new_archive.write_all(&root.to_xml()?)?;
    injected.push(consts::ROOT_RELS_PATH.to_owned());

    new_archive.finish()?;

    Ok(RewriteReport {
        copied,
        injected,
        ui_relationship_id,
    })
}

fn custom_ui_relationships(logo: &Logo) -> BuildResult<Relationships> {
    let mut rels = Relationships::new();
    rels.push(&logo.id, consts::REL_IMAGE, &logo.target())?;
    Ok(rels)
}

/// The standard package relationships of a saved presentation, plus the link to the custom UI
pub fn package_relationships() -> BuildResult<(Relationships, String)> {
    let mut rels = Relationships::new();
    rels.push("rId3", consts::REL_CORE_PROPERTIES, "docProps/core.xml")?;
    rels.push("rId2", consts::REL_THUMBNAIL, "docProps/thumbnail.jpeg")?;
    rels.push("rId1", consts::REL_OFFICE_DOCUMENT, "ppt/presentation.xml")?;
    rels.push("rId4", consts::REL_EXTENDED_PROPERTIES, "docProps/app.xml")?;
    let id = rels.push_generated(
        consts::UI_REL_ID_PREFIX,
        consts::REL_UI_EXTENSIBILITY,
        consts::CUSTOM_UI_PATH,
    )?;
    Ok((rels, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_relationships_shape() {
        let (rels, id) = package_relationships().unwrap();
        assert_eq!(rels.len(), 5);
        assert_eq!(rels.get("rId1").unwrap().target, "ppt/presentation.xml");
        let ui: Vec<_> = rels.by_type(consts::REL_UI_EXTENSIBILITY).collect();
        assert_eq!(ui.len(), 1);
        assert_eq!(ui[0].id, id);
        assert_eq!(ui[0].target, consts::CUSTOM_UI_PATH);
    }

    #[test]
    fn logo_naming() {
        let logo = Logo::from_path(Path::new("assets/jdplogo.JPG")).unwrap();
        assert_eq!(logo.id, "jdplogo");
        assert_eq!(logo.part_name(), "customUI/images/jdplogo.JPG");
        assert_eq!(logo.target(), "images/jdplogo.JPG");
        assert_eq!(logo.content_type, "image/jpeg");
    }

    #[test]
    fn logo_must_be_an_image() {
        assert!(matches!(
            Logo::from_path(Path::new("logo.svg")),
            Err(BuildError::UnsupportedImage(_))
        ));
        assert!(matches!(
            Logo::from_path(Path::new("logo")),
            Err(BuildError::UnsupportedImage(_))
        ));
    }

    #[test]
    fn logo_name_must_be_an_id() {
        for bad in ["my logo.jpg", "1logo.png", "-logo.gif", "logo#1.bmp", "lögo.jpg"] {
            assert!(
                matches!(
                    Logo::from_path(Path::new(bad)),
                    Err(BuildError::UnsupportedImage(_))
                ),
                "{bad}"
            );
        }
        let logo = Logo::from_path(Path::new("_chart-builder.v2.png")).unwrap();
        assert_eq!(logo.id, "_chart-builder.v2");
        assert_eq!(logo.target(), "images/_chart-builder.v2.png");
    }

    #[test]
    fn scratch_alongside_document() {
        assert_eq!(
            default_scratch_path(Path::new("/tmp/build/output.pptm")).unwrap(),
            PathBuf::from("/tmp/build/output_copy.zip")
        );
    }
}
