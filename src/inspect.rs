use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha1::{Digest, Sha1};
use zip::ZipArchive;

use crate::consts;
use crate::error::{BuildError, BuildResult};
use crate::opc::content_types::ContentTypes;
use crate::opc::relationships::Relationships;
use crate::vba::{self, project::Project};

#[derive(Debug)]
pub struct PartSummary {
    pub name: String,
    pub size: u64,
    pub compressed_size: u64,
    pub compression: String,
    /// SHA1 of the uncompressed bytes, as lowercase hex
    pub digest: String,
}

#[derive(Debug)]
pub struct PackageSummary {
    pub parts: Vec<PartSummary>,
    pub content_types: Option<ContentTypes>,
    pub root_relationships: Option<Relationships>,
    pub custom_ui: bool,
    /// `None` when the package holds no VBA at all
    pub project: Option<Project>,
}

pub fn inspect(filename: &Path) -> BuildResult<PackageSummary> {
    let mut archive = ZipArchive::new(File::open(filename)?)?;

    let mut parts = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let mut buffer = Vec::with_capacity(usize::try_from(file.size()).unwrap_or_default());
        file.read_to_end(&mut buffer)?;
        parts.push(PartSummary {
            name: file.name().to_owned(),
            size: file.size(),
            compressed_size: file.compressed_size(),
            compression: format!("{:?}", file.compression()),
            digest: const_hex::encode(Sha1::digest(&buffer)),
        });
    }

    let content_types = match read_part(&mut archive, consts::CONTENT_TYPES_PATH)? {
        Some(bytes) => Some(ContentTypes::parse(&bytes)?),
        None => None,
    };
    let root_relationships = match read_part(&mut archive, consts::ROOT_RELS_PATH)? {
        Some(bytes) => Some(Relationships::parse(&bytes)?),
        None => None,
    };
    let custom_ui = parts.iter().any(|p| p.name == consts::CUSTOM_UI_PATH)
        && root_relationships
            .as_ref()
            .is_some_and(|r| r.by_type(consts::REL_UI_EXTENSIBILITY).count() == 1);
    let project = match vba::read_project(&mut archive) {
        Ok(p) => Some(p),
        Err(BuildError::NoVBAFile) => None,
        Err(e) => return Err(e),
    };

    Ok(PackageSummary {
        parts,
        content_types,
        root_relationships,
        custom_ui,
        project,
    })
}

/// SHA1 of every part in the package, keyed on part name
pub fn part_digests(filename: &Path) -> BuildResult<BTreeMap<String, String>> {
    let mut archive = ZipArchive::new(File::open(filename)?)?;
    let mut digests = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let mut hasher = Sha1::new();
        std::io::copy(&mut file, &mut hasher)?;
        digests.insert(file.name().to_owned(), const_hex::encode(hasher.finalize()));
    }
    Ok(digests)
}

fn read_part<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> BuildResult<Option<Vec<u8>>> {
    let Ok(mut file) = archive.by_name(name) else {
        return Ok(None);
    };
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    Ok(Some(buffer))
}

pub fn print_info(summary: &PackageSummary) {
    println!("📦 {} parts", summary.parts.len());
    for part in &summary.parts {
        println!(
            "  {:<48} {:>9} {:>9} {:<9} {}",
            part.name, part.size, part.compressed_size, part.compression, part.digest
        );
    }

    if let Some(types) = &summary.content_types {
        println!("🏷️ Default content types:");
        for (extension, content_type) in types.defaults() {
            println!("  {extension:<8} {content_type}");
        }
        let missing: Vec<_> = summary
            .parts
            .iter()
            .filter(|p| p.name != consts::CONTENT_TYPES_PATH)
            .filter(|p| types.content_type_for(&p.name).is_none())
            .collect();
        for part in missing {
            println!("⚠️ {} has no content type", part.name);
        }
    } else {
        println!("❌ The package has no [Content_Types].xml");
    }

    match &summary.root_relationships {
        Some(rels) => {
            println!("🔗 Package relationships:");
            for rel in rels.iter() {
                println!("  {:<18} {} ({})", rel.id, rel.target, rel.rel_type);
            }
        }
        None => println!("❌ The package has no _rels/.rels"),
    }

    if summary.custom_ui {
        println!("🎀 The package has a custom ribbon");
    } else {
        println!("The package has no custom ribbon");
    }

    match &summary.project {
        Some(project) => {
            println!(
                "📜 VBA project {}",
                project.name().unwrap_or("(unnamed)")
            );
            let code: Vec<_> = project.code_modules().collect();
            println!(
                "  {} code modules, {} document modules",
                code.len(),
                project.modules().len() - code.len()
            );
            for module in code {
                println!("  {:<32} {:?}", module.name, module.kind);
            }
        }
        None => println!("There is no VBA in this package"),
    }
}
