#![allow(dead_code)]

use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="jpeg" ContentType="image/jpeg"/><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.ms-powerpoint.presentation.macroEnabled.main+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/></Types>"#;

pub const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/thumbnail" Target="docProps/thumbnail.jpeg"/><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

pub const RIBBON: &str = r#"<customUI xmlns="http://schemas.microsoft.com/office/2009/07/customui"><ribbon><tabs><tab id="chartBuilder" label="Chart Builder"><group id="build" label="Build"><button id="run" label="Run" image="jdplogo" size="large" onAction="Ribbon.Run"/></group></tab></tabs></ribbon></customUI>"#;

// Not a real jpeg, but the rewriter never decodes it
pub const LOGO: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0xff, 0xd9];

/// A package with the parts PowerPoint writes for a presentation, minus the slides. `thumbnail`
/// is stored rather than deflated so compression settings can be checked after a copy.
pub fn write_package(path: &Path, with_content_types: bool, with_root_rels: bool) {
    write_package_with(path, with_content_types, with_root_rels, &[]);
}

/// As [`write_package`], with `extra` parts deflated onto the end
pub fn write_package_with(
    path: &Path,
    with_content_types: bool,
    with_root_rels: bool,
    extra: &[(&str, &[u8])],
) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let deflated = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let stored = FileOptions::default().compression_method(CompressionMethod::Stored);

    if with_content_types {
        zip.start_file("[Content_Types].xml", deflated).unwrap();
        zip.write_all(CONTENT_TYPES.as_bytes()).unwrap();
    }
    if with_root_rels {
        zip.start_file("_rels/.rels", deflated).unwrap();
        zip.write_all(ROOT_RELS.as_bytes()).unwrap();
    }
    zip.start_file("ppt/presentation.xml", deflated).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#).unwrap();
    zip.start_file("docProps/core.xml", deflated).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"/>"#).unwrap();
    zip.start_file("docProps/app.xml", deflated).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"/>"#).unwrap();
    zip.start_file("docProps/thumbnail.jpeg", stored).unwrap();
    zip.write_all(&[0xff, 0xd8, 0xff, 0xdb, 1, 2, 3, 4, 5, 6, 7, 8, 0xff, 0xd9]).unwrap();
    for (name, bytes) in extra {
        zip.start_file(*name, deflated).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

pub const PROJECT_STREAM: &[u8] = b"ID=\"{5B5A3E1C-0C1B-4E4B-9F43-2F6A4E7D8C11}\"\r\n\
Document=Slide1/&H00000000\r\n\
Module=Ribbon\r\n\
Class=ChartBuilder\r\n\
BaseClass=frmOptions\r\n\
Name=\"ChartBuilder\"\r\n\
HelpContextID=\"0\"\r\n\
\r\n\
[Host Extender Info]\r\n\
&H00000001={3832D640-CF90-11CF-8E43-00A0C911005A};VBE;&H00000000\r\n";

/// A compound file holding just enough of a VBA project to list its modules
pub fn vba_project_bin() -> Vec<u8> {
    let mut vba = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
    vba.create_storage("/VBA").unwrap();
    let mut stream = vba.create_stream("/PROJECT").unwrap();
    stream.write_all(PROJECT_STREAM).unwrap();
    stream.flush().unwrap();
    drop(stream);
    vba.flush().unwrap();
    vba.into_inner().into_inner()
}

/// Ribbon xml and logo files, returned as (ribbon, logo)
pub fn write_ribbon_assets(dir: &Path) -> (PathBuf, PathBuf) {
    let ribbon = dir.join("ribbon.xml");
    let logo = dir.join("jdplogo.jpg");
    std::fs::write(&ribbon, RIBBON).unwrap();
    std::fs::write(&logo, LOGO).unwrap();
    (ribbon, logo)
}

pub fn part_names(path: &Path) -> Vec<String> {
    let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<_> = archive.file_names().map(str::to_owned).collect();
    names.sort();
    names
}

pub fn read_part(path: &Path, name: &str) -> Vec<u8> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer).unwrap();
    buffer
}

pub fn compression_of(path: &Path, name: &str) -> CompressionMethod {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let file = archive.by_name(name).unwrap();
    file.compression()
}
