pub mod project;

use std::io::{Cursor, Read, Seek};

use zip::ZipArchive;

use crate::consts;
use crate::error::{BuildError, BuildResult};
use project::Project;

pub fn zip_to_raw_vba<R: Read + Seek>(zip: &mut ZipArchive<R>) -> BuildResult<Cursor<Vec<u8>>> {
    let Ok(mut vba_file) = zip.by_name(consts::ZIP_VBA_PATH) else {
        return Err(BuildError::NoVBAFile);
    };

    // Read the uncompressed bytes of the vbaProject.bin file into an in-memory cursor
    // Need this as ZipFile does not implement Seek, so we cannot call open_stream
    // on a CompoundFile that is built directly off the ZipFile
    let mut buffer = Vec::with_capacity(1024);
    vba_file.read_to_end(&mut buffer)?;
    Ok(Cursor::new(buffer))
}

/// The VBA project stored in a pptm or ppam package
pub fn read_project<R: Read + Seek>(zip: &mut ZipArchive<R>) -> BuildResult<Project> {
    let raw = zip_to_raw_vba(zip)?;
    let mut vba = cfb::CompoundFile::open(raw).map_err(BuildError::CFBOpen)?;
    let mut stream = vba.open_stream(consts::PROJECT_PATH)?;
    let mut buffer = Vec::new();
    stream.read_to_end(&mut buffer)?;
    Ok(Project::parse(&buffer)?)
}
