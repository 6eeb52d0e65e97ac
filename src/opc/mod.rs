//! Open Packaging Conventions parts that the rewriter has to understand rather than copy.

pub mod content_types;
pub mod relationships;

use quick_xml::events::BytesStart;

use crate::error::BuildResult;

/// The unescaped value of the attribute with the given local name, if present
fn attribute(e: &BytesStart, key: &[u8]) -> BuildResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}
