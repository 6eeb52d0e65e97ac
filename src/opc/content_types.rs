//! The `[Content_Types].xml` part.
//!
//! Every part in an OOXML package needs a content type, either through a `Default` keyed on the
//! file extension or an `Override` keyed on the part name. Injecting a new image into the package
//! means registering its extension here, otherwise PowerPoint considers the package corrupt.

use std::collections::BTreeMap;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::{BuildError, BuildResult};
use crate::opc::attribute;

#[derive(Debug, Default)]
pub struct ContentTypes {
    defaults: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
    occurrences: BTreeMap<String, usize>,
}

impl ContentTypes {
    pub fn parse(xml: &[u8]) -> BuildResult<Self> {
        let mut reader = Reader::from_reader(xml);
        let mut types = Self::default();
        let mut root_seen = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => {
                    if !root_seen {
                        if e.local_name().as_ref() != b"Types" {
                            return Err(BuildError::ContentTypesRoot(
                                String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                            ));
                        }
                        root_seen = true;
                        continue;
                    }
                    match e.local_name().as_ref() {
                        b"Default" => {
                            if let (Some(ext), Some(ct)) =
                                (attribute(&e, b"Extension")?, attribute(&e, b"ContentType")?)
                            {
                                let ext = ext.to_ascii_lowercase();
                                *types.occurrences.entry(ext.clone()).or_default() += 1;
                                types.defaults.entry(ext).or_insert(ct);
                            }
                        }
                        b"Override" => {
                            if let (Some(part), Some(ct)) =
                                (attribute(&e, b"PartName")?, attribute(&e, b"ContentType")?)
                            {
                                types.overrides.insert(part, ct);
                            }
                        }
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !root_seen {
            return Err(BuildError::ContentTypesRoot(String::new()));
        }
        Ok(types)
    }

    /// Extension lookups are case insensitive, as OPC requires
    pub fn default_for(&self, extension: &str) -> Option<&str> {
        self.defaults
            .get(&extension.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn override_for(&self, part_name: &str) -> Option<&str> {
        let normalised = if part_name.starts_with('/') {
            part_name.to_owned()
        } else {
            format!("/{part_name}")
        };
        self.overrides.get(&normalised).map(String::as_str)
    }

    pub fn content_type_for(&self, part_name: &str) -> Option<&str> {
        self.override_for(part_name).or_else(|| {
            part_name
                .rsplit_once('.')
                .and_then(|(_, ext)| self.default_for(ext))
        })
    }

    pub fn defaults(&self) -> impl Iterator<Item = (&str, &str)> {
        self.defaults.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// How many `Default` elements name this extension. Anything above one is a broken package.
    pub fn default_count(&self, extension: &str) -> usize {
        self.occurrences
            .get(&extension.to_ascii_lowercase())
            .copied()
            .unwrap_or_default()
    }
}

/// Append a `Default` element for `extension` to the content types part.
///
/// Everything already in the part is streamed across untouched. If the extension is already
/// mapped the source is returned as-is, so a package never ends up with two mappings for the
/// same extension.
pub fn register_default(source: &[u8], extension: &str, content_type: &str) -> BuildResult<Vec<u8>> {
    let existing = ContentTypes::parse(source)?;
    if existing.default_for(extension).is_some() {
        tracing::debug!("content type for .{extension} already registered");
        return Ok(source.to_vec());
    }

    let mut reader = Reader::from_reader(source);
    let mut writer = Writer::new(Vec::with_capacity(source.len() + 128));
    let mut depth = 0_usize;
    let mut prefix = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if depth == 0 {
                    prefix = element_prefix(&e);
                }
                depth += 1;
                writer.write_event(Event::Start(e))?;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    writer.write_event(Event::Empty(default_element(
                        &prefix,
                        extension,
                        content_type,
                    )))?;
                }
                writer.write_event(Event::End(e))?;
            }
            // A `<Types/>` root with nothing in it
            Event::Empty(e) if depth == 0 => {
                prefix = element_prefix(&e);
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                writer.write_event(Event::Start(e))?;
                writer.write_event(Event::Empty(default_element(
                    &prefix,
                    extension,
                    content_type,
                )))?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            Event::Eof => break,
            e => writer.write_event(e)?,
        }
    }

    Ok(writer.into_inner())
}

/// The MIME type to register for a ribbon image, keyed on its file extension
pub fn image_content_type(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

fn element_prefix(e: &BytesStart) -> String {
    e.name()
        .prefix()
        .map(|p| format!("{}:", String::from_utf8_lossy(p.as_ref())))
        .unwrap_or_default()
}

fn default_element<'a>(prefix: &str, extension: &'a str, content_type: &'a str) -> BytesStart<'a> {
    let mut element = BytesStart::new(format!("{prefix}Default"));
    element.push_attribute(("Extension", extension));
    element.push_attribute(("ContentType", content_type));
    element
}
