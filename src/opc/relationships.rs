//! `.rels` parts: typed links from the package, or from a part, to other parts.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::consts;
use crate::error::{BuildError, BuildResult};
use crate::opc::attribute;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// An ordered set of relationships with unique ids
#[derive(Debug, Default)]
pub struct Relationships {
    items: Vec<Relationship>,
}

impl Relationships {
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, id: &str, rel_type: &str, target: &str) -> BuildResult<()> {
        if self.contains_id(id) {
            return Err(BuildError::DuplicateRelationshipId(id.to_owned()));
        }
        self.items.push(Relationship {
            id: id.to_owned(),
            rel_type: rel_type.to_owned(),
            target: target.to_owned(),
        });
        Ok(())
    }

    /// Add a relationship under a freshly generated id, returning that id
    pub fn push_generated(&mut self, prefix: &str, rel_type: &str, target: &str) -> BuildResult<String> {
        let id = self.generate_id(prefix);
        self.push(&id, rel_type, target)?;
        Ok(id)
    }

    /// A random id of `prefix` followed by hex digits, that is not already used in this set
    pub fn generate_id(&self, prefix: &str) -> String {
        loop {
            let bytes: [u8; consts::UI_REL_ID_BYTES] = rand::random();
            let id = format!("{prefix}{}", const_hex::encode(bytes));
            if !self.contains_id(&id) {
                return id;
            }
        }
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.items.iter().any(|r| r.id == id)
    }

    pub fn by_type<'a>(&'a self, rel_type: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.items.iter().filter(move |r| r.rel_type == rel_type)
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn parse(xml: &[u8]) -> BuildResult<Self> {
        let mut reader = Reader::from_reader(xml);
        let mut rels = Self::new();
        let mut root_seen = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => {
                    let local = e.local_name();
                    if !root_seen {
                        if local.as_ref() != b"Relationships" {
                            return Err(BuildError::Relationship(format!(
                                "expected a Relationships root, found {}",
                                String::from_utf8_lossy(e.name().as_ref())
                            )));
                        }
                        root_seen = true;
                    } else if local.as_ref() == b"Relationship" {
                        let id = required(&e, b"Id")?;
                        let rel_type = required(&e, b"Type")?;
                        let target = required(&e, b"Target")?;
                        rels.push(&id, &rel_type, &target)?;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !root_seen {
            return Err(BuildError::Relationship(
                "no Relationships element found".to_owned(),
            ));
        }
        Ok(rels)
    }

    pub fn to_xml(&self) -> BuildResult<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

        let mut root = BytesStart::new("Relationships");
        root.push_attribute(("xmlns", consts::RELATIONSHIPS_NS));
        writer.write_event(Event::Start(root))?;

        for rel in &self.items {
            let mut element = BytesStart::new("Relationship");
            element.push_attribute(("Id", rel.id.as_str()));
            element.push_attribute(("Type", rel.rel_type.as_str()));
            element.push_attribute(("Target", rel.target.as_str()));
            writer.write_event(Event::Empty(element))?;
        }

        writer.write_event(Event::End(BytesEnd::new("Relationships")))?;
        Ok(writer.into_inner())
    }
}

fn required(e: &BytesStart, key: &[u8]) -> BuildResult<String> {
    attribute(e, key)?.ok_or_else(|| {
        BuildError::Relationship(format!(
            "Relationship element missing its {} attribute",
            String::from_utf8_lossy(key)
        ))
    })
}
