#![allow(clippy::doc_markdown)]
//! The modules declared in the PROJECT stream of a VBA project.
//!
//! The PROJECT stream is a text stream of `Key=Value` records, one per line, followed by
//! bracketed sections such as `[Host Extender Info]` and `[Workspace]`. Only the records ahead of
//! the first section describe the project itself:
//!
//! ```text
//! ID="{00000000-0000-0000-0000-000000000000}"
//! Document=Slide1/&H00000000
//! Module=Ribbon
//! Class=ChartBuilder
//! Name="VBAProject"
//! ```
//!
//! Specification can be found [here](https://learn.microsoft.com/en-us/openspecs/office_file_formats/ms-ovba/d88cb9d8-a475-423d-b370-cc0caaf78628)

use nom::Finish;

use crate::error::ProjectStructure;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleKind {
    Document,
    Standard,
    Class,
    Designer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub kind: ModuleKind,
}

#[derive(Debug, Default)]
pub struct Project {
    name: Option<String>,
    modules: Vec<Module>,
}

impl Project {
    pub fn parse(stream: &[u8]) -> Result<Self, ProjectStructure> {
        let (_, lines) = nom_parse::lines(stream)
            .finish()
            .map_err(|e| ProjectStructure::Record(e.input.to_vec()))?;

        let mut project = Self::default();
        for line in lines {
            let (key, value) = match line {
                nom_parse::Line::Record(key, value) => (key, value),
                nom_parse::Line::Section(_) => break,
                nom_parse::Line::Blank => continue,
            };
            let kind = match key {
                b"Document" => ModuleKind::Document,
                b"Module" => ModuleKind::Standard,
                b"Class" => ModuleKind::Class,
                b"BaseClass" => ModuleKind::Designer,
                b"Name" => {
                    project.name = Some(unquote(value));
                    continue;
                }
                _ => continue,
            };
            // Document modules carry their type library version after a slash
            let name = match kind {
                ModuleKind::Document => value.split(|&b| b == b'/').next().unwrap_or(value),
                _ => value,
            };
            project.modules.push(Module {
                name: module_identifier(name)?,
                kind,
            });
        }
        Ok(project)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Modules that were imported from source, i.e. not the ones PowerPoint creates itself
    pub fn code_modules(&self) -> impl Iterator<Item = &Module> {
        self.modules
            .iter()
            .filter(|m| m.kind != ModuleKind::Document)
    }
}

fn module_identifier(bytes: &[u8]) -> Result<String, ProjectStructure> {
    let invalid = || ProjectStructure::ModuleName(String::from_utf8_lossy(bytes).into_owned());
    let (_, name) = nom::combinator::all_consuming(nom_parse::module_identifier)(bytes)
        .finish()
        .map_err(|_| invalid())?;
    Ok(name)
}

/// Strip the surrounding quotes of a quoted value, un-doubling any embedded ones
fn unquote(value: &[u8]) -> String {
    let inner = value
        .strip_prefix(b"\"")
        .and_then(|v| v.strip_suffix(b"\""))
        .unwrap_or(value);
    String::from_utf8_lossy(inner).replace("\"\"", "\"")
}

mod nom_parse {
    use nom::{
        branch::alt,
        bytes::complete::{tag, take_till, take_till1, take_while1, take_while_m_n},
        character::{is_alphabetic, is_alphanumeric},
        combinator::{all_consuming, map, opt, recognize, value},
        multi::many0,
        sequence::{delimited, pair, separated_pair, terminated},
        IResult,
    };

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(super) enum Line<'a> {
        Record(&'a [u8], &'a [u8]),
        Section(&'a [u8]),
        Blank,
    }

    pub(super) fn lines(input: &[u8]) -> IResult<&[u8], Vec<Line<'_>>> {
        all_consuming(many0(alt((blank, section, record))))(input)
    }

    fn new_line(input: &[u8]) -> IResult<&[u8], &[u8]> {
        alt((tag("\r\n"), tag("\n\r"), tag("\n")))(input)
    }

    fn blank(input: &[u8]) -> IResult<&[u8], Line<'_>> {
        value(Line::Blank, new_line)(input)
    }

    fn section(input: &[u8]) -> IResult<&[u8], Line<'_>> {
        map(
            terminated(
                delimited(tag("["), take_till1(|c| c == b']' || is_eol(c)), tag("]")),
                opt(new_line),
            ),
            Line::Section,
        )(input)
    }

    fn record(input: &[u8]) -> IResult<&[u8], Line<'_>> {
        map(
            terminated(
                separated_pair(
                    take_while1(|c| c != b'=' && !is_eol(c)),
                    tag("="),
                    take_till(is_eol),
                ),
                opt(new_line),
            ),
            |(key, value)| Line::Record(key, value),
        )(input)
    }

    pub(super) fn module_identifier(input: &[u8]) -> IResult<&[u8], String> {
        map(
            recognize(pair(
                take_while_m_n(1, 1, is_alphabetic),
                take_while_m_n(0, 30, |b| is_alphanumeric(b) || b == b'_'),
            )),
            |s: &[u8]| String::from_utf8_lossy(s).into_owned(),
        )(input)
    }

    const fn is_eol(c: u8) -> bool {
        c == b'\r' || c == b'\n'
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn records_and_sections() {
            let (rest, lines) =
                lines(b"Module=Ribbon\r\nName=\"VBAProject\"\r\n\r\n[Workspace]\r\nRibbon=0, 0, 0, 0, C").unwrap();
            assert!(rest.is_empty());
            assert_eq!(
                lines,
                vec![
                    Line::Record(b"Module", b"Ribbon"),
                    Line::Record(b"Name", b"\"VBAProject\""),
                    Line::Blank,
                    Line::Section(b"Workspace"),
                    Line::Record(b"Ribbon", b"0, 0, 0, 0, C"),
                ]
            );
        }

        #[test]
        fn record_without_key() {
            assert!(lines(b"=oops\r\n").is_err());
        }

        #[test]
        fn identifier_too_long() {
            assert_eq!(
                module_identifier(b"A_really_really_long_string_that_is_more_than_31_characters"),
                Ok((
                    &b"t_is_more_than_31_characters"[..],
                    String::from("A_really_really_long_string_tha")
                ))
            );
        }

        #[test]
        fn identifier_leading_digit() {
            assert!(module_identifier(b"1Module").is_err());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM: &[u8] = b"ID=\"{5B5A3E1C-0C1B-4E4B-9F43-2F6A4E7D8C11}\"\r\n\
Document=Slide1/&H00000000\r\n\
Module=Ribbon\r\n\
Module=Helpers\r\n\
Class=ChartBuilder\r\n\
BaseClass=frmOptions\r\n\
Name=\"ChartBuilder\"\r\n\
HelpContextID=\"0\"\r\n\
VersionCompatible32=\"393222000\"\r\n\
CMG=\"3B39F1D5F5D5F5D5F5D5F5\"\r\n\
DPB=\"8E8C4462446244\"\r\n\
GC=\"2C2EE6F1E7F1E70E\"\r\n\
\r\n\
[Host Extender Info]\r\n\
&H00000001={3832D640-CF90-11CF-8E43-00A0C911005A};VBE;&H00000000\r\n\
\r\n\
[Workspace]\r\n\
Module=26, 26, 1123, 445, \r\n";

    #[test]
    fn modules_listed() {
        let project = Project::parse(STREAM).unwrap();
        assert_eq!(project.name(), Some("ChartBuilder"));
        assert_eq!(
            project.modules(),
            &[
                Module {
                    name: "Slide1".to_owned(),
                    kind: ModuleKind::Document
                },
                Module {
                    name: "Ribbon".to_owned(),
                    kind: ModuleKind::Standard
                },
                Module {
                    name: "Helpers".to_owned(),
                    kind: ModuleKind::Standard
                },
                Module {
                    name: "ChartBuilder".to_owned(),
                    kind: ModuleKind::Class
                },
                Module {
                    name: "frmOptions".to_owned(),
                    kind: ModuleKind::Designer
                },
            ]
        );
        assert_eq!(project.code_modules().count(), 4);
    }

    #[test]
    fn bad_module_name() {
        let res = Project::parse(b"Module=Not a name\r\n");
        assert_eq!(
            res.unwrap_err(),
            ProjectStructure::ModuleName("Not a name".to_owned())
        );
    }

    #[test]
    fn quoted_name() {
        let project = Project::parse(b"Name=\"My \"\"Best\"\" Project\"\r\n").unwrap();
        assert_eq!(project.name(), Some("My \"Best\" Project"));
    }
}
