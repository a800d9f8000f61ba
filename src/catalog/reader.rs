//! `.ts` (Qt Linguist) document reader.
//!
//! Reading is all-or-nothing: any structural problem yields
//! [`CatalogError::Malformed`] and no catalog.

use std::fs::File;
use std::io::{
    BufReader,
    Read,
};
use std::path::Path;

use xml::attribute::OwnedAttribute;
use xml::common::Position;
use xml::reader::{
    EventReader,
    ParserConfig,
    XmlEvent,
};

use super::error::CatalogError;
use super::model::{
    Catalog,
    CatalogBuilder,
    CatalogHeader,
    Message,
    Translation,
};
use crate::types::{
    LocaleCode,
    MessageStatus,
    SourceLocation,
};

/// Pull reader over a `.ts` document.
struct TsReader<R: Read> {
    /// Underlying XML event stream
    events: EventReader<R>,
}

impl<R: Read> TsReader<R> {
    /// Wraps `source` in a whitespace-preserving pull parser.
    fn new(source: R) -> Self {
        // Source and translation text is significant down to the last space.
        let events = ParserConfig::new()
            .trim_whitespace(false)
            .whitespace_to_characters(true)
            .cdata_to_characters(true)
            .coalesce_characters(true)
            .ignore_comments(true)
            .create_reader(source);
        Self { events }
    }

    /// 1-based line of the last event.
    fn line(&self) -> u64 {
        self.events.position().row + 1
    }

    /// Next event, parse errors mapped to `Malformed`.
    fn next(&mut self) -> Result<XmlEvent, CatalogError> {
        self.events
            .next()
            .map_err(|e| CatalogError::malformed(Some(e.position().row + 1), e.to_string()))
    }

    /// Reads up to and including the `<TS>` start tag.
    fn read_root(&mut self) -> Result<CatalogHeader, CatalogError> {
        loop {
            match self.next()? {
                XmlEvent::StartElement { name, attributes, .. } => {
                    if name.local_name != "TS" {
                        return Err(CatalogError::malformed(
                            Some(self.line()),
                            format!("expected <TS> root element, found <{}>", name.local_name),
                        ));
                    }
                    return Ok(CatalogHeader {
                        version: attr(&attributes, "version").map(str::to_string),
                        language: attr(&attributes, "language").map(LocaleCode::new),
                        source_language: attr(&attributes, "sourcelanguage").map(LocaleCode::new),
                    });
                }
                XmlEvent::EndDocument => {
                    return Err(CatalogError::malformed(None, "document has no <TS> root element"));
                }
                _ => {}
            }
        }
    }

    /// Reads everything after the root start tag.
    fn read_catalog(mut self, header: CatalogHeader) -> Result<Catalog, CatalogError> {
        let mut builder = CatalogBuilder::new(header);

        loop {
            match self.next()? {
                XmlEvent::StartElement { name, .. } if name.local_name == "context" => {
                    self.read_context(&mut builder)?;
                }
                XmlEvent::StartElement { name, .. } => {
                    tracing::debug!(element = %name.local_name, "Skipping unknown element in <TS>");
                    self.skip_element()?;
                }
                XmlEvent::EndElement { .. } => break,
                _ => {}
            }
        }

        // Trailing garbage after </TS> still makes the document malformed.
        loop {
            if let XmlEvent::EndDocument = self.next()? {
                break;
            }
        }

        Ok(builder.build())
    }

    /// Reads one `<context>` into `builder`.
    fn read_context(&mut self, builder: &mut CatalogBuilder) -> Result<(), CatalogError> {
        let start_line = self.line();
        let mut name: Option<String> = None;
        let mut messages = Vec::new();

        loop {
            match self.next()? {
                XmlEvent::StartElement { name: tag, attributes, .. } => {
                    match tag.local_name.as_str() {
                        "name" => name = Some(self.read_text()?),
                        "message" => messages.push(self.read_message(&attributes)?),
                        other => {
                            tracing::debug!(element = %other, "Skipping unknown element in <context>");
                            self.skip_element()?;
                        }
                    }
                }
                XmlEvent::EndElement { .. } => break,
                _ => {}
            }
        }

        let Some(name) = name else {
            return Err(CatalogError::malformed(Some(start_line), "<context> without <name>"));
        };
        if name.is_empty() {
            return Err(CatalogError::malformed(Some(start_line), "<context> with an empty <name>"));
        }

        builder.context(&name);
        for message in messages {
            builder.message(&name, message);
        }
        Ok(())
    }

    /// Reads one `<message>`.
    fn read_message(&mut self, attributes: &[OwnedAttribute]) -> Result<Message, CatalogError> {
        let start_line = self.line();
        let numerus = attr(attributes, "numerus") == Some("yes");
        let mut source: Option<String> = None;
        let mut message = Message { numerus, ..Message::default() };

        loop {
            match self.next()? {
                XmlEvent::StartElement { name, attributes, .. } => match name.local_name.as_str() {
                    "location" => {
                        message.locations.push(self.read_location(&attributes));
                        self.skip_element()?;
                    }
                    "source" => source = Some(self.read_text()?),
                    "oldsource" => message.old_source = Some(self.read_text()?),
                    "comment" => message.comment = self.read_text()?,
                    "extracomment" => message.extra_comment = Some(self.read_text()?),
                    "translatorcomment" => message.translator_comment = Some(self.read_text()?),
                    "translation" => {
                        message.status = translation_status(attr(&attributes, "type"));
                        message.translation = Some(self.read_translation(numerus)?);
                    }
                    other => {
                        tracing::debug!(element = %other, "Skipping unknown element in <message>");
                        self.skip_element()?;
                    }
                },
                XmlEvent::EndElement { .. } => break,
                _ => {}
            }
        }

        let Some(source) = source else {
            return Err(CatalogError::malformed(Some(start_line), "<message> without <source>"));
        };
        message.source = source;
        Ok(message)
    }

    /// `<location>` attributes. A bad line number is dropped.
    fn read_location(&self, attributes: &[OwnedAttribute]) -> SourceLocation {
        let line = attr(attributes, "line").and_then(|value| {
            value.parse().map_or_else(
                |_| {
                    tracing::warn!(line = self.line(), value, "Ignoring invalid location line");
                    None
                },
                Some,
            )
        });
        SourceLocation { filename: attr(attributes, "filename").map(str::to_string), line }
    }

    /// Reads `<translation>` content: plain text, or `<numerusform>` children
    /// when the message is numerus.
    fn read_translation(&mut self, numerus: bool) -> Result<Translation, CatalogError> {
        let mut text = String::new();
        let mut forms = Vec::new();

        loop {
            match self.next()? {
                XmlEvent::Characters(chunk) => text.push_str(&chunk),
                XmlEvent::StartElement { name, .. } if name.local_name == "numerusform" => {
                    forms.push(self.read_text()?);
                }
                XmlEvent::StartElement { name, attributes, .. } if name.local_name == "byte" => {
                    text.push_str(&self.read_byte(&attributes)?);
                }
                XmlEvent::StartElement { .. } => self.skip_element()?,
                XmlEvent::EndElement { .. } => break,
                _ => {}
            }
        }

        if numerus {
            if forms.is_empty() && !text.trim().is_empty() {
                forms.push(text);
            }
            Ok(Translation::Numerus(forms))
        } else {
            Ok(Translation::Text(text))
        }
    }

    /// Reads the text content of the current element, byte-exact.
    fn read_text(&mut self) -> Result<String, CatalogError> {
        let mut text = String::new();

        loop {
            match self.next()? {
                XmlEvent::Characters(chunk) => text.push_str(&chunk),
                XmlEvent::StartElement { name, attributes, .. } if name.local_name == "byte" => {
                    text.push_str(&self.read_byte(&attributes)?);
                }
                XmlEvent::StartElement { .. } => self.skip_element()?,
                XmlEvent::EndElement { .. } => return Ok(text),
                _ => {}
            }
        }
    }

    /// Decodes `<byte value="..."/>`, used for characters XML cannot carry.
    /// The value is decimal, or hexadecimal with an `x` or `0x` prefix.
    fn read_byte(&mut self, attributes: &[OwnedAttribute]) -> Result<String, CatalogError> {
        let line = self.line();
        let value = attr(attributes, "value")
            .ok_or_else(|| CatalogError::malformed(Some(line), "<byte> without value"))?;
        let (digits, radix) = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix('x'))
            .map_or((value, 10), |hex| (hex, 16));
        let decoded = u32::from_str_radix(digits, radix)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| CatalogError::malformed(Some(line), format!("invalid <byte> value '{value}'")))?;
        self.skip_element()?;

        Ok(if decoded == '\0' { String::new() } else { decoded.to_string() })
    }

    /// Consumes events up to the end tag of the element just started.
    fn skip_element(&mut self) -> Result<(), CatalogError> {
        let mut depth = 1_usize;
        while depth > 0 {
            match self.next()? {
                XmlEvent::StartElement { .. } => depth += 1,
                XmlEvent::EndElement { .. } => depth -= 1,
                XmlEvent::EndDocument => {
                    return Err(CatalogError::malformed(Some(self.line()), "unexpected end of document"));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Attribute value by local name. Empty values count as absent.
fn attr<'a>(attributes: &'a [OwnedAttribute], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attribute| attribute.name.local_name == key)
        .map(|attribute| attribute.value.as_str())
        .filter(|value| !value.is_empty())
}

/// Unknown `type` values are read as finished, like Qt Linguist does.
fn translation_status(value: Option<&str>) -> MessageStatus {
    MessageStatus::from_type_attr(value).unwrap_or_else(|| {
        tracing::warn!(?value, "Unknown translation type, treating as finished");
        MessageStatus::Finished
    })
}

impl Catalog {
    /// Parses a catalog from `.ts` text.
    ///
    /// # Errors
    /// Returns [`CatalogError::Malformed`] if the document is not a valid catalog.
    pub fn from_ts_str(text: &str) -> Result<Self, CatalogError> {
        Self::from_ts_reader(text.as_bytes())
    }

    /// Parses a catalog from any `.ts` byte stream.
    ///
    /// # Errors
    /// Returns [`CatalogError::Malformed`] if the document is not a valid catalog.
    pub fn from_ts_reader<R: Read>(source: R) -> Result<Self, CatalogError> {
        let mut reader = TsReader::new(source);
        let header = reader.read_root()?;
        reader.read_catalog(header)
    }

    /// Loads a catalog file.
    ///
    /// # Errors
    /// Returns [`CatalogError::Io`] if the file cannot be read and
    /// [`CatalogError::Malformed`] (carrying the path) if it is not a valid catalog.
    pub fn load_file(path: &Path) -> Result<Self, CatalogError> {
        tracing::debug!(path = %path.display(), "Loading catalog");

        let file = File::open(path)
            .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
        let catalog =
            Self::from_ts_reader(BufReader::new(file)).map_err(|e| e.with_path(path))?;

        let stats = catalog.stats();
        tracing::debug!(
            path = %path.display(),
            locale = %catalog.locale(),
            contexts = stats.contexts,
            finished = stats.finished,
            unfinished = stats.unfinished,
            vanished = stats.vanished,
            "Catalog loaded"
        );
        Ok(catalog)
    }
}

/// Reads only the root element attributes of a catalog file.
///
/// # Errors
/// Returns [`CatalogError::Io`] or [`CatalogError::Malformed`] like
/// [`Catalog::load_file`], but only for problems before the root element.
pub fn read_header_file(path: &Path) -> Result<CatalogHeader, CatalogError> {
    let file =
        File::open(path).map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
    TsReader::new(BufReader::new(file)).read_root().map_err(|e| e.with_path(path))
}
