//! `.ts` document writer, the inverse of the reader.

use std::io::Write;

use xml::writer::{
    EmitterConfig,
    EventWriter,
    XmlEvent,
};

use super::error::CatalogError;
use super::model::{
    Catalog,
    Message,
    Translation,
};

/// XML declaration and doctype Qt Linguist writes.
const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n";
/// One indentation level.
const INDENT: &str = "    ";

/// Emits a catalog in the layout Qt Linguist writes.
///
/// Indentation is written by hand: the emitter's own indentation would put
/// whitespace inside text that contains `<byte>` elements.
struct TsWriter<W: Write> {
    /// Output event stream
    events: EventWriter<W>,
}

impl<W: Write> TsWriter<W> {
    /// Writes the declaration and sets up the emitter.
    fn new(mut sink: W) -> Result<Self, CatalogError> {
        sink.write_all(DECLARATION.as_bytes()).map_err(xml::writer::Error::from)?;
        let events = EmitterConfig::new()
            .perform_indent(false)
            .write_document_declaration(false)
            .create_writer(sink);
        Ok(Self { events })
    }

    /// Writes the root element and everything in it.
    fn write_catalog(mut self, catalog: &Catalog) -> Result<(), CatalogError> {
        let header = catalog.header();
        let mut root = XmlEvent::start_element("TS");
        if let Some(version) = &header.version {
            root = root.attr("version", version);
        }
        if let Some(language) = &header.language {
            root = root.attr("language", language.as_str());
        }
        if let Some(source_language) = &header.source_language {
            root = root.attr("sourcelanguage", source_language.as_str());
        }
        self.events.write(root)?;

        for context in catalog.contexts() {
            self.newline(0)?;
            self.events.write(XmlEvent::start_element("context"))?;
            self.newline(1)?;
            self.text_element("name", &context.name)?;
            for message in &context.messages {
                self.newline(1)?;
                self.write_message(message)?;
            }
            self.newline(0)?;
            self.events.write(XmlEvent::end_element())?;
        }

        self.newline(0)?;
        self.events.write(XmlEvent::end_element())?;
        self.events.into_inner().write_all(b"\n").map_err(xml::writer::Error::from)?;
        Ok(())
    }

    /// Writes one `<message>` with its metadata.
    fn write_message(&mut self, message: &Message) -> Result<(), CatalogError> {
        let start = XmlEvent::start_element("message");
        self.events.write(if message.is_numerus() { start.attr("numerus", "yes") } else { start })?;

        for location in &message.locations {
            self.newline(2)?;
            let line = location.line.map(|line| line.to_string());
            let mut element = XmlEvent::start_element("location");
            if let Some(filename) = &location.filename {
                element = element.attr("filename", filename);
            }
            if let Some(line) = &line {
                element = element.attr("line", line);
            }
            self.events.write(element)?;
            self.events.write(XmlEvent::end_element())?;
        }

        self.newline(2)?;
        self.text_element("source", &message.source)?;
        if let Some(old_source) = &message.old_source {
            self.newline(2)?;
            self.text_element("oldsource", old_source)?;
        }
        if !message.comment.is_empty() {
            self.newline(2)?;
            self.text_element("comment", &message.comment)?;
        }
        if let Some(extra_comment) = &message.extra_comment {
            self.newline(2)?;
            self.text_element("extracomment", extra_comment)?;
        }
        if let Some(translator_comment) = &message.translator_comment {
            self.newline(2)?;
            self.text_element("translatorcomment", translator_comment)?;
        }

        if let Some(translation) = &message.translation {
            self.newline(2)?;
            self.write_translation(translation, message)?;
        }

        self.newline(1)?;
        self.events.write(XmlEvent::end_element())?;
        Ok(())
    }

    /// `<translation>` with the message's `type` attribute.
    fn write_translation(&mut self, translation: &Translation, message: &Message) -> Result<(), CatalogError> {
        let start = XmlEvent::start_element("translation");
        self.events.write(match message.status.type_attr() {
            Some(kind) => start.attr("type", kind),
            None => start,
        })?;
        match translation {
            Translation::Text(text) => self.text(text)?,
            Translation::Numerus(forms) => {
                for form in forms {
                    self.newline(3)?;
                    self.text_element("numerusform", form)?;
                }
                self.newline(2)?;
            }
        }
        self.events.write(XmlEvent::end_element())?;
        Ok(())
    }

    /// `<tag>text</tag>` on its own line.
    fn text_element(&mut self, tag: &str, text: &str) -> Result<(), CatalogError> {
        self.events.write(XmlEvent::start_element(tag))?;
        self.text(text)?;
        self.events.write(XmlEvent::end_element())?;
        Ok(())
    }

    /// Writes text, encoding characters XML 1.0 cannot carry (and `\r`, which
    /// parsers fold into `\n`) as `<byte value="xNN"/>`.
    fn text(&mut self, text: &str) -> Result<(), CatalogError> {
        let mut rest = text;
        while let Some(position) = rest.find(needs_byte_element) {
            let (plain, tail) = rest.split_at(position);
            if !plain.is_empty() {
                self.events.write(XmlEvent::characters(plain))?;
            }
            let mut chars = tail.chars();
            if let Some(special) = chars.next() {
                let value = format!("x{:x}", u32::from(special));
                self.events.write(XmlEvent::start_element("byte").attr("value", &value))?;
                self.events.write(XmlEvent::end_element())?;
            }
            rest = chars.as_str();
        }
        if !rest.is_empty() {
            self.events.write(XmlEvent::characters(rest))?;
        }
        Ok(())
    }

    /// Line break followed by `depth` levels of indentation.
    fn newline(&mut self, depth: usize) -> Result<(), CatalogError> {
        let whitespace = format!("\n{}", INDENT.repeat(depth));
        self.events.write(XmlEvent::characters(&whitespace))?;
        Ok(())
    }
}

/// Characters XML 1.0 cannot carry as text.
fn needs_byte_element(c: char) -> bool {
    c < ' ' && c != '\t' && c != '\n'
}

impl Catalog {
    /// Serializes the catalog as a `.ts` document.
    ///
    /// Vanished messages, locations and comments are written too, so reading
    /// the output yields the same catalog.
    ///
    /// # Errors
    /// Returns [`CatalogError::Write`] if the sink fails.
    pub fn write_ts<W: Write>(&self, sink: W) -> Result<(), CatalogError> {
        TsWriter::new(sink)?.write_catalog(self)
    }

    /// Serializes the catalog into a string.
    ///
    /// # Errors
    /// Returns [`CatalogError::Write`] if serialization fails.
    pub fn to_ts_string(&self) -> Result<String, CatalogError> {
        let mut buffer = Vec::new();
        self.write_ts(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
