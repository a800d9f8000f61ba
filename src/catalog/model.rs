//! In-memory catalog model and lookup.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::plural::{
    numerus_form_index,
    substitute_count,
};
use crate::types::{
    LocaleCode,
    MessageStatus,
    SourceLocation,
};

/// Translated text of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Text(String),
    /// One entry per `<numerusform>`, in plural rule order.
    Numerus(Vec<String>),
}

impl Translation {
    /// Text used when the message is looked up without a count.
    #[must_use]
    pub fn singular(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Numerus(forms) => forms.first().map_or("", String::as_str),
        }
    }

    /// Form at `index`, clamped to the last form present.
    #[must_use]
    pub fn form(&self, index: usize) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Numerus(forms) => {
                forms.get(index).or_else(|| forms.last()).map_or("", String::as_str)
            }
        }
    }

    /// True if there is no translated text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Numerus(forms) => forms.iter().all(String::is_empty),
        }
    }

    /// False for a numerus translation without a single form.
    #[must_use]
    pub fn has_forms(&self) -> bool {
        !matches!(self, Self::Numerus(forms) if forms.is_empty())
    }
}

/// One `<message>` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Untranslated text; the lookup key. Stored byte-exact.
    pub source: String,
    /// Disambiguation comment; part of the lookup key, empty when absent.
    pub comment: String,
    /// `None` when the message has no `<translation>` element.
    pub translation: Option<Translation>,
    /// `numerus="yes"`, kept even when there is no translation.
    pub numerus: bool,
    pub status: MessageStatus,
    pub locations: Vec<SourceLocation>,
    pub old_source: Option<String>,
    pub extra_comment: Option<String>,
    pub translator_comment: Option<String>,
}

impl Message {
    #[must_use]
    pub fn new(source: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            translation: Some(Translation::Text(translation.into())),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_status(mut self, status: MessageStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.locations.push(location);
        self
    }

    /// Numerus message with the given forms.
    #[must_use]
    pub fn numerus(source: impl Into<String>, forms: Vec<String>) -> Self {
        Self {
            source: source.into(),
            translation: Some(Translation::Numerus(forms)),
            numerus: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_numerus(&self) -> bool {
        self.numerus || matches!(self.translation, Some(Translation::Numerus(_)))
    }

    /// Translation a lookup may return: present, and with at least one form
    /// when numerus.
    #[must_use]
    pub fn usable_translation(&self) -> Option<&Translation> {
        self.translation.as_ref().filter(|translation| translation.has_forms())
    }
}

/// A named group of messages for one UI component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub name: String,
    /// All messages in file order, vanished ones included.
    pub messages: Vec<Message>,
}

/// Messages of one context: source → comment → (context index, message index).
type ContextIndex = HashMap<String, HashMap<String, (usize, usize)>>;

/// Root element attributes of a `.ts` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogHeader {
    pub version: Option<String>,
    pub language: Option<LocaleCode>,
    pub source_language: Option<LocaleCode>,
}

impl CatalogHeader {
    #[must_use]
    pub fn new(language: LocaleCode) -> Self {
        Self { version: Some("2.1".to_string()), language: Some(language), source_language: None }
    }
}

/// Message counts of a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub contexts: usize,
    pub finished: usize,
    pub unfinished: usize,
    pub vanished: usize,
    /// Active messages whose translation is empty.
    pub untranslated: usize,
}

/// Immutable, per-locale translation catalog.
///
/// Built once by the reader (or a [`CatalogBuilder`]) and never mutated
/// afterwards. A language switch replaces the whole catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Root attributes as read
    header: CatalogHeader,
    /// Locale driving numerus selection
    locale: LocaleCode,
    /// Contexts in file order
    contexts: Vec<Context>,
    /// context name → source → comment → position.
    /// Only active messages are indexed; later duplicates overwrite earlier ones.
    index: HashMap<String, ContextIndex>,
}

impl Catalog {
    /// Catalog with no messages. Every lookup falls back to the source text.
    #[must_use]
    pub fn empty(locale: LocaleCode) -> Self {
        CatalogBuilder::new(CatalogHeader::new(locale)).build()
    }

    #[must_use]
    pub const fn header(&self) -> &CatalogHeader {
        &self.header
    }

    /// Locale this catalog translates into.
    #[must_use]
    pub const fn locale(&self) -> &LocaleCode {
        &self.locale
    }

    /// Replaces the locale used for numerus selection.
    /// The header is left as read.
    #[must_use]
    pub fn with_locale(mut self, locale: LocaleCode) -> Self {
        self.locale = locale;
        self
    }

    /// Contexts in order of first appearance.
    #[must_use]
    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    #[must_use]
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|context| context.name == name)
    }

    /// Active message for `(context, source, comment)`, if any.
    #[must_use]
    pub fn get(&self, context: &str, source: &str, comment: &str) -> Option<&Message> {
        let &(context_index, message_index) =
            self.index.get(context)?.get(source)?.get(comment)?;
        self.contexts.get(context_index)?.messages.get(message_index)
    }

    #[must_use]
    pub fn contains(&self, context: &str, source: &str) -> bool {
        self.get(context, source, "").is_some()
    }

    /// Translation of `source` in `context`, or `source` itself when there is
    /// no active message for it or the message has no translation.
    ///
    /// An explicitly empty translation is returned as `""`.
    #[must_use]
    pub fn lookup<'a>(&'a self, context: &str, source: &'a str) -> &'a str {
        self.lookup_disambiguated(context, source, "")
    }

    /// Like [`Catalog::lookup`], keyed by a disambiguation comment as well.
    /// Falls back to the message without a comment before falling back to
    /// `source`.
    #[must_use]
    pub fn lookup_disambiguated<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: &str,
    ) -> &'a str {
        self.find(context, source, comment).map_or(source, Translation::singular)
    }

    /// Numerus-aware lookup. `%n` in the result is replaced by `count`.
    #[must_use]
    pub fn lookup_plural(&self, context: &str, source: &str, comment: &str, count: u64) -> String {
        let text = self.find(context, source, comment).map_or(source, |translation| {
            translation.form(numerus_form_index(&self.locale, count))
        });
        substitute_count(text, count)
    }

    /// Usable translation for the exact key first, then for the same source
    /// without a comment.
    fn find(&self, context: &str, source: &str, comment: &str) -> Option<&Translation> {
        let translation_for =
            |comment: &str| self.get(context, source, comment).and_then(Message::usable_translation);
        translation_for(comment).or_else(|| if comment.is_empty() { None } else { translation_for("") })
    }

    /// Iterates `(context name, message)` over every message, vanished included.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.contexts.iter().flat_map(|context| {
            context.messages.iter().map(move |message| (context.name.as_str(), message))
        })
    }

    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats { contexts: self.contexts.len(), ..CatalogStats::default() };
        for (_, message) in self.messages() {
            match message.status {
                MessageStatus::Finished => stats.finished += 1,
                MessageStatus::Unfinished => stats.unfinished += 1,
                MessageStatus::Vanished => stats.vanished += 1,
            }
            if message.status.is_active() && message.translation.as_ref().is_none_or(Translation::is_empty) {
                stats.untranslated += 1;
            }
        }
        stats
    }
}

/// Accumulates contexts and messages, then freezes them into a [`Catalog`].
#[derive(Debug)]
pub struct CatalogBuilder {
    /// Root attributes
    header: CatalogHeader,
    /// Contexts collected so far
    contexts: Vec<Context>,
    /// Context name → position in `contexts`.
    positions: HashMap<String, usize>,
}

impl CatalogBuilder {
    #[must_use]
    pub fn new(header: CatalogHeader) -> Self {
        Self { header, contexts: Vec::new(), positions: HashMap::new() }
    }

    /// Registers a context. A repeated name reuses the existing context.
    pub fn context(&mut self, name: &str) -> &mut Self {
        self.context_index(name);
        self
    }

    /// Appends `message` to `context`, creating the context if needed.
    pub fn message(&mut self, context: &str, message: Message) -> &mut Self {
        let index = self.context_index(context);
        if let Some(context) = self.contexts.get_mut(index) {
            context.messages.push(message);
        }
        self
    }

    /// Position of `name` in `contexts`, appending a new context if needed.
    fn context_index(&mut self, name: &str) -> usize {
        match self.positions.entry(name.to_string()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let index = self.contexts.len();
                self.contexts.push(Context { name: name.to_string(), messages: Vec::new() });
                entry.insert(index);
                index
            }
        }
    }

    /// Builds the lookup index and returns the finished catalog.
    ///
    /// A catalog without a `language` attribute is treated as the source
    /// language (`en`).
    #[must_use]
    pub fn build(self) -> Catalog {
        let mut index: HashMap<String, ContextIndex> = HashMap::new();

        for (context_index, context) in self.contexts.iter().enumerate() {
            let by_source = index.entry(context.name.clone()).or_default();
            for (message_index, message) in context.messages.iter().enumerate() {
                if !message.status.is_active() {
                    continue;
                }
                let by_comment = by_source.entry(message.source.clone()).or_default();
                if by_comment.insert(message.comment.clone(), (context_index, message_index)).is_some() {
                    tracing::debug!(
                        context = %context.name,
                        source = %message.source,
                        "Duplicate message, the later entry wins"
                    );
                }
            }
        }

        let locale = self.header.language.clone().unwrap_or_else(|| LocaleCode::new("en"));

        Catalog { header: self.header, locale, contexts: self.contexts, index }
    }
}
