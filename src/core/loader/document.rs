//! Property document parser
//!
//! Streams a decoded document with `quick-xml` and collects its properties in
//! document order. `xi:include` targets are parsed recursively and spliced in
//! place; an unresolvable include contributes its `xi:fallback` content
//! instead.

use super::encoding;
use super::entities::{parse_doctype, EntityDecl};
use super::ParsedProperty;
use crate::adapters::resource::{Fetched, ResourceFetcher};
use crate::domain::{Result, StrataError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// Includes nested deeper than this are rejected rather than followed
pub const MAX_INCLUDE_NESTING: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Name,
    Value,
    Final,
    Source,
}

#[derive(Debug, Default)]
struct PropertyDraft {
    depth: usize,
    name: Option<String>,
    value: Option<String>,
    is_final: bool,
    sources: Vec<String>,
}

#[derive(Debug)]
struct FieldDraft {
    depth: usize,
    kind: FieldKind,
    text: String,
}

#[derive(Debug)]
struct PendingInclude {
    depth: usize,
    href: String,
    fallback_seen: bool,
}

/// Parses one document and its includes
pub(crate) struct DocumentParser<'a> {
    fetcher: &'a ResourceFetcher,
    top_locator: &'a str,
}

impl<'a> DocumentParser<'a> {
    /// `top_locator` is recorded as the provenance of every property,
    /// including those that arrive through includes.
    pub fn new(fetcher: &'a ResourceFetcher, top_locator: &'a str) -> Self {
        Self {
            fetcher,
            top_locator,
        }
    }

    pub fn parse(&self, doc: &Fetched, nesting: usize, out: &mut Vec<ParsedProperty>) -> Result<()> {
        if nesting > MAX_INCLUDE_NESTING {
            return Err(StrataError::parse(
                &doc.locator,
                format!("includes nested deeper than {MAX_INCLUDE_NESTING} levels"),
            ));
        }

        let text = encoding::decode(&doc.bytes, &doc.locator)?;
        let mut reader = Reader::from_str(&text);
        reader.trim_text(false);

        let mut entities: HashMap<String, String> = HashMap::new();
        let mut depth = 0usize;
        let mut skip_until: Option<usize> = None;
        let mut root_seen = false;
        let mut property: Option<PropertyDraft> = None;
        let mut field: Option<FieldDraft> = None;
        let mut includes: Vec<PendingInclude> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                StrataError::parse(
                    &doc.locator,
                    format!("{e} at position {}", reader.buffer_position()),
                )
            })?;

            match event {
                Event::Start(e) => {
                    depth += 1;
                    if skip_until.is_some() {
                        continue;
                    }
                    if !root_seen {
                        self.check_root(&e, doc)?;
                        root_seen = true;
                        continue;
                    }
                    match e.local_name().as_ref() {
                        b"include" => {
                            let href = self.href(&e, doc, &entities)?;
                            if self.splice_include(&href, doc, nesting, out)? {
                                skip_until = Some(depth);
                            } else {
                                includes.push(PendingInclude {
                                    depth,
                                    href,
                                    fallback_seen: false,
                                });
                            }
                        }
                        b"fallback" => match includes.last_mut() {
                            Some(inc) if inc.depth + 1 == depth => inc.fallback_seen = true,
                            _ => {
                                return Err(StrataError::parse(
                                    &doc.locator,
                                    "xi:fallback outside of xi:include",
                                ))
                            }
                        },
                        b"property" if property.is_none() => {
                            let mut draft = PropertyDraft {
                                depth,
                                ..PropertyDraft::default()
                            };
                            self.read_property_attributes(&e, doc, &entities, &mut draft)?;
                            property = Some(draft);
                        }
                        local => {
                            let opens_field = field.is_none()
                                && property.as_ref().is_some_and(|p| p.depth + 1 == depth);
                            if opens_field {
                                field = field_kind(local).map(|kind| FieldDraft {
                                    depth,
                                    kind,
                                    text: String::new(),
                                });
                            }
                        }
                    }
                }
                Event::Empty(e) => {
                    if skip_until.is_some() {
                        continue;
                    }
                    if !root_seen {
                        self.check_root(&e, doc)?;
                        root_seen = true;
                        continue;
                    }
                    match e.local_name().as_ref() {
                        b"include" => {
                            let href = self.href(&e, doc, &entities)?;
                            if !self.splice_include(&href, doc, nesting, out)? {
                                return Err(missing_include(&href, doc));
                            }
                        }
                        // An empty fallback skips a missing target.
                        b"fallback" => match includes.last_mut() {
                            Some(inc) if inc.depth == depth => inc.fallback_seen = true,
                            _ => {
                                return Err(StrataError::parse(
                                    &doc.locator,
                                    "xi:fallback outside of xi:include",
                                ))
                            }
                        },
                        b"property" if property.is_none() => {
                            let mut draft = PropertyDraft::default();
                            self.read_property_attributes(&e, doc, &entities, &mut draft)?;
                            self.finish_property(draft, out);
                        }
                        local => {
                            if field.is_none() {
                                let draft = property.as_mut().filter(|p| p.depth == depth);
                                if let (Some(draft), Some(kind)) = (draft, field_kind(local)) {
                                    apply_field(draft, kind, String::new());
                                }
                            }
                        }
                    }
                }
                Event::End(_) => {
                    if let Some(target) = skip_until {
                        if depth == target {
                            skip_until = None;
                        }
                        depth = depth.saturating_sub(1);
                        continue;
                    }
                    if field.as_ref().is_some_and(|f| f.depth == depth) {
                        if let (Some(f), Some(draft)) = (field.take(), property.as_mut()) {
                            apply_field(draft, f.kind, f.text);
                        }
                    } else if property.as_ref().is_some_and(|p| p.depth == depth) {
                        if let Some(draft) = property.take() {
                            self.finish_property(draft, out);
                        }
                    } else if includes.last().is_some_and(|i| i.depth == depth) {
                        if let Some(inc) = includes.pop() {
                            if !inc.fallback_seen {
                                return Err(missing_include(&inc.href, doc));
                            }
                        }
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Text(t) => {
                    if skip_until.is_some() {
                        continue;
                    }
                    if let Some(f) = field.as_mut() {
                        let text = t
                            .unescape_with(|name| entities.get(name).map(String::as_str))
                            .map_err(|e| StrataError::parse(&doc.locator, e.to_string()))?;
                        f.text.push_str(&text);
                    }
                }
                Event::CData(c) => {
                    if skip_until.is_some() {
                        continue;
                    }
                    if let Some(f) = field.as_mut() {
                        let text = std::str::from_utf8(&c)
                            .map_err(|e| StrataError::parse(&doc.locator, e.to_string()))?;
                        f.text.push_str(text);
                    }
                }
                Event::DocType(d) => {
                    let doctype = std::str::from_utf8(&d)
                        .map_err(|e| StrataError::parse(&doc.locator, e.to_string()))?;
                    for decl in parse_doctype(doctype, &doc.locator)? {
                        let (name, text) = self.expand_entity(decl, doc)?;
                        entities.entry(name).or_insert(text);
                    }
                }
                Event::Eof => break,
                // Comments, processing instructions and the declaration carry no properties.
                _ => {}
            }
        }

        if !root_seen {
            return Err(StrataError::parse(&doc.locator, "document has no root element"));
        }
        Ok(())
    }

    fn check_root(&self, e: &BytesStart<'_>, doc: &Fetched) -> Result<()> {
        if e.local_name().as_ref() == b"configuration" {
            Ok(())
        } else {
            Err(StrataError::parse(
                &doc.locator,
                format!(
                    "bad document: top-level element <{}> is not <configuration>",
                    String::from_utf8_lossy(e.name().as_ref())
                ),
            ))
        }
    }

    /// Parses the include target in place; `false` if it could not be opened
    fn splice_include(
        &self,
        href: &str,
        doc: &Fetched,
        nesting: usize,
        out: &mut Vec<ParsedProperty>,
    ) -> Result<bool> {
        let target = match self.fetcher.fetch_reference(href, doc.base.as_ref()) {
            Ok(target) => target,
            Err(e) => {
                tracing::debug!(href, document = %doc.locator, error = %e, "Include target unavailable");
                None
            }
        };
        match target {
            Some(target) => {
                tracing::debug!(href, target = %target.locator, document = %doc.locator, "Following include");
                self.parse(&target, nesting + 1, out)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn href(
        &self,
        e: &BytesStart<'_>,
        doc: &Fetched,
        entities: &HashMap<String, String>,
    ) -> Result<String> {
        attributes(e, doc, entities)?
            .into_iter()
            .find(|(k, _)| k == "href")
            .map(|(_, v)| v)
            .ok_or_else(|| StrataError::parse(&doc.locator, "xi:include without href"))
    }

    fn read_property_attributes(
        &self,
        e: &BytesStart<'_>,
        doc: &Fetched,
        entities: &HashMap<String, String>,
        draft: &mut PropertyDraft,
    ) -> Result<()> {
        for (key, value) in attributes(e, doc, entities)? {
            if let Some(kind) = field_kind(key.as_bytes()) {
                apply_field(draft, kind, value);
            }
        }
        Ok(())
    }

    fn finish_property(&self, draft: PropertyDraft, out: &mut Vec<ParsedProperty>) {
        let name = match draft.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                tracing::debug!(document = %self.top_locator, "Skipping property without a name");
                return;
            }
        };
        let value = draft
            .value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let mut sources = draft.sources;
        sources.push(self.top_locator.to_string());

        out.push(ParsedProperty {
            name,
            value,
            is_final: draft.is_final,
            sources,
        });
    }

    fn expand_entity(&self, decl: EntityDecl, doc: &Fetched) -> Result<(String, String)> {
        match decl {
            EntityDecl::Literal { name, text } => Ok((name, text)),
            EntityDecl::External { name, uri } => {
                let target = self
                    .fetcher
                    .fetch_reference(&uri, doc.base.as_ref())?
                    .ok_or_else(|| {
                        StrataError::ResourceUnavailable(format!(
                            "entity '{name}' in {}: {uri} not found",
                            doc.locator
                        ))
                    })?;
                let text = encoding::decode(&target.bytes, &target.locator)?;
                Ok((name, text))
            }
        }
    }
}

fn field_kind(local: &[u8]) -> Option<FieldKind> {
    match local {
        b"name" => Some(FieldKind::Name),
        b"value" => Some(FieldKind::Value),
        b"final" => Some(FieldKind::Final),
        b"source" => Some(FieldKind::Source),
        _ => None,
    }
}

fn apply_field(draft: &mut PropertyDraft, kind: FieldKind, text: String) {
    match kind {
        FieldKind::Name => draft.name = Some(text.trim().to_string()),
        FieldKind::Value => draft.value = Some(text),
        FieldKind::Final => draft.is_final = text.trim().eq_ignore_ascii_case("true"),
        FieldKind::Source => {
            let source = text.trim();
            if !source.is_empty() {
                draft.sources.push(source.to_string());
            }
        }
    }
}

fn attributes(
    e: &BytesStart<'_>,
    doc: &Fetched,
    entities: &HashMap<String, String>,
) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| StrataError::parse(&doc.locator, err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value_with(|name| entities.get(name).map(String::as_str))
            .map_err(|err| StrataError::parse(&doc.locator, err.to_string()))?;
        out.push((key, value.into_owned()));
    }
    Ok(out)
}

fn missing_include(href: &str, doc: &Fetched) -> StrataError {
    StrataError::ResourceUnavailable(format!(
        "include {href} in {} could not be resolved and has no fallback",
        doc.locator
    ))
}
