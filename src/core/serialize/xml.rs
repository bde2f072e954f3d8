//! XML dump in the same shape the loader reads

use super::{collect_entries, DumpEntry};
use crate::core::store::PropertyStore;
use crate::domain::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

fn write_entry<W: Write>(writer: &mut Writer<W>, entry: &DumpEntry) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("property")))?;
    writer
        .create_element("name")
        .write_text_content(BytesText::new(&entry.name))?;
    match &entry.value {
        Some(value) => {
            writer
                .create_element("value")
                .write_text_content(BytesText::new(value))?;
        }
        None => {
            writer.create_element("value").write_empty()?;
        }
    }
    writer
        .create_element("final")
        .write_text_content(BytesText::new(if entry.is_final { "true" } else { "false" }))?;
    for source in &entry.sources {
        writer
            .create_element("source")
            .write_text_content(BytesText::new(source))?;
    }
    writer.write_event(Event::End(BytesEnd::new("property")))?;
    writer.get_mut().write_all(b"\n")?;
    Ok(())
}

impl PropertyStore {
    /// Writes `key` (or the whole store) as a `<configuration>` document
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::NotFound`](crate::domain::StrataError::NotFound)
    /// for a missing key, or an I/O or substitution error
    pub fn write_xml<W: Write>(&self, key: Option<&str>, out: W) -> Result<()> {
        let entries = collect_entries(self, key)?;

        let mut writer = Writer::new(out);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;
        writer.write_event(Event::Start(BytesStart::new("configuration")))?;
        writer.get_mut().write_all(b"\n")?;
        for entry in &entries {
            write_entry(&mut writer, entry)?;
        }
        writer.write_event(Event::End(BytesEnd::new("configuration")))?;
        writer.get_mut().flush()?;
        Ok(())
    }

    /// [`write_xml`](Self::write_xml) into a string
    ///
    /// # Errors
    ///
    /// Same as [`write_xml`](Self::write_xml)
    pub fn to_xml_string(&self, key: Option<&str>) -> Result<String> {
        let mut buf = Vec::new();
        self.write_xml(key, &mut buf)?;
        String::from_utf8(buf).map_err(|e| crate::domain::StrataError::Serialization(e.to_string()))
    }
}
