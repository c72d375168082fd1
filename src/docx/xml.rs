//! Thin event-writing wrapper over `quick_xml::Writer`.
//!
//! WordprocessingML is mostly empty elements carrying a `w:val`, so the
//! helpers here are shaped around that: [`XmlWriter::val`] for valued
//! properties and [`XmlWriter::toggle`] for on/off properties.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::Result;

pub(crate) struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// A writer positioned after the `<?xml ...?>` declaration.
    pub fn new() -> Result<Self> {
        let mut inner = Writer::new(Vec::new());
        inner.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(Self { inner })
    }

    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.inner.write_event(Event::Start(element))?;
        Ok(())
    }

    pub fn end(&mut self, name: &str) -> Result<()> {
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.inner.write_event(Event::Empty(element))?;
        Ok(())
    }

    /// Escaped character data.
    pub fn text(&mut self, text: &str) -> Result<()> {
        self.inner.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    /// `<name attrs...>text</name>`
    pub fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    /// `<name w:val="value"/>`
    pub fn val(&mut self, name: &str, value: &str) -> Result<()> {
        self.empty(name, &[("w:val", value)])
    }

    /// On/off property: `<name/>` when on, `<name w:val="false"/>` when
    /// explicitly off, nothing when unset.
    pub fn toggle(&mut self, name: &str, value: Option<bool>) -> Result<()> {
        match value {
            Some(true) => self.empty(name, &[]),
            Some(false) => self.val(name, "false"),
            None => Ok(()),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}
