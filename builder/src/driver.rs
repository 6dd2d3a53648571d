//! Turns the event stream of a document into calls on a [`TreeBuilder`].
//!
//! Entity substitution and element nesting are tracked with two explicit stacks, so neither
//! deeply nested elements nor deeply nested entity references grow the native call stack.

use crate::dtd::{predefined_entity, Dtd, Entity};
use crate::error::{Error, Result};
use crate::guard::EntityExpansionGuard;
use crate::namespace::{self, NamespaceError, Namespaces};
use crate::options::ParseOptions;
use log::{debug, trace};
use std::rc::Rc;
use xml_dom::TreeBuilder;
use xml_nom::xmlchar;
use xml_parser::error::Failure;
use xml_parser::model::{DeclarationDoc, DeclarationXml, Event, Tag, PI};
use xml_parser::stream::{self, EventStream};

// -----------------------------------------------------------------------------------------------

/// Parses `text` into the tree produced by `builder`.
pub fn parse<B: TreeBuilder>(text: &str, options: &ParseOptions, builder: B) -> Result<B::Output> {
    let text = normalize(text);
    let mut driver = Driver::new(Rc::from(text), options, builder);
    driver.run()?;
    driver.finish()
}

/// Drops a byte order mark and normalizes line endings to `\n`.
fn normalize(text: &str) -> String {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    text.replace("\r\n", "\n").replace('\r', "\n")
}

// -----------------------------------------------------------------------------------------------

/// Insertion point of the tree.
struct DomContext<N> {
    node: N,
    namespaces: Rc<Namespaces>,
    /// Qualified name of an open element.
    name: Option<String>,
    /// Pushed when the replacement text of an entity starts.
    entity_root: bool,
}

/// Text being read; the document itself or the replacement text of an entity.
struct EntityContext {
    entity: Option<String>,
    text: Rc<str>,
    stream: Box<dyn EventStream>,
    offset: usize,
}

struct Driver<B: TreeBuilder> {
    builder: B,
    document: DomContext<B::Node>,
    doms: Vec<DomContext<B::Node>>,
    entities: Vec<EntityContext>,
    dtd: Dtd,
    guard: EntityExpansionGuard,
    text: String,
    length: usize,
    standalone: bool,
    has_doctype: bool,
    has_root: bool,
}

impl<B: TreeBuilder> Driver<B> {
    fn new(text: Rc<str>, options: &ParseOptions, mut builder: B) -> Self {
        let document = DomContext {
            node: builder.document(),
            namespaces: Namespaces::root(),
            name: None,
            entity_root: false,
        };
        let length = text.len();

        Driver {
            builder,
            document,
            doms: vec![],
            entities: vec![EntityContext {
                entity: None,
                text,
                stream: Box::new(stream::document()),
                offset: 0,
            }],
            dtd: Dtd::default(),
            guard: EntityExpansionGuard::new(length, options),
            text: String::new(),
            length,
            standalone: false,
            has_doctype: false,
            has_root: false,
        }
    }

    fn run(&mut self) -> Result<()> {
        while let Some(context) = self.entities.last_mut() {
            let text = context.text.clone();
            match context.stream.next_event(&text, &mut context.offset) {
                Ok(Some(event)) => {
                    trace!("{:?}", event);
                    self.handle(event)?;
                }
                Ok(None) => self.end_entity()?,
                Err(failure) => return Err(self.syntax_error(failure)),
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<B::Output> {
        if let Some(frame) = self.doms.last() {
            return Err(Error::well_formedness(
                self.length,
                format!(
                    "element `<{}>` is not closed",
                    frame.name.as_deref().unwrap_or_default()
                ),
            ));
        }

        if !self.has_root {
            return Err(Error::well_formedness(
                self.length,
                "document has no root element",
            ));
        }

        Ok(self.builder.finish())
    }

    fn handle(&mut self, event: Event<'_>) -> Result<()> {
        match event {
            Event::Text(v) => self.char_data(v),
            Event::CharRef(c) => self.char_ref(c),
            Event::EntityRef(name) => self.entity_ref(name),
            Event::Comment(v) => {
                self.flush()?;
                let node = self.builder.create_comment(v)?;
                self.insert(node)
            }
            Event::PI(pi) => self.processing_instruction(pi),
            Event::CData(v) => self.cdata(v),
            Event::XmlDecl(decl) => {
                self.xml_declaration(decl);
                Ok(())
            }
            Event::Doctype(decl) => self.doctype(decl),
            Event::StartTag(tag) => self.start_tag(tag, false),
            Event::EmptyTag(tag) => self.start_tag(tag, true),
            Event::EndTag(name) => self.end_tag(name),
        }
    }

    // -------------------------------------------------------------------------------------------

    /// Offset in the document of the current event.
    ///
    /// Events read from the replacement text of an entity are located at the reference.
    fn offset(&self) -> usize {
        self.entities
            .first()
            .map(|v| v.offset)
            .unwrap_or(self.length)
    }

    fn syntax_error(&self, failure: Failure) -> Error {
        if self.entities.len() > 1 {
            Error::Syntax {
                offset: self.offset(),
                expected: failure.expected,
                fatal: failure.fatal,
            }
        } else {
            Error::from(failure)
        }
    }

    fn well_formedness(&self, message: impl Into<String>) -> Error {
        Error::well_formedness(self.offset(), message)
    }

    fn namespace_error(&self, err: NamespaceError) -> Error {
        Error::Namespace {
            offset: self.offset(),
            message: err.to_string(),
        }
    }

    fn insert(&mut self, node: B::Node) -> Result<()> {
        let parent = &self.doms.last().unwrap_or(&self.document).node;
        self.builder.insert_node(node, parent, None)?;
        Ok(())
    }

    /// Emits the buffered character data as one text node.
    fn flush(&mut self) -> Result<()> {
        if self.text.is_empty() {
            return Ok(());
        }

        let data = std::mem::take(&mut self.text);
        let node = self.builder.create_text_node(&data)?;
        self.insert(node)
    }

    // -------------------------------------------------------------------------------------------

    fn char_data(&mut self, data: &str) -> Result<()> {
        if !self.doms.is_empty() {
            self.text.push_str(data);
            Ok(())
        } else if data.chars().all(xmlchar::is_whitespace) {
            Ok(())
        } else {
            Err(self.well_formedness("text is not allowed outside the root element"))
        }
    }

    fn char_ref(&mut self, c: char) -> Result<()> {
        if self.doms.is_empty() {
            return Err(self.well_formedness(
                "character reference is not allowed outside the root element",
            ));
        }

        self.text.push(c);
        Ok(())
    }

    fn cdata(&mut self, data: &str) -> Result<()> {
        if self.doms.is_empty() {
            return Err(self.well_formedness("CDATA section is not allowed outside the root element"));
        }

        self.flush()?;
        let node = self.builder.create_cdata_section(data)?;
        self.insert(node)
    }

    fn processing_instruction(&mut self, pi: PI<'_>) -> Result<()> {
        if pi.target.contains(':') {
            let err = NamespaceError::ColonInName(pi.target.to_string());
            return Err(self.namespace_error(err));
        }

        self.flush()?;
        let node = self
            .builder
            .create_processing_instruction(pi.target, pi.value.unwrap_or(""))?;
        self.insert(node)
    }

    fn xml_declaration(&mut self, decl: DeclarationXml<'_>) {
        self.standalone = decl.standalone.unwrap_or(false);
        self.builder
            .set_xml_declaration(decl.version, decl.encoding, decl.standalone);
    }

    fn doctype(&mut self, decl: DeclarationDoc<'_>) -> Result<()> {
        if self.has_doctype {
            return Err(self.well_formedness("more than one document type declaration"));
        }
        if self.has_root {
            return Err(self.well_formedness(
                "document type declaration must precede the root element",
            ));
        }
        self.has_doctype = true;

        let offset = self.offset();
        self.dtd = Dtd::new(
            &decl.internal_subset,
            self.standalone,
            &mut self.guard,
            offset,
        )?;

        let external_id = decl.external_id.as_ref();
        let node = self.builder.create_document_type(
            decl.name,
            external_id.and_then(|v| v.public_id()),
            external_id.map(|v| v.system_id()),
        )?;
        self.insert(node)
    }

    // -------------------------------------------------------------------------------------------

    fn entity_ref(&mut self, name: &str) -> Result<()> {
        if self.doms.is_empty() {
            return Err(self.well_formedness(format!(
                "entity reference `&{};` is not allowed outside the root element",
                name
            )));
        }

        if let Some(c) = predefined_entity(name) {
            self.text.push(c);
            return Ok(());
        }

        if self
            .entities
            .iter()
            .any(|v| v.entity.as_deref() == Some(name))
        {
            return Err(self.well_formedness(format!("entity `{}` references itself", name)));
        }

        let text = match self.dtd.entity(name).cloned() {
            Some(Entity::Internal(text)) => text,
            Some(Entity::External) => {
                debug!("external entity `{}` is not loaded", name);
                return Ok(());
            }
            Some(Entity::Unparsed) => {
                return Err(self.well_formedness(format!(
                    "reference to unparsed entity `{}`",
                    name
                )));
            }
            None => {
                return Err(self.well_formedness(format!("entity `{}` is not declared", name)));
            }
        };

        self.guard.enter(name, text.len())?;
        debug!("expanding entity `{}` to {} characters", name, text.len());

        let current = self.doms.last().unwrap_or(&self.document);
        let frame = DomContext {
            node: current.node.clone(),
            namespaces: current.namespaces.clone(),
            name: None,
            entity_root: true,
        };
        self.doms.push(frame);
        self.entities.push(EntityContext {
            entity: Some(name.to_string()),
            text,
            stream: Box::new(stream::content()),
            offset: 0,
        });
        Ok(())
    }

    fn end_entity(&mut self) -> Result<()> {
        let name = match self.entities.pop() {
            Some(EntityContext {
                entity: Some(name), ..
            }) => name,
            _ => return Ok(()),
        };

        match self.doms.last() {
            Some(frame) if frame.entity_root => {
                self.doms.pop();
                self.guard.exit();
                Ok(())
            }
            _ => Err(self.well_formedness(format!(
                "replacement text of entity `{}` is not balanced",
                name
            ))),
        }
    }

    // -------------------------------------------------------------------------------------------

    fn start_tag(&mut self, tag: Tag<'_>, empty: bool) -> Result<()> {
        if self.doms.is_empty() {
            if self.has_root {
                return Err(self.well_formedness("document has more than one root element"));
            }
            self.has_root = true;
        }

        self.flush()?;
        let offset = self.offset();

        let mut explicit = vec![];
        for attr in &tag.attributes {
            let cdata = self.dtd.is_cdata(tag.name, attr.name);
            let value =
                self.dtd
                    .expand_attribute_value(&attr.value, cdata, &mut self.guard, offset)?;
            explicit.push((attr.name, value));
        }

        // Entity text inside a default counts every time the default is applied.
        let mut defaults: Vec<(String, String)> = vec![];
        for (name, default) in self.dtd.attribute_defaults(tag.name) {
            if explicit.iter().any(|(v, _)| *v == name) {
                continue;
            }
            if let Some((entity, length)) = &default.expansion {
                self.guard.enter(entity, *length)?;
                self.guard.exit();
            }
            defaults.push((name.to_string(), default.value.clone()));
        }

        let parent = self.doms.last().unwrap_or(&self.document).namespaces.clone();
        let namespaces = Namespaces::from_attrs(&parent, &explicit, &defaults)
            .map_err(|e| self.namespace_error(e))?;

        let qname = namespace::split(tag.name).map_err(|e| self.namespace_error(e))?;
        let uri = namespaces
            .get_for_element(qname.prefix())
            .map_err(|e| self.namespace_error(e))?;
        let element = self
            .builder
            .create_element(uri, qname.prefix(), qname.local_part())?;

        let attributes = explicit
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .chain(
                defaults
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            );

        let mut names: Vec<(Option<&str>, &str)> = vec![];
        for (name, value) in attributes {
            let qname = namespace::split(name).map_err(|e| self.namespace_error(e))?;
            let uri = namespaces
                .get_for_attribute(qname.prefix(), qname.local_part())
                .map_err(|e| self.namespace_error(e))?;

            if names.contains(&(uri, qname.local_part())) {
                return Err(self.well_formedness(format!("duplicate attribute `{}`", name)));
            }
            names.push((uri, qname.local_part()));

            let attr =
                self.builder
                    .create_attribute(uri, qname.prefix(), qname.local_part(), value)?;
            self.builder.append_attribute(attr, &element)?;
        }

        self.insert(element.clone())?;

        if !empty {
            self.doms.push(DomContext {
                node: element,
                namespaces,
                name: Some(tag.name.to_string()),
                entity_root: false,
            });
        }
        Ok(())
    }

    fn end_tag(&mut self, name: &str) -> Result<()> {
        self.flush()?;

        match self.doms.last() {
            None => Err(self.well_formedness(format!(
                "end tag `</{}>` is not allowed outside the root element",
                name
            ))),
            Some(frame) if frame.entity_root => Err(self.well_formedness(format!(
                "end tag `</{}>` closes an element opened outside the entity",
                name
            ))),
            Some(frame) if frame.name.as_deref() != Some(name) => {
                Err(self.well_formedness(format!(
                    "end tag `</{}>` does not match start tag `<{}>`",
                    name,
                    frame.name.as_deref().unwrap_or_default()
                )))
            }
            Some(_) => {
                self.doms.pop();
                Ok(())
            }
        }
    }
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use xml_dom::{Document, Node, XmlDocumentBuilder};

    fn parse_str(text: &str) -> Result<String> {
        let doc = parse(text, &ParseOptions::default(), XmlDocumentBuilder::new())?;
        let doc = doc.borrow();
        Ok(format!("{}", doc))
    }

    fn kind(text: &str) -> ErrorKind {
        parse(text, &ParseOptions::default(), XmlDocumentBuilder::new())
            .err()
            .unwrap()
            .kind()
    }

    #[test]
    fn test_normalize() {
        assert_eq!("a\nb\nc\n", normalize("\u{FEFF}a\r\nb\rc\n"));
        assert_eq!("\u{FEFF}", normalize("\u{FEFF}\u{FEFF}"));
    }

    #[test]
    fn test_coalesce_text() {
        let doc = parse(
            "<a>x&#65;&amp;y<![CDATA[z]]></a>",
            &ParseOptions::default(),
            XmlDocumentBuilder::new(),
        )
        .unwrap();
        let root = doc.borrow().document_element().unwrap();
        let root = root.borrow();
        assert_eq!(2, root.child_nodes().len());
        assert_eq!("xA&y", root.child_nodes()[0].text_content());
        assert_eq!("xA&yz", root.text_content());
    }

    #[test]
    fn test_misc_outside_root() {
        assert_eq!(
            Ok("<?pi data?><a/><!-- c -->".to_string()),
            parse_str("<?pi data?>\n<a/>\n<!-- c -->\n")
        );
    }

    #[test]
    fn test_entity_markup() {
        assert_eq!(
            Ok("<!DOCTYPE a><a><b>x</b>y<c/></a>".to_string()),
            parse_str("<!DOCTYPE a [<!ENTITY e '<b>x</b>y'>]><a>&e;<c/></a>")
        );
    }

    #[test]
    fn test_entity_nested() {
        assert_eq!(
            Ok("<!DOCTYPE a><a>[&lt;b&gt;]</a>".to_string()),
            parse_str(
                "<!DOCTYPE a [
                    <!ENTITY b '&#38;lt;b&#38;gt;'>
                    <!ENTITY c '[&b;]'>
                ]><a>&c;</a>"
            )
        );
    }

    #[test]
    fn test_entity_namespace() {
        let doc = parse(
            "<!DOCTYPE a [<!ENTITY e '<p:b/>'>]><a xmlns:p='urn:p'>&e;</a>",
            &ParseOptions::default(),
            XmlDocumentBuilder::new(),
        )
        .unwrap();
        let b = doc.borrow().get_elements_by_tag_name("p:b");
        assert_eq!(1, b.len());
    }

    #[test]
    fn test_external_entity() {
        assert_eq!(
            Ok("<!DOCTYPE a SYSTEM \"a.dtd\"><a>xy</a>".to_string()),
            parse_str("<!DOCTYPE a SYSTEM 'a.dtd' [<!ENTITY e SYSTEM 'e.xml'>]><a>x&e;y</a>")
        );
        assert_eq!(
            ErrorKind::WellFormedness,
            kind("<!DOCTYPE a [<!ENTITY e SYSTEM 'e.xml'>]><a b='&e;'/>")
        );
        assert_eq!(
            ErrorKind::WellFormedness,
            kind("<!DOCTYPE a [<!ENTITY e SYSTEM 'e.gif' NDATA gif>]><a>&e;</a>")
        );
    }

    #[test]
    fn test_unbalanced_entity() {
        assert_eq!(
            ErrorKind::WellFormedness,
            kind("<!DOCTYPE a [<!ENTITY e '<b>'>]><a>&e;</b></a>")
        );
        assert_eq!(
            ErrorKind::WellFormedness,
            kind("<!DOCTYPE a [<!ENTITY e '</a>'>]><a>&e;")
        );
    }

    #[test]
    fn test_indirect_recursion() {
        assert_eq!(
            ErrorKind::WellFormedness,
            kind("<!DOCTYPE a [<!ENTITY x '&y;'><!ENTITY y '&x;'>]><a>&x;</a>")
        );
    }

    #[test]
    fn test_syntax_in_entity() {
        let text = "<!DOCTYPE a [<!ENTITY e '<b'>]><a>&e;</a>";
        let err = parse(text, &ParseOptions::default(), XmlDocumentBuilder::new())
            .err()
            .unwrap();
        assert_eq!(ErrorKind::Syntax, err.kind());
        match err {
            Error::Syntax { offset, .. } => assert_eq!(text.find("</a>").unwrap(), offset),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_document_level() {
        assert_eq!(ErrorKind::WellFormedness, kind("<a/>text"));
        assert_eq!(ErrorKind::WellFormedness, kind("<a/>&#65;"));
        assert_eq!(ErrorKind::WellFormedness, kind("<a/>&amp;"));
        assert_eq!(ErrorKind::WellFormedness, kind("<a/><![CDATA[x]]>"));
        assert_eq!(ErrorKind::WellFormedness, kind("<a/></a>"));
        assert_eq!(ErrorKind::WellFormedness, kind("<a>"));
        assert_eq!(ErrorKind::WellFormedness, kind("<!-- c -->"));
    }

    #[test]
    fn test_attribute_defaults() {
        assert_eq!(
            Ok("<!DOCTYPE a><a b=\"1\" c=\"2\"/>".to_string()),
            parse_str("<!DOCTYPE a [<!ATTLIST a b CDATA '0' c CDATA '2'>]><a b='1'/>")
        );
    }

    #[test]
    fn test_default_namespace_declaration() {
        let doc = parse(
            "<!DOCTYPE a [<!ATTLIST a xmlns CDATA 'urn:d'>]><a/>",
            &ParseOptions::default(),
            XmlDocumentBuilder::new(),
        )
        .unwrap();
        let root = doc.borrow().document_element().unwrap();
        assert_eq!(
            Some("urn:d"),
            xml_dom::NamespacedNode::namespace_uri(&*root.borrow())
        );
    }

    #[test]
    fn test_duplicate_literal_attribute() {
        assert_eq!(ErrorKind::WellFormedness, kind("<a b='1' b='2'/>"));
    }

    #[test]
    fn test_invalid_qname() {
        assert_eq!(ErrorKind::WellFormedness, kind("<a:/>"));
        assert_eq!(ErrorKind::WellFormedness, kind("<a b:c:d='1'/>"));
    }

    #[test]
    fn test_colon_names() {
        assert_eq!(ErrorKind::WellFormedness, kind("<?a:b x?><a/>"));
        assert_eq!(ErrorKind::WellFormedness, kind("<a><?a:b?></a>"));
        assert_eq!(
            ErrorKind::WellFormedness,
            kind("<!DOCTYPE a [<!ENTITY a:b 'x'>]><a/>")
        );
        assert_eq!(ErrorKind::WellFormedness, kind("<xmlns:a/>"));
        assert_eq!(
            ErrorKind::WellFormedness,
            kind("<a xmlns:p='urn:p'><xmlns:p/></a>")
        );
    }
}

// -----------------------------------------------------------------------------------------------
