pub mod error;

use error::{DomException, Result};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

// -----------------------------------------------------------------------------------------------

pub type XmlNode<T> = Rc<RefCell<T>>;

fn node<T>(value: T) -> XmlNode<T> {
    Rc::new(RefCell::new(value))
}

// -----------------------------------------------------------------------------------------------

pub trait Node {
    fn node_name(&self) -> String;

    fn node_value(&self) -> Option<String>;

    fn node_type(&self) -> NodeType;

    fn child_nodes(&self) -> Vec<XmlItem>;

    fn has_child(&self) -> bool {
        !self.child_nodes().is_empty()
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum NodeType {
    Element = 1,
    Attribute = 2,
    Text = 3,
    CData = 4,
    EntityReference = 5,
    Entity = 6,
    PI = 7,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    DocumentFragment = 11,
    Notation = 12,
}

// -----------------------------------------------------------------------------------------------

pub trait Document: Node {
    fn doc_type(&self) -> Option<XmlNode<XmlDocumentType>>;

    fn document_element(&self) -> Option<XmlNode<XmlElement>>;

    fn get_elements_by_tag_name(&self, tag_name: &str) -> Vec<XmlNode<XmlElement>>;
}

// -----------------------------------------------------------------------------------------------

pub trait Element: Node {
    fn tag_name(&self) -> String;

    fn get_attribute(&self, name: &str) -> Option<String>;

    fn get_attribute_ns(&self, namespace_uri: Option<&str>, local_name: &str) -> Option<String>;

    fn get_elements_by_tag_name(&self, tag_name: &str) -> Vec<XmlNode<XmlElement>>;
}

// -----------------------------------------------------------------------------------------------

pub trait Attr: Node {
    fn name(&self) -> String;

    fn value(&self) -> String;
}

// -----------------------------------------------------------------------------------------------

pub trait CharacterData: Node {
    fn data(&self) -> String;

    fn length(&self) -> usize {
        self.data().chars().count()
    }
}

// -----------------------------------------------------------------------------------------------

/// A node identified by an optional namespace URI, an optional prefix and a local name.
pub trait NamespacedNode {
    fn namespace_uri(&self) -> Option<&str>;

    fn prefix(&self) -> Option<&str>;

    fn local_name(&self) -> &str;

    fn qualified_name(&self) -> String {
        match self.prefix() {
            Some(prefix) => format!("{}:{}", prefix, self.local_name()),
            None => self.local_name().to_string(),
        }
    }
}

// -----------------------------------------------------------------------------------------------

/// Receives the nodes of a parsed document.
///
/// The parse driver only ever talks to this interface, so any tree representation can be
/// produced by implementing it.
pub trait TreeBuilder {
    type Node: Clone;
    type Output;

    /// The document node that top-level children are inserted into.
    fn document(&mut self) -> Self::Node;

    fn set_xml_declaration(&mut self, version: &str, encoding: Option<&str>, standalone: Option<bool>);

    fn create_element(
        &mut self,
        namespace_uri: Option<&str>,
        prefix: Option<&str>,
        local_name: &str,
    ) -> Result<Self::Node>;

    fn create_attribute(
        &mut self,
        namespace_uri: Option<&str>,
        prefix: Option<&str>,
        local_name: &str,
        value: &str,
    ) -> Result<Self::Node>;

    fn append_attribute(&mut self, attr: Self::Node, owner: &Self::Node) -> Result<()>;

    fn create_text_node(&mut self, data: &str) -> Result<Self::Node>;

    fn create_comment(&mut self, data: &str) -> Result<Self::Node>;

    fn create_processing_instruction(&mut self, target: &str, data: &str) -> Result<Self::Node>;

    fn create_cdata_section(&mut self, data: &str) -> Result<Self::Node>;

    fn create_document_type(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
    ) -> Result<Self::Node>;

    /// Inserts `child` into `parent` before `reference`, or at the end without one.
    fn insert_node(
        &mut self,
        child: Self::Node,
        parent: &Self::Node,
        reference: Option<&Self::Node>,
    ) -> Result<()>;

    fn finish(self) -> Self::Output;
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum XmlItem {
    Element(XmlNode<XmlElement>),
    Attribute(XmlNode<XmlAttr>),
    Text(XmlNode<XmlText>),
    CData(XmlNode<XmlCDataSection>),
    PI(XmlNode<XmlProcessingInstruction>),
    Comment(XmlNode<XmlComment>),
    Document(XmlNode<XmlDocument>),
    DocumentType(XmlNode<XmlDocumentType>),
}

impl Node for XmlItem {
    fn node_name(&self) -> String {
        match self {
            XmlItem::Element(v) => v.borrow().node_name(),
            XmlItem::Attribute(v) => v.borrow().node_name(),
            XmlItem::Text(v) => v.borrow().node_name(),
            XmlItem::CData(v) => v.borrow().node_name(),
            XmlItem::PI(v) => v.borrow().node_name(),
            XmlItem::Comment(v) => v.borrow().node_name(),
            XmlItem::Document(v) => v.borrow().node_name(),
            XmlItem::DocumentType(v) => v.borrow().node_name(),
        }
    }

    fn node_value(&self) -> Option<String> {
        match self {
            XmlItem::Element(v) => v.borrow().node_value(),
            XmlItem::Attribute(v) => v.borrow().node_value(),
            XmlItem::Text(v) => v.borrow().node_value(),
            XmlItem::CData(v) => v.borrow().node_value(),
            XmlItem::PI(v) => v.borrow().node_value(),
            XmlItem::Comment(v) => v.borrow().node_value(),
            XmlItem::Document(v) => v.borrow().node_value(),
            XmlItem::DocumentType(v) => v.borrow().node_value(),
        }
    }

    fn node_type(&self) -> NodeType {
        match self {
            XmlItem::Element(_) => NodeType::Element,
            XmlItem::Attribute(_) => NodeType::Attribute,
            XmlItem::Text(_) => NodeType::Text,
            XmlItem::CData(_) => NodeType::CData,
            XmlItem::PI(_) => NodeType::PI,
            XmlItem::Comment(_) => NodeType::Comment,
            XmlItem::Document(_) => NodeType::Document,
            XmlItem::DocumentType(_) => NodeType::DocumentType,
        }
    }

    fn child_nodes(&self) -> Vec<XmlItem> {
        match self {
            XmlItem::Element(v) => v.borrow().child_nodes(),
            XmlItem::Document(v) => v.borrow().child_nodes(),
            _ => vec![],
        }
    }
}

impl fmt::Display for XmlItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlItem::Element(v) => write!(f, "{}", v.borrow()),
            XmlItem::Attribute(v) => write!(f, "{}", v.borrow()),
            XmlItem::Text(v) => write!(f, "{}", v.borrow()),
            XmlItem::CData(v) => write!(f, "{}", v.borrow()),
            XmlItem::PI(v) => write!(f, "{}", v.borrow()),
            XmlItem::Comment(v) => write!(f, "{}", v.borrow()),
            XmlItem::Document(v) => write!(f, "{}", v.borrow()),
            XmlItem::DocumentType(v) => write!(f, "{}", v.borrow()),
        }
    }
}

impl XmlItem {
    /// Whether both handles point at the same node.
    pub fn is_same_node(&self, other: &XmlItem) -> bool {
        match (self, other) {
            (XmlItem::Element(a), XmlItem::Element(b)) => Rc::ptr_eq(a, b),
            (XmlItem::Attribute(a), XmlItem::Attribute(b)) => Rc::ptr_eq(a, b),
            (XmlItem::Text(a), XmlItem::Text(b)) => Rc::ptr_eq(a, b),
            (XmlItem::CData(a), XmlItem::CData(b)) => Rc::ptr_eq(a, b),
            (XmlItem::PI(a), XmlItem::PI(b)) => Rc::ptr_eq(a, b),
            (XmlItem::Comment(a), XmlItem::Comment(b)) => Rc::ptr_eq(a, b),
            (XmlItem::Document(a), XmlItem::Document(b)) => Rc::ptr_eq(a, b),
            (XmlItem::DocumentType(a), XmlItem::DocumentType(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Concatenated character data of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            XmlItem::Text(v) => v.borrow().data(),
            XmlItem::CData(v) => v.borrow().data(),
            XmlItem::Comment(v) => v.borrow().data(),
            XmlItem::PI(v) => v.borrow().data.clone(),
            XmlItem::Attribute(v) => v.borrow().value(),
            XmlItem::Element(v) => v.borrow().text_content(),
            XmlItem::Document(_) | XmlItem::DocumentType(_) => String::new(),
        }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq)]
pub struct XmlDocument {
    version: Option<String>,
    encoding: Option<String>,
    standalone: Option<bool>,
    children: Vec<XmlItem>,
}

impl Document for XmlDocument {
    fn doc_type(&self) -> Option<XmlNode<XmlDocumentType>> {
        self.children.iter().find_map(|v| match v {
            XmlItem::DocumentType(v) => Some(v.clone()),
            _ => None,
        })
    }

    fn document_element(&self) -> Option<XmlNode<XmlElement>> {
        self.children.iter().find_map(|v| match v {
            XmlItem::Element(v) => Some(v.clone()),
            _ => None,
        })
    }

    fn get_elements_by_tag_name(&self, tag_name: &str) -> Vec<XmlNode<XmlElement>> {
        let mut elems = vec![];
        if let Some(root) = self.document_element() {
            collect_elements(&root, tag_name, &mut elems);
        }
        elems
    }
}

impl Node for XmlDocument {
    fn node_name(&self) -> String {
        "#document".to_string()
    }

    fn node_value(&self) -> Option<String> {
        None
    }

    fn node_type(&self) -> NodeType {
        NodeType::Document
    }

    fn child_nodes(&self) -> Vec<XmlItem> {
        self.children.clone()
    }
}

impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        Ok(())
    }
}

impl XmlDocument {
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    pub fn standalone(&self) -> Option<bool> {
        self.standalone
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct XmlDocumentType {
    name: String,
    public_id: Option<String>,
    system_id: Option<String>,
}

impl Node for XmlDocumentType {
    fn node_name(&self) -> String {
        self.name.clone()
    }

    fn node_value(&self) -> Option<String> {
        None
    }

    fn node_type(&self) -> NodeType {
        NodeType::DocumentType
    }

    fn child_nodes(&self) -> Vec<XmlItem> {
        vec![]
    }
}

impl fmt::Display for XmlDocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<!DOCTYPE {}", self.name)?;
        match (&self.public_id, &self.system_id) {
            (Some(p), Some(s)) => write!(f, " PUBLIC \"{}\" \"{}\"", p, s)?,
            (None, Some(s)) => write!(f, " SYSTEM \"{}\"", s)?,
            _ => {}
        }
        write!(f, ">")
    }
}

impl XmlDocumentType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn public_id(&self) -> Option<&str> {
        self.public_id.as_deref()
    }

    pub fn system_id(&self) -> Option<&str> {
        self.system_id.as_deref()
    }
}

// -----------------------------------------------------------------------------------------------

/// Element node.
///
/// Dropping, comparing, serializing and searching walk the subtree with a heap stack, so
/// arbitrarily deep trees do not exhaust the native stack.
#[derive(Clone, Debug)]
pub struct XmlElement {
    namespace_uri: Option<String>,
    prefix: Option<String>,
    local_name: String,
    attributes: Vec<XmlNode<XmlAttr>>,
    children: Vec<XmlItem>,
}

impl Element for XmlElement {
    fn tag_name(&self) -> String {
        self.qualified_name()
    }

    fn get_attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|v| v.borrow().name() == name)
            .map(|v| v.borrow().value())
    }

    fn get_attribute_ns(&self, namespace_uri: Option<&str>, local_name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|v| {
                let v = v.borrow();
                v.namespace_uri() == namespace_uri && v.local_name() == local_name
            })
            .map(|v| v.borrow().value())
    }

    fn get_elements_by_tag_name(&self, tag_name: &str) -> Vec<XmlNode<XmlElement>> {
        let mut elems = vec![];
        for child in &self.children {
            if let XmlItem::Element(child) = child {
                collect_elements(child, tag_name, &mut elems);
            }
        }
        elems
    }
}

impl Node for XmlElement {
    fn node_name(&self) -> String {
        self.tag_name()
    }

    fn node_value(&self) -> Option<String> {
        None
    }

    fn node_type(&self) -> NodeType {
        NodeType::Element
    }

    fn child_nodes(&self) -> Vec<XmlItem> {
        self.children.clone()
    }
}

impl NamespacedNode for XmlElement {
    fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn local_name(&self) -> &str {
        &self.local_name
    }
}

impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Step {
            Item(XmlItem),
            Close(String),
        }

        if !self.write_start_tag(f)? {
            return Ok(());
        }

        let mut stack = vec![Step::Close(self.qualified_name())];
        stack.extend(self.children.iter().rev().cloned().map(Step::Item));
        while let Some(step) = stack.pop() {
            match step {
                Step::Close(name) => write!(f, "</{}>", name)?,
                Step::Item(XmlItem::Element(element)) => {
                    let element = element.borrow();
                    if element.write_start_tag(f)? {
                        stack.push(Step::Close(element.qualified_name()));
                        stack.extend(element.children.iter().rev().cloned().map(Step::Item));
                    }
                }
                Step::Item(item) => write!(f, "{}", item)?,
            }
        }
        Ok(())
    }
}

impl PartialEq for XmlElement {
    fn eq(&self, other: &Self) -> bool {
        let mut pairs = vec![];
        if !self.shallow_eq(other, &mut pairs) {
            return false;
        }

        while let Some((a, b)) = pairs.pop() {
            if Rc::ptr_eq(&a, &b) {
                continue;
            }
            if !a.borrow().shallow_eq(&b.borrow(), &mut pairs) {
                return false;
            }
        }
        true
    }
}

impl Drop for XmlElement {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(child) = stack.pop() {
            if let XmlItem::Element(element) = child {
                // Only the last handle takes the children; others just release their count.
                if let Ok(element) = Rc::try_unwrap(element) {
                    stack.append(&mut element.borrow_mut().children);
                }
            }
        }
    }
}

impl XmlElement {
    pub fn attributes(&self) -> Vec<XmlNode<XmlAttr>> {
        self.attributes.clone()
    }

    pub fn text_content(&self) -> String {
        let mut text = String::new();
        let mut stack = self.children.iter().rev().cloned().collect::<Vec<XmlItem>>();
        while let Some(item) = stack.pop() {
            match item {
                XmlItem::Element(v) => stack.extend(v.borrow().children.iter().rev().cloned()),
                XmlItem::Text(v) => text.push_str(&v.borrow().data),
                XmlItem::CData(v) => text.push_str(&v.borrow().data),
                _ => {}
            }
        }
        text
    }

    /// Writes the start tag, or the whole element when it is empty.
    ///
    /// Returns whether children and an end tag have to follow.
    fn write_start_tag(&self, f: &mut fmt::Formatter<'_>) -> std::result::Result<bool, fmt::Error> {
        write!(f, "<{}", self.qualified_name())?;
        for attr in &self.attributes {
            write!(f, " {}", attr.borrow())?;
        }

        if self.children.is_empty() {
            write!(f, "/>")?;
            Ok(false)
        } else {
            write!(f, ">")?;
            Ok(true)
        }
    }

    /// Compares everything except child elements, which are queued on `pairs`.
    fn shallow_eq(
        &self,
        other: &XmlElement,
        pairs: &mut Vec<(XmlNode<XmlElement>, XmlNode<XmlElement>)>,
    ) -> bool {
        if self.namespace_uri != other.namespace_uri
            || self.prefix != other.prefix
            || self.local_name != other.local_name
            || self.attributes != other.attributes
            || self.children.len() != other.children.len()
        {
            return false;
        }

        for (a, b) in self.children.iter().zip(&other.children) {
            match (a, b) {
                (XmlItem::Element(a), XmlItem::Element(b)) => pairs.push((a.clone(), b.clone())),
                (a, b) if a != b => return false,
                _ => {}
            }
        }
        true
    }

    fn match_tag_name(&self, tag_name: &str) -> bool {
        tag_name == "*" || self.tag_name() == tag_name
    }
}

fn collect_elements(
    element: &XmlNode<XmlElement>,
    tag_name: &str,
    elems: &mut Vec<XmlNode<XmlElement>>,
) {
    let mut stack = vec![element.clone()];
    while let Some(current) = stack.pop() {
        let element = current.borrow();
        if element.match_tag_name(tag_name) {
            elems.push(current.clone());
        }

        for child in element.children.iter().rev() {
            if let XmlItem::Element(child) = child {
                stack.push(child.clone());
            }
        }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct XmlAttr {
    namespace_uri: Option<String>,
    prefix: Option<String>,
    local_name: String,
    value: String,
    attached: bool,
}

impl Attr for XmlAttr {
    fn name(&self) -> String {
        self.qualified_name()
    }

    fn value(&self) -> String {
        self.value.clone()
    }
}

impl Node for XmlAttr {
    fn node_name(&self) -> String {
        self.name()
    }

    fn node_value(&self) -> Option<String> {
        Some(self.value())
    }

    fn node_type(&self) -> NodeType {
        NodeType::Attribute
    }

    fn child_nodes(&self) -> Vec<XmlItem> {
        vec![]
    }
}

impl NamespacedNode for XmlAttr {
    fn namespace_uri(&self) -> Option<&str> {
        self.namespace_uri.as_deref()
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn local_name(&self) -> &str {
        &self.local_name
    }
}

impl fmt::Display for XmlAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"", self.qualified_name())?;
        for c in self.value.chars() {
            match c {
                '&' => write!(f, "&amp;")?,
                '<' => write!(f, "&lt;")?,
                '"' => write!(f, "&quot;")?,
                '\t' => write!(f, "&#9;")?,
                '\n' => write!(f, "&#10;")?,
                '\r' => write!(f, "&#13;")?,
                _ => write!(f, "{}", c)?,
            }
        }
        write!(f, "\"")
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct XmlText {
    data: String,
}

impl CharacterData for XmlText {
    fn data(&self) -> String {
        self.data.clone()
    }
}

impl Node for XmlText {
    fn node_name(&self) -> String {
        "#text".to_string()
    }

    fn node_value(&self) -> Option<String> {
        Some(self.data())
    }

    fn node_type(&self) -> NodeType {
        NodeType::Text
    }

    fn child_nodes(&self) -> Vec<XmlItem> {
        vec![]
    }
}

impl fmt::Display for XmlText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.data.chars() {
            match c {
                '&' => write!(f, "&amp;")?,
                '<' => write!(f, "&lt;")?,
                '>' => write!(f, "&gt;")?,
                '\r' => write!(f, "&#13;")?,
                _ => write!(f, "{}", c)?,
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct XmlCDataSection {
    data: String,
}

impl CharacterData for XmlCDataSection {
    fn data(&self) -> String {
        self.data.clone()
    }
}

impl Node for XmlCDataSection {
    fn node_name(&self) -> String {
        "#cdata-section".to_string()
    }

    fn node_value(&self) -> Option<String> {
        Some(self.data())
    }

    fn node_type(&self) -> NodeType {
        NodeType::CData
    }

    fn child_nodes(&self) -> Vec<XmlItem> {
        vec![]
    }
}

impl fmt::Display for XmlCDataSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<![CDATA[{}]]>", self.data)
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct XmlComment {
    data: String,
}

impl CharacterData for XmlComment {
    fn data(&self) -> String {
        self.data.clone()
    }
}

impl Node for XmlComment {
    fn node_name(&self) -> String {
        "#comment".to_string()
    }

    fn node_value(&self) -> Option<String> {
        Some(self.data())
    }

    fn node_type(&self) -> NodeType {
        NodeType::Comment
    }

    fn child_nodes(&self) -> Vec<XmlItem> {
        vec![]
    }
}

impl fmt::Display for XmlComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<!--{}-->", self.data)
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct XmlProcessingInstruction {
    target: String,
    data: String,
}

impl Node for XmlProcessingInstruction {
    fn node_name(&self) -> String {
        self.target.clone()
    }

    fn node_value(&self) -> Option<String> {
        Some(self.data.clone())
    }

    fn node_type(&self) -> NodeType {
        NodeType::PI
    }

    fn child_nodes(&self) -> Vec<XmlItem> {
        vec![]
    }
}

impl fmt::Display for XmlProcessingInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data.is_empty() {
            write!(f, "<?{}?>", self.target)
        } else {
            write!(f, "<?{} {}?>", self.target, self.data)
        }
    }
}

impl XmlProcessingInstruction {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn data(&self) -> &str {
        &self.data
    }
}

// -----------------------------------------------------------------------------------------------

/// Builds an [`XmlDocument`].
#[derive(Debug, Default)]
pub struct XmlDocumentBuilder {
    document: XmlNode<XmlDocument>,
}

impl XmlDocumentBuilder {
    pub fn new() -> Self {
        XmlDocumentBuilder::default()
    }
}

impl TreeBuilder for XmlDocumentBuilder {
    type Node = XmlItem;
    type Output = XmlNode<XmlDocument>;

    fn document(&mut self) -> XmlItem {
        XmlItem::Document(self.document.clone())
    }

    fn set_xml_declaration(&mut self, version: &str, encoding: Option<&str>, standalone: Option<bool>) {
        let mut document = self.document.borrow_mut();
        document.version = Some(version.to_string());
        document.encoding = encoding.map(|v| v.to_string());
        document.standalone = standalone;
    }

    fn create_element(
        &mut self,
        namespace_uri: Option<&str>,
        prefix: Option<&str>,
        local_name: &str,
    ) -> Result<XmlItem> {
        Ok(XmlItem::Element(node(XmlElement {
            namespace_uri: namespace_uri.map(|v| v.to_string()),
            prefix: prefix.map(|v| v.to_string()),
            local_name: local_name.to_string(),
            attributes: vec![],
            children: vec![],
        })))
    }

    fn create_attribute(
        &mut self,
        namespace_uri: Option<&str>,
        prefix: Option<&str>,
        local_name: &str,
        value: &str,
    ) -> Result<XmlItem> {
        Ok(XmlItem::Attribute(node(XmlAttr {
            namespace_uri: namespace_uri.map(|v| v.to_string()),
            prefix: prefix.map(|v| v.to_string()),
            local_name: local_name.to_string(),
            value: value.to_string(),
            attached: false,
        })))
    }

    fn append_attribute(&mut self, attr: XmlItem, owner: &XmlItem) -> Result<()> {
        match (attr, owner) {
            (XmlItem::Attribute(attr), XmlItem::Element(owner)) => {
                if attr.borrow().attached {
                    return Err(DomException::InuseAttributeErr.into());
                }
                attr.borrow_mut().attached = true;
                owner.borrow_mut().attributes.push(attr);
                Ok(())
            }
            _ => Err(DomException::HierarchyRequestErr.into()),
        }
    }

    fn create_text_node(&mut self, data: &str) -> Result<XmlItem> {
        Ok(XmlItem::Text(node(XmlText {
            data: data.to_string(),
        })))
    }

    fn create_comment(&mut self, data: &str) -> Result<XmlItem> {
        Ok(XmlItem::Comment(node(XmlComment {
            data: data.to_string(),
        })))
    }

    fn create_processing_instruction(&mut self, target: &str, data: &str) -> Result<XmlItem> {
        Ok(XmlItem::PI(node(XmlProcessingInstruction {
            target: target.to_string(),
            data: data.to_string(),
        })))
    }

    fn create_cdata_section(&mut self, data: &str) -> Result<XmlItem> {
        Ok(XmlItem::CData(node(XmlCDataSection {
            data: data.to_string(),
        })))
    }

    fn create_document_type(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
    ) -> Result<XmlItem> {
        Ok(XmlItem::DocumentType(node(XmlDocumentType {
            name: name.to_string(),
            public_id: public_id.map(|v| v.to_string()),
            system_id: system_id.map(|v| v.to_string()),
        })))
    }

    fn insert_node(
        &mut self,
        child: XmlItem,
        parent: &XmlItem,
        reference: Option<&XmlItem>,
    ) -> Result<()> {
        if matches!(child, XmlItem::Attribute(_) | XmlItem::Document(_)) {
            return Err(DomException::HierarchyRequestErr.into());
        }

        match parent {
            XmlItem::Element(v) => insert_child(&mut v.borrow_mut().children, child, reference),
            XmlItem::Document(v) => {
                if matches!(child, XmlItem::Text(_) | XmlItem::CData(_)) {
                    return Err(DomException::HierarchyRequestErr.into());
                }
                insert_child(&mut v.borrow_mut().children, child, reference)
            }
            _ => Err(DomException::HierarchyRequestErr.into()),
        }
    }

    fn finish(self) -> XmlNode<XmlDocument> {
        self.document
    }
}

fn insert_child(children: &mut Vec<XmlItem>, child: XmlItem, reference: Option<&XmlItem>) -> Result<()> {
    match reference {
        Some(reference) => {
            let index = children
                .iter()
                .position(|v| v.is_same_node(reference))
                .ok_or(DomException::NotFoundErr)?;
            children.insert(index, child);
        }
        None => children.push(child),
    }
    Ok(())
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use error::Error;

    fn sample() -> (XmlDocumentBuilder, XmlItem, XmlItem) {
        let mut builder = XmlDocumentBuilder::new();
        let doc = builder.document();
        let root = builder.create_element(Some("urn:a"), Some("a"), "root").unwrap();
        builder.insert_node(root.clone(), &doc, None).unwrap();
        (builder, doc, root)
    }

    #[test]
    fn test_document() {
        let (mut builder, doc, root) = sample();
        let comment = builder.create_comment(" c ").unwrap();
        builder.insert_node(comment, &doc, Some(&root)).unwrap();
        let doctype = builder
            .create_document_type("root", Some("-//A//EN"), Some("a.dtd"))
            .unwrap();
        builder.insert_node(doctype, &doc, Some(&root)).unwrap();
        builder.set_xml_declaration("1.0", Some("utf-8"), None);
        let doc = builder.finish();

        let doc = doc.borrow();
        assert_eq!("#document", doc.node_name());
        assert_eq!(None, doc.node_value());
        assert_eq!(NodeType::Document, doc.node_type());
        assert_eq!(3, doc.child_nodes().len());
        assert!(doc.has_child());
        assert_eq!(Some("1.0"), doc.version());
        assert_eq!(Some("utf-8"), doc.encoding());
        assert_eq!(None, doc.standalone());
        assert_eq!("root", doc.doc_type().unwrap().borrow().name());
        assert_eq!(Some("-//A//EN"), doc.doc_type().unwrap().borrow().public_id());
        assert_eq!(
            "a:root",
            doc.document_element().unwrap().borrow().tag_name()
        );

        // fmt::Display
        assert_eq!(
            "<!-- c --><!DOCTYPE root PUBLIC \"-//A//EN\" \"a.dtd\"><a:root/>",
            format!("{}", doc)
        );
    }

    #[test]
    fn test_element() {
        let (mut builder, _, root) = sample();
        let attr = builder
            .create_attribute(Some("urn:b"), Some("b"), "x", "1 < \"2\"")
            .unwrap();
        builder.append_attribute(attr, &root).unwrap();
        let attr = builder.create_attribute(None, None, "y", "3").unwrap();
        builder.append_attribute(attr, &root).unwrap();
        let child = builder.create_element(None, None, "child").unwrap();
        builder.insert_node(child.clone(), &root, None).unwrap();
        let text = builder.create_text_node("a&b").unwrap();
        builder.insert_node(text, &child, None).unwrap();
        let cdata = builder.create_cdata_section("<c>").unwrap();
        builder.insert_node(cdata, &root, None).unwrap();

        let element = match &root {
            XmlItem::Element(v) => v.clone(),
            _ => unreachable!(),
        };
        let element = element.borrow();
        assert_eq!("a:root", element.node_name());
        assert_eq!(Some("urn:a"), element.namespace_uri());
        assert_eq!(Some("a"), element.prefix());
        assert_eq!("root", element.local_name());
        assert_eq!(Some("1 < \"2\"".to_string()), element.get_attribute("b:x"));
        assert_eq!(
            Some("1 < \"2\"".to_string()),
            element.get_attribute_ns(Some("urn:b"), "x")
        );
        assert_eq!(None, element.get_attribute_ns(None, "x"));
        assert_eq!(Some("3".to_string()), element.get_attribute_ns(None, "y"));
        assert_eq!(1, element.get_elements_by_tag_name("child").len());
        assert_eq!(1, element.get_elements_by_tag_name("*").len());
        assert_eq!("a&b<c>", element.text_content());

        // fmt::Display
        assert_eq!(
            "<a:root b:x=\"1 &lt; &quot;2&quot;\" y=\"3\"><child>a&amp;b</child><![CDATA[<c>]]></a:root>",
            format!("{}", element)
        );
    }

    #[test]
    fn test_pi() {
        let (mut builder, doc, _) = sample();
        let pi = builder.create_processing_instruction("t", "").unwrap();
        assert_eq!("t", pi.node_name());
        assert_eq!(NodeType::PI, pi.node_type());
        assert_eq!("<?t?>", format!("{}", pi));
        builder.insert_node(pi, &doc, None).unwrap();

        let pi = builder.create_processing_instruction("t", "d").unwrap();
        assert_eq!(Some("d".to_string()), pi.node_value());
        assert_eq!("<?t d?>", format!("{}", pi));
    }

    #[test]
    fn test_insert_node_errors() {
        let (mut builder, doc, root) = sample();
        let text = builder.create_text_node("a").unwrap();
        assert_eq!(
            Err(Error::Dom(DomException::HierarchyRequestErr)),
            builder.insert_node(text.clone(), &doc, None)
        );
        let comment = builder.create_comment("c").unwrap();
        assert_eq!(
            Err(Error::Dom(DomException::HierarchyRequestErr)),
            builder.insert_node(comment.clone(), &text, None)
        );
        assert_eq!(
            Err(Error::Dom(DomException::NotFoundErr)),
            builder.insert_node(comment, &root, Some(&text))
        );

        let attr = builder.create_attribute(None, None, "a", "b").unwrap();
        assert_eq!(
            Err(Error::Dom(DomException::HierarchyRequestErr)),
            builder.insert_node(attr.clone(), &root, None)
        );
        builder.append_attribute(attr.clone(), &root).unwrap();
        assert_eq!(
            Err(Error::Dom(DomException::InuseAttributeErr)),
            builder.append_attribute(attr, &root)
        );
    }

    fn deep(depth: usize) -> XmlNode<XmlDocument> {
        let mut builder = XmlDocumentBuilder::new();
        let mut parent = builder.document();
        for _ in 0..depth {
            let child = builder.create_element(None, None, "a").unwrap();
            builder.insert_node(child.clone(), &parent, None).unwrap();
            parent = child;
        }
        let text = builder.create_text_node("x").unwrap();
        builder.insert_node(text, &parent, None).unwrap();
        builder.finish()
    }

    #[test]
    fn test_deep_tree() {
        let doc = deep(100_000);
        let same = deep(100_000);
        let shorter = deep(99_999);
        assert!(*doc.borrow() == *same.borrow());
        assert!(*doc.borrow() != *shorter.borrow());

        let root = doc.borrow().document_element().unwrap();
        assert_eq!("x", root.borrow().text_content());
        assert_eq!(100_000, doc.borrow().get_elements_by_tag_name("a").len());
        assert_eq!(700_001, doc.borrow().to_string().len());

        drop(root);
        drop(doc);
        drop(same);
        drop(shorter);
    }

    #[test]
    fn test_same_node() {
        let (mut builder, _, root) = sample();
        let other = builder.create_element(Some("urn:a"), Some("a"), "root").unwrap();
        assert_eq!(root, other);
        assert!(root.is_same_node(&root.clone()));
        assert!(!root.is_same_node(&other));
    }
}

// -----------------------------------------------------------------------------------------------
