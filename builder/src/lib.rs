//! Well-formedness checking XML parser producing a namespace-aware document tree.
//!
//! ```
//! use xml_dom::{Document, Element};
//!
//! let doc = xml_builder::parse("<a xmlns='urn:x'><b c='d'/></a>").unwrap();
//! let b = doc.borrow().get_elements_by_tag_name("b");
//! assert_eq!(Some("d".to_string()), b[0].borrow().get_attribute("c"));
//! ```

pub mod driver;
pub mod dtd;
pub mod error;
pub mod guard;
pub mod namespace;
pub mod options;

pub use error::{Error, ErrorKind, Result};
pub use options::ParseOptions;

use xml_dom::{TreeBuilder, XmlDocument, XmlDocumentBuilder, XmlNode};

// -----------------------------------------------------------------------------------------------

/// Parses a document with the default options.
pub fn parse(text: &str) -> Result<XmlNode<XmlDocument>> {
    parse_with_options(text, &ParseOptions::default())
}

pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<XmlNode<XmlDocument>> {
    parse_into(text, options, XmlDocumentBuilder::new())
}

/// Parses a document into the tree representation of `builder`.
pub fn parse_into<B: TreeBuilder>(
    text: &str,
    options: &ParseOptions,
    builder: B,
) -> Result<B::Output> {
    driver::parse(text, options, builder)
}
