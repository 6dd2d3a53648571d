use std::rc::Rc;
use thiserror::Error;
use xml_nom::model::QName;

pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

#[derive(Clone, Debug, PartialEq, Error)]
pub enum NamespaceError {
    #[error("`{0}` is not a qualified name")]
    InvalidQName(String),
    #[error("prefix `{0}` is not declared")]
    UndeclaredPrefix(String),
    #[error("prefix `{0}` cannot be bound to `{1}`")]
    ReservedPrefix(String, String),
    #[error("namespace `{0}` cannot be bound here")]
    ReservedNamespace(String),
    #[error("prefix `{0}` cannot be undeclared")]
    EmptyPrefix(String),
    #[error("`{0}` must not contain a colon")]
    ColonInName(String),
}

/// Splits a qualified element or attribute name.
pub fn split(name: &str) -> Result<QName<'_>, NamespaceError> {
    xml_nom::split_qname(name).ok_or_else(|| NamespaceError::InvalidQName(name.to_string()))
}

// -----------------------------------------------------------------------------------------------

/// One immutable namespace scope.
///
/// A scope only holds the bindings declared by one start tag; lookups fall back to the parent
/// scope. Elements without declarations share the scope of their parent.
#[derive(Debug, PartialEq)]
pub struct Namespaces {
    bindings: Vec<(Option<String>, Option<String>)>,
    parent: Option<Rc<Namespaces>>,
}

impl Namespaces {
    pub fn root() -> Rc<Namespaces> {
        Rc::new(Namespaces {
            bindings: vec![
                (Some("xml".to_string()), Some(XML_NAMESPACE.to_string())),
                (Some("xmlns".to_string()), Some(XMLNS_NAMESPACE.to_string())),
                (None, None),
            ],
            parent: None,
        })
    }

    /// Builds the scope of a start tag from its attributes.
    ///
    /// `explicit` holds the attributes written in the tag in document order and `defaults`
    /// the attribute defaults declared for the element. A default never overrides an explicit
    /// declaration of the same prefix. Returns `parent` itself when nothing is declared.
    pub fn from_attrs<E, D>(
        parent: &Rc<Namespaces>,
        explicit: &[(E, String)],
        defaults: &[(D, String)],
    ) -> Result<Rc<Namespaces>, NamespaceError>
    where
        E: AsRef<str>,
        D: AsRef<str>,
    {
        let mut bindings: Vec<(Option<String>, Option<String>)> = vec![];

        for (name, value) in explicit {
            if let Some(prefix) = declared_prefix(name.as_ref()) {
                bindings.push(binding(prefix, value)?);
            }
        }

        let explicit_count = bindings.len();
        for (name, value) in defaults {
            if let Some(prefix) = declared_prefix(name.as_ref()) {
                let overridden = bindings[..explicit_count]
                    .iter()
                    .any(|(v, _)| v.as_deref() == prefix);
                if !overridden {
                    bindings.push(binding(prefix, value)?);
                }
            }
        }

        if bindings.is_empty() {
            Ok(parent.clone())
        } else {
            Ok(Rc::new(Namespaces {
                bindings,
                parent: Some(parent.clone()),
            }))
        }
    }

    /// Namespace of an element with `prefix`. Elements cannot use the `xmlns` prefix.
    pub fn get_for_element(&self, prefix: Option<&str>) -> Result<Option<&str>, NamespaceError> {
        match prefix {
            Some("xmlns") => Err(NamespaceError::ReservedPrefix(
                "xmlns".to_string(),
                XMLNS_NAMESPACE.to_string(),
            )),
            _ => self.resolve(prefix),
        }
    }

    /// Namespace of an attribute; unprefixed attributes have none, except `xmlns` itself.
    pub fn get_for_attribute(
        &self,
        prefix: Option<&str>,
        local_name: &str,
    ) -> Result<Option<&str>, NamespaceError> {
        match prefix {
            None if local_name == "xmlns" => Ok(Some(XMLNS_NAMESPACE)),
            None => Ok(None),
            Some(_) => self.resolve(prefix),
        }
    }

    fn resolve(&self, prefix: Option<&str>) -> Result<Option<&str>, NamespaceError> {
        match self.lookup(prefix) {
            Some(uri) => Ok(uri),
            None => match prefix {
                Some(prefix) => Err(NamespaceError::UndeclaredPrefix(prefix.to_string())),
                None => Ok(None),
            },
        }
    }

    fn lookup(&self, prefix: Option<&str>) -> Option<Option<&str>> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            // The latest binding of a prefix in one tag wins.
            let found = current
                .bindings
                .iter()
                .rev()
                .find(|(p, _)| p.as_deref() == prefix);
            if let Some((_, uri)) = found {
                return Some(uri.as_deref());
            }
            scope = current.parent.as_deref();
        }
        None
    }
}

/// `Some(None)` for `xmlns`, `Some(Some(p))` for `xmlns:p`.
fn declared_prefix(name: &str) -> Option<Option<&str>> {
    if name == "xmlns" {
        Some(None)
    } else {
        name.strip_prefix("xmlns:").map(Some)
    }
}

fn binding(
    prefix: Option<&str>,
    uri: &str,
) -> Result<(Option<String>, Option<String>), NamespaceError> {
    match prefix {
        Some("xmlns") => {
            return Err(NamespaceError::ReservedPrefix(
                "xmlns".to_string(),
                uri.to_string(),
            ))
        }
        Some("xml") if uri != XML_NAMESPACE => {
            return Err(NamespaceError::ReservedPrefix(
                "xml".to_string(),
                uri.to_string(),
            ))
        }
        Some(p) if p != "xml" && uri == XML_NAMESPACE => {
            return Err(NamespaceError::ReservedNamespace(uri.to_string()))
        }
        None if uri == XML_NAMESPACE => {
            return Err(NamespaceError::ReservedNamespace(uri.to_string()))
        }
        Some(p) if uri.is_empty() => return Err(NamespaceError::EmptyPrefix(p.to_string())),
        _ => {}
    }

    if uri == XMLNS_NAMESPACE {
        return Err(NamespaceError::ReservedNamespace(uri.to_string()));
    }

    let uri = if uri.is_empty() {
        None
    } else {
        Some(uri.to_string())
    };
    Ok((prefix.map(|v| v.to_string()), uri))
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(values: &[(&str, &str)]) -> Vec<(String, String)> {
        values
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    const NONE: &[(String, String)] = &[];

    #[test]
    fn test_root() {
        let root = Namespaces::root();
        assert_eq!(Ok(Some(XML_NAMESPACE)), root.get_for_element(Some("xml")));
        assert_eq!(Ok(None), root.get_for_element(None));
        assert_eq!(
            Err(NamespaceError::UndeclaredPrefix("p".to_string())),
            root.get_for_element(Some("p"))
        );
        assert_eq!(Ok(Some(XMLNS_NAMESPACE)), root.get_for_attribute(None, "xmlns"));
        assert_eq!(
            Ok(Some(XMLNS_NAMESPACE)),
            root.get_for_attribute(Some("xmlns"), "p")
        );
    }

    #[test]
    fn test_shared_scope() {
        let root = Namespaces::root();
        let scope = Namespaces::from_attrs(&root, &attrs(&[("a", "b")]), NONE).unwrap();
        assert!(Rc::ptr_eq(&root, &scope));
    }

    #[test]
    fn test_default_namespace() {
        let root = Namespaces::root();
        let outer =
            Namespaces::from_attrs(&root, &attrs(&[("xmlns", "urn:x")]), NONE).unwrap();
        let inner =
            Namespaces::from_attrs(&outer, &attrs(&[("xmlns:p", "urn:y")]), NONE).unwrap();
        assert_eq!(Ok(Some("urn:x")), inner.get_for_element(None));
        assert_eq!(Ok(Some("urn:y")), inner.get_for_element(Some("p")));
        assert_eq!(Ok(None), inner.get_for_attribute(None, "attr"));
        assert_eq!(Ok(Some("urn:y")), inner.get_for_attribute(Some("p"), "attr"));

        let reset = Namespaces::from_attrs(&inner, &attrs(&[("xmlns", "")]), NONE).unwrap();
        assert_eq!(Ok(None), reset.get_for_element(None));
        assert_eq!(Ok(Some("urn:x")), outer.get_for_element(None));
    }

    #[test]
    fn test_defaults() {
        let root = Namespaces::root();
        let scope = Namespaces::from_attrs(
            &root,
            &attrs(&[("xmlns:p", "urn:explicit")]),
            &attrs(&[("xmlns:p", "urn:default"), ("xmlns:q", "urn:q")]),
        )
        .unwrap();
        assert_eq!(Ok(Some("urn:explicit")), scope.get_for_element(Some("p")));
        assert_eq!(Ok(Some("urn:q")), scope.get_for_element(Some("q")));
    }

    #[test]
    fn test_reserved() {
        let root = Namespaces::root();
        let cases = [
            ("xmlns:xml", "urn:x"),
            ("xmlns:p", XML_NAMESPACE),
            ("xmlns", XML_NAMESPACE),
            ("xmlns:p", XMLNS_NAMESPACE),
            ("xmlns", XMLNS_NAMESPACE),
            ("xmlns:xmlns", XMLNS_NAMESPACE),
            ("xmlns:p", ""),
        ];
        for (name, value) in cases {
            let ret = Namespaces::from_attrs(&root, &attrs(&[(name, value)]), NONE);
            assert!(ret.is_err(), "{}={}", name, value);
        }

        let scope =
            Namespaces::from_attrs(&root, &attrs(&[("xmlns:xml", XML_NAMESPACE)]), NONE)
                .unwrap();
        assert_eq!(Ok(Some(XML_NAMESPACE)), scope.get_for_element(Some("xml")));
    }

    #[test]
    fn test_xmlns_element() {
        let root = Namespaces::root();
        assert_eq!(
            Err(NamespaceError::ReservedPrefix(
                "xmlns".to_string(),
                XMLNS_NAMESPACE.to_string()
            )),
            root.get_for_element(Some("xmlns"))
        );
        assert_eq!(
            Ok(Some(XMLNS_NAMESPACE)),
            root.get_for_attribute(Some("xmlns"), "p")
        );
    }

    #[test]
    fn test_split() {
        let name = split("p:a").unwrap();
        assert_eq!(Some("p"), name.prefix());
        assert_eq!("a", name.local_part());
        assert_eq!(
            Err(NamespaceError::InvalidQName("a:".to_string())),
            split("a:")
        );
    }
}

// -----------------------------------------------------------------------------------------------
