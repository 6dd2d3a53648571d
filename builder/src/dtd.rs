use crate::error::{Error, Result};
use crate::guard::EntityExpansionGuard;
use crate::namespace::NamespaceError;
use log::{debug, warn};
use std::collections::HashMap;
use std::rc::Rc;
use xml_parser::error::parse_at;
use xml_parser::model::{
    AttributeValue, DeclarationAtt, DeclarationAttDefault, DeclarationAttType, DeclarationEntity,
    DeclarationEntityDef, DeclarationMarkup, EntityValue, Reference,
};

// -----------------------------------------------------------------------------------------------

/// Replacement of the five predefined entities.
pub fn predefined_entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => None,
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    /// Internal general entity with its replacement text.
    Internal(Rc<str>),
    /// External parsed entity, never loaded.
    External,
    /// External entity with a notation.
    Unparsed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AttributeDefault {
    Required,
    Implied,
    Value(DefaultValue),
}

/// A declared default value, normalized when the declaration is read.
#[derive(Clone, Debug, PartialEq)]
pub struct DefaultValue {
    pub value: String,
    /// Outermost entity referenced by the literal and the length of replacement text included
    /// through it; charged again whenever the default is applied.
    pub expansion: Option<(String, usize)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttributeDef {
    pub cdata: bool,
    pub default: AttributeDefault,
}

// -----------------------------------------------------------------------------------------------

/// Attribute-list and general-entity declarations of the internal subset.
///
/// The first declaration of an entity or of an attribute of an element is binding; later ones
/// are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dtd {
    attributes: HashMap<String, Vec<(String, AttributeDef)>>,
    entities: HashMap<String, Entity>,
}

impl Dtd {
    /// Processes the internal subset in declaration order.
    ///
    /// `offset` locates the document type declaration for error reporting.
    pub fn new(
        subset: &[DeclarationMarkup<'_>],
        standalone: bool,
        guard: &mut EntityExpansionGuard,
        offset: usize,
    ) -> Result<Dtd> {
        let mut dtd = Dtd::default();
        let mut processing = true;

        for declaration in subset {
            match declaration {
                DeclarationMarkup::PEReference(name) => {
                    if processing && !standalone {
                        warn!(
                            "parameter entity `%{};` is not read; ignoring later attribute-list and entity declarations",
                            name
                        );
                        processing = false;
                    }
                }
                DeclarationMarkup::Entity(entity) => {
                    dtd.declare_entity(entity, processing, offset)?;
                }
                DeclarationMarkup::Attributes(attlist) if processing => {
                    dtd.declare_attributes(attlist, guard, offset)?;
                }
                _ => {}
            }
        }

        debug!(
            "internal subset declares {} entities and attributes for {} elements",
            dtd.entities.len(),
            dtd.attributes.len()
        );
        Ok(dtd)
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Whether `attribute` of `element` is CDATA-typed; undeclared attributes are.
    pub fn is_cdata(&self, element: &str, attribute: &str) -> bool {
        self.attributes
            .get(element)
            .and_then(|defs| defs.iter().find(|(name, _)| name == attribute))
            .map(|(_, def)| def.cdata)
            .unwrap_or(true)
    }

    /// Declared default values of the attributes of `element`, in declaration order.
    pub fn attribute_defaults(&self, element: &str) -> Vec<(&str, &DefaultValue)> {
        self.attributes
            .get(element)
            .map(|defs| {
                defs.iter()
                    .filter_map(|(name, def)| match &def.default {
                        AttributeDefault::Value(value) => Some((name.as_str(), value)),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Normalizes an attribute value, including the replacement text of the entities it
    /// references.
    ///
    /// White space characters become spaces, and values that are not CDATA-typed additionally
    /// have runs of spaces collapsed and leading and trailing spaces removed.
    pub fn expand_attribute_value(
        &self,
        parts: &[AttributeValue<'_>],
        cdata: bool,
        guard: &mut EntityExpansionGuard,
        offset: usize,
    ) -> Result<String> {
        let mut value = String::new();
        let mut open = vec![];
        self.append_attribute_value(parts, &mut value, &mut open, guard, offset)?;

        if cdata {
            Ok(value)
        } else {
            Ok(value
                .split(' ')
                .filter(|v| !v.is_empty())
                .collect::<Vec<&str>>()
                .join(" "))
        }
    }

    fn append_attribute_value(
        &self,
        parts: &[AttributeValue<'_>],
        value: &mut String,
        open: &mut Vec<String>,
        guard: &mut EntityExpansionGuard,
        offset: usize,
    ) -> Result<()> {
        for part in parts {
            match part {
                AttributeValue::Text(text) => {
                    value.extend(text.chars().map(|c| match c {
                        '\t' | '\n' | '\r' => ' ',
                        c => c,
                    }));
                }
                AttributeValue::Reference(Reference::Character(c)) => value.push(*c),
                AttributeValue::Reference(Reference::Entity(name)) => {
                    if let Some(c) = predefined_entity(name) {
                        value.push(c);
                        continue;
                    }

                    if open.iter().any(|v| v == name) {
                        return Err(Error::well_formedness(
                            offset,
                            format!("entity `{}` references itself", name),
                        ));
                    }

                    let text = match self.entities.get(*name) {
                        Some(Entity::Internal(text)) => text.clone(),
                        Some(_) => {
                            return Err(Error::well_formedness(
                                offset,
                                format!("external entity `{}` in attribute value", name),
                            ))
                        }
                        None => {
                            return Err(Error::well_formedness(
                                offset,
                                format!("entity `{}` is not declared", name),
                            ))
                        }
                    };

                    guard.enter(name, text.len())?;
                    let parsed = parse_at(xml_parser::attribute_text, &text, 0)
                        .map_err(|_| self.invalid_replacement(name, offset))?;
                    if parsed.offset < text.len() {
                        return Err(self.invalid_replacement(name, offset));
                    }

                    open.push(name.to_string());
                    self.append_attribute_value(&parsed.value, value, open, guard, offset)?;
                    open.pop();
                    guard.exit();
                }
            }
        }
        Ok(())
    }

    fn invalid_replacement(&self, name: &str, offset: usize) -> Error {
        Error::well_formedness(
            offset,
            format!(
                "replacement text of entity `{}` is not allowed in an attribute value",
                name
            ),
        )
    }

    fn declare_entity(
        &mut self,
        declaration: &DeclarationEntity<'_>,
        processing: bool,
        offset: usize,
    ) -> Result<()> {
        let (DeclarationEntity::General(name, _) | DeclarationEntity::Parameter(name, _)) =
            declaration;
        if name.contains(':') {
            return Err(Error::Namespace {
                offset,
                message: NamespaceError::ColonInName(name.to_string()).to_string(),
            });
        }

        match declaration {
            DeclarationEntity::General(name, def) => {
                let entity = match def {
                    DeclarationEntityDef::EntityValue(parts) => {
                        Entity::Internal(Rc::from(replacement_text(parts, offset)?))
                    }
                    DeclarationEntityDef::ExternalId(_, Some(_)) => Entity::Unparsed,
                    DeclarationEntityDef::ExternalId(_, None) => Entity::External,
                };

                if processing && !self.entities.contains_key(*name) {
                    self.entities.insert(name.to_string(), entity);
                }
            }
            DeclarationEntity::Parameter(_, DeclarationEntityDef::EntityValue(parts)) => {
                replacement_text(parts, offset)?;
            }
            DeclarationEntity::Parameter(_, _) => {}
        }
        Ok(())
    }

    fn declare_attributes(
        &mut self,
        attlist: &DeclarationAtt<'_>,
        guard: &mut EntityExpansionGuard,
        offset: usize,
    ) -> Result<()> {
        for def in &attlist.defs {
            let declared = self
                .attributes
                .get(attlist.name)
                .map(|defs| defs.iter().any(|(name, _)| name == def.name))
                .unwrap_or(false);
            if declared {
                continue;
            }

            let cdata = def.ty == DeclarationAttType::Cdata;
            let default = match &def.default_decl {
                DeclarationAttDefault::Required => AttributeDefault::Required,
                DeclarationAttDefault::Implied => AttributeDefault::Implied,
                DeclarationAttDefault::Value(_, parts) => {
                    let before = guard.expanded();
                    let value = self.expand_attribute_value(parts, cdata, guard, offset)?;
                    let length = guard.expanded() - before;
                    let entity = parts.iter().find_map(|v| match v {
                        AttributeValue::Reference(Reference::Entity(name))
                            if predefined_entity(name).is_none() =>
                        {
                            Some(name.to_string())
                        }
                        _ => None,
                    });
                    AttributeDefault::Value(DefaultValue {
                        value,
                        expansion: entity.filter(|_| length > 0).map(|v| (v, length)),
                    })
                }
            };

            self.attributes
                .entry(attlist.name.to_string())
                .or_default()
                .push((def.name.to_string(), AttributeDef { cdata, default }));
        }
        Ok(())
    }
}

/// Character references are included, entity references are kept as written.
fn replacement_text(parts: &[EntityValue<'_>], offset: usize) -> Result<String> {
    let mut text = String::new();
    for part in parts {
        match part {
            EntityValue::Text(v) => text.push_str(v),
            EntityValue::Reference(Reference::Character(c)) => text.push(*c),
            EntityValue::Reference(Reference::Entity(name)) => {
                text.push('&');
                text.push_str(name);
                text.push(';');
            }
            EntityValue::ParameterEntityReference(name) => {
                return Err(Error::well_formedness(
                    offset,
                    format!(
                        "parameter entity `%{};` cannot be referenced inside a declaration",
                        name
                    ),
                ));
            }
        }
    }
    Ok(text)
}

// -----------------------------------------------------------------------------------------------


// -----------------------------------------------------------------------------------------------
