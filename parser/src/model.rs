// -----------------------------------------------------------------------------------------------

/// One step of the document as recognized by the grammar.
#[derive(Clone, Debug, PartialEq)]
pub enum Event<'a> {
    Text(&'a str),
    CharRef(char),
    EntityRef(&'a str),
    Comment(&'a str),
    PI(PI<'a>),
    CData(&'a str),
    XmlDecl(DeclarationXml<'a>),
    Doctype(DeclarationDoc<'a>),
    StartTag(Tag<'a>),
    EndTag(&'a str),
    EmptyTag(Tag<'a>),
}

impl<'a> From<PI<'a>> for Event<'a> {
    fn from(value: PI<'a>) -> Self {
        Event::PI(value)
    }
}

impl<'a> From<DeclarationXml<'a>> for Event<'a> {
    fn from(value: DeclarationXml<'a>) -> Self {
        Event::XmlDecl(value)
    }
}

impl<'a> From<DeclarationDoc<'a>> for Event<'a> {
    fn from(value: DeclarationDoc<'a>) -> Self {
        Event::Doctype(value)
    }
}

impl<'a> From<Reference<'a>> for Event<'a> {
    fn from(value: Reference<'a>) -> Self {
        match value {
            Reference::Character(c) => Event::CharRef(c),
            Reference::Entity(v) => Event::EntityRef(v),
        }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub value: Vec<AttributeValue<'a>>,
}

impl<'a> From<(&'a str, Vec<AttributeValue<'a>>)> for Attribute<'a> {
    fn from(value: (&'a str, Vec<AttributeValue<'a>>)) -> Self {
        let (name, value) = value;
        Attribute { name, value }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue<'a> {
    Reference(Reference<'a>),
    Text(&'a str),
}

impl<'a> From<&'a str> for AttributeValue<'a> {
    fn from(value: &'a str) -> Self {
        AttributeValue::Text(value)
    }
}

impl<'a> From<Reference<'a>> for AttributeValue<'a> {
    fn from(value: Reference<'a>) -> Self {
        AttributeValue::Reference(value)
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct DeclarationAtt<'a> {
    pub name: &'a str,
    pub defs: Vec<DeclarationAttDef<'a>>,
}

impl<'a> From<(&'a str, Vec<DeclarationAttDef<'a>>)> for DeclarationAtt<'a> {
    fn from(value: (&'a str, Vec<DeclarationAttDef<'a>>)) -> Self {
        let (name, defs) = value;
        DeclarationAtt { name, defs }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct DeclarationAttDef<'a> {
    pub name: &'a str,
    pub ty: DeclarationAttType<'a>,
    pub default_decl: DeclarationAttDefault<'a>,
}

impl<'a> From<(&'a str, DeclarationAttType<'a>, DeclarationAttDefault<'a>)>
    for DeclarationAttDef<'a>
{
    fn from(value: (&'a str, DeclarationAttType<'a>, DeclarationAttDefault<'a>)) -> Self {
        let (name, ty, default_decl) = value;
        DeclarationAttDef {
            name,
            ty,
            default_decl,
        }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum DeclarationAttDefault<'a> {
    Required,
    Implied,
    Value(bool, Vec<AttributeValue<'a>>),
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum DeclarationAttType<'a> {
    Cdata,
    Id,
    IdRef,
    IdRefs,
    Entity,
    Entities,
    NmToken,
    NmTokens,
    Notation(Vec<&'a str>),
    Enumeration(Vec<&'a str>),
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct DeclarationDoc<'a> {
    pub name: &'a str,
    pub external_id: Option<ExternalId<'a>>,
    pub internal_subset: Vec<DeclarationMarkup<'a>>,
}

impl<'a>
    From<(
        &'a str,
        Option<ExternalId<'a>>,
        Option<Vec<DeclarationMarkup<'a>>>,
    )> for DeclarationDoc<'a>
{
    fn from(
        value: (
            &'a str,
            Option<ExternalId<'a>>,
            Option<Vec<DeclarationMarkup<'a>>>,
        ),
    ) -> Self {
        let (name, external_id, internal_subset) = value;
        DeclarationDoc {
            name,
            external_id,
            internal_subset: internal_subset.unwrap_or_default(),
        }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct DeclarationElement<'a> {
    pub name: &'a str,
    pub content_spec: &'a str,
}

impl<'a> From<(&'a str, &'a str)> for DeclarationElement<'a> {
    fn from(value: (&'a str, &'a str)) -> Self {
        let (name, content_spec) = value;
        DeclarationElement { name, content_spec }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum DeclarationEntity<'a> {
    General(&'a str, DeclarationEntityDef<'a>),
    Parameter(&'a str, DeclarationEntityDef<'a>),
}

impl<'a> DeclarationEntity<'a> {
    pub fn general(value: (&'a str, DeclarationEntityDef<'a>)) -> Self {
        DeclarationEntity::General(value.0, value.1)
    }

    pub fn parameter(value: (&'a str, DeclarationEntityDef<'a>)) -> Self {
        DeclarationEntity::Parameter(value.0, value.1)
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum DeclarationEntityDef<'a> {
    EntityValue(Vec<EntityValue<'a>>),
    ExternalId(ExternalId<'a>, Option<&'a str>),
}

impl<'a> From<Vec<EntityValue<'a>>> for DeclarationEntityDef<'a> {
    fn from(value: Vec<EntityValue<'a>>) -> Self {
        DeclarationEntityDef::EntityValue(value)
    }
}

impl<'a> From<(ExternalId<'a>, Option<&'a str>)> for DeclarationEntityDef<'a> {
    fn from(value: (ExternalId<'a>, Option<&'a str>)) -> Self {
        DeclarationEntityDef::ExternalId(value.0, value.1)
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum DeclarationMarkup<'a> {
    Element(DeclarationElement<'a>),
    Attributes(DeclarationAtt<'a>),
    Entity(DeclarationEntity<'a>),
    Notation(DeclarationNotation<'a>),
    PI(PI<'a>),
    Comment(&'a str),
    PEReference(&'a str),
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct DeclarationNotation<'a> {
    pub name: &'a str,
    pub id: DeclarationNotationId<'a>,
}

impl<'a> From<(&'a str, DeclarationNotationId<'a>)> for DeclarationNotation<'a> {
    fn from(value: (&'a str, DeclarationNotationId<'a>)) -> Self {
        let (name, id) = value;
        DeclarationNotation { name, id }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeclarationNotationId<'a> {
    ExternalId(ExternalId<'a>),
    PublicId(&'a str),
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct DeclarationXml<'a> {
    pub version: &'a str,
    pub encoding: Option<&'a str>,
    pub standalone: Option<bool>,
}

impl<'a> From<(&'a str, Option<&'a str>, Option<bool>)> for DeclarationXml<'a> {
    fn from(value: (&'a str, Option<&'a str>, Option<bool>)) -> Self {
        let (version, encoding, standalone) = value;
        DeclarationXml {
            version,
            encoding,
            standalone,
        }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum EntityValue<'a> {
    Text(&'a str),
    ParameterEntityReference(&'a str),
    Reference(Reference<'a>),
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum ExternalId<'a> {
    Public(&'a str, &'a str),
    System(&'a str),
}

impl<'a> ExternalId<'a> {
    pub fn public_id(&self) -> Option<&'a str> {
        match self {
            ExternalId::Public(p, _) => Some(*p),
            ExternalId::System(_) => None,
        }
    }

    pub fn system_id(&self) -> &'a str {
        match self {
            ExternalId::Public(_, s) => *s,
            ExternalId::System(s) => *s,
        }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct PI<'a> {
    pub target: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> From<(&'a str, Option<&'a str>)> for PI<'a> {
    fn from(value: (&'a str, Option<&'a str>)) -> Self {
        let (target, value) = value;
        PI { target, value }
    }
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum Reference<'a> {
    Character(char),
    Entity(&'a str),
}

// -----------------------------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct Tag<'a> {
    pub name: &'a str,
    pub attributes: Vec<Attribute<'a>>,
}

impl<'a> From<(&'a str, Vec<Attribute<'a>>)> for Tag<'a> {
    fn from(value: (&'a str, Vec<Attribute<'a>>)) -> Self {
        let (name, attributes) = value;
        Tag { name, attributes }
    }
}

// -----------------------------------------------------------------------------------------------
