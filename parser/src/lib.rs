pub mod error;
pub mod model;
pub mod stream;

use error::IResult;
use model::Event;
use nom::branch::alt;
use nom::bytes::complete::{take_until, take_while, take_while1};
use nom::character::complete::{
    alpha1, digit1, hex_digit1, multispace0, multispace1, one_of, satisfy,
};
use nom::combinator::{all_consuming, cut, map, map_opt, opt, peek, recognize, verify};
use nom::error::context;
use nom::multi::{many0, many1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use xml_nom::helper::{self, token};
use xml_nom::xmlchar;

// -----------------------------------------------------------------------------------------------

/// prolog element Misc*
///
/// The element and the trailing misc are recognized as a flat run of content items; nesting
/// and the single root element are checked by whoever consumes the events.
///
/// [\[1\] document](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-document)
pub fn document(input: &str) -> IResult<'_, Vec<Event<'_>>> {
    map(all_consuming(pair(prolog, content)), |(mut events, body)| {
        events.extend(body);
        events
    })(input)
}

/// NameStartChar (NameChar)*
///
/// [\[5\] Name](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Name)
fn name(input: &str) -> IResult<'_, &str> {
    context(
        "Name",
        recognize(pair(
            satisfy(xmlchar::is_name_start_char),
            take_while(xmlchar::is_name_char),
        )),
    )(input)
}

/// (NameChar)+
///
/// [\[7\] Nmtoken](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Nmtoken)
fn nmtoken(input: &str) -> IResult<'_, &str> {
    context("Nmtoken", take_while1(xmlchar::is_name_char))(input)
}

/// '"' ([^%&"] | PEReference | Reference)* '"' | "'" ([^%&'] | PEReference | Reference)* "'"
///
/// [\[9\] EntityValue](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-EntityValue)
fn entity_value(input: &str) -> IResult<'_, Vec<model::EntityValue<'_>>> {
    alt((
        delimited(
            token("\""),
            many0(alt((
                map(xmlchar::char_except1("%&\""), model::EntityValue::Text),
                map(pe_reference, model::EntityValue::ParameterEntityReference),
                map(reference, model::EntityValue::Reference),
            ))),
            token("\""),
        ),
        delimited(
            token("'"),
            many0(alt((
                map(xmlchar::char_except1("%&'"), model::EntityValue::Text),
                map(pe_reference, model::EntityValue::ParameterEntityReference),
                map(reference, model::EntityValue::Reference),
            ))),
            token("'"),
        ),
    ))(input)
}

/// '"' ([^<&"] | Reference)* '"' |  "'" ([^<&'] | Reference)* "'"
///
/// [\[10\] AttValue](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-AttValue)
fn att_value(input: &str) -> IResult<'_, Vec<model::AttributeValue<'_>>> {
    alt((
        delimited(
            token("\""),
            many0(alt((
                map(xmlchar::char_except1("<&\""), model::AttributeValue::from),
                map(reference, model::AttributeValue::from),
            ))),
            token("\""),
        ),
        delimited(
            token("'"),
            many0(alt((
                map(xmlchar::char_except1("<&'"), model::AttributeValue::from),
                map(reference, model::AttributeValue::from),
            ))),
            token("'"),
        ),
    ))(input)
}

/// ([^<&] | Reference)*
///
/// The inside of an attribute value literal, used to re-parse entity replacement text that
/// is included in an attribute value.
pub fn attribute_text(input: &str) -> IResult<'_, Vec<model::AttributeValue<'_>>> {
    many0(alt((
        map(xmlchar::char_except1("<&"), model::AttributeValue::from),
        map(reference, model::AttributeValue::from),
    )))(input)
}

/// ('"' [^"]* '"') | ("'" [^']* "'")
///
/// [\[11\] SystemLiteral](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-SystemLiteral)
fn system_literal(input: &str) -> IResult<'_, &str> {
    alt((
        delimited(token("\""), xmlchar::char_except0("\""), token("\"")),
        delimited(token("'"), xmlchar::char_except0("'"), token("'")),
    ))(input)
}

/// '"' PubidChar* '"' | "'" (PubidChar - "'")* "'"
///
/// [\[12\] PubidLiteral](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-PubidLiteral)
fn pubid_literal(input: &str) -> IResult<'_, &str> {
    alt((
        delimited(token("\""), xmlchar::pubid_char_except0(""), token("\"")),
        delimited(token("'"), xmlchar::pubid_char_except0("'"), token("'")),
    ))(input)
}

/// \[^<&]+ - (\[^<&]* ']]>' \[^<&]*)
///
/// [\[14\] CharData](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-CharData)
fn char_data(input: &str) -> IResult<'_, &str> {
    helper::take_until(xmlchar::char_except1("<&"), "]]>")(input)
}

/// '\<!--' ((Char - '-') | ('-' (Char - '-')))* '-->'
///
/// [\[15\] Comment](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Comment)
fn comment(input: &str) -> IResult<'_, &str> {
    preceded(
        token("<!--"),
        cut(terminated(
            recognize(many0(pair(
                opt(token("-")),
                xmlchar::char_except1("-"),
            ))),
            token("-->"),
        )),
    )(input)
}

/// '\<?' PITarget (S (Char* - (Char* '?>' Char*)))? '?>'
///
/// [\[16\] PI](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-PI)
fn pi(input: &str) -> IResult<'_, model::PI<'_>> {
    map(
        preceded(
            token("<?"),
            cut(terminated(
                pair(pi_target, opt(preceded(multispace1, pi_data))),
                token("?>"),
            )),
        ),
        model::PI::from,
    )(input)
}

/// Name - (('X' | 'x') ('M' | 'm') ('L' | 'l'))
///
/// [\[17\] PITarget](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-PITarget)
fn pi_target(input: &str) -> IResult<'_, &str> {
    context("PITarget", helper::take_except(name, "xml"))(input)
}

/// CDStart CData CDEnd
///
/// [\[18\] CDSect](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-CDSect)
fn cdsect(input: &str) -> IResult<'_, &str> {
    preceded(
        token("<![CDATA["),                                // [19] CDStart
        cut(terminated(cdata, token("]]>"))), // [20] CData, [21] CDEnd
    )(input)
}

/// XMLDecl? Misc* (doctypedecl Misc*)?
///
/// [\[22\] prolog](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-prolog)
pub fn prolog(input: &str) -> IResult<'_, Vec<Event<'_>>> {
    map(
        tuple((
            opt(xml_decl),
            many0(misc),
            opt(pair(doctype_decl, many0(misc))),
        )),
        |(decl, heads, doc)| {
            let mut events = vec![];
            events.extend(decl.map(Event::from));
            events.extend(heads.into_iter().flatten());
            if let Some((doc, tails)) = doc {
                events.push(Event::from(doc));
                events.extend(tails.into_iter().flatten());
            }
            events
        },
    )(input)
}

/// '\<?xml' VersionInfo EncodingDecl? SDDecl? S? '?>'
///
/// [\[23\] XMLDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-XMLDecl)
fn xml_decl(input: &str) -> IResult<'_, model::DeclarationXml<'_>> {
    map(
        preceded(
            pair(token("<?xml"), peek(multispace1)),
            cut(terminated(
                tuple((version_info, opt(encoding_decl), opt(sd_decl))),
                pair(multispace0, token("?>")),
            )),
        ),
        model::DeclarationXml::from,
    )(input)
}

/// S 'version' Eq ("'" VersionNum "'" | '"' VersionNum '"')
///
/// [\[24\] VersionInfo](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-VersionInfo)
fn version_info(input: &str) -> IResult<'_, &str> {
    preceded(
        tuple((multispace1, token("version"), eq)),
        alt((
            delimited(token("'"), version_num, token("'")),
            delimited(token("\""), version_num, token("\"")),
        )),
    )(input)
}

/// S? '=' S?
///
/// [\[25\] Eq](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Eq)
fn eq(input: &str) -> IResult<'_, &str> {
    delimited(multispace0, token("="), multispace0)(input)
}

/// '1.' [0-9]+
///
/// [\[26\] VersionNum](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-VersionNum)
pub fn version_num(input: &str) -> IResult<'_, &str> {
    context("VersionNum", recognize(pair(token("1."), digit1)))(input)
}

/// Comment | PI | S
///
/// White space produces no event.
///
/// [\[27\] Misc](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Misc)
pub fn misc(input: &str) -> IResult<'_, Option<Event<'_>>> {
    alt((
        map(comment, |v| Some(Event::Comment(v))),
        map(pi, |v| Some(Event::from(v))),
        map(multispace1, |_| None),
    ))(input)
}

/// '\<!DOCTYPE' S Name (S ExternalID)? S? ('[' intSubset ']' S?)? '>'
///
/// [\[28\] doctypedecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-doctypedecl)
fn doctype_decl(input: &str) -> IResult<'_, model::DeclarationDoc<'_>> {
    map(
        preceded(
            token("<!DOCTYPE"),
            cut(tuple((
                preceded(multispace1, name),
                terminated(opt(preceded(multispace1, external_id)), multispace0),
                terminated(
                    opt(delimited(
                        token("["),
                        int_subset,
                        pair(token("]"), multispace0),
                    )),
                    token(">"),
                ),
            ))),
        ),
        model::DeclarationDoc::from,
    )(input)
}

/// PEReference | S
///
/// [\[28a\] DeclSep](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-DeclSep)
fn decl_sep(input: &str) -> IResult<'_, Option<&str>> {
    alt((map(pe_reference, Some), map(multispace1, |_| None)))(input)
}

/// (markupdecl | DeclSep)*
///
/// [\[28b\] intSubset](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-intSubset)
fn int_subset(input: &str) -> IResult<'_, Vec<model::DeclarationMarkup<'_>>> {
    map(
        many0(alt((
            map(markup_decl, Some),
            map(decl_sep, |v| v.map(model::DeclarationMarkup::PEReference)),
        ))),
        |v| v.into_iter().flatten().collect(),
    )(input)
}

/// elementdecl | AttlistDecl | EntityDecl | NotationDecl | PI | Comment
///
/// [\[29\] markupdecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-markupdecl)
fn markup_decl(input: &str) -> IResult<'_, model::DeclarationMarkup<'_>> {
    alt((
        map(element_decl, model::DeclarationMarkup::Element),
        map(attlist_decl, model::DeclarationMarkup::Attributes),
        map(entity_decl, model::DeclarationMarkup::Entity),
        map(notation_decl, model::DeclarationMarkup::Notation),
        map(pi, model::DeclarationMarkup::PI),
        map(comment, model::DeclarationMarkup::Comment),
    ))(input)
}

/// S 'standalone' Eq (("'" ('yes' | 'no') "'") | ('"' ('yes' | 'no') '"'))
///
/// [\[32\] SDDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-SDDecl)
fn sd_decl(input: &str) -> IResult<'_, bool> {
    map(
        preceded(
            tuple((multispace1, token("standalone"), eq)),
            alt((
                delimited(token("'"), token("yes"), token("'")),
                delimited(token("\""), token("yes"), token("\"")),
                delimited(token("'"), token("no"), token("'")),
                delimited(token("\""), token("no"), token("\"")),
            )),
        ),
        |v| v == "yes",
    )(input)
}

/// '\<' Name (S Attribute)* S? ('>' | '/>')
///
/// [\[40\] STag](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-STag)
///
/// [\[44\] EmptyElemTag](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-EmptyElemTag)
fn stag(input: &str) -> IResult<'_, Event<'_>> {
    preceded(
        token("<"),
        cut(map(
            tuple((
                name,
                many0(preceded(multispace1, attribute)),
                preceded(multispace0, alt((token(">"), token("/>")))),
            )),
            |(name, attributes, close)| {
                let tag = model::Tag::from((name, attributes));
                if close == "/>" {
                    Event::EmptyTag(tag)
                } else {
                    Event::StartTag(tag)
                }
            },
        )),
    )(input)
}

/// Name Eq AttValue
///
/// [\[41\] Attribute](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Attribute)
fn attribute(input: &str) -> IResult<'_, model::Attribute<'_>> {
    map(
        pair(terminated(name, eq), cut(att_value)),
        model::Attribute::from,
    )(input)
}

/// '\</' Name S? '>'
///
/// [\[42\] ETag](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-ETag)
fn etag(input: &str) -> IResult<'_, &str> {
    preceded(
        token("</"),
        cut(terminated(name, pair(multispace0, token(">")))),
    )(input)
}

/// CharData | element | Reference | CDSect | PI | Comment
///
/// One item of [\[43\] content](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-content);
/// an element contributes its start tag, end tag or empty-element tag as separate items.
pub fn content_item(input: &str) -> IResult<'_, Option<Event<'_>>> {
    map(
        alt((
            map(char_data, Event::Text),
            map(reference, Event::from),
            map(comment, Event::Comment),
            map(cdsect, Event::CData),
            map(pi, Event::from),
            map(etag, Event::EndTag),
            stag,
        )),
        Some,
    )(input)
}

/// CharData? ((element | Reference | CDSect | PI | Comment) CharData?)*
///
/// [\[43\] content](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-content)
pub fn content(input: &str) -> IResult<'_, Vec<Event<'_>>> {
    map(many0(content_item), |v| v.into_iter().flatten().collect())(input)
}

/// '\<!ELEMENT' S Name S contentspec S? '>'
///
/// [\[45\] elementdecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-elementdecl)
fn element_decl(input: &str) -> IResult<'_, model::DeclarationElement<'_>> {
    map(
        preceded(
            token("<!ELEMENT"),
            cut(tuple((
                preceded(multispace1, name),
                delimited(multispace1, content_spec, pair(multispace0, token(">"))),
            ))),
        ),
        model::DeclarationElement::from,
    )(input)
}

/// 'EMPTY' | 'ANY' | Mixed | children
///
/// [\[46\] contentspec](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-contentspec)
fn content_spec(input: &str) -> IResult<'_, &str> {
    alt((token("EMPTY"), token("ANY"), mixed, children))(input)
}

/// (choice | seq) ('?' | '*' | '+')?
///
/// [\[47\] children](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-children)
fn children(input: &str) -> IResult<'_, &str> {
    recognize(pair(alt((choice, seq)), opt(one_of("?*+"))))(input)
}

/// (Name | choice | seq) ('?' | '*' | '+')?
///
/// [\[48\] cp](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-cp)
fn cp(input: &str) -> IResult<'_, &str> {
    recognize(pair(alt((name, choice, seq)), opt(one_of("?*+"))))(input)
}

/// '(' S? cp ( S? '|' S? cp )+ S? ')'
///
/// [\[49\] choice](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-choice)
fn choice(input: &str) -> IResult<'_, &str> {
    recognize(tuple((
        pair(token("("), multispace0),
        cp,
        many1(preceded(tuple((multispace0, token("|"), multispace0)), cp)),
        pair(multispace0, token(")")),
    )))(input)
}

/// '(' S? cp ( S? ',' S? cp )* S? ')'
///
/// [\[50\] seq](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-seq)
fn seq(input: &str) -> IResult<'_, &str> {
    recognize(tuple((
        pair(token("("), multispace0),
        cp,
        many0(preceded(tuple((multispace0, token(","), multispace0)), cp)),
        pair(multispace0, token(")")),
    )))(input)
}

/// '(' S? '#PCDATA' (S? '|' S? Name)* S? ')*' | '(' S? '#PCDATA' S? ')'
///
/// [\[51\] Mixed](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Mixed)
fn mixed(input: &str) -> IResult<'_, &str> {
    alt((
        recognize(tuple((
            tuple((token("("), multispace0, token("#PCDATA"))),
            many0(preceded(tuple((multispace0, token("|"), multispace0)), name)),
            pair(multispace0, token(")*")),
        ))),
        recognize(tuple((
            token("("),
            multispace0,
            token("#PCDATA"),
            multispace0,
            token(")"),
        ))),
    ))(input)
}

/// '\<!ATTLIST' S Name AttDef* S? '>'
///
/// [\[52\] AttlistDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-AttlistDecl)
fn attlist_decl(input: &str) -> IResult<'_, model::DeclarationAtt<'_>> {
    map(
        preceded(
            token("<!ATTLIST"),
            cut(terminated(
                pair(preceded(multispace1, name), many0(att_def)),
                pair(multispace0, token(">")),
            )),
        ),
        model::DeclarationAtt::from,
    )(input)
}

/// S Name S AttType S DefaultDecl
///
/// [\[53\] AttDef](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-AttDef)
fn att_def(input: &str) -> IResult<'_, model::DeclarationAttDef<'_>> {
    map(
        preceded(
            multispace1,
            tuple((
                name,
                cut(preceded(multispace1, att_type)),
                cut(preceded(multispace1, default_decl)),
            )),
        ),
        model::DeclarationAttDef::from,
    )(input)
}

/// StringType | TokenizedType | EnumeratedType
///
/// [\[54\] AttType](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-AttType)
fn att_type(input: &str) -> IResult<'_, model::DeclarationAttType<'_>> {
    alt((
        enumerated_type,
        map(token("CDATA"), |_| model::DeclarationAttType::Cdata), // [55] StringType
        map(token("IDREFS"), |_| model::DeclarationAttType::IdRefs), // [56] TokenizedType
        map(token("IDREF"), |_| model::DeclarationAttType::IdRef), // [56] TokenizedType
        map(token("ID"), |_| model::DeclarationAttType::Id),       // [56] TokenizedType
        map(token("ENTITIES"), |_| model::DeclarationAttType::Entities), // [56] TokenizedType
        map(token("ENTITY"), |_| model::DeclarationAttType::Entity), // [56] TokenizedType
        map(token("NMTOKENS"), |_| model::DeclarationAttType::NmTokens), // [56] TokenizedType
        map(token("NMTOKEN"), |_| model::DeclarationAttType::NmToken), // [56] TokenizedType
    ))(input)
}

/// NotationType | Enumeration
///
/// [\[57\] EnumeratedType](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-EnumeratedType)
fn enumerated_type(input: &str) -> IResult<'_, model::DeclarationAttType<'_>> {
    alt((
        map(notation_type, model::DeclarationAttType::Notation),
        map(enumeration, model::DeclarationAttType::Enumeration),
    ))(input)
}

/// 'NOTATION' S '(' S? Name (S? '|' S? Name)* S? ')'
///
/// [\[58\] NotationType](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-NotationType)
fn notation_type(input: &str) -> IResult<'_, Vec<&str>> {
    map(
        delimited(
            tuple((token("NOTATION"), multispace1, token("("), multispace0)),
            pair(
                name,
                many0(preceded(tuple((multispace0, token("|"), multispace0)), name)),
            ),
            pair(multispace0, token(")")),
        ),
        |(f, mut r)| {
            r.insert(0, f);
            r
        },
    )(input)
}

/// '(' S? Nmtoken (S? '|' S? Nmtoken)* S? ')'
///
/// [\[59\] Enumeration](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Enumeration)
fn enumeration(input: &str) -> IResult<'_, Vec<&str>> {
    map(
        delimited(
            pair(token("("), multispace0),
            pair(
                nmtoken,
                many0(preceded(
                    tuple((multispace0, token("|"), multispace0)),
                    nmtoken,
                )),
            ),
            pair(multispace0, token(")")),
        ),
        |(f, mut r)| {
            r.insert(0, f);
            r
        },
    )(input)
}

/// '#REQUIRED' | '#IMPLIED' | (('#FIXED' S)? AttValue)
///
/// [\[60\] DefaultDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-DefaultDecl)
fn default_decl(input: &str) -> IResult<'_, model::DeclarationAttDefault<'_>> {
    alt((
        map(token("#REQUIRED"), |_| model::DeclarationAttDefault::Required),
        map(token("#IMPLIED"), |_| model::DeclarationAttDefault::Implied),
        map(
            pair(opt(terminated(token("#FIXED"), multispace1)), att_value),
            |(f, a)| model::DeclarationAttDefault::Value(f.is_some(), a),
        ),
    ))(input)
}

/// '&#' [0-9]+ ';' | '&#x' [0-9a-fA-F]+ ';'
///
/// The leading '&' is consumed by [`reference`].
///
/// [\[66\] CharRef](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-CharRef)
fn char_ref(input: &str) -> IResult<'_, char> {
    context(
        "Char",
        alt((
            map_opt(delimited(token("#x"), hex_digit1, token(";")), |v| {
                char_from(v, 16)
            }),
            map_opt(delimited(token("#"), digit1, token(";")), |v| {
                char_from(v, 10)
            }),
        )),
    )(input)
}

/// EntityRef | CharRef
///
/// [\[67\] Reference](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-Reference)
///
/// [\[68\] EntityRef](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-EntityRef)
fn reference(input: &str) -> IResult<'_, model::Reference<'_>> {
    preceded(
        token("&"),
        cut(alt((
            map(char_ref, model::Reference::Character),
            map(terminated(name, token(";")), model::Reference::Entity),
        ))),
    )(input)
}

/// '%' Name ';'
///
/// [\[69\] PEReference](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-PEReference)
fn pe_reference(input: &str) -> IResult<'_, &str> {
    preceded(token("%"), cut(terminated(name, token(";"))))(input)
}

/// GEDecl | PEDecl
///
/// [\[70\] EntityDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-EntityDecl)
///
/// [\[71\] GEDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-GEDecl)
///
/// [\[72\] PEDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-PEDecl)
fn entity_decl(input: &str) -> IResult<'_, model::DeclarationEntity<'_>> {
    preceded(
        token("<!ENTITY"),
        cut(delimited(
            multispace1,
            alt((
                map(
                    preceded(
                        pair(token("%"), multispace1),
                        pair(terminated(name, multispace1), pe_def),
                    ),
                    model::DeclarationEntity::parameter,
                ),
                map(
                    pair(terminated(name, multispace1), entity_def),
                    model::DeclarationEntity::general,
                ),
            )),
            pair(multispace0, token(">")),
        )),
    )(input)
}

/// EntityValue | (ExternalID NDataDecl?)
///
/// [\[73\] EntityDef](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-EntityDef)
fn entity_def(input: &str) -> IResult<'_, model::DeclarationEntityDef<'_>> {
    alt((
        map(entity_value, model::DeclarationEntityDef::from),
        map(
            pair(external_id, opt(ndata_decl)),
            model::DeclarationEntityDef::from,
        ),
    ))(input)
}

/// EntityValue | ExternalID
///
/// [\[74\] PEDef](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-PEDef)
fn pe_def(input: &str) -> IResult<'_, model::DeclarationEntityDef<'_>> {
    alt((
        map(entity_value, model::DeclarationEntityDef::from),
        map(external_id, |v| model::DeclarationEntityDef::from((v, None))),
    ))(input)
}

/// 'SYSTEM' S SystemLiteral | 'PUBLIC' S PubidLiteral S SystemLiteral
///
/// [\[75\] ExternalID](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-ExternalID)
fn external_id(input: &str) -> IResult<'_, model::ExternalId<'_>> {
    alt((
        map(
            preceded(pair(token("SYSTEM"), multispace1), system_literal),
            model::ExternalId::System,
        ),
        map(
            preceded(
                pair(token("PUBLIC"), multispace1),
                pair(pubid_literal, preceded(multispace1, system_literal)),
            ),
            |(p, s)| model::ExternalId::Public(p, s),
        ),
    ))(input)
}

/// S 'NDATA' S Name
///
/// [\[76\] NDataDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-NDataDecl)
fn ndata_decl(input: &str) -> IResult<'_, &str> {
    preceded(tuple((multispace1, token("NDATA"), multispace1)), name)(input)
}

/// S 'encoding' Eq ('"' EncName '"' | "'" EncName "'" )
///
/// [\[80\] EncodingDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-EncodingDecl)
fn encoding_decl(input: &str) -> IResult<'_, &str> {
    preceded(
        tuple((multispace1, token("encoding"), eq)),
        alt((
            delimited(token("'"), enc_name, token("'")),
            delimited(token("\""), enc_name, token("\"")),
        )),
    )(input)
}

/// \[A-Za-z] (\[A-Za-z0-9._] | '-')*
///
/// [\[81\] EncName](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-EncName)
fn enc_name(input: &str) -> IResult<'_, &str> {
    context("EncName", recognize(pair(alpha1, xmlchar::enc_name0)))(input)
}

/// '\<!NOTATION' S Name S (ExternalID | PublicID) S? '>'
///
/// [\[82\] NotationDecl](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-NotationDecl)
fn notation_decl(input: &str) -> IResult<'_, model::DeclarationNotation<'_>> {
    map(
        preceded(
            token("<!NOTATION"),
            cut(pair(
                preceded(multispace1, name),
                delimited(
                    multispace1,
                    alt((
                        map(external_id, model::DeclarationNotationId::ExternalId),
                        map(public_id, model::DeclarationNotationId::PublicId),
                    )),
                    pair(multispace0, token(">")),
                ),
            )),
        ),
        model::DeclarationNotation::from,
    )(input)
}

/// 'PUBLIC' S PubidLiteral
///
/// [\[83\] PublicID](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-PublicID)
fn public_id(input: &str) -> IResult<'_, &str> {
    preceded(pair(token("PUBLIC"), multispace1), pubid_literal)(input)
}

// -----------------------------------------------------------------------------------------------

/// The XML declaration as an event, recognized only at the very start of a document.
pub fn xml_decl_event(input: &str) -> IResult<'_, Option<Event<'_>>> {
    map(xml_decl, |v| Some(Event::from(v)))(input)
}

/// The document type declaration as an event.
pub fn doctype_event(input: &str) -> IResult<'_, Option<Event<'_>>> {
    map(doctype_decl, |v| Some(Event::from(v)))(input)
}

/// (Char* - (Char* '?>' Char*))
fn pi_data(input: &str) -> IResult<'_, &str> {
    verify(take_until("?>"), |v: &str| v.chars().all(xmlchar::is_char))(input)
}

/// (Char* - (Char* ']]>' Char*))
///
/// [\[20\] CData](https://www.w3.org/TR/2008/REC-xml-20081126/#NT-CData)
fn cdata(input: &str) -> IResult<'_, &str> {
    verify(take_until("]]>"), |v: &str| v.chars().all(xmlchar::is_char))(input)
}

fn char_from(value: &str, radix: u32) -> Option<char> {
    u32::from_str_radix(value, radix)
        .ok()
        .and_then(char::from_u32)
        .filter(|c| xmlchar::is_char(*c))
}

// -----------------------------------------------------------------------------------------------


// -----------------------------------------------------------------------------------------------
