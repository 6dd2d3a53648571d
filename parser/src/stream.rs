//! Pull-based event streams built from single-event grammar rules.
//!
//! A stream never owns the text it reads. The text and the current offset are passed on every
//! call, so a stream can be parked while the text it belongs to is swapped for another one.

use crate::error::{Failure, IResult};
use crate::model::Event;
use crate::{content_item, doctype_event, misc, xml_decl_event};

// -----------------------------------------------------------------------------------------------

/// A grammar rule recognizing at most one event.
pub type Rule = for<'a> fn(&'a str) -> IResult<'a, Option<Event<'a>>>;

pub trait EventStream {
    /// Produces the next event at `offset`, advancing it past the consumed input.
    ///
    /// `Ok(None)` means the stream is exhausted. Once exhausted or failed, a stream keeps
    /// returning `Ok(None)`.
    fn next_event<'a>(
        &mut self,
        text: &'a str,
        offset: &mut usize,
    ) -> Result<Option<Event<'a>>, Failure>;

    /// The recoverable failure that ended this stream, if any.
    fn last_failure(&self) -> Option<&Failure> {
        None
    }
}

impl<S: EventStream + ?Sized> EventStream for Box<S> {
    fn next_event<'a>(
        &mut self,
        text: &'a str,
        offset: &mut usize,
    ) -> Result<Option<Event<'a>>, Failure> {
        (**self).next_event(text, offset)
    }

    fn last_failure(&self) -> Option<&Failure> {
        (**self).last_failure()
    }
}

// -----------------------------------------------------------------------------------------------

/// Applies a rule once.
pub struct Stream {
    rule: Rule,
    done: bool,
}

pub fn stream(rule: Rule) -> Stream {
    Stream { rule, done: false }
}

impl EventStream for Stream {
    fn next_event<'a>(
        &mut self,
        text: &'a str,
        offset: &mut usize,
    ) -> Result<Option<Event<'a>>, Failure> {
        if self.done {
            return Ok(None);
        }
        self.done = true;

        match (self.rule)(&text[*offset..]) {
            Ok((rest, event)) => {
                *offset = text.len() - rest.len();
                Ok(event)
            }
            Err(e) => Err(Failure::from_nom(text, e)),
        }
    }
}

// -----------------------------------------------------------------------------------------------

/// Drains `first`, then `second`.
pub struct Then<A, B> {
    first: A,
    second: B,
    first_done: bool,
}

pub fn then<A: EventStream, B: EventStream>(first: A, second: B) -> Then<A, B> {
    Then {
        first,
        second,
        first_done: false,
    }
}

impl<A: EventStream, B: EventStream> EventStream for Then<A, B> {
    fn next_event<'a>(
        &mut self,
        text: &'a str,
        offset: &mut usize,
    ) -> Result<Option<Event<'a>>, Failure> {
        if !self.first_done {
            match self.first.next_event(text, offset)? {
                Some(event) => return Ok(Some(event)),
                None => self.first_done = true,
            }
        }
        self.second.next_event(text, offset)
    }

    fn last_failure(&self) -> Option<&Failure> {
        self.second
            .last_failure()
            .or_else(|| self.first.last_failure())
    }
}

// -----------------------------------------------------------------------------------------------

/// Runs fresh streams from `factory` until one of them makes no progress.
///
/// An iteration that fails recoverably before yielding anything is undone and ends the
/// repetition. A fatal failure, or any failure after the iteration has yielded, is returned.
pub struct Star<F, S> {
    factory: F,
    current: Option<S>,
    start: usize,
    yielded: bool,
    done: bool,
    failure: Option<Failure>,
}

pub fn star<F, S>(factory: F) -> Star<F, S>
where
    F: FnMut() -> S,
    S: EventStream,
{
    Star {
        factory,
        current: None,
        start: 0,
        yielded: false,
        done: false,
        failure: None,
    }
}

impl<F, S> EventStream for Star<F, S>
where
    F: FnMut() -> S,
    S: EventStream,
{
    fn next_event<'a>(
        &mut self,
        text: &'a str,
        offset: &mut usize,
    ) -> Result<Option<Event<'a>>, Failure> {
        while !self.done {
            if self.current.is_none() {
                self.start = *offset;
                self.yielded = false;
            }
            let current = self.current.get_or_insert_with(&mut self.factory);

            match current.next_event(text, offset) {
                Ok(Some(event)) => {
                    self.yielded = true;
                    return Ok(Some(event));
                }
                Ok(None) => {
                    self.current = None;
                    if *offset == self.start {
                        self.done = true;
                    }
                }
                Err(failure) if failure.fatal || self.yielded => {
                    self.done = true;
                    return Err(failure);
                }
                Err(failure) => {
                    *offset = self.start;
                    self.current = None;
                    self.done = true;
                    self.failure = Some(failure);
                }
            }
        }
        Ok(None)
    }

    fn last_failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }
}

// -----------------------------------------------------------------------------------------------

/// Runs `inner` once, treating a recoverable failure before its first event as absence.
pub struct Optional<S> {
    inner: S,
    start: Option<usize>,
    yielded: bool,
    done: bool,
    failure: Option<Failure>,
}

pub fn optional<S: EventStream>(inner: S) -> Optional<S> {
    Optional {
        inner,
        start: None,
        yielded: false,
        done: false,
        failure: None,
    }
}

impl<S: EventStream> EventStream for Optional<S> {
    fn next_event<'a>(
        &mut self,
        text: &'a str,
        offset: &mut usize,
    ) -> Result<Option<Event<'a>>, Failure> {
        if self.done {
            return Ok(None);
        }
        let start = *self.start.get_or_insert(*offset);

        match self.inner.next_event(text, offset) {
            Ok(Some(event)) => {
                self.yielded = true;
                Ok(Some(event))
            }
            Ok(None) => {
                self.done = true;
                Ok(None)
            }
            Err(failure) if failure.fatal || self.yielded => {
                self.done = true;
                Err(failure)
            }
            Err(failure) => {
                *offset = start;
                self.done = true;
                self.failure = Some(failure);
                Ok(None)
            }
        }
    }

    fn last_failure(&self) -> Option<&Failure> {
        self.failure
            .as_ref()
            .or_else(|| self.inner.last_failure())
    }
}

// -----------------------------------------------------------------------------------------------

/// Requires `inner` to consume the whole text.
pub struct Complete<S> {
    inner: S,
    done: bool,
}

pub fn complete<S: EventStream>(inner: S) -> Complete<S> {
    Complete { inner, done: false }
}

impl<S: EventStream> EventStream for Complete<S> {
    fn next_event<'a>(
        &mut self,
        text: &'a str,
        offset: &mut usize,
    ) -> Result<Option<Event<'a>>, Failure> {
        if self.done {
            return Ok(None);
        }

        match self.inner.next_event(text, offset) {
            Ok(Some(event)) => Ok(Some(event)),
            Ok(None) => {
                self.done = true;
                if *offset < text.len() {
                    let failure = Failure::new(*offset, "end of input", false);
                    return Err(match self.inner.last_failure() {
                        Some(inner) => failure.merge(inner.clone()),
                        None => failure,
                    });
                }
                Ok(None)
            }
            Err(failure) => {
                self.done = true;
                Err(failure)
            }
        }
    }
}

// -----------------------------------------------------------------------------------------------

/// Iterator over the events of a stream reading a single text.
pub struct Events<'a, S> {
    stream: S,
    text: &'a str,
    offset: usize,
    done: bool,
}

pub fn events<S: EventStream>(stream: S, text: &str) -> Events<'_, S> {
    Events {
        stream,
        text,
        offset: 0,
        done: false,
    }
}

impl<'a, S> Events<'a, S> {
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a, S: EventStream> Iterator for Events<'a, S> {
    type Item = Result<Event<'a>, Failure>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.stream.next_event(self.text, &mut self.offset) {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(failure) => {
                self.done = true;
                Some(Err(failure))
            }
        }
    }
}

// -----------------------------------------------------------------------------------------------

/// XMLDecl? Misc* (doctypedecl Misc*)?
pub fn prolog() -> impl EventStream {
    then(
        optional(stream(xml_decl_event)),
        then(
            star(|| stream(misc)),
            optional(then(stream(doctype_event), star(|| stream(misc)))),
        ),
    )
}

/// Content items up to the end of the text.
pub fn content() -> impl EventStream {
    complete(star(|| stream(content_item)))
}

/// The prolog followed by content items up to the end of the text.
pub fn document() -> impl EventStream {
    then(prolog(), content())
}

// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model;
    use std::collections::BTreeSet;

    fn collect<S: EventStream>(stream: S, text: &str) -> Result<Vec<Event<'_>>, Failure> {
        events(stream, text).collect()
    }

    #[test]
    fn test_stream() {
        let mut s = stream(misc);
        let mut offset = 0;
        assert_eq!(
            Some(Event::Comment("a")),
            s.next_event("<!--a--> ", &mut offset).unwrap()
        );
        assert_eq!(8, offset);
        assert_eq!(None, s.next_event("<!--a--> ", &mut offset).unwrap());
        assert_eq!(8, offset);
    }

    #[test]
    fn test_star_rewinds() {
        let text = "<!--a--> <b/>";
        let mut s = star(|| stream(misc));
        let mut offset = 0;
        assert_eq!(
            Some(Event::Comment("a")),
            s.next_event(text, &mut offset).unwrap()
        );
        assert_eq!(None, s.next_event(text, &mut offset).unwrap());
        assert_eq!(9, offset);
        assert_eq!(9, s.last_failure().unwrap().offset);
        assert!(!s.last_failure().unwrap().fatal);
    }

    #[test]
    fn test_star_fatal() {
        let text = "<!--a--><!-- b -- c -->";
        let ret = collect(star(|| stream(misc)), text);
        let failure = ret.err().unwrap();
        assert!(failure.fatal);
        assert_eq!(15, failure.offset);
    }

    #[test]
    fn test_optional() {
        let text = "<!--a-->";
        let mut s = optional(stream(xml_decl_event));
        let mut offset = 0;
        assert_eq!(None, s.next_event(text, &mut offset).unwrap());
        assert_eq!(0, offset);
        assert!(s.last_failure().is_some());

        let text = "<?xml encoding='x'?>";
        let ret = collect(optional(stream(xml_decl_event)), text);
        assert!(ret.err().unwrap().fatal);
    }

    #[test]
    fn test_complete() {
        let text = "a]]>";
        let failure = collect(content(), text).err().unwrap();
        assert_eq!(1, failure.offset);
        assert!(failure.expected.contains("end of input"));
        assert!(failure.expected.contains("<!--"));
    }

    #[test]
    fn test_document() {
        let text = "<?xml version='1.0'?>\n<!DOCTYPE a>\n<a x='1'>t&e;<!--c--></a>\n";
        let ret = collect(document(), text).unwrap();
        assert_eq!(
            vec![
                Event::XmlDecl(model::DeclarationXml::from(("1.0", None, None))),
                Event::Doctype(model::DeclarationDoc::from(("a", None, None))),
                Event::StartTag(model::Tag::from((
                    "a",
                    vec![model::Attribute::from((
                        "x",
                        vec![model::AttributeValue::from("1")]
                    ))]
                ))),
                Event::Text("t"),
                Event::EntityRef("e"),
                Event::Comment("c"),
                Event::EndTag("a"),
                Event::Text("\n"),
            ],
            ret
        );
    }

    #[test]
    fn test_document_same_as_aggregate() {
        let texts = [
            "<a/>",
            "<?xml version='1.0' standalone='yes'?><a>b<![CDATA[c]]><?d e?></a>",
            "<!-- x --><!DOCTYPE a [<!ENTITY e 'v'>]><?p?> <a>&e;&#x41;</a><!-- y -->",
            "",
            "  <a></a>  ",
        ];
        for text in texts {
            let (_, expected) = crate::document(text).unwrap();
            assert_eq!(expected, collect(document(), text).unwrap());
        }
    }

    #[test]
    fn test_failure_same_as_aggregate() {
        let texts = ["<a></a>x<", "<a b='<'/>", "<a>&#0;</a>", "<?xml?><a/>", "<a/><!-- -- -->"];
        for text in texts {
            let expected = Failure::from_nom(text, crate::document(text).err().unwrap());
            let failure = collect(document(), text).err().unwrap();
            assert_eq!(expected.offset, failure.offset);
            assert!(failure.fatal);
        }
    }

    #[test]
    fn test_misplaced_xml_decl() {
        let failure = collect(document(), " <?xml version='1.0'?><a/>")
            .err()
            .unwrap();
        assert_eq!(3, failure.offset);
        assert_eq!(BTreeSet::from(["PITarget"]), failure.expected);
    }

    #[test]
    fn test_suspend_between_texts() {
        let outer = "<a>&e;</a>";
        let inner = "<b/>";
        let mut s = document();
        let mut offset = 0;
        assert!(matches!(
            s.next_event(outer, &mut offset).unwrap(),
            Some(Event::StartTag(_))
        ));
        assert_eq!(
            Some(Event::EntityRef("e")),
            s.next_event(outer, &mut offset).unwrap()
        );

        let mut entity = content();
        let mut entity_offset = 0;
        assert!(matches!(
            entity.next_event(inner, &mut entity_offset).unwrap(),
            Some(Event::EmptyTag(_))
        ));
        assert_eq!(None, entity.next_event(inner, &mut entity_offset).unwrap());

        assert_eq!(
            Some(Event::EndTag("a")),
            s.next_event(outer, &mut offset).unwrap()
        );
        assert_eq!(None, s.next_event(outer, &mut offset).unwrap());
    }
}

// -----------------------------------------------------------------------------------------------
