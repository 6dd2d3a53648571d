use pretty_assertions::assert_eq;
use xml_builder::{parse_into, ParseOptions};
use xml_dom::error::Result;
use xml_dom::TreeBuilder;
use xml_parser::stream::{self, EventStream};

/// Records every call as one line, with nodes numbered in creation order.
#[derive(Default)]
struct Recorder {
    nodes: usize,
    calls: Vec<String>,
}

impl Recorder {
    fn create(&mut self, call: String) -> Result<usize> {
        self.nodes += 1;
        self.calls.push(format!("#{} = {}", self.nodes, call));
        Ok(self.nodes)
    }
}

impl TreeBuilder for Recorder {
    type Node = usize;
    type Output = Vec<String>;

    fn document(&mut self) -> usize {
        0
    }

    fn set_xml_declaration(&mut self, version: &str, encoding: Option<&str>, standalone: Option<bool>) {
        self.calls
            .push(format!("xml {} {:?} {:?}", version, encoding, standalone));
    }

    fn create_element(
        &mut self,
        namespace_uri: Option<&str>,
        prefix: Option<&str>,
        local_name: &str,
    ) -> Result<usize> {
        self.create(format!(
            "element {:?} {:?} {}",
            namespace_uri, prefix, local_name
        ))
    }

    fn create_attribute(
        &mut self,
        namespace_uri: Option<&str>,
        prefix: Option<&str>,
        local_name: &str,
        value: &str,
    ) -> Result<usize> {
        self.create(format!(
            "attribute {:?} {:?} {}={:?}",
            namespace_uri, prefix, local_name, value
        ))
    }

    fn append_attribute(&mut self, attr: usize, owner: &usize) -> Result<()> {
        self.calls.push(format!("#{} attr #{}", owner, attr));
        Ok(())
    }

    fn create_text_node(&mut self, data: &str) -> Result<usize> {
        self.create(format!("text {:?}", data))
    }

    fn create_comment(&mut self, data: &str) -> Result<usize> {
        self.create(format!("comment {:?}", data))
    }

    fn create_processing_instruction(&mut self, target: &str, data: &str) -> Result<usize> {
        self.create(format!("pi {} {:?}", target, data))
    }

    fn create_cdata_section(&mut self, data: &str) -> Result<usize> {
        self.create(format!("cdata {:?}", data))
    }

    fn create_document_type(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
    ) -> Result<usize> {
        self.create(format!("doctype {} {:?} {:?}", name, public_id, system_id))
    }

    fn insert_node(&mut self, child: usize, parent: &usize, reference: Option<&usize>) -> Result<()> {
        assert_eq!(None, reference);
        self.calls.push(format!("#{} append #{}", parent, child));
        Ok(())
    }

    fn finish(self) -> Vec<String> {
        self.calls
    }
}

// -----------------------------------------------------------------------------------------------

#[test]
fn test_calls() {
    let text = r#"<?xml version="1.0" standalone="no"?>
<!DOCTYPE p:a PUBLIC "-//A//EN" "a.dtd" [<!ATTLIST p:a xmlns:p CDATA "urn:p">]>
<p:a b="1">x<!--c-->y</p:a>"#;
    let calls = parse_into(text, &ParseOptions::default(), Recorder::default()).unwrap();
    assert_eq!(
        vec![
            "xml 1.0 None Some(false)",
            "#1 = doctype p:a Some(\"-//A//EN\") Some(\"a.dtd\")",
            "#0 append #1",
            "#2 = element Some(\"urn:p\") Some(\"p\") a",
            "#3 = attribute None None b=\"1\"",
            "#2 attr #3",
            "#4 = attribute Some(\"http://www.w3.org/2000/xmlns/\") Some(\"xmlns\") p=\"urn:p\"",
            "#2 attr #4",
            "#0 append #2",
            "#5 = text \"x\"",
            "#2 append #5",
            "#6 = comment \"c\"",
            "#2 append #6",
            "#7 = text \"y\"",
            "#2 append #7",
        ],
        calls
    );
}

#[test]
fn test_stream_matches_aggregate() {
    let text = r#"<?xml version="1.0"?>
<!DOCTYPE a [<!ENTITY e "v">]>
<a b="&e;">t&#x41;<c/><![CDATA[d]]></a>
<!-- tail -->"#;

    let (_, aggregate) = xml_parser::document(text).unwrap();

    let mut streaming = vec![];
    let mut document = stream::document();
    let mut offset = 0;
    while let Some(event) = document.next_event(text, &mut offset).unwrap() {
        streaming.push(event);
    }

    assert_eq!(aggregate, streaming);
    assert_eq!(text.len(), offset);
}
