/*
 * Copyright (c) 2021 gematik GmbH
 * 
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 * 
 *    http://www.apache.org/licenses/LICENSE-2.0
 * 
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
 */

use std::path::Path;
use std::str::FromStr;

use xmlunittest::{Dtd, Expected, NodeExpectation, RelaxNg, Schema, XmlAssert, XmlTestCase};

const DTD: &str = r#"<!ELEMENT root (child)>
    <!ELEMENT child EMPTY>
    <!ATTLIST child id ID #REQUIRED>
"#;

const XSCHEMA: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:element name="root">
        <xsd:complexType>
            <xsd:sequence>
                <xsd:element name="child" minOccurs="1" maxOccurs="1">
                    <xsd:complexType>
                        <xsd:attribute name="id" type="xsd:string" use="required" />
                    </xsd:complexType>
                </xsd:element>
            </xsd:sequence>
        </xsd:complexType>
    </xsd:element>
</xsd:schema>
"#;

const RELAXNG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rng:element name="root" xmlns:rng="http://relaxng.org/ns/structure/1.0">
    <rng:element name="child">
        <rng:attribute name="id">
            <rng:text />
        </rng:attribute>
    </rng:element>
</rng:element>
"#;

const VALID: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<root>
    <child id="child1"/>
</root>
"#;

const INVALID: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<root>
    <child id="child1"/>
    <child id="child2"/>
</root>
"#;

const XPATHS: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<root att="exists">
    <sub subAtt="unique" id="1">a</sub>
    <sub subAtt="notUnique" id="2">b</sub>
    <sub subAtt="notUnique" id="3">c</sub>
    <multiple>twice</multiple>
    <multiple>twice</multiple>
    <uniqueSub/>
</root>"#;

fn test_case() -> XmlTestCase {
    XmlTestCase::new()
}

/* document */

#[test]
fn xml_document() {
    let test = test_case();

    let doc = test.assert_xml_document(b"<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<root/>");

    test.assert_xml_node(Some(doc.root().unwrap()), &NodeExpectation::new().tag("root"));
}

#[test]
#[should_panic(expected = "Input is not a valid XML document: ")]
fn xml_document_invalid() {
    test_case().assert_xml_document("not an XML document");
}

#[test]
fn xml_partial() {
    let test = test_case();

    let doc = test.assert_xml_partial("<partial>1</partial>\n<partial>2</partial>", None);
    let root = doc.root().unwrap();

    test.assert_xml_node(Some(root), &NodeExpectation::new().tag("partialTest"));
    test.assert_xpath_values(root, "./partial/text()", &["1", "2"]);

    let doc = test.assert_xml_partial("<partial/>", Some("customTag"));
    assert_eq!(doc.root().unwrap().name().unwrap(), "customTag");
}

#[test]
#[should_panic(expected = "Input is not a valid partial XML document: ")]
fn xml_partial_invalid_char() {
    test_case().assert_xml_partial("<invalidChar>&</invalidChar>", Some("customTag"));
}

#[test]
#[should_panic(expected = "Input is not a valid partial XML document: ")]
fn xml_partial_missing_end_tag() {
    test_case().assert_xml_partial("<missingEndTag>", Some("customTag"));
}

#[test]
#[should_panic(expected = "Input does not have any elements to check.")]
fn xml_partial_without_elements() {
    test_case().assert_xml_partial("not even a partial XML document", Some("customTag"));
}

/* namespaces and attributes */

#[test]
fn xml_namespace() {
    let test = test_case();

    let doc = test.assert_xml_document(r#"<root xmlns:ns="uri"><child/></root>"#);
    let root = doc.root().unwrap();

    test.assert_xml_namespace(root, "ns", "uri");
    test.assert_xml_namespace(root.first_child_element().unwrap(), "ns", "uri");
}

#[test]
#[should_panic(expected = "Namespace prefix \"wrong_ns\" is not declared")]
fn xml_namespace_wrong_prefix() {
    let test = test_case();

    let doc = test.assert_xml_document(r#"<root xmlns:ns="uri"/>"#);
    test.assert_xml_namespace(doc.root().unwrap(), "wrong_ns", "uri");
}

#[test]
#[should_panic(expected = "is bound to \"uri\" instead of \"wrong_uri\"")]
fn xml_namespace_wrong_uri() {
    let test = test_case();

    let doc = test.assert_xml_document(r#"<root xmlns:ns="uri"/>"#);
    test.assert_xml_namespace(doc.root().unwrap(), "ns", "wrong_uri");
}

#[test]
fn xml_has_attribute() {
    let test = test_case();

    let doc = test.assert_xml_document(
        r#"<root att="value" xmlns:x="urn:x" x:att="prefixed"><child att="1"/><child att="3"/></root>"#,
    );
    let root = doc.root().unwrap();

    test.assert_xml_has_attribute(root, "att", Expected::Present);
    test.assert_xml_has_attribute(root, "att", Expected::Value("value"));
    test.assert_xml_has_attribute(root, "x:att", Expected::Value("prefixed"));
    test.assert_xml_has_attribute(root, "{urn:x}att", Expected::Value("prefixed"));

    for child in root.child_elements() {
        test.assert_xml_has_attribute(child, "att", Expected::OneOf(&["1", "3"]));
    }
}

#[test]
#[should_panic(expected = "Attribute \"no_att\" not found on element root")]
fn xml_has_attribute_missing() {
    let test = test_case();

    let doc = test.assert_xml_document(r#"<root att="value"/>"#);
    test.assert_xml_has_attribute(doc.root().unwrap(), "no_att", Expected::Present);
}

#[test]
#[should_panic(expected = "Invalid value for attribute \"att\" of element root")]
fn xml_has_attribute_wrong_value() {
    let test = test_case();

    let doc = test.assert_xml_document(r#"<root att="value"/>"#);
    test.assert_xml_has_attribute(doc.root().unwrap(), "att", Expected::Value("invalid"));
}

#[test]
#[should_panic(expected = "Invalid value for attribute \"att\" of element child")]
fn xml_has_attribute_not_one_of() {
    let test = test_case();

    let doc = test.assert_xml_document(r#"<root><child att="1"/></root>"#);
    let child = doc.root().unwrap().first_child_element().unwrap();

    test.assert_xml_has_attribute(child, "att", Expected::OneOf(&["2", "4"]));
}

/* nodes */

#[test]
fn xml_node() {
    let test = test_case();

    let doc = test.assert_xml_document("<root>text_value</root>");
    let root = doc.root().ok();

    test.assert_xml_node(root, &NodeExpectation::new());
    test.assert_xml_node(root, &NodeExpectation::new().tag("root").text("text_value"));
    test.assert_xml_node(
        root,
        &NodeExpectation::new().text_in(&["text_value", "ok"]),
    );

    let doc = test.assert_xml_document(r#"<root xmlns="urn:ns">text_value</root>"#);
    test.assert_xml_node(doc.root().ok(), &NodeExpectation::new().tag("{urn:ns}root"));
}

#[test]
#[should_panic(expected = "Expected an element node, found nothing")]
fn xml_node_none() {
    test_case().assert_xml_node(None, &NodeExpectation::new());
}

#[test]
#[should_panic(expected = "Expected an element node")]
fn xml_node_text() {
    let test = test_case();

    let doc = test.assert_xml_document("<root>text_value</root>");
    test.assert_xml_node(doc.root().unwrap().first_child(), &NodeExpectation::new());
}

#[test]
#[should_panic(expected = "Invalid tag: \"root\" != \"noRoot\"")]
fn xml_node_wrong_tag() {
    let test = test_case();

    let doc = test.assert_xml_document("<root>text_value</root>");
    test.assert_xml_node(
        doc.root().ok(),
        &NodeExpectation::new().tag("noRoot").text("text_value"),
    );
}

#[test]
#[should_panic(expected = "Invalid text for element root")]
fn xml_node_wrong_text() {
    let test = test_case();

    let doc = test.assert_xml_document("<root>text_value</root>");
    test.assert_xml_node(
        doc.root().ok(),
        &NodeExpectation::new().tag("root").text("invalid"),
    );
}

#[test]
#[should_panic(expected = "not in [\"invalid\", \"ok\"]")]
fn xml_node_text_not_in() {
    let test = test_case();

    let doc = test.assert_xml_document("<root>valid</root>");
    test.assert_xml_node(
        doc.root().ok(),
        &NodeExpectation::new().text_in(&["invalid", "ok"]),
    );
}

/* xpath */

#[test]
fn xpaths() {
    let test = test_case();

    let doc = test.assert_xml_document(XPATHS);
    let root = doc.root().unwrap();

    test.assert_xpaths_exist(root, &["@att", "./sub", "./sub[@subAtt=\"unique\"]"]);
    test.assert_xpaths_only_one(root, &["./uniqueSub", "./sub[@subAtt=\"unique\"]"]);
    test.assert_xpaths_unique_value(root, &["./sub/@id", "./sub/text()"]);
    test.assert_xpath_values(root, "./sub/@id", &["1", "2", "3"]);
    test.assert_xpath_values(root, "./sub/text()", &["a", "b", "c"]);
}

#[test]
fn xpaths_with_default_namespace() {
    let test = test_case();

    let doc = test.assert_xml_document(
        r#"<root xmlns="urn:default" xmlns:o="urn:other"><sub>a</sub><o:sub>b</o:sub></root>"#,
    );
    let root = doc.root().unwrap();

    test.assert_xpaths_exist(root, &["./ns:sub", "./o:sub"]);
    test.assert_xpaths_only_one_with_prefix(root, &["./def:sub"], "def");
    test.assert_xpath_values(root, "./ns:sub/text()", &["a"]);
}

#[test]
#[should_panic(expected = "No result found for XPath for element root\nXPath: ./invalidChild")]
fn xpaths_exist_missing() {
    let test = test_case();

    let doc = test.assert_xml_document(XPATHS);
    test.assert_xpaths_exist(doc.root().unwrap(), &["./invalidChild"]);
}

#[test]
#[should_panic(expected = "No result found for XPath for element root")]
fn xpaths_exist_missing_attribute() {
    let test = test_case();

    let doc = test.assert_xml_document(XPATHS);
    test.assert_xpaths_exist(doc.root().unwrap(), &["@invalidAtt"]);
}

#[test]
#[should_panic(expected = "Invalid XPath expression for element root: ")]
fn xpaths_exist_invalid_expression() {
    let test = test_case();

    let doc = test.assert_xml_document(XPATHS);
    test.assert_xpaths_exist(doc.root().unwrap(), &["./sub[@id="]);
}

#[test]
#[should_panic(expected = "Too many results found (2) for XPath on element root:\nXPath: ./sub[@subAtt=\"notUnique\"]")]
fn xpaths_only_one_too_many() {
    let test = test_case();

    let doc = test.assert_xml_document(XPATHS);
    test.assert_xpaths_only_one(doc.root().unwrap(), &["./sub[@subAtt=\"notUnique\"]"]);
}

#[test]
#[should_panic(expected = "No result found for XPath for element root")]
fn xpaths_only_one_missing() {
    let test = test_case();

    let doc = test.assert_xml_document(XPATHS);
    test.assert_xpaths_only_one(doc.root().unwrap(), &["./invalidChild"]);
}

#[test]
#[should_panic(expected = "Value is not unique for element root:\nXPath: ./sub/@subAtt")]
fn xpaths_unique_value_attribute() {
    let test = test_case();

    let doc = test.assert_xml_document(XPATHS);
    test.assert_xpaths_unique_value(doc.root().unwrap(), &["./sub/@subAtt"]);
}

#[test]
#[should_panic(expected = "Value is not unique for element root:\nXPath: ./multiple/text()")]
fn xpaths_unique_value_text() {
    let test = test_case();

    let doc = test.assert_xml_document(XPATHS);
    test.assert_xpaths_unique_value(doc.root().unwrap(), &["./multiple/text()"]);
}

#[test]
#[should_panic(expected = "Invalid value found for node root\nXPath: ./sub/@id\nValue found: 3")]
fn xpath_values_unexpected() {
    let test = test_case();

    let doc = test.assert_xml_document(XPATHS);
    test.assert_xpath_values(doc.root().unwrap(), "./sub/@id", &["1", "2"]);
}

/* validation */

#[test]
fn valid_dtd() {
    let test = test_case();

    let doc = test.assert_xml_document(VALID);
    let root = doc.root().unwrap();

    let dtd = Dtd::from_str(DTD).unwrap();

    test.assert_xml_valid_dtd(root, DTD);
    test.assert_xml_valid_dtd(root, &dtd);
    test.assert_xml_valid_dtd(root, Path::new("./examples/root.dtd"));
}

#[test]
#[should_panic(expected = "Element root content does not follow the DTD")]
fn valid_dtd_invalid() {
    let test = test_case();

    let doc = test.assert_xml_document(INVALID);
    test.assert_xml_valid_dtd(doc.root().unwrap(), DTD);
}

#[test]
#[should_panic(expected = "Element root content does not follow the DTD")]
fn valid_dtd_file_invalid() {
    let test = test_case();

    let doc = test.assert_xml_document(INVALID);
    test.assert_xml_valid_dtd(doc.root().unwrap(), Path::new("./examples/root.dtd"));
}

#[test]
#[should_panic(expected = "Unable to parse DTD")]
fn valid_dtd_missing_file() {
    let test = test_case();

    let doc = test.assert_xml_document(VALID);
    test.assert_xml_valid_dtd(doc.root().unwrap(), Path::new("./examples/missing.dtd"));
}

#[test]
fn valid_xschema() {
    let test = test_case();

    let doc = test.assert_xml_document(VALID);
    let root = doc.root().unwrap();

    let schema_doc = test.assert_xml_document(XSCHEMA);
    let schema = Schema::from_doc(&schema_doc).unwrap();

    test.assert_xml_valid_xschema(root, XSCHEMA);
    test.assert_xml_valid_xschema(root, &schema);
    test.assert_xml_valid_xschema(root, &schema_doc);
    test.assert_xml_valid_xschema(root, Path::new("./examples/root.xsd"));
}

#[test]
#[should_panic(expected = "Element 'child': This element is not expected.")]
fn valid_xschema_invalid() {
    let test = test_case();

    let doc = test.assert_xml_document(INVALID);
    test.assert_xml_valid_xschema(doc.root().unwrap(), XSCHEMA);
}

#[test]
#[should_panic(expected = "Element 'child': This element is not expected.")]
fn valid_xschema_file_invalid() {
    let test = test_case();

    let doc = test.assert_xml_document(INVALID);
    test.assert_xml_valid_xschema(doc.root().unwrap(), Path::new("./examples/root.xsd"));
}

#[test]
fn valid_relaxng() {
    let test = test_case();

    let doc = test.assert_xml_document(VALID);
    let root = doc.root().unwrap();

    let relaxng = RelaxNg::from_str(RELAXNG).unwrap();

    test.assert_xml_valid_relaxng(root, RELAXNG);
    test.assert_xml_valid_relaxng(root, &relaxng);
    test.assert_xml_valid_relaxng(root, Path::new("./examples/root.rng"));
}

#[test]
#[should_panic(expected = "ERROR")]
fn valid_relaxng_invalid() {
    let test = test_case();

    let doc = test.assert_xml_document(INVALID);
    test.assert_xml_valid_relaxng(doc.root().unwrap(), RELAXNG);
}

#[test]
#[should_panic(expected = "ERROR")]
fn valid_relaxng_file_invalid() {
    let test = test_case();

    let doc = test.assert_xml_document(INVALID);
    test.assert_xml_valid_relaxng(doc.root().unwrap(), Path::new("./examples/root.rng"));
}

#[test]
fn valid_subtree() {
    let test = test_case();

    let doc = test.assert_xml_document(
        r#"<wrapper><root><child id="child1"/><child id="child2"/></root></wrapper>"#,
    );
    let root = doc.root().unwrap().first_child_element().unwrap();

    test.assert_xml_valid_dtd(
        root,
        "<!ELEMENT root (child+)>\n<!ELEMENT child EMPTY>\n<!ATTLIST child id ID #REQUIRED>",
    );
}

/* equivalent outputs */

#[test]
fn equivalent_outputs() {
    let test = test_case();

    let data = b"<?xml version=\"1.0\" encoding=\"UTF-8\" ?>
        <root>
            <tag foo=\"bar\" bar=\"foo\">foo</tag>
        </root>";
    let expected = b"<?xml version=\"1.0\" encoding=\"UTF-8\" ?>
        <root><tag bar=\"foo\" foo=\"bar\"> foo </tag></root>";

    test.assert_xml_equivalent_outputs(&data[..], &expected[..]);
}

#[test]
#[should_panic(expected = "Output are not equivalent:\nGiven: ")]
fn equivalent_outputs_wrong_element() {
    let test = test_case();

    let data = r#"<root><notTag foo="bar" bar="foo">foo</notTag></root>"#;
    let expected = r#"<root><tag bar="foo" foo="bar"> foo </tag></root>"#;

    test.assert_xml_equivalent_outputs(data, expected);
}

#[test]
#[should_panic(expected = "unexpected child tag")]
fn equivalent_outputs_too_many_elements() {
    let test = test_case();

    let data = r#"<root><tag foo="bar" bar="foo">foo</tag><tag foo="bar" bar="foo">foo</tag></root>"#;
    let expected = r#"<root><tag bar="foo" foo="bar"> foo </tag></root>"#;

    test.assert_xml_equivalent_outputs(data, expected);
}

#[test]
fn equivalent_outputs_namespaces() {
    let test = test_case();

    let data = r#"<root xmlns:foo="mynamespace"><foo:tag>foo</foo:tag></root>"#;
    let expected = r#"<root xmlns:bar="mynamespace"><bar:tag>foo</bar:tag></root>"#;

    test.assert_xml_equivalent_outputs(data, expected);
}

#[test]
#[should_panic(expected = "expected tag {mynamespace}tag, found {not_the_same_namespace}tag")]
fn equivalent_outputs_wrong_namespace() {
    let test = test_case();

    let data = r#"<root xmlns:foo="not_the_same_namespace"><foo:tag>foo</foo:tag></root>"#;
    let expected = r#"<root xmlns:bar="mynamespace"><bar:tag>foo</bar:tag></root>"#;

    test.assert_xml_equivalent_outputs(data, expected);
}
