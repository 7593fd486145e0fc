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

//! The assertions as plain functions.
//!
//! Each function returns the [`Failure`] describing why the check did not
//! pass instead of failing the test, so the outcome can be inspected or
//! reported by other harnesses.

use std::collections::HashSet;

use libxml::{Doc, Error as XmlError, NodeRef, XPathValue};
use log::debug;

use super::{
    checker,
    failure::tag_of,
    failure::pretty_print,
    query::Query,
    DtdSource, Failure, RelaxNgSource, XSchemaSource,
};

/// Expectation on the value of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected<'a> {
    /// The attribute only has to exist.
    Present,

    /// The attribute has exactly this value.
    Value(&'a str),

    /// The value of the attribute is one of these.
    OneOf(&'a [&'a str]),
}

impl Default for Expected<'_> {
    fn default() -> Self {
        Self::Present
    }
}

/// Expectations on an element node, see [`xml_node`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeExpectation<'a> {
    tag: Option<&'a str>,
    text: Option<&'a str>,
    text_in: Option<&'a [&'a str]>,
}

impl<'a> NodeExpectation<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expected tag in Clark notation (`{uri}local`, or `local` for
    /// elements without namespace).
    pub fn tag(mut self, tag: &'a str) -> Self {
        self.tag = Some(tag);

        self
    }

    pub fn text(mut self, text: &'a str) -> Self {
        self.text = Some(text);

        self
    }

    pub fn text_in(mut self, values: &'a [&'a str]) -> Self {
        self.text_in = Some(values);

        self
    }
}

/// Parses `data` as XML document.
pub fn xml_document<B: AsRef<[u8]>>(data: B) -> Result<Doc, Failure> {
    Doc::parse(data).map_err(|err| Failure::InvalidDocument(error_log(err)))
}

/// Parses `data` as content of a `root_tag` element. The content has to
/// contain at least one element.
pub fn xml_partial<B: AsRef<[u8]>>(data: B, root_tag: &str) -> Result<Doc, Failure> {
    let data = data.as_ref();

    let mut consolidated = Vec::with_capacity(data.len() + 2 * root_tag.len() + 5);
    consolidated.push(b'<');
    consolidated.extend_from_slice(root_tag.as_bytes());
    consolidated.push(b'>');
    consolidated.extend_from_slice(data);
    consolidated.extend_from_slice(b"</");
    consolidated.extend_from_slice(root_tag.as_bytes());
    consolidated.push(b'>');

    let doc = Doc::parse(&consolidated).map_err(|err| Failure::InvalidPartial(error_log(err)))?;
    if doc.root()?.child_elements().next().is_none() {
        return Err(Failure::EmptyPartial);
    }

    Ok(doc)
}

/// `prefix` is bound to `uri` in the scope of `node`. The empty prefix
/// names the default namespace.
pub fn xml_namespace(node: &NodeRef, prefix: &str, uri: &str) -> Result<(), Failure> {
    let found = node
        .namespaces()?
        .into_iter()
        .find(|(p, _)| p.as_deref().unwrap_or("") == prefix)
        .map(|(_, href)| href);

    match found {
        None => Err(Failure::NamespaceNotDeclared {
            tag: tag_of(node),
            prefix: prefix.into(),
        }),
        Some(found) if found != uri => Err(Failure::NamespaceMismatch {
            tag: tag_of(node),
            prefix: prefix.into(),
            expected: uri.into(),
            found,
        }),
        Some(_) => Ok(()),
    }
}

/// `node` has the attribute `name` (`local`, `prefix:local` or
/// `{uri}local`) and its value meets `expected`.
pub fn xml_has_attribute(
    node: &NodeRef,
    name: &str,
    expected: Expected<'_>,
) -> Result<(), Failure> {
    let value = match node.attribute(name)? {
        Some(value) => value,
        None => {
            return Err(Failure::AttributeNotFound {
                tag: tag_of(node),
                name: name.into(),
            })
        }
    };

    let accepted: &[&str] = match &expected {
        Expected::Present => return Ok(()),
        Expected::Value(value) => std::slice::from_ref(value),
        Expected::OneOf(values) => *values,
    };

    if accepted.contains(&value.as_str()) {
        Ok(())
    } else {
        Err(Failure::AttributeValue {
            tag: tag_of(node),
            name: name.into(),
            expected: accepted.iter().map(|s| (*s).to_owned()).collect(),
            found: value,
        })
    }
}

/// `node` exists, is an element and meets `expect`.
pub fn xml_node(node: Option<&NodeRef>, expect: &NodeExpectation<'_>) -> Result<(), Failure> {
    let node = match node {
        Some(node) if node.is_element() => node,
        Some(node) => return Err(Failure::NotAnElement(format!("{:?}", node.type_()))),
        None => return Err(Failure::NotAnElement("nothing".into())),
    };

    if let Some(tag) = expect.tag {
        let found = node.tag()?;
        if found != tag {
            return Err(Failure::Tag {
                expected: tag.into(),
                found,
            });
        }
    }

    if expect.text.is_none() && expect.text_in.is_none() {
        return Ok(());
    }

    let found = node.text()?;

    if let Some(text) = expect.text {
        if found.as_deref() != Some(text) {
            return Err(Failure::Text {
                tag: tag_of(node),
                expected: text.into(),
                found,
            });
        }
    }

    if let Some(values) = expect.text_in {
        let ok = match &found {
            Some(found) => values.contains(&found.as_str()),
            None => false,
        };

        if !ok {
            return Err(Failure::TextNotIn {
                tag: tag_of(node),
                expected: values.iter().map(|s| (*s).to_owned()).collect(),
                found,
            });
        }
    }

    Ok(())
}

/// Every expression of `xpaths` returns a non-empty node set or a true
/// value when evaluated on `node`.
pub fn xpaths_exist(
    node: &NodeRef,
    xpaths: &[&str],
    default_ns_prefix: &str,
) -> Result<(), Failure> {
    let mut query = Query::new(node, default_ns_prefix)?;

    for xpath in xpaths {
        if !query.evaluate(xpath)?.is_truthy() {
            return Err(Failure::xpath_not_found(node, xpath));
        }
    }

    Ok(())
}

/// Every expression of `xpaths` returns exactly one result.
pub fn xpaths_only_one(
    node: &NodeRef,
    xpaths: &[&str],
    default_ns_prefix: &str,
) -> Result<(), Failure> {
    let mut query = Query::new(node, default_ns_prefix)?;

    for xpath in xpaths {
        let value = query.evaluate(xpath)?;
        if !value.is_truthy() {
            return Err(Failure::xpath_not_found(node, xpath));
        }

        let count = value.len();
        if count > 1 {
            return Err(Failure::XPathTooMany {
                tag: tag_of(node),
                xpath: (*xpath).into(),
                element: pretty_print(node),
                count,
            });
        }
    }

    Ok(())
}

/// The results of each expression of `xpaths` are pairwise distinct.
///
/// Elements are distinct if they are different nodes, all other results
/// are compared by their string value.
pub fn xpaths_unique_value(
    node: &NodeRef,
    xpaths: &[&str],
    default_ns_prefix: &str,
) -> Result<(), Failure> {
    #[derive(PartialEq, Eq, Hash)]
    enum Key<'a> {
        Element(&'a NodeRef),
        Value(String),
    }

    let mut query = Query::new(node, default_ns_prefix)?;

    for xpath in xpaths {
        let nodes = match query.evaluate(xpath)? {
            XPathValue::NodeSet(nodes) => nodes,
            _ => continue,
        };

        let mut seen = HashSet::with_capacity(nodes.len());

        for result in &nodes {
            let key = match result.node() {
                Some(n) if n.is_element() => Key::Element(n),
                _ => Key::Value(result.string_value()?),
            };

            if !seen.insert(key) {
                return Err(Failure::XPathNotUnique {
                    tag: tag_of(node),
                    xpath: (*xpath).into(),
                    element: pretty_print(node),
                });
            }
        }
    }

    Ok(())
}

/// The string value of every result of `xpath` is one of `values`.
pub fn xpath_values(
    node: &NodeRef,
    xpath: &str,
    values: &[&str],
    default_ns_prefix: &str,
) -> Result<(), Failure> {
    let mut query = Query::new(node, default_ns_prefix)?;

    for value in query.evaluate(xpath)?.string_values()? {
        if !values.contains(&value.as_str()) {
            return Err(Failure::XPathValue {
                tag: tag_of(node),
                xpath: xpath.into(),
                element: pretty_print(node),
                value,
            });
        }
    }

    Ok(())
}

pub fn xml_valid_dtd<'a, S>(node: &NodeRef, source: S) -> Result<(), Failure>
where
    S: Into<DtdSource<'a>>,
{
    validation(source.into().validate(node))
}

pub fn xml_valid_xschema<'a, S>(node: &NodeRef, source: S) -> Result<(), Failure>
where
    S: Into<XSchemaSource<'a>>,
{
    validation(source.into().validate(node))
}

pub fn xml_valid_relaxng<'a, S>(node: &NodeRef, source: S) -> Result<(), Failure>
where
    S: Into<RelaxNgSource<'a>>,
{
    validation(source.into().validate(node))
}

/// `data` and `expected` are equivalent XML outputs, see
/// [`Difference`](crate::Difference) for what is compared.
pub fn xml_equivalent_outputs<A, B>(data: A, expected: B) -> Result<(), Failure>
where
    A: AsRef<[u8]>,
    B: AsRef<[u8]>,
{
    let data = data.as_ref();
    let expected = expected.as_ref();

    checker::compare(data, expected).map_err(|difference| {
        debug!("Outputs are not equivalent: {}", &difference);

        Failure::NotEquivalent {
            given: String::from_utf8_lossy(data).into_owned(),
            expected: String::from_utf8_lossy(expected).into_owned(),
            difference,
        }
    })
}

fn validation(ret: Result<(), XmlError>) -> Result<(), Failure> {
    match ret {
        Ok(()) => Ok(()),
        Err(XmlError::Invalid { kind, log }) | Err(XmlError::ValidationFailed { kind, log }) => {
            debug!("Node is not valid according to the {}: {}", kind, &log);

            Err(Failure::NotValid { kind, log })
        }
        Err(err) => Err(Failure::Setup(err)),
    }
}

fn error_log(err: XmlError) -> libxml::ErrorLog {
    match err {
        XmlError::Parse(log) => log,
        err => err.log().cloned().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XPATH_DATA: &str = r#"<root xmlns="urn:default" xmlns:o="urn:other" att="exists">
        <sub id="1" subAtt="unique">a</sub>
        <sub id="2" subAtt="notUnique">a</sub>
        <sub id="3" subAtt="notUnique">b</sub>
        <o:item>x</o:item>
    </root>"#;

    #[test]
    fn document() {
        let doc = xml_document("<root/>").unwrap();
        assert_eq!(doc.root().unwrap().name().unwrap(), "root");

        let failure = xml_document("not an XML document").unwrap_err();
        assert!(failure
            .to_string()
            .starts_with("Input is not a valid XML document: "));
    }

    #[test]
    fn partial() {
        let doc = xml_partial("<partial>1</partial><partial>2</partial>", "partialTest").unwrap();
        let root = doc.root().unwrap();

        assert_eq!(root.name().unwrap(), "partialTest");
        assert_eq!(root.child_elements().count(), 2);

        assert!(matches!(
            xml_partial("<invalidChar>&</invalidChar>", "customTag"),
            Err(Failure::InvalidPartial(_))
        ));
        assert!(matches!(
            xml_partial("not even a partial XML document", "customTag"),
            Err(Failure::EmptyPartial)
        ));
        assert_eq!(
            xml_partial("text", "customTag").unwrap_err().to_string(),
            "Input does not have any elements to check."
        );
    }

    #[test]
    fn namespace() {
        let doc = xml_document(XPATH_DATA).unwrap();
        let root = doc.root().unwrap();

        xml_namespace(root, "o", "urn:other").unwrap();
        xml_namespace(root, "", "urn:default").unwrap();

        assert!(matches!(
            xml_namespace(root, "wrong", "urn:other"),
            Err(Failure::NamespaceNotDeclared { .. })
        ));
        assert!(matches!(
            xml_namespace(root, "o", "urn:wrong"),
            Err(Failure::NamespaceMismatch { .. })
        ));
    }

    #[test]
    fn has_attribute() {
        let doc = xml_document(XPATH_DATA).unwrap();
        let root = doc.root().unwrap();

        xml_has_attribute(root, "att", Expected::Present).unwrap();
        xml_has_attribute(root, "att", Expected::Value("exists")).unwrap();
        xml_has_attribute(root, "att", Expected::OneOf(&["other", "exists"])).unwrap();

        assert!(matches!(
            xml_has_attribute(root, "missing", Expected::Present),
            Err(Failure::AttributeNotFound { .. })
        ));
        assert!(matches!(
            xml_has_attribute(root, "att", Expected::OneOf(&["a", "b"])),
            Err(Failure::AttributeValue { .. })
        ));
    }

    #[test]
    fn node() {
        let doc = xml_document("<root>text_value</root>").unwrap();
        let root = doc.root().unwrap();

        xml_node(Some(root), &NodeExpectation::new()).unwrap();
        xml_node(Some(root), &NodeExpectation::new().tag("root").text("text_value")).unwrap();
        xml_node(Some(root), &NodeExpectation::new().text_in(&["ok", "text_value"])).unwrap();

        assert!(matches!(
            xml_node(None, &NodeExpectation::new()),
            Err(Failure::NotAnElement(_))
        ));
        assert!(matches!(
            xml_node(root.first_child(), &NodeExpectation::new()),
            Err(Failure::NotAnElement(_))
        ));
        assert!(matches!(
            xml_node(Some(root), &NodeExpectation::new().tag("noRoot")),
            Err(Failure::Tag { .. })
        ));
        assert!(matches!(
            xml_node(Some(root), &NodeExpectation::new().text("invalid")),
            Err(Failure::Text { .. })
        ));
        assert!(matches!(
            xml_node(Some(root), &NodeExpectation::new().text_in(&["invalid"])),
            Err(Failure::TextNotIn { .. })
        ));
    }

    #[test]
    fn xpaths() {
        let doc = xml_document(XPATH_DATA).unwrap();
        let root = doc.root().unwrap();

        xpaths_exist(root, &["@att", "./ns:sub", "./o:item", "count(./ns:sub) = 3"], "ns").unwrap();
        xpaths_exist(root, &["./d:sub"], "d").unwrap();
        xpaths_only_one(root, &["./o:item", "./ns:sub[@subAtt='unique']"], "ns").unwrap();
        xpaths_unique_value(root, &["./ns:sub/@id", "./ns:sub"], "ns").unwrap();
        xpath_values(root, "./ns:sub/@id", &["1", "2", "3"], "ns").unwrap();

        assert!(matches!(
            xpaths_exist(root, &["./ns:missing"], "ns"),
            Err(Failure::XPathNotFound { .. })
        ));
        assert!(matches!(
            xpaths_only_one(root, &["./ns:sub"], "ns"),
            Err(Failure::XPathTooMany { count: 3, .. })
        ));
        assert!(matches!(
            xpaths_unique_value(root, &["./ns:sub/text()"], "ns"),
            Err(Failure::XPathNotUnique { .. })
        ));
        assert!(matches!(
            xpath_values(root, "./ns:sub/text()", &["a"], "ns"),
            Err(Failure::XPathValue { .. })
        ));
        assert!(matches!(
            xpaths_exist(root, &["./ns:sub["], "ns"),
            Err(Failure::XPathError { .. })
        ));
    }

    #[test]
    fn xpath_failure_message() {
        let doc = xml_document("<root><sub/></root>").unwrap();
        let root = doc.root().unwrap();

        let message = xpaths_exist(root, &["./missing"], "ns")
            .unwrap_err()
            .to_string();

        assert_eq!(
            message,
            "No result found for XPath for element root\nXPath: ./missing\nElement:\n<root>\n  <sub/>\n</root>\n"
        );
    }

    #[test]
    fn equivalent_outputs() {
        xml_equivalent_outputs("<root><a x=\"1\"/></root>", "<root>\n  <a x=\"1\"/>\n</root>")
            .unwrap();

        let message = xml_equivalent_outputs("<root><b/></root>", "<root><a/></root>")
            .unwrap_err()
            .to_string();

        assert!(message.starts_with(
            "Output are not equivalent:\nGiven: <root><b/></root>\nExpected: <root><a/></root>\n"
        ));
    }
}
