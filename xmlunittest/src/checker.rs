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

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::iter::Peekable;

use libxml::{Doc, ElementType, Error as XmlError, NodeRef};
use regex::Regex;

/// Wildcard accepted in expected text, attribute values and tags.
pub const ELLIPSIS: &str = "...";

/// Tag or attribute name matching everything.
pub const ANY: &str = "any";

/// First difference found between two XML outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    /// Location of the difference in the expected output.
    pub path: String,
    pub reason: Reason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    Unparsable { output: Output, error: String },
    Tag { expected: String, found: String },
    Text { expected: String, found: String },
    Tail { expected: String, found: String },
    AttributeNames { expected: Vec<String>, found: Vec<String> },
    AttributeValue { name: String, expected: String, found: String },
    MissingChild { expected: String },
    UnexpectedChild { found: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Given,
    Expected,
}

/// Compares the XML output `given` against `expected`.
///
/// Tags are compared by namespace URI and local name, so prefixes do not
/// matter. Text and tails are compared with normalized whitespace. The
/// expected output may use `...` inside text or attribute values to match
/// anything, `any` as tag or attribute to skip the comparison of tag or
/// attributes, and `...` as the only content of an element to skip its
/// content.
pub fn compare(given: &[u8], expected: &[u8]) -> Result<(), Difference> {
    if given == expected {
        return Ok(());
    }

    let expected_doc = parse(expected, Output::Expected)?;
    let given_doc = parse(given, Output::Given)?;

    let want = root(&expected_doc, Output::Expected)?;
    let got = root(&given_doc, Output::Given)?;

    let mut path = Vec::new();

    compare_nodes(&mut path, want, got)
}

fn parse(data: &[u8], output: Output) -> Result<Doc, Difference> {
    Doc::parse(data).map_err(|err| unparsable(output, err))
}

fn root(doc: &Doc, output: Output) -> Result<&NodeRef, Difference> {
    doc.root().map_err(|err| unparsable(output, err))
}

fn unparsable(output: Output, err: XmlError) -> Difference {
    let error = match err.last_log_entry() {
        Some(entry) => entry.to_string(),
        None => err.to_string(),
    };

    Difference {
        path: "/".into(),
        reason: Reason::Unparsable { output, error },
    }
}

fn compare_nodes(path: &mut Vec<String>, want: &NodeRef, got: &NodeRef) -> Result<(), Difference> {
    let want_tag = Tag::of(want);
    let got_tag = Tag::of(got);

    path.push(want_tag.to_string());

    let diff = |path: &Vec<String>, reason| Difference {
        path: format!("/{}", path.join("/")),
        reason,
    };

    if !want_tag.matches(&got_tag) {
        return Err(diff(
            path,
            Reason::Tag {
                expected: want_tag.to_string(),
                found: got_tag.to_string(),
            },
        ));
    }

    let want_text = text_of(want);
    let got_text = text_of(got);
    if !text_matches(&want_text, &got_text, true) {
        return Err(diff(
            path,
            Reason::Text {
                expected: want_text,
                found: got_text,
            },
        ));
    }

    let want_tail = tail_of(want);
    let got_tail = tail_of(got);
    if !text_matches(&want_tail, &got_tail, true) {
        return Err(diff(
            path,
            Reason::Tail {
                expected: want_tail,
                found: got_tail,
            },
        ));
    }

    let want_attribs = attributes_of(want);
    if want_attribs.iter().all(|(name, _)| name != ANY) {
        let got_attribs = attributes_of(got);

        let want_names = want_attribs.iter().map(|(name, _)| name.clone()).collect::<Vec<_>>();
        let got_names = got_attribs.iter().map(|(name, _)| name.clone()).collect::<Vec<_>>();
        if want_names != got_names {
            return Err(diff(
                path,
                Reason::AttributeNames {
                    expected: want_names,
                    found: got_names,
                },
            ));
        }

        for ((name, want_value), (_, got_value)) in want_attribs.iter().zip(&got_attribs) {
            if !text_matches(want_value, got_value, false) {
                return Err(diff(
                    path,
                    Reason::AttributeValue {
                        name: name.clone(),
                        expected: want_value.clone(),
                        found: got_value.clone(),
                    },
                ));
            }
        }
    }

    let mut want_children = children_of(want);
    let mut got_children = children_of(got);

    if want.text().ok().flatten().as_deref() != Some(ELLIPSIS) || want_children.peek().is_some() {
        loop {
            let (want_child, got_child) = match (want_children.next(), got_children.next()) {
                (None, None) => break,
                (Some(want_child), Some(got_child)) => (want_child, got_child),
                (Some(want_child), None) => {
                    return Err(diff(
                        path,
                        Reason::MissingChild {
                            expected: Tag::of(want_child).to_string(),
                        },
                    ))
                }
                (None, Some(got_child)) => {
                    return Err(diff(
                        path,
                        Reason::UnexpectedChild {
                            found: Tag::of(got_child).to_string(),
                        },
                    ))
                }
            };

            compare_nodes(path, want_child, got_child)?;

            if got_children.peek().is_none() && tail_of(want_child) == ELLIPSIS {
                break;
            }
        }
    }

    path.pop();

    Ok(())
}

/// Tag of a node taking part in the comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Tag {
    Element(String),
    Comment,
    ProcessingInstruction,
}

impl Tag {
    fn of(node: &NodeRef) -> Self {
        match node.type_() {
            ElementType::XML_COMMENT_NODE => Self::Comment,
            ElementType::XML_PI_NODE => Self::ProcessingInstruction,
            _ => Self::Element(node.tag().unwrap_or_default()),
        }
    }

    fn matches(&self, got: &Tag) -> bool {
        match (self, got) {
            (Self::Element(want), _) if want == ANY => true,
            (Self::Element(want), Self::Element(got)) => {
                if let Some(local) = want.strip_prefix("{...}") {
                    local == local_name(got)
                } else {
                    want == got
                }
            }
            (want, got) => want == got,
        }
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Element(tag) => write!(f, "{}", tag),
            Self::Comment => write!(f, "comment()"),
            Self::ProcessingInstruction => write!(f, "processing-instruction()"),
        }
    }
}

fn local_name(tag: &str) -> &str {
    match tag.rfind('}') {
        Some(pos) => &tag[pos + 1..],
        None => tag,
    }
}

/// Text of an element, or the content of a comment or processing
/// instruction.
fn text_of(node: &NodeRef) -> String {
    let text = if node.is_element() {
        node.text()
    } else {
        node.content()
    };

    text.ok().flatten().unwrap_or_default()
}

fn tail_of(node: &NodeRef) -> String {
    node.tail().ok().flatten().unwrap_or_default()
}

/// Attributes in Clark notation, sorted by name.
fn attributes_of(node: &NodeRef) -> Vec<(String, String)> {
    let mut ret = node
        .attributes()
        .unwrap_or_default()
        .into_iter()
        .map(|attrib| (attrib.clark_name(), attrib.value))
        .collect::<Vec<_>>();

    ret.sort();

    ret
}

/// Child nodes taking part in the comparison. Text is compared as text
/// and tail of the elements.
fn children_of(node: &NodeRef) -> Peekable<impl Iterator<Item = &NodeRef>> {
    node.children()
        .filter(|child| {
            matches!(
                child.type_(),
                ElementType::XML_ELEMENT_NODE
                    | ElementType::XML_COMMENT_NODE
                    | ElementType::XML_PI_NODE
            )
        })
        .peekable()
}

/// Collapses runs of whitespace into a single space.
fn normalize_whitespace(s: &str) -> String {
    lazy_static! {
        static ref RX: Regex = Regex::new(r"[ \t\n][ \t\n]+").unwrap();
    }

    RX.replace_all(s, " ").into_owned()
}

/// Matches `got` against `want`, where `...` in `want` matches any
/// sequence of characters except newlines.
pub fn text_matches(want: &str, got: &str, strip: bool) -> bool {
    let (want, got) = if strip {
        (
            normalize_whitespace(want).trim().to_owned(),
            normalize_whitespace(got).trim().to_owned(),
        )
    } else {
        (want.to_owned(), got.to_owned())
    };

    if !want.contains(ELLIPSIS) {
        return want == got;
    }

    let pattern = regex::escape(&want).replace(r"\.\.\.", ".*");

    match Regex::new(&format!("^{}$", pattern)) {
        Ok(rx) => rx.is_match(&got),
        Err(_) => false,
    }
}

impl Display for Difference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Difference at {}: ", self.path)?;

        match &self.reason {
            Reason::Unparsable { output, error } => {
                let output = match output {
                    Output::Given => "given",
                    Output::Expected => "expected",
                };

                write!(f, "unable to parse {} output: {}", output, error)
            }
            Reason::Tag { expected, found } => {
                write!(f, "expected tag {}, found {}", expected, found)
            }
            Reason::Text { expected, found } => {
                write!(f, "expected text {:?}, found {:?}", expected, found)
            }
            Reason::Tail { expected, found } => {
                write!(f, "expected tail {:?}, found {:?}", expected, found)
            }
            Reason::AttributeNames { expected, found } => write!(
                f,
                "expected attributes {:?}, found {:?}",
                expected, found
            ),
            Reason::AttributeValue {
                name,
                expected,
                found,
            } => write!(
                f,
                "expected attribute {} to be {:?}, found {:?}",
                name, expected, found
            ),
            Reason::MissingChild { expected } => write!(f, "missing child {}", expected),
            Reason::UnexpectedChild { found } => write!(f, "unexpected child {}", found),
        }
    }
}
