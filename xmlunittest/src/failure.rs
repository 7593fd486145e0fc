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

use libxml::{Error as XmlError, ErrorLog, NodeRef, SchemaKind};
use thiserror::Error;

use super::Difference;

/// Reason an assertion failed.
///
/// The `Display` implementation renders the message the test fails with.
#[derive(Debug, Error)]
pub enum Failure {
    #[error("Input is not a valid XML document: {0}")]
    InvalidDocument(ErrorLog),

    #[error("Input is not a valid partial XML document: {0}")]
    InvalidPartial(ErrorLog),

    #[error("Input does not have any elements to check.")]
    EmptyPartial,

    #[error("Namespace prefix {prefix:?} is not declared for element {tag}")]
    NamespaceNotDeclared { tag: String, prefix: String },

    #[error(
        "Namespace prefix {prefix:?} of element {tag} is bound to {found:?} \
         instead of {expected:?}"
    )]
    NamespaceMismatch {
        tag: String,
        prefix: String,
        expected: String,
        found: String,
    },

    #[error("Attribute {name:?} not found on element {tag}")]
    AttributeNotFound { tag: String, name: String },

    #[error("Invalid value for attribute {name:?} of element {tag}: {found:?} not in {expected:?}")]
    AttributeValue {
        tag: String,
        name: String,
        expected: Vec<String>,
        found: String,
    },

    #[error("Expected an element node, found {0}")]
    NotAnElement(String),

    #[error("Invalid tag: {found:?} != {expected:?}")]
    Tag { expected: String, found: String },

    #[error("Invalid text for element {tag}: {found:?} != {expected:?}")]
    Text {
        tag: String,
        expected: String,
        found: Option<String>,
    },

    #[error("Invalid text for element {tag}: {found:?} not in {expected:?}")]
    TextNotIn {
        tag: String,
        expected: Vec<String>,
        found: Option<String>,
    },

    #[error("No result found for XPath for element {tag}\nXPath: {xpath}\nElement:\n{element}")]
    XPathNotFound {
        tag: String,
        xpath: String,
        element: String,
    },

    #[error(
        "Too many results found ({count}) for XPath on element {tag}:\n\
         XPath: {xpath}\nElement:\n{element}"
    )]
    XPathTooMany {
        tag: String,
        xpath: String,
        element: String,
        count: usize,
    },

    #[error("Value is not unique for element {tag}:\nXPath: {xpath}\nElement:\n{element}")]
    XPathNotUnique {
        tag: String,
        xpath: String,
        element: String,
    },

    #[error(
        "Invalid value found for node {tag}\nXPath: {xpath}\n\
         Value found: {value}\nElement:\n{element}"
    )]
    XPathValue {
        tag: String,
        xpath: String,
        element: String,
        value: String,
    },

    #[error(
        "Invalid XPath expression for element {tag}: {error}\n\
         Xpath: {xpath}\nElement:\n{element}"
    )]
    XPathError {
        tag: String,
        xpath: String,
        element: String,
        error: XmlError,
    },

    #[error("{log}")]
    NotValid { kind: SchemaKind, log: ErrorLog },

    #[error("Output are not equivalent:\nGiven: {given}\nExpected: {expected}\n{difference}")]
    NotEquivalent {
        given: String,
        expected: String,
        difference: Difference,
    },

    #[error("{0}")]
    Setup(#[from] XmlError),
}

impl Failure {
    pub(crate) fn xpath_error(node: &NodeRef, xpath: &str, error: XmlError) -> Self {
        Self::XPathError {
            tag: tag_of(node),
            xpath: xpath.into(),
            element: pretty_print(node),
            error,
        }
    }

    pub(crate) fn xpath_not_found(node: &NodeRef, xpath: &str) -> Self {
        Self::XPathNotFound {
            tag: tag_of(node),
            xpath: xpath.into(),
            element: pretty_print(node),
        }
    }
}

/// Tag of `node` in Clark notation, as shown in failure messages.
pub(crate) fn tag_of(node: &NodeRef) -> String {
    node.tag().unwrap_or_else(|_| "<unknown>".into())
}

pub(crate) fn pretty_print(node: &NodeRef) -> String {
    match node.dump(true) {
        Ok(mut s) => {
            s.push('\n');

            s
        }
        Err(_) => String::new(),
    }
}
