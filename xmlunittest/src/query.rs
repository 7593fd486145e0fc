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

use std::collections::BTreeMap;

use libxml::{Error as XmlError, NodeRef, XPath, XPathContext, XPathValue};
use log::debug;

use super::Failure;

/// Namespaces usable in XPath expressions evaluated on `node`: every
/// namespace in scope of the node, with the default namespace bound to
/// `default_prefix`. A namespace explicitly declared with `default_prefix`
/// keeps its binding.
pub fn namespace_map(
    node: &NodeRef,
    default_prefix: &str,
) -> Result<BTreeMap<String, String>, XmlError> {
    let mut map = BTreeMap::new();
    let mut default = None;

    for (prefix, href) in node.namespaces()? {
        match prefix {
            Some(prefix) => {
                map.insert(prefix, href);
            }
            None => default = Some(href),
        }
    }

    if let Some(href) = default {
        map.entry(default_prefix.to_owned()).or_insert(href);
    }

    Ok(map)
}

/// Evaluates XPath expressions with a node as context node.
pub struct Query<'a> {
    node: &'a NodeRef,
    context: XPathContext<'a>,
}

impl<'a> Query<'a> {
    pub fn new(node: &'a NodeRef, default_prefix: &str) -> Result<Self, Failure> {
        let mut context = XPathContext::new(node.doc()?)?;

        for (prefix, href) in namespace_map(node, default_prefix)? {
            context.register_namespace(&prefix, &href)?;
        }

        Ok(Self { node, context })
    }

    pub fn evaluate(&mut self, xpath: &str) -> Result<XPathValue<'a>, Failure> {
        let node = self.node;

        let compiled = XPath::compile(xpath).map_err(|err| Failure::xpath_error(node, xpath, err))?;
        let value = self
            .context
            .evaluate(&compiled, node)
            .map_err(|err| Failure::xpath_error(node, xpath, err))?;

        debug!("XPath {:?} returned {} result(s)", xpath, value.len());

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::str::FromStr;

    use libxml::Doc;

    #[test]
    fn default_namespace_gets_prefix() {
        let doc = Doc::from_str(r#"<root xmlns="urn:default" xmlns:a="urn:a"><child/></root>"#)
            .unwrap();
        let child = doc.root().unwrap().first_child_element().unwrap();

        let map = namespace_map(child, "ns").unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map["ns"], "urn:default");
        assert_eq!(map["a"], "urn:a");
    }

    #[test]
    fn explicit_prefix_wins() {
        let doc = Doc::from_str(r#"<root xmlns="urn:default" xmlns:ns="urn:explicit"/>"#).unwrap();

        let map = namespace_map(doc.root().unwrap(), "ns").unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(map["ns"], "urn:explicit");
    }

    #[test]
    fn evaluate_with_default_namespace() {
        let doc =
            Doc::from_str(r#"<root xmlns="urn:default"><child>1</child><child>2</child></root>"#)
                .unwrap();
        let root = doc.root().unwrap();

        let mut query = Query::new(root, "d").unwrap();

        assert_eq!(query.evaluate("./d:child").unwrap().len(), 2);
        assert_eq!(query.evaluate("./child").unwrap().len(), 0);
        assert!(matches!(
            query.evaluate("./ns:child"),
            Err(Failure::XPathError { .. })
        ));
    }
}
