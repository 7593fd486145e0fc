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

use std::ffi::{CStr, CString};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;

use foreign_types::ForeignTypeRef;
use libc::*;
use log::debug;

use super::{init, DocRef, ElementType, Error, ErrorLog, NamespaceRef, NodeRef};

/// A compiled XPath expression.
pub struct XPath {
    ptr: *mut ffi::xmlXPathCompExpr,
    path: String,
}

impl XPath {
    pub fn compile(path: &str) -> Result<Self, Error> {
        init();

        let buf = CString::new(path).map_err(|_| Error::NulByte(path.to_owned()))?;

        let (ptr, log) =
            ErrorLog::capture(|_| unsafe { ffi::xmlXPathCompile(buf.as_ptr() as *const _) });
        if ptr.is_null() {
            debug!("Unable to compile XPath {:?}: {}", path, &log);

            return Err(Error::InvalidXPath {
                xpath: path.to_owned(),
                log,
            });
        }

        Ok(Self {
            ptr,
            path: path.to_owned(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Drop for XPath {
    fn drop(&mut self) {
        unsafe {
            ffi::xmlXPathFreeCompExpr(self.ptr);
        }
    }
}

/// XPath evaluation context bound to a document.
pub struct XPathContext<'a> {
    ptr: *mut ffi::xmlXPathContext,
    _doc: PhantomData<&'a DocRef>,
}

impl<'a> XPathContext<'a> {
    pub fn new(doc: &'a DocRef) -> Result<Self, Error> {
        init();

        unsafe {
            let ptr = ffi::xmlXPathNewContext(doc.as_ptr());
            let ptr = Error::check_ptr_mut(ptr, "xmlXPathNewContext")?;

            Ok(Self {
                ptr,
                _doc: PhantomData,
            })
        }
    }

    pub fn register_namespace(&mut self, prefix: &str, href: &str) -> Result<(), Error> {
        let c_prefix = CString::new(prefix).map_err(|_| Error::NulByte(prefix.to_owned()))?;
        let c_href = CString::new(href).map_err(|_| Error::NulByte(href.to_owned()))?;

        unsafe {
            let ret = ffi::xmlXPathRegisterNs(
                self.ptr,
                c_prefix.as_ptr() as *const _,
                c_href.as_ptr() as *const _,
            );

            if ret != 0 {
                return Err(Error::last_error(Error::NullPointer(format!(
                    "xmlXPathRegisterNs({}, {})",
                    prefix, href
                ))));
            }
        }

        Ok(())
    }

    /// Evaluates `xpath` with `node` as context node.
    pub fn evaluate(&mut self, xpath: &XPath, node: &'a NodeRef) -> Result<XPathValue<'a>, Error> {
        debug!("Evaluate XPath {:?} on <{}>", xpath.path(), node.name().unwrap_or("?"));

        let context = self.ptr;
        let (obj, log) = ErrorLog::capture(|_| unsafe {
            if ffi::xmlXPathSetContextNode(node.as_ptr(), context) != 0 {
                return std::ptr::null_mut();
            }

            ffi::xmlXPathCompiledEval(xpath.ptr, context)
        });

        if obj.is_null() {
            return Err(Error::XPath {
                xpath: xpath.path().to_owned(),
                log,
            });
        }

        unsafe {
            let value = XPathValue::from_raw(&*obj);
            ffi::xmlXPathFreeObject(obj);

            value
        }
    }
}

impl Drop for XPathContext<'_> {
    fn drop(&mut self) {
        unsafe {
            ffi::xmlXPathFreeContext(self.ptr);
        }
    }
}

/// Result of an XPath evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum XPathValue<'a> {
    NodeSet(Vec<XPathNode<'a>>),
    Boolean(bool),
    Number(f64),
    String(String),
}

/// Member of a node set.
///
/// Namespace nodes only live as long as the XPath result they were
/// returned in, so they are copied out.
#[derive(Clone, PartialEq)]
pub enum XPathNode<'a> {
    Node(&'a NodeRef),
    Namespace {
        prefix: Option<String>,
        href: String,
    },
}

impl<'a> XPathValue<'a> {
    unsafe fn from_raw(obj: &ffi::xmlXPathObject) -> Result<Self, Error> {
        use ffi::xmlXPathObjectType as T;

        match obj.type_ {
            T::XPATH_NODESET | T::XPATH_XSLT_TREE => {
                let mut nodes = Vec::new();

                if !obj.nodesetval.is_null() {
                    let set = &*obj.nodesetval;

                    for i in 0..set.node_nr.max(0) as usize {
                        let ptr = *set.node_tab.add(i);
                        if !ptr.is_null() {
                            nodes.push(XPathNode::from_ptr(ptr)?);
                        }
                    }
                }

                Ok(Self::NodeSet(nodes))
            }
            T::XPATH_BOOLEAN => Ok(Self::Boolean(obj.boolval != 0)),
            T::XPATH_NUMBER => Ok(Self::Number(obj.floatval)),
            T::XPATH_STRING => {
                let s = if obj.stringval.is_null() {
                    String::new()
                } else {
                    CStr::from_ptr(obj.stringval as *const c_char)
                        .to_str()?
                        .to_owned()
                };

                Ok(Self::String(s))
            }
            type_ => Err(Error::UnsupportedXPathResult(type_)),
        }
    }

    /// Truth value of the result: an empty node set, `false`, zero, NaN and
    /// the empty string are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::NodeSet(nodes) => !nodes.is_empty(),
            Self::Boolean(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
        }
    }

    /// Number of results; a scalar counts as one.
    pub fn len(&self) -> usize {
        match self {
            Self::NodeSet(nodes) => nodes.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// String values of all results, as the XPath `string()` function
    /// would convert them.
    pub fn string_values(&self) -> Result<Vec<String>, Error> {
        match self {
            Self::NodeSet(nodes) => nodes.iter().map(XPathNode::string_value).collect(),
            Self::Boolean(b) => Ok(vec![b.to_string()]),
            Self::Number(n) => Ok(vec![number_to_string(*n)]),
            Self::String(s) => Ok(vec![s.clone()]),
        }
    }
}

impl<'a> XPathNode<'a> {
    unsafe fn from_ptr(ptr: *mut ffi::xmlNode) -> Result<Self, Error> {
        if (*ptr).type_ == ElementType::XML_NAMESPACE_DECL {
            let ns = NamespaceRef::from_ptr(ptr as *mut ffi::xmlNs);

            return Ok(Self::Namespace {
                prefix: ns.prefix()?.map(ToOwned::to_owned),
                href: ns.href()?.to_owned(),
            });
        }

        Ok(Self::Node(NodeRef::from_ptr(ptr)))
    }

    pub fn node(&self) -> Option<&'a NodeRef> {
        match self {
            Self::Node(node) => Some(node),
            Self::Namespace { .. } => None,
        }
    }

    pub fn is_element(&self) -> bool {
        self.node().map(NodeRef::is_element).unwrap_or(false)
    }

    pub fn string_value(&self) -> Result<String, Error> {
        match self {
            Self::Node(node) => Ok(node.content()?.unwrap_or_default()),
            Self::Namespace { href, .. } => Ok(href.clone()),
        }
    }
}

impl Debug for XPathNode<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Node(node) => f
                .debug_struct("Node")
                .field("type", &node.type_())
                .field("name", &node.name().unwrap_or("<unknown>"))
                .finish(),
            Self::Namespace { prefix, href } => f
                .debug_struct("Namespace")
                .field("prefix", prefix)
                .field("href", href)
                .finish(),
        }
    }
}

fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };

        s.into()
    } else if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::str::FromStr;

    use super::super::Doc;

    #[test]
    fn evaluate_relative_to_node() {
        let doc = Doc::from_str(r#"<root><sub id="1">a</sub><sub id="2">b</sub></root>"#).unwrap();
        let root = doc.root().unwrap();

        let xpath = XPath::compile("./sub/@id").unwrap();
        let mut context = XPathContext::new(&doc).unwrap();
        let value = context.evaluate(&xpath, root).unwrap();

        assert_eq!(value.len(), 2);
        assert_eq!(value.string_values().unwrap(), vec!["1", "2"]);
    }

    #[test]
    fn evaluate_with_namespace() {
        let doc = Doc::from_str(r#"<root xmlns="urn:a"><sub>a</sub></root>"#).unwrap();
        let root = doc.root().unwrap();

        let mut context = XPathContext::new(&doc).unwrap();
        let plain = XPath::compile("./sub").unwrap();
        assert!(!context.evaluate(&plain, root).unwrap().is_truthy());

        context.register_namespace("x", "urn:a").unwrap();
        let prefixed = XPath::compile("./x:sub/text()").unwrap();
        let value = context.evaluate(&prefixed, root).unwrap();

        assert_eq!(value.string_values().unwrap(), vec!["a"]);
    }

    #[test]
    fn scalar_results() {
        let doc = Doc::from_str("<root><a/><a/></root>").unwrap();
        let root = doc.root().unwrap();
        let mut context = XPathContext::new(&doc).unwrap();

        let count = XPath::compile("count(a)").unwrap();
        let value = context.evaluate(&count, root).unwrap();
        assert_eq!(value, XPathValue::Number(2.0));
        assert_eq!(value.string_values().unwrap(), vec!["2"]);

        let empty = XPath::compile("string(b)").unwrap();
        assert!(!context.evaluate(&empty, root).unwrap().is_truthy());

        let boolean = XPath::compile("count(a) = 2").unwrap();
        assert!(context.evaluate(&boolean, root).unwrap().is_truthy());
    }

    #[test]
    fn invalid_expression() {
        assert!(matches!(
            XPath::compile("./sub[@id="),
            Err(Error::InvalidXPath { .. })
        ));
    }

    #[test]
    fn undefined_prefix() {
        let doc = Doc::from_str("<root/>").unwrap();
        let root = doc.root().unwrap();

        let xpath = XPath::compile("./undefined:child").unwrap();
        let mut context = XPathContext::new(&doc).unwrap();

        assert!(matches!(
            context.evaluate(&xpath, root),
            Err(Error::XPath { .. })
        ));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(number_to_string(1.5), "1.5");
        assert_eq!(number_to_string(-3.0), "-3");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    }
}
