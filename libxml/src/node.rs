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

use std::{
    cmp::{Eq, PartialEq},
    ffi::CStr,
    hash::{Hash, Hasher},
    iter::Iterator,
    ptr::{null, null_mut},
};

use foreign_types::{foreign_type, ForeignTypeRef};
use libc::*;

use super::{DocRef, ElementType, Error, NamespaceRef, OutputBuffer};

/* Node */

foreign_type! {
    pub unsafe type Node: Send {
        type CType = ffi::xmlNode;
        fn drop = ffi::xmlFreeNode;
    }
}

/// Attribute of an element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub prefix: Option<String>,
    pub namespace: Option<String>,
    pub value: String,
}

impl NodeRef {
    pub fn type_(&self) -> ElementType {
        unsafe { (*self.as_ptr()).type_ }
    }

    pub fn is_element(&self) -> bool {
        self.type_() == ElementType::XML_ELEMENT_NODE
    }

    pub fn name(&self) -> Result<&str, Error> {
        unsafe {
            let ptr = self.as_ptr();
            let node = &*ptr;

            let ptr = node.name as *const c_char;
            let ptr = Error::check_ptr(ptr, "xmlNode.name")?;

            let s = CStr::from_ptr(ptr).to_str()?;

            Ok(s)
        }
    }

    /// Name of the node in Clark notation: `{namespace-uri}local-name`, or
    /// just the local name if the node is not in a namespace.
    pub fn tag(&self) -> Result<String, Error> {
        let name = self.name()?;

        match self.namespace_href()? {
            Some(href) => Ok(format!("{{{}}}{}", href, name)),
            None => Ok(name.to_owned()),
        }
    }

    /// Namespace the node itself is bound to (no lookup of the default
    /// namespace in scope).
    pub fn namespace_href(&self) -> Result<Option<&str>, Error> {
        unsafe {
            let ns = (*self.as_ptr()).ns;
            if ns.is_null() {
                return Ok(None);
            }

            let href = NamespaceRef::from_ptr(ns).href()?;
            if href.is_empty() {
                Ok(None)
            } else {
                Ok(Some(href))
            }
        }
    }

    pub fn ns(&self) -> Option<&NamespaceRef> {
        unsafe {
            let ptr = self.as_ptr();
            let node = &*ptr;

            if !node.ns.is_null() {
                return Some(NamespaceRef::from_ptr(node.ns));
            }

            let ns = ffi::xmlSearchNs(node.doc, ptr, null());
            if !ns.is_null() {
                return Some(NamespaceRef::from_ptr(ns));
            }

            None
        }
    }

    /// All namespaces in scope of this node as `(prefix, uri)` pairs. The
    /// default namespace has no prefix. Declarations closer to the node
    /// shadow the ones of its ancestors.
    pub fn namespaces(&self) -> Result<Vec<(Option<String>, String)>, Error> {
        let mut seen = Vec::<Option<String>>::new();
        let mut ret = Vec::new();
        let mut node = Some(self);

        while let Some(n) = node {
            if n.is_element() {
                let mut ns = unsafe { (*n.as_ptr()).ns_def };

                while !ns.is_null() {
                    let ns_ref = unsafe { NamespaceRef::from_ptr(ns) };
                    ns = unsafe { (*ns).next };

                    let prefix = ns_ref.prefix()?.map(ToOwned::to_owned);
                    if seen.contains(&prefix) {
                        continue;
                    }

                    seen.push(prefix.clone());

                    let href = ns_ref.href()?;
                    if !href.is_empty() {
                        ret.push((prefix, href.to_owned()));
                    }
                }
            }

            node = n.parent();
        }

        Ok(ret)
    }

    pub fn doc(&self) -> Result<&DocRef, Error> {
        unsafe {
            let ptr = self.as_ptr();
            let ptr = (*ptr).doc;
            let ptr = Error::check_ptr_mut(ptr, "xmlNode.doc")?;

            Ok(DocRef::from_ptr(ptr))
        }
    }

    pub fn parent(&self) -> Option<&NodeRef> {
        unsafe {
            let ptr = self.as_ptr();
            let ptr = (*ptr).parent;

            if ptr.is_null() {
                return None;
            }

            Some(NodeRef::from_ptr(ptr))
        }
    }

    pub fn first_child(&self) -> Option<&NodeRef> {
        unsafe {
            let ptr = self.as_ptr();
            let ptr = (*ptr).children;
            if ptr.is_null() {
                None
            } else {
                Some(NodeRef::from_ptr(ptr))
            }
        }
    }

    pub fn first_child_element(&self) -> Option<&NodeRef> {
        unsafe {
            let ptr = ffi::xmlFirstElementChild(self.as_ptr());
            if ptr.is_null() {
                None
            } else {
                Some(NodeRef::from_ptr(ptr))
            }
        }
    }

    pub fn next_sibling(&self) -> Option<&NodeRef> {
        unsafe {
            let ptr = self.as_ptr();
            let ptr = (*ptr).next;
            if ptr.is_null() {
                None
            } else {
                Some(NodeRef::from_ptr(ptr))
            }
        }
    }

    pub fn next_sibling_element(&self) -> Option<&NodeRef> {
        unsafe {
            let ptr = ffi::xmlNextElementSibling(self.as_ptr());
            if ptr.is_null() {
                None
            } else {
                Some(NodeRef::from_ptr(ptr))
            }
        }
    }

    pub fn children(&self) -> ChildIter<'_> {
        ChildIter::new(self.first_child())
    }

    pub fn child_elements(&self) -> ChildElementIter<'_> {
        ChildElementIter::new(self.first_child_element())
    }

    /// Text directly inside the node, before its first non-text child.
    /// `None` if the node does not start with text.
    pub fn text(&self) -> Result<Option<String>, Error> {
        collect_text(self.first_child())
    }

    /// Text following the node, up to the next non-text sibling.
    pub fn tail(&self) -> Result<Option<String>, Error> {
        collect_text(self.next_sibling())
    }

    pub fn attributes(&self) -> Result<Vec<Attribute>, Error> {
        let mut ret = Vec::new();

        unsafe {
            let node = &*self.as_ptr();

            if node.type_ != ElementType::XML_ELEMENT_NODE {
                return Ok(ret);
            }

            let mut prop = node.properties;
            while !prop.is_null() {
                let p = &*prop;
                prop = p.next;

                if p.type_ != ElementType::XML_ATTRIBUTE_NODE {
                    continue;
                }

                let name = str_from_ptr(p.name as *const c_char)?.to_owned();

                let (prefix, namespace) = if p.ns.is_null() {
                    (None, None)
                } else {
                    let ns = NamespaceRef::from_ptr(p.ns);

                    (ns.prefix()?.map(ToOwned::to_owned), Some(ns.href()?.to_owned()))
                };

                let value = NodeRef::from_ptr(prop_as_node(p))
                    .content()?
                    .unwrap_or_default();

                ret.push(Attribute {
                    name,
                    prefix,
                    namespace,
                    value,
                });
            }
        }

        Ok(ret)
    }

    /// Value of the attribute `name`, which is either a plain local name,
    /// `prefix:local` or `{uri}local`.
    pub fn attribute(&self, name: &str) -> Result<Option<String>, Error> {
        let ret = self
            .attributes()?
            .into_iter()
            .find(|attrib| attrib.matches(name))
            .map(|attrib| attrib.value);

        Ok(ret)
    }

    pub fn content(&self) -> Result<Option<String>, Error> {
        let mut buf = String::new();

        if get_content(&mut buf, self)? {
            Ok(Some(buf))
        } else {
            Ok(None)
        }
    }

    /// Serializes the node and its subtree.
    pub fn dump(&self, pretty: bool) -> Result<String, Error> {
        let mut buf = Vec::new();

        {
            let output = OutputBuffer::new(&mut buf)?;

            unsafe {
                let ptr = self.as_ptr();

                ffi::xmlNodeDumpOutput(
                    output.as_ptr(),
                    (*ptr).doc,
                    ptr,
                    0,
                    if pretty { 1 } else { 0 },
                    null(),
                );
            }
        }

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Attribute {
    /// Name in Clark notation.
    pub fn clark_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{{{}}}{}", ns, self.name),
            None => self.name.clone(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        if name.starts_with('{') {
            return self.clark_name() == name;
        }

        match (name.split_once(':'), &self.prefix) {
            (Some((prefix, local)), Some(p)) => p == prefix && self.name == local,
            (None, None) => self.name == name,
            _ => false,
        }
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &NodeRef) -> bool {
        self.as_ptr() == other.as_ptr()
    }
}

impl Eq for NodeRef {}

impl Hash for NodeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_ptr().hash(state)
    }
}

/* ChildIter */

pub struct ChildIter<'a> {
    next: Option<&'a NodeRef>,
}

impl<'a> ChildIter<'a> {
    fn new(next: Option<&'a NodeRef>) -> Self {
        Self { next }
    }
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = &'a NodeRef;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(next) = self.next {
            self.next = next.next_sibling();

            Some(next)
        } else {
            None
        }
    }
}

/* ChildElementIter */

pub struct ChildElementIter<'a> {
    next: Option<&'a NodeRef>,
}

impl<'a> ChildElementIter<'a> {
    fn new(next: Option<&'a NodeRef>) -> Self {
        Self { next }
    }
}

impl<'a> Iterator for ChildElementIter<'a> {
    type Item = &'a NodeRef;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(next) = self.next {
            self.next = next.next_sibling_element();

            Some(next)
        } else {
            None
        }
    }
}

fn prop_as_node(prop: &ffi::xmlAttr) -> *mut ffi::xmlNode {
    prop as *const ffi::xmlAttr as *mut ffi::xmlNode
}

fn collect_text(mut node: Option<&NodeRef>) -> Result<Option<String>, Error> {
    let mut ret: Option<String> = None;

    while let Some(n) = node {
        match n.type_() {
            ElementType::XML_TEXT_NODE | ElementType::XML_CDATA_SECTION_NODE => {
                if let Some(content) = n.content()? {
                    ret.get_or_insert_with(String::new).push_str(&content);
                }
            }
            _ => break,
        }

        node = n.next_sibling();
    }

    Ok(ret)
}

fn get_content(buf: &mut String, node: &NodeRef) -> Result<bool, Error> {
    unsafe {
        match node.type_() {
            ElementType::XML_DOCUMENT_FRAG_NODE | ElementType::XML_ELEMENT_NODE => {
                let ptr = node.as_ptr();
                let mut tmp = ptr;
                let mut ret = false;

                while !tmp.is_null() {
                    match (*tmp).type_ {
                        ElementType::XML_CDATA_SECTION_NODE | ElementType::XML_TEXT_NODE => {
                            let c = (*tmp).content;
                            if !c.is_null() {
                                ret = true;
                                *buf += str_from_ptr(c as *const c_char)?;
                            }
                        }
                        ElementType::XML_ENTITY_REF_NODE => {
                            ret |= get_content(buf, &NodeRef::from_ptr(tmp))?;
                        }
                        _ => (),
                    }

                    let c = (*tmp).children;
                    if !c.is_null()
                        && (*tmp).type_ != ElementType::XML_ENTITY_REF_NODE
                        && (*c).type_ != ElementType::XML_ELEMENT_DECL
                    {
                        tmp = c;
                        continue;
                    }

                    if tmp == ptr {
                        break;
                    }

                    if !(*tmp).next.is_null() {
                        tmp = (*tmp).next;
                        continue;
                    }

                    while !tmp.is_null() {
                        tmp = (*tmp).parent;
                        if tmp.is_null() {
                            break;
                        }

                        if tmp == ptr {
                            tmp = null_mut();
                            break;
                        }

                        if !(*tmp).next.is_null() {
                            tmp = (*tmp).next;
                            break;
                        }
                    }
                }

                Ok(ret)
            }
            ElementType::XML_ATTRIBUTE_NODE => {
                let mut ret = false;
                let mut cur = (*node.as_ptr()).children;

                while !cur.is_null() {
                    ret |= get_content(buf, &NodeRef::from_ptr(cur))?;
                    cur = (*cur).next;
                }

                Ok(ret)
            }
            ElementType::XML_ENTITY_REF_NODE => {
                let ent = (*node.as_ptr()).children;
                if ent.is_null() || (*ent).type_ != ElementType::XML_ENTITY_DECL {
                    return Ok(false);
                }

                let mut ret = false;
                let mut cur = (*ent).children;

                while !cur.is_null() {
                    ret |= get_content(buf, &NodeRef::from_ptr(cur))?;
                    cur = (*cur).next;
                }

                Ok(ret)
            }
            ElementType::XML_DOCUMENT_NODE
            | ElementType::XML_DOCB_DOCUMENT_NODE
            | ElementType::XML_HTML_DOCUMENT_NODE => {
                let ptr = node.as_ptr();
                let mut ret = false;
                let mut cur = (*ptr).children;

                while !cur.is_null() {
                    let ptr = cur;
                    let n = &*ptr;
                    cur = n.next;

                    if n.type_ == ElementType::XML_ELEMENT_NODE
                        || n.type_ == ElementType::XML_TEXT_NODE
                        || n.type_ == ElementType::XML_CDATA_SECTION_NODE
                    {
                        ret |= get_content(buf, &NodeRef::from_ptr(ptr))?;
                    }
                }

                Ok(ret)
            }
            ElementType::XML_COMMENT_NODE
            | ElementType::XML_PI_NODE
            | ElementType::XML_CDATA_SECTION_NODE
            | ElementType::XML_TEXT_NODE => {
                let ptr = node.as_ptr();
                let n = &*ptr;

                if n.content.is_null() {
                    Ok(false)
                } else {
                    *buf += str_from_ptr(n.content as *const c_char)?;

                    Ok(true)
                }
            }
            _ => Ok(false),
        }
    }
}

unsafe fn str_from_ptr(s: *const c_char) -> Result<&'static str, Error> {
    Ok(CStr::from_ptr(s).to_str()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::str::FromStr;

    use super::super::Doc;

    #[test]
    fn children_iterator() {
        let doc = test_doc();
        let root = doc.root().unwrap();

        let mut iter = root.children();

        let el = iter.next();
        assert!(el.is_some());
        assert_eq!(el.unwrap().type_(), ElementType::XML_TEXT_NODE);

        let el = iter.next();
        assert!(el.is_some());
        assert_eq!(el.unwrap().type_(), ElementType::XML_ELEMENT_NODE);
        assert_eq!(el.unwrap().name().unwrap(), "sub");

        let el = iter.next();
        assert!(el.is_some());
        assert_eq!(el.unwrap().type_(), ElementType::XML_TEXT_NODE);

        let el = iter.next();
        assert!(el.is_some());
        assert_eq!(el.unwrap().tag().unwrap(), "{urn:shadowed}sub");
    }

    #[test]
    fn child_element_iterator() {
        let doc = test_doc();
        let root = doc.root().unwrap();

        let names = root
            .child_elements()
            .map(|el| el.tag().unwrap())
            .collect::<Vec<_>>();

        assert_eq!(
            names,
            vec!["{urn:default}sub", "{urn:shadowed}sub", "{urn:default}empty"]
        );
    }

    #[test]
    fn tag_without_namespace() {
        let doc = Doc::from_str("<root><child/></root>").unwrap();
        let root = doc.root().unwrap();

        assert_eq!(root.tag().unwrap(), "root");
        assert_eq!(root.namespace_href().unwrap(), None);
    }

    #[test]
    fn text_and_tail() {
        let doc = Doc::from_str("<root>head<a/>tail<![CDATA[ more]]><b/></root>").unwrap();
        let root = doc.root().unwrap();
        let a = root.first_child_element().unwrap();
        let b = a.next_sibling_element().unwrap();

        assert_eq!(root.text().unwrap().as_deref(), Some("head"));
        assert_eq!(a.text().unwrap(), None);
        assert_eq!(a.tail().unwrap().as_deref(), Some("tail more"));
        assert_eq!(b.tail().unwrap(), None);
    }

    #[test]
    fn namespaces_in_scope() {
        let doc = test_doc();
        let root = doc.root().unwrap();
        let sub = root.child_elements().nth(1).unwrap();

        let mut namespaces = sub.namespaces().unwrap();
        namespaces.sort();

        assert_eq!(
            namespaces,
            vec![
                (None, "urn:default".to_owned()),
                (Some("o".to_owned()), "urn:shadowed".to_owned()),
            ]
        );
    }

    #[test]
    fn attributes() {
        let doc = test_doc();
        let root = doc.root().unwrap();

        assert_eq!(root.attribute("id").unwrap().as_deref(), Some("1"));
        assert_eq!(root.attribute("o:id").unwrap().as_deref(), Some("2"));
        assert_eq!(root.attribute("{urn:other}id").unwrap().as_deref(), Some("2"));
        assert_eq!(root.attribute("x:id").unwrap(), None);
        assert_eq!(root.attribute("missing").unwrap(), None);
        assert_eq!(root.attributes().unwrap().len(), 2);
    }

    #[test]
    fn dump_node() {
        let doc = Doc::from_str("<root><child a=\"1\">text</child></root>").unwrap();
        let child = doc.root().unwrap().first_child_element().unwrap();

        assert_eq!(child.dump(false).unwrap(), "<child a=\"1\">text</child>");
    }

    fn test_doc() -> Doc {
        Doc::from_str(
            r##"<root xmlns="urn:default" xmlns:o="urn:other" id="1" o:id="2">
                <sub>value</sub>
                <o:sub xmlns:o="urn:shadowed">value</o:sub>
                <empty/>
            </root>"##,
        )
        .unwrap()
    }
}
