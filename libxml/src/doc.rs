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

use std::convert::TryFrom;
use std::ffi::CString;
use std::fmt;
use std::path::Path;
use std::ptr::null;
use std::str::FromStr;

use foreign_types::{foreign_type, ForeignType, ForeignTypeRef};
use libc::*;
use log::{debug, warn};

use super::{init, Error, ErrorLog, NodeRef};

const PARSE_OPTIONS: c_int = ffi::XML_PARSE_NONET | ffi::XML_PARSE_NOCDATA;

foreign_type! {
    pub unsafe type Doc: Send {
        type CType = ffi::xmlDoc;
        fn drop = ffi::xmlFreeDoc;
    }
}

impl Doc {
    /// Parses a serialized XML document.
    ///
    /// The encoding is detected from the byte order mark or the XML
    /// declaration. External entities are never fetched over the network.
    pub fn parse<B>(data: B) -> Result<Doc, Error>
    where
        B: AsRef<[u8]>,
    {
        init();

        let data = data.as_ref();
        let len = c_int::try_from(data.len()).map_err(|_| Error::InputTooLarge(data.len()))?;

        let (ptr, log) = ErrorLog::capture(|_| unsafe {
            ffi::xmlReadMemory(
                data.as_ptr() as *const c_char,
                len,
                null(),
                null(),
                PARSE_OPTIONS,
            )
        });

        if ptr.is_null() {
            debug!("Unable to parse document ({} bytes): {}", len, &log);

            return Err(Error::Parse(log));
        }

        debug!("Parsed document ({} bytes)", len);

        for entry in log.warnings() {
            warn!("{}", entry);
        }

        Ok(unsafe { Doc::from_ptr(ptr) })
    }

    pub fn from_file<P: AsRef<Path>>(filename: P) -> Result<Doc, Error> {
        init();

        let filename = filename.as_ref();

        let buf = filename
            .to_str()
            .ok_or_else(|| Error::InvalidFilepath(filename.to_owned()))?;
        let buf = CString::new(buf).map_err(|_| Error::InvalidFilepath(filename.to_owned()))?;

        let (ptr, log) = ErrorLog::capture(|_| unsafe { ffi::xmlParseFile(buf.as_ptr()) });
        if ptr.is_null() {
            return Err(Error::Parse(log));
        }

        Ok(unsafe { Doc::from_ptr(ptr) })
    }

    /// Creates a new document whose root element is a deep copy of `node`.
    ///
    /// Namespaces the copied subtree uses but does not declare itself are
    /// declared on the new root.
    pub fn from_node(node: &NodeRef) -> Result<Doc, Error> {
        init();

        unsafe {
            let ptr = ffi::xmlNewDoc(b"1.0\0".as_ptr());
            let ptr = Error::check_ptr_mut(ptr, "xmlNewDoc")?;

            let doc = Doc::from_ptr(ptr);

            let copy = ffi::xmlDocCopyNode(node.as_ptr(), doc.as_ptr(), 1);
            let copy = Error::check_ptr_mut(copy, "xmlDocCopyNode")?;

            ffi::xmlDocSetRootElement(doc.as_ptr(), copy);

            Ok(doc)
        }
    }
}

impl fmt::Debug for Doc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Doc").field(&self.as_ptr()).finish()
    }
}

impl FromStr for Doc {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Doc::parse(s)
    }
}

impl DocRef {
    pub fn root(&self) -> Result<&NodeRef, Error> {
        unsafe {
            let ptr = ffi::xmlDocGetRootElement(self.as_ptr());
            let ptr = Error::check_ptr_mut(ptr, "xmlDocGetRootElement")?;

            let node = NodeRef::from_ptr(ptr);

            Ok(node)
        }
    }

    /// Runs `f` with a document in which `node` is the root element.
    ///
    /// Validation engines always work on whole documents, so a node deeper
    /// in the tree is copied into a standalone document first.
    pub(crate) fn with_subtree<F, T>(node: &NodeRef, f: F) -> Result<T, Error>
    where
        F: FnOnce(&DocRef) -> Result<T, Error>,
    {
        let doc = node.doc()?;

        match doc.root() {
            Ok(root) if root == node => f(doc),
            _ => {
                let copy = Doc::from_node(node)?;

                f(&copy)
            }
        }
    }
}
