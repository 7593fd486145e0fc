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
use std::ptr::{null, null_mut};
use std::str::FromStr;

use foreign_types::{foreign_type, ForeignType, ForeignTypeRef};
use libc::*;
use log::{debug, warn};

use super::{init, DocRef, Error, ErrorLog, NodeRef, SchemaKind};

foreign_type! {
    pub unsafe type Dtd: Send {
        type CType = ffi::xmlDtd;
        fn drop = ffi::xmlFreeDtd;
    }
}

impl Dtd {
    pub fn from_file<P: AsRef<Path>>(filename: P) -> Result<Dtd, Error> {
        init();

        let filename = filename.as_ref();

        let buf = filename
            .to_str()
            .ok_or_else(|| Error::InvalidFilepath(filename.to_owned()))?;
        let buf = CString::new(buf).map_err(|_| Error::InvalidFilepath(filename.to_owned()))?;

        let (ptr, log) = ErrorLog::capture(|_| unsafe {
            ffi::xmlParseDTD(null(), buf.as_ptr() as *const ffi::xmlChar)
        });

        Self::check(ptr, log)
    }

    fn check(ptr: *mut ffi::xmlDtd, log: ErrorLog) -> Result<Dtd, Error> {
        if ptr.is_null() {
            debug!("Unable to parse DTD: {}", &log);

            return Err(Error::SchemaParse {
                kind: SchemaKind::Dtd,
                log,
            });
        }

        debug!("Parsed DTD");

        for entry in log.warnings() {
            warn!("{}", entry);
        }

        Ok(unsafe { Dtd::from_ptr(ptr) })
    }
}

impl fmt::Debug for Dtd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Dtd").field(&self.as_ptr()).finish()
    }
}

impl FromStr for Dtd {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        init();

        let len = c_int::try_from(s.len()).map_err(|_| Error::InputTooLarge(s.len()))?;

        let (ptr, log) = ErrorLog::capture(|_| unsafe {
            let input = ffi::xmlParserInputBufferCreateMem(
                s.as_ptr() as *const c_char,
                len,
                ffi::XML_CHAR_ENCODING_NONE,
            );
            if input.is_null() {
                return null_mut();
            }

            /* the input buffer is consumed by the parser, even on failure */
            ffi::xmlIOParseDTD(null_mut(), input, ffi::XML_CHAR_ENCODING_NONE)
        });

        Self::check(ptr, log)
    }
}

impl DtdRef {
    /// Validates the subtree rooted at `node` against this DTD.
    pub fn validate(&self, node: &NodeRef) -> Result<(), Error> {
        DocRef::with_subtree(node, |doc| {
            let (ret, log) = ErrorLog::capture(|_| unsafe {
                let ctxt = ffi::xmlNewValidCtxt();
                if ctxt.is_null() {
                    return -1;
                }

                let ret = ffi::xmlValidateDtd(ctxt, doc.as_ptr(), self.as_ptr());
                ffi::xmlFreeValidCtxt(ctxt);

                ret
            });

            match ret {
                1 => Ok(()),
                0 => Err(Error::Invalid {
                    kind: SchemaKind::Dtd,
                    log,
                }),
                _ => Err(Error::ValidationFailed {
                    kind: SchemaKind::Dtd,
                    log,
                }),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::super::Doc;

    const DTD: &str = r#"<!ELEMENT root (child)>
        <!ELEMENT child EMPTY>
        <!ATTLIST child id ID #REQUIRED>
        "#;

    #[test]
    fn validate_document() {
        let dtd = Dtd::from_str(DTD).unwrap();

        let doc = Doc::from_str(r#"<root><child id="child1"/></root>"#).unwrap();
        dtd.validate(doc.root().unwrap()).unwrap();

        let doc = Doc::from_str(r#"<root><child id="child1"/><child id="child2"/></root>"#)
            .unwrap();
        match dtd.validate(doc.root().unwrap()) {
            Err(Error::Invalid { kind, log }) => {
                assert_eq!(kind, SchemaKind::Dtd);
                assert!(!log.is_empty());
            }
            ret => panic!("Unexpected result: {:?}", ret),
        }
    }

    #[test]
    fn validate_subtree() {
        let dtd = Dtd::from_str("<!ELEMENT child EMPTY>").unwrap();

        let doc = Doc::from_str("<root><child/></root>").unwrap();
        let child = doc.root().unwrap().first_child_element().unwrap();

        dtd.validate(child).unwrap();
    }

    #[test]
    fn invalid_dtd() {
        assert!(matches!(
            Dtd::from_str("<!ELEMENT root (child"),
            Err(Error::SchemaParse {
                kind: SchemaKind::Dtd,
                ..
            })
        ));
    }
}
