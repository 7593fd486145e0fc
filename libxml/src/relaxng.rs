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
use std::ptr::null_mut;
use std::str::FromStr;

use foreign_types::{foreign_type, ForeignType, ForeignTypeRef};
use libc::*;
use log::{debug, warn};

use super::{
    error_log::collect_error, init, schema_parser_lock, DocRef, Error, ErrorLog, NodeRef,
    SchemaKind,
};

foreign_type! {
    /// A compiled RelaxNG schema.
    pub unsafe type RelaxNg: Send {
        type CType = ffi::xmlRelaxNG;
        fn drop = ffi::xmlRelaxNGFree;
    }
}

impl RelaxNg {
    pub fn from_file<P: AsRef<Path>>(filename: P) -> Result<RelaxNg, Error> {
        let filename = filename.as_ref();

        let buf = filename
            .to_str()
            .ok_or_else(|| Error::InvalidFilepath(filename.to_owned()))?;
        let buf = CString::new(buf).map_err(|_| Error::InvalidFilepath(filename.to_owned()))?;

        parse(|| unsafe { ffi::xmlRelaxNGNewParserCtxt(buf.as_ptr()) })
    }

    /// Compiles a schema from an already parsed schema document.
    pub fn from_doc(doc: &DocRef) -> Result<RelaxNg, Error> {
        parse(|| unsafe { ffi::xmlRelaxNGNewDocParserCtxt(doc.as_ptr()) })
    }
}

impl fmt::Debug for RelaxNg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RelaxNg").field(&self.as_ptr()).finish()
    }
}

impl FromStr for RelaxNg {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = c_int::try_from(s.len()).map_err(|_| Error::InputTooLarge(s.len()))?;

        parse(|| unsafe { ffi::xmlRelaxNGNewMemParserCtxt(s.as_ptr() as *const c_char, len) })
    }
}

impl RelaxNgRef {
    /// Validates the subtree rooted at `node` against this schema.
    pub fn validate(&self, node: &NodeRef) -> Result<(), Error> {
        DocRef::with_subtree(node, |doc| {
            let (ret, log) = ErrorLog::capture(|log| unsafe {
                let ctxt = ffi::xmlRelaxNGNewValidCtxt(self.as_ptr());
                if ctxt.is_null() {
                    return -1;
                }

                ffi::xmlRelaxNGSetValidStructuredErrors(ctxt, Some(collect_error), log);

                let ret = ffi::xmlRelaxNGValidateDoc(ctxt, doc.as_ptr());
                ffi::xmlRelaxNGFreeValidCtxt(ctxt);

                ret
            });

            match ret {
                0 => Ok(()),
                x if x > 0 => Err(Error::Invalid {
                    kind: SchemaKind::RelaxNg,
                    log,
                }),
                _ => Err(Error::ValidationFailed {
                    kind: SchemaKind::RelaxNg,
                    log,
                }),
            }
        })
    }
}

fn parse<F>(new_ctxt: F) -> Result<RelaxNg, Error>
where
    F: FnOnce() -> *mut ffi::xmlRelaxNGParserCtxt,
{
    init();

    let _guard = schema_parser_lock();
    let (ptr, log) = ErrorLog::capture(|log| unsafe {
        let ctxt = new_ctxt();
        if ctxt.is_null() {
            return null_mut();
        }

        ffi::xmlRelaxNGSetParserStructuredErrors(ctxt, Some(collect_error), log);

        let schema = ffi::xmlRelaxNGParse(ctxt);
        ffi::xmlRelaxNGFreeParserCtxt(ctxt);

        schema
    });

    if ptr.is_null() {
        debug!("Unable to compile RelaxNG schema: {}", &log);

        return Err(Error::SchemaParse {
            kind: SchemaKind::RelaxNg,
            log,
        });
    }

    debug!("Compiled RelaxNG schema");

    for entry in log.warnings() {
        warn!("{}", entry);
    }

    Ok(unsafe { RelaxNg::from_ptr(ptr) })
}
