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
    /// A compiled W3C XML Schema.
    pub unsafe type Schema: Send {
        type CType = ffi::xmlSchema;
        fn drop = ffi::xmlSchemaFree;
    }
}

impl Schema {
    pub fn from_file<P: AsRef<Path>>(filename: P) -> Result<Schema, Error> {
        let filename = filename.as_ref();

        let buf = filename
            .to_str()
            .ok_or_else(|| Error::InvalidFilepath(filename.to_owned()))?;
        let buf = CString::new(buf).map_err(|_| Error::InvalidFilepath(filename.to_owned()))?;

        parse(|| unsafe { ffi::xmlSchemaNewParserCtxt(buf.as_ptr()) })
    }

    /// Compiles a schema from an already parsed schema document.
    pub fn from_doc(doc: &DocRef) -> Result<Schema, Error> {
        parse(|| unsafe { ffi::xmlSchemaNewDocParserCtxt(doc.as_ptr()) })
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Schema").field(&self.as_ptr()).finish()
    }
}

impl FromStr for Schema {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = c_int::try_from(s.len()).map_err(|_| Error::InputTooLarge(s.len()))?;

        parse(|| unsafe { ffi::xmlSchemaNewMemParserCtxt(s.as_ptr() as *const c_char, len) })
    }
}

impl SchemaRef {
    /// Validates the subtree rooted at `node` against this schema.
    pub fn validate(&self, node: &NodeRef) -> Result<(), Error> {
        DocRef::with_subtree(node, |doc| {
            let (ret, log) = ErrorLog::capture(|log| unsafe {
                let ctxt = ffi::xmlSchemaNewValidCtxt(self.as_ptr());
                if ctxt.is_null() {
                    return -1;
                }

                ffi::xmlSchemaSetValidStructuredErrors(ctxt, Some(collect_error), log);

                let ret = ffi::xmlSchemaValidateDoc(ctxt, doc.as_ptr());
                ffi::xmlSchemaFreeValidCtxt(ctxt);

                ret
            });

            match ret {
                0 => Ok(()),
                x if x > 0 => Err(Error::Invalid {
                    kind: SchemaKind::XmlSchema,
                    log,
                }),
                _ => Err(Error::ValidationFailed {
                    kind: SchemaKind::XmlSchema,
                    log,
                }),
            }
        })
    }
}

fn parse<F>(new_ctxt: F) -> Result<Schema, Error>
where
    F: FnOnce() -> *mut ffi::xmlSchemaParserCtxt,
{
    init();

    let _guard = schema_parser_lock();
    let (ptr, log) = ErrorLog::capture(|log| unsafe {
        let ctxt = new_ctxt();
        if ctxt.is_null() {
            return null_mut();
        }

        ffi::xmlSchemaSetParserStructuredErrors(ctxt, Some(collect_error), log);

        let schema = ffi::xmlSchemaParse(ctxt);
        ffi::xmlSchemaFreeParserCtxt(ctxt);

        schema
    });

    if ptr.is_null() {
        debug!("Unable to compile XML Schema: {}", &log);

        return Err(Error::SchemaParse {
            kind: SchemaKind::XmlSchema,
            log,
        });
    }

    debug!("Compiled XML Schema");

    for entry in log.warnings() {
        warn!("{}", entry);
    }

    Ok(unsafe { Schema::from_ptr(ptr) })
}
