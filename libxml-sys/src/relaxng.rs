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

use libc::*;

use super::{xmlDoc, xmlStructuredErrorFunc};

pub enum xmlRelaxNG {}
pub enum xmlRelaxNGParserCtxt {}
pub enum xmlRelaxNGValidCtxt {}

#[link(name = "xml2")]
extern "C" {
    pub fn xmlRelaxNGNewParserCtxt(url: *const c_char) -> *mut xmlRelaxNGParserCtxt;
    pub fn xmlRelaxNGNewMemParserCtxt(
        buffer: *const c_char,
        size: c_int,
    ) -> *mut xmlRelaxNGParserCtxt;
    pub fn xmlRelaxNGNewDocParserCtxt(doc: *mut xmlDoc) -> *mut xmlRelaxNGParserCtxt;
    pub fn xmlRelaxNGFreeParserCtxt(ctxt: *mut xmlRelaxNGParserCtxt);
    pub fn xmlRelaxNGSetParserStructuredErrors(
        ctxt: *mut xmlRelaxNGParserCtxt,
        serror: xmlStructuredErrorFunc,
        ctx: *mut c_void,
    );

    pub fn xmlRelaxNGParse(ctxt: *mut xmlRelaxNGParserCtxt) -> *mut xmlRelaxNG;
    pub fn xmlRelaxNGFree(schema: *mut xmlRelaxNG);

    pub fn xmlRelaxNGNewValidCtxt(schema: *mut xmlRelaxNG) -> *mut xmlRelaxNGValidCtxt;
    pub fn xmlRelaxNGFreeValidCtxt(ctxt: *mut xmlRelaxNGValidCtxt);
    pub fn xmlRelaxNGSetValidStructuredErrors(
        ctxt: *mut xmlRelaxNGValidCtxt,
        serror: xmlStructuredErrorFunc,
        ctx: *mut c_void,
    );
    pub fn xmlRelaxNGValidateDoc(ctxt: *mut xmlRelaxNGValidCtxt, doc: *mut xmlDoc) -> c_int;
}
