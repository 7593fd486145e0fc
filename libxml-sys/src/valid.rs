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

use super::{xmlChar, xmlDoc};

pub enum xmlDtd {}
pub enum xmlValidCtxt {}
pub enum xmlParserInputBuffer {}
pub enum xmlSAXHandler {}

pub type xmlCharEncoding = c_int;

pub const XML_CHAR_ENCODING_NONE: xmlCharEncoding = 0;

#[link(name = "xml2")]
extern "C" {
    pub fn xmlParseDTD(external_id: *const xmlChar, system_id: *const xmlChar) -> *mut xmlDtd;
    pub fn xmlIOParseDTD(
        sax: *mut xmlSAXHandler,
        input: *mut xmlParserInputBuffer,
        enc: xmlCharEncoding,
    ) -> *mut xmlDtd;
    pub fn xmlFreeDtd(dtd: *mut xmlDtd);

    pub fn xmlParserInputBufferCreateMem(
        mem: *const c_char,
        size: c_int,
        enc: xmlCharEncoding,
    ) -> *mut xmlParserInputBuffer;

    pub fn xmlNewValidCtxt() -> *mut xmlValidCtxt;
    pub fn xmlFreeValidCtxt(ctxt: *mut xmlValidCtxt);
    pub fn xmlValidateDtd(ctxt: *mut xmlValidCtxt, doc: *mut xmlDoc, dtd: *mut xmlDtd) -> c_int;
}
