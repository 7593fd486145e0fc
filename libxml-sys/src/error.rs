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

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct xmlError {
    pub domain: c_int,
    pub code: c_int,
    pub message: *mut c_char,
    pub level: xmlErrorLevel,
    pub file: *mut c_char,
    pub line: c_int,
    pub str1: *mut c_char,
    pub str2: *mut c_char,
    pub str3: *mut c_char,
    pub int1: c_int,
    pub int2: c_int,
    pub ctxt: *mut c_void,
    pub node: *mut c_void,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum xmlErrorLevel {
    XML_ERR_NONE = 0,
    XML_ERR_WARNING = 1,
    XML_ERR_ERROR = 2,
    XML_ERR_FATAL = 3,
}

pub type xmlStructuredErrorFunc = Option<extern "C" fn(*mut c_void, *const xmlError)>;

#[link(name = "xml2")]
extern "C" {
    pub fn xmlGetLastError() -> *mut xmlError;
    pub fn xmlResetLastError();
    pub fn xmlSetStructuredErrorFunc(ctx: *mut c_void, handler: xmlStructuredErrorFunc);

    /* thread local handler state read back by xmlSetStructuredErrorFunc callers */
    pub fn __xmlStructuredError() -> *mut xmlStructuredErrorFunc;
    pub fn __xmlStructuredErrorContext() -> *mut *mut c_void;
}
