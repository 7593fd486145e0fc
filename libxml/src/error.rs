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

use std::ffi::CStr;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::Utf8Error;

use libc::*;
use thiserror::Error;

use super::{ErrorLog, LogEntry};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error ({code}) in {file}:{line} - {msg}")]
    XmlError {
        code: usize,
        file: String,
        line: usize,
        msg: String,
    },

    #[error("Object returned by libxml was null: {0}!")]
    NullPointer(String),

    #[error("UTF-8 Error: {0}")]
    Utf8Error(Utf8Error),

    #[error("Input is too large to be passed to libxml ({0} bytes)!")]
    InputTooLarge(usize),

    #[error("Input contains a nul byte: {0:?}!")]
    NulByte(String),

    #[error("Unable to parse document: {0}")]
    Parse(ErrorLog),

    #[error("Invalid XPath {xpath:?}: {log}")]
    InvalidXPath { xpath: String, log: ErrorLog },

    #[error("Unable to evaluate XPath {xpath:?}: {log}")]
    XPath { xpath: String, log: ErrorLog },

    #[error("Unsupported XPath result type: {0:?}!")]
    UnsupportedXPathResult(ffi::xmlXPathObjectType),

    #[error("Unable to parse {kind}: {log}")]
    SchemaParse { kind: SchemaKind, log: ErrorLog },

    #[error("Document is not valid according to the {kind}: {log}")]
    Invalid { kind: SchemaKind, log: ErrorLog },

    #[error("Internal error while validating against the {kind}: {log}")]
    ValidationFailed { kind: SchemaKind, log: ErrorLog },

    #[error("Invalid Filepath: {0}!")]
    InvalidFilepath(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Dtd,
    XmlSchema,
    RelaxNg,
}

impl Error {
    pub fn check_ptr<T, S>(ptr: *const T, context: S) -> Result<*const T, Self>
    where
        S: Into<String>,
    {
        if !ptr.is_null() {
            Ok(ptr)
        } else {
            Err(Self::last_error(Self::NullPointer(context.into())))
        }
    }

    pub fn check_ptr_mut<T, S>(ptr: *mut T, context: S) -> Result<*mut T, Self>
    where
        S: Into<String>,
    {
        if !ptr.is_null() {
            Ok(ptr)
        } else {
            Err(Self::last_error(Self::NullPointer(context.into())))
        }
    }

    pub fn last_error(default: Self) -> Self {
        unsafe {
            let err = ffi::xmlGetLastError();
            if err.is_null() {
                return default;
            }

            let err = &*err;
            let code = err.code as usize;
            let file = cstr_to_string(err.file, "<unknown>");
            let line = err.line as usize;
            let msg = cstr_to_string(err.message, "<unknown>");

            Self::XmlError {
                code,
                file,
                line,
                msg,
            }
        }
    }

    /// Diagnostics attached to this error, if libxml2 reported any.
    pub fn log(&self) -> Option<&ErrorLog> {
        match self {
            Self::Parse(log)
            | Self::InvalidXPath { log, .. }
            | Self::XPath { log, .. }
            | Self::SchemaParse { log, .. }
            | Self::Invalid { log, .. }
            | Self::ValidationFailed { log, .. } => Some(log),
            _ => None,
        }
    }

    /// The diagnostic that best describes this error.
    pub fn last_log_entry(&self) -> Option<&LogEntry> {
        self.log().and_then(ErrorLog::last_error)
    }
}

impl From<Utf8Error> for Error {
    fn from(err: Utf8Error) -> Self {
        Self::Utf8Error(err)
    }
}

impl Display for SchemaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Dtd => write!(f, "DTD"),
            Self::XmlSchema => write!(f, "XML Schema"),
            Self::RelaxNg => write!(f, "RelaxNG"),
        }
    }
}

fn cstr_to_string(ptr: *const c_char, default: &str) -> String {
    if ptr.is_null() {
        return default.to_owned();
    }

    match unsafe { CStr::from_ptr(ptr) }.to_str() {
        Ok(s) => s.to_owned(),
        Err(_) => default.to_owned(),
    }
}
