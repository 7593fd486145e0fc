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

extern crate libxml_sys as ffi;

use std::sync::{Mutex, MutexGuard, PoisonError};

#[macro_use]
extern crate lazy_static;

mod doc;
mod dtd;
mod error;
mod error_log;
mod io;
mod namespace;
mod node;
mod relaxng;
mod schema;
mod xpath;

pub use doc::*;
pub use dtd::*;
pub use error::*;
pub use error_log::*;
pub use io::*;
pub use namespace::*;
pub use node::*;
pub use relaxng::*;
pub use schema::*;
pub use xpath::*;

pub use ffi::xmlElementType as ElementType;

lazy_static! {
    static ref PARSER: () = unsafe { ffi::xmlInitParser() };
    static ref SCHEMA_PARSER: Mutex<()> = Mutex::new(());
}

/// libxml2 has to be initialized once before it is used from several threads.
pub(crate) fn init() {
    lazy_static::initialize(&PARSER);
}

/// Serializes XML Schema and RelaxNG compilation. libxml2's schema parsers are
/// not thread safe, validating against a compiled schema is.
pub(crate) fn schema_parser_lock() -> MutexGuard<'static, ()> {
    SCHEMA_PARSER.lock().unwrap_or_else(PoisonError::into_inner)
}
