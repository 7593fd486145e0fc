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

#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]
#![allow(clippy::upper_case_acronyms)]

mod error;
mod io;
mod parser;
mod relaxng;
mod schemas;
mod tree;
mod valid;
mod xpath;

pub use error::*;
pub use io::*;
pub use parser::*;
pub use relaxng::*;
pub use schemas::*;
pub use tree::*;
pub use valid::*;
pub use xpath::*;

pub type xmlChar = u8;
