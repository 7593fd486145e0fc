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

//! XML aware assertions for unit tests.
//!
//! The assertions are provided by the [`XmlAssert`] trait. Implement it for
//! your own fixture type or use the ready-made [`XmlTestCase`]:
//!
//! ```no_run
//! use xmlunittest::{XmlAssert, XmlTestCase};
//!
//! let test = XmlTestCase::new();
//!
//! let doc = test.assert_xml_document(b"<root><child att=\"1\"/></root>");
//! let root = doc.root().unwrap();
//!
//! test.assert_xpaths_exist(root, &["./child", "./child/@att"]);
//! test.assert_xpath_values(root, "./child/@att", &["1", "2"]);
//! ```
//!
//! Every assertion is also available as a free function in [`checks`]
//! that returns the [`Failure`] instead of failing the test.

#[macro_use]
extern crate lazy_static;

mod assert;
pub mod checker;
pub mod checks;
mod failure;
mod query;
mod settings;
mod sources;

pub use assert::{XmlAssert, XmlTestCase};
pub use checker::Difference;
pub use checks::{Expected, NodeExpectation};
pub use failure::Failure;
pub use settings::Settings;
pub use sources::{DtdSource, RelaxNgSource, XSchemaSource};

pub use libxml::{Doc, DocRef, Dtd, NodeRef, RelaxNg, Schema};
