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

use std::path::{Path, PathBuf};
use std::str::FromStr;

use libxml::{Doc, DocRef, Dtd, DtdRef, Error, NodeRef, RelaxNg, RelaxNgRef, Schema, SchemaRef};
use log::debug;

/// DTD to validate against: inline text, a file or an already parsed DTD.
#[derive(Clone, Copy)]
pub enum DtdSource<'a> {
    Text(&'a str),
    File(&'a Path),
    Dtd(&'a DtdRef),
}

/// XML Schema to validate against.
#[derive(Clone, Copy)]
pub enum XSchemaSource<'a> {
    Text(&'a str),
    File(&'a Path),
    Document(&'a DocRef),
    Schema(&'a SchemaRef),
}

/// RelaxNG schema to validate against.
#[derive(Clone, Copy)]
pub enum RelaxNgSource<'a> {
    Text(&'a str),
    File(&'a Path),
    Document(&'a DocRef),
    RelaxNg(&'a RelaxNgRef),
}

impl DtdSource<'_> {
    pub(crate) fn validate(self, node: &NodeRef) -> Result<(), Error> {
        match self {
            Self::Text(text) => Dtd::from_str(text)?.validate(node),
            Self::File(path) => {
                debug!("Load DTD from {}", path.display());

                Dtd::from_file(path)?.validate(node)
            }
            Self::Dtd(dtd) => dtd.validate(node),
        }
    }
}

impl XSchemaSource<'_> {
    pub(crate) fn validate(self, node: &NodeRef) -> Result<(), Error> {
        match self {
            Self::Text(text) => Schema::from_str(text)?.validate(node),
            Self::File(path) => {
                debug!("Load XML Schema from {}", path.display());

                Schema::from_file(path)?.validate(node)
            }
            Self::Document(doc) => Schema::from_doc(doc)?.validate(node),
            Self::Schema(schema) => schema.validate(node),
        }
    }
}

impl RelaxNgSource<'_> {
    pub(crate) fn validate(self, node: &NodeRef) -> Result<(), Error> {
        match self {
            Self::Text(text) => RelaxNg::from_str(text)?.validate(node),
            Self::File(path) => {
                debug!("Load RelaxNG schema from {}", path.display());

                RelaxNg::from_file(path)?.validate(node)
            }
            Self::Document(doc) => RelaxNg::from_doc(doc)?.validate(node),
            Self::RelaxNg(relaxng) => relaxng.validate(node),
        }
    }
}

macro_rules! impl_from {
    ($source:ident, $handle:ident, $handle_ref:ident) => {
        impl<'a> From<&'a str> for $source<'a> {
            fn from(text: &'a str) -> Self {
                Self::Text(text)
            }
        }

        impl<'a> From<&'a String> for $source<'a> {
            fn from(text: &'a String) -> Self {
                Self::Text(text)
            }
        }

        impl<'a> From<&'a Path> for $source<'a> {
            fn from(path: &'a Path) -> Self {
                Self::File(path)
            }
        }

        impl<'a> From<&'a PathBuf> for $source<'a> {
            fn from(path: &'a PathBuf) -> Self {
                Self::File(path)
            }
        }

        impl<'a> From<&'a $handle_ref> for $source<'a> {
            fn from(handle: &'a $handle_ref) -> Self {
                Self::$handle(handle)
            }
        }

        impl<'a> From<&'a $handle> for $source<'a> {
            fn from(handle: &'a $handle) -> Self {
                Self::$handle(handle)
            }
        }
    };
}

impl_from!(DtdSource, Dtd, DtdRef);
impl_from!(XSchemaSource, Schema, SchemaRef);
impl_from!(RelaxNgSource, RelaxNg, RelaxNgRef);

macro_rules! impl_from_doc {
    ($source:ident) => {
        impl<'a> From<&'a DocRef> for $source<'a> {
            fn from(doc: &'a DocRef) -> Self {
                Self::Document(doc)
            }
        }

        impl<'a> From<&'a Doc> for $source<'a> {
            fn from(doc: &'a Doc) -> Self {
                Self::Document(doc)
            }
        }
    };
}

impl_from_doc!(XSchemaSource);
impl_from_doc!(RelaxNgSource);
