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

use libxml::{Doc, NodeRef};

use super::{
    checks, DtdSource, Expected, Failure, NodeExpectation, RelaxNgSource, Settings, XSchemaSource,
};

lazy_static! {
    static ref SETTINGS: Settings = Settings::from_env();
}

/// XML assertions for test fixtures.
///
/// All methods are provided. Implementors may override [`settings`] to
/// change the defaults and [`fail`] to change how a failed assertion is
/// reported; by default it panics with the failure message, which fails
/// the running test.
///
/// [`settings`]: XmlAssert::settings
/// [`fail`]: XmlAssert::fail
pub trait XmlAssert {
    /// Settings used by the assertions. Defaults to [`Settings::from_env`].
    fn settings(&self) -> &Settings {
        &SETTINGS
    }

    fn fail(&self, failure: Failure) -> ! {
        panic!("{}", failure)
    }

    fn check<T>(&self, ret: Result<T, Failure>) -> T {
        match ret {
            Ok(value) => value,
            Err(failure) => self.fail(failure),
        }
    }

    /// Asserts `data` is a well-formed XML document and returns it.
    fn assert_xml_document<B: AsRef<[u8]>>(&self, data: B) -> Doc {
        self.check(checks::xml_document(data))
    }

    /// Asserts `data` is a well-formed XML fragment with at least one
    /// element. The fragment is wrapped in a `root_tag` element, or the
    /// default partial tag of the settings if `None`.
    fn assert_xml_partial<B: AsRef<[u8]>>(&self, data: B, root_tag: Option<&str>) -> Doc {
        let root_tag = root_tag.unwrap_or(&self.settings().default_partial_tag);

        self.check(checks::xml_partial(data, root_tag))
    }

    fn assert_xml_namespace(&self, node: &NodeRef, prefix: &str, uri: &str) {
        self.check(checks::xml_namespace(node, prefix, uri))
    }

    fn assert_xml_has_attribute(&self, node: &NodeRef, name: &str, expected: Expected<'_>) {
        self.check(checks::xml_has_attribute(node, name, expected))
    }

    fn assert_xml_node(&self, node: Option<&NodeRef>, expect: &NodeExpectation<'_>) {
        self.check(checks::xml_node(node, expect))
    }

    fn assert_xpaths_exist(&self, node: &NodeRef, xpaths: &[&str]) {
        self.assert_xpaths_exist_with_prefix(node, xpaths, &self.settings().default_ns_prefix)
    }

    fn assert_xpaths_exist_with_prefix(
        &self,
        node: &NodeRef,
        xpaths: &[&str],
        default_ns_prefix: &str,
    ) {
        self.check(checks::xpaths_exist(node, xpaths, default_ns_prefix))
    }

    fn assert_xpaths_only_one(&self, node: &NodeRef, xpaths: &[&str]) {
        self.assert_xpaths_only_one_with_prefix(node, xpaths, &self.settings().default_ns_prefix)
    }

    fn assert_xpaths_only_one_with_prefix(
        &self,
        node: &NodeRef,
        xpaths: &[&str],
        default_ns_prefix: &str,
    ) {
        self.check(checks::xpaths_only_one(node, xpaths, default_ns_prefix))
    }

    fn assert_xpaths_unique_value(&self, node: &NodeRef, xpaths: &[&str]) {
        let prefix = &self.settings().default_ns_prefix;

        self.assert_xpaths_unique_value_with_prefix(node, xpaths, prefix)
    }

    fn assert_xpaths_unique_value_with_prefix(
        &self,
        node: &NodeRef,
        xpaths: &[&str],
        default_ns_prefix: &str,
    ) {
        self.check(checks::xpaths_unique_value(node, xpaths, default_ns_prefix))
    }

    fn assert_xpath_values(&self, node: &NodeRef, xpath: &str, values: &[&str]) {
        let prefix = &self.settings().default_ns_prefix;

        self.assert_xpath_values_with_prefix(node, xpath, values, prefix)
    }

    fn assert_xpath_values_with_prefix(
        &self,
        node: &NodeRef,
        xpath: &str,
        values: &[&str],
        default_ns_prefix: &str,
    ) {
        self.check(checks::xpath_values(node, xpath, values, default_ns_prefix))
    }

    /// Asserts `node` is valid according to a DTD given as text, file path
    /// or parsed [`Dtd`](libxml::Dtd).
    fn assert_xml_valid_dtd<'a, S: Into<DtdSource<'a>>>(&self, node: &NodeRef, source: S) {
        self.check(checks::xml_valid_dtd(node, source))
    }

    fn assert_xml_valid_xschema<'a, S: Into<XSchemaSource<'a>>>(&self, node: &NodeRef, source: S) {
        self.check(checks::xml_valid_xschema(node, source))
    }

    fn assert_xml_valid_relaxng<'a, S: Into<RelaxNgSource<'a>>>(&self, node: &NodeRef, source: S) {
        self.check(checks::xml_valid_relaxng(node, source))
    }

    /// Asserts both XML outputs are equivalent. This compares serialized
    /// outputs, not documents: prefixes, attribute order and surrounding
    /// whitespace are ignored, and `expected` may contain wildcards.
    fn assert_xml_equivalent_outputs<A, B>(&self, data: A, expected: B)
    where
        A: AsRef<[u8]>,
        B: AsRef<[u8]>,
    {
        self.check(checks::xml_equivalent_outputs(data, expected))
    }
}

/// Ready to use implementation of [`XmlAssert`].
#[derive(Debug, Clone)]
pub struct XmlTestCase {
    settings: Settings,
}

impl XmlTestCase {
    /// Test case using [`Settings::from_env`].
    pub fn new() -> Self {
        Self::with_settings(Settings::from_env())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self { settings }
    }
}

impl Default for XmlTestCase {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlAssert for XmlTestCase {
    fn settings(&self) -> &Settings {
        &self.settings
    }
}
