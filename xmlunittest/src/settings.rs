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

use std::env::var;

pub const DEFAULT_PARTIAL_TAG: &str = "partialTest";
pub const DEFAULT_NS_PREFIX: &str = "ns";

pub const ENV_PARTIAL_TAG: &str = "XMLUNITTEST_PARTIAL_TAG";
pub const ENV_NS_PREFIX: &str = "XMLUNITTEST_NS_PREFIX";

/// Tunables shared by all assertions of a test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Tag of the element partial documents are wrapped in.
    pub default_partial_tag: String,

    /// Prefix the default (unprefixed) namespace is bound to inside XPath
    /// expressions.
    pub default_ns_prefix: String,
}

impl Settings {
    /// Default settings, overridden by the `XMLUNITTEST_PARTIAL_TAG` and
    /// `XMLUNITTEST_NS_PREFIX` environment variables if they are set.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Some(tag) = non_empty_var(ENV_PARTIAL_TAG) {
            settings.default_partial_tag = tag;
        }

        if let Some(prefix) = non_empty_var(ENV_NS_PREFIX) {
            settings.default_ns_prefix = prefix;
        }

        settings
    }

    pub fn with_partial_tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.default_partial_tag = tag.into();

        self
    }

    pub fn with_default_ns_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.default_ns_prefix = prefix.into();

        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_partial_tag: DEFAULT_PARTIAL_TAG.into(),
            default_ns_prefix: DEFAULT_NS_PREFIX.into(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    match var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}
