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

use std::env::{var, var_os};
use std::ffi::OsString;

pub fn env(name: &str) -> Option<OsString> {
    let prefix = var("TARGET").unwrap().to_uppercase().replace('-', "_");
    let prefixed = format!("{}_{}", prefix, name);

    println!("cargo:rerun-if-env-changed={}", prefixed);
    if let Some(value) = var_os(&prefixed) {
        return Some(value);
    }

    println!("cargo:rerun-if-env-changed={}", name);
    var_os(name)
}
