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

mod env;
mod find_libxml;

use std::collections::HashSet;
use std::env::var;
use std::path::Path;

use find_libxml::{find_libxml, Libxml};

use env::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkMode {
    Static,
    Dynamic,
}

fn main() {
    let target = var("TARGET").unwrap();

    println!("target={}", &target);

    match find_libxml(&target) {
        Libxml::PkgConfig { include_dir } => {
            if let Some(include_dir) = include_dir {
                println!("cargo:include={}", include_dir.display());
            }
        }
        Libxml::Manual {
            lib_dir,
            include_dir,
        } => {
            println!("cargo:rustc-link-search=native={}", lib_dir.display());
            println!("cargo:include={}", include_dir.display());

            link_manual(&target, &lib_dir);
        }
    }
}

fn link_manual(target: &str, lib_dir: &Path) {
    let libs = env("LIBXML_LIBS")
        .and_then(|s| s.into_string().ok())
        .map(|s| s.split(':').map(ToOwned::to_owned).collect::<Vec<_>>())
        .unwrap_or_else(|| vec!["xml2".to_owned()]);

    let mode = link_mode(target, lib_dir, &libs);

    for lib in &libs {
        match (mode, dylib_name(target, lib)) {
            (LinkMode::Static, _) => println!("cargo:rustc-link-lib=static={}", lib),
            (LinkMode::Dynamic, Some(name)) if target.contains("windows") => println!(
                "cargo:rustc-link-lib=dylib={}:{}",
                lib,
                lib_dir.join(name).display()
            ),
            (LinkMode::Dynamic, Some(_)) => println!("cargo:rustc-link-lib=dylib={}", lib),
            (LinkMode::Dynamic, None) => {
                panic!("Unable to determine library name for target {}", target)
            }
        }
    }
}

fn link_mode(target: &str, lib_dir: &Path, libs: &[String]) -> LinkMode {
    match env("LIBXML_STATIC").as_ref().and_then(|s| s.to_str()) {
        Some("0") => return LinkMode::Dynamic,
        Some(_) => return LinkMode::Static,
        None => {}
    }

    let files = lib_dir
        .read_dir()
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .filter_map(|e| e.into_string().ok())
        .collect::<HashSet<_>>();

    let can_static = libs.iter().all(|l| files.contains(&format!("lib{}.a", l)));
    let can_dylib = libs.iter().all(|l| match dylib_name(target, l) {
        Some(name) => files.contains(&name),
        None => false,
    });

    if can_dylib {
        LinkMode::Dynamic
    } else if can_static {
        LinkMode::Static
    } else {
        panic!(
            "libxml2 libdir at `{}` does not contain the required files \
             to either statically or dynamically link libxml2",
            lib_dir.display()
        );
    }
}

fn dylib_name(target: &str, lib: &str) -> Option<String> {
    if target.contains("windows") {
        Some(format!("lib{}.dll.a", lib))
    } else if target.contains("apple") {
        Some(format!("lib{}.dylib", lib))
    } else if target.contains("linux") {
        Some(format!("lib{}.so", lib))
    } else {
        None
    }
}
