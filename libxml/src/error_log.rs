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
use std::ptr::null_mut;

use libc::*;

/// Diagnostics reported by libxml2 while an operation was running.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorLog {
    entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: Level,
    pub domain: i32,
    pub code: i32,
    pub file: Option<String>,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    None,
    Warning,
    Error,
    Fatal,
}

impl ErrorLog {
    /// Runs `f` while every diagnostic libxml2 raises on this thread is
    /// collected into the returned log.
    ///
    /// `f` receives the context pointer expected by [`collect_error`], so
    /// it can be handed to the per-context error setters of the schema
    /// and RelaxNG engines as well.
    pub(crate) fn capture<F, T>(f: F) -> (T, Self)
    where
        F: FnOnce(*mut c_void) -> T,
    {
        let mut log = Box::new(ErrorLog::default());

        let ret = {
            let context = &mut *log as *mut ErrorLog as *mut c_void;
            let _guard = HandlerGuard::install(context);

            f(context)
        };

        if log.entries.is_empty() {
            if let Some(entry) = LogEntry::last() {
                log.entries.push(entry);
            }
        }

        (ret, *log)
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(|e| e.level == Level::Warning)
    }

    /// Last entry that is at least an error, or the last entry at all if
    /// only warnings were reported.
    pub fn last_error(&self) -> Option<&LogEntry> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.level >= Level::Error)
            .or_else(|| self.entries.last())
    }
}

impl Display for ErrorLog {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.last_error() {
            Some(entry) => entry.fmt(f),
            None => write!(f, "<no diagnostics reported>"),
        }
    }
}

impl LogEntry {
    unsafe fn from_raw(err: &ffi::xmlError) -> Self {
        let level = match err.level {
            ffi::xmlErrorLevel::XML_ERR_NONE => Level::None,
            ffi::xmlErrorLevel::XML_ERR_WARNING => Level::Warning,
            ffi::xmlErrorLevel::XML_ERR_ERROR => Level::Error,
            ffi::xmlErrorLevel::XML_ERR_FATAL => Level::Fatal,
        };

        let file = if err.file.is_null() {
            None
        } else {
            Some(CStr::from_ptr(err.file).to_string_lossy().into_owned())
        };

        let message = if err.message.is_null() {
            String::new()
        } else {
            CStr::from_ptr(err.message)
                .to_string_lossy()
                .trim_end()
                .to_owned()
        };

        Self {
            level,
            domain: err.domain as i32,
            code: err.code as i32,
            file,
            line: err.line.max(0) as usize,
            column: err.int2.max(0) as usize,
            message,
        }
    }

    fn last() -> Option<Self> {
        unsafe {
            let err = ffi::xmlGetLastError();
            if err.is_null() || (*err).code == 0 {
                return None;
            }

            Some(Self::from_raw(&*err))
        }
    }
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let level = match self.level {
            Level::None => "NONE",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        };

        write!(
            f,
            "{}:{}:{}:{}: {}",
            self.file.as_deref().unwrap_or("<string>"),
            self.line,
            self.column,
            level,
            self.message
        )
    }
}

/// Handler that was installed on this thread before the capture started.
struct HandlerGuard {
    handler: ffi::xmlStructuredErrorFunc,
    context: *mut c_void,
}

impl HandlerGuard {
    fn install(context: *mut c_void) -> Self {
        unsafe {
            let guard = Self::current();

            ffi::xmlResetLastError();
            ffi::xmlSetStructuredErrorFunc(context, Some(collect_error));

            guard
        }
    }

    unsafe fn current() -> Self {
        let handler = ffi::__xmlStructuredError();
        let context = ffi::__xmlStructuredErrorContext();

        Self {
            handler: if handler.is_null() { None } else { *handler },
            context: if context.is_null() {
                null_mut()
            } else {
                *context
            },
        }
    }
}

impl Drop for HandlerGuard {
    fn drop(&mut self) {
        unsafe {
            ffi::xmlSetStructuredErrorFunc(self.context, self.handler);
        }
    }
}

pub(crate) extern "C" fn collect_error(context: *mut c_void, error: *const ffi::xmlError) {
    if context.is_null() || error.is_null() {
        return;
    }

    unsafe {
        let log = &mut *(context as *mut ErrorLog);
        log.entries.push(LogEntry::from_raw(&*error));
    }
}
