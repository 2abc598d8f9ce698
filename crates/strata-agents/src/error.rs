// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for disassembly configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, saving or validating a [`DisassemblyConfig`](crate::DisassemblyConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The RON text is malformed or does not match the config layout.
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The config could not be written as RON.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),

    /// A field holds a value outside its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}
