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

//! # Strata Agents
//!
//! Stateful controllers that own disassembly state and drive the lanes from
//! commands and per-frame ticks.

#![warn(missing_docs)]

pub mod config;
pub mod disassembly_agent;
pub mod error;
pub mod input;

pub use config::DisassemblyConfig;
pub use disassembly_agent::{DisassemblyAgent, DisassemblyStatus};
pub use error::ConfigError;
pub use input::{DisassemblyCommand, KeyBindings};
