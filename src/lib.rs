// Copyright 2026 os-detect contributors
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

//! Detects the operating system and CPU architecture of the running
//! machine and derives a normalized classifier string (e.g.
//! `linux-x86_64`) suitable for selecting platform-specific artifacts.

pub mod arch;
pub mod detector;
pub mod error;
pub mod logging;
pub mod os;
pub mod provider;
pub mod release;
