// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The error type shared by every crate in this workspace.
//!
//! A rule that cannot analyze part of an expression never returns an error —
//! it degrades to "not applicable" (`Ok(None)`). `RewriteError` is reserved
//! for driver/host-level failures: malformed wire bytes and invariant
//! violations caught at a serialization boundary.

use std::fmt;

/// Errors produced by the rewrite core and its host-facing boundary.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    /// The plan codec failed to decode or encode a byte string.
    #[error("failed to decode plan: {0}")]
    Codec(String),

    /// A rule needed a function anchor (e.g. for `and`) that does not exist
    /// in the plan's extension table.
    #[error("no extension-table entry for function anchor {0}")]
    MissingExtension(i32),

    /// An IR invariant (§3) was violated; this indicates a bug in a rule,
    /// caught at the next serialization boundary rather than locally.
    #[error("internal invariant violation: {0}")]
    Internal(String),
}

impl RewriteError {
    pub fn internal(msg: impl Into<String>) -> Self {
        RewriteError::Internal(msg.into())
    }
}

impl fmt::Display for RuleGroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The rule-group component contract (spec §6) returns `bytes OR
/// error_string` rather than a typed error — this is the string side of
/// that boundary, produced from a `RewriteError` at the host edge.
#[derive(Debug, Clone)]
pub struct RuleGroupError(pub String);

impl From<RewriteError> for RuleGroupError {
    fn from(e: RewriteError) -> Self {
        RuleGroupError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RewriteError>;
