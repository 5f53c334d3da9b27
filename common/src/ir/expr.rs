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

//! Scalar expression tree (spec §3).

use serde::{Deserialize, Serialize};

/// Declared output type of an expression. Carried through rewrites so that
/// re-serialization stays valid; rules never interpret these values beyond
/// preserving them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarType {
    Bool,
    I32,
    I64,
    Fp64,
    Utf8,
    Unknown,
}

/// A typed scalar literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Bool(bool),
    I32(i32),
    I64(i64),
    /// `f64` does not implement `Eq`; `PartialEq` is enough for rule logic
    /// (no literal ever needs to be a `HashSet`/`HashMap` key).
    Fp64(f64),
    Utf8(String),
    Null(ScalarType),
}

/// A scalar expression over one row's fields.
///
/// `Field(i)` is a direct struct-field reference by non-negative index —
/// the model deliberately flattens away Substrait's indirect/nested
/// reference segments, since those are the "unanalyzable" case every rule
/// in this crate treats as a pruning/pushdown blocker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarExpr {
    Field(usize),
    Literal(Literal),
    ScalarFunction {
        anchor: i32,
        args: Vec<ScalarExpr>,
        output_type: ScalarType,
    },
    Cast {
        input: Box<ScalarExpr>,
        output_type: ScalarType,
    },
    IfThen {
        clauses: Vec<(ScalarExpr, ScalarExpr)>,
        else_: Box<ScalarExpr>,
    },
}
