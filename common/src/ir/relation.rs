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

//! The relational operator tree (spec §3).

use serde::{Deserialize, Serialize};

use super::expr::{ScalarExpr, ScalarType};

/// Join variants, including the semi/anti/single/mark forms Substrait
/// distinguishes for subquery decorrelation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Outer,
    LeftSemi,
    RightSemi,
    LeftAnti,
    RightAnti,
    LeftSingle,
    RightSingle,
    LeftMark,
    RightMark,
    Unspecified,
}

/// Set-operation variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOp {
    UnionAll,
    UnionDistinct,
    Intersection,
    Minus,
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Output-position -> pre-emit-field-index mapping. When present on a
/// relation's `common`, it replaces the natural arity with its length and
/// permutes/subsets outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emit(pub Vec<usize>);

impl Emit {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Fields shared by every relation variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Common {
    pub emit: Option<Emit>,
}

impl Common {
    pub fn none() -> Self {
        Common { emit: None }
    }

    pub fn with_emit(mapping: Vec<usize>) -> Self {
        Common {
            emit: Some(Emit(mapping)),
        }
    }
}

/// A relational operator. See spec §3 for the variant table and the
/// invariants every rule must preserve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Relation {
    Read {
        schema: Vec<ScalarType>,
        best_effort_filter: Option<ScalarExpr>,
        common: Common,
    },
    Filter {
        input: Box<Relation>,
        condition: ScalarExpr,
        common: Common,
    },
    Project {
        input: Box<Relation>,
        expressions: Vec<ScalarExpr>,
        common: Common,
    },
    Cross {
        left: Box<Relation>,
        right: Box<Relation>,
        common: Common,
    },
    Join {
        left: Box<Relation>,
        right: Box<Relation>,
        join_type: JoinType,
        condition: Option<ScalarExpr>,
        post_join_filter: Option<ScalarExpr>,
        common: Common,
    },
    Aggregate {
        input: Box<Relation>,
        groupings: Vec<Vec<ScalarExpr>>,
        measures: Vec<ScalarExpr>,
        common: Common,
    },
    Sort {
        input: Box<Relation>,
        keys: Vec<(ScalarExpr, SortDirection)>,
        common: Common,
    },
    Fetch {
        input: Box<Relation>,
        offset: Option<i64>,
        count: i64,
        common: Common,
    },
    Set {
        op: SetOp,
        inputs: Vec<Relation>,
        common: Common,
    },
}

impl Relation {
    /// The shared `common` record carried by every variant.
    pub fn common(&self) -> &Common {
        match self {
            Relation::Read { common, .. }
            | Relation::Filter { common, .. }
            | Relation::Project { common, .. }
            | Relation::Cross { common, .. }
            | Relation::Join { common, .. }
            | Relation::Aggregate { common, .. }
            | Relation::Sort { common, .. }
            | Relation::Fetch { common, .. }
            | Relation::Set { common, .. } => common,
        }
    }

    /// Effective arity: the emit length if present, else the natural arity
    /// (spec §3, "effective arity"). `None` when the natural arity can't be
    /// determined and there is no emit to fall back on.
    pub fn effective_arity(&self) -> Option<usize> {
        crate::field_count::resolve_output_field_count(self)
    }

    /// A short, human-readable tag for the variant — used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Relation::Read { .. } => "read",
            Relation::Filter { .. } => "filter",
            Relation::Project { .. } => "project",
            Relation::Cross { .. } => "cross",
            Relation::Join { .. } => "join",
            Relation::Aggregate { .. } => "aggregate",
            Relation::Sort { .. } => "sort",
            Relation::Fetch { .. } => "fetch",
            Relation::Set { .. } => "set",
        }
    }
}
