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

//! Free-function builders for expressions and relations, used throughout
//! rule code and tests instead of hand-assembling IR literals. Mirrors the
//! shape of `datafusion_expr`'s `col`/`lit`/`and`/`or` and
//! `LogicalPlanBuilder`'s relation constructors.

use crate::ir::{
    Common, JoinType, Literal, Relation, ScalarExpr, ScalarType, SetOp, SortDirection,
};

pub fn field(index: usize) -> ScalarExpr {
    ScalarExpr::Field(index)
}

pub fn lit_i64(v: i64) -> ScalarExpr {
    ScalarExpr::Literal(Literal::I64(v))
}

pub fn lit_bool(v: bool) -> ScalarExpr {
    ScalarExpr::Literal(Literal::Bool(v))
}

pub fn lit_null(ty: ScalarType) -> ScalarExpr {
    ScalarExpr::Literal(Literal::Null(ty))
}

/// A scalar-function call anchored at `anchor`, e.g. the boolean
/// connectives or a comparison like `eq`.
pub fn call(anchor: i32, args: Vec<ScalarExpr>, output_type: ScalarType) -> ScalarExpr {
    ScalarExpr::ScalarFunction {
        anchor,
        args,
        output_type,
    }
}

pub fn and_expr(anchor: i32, args: Vec<ScalarExpr>) -> ScalarExpr {
    call(anchor, args, ScalarType::Bool)
}

pub fn or_expr(anchor: i32, args: Vec<ScalarExpr>) -> ScalarExpr {
    call(anchor, args, ScalarType::Bool)
}

pub fn not_expr(anchor: i32, arg: ScalarExpr) -> ScalarExpr {
    call(anchor, vec![arg], ScalarType::Bool)
}

pub fn read_rel(schema: Vec<ScalarType>) -> Relation {
    Relation::Read {
        schema,
        best_effort_filter: None,
        common: Common::none(),
    }
}

pub fn filter_rel(input: Relation, condition: ScalarExpr) -> Relation {
    Relation::Filter {
        input: Box::new(input),
        condition,
        common: Common::none(),
    }
}

pub fn project_rel(input: Relation, expressions: Vec<ScalarExpr>) -> Relation {
    Relation::Project {
        input: Box::new(input),
        expressions,
        common: Common::none(),
    }
}

pub fn cross_rel(left: Relation, right: Relation) -> Relation {
    Relation::Cross {
        left: Box::new(left),
        right: Box::new(right),
        common: Common::none(),
    }
}

pub fn join_rel(
    left: Relation,
    right: Relation,
    join_type: JoinType,
    condition: Option<ScalarExpr>,
) -> Relation {
    Relation::Join {
        left: Box::new(left),
        right: Box::new(right),
        join_type,
        condition,
        post_join_filter: None,
        common: Common::none(),
    }
}

pub fn aggregate_rel(
    input: Relation,
    groupings: Vec<Vec<ScalarExpr>>,
    measures: Vec<ScalarExpr>,
) -> Relation {
    Relation::Aggregate {
        input: Box::new(input),
        groupings,
        measures,
        common: Common::none(),
    }
}

pub fn sort_rel(input: Relation, keys: Vec<(ScalarExpr, SortDirection)>) -> Relation {
    Relation::Sort {
        input: Box::new(input),
        keys,
        common: Common::none(),
    }
}

pub fn fetch_rel(input: Relation, offset: Option<i64>, count: i64) -> Relation {
    Relation::Fetch {
        input: Box::new(input),
        offset,
        count,
        common: Common::none(),
    }
}

pub fn set_rel(op: SetOp, inputs: Vec<Relation>) -> Relation {
    Relation::Set {
        op,
        inputs,
        common: Common::none(),
    }
}

/// Mutable access to a relation's shared `common` record — used by tests
/// to attach an emit mapping after construction.
pub fn common_mut(rel: &mut Relation) -> &mut Common {
    match rel {
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
