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

//! The top-level plan: root relations plus the function-anchor extension
//! table (spec §3, §6).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::expr::ScalarExpr;
use super::relation::Relation;
use crate::error::RewriteError;
use crate::Result;

/// A plan: a list of root relations plus a table mapping integer function
/// anchors to their names. Rules identify functions (`and`, `or`, `not`) by
/// looking up the anchor here. `BTreeMap` keeps serialization
/// deterministic, which the fixed-point driver's byte-stability check
/// depends on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub roots: Vec<Relation>,
    pub extensions: BTreeMap<i32, String>,
}

impl Plan {
    pub fn new(roots: Vec<Relation>, extensions: BTreeMap<i32, String>) -> Self {
        Plan { roots, extensions }
    }

    /// Look up the anchor for a function whose bare name or `"name:"`-
    /// prefixed signature variant is `name`, per spec §6/§9.
    pub fn find_function_anchor(&self, name: &str) -> Option<i32> {
        self.extensions.iter().find_map(|(anchor, fn_name)| {
            if is_fn_named(fn_name, name) {
                Some(*anchor)
            } else {
                None
            }
        })
    }

    /// Checks that every `ScalarFunction` anchor reachable from `roots`
    /// resolves in `extensions`. A plan that fails this is malformed input:
    /// rules look up anchor names by scanning `extensions` and silently
    /// treat an unresolvable anchor as "not this function" (spec §6, §9),
    /// which would otherwise let a typo'd or truncated extension table pass
    /// through the driver undetected instead of being rejected up front.
    pub fn validate_function_anchors(&self) -> Result<()> {
        let mut anchors = BTreeSet::new();
        for root in &self.roots {
            collect_anchors_in_relation(root, &mut anchors);
        }
        for anchor in anchors {
            if !self.extensions.contains_key(&anchor) {
                return Err(RewriteError::MissingExtension(anchor));
            }
        }
        Ok(())
    }
}

fn collect_anchors_in_relation(rel: &Relation, anchors: &mut BTreeSet<i32>) {
    match rel {
        Relation::Read {
            best_effort_filter, ..
        } => {
            if let Some(expr) = best_effort_filter {
                collect_anchors_in_expr(expr, anchors);
            }
        }
        Relation::Filter {
            input, condition, ..
        } => {
            collect_anchors_in_relation(input, anchors);
            collect_anchors_in_expr(condition, anchors);
        }
        Relation::Project {
            input, expressions, ..
        } => {
            collect_anchors_in_relation(input, anchors);
            for expr in expressions {
                collect_anchors_in_expr(expr, anchors);
            }
        }
        Relation::Cross { left, right, .. } => {
            collect_anchors_in_relation(left, anchors);
            collect_anchors_in_relation(right, anchors);
        }
        Relation::Join {
            left,
            right,
            condition,
            post_join_filter,
            ..
        } => {
            collect_anchors_in_relation(left, anchors);
            collect_anchors_in_relation(right, anchors);
            if let Some(expr) = condition {
                collect_anchors_in_expr(expr, anchors);
            }
            if let Some(expr) = post_join_filter {
                collect_anchors_in_expr(expr, anchors);
            }
        }
        Relation::Aggregate {
            input,
            groupings,
            measures,
            ..
        } => {
            collect_anchors_in_relation(input, anchors);
            for grouping in groupings {
                for expr in grouping {
                    collect_anchors_in_expr(expr, anchors);
                }
            }
            for expr in measures {
                collect_anchors_in_expr(expr, anchors);
            }
        }
        Relation::Sort { input, keys, .. } => {
            collect_anchors_in_relation(input, anchors);
            for (expr, _) in keys {
                collect_anchors_in_expr(expr, anchors);
            }
        }
        Relation::Fetch { input, .. } => {
            collect_anchors_in_relation(input, anchors);
        }
        Relation::Set { inputs, .. } => {
            for input in inputs {
                collect_anchors_in_relation(input, anchors);
            }
        }
    }
}

fn collect_anchors_in_expr(expr: &ScalarExpr, anchors: &mut BTreeSet<i32>) {
    match expr {
        ScalarExpr::Field(_) | ScalarExpr::Literal(_) => {}
        ScalarExpr::ScalarFunction { anchor, args, .. } => {
            anchors.insert(*anchor);
            for arg in args {
                collect_anchors_in_expr(arg, anchors);
            }
        }
        ScalarExpr::Cast { input, .. } => collect_anchors_in_expr(input, anchors),
        ScalarExpr::IfThen { clauses, else_ } => {
            for (cond, then) in clauses {
                collect_anchors_in_expr(cond, anchors);
                collect_anchors_in_expr(then, anchors);
            }
            collect_anchors_in_expr(else_, anchors);
        }
    }
}

/// True if `fn_name` is the bare function `name`, or a `"name:"`-prefixed
/// signature variant of it (spec §9's resolution of the open question:
/// any name starting with `"name:"` counts, not just a canonical suffix).
pub fn is_fn_named(fn_name: &str, name: &str) -> bool {
    fn_name == name || fn_name.starts_with(&format!("{name}:"))
}
