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

//! Two-sweep predicate simplification (spec §4.5): first simplify every
//! scalar expression in the tree bottom-up, then remove any `Filter` whose
//! condition has collapsed to a literal `true`.

use std::collections::BTreeMap;

use rewrite_common::ir::Relation;
use rewrite_expr::{is_bool_literal, simplify_expr};

/// Sweep 1: rewrites every `ScalarExpr` reachable from `rel`, recursing
/// into child relations first so replacements compose.
pub fn simplify_tree(rel: &Relation, fn_names: &BTreeMap<i32, String>) -> Relation {
    match rel {
        Relation::Read { schema, best_effort_filter, common } => Relation::Read {
            schema: schema.clone(),
            best_effort_filter: best_effort_filter
                .as_ref()
                .map(|f| simplify_expr(f, fn_names)),
            common: common.clone(),
        },
        Relation::Filter { input, condition, common } => Relation::Filter {
            input: Box::new(simplify_tree(input, fn_names)),
            condition: simplify_expr(condition, fn_names),
            common: common.clone(),
        },
        Relation::Project { input, expressions, common } => Relation::Project {
            input: Box::new(simplify_tree(input, fn_names)),
            expressions: expressions.iter().map(|e| simplify_expr(e, fn_names)).collect(),
            common: common.clone(),
        },
        Relation::Cross { left, right, common } => Relation::Cross {
            left: Box::new(simplify_tree(left, fn_names)),
            right: Box::new(simplify_tree(right, fn_names)),
            common: common.clone(),
        },
        Relation::Join { left, right, join_type, condition, post_join_filter, common } => {
            Relation::Join {
                left: Box::new(simplify_tree(left, fn_names)),
                right: Box::new(simplify_tree(right, fn_names)),
                join_type: *join_type,
                condition: condition.as_ref().map(|c| simplify_expr(c, fn_names)),
                post_join_filter: post_join_filter.as_ref().map(|c| simplify_expr(c, fn_names)),
                common: common.clone(),
            }
        }
        Relation::Aggregate { input, groupings, measures, common } => Relation::Aggregate {
            input: Box::new(simplify_tree(input, fn_names)),
            groupings: groupings
                .iter()
                .map(|g| g.iter().map(|e| simplify_expr(e, fn_names)).collect())
                .collect(),
            measures: measures.iter().map(|e| simplify_expr(e, fn_names)).collect(),
            common: common.clone(),
        },
        Relation::Sort { input, keys, common } => Relation::Sort {
            input: Box::new(simplify_tree(input, fn_names)),
            keys: keys
                .iter()
                .map(|(e, dir)| (simplify_expr(e, fn_names), *dir))
                .collect(),
            common: common.clone(),
        },
        Relation::Fetch { input, offset, count, common } => Relation::Fetch {
            input: Box::new(simplify_tree(input, fn_names)),
            offset: *offset,
            count: *count,
            common: common.clone(),
        },
        Relation::Set { op, inputs, common } => Relation::Set {
            op: *op,
            inputs: inputs.iter().map(|i| simplify_tree(i, fn_names)).collect(),
            common: common.clone(),
        },
    }
}

/// Sweep 2: removes any `Filter(condition=true, input)` by replacing it
/// with `input`, descending into the replacement first so a chain of
/// trivially-true filters collapses in a single pass.
pub fn remove_trivial_filters(rel: &Relation) -> Relation {
    if let Relation::Filter { input, condition, .. } = rel {
        if is_bool_literal(condition, true) {
            return remove_trivial_filters(input);
        }
    }

    match rel {
        Relation::Read { .. } => rel.clone(),
        Relation::Filter { input, condition, common } => Relation::Filter {
            input: Box::new(remove_trivial_filters(input)),
            condition: condition.clone(),
            common: common.clone(),
        },
        Relation::Project { input, expressions, common } => Relation::Project {
            input: Box::new(remove_trivial_filters(input)),
            expressions: expressions.clone(),
            common: common.clone(),
        },
        Relation::Cross { left, right, common } => Relation::Cross {
            left: Box::new(remove_trivial_filters(left)),
            right: Box::new(remove_trivial_filters(right)),
            common: common.clone(),
        },
        Relation::Join { left, right, join_type, condition, post_join_filter, common } => {
            Relation::Join {
                left: Box::new(remove_trivial_filters(left)),
                right: Box::new(remove_trivial_filters(right)),
                join_type: *join_type,
                condition: condition.clone(),
                post_join_filter: post_join_filter.clone(),
                common: common.clone(),
            }
        }
        Relation::Aggregate { input, groupings, measures, common } => Relation::Aggregate {
            input: Box::new(remove_trivial_filters(input)),
            groupings: groupings.clone(),
            measures: measures.clone(),
            common: common.clone(),
        },
        Relation::Sort { input, keys, common } => Relation::Sort {
            input: Box::new(remove_trivial_filters(input)),
            keys: keys.clone(),
            common: common.clone(),
        },
        Relation::Fetch { input, offset, count, common } => Relation::Fetch {
            input: Box::new(remove_trivial_filters(input)),
            offset: *offset,
            count: *count,
            common: common.clone(),
        },
        Relation::Set { op, inputs, common } => Relation::Set {
            op: *op,
            inputs: inputs.iter().map(remove_trivial_filters).collect(),
            common: common.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewrite_common::builder::*;
    use rewrite_common::ir::ScalarType;

    fn names() -> BTreeMap<i32, String> {
        BTreeMap::from([(1, "and".to_string())])
    }

    #[test]
    fn simplify_tree_collapses_nested_and() {
        let input = read_rel(vec![ScalarType::I64]);
        let cond = call(1, vec![lit_bool(true), field(0)], ScalarType::Bool);
        let filtered = filter_rel(input, cond);
        let result = simplify_tree(&filtered, &names());
        match result {
            Relation::Filter { condition, .. } => assert_eq!(condition, field(0)),
            _ => panic!("expected filter"),
        }
    }

    #[test]
    fn remove_trivial_filters_collapses_chain() {
        let input = read_rel(vec![ScalarType::I64]);
        let inner = filter_rel(input.clone(), lit_bool(true));
        let outer = filter_rel(inner, lit_bool(true));
        assert_eq!(remove_trivial_filters(&outer), input);
    }

    #[test]
    fn remove_trivial_filters_keeps_real_predicate() {
        let input = read_rel(vec![ScalarType::I64]);
        let cond = call(1, vec![field(0), lit_bool(true)], ScalarType::Bool);
        let filtered = filter_rel(input, cond.clone());
        let result = remove_trivial_filters(&filtered);
        match result {
            Relation::Filter { condition, .. } => assert_eq!(condition, cond),
            _ => panic!("expected filter"),
        }
    }
}
