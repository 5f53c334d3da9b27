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

//! Push filter predicates through cross joins (spec §4.3). Single-side
//! predicates move to their respective input; a conjunct referencing both
//! sides converts the cross join to an inner join rather than blocking the
//! whole rewrite.

use std::collections::BTreeMap;

use rewrite_common::field_count::count_output_fields;
use rewrite_common::ir::{Common, JoinType, Relation, ScalarExpr, ScalarType};
use rewrite_common::Result;
use rewrite_expr::{adjust_field_indices, collect_field_indices, make_conjunction, split_conjunction};

use crate::driver::RewriteRule;

pub struct PushThroughCross;

impl RewriteRule for PushThroughCross {
    fn name(&self) -> &str {
        "push_through_cross"
    }

    fn try_apply(
        &self,
        rel: &Relation,
        fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>> {
        let Relation::Filter { input, condition, .. } = rel else {
            return Ok(None);
        };
        let Relation::Cross { left, right, common } = input.as_ref() else {
            return Ok(None);
        };

        let Some(left_field_count) = count_output_fields(left) else {
            return Ok(None);
        };

        let conjuncts = split_conjunction(condition, fn_names);

        let mut left_preds = Vec::new();
        let mut right_preds = Vec::new();
        let mut mixed_preds = Vec::new();

        for conjunct in conjuncts {
            match collect_field_indices(&conjunct) {
                None => mixed_preds.push(conjunct),
                Some(indices) if indices.iter().all(|&i| i < left_field_count) => {
                    left_preds.push(conjunct)
                }
                Some(indices) if indices.iter().all(|&i| i >= left_field_count) => {
                    right_preds.push(conjunct)
                }
                Some(_) => mixed_preds.push(conjunct),
            }
        }

        if left_preds.is_empty() && right_preds.is_empty() && mixed_preds.is_empty() {
            return Ok(None);
        }

        let (and_anchor, output_type) = conjunction_meta(condition);

        let built_left = if left_preds.is_empty() {
            (**left).clone()
        } else {
            Relation::Filter {
                input: left.clone(),
                condition: make_conjunction(left_preds, and_anchor, output_type),
                common: Common::none(),
            }
        };

        let built_right = if right_preds.is_empty() {
            (**right).clone()
        } else {
            let adjusted: Vec<ScalarExpr> = right_preds
                .iter()
                .map(|p| adjust_field_indices(p, -(left_field_count as i64)))
                .collect();
            Relation::Filter {
                input: right.clone(),
                condition: make_conjunction(adjusted, and_anchor, output_type),
                common: Common::none(),
            }
        };

        if !mixed_preds.is_empty() {
            let join_expr = make_conjunction(mixed_preds, and_anchor, output_type);
            return Ok(Some(Relation::Join {
                left: Box::new(built_left),
                right: Box::new(built_right),
                join_type: JoinType::Inner,
                condition: Some(join_expr),
                post_join_filter: None,
                common: common.clone(),
            }));
        }

        Ok(Some(Relation::Cross {
            left: Box::new(built_left),
            right: Box::new(built_right),
            common: common.clone(),
        }))
    }
}

fn conjunction_meta(condition: &ScalarExpr) -> (i32, ScalarType) {
    match condition {
        ScalarExpr::ScalarFunction {
            anchor, output_type, ..
        } => (*anchor, *output_type),
        _ => (0, ScalarType::Bool),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewrite_common::builder::*;

    fn names() -> BTreeMap<i32, String> {
        BTreeMap::from([(1, "and".to_string()), (2, "eq".to_string())])
    }

    fn two_col_reads() -> (Relation, Relation) {
        (
            read_rel(vec![ScalarType::I64, ScalarType::I64]),
            read_rel(vec![ScalarType::I64, ScalarType::I64]),
        )
    }

    #[test]
    fn single_side_predicate_pushes_without_converting() {
        let (l, r) = two_col_reads();
        let cross = cross_rel(l, r);
        let filtered = filter_rel(cross, call(2, vec![field(0), lit_i64(5)], ScalarType::Bool));

        let result = PushThroughCross.try_apply(&filtered, &names()).unwrap().unwrap();
        match result {
            Relation::Cross { left, .. } => {
                assert!(matches!(*left, Relation::Filter { .. }));
            }
            _ => panic!("expected cross"),
        }
    }

    #[test]
    fn mixed_predicate_converts_to_inner_join() {
        let (l, r) = two_col_reads();
        let cross = cross_rel(l, r);
        let filtered = filter_rel(cross, call(2, vec![field(0), field(2)], ScalarType::Bool));

        let result = PushThroughCross.try_apply(&filtered, &names()).unwrap().unwrap();
        match result {
            Relation::Join { join_type, condition, .. } => {
                assert_eq!(join_type, JoinType::Inner);
                assert!(condition.is_some());
            }
            _ => panic!("expected join"),
        }
    }

    #[test]
    fn unknown_left_arity_blocks_the_rewrite() {
        let unknown_arity_left =
            aggregate_rel(read_rel(vec![ScalarType::I64]), vec![vec![field(0)], vec![]], vec![]);
        let (_, r) = two_col_reads();
        let cross = cross_rel(unknown_arity_left, r);
        let filtered = filter_rel(cross, call(2, vec![field(0), lit_i64(5)], ScalarType::Bool));
        assert!(PushThroughCross.try_apply(&filtered, &names()).unwrap().is_none());
    }

    #[test]
    fn mixed_only_predicate_still_converts() {
        let (l, r) = two_col_reads();
        let cross = cross_rel(l, r);
        let filtered = filter_rel(cross, call(2, vec![field(0), field(3)], ScalarType::Bool));
        let result = PushThroughCross.try_apply(&filtered, &names()).unwrap().unwrap();
        assert!(matches!(result, Relation::Join { .. }));
    }
}
