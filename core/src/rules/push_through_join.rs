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

//! Push filter predicates through joins (spec §4.3). Pushability depends on
//! the join type: inner joins push to either side, one-sided outer joins
//! (left/semi/anti/single/mark variants) push only to their preserved side,
//! full outer and unspecified joins never push.

use std::collections::BTreeMap;

use rewrite_common::field_count::count_output_fields;
use rewrite_common::ir::{Common, JoinType, Relation, ScalarExpr, ScalarType};
use rewrite_common::Result;
use rewrite_expr::{adjust_field_indices, collect_field_indices, make_conjunction, split_conjunction};

use crate::driver::RewriteRule;

pub struct PushThroughJoin;

impl RewriteRule for PushThroughJoin {
    fn name(&self) -> &str {
        "push_through_join"
    }

    fn try_apply(
        &self,
        rel: &Relation,
        fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>> {
        let Relation::Filter { input, condition, .. } = rel else {
            return Ok(None);
        };
        let Relation::Join {
            left,
            right,
            join_type,
            condition: join_condition,
            post_join_filter,
            common,
        } = input.as_ref()
        else {
            return Ok(None);
        };

        let can_left = can_push_left(*join_type);
        let can_right = can_push_right(*join_type);
        if !can_left && !can_right {
            return Ok(None);
        }

        let Some(left_field_count) = count_output_fields(left) else {
            return Ok(None);
        };

        let conjuncts = split_conjunction(condition, fn_names);

        let mut left_preds = Vec::new();
        let mut right_preds = Vec::new();
        let mut remaining_preds = Vec::new();

        for conjunct in conjuncts {
            match collect_field_indices(&conjunct) {
                Some(indices) if can_left && indices.iter().all(|&i| i < left_field_count) => {
                    left_preds.push(conjunct)
                }
                Some(indices) if can_right && indices.iter().all(|&i| i >= left_field_count) => {
                    right_preds.push(conjunct)
                }
                _ => remaining_preds.push(conjunct),
            }
        }

        if left_preds.is_empty() && right_preds.is_empty() {
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

        let new_join = Relation::Join {
            left: Box::new(built_left),
            right: Box::new(built_right),
            join_type: *join_type,
            condition: join_condition.clone(),
            post_join_filter: post_join_filter.clone(),
            common: common.clone(),
        };

        if remaining_preds.is_empty() {
            return Ok(Some(new_join));
        }

        let remaining_cond = make_conjunction(remaining_preds, and_anchor, output_type);
        Ok(Some(Relation::Filter {
            input: Box::new(new_join),
            condition: remaining_cond,
            common: Common::none(),
        }))
    }
}

fn can_push_left(jt: JoinType) -> bool {
    matches!(
        jt,
        JoinType::Inner
            | JoinType::Left
            | JoinType::LeftSemi
            | JoinType::LeftAnti
            | JoinType::LeftSingle
            | JoinType::LeftMark
    )
}

fn can_push_right(jt: JoinType) -> bool {
    matches!(
        jt,
        JoinType::Inner
            | JoinType::Right
            | JoinType::RightSemi
            | JoinType::RightAnti
            | JoinType::RightSingle
            | JoinType::RightMark
    )
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
    fn inner_join_pushes_both_sides() {
        let (l, r) = two_col_reads();
        let join = join_rel(l, r, JoinType::Inner, None);
        let cond = call(
            1,
            vec![
                call(2, vec![field(0), lit_i64(1)], ScalarType::Bool),
                call(2, vec![field(2), lit_i64(2)], ScalarType::Bool),
            ],
            ScalarType::Bool,
        );
        let filtered = filter_rel(join, cond);

        let result = PushThroughJoin.try_apply(&filtered, &names()).unwrap().unwrap();
        match result {
            Relation::Join { left, right, .. } => {
                assert!(matches!(*left, Relation::Filter { .. }));
                assert!(matches!(*right, Relation::Filter { .. }));
            }
            _ => panic!("expected join"),
        }
    }

    #[test]
    fn outer_join_never_pushes() {
        let (l, r) = two_col_reads();
        let join = join_rel(l, r, JoinType::Outer, None);
        let filtered = filter_rel(join, call(2, vec![field(0), lit_i64(1)], ScalarType::Bool));
        assert!(PushThroughJoin.try_apply(&filtered, &names()).unwrap().is_none());
    }

    #[test]
    fn left_join_pushes_left_only() {
        let (l, r) = two_col_reads();
        let join = join_rel(l, r, JoinType::Left, None);
        let cond = call(
            1,
            vec![
                call(2, vec![field(0), lit_i64(1)], ScalarType::Bool),
                call(2, vec![field(2), lit_i64(2)], ScalarType::Bool),
            ],
            ScalarType::Bool,
        );
        let filtered = filter_rel(join, cond);

        let result = PushThroughJoin.try_apply(&filtered, &names()).unwrap().unwrap();
        match result {
            Relation::Filter { input, .. } => match *input {
                Relation::Join { left, right, .. } => {
                    assert!(matches!(*left, Relation::Filter { .. }));
                    assert!(!matches!(*right, Relation::Filter { .. }));
                }
                _ => panic!("expected join"),
            },
            _ => panic!("expected remaining filter wrapping the join"),
        }
    }
}
