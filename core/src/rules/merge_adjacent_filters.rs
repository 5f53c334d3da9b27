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

//! Merge adjacent filters: `Filter(outer, Filter(inner, X))` ->
//! `Filter(AND(outer, inner), X)` (spec §4.3). Merging creates pushdown
//! opportunities for the other rules on the next fixed-point iteration.

use std::collections::BTreeMap;

use rewrite_common::ir::{is_fn_named, Common, Relation, ScalarExpr, ScalarType};
use rewrite_common::Result;
use rewrite_expr::make_conjunction;

use crate::driver::RewriteRule;

pub struct MergeAdjacentFilters;

impl RewriteRule for MergeAdjacentFilters {
    fn name(&self) -> &str {
        "merge_adjacent_filters"
    }

    fn try_apply(
        &self,
        rel: &Relation,
        fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>> {
        let Relation::Filter { input, condition, .. } = rel else {
            return Ok(None);
        };
        let Relation::Filter {
            input: inner_input,
            condition: inner_condition,
            ..
        } = input.as_ref()
        else {
            return Ok(None);
        };

        let Some(and_anchor) = fn_names
            .iter()
            .find(|(_, name)| is_fn_named(name, "and"))
            .map(|(anchor, _)| *anchor)
        else {
            return Ok(None);
        };

        let output_type = [condition, inner_condition]
            .into_iter()
            .find_map(|c| match c {
                ScalarExpr::ScalarFunction { output_type, .. } => Some(*output_type),
                _ => None,
            })
            .unwrap_or(ScalarType::Bool);

        let merged_condition = make_conjunction(
            vec![condition.clone(), inner_condition.clone()],
            and_anchor,
            output_type,
        );

        Ok(Some(Relation::Filter {
            input: inner_input.clone(),
            condition: merged_condition,
            common: Common::none(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewrite_common::builder::*;

    fn names() -> BTreeMap<i32, String> {
        BTreeMap::from([(1, "and".to_string())])
    }

    #[test]
    fn merges_into_single_and() {
        let input = read_rel(vec![ScalarType::I64]);
        let inner = filter_rel(input, call(9, vec![field(0)], ScalarType::Bool));
        let outer = filter_rel(inner, call(9, vec![field(0)], ScalarType::Bool));

        let result = MergeAdjacentFilters
            .try_apply(&outer, &names())
            .unwrap()
            .unwrap();
        match result {
            Relation::Filter { condition, .. } => match condition {
                ScalarExpr::ScalarFunction { anchor, args, .. } => {
                    assert_eq!(anchor, 1);
                    assert_eq!(args.len(), 2);
                }
                _ => panic!("expected and"),
            },
            _ => panic!("expected filter"),
        }
    }

    #[test]
    fn no_and_anchor_is_not_applicable() {
        let input = read_rel(vec![ScalarType::I64]);
        let inner = filter_rel(input, lit_bool(true));
        let outer = filter_rel(inner, lit_bool(true));
        assert!(MergeAdjacentFilters
            .try_apply(&outer, &BTreeMap::new())
            .unwrap()
            .is_none());
    }

    #[test]
    fn single_filter_is_not_applicable() {
        let input = read_rel(vec![ScalarType::I64]);
        let f = filter_rel(input, lit_bool(true));
        assert!(MergeAdjacentFilters.try_apply(&f, &names()).unwrap().is_none());
    }
}
