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

//! Push filter predicates below an aggregate (spec §4.3):
//! `Filter(Aggregate(X)) -> Aggregate(Filter(X))` when the predicate
//! references only grouping-key columns that are simple field references.
//! Only single grouping-set aggregates are handled.

use std::collections::BTreeMap;

use rewrite_common::ir::{Common, Relation, ScalarExpr, ScalarType};
use rewrite_common::Result;
use rewrite_expr::{collect_field_indices, make_conjunction, remap_field_indices, split_conjunction};

use crate::driver::RewriteRule;

pub struct PushThroughAggregate;

impl RewriteRule for PushThroughAggregate {
    fn name(&self) -> &str {
        "push_through_aggregate"
    }

    fn try_apply(
        &self,
        rel: &Relation,
        fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>> {
        let Relation::Filter { input, condition, .. } = rel else {
            return Ok(None);
        };
        let Relation::Aggregate {
            input: agg_input,
            groupings,
            measures,
            common,
        } = input.as_ref()
        else {
            return Ok(None);
        };

        if groupings.len() != 1 {
            return Ok(None);
        }
        let grouping = &groupings[0];
        let num_grouping_exprs = grouping.len();
        if num_grouping_exprs == 0 {
            return Ok(None);
        }

        let mut output_to_input = BTreeMap::new();
        for (i, gexpr) in grouping.iter().enumerate() {
            let ScalarExpr::Field(idx) = gexpr else {
                return Ok(None);
            };
            output_to_input.insert(i, *idx);
        }

        let conjuncts = split_conjunction(condition, fn_names);

        let mut pushable = Vec::new();
        let mut remaining = Vec::new();

        for conjunct in conjuncts {
            match collect_field_indices(&conjunct) {
                Some(indices) if indices.iter().all(|&i| i < num_grouping_exprs) => {
                    pushable.push(conjunct)
                }
                _ => remaining.push(conjunct),
            }
        }

        if pushable.is_empty() {
            return Ok(None);
        }

        let (and_anchor, output_type) = conjunction_meta(condition);

        let remapped: Vec<ScalarExpr> = pushable
            .iter()
            .map(|p| remap_field_indices(p, &output_to_input))
            .collect();
        let push_cond = make_conjunction(remapped, and_anchor, output_type);

        let new_agg = Relation::Aggregate {
            input: Box::new(Relation::Filter {
                input: agg_input.clone(),
                condition: push_cond,
                common: Common::none(),
            }),
            groupings: groupings.clone(),
            measures: measures.clone(),
            common: common.clone(),
        };

        if remaining.is_empty() {
            return Ok(Some(new_agg));
        }

        let remaining_cond = make_conjunction(remaining, and_anchor, output_type);
        Ok(Some(Relation::Filter {
            input: Box::new(new_agg),
            condition: remaining_cond,
            common: Common::none(),
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
