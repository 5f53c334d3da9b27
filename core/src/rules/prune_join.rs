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

//! Prune unused input fields from a `Join` that carries an emit mapping
//! (spec §4.4). Needed fields (emit targets plus the join's ON-expression
//! references) are split across the combined left+right index space and
//! each side is pruned independently.

use std::collections::BTreeMap;

use rewrite_common::ir::{Common, Relation};
use rewrite_common::Result;
use rewrite_expr::{collect_field_indices, remap_field_indices};

use super::prune_utils::prune_bilateral_inputs;
use crate::driver::RewriteRule;

pub struct PruneJoin;

impl RewriteRule for PruneJoin {
    fn name(&self) -> &str {
        "prune_join"
    }

    fn try_apply(
        &self,
        rel: &Relation,
        _fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>> {
        let Relation::Join {
            left,
            right,
            join_type,
            condition,
            post_join_filter,
            common,
        } = rel
        else {
            return Ok(None);
        };
        let Some(emit) = &common.emit else {
            return Ok(None);
        };

        let mut needed: std::collections::BTreeSet<usize> = emit.0.iter().copied().collect();
        if let Some(cond) = condition {
            let Some(indices) = collect_field_indices(cond) else {
                return Ok(None);
            };
            needed.extend(indices);
        }

        let Some((new_left, new_right, mapping)) = prune_bilateral_inputs(left, right, &needed)
        else {
            return Ok(None);
        };

        let new_condition = condition
            .as_ref()
            .map(|c| remap_field_indices(c, &mapping));
        let new_emit: Vec<usize> = emit.0.iter().map(|i| mapping[i]).collect();

        Ok(Some(Relation::Join {
            left: Box::new(new_left.unwrap_or_else(|| (**left).clone())),
            right: Box::new(new_right.unwrap_or_else(|| (**right).clone())),
            join_type: *join_type,
            condition: new_condition,
            post_join_filter: post_join_filter.clone(),
            common: Common::with_emit(new_emit),
        }))
    }
}
