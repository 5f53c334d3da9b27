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

//! Prune unused input fields from a `Sort` that carries an emit mapping
//! (spec §4.4). Needed fields are the emit's targets plus whatever the sort
//! keys reference.

use std::collections::BTreeMap;

use rewrite_common::ir::{Common, Relation};
use rewrite_common::Result;
use rewrite_expr::{collect_field_indices, remap_field_indices};

use super::prune_utils::prune_input;
use crate::driver::RewriteRule;

pub struct PruneSort;

impl RewriteRule for PruneSort {
    fn name(&self) -> &str {
        "prune_sort"
    }

    fn try_apply(
        &self,
        rel: &Relation,
        _fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>> {
        let Relation::Sort { input, keys, common } = rel else {
            return Ok(None);
        };
        let Some(emit) = &common.emit else {
            return Ok(None);
        };

        let mut needed: std::collections::BTreeSet<usize> = emit.0.iter().copied().collect();
        for (key_expr, _) in keys {
            let Some(indices) = collect_field_indices(key_expr) else {
                return Ok(None);
            };
            needed.extend(indices);
        }

        let Some((new_input, old_to_new)) = prune_input(input, &needed) else {
            return Ok(None);
        };

        let new_keys = keys
            .iter()
            .map(|(expr, dir)| (remap_field_indices(expr, &old_to_new), *dir))
            .collect();
        let new_emit: Vec<usize> = emit.0.iter().map(|i| old_to_new[i]).collect();

        Ok(Some(Relation::Sort {
            input: Box::new(new_input),
            keys: new_keys,
            common: Common::with_emit(new_emit),
        }))
    }
}
