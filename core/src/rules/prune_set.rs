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

//! Prune unused input fields from a `Set` that carries an emit mapping
//! (spec §4.4). All inputs to a set operation share the same schema, so the
//! same needed-field set is applied to every branch; the first input's
//! pruning result determines the shared `old -> new` mapping used to remap
//! the outer emit.

use std::collections::BTreeMap;

use rewrite_common::ir::{Common, Relation};
use rewrite_common::Result;

use super::prune_utils::prune_input;
use crate::driver::RewriteRule;

pub struct PruneSet;

impl RewriteRule for PruneSet {
    fn name(&self) -> &str {
        "prune_set"
    }

    fn try_apply(
        &self,
        rel: &Relation,
        _fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>> {
        let Relation::Set { op, inputs, common } = rel else {
            return Ok(None);
        };
        let Some(emit) = &common.emit else {
            return Ok(None);
        };
        if inputs.is_empty() {
            return Ok(None);
        }

        let needed: std::collections::BTreeSet<usize> = emit.0.iter().copied().collect();

        let Some((_, old_to_new)) = prune_input(&inputs[0], &needed) else {
            return Ok(None);
        };

        let new_inputs = inputs
            .iter()
            .map(|inp| match prune_input(inp, &needed) {
                Some((pruned, _)) => pruned,
                None => inp.clone(),
            })
            .collect();

        let new_emit: Vec<usize> = emit.0.iter().map(|i| old_to_new[i]).collect();

        Ok(Some(Relation::Set {
            op: *op,
            inputs: new_inputs,
            common: Common::with_emit(new_emit),
        }))
    }
}
