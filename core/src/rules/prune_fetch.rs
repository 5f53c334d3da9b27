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

//! Prune unused input fields from a `Fetch` that carries an emit mapping
//! (spec §4.4). Offset/count are constants, not field references, so the
//! only needed fields are the emit's targets.

use std::collections::BTreeMap;

use rewrite_common::ir::{Common, Relation};
use rewrite_common::Result;

use super::prune_utils::prune_input;
use crate::driver::RewriteRule;

pub struct PruneFetch;

impl RewriteRule for PruneFetch {
    fn name(&self) -> &str {
        "prune_fetch"
    }

    fn try_apply(
        &self,
        rel: &Relation,
        _fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>> {
        let Relation::Fetch { input, offset, count, common } = rel else {
            return Ok(None);
        };
        let Some(emit) = &common.emit else {
            return Ok(None);
        };

        let needed: std::collections::BTreeSet<usize> = emit.0.iter().copied().collect();

        let Some((new_input, old_to_new)) = prune_input(input, &needed) else {
            return Ok(None);
        };

        let new_emit: Vec<usize> = emit.0.iter().map(|i| old_to_new[i]).collect();

        Ok(Some(Relation::Fetch {
            input: Box::new(new_input),
            offset: *offset,
            count: *count,
            common: Common::with_emit(new_emit),
        }))
    }
}
