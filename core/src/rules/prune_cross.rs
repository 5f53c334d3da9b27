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

//! Prune unused input fields from a `Cross` that carries an emit mapping
//! (spec §4.4). A cross join has no join expression to account for, so the
//! needed set is exactly the emit's targets.

use std::collections::BTreeMap;

use rewrite_common::ir::{Common, Relation};
use rewrite_common::Result;

use super::prune_utils::prune_bilateral_inputs;
use crate::driver::RewriteRule;

pub struct PruneCross;

impl RewriteRule for PruneCross {
    fn name(&self) -> &str {
        "prune_cross"
    }

    fn try_apply(
        &self,
        rel: &Relation,
        _fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>> {
        let Relation::Cross { left, right, common } = rel else {
            return Ok(None);
        };
        let Some(emit) = &common.emit else {
            return Ok(None);
        };

        let needed: std::collections::BTreeSet<usize> = emit.0.iter().copied().collect();

        let Some((new_left, new_right, mapping)) = prune_bilateral_inputs(left, right, &needed)
        else {
            return Ok(None);
        };

        let new_emit: Vec<usize> = emit.0.iter().map(|i| mapping[i]).collect();

        Ok(Some(Relation::Cross {
            left: Box::new(new_left.unwrap_or_else(|| (**left).clone())),
            right: Box::new(new_right.unwrap_or_else(|| (**right).clone())),
            common: Common::with_emit(new_emit),
        }))
    }
}
