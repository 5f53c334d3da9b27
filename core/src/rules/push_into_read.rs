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

//! Stamp a filter predicate onto a `Read`'s `best_effort_filter` hint
//! (spec §4.3). The `Filter` node is kept above untouched — the hint is
//! best-effort only, a reader may ignore it, so it never replaces the
//! enforcing `Filter`. Fires only once per `Read` (guarded by
//! `best_effort_filter` already being set) to avoid looping forever in
//! the fixed-point driver.

use std::collections::BTreeMap;

use rewrite_common::ir::Relation;
use rewrite_common::Result;

use crate::driver::RewriteRule;

pub struct PushIntoRead;

impl RewriteRule for PushIntoRead {
    fn name(&self) -> &str {
        "push_into_read"
    }

    fn try_apply(
        &self,
        rel: &Relation,
        _fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>> {
        let Relation::Filter { input, condition, common } = rel else {
            return Ok(None);
        };
        let Relation::Read {
            schema,
            best_effort_filter,
            common: read_common,
        } = input.as_ref()
        else {
            return Ok(None);
        };

        if best_effort_filter.is_some() {
            return Ok(None);
        }

        Ok(Some(Relation::Filter {
            input: Box::new(Relation::Read {
                schema: schema.clone(),
                best_effort_filter: Some(condition.clone()),
                common: read_common.clone(),
            }),
            condition: condition.clone(),
            common: common.clone(),
        }))
    }
}
