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

//! Push a filter below schema-preserving operators (spec §4.3):
//! `Filter(Sort(X)) -> Sort(Filter(X))` and `Filter(Fetch(X)) -> Fetch(Filter(X))`.
//! Both operators pass their input's schema through unchanged, so filtering
//! earlier reduces the rows flowing through them without changing output.

use std::collections::BTreeMap;

use rewrite_common::ir::{Common, Relation};
use rewrite_common::Result;

use crate::driver::RewriteRule;

pub struct PushThroughPassthrough;

impl RewriteRule for PushThroughPassthrough {
    fn name(&self) -> &str {
        "push_through_passthrough"
    }

    fn try_apply(
        &self,
        rel: &Relation,
        _fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>> {
        let Relation::Filter { input, condition, .. } = rel else {
            return Ok(None);
        };

        match input.as_ref() {
            Relation::Sort {
                input: child_input,
                keys,
                common,
            } => Ok(Some(Relation::Sort {
                input: Box::new(Relation::Filter {
                    input: child_input.clone(),
                    condition: condition.clone(),
                    common: Common::none(),
                }),
                keys: keys.clone(),
                common: common.clone(),
            })),
            Relation::Fetch {
                input: child_input,
                offset,
                count,
                common,
            } => Ok(Some(Relation::Fetch {
                input: Box::new(Relation::Filter {
                    input: child_input.clone(),
                    condition: condition.clone(),
                    common: Common::none(),
                }),
                offset: *offset,
                count: *count,
                common: common.clone(),
            })),
            _ => Ok(None),
        }
    }
}
