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

//! Remove a `Project` that is an identity (spec §4.5): its output equals
//! its input, either trivially (no expressions, no emit) or via an emit
//! that passes every input field through unchanged / selects simple
//! `field(i)` pass-through expressions in order.

use std::collections::BTreeMap;

use rewrite_common::field_count::resolve_output_field_count;
use rewrite_common::ir::{Relation, ScalarExpr};
use rewrite_common::Result;

use crate::driver::RewriteRule;

pub struct RemoveIdentityProject;

impl RewriteRule for RemoveIdentityProject {
    fn name(&self) -> &str {
        "remove_identity_project"
    }

    fn try_apply(
        &self,
        rel: &Relation,
        _fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>> {
        let Relation::Project { input, expressions, common } = rel else {
            return Ok(None);
        };
        let Some(input_field_count) = resolve_output_field_count(input) else {
            return Ok(None);
        };

        let Some(emit) = &common.emit else {
            return if expressions.is_empty() {
                Ok(Some((**input).clone()))
            } else {
                Ok(None)
            };
        };

        if emit.len() != input_field_count {
            return Ok(None);
        }

        for (i, &idx) in emit.0.iter().enumerate() {
            if idx == i {
                continue;
            }
            if idx >= input_field_count {
                let expr_idx = idx - input_field_count;
                if expr_idx >= expressions.len() || !is_field_ref(&expressions[expr_idx], i) {
                    return Ok(None);
                }
            } else {
                return Ok(None);
            }
        }

        Ok(Some((**input).clone()))
    }
}

fn is_field_ref(expr: &ScalarExpr, expected_field: usize) -> bool {
    matches!(expr, ScalarExpr::Field(idx) if *idx == expected_field)
}
