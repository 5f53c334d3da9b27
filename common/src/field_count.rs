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

//! Computes a relation's output arity, accounting for any emit mapping
//! (spec §4.2).

use crate::ir::Relation;

/// Natural (pre-emit) arity, computed structurally. `None` if any required
/// subschema is absent, or an `Aggregate` has zero or multiple grouping
/// sets.
pub fn count_output_fields(rel: &Relation) -> Option<usize> {
    match rel {
        Relation::Read { schema, .. } => Some(schema.len()),
        Relation::Filter { input, .. } => count_output_fields(input),
        Relation::Project {
            input, expressions, ..
        } => count_output_fields(input).map(|n| n + expressions.len()),
        Relation::Cross { left, right, .. } => {
            let l = count_output_fields(left)?;
            let r = count_output_fields(right)?;
            Some(l + r)
        }
        Relation::Join { left, right, .. } => {
            let l = count_output_fields(left)?;
            let r = count_output_fields(right)?;
            Some(l + r)
        }
        Relation::Aggregate {
            groupings, measures, ..
        } => {
            if groupings.len() != 1 {
                return None;
            }
            Some(groupings[0].len() + measures.len())
        }
        Relation::Sort { input, .. } => count_output_fields(input),
        Relation::Fetch { input, .. } => count_output_fields(input),
        Relation::Set { inputs, .. } => inputs.first().and_then(count_output_fields),
    }
}

/// Effective arity: `len(emit)` if the relation carries one, else
/// [`count_output_fields`].
pub fn resolve_output_field_count(rel: &Relation) -> Option<usize> {
    match &rel.common().emit {
        Some(emit) => Some(emit.len()),
        None => count_output_fields(rel),
    }
}
