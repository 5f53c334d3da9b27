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

//! Shared helpers for the projection-pruning rule family (spec §4.4).

use std::collections::BTreeMap;

use rewrite_common::field_count::resolve_output_field_count;
use rewrite_common::ir::{Common, Emit, Relation};

/// Prunes `input_rel` to only output `needed` fields, if doing so reduces
/// its arity. Returns the rewritten input (with a composed or freshly
/// installed emit) and the `old -> new` field-index map, or `None` when
/// `needed` already covers (or exceeds) the input's current arity.
pub fn prune_input(
    input_rel: &Relation,
    needed: &std::collections::BTreeSet<usize>,
) -> Option<(Relation, BTreeMap<usize, usize>)> {
    let existing_emit = input_rel.common().emit.clone();
    let input_field_count = match &existing_emit {
        Some(emit) => emit.len(),
        None => resolve_output_field_count(input_rel)?,
    };

    if needed.len() >= input_field_count {
        return None;
    }

    let sorted_needed: Vec<usize> = needed.iter().copied().collect();
    let old_to_new: BTreeMap<usize, usize> = sorted_needed
        .iter()
        .enumerate()
        .map(|(new, old)| (*old, new))
        .collect();

    let new_mapping: Vec<usize> = match &existing_emit {
        Some(Emit(existing)) => sorted_needed.iter().map(|&i| existing[i]).collect(),
        None => sorted_needed.clone(),
    };

    let mut new_input = input_rel.clone();
    *rewrite_common::builder::common_mut(&mut new_input) = Common::with_emit(new_mapping);

    Some((new_input, old_to_new))
}

/// Bilateral variant of [`prune_input`]: splits `needed` (a combined
/// left+right index space) across `left`/`right`, prunes each side
/// independently, and returns a combined `old -> new` map over the full
/// combined space. `None` if neither side can be pruned.
pub fn prune_bilateral_inputs(
    left: &Relation,
    right: &Relation,
    needed: &std::collections::BTreeSet<usize>,
) -> Option<(Option<Relation>, Option<Relation>, BTreeMap<usize, usize>)> {
    let left_field_count = resolve_output_field_count(left)?;
    let right_field_count = resolve_output_field_count(right)?;

    let left_needed: std::collections::BTreeSet<usize> =
        needed.iter().copied().filter(|&i| i < left_field_count).collect();
    let right_needed: std::collections::BTreeSet<usize> = needed
        .iter()
        .copied()
        .filter(|&i| i >= left_field_count)
        .map(|i| i - left_field_count)
        .collect();

    let left_pruned = prune_input(left, &left_needed);
    let right_pruned = prune_input(right, &right_needed);

    if left_pruned.is_none() && right_pruned.is_none() {
        return None;
    }

    let (new_left, left_mapping, new_left_count) = match left_pruned {
        Some((rel, mapping)) => {
            let count = mapping.len();
            (Some(rel), mapping, count)
        }
        None => (
            None,
            (0..left_field_count).map(|i| (i, i)).collect(),
            left_field_count,
        ),
    };

    let (new_right, right_mapping) = match right_pruned {
        Some((rel, mapping)) => (Some(rel), mapping),
        None => (None, (0..right_field_count).map(|i| (i, i)).collect()),
    };

    let mut combined = BTreeMap::new();
    for (old, new) in left_mapping {
        combined.insert(old, new);
    }
    for (old, new) in right_mapping {
        combined.insert(left_field_count + old, new_left_count + new);
    }

    Some((new_left, new_right, combined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewrite_common::builder::*;
    use rewrite_common::ir::ScalarType;
    use std::collections::BTreeSet;

    #[test]
    fn prune_input_no_op_when_needed_covers_arity() {
        let r = read_rel(vec![ScalarType::I64, ScalarType::I64]);
        let needed = BTreeSet::from([0, 1]);
        assert!(prune_input(&r, &needed).is_none());
    }

    #[test]
    fn prune_input_installs_emit_and_mapping() {
        let r = read_rel(vec![ScalarType::I64, ScalarType::I64, ScalarType::I64]);
        let needed = BTreeSet::from([2, 0]);
        let (pruned, mapping) = prune_input(&r, &needed).unwrap();
        match pruned {
            Relation::Read { common, .. } => {
                assert_eq!(common.emit.unwrap().0, vec![0, 2]);
            }
            _ => panic!(),
        }
        assert_eq!(mapping[&0], 0);
        assert_eq!(mapping[&2], 1);
    }

    #[test]
    fn prune_input_composes_with_existing_emit() {
        let mut r = read_rel(vec![ScalarType::I64, ScalarType::I64, ScalarType::I64]);
        *rewrite_common::builder::common_mut(&mut r) = Common::with_emit(vec![2, 1, 0]);
        let needed = BTreeSet::from([1]);
        let (pruned, _) = prune_input(&r, &needed).unwrap();
        match pruned {
            Relation::Read { common, .. } => assert_eq!(common.emit.unwrap().0, vec![1]),
            _ => panic!(),
        }
    }

    #[test]
    fn bilateral_split_and_adjust() {
        let left = read_rel(vec![ScalarType::I64, ScalarType::I64]);
        let right = read_rel(vec![ScalarType::I64, ScalarType::I64, ScalarType::I64]);
        let needed = BTreeSet::from([0, 2, 4]);
        let (new_left, new_right, mapping) =
            prune_bilateral_inputs(&left, &right, &needed).unwrap();
        assert!(new_left.is_some());
        assert!(new_right.is_some());
        assert_eq!(mapping[&0], 0);
        assert_eq!(mapping[&2], 1);
        assert_eq!(mapping[&4], 2);
    }
}
