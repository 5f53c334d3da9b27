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

//! A byte codec for [`Plan`], standing in for the real (opaque, out of
//! scope per spec §1) wire format. `BTreeMap` ordering in [`Plan`] plus
//! `serde_json`'s deterministic field order make the encoding stable,
//! which the fixed-point driver's byte-stability check depends on.

use crate::error::{Result, RewriteError};
use crate::ir::Plan;

pub fn to_bytes(plan: &Plan) -> Result<Vec<u8>> {
    serde_json::to_vec(plan).map_err(|e| RewriteError::Codec(e.to_string()))
}

pub fn from_bytes(bytes: &[u8]) -> Result<Plan> {
    serde_json::from_slice(bytes).map_err(|e| RewriteError::Codec(e.to_string()))
}
