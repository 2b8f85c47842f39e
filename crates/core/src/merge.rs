// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shallow payload merging

use serde_json::{Map, Value};

/// Merge `overrides` over `defaults`, key by key.
///
/// The merge is shallow: an override replaces the whole value under its
/// key, nested objects are not merged recursively.
pub fn merge_payload(
    defaults: &Map<String, Value>,
    overrides: &Map<String, Value>,
) -> Map<String, Value> {
    let mut merged = defaults.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
