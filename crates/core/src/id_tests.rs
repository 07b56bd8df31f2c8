// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::borrow::Borrow;
use std::collections::HashMap;

#[test]
fn resource_name_for_lake() {
    assert_eq!(ResourceName::lake("protos"), "lakes/protos");
}

#[test]
fn operation_name_is_scoped_under_resource() {
    let id_gen = SequentialIdGen::new("build");
    let name = OperationName::generate(&ResourceName::lake("protos"), &id_gen);
    assert_eq!(name, "lakes/protos/operations/build-1");
}

#[test]
fn operation_names_are_unique() {
    let resource = ResourceName::lake("protos");
    let a = OperationName::generate(&resource, &UuidIdGen);
    let b = OperationName::generate(&resource, &UuidIdGen);
    assert_ne!(a, b);
    assert!(a.as_str().starts_with("lakes/protos/operations/"));
}

#[test]
fn ids_work_as_hash_map_keys_by_str() {
    let mut map = HashMap::new();
    map.insert(ResourceName::lake("a"), 1);
    assert_eq!(map.get("lakes/a"), Some(&1));

    let name = OperationName::new("x");
    let borrowed: &str = name.borrow();
    assert_eq!(borrowed, "x");
}

#[test]
fn ids_serialize_as_plain_strings() {
    let name = OperationName::new("lakes/a/operations/1");
    let json = serde_json::to_string(&name).unwrap();
    assert_eq!(json, "\"lakes/a/operations/1\"");
    let parsed: OperationName = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, name);
}

#[test]
fn sequential_gen_is_cloneable_and_shared() {
    let id_gen1 = SequentialIdGen::new("shared");
    let id_gen2 = id_gen1.clone();
    assert_eq!(id_gen1.next(), "shared-1");
    assert_eq!(id_gen2.next(), "shared-2");
}
