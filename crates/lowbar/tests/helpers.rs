// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Object projection and shuffling through the public helpers.

use lowbar::helpers::{omit, pick, shuffle};
use serde_json::{Value, json};

#[test]
fn pick_and_omit_project_objects() {
    let object = json!({ "a": 1, "b": 2 });

    assert_eq!(Value::Object(pick(&object, &["a"])), json!({ "a": 1 }));
    assert_eq!(Value::Object(omit(&object, &["a"])), json!({ "b": 2 }));
}

#[test]
fn pick_and_omit_return_empty_for_null() {
    assert_eq!(Value::Object(pick(&Value::Null, &["a"])), json!({}));
    assert_eq!(Value::Object(omit(&Value::Null, &["a"])), json!({}));
}

#[test]
fn shuffle_of_empty_is_empty() {
    let empty: [i32; 0] = [];

    assert!(shuffle(&empty).is_empty());
}

#[test]
fn shuffle_permutes_a_copy() {
    let original = vec![1, 2, 3];

    for _ in 0..50 {
        let mut shuffled = shuffle(&original);
        assert_eq!(shuffled.len(), 3);

        shuffled.sort_unstable();
        assert_eq!(shuffled, [1, 2, 3]);
    }

    assert_eq!(original, [1, 2, 3]);
}
