// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Pure helpers over JSON values and slices.
//!
//! Object helpers take a [`serde_json::Value`] so that they accept the same loosely typed
//! input as their JavaScript counterparts: anything that is not an object yields an empty
//! map. Predicates take `Option<&Value>`, where `None` stands for an absent value.

use fastrand::Rng;
use serde_json::{Map, Value};

/// Returns the entries of `object` whose keys are listed in `keys`.
///
/// A non-object input, `null` included, yields an empty map.
///
/// # Examples
///
/// ```
/// use serde_json::json;
///
/// let picked = lowbar::helpers::pick(&json!({ "a": 1, "b": 2 }), &["a"]);
///
/// assert_eq!(serde_json::Value::Object(picked), json!({ "a": 1 }));
/// ```
#[must_use]
pub fn pick(object: &Value, keys: &[&str]) -> Map<String, Value> {
    filter_entries(object, |key| keys.contains(&key))
}

/// Returns the entries of `object` whose keys are not listed in `keys`.
///
/// A non-object input, `null` included, yields an empty map.
///
/// # Examples
///
/// ```
/// use serde_json::json;
///
/// let rest = lowbar::helpers::omit(&json!({ "a": 1, "b": 2 }), &["a"]);
///
/// assert_eq!(serde_json::Value::Object(rest), json!({ "b": 2 }));
/// ```
#[must_use]
pub fn omit(object: &Value, keys: &[&str]) -> Map<String, Value> {
    filter_entries(object, |key| !keys.contains(&key))
}

fn filter_entries(object: &Value, keep: impl Fn(&str) -> bool) -> Map<String, Value> {
    let Value::Object(entries) = object else {
        return Map::new();
    };

    entries
        .iter()
        .filter(|(key, _)| keep(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Returns a randomly permuted copy of `items`, leaving `items` unchanged.
///
/// Uses a thread-local generator. See [`shuffle_with`] for reproducible results.
#[must_use]
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_with(&mut Rng::new(), items)
}

/// Returns a copy of `items` permuted by a Fisher-Yates shuffle driven by `rng`.
///
/// # Examples
///
/// ```
/// use lowbar::helpers::shuffle_with;
///
/// let a = shuffle_with(&mut fastrand::Rng::with_seed(7), &[1, 2, 3, 4]);
/// let b = shuffle_with(&mut fastrand::Rng::with_seed(7), &[1, 2, 3, 4]);
///
/// assert_eq!(a, b);
/// ```
#[must_use]
pub fn shuffle_with<T: Clone>(rng: &mut Rng, items: &[T]) -> Vec<T> {
    let mut result = items.to_vec();
    let len = result.len();

    for index in 0..len {
        result.swap(index, rng.usize(index..len));
    }

    result
}

/// Returns `true` only for an explicit `null`.
#[must_use]
pub fn is_null(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Null))
}

/// Returns `true` for an absent value or `null`.
#[must_use]
pub fn is_nil(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Returns `true` for a number.
#[must_use]
pub fn is_number(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Number(_)))
}
