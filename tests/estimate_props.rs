//! Property tests for type estimation.

use parse_it::estimate::{default_none_literals, estimate};
use proptest::prelude::*;
use serde_json::{Value, json};
use std::collections::BTreeSet;

fn est(value: Value) -> Value {
    estimate(value, &default_none_literals())
}

fn cased(word: &str, upper: &[bool]) -> String {
    word.chars()
        .zip(upper.iter().chain(std::iter::repeat(&false)))
        .map(|(c, up)| if *up { c.to_ascii_uppercase() } else { c })
        .collect()
}

proptest! {
    /// Without quotes no string can be unwrapped, so a second pass changes nothing.
    #[test]
    fn estimation_is_idempotent_without_quotes(s in "[^'\"]{0,24}") {
        let once = est(json!(s));
        let twice = est(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn estimation_is_idempotent_on_numbers(n in any::<i64>()) {
        let once = est(json!(n.to_string()));
        prop_assert_eq!(&once, &json!(n));
        prop_assert_eq!(est(once.clone()), once);
    }

    #[test]
    fn booleans_ignore_case(upper in proptest::collection::vec(any::<bool>(), 5)) {
        prop_assert_eq!(est(json!(cased("true", &upper))), json!(true));
        prop_assert_eq!(est(json!(cased("false", &upper))), json!(false));
    }

    #[test]
    fn unreadable_strings_come_back_unchanged(s in "[a-z]{1,8}:[0-9]{1,5}") {
        prop_assert_eq!(est(json!(s.clone())), json!(s));
    }

    #[test]
    fn estimation_never_panics(s in any::<String>()) {
        let _ = est(json!(s));
    }
}

#[test]
fn test_none_literal_set_is_configurable() {
    let without_empty: BTreeSet<String> = ["null", "none"].iter().map(|s| s.to_string()).collect();
    assert_eq!(estimate(json!(""), &without_empty), json!(""));
    assert_eq!(estimate(json!(""), &default_none_literals()), Value::Null);
}

#[test]
fn test_recursive_estimation() {
    assert_eq!(est(json!("['a', 1, 'True']")), json!(["a", 1, true]));
    assert_eq!(est(json!("kafka:8082")), json!("kafka:8082"));
}
