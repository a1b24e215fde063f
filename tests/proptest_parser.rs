//! Property-based tests with proptest.
//!
//! Generate random spec fragments from the grammar's value charset and
//! verify that parsing recovers exactly the generated values: string
//! literals round-trip, arrays keep order and arity, and variable
//! bindings substitute their latest value.

use bbs::{Error, ParseErrorKind, parse_str};
use proptest::prelude::*;

/// Safe string-literal content: word characters plus the punctuators
/// and interior spaces; no quotes, `$`, or characters outside the
/// token classes.
fn literal() -> impl Strategy<Value = String> {
    "[a-z0-9+_][a-z0-9+_./, -]{0,20}[a-z0-9+_]".prop_map(|s| s)
}

/// Variable names are plain words.
fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}".prop_map(|s| s)
}

proptest! {
    #[test]
    fn string_literals_round_trip(value in literal()) {
        let spec = format!("!prj \"{value}\"\n");
        let job = parse_str(&spec).expect("parse failed");
        prop_assert_eq!(job.name(), value.as_str());
    }

    #[test]
    fn arrays_keep_order_and_arity(values in prop::collection::vec(literal(), 1..6)) {
        let elements: Vec<String> =
            values.iter().map(|v| format!("\"{v}\"")).collect();
        let spec = format!("!prj \"p\"\n!files [{}]\n", elements.join(","));
        let job = parse_str(&spec).expect("parse failed");
        let files: Vec<String> = job
            .files()
            .iter()
            .map(|f| f.display().to_string())
            .collect();
        prop_assert_eq!(files, values);
    }

    #[test]
    fn variables_substitute_their_binding(
        name in identifier(),
        value in "[a-z0-9+_]{1,12}",
    ) {
        let spec = format!("!let {name} = \"{value}\"\n!prj \"app_${name}\"\n");
        let job = parse_str(&spec).expect("parse failed");
        prop_assert_eq!(job.name(), format!("app_{value}"));
    }

    #[test]
    fn last_declaration_wins(
        name in identifier(),
        first in "[a-z0-9]{1,8}",
        second in "[a-z0-9]{1,8}",
    ) {
        let spec = format!(
            "!let {name} = \"{first}\"\n!let {name} = \"{second}\"\n!prj \"${name}\"\n"
        );
        let job = parse_str(&spec).expect("parse failed");
        prop_assert_eq!(job.name(), second.as_str());
    }

    #[test]
    fn unbound_variable_always_errors(name in identifier()) {
        let spec = format!("!prj \"${name}\"\n");
        match parse_str(&spec).unwrap_err() {
            Error::Parse(parse) => prop_assert_eq!(
                parse.kind,
                ParseErrorKind::UndeclaredVariable { name }
            ),
            other => prop_assert!(false, "expected a parse error, got {}", other),
        }
    }
}
