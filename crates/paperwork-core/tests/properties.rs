//! Property-based tests for autofill and validation.
//!
//! These tests check the engine's invariants over generated schemas and
//! profiles using proptest.

use proptest::prelude::*;

use paperwork_core::{
    autofill, normalize_key, resolve, validate, FieldDescriptor, FieldKind, FieldSchema,
    FieldSource, IssueReason, ResolvedField, UserProfile,
};

/// Field names built from a small vocabulary so that names and profile keys
/// collide often.
fn field_name() -> impl Strategy<Value = String> {
    let word = prop::sample::select(vec![
        "name", "first", "last", "email", "phone", "address", "line", "city", "zip", "date",
        "birth", "country",
    ]);
    let separator = prop::sample::select(vec![" ", "_", "-", ".", " - "]);
    (
        prop::collection::vec(word, 1..4),
        separator,
        any::<bool>(),
    )
        .prop_map(|(words, sep, upper)| {
            let joined = words.join(sep);
            if upper {
                joined.to_uppercase()
            } else {
                joined
            }
        })
}

fn field_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z0-9 ]{1,12}",
        Just("true".to_string()),
        Just("2024-02-29".to_string()),
    ]
}

fn field_kind() -> impl Strategy<Value = FieldKind> {
    prop_oneof![
        Just(FieldKind::text()),
        Just(FieldKind::Date),
        Just(FieldKind::Checkbox),
        Just(FieldKind::choice(["USA", "Canada"])),
    ]
}

/// Schemas with unique names
fn schema_strategy() -> impl Strategy<Value = FieldSchema> {
    prop::collection::btree_map(field_name(), (field_kind(), field_value(), any::<bool>()), 0..8)
        .prop_map(|fields| {
            fields
                .into_iter()
                .map(|(name, (kind, value, required))| FieldDescriptor {
                    name,
                    kind,
                    value,
                    required,
                })
                .collect()
        })
}

fn profile_strategy() -> impl Strategy<Value = UserProfile> {
    prop::collection::btree_map(field_name(), "[a-zA-Z0-9]{1,10}", 0..8).prop_map(UserProfile::from)
}

/// Date strings with in-range digits, valid or not
fn date_parts() -> impl Strategy<Value = (i32, u32, u32)> {
    (1000i32..=9999, 1u32..=12, 1u32..=31)
}

fn is_leap(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

proptest! {
    /// Property: autofill never empties a field and never changes a filled one.
    #[test]
    fn prop_autofill_only_fills_blanks(schema in schema_strategy(), profile in profile_strategy()) {
        let resolved = autofill(&schema, &profile).unwrap();

        prop_assert_eq!(resolved.len(), schema.len());
        let filled_before = schema.filled_count();
        let filled_after = resolved.iter().filter(|f| !f.field.is_blank()).count();
        prop_assert!(filled_after >= filled_before);

        for (original, result) in schema.iter().zip(&resolved) {
            prop_assert_eq!(&original.name, &result.field.name);
            if !original.is_blank() {
                prop_assert_eq!(&original.value, &result.field.value);
                prop_assert_eq!(result.source, FieldSource::Existing);
            }
        }
    }

    /// Property: autofill applied to its own output changes no value.
    #[test]
    fn prop_autofill_is_idempotent(schema in schema_strategy(), profile in profile_strategy()) {
        let first = autofill(&schema, &profile).unwrap();
        let refilled: FieldSchema = first.iter().map(|f| f.field.clone()).collect();
        let second = autofill(&refilled, &profile).unwrap();

        let first_values: Vec<&str> = first.iter().map(ResolvedField::value).collect();
        let second_values: Vec<&str> = second.iter().map(ResolvedField::value).collect();
        prop_assert_eq!(first_values, second_values);
    }

    /// Property: an exact normalized key match fills the field with that value.
    #[test]
    fn prop_exact_match_fills(name in field_name(), value in "[a-zA-Z0-9]{1,10}", kind in field_kind()) {
        let key = normalize_key(&name).to_uppercase().replace('_', " ");
        let profile = UserProfile::new().with(key, value.clone());
        let schema = FieldSchema::new(vec![FieldDescriptor::new(name, kind)]);

        let resolved = autofill(&schema, &profile).unwrap();

        prop_assert_eq!(resolved[0].value(), value.as_str());
        prop_assert_eq!(resolved[0].source, FieldSource::Profile);
    }

    /// Property: two distinct keys both contained in the field name never fill it.
    #[test]
    fn prop_ambiguous_partial_never_fills(a in "[a-z]{3,6}", b in "[a-z]{3,6}", v1 in "[a-z]{1,5}", v2 in "[a-z]{1,5}") {
        prop_assume!(normalize_key(&a) != normalize_key(&b));
        prop_assume!(!a.contains(&b) && !b.contains(&a));

        let field = format!("{a} {b} field");
        let profile = UserProfile::new().with(a, v1).with(b, v2);
        let schema = FieldSchema::new(vec![FieldDescriptor::text(field)]);

        let resolved = autofill(&schema, &profile).unwrap();

        prop_assert_eq!(resolved[0].source, FieldSource::Unfilled);
        prop_assert_eq!(resolved[0].value(), "");
    }

    /// Property: every calendar date written as YYYY-MM-DD validates; impossible days do not.
    #[test]
    fn prop_date_validity_matches_calendar((year, month, day) in date_parts()) {
        let value = format!("{year:04}-{month:02}-{day:02}");
        let fields = vec![ResolvedField::as_is(FieldDescriptor::date("d").with_value(value))];

        let issues = validate(&fields);

        if day <= days_in_month(year, month) {
            prop_assert!(issues.is_empty());
        } else {
            prop_assert_eq!(issues.len(), 1);
            prop_assert_eq!(issues[0].reason, IssueReason::InvalidFormat);
        }
    }

    /// Property: validation yields at most one issue per field, in input order.
    #[test]
    fn prop_at_most_one_issue_per_field(schema in schema_strategy()) {
        let fields: Vec<ResolvedField> = schema.iter().cloned().map(ResolvedField::as_is).collect();

        let issues = validate(&fields);

        prop_assert!(issues.len() <= fields.len());
        let mut last = None;
        for issue in &issues {
            let position = fields.iter().position(|f| f.name() == issue.field_name);
            prop_assert!(position.is_some());
            prop_assert!(position > last);
            last = position;
        }
    }

    /// Property: resolve has no hidden state.
    #[test]
    fn prop_resolve_is_deterministic(schema in schema_strategy(), profile in profile_strategy()) {
        let first = resolve(&schema, &profile).unwrap();
        let second = resolve(&schema, &profile).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_all_filled_well_formed_set_has_no_issues() {
    let schema = FieldSchema::new(vec![
        FieldDescriptor::text("Full Name").required(),
        FieldDescriptor::date("Start Date").required(),
        FieldDescriptor::checkbox("Agree").required(),
        FieldDescriptor::choice("Country", ["USA", "Canada"]).required(),
    ]);
    let profile = UserProfile::new()
        .with("full name", "Ada Lovelace")
        .with("start-date", "2024-02-29")
        .with("AGREE", "false")
        .with("country", "USA");

    let (fields, issues) = resolve(&schema, &profile).unwrap();

    assert!(fields.iter().all(|f| f.source == FieldSource::Profile));
    assert!(issues.is_empty());
}
