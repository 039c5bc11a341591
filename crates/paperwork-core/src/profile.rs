//! User profile and field-name matching
//!
//! Profile keys and field names are compared in a normalized form: lowercase,
//! with every run of non-alphanumeric characters collapsed into a single `_`
//! and separators trimmed from both ends. `"Address Line 2"`,
//! `"address-line-2"` and `"ADDRESS_LINE_2"` all normalize to
//! `"address_line_2"`.
//!
//! Matching is conservative. An exact normalized match wins. Failing that, a
//! partial match (one normalized form contained in the other) is accepted
//! only when exactly one profile key qualifies. A key with a blank value
//! still owns its exact name and stops the partial search. Everything else is a miss:
//! a blank field is recoverable, a wrong value in a legal document is not.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::schema::is_blank;

/// Normalize a field name or profile key for comparison
pub fn normalize_key(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut pending_separator = false;

    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !normalized.is_empty() {
                normalized.push('_');
            }
            pending_separator = false;
            normalized.extend(ch.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    normalized
}

/// Stored personal data as a flat key/value mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile {
    entries: BTreeMap<String, String>,
}

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for UserProfile
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for UserProfile {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }
}

impl From<HashMap<String, String>> for UserProfile {
    fn from(entries: HashMap<String, String>) -> Self {
        entries.into_iter().collect()
    }
}

/// Outcome of looking a field name up in a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileMatch<'a> {
    /// Normalized key equals the normalized field name
    Exact { key: &'a str, value: &'a str },
    /// The only key whose normalized form contains, or is contained in, the field's
    Partial { key: &'a str, value: &'a str },
    /// Several keys qualify; nothing is filled
    Ambiguous { candidates: Vec<&'a str> },
    /// The exactly matching key holds no value. Partial matches are not tried.
    Empty { key: &'a str },
    /// No key qualifies
    NoMatch,
}

impl<'a> ProfileMatch<'a> {
    /// The matched value, if the outcome is usable
    pub fn value(&self) -> Option<&'a str> {
        match self {
            ProfileMatch::Exact { value, .. } | ProfileMatch::Partial { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// The matched profile key, if the outcome is usable
    pub fn key(&self) -> Option<&'a str> {
        match self {
            ProfileMatch::Exact { key, .. } | ProfileMatch::Partial { key, .. } => Some(*key),
            _ => None,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ProfileMatch::Ambiguous { .. })
    }
}

#[derive(Debug, Clone)]
struct IndexedEntry<'a> {
    normalized: String,
    key: &'a str,
    value: &'a str,
    blank: bool,
}

/// Normalized index over a profile, built once and reused for every field
#[derive(Debug, Clone)]
pub struct ProfileResolver<'a> {
    entries: Vec<IndexedEntry<'a>>,
}

impl<'a> ProfileResolver<'a> {
    /// Index a profile. Keys that normalize to nothing are left out.
    ///
    /// Blank-valued entries stay in the index: they still claim their exact
    /// name, but never fill a field.
    pub fn new(profile: &'a UserProfile) -> Self {
        let entries = profile
            .iter()
            .filter_map(|(key, value)| {
                let normalized = normalize_key(key);
                (!normalized.is_empty()).then_some(IndexedEntry {
                    normalized,
                    key,
                    value,
                    blank: is_blank(value),
                })
            })
            .collect();

        Self { entries }
    }

    /// Number of entries that can fill a field
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| !e.blank).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Detailed lookup of a field name
    pub fn lookup(&self, field_name: &str) -> ProfileMatch<'a> {
        let target = normalize_key(field_name);
        if target.is_empty() {
            return ProfileMatch::NoMatch;
        }

        let (exact, exact_blank): (Vec<&IndexedEntry<'a>>, Vec<&IndexedEntry<'a>>) = self
            .entries
            .iter()
            .filter(|e| e.normalized == target)
            .partition(|e| !e.blank);

        if exact.is_empty() {
            if let Some(empty) = exact_blank.first() {
                return ProfileMatch::Empty { key: empty.key };
            }
        }

        if let Some(first) = exact.first() {
            // "First Name" and "first_name" may both exist; they only count
            // as one match when they agree.
            if exact.iter().all(|e| e.value == first.value) {
                return ProfileMatch::Exact {
                    key: first.key,
                    value: first.value,
                };
            }
            return ProfileMatch::Ambiguous {
                candidates: exact.iter().map(|e| e.key).collect(),
            };
        }

        let partial: Vec<&IndexedEntry<'a>> = self
            .entries
            .iter()
            .filter(|e| !e.blank)
            .filter(|e| {
                target.contains(e.normalized.as_str()) || e.normalized.contains(target.as_str())
            })
            .collect();

        match partial.as_slice() {
            [] => ProfileMatch::NoMatch,
            [only] => ProfileMatch::Partial {
                key: only.key,
                value: only.value,
            },
            many => ProfileMatch::Ambiguous {
                candidates: many.iter().map(|e| e.key).collect(),
            },
        }
    }

    /// Matched value for a field name, if any
    pub fn resolve(&self, field_name: &str) -> Option<&'a str> {
        self.lookup(field_name).value()
    }
}

/// Match a single field name against a profile.
///
/// Builds a throwaway index; use [`ProfileResolver`] when matching many names.
pub fn match_profile<'a>(field_name: &str, profile: &'a UserProfile) -> Option<&'a str> {
    ProfileResolver::new(profile).resolve(field_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Address Line 2"), "address_line_2");
        assert_eq!(normalize_key("address-line--2"), "address_line_2");
        assert_eq!(normalize_key("  E-Mail Address: "), "e_mail_address");
        assert_eq!(normalize_key("ZIP"), "zip");
        assert_eq!(normalize_key("---"), "");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn test_exact_match_ignores_case_and_separators() {
        let profile = UserProfile::new().with("address_line_2", "Apt 4B");
        assert_eq!(match_profile("Address Line 2", &profile), Some("Apt 4B"));
        assert_eq!(match_profile("ADDRESS-LINE-2", &profile), Some("Apt 4B"));
    }

    #[test]
    fn test_exact_match_wins_over_partial() {
        let profile = UserProfile::new()
            .with("name", "Ada Lovelace")
            .with("first_name", "Ada")
            .with("last_name", "Lovelace");
        let resolver = ProfileResolver::new(&profile);

        assert_eq!(
            resolver.lookup("First Name"),
            ProfileMatch::Exact {
                key: "first_name",
                value: "Ada"
            }
        );
        assert_eq!(resolver.resolve("Name"), Some("Ada Lovelace"));
    }

    #[test]
    fn test_unambiguous_partial_match() {
        let profile = UserProfile::new()
            .with("email", "ada@example.com")
            .with("phone", "+44 20 7946 0000");
        let resolver = ProfileResolver::new(&profile);

        // key contained in field
        assert_eq!(
            resolver.lookup("Email Address"),
            ProfileMatch::Partial {
                key: "email",
                value: "ada@example.com"
            }
        );
        // field contained in key
        let profile = UserProfile::new().with("home_phone_number", "555-0100");
        assert_eq!(match_profile("Phone", &profile), Some("555-0100"));
    }

    #[test]
    fn test_ambiguous_partial_match_fills_nothing() {
        let profile = UserProfile::new()
            .with("home_phone", "555-0100")
            .with("work_phone", "555-0199");
        let resolver = ProfileResolver::new(&profile);

        let outcome = resolver.lookup("Phone");
        assert!(outcome.is_ambiguous());
        assert_eq!(outcome.value(), None);
        assert_eq!(
            outcome,
            ProfileMatch::Ambiguous {
                candidates: vec!["home_phone", "work_phone"]
            }
        );
    }

    #[test]
    fn test_conflicting_exact_keys_are_ambiguous() {
        let profile = UserProfile::new()
            .with("First Name", "Ada")
            .with("first_name", "Augusta");
        assert_eq!(match_profile("first name", &profile), None);

        let agreeing = UserProfile::new()
            .with("First Name", "Ada")
            .with("first_name", "Ada");
        assert_eq!(match_profile("first name", &agreeing), Some("Ada"));
    }

    #[test]
    fn test_unusable_entries_are_skipped() {
        let profile = UserProfile::new()
            .with("---", "punctuation only")
            .with("email", "   ");
        let resolver = ProfileResolver::new(&profile);

        assert!(resolver.is_empty());
        assert_eq!(resolver.lookup("Email"), ProfileMatch::Empty { key: "email" });
        assert_eq!(resolver.lookup("Phone"), ProfileMatch::NoMatch);
    }

    #[test]
    fn test_blank_exact_key_blocks_partial_match() {
        let profile = UserProfile::new()
            .with("email", "")
            .with("work_email", "boss@corp.example");
        let resolver = ProfileResolver::new(&profile);

        assert_eq!(resolver.len(), 1);
        assert_eq!(resolver.lookup("Email"), ProfileMatch::Empty { key: "email" });
        assert_eq!(resolver.resolve("Email"), None);
        assert_eq!(resolver.resolve("Work Email"), Some("boss@corp.example"));
    }

    #[test]
    fn test_blank_exact_key_defers_to_filled_twin() {
        let profile = UserProfile::new()
            .with("First Name", " ")
            .with("first_name", "Ada");
        assert_eq!(match_profile("first name", &profile), Some("Ada"));
    }

    #[test]
    fn test_unnormalizable_field_name_never_matches() {
        let profile = UserProfile::new().with("name", "Ada");
        assert_eq!(match_profile("???", &profile), None);
    }

    #[test]
    fn test_no_match() {
        let profile = UserProfile::new().with("email", "ada@example.com");
        assert_eq!(
            ProfileResolver::new(&profile).lookup("Passport Number"),
            ProfileMatch::NoMatch
        );
    }

    #[test]
    fn test_profile_from_iterator_is_ordered() {
        let profile: UserProfile = vec![("zip", "12345"), ("city", "Springfield")]
            .into_iter()
            .collect();
        let keys: Vec<&str> = profile.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["city", "zip"]);
    }
}
