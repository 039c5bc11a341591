//! Autofill engine
//!
//! Fills blank fields from a user profile, in schema order, recording where
//! each final value came from. Values already present are never overwritten.

use tracing::{debug, warn};

use crate::error::Result;
use crate::profile::{ProfileMatch, ProfileResolver, UserProfile};
use crate::schema::{FieldDescriptor, FieldSchema, ResolvedField};

/// Fill a schema from a profile.
///
/// The schema is checked once up front; a duplicate or empty name fails the
/// whole call and nothing is returned. Neither input is modified.
pub fn autofill(schema: &FieldSchema, profile: &UserProfile) -> Result<Vec<ResolvedField>> {
    schema.check()?;

    let resolver = ProfileResolver::new(profile);
    Ok(schema
        .iter()
        .map(|field| fill_field(field, &resolver))
        .collect())
}

/// Resolve a single descriptor against a prepared profile index
pub fn fill_field(field: &FieldDescriptor, resolver: &ProfileResolver<'_>) -> ResolvedField {
    if !field.is_blank() {
        debug!(field = %field.name, "keeping existing value");
        return ResolvedField::existing(field.clone());
    }

    match resolver.lookup(&field.name) {
        ProfileMatch::Exact { key, value } | ProfileMatch::Partial { key, value } => {
            debug!(field = %field.name, profile_key = key, "filled from profile");
            ResolvedField::from_profile(field.clone().with_value(value), key)
        }
        ProfileMatch::Ambiguous { candidates } => {
            warn!(
                field = %field.name,
                candidates = ?candidates,
                "ambiguous profile match, leaving field blank"
            );
            ResolvedField::unfilled(field.clone())
        }
        ProfileMatch::Empty { key } => {
            debug!(field = %field.name, profile_key = key, "profile entry is blank");
            ResolvedField::unfilled(field.clone())
        }
        ProfileMatch::NoMatch => {
            debug!(field = %field.name, "no profile match");
            ResolvedField::unfilled(field.clone())
        }
    }
}
