//! Collaborator seams
//!
//! The engine does no I/O. Reading a document's fields, writing the filled
//! document and loading the stored profile are done by implementations of
//! these traits, which live with whatever knows the storage format.
//!
//! In-memory values implement the traits too, so tests and embedders can pass
//! a schema or profile directly.

use std::convert::Infallible;

use crate::profile::UserProfile;
use crate::schema::FieldSchema;

/// Supplies the field schema of a document
pub trait FieldExtractor {
    type Error;

    fn extract_fields(&self) -> Result<FieldSchema, Self::Error>;
}

/// Writes a filled field schema into a new document
pub trait FieldWriter {
    /// What the writer reports back, e.g. the path written
    type Output;
    type Error;

    fn write_fields(&self, schema: &FieldSchema) -> Result<Self::Output, Self::Error>;
}

/// Loads the stored user profile
pub trait ProfileStore {
    type Error;

    fn load_profile(&self) -> Result<UserProfile, Self::Error>;
}

impl FieldExtractor for FieldSchema {
    type Error = Infallible;

    fn extract_fields(&self) -> Result<FieldSchema, Self::Error> {
        Ok(self.clone())
    }
}

impl ProfileStore for UserProfile {
    type Error = Infallible;

    fn load_profile(&self) -> Result<UserProfile, Self::Error> {
        Ok(self.clone())
    }
}
