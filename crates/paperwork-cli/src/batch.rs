//! Concurrent resolution of several documents
//!
//! Each document is extracted and resolved on its own blocking worker. The
//! profile and resolver are shared read-only. Results come back in input
//! order whatever order the workers finish in.

use paperwork_core::{FieldExtractor, FieldSchema, FormResolver, Resolution, UserProfile};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::debug;

use crate::error::{CliError, Result};
use crate::loader::SchemaDocument;

/// A document together with what it resolved to
#[derive(Debug, Clone)]
pub struct ResolvedDocument {
    pub document: SchemaDocument,
    pub schema: FieldSchema,
    pub resolution: Resolution,
}

fn resolve_one(
    document: SchemaDocument,
    profile: &UserProfile,
    resolver: &FormResolver,
) -> Result<ResolvedDocument> {
    let schema = document.extract_fields()?;
    let resolution = resolver.resolve(&schema, profile)?;
    Ok(ResolvedDocument {
        document,
        schema,
        resolution,
    })
}

/// Resolve every document against the same profile.
///
/// When any document fails, the error of the first failing document in input
/// order is returned.
pub async fn resolve_documents(
    documents: Vec<SchemaDocument>,
    profile: Arc<UserProfile>,
    resolver: Arc<FormResolver>,
) -> Result<Vec<ResolvedDocument>> {
    let count = documents.len();
    let mut workers = JoinSet::new();

    for (index, document) in documents.into_iter().enumerate() {
        let profile = Arc::clone(&profile);
        let resolver = Arc::clone(&resolver);
        workers.spawn_blocking(move || (index, resolve_one(document, &profile, &resolver)));
    }

    let mut slots: Vec<Option<Result<ResolvedDocument>>> = (0..count).map(|_| None).collect();
    while let Some(joined) = workers.join_next().await {
        let (index, outcome) = joined
            .map_err(|e| CliError::InternalError(format!("resolution worker failed: {}", e)))?;
        debug!(index, ok = outcome.is_ok(), "document finished");
        slots[index] = Some(outcome);
    }

    slots
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| {
                Err(CliError::InternalError(
                    "resolution worker produced no result".to_string(),
                ))
            })
        })
        .collect()
}

/// Blocking entry point: runs [`resolve_documents`] on a fresh runtime
pub fn resolve_all(
    documents: Vec<SchemaDocument>,
    profile: UserProfile,
    resolver: FormResolver,
) -> Result<Vec<ResolvedDocument>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::InternalError(format!("failed to start runtime: {}", e)))?;

    runtime.block_on(resolve_documents(
        documents,
        Arc::new(profile),
        Arc::new(resolver),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperwork_core::FieldSource;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> SchemaDocument {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        SchemaDocument::open(path).unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_results_keep_input_order() {
        let dir = TempDir::new().unwrap();
        let docs: Vec<SchemaDocument> = (0..6)
            .map(|i| {
                write(
                    &dir,
                    &format!("form{}.json", i),
                    &format!(r#"{{"fields":[{{"name":"Field {}","kind":"text"}}]}}"#, i),
                )
            })
            .collect();
        let profile = UserProfile::new().with("field 3", "three");

        let results = resolve_documents(docs, Arc::new(profile), Arc::new(FormResolver::new()))
            .await
            .unwrap();

        assert_eq!(results.len(), 6);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.resolution.fields[0].name(), format!("Field {}", i));
        }
        assert_eq!(results[3].resolution.fields[0].source, FieldSource::Profile);
    }

    #[tokio::test]
    async fn test_first_failure_in_input_order() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "good.json", r#"{"fields":[]}"#);
        let dup = write(
            &dir,
            "dup.json",
            r#"{"fields":[{"name":"A","kind":"text"},{"name":"A","kind":"date"}]}"#,
        );
        let broken = write(&dir, "broken.json", "{");

        let err = resolve_documents(
            vec![good, dup, broken],
            Arc::new(UserProfile::new()),
            Arc::new(FormResolver::new()),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CliError::Schema(_)));
    }

    #[test]
    fn test_resolve_all_empty() {
        let results = resolve_all(Vec::new(), UserProfile::new(), FormResolver::new()).unwrap();
        assert!(results.is_empty());
    }
}
