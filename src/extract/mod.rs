//! Document extraction
//!
//! Fan-out over pluggable extractors that turn a raw source into documents
//! with metadata. A separate subsystem from the planning core; it shares the
//! process but the core does not depend on it.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Free-form document metadata
pub type DocumentMetadata = BTreeMap<String, serde_json::Value>;

/// One extracted document with its merged metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub document: String,
    pub metadata: DocumentMetadata,
}

/// Pluggable extractor boundary
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, source: &str, additional_metadata: Option<&DocumentMetadata>) -> Vec<ExtractedDocument>;
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Wrap a source as a single document, stamping `extracted_at` and merging
/// any caller-provided metadata over it
pub fn to_documents(source: &str, additional_metadata: Option<&DocumentMetadata>) -> Vec<ExtractedDocument> {
    let mut metadata = DocumentMetadata::new();
    metadata.insert("extracted_at".to_string(), serde_json::json!(unix_now()));

    if let Some(additional) = additional_metadata {
        for (key, value) in additional {
            metadata.insert(key.clone(), value.clone());
        }
    }

    vec![ExtractedDocument {
        document: source.to_string(),
        metadata,
    }]
}

/// Passthrough extractor: the source is the document
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleDocumentExtractor;

impl DocumentExtractor for SimpleDocumentExtractor {
    fn extract(&self, source: &str, additional_metadata: Option<&DocumentMetadata>) -> Vec<ExtractedDocument> {
        to_documents(source, additional_metadata)
    }
}

/// Fan-out over a set of extractors, concatenating their results in order
pub struct ExtractorSet {
    extractors: Vec<Box<dyn DocumentExtractor>>,
}

impl ExtractorSet {
    pub fn new(extractors: Vec<Box<dyn DocumentExtractor>>) -> Self {
        Self { extractors }
    }
}

impl Default for ExtractorSet {
    fn default() -> Self {
        Self::new(vec![Box::new(SimpleDocumentExtractor)])
    }
}

impl DocumentExtractor for ExtractorSet {
    fn extract(&self, source: &str, additional_metadata: Option<&DocumentMetadata>) -> Vec<ExtractedDocument> {
        self.extractors
            .iter()
            .flat_map(|e| e.extract(source, additional_metadata))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_documents_stamps_extracted_at() {
        let docs = to_documents("hello", None);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].document, "hello");
        assert!(docs[0].metadata.contains_key("extracted_at"));
    }

    #[test]
    fn test_additional_metadata_merged_over_universal() {
        let mut extra = DocumentMetadata::new();
        extra.insert("source".to_string(), serde_json::json!("handbook"));
        extra.insert("extracted_at".to_string(), serde_json::json!(42));

        let docs = to_documents("hello", Some(&extra));
        assert_eq!(docs[0].metadata["source"], serde_json::json!("handbook"));
        // Caller-provided values win over the universal stamp
        assert_eq!(docs[0].metadata["extracted_at"], serde_json::json!(42));
    }

    #[test]
    fn test_extractor_set_fans_out() {
        let set = ExtractorSet::new(vec![
            Box::new(SimpleDocumentExtractor),
            Box::new(SimpleDocumentExtractor),
        ]);
        let docs = set.extract("doc", None);
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_default_set_is_passthrough() {
        let docs = ExtractorSet::default().extract("doc", None);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].document, "doc");
    }
}
