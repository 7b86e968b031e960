//! Raw search records to uniform [`RetrievedChunk`] lists.

use crate::types::RetrievedChunk;
use serde_json::Value;

/// Backend-specific relevance score field.
const SCORE_FIELD: &str = "@search.score";

/// Map raw result records into uniform chunks, preserving input order.
///
/// Missing or mistyped fields fall back to their defaults; extra fields
/// are ignored. This never fails, never re-orders, never deduplicates.
pub fn normalize(records: &[Value]) -> Vec<RetrievedChunk> {
    records.iter().map(normalize_record).collect()
}

fn normalize_record(record: &Value) -> RetrievedChunk {
    RetrievedChunk {
        title: str_field(record, "title"),
        chunk: str_field(record, "chunk"),
        chunk_id: str_field(record, "chunk_id"),
        parent_id: str_field(record, "parent_id"),
        score: record.get(SCORE_FIELD).and_then(Value::as_f64).unwrap_or(0.0),
    }
}

fn str_field(record: &Value, name: &str) -> String {
    record
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_complete_record() {
        let records = vec![json!({
            "title": "travel.pdf",
            "chunk": "Employees may book economy flights.",
            "chunk_id": "c-1",
            "parent_id": "p-1",
            "@search.score": 2.5,
        })];

        let chunks = normalize(&records);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].title, "travel.pdf");
        assert_eq!(chunks[0].chunk, "Employees may book economy flights.");
        assert_eq!(chunks[0].chunk_id, "c-1");
        assert_eq!(chunks[0].parent_id, "p-1");
        assert_eq!(chunks[0].score, 2.5);
    }

    #[test]
    fn test_missing_fields_default() {
        let records = vec![json!({ "chunk": "only text" })];

        let chunks = normalize(&records);
        assert_eq!(chunks[0].title, "");
        assert_eq!(chunks[0].chunk, "only text");
        assert_eq!(chunks[0].chunk_id, "");
        assert_eq!(chunks[0].parent_id, "");
        assert_eq!(chunks[0].score, 0.0);
    }

    #[test]
    fn test_empty_record_never_fails() {
        let chunks = normalize(&[json!({})]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk, "");
        assert_eq!(chunks[0].score, 0.0);
    }

    #[test]
    fn test_mistyped_fields_default() {
        let records = vec![json!({
            "title": 17,
            "chunk": null,
            "@search.score": "high",
        })];

        let chunks = normalize(&records);
        assert_eq!(chunks[0].title, "");
        assert_eq!(chunks[0].chunk, "");
        assert_eq!(chunks[0].score, 0.0);
    }

    #[test]
    fn test_order_preserved_without_resorting() {
        // Ascending scores stay ascending: normalization must not re-rank.
        let records: Vec<Value> = (0..4)
            .map(|i| json!({ "chunk_id": format!("c-{}", i), "@search.score": i as f64 }))
            .collect();

        let chunks = normalize(&records);
        assert_eq!(chunks.len(), 4);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_id, format!("c-{}", i));
            assert_eq!(chunk.score, i as f64);
        }
    }

    #[test]
    fn test_duplicates_kept() {
        let record = json!({ "chunk_id": "same", "chunk": "dup" });
        let chunks = normalize(&[record.clone(), record]);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_id, chunks[1].chunk_id);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let records = vec![json!({
            "chunk": "text",
            "@search.rerankerScore": 3.1,
            "metadata_storage_path": "ignored",
        })];

        let chunks = normalize(&records);
        assert_eq!(chunks[0].chunk, "text");
        assert_eq!(chunks[0].score, 0.0);
    }
}
