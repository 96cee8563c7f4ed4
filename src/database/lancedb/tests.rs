use super::*;
use crate::documents::RecordKind;

#[test]
fn embedded_vector_copies_document() {
    let document = Document {
        text: "Customer CUST_1 has average monthly sales of $40000.".to_string(),
        source: Some(DocumentSource {
            kind: RecordKind::Customer,
            record_id: "CUST_1".to_string(),
        }),
    };

    let row = EmbeddedVector::new(&document, vec![0.1, 0.2, 0.3]);

    assert_eq!(row.text, document.text);
    assert_eq!(row.source, document.source);
    assert_eq!(row.vector.len(), 3);
    assert!(Uuid::parse_str(&row.id).is_ok());
    assert!(chrono::DateTime::parse_from_rfc3339(&row.created_at).is_ok());
}

#[test]
fn embedded_vectors_get_distinct_ids() {
    let document = Document {
        text: "same text".to_string(),
        source: None,
    };

    let first = EmbeddedVector::new(&document, vec![1.0]);
    let second = EmbeddedVector::new(&document, vec![1.0]);

    assert_ne!(first.id, second.id);
}
