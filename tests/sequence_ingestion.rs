use rust_file_ingestion::ingestion::sequence::parse_sequences;
use rust_file_ingestion::types::SequenceRecord;

#[test]
fn parse_fasta_fixture_happy_path() {
    let input = std::fs::read_to_string("tests/fixtures/spike.fasta").unwrap();
    let doc = parse_sequences(&input);

    assert_eq!(doc.count, 2);
    assert_eq!(
        doc.records[0].header,
        "MN908947.3 Severe acute respiratory syndrome coronavirus 2 isolate Wuhan-Hu-1"
    );
    assert_eq!(doc.records[0].len(), 120);
    assert!(doc.records[0].sequence.starts_with("ATTAAAGGTT"));
    assert_eq!(doc.records[1].header, "fragment_2 partial");
    assert_eq!(doc.records[1].len(), 54);
    assert_eq!(doc.total_residues(), 174);
}

#[test]
fn parse_two_short_records() {
    let doc = parse_sequences(">seq1\nACGT\nACGT\n>seq2\nTTTT");
    assert_eq!(doc.count, 2);
    assert_eq!(
        doc.records,
        vec![
            SequenceRecord::new("seq1", "ACGTACGT"),
            SequenceRecord::new("seq2", "TTTT"),
        ]
    );
}

#[test]
fn content_without_markers_has_no_records() {
    let doc = parse_sequences("ACGTACGT\nTTTT\n");
    assert_eq!(doc.count, 0);
}

#[test]
fn document_serializes_for_forwarding() {
    let doc = parse_sequences(">a\nAC");
    let v = serde_json::to_value(&doc).unwrap();
    assert_eq!(v, serde_json::json!({"records": [{"header": "a", "sequence": "AC"}], "count": 1}));
}
