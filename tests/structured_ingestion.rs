use rust_file_ingestion::ingestion::structured::parse_structured;
use rust_file_ingestion::ingestion::{parse_file_content, InMemorySource, IngestionOptions};
use rust_file_ingestion::types::{FileDescriptor, ParseOutcome};

#[test]
fn parse_json_fixture_happy_path() {
    let input = std::fs::read_to_string("tests/fixtures/people.json").unwrap();
    let v = parse_structured(&input).unwrap();

    let items = v.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["user"]["name"], "Ada");
    assert_eq!(items[1]["score"], 87.25);
}

#[tokio::test]
async fn malformed_json_becomes_failure_outcome() {
    let d = FileDescriptor::new("broken.json", 9, "application/json");
    let src = InMemorySource::from("{\"a\": 1,");
    let outcome = parse_file_content(&d, &src, &IngestionOptions::default()).await;

    match outcome {
        ParseOutcome::Failure { error_message } => {
            assert!(error_message.starts_with("Failed to parse file: "));
            assert!(error_message.len() > "Failed to parse file: ".len());
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn trailing_garbage_is_rejected() {
    let d = FileDescriptor::new("x.json", 6, "application/json");
    let src = InMemorySource::from("{} {}");
    let outcome = parse_file_content(&d, &src, &IngestionOptions::default()).await;
    assert!(!outcome.is_success());
}
