use rust_file_ingestion::ingestion::tabular::{parse_quoted, parse_simple, parse_tabular, TabularMode};
use rust_file_ingestion::types::TabularRow;

fn row(pairs: &[(&str, &str)]) -> TabularRow {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn parse_tabular_fixture_happy_path() {
    let input = std::fs::read_to_string("tests/fixtures/people.csv").unwrap();
    let t = parse_tabular(&input, TabularMode::Simple).unwrap();

    assert_eq!(t.headers, vec!["id", "name", "score", "active"]);
    assert_eq!(t.row_count, 2);
    assert_eq!(
        t.rows[0],
        row(&[("id", "1"), ("name", "Ada"), ("score", "98.5"), ("active", "true")])
    );
    assert_eq!(t.column("name"), vec![Some("Ada"), Some("Grace")]);
}

#[test]
fn parse_tabular_small_table() {
    let t = parse_simple("a,b\n1,2\n3,4");
    assert_eq!(t.headers, vec!["a", "b"]);
    assert_eq!(t.row_count, 2);
    assert_eq!(t.rows, vec![row(&[("a", "1"), ("b", "2")]), row(&[("a", "3"), ("b", "4")])]);
}

#[test]
fn row_count_always_matches_rows() {
    for input in ["", "h", "h\n", "h\n1\n2\n3", "a,b\n\n1,2"] {
        let t = parse_simple(input);
        assert_eq!(t.row_count, t.rows.len(), "input={input:?}");
    }
}

#[test]
fn blank_interior_line_becomes_row_with_empty_first_cell() {
    let t = parse_simple("a,b\n\n1,2");
    assert_eq!(t.row_count, 2);
    assert_eq!(t.rows[0], row(&[("a", "")]));
}

#[test]
fn quoted_mode_matches_simple_mode_on_plain_input() {
    let input = std::fs::read_to_string("tests/fixtures/people.csv").unwrap();
    assert_eq!(parse_quoted(&input).unwrap(), parse_simple(&input));
}
