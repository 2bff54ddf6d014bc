use search_core::DocumentStatus;
use searcher::{collect_input_files, load_engine, replay_queries, write_match, write_search};
use serde_json::Value;
use std::fs;
use std::io::Cursor;
use tempfile::tempdir;

fn build_tiny_corpus(dir: &std::path::Path) {
    fs::create_dir_all(dir.join("nested")).unwrap();
    fs::write(
        dir.join("docs.jsonl"),
        concat!(
            r#"{"id": 0, "text": "white cat and cool collar", "ratings": [8, -3]}"#, "\n",
            "\n",
            r#"{"id": 1, "text": "fluffy cat fluffy tail", "ratings": [7, 2, 7]}"#, "\n",
        ),
    )
    .unwrap();
    fs::write(
        dir.join("nested/more.json"),
        r#"[{"id": 2, "body": "groomed dog beautiful eyes", "ratings": [5, -12, 2, 1]},
            {"id": 3, "text": "groomed cat", "status": "banned"}]"#,
    )
    .unwrap();
    fs::write(dir.join("notes.txt"), "not a document").unwrap();
}

#[test]
fn loads_json_and_jsonl_from_directory() {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());
    assert_eq!(collect_input_files(dir.path()).len(), 2);

    let engine = load_engine(dir.path(), Some("and in on")).unwrap();
    assert_eq!(engine.document_count(), 4);
    assert_eq!(engine.document_status(3), Some(DocumentStatus::Banned));
    assert!(engine.postings("and").is_none());
}

#[test]
fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());
    let engine = load_engine(dir.path(), Some("and in on")).unwrap();

    let mut out = Vec::new();
    let hits = write_search(&engine, "fluffy groomed cat", DocumentStatus::Actual, 2, true, &mut out).unwrap();
    let json: Value = serde_json::from_slice(&out).unwrap();
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), hits.len());
    assert_eq!(arr[0]["id"].as_i64().unwrap(), 1);
    assert_eq!(arr[0]["rating"].as_i64().unwrap(), 5);

    let mut text = Vec::new();
    write_search(&engine, "fluffy groomed cat", DocumentStatus::Actual, 2, false, &mut text).unwrap();
    let text = String::from_utf8(text).unwrap();
    assert_eq!(text.matches("Page break").count(), 2);
    assert!(text.starts_with("{ document_id = 1,"));
}

#[test]
fn match_reports_words_and_status() {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());
    let engine = load_engine(dir.path(), None).unwrap();

    let mut out = Vec::new();
    let matched = write_match(&engine, "groomed cat -dog", 3, false, &mut out).unwrap();
    assert_eq!(matched.words, vec!["cat".to_string(), "groomed".to_string()]);
    assert_eq!(matched.status, DocumentStatus::Banned);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "{ document_id = 3, status = BANNED, words = cat groomed }\n"
    );
    assert!(write_match(&engine, "cat", 42, true, &mut Vec::new()).is_err());
}

#[test]
fn rejects_duplicate_ids_with_location() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("dup.jsonl");
    fs::write(&file, "{\"id\": 1, \"text\": \"a\"}\n{\"id\": 1, \"text\": \"b\"}\n").unwrap();
    let err = load_engine(&file, None).unwrap_err();
    assert!(format!("{err:#}").contains("dup.jsonl:2"));
}

#[test]
fn rejects_malformed_json_array_element_with_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("broken.json");
    fs::write(&file, r#"[{"id": 0, "text": "cat"}, {"id": "one", "text": "dog"}]"#).unwrap();
    let err = load_engine(&file, None).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("broken.json: malformed document"), "{msg}");
}

#[test]
fn replay_counts_empty_requests_in_window() {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());
    let engine = load_engine(dir.path(), Some("and in on")).unwrap();

    let queries = "cat\nmissing\n\nmissing words\ncat --dog\ndog\n";
    let summary = replay_queries(&engine, Cursor::new(queries), DocumentStatus::Actual, 3).unwrap();
    assert_eq!(summary.requests, 5);
    assert_eq!(summary.rejected, 1);
    // Window keeps "missing", "missing words", "dog".
    assert_eq!(summary.no_result_requests, 2);
}
