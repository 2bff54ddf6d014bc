use anyhow::{Context, Result};
use search_core::timing::LogDuration;
use search_core::{DocId, Document, DocumentStatus, RequestQueue, SearchEngine};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub mod paginator;

pub use paginator::{paginate, Page, Paginator};

/// Environment variable consulted when no stop words are given on the command line.
pub const STOP_WORDS_ENV: &str = "SEARCHER_STOP_WORDS";

#[derive(Debug, Deserialize)]
pub struct InputDoc {
    pub id: DocId,
    #[serde(alias = "body")]
    pub text: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub ratings: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct MatchOutput {
    pub doc_id: DocId,
    pub words: Vec<String>,
    pub status: DocumentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub requests: usize,
    pub rejected: usize,
    pub no_result_requests: usize,
}

/// Stop words from the flag if present, else from the environment.
pub fn resolve_stop_words(flag: Option<String>) -> Option<String> {
    flag.or_else(|| std::env::var(STOP_WORDS_ENV).ok())
}

/// JSON and JSONL files under `input`, sorted so ingestion order is stable.
pub fn collect_input_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
        files.sort();
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

/// Build an engine from every document under `input`. Stop words are applied first so
/// they take effect for all documents.
pub fn load_engine(input: &Path, stop_words: Option<&str>) -> Result<SearchEngine> {
    let _timer = LogDuration::new("load_engine");
    let mut engine = match stop_words {
        Some(text) => SearchEngine::from_stop_words_text(text)?,
        None => SearchEngine::new(),
    };

    let files = collect_input_files(input);
    anyhow::ensure!(!files.is_empty(), "no .json or .jsonl input found at {}", input.display());
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            ingest_jsonl(&file, &mut engine)?;
        } else {
            ingest_json(&file, &mut engine)?;
        }
    }
    tracing::info!(num_docs = engine.document_count(), "ingested documents");
    Ok(engine)
}

fn ingest_jsonl(file: &Path, engine: &mut SearchEngine) -> Result<()> {
    let reader = BufReader::new(File::open(file).with_context(|| format!("opening {}", file.display()))?);
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: malformed document", file.display(), line_no + 1))?;
        ingest_doc(doc, engine).with_context(|| format!("{}:{}", file.display(), line_no + 1))?;
    }
    Ok(())
}

fn ingest_json(file: &Path, engine: &mut SearchEngine) -> Result<()> {
    let reader = BufReader::new(File::open(file).with_context(|| format!("opening {}", file.display()))?);
    let json: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("parsing {}", file.display()))?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                let doc: InputDoc = serde_json::from_value(v)
                    .with_context(|| format!("{}: malformed document", file.display()))?;
                ingest_doc(doc, engine).with_context(|| file.display().to_string())?;
            }
        }
        serde_json::Value::Object(_) => {
            let doc: InputDoc = serde_json::from_value(json)
                .with_context(|| format!("{}: malformed document", file.display()))?;
            ingest_doc(doc, engine).with_context(|| file.display().to_string())?;
        }
        _ => tracing::warn!(file = %file.display(), "skipping input that is neither an object nor an array"),
    }
    Ok(())
}

fn ingest_doc(doc: InputDoc, engine: &mut SearchEngine) -> Result<()> {
    engine.add_document(doc.id, &doc.text, doc.status, &doc.ratings)?;
    Ok(())
}

/// Run one query and write its hits, `page_size` per page.
pub fn write_search<W: Write>(
    engine: &SearchEngine,
    query: &str,
    status: DocumentStatus,
    page_size: usize,
    json: bool,
    out: &mut W,
) -> Result<Vec<Document>> {
    let hits = {
        let _timer = LogDuration::new("find_top_documents");
        engine.find_top_documents_by_status(query, status)?
    };
    if json {
        serde_json::to_writer(&mut *out, &hits)?;
        writeln!(out)?;
        return Ok(hits);
    }
    let pages = paginate(&hits, page_size)?;
    for page in &pages {
        writeln!(out, "{page}")?;
        writeln!(out, "Page break")?;
    }
    Ok(hits)
}

pub fn write_match<W: Write>(
    engine: &SearchEngine,
    query: &str,
    doc_id: DocId,
    json: bool,
    out: &mut W,
) -> Result<MatchOutput> {
    let (words, status) = engine.match_document(query, doc_id)?;
    let output = MatchOutput { doc_id, words, status };
    if json {
        serde_json::to_writer(&mut *out, &output)?;
        writeln!(out)?;
    } else {
        writeln!(
            out,
            "{{ document_id = {}, status = {}, words = {} }}",
            output.doc_id,
            output.status,
            output.words.join(" ")
        )?;
    }
    Ok(output)
}

/// Feed every non-blank line of `queries` through a request window of `capacity`.
/// Rejected queries are logged and skipped.
pub fn replay_queries<R: BufRead>(
    engine: &SearchEngine,
    queries: R,
    status: DocumentStatus,
    capacity: usize,
) -> Result<ReplaySummary> {
    let _timer = LogDuration::new("replay_queries");
    let mut queue = RequestQueue::with_capacity(engine, capacity)?;
    let mut summary = ReplaySummary { requests: 0, rejected: 0, no_result_requests: 0 };
    for line in queries.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        summary.requests += 1;
        if let Err(err) = queue.add_find_request_by_status(&line, status) {
            tracing::warn!(query = %line, %err, "query rejected");
            summary.rejected += 1;
        }
    }
    summary.no_result_requests = queue.no_result_requests();
    Ok(summary)
}
