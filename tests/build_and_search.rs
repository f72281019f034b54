//! End-to-end tests: build an index directory, then query it.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bidx::analysis::{AnalysisConfig, Analyzer};
use bidx::index::{DOCS_FILE, POSTINGS_FILE, PostingsReader, TERMS_FILE};
use bidx::prelude::*;
use proptest::prelude::*;
use tempfile::TempDir;

fn analysis(stemming: bool) -> AnalysisConfig {
    let mut analysis = AnalysisConfig {
        stemming,
        ..AnalysisConfig::default()
    };
    analysis.tokenizer.min_len = 1;
    analysis
}

/// Write `texts` as document files plus a document list and metadata table.
fn write_corpus(dir: &Path, texts: &[&str]) -> (PathBuf, PathBuf) {
    let mut list = String::new();
    let mut metadata = String::from("doc_id\turl\tsource\tlang\ttitle\textra\n");
    for (i, text) in texts.iter().enumerate() {
        let path = dir.join(format!("doc{i}.txt"));
        fs::write(&path, text).unwrap();
        list.push_str(&format!("{}\n", path.display()));
        metadata.push_str(&format!("{i}\thttps://example.org/{i}\tweb\tru\tTitle {i}\t-\n"));
    }

    let docs_list = dir.join("docs.txt");
    let metadata_path = dir.join("meta.tsv");
    fs::write(&docs_list, list).unwrap();
    fs::write(&metadata_path, metadata).unwrap();
    (docs_list, metadata_path)
}

fn build(dir: &Path, texts: &[&str], chunk_pairs: usize) -> Result<(PathBuf, BuildReport)> {
    let (docs_list, metadata) = write_corpus(dir, texts);
    let out_dir = dir.join("index");
    let options = BuildOptions {
        docs_list,
        metadata,
        out_dir: out_dir.clone(),
        config: IndexBuilderConfig {
            analysis: analysis(false),
            chunk_pairs,
        },
    };
    let report = build_index(&options)?;
    Ok((out_dir, report))
}

fn open(index: &Path) -> Result<SearchEngine> {
    SearchEngine::open_dir(
        index,
        SearchConfig {
            analysis: analysis(false),
            ..SearchConfig::default()
        },
    )
}

#[test]
fn test_cyrillic_scenario() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let (index, report) = build(temp_dir.path(), &["кот и пёс", "кот", "собака"], 1000)?;

    assert_eq!(report.documents, 3);
    assert_eq!(report.terms, 4);
    assert_eq!(report.pairs, 5);

    let storage = FileStorage::open(&index, StorageConfig::default())?;
    let lexicon = Lexicon::read(&storage, TERMS_FILE)?;
    let terms: Vec<&str> = lexicon.iter().map(|entry| entry.term.as_str()).collect();
    assert_eq!(terms, vec!["и", "кот", "пес", "собака"]);

    let mut postings = PostingsReader::open(&storage, POSTINGS_FILE)?;
    let entry = lexicon.get("кот").unwrap();
    assert_eq!(postings.read(entry)?, vec![0, 1]);

    let mut engine = open(&index)?;
    assert_eq!(engine.matches("кот & пёс")?, vec![0]);
    assert_eq!(engine.matches("кот | собака")?, vec![0, 1, 2]);

    let results = engine.search("кот | собака", 20)?;
    assert_eq!(results.total_hits, 3);
    assert_eq!(results.hits[0].url, "https://example.org/0");
    assert_eq!(results.hits[2].title, "Title 2");
    Ok(())
}

#[test]
fn test_only_final_stores_remain() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let (index, report) = build(temp_dir.path(), &["a b c", "b c d", "c d e", "a e"], 2)?;
    assert!(report.runs > 1);

    let mut names: Vec<String> = fs::read_dir(&index)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec![DOCS_FILE, POSTINGS_FILE, TERMS_FILE]);
    Ok(())
}

#[test]
fn test_duplicate_terms_index_once() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let (index, report) = build(temp_dir.path(), &["кот кот кот", "Кот КОТ"], 1)?;
    assert_eq!(report.terms, 1);
    assert_eq!(report.pairs, 2);

    let mut engine = open(&index)?;
    assert_eq!(engine.matches("кот")?, vec![0, 1]);
    Ok(())
}

#[test]
fn test_boolean_operators_over_index() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let (index, _) = build(
        temp_dir.path(),
        &["a c", "b", "c", "a b", "d"],
        3,
    )?;
    let mut engine = open(&index)?;

    assert_eq!(engine.matches("!a")?, vec![1, 2, 4]);
    assert_eq!(engine.matches("(a|b)&!c")?, vec![1, 3]);
    assert_eq!(engine.matches("a & b")?, engine.matches("a b")?);
    assert_eq!(engine.matches("a&b")?, vec![3]);
    assert!(engine.matches("missing")?.is_empty());
    assert_eq!(engine.matches("!missing")?, vec![0, 1, 2, 3, 4]);
    Ok(())
}

#[test]
fn test_limit_caps_hits_not_total() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let (index, _) = build(temp_dir.path(), &["x", "x", "x", "x"], 1000)?;
    let mut engine = open(&index)?;

    let results = engine.search("x", 2)?;
    assert_eq!(results.total_hits, 4);
    assert_eq!(
        results.hits.iter().map(|hit| hit.doc_id).collect::<Vec<_>>(),
        vec![0, 1]
    );
    Ok(())
}

#[test]
fn test_parse_and_evaluation_errors() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let (index, _) = build(temp_dir.path(), &["a", "b"], 1000)?;
    let mut engine = open(&index)?;

    assert_eq!(engine.matches("(a | b").unwrap_err().exit_code(), 5);
    assert_eq!(engine.matches("a | b)").unwrap_err().exit_code(), 5);
    assert_eq!(engine.matches("a &").unwrap_err().exit_code(), 6);
    assert_eq!(engine.matches("").unwrap_err().exit_code(), 6);
    Ok(())
}

#[test]
fn test_empty_document_list() {
    let temp_dir = TempDir::new().unwrap();
    let docs_list = temp_dir.path().join("docs.txt");
    fs::write(&docs_list, "\n\n").unwrap();
    let out_dir = temp_dir.path().join("index");

    let err = build_index(&BuildOptions {
        docs_list,
        metadata: temp_dir.path().join("meta.tsv"),
        out_dir: out_dir.clone(),
        config: IndexBuilderConfig::default(),
    })
    .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::EmptyCorpus));
    assert_eq!(err.exit_code(), 3);
    assert!(!out_dir.exists());
}

#[test]
fn test_missing_metadata_fails_in_metadata_stage() {
    let temp_dir = TempDir::new().unwrap();
    let (docs_list, metadata) = write_corpus(temp_dir.path(), &["a"]);
    fs::remove_file(&metadata).unwrap();

    let err = build_index(&BuildOptions {
        docs_list,
        metadata,
        out_dir: temp_dir.path().join("index"),
        config: IndexBuilderConfig::default(),
    })
    .unwrap_err();
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn test_unreadable_document_keeps_its_id() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let (docs_list, metadata) = write_corpus(temp_dir.path(), &["a", "gone", "b"]);
    fs::remove_file(temp_dir.path().join("doc1.txt")).unwrap();

    let out_dir = temp_dir.path().join("index");
    let report = build_index(&BuildOptions {
        docs_list,
        metadata,
        out_dir: out_dir.clone(),
        config: IndexBuilderConfig {
            analysis: analysis(false),
            ..IndexBuilderConfig::default()
        },
    })?;
    assert_eq!(report.documents, 3);

    let mut engine = open(&out_dir)?;
    assert_eq!(engine.matches("b")?, vec![2]);
    assert_eq!(engine.matches("!a")?, vec![1, 2]);
    Ok(())
}

#[test]
fn test_truncated_lexicon_fails_to_load() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let (index, _) = build(temp_dir.path(), &["a b c"], 1000)?;

    let terms = index.join(TERMS_FILE);
    let bytes = fs::read(&terms).unwrap();
    fs::write(&terms, &bytes[..bytes.len() - 3]).unwrap();

    let err = open(&index).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::LoadLexicon));
    assert_eq!(err.exit_code(), 2);
    Ok(())
}

/// Brute-force term to documents map using the same analysis.
fn model(texts: &[String], analyzer: &Analyzer) -> BTreeMap<String, BTreeSet<DocId>> {
    let mut model: BTreeMap<String, BTreeSet<DocId>> = BTreeMap::new();
    for (doc, text) in texts.iter().enumerate() {
        for term in analyzer.analyze(text) {
            model.entry(term).or_default().insert(doc as DocId);
        }
    }
    model
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_merge_matches_brute_force(
        docs in prop::collection::vec(
            prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "dd", "ёж", "ель", "x1"]), 0..8),
            1..12,
        ),
        chunk_pairs in 1usize..6,
    ) {
        let texts: Vec<String> = docs.iter().map(|words| words.join(" ")).collect();
        let config = IndexBuilderConfig { analysis: analysis(false), chunk_pairs };
        let analyzer = Analyzer::from_config(&config.analysis).unwrap();

        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut builder = IndexBuilder::new(storage.clone(), config).unwrap();
        builder.add_source(&texts).unwrap();
        let report = builder.finish().unwrap();

        let expected = model(&texts, &analyzer);
        let lexicon = Lexicon::read(storage.as_ref(), TERMS_FILE).unwrap();
        let mut postings = PostingsReader::open(storage.as_ref(), POSTINGS_FILE).unwrap();

        prop_assert_eq!(report.terms as usize, expected.len());
        prop_assert_eq!(lexicon.len(), expected.len());
        for (entry, (term, docs)) in lexicon.iter().zip(&expected) {
            prop_assert_eq!(&entry.term, term);
            let actual = postings.read(entry).unwrap();
            prop_assert_eq!(actual, docs.iter().copied().collect::<Vec<_>>());
        }
    }
}
