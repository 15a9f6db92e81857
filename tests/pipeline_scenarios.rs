use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parquet::data_type::{ByteArray, ByteArrayType};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;
use tempfile::TempDir;
use trec_product::compression::open_reader;
use trec_product::error::{Result, TrecError};
use trec_product::pipeline::{PipelineConfig, run_pipeline};

const EXAMPLES_HEADER: &str = "query_id,query,product_id,esci_label,product_locale";

fn read_output(path: &Path) -> String {
    let mut text = String::new();
    open_reader(path)
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    text
}

fn write_examples(dir: &Path, rows: &[&str]) -> PathBuf {
    let path = dir.join("examples.csv");
    let mut text = String::from(EXAMPLES_HEADER);
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    fs::write(&path, text).unwrap();
    path
}

fn write_reference(dir: &Path, items: &[&str]) -> PathBuf {
    let path = dir.join("ucsd-asins.csv");
    let mut text = String::from("category,asin\n");
    for item in items {
        text.push_str(&format!("Electronics,{item}\n"));
    }
    fs::write(&path, text).unwrap();
    path
}

/// Write a Parquet file whose columns are all required UTF8 strings.
fn write_parquet(path: &Path, columns: &[&str], rows: &[Vec<String>]) {
    let fields: String = columns
        .iter()
        .map(|c| format!("REQUIRED BINARY {c} (UTF8);\n"))
        .collect();
    let schema = Arc::new(parse_message_type(&format!("message rows {{\n{fields}}}")).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();
    let mut row_group = writer.next_row_group().unwrap();

    for index in 0..columns.len() {
        let mut col = row_group.next_column().unwrap().unwrap();
        let values: Vec<ByteArray> = rows
            .iter()
            .map(|row| ByteArray::from(row[index].as_str()))
            .collect();
        col.typed::<ByteArrayType>()
            .write_batch(&values, None, None)
            .unwrap();
        col.close().unwrap();
    }
    assert!(row_group.next_column().unwrap().is_none());
    row_group.close().unwrap();
    writer.close().unwrap();
}

fn config(dir: &Path, examples: PathBuf, reference: PathBuf, ext: &str) -> PipelineConfig {
    PipelineConfig {
        examples,
        reference,
        queries_out: dir.join(format!("out/queries.tsv{ext}")),
        qrels_out: dir.join(format!("out/qrels.tsv{ext}")),
        ..Default::default()
    }
}

/// Five queries each judging A Exact, B and C Complement, D Substitute,
/// plus rows that must be ignored.
fn scenario_rows() -> Vec<String> {
    let mut rows = Vec::new();
    for q in 1..=5 {
        rows.push(format!("Q{q},lamp {q},A,E,us"));
        rows.push(format!("Q{q},lamp {q},B,C,us"));
        rows.push(format!("Q{q},lamp {q},C,C,us"));
        rows.push(format!("Q{q},lamp {q},D,S,us"));
    }
    // Other locale and an item outside the universe.
    rows.push("Q1,lampe,F,C,es".to_string());
    rows.push("Q2,lamp 2,Z,C,us".to_string());
    // An anchor without enough relations.
    rows.push("Q9,shade,E,E,us".to_string());
    rows.push("Q9,shade,F,S,us".to_string());
    rows
}

#[test]
fn test_scenario_outputs() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let rows = scenario_rows();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let examples = write_examples(dir.path(), &rows);
    let reference = write_reference(dir.path(), &["A", "B", "C", "D", "E", "F"]);
    let config = config(dir.path(), examples, reference, "");

    let report = run_pipeline(&config)?;

    assert_eq!(report.universe_items, 6);
    assert_eq!(report.judgments_loaded, 24);
    assert_eq!(report.usable_judgments, 22);
    assert_eq!(report.complement_edges, 10);
    assert_eq!(report.substitute_edges, 6);
    assert_eq!(report.anchor_items, 2);
    assert_eq!(report.training_items, 1);

    assert_eq!(read_output(&config.queries_out), "1C\tA\n1S\tA\n");
    assert_eq!(
        read_output(&config.qrels_out),
        "1C\t0\tB\t1\n1C\t0\tC\t1\n1S\t0\tD\t1\n"
    );
    assert_eq!(report.query_lines, 2);
    assert_eq!(report.qrel_lines, 3);
    Ok(())
}

#[test]
fn test_runs_are_byte_identical() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let rows = scenario_rows();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let examples = write_examples(dir.path(), &rows);
    let reference = write_reference(dir.path(), &["A", "B", "C", "D", "E", "F"]);

    for ext in [".zst", ".gz"] {
        let config = config(dir.path(), examples.clone(), reference.clone(), ext);

        run_pipeline(&config)?;
        let first = (fs::read(&config.queries_out)?, fs::read(&config.qrels_out)?);
        run_pipeline(&config)?;
        let second = (fs::read(&config.queries_out)?, fs::read(&config.qrels_out)?);

        assert_eq!(first, second, "outputs differ between runs for {ext}");
        assert_eq!(read_output(&config.queries_out), "1C\tA\n1S\tA\n");
    }
    Ok(())
}

#[test]
fn test_empty_dataset_succeeds_with_empty_files() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let examples = write_examples(dir.path(), &[]);
    let reference = write_reference(dir.path(), &["A"]);
    let config = config(dir.path(), examples, reference, ".zst");

    let report = run_pipeline(&config)?;
    assert_eq!(report.judgments_loaded, 0);
    assert_eq!(report.training_items, 0);
    assert_eq!(read_output(&config.queries_out), "");
    assert_eq!(read_output(&config.qrels_out), "");
    Ok(())
}

#[test]
fn test_corpus_defines_universe() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let rows = scenario_rows();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let examples = write_examples(dir.path(), &rows);

    // The corpus omits C, so only B remains as a complement of A.
    let corpus = dir.path().join("product-corpus.jsonl");
    fs::write(
        &corpus,
        ["A", "B", "D", "E", "F"]
            .iter()
            .map(|id| format!("{{\"id\": \"{id}\", \"title\": \"item {id}\"}}\n"))
            .collect::<String>(),
    )?;

    let mut config = config(dir.path(), examples, dir.path().join("absent.csv"), "");
    config.corpus = Some(corpus);

    let report = run_pipeline(&config)?;
    assert_eq!(report.universe_items, 5);
    assert_eq!(report.complement_edges, 5);
    assert_eq!(report.training_items, 1);
    assert_eq!(read_output(&config.qrels_out), "1C\t0\tB\t1\n1S\t0\tD\t1\n");
    Ok(())
}

#[test]
fn test_compressed_inputs() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let rows = scenario_rows();
    let mut text = format!("{}\n", EXAMPLES_HEADER.replace(',', "\t"));
    for row in &rows {
        text.push_str(&row.replace(',', "\t"));
        text.push('\n');
    }
    let examples = dir.path().join("examples.tsv.zst");
    fs::write(&examples, zstd::encode_all(text.as_bytes(), 0)?)?;

    let reference = dir.path().join("ucsd-asins.csv.zst");
    fs::write(&reference, zstd::encode_all(&b"asin\nA\nB\nC\nD\nE\nF\n"[..], 0)?)?;

    let config = config(dir.path(), examples, reference, "");
    let report = run_pipeline(&config)?;
    assert_eq!(report.training_items, 1);
    assert_eq!(read_output(&config.queries_out), "1C\tA\n1S\tA\n");
    Ok(())
}

#[test]
fn test_parquet_inputs() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let rows: Vec<Vec<String>> = scenario_rows()
        .iter()
        .map(|row| row.split(',').map(str::to_string).collect())
        .collect();
    let examples = dir.path().join("shopping_queries_dataset_examples.parquet");
    let columns: Vec<&str> = EXAMPLES_HEADER.split(',').collect();
    write_parquet(&examples, &columns, &rows);

    let reference = dir.path().join("ucsd-asins.parquet");
    let asins: Vec<Vec<String>> = ["A", "B", "C", "D", "E", "F"]
        .iter()
        .map(|asin| vec![asin.to_string(), "Electronics".to_string()])
        .collect();
    write_parquet(&reference, &["asin", "category"], &asins);

    let config = config(dir.path(), examples, reference, ".zst");
    let report = run_pipeline(&config)?;
    assert_eq!(report.universe_items, 6);
    assert_eq!(report.judgments_loaded, 24);
    assert_eq!(report.training_items, 1);
    assert_eq!(read_output(&config.queries_out), "1C\tA\n1S\tA\n");
    assert_eq!(
        read_output(&config.qrels_out),
        "1C\t0\tB\t1\n1C\t0\tC\t1\n1S\t0\tD\t1\n"
    );
    Ok(())
}

#[test]
fn test_zero_byte_examples_are_an_empty_dataset() -> Result<()> {
    let dir = TempDir::new().unwrap();
    let reference = write_reference(dir.path(), &["A"]);

    for name in ["examples.csv", "examples.tsv", "examples.jsonl"] {
        let examples = dir.path().join(name);
        fs::write(&examples, "")?;
        let config = config(dir.path(), examples, reference.clone(), "");

        let report = run_pipeline(&config)?;
        assert_eq!(report.judgments_loaded, 0, "{name}");
        assert_eq!(read_output(&config.queries_out), "");
        assert_eq!(read_output(&config.qrels_out), "");
    }
    Ok(())
}

#[test]
fn test_missing_reference_fails_before_output() {
    let dir = TempDir::new().unwrap();
    let examples = write_examples(dir.path(), &["Q1,lamp,A,E,us"]);
    let config = config(dir.path(), examples, dir.path().join("absent.csv.zst"), "");

    let err = run_pipeline(&config).unwrap_err();
    assert!(matches!(err, TrecError::MissingInput(_)));
    assert!(!config.queries_out.exists());
    assert!(!config.qrels_out.exists());
}

#[test]
fn test_malformed_examples_fail_the_run() {
    let dir = TempDir::new().unwrap();
    let examples = dir.path().join("examples.csv");
    fs::write(&examples, "query_id,query,product_id,esci_label\nQ1,lamp,A,E\n").unwrap();
    let reference = write_reference(dir.path(), &["A"]);
    let config = config(dir.path(), examples, reference, "");

    let err = run_pipeline(&config).unwrap_err();
    assert!(matches!(err, TrecError::DataLoad(_)));
    assert!(!config.qrels_out.exists());
}
