//! End-to-end merge runs against file and in-memory stores.

use std::fs;

use docmerge::error::{Error, Result};
use docmerge::{
    merge, Block, CellValue, Document, DocumentStore, FileDocumentStore, FileTabularStore,
    MailMerge, MemoryDocumentStore, MemoryTabularStore, MergeOptions, PageGeometry, Paragraph,
    Sheet, TextRun,
};
use tempfile::TempDir;

/// Document store that accepts creation but refuses every save.
struct ReadOnlyStore {
    inner: MemoryDocumentStore,
}

impl DocumentStore for ReadOnlyStore {
    fn open(&self, id: &str) -> Result<Document> {
        self.inner.open(id)
    }

    fn create(&mut self, name: &str) -> Result<Document> {
        self.inner.create(name)
    }

    fn save(&mut self, doc: &Document) -> Result<()> {
        Err(Error::Store(format!("read-only: {}", doc.name())))
    }
}

fn letter() -> Document {
    let mut doc = Document::named("Letter");
    doc.geometry = PageGeometry::a4().with_margins(36.0, 48.0, 36.0, 48.0);

    let mut greeting = Paragraph::new();
    greeting.add_text("Dear {{na");
    greeting.add_run(TextRun::bold("me}}"));
    greeting.add_text(",");
    doc.append_paragraph(greeting);
    doc.append_paragraph(Paragraph::with_text("Your balance is {{balance}}."));
    doc
}

fn write_template(dir: &TempDir, doc: &Document) -> std::path::PathBuf {
    let path = dir.path().join("letter.json");
    fs::write(&path, serde_json::to_string_pretty(doc).unwrap()).unwrap();
    path
}

#[test]
fn test_merge_csv_into_directory() {
    let dir = TempDir::new().unwrap();
    let template = write_template(&dir, &letter());
    let sheet = dir.path().join("customers.csv");
    fs::write(&sheet, "NAME,Balance\nAda,12.5\nBob,7\nCy,0\n").unwrap();
    let out = dir.path().join("out");

    let outcome = MailMerge::new()
        .with_output_dir(&out)
        .run(&template, &sheet)
        .unwrap();

    let doc = &outcome.document;
    assert_eq!(doc.name(), "Letter - customers");
    assert_eq!(doc.page_break_count(), 2);
    assert_eq!(doc.paragraph_count(), 6);
    assert_eq!(outcome.report.replacement_count, 6);
    assert_eq!(doc.geometry, letter().geometry);

    let sections = doc.sections();
    assert_eq!(sections.len(), 3);
    let first: Vec<String> = sections[0]
        .iter()
        .filter_map(Block::as_paragraph)
        .map(Paragraph::plain_text)
        .collect();
    assert_eq!(first, vec!["Dear Ada,", "Your balance is 12.5."]);
    assert!(doc.plain_text().contains("Your balance is 7."));
    assert!(doc.plain_text().contains("Dear Cy,"));

    let saved = FileDocumentStore::new(&out)
        .open("Letter - customers.json")
        .unwrap();
    assert_eq!(saved.body, doc.body);
    assert_eq!(saved.metadata.record_count, Some(3));
    assert_eq!(saved.metadata.data_set.as_deref(), Some("customers"));
}

#[test]
fn test_merge_twice_keeps_first_output() {
    let dir = TempDir::new().unwrap();
    let template = write_template(&dir, &letter());
    let sheet = dir.path().join("customers.csv");
    fs::write(&sheet, "name,balance\nAda,1\n").unwrap();

    let merge = MailMerge::new();
    let first = merge.run(&template, &sheet).unwrap();
    let second = merge.run(&template, &sheet).unwrap();

    assert_eq!(first.document.id.as_deref(), Some("Letter - customers.json"));
    assert_eq!(
        second.document.id.as_deref(),
        Some("Letter - customers (2).json")
    );
    assert!(dir.path().join("Letter - customers.json").is_file());
    assert!(dir.path().join("Letter - customers (2).json").is_file());
}

#[test]
fn test_merge_json_sheet_with_text_template() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("note.txt");
    fs::write(&template, "Hi {{name}}\nPaid: {{paid}}\n").unwrap();
    let sheet = dir.path().join("people.json");
    fs::write(
        &sheet,
        r#"[["Name", "Paid"], ["Ada", true], ["Bob", false]]"#,
    )
    .unwrap();

    let outcome = MailMerge::new().run(&template, &sheet).unwrap();

    assert_eq!(outcome.document.name(), "note - people");
    assert_eq!(
        outcome.document.plain_text(),
        "Hi Ada\n\nPaid: true\n\nHi Bob\n\nPaid: false"
    );
}

#[test]
fn test_merge_workbook_keeps_cell_text() {
    let dir = TempDir::new().unwrap();
    let fixture = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join("contacts.xlsx");
    let sheet = dir.path().join("contacts.xlsx");
    fs::copy(&fixture, &sheet).unwrap();
    let template = dir.path().join("card.txt");
    fs::write(&template, "{{name}} ({{zip}}) since {{joined}}\n").unwrap();

    let outcome = MailMerge::new().run(&template, &sheet).unwrap();

    assert_eq!(outcome.document.name(), "card - contacts");
    assert_eq!(outcome.report.record_count, 2);
    assert_eq!(
        outcome.document.plain_text(),
        "Ada (0123) since 2024-01-05\n\nBob (12.5) since 2024-01-05T12:00:00"
    );
}

#[test]
fn test_csv_values_are_merged_verbatim() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("label.txt");
    fs::write(&template, "{{zip}} / {{price}} / {{qty}}\n").unwrap();
    let sheet = dir.path().join("orders.csv");
    fs::write(&sheet, "Zip,Price,Qty\n0123,12.50,1e3\n").unwrap();

    let outcome = MailMerge::new().run(&template, &sheet).unwrap();
    assert_eq!(outcome.document.plain_text(), "0123 / 12.50 / 1e3");
}

#[test]
fn test_header_only_sheet_gives_empty_document() {
    let dir = TempDir::new().unwrap();
    let template = write_template(&dir, &letter());
    let sheet = dir.path().join("nobody.csv");
    fs::write(&sheet, "name,balance\n").unwrap();

    let outcome = MailMerge::new().run(&template, &sheet).unwrap();

    assert!(outcome.document.is_empty());
    assert_eq!(outcome.report.record_count, 0);
    assert!(dir.path().join("Letter - nobody.json").is_file());
}

#[test]
fn test_missing_template_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let sheet = dir.path().join("customers.csv");
    fs::write(&sheet, "name\nAda\n").unwrap();
    let out = dir.path().join("out");

    let result = MailMerge::new()
        .with_output_dir(&out)
        .run(dir.path().join("missing.json"), &sheet);

    assert!(matches!(result, Err(Error::DocumentNotFound(_))));
    assert!(!out.exists());
}

#[test]
fn test_strict_run_fails_before_creating_output() {
    let dir = TempDir::new().unwrap();
    let template = write_template(&dir, &letter());
    let sheet = dir.path().join("names.csv");
    fs::write(&sheet, "name\nAda\n").unwrap();
    let out = dir.path().join("out");

    let result = MailMerge::new()
        .with_output_dir(&out)
        .strict()
        .run(&template, &sheet);

    match result {
        Err(Error::UnmatchedPlaceholders(names)) => assert_eq!(names, vec!["balance"]),
        other => panic!("unexpected result: {:?}", other.map(|o| o.report)),
    }
    assert!(!out.exists());
}

#[test]
fn test_save_failure_is_reported() {
    let mut documents = ReadOnlyStore {
        inner: MemoryDocumentStore::new(),
    };
    documents.inner.insert("letter", letter());
    let mut tables = MemoryTabularStore::new();
    tables.insert(
        "sheet",
        Sheet::from_text_rows("Rows", vec![vec!["name", "balance"], vec!["Ada", "1"]]),
    );

    let result = merge::run(
        &mut documents,
        &tables,
        "letter",
        "sheet",
        &MergeOptions::new(),
    );
    assert!(matches!(result, Err(Error::Store(_))));
}

#[test]
fn test_records_keep_row_order() {
    let mut documents = MemoryDocumentStore::new();
    let mut template = Document::named("Row");
    template.append_paragraph(Paragraph::with_text("{{n}}"));
    documents.insert("row", template);

    let rows: Vec<Vec<CellValue>> = std::iter::once(vec![CellValue::from("n")])
        .chain((1..=20i64).map(|n| vec![CellValue::from(n)]))
        .collect();
    let mut tables = MemoryTabularStore::new();
    tables.insert("numbers", Sheet::new("Numbers", rows));

    let outcome = merge::run(
        &mut documents,
        &tables,
        "row",
        "numbers",
        &MergeOptions::new(),
    )
    .unwrap();

    let values: Vec<String> = outcome
        .document
        .paragraphs()
        .map(Paragraph::plain_text)
        .collect();
    let expected: Vec<String> = (1..=20).map(|n| n.to_string()).collect();
    assert_eq!(values, expected);
    assert_eq!(outcome.report.page_break_count, 19);
}

#[test]
fn test_tabular_store_resolves_relative_ids() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("people.csv"), "Name\nAda\n").unwrap();

    let store = FileTabularStore::new(dir.path());
    let (data, name) = docmerge::read_data_set(&store, "people.csv").unwrap();

    assert_eq!(name, "people");
    assert_eq!(data.headers, vec!["name"]);
    assert_eq!(data.len(), 1);
}
