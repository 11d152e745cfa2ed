use std::fs;
use std::path::PathBuf;

use purifier_ingest::{IngestError, expand_inputs, list_csv_files, load_input_sources, read_input_set};
use purifier_model::InputSetSource;

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn reads_header_and_pads_short_rows() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write(
        &dir,
        "leads.csv",
        "\u{feff}Full  Name,Email,Phone\n\nAnn, ann@example.com ,555\nBob,bob@example.com\n",
    );
    let set = read_input_set(&path).expect("read csv");
    assert_eq!(set.name, "leads.csv");
    assert_eq!(set.headers, vec!["Full Name", "Email", "Phone"]);
    assert_eq!(set.row_count(), 2);
    assert_eq!(set.rows[0].get("Email"), Some(" ann@example.com "));
    assert_eq!(set.rows[1].get("Phone"), Some(""));
    assert_eq!(set.rows[1].line, 2);
}

#[test]
fn quoted_cells_keep_commas() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write(&dir, "q.csv", "Name,Email\n\"Lee, Ann\",ann@example.com\n");
    let set = read_input_set(&path).expect("read csv");
    assert_eq!(set.rows[0].get("Name"), Some("Lee, Ann"));
}

#[test]
fn empty_file_has_no_headers_or_rows() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write(&dir, "empty.csv", "");
    let set = read_input_set(&path).expect("read csv");
    assert!(set.headers.is_empty());
    assert!(set.is_empty());
}

#[test]
fn unreadable_input_becomes_failed_source() {
    let dir = tempfile::tempdir().expect("temp dir");
    let good = write(&dir, "good.csv", "Email\na@example.com\n");
    let missing = dir.path().join("missing.csv");
    let sources = load_input_sources(&[missing, good]);
    assert!(matches!(&sources[0], InputSetSource::Failed { name, .. } if name == "missing.csv"));
    assert!(matches!(&sources[1], InputSetSource::Loaded(set) if set.row_count() == 1));
}

#[test]
fn invalid_utf8_is_a_csv_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("latin1.csv");
    fs::write(&path, b"Email\n\xff\xfe@example.com\n").expect("write file");
    let error = read_input_set(&path).unwrap_err();
    assert!(matches!(error, IngestError::Csv { .. }));
}

#[test]
fn lists_csv_files_sorted() {
    let dir = tempfile::tempdir().expect("temp dir");
    write(&dir, "b.csv", "Email\n");
    write(&dir, "a.CSV", "Email\n");
    write(&dir, "notes.txt", "ignore");
    fs::create_dir(dir.path().join("nested.csv")).expect("nested dir");

    let files = list_csv_files(dir.path()).expect("list");
    let names: Vec<String> = files
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.CSV", "b.csv"]);
}

#[test]
fn expand_inputs_mixes_files_and_directories() {
    let dir = tempfile::tempdir().expect("temp dir");
    let single = write(&dir, "single.csv", "Email\n");
    let nested = dir.path().join("more");
    fs::create_dir(&nested).expect("nested dir");
    fs::write(nested.join("x.csv"), "Email\n").expect("write file");

    let files = expand_inputs(&[single.clone(), nested.clone()]).expect("expand");
    assert_eq!(files, vec![single, nested.join("x.csv")]);

    let error = expand_inputs(&[dir.path().join("nope.csv")]).unwrap_err();
    assert!(matches!(error, IngestError::FileNotFound { .. }));
}
