//! End-to-end purify and reconcile runs over in-memory input sets.

use purifier_core::{run_purify, run_reconcile};
use purifier_model::{
    BufferKind, InputSet, InputSetSource, LabelStyle, OutputBuffer, PurifierOptions,
    ReconcileSchema, RunOutcome, SetError, SourceSet,
};

fn input(name: &str, headers: &[&str], rows: &[&[&str]]) -> InputSetSource {
    InputSet::from_records(
        name,
        headers.iter().map(|header| (*header).to_string()).collect(),
        rows.iter().map(|row| row.to_vec()),
    )
    .into()
}

fn emails(name: &str, values: &[&str]) -> InputSetSource {
    let rows: Vec<&[&str]> = values.iter().map(std::slice::from_ref).collect();
    input(name, &["Email"], &rows)
}

fn artifact<'r>(artifacts: &'r [OutputBuffer], file_name: &str) -> &'r OutputBuffer {
    artifacts
        .iter()
        .find(|buffer| buffer.file_name == file_name && buffer.archive.is_none())
        .unwrap_or_else(|| panic!("missing artifact {file_name}"))
}

fn column(buffer: &OutputBuffer, name: &str) -> Vec<String> {
    let idx = buffer
        .columns
        .iter()
        .position(|column| column == name)
        .expect("column present");
    buffer.rows.iter().map(|row| row[idx].clone()).collect()
}

#[test]
fn reconcile_keeps_records_exclusive_to_each_side() {
    let result = run_reconcile(
        vec![emails("a.csv", &["x@gmail.com", "y@yahoo.com"])],
        vec![emails("b.csv", &["x@gmail.com", "z@gmail.com"])],
        &PurifierOptions::default(),
    )
    .expect("reconcile");

    let comparison = result.comparison.as_ref().expect("comparison");
    assert_eq!(comparison.overlap_count, 1);
    assert_eq!(comparison.overlap_samples[0].email, "x@gmail.com");

    let unique_a = artifact(&result.artifacts, "unique_file_A.csv");
    let unique_b = artifact(&result.artifacts, "unique_file_B.csv");
    let combined = artifact(&result.artifacts, "unique_combined.csv");
    assert_eq!(unique_a.columns, vec!["First Name", "Last Name", "Email"]);
    assert_eq!(column(unique_a, "Email"), vec!["y@yahoo.com"]);
    assert_eq!(column(unique_b, "Email"), vec!["z@gmail.com"]);
    assert_eq!(column(combined, "Email"), vec!["y@yahoo.com", "z@gmail.com"]);
    assert_eq!(column(combined, "First Name"), vec!["Applicant", "Applicant"]);
    assert_eq!(result.outcome, RunOutcome::Complete);
}

#[test]
fn typo_domain_is_corrected_and_counted() {
    let result = run_purify(
        vec![emails("one.csv", &["john@gamil.com"])],
        &PurifierOptions::default(),
    )
    .expect("purify");
    assert_eq!(result.stats.corrected, 1);
    assert_eq!(result.stats.valid, 1);
    let cleaned = artifact(&result.artifacts, "cleaned_one.csv");
    assert_eq!(column(cleaned, "Email"), vec!["john@gmail.com"]);
}

#[test]
fn twelve_thousand_records_split_into_three_chunks() {
    let values: Vec<String> = (0..12_000).map(|i| format!("user{i}@example.com")).collect();
    let refs: Vec<&str> = values.iter().map(String::as_str).collect();
    let result = run_purify(
        vec![emails("big.csv", &refs)],
        &PurifierOptions::default().with_batching(true),
    )
    .expect("purify");

    let chunks: Vec<&OutputBuffer> = result.artifacts.iter().filter(|b| b.is_chunk()).collect();
    let sizes: Vec<usize> = chunks.iter().map(|chunk| chunk.row_count()).collect();
    assert_eq!(sizes, vec![4999, 4999, 2002]);
    assert_eq!(chunks[0].file_name, "SDP-1-4999 Data Import.csv");
    assert_eq!(chunks[2].file_name, "SDP-9999-12000 Data Import.csv");
    assert!(chunks.iter().all(|chunk| chunk.archive.as_deref() == Some("cleaned_data_archive")));
    assert_eq!(chunks[1].rows[0][1], "user4999@example.com");
}

#[test]
fn thousands_labels_name_chunk_files() {
    let values: Vec<String> = (0..6).map(|i| format!("u{i}@example.com")).collect();
    let refs: Vec<&str> = values.iter().map(String::as_str).collect();
    let mut options = PurifierOptions::default().with_batching(true).with_chunk_size(4);
    options.batch.label_style = LabelStyle::Thousands;
    options.batch.file_prefix = "LIST".to_string();
    let result = run_purify(vec![emails("small.csv", &refs)], &options).expect("purify");
    let names: Vec<&str> = result
        .artifacts
        .iter()
        .filter(|buffer| buffer.is_chunk())
        .map(|buffer| buffer.file_name.as_str())
        .collect();
    assert_eq!(names, vec!["LIST-1-5 Data Import.csv", "LIST-5-10 Data Import.csv"]);
}

#[test]
fn missing_email_column_rejects_the_set_only() {
    let result = run_purify(
        vec![
            input("names.csv", &["Full Name", "Contact"], &[&["Ann", "x"], &["Bob", "y"]]),
            emails("ok.csv", &["a@example.com"]),
        ],
        &PurifierOptions::default(),
    )
    .expect("purify");

    let rejected = &result.input_sets[0];
    assert!(matches!(rejected.error, Some(SetError::MissingEmailColumn { .. })));
    assert_eq!(rejected.stats.valid, 0);
    assert_eq!(rejected.stats.invalid, rejected.stats.total);
    assert_eq!(result.stats.total, 3);
    assert_eq!(result.stats.valid, 1);
    assert!(result.stats.is_balanced());
}

#[test]
fn duplicates_across_input_sets_are_merged() {
    let result = run_purify(
        vec![
            emails("first.csv", &["Ann@Example.com", "bob@example.com"]),
            emails("second.csv", &["ann@example.com", "cy@example.com"]),
        ],
        &PurifierOptions::default().with_export_rejected(true),
    )
    .expect("purify");

    assert_eq!(result.stats.duplicates, 1);
    let merged = artifact(&result.artifacts, "merged_purified_data.csv");
    assert_eq!(merged.kind, BufferKind::Merged);
    assert_eq!(
        column(merged, "Email"),
        vec!["Ann@example.com", "bob@example.com", "cy@example.com"]
    );
    assert_eq!(
        column(artifact(&result.artifacts, "cleaned_second.csv"), "Email"),
        vec!["cy@example.com"]
    );
    let rejected = artifact(&result.artifacts, "rejected_records.csv");
    assert_eq!(rejected.rows, vec![vec![
        String::new(),
        "ann@example.com".to_string(),
        String::new(),
        "Duplicate".to_string(),
    ]]);
}

#[test]
fn all_invalid_input_is_an_empty_outcome() {
    let result = run_purify(
        vec![emails("junk.csv", &["", "nope", "also@nope"])],
        &PurifierOptions::default(),
    )
    .expect("purify");
    assert_eq!(result.outcome, RunOutcome::Empty);
    assert!(result.artifacts.is_empty());
    assert_eq!(result.stats.invalid, 3);
}

#[test]
fn contact_names_come_from_the_leftmost_name_column() {
    let result = run_reconcile(
        vec![input(
            "a.csv",
            &["Name", "Full Name", "Email"],
            &[&["Ann Lee", "Other Person", "ann@example.com"]],
        )],
        vec![emails("b.csv", &["bob@example.com"])],
        &PurifierOptions::default(),
    )
    .expect("reconcile");

    let unique_a = artifact(&result.artifacts, "unique_file_A.csv");
    assert_eq!(unique_a.rows, vec![vec!["Ann", "Lee", "ann@example.com"]]);
}

#[test]
fn passthrough_schema_keeps_raw_rows() {
    let result = run_reconcile(
        vec![input(
            "a.csv",
            &["Email", "City"],
            &[&["ann@example.com", "Oslo"], &["bob@example.com", "Rome"]],
        )],
        vec![input(
            "b.csv",
            &["Zip", "Email"],
            &[&["0150", "bob@example.com"], &["1000", "cy@example.com"]],
        )],
        &PurifierOptions::default().with_schema(ReconcileSchema::Passthrough),
    )
    .expect("reconcile");

    let combined = artifact(&result.artifacts, "unique_combined.csv");
    assert_eq!(combined.columns, vec!["Email", "City", "Zip"]);
    assert_eq!(
        combined.rows,
        vec![
            vec!["ann@example.com".to_string(), "Oslo".to_string(), String::new()],
            vec!["cy@example.com".to_string(), String::new(), "1000".to_string()],
        ]
    );
}

#[test]
fn reconcile_sides_dedupe_independently_and_export_rejections() {
    let result = run_reconcile(
        vec![input(
            "a.csv",
            &["Full Name", "Email"],
            &[&["Ann Lee", "ann@example.com"], &["Ann L", "ANN@example.com"], &["", "bad"]],
        )],
        vec![
            InputSetSource::Failed {
                name: "broken.csv".to_string(),
                message: "unterminated quote".to_string(),
            },
            emails("b.csv", &["dee@example.com"]),
        ],
        &PurifierOptions::default().with_export_rejected(true),
    )
    .expect("reconcile");

    assert!(result.has_parse_failures());
    assert_eq!(result.side_stats(SourceSet::A).duplicates, 1);
    assert_eq!(result.side_stats(SourceSet::B).valid, 1);

    let unique_a = artifact(&result.artifacts, "unique_file_A.csv");
    assert_eq!(
        unique_a.rows,
        vec![vec!["Ann".to_string(), "Lee".to_string(), "ann@example.com".to_string()]]
    );
    let rejected_a = artifact(&result.artifacts, "rejected_file_A.csv");
    assert_eq!(column(rejected_a, "Status"), vec!["Duplicate", "Invalid: invalid-format"]);
    assert!(
        !result
            .artifacts
            .iter()
            .any(|buffer| buffer.file_name == "rejected_file_B.csv")
    );
}

#[test]
fn full_overlap_is_an_empty_outcome() {
    let result = run_reconcile(
        vec![emails("a.csv", &["same@example.com"])],
        vec![emails("b.csv", &["SAME@example.com"])],
        &PurifierOptions::default(),
    )
    .expect("reconcile");
    assert_eq!(result.outcome, RunOutcome::Empty);
    assert!(result.artifacts.is_empty());
}

#[test]
fn purified_rows_snapshot() {
    let result = run_purify(
        vec![input(
            "people.csv",
            &["Name", "E-mail", "Mobile"],
            &[
                &["Ann", "Ann@GMAIL.co", "+1 555 0100"],
                &["Bob", "bob@example.com", "(555) 0101"],
                &["Ann Again", "ann@gmail.com", ""],
            ],
        )],
        &PurifierOptions::default(),
    )
    .expect("purify");
    let cleaned = artifact(&result.artifacts, "cleaned_people.csv");
    let rendered: Vec<String> = std::iter::once(cleaned.columns.join(","))
        .chain(cleaned.rows.iter().map(|row| row.join(",")))
        .collect();
    insta::assert_snapshot!(rendered.join("\n"), @r"
    Name,Email,Phone
    Ann,Ann@gmail.com,+15550100
    Bob,bob@example.com,5550101
    ");
}
