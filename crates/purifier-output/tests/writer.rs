use std::fs;

use purifier_model::{
    BufferKind, InputSetResult, Mode, OutputBuffer, RunOutcome, RunResult, RunStats, SetError,
    SourceSet,
};
use purifier_output::{buffer_to_csv, write_buffers, write_run_report};

fn buffer(file_name: &str, rows: &[&[&str]]) -> OutputBuffer {
    let mut buffer = OutputBuffer::new(
        BufferKind::Cleaned,
        file_name,
        vec!["Name".to_string(), "Email".to_string(), "Phone".to_string()],
    );
    buffer.rows = rows
        .iter()
        .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
        .collect();
    buffer
}

#[test]
fn csv_quotes_cells_that_need_it() {
    let buffer = buffer(
        "cleaned_people.csv",
        &[
            &["Lee, Ann", "ann@example.com", "+15550100"],
            &["Bob \"B\"", "bob@example.com", ""],
        ],
    );
    let csv = buffer_to_csv(&buffer).expect("encode");
    insta::assert_snapshot!(csv.trim_end(), @r#"
    Name,Email,Phone
    "Lee, Ann",ann@example.com,+15550100
    "Bob ""B""",bob@example.com,
    "#);
}

#[test]
fn chunks_are_written_under_their_archive() {
    let dir = tempfile::tempdir().expect("temp dir");
    let plain = buffer("merged_purified_data.csv", &[&["Ann", "ann@example.com", ""]]);
    let chunk = buffer("SDP-1-1 Data Import.csv", &[&["Ann", "ann@example.com", ""]])
        .in_archive("cleaned_data_archive", 0);

    let written = write_buffers(dir.path(), &[plain, chunk]).expect("write");
    assert_eq!(
        written,
        vec![
            dir.path().join("merged_purified_data.csv"),
            dir.path()
                .join("cleaned_data_archive")
                .join("SDP-1-1 Data Import.csv"),
        ]
    );
    let contents = fs::read_to_string(&written[1]).expect("read back");
    assert_eq!(contents, "Name,Email,Phone\nAnn,ann@example.com,\n");
}

#[test]
fn rewriting_an_archive_drops_chunks_from_the_previous_run() {
    let dir = tempfile::tempdir().expect("temp dir");
    let first: Vec<OutputBuffer> = ["SDP-1-3 Data Import.csv", "SDP-4-6 Data Import.csv"]
        .iter()
        .enumerate()
        .map(|(index, name)| {
            buffer(name, &[&["Ann", "ann@example.com", ""]]).in_archive("cleaned_data_archive", index)
        })
        .collect();
    write_buffers(dir.path(), &first).expect("first run");
    let outside = dir.path().join("notes.txt");
    fs::write(&outside, "keep").expect("write note");

    let second = vec![
        buffer("SDP-1-5 Data Import.csv", &[&["Ann", "ann@example.com", ""]])
            .in_archive("cleaned_data_archive", 0),
    ];
    write_buffers(dir.path(), &second).expect("second run");

    let mut names: Vec<String> = fs::read_dir(dir.path().join("cleaned_data_archive"))
        .expect("list archive")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["SDP-1-5 Data Import.csv".to_string()]);
    assert!(outside.exists());
}

#[test]
fn run_report_lists_sets_and_artifacts() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut stats = RunStats::new();
    stats.record(purifier_model::RecordStatus::Valid);
    let mut loaded = InputSetResult::new("ok.csv", SourceSet::Primary);
    loaded.stats = stats;
    let result = RunResult {
        mode: Mode::Purify,
        outcome: RunOutcome::Complete,
        stats,
        input_sets: vec![
            loaded,
            InputSetResult::failed(
                "broken.csv",
                SourceSet::Primary,
                SetError::ParseFailure {
                    message: "bad quote".to_string(),
                },
            ),
        ],
        comparison: None,
        artifacts: vec![
            buffer("cleaned_ok.csv", &[&["Ann", "ann@example.com", ""]])
                .in_archive("cleaned_data_archive", 0),
        ],
    };

    let path = write_run_report(dir.path(), &result).expect("write report");
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(path).expect("read report")).expect("json");
    assert_eq!(json["mode"], "purify");
    assert_eq!(json["outcome"], "complete");
    assert_eq!(json["stats"]["valid"], 1);
    assert_eq!(json["input_sets"][1]["error"]["kind"], "parse-failure");
    assert_eq!(json["artifacts"][0]["rows"], 1);
    let artifact_path = json["artifacts"][0]["path"].as_str().expect("path");
    assert!(artifact_path.starts_with("cleaned_data_archive"));
    assert!(artifact_path.ends_with("cleaned_ok.csv"));
    assert!(json.get("comparison").is_none());
}
