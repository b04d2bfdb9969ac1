use std::path::Path;
use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_ballot-watch");

fn ballot_watch(dir: &Path, args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("BALLOT_LOG_LEVEL", "warn")
        .output()
        .expect("binary runs")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 stdout")
}

const EXERCISE: &str = r#"{
    "ballot_date": "201602",
    "output_stem": "sample",
    "blocks": [
        { "block": "108A", "contract": "C7", "flat_types": ["4-Room"] },
        { "block": "107A", "contract": "C7", "flat_types": ["3-Room", "4-Room"] }
    ],
    "expected_counts": { "3-Room": 1, "4-Room": 3 }
}"#;

const TABLE: &str = "block,flat_type,unit_no,floor,stack,status,size,cost\r\n\
107A,3-Room,#02-101,02,101,booked,,\r\n\
107A,4-Room,#02-102,02,102,booked,,\r\n\
107A,4-Room,#02-103,02,103,available,93 sqm,\"$305,000\"\r\n\
108A,4-Room,#05-101,05,101,available,93 sqm,\"$310,000\"\r\n";

#[test]
fn stats_recomputes_log_from_saved_table() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("exercise.json"), EXERCISE).expect("exercise");
    std::fs::write(dir.path().join("sample.csv"), TABLE).expect("table");

    let output = ballot_watch(
        dir.path(),
        &["stats", "--csv", "sample.csv", "--exercise", "exercise.json"],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let log = stdout(&output);
    let body: Vec<&str> = log.lines().skip(1).collect();
    assert_eq!(
        body,
        vec![
            "Health check",
            "###OK###",
            "",
            "Cumulative Selected Stats",
            "\t3-Room: 1/1 (100.00%) selected",
            "\t4-Room: 1/3 (33.33%) selected",
            "",
            "Per Block Selected Stats",
            "\t107A",
            "\t3-Room: 1/1 (100.00%) selected",
            "\t4-Room: 1/2 (50.00%) selected",
            "",
            "\t108A",
            "\t4-Room: 0/1 (0.00%) selected",
            "",
        ]
    );
}

#[test]
fn stats_against_preset_reports_mismatch() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("sample.csv"), TABLE).expect("table");

    let output = ballot_watch(
        dir.path(),
        &["stats", "--csv", "sample.csv", "--preset", "bidadari-2016-02"],
    );
    assert!(output.status.success());

    let log = stdout(&output);
    assert!(log.contains("\tTotal retrieved flats did not match expected count."));
    assert!(!log.contains("###OK###"));
}

#[test]
fn parse_prints_units_with_assigned_cohort() {
    let dir = tempfile::tempdir().expect("tempdir");
    let page = r##"<div id="blockDetails">
        <div class="row"></div><div class="row"></div>
        <div class="row"></div><div class="row"></div>
        <div class="row"><table><tr>
            <td><font>#04-118</font></td>
            <td><a href="#"><font id="#04-119" title="$250,000____________________68 sqm">#04-119</font></a></td>
        </tr></table></div>
    </div>"##;
    std::fs::write(dir.path().join("page.html"), page).expect("page");

    let output = ballot_watch(
        dir.path(),
        &["parse", "--html", "page.html", "--block", "114B", "--flat-type", "3-Room"],
    );
    assert!(output.status.success());

    let units: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json");
    let units = units.as_array().expect("array");
    assert_eq!(units.len(), 2);
    assert_eq!(units[0]["booked"], true);
    assert_eq!(units[0]["unit_no"], "#04-118");
    assert_eq!(units[1]["block"], "114B");
    assert_eq!(units[1]["cost"], "$250,000");
    assert_eq!(units[1]["size"], "68 sqm");
    assert_eq!(units[1]["floor"], "04");
}

#[test]
fn unknown_preset_exits_with_application_error() {
    let dir = tempfile::tempdir().expect("tempdir");

    let output = ballot_watch(dir.path(), &["scrape", "--preset", "punggol-2020"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("application error: exercise error: unknown preset 'punggol-2020'"));
    assert_eq!(std::fs::read_dir(dir.path()).expect("list").count(), 0);
}
