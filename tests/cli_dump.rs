use assert_cmd::Command;
use serde_json::Value;

fn dump(args: &[&str]) -> Vec<Value> {
    let config_home = tempfile::tempdir().unwrap();
    let output = Command::cargo_bin("cardstack")
        .unwrap()
        .env("XDG_CONFIG_HOME", config_home.path())
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn dump_prints_one_snapshot_per_offset() {
    // 3 case studies, 1000px viewport: reveal distance 2500
    let snaps = dump(&[
        "--category",
        "case-study",
        "--dump-at",
        "100",
        "-1250",
        "-2500",
    ]);
    assert_eq!(snaps.len(), 3);

    assert_eq!(snaps[0]["active_index"], 0);
    assert_eq!(snaps[0]["progress"], 0.0);

    assert_eq!(snaps[1]["active_index"], 1);
    assert_eq!(snaps[1]["progress"], 0.5);
    assert_eq!(snaps[1]["items"][0]["vertical_offset"], 40.0);
    assert_eq!(snaps[1]["items"][1]["opacity"], 1.0);
    assert_eq!(snaps[1]["items"][2]["interactive"], false);

    assert_eq!(snaps[2]["active_index"], 2);
}

#[test]
fn dump_respects_viewport_height() {
    let snaps = dump(&[
        "--category",
        "case-study",
        "--viewport",
        "0",
        "--dump-at",
        "-1",
    ]);
    assert_eq!(snaps[0]["progress"], 1.0);
    assert_eq!(snaps[0]["active_index"], 2);
}

#[test]
fn empty_search_result_fails_fast() {
    let config_home = tempfile::tempdir().unwrap();
    Command::cargo_bin("cardstack")
        .unwrap()
        .env("XDG_CONFIG_HOME", config_home.path())
        .args(["--search", "zzz-no-such-card", "--dump-at", "0"])
        .assert()
        .failure();
}
