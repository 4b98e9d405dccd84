use std::path::Path;

use werbench::analyze::{run_analysis, AnalyzeRequest};
use werbench::corpus::write_transcript;
use werbench::evaluate::{run_evaluation, EvaluateRequest, ModelSpec};
use werbench::extract::import_metadata;

fn spec(name: &str, dir: &Path) -> ModelSpec {
    ModelSpec {
        name: name.to_owned(),
        dir: dir.to_path_buf(),
    }
}

#[test]
fn evaluate_then_analyze_end_to_end() {
    let tmp = tempfile::TempDir::new().expect("tempdir");
    let root = tmp.path();

    let ground_truth = root.join("ground-truth");
    let model_dir = root.join("xtts");
    write_transcript(&ground_truth, "a", "hello world").expect("write");
    write_transcript(&ground_truth, "b", "the quick brown fox").expect("write");
    write_transcript(&ground_truth, "c", "good morning everyone").expect("write");
    write_transcript(&model_dir, "a", "hello word").expect("write");
    write_transcript(&model_dir, "b", "the quick brown fox").expect("write");
    write_transcript(&model_dir, "c", "good morning everyone").expect("write");

    let evaluation = run_evaluation(&EvaluateRequest {
        ground_truth_dir: ground_truth,
        models: vec![spec("xtts", &model_dir)],
        output_dir: root.join("results"),
    })
    .expect("evaluate");

    assert_eq!(evaluation.rows, 3);
    let table = std::fs::read_to_string(&evaluation.table_path).expect("read table");
    assert!(table.starts_with("id,ground_truth,xtts,wer\n"));
    assert!(table.contains("a,hello world,hello word,0.5\n"));

    let analysis = run_analysis(&AnalyzeRequest {
        input_dir: root.join("results"),
        output_dir: root.join("analysis"),
    })
    .expect("analyze");

    assert_eq!(analysis.models, 1);
    let json = std::fs::read_to_string(&analysis.json_path).expect("read json");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("parse json");
    assert_eq!(parsed[0]["model"], "xtts");
    assert_eq!(parsed[0]["count"], 3);
    // WER values are [0.5, 0, 0]: mean 1/6 rounded to 4 places.
    assert_eq!(parsed[0]["metrics"]["mean"], 0.1667);
    assert_eq!(parsed[0]["rating"], "good");

    let report = std::fs::read_to_string(&analysis.report_path).expect("read report");
    assert!(report.contains("MODEL: xtts"));
    assert!(report.contains("Overall rating: GOOD"));
}

#[test]
fn missing_model_outputs_flow_through_as_no_data() {
    let tmp = tempfile::TempDir::new().expect("tempdir");
    let root = tmp.path();

    let ground_truth = root.join("ground-truth");
    let good_dir = root.join("good");
    let silent_dir = root.join("silent");
    std::fs::create_dir_all(&silent_dir).expect("silent dir");
    write_transcript(&ground_truth, "a", "hello world").expect("write");
    write_transcript(&good_dir, "a", "hello world").expect("write");

    let evaluation = run_evaluation(&EvaluateRequest {
        ground_truth_dir: ground_truth,
        models: vec![spec("good", &good_dir), spec("silent", &silent_dir)],
        output_dir: root.join("results"),
    })
    .expect("evaluate");

    assert_eq!(evaluation.models[1].scored, 0);
    assert_eq!(evaluation.models[1].missing, 1);
    assert_eq!(evaluation.models[1].mean_wer, None);

    let analysis = run_analysis(&AnalyzeRequest {
        input_dir: root.join("results"),
        output_dir: root.join("analysis"),
    })
    .expect("analyze");
    assert_eq!(analysis.models, 2);

    let comparison =
        std::fs::read_to_string(&analysis.comparison_path).expect("read comparison");
    assert!(comparison.contains("good,combined_wer.csv,1,excellent,"));
    assert!(comparison.contains("silent,combined_wer.csv,0,no_data,"));

    let json = std::fs::read_to_string(&analysis.json_path).expect("read json");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("parse json");
    assert_eq!(parsed[1]["model"], "silent");
    assert!(parsed[1]["metrics"].is_null());
}

#[test]
fn full_pipeline_is_deterministic() {
    let tmp = tempfile::TempDir::new().expect("tempdir");
    let root = tmp.path();

    let ground_truth = root.join("ground-truth");
    let model_dir = root.join("model");
    for (id, reference, hypothesis) in [
        ("1", "alpha beta gamma", "alpha beta gamma"),
        ("2", "delta epsilon", "delta"),
        ("3", "zeta eta theta iota", "zeta eta theta"),
    ] {
        write_transcript(&ground_truth, id, reference).expect("write");
        write_transcript(&model_dir, id, hypothesis).expect("write");
    }

    let evaluate_request = EvaluateRequest {
        ground_truth_dir: ground_truth,
        models: vec![spec("model", &model_dir)],
        output_dir: root.join("results"),
    };
    let analyze_request = AnalyzeRequest {
        input_dir: root.join("results"),
        output_dir: root.join("analysis"),
    };

    let mut snapshots = Vec::new();
    for _ in 0..2 {
        let evaluation = run_evaluation(&evaluate_request).expect("evaluate");
        let analysis = run_analysis(&analyze_request).expect("analyze");
        snapshots.push((
            std::fs::read(&evaluation.table_path).expect("table bytes"),
            std::fs::read(&analysis.comparison_path).expect("comparison bytes"),
            std::fs::read(&analysis.report_path).expect("report bytes"),
            std::fs::read(&analysis.json_path).expect("json bytes"),
        ));
    }

    assert_eq!(snapshots[0], snapshots[1]);
}

#[test]
fn metadata_import_feeds_evaluation() {
    let tmp = tempfile::TempDir::new().expect("tempdir");
    let root = tmp.path();

    let metadata = root.join("transcriptAll.txt");
    std::fs::write(
        &metadata,
        "LJ001|hello world|hello world\nLJ002|good morning|good morning\n",
    )
    .expect("write metadata");

    let summary =
        import_metadata(&metadata, &root.join("ground-truth"), None).expect("import");
    assert_eq!(summary.imported, 2);

    let model_dir = root.join("model");
    write_transcript(&model_dir, "1", "hello world").expect("write");
    write_transcript(&model_dir, "2", "good evening").expect("write");

    let evaluation = run_evaluation(&EvaluateRequest {
        ground_truth_dir: root.join("ground-truth"),
        models: vec![spec("model", &model_dir)],
        output_dir: root.join("results"),
    })
    .expect("evaluate");

    assert_eq!(evaluation.rows, 2);
    assert_eq!(evaluation.models[0].mean_wer, Some(0.25));
}
