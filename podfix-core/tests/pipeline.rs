use camino::Utf8PathBuf;
use podfix_core::adapters::FsWritePort;
use podfix_core::pipeline::{run_patch, write_patch_artifacts, ToolError};
use podfix_core::settings::PatchSettings;
use podfix_types::report::{PodfixReport, ReportStatus, ReportToolInfo};
use podfix_types::rules::{RuleId, RuleStatus};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const PODFILE: &str = "platform :ios, '13.0'\n\ntarget 'MyApp' do\n  config = use_native_modules!\n  use_react_native!(:path => config[:reactNativePath])\nend\n";

fn tool() -> ReportToolInfo {
    ReportToolInfo {
        name: "podfix".to_string(),
        version: "0.0.0-test".to_string(),
    }
}

/// Creates an Expo project with `ios/MyApp.xcodeproj`, `ios/Podfile` and `app.json`.
fn create_project(podfile: &str, sdk: Option<&str>) -> (TempDir, Utf8PathBuf) {
    let temp = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8 path");

    fs::create_dir_all(root.join("ios/MyApp.xcodeproj")).unwrap();
    fs::create_dir_all(root.join("ios/Pods.xcodeproj")).unwrap();
    fs::write(root.join("ios/Podfile"), podfile).unwrap();

    let app_json = match sdk {
        Some(v) => format!(r#"{{ "expo": {{ "name": "my-app", "sdkVersion": "{v}" }} }}"#),
        None => r#"{ "expo": { "name": "my-app" } }"#.to_string(),
    };
    fs::write(root.join("app.json"), app_json).unwrap();

    (temp, root)
}

fn settings(root: &Utf8PathBuf) -> PatchSettings {
    PatchSettings {
        project_root: root.clone(),
        ..PatchSettings::default()
    }
}

fn read_podfile(root: &Utf8PathBuf) -> String {
    fs::read_to_string(root.join("ios/Podfile")).unwrap()
}

#[test]
fn dry_run_discovers_inputs_and_reports_pending_changes() {
    let (_temp, root) = create_project(PODFILE, Some("48.0.0"));
    let outcome = run_patch(&settings(&root), tool()).expect("run");

    let report = &outcome.report;
    assert_eq!(report.target.podfile, "ios/Podfile");
    assert_eq!(report.target.project_name, "MyApp");
    assert_eq!(report.target.sdk_version.as_deref(), Some("48.0.0"));
    assert!(report.run.dry_run);
    assert!(!report.target.written);
    assert_eq!(report.verdict.status, ReportStatus::Warn);
    assert_eq!(report.verdict.counts.applied, 3);
    assert_eq!(report.verdict.counts.not_applicable, 1);
    assert_eq!(report.target.patch_bytes, outcome.patch.len() as u64);
    assert!(!outcome.policy_block);

    assert!(outcome.patch.contains("+  use_expo_modules!"));
    assert_eq!(read_podfile(&root), PODFILE);
}

#[test]
fn apply_writes_and_second_run_passes() {
    let (_temp, root) = create_project(PODFILE, Some("52.0.0"));
    let apply = PatchSettings {
        dry_run: false,
        ..settings(&root)
    };

    let first = run_patch(&apply, tool()).expect("first run");
    assert!(first.report.target.written);
    assert_eq!(
        first.report.target.backup.as_deref(),
        Some("ios/Podfile.podfix.bak")
    );
    assert_eq!(first.report.verdict.status, ReportStatus::Pass);
    assert!(read_podfile(&root).contains("use_native_modules!(config_command)"));

    let second = run_patch(&apply, tool()).expect("second run");
    assert!(!second.report.target.written);
    assert_eq!(second.patch, "");
    assert_eq!(second.report.verdict.status, ReportStatus::Pass);
    assert_eq!(second.report.verdict.counts.applied, 0);
    assert_eq!(
        second.report.target.sha256_before,
        second.report.target.sha256_after
    );
}

#[test]
fn overrides_take_precedence_over_discovery() {
    let podfile = "target 'Custom' do\nend\n";
    let (_temp, root) = create_project(podfile, Some("40.0.0"));
    let s = PatchSettings {
        project_name: Some("Custom".to_string()),
        sdk_version: Some("46.0.0".to_string()),
        ..settings(&root)
    };

    let outcome = run_patch(&s, tool()).expect("run");
    assert_eq!(outcome.report.target.project_name, "Custom");
    assert_eq!(outcome.report.target.sdk_version.as_deref(), Some("46.0.0"));
    assert!(outcome.patch.contains("expo_patch_react_imports!(installer)"));
}

#[test]
fn sdk_version_falls_back_to_installed_expo() {
    let (_temp, root) = create_project(PODFILE, None);
    fs::create_dir_all(root.join("node_modules/expo")).unwrap();
    fs::write(
        root.join("node_modules/expo/package.json"),
        r#"{ "name": "expo", "version": "52.0.0-preview.3" }"#,
    )
    .unwrap();

    let outcome = run_patch(&settings(&root), tool()).expect("run");
    assert_eq!(outcome.report.target.sdk_version.as_deref(), Some("52.0.0"));
    assert!(outcome.patch.contains("use_native_modules!(config_command)"));
    assert!(!outcome.patch.contains("expo_patch_react_imports!"));
}

#[test]
fn missing_anchor_warns_without_strict() {
    let (_temp, root) = create_project("target 'Other' do\nend\n", None);
    let outcome = run_patch(&settings(&root), tool()).expect("run");

    assert!(!outcome.policy_block);
    assert_eq!(outcome.report.verdict.status, ReportStatus::Warn);
    assert_eq!(outcome.report.verdict.counts.anchor_missing, 1);
    assert!(outcome
        .report
        .verdict
        .reasons
        .iter()
        .any(|r| r.starts_with("use-expo-modules:")));
}

#[test]
fn strict_anchors_block_the_write() {
    let original = "target 'Other' do\nend\n";
    let (_temp, root) = create_project(original, Some("48.0.0"));
    let s = PatchSettings {
        dry_run: false,
        strict_anchors: true,
        ..settings(&root)
    };

    let outcome = run_patch(&s, tool()).expect("run");
    assert!(outcome.policy_block);
    assert_eq!(outcome.report.verdict.status, ReportStatus::Fail);
    assert!(!outcome.report.target.written);
    assert!(outcome.report.verdict.reasons[0].contains("anchor missing"));
    let statuses: Vec<(RuleId, RuleStatus)> = outcome
        .report
        .rules
        .iter()
        .map(|o| (o.rule, o.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            (RuleId::AutolinkRequire, RuleStatus::Applied),
            (RuleId::UseExpoModules, RuleStatus::AnchorMissing),
            (RuleId::NativeModulesConfig, RuleStatus::NotApplicable),
            (RuleId::PatchReactImports, RuleStatus::AnchorMissing),
        ]
    );
    assert_eq!(read_podfile(&root), original);
}

#[test]
fn missing_podfile_is_a_tool_error() {
    let (_temp, root) = create_project(PODFILE, None);
    fs::remove_file(root.join("ios/Podfile")).unwrap();

    let err = run_patch(&settings(&root), tool()).err().expect("error");
    assert!(matches!(err, ToolError::Internal(_)));
    assert!(err.to_string().contains("Podfile"));
}

#[test]
fn malformed_sdk_version_is_a_tool_error() {
    let (_temp, root) = create_project(PODFILE, Some("fifty"));
    let err = run_patch(&settings(&root), tool()).err().expect("error");
    assert!(err.to_string().contains("invalid SDK version 'fifty'"));
}

#[test]
fn artifacts_are_written_to_out_dir() {
    let (_temp, root) = create_project(PODFILE, Some("48.0.0"));
    let outcome = run_patch(&settings(&root), tool()).expect("run");
    let out_dir = root.join("artifacts/podfix");

    write_patch_artifacts(&outcome, &out_dir, &FsWritePort).expect("write artifacts");

    let json = fs::read_to_string(out_dir.join("report.json")).unwrap();
    let report: PodfixReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report.schema, "podfix.report.v1");
    assert_eq!(report.rules.len(), 4);

    let md = fs::read_to_string(out_dir.join("report.md")).unwrap();
    assert!(md.starts_with("# podfix report"));

    let diff = fs::read_to_string(out_dir.join("patch.diff")).unwrap();
    assert_eq!(diff, outcome.patch);
}
