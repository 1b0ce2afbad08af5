use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use podfix_domain::{PatchContext, PatchEngine};
use podfix_edit::{apply_podfile, check_anchors, prepare_edit, ApplyOptions, EditError, PolicyBlockError};
use podfix_types::rules::RuleId;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const PODFILE: &str = "platform :ios, '13.0'\n\ntarget 'MyApp' do\n  config = use_native_modules!\n  use_react_native!(:path => config[:reactNativePath])\nend\n";

fn create_project(podfile: &str) -> (TempDir, Utf8PathBuf) {
    let temp = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8 path");
    fs::create_dir_all(root.join("ios")).expect("create ios dir");
    fs::write(root.join("ios/Podfile"), podfile).expect("write Podfile");
    (temp, root)
}

fn ctx(sdk: Option<&str>) -> PatchContext {
    PatchContext::parse("MyApp", sdk).expect("valid sdk")
}

fn write_opts() -> ApplyOptions {
    ApplyOptions {
        dry_run: false,
        ..ApplyOptions::default()
    }
}

#[test]
fn dry_run_leaves_podfile_untouched() {
    let (_temp, root) = create_project(PODFILE);
    let (edit, written) = apply_podfile(
        &root,
        Utf8Path::new("ios/Podfile"),
        &PatchEngine::new(),
        &ctx(Some("48.0.0")),
        &ApplyOptions::default(),
    )
    .expect("apply");

    assert!(edit.changed());
    assert!(!written.written);
    assert_eq!(written.backup, None);
    assert_eq!(fs::read_to_string(root.join("ios/Podfile")).unwrap(), PODFILE);
    assert!(!root.join("ios/Podfile.podfix.bak").exists());
}

#[test]
fn apply_writes_podfile_and_backup() {
    let (_temp, root) = create_project(PODFILE);
    let (edit, written) = apply_podfile(
        &root,
        Utf8Path::new("ios/Podfile"),
        &PatchEngine::new(),
        &ctx(Some("48.0.0")),
        &write_opts(),
    )
    .expect("apply");

    assert!(written.written);
    assert_eq!(written.backup, Some(Utf8PathBuf::from("ios/Podfile.podfix.bak")));

    let on_disk = fs::read_to_string(root.join("ios/Podfile")).unwrap();
    assert_eq!(on_disk, edit.after);
    assert!(on_disk.contains("use_expo_modules!"));
    assert!(on_disk.contains("expo_patch_react_imports!(installer)"));

    let backup = fs::read_to_string(root.join("ios/Podfile.podfix.bak")).unwrap();
    assert_eq!(backup, PODFILE);
    assert_ne!(edit.sha256_before, edit.sha256_after);
}

#[test]
fn second_apply_is_a_no_op() {
    let (_temp, root) = create_project(PODFILE);
    let engine = PatchEngine::new();
    let podfile = Utf8Path::new("ios/Podfile");

    apply_podfile(&root, podfile, &engine, &ctx(Some("52.0.0")), &write_opts()).expect("first");
    let after_first = fs::read_to_string(root.join("ios/Podfile")).unwrap();

    let (edit, written) =
        apply_podfile(&root, podfile, &engine, &ctx(Some("52.0.0")), &write_opts()).expect("second");
    assert!(!edit.changed());
    assert!(!written.written);
    assert_eq!(edit.patch(), "");
    assert_eq!(edit.sha256_before, edit.sha256_after);
    assert_eq!(fs::read_to_string(root.join("ios/Podfile")).unwrap(), after_first);
}

#[test]
fn no_backup_when_disabled() {
    let (_temp, root) = create_project(PODFILE);
    let opts = ApplyOptions {
        backup_enabled: false,
        ..write_opts()
    };
    let (_, written) = apply_podfile(
        &root,
        Utf8Path::new("ios/Podfile"),
        &PatchEngine::new(),
        &ctx(None),
        &opts,
    )
    .expect("apply");

    assert!(written.written);
    assert_eq!(written.backup, None);
    assert!(!root.join("ios/Podfile.podfix.bak").exists());
}

#[test]
fn custom_backup_suffix_is_used() {
    let (_temp, root) = create_project(PODFILE);
    let opts = ApplyOptions {
        backup_suffix: ".orig".to_string(),
        ..write_opts()
    };
    let (_, written) = apply_podfile(
        &root,
        Utf8Path::new("ios/Podfile"),
        &PatchEngine::new(),
        &ctx(None),
        &opts,
    )
    .expect("apply");

    assert_eq!(written.backup, Some(Utf8PathBuf::from("ios/Podfile.orig")));
    assert!(root.join("ios/Podfile.orig").exists());
}

#[test]
fn missing_anchor_is_written_when_not_strict() {
    let (_temp, root) = create_project("target 'Other' do\nend\n");
    let (edit, written) = apply_podfile(
        &root,
        Utf8Path::new("ios/Podfile"),
        &PatchEngine::new(),
        &ctx(None),
        &write_opts(),
    )
    .expect("apply");

    assert_eq!(edit.missing_anchors(), vec![RuleId::UseExpoModules]);
    assert!(written.written);
    let on_disk = fs::read_to_string(root.join("ios/Podfile")).unwrap();
    assert!(on_disk.contains("scripts/autolinking"));
    assert!(!on_disk.contains("use_expo_modules!"));
}

#[test]
fn strict_mode_blocks_write_on_missing_anchor() {
    let original = "target 'Other' do\nend\n";
    let (_temp, root) = create_project(original);
    let opts = ApplyOptions {
        strict_anchors: true,
        ..write_opts()
    };
    let err = apply_podfile(
        &root,
        Utf8Path::new("ios/Podfile"),
        &PatchEngine::new(),
        &ctx(None),
        &opts,
    )
    .unwrap_err();

    assert!(err.is_policy_block());
    assert_eq!(err.exit_code(), 2);
    match err {
        EditError::PolicyBlock(PolicyBlockError::AnchorMissing { rules, message }) => {
            assert_eq!(rules, vec![RuleId::UseExpoModules]);
            assert!(message.contains("target 'MyApp' do"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fs::read_to_string(root.join("ios/Podfile")).unwrap(), original);
}

#[test]
fn strict_mode_passes_clean_podfile() {
    let (_temp, root) = create_project(PODFILE);
    let edit = prepare_edit(
        &root,
        Utf8Path::new("ios/Podfile"),
        &PatchEngine::new(),
        &ctx(Some("52.0.0")),
    )
    .expect("prepare");
    let opts = ApplyOptions {
        strict_anchors: true,
        ..ApplyOptions::default()
    };
    assert!(check_anchors(&edit, &opts).is_ok());
}

#[test]
fn missing_podfile_is_a_runtime_error() {
    let temp = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8 path");
    let err = apply_podfile(
        &root,
        Utf8Path::new("ios/Podfile"),
        &PatchEngine::new(),
        &ctx(None),
        &write_opts(),
    )
    .unwrap_err();

    assert!(!err.is_policy_block());
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn patch_shows_added_lines() {
    let (_temp, root) = create_project(PODFILE);
    let edit = prepare_edit(
        &root,
        Utf8Path::new("ios/Podfile"),
        &PatchEngine::new(),
        &ctx(None),
    )
    .expect("prepare");

    let patch = edit.patch();
    assert!(patch.starts_with("diff --git a/ios/Podfile b/ios/Podfile\n"));
    assert!(patch.contains("\n+  use_expo_modules!\n"));
    assert!(patch.contains("scripts/autolinking"));
}
