//! Tree classification and commit, driven directly over an in-memory tree.

mod common;

use common::{Harness, config, generated};
use keel_core::{
    application::{
        ApplicationError, Committer, Filesystem, Reconciliation, TreeReconciler,
    },
    domain::{IgnoreList, Plan, RelativePath},
    error::KeelError,
};

fn plan(h: &Harness) -> Plan {
    h.service.plan(&config(), h.root()).unwrap()
}

fn reconcile(h: &Harness, plan: &Plan) -> Result<Reconciliation, KeelError> {
    let ignore = IgnoreList::default();
    TreeReconciler::new(&h.fs, &ignore).reconcile(plan, h.root())
}

fn rel(path: &str) -> RelativePath {
    RelativePath::new(path)
}

#[test]
fn empty_tree_is_all_new() {
    let h = Harness::new();
    let plan = plan(&h);

    let rec = reconcile(&h, &plan).unwrap();

    assert_eq!(rec.new_files.len(), plan.file_count());
    assert!(rec.new_directories.contains(&rel("cmd/shop")));
    assert!(rec.new_directories.contains(&rel("internal/transport/http")));
    assert!(rec.foreign.is_empty());
    assert!(rec.renamed.is_empty());
}

#[test]
fn existing_directories_are_not_new() {
    let h = Harness::new();
    h.fs.create_dir_all(&h.root().join("cmd/shop")).unwrap();

    let rec = reconcile(&h, &plan(&h)).unwrap();

    assert!(!rec.new_directories.contains(&rel("cmd/shop")));
    assert!(!rec.new_directories.contains(&rel("cmd")));
    assert!(rec.new_directories.contains(&rel("config")));
}

#[test]
fn planned_exempt_file_is_not_read() {
    let h = Harness::new();
    h.seed("config/settings.json", "not a generated file at all");

    let rec = reconcile(&h, &plan(&h)).unwrap();

    assert!(!rec.new_files.contains(&rel("config/settings.json")));
    assert!(!rec.user_content.contains_key(&rel("config/settings.json")));
}

#[test]
fn unplanned_exempt_file_is_foreign() {
    let h = Harness::new();
    h.seed("config/extra.json", "{}");

    let rec = reconcile(&h, &plan(&h)).unwrap();

    assert!(rec.foreign.contains(&rel("config/extra.json")));
}

#[test]
fn directory_where_a_file_is_planned_is_an_error() {
    let h = Harness::new();
    h.seed("config/app.conf/nested.txt", "x");

    let err = reconcile(&h, &plan(&h)).unwrap_err();

    match err {
        KeelError::Application(ApplicationError::FilesystemError { reason, .. }) => {
            assert!(reason.contains("expected a file"));
        }
        other => panic!("expected FilesystemError, got {other:?}"),
    }
}

#[test]
fn every_lossy_obsolete_file_is_reported_at_once() {
    let h = Harness::new();
    for path in ["internal/old/a_gen.go", "internal/old/b_gen.go"] {
        h.seed(path, &format!("{}// kept\n", generated(path, "package old\n")));
    }

    let err = reconcile(&h, &plan(&h)).unwrap_err();

    match err {
        KeelError::Application(ApplicationError::DataLossGuard { paths }) => {
            assert_eq!(paths.len(), 2);
        }
        other => panic!("expected DataLossGuard, got {other:?}"),
    }
}

#[test]
fn prior_path_becomes_a_rename_with_its_user_content() {
    let h = Harness::new();
    let old = "cmd/shop/main.go";
    h.seed(old, &format!("{}// mine\n", generated(old, "package main\n")));

    let rec = reconcile(&h, &plan(&h)).unwrap();

    let new = rel("cmd/shop/main_gen.go");
    assert_eq!(rec.renamed.get(&rel(old)), Some(&new));
    assert!(!rec.new_files.contains(&new));
    assert_eq!(rec.user_content.get(&new).map(Vec::as_slice), Some(&b"// mine\n"[..]));
}

#[test]
fn interrupted_commit_can_be_repeated() {
    let h = Harness::new();
    let old = "cmd/shop/main.go";
    h.seed(old, &generated(old, "package main\n"));
    let plan = plan(&h);
    let rec = reconcile(&h, &plan).unwrap();
    let rendered = vec![(
        rel("cmd/shop/main_gen.go"),
        generated("cmd/shop/main_gen.go", "package main\n").into_bytes(),
    )];
    let committer = Committer::new(&h.fs);

    let first = committer.commit(h.root(), &rec, &rendered).unwrap();
    let second = committer.commit(h.root(), &rec, &rendered).unwrap();

    assert_eq!(first.renames_applied, 1);
    assert_eq!(second.renames_applied, 0);
    assert_eq!(second.renames_skipped, 1);
    assert_eq!(second.files_written, 1);
    assert!(h.fs.file_string(h.path(old)).is_none());
}

#[test]
fn commit_never_writes_ignored_paths() {
    let h = Harness::new();
    h.seed("README.md", "mine\n");
    let plan = plan(&h);
    let rec = reconcile(&h, &plan).unwrap();
    let rendered = vec![(rel("README.md"), b"overwritten\n".to_vec())];

    let summary = Committer::new(&h.fs).commit(h.root(), &rec, &rendered).unwrap();

    assert_eq!(summary.files_written, 0);
    assert_eq!(h.read("README.md"), "mine\n");
}
