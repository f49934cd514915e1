// tests/resolve.rs

//! End-to-end dependency resolution against the SQLite installed
//! database and an in-memory repository pool.

mod common;

use common::{install, pool_with, repo_pkg, setup_installed_db};
use strata::db::InstalledDb;
use strata::repository::RepositoryIndex;
use strata::{ActionTag, DepResolver, Error, PkgState, RepoPool, TransactionSet};

fn queued_pkgvers(trans: &TransactionSet) -> Vec<String> {
    trans
        .unsorted_deps()
        .iter()
        .map(|record| record.pkgver.clone())
        .collect()
}

fn missing_patterns(trans: &TransactionSet) -> Vec<String> {
    trans
        .missing_deps()
        .iter()
        .map(|pattern| pattern.to_string())
        .collect()
}

#[test]
fn leaf_package_resolves_to_empty_transaction() {
    let (_tmp, conn) = setup_installed_db();
    let installed = InstalledDb::new(&conn);
    let pool = pool_with(vec![]);
    let resolver = DepResolver::new(&installed, &pool);

    let mut trans = TransactionSet::new();
    let target = repo_pkg("a-1", &[]);
    resolver.resolve(&mut trans, &target).unwrap();

    assert!(trans.unsorted_deps().is_empty());
    assert!(trans.missing_deps().is_empty());
}

#[test]
fn installed_dependency_satisfies_pattern() {
    let (_tmp, conn) = setup_installed_db();
    install(&conn, "libc", "2.5", PkgState::Installed, &[]);

    let installed = InstalledDb::new(&conn);
    let pool = pool_with(vec![]);
    let resolver = DepResolver::new(&installed, &pool);

    let mut trans = TransactionSet::new();
    let target = repo_pkg("app-1.0", &["libc>=2"]);
    resolver.resolve(&mut trans, &target).unwrap();

    assert!(trans.unsorted_deps().is_empty());
    assert!(trans.missing_deps().is_empty());
}

#[test]
fn installed_virtual_provider_satisfies_pattern() {
    let (_tmp, conn) = setup_installed_db();
    install(
        &conn,
        "dash",
        "0.5",
        PkgState::Installed,
        &[("virtual-sh", "1.0")],
    );

    let installed = InstalledDb::new(&conn);
    let pool = pool_with(vec![]);
    let resolver = DepResolver::new(&installed, &pool);

    let mut trans = TransactionSet::new();
    let target = repo_pkg("app-1.0", &["virtual-sh>=1.0"]);
    resolver.resolve(&mut trans, &target).unwrap();

    assert!(trans.unsorted_deps().is_empty());
    assert!(trans.missing_deps().is_empty());
}

#[test]
fn unresolvable_dependency_is_recorded_missing() {
    let (_tmp, conn) = setup_installed_db();
    let installed = InstalledDb::new(&conn);
    let pool = pool_with(vec![]);
    let resolver = DepResolver::new(&installed, &pool);

    let mut trans = TransactionSet::new();
    let target = repo_pkg("app-1.0", &["zzz>=1"]);
    resolver.resolve(&mut trans, &target).unwrap();

    assert!(trans.unsorted_deps().is_empty());
    assert_eq!(missing_patterns(&trans), vec!["zzz>=1"]);
}

#[test]
fn missing_deps_keep_newest_version() {
    let (_tmp, conn) = setup_installed_db();
    let installed = InstalledDb::new(&conn);
    let pool = pool_with(vec![]);
    let resolver = DepResolver::new(&installed, &pool);

    // Two sibling targets feed the same missing name with different
    // constraint versions.
    let mut trans = TransactionSet::new();
    resolver
        .resolve(&mut trans, &repo_pkg("a-1", &["foo>=1.0"]))
        .unwrap();
    resolver
        .resolve(&mut trans, &repo_pkg("b-1", &["foo>=2.0"]))
        .unwrap();
    assert_eq!(missing_patterns(&trans), vec!["foo>=2.0"]);

    // Reversed order converges on the same final state.
    let mut trans = TransactionSet::new();
    resolver
        .resolve(&mut trans, &repo_pkg("b-1", &["foo>=2.0"]))
        .unwrap();
    resolver
        .resolve(&mut trans, &repo_pkg("a-1", &["foo>=1.0"]))
        .unwrap();
    assert_eq!(missing_patterns(&trans), vec!["foo>=2.0"]);

    // Exact duplicates collapse to a single entry.
    let mut trans = TransactionSet::new();
    resolver
        .resolve(&mut trans, &repo_pkg("a-1", &["foo>=1.0"]))
        .unwrap();
    resolver
        .resolve(&mut trans, &repo_pkg("b-1", &["foo>=1.0"]))
        .unwrap();
    assert_eq!(missing_patterns(&trans), vec!["foo>=1.0"]);
}

#[test]
fn transitive_dependencies_install_in_preorder() {
    let (_tmp, conn) = setup_installed_db();
    let installed = InstalledDb::new(&conn);
    let pool = pool_with(vec![repo_pkg("a-1", &["b>=1"]), repo_pkg("b-1", &[])]);
    let resolver = DepResolver::new(&installed, &pool);

    let mut trans = TransactionSet::new();
    let target = repo_pkg("app-1.0", &["a>=1"]);
    resolver.resolve(&mut trans, &target).unwrap();

    assert_eq!(queued_pkgvers(&trans), vec!["a-1", "b-1"]);
    for record in trans.unsorted_deps() {
        assert_eq!(record.transaction, Some(ActionTag::Install));
        assert!(record.automatic_install);
    }
    assert!(trans.missing_deps().is_empty());
}

#[test]
fn depth_overflow_aborts_resolution() {
    let (_tmp, conn) = setup_installed_db();
    let installed = InstalledDb::new(&conn);

    let mut packages = Vec::new();
    for i in 1..=513 {
        let pkgver = format!("p{}-1", i);
        let rdeps: Vec<String> = if i < 513 {
            vec![format!("p{}>=1", i + 1)]
        } else {
            Vec::new()
        };
        let mut record = repo_pkg(&pkgver, &[]);
        record.run_depends = rdeps;
        packages.push(record);
    }
    let pool = pool_with(packages);
    let resolver = DepResolver::new(&installed, &pool);

    let mut trans = TransactionSet::new();
    let target = repo_pkg("app-1.0", &["p1>=1"]);
    let err = resolver.resolve(&mut trans, &target).unwrap_err();
    assert!(matches!(err, Error::DepthExceeded { limit: 512, .. }));
}

#[test]
fn queued_pkgnames_are_unique() {
    let (_tmp, conn) = setup_installed_db();
    let installed = InstalledDb::new(&conn);

    // Diamond: app -> a, b; both depend on c.
    let pool = pool_with(vec![
        repo_pkg("a-1", &["c>=1"]),
        repo_pkg("b-1", &["c>=1"]),
        repo_pkg("c-2", &[]),
    ]);
    let resolver = DepResolver::new(&installed, &pool);

    let mut trans = TransactionSet::new();
    let target = repo_pkg("app-1.0", &["a>=1", "b>=1"]);
    resolver.resolve(&mut trans, &target).unwrap();

    let names: Vec<&str> = trans
        .unsorted_deps()
        .iter()
        .map(|record| record.pkgname.as_str())
        .collect();
    assert_eq!(names, vec!["a", "c", "b"]);

    let mut deduped = names.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(deduped.len(), names.len());
}

#[test]
fn action_tags_are_total() {
    let (_tmp, conn) = setup_installed_db();
    install(&conn, "old", "1.0", PkgState::Installed, &[]);
    install(&conn, "half", "1.0", PkgState::Unpacked, &[]);

    let installed = InstalledDb::new(&conn);
    let pool = pool_with(vec![
        repo_pkg("old-1.0", &[]),
        repo_pkg("half-1.0", &[]),
        repo_pkg("fresh-1.0", &[]),
    ]);
    let resolver = DepResolver::new(&installed, &pool);

    let mut trans = TransactionSet::new();
    let target = repo_pkg("app-1.0", &["old>=0.5", "half>=1.0", "fresh>=1.0"]);
    resolver.resolve(&mut trans, &target).unwrap();

    // "old" is installed and matched, so it never enters the
    // transaction; the others carry a tag and the automatic flag.
    assert_eq!(queued_pkgvers(&trans), vec!["half-1.0", "fresh-1.0"]);
    for record in trans.unsorted_deps() {
        assert!(record.transaction.is_some());
        assert!(record.automatic_install);
    }

    let half = &trans.unsorted_deps()[0];
    assert_eq!(half.transaction, Some(ActionTag::Install));
    assert_eq!(half.state, PkgState::Unpacked);

    let fresh = &trans.unsorted_deps()[1];
    assert_eq!(fresh.transaction, Some(ActionTag::Install));
    assert_eq!(fresh.state, PkgState::NotInstalled);
}

#[test]
fn candidate_over_installed_version_becomes_update() {
    let (_tmp, conn) = setup_installed_db();
    // Installed provider predates the virtual package; the repository
    // ships the same pkgver providing it.
    install(&conn, "bprov", "2.0", PkgState::Installed, &[]);

    let installed = InstalledDb::new(&conn);
    let mut provider = repo_pkg("bprov-2.0", &[]);
    provider.provides = vec!["virtual-x-1.0".to_string()];
    let pool = pool_with(vec![provider]);
    let resolver = DepResolver::new(&installed, &pool);

    let mut trans = TransactionSet::new();
    let target = repo_pkg("app-1.0", &["virtual-x>=1"]);
    resolver.resolve(&mut trans, &target).unwrap();

    assert_eq!(queued_pkgvers(&trans), vec!["bprov-2.0"]);
    let record = &trans.unsorted_deps()[0];
    assert_eq!(record.transaction, Some(ActionTag::Update));
    assert_eq!(record.state, PkgState::Installed);
}

#[test]
fn repeated_resolution_is_a_noop() {
    let (_tmp, conn) = setup_installed_db();
    let installed = InstalledDb::new(&conn);
    let pool = pool_with(vec![repo_pkg("a-1", &["b>=1"]), repo_pkg("b-1", &[])]);
    let resolver = DepResolver::new(&installed, &pool);

    let mut trans = TransactionSet::new();
    let target = repo_pkg("app-1.0", &["a>=1", "zzz>=9"]);
    resolver.resolve(&mut trans, &target).unwrap();

    let first_queued = queued_pkgvers(&trans);
    let first_missing = missing_patterns(&trans);

    resolver.resolve(&mut trans, &target).unwrap();
    assert_eq!(queued_pkgvers(&trans), first_queued);
    assert_eq!(missing_patterns(&trans), first_missing);
}

#[test]
fn pool_from_json_index_resolves() {
    let (_tmp, conn) = setup_installed_db();
    let installed = InstalledDb::new(&conn);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json");
    std::fs::write(
        &path,
        r#"{
            "name": "current",
            "packages": [
                {"pkgname": "bash", "pkgver": "bash-5.2_3",
                 "run_depends": ["libc>=2.30"]},
                {"pkgname": "libc", "pkgver": "libc-2.32"}
            ]
        }"#,
    )
    .unwrap();

    let index = RepositoryIndex::load(&path).unwrap();
    let mut pool = RepoPool::new();
    pool.add_repository(index.into_repository());

    let resolver = DepResolver::new(&installed, &pool);
    let mut trans = TransactionSet::new();
    let target = repo_pkg("app-1.0", &["bash>=5"]);
    resolver.resolve(&mut trans, &target).unwrap();

    assert_eq!(queued_pkgvers(&trans), vec!["bash-5.2_3", "libc-2.32"]);
    let bash = &trans.unsorted_deps()[0];
    assert_eq!(bash.repository.as_deref(), Some("current"));
}
