// End-to-end catalog behavior through the public library API: load, merge,
// save, and the laws that tie flatten and unflatten together.
mod support;

use anyhow::Result;
use locale_merge::{
    Catalog, CatalogError, ConflictKind, ConflictPolicy, KeyPath, OverrideSet, apply_overrides,
    flatten, load, save, unflatten,
};
use serde_json::{Value, json};
use std::fs;
use support::read_value;
use tempfile::TempDir;

fn catalog(value: Value) -> Result<Catalog> {
    Ok(Catalog::from_value(value)?)
}

fn site_catalog() -> Result<Catalog> {
    catalog(json!({
        "nav": {"home": "Home", "docs": "Docs"},
        "agent_installation": {
            "title": "Agent Installation",
            "installation": {
                "ubuntu": {"title": "Ubuntu", "step1": "Run <code>apt update</code>"}
            }
        },
        "footer": {"copyright": "&copy; <strong>SysManage</strong>"}
    }))
}

#[test]
fn dotted_override_replaces_only_its_leaf() -> Result<()> {
    let source = catalog(json!({"a": {"b": "x", "c": "y"}}))?;
    let merged = apply_overrides(&source, &OverrideSet::new().set("a.b", "z"), ConflictPolicy::Fail)?;
    assert_eq!(merged.into_value(), json!({"a": {"b": "z", "c": "y"}}));
    Ok(())
}

#[test]
fn intermediate_namespaces_are_created() -> Result<()> {
    let merged = apply_overrides(
        &Catalog::new(),
        &OverrideSet::new().set("x.y.z", "1"),
        ConflictPolicy::Fail,
    )?;
    assert_eq!(merged.into_value(), json!({"x": {"y": {"z": "1"}}}));
    Ok(())
}

#[test]
fn leaf_in_path_fails_by_default_and_overwrites_on_request() -> Result<()> {
    let source = catalog(json!({"m": "leaf"}))?;
    let overrides = OverrideSet::new().set("m.n", "v");

    let err = apply_overrides(&source, &overrides, ConflictPolicy::Fail).unwrap_err();
    match err {
        CatalogError::PathConflict { path, at, kind } => {
            assert_eq!(path, "m.n");
            assert_eq!(at, "m");
            assert_eq!(kind, ConflictKind::LeafInPath);
        }
        other => panic!("expected a path conflict, got {other:?}"),
    }

    let merged = apply_overrides(&source, &overrides, ConflictPolicy::Overwrite)?;
    assert_eq!(merged.into_value(), json!({"m": {"n": "v"}}));
    Ok(())
}

#[test]
fn missing_file_is_not_found_and_writes_nothing() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("xx.json");
    assert!(matches!(load(&path), Err(CatalogError::NotFound { .. })));
    assert!(!path.exists());
    assert_eq!(fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[test]
fn markup_survives_save_and_reload() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("en.json");
    let source = catalog(json!({
        "note": "<strong>x</strong>",
        "ja": {"warning": "注意：<em>必須</em>"}
    }))?;
    save(&source, &path)?;

    let reloaded = load(&path)?;
    assert_eq!(reloaded, source);
    assert_eq!(
        reloaded.leaf(&KeyPath::parse("note")),
        Some("<strong>x</strong>")
    );
    let raw = fs::read_to_string(&path)?;
    assert!(raw.contains("注意：<em>必須</em>"), "non-ASCII must be written verbatim");
    assert!(raw.ends_with('\n'));
    Ok(())
}

#[test]
fn malformed_documents_are_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    for (name, contents) in [
        ("syntax.json", "{\"a\": "),
        ("array.json", "[\"a\"]"),
        ("number.json", "{\"a\": {\"b\": 1}}"),
    ] {
        let path = dir.path().join(name);
        fs::write(&path, contents)?;
        assert!(
            matches!(load(&path), Err(CatalogError::Malformed { .. })),
            "{name} should be malformed"
        );
    }
    Ok(())
}

#[test]
fn round_trip_law_holds_for_site_catalog() -> Result<()> {
    let source = site_catalog()?;
    let flat = flatten(&source);
    assert_eq!(flat.len(), source.leaf_count());
    assert_eq!(unflatten(&flat)?, source);
    Ok(())
}

#[test]
fn applying_twice_matches_applying_once() -> Result<()> {
    let source = site_catalog()?;
    let overrides = OverrideSet::new()
        .graft(
            "agent_installation.installation.netbsd",
            catalog(json!({"title": "NetBSD", "step1": "pkgin install rust"}))?,
        )
        .set("nav.docs", "Documentation")
        .set("nav.support.title", "Support");

    let once = apply_overrides(&source, &overrides, ConflictPolicy::Fail)?;
    let twice = apply_overrides(&once, &overrides, ConflictPolicy::Fail)?;
    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn untouched_paths_keep_their_values() -> Result<()> {
    let source = site_catalog()?;
    let overrides = OverrideSet::new()
        .graft(
            "agent_installation.installation.ubuntu",
            catalog(json!({"title": "Ubuntu 24.04"}))?,
        )
        .set("nav.home", "Start");
    let merged = flatten(&apply_overrides(&source, &overrides, ConflictPolicy::Fail)?);

    let touched = [
        KeyPath::parse("agent_installation.installation.ubuntu"),
        KeyPath::parse("nav.home"),
    ];
    for (path, text) in flatten(&source).iter() {
        let key = KeyPath::parse(path);
        if touched.iter().any(|t| key.starts_with(t)) {
            continue;
        }
        assert_eq!(merged.get(path), Some(text), "{path} changed");
    }
    assert_eq!(
        merged.get("agent_installation.installation.ubuntu.step1"),
        None,
        "grafts replace the whole destination subtree"
    );
    Ok(())
}

#[test]
fn required_section_missing_is_a_skip() -> Result<()> {
    let source = site_catalog()?;
    let overrides = OverrideSet::new()
        .require("agent_installation.repositories")
        .set("agent_installation.repositories.netbsd", "pkgsrc");
    let err = apply_overrides(&source, &overrides, ConflictPolicy::Fail).unwrap_err();
    assert!(err.is_skip());
    Ok(())
}

#[test]
fn saved_file_matches_expected_layout() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("fr.json");
    let source = catalog(json!({"z": "last", "a": {"b": "first"}}))?;
    save(&source, &path)?;
    assert_eq!(
        fs::read_to_string(&path)?,
        "{\n  \"z\": \"last\",\n  \"a\": {\n    \"b\": \"first\"\n  }\n}\n"
    );
    assert_eq!(read_value(&path)?, source.into_value());
    Ok(())
}
