use std::fs;
use std::path::Path;

use precache_manifest::manifest::content_hash;
use precache_manifest::{
  Manifest, PrecacheBuilder, PrecacheConfig, SizeBudget, SizeOutcome, build_manifest,
};
use tempfile::tempdir;

fn write_file(path: &Path, contents: &[u8]) {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(path, contents).unwrap();
}

fn sample_site(root: &Path) {
  write_file(&root.join("css/a.css"), b"body{x:1;}");
  write_file(&root.join("images/b.png"), &vec![0u8; 3_000_000]);
  write_file(&root.join("js/c.js"), b"console.log('c');\n\n\n");
}

#[test]
fn generates_expected_manifest_for_sample_site() {
  let temp = tempdir().unwrap();
  let root = temp.path();
  sample_site(root);

  let build = build_manifest(
    &["css/**.css", "images/**.*", "js/**.js"],
    root,
    SizeBudget::default(),
  )
  .unwrap();

  let expected = format!(
    r#"[["css/a.css","{}"],["js/c.js","{}"]]"#,
    content_hash(b"body{x:1;}"),
    content_hash(b"console.log('c');\n\n\n")
  );
  assert_eq!(build.manifest.to_json().unwrap(), expected);
  assert_eq!(build.total_accepted_bytes(), 30);

  let decisions: Vec<(&str, SizeOutcome)> = build
    .report
    .decisions
    .iter()
    .map(|decision| (decision.relative_path.as_str(), decision.outcome))
    .collect();
  assert_eq!(decisions, vec![
    ("css/a.css", SizeOutcome::Added),
    ("images/b.png", SizeOutcome::Skipped),
    ("js/c.js", SizeOutcome::Added),
  ]);
}

#[test]
fn builder_output_round_trips_and_is_stable() {
  let temp = tempdir().unwrap();
  sample_site(&temp.path().join("dist"));

  let config = PrecacheConfig {
    glob_patterns: vec!["css/**.css".into(), "images/**.*".into(), "js/**.js".into()],
    ..PrecacheConfig::default()
  };
  let builder = PrecacheBuilder::new(&config).with_base_dir(temp.path());

  let first = builder.build().unwrap();
  let second = builder.build().unwrap();
  assert_eq!(first.manifest_json, second.manifest_json);
  assert!(!second.differs_from(&first.manifest_json));

  let parsed = Manifest::from_json(&first.manifest_json).unwrap();
  assert_eq!(parsed, first.manifest);
  assert_eq!(parsed.hash_for("css/a.css"), Some(content_hash(b"body{x:1;}").as_str()));
  assert!(first.report.to_string().ends_with("Total precache size: 0 KB"));
}

#[test]
fn later_pattern_wins_for_shared_paths() {
  let temp = tempdir().unwrap();
  let root = temp.path();
  write_file(&root.join("index.html"), b"<html></html>");

  let build = build_manifest(&["*.html", "index.*"], root, SizeBudget(1024)).unwrap();
  assert_eq!(build.manifest.len(), 1);
  assert_eq!(
    build.manifest.hash_for("index.html"),
    Some(content_hash(b"<html></html>").as_str())
  );
}
