//! End-to-end tests for the multi-file pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use cssvar_fallback::prelude::*;
use cssvar_fallback::Error;
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn write(dir: &Path, name: &str, css: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, css).unwrap();
    path
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

fn summary<'a>(report: &'a RunReport, path: &Path) -> &'a FileSummary {
    let file = report
        .files
        .iter()
        .find(|file| file.path == path)
        .expect("file missing from report");
    file.outcome.as_ref().expect("file failed")
}

struct Project {
    _dir: TempDir,
    primary: PathBuf,
    second: PathBuf,
}

fn accent_project() -> Project {
    let dir = tempfile::tempdir().unwrap();
    let primary = write(
        dir.path(),
        "main.css",
        ":root { --accent: #ff6600; }\nbody { background: var(--accent); }\n",
    );
    let second = write(dir.path(), "links.css", "a { color: var(--accent); }\n");
    Project {
        _dir: dir,
        primary,
        second,
    }
}

fn pipeline(project: &Project) -> FallbackPipeline {
    FallbackPipeline::new(PipelineConfig::new(&project.primary).with_target(&project.second))
}

#[test]
fn test_accent_scenario() {
    init_tracing();
    let project = accent_project();

    let report = pipeline(&project).run().unwrap();

    assert!(!report.has_failures());
    assert_eq!(report.variables, 1);
    assert_eq!(
        read(&project.second),
        "a {\n  color: #ff6600 /* fallback */;\n  color: var(--accent);\n}\n"
    );
    assert_eq!(
        read(&project.primary),
        ":root {\n  --accent: #ff6600;\n}\n\n\
         body {\n  background: #ff6600 /* fallback */;\n  background: var(--accent);\n}\n"
    );
}

#[test]
fn test_second_run_is_byte_identical() {
    let project = accent_project();
    let pipeline = pipeline(&project);

    pipeline.run().unwrap();
    let primary_once = read(&project.primary);
    let second_once = read(&project.second);

    let report = pipeline.run().unwrap();

    assert_eq!(read(&project.primary), primary_once);
    assert_eq!(read(&project.second), second_once);
    for (_, summary) in report.summaries() {
        assert_eq!(summary.status, FileStatus::Unchanged);
        assert_eq!(summary.removed, summary.inserted);
    }
}

#[test]
fn test_primary_is_processed_first() {
    let project = accent_project();

    let report = pipeline(&project).run().unwrap();

    let order: Vec<_> = report.files.iter().map(|file| file.path.clone()).collect();
    assert_eq!(order, [project.primary.clone(), project.second.clone()]);
}

#[test]
fn test_cross_file_sharing_uses_primary_variables() {
    let dir = tempfile::tempdir().unwrap();
    let primary = write(dir.path(), "vars.css", ":root { --gap: 8px; --edge: 1px solid var(--ink); --ink: navy; }");
    let target = write(
        dir.path(),
        "card.css",
        ".card { padding: var(--gap); border: var(--edge); margin: var(--gap, 0) auto; }",
    );

    let config = PipelineConfig::new(&primary).with_target(&target);
    let report = FallbackPipeline::new(config).run().unwrap();

    assert_eq!(
        read(&target),
        ".card {\n  padding: 8px /* fallback */;\n  padding: var(--gap);\n  \
         border: 1px solid navy /* fallback */;\n  border: var(--edge);\n  \
         margin: 8px auto /* fallback */;\n  margin: var(--gap, 0) auto;\n}\n"
    );
    assert_eq!(summary(&report, &target).inserted, 3);
}

#[test]
fn test_functions_and_nested_blocks_survive_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    let primary = write(dir.path(), "main.css", ":root{--accent:#ff6600}");
    let target = write(
        dir.path(),
        "nested.css",
        "a { color: var(--accent); b { width: calc(100% - 2px); } }\n\
         @media (max-width: 10px) { p { border: 1px solid rgba(var(--accent), .5); } }",
    );
    let pipeline = FallbackPipeline::new(PipelineConfig::new(&primary).with_target(&target));

    pipeline.run().unwrap();
    let once = read(&target);

    assert_eq!(
        once,
        "a {\n  color: #ff6600 /* fallback */;\n  color: var(--accent);\n  \
         b {\n    width: calc(100% - 2px);\n  }\n}\n\n\
         @media (max-width: 10px) {\n  p {\n    \
         border: 1px solid rgba(#ff6600, .5) /* fallback */;\n    \
         border: 1px solid rgba(var(--accent), .5);\n  }\n}\n"
    );

    pipeline.run().unwrap();
    assert_eq!(read(&target), once);
}

#[test]
fn test_byte_order_mark_in_primary() {
    let dir = tempfile::tempdir().unwrap();
    let primary = write(dir.path(), "main.css", "\u{feff}:root { --accent: #ff6600; }");
    let target_css = "a {\n  color: #ff6600 /* fallback */;\n  color: var(--accent);\n}\n";
    let target = write(dir.path(), "t.css", target_css);

    let report = FallbackPipeline::new(PipelineConfig::new(&primary).with_target(&target))
        .run()
        .unwrap();

    assert_eq!(report.variables, 1);
    assert_eq!(read(&target), target_css);
    assert_eq!(summary(&report, &target).status, FileStatus::Unchanged);
}

#[test]
fn test_local_variables_in_targets_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let primary = write(dir.path(), "vars.css", ":root { --c: red; }");
    let target = write(dir.path(), "other.css", ":root { --c: blue; }\np { color: var(--c); }");

    FallbackPipeline::new(PipelineConfig::new(&primary).with_target(&target))
        .run()
        .unwrap();

    assert!(read(&target).contains("color: red /* fallback */;"));
}

#[test]
fn test_updated_variable_replaces_stale_fallbacks() {
    let project = accent_project();
    let pipeline = pipeline(&project);
    pipeline.run().unwrap();

    let updated = read(&project.primary).replace("--accent: #ff6600;", "--accent: #0055aa;");
    fs::write(&project.primary, updated).unwrap();
    let report = pipeline.run().unwrap();

    assert_eq!(
        read(&project.second),
        "a {\n  color: #0055aa /* fallback */;\n  color: var(--accent);\n}\n"
    );
    assert_eq!(summary(&report, &project.second).status, FileStatus::Rewritten);
    assert!(!read(&project.primary).contains("#ff6600"));
}

#[test]
fn test_unresolved_reference_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let primary = write(dir.path(), "main.css", ":root { --a: 1px; }");
    let target = write(dir.path(), "t.css", "a { margin: var(--a); color: var(--theme-color); }");

    let report = FallbackPipeline::new(PipelineConfig::new(&primary).with_target(&target))
        .run()
        .unwrap();

    assert_eq!(
        read(&target),
        "a {\n  margin: 1px /* fallback */;\n  margin: var(--a);\n  color: var(--theme-color);\n}\n"
    );
    let summary = summary(&report, &target);
    assert_eq!(summary.unresolved.len(), 1);
    assert_eq!(
        summary.unresolved[0].error,
        ResolveError::Undefined {
            name: "theme-color".into()
        }
    );
    assert_eq!(report.total_unresolved(), 1);
}

#[test]
fn test_parse_failure_does_not_stop_other_files() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let primary = write(dir.path(), "main.css", ":root { --a: red; }");
    let broken_css = "a { color: var(--a); } }";
    let broken = write(dir.path(), "broken.css", broken_css);
    let fine = write(dir.path(), "fine.css", "b { color: var(--a); }");

    let config = PipelineConfig::new(&primary).with_targets([&broken, &fine]);
    let report = FallbackPipeline::new(config).run().unwrap();

    assert!(report.has_failures());
    let failure = report.failures().next().unwrap();
    assert_eq!(failure.path, broken);
    assert!(matches!(failure.outcome, Err(Error::Parse { .. })));

    // The broken file is not touched; the next file is still processed.
    assert_eq!(read(&broken), broken_css);
    assert!(read(&fine).contains("color: red /* fallback */;"));
}

#[test]
fn test_missing_target_is_io_failure() {
    let project = accent_project();
    let missing = project.primary.with_file_name("missing.css");
    let config = PipelineConfig::new(&project.primary).with_targets([&missing, &project.second]);

    let report = FallbackPipeline::new(config).run().unwrap();

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0].outcome, Err(Error::Io { .. })));
    assert_eq!(summary(&report, &project.second).status, FileStatus::Rewritten);
}

#[test]
fn test_unparsable_primary_aborts_run() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let primary = write(dir.path(), "main.css", ":root { --a: red; } }");
    let target_css = "a { color: red /* fallback */; color: var(--a); }";
    let target = write(dir.path(), "t.css", target_css);

    let result = FallbackPipeline::new(PipelineConfig::new(&primary).with_target(&target)).run();

    assert!(matches!(result, Err(Error::Parse { .. })));
    assert_eq!(read(&target), target_css);
}

#[test]
fn test_check_mode_writes_nothing() {
    let project = accent_project();
    let original = read(&project.second);
    let config = PipelineConfig::new(&project.primary)
        .with_target(&project.second)
        .with_check(true);

    let report = FallbackPipeline::new(config).run().unwrap();

    assert_eq!(read(&project.second), original);
    assert_eq!(
        summary(&report, &project.second).status,
        FileStatus::WouldRewrite
    );
    assert_eq!(report.changed_files().len(), 2);
}

#[test]
fn test_check_mode_passes_on_processed_output() {
    let project = accent_project();
    pipeline(&project).run().unwrap();

    let config = PipelineConfig::new(&project.primary)
        .with_target(&project.second)
        .with_check(true);
    let report = FallbackPipeline::new(config).run().unwrap();

    assert!(report.changed_files().is_empty());
}

#[test]
fn test_custom_root_selector() {
    let dir = tempfile::tempdir().unwrap();
    let primary = write(dir.path(), "main.css", "html { --c: teal; }\n:root { --c: red; }\np { color: var(--c); }");

    let config = PipelineConfig::new(&primary).with_root_selector("html");
    FallbackPipeline::new(config).run().unwrap();

    assert!(read(&primary).contains("color: teal /* fallback */;"));
}

#[test]
fn test_config_file_drives_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("css")).unwrap();
    write(&dir.path().join("css"), "main.css", ":root { --w: 10px; }");
    let target = write(&dir.path().join("css"), "box.css", ".box { width: var(--w); }");
    let config_path = write(
        dir.path(),
        "fallbacks.toml",
        "primary = \"css/main.css\"\ntargets = [\"css/box.css\"]\n",
    );

    let config = PipelineConfig::from_toml_file(&config_path).unwrap();
    let report = FallbackPipeline::new(config).run().unwrap();

    assert!(!report.has_failures());
    assert!(read(&target).contains("width: 10px /* fallback */;"));
}
