/*!
 * End-to-end suggestion workflow tests: project load, querying, TM
 * growth, and reload
 */

use localcat::app_config::Config;
use localcat::app_controller::Controller;
use localcat::engine::{Engine, MatchEngine};
use localcat::po_processor::PoParser;
use localcat::tm::MatchKind;

use crate::common;

fn loaded_engine(dir: &std::path::Path) -> MatchEngine {
    common::init_logging();
    let engine = MatchEngine::new(Config::default());
    engine.load_project_context(dir).unwrap();
    engine
}

#[test]
fn test_workflow_loadProject_shouldReportEverything() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_project(dir.path()).unwrap();

    let engine = MatchEngine::new(Config::default());
    let report = engine.load_project_context(dir.path()).unwrap();

    assert_eq!(report.glossary_files, 1);
    assert_eq!(report.terms_loaded, 4);
    assert_eq!(report.tm_files, 1);
    assert_eq!(report.tm_entries_loaded, 2);
    assert_eq!(report.skipped, 0);
}

#[test]
fn test_workflow_poUnitsThroughEngine_shouldMatchExpectedKinds() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_project(dir.path()).unwrap();

    let engine = loaded_engine(dir.path());
    let units = PoParser::parse_file(dir.path().join("strings.po")).unwrap();
    assert_eq!(units.len(), 3);

    // "Hello world" is remembered verbatim
    let hello = engine.get_suggestions(&units[0]).unwrap();
    assert_eq!(hello.tm_matches[0].match_type, MatchKind::Exact);
    assert_eq!(hello.tm_matches[0].target, "你好世界");

    // "the CPU core is hot" matches glossary terminology
    let cpu = engine.get_suggestions(&units[1]).unwrap();
    assert_eq!(cpu.terms.len(), 1);
    assert_eq!(cpu.terms[0].source_term, "CPU core");
    assert_eq!(cpu.terms[0].target_term, "处理器核心");

    // "Nothing known here" has no suggestions at all
    let unknown = engine.get_suggestions(&units[2]).unwrap();
    assert!(unknown.is_empty());
}

#[test]
fn test_workflow_partiallyBrokenCorpora_shouldLoadWithDiagnostics() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_file(dir.path(), "terms.csv", "good,好\n,broken row\n").unwrap();
    common::create_test_file(
        dir.path(),
        "history.jsonl",
        "{\"source\":\"ok\",\"target\":\"好\"}\nbroken line\n",
    )
    .unwrap();

    let engine = MatchEngine::new(Config::default());
    let report = engine.load_project_context(dir.path()).unwrap();

    assert_eq!(report.terms_loaded, 1);
    assert_eq!(report.tm_entries_loaded, 1);
    assert_eq!(report.skipped, 2);

    // The partially loaded context is still usable
    let suggestions = engine
        .get_suggestions(&common::make_unit("u1", "good"))
        .unwrap();
    assert_eq!(suggestions.terms.len(), 1);
}

#[test]
fn test_workflow_addToTm_persistsAcrossEngineRestart() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_project(dir.path()).unwrap();

    {
        let engine = loaded_engine(dir.path());
        let unit = common::make_unit("u1", "Close window");
        assert!(engine.add_to_tm(&unit, "关闭窗口").unwrap());
    }

    // A fresh engine over the same project sees the appended record
    let engine = loaded_engine(dir.path());
    let suggestions = engine
        .get_suggestions(&common::make_unit("u2", "Close window"))
        .unwrap();

    assert_eq!(suggestions.tm_matches.len(), 1);
    assert_eq!(suggestions.tm_matches[0].match_type, MatchKind::Exact);
    assert_eq!(suggestions.tm_matches[0].target, "关闭窗口");
}

#[test]
fn test_workflow_fuzzyFallback_runsOnlyWithoutExactHit() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_project(dir.path()).unwrap();

    let engine = loaded_engine(dir.path());

    // Near miss of a stored segment falls back to fuzzy
    let fuzzy = engine
        .get_suggestions(&common::make_unit("u1", "The quick brown fox"))
        .unwrap();
    assert!(!fuzzy.tm_matches.is_empty());
    assert_eq!(fuzzy.tm_matches[0].match_type, MatchKind::Fuzzy);
    assert_eq!(fuzzy.tm_matches[0].source, "The quick brown dog");

    // Verbatim hit stays exact
    let exact = engine
        .get_suggestions(&common::make_unit("u2", "Hello world"))
        .unwrap();
    assert!(exact
        .tm_matches
        .iter()
        .all(|m| m.match_type == MatchKind::Exact));
}

#[test]
fn test_workflow_controllerRun_shouldSummarizeUnits() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_project(dir.path()).unwrap();

    let controller = Controller::with_config(Config::default()).unwrap();
    let summary = controller.run(dir.path(), None).unwrap();

    assert_eq!(summary.units, 3);
    assert_eq!(summary.tm_hits, 1);
    assert_eq!(summary.term_units, 1);
    assert_eq!(summary.no_match, 1);
}

#[test]
fn test_workflow_controllerAddTranslation_shouldAppendToProjectTm() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_project(dir.path()).unwrap();

    let controller = Controller::with_config(Config::default()).unwrap();
    assert!(controller
        .add_translation(dir.path(), "Exit", "退出")
        .unwrap());

    // The appended record lands in the project's primary log
    let log = std::fs::read_to_string(dir.path().join("tm.jsonl")).unwrap();
    assert!(log.contains("退出"));
}

#[test]
fn test_workflow_caseInsensitiveConfig_shouldWidenTermMatching() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_project(dir.path()).unwrap();

    let config = Config {
        case_sensitive: false,
        ..Default::default()
    };
    let engine = MatchEngine::new(config);
    engine.load_project_context(dir.path()).unwrap();

    let suggestions = engine
        .get_suggestions(&common::make_unit("u1", "THE CPU CORE IS HOT"))
        .unwrap();
    assert_eq!(suggestions.terms.len(), 1);
    assert_eq!(suggestions.terms[0].source_term, "CPU CORE");
}
