/*!
 * Tests for the append-only TM store and exact lookup
 */

use localcat::app_config::NormalizationMode;
use localcat::ingest::TmReader;
use localcat::tm::{MatchKind, TmStore};

use crate::common;

fn store() -> TmStore {
    TmStore::new_in_memory("session.jsonl", NormalizationMode::WhitespaceCase)
}

#[test]
fn test_tmStore_appendRoundTrip_shouldProduceExactMatch() {
    let tm = store();
    tm.append(&common::make_unit("u1", "Open File"), "打开文件")
        .unwrap();

    let matches = tm.lookup_exact("Open File");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].target, "打开文件");
    assert_eq!(matches[0].match_type, MatchKind::Exact);
    assert!((matches[0].similarity - 1.0).abs() < f32::EPSILON);
    assert_eq!(matches[0].tm_name, "session.jsonl");
    assert!(!matches[0].last_used.is_empty());
}

#[test]
fn test_tmStore_appendTwice_historyIsKeptMostRecentFirst() {
    let tm = store();
    tm.append(&common::make_unit("u1", "Hello world"), "你好世界")
        .unwrap();
    tm.append(&common::make_unit("u1", "Hello world"), "世界你好")
        .unwrap();

    let matches = tm.lookup_exact("Hello world");
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].target, "世界你好");
    assert_eq!(matches[1].target, "你好世界");
}

#[test]
fn test_tmStore_lookupExact_usesSharedNormalization() {
    let tm = store();
    tm.append(&common::make_unit("u1", "Hello   World"), "你好世界")
        .unwrap();

    // Indexing and querying share one normalization mode
    assert_eq!(tm.lookup_exact("hello world").len(), 1);
    assert_eq!(tm.lookup_exact("HELLO WORLD  ").len(), 1);
    assert!(tm.lookup_exact("hello worlds").is_empty());
}

#[test]
fn test_tmStore_appendPersistsContextFields() {
    let tm = store();
    let unit = common::make_unit("u1", "Good morning")
        .with_context(Some("scene start"), None)
        .with_speaker("Ana");

    let entry = tm.append(&unit, "早上好").unwrap();
    assert_eq!(entry.context_prev.as_deref(), Some("scene start"));
    assert_eq!(entry.speaker.as_deref(), Some("Ana"));
    assert_eq!(entry.usage_count, 1);
}

#[test]
fn test_tmStore_jsonlLog_survivesRestart() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("tm.jsonl");

    {
        let tm = TmStore::open_jsonl(&path, NormalizationMode::WhitespaceCase).unwrap();
        tm.append(&common::make_unit("u1", "Hello"), "你好").unwrap();
        tm.append(&common::make_unit("u2", "Hello"), "您好").unwrap();
    }

    let tm = TmStore::open_jsonl(&path, NormalizationMode::WhitespaceCase).unwrap();
    let (loaded, skipped) = tm.load(TmReader::open(&path).unwrap()).unwrap();
    assert_eq!(loaded, 2);
    assert_eq!(skipped, 0);

    // Full history survives the restart, newest first
    let matches = tm.lookup_exact("Hello");
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].target, "您好");
}

#[test]
fn test_tmStore_load_fromFixtureFile_shouldIndexEntries() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_tm(dir.path(), "history.jsonl").unwrap();

    let tm = store();
    let (loaded, _) = tm.load(TmReader::open(&path).unwrap()).unwrap();
    assert_eq!(loaded, 2);

    let matches = tm.lookup_exact("Hello world");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].tm_name, "history.jsonl");
    assert_eq!(matches[0].usage_count, 1);
}
