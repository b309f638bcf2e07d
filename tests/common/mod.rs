/*!
 * Common test utilities for the localcat test suite
 */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

use localcat::po_processor::SourceUnit;

/// Initializes test logging; safe to call from multiple tests
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample glossary CSV for testing
pub fn create_test_glossary(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = "CPU,处理器,,1\nCPU core,处理器核心,a processor core,2\ncat,猫\ndog,狗\n";
    create_test_file(dir, filename, content)
}

/// Creates a sample TM JSONL file for testing
pub fn create_test_tm(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = concat!(
        r#"{"source":"Hello world","target":"你好世界","last_used":"2026-01-01T00:00:00","usage_count":1}"#,
        "\n",
        r#"{"source":"The quick brown dog","target":"敏捷的棕色狗","last_used":"2026-01-02T00:00:00","usage_count":2}"#,
        "\n",
    );
    create_test_file(dir, filename, content)
}

/// Creates a sample PO file for testing
pub fn create_test_po(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"msgid ""
msgstr "Project-Id-Version: demo\n"

msgctxt "Greeting"
msgid "Hello world"
msgstr ""

msgid "the CPU core is hot"
msgstr ""

msgid "Nothing known here"
msgstr ""
"#;
    create_test_file(dir, filename, content)
}

/// Creates a fully populated project directory (glossary + TM + PO)
pub fn create_test_project(dir: &Path) -> Result<()> {
    create_test_glossary(dir, "terms.csv")?;
    create_test_tm(dir, "history.jsonl")?;
    create_test_po(dir, "strings.po")?;
    Ok(())
}

/// Builds a source unit for query tests
pub fn make_unit(id: &str, text: &str) -> SourceUnit {
    SourceUnit::new(id, text, "test.po")
}
