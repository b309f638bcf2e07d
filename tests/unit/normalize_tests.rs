/*!
 * Tests for TM key normalization
 */

use localcat::app_config::NormalizationMode;
use localcat::tm::normalize;

const MODES: [NormalizationMode; 3] = [
    NormalizationMode::Whitespace,
    NormalizationMode::WhitespaceCase,
    NormalizationMode::WhitespaceCasePunctuation,
];

#[test]
fn test_normalize_isIdempotent_forRepresentativeInputs() {
    let samples = [
        "Plain text",
        "  leading and trailing  ",
        "Tabs\tand\nnewlines",
        "Punctuation, everywhere! (Really?)",
        "MIXED case TEXT",
        "全角标点，也要处理。",
        "",
        "   ",
    ];

    for mode in MODES {
        for sample in samples {
            let once = normalize(sample, mode);
            let twice = normalize(once.as_str(), mode);
            assert_eq!(once, twice, "mode {:?}, sample {:?}", mode, sample);
        }
    }
}

#[test]
fn test_normalize_whitespaceMode_preservesCaseAndPunctuation() {
    let key = normalize("Hello,   World!", NormalizationMode::Whitespace);
    assert_eq!(key.as_str(), "Hello, World!");
}

#[test]
fn test_normalize_caseMode_foldsButKeepsPunctuation() {
    let key = normalize("Hello, World!", NormalizationMode::WhitespaceCase);
    assert_eq!(key.as_str(), "hello, world!");
}

#[test]
fn test_normalize_punctuationMode_stripsAllPunctuation() {
    let key = normalize(
        "Hello, World! How's it going?",
        NormalizationMode::WhitespaceCasePunctuation,
    );
    assert_eq!(key.as_str(), "hello world hows it going");
}

#[test]
fn test_normalize_distinctTextsConvergeUnderStrongerModes() {
    let a = normalize("Save File", NormalizationMode::WhitespaceCase);
    let b = normalize("save   file", NormalizationMode::WhitespaceCase);
    assert_eq!(a, b);

    let c = normalize("Save File!", NormalizationMode::WhitespaceCase);
    assert_ne!(a, c);

    let d = normalize("Save File!", NormalizationMode::WhitespaceCasePunctuation);
    let e = normalize("save file", NormalizationMode::WhitespaceCasePunctuation);
    assert_eq!(d, e);
}
