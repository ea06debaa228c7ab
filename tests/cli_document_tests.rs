/// Source-comment ingestion, configuration files and the reports printed
/// by the command-line tool.

use std::io::Write;

use proseweave::document;
use proseweave::nl::{default_grammar, lexicon, GrammarDeriver, Lexicon, LexiconTagger, ProseGrammar, Tagger};
use proseweave::report::describe_parse;
use proseweave::types::WeaveError;
use proseweave::weave::{weave, weave_with_stats, Session};

fn weave_source(source: &str) -> String {
    let tagger = LexiconTagger::new(lexicon());
    let deriver = GrammarDeriver::new(default_grammar(), &tagger);
    weave(&document::fragments(source), default_grammar(), &deriver)
}

fn temp_yaml(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

// ===========================================================================
// Comment blocks to prose
// ===========================================================================

#[test]
fn test_line_comments_become_clauses() {
    let source = "\
// The dog
// barked
//
// The cat
// slept
";
    assert_eq!(weave_source(source), "The dog barked\nThe cat slept");
}

#[test]
fn test_doc_block_with_noun_list() {
    let source = "\
/**
 * the balance
 * the owner
 */
";
    assert_eq!(weave_source(source), "the balance and the owner");
}

#[test]
fn test_hash_comments_clause_and_adverb() {
    let source = "# It rained\n# quickly\n";
    // "It rained" is a clause; "quickly" has no derivation.
    assert_eq!(weave_source(source), "It rained before quickly");
}

#[test]
fn test_code_lines_stay_out_of_the_prose() {
    let source = "\
fn total(a: u32) -> u32 {
    // the balance
    let x = a + 1; // the owner
    x
}
";
    assert_eq!(weave_source(source), "the balance and the owner");
}

#[test]
fn test_blank_document() {
    assert_eq!(weave_source(""), "");
    assert_eq!(weave_source("//\n#\n   \n"), "");
}

#[test]
fn test_raw_fragments_keep_markers() {
    let tagger = LexiconTagger::new(lexicon());
    let deriver = GrammarDeriver::new(default_grammar(), &tagger);
    let fragments = document::raw_fragments("the dog\nthe cat");
    let (text, stats) = weave_with_stats(&fragments, default_grammar(), &deriver);
    assert_eq!(text, "the dog and the cat");
    assert_eq!(stats.phrase_merges, 1);
}

#[test]
fn test_stage_lists_from_session() {
    let tagger = LexiconTagger::new(lexicon());
    let deriver = GrammarDeriver::new(default_grammar(), &tagger);
    let mut session = Session::new(default_grammar(), &deriver);

    let woven = session.weave(&document::fragments("// the dog\n// the cat\n// slept"));
    assert_eq!(woven.phrases, vec!["the dog and the cat", "slept"]);
    assert_eq!(woven.clauses, vec!["the dog and the cat slept"]);
    assert_eq!(woven.text, "the dog and the cat slept");
    assert_eq!(woven.stats.derivations, 3, "merged texts are never derived");
}

// ===========================================================================
// Configuration files
// ===========================================================================

#[test]
fn test_grammar_file_loads() {
    let file = temp_yaml(
        "productions: |\n\
         \x20 Root -> NounPhrase VerbPhrase | NounPhrase | VerbPhrase\n\
         \x20 NounPhrase -> 'NN' | 'DT' 'NN'\n\
         \x20 VerbPhrase -> 'VBD'\n",
    );
    let grammar = ProseGrammar::load(file.path()).unwrap();
    assert_eq!(grammar.start(), "Root");
    assert_eq!(grammar.cfg.rules.len(), 6);
}

#[test]
fn test_grammar_file_errors_propagate() {
    let file = temp_yaml("productions: |\n  Root -> Missing\n");
    assert!(matches!(ProseGrammar::load(file.path()), Err(WeaveError::Grammar(_))));

    let file = temp_yaml("productions: [not, a, string]\n");
    assert!(matches!(ProseGrammar::load(file.path()), Err(WeaveError::Yaml(_))));

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.yaml");
    assert!(matches!(ProseGrammar::load(&missing), Err(WeaveError::Io(_))));
}

#[test]
fn test_lexicon_file_drives_tagging() {
    let file = temp_yaml(
        "tags:\n\
         \x20 DT: [the]\n\
         verbs: [zorp]\n\
         nouns: [blorf]\n",
    );
    let custom = Lexicon::load(file.path()).unwrap();
    let tagger = LexiconTagger::new(&custom);
    let tags: Vec<String> = tagger.tag("the blorf zorped").into_iter().map(|t| t.tag).collect();
    assert_eq!(tags, vec!["DT", "NN", "VBD"]);
}

#[test]
fn test_lexicon_rejects_empty_word() {
    let file = temp_yaml("tags:\n  DT: ['']\n");
    assert!(matches!(Lexicon::load(file.path()), Err(WeaveError::Lexicon(_))));
}

// ===========================================================================
// Parse report
// ===========================================================================

#[test]
fn test_parse_report_for_failure_matches_diagnostic() {
    let tagger = LexiconTagger::new(lexicon());
    let report = describe_parse("quickly", default_grammar(), &tagger, false);
    assert!(report.starts_with("Parsing \"quickly\"..."), "got: {}", report);
    assert!(report.contains("ERROR: Could not parse \"quickly\"."), "got: {}", report);
}

#[test]
fn test_parse_report_lists_tree() {
    let tagger = LexiconTagger::new(lexicon());
    let report = describe_parse("the dog", default_grammar(), &tagger, false);
    assert!(report.contains("(NounPhrase)"), "got: {}", report);
    assert!(report.contains("[NN] \"dog\""), "got: {}", report);
    assert!(report.contains("Classified as: NounPhrase"), "got: {}", report);
}
