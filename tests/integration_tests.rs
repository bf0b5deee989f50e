//! Integration tests for ini-inspect
//!
//! These tests drive the public API end-to-end: INI text in, structural edits,
//! INI text out.

use std::fs;

use assert_matches::assert_matches;
use ini_inspect::diagnostics::DiagnosticCollector;
use ini_inspect::document::{Command, CommandOutcome, Direction};
use ini_inspect::error::ParseErrorKind;
use ini_inspect::parser::IniParser;
use ini_inspect::session::{EditMode, EditSession, SessionError};
use ini_inspect::{DocumentError, OrderedIniDocument};

fn read_fixture(path: &str) -> String {
    fs::read_to_string(format!("tests/fixtures/{path}")).expect("Failed to read fixture")
}

/// Test helper to compute diagnostics for a given text
fn compute_diagnostics(text: &str) -> Vec<tower_lsp::lsp_types::Diagnostic> {
    let mut collector = DiagnosticCollector::new();
    if let Err(error) = IniParser::default().parse(text) {
        collector.add_parse_error(&error, text);
    }
    collector.into_diagnostics()
}

fn section_names(doc: &OrderedIniDocument) -> Vec<String> {
    doc.section_names().map(str::to_string).collect()
}

fn layout(doc: &OrderedIniDocument) -> Vec<(String, Vec<(String, String)>)> {
    doc.sections()
        .iter()
        .map(|s| {
            let pairs = s
                .pairs()
                .iter()
                .map(|p| (p.key().to_string(), p.value().to_string()))
                .collect();
            (s.name().to_string(), pairs)
        })
        .collect()
}

#[test]
fn test_valid_fixture_parses_in_order() {
    let text = read_fixture("valid/settings.ini");
    let doc = IniParser::default().parse(&text).unwrap();

    assert_eq!(section_names(&doc), vec!["Display", "Audio", "Controls"]);
    assert_eq!(
        doc.section("Audio").unwrap().keys().collect::<Vec<_>>(),
        vec!["master_volume", "music_volume", "effects_volume"]
    );
    assert_eq!(doc.get("Display", "refresh_rate"), Some(""));
    assert_eq!(
        doc.section("Controls").unwrap().pair("sprint").unwrap().comments(),
        ["legacy binding, kept for old saves"]
    );
    assert_eq!(doc.trailing_comments(), ["end of file"]);
}

#[test]
fn test_valid_fixture_has_no_diagnostics() {
    let text = read_fixture("valid/settings.ini");
    let diagnostics = compute_diagnostics(&text);
    assert!(
        diagnostics.is_empty(),
        "Expected no diagnostics for valid settings, got: {:?}",
        diagnostics
    );
}

#[test]
fn test_invalid_fixtures_produce_diagnostics() {
    let text = read_fixture("invalid/duplicate_key.ini");
    let diagnostics = compute_diagnostics(&text);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].range.start.line, 2);

    let text = read_fixture("invalid/orphan_pair.ini");
    let diagnostics = compute_diagnostics(&text);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].range.start.line, 1);
}

#[test]
fn test_format_round_trip_preserves_content_and_order() {
    let parser = IniParser::default();
    let text = read_fixture("valid/settings.ini");
    let original = parser.parse(&text).unwrap();

    let formatted = parser.format(&original);
    assert!(parser.validate(&formatted));
    let reparsed = parser.parse(&formatted).unwrap();

    assert_eq!(layout(&reparsed), layout(&original));
    assert_eq!(reparsed.trailing_comments(), original.trailing_comments());
    assert_eq!(parser.format(&reparsed), formatted);
}

#[test]
fn test_section_move_scenario() {
    let mut doc = OrderedIniDocument::new();
    for name in ["A", "B", "C"] {
        doc.add_section(name).unwrap();
    }

    doc.move_section("A", Direction::Down).unwrap();
    assert_eq!(section_names(&doc), vec!["B", "A", "C"]);

    doc.move_section("C", Direction::Up).unwrap();
    assert_eq!(section_names(&doc), vec!["B", "C", "A"]);

    assert!(!doc.can_move_section("A", Direction::Down));
}

#[test]
fn test_pair_move_scenario() {
    let mut doc = OrderedIniDocument::new();
    doc.add_section("S").unwrap();
    doc.add_pair("S", "k1", "v1").unwrap();
    doc.add_pair("S", "k2", "v2").unwrap();

    doc.move_pair("S", "k1", Direction::Down).unwrap();

    assert_eq!(
        layout(&doc),
        vec![(
            "S".to_string(),
            vec![
                ("k2".to_string(), "v2".to_string()),
                ("k1".to_string(), "v1".to_string())
            ]
        )]
    );
}

#[test]
fn test_moves_survive_formatting() {
    let parser = IniParser::default();
    let mut doc = parser.parse(&read_fixture("valid/settings.ini")).unwrap();

    doc.move_section("Controls", Direction::Up).unwrap();
    doc.move_pair("Controls", "sprint", Direction::Up).unwrap();

    let reparsed = parser.parse(&parser.format(&doc)).unwrap();
    assert_eq!(section_names(&reparsed), vec!["Display", "Controls", "Audio"]);
    assert_eq!(
        reparsed.section("Controls").unwrap().keys().collect::<Vec<_>>(),
        vec!["jump", "sprint", "crouch"]
    );
    // Comments travel with their pair
    assert_eq!(
        reparsed.section("Controls").unwrap().pair("sprint").unwrap().comments(),
        ["legacy binding, kept for old saves"]
    );
}

#[test]
fn test_failed_edit_leaves_document_intact() {
    let parser = IniParser::default();
    let mut doc = parser.parse(&read_fixture("valid/settings.ini")).unwrap();
    let before = parser.format(&doc);

    assert_matches!(
        doc.add_section("Audio"),
        Err(DocumentError::DuplicateName { .. })
    );
    assert_matches!(
        doc.move_section("Display", Direction::Up),
        Err(DocumentError::Boundary { .. })
    );
    assert_matches!(
        doc.rename_pair("Audio", "music_volume", "master_volume"),
        Err(DocumentError::DuplicateName { .. })
    );
    assert_matches!(
        doc.remove_section("Network"),
        Err(DocumentError::SectionNotFound { .. })
    );

    assert_eq!(parser.format(&doc), before);
}

#[test]
fn test_session_edit_and_save_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.ini");
    fs::write(&path, read_fixture("valid/settings.ini")).unwrap();

    let mut session = EditSession::open(&fs::read_to_string(&path).unwrap(), IniParser::default());
    assert_eq!(session.mode(), EditMode::Structured);

    let outcome = session
        .apply(Command::DuplicateSection {
            name: "Audio".to_string(),
        })
        .unwrap();
    assert_eq!(
        outcome,
        CommandOutcome::Created {
            name: "Audio (duplicate)".to_string()
        }
    );
    session
        .apply(Command::MoveSection {
            name: "Audio (duplicate)".to_string(),
            direction: Direction::Up,
        })
        .unwrap();
    assert!(session.is_dirty());

    fs::write(&path, session.text()).unwrap();
    session.mark_saved();

    let reloaded = EditSession::open(&fs::read_to_string(&path).unwrap(), IniParser::default());
    let doc = reloaded.document().unwrap();
    assert_eq!(
        section_names(doc),
        vec!["Display", "Audio", "Audio (duplicate)", "Controls"]
    );
    assert_eq!(doc.get("Audio (duplicate)", "music_volume"), Some("0.5"));
}

#[test]
fn test_session_recovers_from_raw_mode() {
    let broken = read_fixture("invalid/orphan_pair.ini");
    let mut session = EditSession::open(&broken, IniParser::default());

    assert_eq!(session.mode(), EditMode::Raw);
    assert_eq!(
        session.parse_error().unwrap().kind,
        ParseErrorKind::PairOutsideSection
    );
    assert_eq!(session.text(), broken);

    session.set_text(&broken.replace("volume = 1\n", ""));
    assert_eq!(session.mode(), EditMode::Structured);
    session
        .apply(Command::AddNewPair {
            section: "Audio".to_string(),
        })
        .unwrap();
    assert_eq!(session.document().unwrap().get("Audio", "NewKey"), Some(""));
}

#[test]
fn test_commands_from_json() {
    let mut doc = IniParser::default()
        .parse(&read_fixture("valid/settings.ini"))
        .unwrap();

    let commands: Vec<Command> = serde_json::from_str(
        r#"[
            { "kind": "renameSection", "from": "Controls", "to": "Input" },
            { "kind": "movePair", "section": "Audio", "key": "effects_volume", "direction": "up" },
            { "kind": "setValue", "section": "Display", "key": "refresh_rate", "value": "144" },
            { "kind": "removePair", "section": "Input", "key": "crouch" }
        ]"#,
    )
    .unwrap();

    for command in commands {
        assert_eq!(doc.apply(command).unwrap(), CommandOutcome::Applied);
    }

    assert_eq!(section_names(&doc), vec!["Display", "Audio", "Input"]);
    assert_eq!(
        doc.section("Audio").unwrap().keys().collect::<Vec<_>>(),
        vec!["master_volume", "effects_volume", "music_volume"]
    );
    assert_eq!(doc.get("Display", "refresh_rate"), Some("144"));
    assert!(!doc.has_key("Input", "crouch"));
}

#[test]
fn test_session_refuses_edits_that_would_change_the_file_on_reload() {
    let text = read_fixture("valid/settings.ini");
    let mut session = EditSession::open(&text, IniParser::default());
    let before = session.text();

    let commands: Vec<Command> = serde_json::from_str(
        r#"[
            { "kind": "renamePair", "section": "Audio", "from": "master_volume", "to": "a=b" },
            { "kind": "renamePair", "section": "Audio", "from": "master_volume", "to": "; master" },
            { "kind": "setValue", "section": "Audio", "key": "master_volume", "value": "1\n[Evil]" },
            { "kind": "addSection", "name": "" }
        ]"#,
    )
    .unwrap();

    for command in commands {
        assert_matches!(
            session.apply(command),
            Err(SessionError::Document(DocumentError::InvalidText { .. }))
        );
    }
    assert_eq!(session.text(), before);

    let reloaded = EditSession::open(&session.text(), IniParser::default());
    assert_eq!(reloaded.mode(), EditMode::Structured);
    assert_eq!(
        layout(reloaded.document().unwrap()),
        layout(session.document().unwrap())
    );
}
