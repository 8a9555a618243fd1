use clap::Parser;

use super::args::CliArgs;

#[test]
fn parses_defaults() {
    let args = CliArgs::try_parse_from(["renderhook", "src/view.js"]).expect("args should parse");

    assert_eq!(args.files, vec![std::path::PathBuf::from("src/view.js")]);
    assert!(args.out_dir.is_none());
    assert!(args.config.is_none());
    assert!(args.macro_source.is_none());
    assert!(!args.jsx);
    assert_eq!(args.pretty_override(), None);
}

#[test]
fn parses_common_flags() {
    let args = CliArgs::try_parse_from([
        "renderhook",
        "-o",
        "dist",
        "--config",
        "renderhook.json",
        "--macro-source",
        "./hooks.macro",
        "--jsx",
        "--no-pretty",
        "a.js",
        "b.jsx",
    ])
    .expect("flagged args should parse");

    assert_eq!(args.out_dir.as_deref(), Some(std::path::Path::new("dist")));
    assert_eq!(
        args.config.as_deref(),
        Some(std::path::Path::new("renderhook.json"))
    );
    assert_eq!(args.macro_source.as_deref(), Some("./hooks.macro"));
    assert!(args.jsx);
    assert_eq!(args.pretty_override(), Some(false));
    assert_eq!(args.files.len(), 2);
}

#[test]
fn last_pretty_flag_wins() {
    let args = CliArgs::try_parse_from(["renderhook", "--no-pretty", "--pretty", "a.js"])
        .expect("args should parse");
    assert_eq!(args.pretty_override(), Some(true));

    let args = CliArgs::try_parse_from(["renderhook", "--pretty", "--no-pretty", "a.js"])
        .expect("args should parse");
    assert_eq!(args.pretty_override(), Some(false));
}

#[test]
fn files_are_required() {
    assert!(CliArgs::try_parse_from(["renderhook"]).is_err());
}
