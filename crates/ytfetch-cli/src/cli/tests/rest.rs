use super::*;

#[test]
fn languages_takes_positional_id() {
    let CliCommand::Languages { id } = parse(&["ytfetch", "languages", "dQw4w9WgXcQ"]) else {
        panic!("expected languages");
    };
    assert_eq!(id, "dQw4w9WgXcQ");
}

#[test]
fn completions_parses_shell() {
    let CliCommand::Completions { shell } = parse(&["ytfetch", "completions", "bash"]) else {
        panic!("expected completions");
    };
    assert_eq!(shell, clap_complete::Shell::Bash);
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["ytfetch"]).is_err());
}

#[test]
fn verbose_only_reported_for_fetch() {
    let cli = Cli::try_parse_from(["ytfetch", "fetch", "--id", "dQw4w9WgXcQ", "-v"]).unwrap();
    assert!(cli.verbose());
    let cli = Cli::try_parse_from(["ytfetch", "languages", "dQw4w9WgXcQ"]).unwrap();
    assert!(!cli.verbose());
}
