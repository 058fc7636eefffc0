use super::*;
use crate::core::completion::{DEFAULT_BASE_URL, DEFAULT_MODEL};

fn parse_args(argv: &[&str]) -> Args {
    Args::try_parse_from(argv)
        .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
}

fn parse_line(line: &str) -> Args {
    let argv: Vec<&str> = line.split_whitespace().collect();
    parse_args(&argv)
}

#[test]
fn no_subcommand_means_chat_with_defaults() {
    let args = parse_args(&["fivepoints"]);
    assert!(args.command.is_none());
    assert_eq!(args.zone, None);
    assert_eq!(args.model, None);
    assert_eq!(args.log, None);
}

#[test]
fn zone_flag_parses_case_insensitively() {
    for argv in [
        &["fivepoints", "-z", "learning"][..],
        &["fivepoints", "--zone", "Learning"][..],
        &["fivepoints", "chat", "-z", "LEARNING"][..],
    ] {
        assert_eq!(
            parse_args(argv).zone,
            Some(ZoneId::Learning),
            "argv={argv:?}"
        );
    }
}

#[test]
fn unknown_zone_is_rejected() {
    let result = Args::try_parse_from(["fivepoints", "-z", "kitchen"]);
    assert!(result.is_err());
}

#[test]
fn global_flags_work_after_subcommand() {
    let args = parse_line("fivepoints chat -m gemini-2.5-pro -l chat.log");
    assert!(matches!(args.command, Some(Commands::Chat)));
    assert_eq!(args.model.as_deref(), Some("gemini-2.5-pro"));
    assert_eq!(args.log, Some(PathBuf::from("chat.log")));
}

#[test]
fn say_collects_prompt_words() {
    let args = parse_line("fivepoints say -z support I need -- rest");
    assert_eq!(args.zone, Some(ZoneId::Support));
    match args.command {
        Some(Commands::Say { prompt }) => {
            assert_eq!(prompt.first().map(String::as_str), Some("I"));
            assert!(prompt.contains(&"rest".to_string()));
        }
        _ => panic!("expected say subcommand"),
    }
}

#[test]
fn say_requires_a_prompt() {
    assert!(Args::try_parse_from(["fivepoints", "say"]).is_err());
}

#[test]
fn set_accepts_multi_word_values_and_unset_takes_key() {
    match parse_args(&["fivepoints", "set", "model", "gemini", "pro"]).command {
        Some(Commands::Set { key, value }) => {
            assert_eq!(key, "model");
            assert_eq!(value, vec!["gemini", "pro"]);
        }
        _ => panic!("expected set subcommand"),
    }
    match parse_args(&["fivepoints", "set", "model"]).command {
        Some(Commands::Set { value, .. }) => assert!(value.is_empty()),
        _ => panic!("expected set subcommand"),
    }
    assert!(matches!(
        parse_args(&["fivepoints", "unset", "base-url"]).command,
        Some(Commands::Unset { key }) if key == "base-url"
    ));
}

#[test]
fn cli_flags_override_config() {
    let config = Config {
        default_zone: Some(ZoneId::Silence),
        model: Some("from-config".to_string()),
        base_url: Some("http://localhost:9000/v1beta".to_string()),
    };

    let settings = ResolvedSettings::resolve(&parse_args(&["fivepoints"]), &config);
    assert_eq!(settings.zone, ZoneId::Silence);
    assert_eq!(settings.model, "from-config");
    assert_eq!(settings.base_url, "http://localhost:9000/v1beta");

    let settings = ResolvedSettings::resolve(
        &parse_args(&["fivepoints", "-z", "discussion", "-m", "from-flag"]),
        &config,
    );
    assert_eq!(settings.zone, ZoneId::Discussion);
    assert_eq!(settings.model, "from-flag");
}

#[test]
fn empty_config_resolves_to_builtin_defaults() {
    let settings = ResolvedSettings::resolve(&parse_args(&["fivepoints"]), &Config::default());
    assert_eq!(
        settings,
        ResolvedSettings {
            zone: ZoneId::Observation,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    );
    let client = settings.client();
    assert_eq!(client.model(), DEFAULT_MODEL);
    assert_eq!(client.base_url(), DEFAULT_BASE_URL);
}
