use clap::{CommandFactory, Parser};
use factory_context::tooling::cli::{Cli, Commands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["factory-context", "domains"],
        vec!["factory-context", "domains", "--format", "json"],
        vec!["factory-context", "read", "--domain", "inventory"],
        vec![
            "factory-context",
            "read",
            "--domain",
            "inventory",
            "--filter",
            "status=low",
            "--filter",
            "supplier=Supplier C",
        ],
        vec![
            "factory-context",
            "query",
            "--domain",
            "inventory",
            "--expr",
            "current_stock < reorder_point",
            "--limit",
            "5",
        ],
        vec!["factory-context", "analyze", "--domain", "production", "--type", "trends"],
        vec![
            "factory-context",
            "update",
            "--domain",
            "inventory",
            "--id",
            "-1",
            "--set",
            "current_stock=10",
        ],
        vec!["factory-context", "call", "quality", "read", "--data", "{}"],
        vec![
            "factory-context",
            "call",
            "inventory",
            "update",
            "--agent",
            "supervisory_agent",
        ],
        vec!["factory-context", "agents", "--format", "json"],
        vec![
            "factory-context",
            "--workspace",
            "/tmp/plant",
            "--log-level",
            "debug",
            "--log-output",
            "file+stderr",
            "domains",
        ],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_invalid_commands() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["factory-context"],
        vec!["factory-context", "read"],
        vec!["factory-context", "update", "--domain", "inventory", "--id", "2"],
        vec![
            "factory-context",
            "update",
            "--domain",
            "inventory",
            "--id",
            "two",
            "--set",
            "a=1",
        ],
        vec!["factory-context", "query", "--domain", "inventory", "--limit", "-5"],
        vec!["factory-context", "call", "inventory"],
        vec!["factory-context", "scan"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_err(), "expected parse failure for args: {args:?}");
    }
}

#[test]
fn parse_defaults() {
    let cli = Cli::try_parse_from(["factory-context", "analyze", "--domain", "quality"]).unwrap();
    match cli.command {
        Commands::Analyze { kind, format, .. } => {
            assert_eq!(kind, "summary");
            assert_eq!(format, "json");
        }
        other => panic!("unexpected command: {other:?}"),
    }

    let cli = Cli::try_parse_from(["factory-context", "call", "logistics", "read"]).unwrap();
    match cli.command {
        Commands::Call { data, agent, .. } => {
            assert_eq!(data, "{}");
            assert!(agent.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn top_level_help_lists_commands() {
    let mut command = Cli::command();
    let mut output = Vec::new();
    command.write_long_help(&mut output).unwrap();
    let output = String::from_utf8(output).unwrap();

    for token in [
        "domains", "read", "query", "analyze", "update", "call", "agents", "--workspace",
        "--config", "--log-level",
    ] {
        assert!(output.contains(token), "help output missing {token}");
    }
}
