use crate::error::CliError;
use clap::Parser;
use commands::Commands;
use engine_core::{CancellationToken, EngineConfig, FilterEngine, RenderOptions};
use model::core::entity::EntityKind;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "filterc",
    version,
    about = "Compile filter expressions into parameterized SQL"
)]
struct Cli {
    #[arg(long, global = true, help = "Engine config file (TOML)")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let engine = load_engine(cli.config.as_deref())?;
    let cancel = CancellationToken::new();

    match cli.command {
        Commands::Compile {
            entity,
            dialect,
            offset,
            compact,
            expression,
        } => {
            let options = RenderOptions::for_driver(&dialect)?.with_param_offset(offset);
            let statement = engine.compile(&cancel, parse_entity(&entity)?, &expression, &options)?;
            println!("{}", output::statement_json(&statement, compact)?);
        }
        Commands::Validate {
            entity,
            dialect,
            expression,
        } => {
            let options = RenderOptions::for_driver(&dialect)?;
            engine.validate(&cancel, parse_entity(&entity)?, &expression, &options)?;
            println!("ok");
        }
        Commands::Fields { entity, json } => {
            let entity = parse_entity(&entity)?;
            let catalog = engine
                .catalog(entity)
                .ok_or_else(|| CliError::UnknownEntity(entity.to_string()))?;
            if json {
                println!("{}", output::catalog_json(catalog)?);
            } else {
                output::print_catalog_table(catalog);
            }
        }
    }

    Ok(())
}

fn load_engine(config: Option<&str>) -> Result<FilterEngine, CliError> {
    let config = match config {
        Some(path) => {
            debug!(path, "loading engine config");
            EngineConfig::from_file(path)?
        }
        None => EngineConfig::default(),
    };
    Ok(FilterEngine::new(config)?)
}

fn parse_entity(name: &str) -> Result<EntityKind, CliError> {
    name.parse()
        .map_err(|_| CliError::UnknownEntity(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compile_command() {
        let cli = Cli::try_parse_from([
            "filterc",
            "compile",
            "--entity",
            "note",
            "--dialect",
            "postgres",
            "--offset",
            "2",
            r#"tag == "math""#,
        ])
        .unwrap();

        let Commands::Compile {
            entity,
            dialect,
            offset,
            expression,
            ..
        } = cli.command
        else {
            panic!("expected compile");
        };
        assert_eq!(entity, "note");
        assert_eq!(dialect, "postgres");
        assert_eq!(offset, 2);
        assert_eq!(expression, r#"tag == "math""#);
    }

    #[test]
    fn test_config_flag_is_global() {
        let cli = Cli::try_parse_from([
            "filterc",
            "fields",
            "--entity",
            "class",
            "--config",
            "filter.toml",
        ])
        .unwrap();

        assert_eq!(cli.config.as_deref(), Some("filter.toml"));
    }

    #[test]
    fn test_compile_requires_dialect() {
        assert!(Cli::try_parse_from(["filterc", "compile", "--entity", "note", "pinned"]).is_err());
    }

    #[test]
    fn test_run_reports_invalid_filter_kind() {
        let cli = Cli::try_parse_from([
            "filterc",
            "validate",
            "--entity",
            "note",
            "difficulty > \"hard\"",
        ])
        .unwrap();

        let err = run(cli).unwrap_err();
        assert!(err.to_string().starts_with("type_mismatch: "), "{err}");
    }

    #[test]
    fn test_unknown_entity_and_dialect() {
        assert!(matches!(
            parse_entity("attachment"),
            Err(CliError::UnknownEntity(_))
        ));

        let cli = Cli::try_parse_from([
            "filterc", "compile", "--entity", "memo", "--dialect", "oracle", "pinned",
        ])
        .unwrap();
        let err = run(cli).unwrap_err();
        assert!(err.to_string().starts_with("unsupported_dialect: "), "{err}");
    }

    #[test]
    fn test_statement_json() {
        let engine = load_engine(None).unwrap();
        let statement = engine
            .compile(
                &CancellationToken::new(),
                EntityKind::Note,
                "pinned",
                &RenderOptions::for_driver("sqlite").unwrap(),
            )
            .unwrap();

        let json = output::statement_json(&statement, true).unwrap();
        assert_eq!(
            json,
            r#"{"fragment":"(\"memo\".\"pinned\" = ?)","parameters":[1],"referenced_fields":["pinned"]}"#
        );
    }
}
