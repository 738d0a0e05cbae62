use cast3m_extract::{Cast3mExtract, Cli, ExtractError, OutputFormatter, OutputMode, UserFriendlyError};
use clap::Parser;
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();
    setup_logging(&cli);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let extractor = match Cast3mExtract::from_cli(&cli) {
        Ok(extractor) => extractor,
        Err(e) => {
            print_startup_error(&cli, &e);
            return exit_code_for(&e);
        }
    };

    if cli.dry_run {
        return handle_dry_run(&cli, &extractor);
    }

    // Skipped files never change the exit code; only a missing document does.
    match extractor.run(&cli.dir) {
        Ok(_) => 0,
        Err(e) => {
            extractor.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &ExtractError) -> i32 {
    match error {
        ExtractError::Config { .. } => 2,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "cast3m-extract.toml".to_string());

    match Cast3mExtract::generate_sample_config(&config_path) {
        Ok(()) => {
            eprintln!("Generated sample configuration file: {}", config_path);
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(cli: &Cli, extractor: &Cast3mExtract) -> i32 {
    let formatter = extractor.output_formatter();

    match extractor.plan(&cli.dir) {
        Ok(artifacts) => {
            let log_path = extractor.config().log_path(&cli.dir);
            formatter.print_plan(&log_path, &artifacts);
            0
        }
        Err(e) => {
            extractor.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn print_startup_error(cli: &Cli, error: &ExtractError) {
    let mode = if cli.plain {
        OutputMode::Plain
    } else {
        OutputMode::Human
    };
    let formatter = OutputFormatter::new(mode, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(cli: &Cli) {
    let env = env_logger::Env::default().default_filter_or(cli.log_filter());
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}
