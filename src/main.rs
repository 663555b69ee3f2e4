use std::{env, fs::read_to_string, path::Path, process::ExitCode, sync::Once, time::Instant};

use minicpp::{
    display_error,
    pipeline::{parse_source, run, Options},
};

static TRACING_INIT: Once = Once::new();

/// Diagnostics go to stderr; only set up when `RUST_LOG` is present.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

fn usage() -> ExitCode {
    eprintln!("usage: minicpp <file> [--check]");
    ExitCode::from(2)
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let check_only = args.iter().any(|arg| arg == "--check");
    let Some(file_path) = args.iter().find(|arg| !arg.starts_with("--")) else {
        return usage();
    };

    let file_name = Path::new(file_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.clone());

    let source = match read_to_string(file_path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", file_path, error);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let mut program = match parse_source(&source, &file_name) {
        Ok(program) => program,
        Err(error) => {
            display_error(&error, &source);
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(elapsed = ?start.elapsed(), "parsed");

    let options = Options {
        echo: true,
        evaluate: !check_only,
    };
    let out = run(&mut program, &options);
    tracing::debug!(elapsed = ?start.elapsed(), "finished");

    if out.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
