use adgen::{cli::Cli, logger, AdGenError, Pipeline, ScriptResult};
use clap::{error::ErrorKind, Parser};
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                return ExitCode::SUCCESS;
            }
            let err = AdGenError::InvalidArgument(summarize_parse_error(&e.to_string()));
            return emit(&ScriptResult::failure(None, &err));
        }
    };

    if let Err(e) = logger::init_with_config(cli.logger_config()) {
        eprintln!("{}", e);
    }
    if dotenv_loaded {
        log::debug!(".env file loaded");
    }

    let result = run(&cli).await;
    emit(&result)
}

async fn run(cli: &Cli) -> ScriptResult {
    let request = match cli.pipeline_request() {
        Ok(request) => request,
        Err(e) => {
            log::error!("{}", e);
            return ScriptResult::failure(Some(cli.variation), &e);
        }
    };

    let pipeline = match Pipeline::from_config(cli.to_config()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            log::error!("Script execution failed: {}", e);
            return ScriptResult::failure(Some(cli.variation), &e);
        }
    };

    log::info!(
        "Running variation {} ({})",
        cli.variation,
        if pipeline.uploads() { "upload" } else { "inline" }
    );
    pipeline.execute(&request).await
}

/// Keeps clap's error text up to the usage block, on one line.
fn summarize_parse_error(message: &str) -> String {
    let summary = message
        .lines()
        .map(str::trim)
        .take_while(|line| !line.starts_with("Usage:"))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let summary = summary.trim_start_matches("error: ");
    if summary.is_empty() {
        "invalid arguments".to_string()
    } else {
        summary.to_string()
    }
}

fn emit(result: &ScriptResult) -> ExitCode {
    let json = result.to_json().unwrap_or_else(|e| {
        format!(
            "{{\"success\": false, \"error\": {}}}",
            serde_json::Value::String(e.to_string())
        )
    });

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", json);
    let _ = stdout.flush();

    ExitCode::from(result.exit_code())
}
