//! One-shot cycle runner.
//!
//! Reads a meeting payload (JSON or legacy minutes text), merges it into
//! the report workbook, and prints a summary of the new revision.
//!
//! Usage: statusbook <meeting-file> [artifact] [weekly|biweekly] [output]
//!
//! `artifact` may be a local `.xlsx` path or an http(s) URL; it falls
//! back to `STATUSBOOK_ARTIFACT`. When the artifact was downloaded, the
//! result is written to `output` (default: Statusbook_<timestamp>.xlsx
//! in the current directory); local artifacts are updated in place.

use std::path::PathBuf;
use std::process::ExitCode;

use statusbook::config::Config;
use statusbook::fetch::{self, WorkingCopy};
use statusbook::types::Cadence;
use statusbook::{normalize_text, process_cycle};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            log::error!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(meeting_file) = args.first() else {
        return Err(
            "usage: statusbook <meeting-file> [artifact] [weekly|biweekly] [output]".to_string(),
        );
    };

    let config = Config::from_env();
    let source = args
        .get(1)
        .cloned()
        .or(config.artifact_source)
        .ok_or_else(|| {
            "no artifact given (pass a path/URL or set STATUSBOOK_ARTIFACT)".to_string()
        })?;
    let cadence = args
        .get(2)
        .map(|s| Cadence::parse(s))
        .unwrap_or(config.cadence);

    let payload = std::fs::read_to_string(meeting_file)
        .map_err(|e| format!("failed to read {}: {}", meeting_file, e))?;
    let record = normalize_text(&payload)?;

    let copy = fetch::acquire(&source).map_err(|e| e.to_string())?;
    let result = process_cycle(copy.path(), &record, cadence).map_err(|e| e.to_string())?;

    // Downloaded copies vanish on drop; move the finished workbook out.
    if let WorkingCopy::Downloaded(_) = &copy {
        let output = args.get(3).map(PathBuf::from).unwrap_or_else(|| {
            let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            PathBuf::from(format!("Statusbook_{}.xlsx", stamp))
        });
        std::fs::copy(copy.path(), &output)
            .map_err(|e| format!("failed to write {}: {}", output.display(), e))?;
        log::info!("wrote {}", output.display());
    } else if let Some(output) = args.get(3) {
        if PathBuf::from(output) != PathBuf::from(&source) {
            std::fs::copy(copy.path(), output)
                .map_err(|e| format!("failed to write {}: {}", output, e))?;
            log::info!("wrote {}", output);
        }
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&result).expect("result serializes")
    );
    Ok(())
}
