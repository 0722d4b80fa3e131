use std::process::ExitCode;

use trigon_engine::app::{self, AppConfig};
use trigon_engine::frame::LoopReport;
use trigon_engine::logging::{init_logging, LoggingConfig};

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());
    exit_code(&app::run(AppConfig::default()))
}

/// Success only when the loop ended on a close request.
fn exit_code(result: &anyhow::Result<LoopReport>) -> ExitCode {
    match result {
        Ok(report) => {
            log::debug!("exiting cleanly after {} frames", report.frames);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
