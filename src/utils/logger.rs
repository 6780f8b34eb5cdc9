use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

/// Logging for the loader. Verbose turns on the per-record debug lines
/// (saved keys, dropped tokens); the default level keeps only the per-file
/// progress and the operator summary. Dependencies stay at warn so client
/// chatter never drowns the run log.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME").cyan();
            let args = record.args();
            let line = match record.level() {
                Level::Error => format!("{} {} {}", name, "ERROR".red(), args),
                Level::Warn => format!("{} {} {}", name, "WARN".yellow(), args),
                Level::Info => format!("{} {}", name, args),
                // Record-level noise; keep it visually quiet.
                _ => format!("{} {}", name, args.to_string().dimmed()),
            };
            writeln!(buf, "{}", line)
        })
        .init();
}
