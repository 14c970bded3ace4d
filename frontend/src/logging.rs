use chrono::Local;
use env_logger::Target;
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Installs the process logger. `RUST_LOG` is honoured unless `level` is
/// given; with a `file` the log is appended there instead of stderr.
pub fn init(level: Option<LevelFilter>, file: Option<&Path>) -> std::io::Result<()> {
    let mut builder = env_logger::Builder::from_default_env();

    if let Some(level) = level {
        builder.filter_level(level);
    }

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{style}[{}] [{:5}]{style:#} {}",
            Local::now().format("%T%.3f"),
            record.level(),
            record.args(),
            style = buf.default_level_style(record.level()),
        )
    });

    if let Some(path) = file {
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    } else {
        builder.target(Target::Stderr);
    }

    builder.init();
    Ok(())
}
