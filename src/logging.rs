use std::fs::File;
use std::io::{self, Write};

use env_logger::{Builder, Env, Target};

/// Variable naming the log file.
pub const LOG_FILE_VAR: &str = "MAZE_LOG";

/// Installs the logger if `MAZE_LOG` names a file.
///
/// The terminal is taken over by the game, so records go to that file only.
/// The level comes from `RUST_LOG` and defaults to `info`. Returns whether a
/// logger was installed.
pub fn init_logging() -> io::Result<bool> {
    let Some(path) = std::env::var_os(LOG_FILE_VAR) else {
        return Ok(false);
    };
    let file = File::create(path)?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {:5} {}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
    Ok(true)
}
