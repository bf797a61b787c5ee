//! cafem — command-line entry point for the cafe operations manual.
//!
//! # Usage
//!
//! ```text
//! cafem status
//! cafem tasks daily
//! cafem toggle daily daily-3
//! cafem calendar set '<iframe src="..."></iframe>'
//! cafem backup ~/Desktop
//! cafem tui
//! ```

mod logger;

use std::path::{Path, PathBuf};
use std::process;

use cafe_manual_core::cli::parse_args;
use cafe_manual_core::command::{Command, Response};
use cafe_manual_core::sys::{open_store, Sys};


fn main() {
    logger::init();

    let args: Vec<String> = std::env::args().collect();
    let arg_refs: Vec<&str> = args[1..].iter().map(|s| s.as_str()).collect();

    let cmd = match parse_args(&arg_refs) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("cafem: {}", e);
            process::exit(1);
        }
    };

    let config_dir = resolve_config_dir();
    log::debug!("config dir {}", config_dir.display());

    // Tui owns the store for the whole session, so it bypasses execute_local.
    if matches!(cmd, Command::Tui) {
        let store = match open_store(&config_dir) {
            Ok((store, _)) => store,
            Err(e) => {
                eprintln!("cafem tui: failed to start: {}", e);
                process::exit(1);
            }
        };
        match cafe_manual_tui::tui::Tui::new(store) {
            Ok(mut tui) => {
                if let Err(e) = tui.run() {
                    eprintln!("cafem tui: {}", e);
                    process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("cafem tui: failed to start: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    match execute_local(&config_dir, cmd) {
        Response::Ok { output } => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Response::Error { message } => {
            eprintln!("cafem error: {}", message);
            process::exit(1);
        }
    }
}


fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CAFE_MANUAL_HOME") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(home).join(".config").join("cafe-manual")
}


fn execute_local(config_dir: &Path, cmd: Command) -> Response {
    match Sys::new(config_dir) {
        Ok(mut sys) => sys.execute(cmd),
        Err(e) => Response::Error {
            message: format!("Failed to initialize: {}", e),
        },
    }
}
