use crate::command::Command;


/// Parse CLI arguments into a typed Command enum.
///
/// Arguments are expected WITHOUT the program name (i.e., `args` should
/// be `["tasks", "daily"]`, not `["cafem", "tasks", "daily"]`).
pub fn parse_args(args: &[&str]) -> Result<Command, String> {
    if args.is_empty() {
        return Err("No command specified. Run 'cafem help' for usage.".into());
    }

    match args[0] {
        "status" => Ok(Command::Status),
        "help" => parse_help(args),
        "tui" => Ok(Command::Tui),
        "tasks" => parse_tasks(args),
        "toggle" => parse_toggle(args),
        "edit-mode" => parse_edit_mode(args),
        "history" => parse_history(args),
        "calendar" => parse_calendar(args),
        "backup" => Ok(Command::BackupExport {
            dir: args.get(1).map(|s| s.to_string()),
        }),
        "restore" => parse_restore(args),
        "menu" => parse_menu(args),
        "service" => Ok(Command::ServiceShow {
            section: args.get(1).map(|s| s.to_string()),
        }),
        "troubleshooting" => Ok(Command::TroubleshootingList),
        "hygiene" => parse_hygiene(args),
        "airpay" => Ok(Command::AirpayShow),
        _ => Err(format!("Unknown command: '{}'", args[0])),
    }
}


// ---------------------------------------------------------------------------
// Sub-parsers
// ---------------------------------------------------------------------------

/// `cafem help [topic]`
fn parse_help(args: &[&str]) -> Result<Command, String> {
    let topic = if args.len() > 1 {
        Some(args[1..].join(" "))
    } else {
        None
    };
    Ok(Command::Help { topic })
}

/// `cafem tasks [daily|weekly|monthly]`
fn parse_tasks(args: &[&str]) -> Result<Command, String> {
    if args.len() > 2 {
        return Err("Usage: cafem tasks [daily|weekly|monthly]".into());
    }
    Ok(Command::TaskList {
        period: args.get(1).map(|s| s.to_string()),
    })
}

/// `cafem toggle <period> <task-id>`
fn parse_toggle(args: &[&str]) -> Result<Command, String> {
    if args.len() != 3 {
        return Err("Usage: cafem toggle <daily|weekly|monthly> <task-id>".into());
    }
    Ok(Command::TaskToggle {
        period: args[1].into(),
        id: args[2].into(),
    })
}

/// `cafem edit-mode <on|off>`
fn parse_edit_mode(args: &[&str]) -> Result<Command, String> {
    let enabled = match args.get(1).copied() {
        Some("on") | Some("true") => true,
        Some("off") | Some("false") => false,
        _ => return Err("Usage: cafem edit-mode <on|off>".into()),
    };
    Ok(Command::EditMode { enabled })
}

/// `cafem history [limit]`
fn parse_history(args: &[&str]) -> Result<Command, String> {
    let limit = match args.get(1) {
        Some(s) => Some(
            s.parse::<usize>()
                .map_err(|_| format!("history limit must be a number, got '{}'", s))?,
        ),
        None => None,
    };
    Ok(Command::HistoryList { limit })
}

/// `cafem calendar <show|set <markup...>|clear>`
fn parse_calendar(args: &[&str]) -> Result<Command, String> {
    if args.len() < 2 {
        return Err("Usage: cafem calendar <show|set <markup>|clear>".into());
    }
    match args[1] {
        "show" => Ok(Command::CalendarShow),
        "clear" => Ok(Command::CalendarClear),
        "set" => {
            if args.len() < 3 {
                return Err("Usage: cafem calendar set <markup>".into());
            }
            // markup usually arrives as one quoted argument; rejoin if split
            Ok(Command::CalendarSet {
                markup: args[2..].join(" "),
            })
        }
        _ => Err(format!("Unknown calendar subcommand: '{}'", args[1])),
    }
}

/// `cafem restore <file>`
fn parse_restore(args: &[&str]) -> Result<Command, String> {
    if args.len() != 2 {
        return Err("Usage: cafem restore <file>".into());
    }
    Ok(Command::BackupRestore {
        path: args[1].into(),
    })
}

/// `cafem menu <list|show <id>>`
fn parse_menu(args: &[&str]) -> Result<Command, String> {
    match args.get(1).copied() {
        None | Some("list") => Ok(Command::MenuList),
        Some("show") => {
            if args.len() < 3 {
                return Err("Usage: cafem menu show <id>".into());
            }
            Ok(Command::MenuShow { id: args[2].into() })
        }
        Some(other) => Err(format!("Unknown menu subcommand: '{}'", other)),
    }
}

/// `cafem hygiene [staff|manager]`
fn parse_hygiene(args: &[&str]) -> Result<Command, String> {
    match args.get(1).copied() {
        None => Ok(Command::HygieneShow { audience: None }),
        Some(a @ ("staff" | "manager")) => Ok(Command::HygieneShow {
            audience: Some(a.into()),
        }),
        Some(other) => Err(format!(
            "Unknown hygiene audience: '{}' (expected staff or manager)",
            other
        )),
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args() {
        assert!(parse_args(&[]).is_err());
    }

    #[test]
    fn unknown_command() {
        assert!(parse_args(&["bogus"]).is_err());
    }

    #[test]
    fn status() {
        assert_eq!(parse_args(&["status"]).unwrap(), Command::Status);
    }

    #[test]
    fn help_with_topic() {
        let cmd = parse_args(&["help", "calendar"]).unwrap();
        assert_eq!(cmd, Command::Help { topic: Some("calendar".into()) });
        assert_eq!(parse_args(&["help"]).unwrap(), Command::Help { topic: None });
    }

    #[test]
    fn tasks_optional_period() {
        assert_eq!(parse_args(&["tasks"]).unwrap(), Command::TaskList { period: None });
        assert_eq!(
            parse_args(&["tasks", "weekly"]).unwrap(),
            Command::TaskList { period: Some("weekly".into()) }
        );
        assert!(parse_args(&["tasks", "weekly", "extra"]).is_err());
    }

    #[test]
    fn toggle() {
        let cmd = parse_args(&["toggle", "daily", "daily-2"]).unwrap();
        assert_eq!(
            cmd,
            Command::TaskToggle { period: "daily".into(), id: "daily-2".into() }
        );
    }

    #[test]
    fn toggle_missing_id() {
        assert!(parse_args(&["toggle", "daily"]).is_err());
    }

    #[test]
    fn edit_mode() {
        assert_eq!(
            parse_args(&["edit-mode", "on"]).unwrap(),
            Command::EditMode { enabled: true }
        );
        assert_eq!(
            parse_args(&["edit-mode", "off"]).unwrap(),
            Command::EditMode { enabled: false }
        );
        assert!(parse_args(&["edit-mode", "maybe"]).is_err());
        assert!(parse_args(&["edit-mode"]).is_err());
    }

    #[test]
    fn history_limit() {
        assert_eq!(parse_args(&["history"]).unwrap(), Command::HistoryList { limit: None });
        assert_eq!(
            parse_args(&["history", "5"]).unwrap(),
            Command::HistoryList { limit: Some(5) }
        );
        assert!(parse_args(&["history", "five"]).is_err());
    }

    #[test]
    fn calendar_subcommands() {
        assert_eq!(parse_args(&["calendar", "show"]).unwrap(), Command::CalendarShow);
        assert_eq!(parse_args(&["calendar", "clear"]).unwrap(), Command::CalendarClear);
        let cmd = parse_args(&["calendar", "set", "<iframe src=x>", "</iframe>"]).unwrap();
        assert_eq!(
            cmd,
            Command::CalendarSet { markup: "<iframe src=x> </iframe>".into() }
        );
        assert!(parse_args(&["calendar", "set"]).is_err());
        assert!(parse_args(&["calendar"]).is_err());
        assert!(parse_args(&["calendar", "delete"]).is_err());
    }

    #[test]
    fn backup_and_restore() {
        assert_eq!(parse_args(&["backup"]).unwrap(), Command::BackupExport { dir: None });
        assert_eq!(
            parse_args(&["backup", "/tmp/out"]).unwrap(),
            Command::BackupExport { dir: Some("/tmp/out".into()) }
        );
        assert_eq!(
            parse_args(&["restore", "b.json"]).unwrap(),
            Command::BackupRestore { path: "b.json".into() }
        );
        assert!(parse_args(&["restore"]).is_err());
    }

    #[test]
    fn menu() {
        assert_eq!(parse_args(&["menu"]).unwrap(), Command::MenuList);
        assert_eq!(parse_args(&["menu", "list"]).unwrap(), Command::MenuList);
        assert_eq!(
            parse_args(&["menu", "show", "cafeLatte"]).unwrap(),
            Command::MenuShow { id: "cafeLatte".into() }
        );
        assert!(parse_args(&["menu", "show"]).is_err());
    }

    #[test]
    fn reference_commands() {
        assert_eq!(
            parse_args(&["service", "hours"]).unwrap(),
            Command::ServiceShow { section: Some("hours".into()) }
        );
        assert_eq!(parse_args(&["troubleshooting"]).unwrap(), Command::TroubleshootingList);
        assert_eq!(parse_args(&["airpay"]).unwrap(), Command::AirpayShow);
        assert_eq!(
            parse_args(&["hygiene", "manager"]).unwrap(),
            Command::HygieneShow { audience: Some("manager".into()) }
        );
        assert!(parse_args(&["hygiene", "visitors"]).is_err());
    }

    #[test]
    fn tui() {
        assert_eq!(parse_args(&["tui"]).unwrap(), Command::Tui);
    }
}
