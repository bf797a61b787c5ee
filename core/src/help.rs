//! Help system — usage text for every `cafem` command.
//!
//! Two levels of detail:
//!
//! 1. **Overview** (`cafem help`) lists all commands
//! 2. **Group help** (`cafem help calendar`) explains one command group


/// Generate help text for a given topic.
pub fn help_text(topic: Option<&str>) -> String {
    match topic {
        None => overview(),
        Some(t) => match group_help(t) {
            Some(text) => text,
            None => format!(
                "Unknown help topic: '{}'. Run 'cafem help' for a list of commands.",
                t
            ),
        },
    }
}


fn overview() -> String {
    "\
cafem — cafe operations manual

Usage: cafem <command> [args...]

Commands:
  status                       Daily progress, edit mode, last update
  help [topic]                 Show help (this message, or help on a topic)
  tui                          Interactive cleaning checklist

Checklist commands:
  tasks [period]               List cleaning tasks (daily, weekly, monthly)
  toggle <period> <task-id>    Mark a task done, or undo it
  history [limit]              Show recent updates (default 10)

Settings commands:
  edit-mode <on|off>           Turn edit mode on or off

Calendar commands:
  calendar show                Show the calendar frame URL
  calendar set <markup>        Store calendar embed code
  calendar clear               Remove stored embed code

Backup commands:
  backup [dir]                 Export menus, checklists and settings
  restore <file>               Restore from a backup file

Reference commands:
  menu list                    List drink and food menus
  menu show <id>               Recipe, allergens and steps for one menu
  service [section]            Service manual, or one section of it
  troubleshooting              Shop-wide troubleshooting guide
  hygiene [staff|manager]      Hygiene rules
  airpay                       Payment terminal manual

Environment:
  CAFE_MANUAL_HOME             Config directory (default ~/.config/cafe-manual)
  CAFE_MANUAL_LOG              Log level: error, warn, info, debug, trace"
        .to_string()
}


fn group_help(group: &str) -> Option<String> {
    let text = match group {
        "tasks" | "toggle" | "checklist" => "\
Checklist commands — daily, weekly and monthly cleaning tasks

  tasks [daily|weekly|monthly]
    List tasks with their completion state. Without a period, all
    periods are listed with a progress count each.

  toggle <period> <task-id>
    Flip one task between done and not done. Completing a task records
    the time. An unknown id is reported and nothing changes.

The daily list is cleared automatically the first time the manual is
opened on a new calendar day.",
        "history" => "\
history [limit]
  Show the most recent updates, newest first. Every save, calendar
  change and restore is recorded; only the last 50 are kept.",
        "edit-mode" | "settings" => "\
edit-mode <on|off>
  Store the edit-mode flag. The flag is saved with the rest of the
  settings and included in backups.",
        "calendar" => "\
Calendar commands — the cleaning calendar shown beside the checklist

  calendar show
    Print the frame URL in use. With nothing configured this is the
    public holiday calendar.

  calendar set <markup>
    Store embed code copied from a calendar service. The code must
    contain an <iframe> ... </iframe> element. Quote it in the shell.

  calendar clear
    Remove the stored embed code and fall back to the default.",
        "backup" | "restore" => "\
Backup commands

  backup [dir]
    Write menus, cleaning checklists and settings to
    cafe-manual-backup-<millis>.json in <dir>, or the configured
    backup directory. The service manual is not included.

  restore <file>
    Replace menus, checklists and settings with those in <file>.
    Records missing from the file are left as they are.",
        "menu" => "\
Menu commands

  menu list
    List menu ids and names.

  menu show <id>
    Show ingredients, equipment, allergens, steps, troubleshooting
    and quality standards for one menu.",
        "service" => "\
service [section]
  Without a section, list the service manual sections. With one,
  print that section.",
        "troubleshooting" | "hygiene" | "airpay" | "reference" => "\
Reference commands

  troubleshooting
    Shop-wide problems and their fixes.

  hygiene [staff|manager]
    Hygiene rules for staff (default) or managers.

  airpay
    Payment terminal manual: methods, checklist, cautions, videos.",
        "tui" => "\
tui
  Interactive checklist.

  j/k, arrows     select task
  space, enter    toggle selected task
  tab, h/l        switch period
  e               toggle edit mode
  ?               help
  q, esc          quit",
        _ => return None,
    };
    Some(text.to_string())
}
