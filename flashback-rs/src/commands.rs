//! Built-in slash commands shown by `/help`.

use crate::model::{Action, Candidate};
use crate::query::{BOOKMARKS_PREFIX, CALC_PREFIX, CLEAR_COMMAND, CLOSED_PREFIX, HELP_PREFIX, TABS_PREFIX, THEME_PREFIX};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    /// Text placed in the input when the help row is picked.
    pub prefill: &'static str,
}

pub const COMMANDS: &[Command] = &[
    Command {
        name: HELP_PREFIX,
        description: "List available commands",
        prefill: HELP_PREFIX,
    },
    Command {
        name: TABS_PREFIX,
        description: "Search open tabs",
        prefill: "/tabs ",
    },
    Command {
        name: CLOSED_PREFIX,
        description: "Reopen recently closed tabs and windows",
        prefill: "/closed ",
    },
    Command {
        name: BOOKMARKS_PREFIX,
        description: "Search bookmarks",
        prefill: "/bookmarks ",
    },
    Command {
        name: THEME_PREFIX,
        description: "Switch the palette theme",
        prefill: "/theme ",
    },
    Command {
        name: CLEAR_COMMAND,
        description: "Delete all browsing history",
        prefill: CLEAR_COMMAND,
    },
    Command {
        name: CALC_PREFIX,
        description: "Evaluate a math expression (e.g. = 5 * 10)",
        prefill: "= ",
    },
];

/// The registry as palette rows.
pub fn help_rows() -> Vec<Candidate> {
    COMMANDS
        .iter()
        .map(|cmd| {
            Candidate::new_command(
                cmd.name,
                cmd.description,
                Action::Prefill {
                    text: cmd.prefill.to_string(),
                },
            )
        })
        .collect()
}
