//! Console input: stands in for the hotkey, overlay keys and menu clicks
//! when the daemon runs without a desktop shell.
//!
//! One command per line on stdin:
//!
//! | command                  | action                               |
//! |--------------------------|--------------------------------------|
//! | `hotkey`                 | hotkey pressed                       |
//! | `release`                | hotkey modifiers released            |
//! | `down` / `up`            | step (append `!` to hold Shift)      |
//! | `pgdn` / `pgup`          | page through the overlay             |
//! | `home` / `end`           | jump to either end                   |
//! | `0`..`9`                 | slot keys                            |
//! | `del` / `enter` / `esc`  | delete, confirm, cancel              |
//! | `select N` / `select! N` | menu choice, `!` = alternate         |
//! | `place N` / `paste N`    | explicit menu place or paste         |
//! | `remove N`               | delete a menu entry                  |
//! | `clear`                  | clear all                            |
//! | `yes` / `no` / `always`  | answer a clear confirmation          |
//! | `quit`                   | stop the daemon                      |

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::controller::actions::{Action, BezelKey};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),

    #[error("`{0}` needs a menu slot")]
    MissingSlot(String),

    #[error("`{0}` is not a menu slot")]
    BadSlot(String),
}

/// Parse one console line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Action>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let command = command.to_ascii_lowercase();

    let slot = |words: &mut std::str::SplitWhitespace<'_>| -> Result<usize, CommandError> {
        let arg = words
            .next()
            .ok_or_else(|| CommandError::MissingSlot(command.clone()))?;
        arg.parse()
            .map_err(|_| CommandError::BadSlot(arg.to_owned()))
    };

    let action = match command.as_str() {
        "hotkey" | "h" => Action::HotkeyPressed,
        "release" | "r" => Action::ModifiersReleased,
        "down" | "j" => Action::BezelKey(BezelKey::Advance { shift: false }),
        "down!" | "j!" => Action::BezelKey(BezelKey::Advance { shift: true }),
        "up" | "k" => Action::BezelKey(BezelKey::Retreat { shift: false }),
        "up!" | "k!" => Action::BezelKey(BezelKey::Retreat { shift: true }),
        "pgdn" => Action::BezelKey(BezelKey::PageDown),
        "pgup" => Action::BezelKey(BezelKey::PageUp),
        "home" => Action::BezelKey(BezelKey::Home),
        "end" => Action::BezelKey(BezelKey::End),
        "del" | "delete" => Action::BezelKey(BezelKey::Delete),
        "enter" | "confirm" => Action::BezelKey(BezelKey::Confirm),
        "esc" | "cancel" => Action::BezelKey(BezelKey::Cancel),
        digit if digit.len() == 1 && digit.as_bytes()[0].is_ascii_digit() => {
            Action::BezelKey(BezelKey::Digit(digit.as_bytes()[0] - b'0'))
        }
        "select" => Action::MenuSelect {
            slot: slot(&mut words)?,
            alternate: false,
        },
        "select!" => Action::MenuSelect {
            slot: slot(&mut words)?,
            alternate: true,
        },
        "place" => Action::MenuPlace(slot(&mut words)?),
        "paste" => Action::MenuPaste(slot(&mut words)?),
        "remove" => Action::MenuDelete(slot(&mut words)?),
        "clear" => Action::ClearAll,
        "yes" => Action::ClearConfirmation {
            confirmed: true,
            dont_ask_again: false,
        },
        "no" => Action::ClearConfirmation {
            confirmed: false,
            dont_ask_again: false,
        },
        "always" => Action::ClearConfirmation {
            confirmed: true,
            dont_ask_again: true,
        },
        "quit" | "q" => Action::Quit,
        other => return Err(CommandError::Unknown(other.to_owned())),
    };
    Ok(Some(action))
}

/// Read commands from stdin until it closes or the control loop goes away.
pub fn spawn_console(action_tx: UnboundedSender<Action>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("Console input closed");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Console read failed");
                    break;
                }
            };

            match parse_command(&line) {
                Ok(Some(action)) => {
                    if action_tx.send(action).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => info!("{e}"),
            }
        }
    })
}
