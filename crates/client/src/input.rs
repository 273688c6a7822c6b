//! Line-based input for the terminal client.
//!
//! Each line of input maps to one [`Command`]. The mapping is kept here so
//! the app loop never deals with raw strings.

use std::str::FromStr;

use thiserror::Error;

/// High-level outcome of reading one input line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Advance text, pick the highlighted entry or stop the meter.
    Confirm,
    /// Step back out of a selection.
    Cancel,
    Left,
    Right,
    Up,
    Down,
    /// Let time pass. `None` uses the configured tick.
    Wait(Option<f32>),
    /// Print recent battle log entries.
    Log,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("unknown command `{0}` (type `help` for a list)")]
    Unknown(String),

    #[error("`{0}` is not a valid number of seconds")]
    InvalidDuration(String),

    #[error("`{command}` takes no arguments")]
    UnexpectedArgument { command: String },
}

impl FromStr for Command {
    type Err = InputError;

    /// An empty line confirms.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Command::Confirm);
        };
        let head = head.to_ascii_lowercase();
        let argument = words.next();

        if head == "wait" || head == "t" {
            let seconds = match argument {
                None => None,
                Some(raw) => match raw.parse::<f32>() {
                    Ok(seconds) if seconds.is_finite() && seconds > 0.0 => Some(seconds),
                    _ => return Err(InputError::InvalidDuration(raw.to_owned())),
                },
            };
            return Ok(Command::Wait(seconds));
        }

        let command = match head.as_str() {
            "c" | "confirm" | "ok" => Command::Confirm,
            "x" | "cancel" | "back" => Command::Cancel,
            "a" | "h" | "left" => Command::Left,
            "d" | "l" | "right" => Command::Right,
            "w" | "k" | "up" => Command::Up,
            "s" | "j" | "down" => Command::Down,
            "log" => Command::Log,
            "?" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return Err(InputError::Unknown(head)),
        };

        if argument.is_some() {
            return Err(InputError::UnexpectedArgument { command: head });
        }
        Ok(command)
    }
}

/// Shown for `help`.
pub const HELP: &str = "\
commands:
  <enter>, c     confirm / stop the meter
  x              cancel
  a, d           left / right
  w, s           up / down
  wait [secs]    let time pass (moves the power meter)
  log            recent battle log
  q              quit";
