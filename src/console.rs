//! # Interactive Console
//!
//! A line-oriented front end for exercising a [`ChainedTable`]. The first non-whitespace
//! character of a line selects the command (case-insensitive) and the rest of the line
//! holds its whitespace-delimited arguments:
//!
//! | Command | Arguments | Effect |
//! |---|---|---|
//! | `i` | key, integer | insert or overwrite |
//! | `s` | key | search |
//! | `r` | key | remove |
//! | `p` | | dump size, capacity and every chain |
//! | `m` | | print the menu |
//! | `c` | | drop every entry and reset the capacity |
//! | `q` | | quit |
//!
//! Unknown letters and blank lines are ignored. Malformed arguments are reported and the
//! session carries on.

use std::io::{self, BufRead, Write};
use std::str::Utf8Error;

use log::debug;
use thiserror::Error;

use crate::cs::hashing::ChainedTable;
use crate::error::Error;

pub const MENU: &str = "\
insert: i <key:string> <value:integer>
search: s <key:string>
remove: r <key:string>
print:  p
clear:  c
quit:   q
menu:   m
";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert { key: String, value: i32 },
    Search { key: String },
    Remove { key: String },
    Print,
    Menu,
    Clear,
    Quit,
}

/// Why a line could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("missing {0} argument")]
    MissingArgument(&'static str),

    #[error("invalid integer {0:?}")]
    InvalidInteger(String),

    #[error("line is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] Utf8Error),
}

/// Whether the session keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parses one input line. Returns `Ok(None)` for blank lines and unknown command letters.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim_start();
    let mut chars = line.chars();
    let Some(letter) = chars.next() else {
        return Ok(None);
    };
    let mut args = chars.as_str().split_whitespace();

    let command = match letter.to_ascii_lowercase() {
        'i' => {
            let key = args.next().ok_or(CommandError::MissingArgument("key"))?;
            let value = args.next().ok_or(CommandError::MissingArgument("value"))?;
            Command::Insert {
                key: key.to_string(),
                value: parse_integer(value)?,
            }
        }
        's' => Command::Search {
            key: args
                .next()
                .ok_or(CommandError::MissingArgument("key"))?
                .to_string(),
        },
        'r' => Command::Remove {
            key: args
                .next()
                .ok_or(CommandError::MissingArgument("key"))?
                .to_string(),
        },
        'p' => Command::Print,
        'm' => Command::Menu,
        'c' => Command::Clear,
        'q' => Command::Quit,
        _ => return Ok(None),
    };
    Ok(Some(command))
}

/// Parses an `i32` written in decimal, `0x` hexadecimal or leading-zero octal,
/// with an optional sign.
pub fn parse_integer(text: &str) -> Result<i32, CommandError> {
    let invalid = || CommandError::InvalidInteger(text.to_string());

    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (radix, digits) = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        (16, hex)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return Err(invalid());
    }

    let magnitude = i64::from_str_radix(digits, radix).map_err(|_| invalid())?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).map_err(|_| invalid())
}

/// A console session writing to `W`.
pub struct Console<W: Write> {
    table: ChainedTable,
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(table: ChainedTable, out: W) -> Self {
        Self { table, out }
    }

    pub fn table(&self) -> &ChainedTable {
        &self.table
    }

    /// Ends the session, handing back the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    pub fn print_menu(&mut self) -> io::Result<()> {
        write!(self.out, "{}", MENU)
    }

    /// Reads commands until `q` or end of input.
    /// Lines that are not valid UTF-8 are reported like any other malformed input.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> io::Result<()> {
        let mut line = Vec::new();
        loop {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            let parsed = std::str::from_utf8(&line)
                .map_err(CommandError::from)
                .and_then(parse_command);
            match parsed {
                Ok(Some(command)) => {
                    if self.execute(command)? == Flow::Quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    debug!("rejected {:?}: {}", String::from_utf8_lossy(&line), err);
                    writeln!(self.out, "Input error. Continue.")?;
                }
            }
            self.out.flush()?;
        }
        self.out.flush()
    }

    /// Applies one command to the table and reports the outcome.
    pub fn execute(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Insert { key, value } => {
                writeln!(self.out, "Inserting: ({}, {})", key, value)?;
                if let Err(err) = self.table.insert(&key, value) {
                    writeln!(self.out, "Insert failed: {}", err)?;
                }
            }
            Command::Search { key } => {
                writeln!(self.out, "Searching for: {}", key)?;
                match self.table.search(&key) {
                    Ok(value) => writeln!(self.out, "Value: {}", value)?,
                    Err(Error::NotFound) => writeln!(self.out, "Mapping not found.")?,
                    Err(err) => writeln!(self.out, "Search failed: {}", err)?,
                }
            }
            Command::Remove { key } => {
                writeln!(self.out, "Removing: {}", key)?;
                match self.table.remove(&key) {
                    Ok(_) => {}
                    Err(Error::NotFound) => writeln!(self.out, "Mapping not found.")?,
                    Err(err) => writeln!(self.out, "Remove failed: {}", err)?,
                }
            }
            Command::Print => write!(self.out, "{}", self.table)?,
            Command::Menu => self.print_menu()?,
            Command::Clear => {
                if let Err(err) = self.table.clear() {
                    writeln!(self.out, "Clear failed: {}", err)?;
                }
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(input: &str) -> (String, ChainedTable) {
        let mut console = Console::new(ChainedTable::new().unwrap(), Vec::new());
        console.run(input.as_bytes()).unwrap();
        let Console { table, out } = console;
        (String::from_utf8(out).unwrap(), table)
    }

    #[test]
    fn parse_commands() {
        assert_eq!(
            parse_command("i foo 12"),
            Ok(Some(Command::Insert {
                key: "foo".into(),
                value: 12
            }))
        );
        assert_eq!(
            parse_command("  S   foo"),
            Ok(Some(Command::Search { key: "foo".into() }))
        );
        assert_eq!(
            parse_command("R foo"),
            Ok(Some(Command::Remove { key: "foo".into() }))
        );
        assert_eq!(parse_command("p"), Ok(Some(Command::Print)));
        assert_eq!(parse_command("M"), Ok(Some(Command::Menu)));
        assert_eq!(parse_command("c"), Ok(Some(Command::Clear)));
        assert_eq!(parse_command("Q"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn key_may_follow_letter_directly() {
        assert_eq!(
            parse_command("ifoo 3"),
            Ok(Some(Command::Insert {
                key: "foo".into(),
                value: 3
            }))
        );
    }

    #[test]
    fn blank_and_unknown_lines_are_ignored() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("   \t"), Ok(None));
        assert_eq!(parse_command("x foo"), Ok(None));
    }

    #[test]
    fn malformed_arguments() {
        assert_eq!(
            parse_command("i"),
            Err(CommandError::MissingArgument("key"))
        );
        assert_eq!(
            parse_command("i foo"),
            Err(CommandError::MissingArgument("value"))
        );
        assert_eq!(
            parse_command("i foo bar"),
            Err(CommandError::InvalidInteger("bar".into()))
        );
        assert_eq!(parse_command("s"), Err(CommandError::MissingArgument("key")));
        assert_eq!(parse_command("r  "), Err(CommandError::MissingArgument("key")));
    }

    #[test]
    fn integer_forms() {
        assert_eq!(parse_integer("42"), Ok(42));
        assert_eq!(parse_integer("-42"), Ok(-42));
        assert_eq!(parse_integer("+7"), Ok(7));
        assert_eq!(parse_integer("0"), Ok(0));
        assert_eq!(parse_integer("0x1F"), Ok(31));
        assert_eq!(parse_integer("-0X10"), Ok(-16));
        assert_eq!(parse_integer("017"), Ok(15));
        assert_eq!(parse_integer("2147483647"), Ok(i32::MAX));
        assert_eq!(parse_integer("-2147483648"), Ok(i32::MIN));
    }

    #[test]
    fn integer_rejects() {
        for text in ["", "-", "0x", "2147483648", "09", "--1", "+-1", "1.5", "abc"] {
            assert!(parse_integer(text).is_err(), "{:?} should be rejected", text);
        }
    }

    #[test]
    fn insert_search_remove_session() {
        let (out, table) = session("i a 1\ni b 2\ns a\nr a\ns a\nr a\n");
        assert_eq!(
            out,
            "Inserting: (a, 1)\n\
             Inserting: (b, 2)\n\
             Searching for: a\n\
             Value: 1\n\
             Removing: a\n\
             Searching for: a\n\
             Mapping not found.\n\
             Removing: a\n\
             Mapping not found.\n"
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.search("b"), Ok(2));
    }

    #[test]
    fn input_errors_do_not_stop_the_session() {
        let (out, table) = session("i a\ni b x\ni c 3\n");
        assert_eq!(
            out,
            "Input error. Continue.\n\
             Input error. Continue.\n\
             Inserting: (c, 3)\n"
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn non_utf8_line_is_reported_and_skipped() {
        let mut console = Console::new(ChainedTable::new().unwrap(), Vec::new());
        console.run(&b"i a 1\ni \xff\xfe 2\ni b 3\n"[..]).unwrap();
        let Console { table, out } = console;
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Inserting: (a, 1)\n\
             Input error. Continue.\n\
             Inserting: (b, 3)\n"
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.search("b"), Ok(3));
    }

    #[test]
    fn last_line_without_newline_is_executed() {
        let (out, table) = session("i a 1\ns a");
        assert!(out.ends_with("Value: 1\n"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn quit_stops_reading() {
        let (out, table) = session("i a 1\nq\ni b 2\n");
        assert_eq!(out, "Inserting: (a, 1)\n");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn print_and_clear() {
        let (out, table) = session("i a 1\np\nc\np\n");
        let dump = out.strip_prefix("Inserting: (a, 1)\n").unwrap();
        assert!(dump.starts_with("Hash Table\n\tsize = 1\n\tcapacity = 8\n"));
        assert!(dump.contains("\t\tb. #3: [a:1] -> (null)\n"));
        assert!(dump.contains("Hash Table\n\tsize = 0\n"));
        assert!(table.is_empty());
    }

    #[test]
    fn menu_command() {
        let (out, _) = session("m\n");
        assert_eq!(out, MENU);
    }

    #[test]
    fn console_exposes_table() {
        let mut console = Console::new(ChainedTable::new().unwrap(), Vec::new());
        console
            .execute(Command::Insert {
                key: "k".into(),
                value: 9,
            })
            .unwrap();
        assert_eq!(console.table().search("k"), Ok(9));
        assert_eq!(console.execute(Command::Quit).unwrap(), Flow::Quit);
        let out = console.into_output();
        assert_eq!(out, b"Inserting: (k, 9)\n");
    }
}
