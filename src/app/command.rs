//! Line commands understood by the host loop.

use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::models::{TabId, TabsetId, TransformKind, UnknownTransform};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    Open(PathBuf),
    Folder(PathBuf),
    /// Row number from the last `tree` listing, 1-based.
    Select(usize),
    Tab(TabId),
    Activate(TabsetId),
    Close(TabId),
    Evict(PathBuf),
    Transform(TransformKind),
    Source(TabId),
    Secondary(TabId),
    Args(String),
    Name(String),
    Apply,
    Confirm,
    Cancel,
    Export { row: usize, destination: PathBuf },
    Tree,
    Tabs,
    /// The transform catalog.
    Kinds,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0} (try `help`)")]
    UnknownCommand(String),
    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("invalid {what}: {value}")]
    Invalid { what: &'static str, value: String },
    #[error(transparent)]
    UnknownTransform(#[from] UnknownTransform),
}

pub const HELP: &str = "\
open <file>             open an image
folder <dir>            list a folder
tree                    show history, numbering its rows
select <row>            bring a history row to the front
tabs                    show tabsets and tabs
tab <T>                 select a tab
activate <S>            activate a tabset
close <T>               close a tab
evict <file>            close a file's tabs and drop its history
transform <kind>        open the transform dialog (kinds: see `transform list`)
source <T> | secondary <T>
args <text> | name <text>
apply | confirm | cancel
export <row> <file>     write a history row's image
quit";

pub fn parse_line(line: &str) -> Result<HostCommand, ParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match word {
        "" => return Err(ParseError::Empty),
        "open" => HostCommand::Open(path_arg("open", rest)?),
        "folder" => HostCommand::Folder(path_arg("folder", rest)?),
        "select" => HostCommand::Select(row_arg("select", rest)?),
        "tab" => HostCommand::Tab(tab_arg("tab", rest)?),
        "activate" => HostCommand::Activate(TabsetId::new(id_arg(
            "activate",
            rest,
            'S',
            "tabset id",
        )?)),
        "close" => HostCommand::Close(tab_arg("close", rest)?),
        "evict" => HostCommand::Evict(path_arg("evict", rest)?),
        "transform" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument {
                    command: "transform",
                    expected: "a transform id",
                });
            }
            if rest == "list" {
                HostCommand::Kinds
            } else {
                HostCommand::Transform(TransformKind::from_str(rest)?)
            }
        }
        "source" => HostCommand::Source(tab_arg("source", rest)?),
        "secondary" => HostCommand::Secondary(tab_arg("secondary", rest)?),
        "args" => HostCommand::Args(rest.to_string()),
        "name" => HostCommand::Name(rest.to_string()),
        "apply" => HostCommand::Apply,
        "confirm" => HostCommand::Confirm,
        "cancel" => HostCommand::Cancel,
        "export" => {
            let (row, destination) = rest.split_once(char::is_whitespace).ok_or(
                ParseError::MissingArgument {
                    command: "export",
                    expected: "a row and a destination",
                },
            )?;
            HostCommand::Export {
                row: row_arg("export", row)?,
                destination: path_arg("export", destination.trim())?,
            }
        }
        "tree" => HostCommand::Tree,
        "tabs" => HostCommand::Tabs,
        "help" | "?" => HostCommand::Help,
        "quit" | "exit" => HostCommand::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(command)
}

fn path_arg(command: &'static str, rest: &str) -> Result<PathBuf, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::MissingArgument {
            command,
            expected: "a path",
        });
    }
    Ok(PathBuf::from(rest))
}

fn row_arg(command: &'static str, rest: &str) -> Result<usize, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::MissingArgument {
            command,
            expected: "a row number",
        });
    }
    match rest.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(ParseError::Invalid {
            what: "row",
            value: rest.to_string(),
        }),
    }
}

fn tab_arg(command: &'static str, rest: &str) -> Result<TabId, ParseError> {
    id_arg(command, rest, 'T', "tab id").map(TabId::new)
}

/// Accepts `T3` / `t3` / `3` style ids.
fn id_arg(
    command: &'static str,
    rest: &str,
    prefix: char,
    what: &'static str,
) -> Result<u64, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::MissingArgument {
            command,
            expected: what,
        });
    }
    let digits = rest
        .strip_prefix(prefix)
        .or_else(|| rest.strip_prefix(prefix.to_ascii_lowercase()))
        .unwrap_or(rest);
    digits.parse().map_err(|_| ParseError::Invalid {
        what,
        value: rest.to_string(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/app/command.rs"]
mod tests;
