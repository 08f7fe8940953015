use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::TimelineError;
use crate::export::ExportFormat;
use crate::models::iso_date;

/// One line of user input in the interactive session.
///
/// Phase positions are 1-based here; [`Command::Edit`] and
/// [`Command::Remove`] carry the 0-based index the phase store expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    Name(String),
    Start(NaiveDate),
    Add { weeks: Option<u32>, name: String },
    Edit { position: usize, weeks: u32, name: String },
    Remove { position: usize },
    Notes(String),
    New,
    Save,
    List,
    Load(String),
    Generate { completed_weeks: Option<u32> },
    Export { format: ExportFormat, path: Option<PathBuf> },
    Quit,
}

pub const HELP: &str = "\
Commands:
  show                          Show the current project
  name <text>                   Rename the project
  start <YYYY-MM-DD>            Set the start date
  add [weeks] <name>            Append a phase
  edit <n> <weeks> <name>       Replace phase n
  remove <n>                    Remove phase n
  notes [text]                  Set (or clear) the project notes
  new                           Start a new project
  save                          Save the project as a new document
  list                          List saved documents
  load <document>               Load a saved document
  generate [completed-weeks]    Compute and display the timeline
  export <csv|xlsx|json> [path] Write the timeline to a file
  help                          Show this help
  quit                          Leave the session
";

fn invalid(msg: impl Into<String>) -> TimelineError {
    TimelineError::Validation(msg.into())
}

/// Split off the first whitespace-delimited word.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

fn parse_position(s: &str) -> Result<usize, TimelineError> {
    let n: usize = s
        .parse()
        .map_err(|_| invalid(format!("'{}' is not a phase number", s)))?;
    if n == 0 {
        return Err(invalid("Phase numbers start at 1"));
    }
    Ok(n - 1)
}

fn parse_weeks(s: &str) -> Result<u32, TimelineError> {
    s.parse()
        .map_err(|_| invalid(format!("'{}' is not a number of weeks", s)))
}

fn require<'a>(arg: &'a str, usage: &str) -> Result<&'a str, TimelineError> {
    if arg.is_empty() {
        Err(invalid(format!("Usage: {}", usage)))
    } else {
        Ok(arg)
    }
}

impl FromStr for Command {
    type Err = TimelineError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (verb, rest) = split_word(line);

        match verb.to_ascii_lowercase().as_str() {
            "help" | "?" => Ok(Self::Help),
            "show" => Ok(Self::Show),
            "name" => Ok(Self::Name(require(rest, "name <text>")?.to_string())),
            "start" => {
                let arg = require(rest, "start <YYYY-MM-DD>")?;
                iso_date::parse(arg)
                    .map(Self::Start)
                    .ok_or_else(|| invalid(format!("'{}' is not a YYYY-MM-DD date", arg)))
            }
            "add" => {
                let rest = require(rest, "add [weeks] <name>")?;
                let (first, name) = split_word(rest);
                match first.parse::<u32>() {
                    Ok(weeks) if !name.is_empty() => Ok(Self::Add {
                        weeks: Some(weeks),
                        name: name.to_string(),
                    }),
                    _ => Ok(Self::Add {
                        weeks: None,
                        name: rest.to_string(),
                    }),
                }
            }
            "edit" => {
                let usage = "edit <n> <weeks> <name>";
                let (n, rest) = split_word(require(rest, usage)?);
                let (weeks, name) = split_word(rest);
                Ok(Self::Edit {
                    position: parse_position(n)?,
                    weeks: parse_weeks(require(weeks, usage)?)?,
                    name: require(name, usage)?.to_string(),
                })
            }
            "remove" | "rm" => Ok(Self::Remove {
                position: parse_position(require(rest, "remove <n>")?)?,
            }),
            "notes" => Ok(Self::Notes(rest.to_string())),
            "new" => Ok(Self::New),
            "save" => Ok(Self::Save),
            "list" | "ls" => Ok(Self::List),
            "load" => Ok(Self::Load(require(rest, "load <document>")?.to_string())),
            "generate" | "gen" => {
                let completed_weeks = if rest.is_empty() {
                    None
                } else {
                    Some(parse_weeks(rest)?)
                };
                Ok(Self::Generate { completed_weeks })
            }
            "export" => {
                let usage = "export <csv|xlsx|json> [path]";
                let (format, path) = split_word(require(rest, usage)?);
                let format = ExportFormat::from_str(format)
                    .ok_or_else(|| invalid(format!("Unknown export format '{}'", format)))?;
                Ok(Self::Export {
                    format,
                    path: (!path.is_empty()).then(|| PathBuf::from(path)),
                })
            }
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(invalid(format!(
                "Unknown command '{}' (try 'help')",
                other
            ))),
        }
    }
}
