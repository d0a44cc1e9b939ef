//! Parsing of the line-oriented command protocol.
//!
//! Every line holds one command with `;`-separated fields:
//!
//! ```text
//! addRoad;<city>;<city>;<length>;<year>
//! repairRoad;<city>;<city>;<year>
//! getRouteDescription;<id>
//! newRoute;<id>;<city>;<city>
//! extendRoute;<id>;<city>
//! removeRoad;<city>;<city>
//! removeRoute;<id>
//! <id>;<city>;<length>;<year>;<city>;...
//! ```
//!
//! The last form stores a whole route as written. Lengths and ids are
//! unsigned decimals, years are signed decimals.

use roadnet_core::description::{DescriptionError, RouteDescription, parse_i32, parse_u32};
use roadnet_core::id::{InvalidRouteId, RouteId};

/// Errors raised while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("{command} takes {expected} arguments, got {found}")]
    Arity {
        command: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("malformed length {0:?}")]
    MalformedLength(String),
    #[error("malformed year {0:?}")]
    MalformedYear(String),
    #[error("malformed route id {0:?}")]
    MalformedRouteId(String),
    #[error(transparent)]
    RouteId(#[from] InvalidRouteId),
    #[error(transparent)]
    Description(#[from] DescriptionError),
}

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddRoad {
        from: String,
        to: String,
        length: u32,
        year: i32,
    },
    RepairRoad {
        from: String,
        to: String,
        year: i32,
    },
    /// Raw id: out-of-range ids describe as empty rather than fail.
    GetRouteDescription(u32),
    NewRoute {
        id: RouteId,
        from: String,
        to: String,
    },
    ExtendRoute {
        id: RouteId,
        city: String,
    },
    RemoveRoad {
        from: String,
        to: String,
    },
    RemoveRoute(RouteId),
    IngestRoute(RouteDescription),
}

fn arity(command: &'static str, args: &[&str], expected: usize) -> Result<(), CommandError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(CommandError::Arity {
            command,
            expected,
            found: args.len(),
        })
    }
}

fn length(field: &str) -> Result<u32, CommandError> {
    parse_u32(field).ok_or_else(|| CommandError::MalformedLength(field.to_owned()))
}

fn year(field: &str) -> Result<i32, CommandError> {
    parse_i32(field).ok_or_else(|| CommandError::MalformedYear(field.to_owned()))
}

fn raw_id(field: &str) -> Result<u32, CommandError> {
    parse_u32(field).ok_or_else(|| CommandError::MalformedRouteId(field.to_owned()))
}

fn route_id(field: &str) -> Result<RouteId, CommandError> {
    Ok(RouteId::new(raw_id(field)?)?)
}

impl Command {
    /// Parse one line, without its terminating newline. Returns `Ok(None)`
    /// for blank lines and `#` comments.
    ///
    /// # Examples
    ///
    /// ```
    /// use roadnet_cli::command::Command;
    ///
    /// let command = Command::parse("repairRoad;A;B;2024").unwrap();
    /// assert_eq!(
    ///     command,
    ///     Some(Command::RepairRoad { from: "A".into(), to: "B".into(), year: 2024 })
    /// );
    /// assert_eq!(Command::parse("# note").unwrap(), None);
    /// ```
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (name, rest) = line
            .split_once(';')
            .ok_or_else(|| CommandError::UnknownCommand(line.to_owned()))?;
        let args: Vec<&str> = rest.split(';').collect();

        let command = match name {
            "addRoad" => {
                arity("addRoad", &args, 4)?;
                Command::AddRoad {
                    from: args[0].to_owned(),
                    to: args[1].to_owned(),
                    length: length(args[2])?,
                    year: year(args[3])?,
                }
            }
            "repairRoad" => {
                arity("repairRoad", &args, 3)?;
                Command::RepairRoad {
                    from: args[0].to_owned(),
                    to: args[1].to_owned(),
                    year: year(args[2])?,
                }
            }
            "getRouteDescription" => {
                arity("getRouteDescription", &args, 1)?;
                Command::GetRouteDescription(raw_id(args[0])?)
            }
            "newRoute" => {
                arity("newRoute", &args, 3)?;
                Command::NewRoute {
                    id: route_id(args[0])?,
                    from: args[1].to_owned(),
                    to: args[2].to_owned(),
                }
            }
            "extendRoute" => {
                arity("extendRoute", &args, 2)?;
                Command::ExtendRoute {
                    id: route_id(args[0])?,
                    city: args[1].to_owned(),
                }
            }
            "removeRoad" => {
                arity("removeRoad", &args, 2)?;
                Command::RemoveRoad {
                    from: args[0].to_owned(),
                    to: args[1].to_owned(),
                }
            }
            "removeRoute" => {
                arity("removeRoute", &args, 1)?;
                Command::RemoveRoute(route_id(args[0])?)
            }
            other if parse_u32(other).is_some() => {
                Command::IngestRoute(RouteDescription::parse(line)?)
            }
            other => return Err(CommandError::UnknownCommand(other.to_owned())),
        };
        Ok(Some(command))
    }
}
