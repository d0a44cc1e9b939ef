//! A command session: one road network fed line by line.

use crate::command::{Command, CommandError};
use roadnet_core::network::{NetworkError, RoadNetwork};
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

/// Why a line failed. Either way the protocol reports only the line number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    #[error("line is not valid UTF-8")]
    Encoding,
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Counters reported when a session finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub lines: usize,
    pub errors: usize,
}

#[derive(Debug, Default)]
pub struct Session {
    network: RoadNetwork,
    stats: SessionStats,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Run a parsed command. Returns the text to print, if any.
    pub fn execute(&mut self, command: Command) -> Result<Option<String>, NetworkError> {
        let net = &mut self.network;
        match command {
            Command::AddRoad {
                from,
                to,
                length,
                year,
            } => net.add_road(&from, &to, length, year).map(|_| None),
            Command::RepairRoad { from, to, year } => {
                net.repair_road(&from, &to, year).map(|()| None)
            }
            Command::GetRouteDescription(id) => {
                let text = net.describe_route(id);
                Ok((!text.is_empty()).then_some(text))
            }
            Command::NewRoute { id, from, to } => net.new_route(id, &from, &to).map(|()| None),
            Command::ExtendRoute { id, city } => net.extend_route(id, &city).map(|()| None),
            Command::RemoveRoad { from, to } => net.remove_road(&from, &to).map(|()| None),
            Command::RemoveRoute(id) => net.remove_route(id).map(|()| None),
            Command::IngestRoute(description) => net.ingest_route(&description).map(|()| None),
        }
    }

    /// Parse and run one raw line.
    pub fn execute_line(&mut self, line: &[u8]) -> Result<Option<String>, LineError> {
        let line = std::str::from_utf8(line).map_err(|_| LineError::Encoding)?;
        match Command::parse(line)? {
            Some(command) => Ok(self.execute(command)?),
            None => Ok(None),
        }
    }

    /// Feed every line of `input`, writing results to `out` and
    /// `ERROR <line>` reports to `err`. Line numbers start at 1.
    pub fn run<R, O, E>(&mut self, input: R, out: &mut O, err: &mut E) -> io::Result<SessionStats>
    where
        R: BufRead,
        O: Write,
        E: Write,
    {
        for line in input.split(b'\n') {
            let line = line?;
            self.stats.lines += 1;
            let number = self.stats.lines;
            match self.execute_line(&line) {
                Ok(Some(text)) => writeln!(out, "{text}")?,
                Ok(None) => {}
                Err(error) => {
                    self.stats.errors += 1;
                    debug!(line = number, %error, "command failed");
                    writeln!(err, "ERROR {number}")?;
                }
            }
        }
        out.flush()?;
        info!(
            lines = self.stats.lines,
            errors = self.stats.errors,
            "input consumed"
        );
        Ok(self.stats)
    }
}
