//! Operator commands.
//!
//! The verb table is closed: a word that is not listed in [`Verb`] is
//! reported as [`ConsoleError::UnknownVerb`] and nothing is sent.

use crate::error::{ConsoleError, ConsoleResult};
use crate::requests::Request;

/// Usage line for the set-config verb.
pub const SET_CONFIG_USAGE: &str = "k <node-id> <value> [values...]";

/// Operator verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Halt the radio and stop the controller (`q`).
    Shutdown,
    /// Ask every node for its status (`s`).
    RequestStatus,
    /// Ask every node to identify itself (`i`).
    RequestId,
    /// Ask every node for its configuration (`c`).
    RequestConfig,
    /// Run node discovery on the coordinator (`n`).
    DiscoverNodes,
    /// Push configuration values to matching nodes (`k`).
    SetConfig,
}

impl Verb {
    /// Get the command word for this verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Shutdown => "q",
            Verb::RequestStatus => "s",
            Verb::RequestId => "i",
            Verb::RequestConfig => "c",
            Verb::DiscoverNodes => "n",
            Verb::SetConfig => "k",
        }
    }

    /// Look up a verb from its command word, ignoring case.
    pub fn from_word(word: &str) -> Option<Verb> {
        match word.to_lowercase().as_str() {
            "q" => Some(Verb::Shutdown),
            "s" => Some(Verb::RequestStatus),
            "i" => Some(Verb::RequestId),
            "c" => Some(Verb::RequestConfig),
            "n" => Some(Verb::DiscoverNodes),
            "k" => Some(Verb::SetConfig),
            _ => None,
        }
    }
}

/// A parsed operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Halt the radio and stop the controller.
    Shutdown,
    /// Send a request to every registered node.
    Broadcast(Request),
    /// Run node discovery.
    DiscoverNodes,
    /// Send configuration values to nodes whose id contains `target`.
    SetConfig {
        /// Node id substring.
        target: String,
        /// Values joined into the configuration request.
        values: Vec<String>,
    },
}

impl Command {
    /// Parse an operator command line.
    ///
    /// Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> ConsoleResult<Option<Command>> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Ok(None);
        };

        let verb = Verb::from_word(first).ok_or_else(|| ConsoleError::UnknownVerb(first.to_string()))?;
        log::debug!("parsed verb {:?} from {:?}", verb, line);

        let command = match verb {
            Verb::Shutdown => Command::Shutdown,
            Verb::RequestStatus => Command::Broadcast(Request::Status),
            Verb::RequestId => Command::Broadcast(Request::Identify),
            Verb::RequestConfig => Command::Broadcast(Request::Config),
            Verb::DiscoverNodes => Command::DiscoverNodes,
            Verb::SetConfig => {
                let target = words.next().ok_or(ConsoleError::MissingArgument {
                    usage: SET_CONFIG_USAGE,
                })?;
                Command::SetConfig {
                    target: target.to_string(),
                    values: words.map(str::to_string).collect(),
                }
            }
        };

        Ok(Some(command))
    }

    /// The verb this command was parsed from.
    pub fn verb(&self) -> Verb {
        match self {
            Command::Shutdown => Verb::Shutdown,
            Command::Broadcast(Request::Status) => Verb::RequestStatus,
            Command::Broadcast(Request::Identify) => Verb::RequestId,
            Command::Broadcast(Request::Config) => Verb::RequestConfig,
            Command::Broadcast(Request::SetConfig(_)) | Command::SetConfig { .. } => Verb::SetConfig,
            Command::DiscoverNodes => Verb::DiscoverNodes,
        }
    }
}
