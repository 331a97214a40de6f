//! Request payloads sent to sensor nodes.
//!
//! Node payloads are ASCII fields joined by `:`. The first field is a
//! two-character code; queries end in `?`.

/// Field separator in node payloads.
pub const FIELD_DELIMITER: char = ':';

/// A request the controller can send to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `ST?`: report status.
    Status,
    /// `ID?`: identify.
    Identify,
    /// `CF?`: report configuration.
    Config,
    /// `CF:<v1>:<v2>...`: apply configuration values.
    SetConfig(Vec<String>),
}

impl Request {
    /// Build the payload string for this request.
    pub fn to_payload(&self) -> String {
        match self {
            Request::Status => "ST?".to_string(),
            Request::Identify => "ID?".to_string(),
            Request::Config => "CF?".to_string(),
            Request::SetConfig(values) => {
                let mut payload = String::from("CF");
                for value in values {
                    payload.push(FIELD_DELIMITER);
                    payload.push_str(value);
                }
                payload
            }
        }
    }
}
