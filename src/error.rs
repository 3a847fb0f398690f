//! Error types for knowledge-base construction and program evaluation.
//!
//! No source text is parsed anywhere in this crate (programs arrive
//! pre-tokenized), so unlike a language compiler's error type this one
//! carries no span or pretty-printing machinery — just a reason and an
//! optional hint.

use std::fmt::{self, Display, Formatter};

pub type Result<T> = anyhow::Result<T>;

#[derive(Debug, Clone)]
pub struct Error {
    pub reason: Reason,
    pub help: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Reason {
    /// A literal argument could not be parsed under its expected type.
    Simple(String),
    Expected {
        who: Option<String>,
        expected: String,
        found: String,
    },
    /// Dependency inference hit a malformed program.
    Wiring {
        at: usize,
        primitive: String,
    },
    /// An ordering comparison was attempted on an incomparable pair of values.
    Domain(String),
}

impl Error {
    pub fn new(reason: Reason) -> Self {
        Error { reason, help: None }
    }

    pub fn with_help<S: Into<String>>(mut self, help: S) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn simple<S: Into<String>>(msg: S) -> Self {
        Error::new(Reason::Simple(msg.into()))
    }

    pub fn domain<S: Into<String>>(msg: S) -> Self {
        Error::new(Reason::Domain(msg.into()))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Reason::Simple(msg) => f.write_str(msg)?,
            Reason::Expected {
                who,
                expected,
                found,
            } => {
                if let Some(who) = who {
                    write!(f, "{who}: ")?;
                }
                write!(f, "expected {expected}, found {found}")?;
            }
            Reason::Wiring { at, primitive } => {
                write!(
                    f,
                    "cannot infer dependencies for `{primitive}` at position {at}: no open branch"
                )?;
            }
            Reason::Domain(msg) => f.write_str(msg)?,
        }
        if let Some(help) = &self.help {
            write!(f, " ({help})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display_includes_help() {
        let e = Error::simple("bad literal").with_help("expected a quantity");
        assert_eq!(e.to_string(), "bad literal (expected a quantity)");
    }

    #[test]
    fn test_wiring_reason_display() {
        let e = Error::new(Reason::Wiring {
            at: 3,
            primitive: "And".to_string(),
        });
        assert_eq!(
            e.to_string(),
            "cannot infer dependencies for `And` at position 3: no open branch"
        );
    }
}
