use std::{error::Error, fmt::Display};

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum ConvErrorKind {
    /// File IO error
    Io,
    /// Malformed XML document
    Xml,
    /// Unable to parse a value (number, boolean, ...)
    Parse,
    /// Mandatory element missing from the IP-XACT description
    MissingElement,
    /// Access value outside read-only/read-write/write-only
    UnsupportedAccess,
}

#[derive(Debug, PartialEq)]
pub struct ConvError {
    pub kind: ConvErrorKind,
    pub txt: String,
}

impl Error for ConvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl From<std::io::Error> for ConvError {
    fn from(cause: std::io::Error) -> ConvError {
        ConvError {
            kind: ConvErrorKind::Io,
            txt: format!("{cause}")
        }
    }
}

impl From<quick_xml::Error> for ConvError {
    fn from(cause: quick_xml::Error) -> ConvError {
        ConvError {
            kind: ConvErrorKind::Xml,
            txt: format!("{cause}")
        }
    }
}

impl From<winnow::error::ParseError<&str, winnow::error::ContextError>> for ConvError {
    fn from(cause: winnow::error::ParseError<&str, winnow::error::ContextError>) -> ConvError {
        ConvError {
            kind: ConvErrorKind::Parse,
            txt: format!("'{}'", cause.input())
        }
    }
}

impl ConvError {

    pub fn missing(elem: &str, parent: &str) -> Self {
        ConvError {
            kind: ConvErrorKind::MissingElement,
            txt: format!("<{elem}> in {parent}"),
        }
    }

    pub fn unsupported_access(access: &str) -> Self {
        ConvError {
            kind: ConvErrorKind::UnsupportedAccess,
            txt: access.to_owned(),
        }
    }

    /// Prepend location information (register/field path) to the message
    pub fn within(mut self, location: &str) -> Self {
        self.txt = format!("{location}: {}", self.txt);
        self
    }
}

impl Display for ConvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ConvErrorKind::Io                => write!(f, "IO exception: {}", self.txt),
            ConvErrorKind::Xml               => write!(f, "XML error: {}", self.txt),
            ConvErrorKind::Parse             => write!(f, "Unable to parse value {}", self.txt),
            ConvErrorKind::MissingElement    => write!(f, "Missing element {}", self.txt),
            ConvErrorKind::UnsupportedAccess => write!(f, "Access type unsupported: {}", self.txt),
        }
    }
}

#[cfg(test)]
mod tests_error {
    use super::*;

    #[test]
    fn test_display() {
        let e = ConvError::unsupported_access("read-writeOnce").within("CTRL.en");
        assert_eq!(e.kind, ConvErrorKind::UnsupportedAccess);
        assert_eq!(format!("{e}"), "Access type unsupported: CTRL.en: read-writeOnce");
        let e = ConvError::missing("bitOffset", "field en");
        assert_eq!(format!("{e}"), "Missing element <bitOffset> in field en");
    }
}
