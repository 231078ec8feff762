use std::error::Error as StdError;
use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of a failure, used to pick the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Open,
    Read,
    EmptyInput,
    InvalidOrder,
    OrderTooSmall,
    OrderTooLarge,
    InvalidLength,
    LengthTooSmall,
    Output,
}

impl ErrorKind {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Usage => -1,
            ErrorKind::Open | ErrorKind::Read | ErrorKind::Output => 1,
            ErrorKind::EmptyInput => 2,
            ErrorKind::InvalidOrder => 3,
            ErrorKind::OrderTooSmall => 4,
            ErrorKind::OrderTooLarge => 5,
            ErrorKind::InvalidLength => 6,
            ErrorKind::LengthTooSmall => 7,
        }
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    context: String,
    cause: Option<Box<dyn StdError + 'static>>,
}

impl Error {
    pub fn new<S: Into<String>>(kind: ErrorKind, context: S) -> Self {
        Error {
            kind,
            context: context.into(),
            cause: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> i32 {
        self.kind.exit_code()
    }

    /// Iterates over this error followed by each underlying cause.
    pub fn iter(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> {
        let mut next: Option<&(dyn StdError + 'static)> = Some(self);
        std::iter::from_fn(move || {
            let current = next?;
            next = current.source();
            Some(current)
        })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.context)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_ref()
            .map(|boxed| boxed.as_ref() as &(dyn StdError + 'static))
    }
}

pub trait ResultExt<T> {
    fn context<S: Into<String>>(self, kind: ErrorKind, message: S) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: StdError + 'static,
{
    fn context<S: Into<String>>(self, kind: ErrorKind, message: S) -> Result<T> {
        self.map_err(|e| Error {
            kind,
            context: message.into(),
            cause: Some(e.into()),
        })
    }
}
