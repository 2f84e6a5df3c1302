//! Error types for option value conversion.
//!
//! Every failure the engine reports is a marshal error. [`ErrorKind`] only
//! classifies the cause so callers can react to specific conditions without
//! matching on message text.

use std::fmt;

/// A specialized `Result` type for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The marshal error returned by [`encode`](crate::encode) and
/// [`decode`](crate::decode).
///
/// # Examples
///
/// ```
/// use flagconv::{decode, Tag};
///
/// let mut port: u16 = 0;
/// let err = decode("eighty", &mut port, &Tag::new()).unwrap_err();
///
/// assert!(err.is_marshal());
/// assert!(err.message().contains("eighty"));
/// ```
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    option: Option<String>,
}

/// Specific causes of a marshal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The `base` tag is not a decimal integer in `[2, 36]`.
    InvalidBase,
    /// The text is not a valid literal for the target kind.
    InvalidLiteral,
    /// The literal is well formed but does not fit the target type.
    OutOfRange,
    /// The text is not a valid elapsed-time literal.
    InvalidDuration,
    /// A fixed-size sequence received the wrong number of elements.
    ///
    /// # Example
    /// ```text
    /// [i32; 3] <- "1, 2"   // LengthMismatch: expected 3, found 2
    /// ```
    LengthMismatch,
    /// The value's type has no conversion rule.
    Unsupported,
    /// A struct-tag literal could not be parsed.
    InvalidTag,
    /// A textual type name could not be resolved.
    UnknownType,
    /// A free-form message, usually raised by a custom text codec.
    Custom(String),
}

impl Error {
    /// Creates a new error with the specified kind and message.
    ///
    /// ```
    /// use flagconv::error::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::InvalidLiteral, "invalid boolean literal \"maybe\"");
    /// assert_eq!(err.kind(), &ErrorKind::InvalidLiteral);
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Error {
            kind,
            message: message.into(),
            option: None,
        }
    }

    /// Creates a custom error with a free-form message.
    ///
    /// This is the constructor custom codecs use to reject text. The message
    /// is surfaced unchanged by the engine.
    pub fn custom(msg: impl Into<String>) -> Self {
        let message = msg.into();
        Error::new(ErrorKind::Custom(message.clone()), message)
    }

    pub(crate) fn unsupported(type_name: &str) -> Self {
        Error::new(
            ErrorKind::Unsupported,
            format!("unsupported type: {type_name}"),
        )
    }

    /// Attaches the name of the option whose value failed to convert.
    ///
    /// ```
    /// use flagconv::error::Error;
    ///
    /// let err = Error::custom("invalid value \"four\"").with_option("--enum");
    /// assert_eq!(err.to_string(), "invalid argument for flag `--enum': invalid value \"four\"");
    /// assert_eq!(err.message(), "invalid value \"four\"");
    /// ```
    pub fn with_option(mut self, name: impl Into<String>) -> Self {
        self.option = Some(name.into());
        self
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the bare conversion message, without option context.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the option name attached with [`Error::with_option`].
    pub fn option(&self) -> Option<&str> {
        self.option.as_deref()
    }

    /// Always true: the engine has a single error category.
    pub fn is_marshal(&self) -> bool {
        true
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(option) = &self.option {
            write!(f, "invalid argument for flag `{}': {}", option, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for Error {}
