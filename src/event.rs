//! Log events and message payloads
//!
//! A [`LogEvent`] is built by the caller at log-call time, handed to every
//! registered channel and dropped once they are done.

use std::error::Error as StdError;
use std::fmt;

use serde_json::Value;

use crate::level::LogLevel;

/// Line terminator used by the text channels
#[cfg(windows)]
pub(crate) const LINE_ENDING: &str = "\r\n";
/// Line terminator used by the text channels
#[cfg(not(windows))]
pub(crate) const LINE_ENDING: &str = "\n";

/// An error-like message carrying a message and an optional stack trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    /// Human-readable error message
    pub message: String,
    /// Stack trace or cause chain, if one was recorded
    pub stack: Option<String>,
}

impl ErrorValue {
    /// Create an error value without a stack trace
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    /// Attach a stack trace
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Build an error value from any error, recording its `source()` chain as the stack
    pub fn from_error(err: &(dyn StdError + 'static)) -> Self {
        let mut value = Self::new(err.to_string());

        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {}", cause));
            source = cause.source();
        }

        if !causes.is_empty() {
            value.stack = Some(format!("Error: {}\n{}", value.message, causes.join("\n")));
        }

        value
    }

    /// The trace written next to the message.
    ///
    /// Falls back to `Error: <message>` when no stack was recorded, so an
    /// error value always produces a trace.
    pub fn trace(&self) -> String {
        match &self.stack {
            Some(stack) => stack.clone(),
            None => format!("Error: {}", self.message),
        }
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Payload of a log event
#[derive(Debug, Clone, PartialEq)]
pub enum LogMessage {
    /// Plain text
    Text(String),
    /// An error with its trace
    Error(ErrorValue),
    /// Any other structured value
    Value(Value),
}

impl LogMessage {
    /// Check if the message is an error value
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Check if the message is structured (anything but plain text)
    pub fn is_structured(&self) -> bool {
        !matches!(self, Self::Text(_))
    }

    /// Error value carried by the message, if any
    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Body written after the `[module][action]: ` prefix of a text line
    pub(crate) fn text_body(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Error(err) => format!(
                "{}{}[trace]{}{}",
                err.message,
                LINE_ENDING,
                LINE_ENDING,
                err.trace()
            ),
            Self::Value(value) => value.to_string(),
        }
    }

    /// Value stored in the `message` field of a JSON entry
    pub(crate) fn json_value(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Error(err) => Value::String(err.message.clone()),
            Self::Value(value) => value.clone(),
        }
    }
}

impl fmt::Display for LogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Error(err) => f.write_str(&err.message),
            Self::Value(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for LogMessage {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for LogMessage {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<ErrorValue> for LogMessage {
    fn from(err: ErrorValue) -> Self {
        Self::Error(err)
    }
}

impl From<Value> for LogMessage {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// A single log call: where it came from, what it says and how severe it is
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    /// Module that produced the event
    pub module: String,
    /// Action within the module
    pub action: String,
    /// Event payload
    pub message: LogMessage,
    /// Event level
    pub level: LogLevel,
}

impl LogEvent {
    /// Create a new log event
    pub fn new(
        module: impl Into<String>,
        action: impl Into<String>,
        message: impl Into<LogMessage>,
        level: LogLevel,
    ) -> Self {
        Self {
            module: module.into(),
            action: action.into(),
            message: message.into(),
            level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io;

    #[derive(Debug)]
    struct Wrapped(io::Error);

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "could not open config")
        }
    }

    impl StdError for Wrapped {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_error_value_from_error_records_cause_chain() {
        let err = Wrapped(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        let value = ErrorValue::from_error(&err);

        assert_eq!(value.message, "could not open config");
        let stack = value.stack.unwrap();
        assert!(stack.starts_with("Error: could not open config"));
        assert!(stack.contains("caused by: no such file"));
    }

    #[test]
    fn test_error_value_trace_fallback() {
        assert_eq!(ErrorValue::new("boom").trace(), "Error: boom");
        assert_eq!(ErrorValue::new("boom").with_stack("at foo").trace(), "at foo");
    }

    #[test]
    fn test_text_body() {
        let text = LogMessage::from("booting app");
        assert_eq!(text.text_body(), "booting app");

        let err = LogMessage::from(ErrorValue::new("boom").with_stack("at foo (a.rs:1)"));
        let body = err.text_body();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines, vec!["boom", "[trace]", "at foo (a.rs:1)"]);

        let value = LogMessage::from(json!({"port": 8080}));
        assert_eq!(value.text_body(), r#"{"port":8080}"#);
    }

    #[test]
    fn test_json_value() {
        assert_eq!(LogMessage::from("hi").json_value(), json!("hi"));
        assert_eq!(LogMessage::from(ErrorValue::new("boom")).json_value(), json!("boom"));
        assert_eq!(LogMessage::from(json!([1, 2])).json_value(), json!([1, 2]));
    }

    #[test]
    fn test_message_kinds() {
        assert!(!LogMessage::from("x").is_structured());
        assert!(LogMessage::from(json!(1)).is_structured());
        assert!(LogMessage::from(ErrorValue::new("x")).is_error());
        assert!(LogMessage::from("x").as_error().is_none());
    }
}
