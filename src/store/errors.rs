//! Post store error types
//!
//! Error codes:
//! - POSTFILE_STORE_NOT_FOUND (expected, caller-visible)
//! - POSTFILE_STORE_READ_FAILED (ERROR severity)
//! - POSTFILE_STORE_PARSE_FAILED (ERROR severity)
//! - POSTFILE_STORE_WRITE_FAILED (ERROR severity)
//! - POSTFILE_STORE_INIT_FAILED (FATAL severity, startup only)

use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Severity levels for store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Normal negative result, not a fault
    Expected,
    /// Operation fails, server continues
    Error,
    /// Service must not start
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Expected => write!(f, "EXPECTED"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Store-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Requested identifier is absent
    NotFound,
    /// Backing file could not be read
    ReadFailed,
    /// Backing file content is not a valid snapshot
    ParseFailed,
    /// Snapshot could not be serialized or written
    WriteFailed,
    /// Data directory or backing file could not be created
    InitFailed,
}

impl StoreErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::NotFound => "POSTFILE_STORE_NOT_FOUND",
            StoreErrorCode::ReadFailed => "POSTFILE_STORE_READ_FAILED",
            StoreErrorCode::ParseFailed => "POSTFILE_STORE_PARSE_FAILED",
            StoreErrorCode::WriteFailed => "POSTFILE_STORE_WRITE_FAILED",
            StoreErrorCode::InitFailed => "POSTFILE_STORE_INIT_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StoreErrorCode::NotFound => Severity::Expected,
            StoreErrorCode::ReadFailed => Severity::Error,
            StoreErrorCode::ParseFailed => Severity::Error,
            StoreErrorCode::WriteFailed => Severity::Error,
            StoreErrorCode::InitFailed => Severity::Fatal,
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with code, message and optional context
#[derive(Debug)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    details: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl StoreError {
    fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach context such as a file path
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// No post carries the requested identifier
    pub fn not_found(id: u64) -> Self {
        Self::new(StoreErrorCode::NotFound, "record not found").with_details(format!("id: {}", id))
    }

    /// Backing file could not be read
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StoreErrorCode::ReadFailed, message).with_source(source)
    }

    /// Backing file is not a valid snapshot document
    pub fn parse_failed(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::new(StoreErrorCode::ParseFailed, message).with_source(source)
    }

    /// Snapshot write failed on I/O
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StoreErrorCode::WriteFailed, message).with_source(source)
    }

    /// Snapshot could not be serialized
    pub fn serialize_failed(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::new(StoreErrorCode::WriteFailed, message).with_source(source)
    }

    /// Write rejected before touching disk
    pub fn write_failed_no_source(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::WriteFailed, message)
    }

    /// Startup could not prepare the data directory or backing file
    pub fn init_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(StoreErrorCode::InitFailed, message).with_source(source)
    }

    /// Wrap a read/parse/write failure hit during initialization
    pub fn into_init_failure(self) -> Self {
        Self {
            code: StoreErrorCode::InitFailed,
            ..self
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// True when the identifier was simply absent
    pub fn is_not_found(&self) -> bool {
        self.code == StoreErrorCode::NotFound
    }

    /// Returns whether this error must abort startup
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self.code {
            StoreErrorCode::NotFound => 404,
            _ => 500,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
