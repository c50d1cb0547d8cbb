//! # Errors
//!
//! Structured errors with an HTTP-style status code and class name.
//! - carried through `anyhow::Error` so every core API can return [`DataupResult`]
//! - transport-agnostic (the server crate decides how to serialize)
//! - blob store failures are translated here, at the core boundary

use std::fmt;

use anyhow::Error as AnyError;
use dataup_blob::BlobError;

/// A convenience result type for dataup core APIs.
pub type DataupResult<T> = std::result::Result<T, AnyError>;

/// Error class names + status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,      // 400
    NotFound,        // 404
    PayloadTooLarge, // 413
    GeneralError,    // 500
}

impl ErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::PayloadTooLarge => 413,
            ErrorKind::GeneralError => 500,
        }
    }

    /// Error `name` (e.g. "NotFound")
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::PayloadTooLarge => "PayloadTooLarge",
            ErrorKind::GeneralError => "GeneralError",
        }
    }

    /// Error `className` (kebab-cased)
    pub fn class_name(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::NotFound => "not-found",
            ErrorKind::PayloadTooLarge => "payload-too-large",
            ErrorKind::GeneralError => "general-error",
        }
    }
}

/// A structured dataup error that can live inside `anyhow::Error`.
#[derive(Debug)]
pub struct DataupError {
    pub kind: ErrorKind,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub source: Option<AnyError>,
}

impl DataupError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: None,
            source: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    /// Convert into `anyhow::Error`.
    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// Downcast an `anyhow::Error` to a `DataupError` if possible.
    pub fn from_anyhow(err: &AnyError) -> Option<&DataupError> {
        err.downcast_ref::<DataupError>()
    }

    /// Turn any error into a DataupError:
    /// - if it's already a DataupError, keep it (lossless)
    /// - otherwise wrap as GeneralError
    pub fn normalize(err: AnyError) -> DataupError {
        match err.downcast::<DataupError>() {
            Ok(e) => e,
            Err(other) => {
                DataupError::new(ErrorKind::GeneralError, other.to_string()).with_source(other)
            }
        }
    }

    /// Client-facing copy: same kind/message/data, inner `source` dropped.
    pub fn sanitize_for_client(&self) -> DataupError {
        DataupError {
            kind: self.kind,
            message: self.message.clone(),
            data: self.data.clone(),
            source: None,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }
    pub fn payload_too_large(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::PayloadTooLarge, msg)
    }
    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }

    /// JSON payload: `{name, message, code, className[, data]}`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;

        let mut base = json!({
            "name": self.name(),
            "message": self.message,
            "code": self.code(),
            "className": self.class_name(),
        });

        if let Some(d) = &self.data {
            base["data"] = d.clone();
        }
        base
    }
}

impl fmt::Display for DataupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name(), self.code(), self.message)
    }
}

impl std::error::Error for DataupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| {
            let inner: &(dyn std::error::Error + 'static) = e.as_ref();
            inner
        })
    }
}

impl From<BlobError> for DataupError {
    fn from(err: BlobError) -> Self {
        let kind = match &err {
            BlobError::NotFound { .. } => ErrorKind::NotFound,
            BlobError::TooLarge { .. } => ErrorKind::PayloadTooLarge,
            BlobError::Invalid { .. } | BlobError::Stream { .. } | BlobError::Io { .. } => {
                ErrorKind::GeneralError
            }
        };
        let message = err.to_string();
        DataupError::new(kind, message).with_source(AnyError::new(err))
    }
}

/// Convenience helper for "bail with DataupError".
#[macro_export]
macro_rules! bail_dataup {
    ($ctor:ident, $msg:expr) => {
        return Err($crate::errors::DataupError::$ctor($msg).into_anyhow());
    };
    ($ctor:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::errors::DataupError::$ctor(format!($fmt, $($arg)*)).into_anyhow());
    };
}
