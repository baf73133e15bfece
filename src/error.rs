//! Status codes reported by the native collection engine and the error
//! taxonomy surfaced to callers.

/// Status code returned by every native call.
///
/// The numeric values are part of the foreign contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum StatusCode {
    Ok = 0,
    NotSupported = 1,
    Permission = 2,
    NotFound = 3,
    InvalidParam = 4,
    Io = 5,
    Internal = 99,
}

impl StatusCode {
    /// Maps a raw native code to a known status, `None` for unknown codes.
    pub fn from_raw(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            1 => Some(Self::NotSupported),
            2 => Some(Self::Permission),
            3 => Some(Self::NotFound),
            4 => Some(Self::InvalidParam),
            5 => Some(Self::Io),
            99 => Some(Self::Internal),
            _ => None,
        }
    }

    /// Raw numeric value as seen on the native side.
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }

    /// Converts the status into a `Result`, `Ok` being the only success.
    pub fn into_result(self) -> Result<(), ProbeError> {
        match self {
            Self::Ok => Ok(()),
            Self::NotSupported => Err(ProbeError::NotSupported),
            Self::Permission => Err(ProbeError::Permission),
            Self::NotFound => Err(ProbeError::NotFound),
            Self::InvalidParam => Err(ProbeError::InvalidParam),
            Self::Io => Err(ProbeError::Io),
            Self::Internal => Err(ProbeError::Internal),
        }
    }
}

/// Error type for metric collection and cache control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// Feature or platform support is absent. Expected, not fatal.
    NotSupported,
    /// Access denied, typical in sandboxed or unprivileged contexts.
    Permission,
    /// Queried entity does not exist.
    NotFound,
    /// Caller passed an invalid argument.
    InvalidParam,
    /// Transient collection failure.
    Io,
    /// Unexpected native fault.
    Internal,
    /// Collector was used before `init()`.
    NotInitialized,
    /// Native side returned a code outside the known table.
    UnknownStatus(i32),
    /// Snapshot could not be encoded.
    Encode(String),
    /// Configuration could not be loaded.
    Config(String),
}

impl ProbeError {
    /// Translates a raw native status into a result, keeping unknown codes.
    pub fn from_raw_status(code: i32) -> Result<(), ProbeError> {
        match StatusCode::from_raw(code) {
            Some(status) => status.into_result(),
            None => Err(ProbeError::UnknownStatus(code)),
        }
    }

    /// Error for a raw code received on a failure path. A zero code there is
    /// itself a native fault.
    pub fn from_raw_error(code: i32) -> ProbeError {
        match Self::from_raw_status(code) {
            Ok(()) => ProbeError::Internal,
            Err(e) => e,
        }
    }

    /// Returns the native status code this error corresponds to, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ProbeError::NotSupported => Some(StatusCode::NotSupported),
            ProbeError::Permission => Some(StatusCode::Permission),
            ProbeError::NotFound => Some(StatusCode::NotFound),
            ProbeError::InvalidParam => Some(StatusCode::InvalidParam),
            ProbeError::Io => Some(StatusCode::Io),
            ProbeError::Internal => Some(StatusCode::Internal),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::NotSupported => write!(f, "operation not supported on this platform"),
            ProbeError::Permission => write!(f, "permission denied"),
            ProbeError::NotFound => write!(f, "resource not found"),
            ProbeError::InvalidParam => write!(f, "invalid parameter"),
            ProbeError::Io => write!(f, "I/O error during collection"),
            ProbeError::Internal => write!(f, "internal probe error"),
            ProbeError::NotInitialized => write!(f, "probe not initialized"),
            ProbeError::UnknownStatus(code) => write!(f, "unknown native status code {}", code),
            ProbeError::Encode(msg) => write!(f, "encode error: {}", msg),
            ProbeError::Config(msg) => write!(f, "config error: {}", msg),
        }
    }
}

impl std::error::Error for ProbeError {}

impl From<serde_json::Error> for ProbeError {
    fn from(e: serde_json::Error) -> Self {
        ProbeError::Encode(e.to_string())
    }
}
