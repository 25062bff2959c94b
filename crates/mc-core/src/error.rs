//! Unified error type for mirrorcast.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for the CLI to derive a process exit code via [`Error::exit_code`].

/// Unified error type covering all failure modes in mirrorcast.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The manifest could not be parsed into the expected structural form.
    #[error("Malformed manifest: {0}")]
    MalformedManifest(String),

    /// The manifest carries a discriminator this system does not handle.
    #[error("Wrong manifest kind: expected {expected}, found {found}")]
    WrongManifestKind {
        /// The discriminator this resolver accepts.
        expected: u64,
        /// The discriminator found in the input.
        found: u64,
    },

    /// The manifest lists no mirror URLs.
    #[error("Manifest has no mirror tags")]
    NoMirrors,

    /// The manifest lists no segment references.
    #[error("Manifest has no segment-ref tags")]
    NoSegments,

    /// The manifest has no key tag.
    #[error("Manifest has no key tag")]
    MissingKey,

    /// The manifest has more than one key tag.
    #[error("Manifest has {0} key tags; exactly one is allowed")]
    DuplicateKey(usize),

    /// The key tag value is not a base64-encoded 128-bit key.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// No mirror in the list serves the segment.
    #[error("Segment unavailable: {identifier} (tried {mirrors_tried} mirrors)")]
    SegmentUnavailable {
        /// Identifier of the segment that could not be located.
        identifier: String,
        /// How many mirrors were probed.
        mirrors_tried: usize,
    },

    /// The external encoder exited unsuccessfully.
    #[error("Encoder [{tool}] failed with exit code {}: {message}", display_code(.exit_code))]
    EncoderFailed {
        /// Name of the encoder executable.
        tool: String,
        /// Exit code, or `None` when terminated by a signal.
        exit_code: Option<i32>,
        /// Captured stderr or other detail.
        message: String,
    },

    /// An external tool could not be located, spawned, or timed out.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Caller-supplied data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

impl Error {
    /// Map this error to the process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::MalformedManifest(_)
            | Error::WrongManifestKind { .. }
            | Error::NoMirrors
            | Error::NoSegments
            | Error::MissingKey
            | Error::DuplicateKey(_)
            | Error::InvalidKey(_) => 2,
            Error::SegmentUnavailable { .. } => 3,
            Error::EncoderFailed { .. } | Error::Tool { .. } => 4,
            Error::Io { .. } | Error::Validation(_) | Error::Internal(_) => 1,
        }
    }

    /// Whether this error came from manifest validation.
    pub fn is_manifest_error(&self) -> bool {
        self.exit_code() == 2
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::EncoderFailed`].
    pub fn encoder_failed(
        tool: impl Into<String>,
        exit_code: Option<i32>,
        message: impl Into<String>,
    ) -> Self {
        Error::EncoderFailed {
            tool: tool.into(),
            exit_code,
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::SegmentUnavailable`].
    pub fn segment_unavailable(identifier: impl Into<String>, mirrors_tried: usize) -> Self {
        Error::SegmentUnavailable {
            identifier: identifier.into(),
            mirrors_tried,
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_kind_display() {
        let err = Error::WrongManifestKind {
            expected: 1663,
            found: 999,
        };
        assert_eq!(
            err.to_string(),
            "Wrong manifest kind: expected 1663, found 999"
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn manifest_errors_share_exit_code() {
        for err in [
            Error::MalformedManifest("eof".into()),
            Error::NoMirrors,
            Error::NoSegments,
            Error::MissingKey,
            Error::DuplicateKey(2),
            Error::InvalidKey("short".into()),
        ] {
            assert!(err.is_manifest_error(), "{err}");
        }
        assert!(!Error::segment_unavailable("abc", 2).is_manifest_error());
    }

    #[test]
    fn segment_unavailable_display() {
        let err = Error::segment_unavailable("deadbeef", 3);
        assert_eq!(
            err.to_string(),
            "Segment unavailable: deadbeef (tried 3 mirrors)"
        );
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn encoder_failed_display() {
        let err = Error::encoder_failed("ffmpeg", Some(1), "invalid input");
        assert_eq!(
            err.to_string(),
            "Encoder [ffmpeg] failed with exit code 1: invalid input"
        );
        assert_eq!(err.exit_code(), 4);

        let err = Error::encoder_failed("ffmpeg", None, "killed");
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn tool_display() {
        let err = Error::tool("ffmpeg", "not found");
        assert_eq!(err.to_string(), "Tool error [ffmpeg]: not found");
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.exit_code(), 1);
    }
}
