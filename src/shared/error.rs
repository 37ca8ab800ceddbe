use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - every run completed (unmatched artifacts are reported, not fatal)
    Success = 0,
    /// `--strict` was given and at least one artifact could not be attributed
    UnmatchedArtifacts = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (unreadable input, invalid config, I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::UnmatchedArtifacts => write!(f, "Unmatched Artifacts (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-level errors.
///
/// These abort a product run (bad input files, bad configuration). Errors
/// inside the matching core never do; they are reported as data instead.
#[derive(Debug, Error)]
pub enum RepoVulnError {
    #[error("Vulnerability feed not found: {path}\n\n💡 Hint: Pass an existing JSON feed with --feed or set `feed` for the product in the config file")]
    FeedNotFound { path: PathBuf },

    #[error("Failed to parse vulnerability feed: {path}\nDetails: {details}\n\n💡 Hint: The feed must be a JSON array of artifact entries")]
    FeedParseError { path: PathBuf, details: String },

    #[error("Repository list not found: {path}\n\n💡 Hint: Pass an existing JSON repository list with --repositories")]
    RepositoryListNotFound { path: PathBuf },

    #[error("Failed to parse repository list: {path}\nDetails: {details}\n\n💡 Hint: The repository list must be a JSON array of {{\"id\", \"canonical_name\"}} objects")]
    RepositoryListParseError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Unknown product: {name}\n\n💡 Hint: Configured products are: {known}")]
    UnknownProduct { name: String, known: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}

/// Failure talking to the artifact registry.
///
/// Recoverable: the affected artifacts are reported as unmatched for the
/// current run and processing continues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetadataFetchError {
    #[error("registry request timed out: {details}")]
    Timeout { details: String },

    #[error("registry request failed: {details}")]
    Transport { details: String },

    #[error("registry returned status code {status}")]
    Status { status: u16 },

    #[error("registry response could not be decoded: {details}")]
    Decode { details: String },
}
