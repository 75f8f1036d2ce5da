/// Crate-level error types for doclink diagnostics.
use std::path::PathBuf;

/// All errors in doclink carry enough context to produce a useful diagnostic
/// without a debugger. Unresolved links are not errors; they are reported
/// through [`crate::links::LinkReport`].
#[allow(clippy::error_impl_error, reason = "crate-level error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An explicitly requested config file does not exist on disk.
    #[error("config not found: {}", path.display())]
    ConfigNotFound {
        /// Path to the missing config file.
        path: PathBuf,
    },

    /// No entity in the project has the given full name.
    #[error("entity not found: `{name}`")]
    EntityNotFound {
        /// Dot-joined full name that was looked up.
        name: String,
    },

    /// Text handed to the CLI does not parse as a declaration reference.
    #[error("not a declaration reference: `{text}`")]
    InvalidReference {
        /// The rejected text.
        text: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// Project JSON could not be deserialized.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// The entity tree violates a structural rule.
    #[error("project corrupt: {reason}")]
    ProjectCorrupt {
        /// Description of the violation.
        reason: String,
    },

    /// Project JSON file does not exist on disk.
    #[error("project not found: {}", path.display())]
    ProjectNotFound {
        /// Path to the missing project file.
        path: PathBuf,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A reference alias names a symbol identifier that no entity registered.
    #[error("unknown symbol id: `{id}`")]
    UnknownSymbol {
        /// The unregistered symbol identifier.
        id: String,
    },
}
