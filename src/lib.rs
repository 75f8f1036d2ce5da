//! Declaration references for documentation comments.
//!
//! `doclink` parses the reference syntax written inside `{@link ...}` tags,
//! resolves references against a documentation entity tree, and rewrites
//! comment link tags to point at their targets.

pub mod comment;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod external;
pub mod grammar;
pub mod links;
pub mod project;
pub mod resolver;
pub mod types;

pub use crate::comment::{BlockTag, Comment, DisplayPart, Document, InlineTag, LinkTarget};
pub use crate::config::{Config, LinkOptions};
pub use crate::error::Error;
pub use crate::external::{ExternalLink, ExternalResolver, SymbolLinkMappings};
pub use crate::links::{LinkReport, LinkResolver, UnresolvedLink};
pub use crate::project::{Entity, EntityId, EntityKind, Project};
pub use crate::types::{
    ComponentPath, DeclarationReference, Meaning, MeaningKeyword, Navigation, ResolutionStart, SymbolReference,
};
