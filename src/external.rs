//! Pluggable resolution for references the entity tree cannot answer.

use std::collections::BTreeMap;

use crate::comment::InlineTag;
use crate::project::Entity;
use crate::types::{DeclarationReference, ResolutionStart};

/// What an external resolver links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalLink {
    /// A target URL with an optional caption replacing the default display text.
    Captioned {
        /// Display text to use when the author gave none.
        caption: Option<String>,
        /// Target URL.
        target: String,
    },
    /// A bare target URL.
    Url(String),
}

impl ExternalLink {
    /// The target URL.
    pub fn target(&self) -> &str {
        return match self {
            Self::Captioned { target, .. } | Self::Url(target) => target,
        };
    }

    /// The caption, if one was supplied.
    pub fn caption(&self) -> Option<&str> {
        return match self {
            Self::Captioned { caption, .. } => caption.as_deref(),
            Self::Url(_) => None,
        };
    }
}

/// Resolves declaration references that name something outside the project,
/// usually symbols of dependencies.
///
/// Implementations must not assume they run on the thread that built the
/// project.
pub trait ExternalResolver: Send + Sync {
    /// Return a link for a tag written in the comment of `origin`, or `None`
    /// to let the next resolver try. `reference` is absent when the tag text
    /// does not parse as a declaration reference.
    fn resolve(
        &self,
        reference: Option<&DeclarationReference>,
        origin: &Entity,
        tag: Option<&InlineTag>,
        known_target: Option<&str>,
    ) -> Option<ExternalLink>;
}

impl<F> ExternalResolver for F
where
    F: Fn(Option<&DeclarationReference>, &Entity, Option<&InlineTag>, Option<&str>) -> Option<ExternalLink> + Send + Sync,
{
    fn resolve(
        &self,
        reference: Option<&DeclarationReference>,
        origin: &Entity,
        tag: Option<&InlineTag>,
        known_target: Option<&str>,
    ) -> Option<ExternalLink> {
        return self(reference, origin, tag, known_target);
    }
}

/// Package key used for global references without a module source.
pub const GLOBAL_PACKAGE: &str = "global";

/// Symbol key matching any symbol of a package.
pub const WILDCARD_SYMBOL: &str = "*";

/// Static URL table keyed by package, then by dotted symbol path.
///
/// Only global references are mapped: a local reference that misses the
/// tree is far more likely a typo than a link into a dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolLinkMappings {
    /// Package name to symbol path to URL.
    packages: BTreeMap<String, BTreeMap<String, String>>,
}

impl SymbolLinkMappings {
    /// Wrap a package → symbol → URL table.
    pub const fn new(packages: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        return Self { packages };
    }

    /// Whether no package is mapped.
    pub fn is_empty(&self) -> bool {
        return self.packages.is_empty();
    }

    /// Look up the URL for a reference, preferring an exact symbol over the wildcard.
    pub fn lookup(&self, reference: &DeclarationReference) -> Option<&str> {
        if reference.resolution_start != ResolutionStart::Global {
            return None;
        }
        reference.symbol_reference.as_ref()?;

        let package = reference.module_source.as_deref().unwrap_or(GLOBAL_PACKAGE);
        let symbols = self.packages.get(package)?;
        return symbols
            .get(&reference.dotted_path())
            .or_else(|| return symbols.get(WILDCARD_SYMBOL))
            .map(String::as_str);
    }
}

impl ExternalResolver for SymbolLinkMappings {
    fn resolve(
        &self,
        reference: Option<&DeclarationReference>,
        _origin: &Entity,
        _tag: Option<&InlineTag>,
        _known_target: Option<&str>,
    ) -> Option<ExternalLink> {
        return self
            .lookup(reference?)
            .map(|url| return ExternalLink::Url(url.to_string()));
    }
}
