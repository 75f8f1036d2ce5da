/// Core domain types for parsed declaration references.
use std::fmt;

use serde::Serialize;

/// Where resolution of a declaration reference begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStart {
    /// Start at the project root, or at a named module when a module source is present.
    Global,
    /// Start at the entity whose comment contains the link.
    Local,
}

/// How a path component is looked up relative to the previous step's candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Navigation {
    /// `.` — exports and static children.
    #[serde(rename = ".")]
    Exports,
    /// `#` — instance members.
    #[serde(rename = "#")]
    Members,
    /// `~` — locals of a module, namespace or project.
    #[serde(rename = "~")]
    Locals,
}

impl Navigation {
    /// Map a navigation punctuator to its operator.
    pub const fn from_char(c: char) -> Option<Self> {
        return match c {
            '#' => Some(Self::Members),
            '.' => Some(Self::Exports),
            '~' => Some(Self::Locals),
            _ => None,
        };
    }

    /// The punctuator written in reference text.
    pub const fn as_char(self) -> char {
        return match self {
            Self::Exports => '.',
            Self::Locals => '~',
            Self::Members => '#',
        };
    }
}

/// One step of a symbol path: a navigation operator and the name it looks up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentPath {
    /// Operator selecting which children of the previous step are searched.
    pub navigation: Navigation,
    /// Name of the child to look up.
    pub path: String,
}

impl ComponentPath {
    /// Convenience constructor used by the parser and tests.
    pub fn new(navigation: Navigation, path: impl Into<String>) -> Self {
        return Self {
            navigation,
            path: path.into(),
        };
    }
}

/// Closed vocabulary of meaning keywords. Declaration order is the order the
/// parser tries them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MeaningKeyword {
    /// `:class`
    Class,
    /// `:interface`
    Interface,
    /// `:type`
    Type,
    /// `:enum`
    Enum,
    /// `:namespace`
    Namespace,
    /// `:function`
    Function,
    /// `:var`
    Var,
    /// `:constructor`
    Constructor,
    /// `:member`
    Member,
    /// `:event`
    Event,
    /// `:call`
    Call,
    /// `:new`
    New,
    /// `:index`
    Index,
    /// `:complex`
    Complex,
    /// `:getter`
    Getter,
    /// `:setter`
    Setter,
}

impl MeaningKeyword {
    /// Every keyword, in parse order.
    pub const ALL: [Self; 16] = [
        Self::Class,
        Self::Interface,
        Self::Type,
        Self::Enum,
        Self::Namespace,
        Self::Function,
        Self::Var,
        Self::Constructor,
        Self::Member,
        Self::Event,
        Self::Call,
        Self::New,
        Self::Index,
        Self::Complex,
        Self::Getter,
        Self::Setter,
    ];

    /// The keyword as written after `:`.
    pub const fn as_str(self) -> &'static str {
        return match self {
            Self::Call => "call",
            Self::Class => "class",
            Self::Complex => "complex",
            Self::Constructor => "constructor",
            Self::Enum => "enum",
            Self::Event => "event",
            Self::Function => "function",
            Self::Getter => "getter",
            Self::Index => "index",
            Self::Interface => "interface",
            Self::Member => "member",
            Self::Namespace => "namespace",
            Self::New => "new",
            Self::Setter => "setter",
            Self::Type => "type",
            Self::Var => "var",
        };
    }
}

/// Disambiguator selecting an overload, signature or accessor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Meaning {
    /// Overload index; positional pick among the keyword's candidates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Keyword restricting the kind of candidate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<MeaningKeyword>,
    /// User label matched against a signature comment's `@label`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A symbol path, a meaning, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolReference {
    /// Optional disambiguator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning: Option<Meaning>,
    /// Ordered path steps. The first step always uses `.` navigation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<ComponentPath>>,
}

/// Structured form of a textual declaration reference such as `mod!Foo#bar:call(1)`.
/// Never constructed by the parser with both `module_source` and
/// `symbol_reference` absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationReference {
    /// Module name preceding `!`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_source: Option<String>,
    /// Where the resolver seeds its search.
    pub resolution_start: ResolutionStart,
    /// Path and meaning following the optional module prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_reference: Option<SymbolReference>,
}

impl DeclarationReference {
    /// Path names joined with `.`, ignoring navigation. Empty without a path.
    pub fn dotted_path(&self) -> String {
        let Some(path) = self.symbol_reference.as_ref().and_then(|s| return s.path.as_ref()) else {
            return String::new();
        };
        return path
            .iter()
            .map(|c| return c.path.as_str())
            .collect::<Vec<_>>()
            .join(".");
    }
}

// ── Display ───────────────────────────────────────────────────────────

/// Write a component, quoting it when it would not re-parse as a bare run.
fn write_component(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let needs_quotes = name.is_empty()
        || name
            .chars()
            .any(|c| return c.is_whitespace() || "\"{}()[]!.#~:,@\r\n\u{2028}\u{2029}".contains(c));
    if !needs_quotes {
        return f.write_str(name);
    }
    f.write_str("\"")?;
    for c in name.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\u{2028}' => f.write_str("\\u2028")?,
            '\u{2029}' => f.write_str("\\u2029")?,
            other => write!(f, "{other}")?,
        }
    }
    return f.write_str("\"");
}

impl fmt::Display for Meaning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(":")?;
        if let Some(label) = &self.label {
            return f.write_str(label);
        }
        if let Some(keyword) = self.keyword {
            f.write_str(keyword.as_str())?;
        }
        if let Some(index) = self.index {
            write!(f, "({index})")?;
        }
        return Ok(());
    }
}

impl fmt::Display for SymbolReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.path.iter().flatten().enumerate() {
            // Only a module-qualified reference starts with `~`.
            if i > 0 || component.navigation == Navigation::Locals {
                write!(f, "{}", component.navigation.as_char())?;
            }
            write_component(f, &component.path)?;
        }
        if let Some(meaning) = &self.meaning {
            write!(f, "{meaning}")?;
        }
        return Ok(());
    }
}

impl fmt::Display for DeclarationReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(module) = &self.module_source {
            write_component(f, module)?;
            f.write_str("!")?;
        } else if self.resolution_start == ResolutionStart::Global {
            f.write_str("!")?;
        }
        if let Some(symbol) = &self.symbol_reference {
            write!(f, "{symbol}")?;
        }
        return Ok(());
    }
}
