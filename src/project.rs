//! Arena-owned documentation entity tree.
//!
//! Entities live in one `Vec` indexed by [`EntityId`]; parents are stored as
//! indices so upward traversal needs no back-pointers. The tree is built
//! once, then borrowed immutably while links are resolved.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::comment::{Comment, DisplayPart, Document};
use crate::error::Error;
use crate::links::LinkReport;

/// Index of an entity inside its [`Project`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(
    /// Position in the project arena.
    usize,
);

impl EntityId {
    /// Position in the project arena.
    pub const fn index(self) -> usize {
        return self.0;
    }
}

/// Classification of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Get/set accessor pair.
    Accessor,
    /// Signature of a plain function or method call.
    CallSignature,
    /// Class declaration.
    Class,
    /// Class constructor.
    Constructor,
    /// Signature of a constructor.
    ConstructorSignature,
    /// Enum declaration.
    Enum,
    /// Enum member.
    EnumMember,
    /// Free function.
    Function,
    /// Getter half of an accessor.
    GetSignature,
    /// Index signature of a type.
    IndexSignature,
    /// Interface declaration.
    Interface,
    /// Method of a class or interface.
    Method,
    /// Module (a file or package entry point).
    Module,
    /// Namespace inside a module.
    Namespace,
    /// Signature parameter.
    Parameter,
    /// The project root.
    Project,
    /// Property of a class, interface or type literal.
    Property,
    /// Re-export alias pointing at another entity.
    Reference,
    /// Setter half of an accessor.
    SetSignature,
    /// Type alias.
    TypeAlias,
    /// Anonymous object type.
    TypeLiteral,
    /// Generic type parameter.
    TypeParameter,
    /// Variable or constant.
    Variable,
}

impl EntityKind {
    /// Module or namespace.
    pub const fn is_module_like(self) -> bool {
        return matches!(self, Self::Module | Self::Namespace);
    }

    /// Project, module or namespace: containers whose children are exports.
    pub const fn is_export_container(self) -> bool {
        return matches!(self, Self::Project | Self::Module | Self::Namespace);
    }

    /// Members of classes, interfaces, enums and type literals.
    pub const fn is_member_like(self) -> bool {
        return matches!(self, Self::EnumMember | Self::Property | Self::Method | Self::Accessor);
    }

    /// Any signature kind.
    pub const fn is_signature(self) -> bool {
        return matches!(
            self,
            Self::CallSignature
                | Self::ConstructorSignature
                | Self::IndexSignature
                | Self::GetSignature
                | Self::SetSignature
        );
    }

    /// Kinds that name a type.
    pub const fn is_type_like(self) -> bool {
        return matches!(self, Self::Interface | Self::TypeLiteral | Self::TypeParameter | Self::TypeAlias);
    }

    /// Kinds that may be exported from a module.
    pub const fn is_exported_kind(self) -> bool {
        return matches!(
            self,
            Self::Module
                | Self::Namespace
                | Self::Enum
                | Self::Variable
                | Self::Function
                | Self::Class
                | Self::Interface
                | Self::TypeAlias
                | Self::Reference
        );
    }

    /// Function or method.
    pub const fn is_function_or_method(self) -> bool {
        return matches!(self, Self::Function | Self::Method);
    }

    /// Class or interface.
    pub const fn is_class_or_interface(self) -> bool {
        return matches!(self, Self::Class | Self::Interface);
    }
}

/// One named declaration in the tree.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Target of a [`EntityKind::Reference`] alias.
    pub alias_target: Option<EntityId>,
    /// Owned children in declaration order.
    pub children: Vec<EntityId>,
    /// Attached documentation comment.
    pub comment: Option<Comment>,
    /// Attached free-form documents (readmes and guides).
    pub documents: Vec<Document>,
    /// Getter signature of an accessor.
    pub get_signature: Option<EntityId>,
    /// This entity's own index.
    pub id: EntityId,
    /// Index signatures of a type.
    pub index_signatures: Vec<EntityId>,
    /// Whether the entity is a static member.
    pub is_static: bool,
    /// Classification.
    pub kind: EntityKind,
    /// Declared name. Signatures carry their owner's name.
    pub name: String,
    /// Non-owning parent index; `None` only for the root.
    pub parent: Option<EntityId>,
    /// Setter signature of an accessor.
    pub set_signature: Option<EntityId>,
    /// Call or constructor signatures.
    pub signatures: Vec<EntityId>,
    /// Identifier registered in the project's symbol table.
    pub symbol_id: Option<String>,
}

impl Entity {
    /// A fresh entity with no children, signatures or comment.
    fn new(id: EntityId, name: String, kind: EntityKind, parent: Option<EntityId>) -> Self {
        return Self {
            alias_target: None,
            children: Vec::new(),
            comment: None,
            documents: Vec::new(),
            get_signature: None,
            id,
            index_signatures: Vec::new(),
            is_static: false,
            kind,
            name,
            parent,
            set_signature: None,
            signatures: Vec::new(),
            symbol_id: None,
        };
    }
}

/// The documentation tree for one project.
#[derive(Debug, Clone)]
pub struct Project {
    /// Arena of every entity; index 0 is the root.
    entities: Vec<Entity>,
    /// Symbol identifier to entity, for pre-known link targets and aliases.
    symbols: HashMap<String, EntityId>,
}

impl Project {
    /// Create a project holding only its root entity.
    pub fn new(name: impl Into<String>) -> Self {
        let root = Entity::new(EntityId(0), name.into(), EntityKind::Project, None);
        return Self {
            entities: vec![root],
            symbols: HashMap::new(),
        };
    }

    /// The root entity's id.
    pub const fn root(&self) -> EntityId {
        return EntityId(0);
    }

    /// Look up an entity.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        return self.entities.get(id.0);
    }

    /// Every entity in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        return self.entities.iter();
    }

    /// Number of entities including the root.
    pub fn len(&self) -> usize {
        return self.entities.len();
    }

    /// A project always holds its root.
    pub const fn is_empty(&self) -> bool {
        return false;
    }

    /// Mutable lookup, reporting unknown ids as corruption.
    fn get_mut(&mut self, id: EntityId) -> Result<&mut Entity, Error> {
        return self.entities.get_mut(id.0).ok_or_else(|| {
            return Error::ProjectCorrupt {
                reason: format!("no entity with id {}", id.0),
            };
        });
    }

    /// Push a new entity into the arena without linking it to a parent list.
    fn push_entity(&mut self, parent: EntityId, name: String, kind: EntityKind) -> Result<EntityId, Error> {
        if self.get(parent).is_none() {
            return Err(Error::ProjectCorrupt {
                reason: format!("parent id {} does not exist", parent.0),
            });
        }
        let id = EntityId(self.entities.len());
        self.entities.push(Entity::new(id, name, kind, Some(parent)));
        return Ok(id);
    }

    // ── Building ──────────────────────────────────────────────────────

    /// Add a named child under `parent`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectCorrupt` if `parent` is unknown or `kind` is a
    /// signature or project kind.
    pub fn add_child(&mut self, parent: EntityId, name: impl Into<String>, kind: EntityKind) -> Result<EntityId, Error> {
        if kind.is_signature() || kind == EntityKind::Project {
            return Err(Error::ProjectCorrupt {
                reason: format!("{kind:?} cannot be added as a child"),
            });
        }
        let id = self.push_entity(parent, name.into(), kind)?;
        self.get_mut(parent)?.children.push(id);
        return Ok(id);
    }

    /// Add a signature to `owner`. Call and constructor signatures join the
    /// signature list, index signatures the index list, and get/set
    /// signatures fill the accessor slots.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectCorrupt` if `owner` is unknown, `kind` is not a
    /// signature kind, or the accessor slot is already taken.
    pub fn add_signature(&mut self, owner: EntityId, kind: EntityKind) -> Result<EntityId, Error> {
        if !kind.is_signature() {
            return Err(Error::ProjectCorrupt {
                reason: format!("{kind:?} is not a signature kind"),
            });
        }
        let name = self
            .get(owner)
            .map(|e| return e.name.clone())
            .unwrap_or_default();
        let id = self.push_entity(owner, name, kind)?;
        let owner_entity = self.get_mut(owner)?;

        let slot = match kind {
            EntityKind::GetSignature => &mut owner_entity.get_signature,
            EntityKind::SetSignature => &mut owner_entity.set_signature,
            EntityKind::IndexSignature => {
                owner_entity.index_signatures.push(id);
                return Ok(id);
            },
            _ => {
                owner_entity.signatures.push(id);
                return Ok(id);
            },
        };
        if slot.is_some() {
            return Err(Error::ProjectCorrupt {
                reason: format!("`{}` already has a {kind:?}", owner_entity.name),
            });
        }
        *slot = Some(id);
        return Ok(id);
    }

    /// Attach or replace a comment.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectCorrupt` if `id` is unknown.
    pub fn set_comment(&mut self, id: EntityId, comment: Comment) -> Result<(), Error> {
        self.get_mut(id)?.comment = Some(comment);
        return Ok(());
    }

    /// Mark an entity static or instance.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectCorrupt` if `id` is unknown.
    pub fn set_static(&mut self, id: EntityId, is_static: bool) -> Result<(), Error> {
        self.get_mut(id)?.is_static = is_static;
        return Ok(());
    }

    /// Attach a free-form document.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectCorrupt` if `id` is unknown.
    pub fn add_document(&mut self, id: EntityId, document: Document) -> Result<(), Error> {
        self.get_mut(id)?.documents.push(document);
        return Ok(());
    }

    /// Register `symbol` as the identifier of `id`. Re-registering moves the symbol.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectCorrupt` if `id` is unknown.
    pub fn register_symbol(&mut self, symbol: impl Into<String>, id: EntityId) -> Result<(), Error> {
        let symbol = symbol.into();
        self.get_mut(id)?.symbol_id = Some(symbol.clone());
        self.symbols.insert(symbol, id);
        return Ok(());
    }

    /// Point a reference alias at its target.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectCorrupt` if either id is unknown or `alias` is
    /// not a [`EntityKind::Reference`].
    pub fn set_alias_target(&mut self, alias: EntityId, target: EntityId) -> Result<(), Error> {
        if self.get(target).is_none() {
            return Err(Error::ProjectCorrupt {
                reason: format!("alias target id {} does not exist", target.0),
            });
        }
        let entity = self.get_mut(alias)?;
        if entity.kind != EntityKind::Reference {
            return Err(Error::ProjectCorrupt {
                reason: format!("`{}` is not a reference", entity.name),
            });
        }
        entity.alias_target = Some(target);
        return Ok(());
    }

    /// Assign rewritten comments and documents produced by link resolution.
    pub fn apply_links(&mut self, report: LinkReport) {
        for (id, comment) in report.comments {
            if let Some(entity) = self.entities.get_mut(id.0) {
                entity.comment = Some(comment);
            }
        }
        for (id, documents) in report.documents {
            if let Some(entity) = self.entities.get_mut(id.0) {
                entity.documents = documents;
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────────────

    /// Parent of `id`, `None` for the root.
    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        return self.get(id)?.parent;
    }

    /// Children of `id` in declaration order.
    pub fn children(&self, id: EntityId) -> impl Iterator<Item = &Entity> {
        return self
            .get(id)
            .into_iter()
            .flat_map(|e| return e.children.iter())
            .filter_map(|child| return self.get(*child));
    }

    /// Entity registered under a symbol identifier.
    pub fn entity_for_symbol(&self, symbol: &str) -> Option<EntityId> {
        return self.symbols.get(symbol).copied();
    }

    /// Follow reference aliases to their final target. Cycles stop at the
    /// last entity visited before repeating.
    pub fn deep_target(&self, id: EntityId) -> EntityId {
        let mut current = id;
        let mut seen = HashSet::new();
        while seen.insert(current) {
            match self.get(current).and_then(|e| return e.alias_target) {
                Some(next) => current = next,
                None => return current,
            }
        }
        return current;
    }

    /// Dot-joined names from below the root down to `id`. Signatures share
    /// their owner's full name.
    pub fn full_name(&self, id: EntityId) -> String {
        let mut names = Vec::new();
        let mut current = self.get(id);
        while let Some(entity) = current {
            if entity.kind == EntityKind::Project {
                break;
            }
            if !entity.kind.is_signature() {
                names.push(entity.name.as_str());
            }
            current = entity.parent.and_then(|p| return self.get(p));
        }
        names.reverse();
        return names.join(".");
    }

    /// First entity, in insertion order, whose full name equals `name`.
    /// The empty name is the root.
    pub fn find_by_full_name(&self, name: &str) -> Option<EntityId> {
        if name.is_empty() {
            return Some(self.root());
        }
        return self
            .entities
            .iter()
            .find(|e| return e.kind != EntityKind::Project && self.full_name(e.id) == name)
            .map(|e| return e.id);
    }

    // ── Loading ───────────────────────────────────────────────────────

    /// Read and build a project from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectNotFound` if the file doesn't exist,
    /// `Error::Io` for other read failures, or any error from [`Project::from_json`].
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ProjectNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::from_json(&content);
    }

    /// Build a project from its tree-shaped JSON form.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` for malformed JSON, `Error::ProjectCorrupt` for
    /// structural violations, or `Error::UnknownSymbol` when an alias names an
    /// unregistered symbol.
    pub fn from_json(content: &str) -> Result<Self, Error> {
        let raw: ProjectNode = serde_json::from_str(content)?;
        let mut project = Self::new(raw.name);
        let root = project.root();

        if let Some(comment) = raw.comment {
            project.set_comment(root, comment)?;
        }
        if let Some(readme) = raw.readme {
            project.add_document(root, Document {
                content: readme,
                name: "README".to_string(),
            })?;
        }
        for document in raw.documents {
            project.add_document(root, document)?;
        }

        let mut aliases = Vec::new();
        for child in raw.children {
            project.insert_node(root, child, &mut aliases)?;
        }

        for (alias, symbol) in aliases {
            let target = project
                .entity_for_symbol(&symbol)
                .ok_or(Error::UnknownSymbol { id: symbol })?;
            project.set_alias_target(alias, target)?;
        }

        return Ok(project);
    }

    /// Insert a JSON child node and its subtree, deferring alias targets until
    /// every symbol is registered.
    fn insert_node(
        &mut self,
        parent: EntityId,
        node: EntityNode,
        aliases: &mut Vec<(EntityId, String)>,
    ) -> Result<EntityId, Error> {
        if node.name.is_empty() {
            return Err(Error::ProjectCorrupt {
                reason: format!("{:?} under `{}` has no name", node.kind, self.full_name(parent)),
            });
        }
        let id = self.add_child(parent, node.name.clone(), node.kind)?;
        self.fill_node(id, node, aliases)?;
        return Ok(id);
    }

    /// Insert a JSON signature node under `owner`.
    fn insert_signature(
        &mut self,
        owner: EntityId,
        node: EntityNode,
        aliases: &mut Vec<(EntityId, String)>,
    ) -> Result<EntityId, Error> {
        let id = self.add_signature(owner, node.kind)?;
        self.fill_node(id, node, aliases)?;
        return Ok(id);
    }

    /// Copy the non-structural fields of a JSON node and recurse into its subtree.
    fn fill_node(&mut self, id: EntityId, node: EntityNode, aliases: &mut Vec<(EntityId, String)>) -> Result<(), Error> {
        self.set_static(id, node.is_static)?;
        if let Some(symbol) = node.id {
            self.register_symbol(symbol, id)?;
        }
        if let Some(target) = node.target {
            aliases.push((id, target));
        }
        if let Some(comment) = node.comment {
            self.set_comment(id, comment)?;
        }
        for document in node.documents {
            self.add_document(id, document)?;
        }

        let accessors = node.get_signature.into_iter().chain(node.set_signature).map(|b| return *b);
        for signature in node
            .signatures
            .into_iter()
            .chain(node.index_signatures)
            .chain(accessors)
        {
            self.insert_signature(id, signature, aliases)?;
        }
        for child in node.children {
            self.insert_node(id, child, aliases)?;
        }
        return Ok(());
    }
}

/// Raw JSON shape of the project root.
#[derive(Deserialize)]
struct ProjectNode {
    /// Top-level entities, usually modules.
    #[serde(default)]
    children: Vec<EntityNode>,
    /// Comment attached to the project itself.
    #[serde(default)]
    comment: Option<Comment>,
    /// Additional documents attached to the root.
    #[serde(default)]
    documents: Vec<Document>,
    /// Project name.
    name: String,
    /// Readme body, attached to the root as a document named `README`.
    #[serde(default)]
    readme: Option<Vec<DisplayPart>>,
}

/// Raw JSON shape of one entity.
#[derive(Deserialize)]
struct EntityNode {
    /// Child entities.
    #[serde(default)]
    children: Vec<EntityNode>,
    /// Attached comment.
    #[serde(default)]
    comment: Option<Comment>,
    /// Attached documents.
    #[serde(default)]
    documents: Vec<Document>,
    /// Getter signature of an accessor.
    #[serde(default)]
    get_signature: Option<Box<EntityNode>>,
    /// Symbol identifier to register.
    #[serde(default)]
    id: Option<String>,
    /// Index signatures.
    #[serde(default)]
    index_signatures: Vec<EntityNode>,
    /// Static flag.
    #[serde(default, rename = "static")]
    is_static: bool,
    /// Classification.
    kind: EntityKind,
    /// Declared name; ignored for signatures.
    #[serde(default)]
    name: String,
    /// Setter signature of an accessor.
    #[serde(default)]
    set_signature: Option<Box<EntityNode>>,
    /// Call or constructor signatures.
    #[serde(default)]
    signatures: Vec<EntityNode>,
    /// Symbol identifier of the aliased entity, for references.
    #[serde(default)]
    target: Option<String>,
}
