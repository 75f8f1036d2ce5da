//! Scoped, prioritized lookup of declaration references in the entity tree.
//!
//! Candidates live in two tiers: `high` entries always beat `low` entries,
//! and a candidate derived from a `low` entry can never be promoted.

use tracing::{debug, trace};

use crate::project::{EntityId, EntityKind, Project};
use crate::types::{ComponentPath, DeclarationReference, Meaning, MeaningKeyword, Navigation, ResolutionStart};

/// The two candidate tiers of a resolution in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    /// Preferred candidates, in priority order.
    pub high: Vec<EntityId>,
    /// Fallback candidates, in priority order.
    pub low: Vec<EntityId>,
}

impl Candidates {
    /// The winning candidate: first `high`, else first `low`.
    fn best(&self) -> Option<EntityId> {
        return self.high.first().or(self.low.first()).copied();
    }
}

/// Resolve `reference` as written in the comment of `origin`.
///
/// Returns `None` when nothing matches. The result is always followed
/// through reference aliases.
pub fn resolve_declaration_reference(
    project: &Project,
    origin: EntityId,
    reference: &DeclarationReference,
) -> Option<EntityId> {
    let mut candidates = seed_candidates(project, origin, reference);
    debug!(
        origin = %project.full_name(origin),
        %reference,
        high = candidates.high.len(),
        low = candidates.low.len(),
        "seeded candidates"
    );

    if let Some(symbol) = &reference.symbol_reference {
        for part in symbol.path.iter().flatten() {
            candidates = resolve_path_step(project, &candidates, part);
            trace!(
                step = %part.path,
                navigation = %part.navigation.as_char(),
                high = candidates.high.len(),
                low = candidates.low.len(),
                "path step"
            );
        }

        if let Some(meaning) = &symbol.meaning {
            candidates = Candidates {
                high: filter_by_meaning(project, &candidates.high, meaning),
                low: filter_by_meaning(project, &candidates.low, meaning),
            };
        }
    }

    return candidates.best().map(|id| return project.deep_target(id));
}

// ── Seeding ───────────────────────────────────────────────────────────

/// Initial candidates before any path step is applied.
pub fn seed_candidates(project: &Project, origin: EntityId, reference: &DeclarationReference) -> Candidates {
    if let Some(module) = &reference.module_source {
        return seed_module(project, module);
    }
    return match reference.resolution_start {
        ResolutionStart::Global => Candidates {
            high: vec![project.root()],
            low: Vec::new(),
        },
        ResolutionStart::Local => seed_local(project, origin),
    };
}

/// Top-level modules named `module`.
fn seed_module(project: &Project, module: &str) -> Candidates {
    let high = project
        .children(project.root())
        .filter(|c| return c.kind.is_module_like() && c.name == module)
        .map(|c| return c.id)
        .collect();

    return Candidates {
        high,
        low: Vec::new(),
    };
}

/// Scope walk for a local reference.
///
/// The origin and its ancestors come first: export containers in `high`,
/// everything else in `low`, so module scope beats a class's own children.
/// Then a member adds its owner, and a member's signature the owner of the
/// member. Anything else adds its same-named siblings so that merged
/// declarations are searched together.
fn seed_local(project: &Project, origin: EntityId) -> Candidates {
    let mut candidates = Candidates::default();
    let Some(entity) = project.get(origin) else {
        return candidates;
    };

    let mut current = Some(origin);
    while let Some(id) = current {
        let Some(scope) = project.get(id) else {
            break;
        };
        if scope.kind.is_export_container() {
            candidates.high.push(id);
        } else {
            candidates.low.push(id);
        }
        current = scope.parent;
    }

    let parent = entity.parent.and_then(|p| return project.get(p));
    if entity.kind.is_member_like() {
        candidates.high.extend(entity.parent);
    } else if entity.kind.is_signature() && parent.is_some_and(|p| return p.kind.is_member_like()) {
        candidates.high.extend(parent.and_then(|p| return p.parent));
    } else if candidates.high.first() != Some(&origin) {
        let siblings: Vec<EntityId> = entity
            .parent
            .into_iter()
            .flat_map(|p| return project.children(p))
            .filter(|sibling| return sibling.name == entity.name)
            .map(|sibling| return sibling.id)
            .collect();
        if siblings.is_empty() {
            candidates.high.push(origin);
        } else {
            candidates.high.extend(siblings);
        }
    }

    return candidates;
}

// ── Path steps ────────────────────────────────────────────────────────

/// Apply one path step to both tiers. Results from `high` sources keep their
/// tier; everything found from a `low` source stays `low`.
fn resolve_path_step(project: &Project, candidates: &Candidates, part: &ComponentPath) -> Candidates {
    let mut next = Candidates::default();

    for id in &candidates.high {
        let found = lookup_part(project, *id, part);
        next.high.extend(found.high);
        next.low.extend(found.low);
    }
    for id in &candidates.low {
        let found = lookup_part(project, *id, part);
        next.low.extend(found.high);
        next.low.extend(found.low);
    }

    return next;
}

/// Children of `source` matching one path component under its navigation rules.
fn lookup_part(project: &Project, source: EntityId, part: &ComponentPath) -> Candidates {
    let source = project.deep_target(source);
    let Some(entity) = project.get(source) else {
        return Candidates::default();
    };
    let named = project.children(source).filter(|c| return c.name == part.path);

    let (high, low): (Vec<_>, Vec<_>) = match part.navigation {
        // Exports first, but any child is still reachable as a fallback.
        Navigation::Exports => named.partition(|c| return c.kind.is_exported_kind() || c.is_static),
        Navigation::Members => (
            named
                .filter(|c| return c.kind.is_member_like() && !c.is_static)
                .collect(),
            Vec::new(),
        ),
        Navigation::Locals if entity.kind.is_export_container() => (named.collect(), Vec::new()),
        Navigation::Locals => (Vec::new(), Vec::new()),
    };

    return Candidates {
        high: high.into_iter().map(|c| return project.deep_target(c.id)).collect(),
        low: low.into_iter().map(|c| return project.deep_target(c.id)).collect(),
    };
}

// ── Meaning ───────────────────────────────────────────────────────────

/// Replace every candidate by the sub-candidate its meaning selects, dropping
/// candidates with no match.
fn filter_by_meaning(project: &Project, candidates: &[EntityId], meaning: &Meaning) -> Vec<EntityId> {
    return candidates
        .iter()
        .filter_map(|id| {
            let options = keyword_candidates(project, *id, meaning.keyword);
            if let Some(label) = &meaning.label {
                return options.into_iter().find(|option| {
                    return project
                        .get(*option)
                        .and_then(|e| return e.comment.as_ref())
                        .and_then(|c| return c.label.as_deref())
                        == Some(label.as_str());
                });
            }
            return options.get(meaning.index.unwrap_or(0)).copied();
        })
        .collect();
}

/// Sub-candidates of `id` compatible with a meaning keyword.
///
/// Without a keyword an entity with signatures stands for its signatures.
fn keyword_candidates(project: &Project, id: EntityId, keyword: Option<MeaningKeyword>) -> Vec<EntityId> {
    let Some(entity) = project.get(id) else {
        return Vec::new();
    };
    let kind = entity.kind;
    let itself_if = |matches: bool| -> Vec<EntityId> {
        if matches {
            return vec![id];
        }
        return Vec::new();
    };

    let Some(keyword) = keyword else {
        if entity.signatures.is_empty() {
            return vec![id];
        }
        return entity.signatures.clone();
    };

    return match keyword {
        MeaningKeyword::Call => entity.signatures.clone(),
        MeaningKeyword::Class => itself_if(kind == EntityKind::Class),
        MeaningKeyword::Complex | MeaningKeyword::Type => itself_if(kind.is_type_like()),
        MeaningKeyword::Constructor | MeaningKeyword::New => {
            if !kind.is_class_or_interface() && kind != EntityKind::TypeLiteral {
                return Vec::new();
            }
            project
                .children(id)
                .find(|c| return c.kind == EntityKind::Constructor)
                .map(|ctor| return ctor.signatures.clone())
                .unwrap_or_default()
        },
        MeaningKeyword::Enum => itself_if(kind == EntityKind::Enum),
        // Events are never resolved.
        MeaningKeyword::Event => Vec::new(),
        MeaningKeyword::Function if kind.is_function_or_method() => entity.signatures.clone(),
        MeaningKeyword::Function => Vec::new(),
        MeaningKeyword::Getter => entity.get_signature.into_iter().collect(),
        MeaningKeyword::Index => entity.index_signatures.clone(),
        MeaningKeyword::Interface => itself_if(kind == EntityKind::Interface),
        MeaningKeyword::Member => itself_if(kind.is_member_like()),
        MeaningKeyword::Namespace => itself_if(kind.is_module_like()),
        MeaningKeyword::Setter => entity.set_signature.into_iter().collect(),
        MeaningKeyword::Var => itself_if(kind == EntityKind::Variable),
    };
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, reason = "tests")]
mod tests {
    use super::*;
    use crate::comment::Comment;
    use crate::grammar;

    /// Entities of the fixture tree that tests refer to by name.
    struct Fixture {
        color_red: EntityId,
        deep_param: EntityId,
        deep_signature: EntityId,
        draw: EntityId,
        draw_fast: EntityId,
        draw_plain: EntityId,
        inner: EntityId,
        lib: EntityId,
        lib_create: EntityId,
        lib_helper: EntityId,
        lib_scratch: EntityId,
        merged_class: EntityId,
        merged_make: EntityId,
        other_widget: EntityId,
        project: Project,
        shape_index: EntityId,
        util: EntityId,
        util_version: EntityId,
        widget: EntityId,
        widget_count: EntityId,
        widget_create: EntityId,
        widget_ctor_plain: EntityId,
        widget_ctor_sized: EntityId,
        widget_helper: EntityId,
        widget_size: EntityId,
        width_get: EntityId,
        width_set: EntityId,
    }

    fn labeled(label: &str) -> Comment {
        return Comment {
            label: Some(label.to_string()),
            ..Comment::default()
        };
    }

    fn fixture() -> Fixture {
        let mut p = Project::new("demo");
        let root = p.root();

        let lib = p.add_child(root, "lib", EntityKind::Module).unwrap();
        let widget = p.add_child(lib, "Widget", EntityKind::Class).unwrap();
        let ctor = p.add_child(widget, "constructor", EntityKind::Constructor).unwrap();
        let widget_ctor_plain = p.add_signature(ctor, EntityKind::ConstructorSignature).unwrap();
        let widget_ctor_sized = p.add_signature(ctor, EntityKind::ConstructorSignature).unwrap();
        p.set_comment(widget_ctor_sized, labeled("SIZED")).unwrap();
        let widget_size = p.add_child(widget, "size", EntityKind::Property).unwrap();
        let widget_count = p.add_child(widget, "count", EntityKind::Method).unwrap();
        p.set_static(widget_count, true).unwrap();
        let widget_create = p.add_child(widget, "create", EntityKind::Method).unwrap();
        p.set_static(widget_create, true).unwrap();
        let draw = p.add_child(widget, "draw", EntityKind::Method).unwrap();
        let draw_plain = p.add_signature(draw, EntityKind::CallSignature).unwrap();
        let draw_fast = p.add_signature(draw, EntityKind::CallSignature).unwrap();
        p.set_comment(draw_fast, labeled("FAST")).unwrap();
        let widget_helper = p.add_child(widget, "helper", EntityKind::Method).unwrap();
        let width = p.add_child(widget, "width", EntityKind::Accessor).unwrap();
        let width_get = p.add_signature(width, EntityKind::GetSignature).unwrap();
        let width_set = p.add_signature(width, EntityKind::SetSignature).unwrap();

        let util = p.add_child(lib, "util", EntityKind::Namespace).unwrap();
        let util_helper = p.add_child(util, "helper", EntityKind::Function).unwrap();
        p.add_signature(util_helper, EntityKind::CallSignature).unwrap();
        let util_version = p.add_child(util, "VERSION", EntityKind::Variable).unwrap();
        let inner = p.add_child(util, "inner", EntityKind::Namespace).unwrap();
        let deep = p.add_child(inner, "deep", EntityKind::Function).unwrap();
        let deep_signature = p.add_signature(deep, EntityKind::CallSignature).unwrap();
        let deep_param = p.add_child(deep_signature, "p", EntityKind::Parameter).unwrap();

        let lib_helper = p.add_child(lib, "helper", EntityKind::Function).unwrap();
        p.add_signature(lib_helper, EntityKind::CallSignature).unwrap();
        p.add_signature(lib_helper, EntityKind::CallSignature).unwrap();
        let lib_create = p.add_child(lib, "create", EntityKind::Function).unwrap();
        let lib_scratch = p.add_child(lib, "scratch", EntityKind::TypeParameter).unwrap();

        let shape = p.add_child(lib, "Shape", EntityKind::Interface).unwrap();
        let shape_index = p.add_signature(shape, EntityKind::IndexSignature).unwrap();
        p.add_child(shape, "area", EntityKind::Property).unwrap();

        let gizmo = p.add_child(lib, "Gizmo", EntityKind::Reference).unwrap();
        p.set_alias_target(gizmo, widget).unwrap();
        p.add_child(lib, "Size", EntityKind::TypeAlias).unwrap();
        let color = p.add_child(lib, "Color", EntityKind::Enum).unwrap();
        let color_red = p.add_child(color, "Red", EntityKind::EnumMember).unwrap();

        let other = p.add_child(root, "other", EntityKind::Module).unwrap();
        let other_widget = p.add_child(other, "Widget", EntityKind::Class).unwrap();
        let merged_class = p.add_child(other, "Merged", EntityKind::Class).unwrap();
        let merged_ns = p.add_child(other, "Merged", EntityKind::Namespace).unwrap();
        let merged_make = p.add_child(merged_ns, "make", EntityKind::Function).unwrap();

        return Fixture {
            color_red,
            deep_param,
            deep_signature,
            draw,
            draw_fast,
            draw_plain,
            inner,
            lib,
            lib_create,
            lib_helper,
            lib_scratch,
            merged_class,
            merged_make,
            other_widget,
            project: p,
            shape_index,
            util,
            util_version,
            widget,
            widget_count,
            widget_create,
            widget_ctor_plain,
            widget_ctor_sized,
            widget_helper,
            widget_size,
            width_get,
            width_set,
        };
    }

    fn resolve(f: &Fixture, origin: EntityId, text: &str) -> Option<EntityId> {
        let (reference, _) = grammar::parse(text).unwrap();
        return resolve_declaration_reference(&f.project, origin, &reference);
    }

    #[test]
    fn global_path_from_root() {
        let f = fixture();
        let root = f.project.root();
        assert_eq!(resolve(&f, root, "!lib.Widget"), Some(f.widget));
        assert_eq!(resolve(&f, root, "!lib.util.inner"), Some(f.inner));
        assert_eq!(resolve(&f, root, "!lib.Color.Red"), Some(f.color_red));
        assert_eq!(resolve(&f, root, "!lib.Nope"), None);
    }

    #[test]
    fn module_source_selects_top_level_module() {
        let f = fixture();
        let origin = f.draw;
        assert_eq!(resolve(&f, origin, "lib!Widget"), Some(f.widget));
        assert_eq!(resolve(&f, origin, "other!Widget"), Some(f.other_widget));
        assert_eq!(resolve(&f, origin, "lib!"), Some(f.lib));
        assert_eq!(resolve(&f, origin, "missing!Widget"), None);
    }

    #[test]
    fn module_source_never_names_the_project() {
        let f = fixture();
        assert_eq!(resolve(&f, f.draw, "demo!lib.Widget"), None);
    }

    #[test]
    fn module_locals_navigation() {
        let f = fixture();
        let root = f.project.root();
        assert_eq!(resolve(&f, root, "lib!~helper"), Some(f.lib_helper));
        assert_eq!(resolve(&f, root, "lib!~scratch"), Some(f.lib_scratch));

        let scratch = ComponentPath::new(Navigation::Locals, "scratch");
        let locals = lookup_part(&f.project, f.lib, &scratch);
        assert_eq!(locals.high, vec![f.lib_scratch]);

        let exports = lookup_part(&f.project, f.lib, &ComponentPath::new(Navigation::Exports, "scratch"));
        assert_eq!(exports.high, Vec::<EntityId>::new());
        assert_eq!(exports.low, vec![f.lib_scratch]);
    }

    #[test]
    fn member_origin_reaches_owner_members() {
        let f = fixture();
        assert_eq!(resolve(&f, f.draw, "size"), Some(f.widget_size));
        assert_eq!(resolve(&f, f.draw_plain, "size"), Some(f.widget_size));
        assert_eq!(resolve(&f, f.draw, "helper"), Some(f.lib_helper));
    }

    #[test]
    fn exported_children_beat_instance_members() {
        let f = fixture();
        // `Widget.helper` is an instance method, so `.` only offers it in the
        // low tier, and the module export wins.
        assert_eq!(resolve(&f, f.widget_size, "helper"), Some(f.lib_helper));
        assert_eq!(resolve(&f, f.widget_size, "Widget#helper"), Some(f.widget_helper));
        assert_eq!(resolve(&f, f.project.root(), "!lib.Widget.helper"), Some(f.widget_helper));
    }

    #[test]
    fn nested_origin_reaches_enclosing_namespaces() {
        let f = fixture();
        assert_eq!(resolve(&f, f.deep_signature, "VERSION"), Some(f.util_version));
        assert_eq!(resolve(&f, f.deep_param, "inner"), Some(f.inner));
        assert_eq!(resolve(&f, f.deep_param, "Widget"), Some(f.widget));
    }

    #[test]
    fn local_seed_puts_export_containers_high_and_other_ancestors_low() {
        let f = fixture();
        let (reference, _) = grammar::parse(":call").unwrap();
        let seeded = seed_candidates(&f.project, f.deep_param, &reference);
        assert_eq!(
            seeded.high,
            vec![f.inner, f.util, f.lib, f.project.root(), f.deep_param]
        );
        let deep = f.project.parent(f.deep_signature).unwrap();
        assert_eq!(seeded.low, vec![f.deep_param, f.deep_signature, deep]);
    }

    #[test]
    fn member_origin_seeds_enclosing_modules_before_its_owner() {
        let f = fixture();
        let (reference, _) = grammar::parse("create").unwrap();
        let seeded = seed_candidates(&f.project, f.draw, &reference);
        assert_eq!(seeded.high, vec![f.lib, f.project.root(), f.widget]);
        assert_eq!(seeded.low, vec![f.draw, f.widget]);
    }

    #[test]
    fn module_export_beats_class_static_of_the_same_name() {
        let f = fixture();
        assert_eq!(resolve(&f, f.draw, "create"), Some(f.lib_create));
        assert_eq!(resolve(&f, f.draw_plain, "create"), Some(f.lib_create));
        assert_eq!(resolve(&f, f.draw, "Widget.create"), Some(f.widget_create));
    }

    #[test]
    fn root_origin_is_not_seeded_twice() {
        let f = fixture();
        let root = f.project.root();
        let (reference, _) = grammar::parse("lib").unwrap();
        let seeded = seed_candidates(&f.project, root, &reference);
        assert_eq!(seeded.high, vec![root]);
        assert!(seeded.low.is_empty());
    }

    #[test]
    fn same_named_siblings_are_searched_together() {
        let f = fixture();
        assert_eq!(resolve(&f, f.merged_class, "make"), Some(f.merged_make));
    }

    #[test]
    fn member_navigation_skips_static_children() {
        let f = fixture();
        let root = f.project.root();
        assert_eq!(resolve(&f, root, "!lib.Widget#count"), None);
        assert_eq!(resolve(&f, root, "!lib.Widget.count"), Some(f.widget_count));
        assert_eq!(resolve(&f, root, "!lib.Widget#draw"), Some(f.draw));
        assert_eq!(resolve(&f, root, "!lib#util"), None);
    }

    #[test]
    fn locals_navigation_requires_container() {
        let f = fixture();
        let root = f.project.root();
        assert_eq!(resolve(&f, root, "!lib~Widget"), Some(f.widget));
        assert_eq!(resolve(&f, root, "!lib.Widget~draw"), None);
    }

    #[test]
    fn aliases_are_followed_for_results_and_further_steps() {
        let f = fixture();
        let root = f.project.root();
        assert_eq!(resolve(&f, root, "!lib.Gizmo"), Some(f.widget));
        assert_eq!(resolve(&f, root, "!lib.Gizmo#draw"), Some(f.draw));
    }

    #[test]
    fn meaning_selects_signatures() {
        let f = fixture();
        let root = f.project.root();
        assert_eq!(resolve(&f, root, "!lib.Widget#draw:call"), Some(f.draw_plain));
        assert_eq!(resolve(&f, root, "!lib.Widget#draw:call(1)"), Some(f.draw_fast));
        assert_eq!(resolve(&f, root, "!lib.Widget#draw:1"), Some(f.draw_fast));
        assert_eq!(resolve(&f, root, "!lib.Widget#draw:(1)"), Some(f.draw_fast));
        assert_eq!(resolve(&f, root, "!lib.Widget#draw:FAST"), Some(f.draw_fast));
        assert_eq!(resolve(&f, root, "!lib.Widget#draw:function"), Some(f.draw_plain));
        assert_eq!(resolve(&f, root, "!lib.Widget#draw:call(5)"), None);
        assert_eq!(resolve(&f, root, "!lib.Widget#draw:MISSING"), None);
    }

    #[test]
    fn meaning_selects_constructors_and_accessors() {
        let f = fixture();
        let root = f.project.root();
        assert_eq!(resolve(&f, root, "!lib.Widget:constructor"), Some(f.widget_ctor_plain));
        assert_eq!(resolve(&f, root, "!lib.Widget:new(1)"), Some(f.widget_ctor_sized));
        assert_eq!(resolve(&f, root, "!lib.Widget:SIZED"), None);
        assert_eq!(resolve(&f, root, "!lib.Widget#width:getter"), Some(f.width_get));
        assert_eq!(resolve(&f, root, "!lib.Widget#width:setter"), Some(f.width_set));
        assert_eq!(resolve(&f, root, "!lib.Shape:index"), Some(f.shape_index));
    }

    #[test]
    fn meaning_keywords_filter_by_kind() {
        let f = fixture();
        let root = f.project.root();
        assert_eq!(resolve(&f, root, "!lib.Widget:class"), Some(f.widget));
        assert_eq!(resolve(&f, root, "!lib.Widget:interface"), None);
        assert_eq!(resolve(&f, root, "!lib.util:namespace"), Some(f.util));
        assert_eq!(resolve(&f, root, "!lib.util.VERSION:var"), Some(f.util_version));
        assert!(resolve(&f, root, "!lib.Size:type").is_some());
        assert!(resolve(&f, root, "!lib.Shape:complex").is_some());
        assert!(resolve(&f, root, "!lib.Color:enum").is_some());
        assert_eq!(resolve(&f, root, "!lib.Widget#size:member"), Some(f.widget_size));
        assert_eq!(resolve(&f, root, "!lib.Widget:event"), None);
        assert_eq!(resolve(&f, root, "!lib.Widget:function"), None);
    }

    #[test]
    fn meaning_without_keyword_prefers_signatures() {
        let f = fixture();
        let root = f.project.root();
        let signatures = f.project.get(f.lib_helper).unwrap().signatures.clone();
        assert_eq!(resolve(&f, root, "!lib.helper:0"), signatures.first().copied());
        assert_eq!(resolve(&f, root, "!lib.Widget:0"), Some(f.widget));
    }

    #[test]
    fn meaning_only_reference_applies_to_origin_scope() {
        let f = fixture();
        // A member origin seeds its owner; `:class` keeps it.
        assert_eq!(resolve(&f, f.widget_size, ":class"), Some(f.widget));
    }

    #[test]
    fn resolution_is_idempotent() {
        let f = fixture();
        let first = resolve(&f, f.draw, "Widget#draw:FAST");
        let second = resolve(&f, f.draw, "Widget#draw:FAST");
        assert_eq!(first, Some(f.draw_fast));
        assert_eq!(first, second);
    }
}
