//! Resolution of `{@link}` inline tags in comments and documents.
//!
//! Each link tries, in order: a pre-known symbol identifier, the declaration
//! reference resolver, the registered external resolvers, and finally a bare
//! absolute URL. Rewriting is functional: the project is only read, and the
//! rewritten comments come back in a [`LinkReport`] for
//! [`Project::apply_links`].

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace, warn};

use crate::comment::{BlockTag, Comment, DisplayPart, Document, InlineTag, LinkTarget};
use crate::config::{Config, LinkOptions};
use crate::external::{ExternalLink, ExternalResolver};
use crate::grammar;
use crate::project::{Entity, EntityId, Project};
use crate::resolver;
use crate::types::DeclarationReference;

/// Absolute URL schemes accepted as bare link targets.
static URL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(r"^(http|ftp)s?://").expect("valid regex");
});

/// A link tag that no strategy could resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedLink {
    /// Entity whose comment or document holds the link.
    pub origin: EntityId,
    /// Full name of the origin, for diagnostics.
    pub origin_name: String,
    /// Tag name, e.g. `@link`.
    pub tag: String,
    /// Raw link text.
    pub text: String,
}

/// Outcome of resolving every link in a project.
#[derive(Debug, Clone, Default)]
pub struct LinkReport {
    /// Rewritten comments by entity.
    pub comments: Vec<(EntityId, Comment)>,
    /// Rewritten documents by entity.
    pub documents: Vec<(EntityId, Vec<Document>)>,
    /// Number of link tags that resolved.
    pub resolved: usize,
    /// Link tags left unchanged.
    pub unresolved: Vec<UnresolvedLink>,
}

/// Resolves link tags against one frozen project.
pub struct LinkResolver<'p> {
    /// External resolvers in registration order; the first answer wins.
    external: Vec<Box<dyn ExternalResolver>>,
    /// Display-text and reporting options.
    options: LinkOptions,
    /// The tree links resolve into.
    project: &'p Project,
}

impl<'p> LinkResolver<'p> {
    /// A resolver with no external fallbacks.
    pub fn new(project: &'p Project, options: LinkOptions) -> Self {
        return Self {
            external: Vec::new(),
            options,
            project,
        };
    }

    /// A resolver configured from `.doclink.toml`, with the configured symbol
    /// link mappings registered as the first external resolver.
    pub fn from_config(project: &'p Project, config: &Config) -> Self {
        let resolver = Self::new(project, config.link_options());
        let mappings = config.symbol_link_mappings();
        if mappings.is_empty() {
            return resolver;
        }
        return resolver.with_resolver(mappings);
    }

    /// Register an external resolver after those already registered.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl ExternalResolver + 'static) -> Self {
        self.external.push(Box::new(resolver));
        return self;
    }

    /// Register a closure as an external resolver.
    #[must_use]
    pub fn with_fn<F>(self, resolve: F) -> Self
    where
        F: Fn(Option<&DeclarationReference>, &Entity, Option<&InlineTag>, Option<&str>) -> Option<ExternalLink>
            + Send
            + Sync
            + 'static,
    {
        return self.with_resolver(resolve);
    }

    // ── Single tags ───────────────────────────────────────────────────

    /// Resolve one link tag written in the comment of `origin`.
    ///
    /// Returns the rewritten tag, or `None` when nothing resolved it.
    pub fn resolve_link_tag(&self, origin: EntityId, tag: &InlineTag) -> Option<InlineTag> {
        let text = tag.text.as_str();
        let end = text.len();
        let start = skip_whitespace(text, 0);
        let reference = grammar::parse_declaration_reference(text, start, end);
        let mut pos = start;

        let mut resolved = self.resolve_known_target(tag).map(|found| {
            pos = end;
            return found;
        });

        if resolved.is_none() {
            if let Some((reference, consumed)) = &reference {
                pos = *consumed;
                resolved = self.resolve_in_tree(origin, reference, text.get(start..pos).unwrap_or(text));
            }
        }

        // External resolvers also see text that did not parse.
        if resolved.is_none() {
            let parsed = reference.as_ref().map(|(r, _)| return r);
            resolved = self.resolve_external(origin, parsed, tag, text.get(start..pos).unwrap_or(text));
        }

        if resolved.is_none() {
            if let Some(url) = bare_url(text.get(start..).unwrap_or("")) {
                pos = start + url.len();
                resolved = Some((LinkTarget::Url(url.to_string()), url.to_string()));
            }
        }

        let (target, default_text) = resolved?;
        trace!(text, ?target, "resolved link");

        // Remaining text after an optional pipe is the author's display text.
        let mut pos = skip_whitespace(text, pos);
        if text.get(pos..).is_some_and(|rest| return rest.starts_with('|')) {
            pos += 1;
        }
        let explicit = text.get(pos..).unwrap_or("").trim();
        let display = if explicit.is_empty() {
            default_text
        } else {
            explicit.to_string()
        };

        return Some(InlineTag {
            target: Some(target),
            text: display,
            ..tag.clone()
        });
    }

    /// Look up a pre-known symbol identifier in the project's symbol table.
    fn resolve_known_target(&self, tag: &InlineTag) -> Option<(LinkTarget, String)> {
        let known = tag.known_target.as_deref()?;
        let target = self.project.deep_target(self.project.entity_for_symbol(known)?);

        let display = match &tag.link_text {
            Some(literal) => literal.clone(),
            None if self.options.preserve_link_text => tag.text.clone(),
            None => self.entity_name(target),
        };
        return Some((LinkTarget::Entity(target), display));
    }

    /// Resolve a parsed reference against the tree. `consumed` is the
    /// reference's own text, used as display text when preserving.
    fn resolve_in_tree(
        &self,
        origin: EntityId,
        reference: &DeclarationReference,
        consumed: &str,
    ) -> Option<(LinkTarget, String)> {
        let target = resolver::resolve_declaration_reference(self.project, origin, reference)?;
        let display = if self.options.preserve_link_text {
            consumed.to_string()
        } else {
            self.entity_name(target)
        };
        return Some((LinkTarget::Entity(target), display));
    }

    /// Ask every external resolver in turn. `consumed` is the reference's
    /// own text, empty when nothing parsed.
    fn resolve_external(
        &self,
        origin: EntityId,
        reference: Option<&DeclarationReference>,
        tag: &InlineTag,
        consumed: &str,
    ) -> Option<(LinkTarget, String)> {
        let origin_entity = self.project.get(origin)?;
        let link = self.external.iter().find_map(|external| {
            return external.resolve(reference, origin_entity, Some(tag), tag.known_target.as_deref());
        })?;
        debug!(text = %tag.text, target = link.target(), "resolved link externally");

        let display = link.caption().unwrap_or(consumed).to_string();
        return Some((LinkTarget::Url(link.target().to_string()), display));
    }

    /// Name shown for an entity target.
    fn entity_name(&self, id: EntityId) -> String {
        return self
            .project
            .get(id)
            .map(|e| return e.name.clone())
            .unwrap_or_default();
    }

    // ── Parts, comments and projects ──────────────────────────────────

    /// Rewrite every link tag in `parts`, recording the outcome in `report`.
    fn rewrite_parts(&self, origin: EntityId, parts: &[DisplayPart], report: &mut LinkReport) -> Vec<DisplayPart> {
        return parts
            .iter()
            .map(|part| {
                let DisplayPart::InlineTag(tag) = part else {
                    return part.clone();
                };
                if !tag.is_link() {
                    return part.clone();
                }
                if let Some(rewritten) = self.resolve_link_tag(origin, tag) {
                    report.resolved += 1;
                    return DisplayPart::InlineTag(rewritten);
                }
                self.record_unresolved(origin, tag, report);
                return part.clone();
            })
            .collect();
    }

    /// Note an unresolved link and warn about it if validation asks for that.
    fn record_unresolved(&self, origin: EntityId, tag: &InlineTag, report: &mut LinkReport) {
        let origin_name = self.project.full_name(origin);
        if self.options.warn_on_invalid_link {
            warn!(
                "Failed to resolve link to \"{}\" in comment for {}",
                tag.text.trim(),
                display_origin(&origin_name)
            );
        }
        report.unresolved.push(UnresolvedLink {
            origin,
            origin_name,
            tag: tag.tag.clone(),
            text: tag.text.clone(),
        });
    }

    /// Rewrite the summary and block tags of a comment.
    fn rewrite_comment(&self, origin: EntityId, comment: &Comment, report: &mut LinkReport) -> Comment {
        let summary = self.rewrite_parts(origin, &comment.summary, report);
        let block_tags = comment
            .block_tags
            .iter()
            .map(|block| {
                return BlockTag {
                    content: self.rewrite_parts(origin, &block.content, report),
                    tag: block.tag.clone(),
                };
            })
            .collect();

        return Comment {
            block_tags,
            label: comment.label.clone(),
            summary,
        };
    }

    /// Rewrite link tags in a list of display parts written in the comment of `origin`.
    /// Unresolved tags are returned unchanged.
    pub fn resolve_parts(&self, origin: EntityId, parts: &[DisplayPart]) -> Vec<DisplayPart> {
        return self.rewrite_parts(origin, parts, &mut LinkReport::default());
    }

    /// Rewrite link tags in a comment attached to `origin`.
    pub fn resolve_comment(&self, origin: EntityId, comment: &Comment) -> Comment {
        return self.rewrite_comment(origin, comment, &mut LinkReport::default());
    }

    /// Resolve every link in every comment and document of the project,
    /// signatures included.
    pub fn resolve_project(&self) -> LinkReport {
        let mut report = LinkReport::default();

        for entity in self.project.iter() {
            if let Some(comment) = &entity.comment {
                let rewritten = self.rewrite_comment(entity.id, comment, &mut report);
                report.comments.push((entity.id, rewritten));
            }
            if !entity.documents.is_empty() {
                let documents = entity
                    .documents
                    .iter()
                    .map(|document| {
                        return Document {
                            content: self.rewrite_parts(entity.id, &document.content, &mut report),
                            name: document.name.clone(),
                        };
                    })
                    .collect();
                report.documents.push((entity.id, documents));
            }
        }

        debug!(
            resolved = report.resolved,
            unresolved = report.unresolved.len(),
            "resolved project links"
        );
        return report;
    }
}

/// Origin name as shown in messages; the root has an empty full name.
pub fn display_origin(origin_name: &str) -> &str {
    if origin_name.is_empty() {
        return "the project";
    }
    return origin_name;
}

/// Byte position of the first non-whitespace character at or after `pos`.
fn skip_whitespace(text: &str, pos: usize) -> usize {
    let rest = text.get(pos..).unwrap_or("");
    return pos + (rest.len() - rest.trim_start().len());
}

/// The leading absolute URL of `text`, up to the first whitespace.
fn bare_url(text: &str) -> Option<&str> {
    if !URL_PREFIX.is_match(text) {
        return None;
    }
    let stop = text.find(char::is_whitespace).unwrap_or(text.len());
    return text.get(..stop);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, reason = "tests")]
mod tests {
    use super::*;
    use crate::project::EntityKind;
    use crate::types::ResolutionStart;

    struct Fixture {
        draw: EntityId,
        draw_signature: EntityId,
        project: Project,
        widget: EntityId,
    }

    fn fixture() -> Fixture {
        let mut project = Project::new("demo");
        let lib = project.add_child(project.root(), "lib", EntityKind::Module).unwrap();
        let widget = project.add_child(lib, "Widget", EntityKind::Class).unwrap();
        project.register_symbol("sym:Widget", widget).unwrap();
        let draw = project.add_child(widget, "draw", EntityKind::Method).unwrap();
        let draw_signature = project.add_signature(draw, EntityKind::CallSignature).unwrap();
        return Fixture {
            draw,
            draw_signature,
            project,
            widget,
        };
    }

    fn plain() -> LinkOptions {
        return LinkOptions {
            preserve_link_text: false,
            warn_on_invalid_link: false,
        };
    }

    fn preserving() -> LinkOptions {
        return LinkOptions {
            preserve_link_text: true,
            warn_on_invalid_link: false,
        };
    }

    fn target_and_text(tag: Option<InlineTag>) -> Option<(LinkTarget, String)> {
        return tag.map(|t| return (t.target.unwrap(), t.text));
    }

    #[test]
    fn tree_link_uses_target_name_by_default() {
        let f = fixture();
        let links = LinkResolver::new(&f.project, plain());
        let resolved = links.resolve_link_tag(f.draw, &InlineTag::link("Widget"));
        assert_eq!(target_and_text(resolved), Some((LinkTarget::Entity(f.widget), "Widget".to_string())));

        let resolved = links.resolve_link_tag(f.draw, &InlineTag::link("  Widget#draw"));
        assert_eq!(target_and_text(resolved), Some((LinkTarget::Entity(f.draw), "draw".to_string())));
    }

    #[test]
    fn tree_link_preserves_reference_text() {
        let f = fixture();
        let links = LinkResolver::new(&f.project, preserving());
        let resolved = links.resolve_link_tag(f.draw, &InlineTag::link(" Widget#draw"));
        assert_eq!(target_and_text(resolved), Some((LinkTarget::Entity(f.draw), "Widget#draw".to_string())));
    }

    #[test]
    fn explicit_display_text_overrides_default() {
        let f = fixture();
        let links = LinkResolver::new(&f.project, plain());
        let piped = links.resolve_link_tag(f.draw, &InlineTag::link("Widget#draw | the draw method "));
        assert_eq!(piped.map(|t| return t.text), Some("the draw method".to_string()));

        let spaced = links.resolve_link_tag(f.draw, &InlineTag::link("Widget#draw drawing"));
        assert_eq!(spaced.map(|t| return t.text), Some("drawing".to_string()));

        let empty_pipe = links.resolve_link_tag(f.draw, &InlineTag::link("Widget#draw |"));
        assert_eq!(empty_pipe.map(|t| return t.text), Some("draw".to_string()));
    }

    #[test]
    fn known_target_wins_over_parsing() {
        let f = fixture();
        let tag = InlineTag {
            known_target: Some("sym:Widget".to_string()),
            ..InlineTag::link("draw")
        };

        let links = LinkResolver::new(&f.project, plain());
        let resolved = links.resolve_link_tag(f.draw, &tag);
        assert_eq!(target_and_text(resolved), Some((LinkTarget::Entity(f.widget), "Widget".to_string())));

        let preserved = LinkResolver::new(&f.project, preserving()).resolve_link_tag(f.draw, &tag);
        assert_eq!(preserved.map(|t| return t.text), Some("draw".to_string()));

        let literal = InlineTag {
            link_text: Some("the widget".to_string()),
            ..tag
        };
        let resolved = links.resolve_link_tag(f.draw, &literal);
        assert_eq!(resolved.map(|t| return t.text), Some("the widget".to_string()));
    }

    #[test]
    fn unknown_known_target_falls_back_to_parsing() {
        let f = fixture();
        let tag = InlineTag {
            known_target: Some("sym:Missing".to_string()),
            ..InlineTag::link("Widget")
        };
        let resolved = LinkResolver::new(&f.project, plain()).resolve_link_tag(f.draw, &tag);
        assert_eq!(resolved.and_then(|t| return t.target), Some(LinkTarget::Entity(f.widget)));
    }

    #[test]
    fn external_resolver_handles_misses() {
        let f = fixture();
        let links = LinkResolver::new(&f.project, plain()).with_fn(|reference, _origin, _tag, _known| {
            let reference = reference?;
            if reference.module_source.as_deref() != Some("react") {
                return None;
            }
            return Some(ExternalLink::Captioned {
                caption: Some("React docs".to_string()),
                target: format!("https://react.dev/{}", reference.dotted_path()),
            });
        });

        let resolved = links.resolve_link_tag(f.draw, &InlineTag::link("react!useState"));
        assert_eq!(
            target_and_text(resolved),
            Some((LinkTarget::Url("https://react.dev/useState".to_string()), "React docs".to_string()))
        );
        assert_eq!(links.resolve_link_tag(f.draw, &InlineTag::link("vue!ref")), None);
    }

    #[test]
    fn external_url_display_defaults_to_consumed_text() {
        let f = fixture();
        let links = LinkResolver::new(&f.project, preserving()).with_fn(|reference, _origin, _tag, _known| {
            if reference?.resolution_start != ResolutionStart::Global {
                return None;
            }
            return Some(ExternalLink::Url("https://example.com".to_string()));
        });
        let resolved = links.resolve_link_tag(f.draw, &InlineTag::link(" !Promise"));
        assert_eq!(
            target_and_text(resolved),
            Some((LinkTarget::Url("https://example.com".to_string()), "!Promise".to_string()))
        );

        let plain_links = LinkResolver::new(&f.project, plain())
            .with_fn(|_, _, _, _| return Some(ExternalLink::Url("https://example.com".to_string())));
        let resolved = plain_links.resolve_link_tag(f.draw, &InlineTag::link("!Promise"));
        assert_eq!(resolved.map(|t| return t.text), Some("!Promise".to_string()));
    }

    #[test]
    fn external_resolver_sees_text_that_does_not_parse() {
        let f = fixture();
        let links = LinkResolver::new(&f.project, preserving()).with_fn(|reference, _origin, _tag, known| {
            if reference.is_some() {
                return None;
            }
            return Some(ExternalLink::Url(format!("https://ext/{}", known?)));
        });
        let tag = InlineTag {
            known_target: Some("ext:sym".to_string()),
            ..InlineTag::link("@scope/pkg")
        };

        let resolved = links.resolve_link_tag(f.draw, &tag);
        assert_eq!(
            target_and_text(resolved),
            Some((LinkTarget::Url("https://ext/ext:sym".to_string()), "@scope/pkg".to_string()))
        );
        assert_eq!(links.resolve_link_tag(f.draw, &InlineTag::link("@scope/pkg")), None);
    }

    #[test]
    fn first_external_answer_wins() {
        let f = fixture();
        let links = LinkResolver::new(&f.project, plain())
            .with_fn(|_, _, _, _| return Some(ExternalLink::Url("https://first".to_string())))
            .with_fn(|_, _, _, _| return Some(ExternalLink::Url("https://second".to_string())));
        let resolved = links.resolve_link_tag(f.draw, &InlineTag::link("Missing"));
        assert_eq!(resolved.and_then(|t| return t.target), Some(LinkTarget::Url("https://first".to_string())));
    }

    #[test]
    fn tree_beats_external() {
        let f = fixture();
        let links = LinkResolver::new(&f.project, plain())
            .with_fn(|_, _, _, _| return Some(ExternalLink::Url("https://external".to_string())));
        let resolved = links.resolve_link_tag(f.draw, &InlineTag::link("Widget"));
        assert_eq!(resolved.and_then(|t| return t.target), Some(LinkTarget::Entity(f.widget)));
    }

    #[test]
    fn configured_mappings_resolve_external_symbols() {
        let f = fixture();
        let config = Config::parse(
            r#"
preserve_link_text = false
[external_symbol_link_mappings.typescript]
Promise = "https://example.com/promise"
"#,
        )
        .unwrap();
        let links = LinkResolver::from_config(&f.project, &config);
        let resolved = links.resolve_link_tag(f.draw, &InlineTag::link("typescript!Promise"));
        assert_eq!(
            target_and_text(resolved),
            Some((LinkTarget::Url("https://example.com/promise".to_string()), "typescript!Promise".to_string()))
        );
    }

    #[test]
    fn bare_urls_link_to_themselves() {
        let f = fixture();
        let links = LinkResolver::new(&f.project, plain());

        let resolved = links.resolve_link_tag(f.draw, &InlineTag::link("https://example.com/docs the docs"));
        assert_eq!(
            target_and_text(resolved),
            Some((LinkTarget::Url("https://example.com/docs".to_string()), "the docs".to_string()))
        );

        let resolved = links.resolve_link_tag(f.draw, &InlineTag::link("ftp://files.example.com"));
        assert_eq!(
            target_and_text(resolved),
            Some((
                LinkTarget::Url("ftp://files.example.com".to_string()),
                "ftp://files.example.com".to_string()
            ))
        );

        assert_eq!(links.resolve_link_tag(f.draw, &InlineTag::link("mailto:someone")), None);
    }

    #[test]
    fn unresolved_tags_are_left_unchanged_and_reported() {
        let f = fixture();
        let links = LinkResolver::new(&f.project, plain());
        let parts = vec![
            DisplayPart::text("See "),
            DisplayPart::InlineTag(InlineTag::link("Nope")),
            DisplayPart::InlineTag(InlineTag {
                tag: "@inheritDoc".to_string(),
                text: "Widget".to_string(),
                ..InlineTag::default()
            }),
        ];

        let mut report = LinkReport::default();
        let rewritten = links.rewrite_parts(f.draw, &parts, &mut report);
        assert_eq!(rewritten, parts);
        assert_eq!(report.resolved, 0);
        assert_eq!(
            report.unresolved,
            vec![UnresolvedLink {
                origin: f.draw,
                origin_name: "lib.Widget.draw".to_string(),
                tag: "@link".to_string(),
                text: "Nope".to_string(),
            }]
        );
    }

    #[test]
    fn linkcode_and_linkplain_are_resolved() {
        let f = fixture();
        let links = LinkResolver::new(&f.project, plain());
        for name in ["@linkcode", "@linkplain"] {
            let tag = InlineTag {
                tag: name.to_string(),
                ..InlineTag::link("Widget")
            };
            let parts = links.resolve_parts(f.draw, &[DisplayPart::InlineTag(tag)]);
            let Some(DisplayPart::InlineTag(resolved)) = parts.first() else {
                panic!("expected inline tag");
            };
            assert_eq!(resolved.tag, name);
            assert_eq!(resolved.target, Some(LinkTarget::Entity(f.widget)));
        }
    }

    #[test]
    fn project_pass_rewrites_comments_block_tags_and_documents() {
        let mut f = fixture();
        let comment = Comment {
            block_tags: vec![BlockTag {
                content: vec![DisplayPart::InlineTag(InlineTag::link("Widget#draw"))],
                tag: "@see".to_string(),
            }],
            label: None,
            summary: vec![
                DisplayPart::text("Draws a "),
                DisplayPart::InlineTag(InlineTag::link("Widget")),
                DisplayPart::InlineTag(InlineTag::link("Broken")),
            ],
        };
        f.project.set_comment(f.draw_signature, comment).unwrap();
        let root = f.project.root();
        f.project
            .add_document(root, Document {
                content: vec![DisplayPart::InlineTag(InlineTag::link("lib.Widget"))],
                name: "README".to_string(),
            })
            .unwrap();

        let report = LinkResolver::new(&f.project, plain()).resolve_project();
        assert_eq!(report.resolved, 3);
        assert_eq!(report.unresolved.len(), 1);
        assert_eq!(report.unresolved.first().map(|u| return u.text.as_str()), Some("Broken"));

        f.project.apply_links(report);

        let comment = f.project.get(f.draw_signature).and_then(|e| return e.comment.clone()).unwrap();
        assert_eq!(
            comment.summary.get(1),
            Some(&DisplayPart::InlineTag(InlineTag {
                target: Some(LinkTarget::Entity(f.widget)),
                ..InlineTag::link("Widget")
            }))
        );
        let see = comment.block_tags.first().and_then(|b| return b.content.first()).unwrap();
        assert_eq!(
            see,
            &DisplayPart::InlineTag(InlineTag {
                target: Some(LinkTarget::Entity(f.draw)),
                ..InlineTag::link("draw")
            })
        );

        let readme = f.project.get(root).and_then(|e| return e.documents.first().cloned()).unwrap();
        assert_eq!(
            readme.content.first(),
            Some(&DisplayPart::InlineTag(InlineTag {
                target: Some(LinkTarget::Entity(f.widget)),
                ..InlineTag::link("Widget")
            }))
        );
    }

    #[test]
    fn single_comment_is_rewritten_without_touching_the_project() {
        let f = fixture();
        let links = LinkResolver::new(&f.project, plain());
        let comment = Comment::with_summary(vec![
            DisplayPart::InlineTag(InlineTag::link("Widget")),
            DisplayPart::InlineTag(InlineTag::link("Nope")),
        ]);

        let rewritten = links.resolve_comment(f.draw, &comment);
        assert_eq!(
            rewritten.summary,
            vec![
                DisplayPart::InlineTag(InlineTag {
                    target: Some(LinkTarget::Entity(f.widget)),
                    ..InlineTag::link("Widget")
                }),
                DisplayPart::InlineTag(InlineTag::link("Nope")),
            ]
        );
        assert!(f.project.get(f.draw).is_some_and(|e| return e.comment.is_none()));
    }

    #[test]
    fn display_origin_names_the_root() {
        assert_eq!(display_origin(""), "the project");
        assert_eq!(display_origin("lib.Widget"), "lib.Widget");
    }
}
