//! Markdown rendering of errors and unresolved links for the CLI.

use std::fmt::Write as _;

use crate::error::Error;
use crate::links::{UnresolvedLink, display_origin};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Print markdown to stderr with bold headings.
fn print_markdown(md: &str) {
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    print_markdown(&render_error(e));
}

/// Render unresolved links as one markdown block and print to stderr.
pub fn print_unresolved(links: &[UnresolvedLink]) {
    if links.is_empty() {
        return;
    }
    print_markdown(&render_unresolved(links));
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is one,
/// how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::ConfigNotFound { path } => format!(
            "\
# Error: Config Not Found

`{}` does not exist.

## Fix

Pass an existing file to `--config`, or omit it to use `.doclink.toml` next to the project.
",
            path.display()
        ),
        Error::EntityNotFound { name } => render_entity_not_found(name),
        Error::InvalidReference { text } => render_invalid_reference(text),
        Error::Io(e) => format!(
            "\
# Error: I/O

{e}
"
        ),
        Error::Json(e) => format!(
            "\
# Error: Invalid Project JSON

{e}
"
        ),
        Error::ProjectCorrupt { reason } => format!(
            "\
# Error: Project Corrupt

{reason}

## Fix

Regenerate the project JSON from its source.
"
        ),
        Error::ProjectNotFound { path } => format!(
            "\
# Error: Project Not Found

`{}` does not exist.

## Fix

Point `--project` at the JSON file describing the documentation tree.
",
            path.display()
        ),
        Error::TomlDe(e) => format!(
            "\
# Error: Invalid TOML

{e}
"
        ),
        Error::UnknownSymbol { id } => format!(
            "\
# Error: Unknown Symbol

A reference entity points at symbol `{id}`, but no entity registers that id.

## Fix

Add `\"id\": \"{id}\"` to the target entity, or remove the reference.
"
        ),
    };
}

fn render_entity_not_found(name: &str) -> String {
    return format!(
        "\
# Error: Entity Not Found

No entity has the full name `{name}`.

## Fix

Full names join entity names below the project with `.`, for example `lib.Widget.draw`.
Use an empty name for the project itself.
"
    );
}

fn render_invalid_reference(text: &str) -> String {
    return format!(
        "\
# Error: Invalid Reference

`{text}` is not a declaration reference.

## Forms

    Name.export#member~local
    module!Name
    !GlobalName
    Name:class
    Name:(1)
"
    );
}

/// Render unresolved links grouped under one heading, one bullet per link.
pub fn render_unresolved(links: &[UnresolvedLink]) -> String {
    let mut out = String::from("# Warning: Unresolved Links\n\n");
    for link in links {
        let _ = writeln!(
            out,
            "- Failed to resolve link to `{}` in comment for {}",
            link.text.trim(),
            display_origin(&link.origin_name)
        );
    }
    out.push_str(
        "\
\n## Fix

Check the spelling of each reference, qualify it with its parent (`Parent.name`),
or map external symbols under `[external_symbol_link_mappings]` in `.doclink.toml`.
",
    );
    return out;
}
