//! JS Declaration Merger
//!
//! Merges the script of a base component with the script of the component
//! that extends it. Top-level variables, exported bindings (component props)
//! and function declarations are deduplicated by name: the extended
//! declaration replaces the base one in the base one's position. Imports of
//! the extended script are hoisted above the base code.
//!
//! Each fragment is parsed on its own and split into top-level chunks: the
//! source text of one statement together with the comments that belong to it.
//! Splicing happens on those chunk lists, by index, so a statement always
//! travels with its own comments.

use oxc_allocator::Allocator;
use oxc_ast::ast::{BindingPattern, Declaration, Statement, VariableDeclaration};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use std::collections::HashMap;

use crate::error::{ExtendError, Result};

/// Declaration kinds deduplicated by name, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclarationKind {
    /// `export let name = ...`
    Binding,
    /// `let|const|var name = ...`
    Variable,
    /// `function name() {}`
    Function,
}

const DECLARATION_KINDS: [DeclarationKind; 3] = [
    DeclarationKind::Binding,
    DeclarationKind::Variable,
    DeclarationKind::Function,
];

/// One top-level statement of a fragment, comments included.
#[derive(Debug, Clone, PartialEq)]
struct Chunk<'s> {
    text: &'s str,
    import: bool,
    declaration: Option<(DeclarationKind, String)>,
}

impl Chunk<'_> {
    fn declared_name(&self, kind: DeclarationKind) -> Option<&str> {
        match &self.declaration {
            Some((declared, name)) if *declared == kind => Some(name),
            _ => None,
        }
    }
}

/// Source type for a script block given its `lang` attribute.
pub fn source_type_for_lang(lang: Option<&str>) -> SourceType {
    let source_type = SourceType::default().with_module(true);
    match lang {
        Some(lang)
            if lang.eq_ignore_ascii_case("ts") || lang.eq_ignore_ascii_case("typescript") =>
        {
            source_type.with_typescript(true)
        }
        _ => source_type,
    }
}

/// Merges two JavaScript module fragments.
pub fn merge_code(base: &str, extended: &str) -> Result<String> {
    merge_code_with(base, extended, source_type_for_lang(None))
}

pub fn merge_code_with(base: &str, extended: &str, source_type: SourceType) -> Result<String> {
    let mut base_chunks = split_fragment(base, source_type, "base")?;
    let mut extended_chunks = split_fragment(extended, source_type, "extended")?;

    hoist_imports(&mut base_chunks, &mut extended_chunks);
    for kind in DECLARATION_KINDS {
        replace_declarations(&mut base_chunks, &mut extended_chunks, kind);
    }

    Ok(format!("{}\n{}", join_chunks(&base_chunks), join_chunks(&extended_chunks)))
}

fn join_chunks(chunks: &[Chunk]) -> String {
    chunks.iter().map(|chunk| chunk.text).collect::<Vec<_>>().join("\n")
}

/// Parses a fragment and cuts it into top-level chunks.
///
/// A chunk starts at the first comment after the previous chunk and ends after
/// the comments that follow its statement on the same line. Comments after the
/// last statement form a chunk of their own.
fn split_fragment<'s>(
    source: &'s str,
    source_type: SourceType,
    fragment: &'static str,
) -> Result<Vec<Chunk<'s>>> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ExtendError::ScriptSyntax { fragment, message });
    }

    let program = ret.program;
    let comments: Vec<(usize, usize)> = program
        .comments
        .iter()
        .map(|comment| comment_range(source, comment.span))
        .collect();

    let statements = program
        .directives
        .iter()
        .map(|directive| (directive.span, false, None))
        .chain(program.body.iter().map(|stmt| {
            (stmt.span(), is_import(stmt), declaration_of(stmt))
        }));

    let mut chunks = Vec::new();
    let mut cursor = 0;
    for (span, import, declaration) in statements {
        let (stmt_start, stmt_end) = (span.start as usize, span.end as usize);
        let start = comments
            .iter()
            .find(|(start, end)| *start >= cursor && *end <= stmt_start)
            .map_or(stmt_start, |(start, _)| *start);

        let mut end = stmt_end;
        for &(comment_start, comment_end) in &comments {
            if comment_start < end {
                continue;
            }
            if !source[end..comment_start].trim_matches([' ', '\t']).is_empty() {
                break;
            }
            end = comment_end;
        }

        chunks.push(Chunk {
            text: &source[start..end],
            import,
            declaration,
        });
        cursor = end;
    }

    let dangling: Vec<&(usize, usize)> =
        comments.iter().filter(|(start, _)| *start >= cursor).collect();
    if let (Some(first), Some(last)) = (dangling.first(), dangling.last()) {
        chunks.push(Chunk {
            text: &source[first.0..last.1],
            import: false,
            declaration: None,
        });
    }

    Ok(chunks)
}

/// Byte range of a comment in its source, delimiters included.
fn comment_range(source: &str, span: Span) -> (usize, usize) {
    let (mut start, mut end) = (span.start as usize, span.end as usize);
    let before = &source[..start];
    if before.ends_with("/*") || before.ends_with("//") {
        start -= 2;
    }
    if source[end..].starts_with("*/") {
        end += 2;
    }
    (start, end)
}

/// Moves the extended imports in front of the first non-import statement of
/// the base, keeping their relative order. Nothing moves when the base is
/// empty or holds only imports.
fn hoist_imports<'s>(base: &mut Vec<Chunk<'s>>, extended: &mut Vec<Chunk<'s>>) {
    let Some(anchor) = base.iter().position(|chunk| !chunk.import) else {
        return;
    };
    let (imports, rest): (Vec<_>, Vec<_>) =
        std::mem::take(extended).into_iter().partition(|chunk| chunk.import);
    *extended = rest;
    base.splice(anchor..anchor, imports);
}

fn is_import(stmt: &Statement) -> bool {
    matches!(stmt, Statement::ImportDeclaration(_))
}

/// Replaces base declarations of `kind` with same-named extended ones.
///
/// When a name repeats, the last declaration on each side is the one matched.
/// Unmatched extended declarations stay where they are.
fn replace_declarations<'s>(
    base: &mut [Chunk<'s>],
    extended: &mut Vec<Chunk<'s>>,
    kind: DeclarationKind,
) {
    let base_by_name: HashMap<&str, usize> = base
        .iter()
        .enumerate()
        .filter_map(|(index, chunk)| chunk.declared_name(kind).map(|name| (name, index)))
        .collect();

    let mut overrides: HashMap<usize, usize> = HashMap::new();
    for (index, chunk) in extended.iter().enumerate() {
        if let Some(base_index) = chunk.declared_name(kind).and_then(|name| base_by_name.get(name))
        {
            overrides.insert(*base_index, index);
        }
    }
    if overrides.is_empty() {
        return;
    }

    let mut slots: Vec<Option<Chunk<'s>>> =
        std::mem::take(extended).into_iter().map(Some).collect();
    for (base_index, extended_index) in overrides {
        if let Some(chunk) = slots.get_mut(extended_index).and_then(Option::take) {
            base[base_index] = chunk;
        }
    }
    *extended = slots.into_iter().flatten().collect();
}

fn declaration_of(stmt: &Statement) -> Option<(DeclarationKind, String)> {
    match stmt {
        Statement::ExportNamedDeclaration(export) => match &export.declaration {
            Some(Declaration::VariableDeclaration(decl)) => {
                first_declarator_name(decl).map(|name| (DeclarationKind::Binding, name))
            }
            _ => None,
        },
        Statement::VariableDeclaration(decl) => {
            first_declarator_name(decl).map(|name| (DeclarationKind::Variable, name))
        }
        Statement::FunctionDeclaration(func) => func
            .id
            .as_ref()
            .map(|id| (DeclarationKind::Function, id.name.to_string())),
        _ => None,
    }
}

/// Name of a declaration, taken from its first declarator.
fn first_declarator_name(decl: &VariableDeclaration) -> Option<String> {
    match &decl.declarations.first()?.id {
        BindingPattern::BindingIdentifier(id) => Some(id.name.to_string()),
        _ => None,
    }
}
