//! Source rewriting - ties together parsing, discovery, and classification
//!
//! Global invariants enforced:
//! - Only the spans of converted declarations change; all other bytes are kept
//! - Edits are applied back-to-front so earlier offsets stay valid
//! - A leading byte-order mark is kept but never part of span arithmetic

use crate::ast::TopLevelDecl;
use crate::classify::{classify_with, Classification, ClassifyOptions, SkipReason};
use crate::discover;
use crate::parser::{self, ParseOptions};
use crate::report::{self, DeclarationEvent};
use crate::span::SourceSpan;
use anyhow::{bail, Result};

const BOM: char = '\u{feff}';
use swc_common::{sync::Lrc, SourceMap};

/// Replace `span` of the original text with `text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: SourceSpan,
    pub text: String,
}

/// Result of converting one file's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConversion {
    pub events: Vec<DeclarationEvent>,
    /// Rewritten text, `None` when nothing converted
    pub output: Option<String>,
}

/// Convert every eligible top-level function declaration in `src`
///
/// Pure with respect to the file system; `filename` only picks the syntax
/// and labels errors.
pub fn convert_source(
    src: &str,
    filename: &str,
    source_map: &Lrc<SourceMap>,
    options: ParseOptions,
) -> Result<SourceConversion> {
    // SWC drops a BOM from its source files; spans are relative to the text after it
    let (has_bom, src) = match src.strip_prefix(BOM) {
        Some(rest) => (true, rest),
        None => (false, src),
    };

    let module = parser::parse_source(src, source_map, filename, options)?;
    let declarations = discover::discover_declarations(&module, src, source_map)?;
    let classify_options = ClassifyOptions {
        jsx: parser::allows_jsx(filename, options),
    };

    let mut events = Vec::new();
    let mut edits = Vec::new();

    for decl in declarations {
        let (span, name, classification) = match decl {
            TopLevelDecl::Function { span, view } => {
                let classification = classify_with(&view, classify_options);
                (span, view.name, classification)
            }
            TopLevelDecl::Generator { span, name } => {
                (span, name, Classification::Ineligible(SkipReason::Generator))
            }
            TopLevelDecl::Other => continue,
        };

        match classification {
            Classification::Convert(result) => {
                events.push(DeclarationEvent::Converted {
                    name,
                    kind: result.kind,
                    line: span.start_line,
                    replacement: result.replacement_text.clone(),
                });
                edits.push(Edit {
                    span,
                    text: result.replacement_text,
                });
            }
            Classification::Ineligible(reason) => {
                let original = span.text(src).unwrap_or_default();
                events.push(DeclarationEvent::Skipped {
                    reason,
                    line: span.start_line,
                    snippet: report::snippet(original, report::SNIPPET_CHARS),
                });
            }
        }
    }

    log::debug!(
        "{}: {} declaration(s) to convert, {} skipped",
        filename,
        edits.len(),
        events.len() - edits.len()
    );

    let output = if edits.is_empty() {
        None
    } else {
        let mut output = String::with_capacity(src.len() + BOM.len_utf8());
        if has_bom {
            output.push(BOM);
        }
        output.push_str(&apply_edits(src, edits)?);
        Some(output)
    };

    Ok(SourceConversion { events, output })
}

/// Apply non-overlapping edits to `src`
pub fn apply_edits(src: &str, mut edits: Vec<Edit>) -> Result<String> {
    edits.sort_by_key(|edit| edit.span.start);

    for pair in edits.windows(2) {
        if pair[0].span.end > pair[1].span.start {
            bail!(
                "overlapping edits at bytes {}..{} and {}..{}",
                pair[0].span.start,
                pair[0].span.end,
                pair[1].span.start,
                pair[1].span.end
            );
        }
    }

    let mut out = src.to_string();
    for edit in edits.iter().rev() {
        if edit.span.text(&out).is_none() {
            bail!(
                "edit {}..{} is outside the source text",
                edit.span.start,
                edit.span.end
            );
        }
        out.replace_range(edit.span.start..edit.span.end, &edit.text);
    }

    Ok(out)
}

#[cfg(test)]
#[path = "rewrite/tests.rs"]
mod tests;
