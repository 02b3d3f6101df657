//! Top-level declaration discovery from AST
//!
//! Global invariants enforced:
//! - Only module-level items are inspected, never nested functions
//! - Output follows source order
//!
//! Recognized function forms:
//! - `function f() {}` and `async function f() {}`
//! - `export function f() {}`
//! - `export default function f() {}` and `export default function () {}`
//! - Overload signatures and `declare function` (discovered without a body)
//! - `function*` generators (discovered, never converted)

use crate::ast::{FunctionDeclarationView, TopLevelDecl};
use crate::span::{span_in_file, SourceSpan};
use anyhow::Result;
use swc_common::{SourceMap, Span, Spanned};
use swc_ecma_ast::*;

/// Map every top-level item of a module to a [`TopLevelDecl`]
///
/// `src` must be the exact text the module was parsed from.
pub fn discover_declarations(
    module: &Module,
    src: &str,
    source_map: &SourceMap,
) -> Result<Vec<TopLevelDecl>> {
    let extractor = Extractor { src, source_map };

    // Module items are already in source order
    module
        .body
        .iter()
        .map(|item| extractor.top_level(item))
        .collect()
}

struct Extractor<'a> {
    src: &'a str,
    source_map: &'a SourceMap,
}

impl Extractor<'_> {
    fn top_level(&self, item: &ModuleItem) -> Result<TopLevelDecl> {
        match item {
            ModuleItem::Stmt(Stmt::Decl(Decl::Fn(decl))) => {
                let mut modifiers = Vec::new();
                if decl.declare {
                    modifiers.push("declare".to_string());
                }
                self.function(
                    decl.function.span,
                    Some(&decl.ident),
                    &decl.function,
                    modifiers,
                )
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
                Decl::Fn(decl) => {
                    let mut modifiers = vec!["export".to_string()];
                    if decl.declare {
                        modifiers.push("declare".to_string());
                    }
                    self.function(export.span, Some(&decl.ident), &decl.function, modifiers)
                }
                _ => Ok(TopLevelDecl::Other),
            },
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => match &export.decl {
                DefaultDecl::Fn(expr) => self.function(
                    export.span,
                    expr.ident.as_ref(),
                    &expr.function,
                    vec!["export".to_string(), "default".to_string()],
                ),
                _ => Ok(TopLevelDecl::Other),
            },
            _ => Ok(TopLevelDecl::Other),
        }
    }

    /// Build the view for one function; `outer` is the span the rewrite replaces
    ///
    /// Only the parameter, type and body fragments are kept. Comments between
    /// them (inside the parameter list or before the body) are not carried over.
    fn function(
        &self,
        outer: Span,
        ident: Option<&Ident>,
        function: &Function,
        mut modifiers: Vec<String>,
    ) -> Result<TopLevelDecl> {
        let span = span_in_file(outer, self.source_map);
        let name = ident.map(|id| id.sym.to_string());

        if function.is_generator {
            return Ok(TopLevelDecl::Generator { span, name });
        }

        if function.is_async {
            modifiers.push("async".to_string());
        }

        let parameters = function
            .params
            .iter()
            .map(|param| self.fragment(param.span))
            .collect::<Result<Vec<_>>>()?;

        let body = function
            .body
            .as_ref()
            .map(|body| self.fragment(body.span))
            .transpose()?;

        let type_parameters = function
            .type_params
            .as_ref()
            .map(|params| self.fragment(params.span))
            .transpose()?;

        // Inner type span, so the colon is never part of the stored text
        let return_type = function
            .return_type
            .as_ref()
            .map(|ann| self.fragment(ann.type_ann.span()))
            .transpose()?;

        Ok(TopLevelDecl::Function {
            span,
            view: FunctionDeclarationView {
                name,
                parameters,
                body,
                is_async: function.is_async,
                type_parameters,
                return_type,
                modifiers,
            },
        })
    }

    fn fragment(&self, span: Span) -> Result<String> {
        let file_span: SourceSpan = span_in_file(span, self.source_map);
        file_span
            .text(self.src)
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "span {}..{} is outside the source text",
                    file_span.start,
                    file_span.end
                )
            })
    }
}
