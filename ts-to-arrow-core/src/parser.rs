//! TypeScript and JavaScript parser using SWC
//!
//! Global invariants enforced:
//! - Deterministic parsing order
//! - Parsing never mutates the source text

use anyhow::Result;
use swc_common::{sync::Lrc, FileName, SourceFile, SourceMap};
use swc_ecma_ast::{EsVersion, Module};
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax};

/// Parser switches derived from the project's `compilerOptions`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// `experimentalDecorators`
    pub decorators: bool,
    /// `jsx` is set, so plain `.js` files may contain JSX
    pub jsx_in_js: bool,
}

/// Determine the appropriate syntax configuration based on file extension
fn syntax_for_file(filename: &str, options: ParseOptions) -> Syntax {
    if filename.ends_with(".tsx") {
        Syntax::Typescript(swc_ecma_parser::TsSyntax {
            tsx: true,
            decorators: options.decorators,
            dts: false,
            ..Default::default()
        })
    } else if filename.ends_with(".ts") || filename.ends_with(".mts") || filename.ends_with(".cts") {
        Syntax::Typescript(swc_ecma_parser::TsSyntax {
            tsx: false,
            decorators: options.decorators,
            dts: filename.ends_with(".d.ts"),
            ..Default::default()
        })
    } else if filename.ends_with(".jsx") {
        Syntax::Es(swc_ecma_parser::EsSyntax {
            jsx: true,
            decorators: options.decorators,
            ..Default::default()
        })
    } else {
        // .js, .mjs, .cjs
        Syntax::Es(swc_ecma_parser::EsSyntax {
            jsx: options.jsx_in_js,
            decorators: options.decorators,
            ..Default::default()
        })
    }
}

/// Whether `filename` is parsed with JSX enabled
pub fn allows_jsx(filename: &str, options: ParseOptions) -> bool {
    syntax_for_file(filename, options).jsx()
}

/// Parse TypeScript, JavaScript, JSX, or TSX source code into an AST module
///
/// The file type is picked from the extension:
/// - `.ts`, `.mts`, `.cts` - TypeScript
/// - `.tsx` - TypeScript with JSX
/// - `.js`, `.mjs`, `.cjs` - JavaScript (JSX when `jsx_in_js` is set)
/// - `.jsx` - JavaScript with JSX
///
/// Returns an error if parse errors occur.
pub fn parse_source(
    src: &str,
    source_map: &Lrc<SourceMap>,
    filename: &str,
    options: ParseOptions,
) -> Result<Module> {
    let syntax = syntax_for_file(filename, options);

    let source_file: Lrc<SourceFile> = source_map.new_source_file(
        FileName::Custom(filename.into()).into(),
        src.to_string(),
    );

    let input = StringInput::from(&*source_file);

    let lexer = Lexer::new(syntax, EsVersion::Es2022, input, None);

    let mut parser = Parser::new_from(lexer);

    let module = parser.parse_module().map_err(|e| parse_error(&e, filename))?;

    // Recovered errors still leave holes in the AST; rewriting around them is unsafe
    if let Some(e) = parser.take_errors().first() {
        return Err(parse_error(e, filename));
    }

    Ok(module)
}

fn parse_error(e: &swc_ecma_parser::error::Error, filename: &str) -> anyhow::Error {
    let error_msg = e.kind().msg();
    anyhow::anyhow!("Parse error: {}", error_msg)
        .context(format!("Failed to parse source file: {}", filename))
}

#[cfg(test)]
#[path = "parser/tests.rs"]
mod tests;
