//! AST adapter layer for top-level declarations
//!
//! Global invariants enforced:
//! - Deterministic order by span start
//! - Source fragments are verbatim slices of the original file text

use crate::span::SourceSpan;

/// Read-only projection of a source-level function declaration
///
/// Every text field is copied verbatim from the source file. Nothing here is
/// re-serialized from the AST.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionDeclarationView {
    /// Identifier, absent for `export default function () {}`
    pub name: Option<String>,
    /// Parameter fragments in declaration order, including annotations and defaults
    pub parameters: Vec<String>,
    /// Block body including braces; absent for overload signatures and `declare`
    pub body: Option<String>,
    pub is_async: bool,
    /// Generic parameter list including the angle brackets, e.g. `<T>`
    pub type_parameters: Option<String>,
    /// Return type annotation without the leading colon
    pub return_type: Option<String>,
    /// Modifier keywords as written, e.g. `["export", "default"]`
    pub modifiers: Vec<String>,
}

impl FunctionDeclarationView {
    pub fn has_modifier(&self, keyword: &str) -> bool {
        self.modifiers.iter().any(|m| m == keyword)
    }
}

/// A module-level item, classified once during discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopLevelDecl {
    /// A function declaration the classifier can decide on
    Function {
        span: SourceSpan,
        view: FunctionDeclarationView,
    },
    /// A `function*` declaration; arrow functions cannot be generators
    Generator {
        span: SourceSpan,
        name: Option<String>,
    },
    /// Anything else (imports, classes, variables, types, ...)
    Other,
}

impl TopLevelDecl {
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            TopLevelDecl::Function { span, .. } | TopLevelDecl::Generator { span, .. } => {
                Some(*span)
            }
            TopLevelDecl::Other => None,
        }
    }
}
