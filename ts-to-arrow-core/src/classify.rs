//! Classification and emission of arrow-function replacements
//!
//! Global invariants enforced:
//! - Pure: no I/O, no clocks, no randomness
//! - Identical input yields byte-for-byte identical output
//! - Parameter, body, and type text is concatenated verbatim, never re-parsed
//!
//! The conversion kind depends only on whether a name is present and on the
//! `export` / `default` modifiers. Every other field affects only the text.

use crate::ast::FunctionDeclarationView;
use std::borrow::Cow;

/// Which of the three replacement shapes was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionKind {
    /// `[export ]const f = (...) => {...}`
    RegularExport,
    /// `const f = (...) => {...};` followed by `export default f;`
    NamedDefaultExport,
    /// `export default (...) => {...}`
    AnonymousDefaultExport,
}

impl ConversionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionKind::RegularExport => "regular",
            ConversionKind::NamedDefaultExport => "named-default",
            ConversionKind::AnonymousDefaultExport => "anonymous-default",
        }
    }
}

/// Why a function declaration was left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Overload signature or ambient `declare function`
    NoBody,
    /// Anonymous function that is not the module's default export
    AnonymousNonDefault,
    /// `function*`; arrow functions cannot yield
    Generator,
}

impl SkipReason {
    pub fn description(&self) -> &'static str {
        match self {
            SkipReason::NoBody => "no body",
            SkipReason::AnonymousNonDefault => "anonymous, not default export",
            SkipReason::Generator => "generator",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub replacement_text: String,
    pub kind: ConversionKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Convert(ConversionResult),
    Ineligible(SkipReason),
}

impl Classification {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Classification::Convert(_))
    }
}

/// Syntax facts about the file the declaration came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// The file is parsed with JSX, so `<T>(` would open an element
    pub jsx: bool,
}

/// Decide whether a declaration converts, and to what text
pub fn classify(decl: &FunctionDeclarationView) -> Classification {
    classify_with(decl, ClassifyOptions::default())
}

/// [`classify`] for a file with the given syntax
pub fn classify_with(decl: &FunctionDeclarationView, options: ClassifyOptions) -> Classification {
    let Some(body) = decl.body.as_deref() else {
        return Classification::Ineligible(SkipReason::NoBody);
    };

    let is_exported = decl.has_modifier("export");
    let is_default = is_exported && decl.has_modifier("default");

    let arrow = ArrowParts {
        decl,
        body,
        jsx: options.jsx,
    };

    let (replacement_text, kind) = match (decl.name.as_deref(), is_default) {
        (None, false) => return Classification::Ineligible(SkipReason::AnonymousNonDefault),
        (Some(name), true) => (
            format!("const {} = {};\nexport default {};", name, arrow, name),
            ConversionKind::NamedDefaultExport,
        ),
        (None, true) => (
            format!("export default {}", arrow),
            ConversionKind::AnonymousDefaultExport,
        ),
        (Some(name), false) => {
            let export_prefix = if is_exported { "export " } else { "" };
            (
                format!("{}const {} = {}", export_prefix, name, arrow),
                ConversionKind::RegularExport,
            )
        }
    };

    Classification::Convert(ConversionResult {
        replacement_text,
        kind,
    })
}

/// The arrow expression shared by all three shapes:
/// `[async ][<T>](params)[: R] => body`
struct ArrowParts<'a> {
    decl: &'a FunctionDeclarationView,
    body: &'a str,
    jsx: bool,
}

impl std::fmt::Display for ArrowParts<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.decl.is_async {
            f.write_str("async ")?;
        }
        if let Some(type_parameters) = &self.decl.type_parameters {
            if self.jsx {
                f.write_str(&jsx_safe_type_parameters(type_parameters))?;
            } else {
                f.write_str(type_parameters)?;
            }
        }
        write!(f, "({})", self.decl.parameters.join(", "))?;
        if let Some(return_type) = &self.decl.return_type {
            write!(f, ": {}", return_type)?;
        }
        write!(f, " => {}", self.body)
    }
}

/// `<T>` -> `<T,>`
///
/// With JSX enabled a lone type parameter in front of an arrow parses as an
/// element tag. A trailing comma disambiguates; lists with two or more
/// parameters are already unambiguous and are returned unchanged.
pub fn jsx_safe_type_parameters(text: &str) -> Cow<'_, str> {
    let Some(inner) = text.strip_prefix('<').and_then(|t| t.strip_suffix('>')) else {
        return Cow::Borrowed(text);
    };
    if inner.trim().is_empty() || has_top_level_comma(inner) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(format!("<{},>", inner.trim_end()))
}

/// Commas outside nested brackets and string literals
fn has_top_level_comma(text: &str) -> bool {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut prev = '\0';

    for c in text.chars() {
        if let Some(q) = quote {
            if c == q && prev != '\\' {
                quote = None;
            }
            prev = c;
            continue;
        }
        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '<' | '(' | '[' | '{' => depth += 1,
            // `=>` in a function type is not a closing bracket
            '>' if prev != '=' => depth -= 1,
            ')' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => return true,
            _ => {}
        }
        prev = c;
    }

    false
}
