//! Tests for source rewriting

#[cfg(test)]
mod rewrite_tests {
    use crate::classify::{ConversionKind, SkipReason};
    use crate::parser::{self, ParseOptions};
    use crate::report::DeclarationEvent;
    use crate::rewrite::{apply_edits, convert_source, Edit, SourceConversion};
    use crate::span::SourceSpan;
    use swc_common::{sync::Lrc, SourceMap};

    fn convert(src: &str) -> SourceConversion {
        convert_as(src, "test.ts")
    }

    fn convert_as(src: &str, filename: &str) -> SourceConversion {
        let cm: Lrc<SourceMap> = Default::default();
        convert_source(src, filename, &cm, ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_rewrite_mixed_module() {
        let src = r#"import { db } from "./db";

export function add(a: number, b: number): number {
  return a + b;
}

function local(x) { return x; }

export default async function load(id: string) {
  return db.get(id);
}
"#;
        let expected = r#"import { db } from "./db";

export const add = (a: number, b: number): number => {
  return a + b;
}

const local = (x) => { return x; }

const load = async (id: string) => {
  return db.get(id);
};
export default load;
"#;
        let result = convert(src);
        assert_eq!(result.output.as_deref(), Some(expected));
        assert_eq!(result.events.len(), 3);
        assert!(result.events.iter().all(|e| e.is_converted()));
    }

    #[test]
    fn test_rewrite_anonymous_default_export() {
        let src = "export default function (x: number) { return x * 2; }\n";
        let result = convert(src);
        assert_eq!(
            result.output.as_deref(),
            Some("export default (x: number) => { return x * 2; }\n")
        );
        assert!(matches!(
            &result.events[0],
            DeclarationEvent::Converted {
                name: None,
                kind: ConversionKind::AnonymousDefaultExport,
                ..
            }
        ));
    }

    #[test]
    fn test_overloads_skip_signatures_and_convert_implementation() {
        let src = r#"function pick(x: string): string;
function pick(x: number): number;
function pick(x: any) { return x; }
"#;
        let result = convert(src);
        let skipped: Vec<_> = result
            .events
            .iter()
            .filter_map(|e| match e {
                DeclarationEvent::Skipped { reason, line, .. } => Some((*reason, *line)),
                _ => None,
            })
            .collect();
        assert_eq!(skipped, vec![(SkipReason::NoBody, 1), (SkipReason::NoBody, 2)]);

        let output = result.output.unwrap();
        assert!(output.starts_with("function pick(x: string): string;\nfunction pick(x: number): number;\n"));
        assert!(output.ends_with("const pick = (x: any) => { return x; }\n"));
    }

    #[test]
    fn test_nothing_to_convert_yields_no_output() {
        let src = "declare function external(): void;\nconst a = () => 1;\n";
        let result = convert(src);
        assert_eq!(result.output, None);
        assert_eq!(result.events.len(), 1);
        assert!(matches!(
            &result.events[0],
            DeclarationEvent::Skipped { reason: SkipReason::NoBody, snippet, .. }
                if snippet.starts_with("declare function external")
        ));
    }

    #[test]
    fn test_generators_are_skipped() {
        let src = "export function* ids() { yield 1; }\n";
        let result = convert(src);
        assert_eq!(result.output, None);
        assert!(matches!(
            &result.events[0],
            DeclarationEvent::Skipped { reason: SkipReason::Generator, .. }
        ));
    }

    #[test]
    fn test_nested_functions_are_left_alone() {
        let src = "function outer() {\n  function inner() { return 1; }\n  return inner();\n}\n";
        let output = convert(src).output.unwrap();
        assert_eq!(
            output,
            "const outer = () => {\n  function inner() { return 1; }\n  return inner();\n}\n"
        );
    }

    #[test]
    fn test_comments_and_formatting_outside_spans_survive() {
        let src = "// header\n\n/** docs */\nexport function f() {\n    return 1 ;\n}   // trailing\n";
        let output = convert(src).output.unwrap();
        assert_eq!(
            output,
            "// header\n\n/** docs */\nexport const f = () => {\n    return 1 ;\n}   // trailing\n"
        );
    }

    #[test]
    fn test_generic_function_keeps_type_parameters() {
        let src = "export function first<T>(items: T[]): T | undefined { return items[0]; }";
        assert_eq!(
            convert(src).output.as_deref(),
            Some("export const first = <T>(items: T[]): T | undefined => { return items[0]; }")
        );
    }

    #[test]
    fn test_tsx_file() {
        let src = "export function View(props: Props) { return <div>{props.title}</div>; }";
        assert_eq!(
            convert_as(src, "view.tsx").output.as_deref(),
            Some("export const View = (props: Props) => { return <div>{props.title}</div>; }")
        );
    }

    #[test]
    fn test_tsx_generic_output_still_parses() {
        let src = "export function id<T>(x: T): T { return x; }\nexport function pair<A, B>(a: A, b: B) { return [a, b]; }\n";
        let output = convert_as(src, "a.tsx").output.unwrap();
        assert_eq!(
            output,
            "export const id = <T,>(x: T): T => { return x; }\nexport const pair = <A, B>(a: A, b: B) => { return [a, b]; }\n"
        );

        let cm: Lrc<SourceMap> = Default::default();
        assert!(parser::parse_source(&output, &cm, "b.tsx", ParseOptions::default()).is_ok());
    }

    #[test]
    fn test_ts_generic_output_is_unchanged() {
        let src = "export function id<T>(x: T): T { return x; }";
        assert_eq!(
            convert(src).output.as_deref(),
            Some("export const id = <T>(x: T): T => { return x; }")
        );
    }

    #[test]
    fn test_byte_order_mark_is_preserved() {
        let src = "\u{feff}export function add(a: number) { return a; }\n";
        assert_eq!(
            convert_as(src, "a.ts").output.as_deref(),
            Some("\u{feff}export const add = (a: number) => { return a; }\n")
        );
    }

    #[test]
    fn test_byte_order_mark_with_shared_source_map() {
        let cm: Lrc<SourceMap> = Default::default();
        let first = "\u{feff}// hél\nfunction a() { return 1; }\n";
        let second = "\u{feff}// hél\nfunction b(x) { return x; }\n";

        let a = convert_source(first, "a.ts", &cm, ParseOptions::default()).unwrap();
        let b = convert_source(second, "b.ts", &cm, ParseOptions::default()).unwrap();

        assert_eq!(
            a.output.as_deref(),
            Some("\u{feff}// hél\nconst a = () => { return 1; }\n")
        );
        assert_eq!(
            b.output.as_deref(),
            Some("\u{feff}// hél\nconst b = (x) => { return x; }\n")
        );
        assert!(matches!(&b.events[0], DeclarationEvent::Converted { line: 2, .. }));
    }

    #[test]
    fn test_comments_inside_signature_are_dropped() {
        // Only parameter, type and body fragments are carried over
        let src = "function f(/* c */ a, b /* d */) /* e */ { }";
        assert_eq!(convert(src).output.as_deref(), Some("const f = (a, b) => { }"));
    }

    #[test]
    fn test_multibyte_text_before_declarations() {
        let src = "const label = \"héllo wörld\";\nfunction greet() { return label; }\n";
        assert_eq!(
            convert(src).output.as_deref(),
            Some("const label = \"héllo wörld\";\nconst greet = () => { return label; }\n")
        );
    }

    #[test]
    fn test_parse_failure_is_an_error() {
        let cm: Lrc<SourceMap> = Default::default();
        assert!(convert_source("function broken(a, {", "bad.ts", &cm, ParseOptions::default()).is_err());
    }

    #[test]
    fn test_apply_edits_in_any_order() {
        let src = "aaa bbb ccc";
        let edits = vec![
            Edit {
                span: SourceSpan::new(8, 11, 1),
                text: "C".to_string(),
            },
            Edit {
                span: SourceSpan::new(0, 3, 1),
                text: "AAAA".to_string(),
            },
        ];
        assert_eq!(apply_edits(src, edits).unwrap(), "AAAA bbb C");
    }

    #[test]
    fn test_apply_edits_rejects_overlap() {
        let edits = vec![
            Edit {
                span: SourceSpan::new(0, 5, 1),
                text: String::new(),
            },
            Edit {
                span: SourceSpan::new(4, 8, 1),
                text: String::new(),
            },
        ];
        assert!(apply_edits("0123456789", edits).is_err());
    }

    #[test]
    fn test_apply_edits_rejects_out_of_bounds() {
        let edits = vec![Edit {
            span: SourceSpan::new(2, 40, 1),
            text: String::new(),
        }];
        assert!(apply_edits("short", edits).is_err());
    }
}
