//! Tests for the SWC parser wrapper

#[cfg(test)]
mod tests {
    use crate::parser::{self, ParseOptions};
    use swc_common::{sync::Lrc, SourceMap};

    fn parse_as(src: &str, filename: &str, options: ParseOptions) -> anyhow::Result<swc_ecma_ast::Module> {
        let cm: Lrc<SourceMap> = Default::default();
        parser::parse_source(src, &cm, filename, options)
    }

    fn parse_test(src: &str) -> anyhow::Result<swc_ecma_ast::Module> {
        parse_as(src, "test.ts", ParseOptions::default())
    }

    #[test]
    fn test_parse_typed_function() {
        let src = "export function add(a: number, b: number): number { return a + b; }";
        assert!(parse_test(src).is_ok(), "Should parse TypeScript types");
    }

    #[test]
    fn test_parse_overloads() {
        let src = r#"
            function pick(x: string): string;
            function pick(x: number): number;
            function pick(x: any) { return x; }
        "#;
        let module = parse_test(src).expect("overloads should parse");
        assert_eq!(module.body.len(), 3);
    }

    #[test]
    fn test_parse_anonymous_default_export() {
        let src = "export default function (x: number) { return x * 2; }";
        assert!(parse_test(src).is_ok());
    }

    #[test]
    fn test_parse_rejects_jsx_in_ts() {
        let src = "function View() { return <div>hello</div>; }";
        assert!(
            parse_test(src).is_err(),
            "JSX syntax should fail to parse in a .ts file"
        );
    }

    #[test]
    fn test_parse_accepts_jsx_in_tsx() {
        let src = "export function View() { return <div>hello</div>; }";
        assert!(parse_as(src, "view.tsx", ParseOptions::default()).is_ok());
    }

    #[test]
    fn test_parse_jsx_in_js_follows_options() {
        let src = "export function View() { return <div>hello</div>; }";
        assert!(parse_as(src, "view.js", ParseOptions::default()).is_err());

        let options = ParseOptions {
            jsx_in_js: true,
            ..Default::default()
        };
        assert!(parse_as(src, "view.js", options).is_ok());
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let err = parse_as("function broken(a, {", "broken.ts", ParseOptions::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.ts"));
    }
}
