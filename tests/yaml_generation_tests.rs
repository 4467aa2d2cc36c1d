mod common;

use common::EchoCompiler;
use indoc::indoc;
use localegen::{Diagnostic, Environment, GenerateOptions, Generator, TargetType};

#[test]
fn test_plain_module_from_block_mapping() {
    let mut generator = Generator::new(&EchoCompiler);
    let options = GenerateOptions::new().with_env(Environment::Production);
    let source = indoc! {r#"
        greeting: "Hi"
        menu:
          items:
            - home
            - about
    "#};
    let generated = generator.generate_yaml(source, &options).unwrap();
    let expected = indoc! {r#"
        const resource = {
          "greeting": (ctx) => "Hi",
          "menu": {
            "items": [
              (ctx) => "home",
              (ctx) => "about"
            ]
          }
        }
        export default resource"#};
    assert_eq!(generated.code, expected);
}

#[test]
fn test_strict_markup_advisory_with_path() {
    let mut diagnostics = Vec::new();
    let mut generator = Generator::new(&EchoCompiler)
        .with_error_sink(|diagnostic: Diagnostic| diagnostics.push(diagnostic));
    let generated = generator
        .generate_yaml("greeting: \"<b>Hi</b>\"\n", &GenerateOptions::new())
        .unwrap();
    drop(generator);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].path.as_deref(), Some("greeting"));
    assert!(diagnostics[0].message.contains("Detected HTML"));
    assert_eq!(diagnostics[0].source.as_deref(), Some("<b>Hi</b>"));
    // The advisory does not block compilation.
    assert!(generated.code.contains("fn.source"));
}

#[test]
fn test_lenient_markup_is_silent() {
    let mut diagnostics = Vec::new();
    let mut generator = Generator::new(&EchoCompiler)
        .with_error_sink(|diagnostic: Diagnostic| diagnostics.push(diagnostic));
    let options = GenerateOptions::new().with_strict_message(false);
    generator
        .generate_yaml("greeting: \"<b>Hi</b>\"\n", &options)
        .unwrap();
    drop(generator);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_escape_html_rewrites_message() {
    let mut generator = Generator::new(&EchoCompiler);
    let options = GenerateOptions::new()
        .with_strict_message(false)
        .with_escape_html(true)
        .with_env(Environment::Production);
    let generated = generator
        .generate_yaml("greeting: \"<b>Hi</b>\"\n", &options)
        .unwrap();
    assert!(generated.code.contains("&lt;b&gt;Hi&lt;/b&gt;"));
    assert!(!generated.code.contains("<b>"));
}

#[test]
fn test_flow_collections_generate_like_block() {
    let mut generator = Generator::new(&EchoCompiler);
    let options = GenerateOptions::new().with_env(Environment::Production);
    let generated = generator
        .generate_yaml("point: {x: 1, y: 2}\ncolors: [red, green]\n", &options)
        .unwrap();
    assert!(generated.code.contains("\"x\": 1"));
    assert!(generated.code.contains("\"y\": 2"));
    assert!(generated.code.contains("(ctx) => \"red\""));
    assert!(generated.code.contains("(ctx) => \"green\""));
}

#[test]
fn test_non_string_scalars_normalized() {
    let mut generator = Generator::new(&EchoCompiler);
    let options = GenerateOptions::new().with_env(Environment::Production);
    let generated = generator
        .generate_yaml(
            "count: 42\nbig: 1e3\nratio: 2.50\nenabled: true\nnothing: null\n",
            &options,
        )
        .unwrap();
    assert!(generated.code.contains("\"count\": 42"));
    assert!(generated.code.contains("\"big\": 1000"));
    assert!(generated.code.contains("\"ratio\": 2.5"));
    assert!(generated.code.contains("\"enabled\": true"));
    assert!(generated.code.contains("\"nothing\": null"));
}

#[test]
fn test_legacy_mode_emits_injection_snippet() {
    let mut generator = Generator::new(&EchoCompiler);
    let options = GenerateOptions::new()
        .with_target(TargetType::Sfc)
        .with_legacy(true)
        .with_source_map(true);
    let source = indoc! {"
        hello: hi
        nested:
          count: 3
    "};
    let generated = generator.generate_yaml(source, &options).unwrap();
    assert!(generated.code.starts_with("export default function (Component) {"));
    assert!(
        generated
            .code
            .contains("Component.options.__i18n.push({\"hello\":\"hi\",\"nested\":{\"count\":3}})")
    );
    assert!(generated.code.contains("delete Component.options._Ctor"));
    // No message functions in legacy mode.
    assert!(!generated.code.contains("(ctx) =>"));
    let map = generated.map.expect("map requested");
    assert_eq!(
        map.sources_content,
        Some(vec![Some(source.to_string())])
    );
}

#[test]
fn test_legacy_mode_requires_sfc_target() {
    let mut generator = Generator::new(&EchoCompiler);
    let options = GenerateOptions::new()
        .with_legacy(true)
        .with_env(Environment::Production);
    let generated = generator.generate_yaml("hello: hi\n", &options).unwrap();
    // Plain target ignores the legacy flag and walks the tree.
    assert!(generated.code.starts_with("const resource = "));
    assert!(generated.code.contains("(ctx) => \"hi\""));
}

#[test]
fn test_sequence_of_mappings() {
    let mut generator = Generator::new(&EchoCompiler);
    let options = GenerateOptions::new().with_env(Environment::Production);
    let source = indoc! {"
        users:
          - name: alice
            role: admin
          - name: bob
    "};
    let generated = generator.generate_yaml(source, &options).unwrap();
    let expected = indoc! {r#"
        const resource = {
          "users": [
            {
              "name": (ctx) => "alice",
              "role": (ctx) => "admin"
            },
            {
              "name": (ctx) => "bob"
            }
          ]
        }
        export default resource"#};
    assert_eq!(generated.code, expected);
}

#[test]
fn test_parse_error_is_fatal() {
    let mut generator = Generator::new(&EchoCompiler);
    let result = generator.generate_yaml("a: &anchor 1\n", &GenerateOptions::new());
    assert!(matches!(result, Err(localegen::Error::YamlParse { .. })));
}
