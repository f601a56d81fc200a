use locator_core::{LocatorError, Result};
use swc_common::{sync::Lrc, FileName, SourceFile, SourceMap};
use swc_ecma_ast::Module;
use swc_ecma_parser::{lexer::Lexer, EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// Parsed module together with the source file its spans refer to
pub struct ParsedModule {
    pub module: Module,
    pub file: Lrc<SourceFile>,
}

/// Picks the parser dialect from the file extension
pub fn syntax_for(filename: &str) -> Syntax {
    let extension = filename.rsplit('.').next().unwrap_or_default();
    match extension {
        "ts" | "mts" | "cts" => Syntax::Typescript(TsSyntax {
            tsx: false,
            decorators: true,
            ..Default::default()
        }),
        "tsx" => Syntax::Typescript(TsSyntax {
            tsx: true,
            decorators: true,
            ..Default::default()
        }),
        _ => Syntax::Es(EsSyntax {
            jsx: true,
            decorators: true,
            ..Default::default()
        }),
    }
}

/// Parses source code via swc
pub fn parse_source(source: &str, filename: &str) -> Result<ParsedModule> {
    let source_map = SourceMap::default();
    let file_name: Lrc<FileName> = FileName::Custom(filename.to_string()).into();
    let fm = source_map.new_source_file(file_name, source.to_string());

    let lexer = Lexer::new(
        syntax_for(filename),
        Default::default(),
        StringInput::from(&*fm),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let module = parser
        .parse_module()
        .map_err(|e| LocatorError::parse(filename, e.kind().msg()))?;

    Ok(ParsedModule { module, file: fm })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_by_extension() {
        assert!(matches!(syntax_for("a.tsx"), Syntax::Typescript(ts) if ts.tsx));
        assert!(matches!(syntax_for("a.ts"), Syntax::Typescript(ts) if !ts.tsx));
        assert!(matches!(syntax_for("a.jsx"), Syntax::Es(es) if es.jsx));
        assert!(matches!(syntax_for("a.js"), Syntax::Es(es) if es.jsx));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_source("const = <div>", "/src/Broken.tsx")
            .err()
            .unwrap();
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("/src/Broken.tsx"));
    }

    #[test]
    fn test_module_span_starts_at_file_start() {
        let parsed = parse_source("<div />;", "/src/A.jsx").unwrap();
        assert_eq!(parsed.module.span.lo, parsed.file.start_pos);
        assert_eq!(parsed.module.body.len(), 1);
    }
}
