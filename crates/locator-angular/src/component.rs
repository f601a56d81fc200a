//! Inline `template:` literals inside `@Component` decorators

use crate::template::{scan_region, splice_region, Enclosing};
use locator_core::{AnnotateOptions, LineIndex, Result, TransformOutput};
use once_cell::sync::Lazy;
use regex::Regex;

/// `template: <literal>`; group 1 = the whole quoted literal
static TEMPLATE_PROPERTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)template\s*:\s*(`(?:[^`\\]|\\.)*`|'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*")"#)
        .expect("valid template property pattern")
});

/// Decorator call that marks a file as an Angular component
pub const COMPONENT_MARKER: &str = "@Component";

/// Transforms every inline template of a component file.
///
/// Locations use the component file path and the component file's own lines and columns,
/// not positions relative to the template literal.
pub fn transform_angular_component(
    code: &str,
    options: &AnnotateOptions,
) -> Result<Option<TransformOutput>> {
    let filename = options.require_filename()?;
    let index = LineIndex::new(code);

    let mut result = String::with_capacity(code.len());
    let mut last = 0;
    let mut annotated = 0;

    for caps in TEMPLATE_PROPERTY_RE.captures_iter(code) {
        let Some(literal) = caps.get(1) else {
            continue;
        };
        let Some(quote) = literal.as_str().chars().next() else {
            continue;
        };
        // contents between the quotes; quotes are single-byte
        let region = literal.start() + 1..literal.end() - 1;

        let elements = scan_region(code, &index, region.clone(), filename, options);
        if elements.is_empty() {
            continue;
        }

        result.push_str(&code[last..region.start]);
        result.push_str(&splice_region(
            code,
            region.clone(),
            &elements,
            Enclosing::Literal(quote),
        ));
        last = region.end;
        annotated += elements.len();
    }

    if annotated == 0 {
        return Ok(None);
    }
    result.push_str(&code[last..]);

    tracing::debug!(file = %filename, elements = annotated, "Annotated inline Angular templates");
    Ok(Some(TransformOutput::new(result)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPONENT: &str = r#"import { Component } from '@angular/core';

@Component({
  selector: 'app-card',
  template: `
    <div class="card">
      <h2>{{ title }}</h2>
    </div>
  `,
})
export class CardComponent {}
"#;

    fn annotate(code: &str) -> Option<String> {
        transform_angular_component(code, &AnnotateOptions::new("/src/card.component.ts"))
            .unwrap()
            .map(|o| o.code)
    }

    #[test]
    fn test_inline_template_uses_component_file_positions() {
        let out = annotate(COMPONENT).unwrap();
        assert!(out.contains("<div class=\"card\" data-locatorjs=\"/src/card.component.ts:6:4\">"));
        assert!(out.contains("<h2 data-locatorjs=\"/src/card.component.ts:7:6\">"));
        assert!(out.starts_with("import { Component } from '@angular/core';\n\n@Component({"));
        assert!(out.ends_with("export class CardComponent {}\n"));
    }

    #[test]
    fn test_template_url_is_not_a_template() {
        let code = "@Component({ templateUrl: './x.html' })\nclass X {}";
        assert!(annotate(code).is_none());
    }

    #[test]
    fn test_double_quoted_literal_stays_valid() {
        let code = "@Component({ template: \"<p>hi</p>\" })";
        let out = annotate(code).unwrap();
        assert_eq!(
            out,
            "@Component({ template: \"<p data-locatorjs=\\\"/src/card.component.ts:1:24\\\">hi</p>\" })"
        );
    }

    #[test]
    fn test_escaped_quotes_inside_literal() {
        let code = "@Component({ template: '<p title=\\'x\\'>a</p>' })";
        let out = annotate(code).unwrap();
        assert!(out.contains("<p title=\\'x\\' data-locatorjs=\"/src/card.component.ts:1:24\">"));
    }
}
