use locator_core::environment::{annotator_environment, is_vendored, NEXT_OUTPUT_SEGMENT};
use locator_core::models::FileMetadataTable;
use locator_core::{apply_insertions, AnnotateOptions, Insertion, Result, TransformOutput};
use serde::{Deserialize, Serialize};
use swc_ecma_visit::VisitWith;

use crate::context::FileContext;
use crate::disallow::DISALLOWED_NAMES;
use crate::parser::parse_source;

/// Global the emitted side table is registered under in the browser
pub const REGISTRY_GLOBAL: &str = "__LOCATOR_DATA__";

/// What the injected JSX attribute carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeMode {
    /// `data-locatorjs="file:line:column"`, self-contained
    #[default]
    Path,
    /// `data-locatorjs-id="file::id"`, resolved through the registered side table
    Id,
    /// Legacy `data-source-file` / `data-source-line` / `data-source-column` triple
    Split,
}

/// Element filters of [`AttributeMode::Split`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SplitOptions {
    /// When set, only these tag names are annotated
    pub include_elements: Option<Vec<String>>,
    /// Replaces the wrapper list in [`DISALLOWED_NAMES`] when set
    pub exclude_elements: Option<Vec<String>>,
    /// Elements counted past this limit are left alone
    pub max_elements_per_file: Option<usize>,
}

impl SplitOptions {
    pub fn with_include_elements(mut self, names: Vec<String>) -> Self {
        self.include_elements = Some(names);
        self
    }

    pub fn with_exclude_elements(mut self, names: Vec<String>) -> Self {
        self.exclude_elements = Some(names);
        self
    }

    pub fn with_max_elements_per_file(mut self, max: usize) -> Self {
        self.max_elements_per_file = Some(max);
        self
    }

    pub(crate) fn admits(&self, name: &str) -> bool {
        let excluded = match &self.exclude_elements {
            Some(names) => names.iter().any(|n| n == name),
            None => DISALLOWED_NAMES.contains(&name),
        };
        let included = self
            .include_elements
            .as_ref()
            .map_or(true, |names| names.iter().any(|n| n == name));
        !excluded && included
    }
}

/// JSX-specific options on top of [`AnnotateOptions`]
#[derive(Debug, Clone)]
pub struct JsxOptions {
    pub mode: AttributeMode,
    /// When set, files are only annotated while the build environment equals it
    pub env: Option<String>,
    /// Project root used to split the stored file path
    pub cwd: Option<String>,
    /// Build environment the `env` gate compares against
    pub current_environment: String,
    pub split: SplitOptions,
}

impl Default for JsxOptions {
    fn default() -> Self {
        Self {
            mode: AttributeMode::default(),
            env: None,
            cwd: None,
            current_environment: annotator_environment(),
            split: SplitOptions::default(),
        }
    }
}

impl JsxOptions {
    pub fn with_mode(mut self, mode: AttributeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<String>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_current_environment(mut self, current: impl Into<String>) -> Self {
        self.current_environment = current.into();
        self
    }

    pub fn with_split(mut self, split: SplitOptions) -> Self {
        self.split = split;
        self
    }

    fn environment_matches(&self) -> bool {
        self.env
            .as_deref()
            .map_or(true, |env| env == self.current_environment)
    }
}

/// Statement that registers the file's side table on `window` when running in a browser
pub fn registry_statement(table: &FileMetadataTable) -> Result<String> {
    let key = serde_json::to_string(&table.full_path())?;
    let data = serde_json::to_string(table)?;
    Ok(format!(
        "\n;(() => {{ if (typeof window !== \"undefined\") {{ \
         window.{g} = window.{g} || {{}}; \
         window.{g}[{key}] = {data}; }} }})();\n",
        g = REGISTRY_GLOBAL,
    ))
}

/// Annotates every eligible JSX element of one file.
///
/// Vendored files and files outside the configured environment pass through
/// (`Ok(None)`), as do files where nothing was eligible.
pub fn transform_jsx(
    code: &str,
    options: &AnnotateOptions,
    jsx: &JsxOptions,
) -> Result<Option<TransformOutput>> {
    let filename = options.require_filename()?;

    if is_vendored(filename)
        || (jsx.mode == AttributeMode::Split && filename.contains(NEXT_OUTPUT_SEGMENT))
    {
        return Ok(None);
    }
    if !jsx.environment_matches() {
        tracing::debug!(
            file = %filename,
            env = ?jsx.env,
            current = %jsx.current_environment,
            "Environment mismatch, leaving file untouched"
        );
        return Ok(None);
    }

    let parsed = parse_source(code, filename)?;
    let table = FileMetadataTable::for_file(filename, jsx.cwd.as_deref());
    let mut context = FileContext::new(code, parsed.file.start_pos, options, jsx, table);
    parsed.module.visit_with(&mut context);

    let (table, mut insertions) = context.into_parts();
    if insertions.is_empty() {
        return Ok(None);
    }

    if jsx.mode == AttributeMode::Id || !table.styled_definitions.is_empty() {
        insertions.push(Insertion::new(code.len(), registry_statement(&table)?));
    }

    tracing::debug!(
        file = %filename,
        expressions = table.expressions.len(),
        styled = table.styled_definitions.len(),
        "Annotated JSX"
    );
    Ok(Some(TransformOutput::new(apply_insertions(code, insertions))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_mode() -> JsxOptions {
        JsxOptions::default().with_current_environment("development")
    }

    fn annotate(code: &str, filename: &str, jsx: &JsxOptions) -> Option<String> {
        transform_jsx(code, &AnnotateOptions::new(filename), jsx)
            .unwrap()
            .map(|out| out.code)
    }

    #[test]
    fn test_path_mode_inserts_after_name() {
        let code = "export const A = () => <div className=\"a\"><Foo.Bar /></div>;";
        let out = annotate(code, "/src/A.jsx", &path_mode()).unwrap();
        assert_eq!(
            out,
            "export const A = () => <div data-locatorjs={\"/src/A.jsx:1:23\"} className=\"a\">\
             <Foo.Bar data-locatorjs={\"/src/A.jsx:1:42\"} /></div>;"
        );
    }

    #[test]
    fn test_type_arguments_are_kept_before_attribute() {
        let code = "const x = <List<string> items={[]} />;";
        let out = annotate(code, "/src/L.tsx", &path_mode()).unwrap();
        assert!(out.starts_with("const x = <List<string> data-locatorjs={\"/src/L.tsx:1:10\"} items"));
    }

    #[test]
    fn test_multiline_columns() {
        let code = "function App() {\n  return (\n    <main>\n      <h1>Hi</h1>\n    </main>\n  );\n}\n";
        let out = annotate(code, "/src/App.jsx", &path_mode()).unwrap();
        assert!(out.contains("<main data-locatorjs={\"/src/App.jsx:3:4\"}>"));
        assert!(out.contains("<h1 data-locatorjs={\"/src/App.jsx:4:6\"}>"));
        assert!(!out.contains(REGISTRY_GLOBAL));
    }

    #[test]
    fn test_vendored_and_environment_gate() {
        let code = "const a = <div />;";
        assert!(annotate(code, "/app/node_modules/lib/a.jsx", &path_mode()).is_none());

        let production_only = path_mode().with_env("production");
        assert!(annotate(code, "/src/a.jsx", &production_only).is_none());

        let development_only = path_mode().with_env("development");
        assert!(annotate(code, "/src/a.jsx", &development_only).is_some());
    }

    #[test]
    fn test_id_mode_registers_side_table() {
        let code = "function Card() {\n  return <section><p>x</p></section>;\n}\n";
        let jsx = path_mode().with_mode(AttributeMode::Id).with_cwd("/work");
        let out = annotate(code, "/work/src/Card.jsx", &jsx).unwrap();

        assert!(out.contains("<section data-locatorjs-id={\"/work/src/Card.jsx::0\"}>"));
        assert!(out.contains("<p data-locatorjs-id={\"/work/src/Card.jsx::1\"}>"));
        assert!(out.contains("window.__LOCATOR_DATA__[\"/work/src/Card.jsx\"] = {"));
        assert!(out.contains("\"filePath\":\"/src/Card.jsx\""));
        assert!(out.contains("\"projectPath\":\"/work\""));
        assert!(out.contains("\"wrappingComponentId\":0"));
    }

    #[test]
    fn test_styled_definition_is_wrapped() {
        let code = "const Title = styled.h1`\n  color: red;\n`;\n";
        let out = annotate(code, "/src/Title.js", &path_mode()).unwrap();
        assert!(out.starts_with(
            "const Title = styled.h1.attrs(() => ({\"data-locatorjs-styled\": \"/src/Title.js::0\"}))`"
        ));
        assert!(out.contains("\"styledDefinitions\":[{\"name\":\"Title\""));
        assert!(out.contains("\"htmlTag\":\"h1\""));
    }

    #[test]
    fn test_split_mode_writes_attribute_triple() {
        let code = "const a = (\n  <section>\n    <b>x</b>\n  </section>\n);\n";
        let jsx = path_mode().with_mode(AttributeMode::Split);
        let out = annotate(code, "/src/a.jsx", &jsx).unwrap();
        assert!(out.contains(
            "<section data-source-file={\"/src/a.jsx\"} data-source-line=\"2\" data-source-column=\"2\">"
        ));
        assert!(out.contains(
            "<b data-source-file={\"/src/a.jsx\"} data-source-line=\"3\" data-source-column=\"4\">"
        ));
        assert!(!out.contains("data-locatorjs"));
        assert!(annotate(&out, "/src/a.jsx", &jsx).is_none());
    }

    #[test]
    fn test_split_mode_skips_next_output() {
        let jsx = path_mode().with_mode(AttributeMode::Split);
        assert!(annotate("const a = <div />;", "/app/.next/server/page.js", &jsx).is_none());
        assert!(annotate("const a = <div />;", "/app/.next/server/page.js", &path_mode()).is_some());
    }

    #[test]
    fn test_split_mode_leaves_styled_templates_alone() {
        let code = "const Title = styled.h1`color: red;`;\nconst a = <Title />;\n";
        let jsx = path_mode().with_mode(AttributeMode::Split);
        let out = annotate(code, "/src/Title.js", &jsx).unwrap();
        assert!(out.starts_with("const Title = styled.h1`color: red;`;"));
        assert!(!out.contains(REGISTRY_GLOBAL));
    }

    #[test]
    fn test_split_options_filters() {
        let defaults = SplitOptions::default();
        assert!(!defaults.admits("React.Fragment"));
        assert!(defaults.admits("mesh"));

        let custom = SplitOptions::default()
            .with_exclude_elements(vec!["span".to_string()])
            .with_include_elements(vec!["span".to_string(), "Fragment".to_string()]);
        assert!(!custom.admits("span"));
        assert!(custom.admits("Fragment"));
        assert!(!custom.admits("div"));
    }

    #[test]
    fn test_parse_error_is_recoverable() {
        let err = transform_jsx(
            "const a = <div>;",
            &AnnotateOptions::new("/src/a.jsx"),
            &path_mode(),
        )
        .unwrap_err();
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_missing_filename_is_fatal() {
        let err = transform_jsx("<a />", &AnnotateOptions::default(), &path_mode()).unwrap_err();
        assert!(err.is_fatal());
    }
}
