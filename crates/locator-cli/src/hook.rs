//! Build-tool entry points: the transform hook every bundled module passes through and
//! the JSX-only loader hook.

use std::sync::Once;

use locator_angular::{transform_angular_component, transform_angular_template, COMPONENT_MARKER};
use locator_core::environment::{hook_environment, is_vendored, MIDDLEWARE_MARKER};
use locator_core::{AnnotateOptions, Result, TransformOutput};
use locator_jsx::{transform_jsx, AttributeMode, JsxOptions};

use crate::config::{CompiledPattern, Config};

static VUE_DISABLED: Once = Once::new();

fn vue_disabled_notice() {
    VUE_DISABLED.call_once(|| {
        tracing::info!("Vue support is disabled, .vue files are passed through unchanged");
    });
}

#[cfg(feature = "vue")]
fn annotate_vue(code: &str, options: &AnnotateOptions) -> Result<Option<TransformOutput>> {
    locator_vue::transform_vue_sfc(code, options)
}

#[cfg(not(feature = "vue"))]
fn annotate_vue(_code: &str, _options: &AnnotateOptions) -> Result<Option<TransformOutput>> {
    vue_disabled_notice();
    Ok(None)
}

/// Whether any pattern matches the module id
pub fn matches_any(id: &str, patterns: &[CompiledPattern]) -> bool {
    patterns.iter().any(|pattern| pattern.is_match(id))
}

/// Turns a per-file failure into a pass-through; only fatal errors escape
fn recover(
    dialect: &str,
    id: &str,
    result: Result<Option<TransformOutput>>,
) -> Result<Option<TransformOutput>> {
    match result {
        Ok(output) => Ok(output),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            tracing::warn!(
                file = %id,
                dialect,
                error = %e,
                "Failed to annotate, keeping original source"
            );
            Ok(None)
        }
    }
}

/// Transform hook: environment gate, path filters, then dialect dispatch
#[derive(Debug, Clone)]
pub struct TransformHook {
    environments: Vec<String>,
    current_environment: String,
    ignore_component_names: Vec<String>,
    include: Vec<CompiledPattern>,
    exclude: Vec<CompiledPattern>,
    vue: bool,
    angular: bool,
    jsx: JsxOptions,
}

impl TransformHook {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut jsx = JsxOptions::default()
            .with_mode(config.jsx.mode)
            .with_split(config.jsx.split.clone());
        if let Some(cwd) = &config.jsx.cwd {
            jsx = jsx.with_cwd(cwd.clone());
        }

        Ok(Self {
            environments: config.environments.clone(),
            current_environment: hook_environment(),
            ignore_component_names: config.ignore_component_names.clone(),
            include: config.compiled_include()?,
            exclude: config.compiled_exclude()?,
            vue: config.vue,
            angular: config.angular,
            jsx,
        })
    }

    /// Overrides the build environment read from `NODE_ENV`
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.current_environment = environment.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.environments.contains(&self.current_environment)
    }

    /// Whether the module id passes the exclude and include filters
    pub fn wants(&self, id: &str) -> bool {
        !matches_any(id, &self.exclude) && matches_any(id, &self.include)
    }

    /// Annotates one module.
    ///
    /// `Ok(None)` means the host keeps the original code. Per-file failures are logged
    /// and reported as `Ok(None)`; only a missing module id is an error.
    pub fn transform(&self, code: &str, id: &str) -> Result<Option<TransformOutput>> {
        if !self.is_enabled() || !self.wants(id) {
            return Ok(None);
        }
        if !code.contains('<') || !code.contains('>') {
            return Ok(None);
        }

        tracing::debug!(file = %id, "Processing");
        let options = AnnotateOptions::new(id)
            .with_ignore_component_names(self.ignore_component_names.clone());

        if id.ends_with(".vue") {
            if !self.vue {
                vue_disabled_notice();
                return Ok(None);
            }
            return recover("vue", id, annotate_vue(code, &options));
        }
        if self.angular && id.ends_with(".component.html") {
            return recover("angular", id, transform_angular_template(code, &options));
        }
        if self.angular && id.ends_with(".component.ts") && code.contains(COMPONENT_MARKER) {
            return recover("angular", id, transform_angular_component(code, &options));
        }
        recover("jsx", id, transform_jsx(code, &options, &self.jsx))
    }
}

/// Loader hook for script modules: always path mode, original source on any failure
#[derive(Debug, Clone, Default)]
pub struct LoaderHook {
    jsx: JsxOptions,
    ignore_component_names: Vec<String>,
}

impl LoaderHook {
    pub fn new(jsx: JsxOptions, ignore_component_names: Vec<String>) -> Self {
        Self {
            jsx: jsx.with_mode(AttributeMode::Path),
            ignore_component_names,
        }
    }

    pub fn load(&self, source: &str, resource_path: &str) -> Result<String> {
        if is_vendored(resource_path) || resource_path.contains(MIDDLEWARE_MARKER) {
            return Ok(source.to_string());
        }

        let options = AnnotateOptions::new(resource_path)
            .with_ignore_component_names(self.ignore_component_names.clone());
        let output = recover("jsx", resource_path, transform_jsx(source, &options, &self.jsx))?;
        Ok(output.map_or_else(|| source.to_string(), |out| out.code))
    }
}
