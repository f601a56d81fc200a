//! Build environment detection and path markers shared by the build-time hooks

/// Path segment of vendored dependencies; files below it are never annotated
pub const VENDOR_SEGMENT: &str = "node_modules";

/// Next.js build output; the split-attribute injector never touches it
pub const NEXT_OUTPUT_SEGMENT: &str = ".next";

/// Marker of framework middleware files that the loader hook leaves untouched
pub const MIDDLEWARE_MARKER: &str = "middleware.";

pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Environment the JSX annotator compares its `env` option against:
/// `BABEL_ENV`, then `NODE_ENV`, then `"development"`.
pub fn annotator_environment() -> String {
    std::env::var("BABEL_ENV")
        .or_else(|_| std::env::var("NODE_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string())
}

/// Environment the bundler hook checks against its allow-list: `NODE_ENV` or `"development"`
pub fn hook_environment() -> String {
    std::env::var("NODE_ENV").unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string())
}

/// Whether the path points into vendored dependencies
pub fn is_vendored(path: &str) -> bool {
    path.contains(VENDOR_SEGMENT)
}
