use once_cell::sync::Lazy;
use regex::RegexSet;

/// Wrapper components that render no DOM element of their own
pub const DISALLOWED_NAMES: [&str; 8] = [
    "Fragment",
    "React.Fragment",
    "Suspense",
    "React.Suspense",
    "StrictMode",
    "React.StrictMode",
    "Profiler",
    "React.Profiler",
];

/// Context providers plus the lowercase intrinsics of 3D scene-graph renderers,
/// which look like HTML tags but cannot carry DOM attributes
static DISALLOWED_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"Provider$",
        r"^mesh$",
        r"^group$",
        r"^fog$",
        r"^color$",
        r"^ambientLight$",
        r"^directionalLight$",
        r"^pointLight$",
        r"^spotLight$",
        r"Geometry$",
        r"Material$",
        r"Helper$",
        r"Controls$",
        r"Camera$",
    ])
    .expect("valid disallow patterns")
});

pub fn is_disallowed_component(name: &str) -> bool {
    DISALLOWED_NAMES.contains(&name) || DISALLOWED_PATTERNS.is_match(name)
}
