//! Maps rendered elements back to source locations by walking towards the document root.

use locator_core::{
    decode, parse_number, SourceLocation, ATTR_COLUMN, ATTR_FILE, ATTR_ID, ATTR_LINE,
    ATTR_LOCATOR, ATTR_STYLED,
};

use crate::dom::DomTree;
use crate::registry::MetadataRegistry;

/// A resolved location together with the element that carried it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocationWithElement<N> {
    pub location: SourceLocation,
    pub element: N,
}

/// One way of reading a location off a single element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `data-locatorjs="file:line:column"`
    Combined,
    /// `data-source-file` / `data-source-line` / optional `data-source-column`
    Split,
    /// `data-locatorjs-id="file::id"`, looked up in the registry
    ExpressionId,
    /// `data-locatorjs-styled="file::id"`, looked up in the registry
    StyledId,
}

impl Strategy {
    fn resolve<D: DomTree>(
        self,
        dom: &D,
        element: D::Node,
        registry: Option<&MetadataRegistry>,
    ) -> Option<SourceLocation> {
        match self {
            Strategy::Combined => dom.attribute(element, ATTR_LOCATOR).and_then(|v| decode(&v)),
            Strategy::Split => {
                let file = dom.attribute(element, ATTR_FILE).filter(|f| !f.is_empty())?;
                let line = dom
                    .attribute(element, ATTR_LINE)
                    .and_then(|l| parse_number(&l))?;
                let column = dom
                    .attribute(element, ATTR_COLUMN)
                    .and_then(|c| parse_number(&c))
                    .unwrap_or(0);
                Some(SourceLocation::new(file, line, column))
            }
            Strategy::ExpressionId => {
                let value = dom.attribute(element, ATTR_ID)?;
                registry?.resolve_expression(&value)
            }
            Strategy::StyledId => {
                let value = dom.attribute(element, ATTR_STYLED)?;
                registry?.resolve_styled(&value)
            }
        }
    }
}

/// Ordered strategy chain; the first strategy that yields a location wins
#[derive(Debug, Clone)]
pub struct LocationResolver {
    strategies: Vec<Strategy>,
    registry: Option<MetadataRegistry>,
}

impl Default for LocationResolver {
    fn default() -> Self {
        Self {
            strategies: vec![Strategy::Combined, Strategy::Split],
            registry: None,
        }
    }
}

impl LocationResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also resolves ID-keyed attributes through the given registry
    pub fn with_registry(mut self, registry: MetadataRegistry) -> Self {
        self.registry = Some(registry);
        for strategy in [Strategy::ExpressionId, Strategy::StyledId] {
            if !self.strategies.contains(&strategy) {
                self.strategies.push(strategy);
            }
        }
        self
    }

    /// Appends a strategy to the end of the chain
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        if !self.strategies.contains(&strategy) {
            self.strategies.push(strategy);
        }
        self
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn registry_mut(&mut self) -> Option<&mut MetadataRegistry> {
        self.registry.as_mut()
    }

    /// Location carried by this element alone
    pub fn resolve_element<D: DomTree>(&self, dom: &D, element: D::Node) -> Option<SourceLocation> {
        self.strategies
            .iter()
            .find_map(|strategy| strategy.resolve(dom, element, self.registry.as_ref()))
    }

    /// Every location from `start` up to the document root, innermost first.
    ///
    /// Non-element starts (text, SVG internals) are normalized to their nearest
    /// element. Shadow boundaries are crossed through the shadow root's host.
    pub fn get_all_source_locations<D: DomTree>(
        &self,
        dom: &D,
        start: D::Node,
    ) -> Vec<SourceLocationWithElement<D::Node>> {
        let mut locations = Vec::new();
        let mut current = dom.nearest_element(start);

        while let Some(element) = current {
            if let Some(location) = self.resolve_element(dom, element) {
                locations.push(SourceLocationWithElement { location, element });
            }

            current = match dom.parent_element(element) {
                Some(parent) => Some(parent),
                None => dom.shadow_host(dom.root_node(element)),
            };
        }

        locations
    }
}

/// Picks the location to act on.
///
/// For the parent level this is the first entry from a different file than the
/// innermost one, or the outermost entry when every entry shares that file.
pub fn get_target_location<N>(
    locations: &[SourceLocationWithElement<N>],
    want_parent: bool,
) -> Option<&SourceLocationWithElement<N>> {
    let first = locations.first()?;
    if !want_parent {
        return Some(first);
    }
    locations
        .iter()
        .find(|entry| entry.location.file != first.location.file)
        .or_else(|| locations.last())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_split_attributes_column_optional() {
        let mut doc = Document::new();
        let root = doc.root();
        let el = doc.append_element(root, "div", &[(ATTR_FILE, "/a.tsx"), (ATTR_LINE, "7")]);
        let resolver = LocationResolver::new();
        assert_eq!(
            resolver.resolve_element(&doc, el),
            Some(SourceLocation::new("/a.tsx", 7, 0))
        );
    }

    #[test]
    fn test_split_attributes_need_line() {
        let mut doc = Document::new();
        let root = doc.root();
        let el = doc.append_element(root, "div", &[(ATTR_FILE, "/a.tsx"), (ATTR_LINE, "x")]);
        assert!(LocationResolver::new().resolve_element(&doc, el).is_none());
    }

    #[test]
    fn test_combined_wins_over_split() {
        let mut doc = Document::new();
        let root = doc.root();
        let el = doc.append_element(
            root,
            "div",
            &[
                (ATTR_LOCATOR, "/new.tsx:1:2"),
                (ATTR_FILE, "/old.tsx"),
                (ATTR_LINE, "9"),
            ],
        );
        assert_eq!(
            LocationResolver::new().resolve_element(&doc, el),
            Some(SourceLocation::new("/new.tsx", 1, 2))
        );
    }

    #[test]
    fn test_malformed_values_skipped_during_walk() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = doc.append_element(root, "main", &[(ATTR_LOCATOR, "/m.tsx:3:0")]);
        let middle = doc.append_element(outer, "div", &[(ATTR_LOCATOR, "broken")]);
        let inner = doc.append_element(middle, "p", &[(ATTR_LOCATOR, "/p.tsx:x:1")]);

        let locations = LocationResolver::new().get_all_source_locations(&doc, inner);
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].element, outer);
    }

    #[test]
    fn test_id_attributes_need_registry() {
        let mut doc = Document::new();
        let root = doc.root();
        let el = doc.append_element(root, "p", &[(ATTR_ID, "/a.tsx::0")]);
        assert!(LocationResolver::new().resolve_element(&doc, el).is_none());

        let mut table = locator_core::models::FileMetadataTable::for_file("/a.tsx", None);
        table.add_expression(locator_core::models::ExpressionInfo {
            name: "p".into(),
            loc: locator_core::models::SpanLocation::new((2, 4), (2, 12)),
            wrapping_component_id: None,
        });
        let mut registry = MetadataRegistry::new();
        registry.register(table);

        let resolver = LocationResolver::new().with_registry(registry);
        assert_eq!(
            resolver.resolve_element(&doc, el),
            Some(SourceLocation::new("/a.tsx", 2, 4))
        );
        assert_eq!(
            resolver.strategies(),
            &[
                Strategy::Combined,
                Strategy::Split,
                Strategy::ExpressionId,
                Strategy::StyledId
            ]
        );
    }

    #[test]
    fn test_target_location_fallbacks() {
        let entry = |file: &str, line| SourceLocationWithElement {
            location: SourceLocation::new(file, line, 0),
            element: line,
        };
        let empty: Vec<SourceLocationWithElement<usize>> = Vec::new();
        assert!(get_target_location(&empty, false).is_none());
        assert!(get_target_location(&empty, true).is_none());

        let same_file = vec![entry("a", 1), entry("a", 2), entry("a", 3)];
        assert_eq!(get_target_location(&same_file, false).unwrap().element, 1);
        assert_eq!(get_target_location(&same_file, true).unwrap().element, 3);

        let single = vec![entry("a", 1)];
        assert_eq!(get_target_location(&single, true).unwrap().element, 1);
    }
}
