use indexmap::IndexMap;
use locator_core::models::FileMetadataTable;
use locator_core::{parse_id, SourceLocation};

/// Per-file side tables registered by ID-mode builds, keyed by full file path
#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    files: IndexMap<String, FileMetadataTable>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table under its full path, replacing an earlier one
    pub fn register(&mut self, table: FileMetadataTable) {
        self.files.insert(table.full_path(), table);
    }

    /// Registers a table from the JSON the build emitted
    pub fn register_json(&mut self, json: &str) -> serde_json::Result<()> {
        let table: FileMetadataTable = serde_json::from_str(json)?;
        self.register(table);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Resolves a `file::id` value naming a JSX expression
    pub fn resolve_expression(&self, value: &str) -> Option<SourceLocation> {
        let (file, id) = parse_id(value)?;
        self.files.get(file)?.expression_location(id)
    }

    /// Resolves a `file::id` value naming a styled definition
    pub fn resolve_styled(&self, value: &str) -> Option<SourceLocation> {
        let (file, id) = parse_id(value)?;
        self.files.get(file)?.styled_location(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locator_core::models::{ExpressionInfo, SpanLocation, StyledDefinition};

    fn table() -> FileMetadataTable {
        let mut table = FileMetadataTable::for_file("/work/src/Card.tsx", Some("/work"));
        table.add_expression(ExpressionInfo {
            name: "section".into(),
            loc: SpanLocation::new((4, 9), (4, 30)),
            wrapping_component_id: Some(0),
        });
        table.add_styled(StyledDefinition {
            name: Some("Title".into()),
            loc: SpanLocation::new((1, 14), (3, 1)),
            html_tag: "h1".into(),
        });
        table
    }

    #[test]
    fn test_resolves_registered_ids() {
        let mut registry = MetadataRegistry::new();
        registry.register(table());

        assert_eq!(
            registry.resolve_expression("/work/src/Card.tsx::0"),
            Some(SourceLocation::new("/work/src/Card.tsx", 4, 9))
        );
        assert_eq!(
            registry.resolve_styled("/work/src/Card.tsx::0"),
            Some(SourceLocation::new("/work/src/Card.tsx", 1, 14))
        );
    }

    #[test]
    fn test_missing_entries_resolve_to_none() {
        let mut registry = MetadataRegistry::new();
        registry.register(table());
        assert!(registry.resolve_expression("/work/src/Card.tsx::7").is_none());
        assert!(registry.resolve_expression("/work/src/Other.tsx::0").is_none());
        assert!(registry.resolve_expression("not-an-id").is_none());
    }

    #[test]
    fn test_register_json_round_trip() {
        let json = serde_json::to_string(&table()).unwrap();
        let mut registry = MetadataRegistry::new();
        registry.register_json(&json).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.register_json("{not json").is_err());
    }
}
