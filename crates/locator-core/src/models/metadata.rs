use serde::{Deserialize, Serialize};

use super::SourceLocation;

/// Line/column pair as stored in the side table (line 1-based, column 0-based)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Start and end of a node in its source file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpanLocation {
    pub start: Position,
    pub end: Position,
}

impl SpanLocation {
    pub fn new(start: (usize, usize), end: (usize, usize)) -> Self {
        Self {
            start: Position {
                line: start.0,
                column: start.1,
            },
            end: Position {
                line: end.0,
                column: end.1,
            },
        }
    }
}

/// A rendered JSX element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionInfo {
    pub name: String,
    pub loc: SpanLocation,
    /// Component (named function) whose body contains the element
    pub wrapping_component_id: Option<usize>,
}

/// A `styled.tag` template definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StyledDefinition {
    /// Variable the definition is assigned to, if any
    pub name: Option<String>,
    pub loc: SpanLocation,
    pub html_tag: String,
}

/// A named function declaration, or a function or arrow bound to a variable
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
    pub name: String,
    /// `line:column` of the declaration start
    pub loc_string: String,
    pub loc: SpanLocation,
}

/// Per-file side table emitted by the JSX annotator in ID mode.
///
/// IDs are indices into the three collections; they start at 0 for every file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadataTable {
    /// Path relative to `project_path` when the file lives below it, absolute otherwise
    pub file_path: String,
    /// Project root, or empty when `file_path` is absolute
    pub project_path: String,
    pub expressions: Vec<ExpressionInfo>,
    pub styled_definitions: Vec<StyledDefinition>,
    pub components: Vec<ComponentInfo>,
}

impl FileMetadataTable {
    /// Creates the table for `filename`, splitting off `cwd` when the file lives below it
    pub fn for_file(filename: &str, cwd: Option<&str>) -> Self {
        let (project_path, file_path) = match cwd {
            Some(cwd) if !cwd.is_empty() && filename.starts_with(cwd) => {
                (cwd.to_string(), filename[cwd.len()..].to_string())
            }
            _ => (String::new(), filename.to_string()),
        };
        Self {
            file_path,
            project_path,
            ..Default::default()
        }
    }

    /// Registry key and prefix of every ID-keyed value
    pub fn full_path(&self) -> String {
        format!("{}{}", self.project_path, self.file_path)
    }

    pub fn add_expression(&mut self, expression: ExpressionInfo) -> usize {
        self.expressions.push(expression);
        self.expressions.len() - 1
    }

    pub fn add_styled(&mut self, styled: StyledDefinition) -> usize {
        self.styled_definitions.push(styled);
        self.styled_definitions.len() - 1
    }

    pub fn add_component(&mut self, component: ComponentInfo) -> usize {
        self.components.push(component);
        self.components.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty() && self.styled_definitions.is_empty()
    }

    /// Source location of the expression with the given ID
    pub fn expression_location(&self, id: usize) -> Option<SourceLocation> {
        self.expressions
            .get(id)
            .map(|e| self.location_of(&e.loc))
    }

    /// Source location of the styled definition with the given ID
    pub fn styled_location(&self, id: usize) -> Option<SourceLocation> {
        self.styled_definitions
            .get(id)
            .map(|s| self.location_of(&s.loc))
    }

    fn location_of(&self, loc: &SpanLocation) -> SourceLocation {
        SourceLocation::new(self.full_path(), loc.start.line, loc.start.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_file_inside_cwd() {
        let table = FileMetadataTable::for_file("/work/app/src/App.tsx", Some("/work/app"));
        assert_eq!(table.project_path, "/work/app");
        assert_eq!(table.file_path, "/src/App.tsx");
        assert_eq!(table.full_path(), "/work/app/src/App.tsx");
    }

    #[test]
    fn test_for_file_outside_cwd() {
        let table = FileMetadataTable::for_file("/other/App.tsx", Some("/work/app"));
        assert_eq!(table.project_path, "");
        assert_eq!(table.full_path(), "/other/App.tsx");
    }

    #[test]
    fn test_ids_are_sequential_per_collection() {
        let mut table = FileMetadataTable::for_file("/a.tsx", None);
        let loc = SpanLocation::new((1, 0), (1, 5));
        let e0 = table.add_expression(ExpressionInfo {
            name: "div".into(),
            loc,
            wrapping_component_id: None,
        });
        let s0 = table.add_styled(StyledDefinition {
            name: None,
            loc,
            html_tag: "div".into(),
        });
        let e1 = table.add_expression(ExpressionInfo {
            name: "span".into(),
            loc: SpanLocation::new((2, 4), (2, 9)),
            wrapping_component_id: Some(0),
        });
        assert_eq!((e0, e1, s0), (0, 1, 0));
        assert_eq!(
            table.expression_location(1),
            Some(SourceLocation::new("/a.tsx", 2, 4))
        );
        assert!(table.styled_location(3).is_none());
    }

    #[test]
    fn test_serialized_field_names() {
        let table = FileMetadataTable::for_file("/a.tsx", None);
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("\"filePath\""));
        assert!(json.contains("\"styledDefinitions\""));
    }
}
