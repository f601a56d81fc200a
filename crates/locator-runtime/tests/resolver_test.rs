use locator_runtime::{
    get_target_location, Document, LocationResolver, MetadataRegistry, NodeId, SourceLocation,
};

// C (b.tsx:1) > B (b.tsx:10) > A (a.tsx:3) > text
fn nested() -> (Document, NodeId, NodeId) {
    let mut doc = Document::new();
    let root = doc.root();
    let c = doc.append_element(root, "main", &[("data-locatorjs", "b.tsx:1:0")]);
    let b = doc.append_element(c, "section", &[("data-locatorjs", "b.tsx:10:2")]);
    let a = doc.append_element(b, "button", &[("data-locatorjs", "a.tsx:3:4")]);
    let text = doc.append_text(a, "Save");
    (doc, a, text)
}

#[test]
fn test_walk_collects_innermost_first() {
    let (doc, a, text) = nested();
    let resolver = LocationResolver::new();

    let locations = resolver.get_all_source_locations(&doc, text);
    let files: Vec<String> = locations
        .iter()
        .map(|entry| entry.location.to_string())
        .collect();
    assert_eq!(files, vec!["a.tsx:3:4", "b.tsx:10:2", "b.tsx:1:0"]);
    assert_eq!(locations[0].element, a);

    let element = get_target_location(&locations, false).unwrap();
    assert_eq!(element.location, SourceLocation::new("a.tsx", 3, 4));

    let parent = get_target_location(&locations, true).unwrap();
    assert_eq!(parent.location, SourceLocation::new("b.tsx", 10, 2));
}

#[test]
fn test_parent_falls_back_to_outermost_when_one_file() {
    let mut doc = Document::new();
    let root = doc.root();
    let outer = doc.append_element(root, "div", &[("data-locatorjs", "x.vue:1:0")]);
    let inner = doc.append_element(outer, "p", &[("data-locatorjs", "x.vue:2:2")]);

    let locations = LocationResolver::new().get_all_source_locations(&doc, inner);
    let parent = get_target_location(&locations, true).unwrap();
    assert_eq!(parent.element, outer);
}

#[test]
fn test_walk_crosses_shadow_boundary() {
    let mut doc = Document::new();
    let root = doc.root();
    let host = doc.append_element(root, "my-widget", &[("data-locatorjs", "page.tsx:7:6")]);
    let shadow = doc.attach_shadow(host);
    let inner = doc.append_element(shadow, "span", &[]);

    let locations = LocationResolver::new().get_all_source_locations(&doc, inner);
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].element, host);
    assert_eq!(locations[0].location, SourceLocation::new("page.tsx", 7, 6));
}

#[test]
fn test_no_locations_for_plain_tree() {
    let mut doc = Document::new();
    let root = doc.root();
    let div = doc.append_element(root, "div", &[("class", "x")]);

    let locations = LocationResolver::new().get_all_source_locations(&doc, div);
    assert!(locations.is_empty());
    assert!(get_target_location(&locations, true).is_none());
}

#[test]
fn test_registry_lookup_through_id_attributes() {
    let json = r#"{
        "filePath": "/src/Card.tsx",
        "projectPath": "/work",
        "expressions": [
            {"name": "div", "loc": {"start": {"line": 5, "column": 4}, "end": {"line": 5, "column": 20}}, "wrappingComponentId": null}
        ],
        "styledDefinitions": [],
        "components": []
    }"#;
    let mut registry = MetadataRegistry::new();
    registry.register_json(json).unwrap();

    let mut doc = Document::new();
    let root = doc.root();
    let div = doc.append_element(root, "div", &[("data-locatorjs-id", "/work/src/Card.tsx::0")]);

    let plain = LocationResolver::new();
    assert!(plain.get_all_source_locations(&doc, div).is_empty());

    let resolver = LocationResolver::new().with_registry(registry);
    let locations = resolver.get_all_source_locations(&doc, div);
    assert_eq!(
        locations[0].location,
        SourceLocation::new("/work/src/Card.tsx", 5, 4)
    );
}
