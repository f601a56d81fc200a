use locator_core::{decode, encode, LineIndex, SourceLocation};

#[test]
fn round_trip_holds_for_common_path_shapes() {
    let paths = [
        "/src/App.tsx",
        "src/components/Card.vue",
        "C:\\Users\\dev\\app\\src\\main.ts",
        "C:/Users/dev/app/src/main.ts",
        "webpack-internal:///./src/page.tsx",
        "/src/with space/x.component.html",
        "/src/ünïcødé.tsx",
    ];

    for path in paths {
        for (line, column) in [(1, 0), (12, 4), (9999, 120)] {
            let decoded = decode(&encode(path, line, column))
                .unwrap_or_else(|| panic!("failed to decode {path}"));
            assert_eq!(decoded, SourceLocation::new(path, line, column));
        }
    }
}

#[test]
fn encoded_matches_display() {
    let loc = SourceLocation::new("/x.vue", 3, 2);
    assert_eq!(loc.encoded(), loc.to_string());
    assert_eq!(loc.encoded(), "/x.vue:3:2");
}

#[test]
fn line_index_agrees_with_manual_counting() {
    let source = "<div>\n  <span>\n    hi\n  </span>\n</div>";
    let index = LineIndex::new(source);
    let span_offset = source.find("<span>").unwrap();
    assert_eq!(index.location(source, span_offset), (2, 2));
    let closing = source.rfind("</div>").unwrap();
    assert_eq!(index.location(source, closing), (5, 0));
}
