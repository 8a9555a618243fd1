use super::*;

#[test]
fn test_offsets_map_to_lines_and_columns() {
    let source = "let a;\nlet bb;\r\nlet c;";
    let map = LineMap::build(source);

    assert_eq!(map.line_count(), 3);
    assert_eq!(map.offset_to_position(0, source), Position::new(0, 0));
    assert_eq!(map.offset_to_position(4, source), Position::new(0, 4));
    assert_eq!(map.offset_to_position(7, source), Position::new(1, 0));
    assert_eq!(map.offset_to_position(16, source), Position::new(2, 0));
}

#[test]
fn test_line_text_strips_terminators() {
    let source = "first\r\nsecond\nthird";
    let map = LineMap::build(source);

    assert_eq!(map.line_text(0, source), Some("first"));
    assert_eq!(map.line_text(1, source), Some("second"));
    assert_eq!(map.line_text(2, source), Some("third"));
    assert_eq!(map.line_text(3, source), None);
}

#[test]
fn test_lone_carriage_return_starts_a_line() {
    let source = "a\rb";
    let map = LineMap::build(source);
    assert_eq!(map.offset_to_position(2, source), Position::new(1, 0));
}
