use patchable_json_pointer::{
    format_json_pointer, parse_index, parse_json_pointer, Pointer, PointerError, APPEND_MARKER,
};

#[test]
fn pointer_parse_format_roundtrip_matrix() {
    let cases = ["", "/", "/foo", "/foo/bar", "/a~0b/c~1d", "/arr/0", "/~0/~1", "/arr/-"];

    for pointer in cases {
        let parsed = parse_json_pointer(pointer).expect("valid pointer");
        assert_eq!(format_json_pointer(parsed.segments()), pointer);
    }
}

#[test]
fn pointer_rejects_malformed_input() {
    assert_eq!(
        parse_json_pointer("tags/0"),
        Err(PointerError::MissingLeadingSlash)
    );
    assert!(matches!(
        parse_json_pointer("/a/~x"),
        Err(PointerError::InvalidEscape(_))
    ));
    assert!(matches!(
        "/ok/~".parse::<Pointer>(),
        Err(PointerError::InvalidEscape(_))
    ));
}

#[test]
fn pointer_relationships() {
    let from: Pointer = "/a/b".parse().expect("from");
    let nested: Pointer = "/a/b/c".parse().expect("nested");
    let sibling: Pointer = "/a/bb".parse().expect("sibling");

    assert!(from.is_prefix_of(&nested));
    assert!(from.is_parent_of(&nested));
    assert!(!from.is_prefix_of(&sibling));
    assert_eq!(nested.parent(), Some(from));
}

#[test]
fn pointer_index_steps() {
    let p = parse_json_pointer("/list/12/-").expect("pointer");
    assert_eq!(parse_index(&p.segments()[1]), Some(12));
    assert_eq!(p.last(), Some(APPEND_MARKER));
    assert_eq!(parse_index(APPEND_MARKER), None);
}
