use super::*;
use crate::{
    codec::{CodecError, Color32},
    config::MappingOptions,
    error::MappingError,
    leaf::LeafState,
    obs::{metrics_report, metrics_reset_all},
    ownership::{Element, ElementId},
    test_fixtures::{Board, Chain, Frame, Pin, Shade},
    tree::{Node, QName},
};
use kmlmap_derive::Element;

///
/// Gauge
///

#[derive(Debug, Default, Element)]
struct Gauge {
    #[kml(id)]
    id: ElementId,

    #[kml(default = "2", suppress_default)]
    count: i32,
}

///
/// Series
///

#[derive(Debug, Default, Element)]
struct Series {
    #[kml(id)]
    id: ElementId,

    #[kml(name = "value")]
    values: Vec<u32>,
}

fn names(node: &Node) -> Vec<&str> {
    node.children().iter().map(|c| c.name.local.as_str()).collect()
}

fn board_with_pins(weights: &[i32]) -> Board {
    let mut board = Board::default();
    let owner = board.id;
    for weight in weights {
        board
            .pins
            .push(owner, Element::new(Pin::weighted(*weight)))
            .unwrap();
    }

    board
}

fn pin_node(weight: &str) -> Node {
    Node::branch("Pin", vec![Node::leaf("weight", weight)])
}

///
/// Serialize
///

#[test]
fn unset_properties_emit_nothing() {
    let node = serialize(&Board::default()).unwrap();

    assert_eq!(node.name, QName::local("Board"));
    assert!(node.children().is_empty());
}

#[test]
fn entries_follow_order_keys_not_assignment_order() {
    let mut board = board_with_pins(&[1]);
    board.lines.set(5);
    board.title.set("Field notes".into());

    let node = serialize(&board).unwrap();
    assert_eq!(names(&node), ["title", "Pin", "lines"]);

    let entries = entries(&board).unwrap();
    let orders: Vec<_> = entries.iter().map(|e| e.order).collect();
    assert_eq!(orders, [1, 3, 4]);
    // catch-all members carry their own names
    assert!(entries[1].name.is_none());
}

#[test]
fn scalar_collections_emit_one_element_per_value() {
    let mut pin = Pin::weighted(2);
    pin.tags = vec!["b".into(), "a".into(), "b".into()];

    let node = serialize(&pin).unwrap();
    let tags: Vec<_> = node
        .children()
        .iter()
        .filter(|c| c.name.local == "tag")
        .filter_map(Node::text_content)
        .collect();

    assert_eq!(tags, ["b", "a", "b"]);
}

#[test]
fn suppressed_defaults_are_skipped_by_value() {
    let mut pin = Pin::weighted(0);

    pin.shade.set(Shade::Light);
    assert!(serialize(&pin).unwrap().child("shade").is_none());

    pin.shade.set(Shade::PitchBlack);
    let node = serialize(&pin).unwrap();
    assert_eq!(
        node.child("shade").and_then(Node::text_content),
        Some("pitch-black")
    );
}

#[test]
fn explicit_default_values_are_written() {
    let mut board = Board::default();
    board.color.set(Color32::WHITE);

    let node = serialize(&board).unwrap();
    assert_eq!(
        node.child("bgColor").and_then(Node::text_content),
        Some("ffffffff")
    );
}

#[test]
fn materialized_defaults_fill_unset_scalars() {
    let options = MappingOptions::default().with_materialize_defaults(true);
    let node = serialize_with_options(&Board::default(), options).unwrap();

    assert_eq!(names(&node), ["bgColor", "lines"]);
    assert_eq!(node.child("lines").and_then(Node::text_content), Some("2"));

    // suppressed defaults stay out
    let pin = serialize_with_options(&Pin::weighted(1), options).unwrap();
    assert_eq!(names(&pin), ["weight"]);
}

#[test]
fn named_composites_take_the_property_name() {
    let mut board = Board::default();
    let owner = board.id;
    board
        .cover
        .set(owner, Element::new(Pin::weighted(9)))
        .unwrap();

    let node = serialize(&board).unwrap();
    let cover = node.child("cover").unwrap();

    assert_eq!(cover.child("weight").and_then(Node::text_content), Some("9"));
    assert!(node.child("Pin").is_none());
}

#[test]
fn write_depth_is_bounded() {
    let options = MappingOptions::default().with_max_depth(4);

    assert!(serialize_with_options(&Chain::of_length(4), options).is_ok());
    assert_eq!(
        serialize_with_options(&Chain::of_length(5), options),
        Err(MappingError::DepthExceeded { limit: 4 })
    );
}

#[test]
fn equivalence_compares_serialized_trees() {
    let a = board_with_pins(&[1, 2]);
    let b = board_with_pins(&[1, 2]);
    let c = board_with_pins(&[2, 1]);

    assert!(equivalent(&a, &b).unwrap());
    assert!(!equivalent(&a, &c).unwrap());
}

///
/// Deserialize
///

#[test]
fn round_trip_preserves_values_and_order() {
    let mut board = board_with_pins(&[3, 1, 2]);
    board.title.set("Trail".into());
    board.color.set(Color32::new(0xff, 0x00, 0x80, 0x10));
    board.pins.get(1).unwrap().write().label.set("middle".into());

    let tree = serialize(&board).unwrap();
    let decoded = deserialize::<Board>(&tree).unwrap();

    assert!(decoded.is_clean());
    assert!(equivalent(&board, &decoded.value).unwrap());

    let weights: Vec<_> = decoded.value.pins.iter().map(|p| p.read().weight).collect();
    assert_eq!(weights, [3, 1, 2]);
}

#[test]
fn decoded_children_belong_to_the_new_parent() {
    let tree = Node::branch("Board", vec![pin_node("1"), pin_node("2")]);
    let board = deserialize::<Board>(&tree).unwrap().into_value();

    for pin in &board.pins {
        assert_eq!(pin.owner(), Some(board.id));
    }
}

#[test]
fn unknown_elements_are_ignored() {
    let tree = Node::branch(
        "Board",
        vec![
            Node::leaf("atom:author", "someone"),
            Node::leaf("title", "Kept"),
            Node::branch("Folder", vec![Node::leaf("name", "x")]),
        ],
    );

    let decoded = deserialize::<Board>(&tree).unwrap();
    assert!(decoded.is_clean());
    assert_eq!(decoded.value.title.get().map(String::as_str), Some("Kept"));
}

#[test]
fn optional_decode_failures_become_warnings() {
    let tree = Node::branch(
        "Board",
        vec![Node::leaf("bgColor", "not-a-color"), Node::leaf("lines", "4")],
    );

    let decoded = deserialize::<Board>(&tree).unwrap();
    assert!(!decoded.value.color.is_set());
    assert_eq!(decoded.value.lines.get(), Some(&4));

    let [warning] = decoded.warnings.as_slice() else {
        panic!("expected one warning, got {:?}", decoded.warnings);
    };
    assert_eq!(warning.path, "Board.bgColor");
    assert_eq!(warning.element, "bgColor");
    assert!(matches!(
        warning.kind,
        WarningKind::Decode(CodecError::MalformedValue { .. })
    ));
}

#[test]
fn unrecognized_tokens_warn_and_leave_the_leaf_unset() {
    let tree = Node::branch(
        "Pin",
        vec![Node::leaf("weight", "1"), Node::leaf("shade", "purple")],
    );

    let decoded = deserialize::<Pin>(&tree).unwrap();
    assert!(!decoded.value.shade.is_set());
    assert_eq!(decoded.warnings[0].path, "Pin.shade");
    assert!(matches!(
        decoded.warnings[0].kind,
        WarningKind::Decode(CodecError::UnrecognizedToken { .. })
    ));
}

#[test]
fn leaf_state_distinguishes_unset_from_default() {
    let absent = deserialize::<Board>(&Node::branch("Board", vec![]))
        .unwrap()
        .into_value();
    let explicit = deserialize::<Board>(&Node::branch("Board", vec![Node::leaf("lines", "2")]))
        .unwrap()
        .into_value();

    assert_eq!(absent.lines.state(Some(&2)), LeafState::Unset);
    assert_eq!(absent.lines.value_or(2), 2);
    assert_eq!(explicit.lines.state(Some(&2)), LeafState::Default);
}

#[test]
fn missing_required_scalar_fails() {
    let err = deserialize::<Pin>(&Node::branch("Pin", vec![])).unwrap_err();

    assert_eq!(
        err,
        MappingError::MissingRequired {
            element: "Pin",
            property: "weight",
        }
    );
}

#[test]
fn missing_required_scalar_assumes_its_default() {
    let gauge = Gauge {
        count: 2,
        ..Gauge::default()
    };

    let node = serialize(&gauge).unwrap();
    assert!(node.children().is_empty());

    let decoded = deserialize::<Gauge>(&node).unwrap();
    assert!(decoded.is_clean());
    assert_eq!(decoded.value.count, 2);

    let tree = Node::branch("Gauge", vec![Node::leaf("count", "5")]);
    assert_eq!(deserialize::<Gauge>(&tree).unwrap().value.count, 5);
}

#[test]
fn undecodable_required_scalar_fails() {
    let err = deserialize::<Pin>(&pin_node("heavy")).unwrap_err();

    assert!(matches!(
        err,
        MappingError::RequiredValue {
            element: "Pin",
            property: "weight",
            ..
        }
    ));
}

#[test]
fn missing_required_composite_fails() {
    let err = deserialize::<Frame>(&Node::branch("Frame", vec![])).unwrap_err();

    assert_eq!(
        err,
        MappingError::MissingRequired {
            element: "Frame",
            property: "pin",
        }
    );

    let tree = Node::branch("Frame", vec![pin_node("1")]);
    assert!(deserialize::<Frame>(&tree).unwrap().value.pin.is_some());
}

#[test]
fn failing_children_are_dropped_with_a_warning() {
    let tree = Node::branch(
        "Board",
        vec![
            Node::branch("Pin", vec![Node::leaf("label", "no weight")]),
            pin_node("2"),
        ],
    );

    let decoded = deserialize::<Board>(&tree).unwrap();
    assert_eq!(decoded.value.pins.len(), 1);

    let warning = &decoded.warnings[0];
    assert_eq!(warning.path, "Board.Pin[0]");
    assert!(matches!(
        &warning.kind,
        WarningKind::ChildRejected(err)
            if **err == (MappingError::MissingRequired { element: "Pin", property: "weight" })
    ));
}

#[test]
fn nested_warnings_carry_collection_indexes() {
    let tree = Node::branch(
        "Board",
        vec![
            pin_node("1"),
            Node::branch(
                "Pin",
                vec![Node::leaf("weight", "2"), Node::leaf("shade", "grey")],
            ),
        ],
    );

    let decoded = deserialize::<Board>(&tree).unwrap();
    assert_eq!(decoded.warnings[0].path, "Board.Pin[1].shade");
}

#[test]
fn scalar_collection_warnings_carry_member_indexes() {
    let tree = Node::branch(
        "Series",
        vec![
            Node::leaf("value", "1"),
            Node::leaf("value", "minus one"),
            Node::leaf("value", "3"),
        ],
    );

    let decoded = deserialize::<Series>(&tree).unwrap();
    assert_eq!(decoded.value.values, [1, 3]);

    let [warning] = decoded.warnings.as_slice() else {
        panic!("expected one warning, got {:?}", decoded.warnings);
    };
    assert_eq!(warning.path, "Series.value[1]");
    assert_eq!(warning.element, "value");
}

#[test]
fn named_and_catch_all_composites_resolve_separately() {
    let tree = Node::branch(
        "Board",
        vec![
            Node::branch("cover", vec![Node::leaf("weight", "7")]),
            pin_node("1"),
        ],
    );

    let board = deserialize::<Board>(&tree).unwrap().into_value();
    assert_eq!(board.pins.len(), 1);
    assert_eq!(board.cover.get().map(|p| p.read().weight), Some(7));
}

#[test]
fn root_name_is_checked_unless_disabled() {
    let tree = pin_node("1");

    assert_eq!(
        deserialize::<Frame>(&tree).unwrap_err(),
        MappingError::UnexpectedRoot {
            expected: "Frame",
            found: "Pin".into(),
        }
    );

    let lenient = MappingOptions::default().with_check_root_name(false);
    let board = deserialize_with_options::<Board>(&tree, lenient).unwrap();
    assert!(board.value.pins.is_empty());
}

#[test]
fn read_depth_is_bounded_and_not_swallowed() {
    let options = MappingOptions::default().with_max_depth(4);
    let tree = serialize(&Chain::of_length(6)).unwrap();

    assert_eq!(
        deserialize_with_options::<Chain>(&tree, options).unwrap_err(),
        MappingError::DepthExceeded { limit: 4 }
    );

    let short = serialize(&Chain::of_length(4)).unwrap();
    assert!(deserialize_with_options::<Chain>(&short, options).is_ok());
}

#[test]
fn warnings_serialize_as_text() {
    let tree = Node::branch("Board", vec![Node::leaf("lines", "-1")]);
    let decoded = deserialize::<Board>(&tree).unwrap();

    let json = serde_json::to_value(&decoded.warnings).unwrap();
    assert_eq!(json[0]["path"], "Board.lines");
    assert!(json[0]["kind"]["Decode"].is_string());
}

///
/// Metrics
///

#[test]
fn calls_are_counted_per_type() {
    metrics_reset_all();

    let tree = serialize(&board_with_pins(&[1, 2])).unwrap();
    deserialize::<Board>(&tree).unwrap();

    let report = metrics_report();
    let board = report.for_type("Board").unwrap();
    assert_eq!(board.serialize_calls, 1);
    assert_eq!(board.deserialize_calls, 1);
    assert_eq!(board.entries_written, 2);
}
