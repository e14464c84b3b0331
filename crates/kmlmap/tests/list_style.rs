use kmlmap::{
    deserialize,
    dom::{ItemIcon, ItemIconStates, ListItemType, ListStyle},
    engine::{WarningKind, equivalent},
    prelude::*,
    serialize,
};

fn names(node: &Node) -> Vec<&str> {
    node.children().iter().map(|c| c.name.local.as_str()).collect()
}

fn icon(state: ItemIconStates, href: &str) -> Element<ItemIcon> {
    Element::new(ItemIcon::new(state, href))
}

#[test]
fn only_the_icon_collection_is_written_when_scalars_are_unset() {
    let mut style = ListStyle::default();
    style
        .add_item_icon(icon(ItemIconStates::OPEN, "open.png"))
        .unwrap();
    style
        .add_item_icon(icon(ItemIconStates::CLOSED, "closed.png"))
        .unwrap();

    let node = serialize(&style).unwrap();

    assert_eq!(node.name.local, "ListStyle");
    assert_eq!(names(&node), ["ItemIcon", "ItemIcon"]);

    let hrefs: Vec<_> = node
        .children()
        .iter()
        .filter_map(|icon| icon.child("href").and_then(Node::text_content))
        .collect();
    assert_eq!(hrefs, ["open.png", "closed.png"]);
}

#[test]
fn snippet_lines_equal_to_the_default_are_suppressed() {
    let mut style = ListStyle::default();
    assert!(serialize(&style).unwrap().child("maxSnippetLines").is_none());

    style.maximum_snippet_lines.set(2);
    assert!(serialize(&style).unwrap().child("maxSnippetLines").is_none());

    style.maximum_snippet_lines.set(5);
    let node = serialize(&style).unwrap();
    assert_eq!(
        node.child("maxSnippetLines").and_then(Node::text_content),
        Some("5")
    );
}

#[test]
fn entries_are_ordered_by_key_whatever_the_assignment_order() {
    let mut style = ListStyle::default();
    style.maximum_snippet_lines.set(7);
    style
        .add_item_icon(icon(ItemIconStates::ERROR, "error.png"))
        .unwrap();
    style.background_color.set(Color32::BLACK);
    style.item_type.set(ListItemType::RadioFolder);

    let node = serialize(&style).unwrap();
    assert_eq!(
        names(&node),
        ["listItemType", "bgColor", "ItemIcon", "maxSnippetLines"]
    );
    assert_eq!(
        node.child("listItemType").and_then(Node::text_content),
        Some("radioFolder")
    );
    assert_eq!(
        node.child("bgColor").and_then(Node::text_content),
        Some("ff000000")
    );
}

#[test]
fn styles_round_trip() {
    let mut style = ListStyle::default();
    style.item_type.set(ListItemType::CheckOffOnly);
    style
        .add_item_icon(icon(
            ItemIconStates::FETCHING0 | ItemIconStates::FETCHING1,
            "busy.png",
        ))
        .unwrap();
    style.maximum_snippet_lines.set(3);

    let decoded = deserialize::<ListStyle>(&serialize(&style).unwrap()).unwrap();
    assert!(decoded.is_clean());

    let copy = decoded.into_value();
    assert!(equivalent(&style, &copy).unwrap());

    let states = copy.item_icons().get(0).map(|icon| icon.read().state.get().copied());
    assert_eq!(
        states,
        Some(Some(ItemIconStates::FETCHING0 | ItemIconStates::FETCHING1))
    );
    for icon in copy.item_icons() {
        assert_eq!(icon.owner(), Some(copy.id()));
    }
}

#[test]
fn unknown_elements_are_skipped_silently() {
    let tree = Node::branch(
        "ListStyle",
        vec![
            Node::leaf("listItemType", "check"),
            Node::leaf("gx:sparkle", "1"),
        ],
    );

    let decoded = deserialize::<ListStyle>(&tree).unwrap();
    assert!(decoded.is_clean());
    assert_eq!(decoded.value.item_type.get(), Some(&ListItemType::Check));
}

#[test]
fn bad_icon_state_is_reported_with_its_path() {
    let tree = Node::branch(
        "ListStyle",
        vec![
            Node::branch("ItemIcon", vec![Node::leaf("state", "open")]),
            Node::branch(
                "ItemIcon",
                vec![Node::leaf("state", "ajar"), Node::leaf("href", "x.png")],
            ),
        ],
    );

    let decoded = deserialize::<ListStyle>(&tree).unwrap();
    let style = &decoded.value;

    // the icon survives, only its state is dropped
    assert_eq!(style.item_icons().len(), 2);
    let second = style.item_icons().get(1).unwrap().read();
    assert!(!second.state.is_set());
    assert_eq!(second.href.get().map(String::as_str), Some("x.png"));

    let [warning] = decoded.warnings.as_slice() else {
        panic!("expected one warning, got {:?}", decoded.warnings);
    };
    assert_eq!(warning.path, "ListStyle.ItemIcon[1].state");
    assert!(matches!(warning.kind, WarningKind::Decode(_)));
}

#[test]
fn unset_and_default_are_distinguishable_after_reading() {
    let absent = deserialize::<ListStyle>(&Node::branch("ListStyle", vec![]))
        .unwrap()
        .into_value();
    let explicit = deserialize::<ListStyle>(&Node::branch(
        "ListStyle",
        vec![Node::leaf("maxSnippetLines", "2")],
    ))
    .unwrap()
    .into_value();

    let default = ListStyle::DEFAULT_MAXIMUM_SNIPPET_LINES;
    assert_eq!(
        absent.maximum_snippet_lines.state(Some(&default)),
        LeafState::Unset
    );
    assert_eq!(
        explicit.maximum_snippet_lines.state(Some(&default)),
        LeafState::Default
    );
    assert_eq!(
        absent.effective_maximum_snippet_lines(),
        explicit.effective_maximum_snippet_lines()
    );
}
