use kmlmap::{
    describe,
    descriptor::{ElementDescriptor, Multiplicity},
    dom::{ItemIcon, ListStyle},
};
use serde_json::json;

#[test]
fn list_style_table_in_order() {
    let table = describe::<ListStyle>().unwrap();
    let rows: Vec<_> = table
        .elements()
        .map(|e| (e.order, e.label(), e.multiplicity))
        .collect();

    assert_eq!(
        rows,
        [
            (1, "listItemType", Multiplicity::SingleOptional),
            (2, "bgColor", Multiplicity::SingleOptional),
            (3, "item_icons", Multiplicity::OrderedCollection),
            (4, "maxSnippetLines", Multiplicity::SingleOptional),
        ]
    );
    assert!(table.get("item_icons").unwrap().descriptor.is_catch_all());
}

#[test]
fn tables_dump_as_json() {
    let table = describe::<ItemIcon>().unwrap();
    let dump = serde_json::to_value(table.elements().collect::<Vec<&ElementDescriptor>>()).unwrap();

    assert_eq!(
        dump,
        json!([
            {
                "ident": "state",
                "name": "state",
                "namespace": null,
                "order": 1,
                "index": 0,
                "multiplicity": "SingleOptional",
                "kind": "scalar",
                "tag": "itemIconState",
                "default": null,
                "suppress_default": false,
            },
            {
                "ident": "href",
                "name": "href",
                "namespace": null,
                "order": 2,
                "index": 1,
                "multiplicity": "SingleOptional",
                "kind": "scalar",
                "tag": "string",
                "default": null,
                "suppress_default": false,
            },
        ])
    );
}

#[test]
fn declared_defaults_are_canonical() {
    let table = describe::<ListStyle>().unwrap();
    let defaults: Vec<_> = table
        .elements()
        .filter_map(|e| e.default.as_deref().map(|d| (e.label(), d)))
        .collect();

    assert_eq!(defaults, [("bgColor", "ffffffff"), ("maxSnippetLines", "2")]);
}
