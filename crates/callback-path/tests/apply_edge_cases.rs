use callback_path::{ApplyError, CallbackSpec, Handler, Node, PathStep, Record};
use indexmap::IndexMap;
use serde_json::json;

fn map(entries: Vec<(&str, Node)>) -> Node {
    Node::Map(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<IndexMap<_, _>>(),
    )
}

#[test]
fn seq_of_one_empty_slot() {
    let h = Handler::new(|_| {});
    let mut tree = Node::Seq(vec![Node::empty_slot()]);

    CallbackSpec::new(vec![PathStep::Index(0)], h.clone())
        .apply(&mut tree)
        .unwrap();

    assert_eq!(tree, Node::Seq(vec![Node::slot(Node::Callback(h))]));
}

#[test]
fn nested_map_key_is_created() {
    let h = Handler::new(|_| {});
    let mut tree = map(vec![("a", map(vec![]))]);

    CallbackSpec::new(vec![PathStep::from("a"), PathStep::from("b")], h.clone())
        .apply(&mut tree)
        .unwrap();

    assert_eq!(tree, map(vec![("a", map(vec![("b", Node::Callback(h))]))]));
}

#[test]
fn record_field_resolves_regardless_of_leading_case() {
    let h = Handler::new(|_| {});
    let mut tree = Node::Record(Record::with_fields([("Name", Node::empty_slot())]));

    CallbackSpec::new(vec![PathStep::from("name")], h.clone())
        .apply(&mut tree)
        .unwrap();

    let Node::Record(record) = &tree else {
        panic!("tree should still be a record");
    };
    assert_eq!(record.field("Name"), Some(&Node::slot(Node::Callback(h))));
}

#[test]
fn empty_path_against_seq_is_too_short() {
    let mut tree = Node::Seq(vec![Node::empty_slot()]);
    let err = CallbackSpec::new(vec![], Handler::new(|_| {}))
        .apply(&mut tree)
        .unwrap_err();

    assert!(matches!(err, ApplyError::PathTooShort(_)));
}

#[test]
fn vanished_target_is_a_success_without_mutation() {
    let mut tree = map(vec![]);
    let before = tree.clone();

    CallbackSpec::new(
        vec![PathStep::from("missing"), PathStep::from("x")],
        Handler::new(|_| {}),
    )
    .apply(&mut tree)
    .unwrap();

    assert_eq!(tree, before);
}

#[test]
fn one_message_yields_many_placeholders() {
    // The expected usage: several units applied sequentially against the
    // same tree, each addressing a disjoint position.
    let on_open = Handler::new(|_| {});
    let on_close = Handler::new(|_| {});
    let mut tree = map(vec![
        (
            "handlers",
            map(vec![("open", Node::empty_slot()), ("close", Node::empty_slot())]),
        ),
        ("id", Node::Scalar(json!(7))),
    ]);

    let units = vec![
        CallbackSpec::new(
            vec![PathStep::from("handlers"), PathStep::from("open")],
            on_open.clone(),
        ),
        CallbackSpec::new(
            vec![PathStep::from("handlers"), PathStep::from("close")],
            on_close.clone(),
        ),
    ];
    for unit in &units {
        unit.apply(&mut tree).unwrap();
    }

    assert_eq!(
        tree,
        map(vec![
            (
                "handlers",
                map(vec![
                    ("open", Node::Callback(on_open)),
                    ("close", Node::Callback(on_close)),
                ]),
            ),
            ("id", Node::Scalar(json!(7))),
        ])
    );
}

#[test]
fn skip_and_continue_after_a_failed_unit() {
    // One bad unit in a batch does not poison the tree for the rest.
    let h = Handler::new(|_| {});
    let mut tree = Node::Seq(vec![Node::Scalar(json!("text")), Node::empty_slot()]);

    let bad = CallbackSpec::new(vec![PathStep::from("nope")], Handler::new(|_| {}));
    assert!(bad.apply(&mut tree).is_err());

    CallbackSpec::new(vec![PathStep::Index(1)], h.clone())
        .apply(&mut tree)
        .unwrap();

    assert_eq!(
        tree,
        Node::Seq(vec![
            Node::Scalar(json!("text")),
            Node::slot(Node::Callback(h)),
        ])
    );
}

#[test]
fn installed_handler_is_invokable() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let h = Handler::new(move |args| {
        sink.borrow_mut().push(args.len());
    });

    let mut tree = Node::Seq(vec![Node::empty_slot()]);
    CallbackSpec::new(vec![PathStep::Index(0)], h)
        .apply(&mut tree)
        .unwrap();

    let Node::Seq(items) = &tree else {
        panic!("tree should still be a sequence");
    };
    let Node::Slot(Some(held)) = &items[0] else {
        panic!("slot should hold the installed value");
    };
    let Node::Callback(installed) = &**held else {
        panic!("held value should be the callback");
    };
    installed.call(&[Node::Scalar(json!(1)), Node::Scalar(json!(2))]);

    assert_eq!(*seen.borrow(), vec![2]);
}

#[test]
fn callback_leaf_wins_over_remaining_steps() {
    // Reaching a function-shaped node ends the walk even though the path
    // wanted to go deeper. Deliberate: functions are leaves.
    let old = Handler::new(|_| {});
    let new = Handler::new(|_| {});
    let mut tree = map(vec![("cb", Node::Callback(old))]);

    CallbackSpec::new(
        vec![
            PathStep::from("cb"),
            PathStep::from("deeper"),
            PathStep::Index(3),
        ],
        new.clone(),
    )
    .apply(&mut tree)
    .unwrap();

    assert_eq!(tree, map(vec![("cb", Node::Callback(new))]));
}

#[test]
fn deep_mixed_tree() {
    let h = Handler::new(|_| {});
    let mut tree = map(vec![(
        "method",
        Node::Indirect(Box::new(Node::Seq(vec![
            Node::Scalar(json!("auth")),
            Node::slot(Node::Record(Record::with_fields([(
                "OnSuccess",
                Node::empty_slot(),
            )]))),
        ]))),
    )]);

    CallbackSpec::new(
        vec![
            PathStep::from("method"),
            PathStep::from("1"),
            PathStep::from("onSuccess"),
        ],
        h.clone(),
    )
    .apply(&mut tree)
    .unwrap();

    assert_eq!(
        tree,
        map(vec![(
            "method",
            Node::Indirect(Box::new(Node::Seq(vec![
                Node::Scalar(json!("auth")),
                Node::slot(Node::Record(Record::with_fields([(
                    "OnSuccess",
                    Node::slot(Node::Callback(h)),
                )]))),
            ]))),
        )])
    );
}
