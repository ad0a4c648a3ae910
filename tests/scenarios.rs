use spark_bindings::{
    bind, configure, install, record, resolve_read, resolve_write, Error, Record, RuntimeConfig,
    Value,
};
use std::cell::RefCell;
use std::rc::Rc;

fn recorder() -> (Rc<RefCell<Vec<Value>>>, impl FnMut(&Value) + 'static) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    (seen, move |v: &Value| log.borrow_mut().push(v.clone()))
}

#[test]
fn scenario_a_name_change_and_same_value_write() {
    let root = record! { "user" => record! { "name" => "Ann", "age" => 30 } };
    install(&root);

    let (seen, reaction) = recorder();
    let _binding = bind(&root, "user.name", reaction).unwrap();

    resolve_write(&root, "user.name", "Bea").unwrap();
    assert_eq!(*seen.borrow(), vec![Value::from("Bea")]);

    resolve_write(&root, "user.age", 30).unwrap();
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn scenario_b_sequential_counter_writes() {
    let root = record! { "count" => 0 };
    install(&root);

    let (seen, reaction) = recorder();
    let _binding = bind(&root, "count", reaction).unwrap();

    for i in 1..=10 {
        resolve_write(&root, "count", i).unwrap();
    }

    let expected: Vec<Value> = (1..=10).map(Value::from).collect();
    assert_eq!(*seen.borrow(), expected);
}

#[test]
fn scenario_c_replacing_a_sub_record() {
    let root = record! { "a" => record! { "b" => record! { "c" => 1 } } };
    install(&root);

    let (old_seen, old_reaction) = recorder();
    let _old = bind(&root, "a.b.c", old_reaction).unwrap();

    resolve_write(&root, "a.b", record! { "c" => 2 }).unwrap();
    assert_eq!(*old_seen.borrow(), vec![Value::from(2)]);

    let (new_seen, new_reaction) = recorder();
    let fresh = bind(&root, "a.b.c", new_reaction).unwrap();
    assert_eq!(fresh.value(), Value::from(2));
    assert!(new_seen.borrow().is_empty());

    resolve_write(&root, "a.b.c", 3).unwrap();
    assert_eq!(*new_seen.borrow(), vec![Value::from(3)]);
    assert_eq!(*old_seen.borrow(), vec![Value::from(2), Value::from(3)]);
}

#[test]
fn detached_sub_record_no_longer_drives_bindings() {
    let old_b = record! { "c" => 1 };
    let root = record! { "a" => record! { "b" => old_b.clone() } };
    install(&root);

    let (seen, reaction) = recorder();
    let _binding = bind(&root, "a.b.c", reaction).unwrap();

    resolve_write(&root, "a.b", record! { "c" => 2 }).unwrap();
    assert_eq!(seen.borrow().len(), 1);

    // the old record still notifies, but the binding re-reads the new one
    old_b.set("c", 99).unwrap();
    assert_eq!(*seen.borrow(), vec![Value::from(2)]);
}

#[test]
fn registry_persists_across_value_identity() {
    let root = record! { "a" => record! { "x" => 1 } };
    install(&root);
    let registry = root.property("a").unwrap().registry().unwrap();

    resolve_write(&root, "a", record! { "x" => 2 }).unwrap();
    assert!(Rc::ptr_eq(
        &registry,
        &root.property("a").unwrap().registry().unwrap()
    ));
}

#[test]
fn same_record_written_back_is_a_no_op() {
    let inner = record! { "x" => 1 };
    let root = record! { "a" => inner.clone() };
    install(&root);

    let (seen, reaction) = recorder();
    let _binding = bind(&root, "a", reaction).unwrap();

    resolve_write(&root, "a", inner.clone()).unwrap();
    assert!(seen.borrow().is_empty());

    // structurally equal but distinct: a change
    resolve_write(&root, "a", record! { "x" => 1 }).unwrap();
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn sequence_elements_are_reactive() {
    let todo = record! { "done" => false };
    let root = record! {
        "list" => record! { "first" => todo.clone() },
        "items" => spark_bindings::sequence![todo.clone()],
    };
    install(&root);

    let (seen, reaction) = recorder();
    let _binding = bind(&root, "list.first.done", reaction).unwrap();

    // write through the sequence's element directly
    let items = root.peek("items").unwrap();
    let element = items.as_sequence().unwrap().get(0).unwrap();
    element.as_record().unwrap().set("done", true).unwrap();

    assert_eq!(*seen.borrow(), vec![Value::from(true)]);
}

#[test]
fn graph_from_json_is_reactive_after_install() {
    let value = Value::from_json(serde_json::json!({ "user": { "name": "Ann" } }));
    let root: Record = value.as_record().unwrap().clone();
    install(&root);

    let (seen, reaction) = recorder();
    let _binding = bind(&root, "user.name", reaction).unwrap();
    resolve_write(&root, "user.name", "Bea").unwrap();

    assert_eq!(*seen.borrow(), vec![Value::from("Bea")]);
    assert_eq!(
        Value::from(root).to_json(),
        serde_json::json!({ "user": { "name": "Bea" } })
    );
}

#[test]
fn two_bindings_on_one_path_both_react() {
    let root = record! { "title" => "a" };
    install(&root);

    let (first, r1) = recorder();
    let (second, r2) = recorder();
    let _b1 = bind(&root, "title", r1).unwrap();
    let _b2 = bind(&root, "title", r2).unwrap();

    resolve_write(&root, "title", "b").unwrap();
    assert_eq!(*first.borrow(), vec![Value::from("b")]);
    assert_eq!(*second.borrow(), vec![Value::from("b")]);
    assert_eq!(resolve_read(&root, "title").unwrap(), Value::from("b"));
}

#[test]
fn reaction_writing_another_property_cascades() {
    let root = record! { "celsius" => 0, "fahrenheit" => 32 };
    install(&root);

    let writer = root.clone();
    let _convert = bind(&root, "celsius", move |c| {
        let f = c.as_number().unwrap_or(0.0) * 9.0 / 5.0 + 32.0;
        resolve_write(&writer, "fahrenheit", f).unwrap();
    })
    .unwrap();

    let (seen, reaction) = recorder();
    let _display = bind(&root, "fahrenheit", reaction).unwrap();

    resolve_write(&root, "celsius", 100).unwrap();
    assert_eq!(*seen.borrow(), vec![Value::from(212)]);
}

#[test]
fn cascade_past_the_depth_limit_fails_the_outer_write() {
    let previous = configure(RuntimeConfig {
        max_notify_depth: Some(2),
        dedupe_notifications: true,
    });

    let root = record! { "a" => 0, "b" => 0, "c" => 0, "d" => 0 };
    install(&root);

    // a -> b -> c -> d, each reaction copies its value one step down
    let inner_errors = Rc::new(RefCell::new(Vec::new()));
    let mut chain = Vec::new();
    for (from, to) in [("a", "b"), ("b", "c"), ("c", "d")] {
        let (writer, errors) = (root.clone(), inner_errors.clone());
        let binding = bind(&root, from, move |v| {
            if let Err(err) = resolve_write(&writer, to, v.clone()) {
                errors.borrow_mut().push(err);
            }
        })
        .unwrap();
        chain.push(binding);
    }

    let result = resolve_write(&root, "a", 1);
    assert_eq!(result, Err(Error::NotifyDepthExceeded { limit: 2 }));
    assert_eq!(
        *inner_errors.borrow(),
        vec![Error::NotifyDepthExceeded { limit: 2 }]
    );

    // the rejected write to `c` left no half-applied state
    assert_eq!(resolve_read(&root, "b").unwrap(), Value::from(1));
    assert_eq!(resolve_read(&root, "c").unwrap(), Value::from(0));
    assert_eq!(chain[2].value(), Value::from(0));
    assert_eq!(resolve_read(&root, "d").unwrap(), Value::from(0));

    // nothing is carried over to the next write
    configure(previous);
    resolve_write(&root, "c", 5).unwrap();
    assert_eq!(resolve_read(&root, "d").unwrap(), Value::from(5));
}
