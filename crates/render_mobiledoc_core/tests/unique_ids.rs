use regex::Regex;
use render_mobiledoc_core::{
    DomHelper, IdGenerator, PlaceholderFactory, SequentialIdGenerator, SimpleDocument,
    UuidIdGenerator, ENTITY_ID_PREFIX,
};
use std::collections::HashSet;
use std::rc::Rc;

#[test]
fn ten_thousand_ids_are_distinct_and_prefixed() {
    let ids = UuidIdGenerator::new();
    let pattern = Regex::new(
        r"^__rendered-mobiledoc-entity-[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
    )
    .unwrap();

    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        let id = ids.next_id();
        assert!(pattern.is_match(&id), "unexpected id format: {id}");
        assert!(seen.insert(id), "duplicate id generated");
    }
    assert_eq!(seen.len(), 10_000);
}

#[test]
fn custom_prefix_is_respected() {
    let id = UuidIdGenerator::with_prefix("x-").next_id();
    assert!(id.starts_with("x-"));
    assert!(!id.starts_with(ENTITY_ID_PREFIX));
}

#[test]
fn factory_ids_are_unique_across_placeholders() {
    let dom = SimpleDocument::new();
    let factory = PlaceholderFactory::new(Rc::new(SequentialIdGenerator::new()));

    let ids: HashSet<String> = (0..100)
        .map(|_| {
            factory
                .create(&dom, "div", &[])
                .unwrap()
                .id()
                .expect("placeholder id")
        })
        .collect();

    assert_eq!(ids.len(), 100);
    assert_eq!(dom.created_elements(), 100);
    assert!(dom.create_element("p").is_ok());
}
