//! End-to-end edit pipeline tests
//!
//! Exercises the complete flow on a live unit:
//! 1. Parse and navigate
//! 2. Edit through a node anchor
//! 3. Check handle invalidation and survival
//! 4. Verify failure atomicity

use treesplice::{SourceUnit, SpliceError, TextEditable, TextInput};

#[test]
fn edit_invalidates_contents_but_not_ancestors() {
    // Analog of editing a class body: insert into a struct body and check
    // which previously minted handles survive.
    let source = "struct C { x: i32 }";
    let unit = SourceUnit::parse(source).unwrap();

    let item = unit.root().descendant_of_kind("struct_item").unwrap().unwrap();
    let body = item.descendant_of_kind("field_declaration_list").unwrap().unwrap();
    let field = item.descendant_of_kind("field_declaration").unwrap().unwrap();
    assert_eq!(field.text().unwrap(), "x: i32");

    // Step 1: insert at the start of the body interior.
    let slot = source.find('{').unwrap() + 1;
    let returned = item.insert_text(slot, " y: u8,").unwrap();
    assert_eq!(unit.text(), "struct C { y: u8, x: i32 }");
    assert_eq!(unit.generation(), 1);

    // Step 2: the field handle referenced the replaced span's contents.
    let err = field.text().unwrap_err();
    match err {
        SpliceError::StaleHandle { minted, current } => {
            assert_eq!(minted, 0);
            assert_eq!(current, 1);
        }
        other => panic!("expected StaleHandle, got {other}"),
    }
    assert!(!field.is_valid());

    // Step 3: ancestors of the edited span re-root and reflect the new text.
    assert!(body.is_valid());
    assert_eq!(body.text().unwrap(), "{ y: u8, x: i32 }");
    assert_eq!(item.text().unwrap(), "struct C { y: u8, x: i32 }");
    assert_eq!(unit.root().text().unwrap(), unit.text());

    // Step 4: the returned handle is a current-generation view of the anchor.
    assert_eq!(returned.kind(), "struct_item");
    assert_eq!(returned.span().unwrap(), (0, unit.len()));
}

#[test]
fn handles_after_the_edit_are_conservatively_invalidated() {
    let source = "fn a() { } fn b() { }";
    let unit = SourceUnit::parse(source).unwrap();

    let children = unit.root().children().unwrap();
    let (fn_a, fn_b) = (children[0].clone(), children[1].clone());
    assert_eq!(fn_a.text().unwrap(), "fn a() { }");

    let slot = source.find('{').unwrap() + 1;
    fn_a.insert_text(slot, " call();").unwrap();
    assert_eq!(unit.text(), "fn a() { call(); } fn b() { }");

    // fn b sits after the edited span; re-parse may have reshaped it.
    assert!(matches!(
        fn_b.text().unwrap_err(),
        SpliceError::StaleHandle { .. }
    ));
}

#[test]
fn handles_before_the_edit_survive_unchanged() {
    let source = "fn a() { } fn b() { }";
    let unit = SourceUnit::parse(source).unwrap();

    let children = unit.root().children().unwrap();
    let (fn_a, fn_b) = (children[0].clone(), children[1].clone());

    let slot = source.rfind('{').unwrap() + 1;
    fn_b.insert_text(slot, " call();").unwrap();
    assert_eq!(unit.text(), "fn a() { } fn b() { call(); }");

    assert_eq!(fn_a.text().unwrap(), "fn a() { }");
    assert_eq!(fn_a.span().unwrap(), (0, 10));
}

#[test]
fn remove_then_insert_restores_the_original_text() {
    let source = "fn main() { before(); after(); }";
    let unit = SourceUnit::parse(source).unwrap();
    let item = unit.root().descendant_of_kind("function_item").unwrap().unwrap();

    let start = source.find("before").unwrap();
    let end = start + "before(); ".len();
    let removed = &source[start..end];

    let item = item.remove_text(start, end).unwrap();
    assert_eq!(unit.text(), "fn main() { after(); }");

    item.insert_text(start, removed).unwrap();
    assert_eq!(unit.text(), source);
    // Text is restored but the tree went through two generations; any handle
    // minted before the round trip inside the body is a new object's job now.
    assert_eq!(unit.generation(), 2);
}

#[test]
fn empty_insertion_is_a_text_noop_but_still_resynchronizes() {
    let source = "fn main() { work(); }";
    let unit = SourceUnit::parse(source).unwrap();
    let item = unit.root().descendant_of_kind("function_item").unwrap().unwrap();
    let call = item.descendant_of_kind("call_expression").unwrap().unwrap();

    let slot = source.find('{').unwrap() + 1;
    item.insert_text(slot, "").unwrap();

    assert_eq!(unit.text(), source);
    assert_eq!(unit.generation(), 1);
    // The tree is structurally new even where the text is unchanged.
    assert!(!call.is_valid());
}

#[test]
fn insert_is_equivalent_to_zero_width_replace() {
    let source = "fn main() { }";
    let slot = source.find('{').unwrap() + 1;

    let inserted = SourceUnit::parse(source).unwrap();
    inserted.root().insert_text(slot, "x();").unwrap();

    let replaced = SourceUnit::parse(source).unwrap();
    replaced.root().replace_text((slot, slot), "x();").unwrap();

    assert_eq!(inserted.text(), replaced.text());
    assert_eq!(inserted.generation(), replaced.generation());
}

#[test]
fn failed_validation_reports_interval_and_leaves_no_trace() {
    let source = "struct C { }";
    let unit = SourceUnit::parse(source).unwrap();
    let item = unit.root().descendant_of_kind("struct_item").unwrap().unwrap();

    let interior = (source.find('{').unwrap() + 1, source.find('}').unwrap());

    let err = item.insert_text(source.len(), "x").unwrap_err();
    let message = err.to_string();
    assert!(message.contains(&source.len().to_string()));
    assert!(message.contains(&interior.0.to_string()));
    assert!(message.contains(&interior.1.to_string()));

    let err = item.replace_text((interior.1, interior.0), "x").unwrap_err();
    assert!(matches!(err, SpliceError::InvalidOrder { .. }));

    assert_eq!(unit.text(), source);
    assert_eq!(unit.generation(), 0);
    assert!(item.is_valid());
}

#[test]
fn edit_that_destroys_its_anchor_reports_reresolution() {
    // Closing the body early and opening a new item splits the anchor in
    // two: the re-parsed tree has no function_item left at the expected
    // span, so re-resolution must fail loudly instead of handing back a
    // different node.
    let source = "fn main() { }";
    let unit = SourceUnit::parse(source).unwrap();
    let item = unit.root().descendant_of_kind("function_item").unwrap().unwrap();

    let slot = source.find('{').unwrap() + 1;
    let err = item.insert_text(slot, " } fn other() {").unwrap_err();
    match err {
        SpliceError::ReResolution { kind, start, end } => {
            assert_eq!(kind, "function_item");
            assert_eq!(start, 0);
            assert_eq!(end, source.len() + " } fn other() {".len());
        }
        other => panic!("expected ReResolution, got {other}"),
    }

    // The failure happens after the swap: the spliced text is committed and
    // the unit moved to a new generation, only the anchor is gone.
    assert_eq!(unit.text(), "fn main() { } fn other() { }");
    assert_eq!(unit.generation(), 1);
    assert_eq!(unit.root().text().unwrap(), unit.text());
}

#[test]
fn writer_callbacks_compose_replacement_text() {
    let source = "fn handler() {\n}";
    let unit = SourceUnit::parse(source).unwrap();
    let item = unit.root().descendant_of_kind("function_item").unwrap().unwrap();

    let slot = source.find('{').unwrap() + 1;
    item.insert_text(
        slot,
        TextInput::with_writer(|w| {
            w.newline().indented(|w| {
                w.write("let name = ").quoted("splice").write_line(";");
                w.write("handle(name);");
            });
        }),
    )
    .unwrap();

    assert_eq!(
        unit.text(),
        "fn handler() {\n    let name = \"splice\";\n    handle(name);\n}"
    );
}

#[test]
fn chained_edits_walk_generations_forward() {
    let source = "fn main() { }";
    let unit = SourceUnit::parse(source).unwrap();
    let slot = source.find('{').unwrap() + 1;

    let item = unit.root().descendant_of_kind("function_item").unwrap().unwrap();
    let item = item.insert_text(slot, " first();").unwrap();
    let item = item.insert_text(slot, " second();").unwrap();
    let item = item.insert_text(slot, " third();").unwrap();

    assert_eq!(unit.text(), "fn main() { third(); second(); first(); }");
    assert_eq!(unit.generation(), 3);
    assert_eq!(item.text().unwrap(), unit.text());
}

#[test]
fn old_ancestor_handle_skips_generations_on_next_use() {
    // A handle untouched across several edits replays all of them at once.
    let source = "fn main() { }";
    let unit = SourceUnit::parse(source).unwrap();
    let item = unit.root().descendant_of_kind("function_item").unwrap().unwrap();
    let slot = source.find('{').unwrap() + 1;

    let anchor = item.clone();
    let anchor = anchor.insert_text(slot, " a();").unwrap();
    anchor.insert_text(slot, " b();").unwrap();

    // `item` was minted at generation 0 and is now two edits behind, but it
    // strictly contains both edited spans.
    assert_eq!(item.text().unwrap(), "fn main() { b(); a(); }");
}
