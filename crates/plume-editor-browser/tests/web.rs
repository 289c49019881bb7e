//! WASM browser tests for plume-editor-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use gloo_timers::future::TimeoutFuture;
use gloo_utils::{body, document, window};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{
    Element, Event, EventInit, HtmlElement, HtmlSelectElement, KeyboardEvent, KeyboardEventInit,
    Node,
};

wasm_bindgen_test_configure!(run_in_browser);

use plume_editor_browser::{
    BlockTag, BrowserEditor, BrowserHost, CommandHost, DomHost, EditorConfig, EditorError,
};

/// Create a fresh mount point with its own ids so tests don't collide.
fn mount_point(name: &str) -> (Element, EditorConfig) {
    let doc = document();
    let mount = doc.create_element("div").unwrap();
    mount.set_id(name);
    body().append_child(&mount).unwrap();

    let config = EditorConfig {
        mount_id: name.to_string(),
        toolbar_id: format!("{name}-toolbar"),
        content_id: format!("{name}-textbox"),
        image_input_id: format!("{name}-insertImage"),
        ..EditorConfig::default()
    };
    (mount, config)
}

fn child_ids(element: &Element) -> Vec<String> {
    let children = element.children();
    (0..children.length())
        .filter_map(|i| children.item(i))
        .map(|child| child.id())
        .collect()
}

fn html(element: &Element) -> HtmlElement {
    element.clone().dyn_into::<HtmlElement>().unwrap()
}

/// Select `start..end` inside `node`; a collapsed range places the caret.
fn select(node: &Node, start: u32, end: u32) {
    let range = document().create_range().unwrap();
    range.set_start(node, start).unwrap();
    range.set_end(node, end).unwrap();
    let selection = window().get_selection().unwrap().unwrap();
    selection.remove_all_ranges().unwrap();
    selection.add_range(&range).unwrap();
}

fn key_event(kind: &str, key: &str) -> KeyboardEvent {
    let init = KeyboardEventInit::new();
    init.set_key(key);
    init.set_bubbles(true);
    KeyboardEvent::new_with_keyboard_event_init_dict(kind, &init).unwrap()
}

fn plain_event(kind: &str) -> Event {
    let init = EventInit::new();
    init.set_bubbles(true);
    Event::new_with_event_init_dict(kind, &init).unwrap()
}

fn button(editor: &BrowserEditor, id: &str) -> Element {
    editor
        .editor()
        .controls()
        .iter()
        .find(|control| control.command.id() == id)
        .map(|control| control.element.clone())
        .unwrap()
}

// === Mounting ===

#[wasm_bindgen_test]
fn test_mount_appends_toolbar_then_content() {
    let (mount, config) = mount_point("mount-order");
    let _editor = BrowserEditor::mount_with_config(&["bold", "italic"], config).unwrap();

    assert_eq!(
        child_ids(&mount),
        vec!["mount-order-toolbar", "mount-order-textbox"]
    );
    let content = document().get_element_by_id("mount-order-textbox").unwrap();
    assert_eq!(
        content.get_attribute("contenteditable").as_deref(),
        Some("true")
    );
}

#[wasm_bindgen_test]
fn test_controls_follow_requested_order() {
    let (_mount, config) = mount_point("control-order");
    let editor =
        BrowserEditor::mount_with_config(&["italic", "image", "bold", "fontSize"], config)
            .unwrap();

    assert_eq!(
        child_ids(editor.editor().toolbar()),
        vec![
            "italic",
            "control-order-insertImage",
            "image",
            "bold",
            "fontsize"
        ]
    );
}

#[wasm_bindgen_test]
fn test_button_width_on_document_root() {
    let (_mount, config) = mount_point("button-width");
    let _editor = BrowserEditor::mount_with_config(&["bold", "italic", "underline", "code"], config)
        .unwrap();

    let root = document()
        .document_element()
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    assert_eq!(
        root.style().get_property_value("--number-buttons").unwrap(),
        "25%"
    );
}

#[wasm_bindgen_test]
fn test_font_size_select_defaults_to_twelve_point() {
    let (_mount, config) = mount_point("font-size-default");
    let editor = BrowserEditor::mount_with_config(&["fontsize"], config).unwrap();

    let select = editor.editor().controls()[0]
        .element
        .clone()
        .dyn_into::<HtmlSelectElement>()
        .unwrap();
    assert_eq!(select.length(), 7);
    assert_eq!(select.selected_index(), 2);
    assert_eq!(select.value(), "3");
}

// === Errors ===

#[wasm_bindgen_test]
fn test_missing_mount() {
    let config = EditorConfig {
        mount_id: "no-such-mount".to_string(),
        ..EditorConfig::default()
    };
    match BrowserEditor::mount_with_config(&["bold"], config) {
        Err(EditorError::MissingMount(id)) => assert_eq!(id, "no-such-mount"),
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("expected MissingMount"),
    }
}

#[wasm_bindgen_test]
fn test_unknown_command_leaves_mount_untouched() {
    let (mount, config) = mount_point("unknown-command");
    match BrowserEditor::mount_with_config(&["bold", "sparkle"], config) {
        Err(EditorError::UnknownCommand(name)) => assert_eq!(name, "sparkle"),
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("expected UnknownCommand"),
    }
    assert_eq!(mount.child_element_count(), 0);
}

// === Host ===

#[wasm_bindgen_test]
fn test_host_first_child_is_text() {
    let host = BrowserHost::new().unwrap();
    let element = host.create_element("div").unwrap();
    assert!(!host.first_child_is_text(&element));

    element.set_text_content(Some("hello"));
    assert!(host.first_child_is_text(&element));

    host.set_inner_html(&element, "<p>hello</p>");
    assert!(!host.first_child_is_text(&element));
}

#[wasm_bindgen_test]
fn test_host_set_class_toggles() {
    let host = BrowserHost::new().unwrap();
    let element = host.create_element("button").unwrap();

    host.set_class(&element, "button-selected", true).unwrap();
    assert!(element.class_list().contains("button-selected"));
    host.set_class(&element, "button-selected", false).unwrap();
    assert!(!element.class_list().contains("button-selected"));
}

#[wasm_bindgen_test]
fn test_host_unknown_query_is_inactive() {
    let host = BrowserHost::new().unwrap();
    assert!(!host.query_command_state("notARealCommand"));
}

// === Lifecycle ===

#[wasm_bindgen_test]
fn test_drop_tears_down() {
    let (mount, config) = mount_point("teardown");
    let editor = BrowserEditor::mount_with_config(&["bold"], config).unwrap();
    assert_eq!(mount.child_element_count(), 2);

    drop(editor);
    assert_eq!(mount.child_element_count(), 0);
    assert!(document().get_element_by_id("teardown-textbox").is_none());
}

#[wasm_bindgen_test]
fn test_content_html_reflects_surface() {
    let (_mount, config) = mount_point("content-html");
    let editor = BrowserEditor::mount_with_config(&["bold"], config).unwrap();

    editor
        .editor()
        .content()
        .set_inner_html("<p>hello</p>");
    assert_eq!(editor.content_html(), "<p>hello</p>");
}

// === Event wiring ===

#[wasm_bindgen_test]
fn test_input_wraps_bare_text_in_paragraph() {
    let (_mount, config) = mount_point("input-wrap");
    let editor = BrowserEditor::mount_with_config(&["bold"], config).unwrap();
    let content = editor.editor().content().clone();

    content.set_text_content(Some("hello"));
    html(&content).focus().unwrap();
    select(&content.first_child().unwrap(), 5, 5);
    content.dispatch_event(&plain_event("input")).unwrap();

    let first = content.first_element_child().unwrap();
    assert_eq!(first.tag_name(), "P");
    assert_eq!(first.text_content().as_deref(), Some("hello"));
}

fn block_at_caret(editor: &BrowserEditor) -> Option<BlockTag> {
    BlockTag::from_host_value(&editor.editor().host().query_command_value("formatBlock"))
}

async fn assert_enter_escapes_block(name: &str, command: &str, markup: &str, block: BlockTag) {
    let (_mount, config) = mount_point(name);
    let editor = BrowserEditor::mount_with_config(&[command], config).unwrap();
    let content = editor.editor().content().clone();

    content.set_inner_html(markup);
    html(&content).focus().unwrap();
    let text = content.first_element_child().unwrap().first_child().unwrap();
    select(&text, 2, 2);
    assert_eq!(block_at_caret(&editor), Some(block));

    content
        .dispatch_event(&key_event("keydown", "Enter"))
        .unwrap();

    // The reset waits for the browser's own Enter handling to finish.
    assert_eq!(block_at_caret(&editor), Some(block));

    TimeoutFuture::new(20).await;
    assert_eq!(block_at_caret(&editor), Some(BlockTag::Paragraph));
}

#[wasm_bindgen_test]
async fn test_enter_in_pre_resets_after_yield() {
    assert_enter_escapes_block("enter-pre", "code", "<pre>let x = 1;</pre>", BlockTag::Pre)
        .await;
}

#[wasm_bindgen_test]
async fn test_enter_in_blockquote_resets_after_yield() {
    assert_enter_escapes_block(
        "enter-quote",
        "blockquote",
        "<blockquote>quoted</blockquote>",
        BlockTag::Blockquote,
    )
    .await;
}

#[wasm_bindgen_test]
fn test_keyup_and_mouseup_reflect_bold_state() {
    let (_mount, config) = mount_point("bold-state");
    let editor = BrowserEditor::mount_with_config(&["bold", "italic"], config).unwrap();
    let content = editor.editor().content().clone();
    let bold = button(&editor, "bold");

    content.set_inner_html("<p><b>strong</b> plain</p>");
    html(&content).focus().unwrap();

    let strong = content.query_selector("b").unwrap().unwrap();
    select(&strong.first_child().unwrap(), 2, 2);
    content.dispatch_event(&key_event("keyup", "ArrowLeft")).unwrap();
    assert!(bold.class_list().contains("button-selected"));
    assert!(!button(&editor, "italic").class_list().contains("button-selected"));

    let plain = content.first_element_child().unwrap().last_child().unwrap();
    select(&plain, 3, 3);
    content.dispatch_event(&plain_event("mouseup")).unwrap();
    assert!(!bold.class_list().contains("button-selected"));
}

#[wasm_bindgen_test]
fn test_button_click_formats_and_refreshes() {
    let (_mount, config) = mount_point("bold-click");
    let editor = BrowserEditor::mount_with_config(&["bold"], config).unwrap();
    let content = editor.editor().content().clone();
    let bold = button(&editor, "bold");

    content.set_inner_html("<p>word</p>");
    html(&content).focus().unwrap();
    let text = content.first_element_child().unwrap().first_child().unwrap();
    select(&text, 0, 4);

    html(&bold).click();
    assert!(content.query_selector("b").unwrap().is_some());
    assert!(bold.class_list().contains("button-selected"));
}

// === Images ===

#[wasm_bindgen_test]
async fn test_deleting_image_removes_wrapper_and_watch() {
    let (_mount, config) = mount_point("image-delete");
    let editor = BrowserEditor::mount_with_config(&["image"], config).unwrap();
    let content = editor.editor().content().clone();

    editor.insert_image("data:image/png;base64,").unwrap();
    assert_eq!(content.child_element_count(), 1);
    assert_eq!(editor.watched_images(), 1);

    content.query_selector("img").unwrap().unwrap().remove();
    TimeoutFuture::new(20).await;
    assert_eq!(content.child_element_count(), 0);

    TimeoutFuture::new(20).await;
    assert_eq!(editor.watched_images(), 0);
}

#[wasm_bindgen_test]
async fn test_deleting_resizer_removes_wrapper() {
    let (_mount, config) = mount_point("resizer-delete");
    let editor = BrowserEditor::mount_with_config(&["image"], config).unwrap();
    let content = editor.editor().content().clone();

    editor.insert_image("data:image/png;base64,").unwrap();
    editor.insert_image("data:image/png;base64,").unwrap();
    assert_eq!(editor.watched_images(), 2);

    content.query_selector(".resize").unwrap().unwrap().remove();
    TimeoutFuture::new(20).await;
    assert_eq!(content.child_element_count(), 1);
    assert!(content.query_selector("img").unwrap().is_some());

    TimeoutFuture::new(20).await;
    assert_eq!(editor.watched_images(), 1);
}
