//! In-memory editor host.
//!
//! `MemoryHost` keeps a small element tree plus a model of the host's
//! formatting state, so the editor can run without a browser. It simulates
//! just enough of the command semantics for the editor's reactions to be
//! observable: inline commands toggle, justification is exclusive,
//! `formatBlock` wraps leading text of the editable surface and updates the
//! reported block format, and `fontSize` updates the reported size.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use smol_str::SmolStr;

use crate::command::{BlockTag, FORMAT_BLOCK};
use crate::platform::{CommandHost, DomHost, PlatformError, PromptHost};

/// Handle to an element in a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryElement(usize);

/// A recorded `exec_command` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecCall {
    pub command: String,
    pub value: Option<String>,
}

/// Child node as seen from the outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryNode {
    Element(MemoryElement),
    Text(String),
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element { tag: SmolStr },
    Text(String),
    /// Markup set through `set_inner_html`, kept verbatim.
    Raw(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<usize>,
    children: Vec<usize>,
    attributes: Vec<(SmolStr, String)>,
    classes: Vec<SmolStr>,
    style: BTreeMap<SmolStr, String>,
    selected_option: Option<usize>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attributes: Vec::new(),
            classes: Vec::new(),
            style: BTreeMap::new(),
            selected_option: None,
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

const INLINE_COMMANDS: [&str; 4] = ["bold", "italic", "underline", "strikethrough"];
const JUSTIFY_COMMANDS: [&str; 3] = ["justifyleft", "justifycenter", "justifyright"];

#[derive(Debug)]
struct State {
    nodes: Vec<Node>,
    root: usize,
    body: usize,
    root_style: BTreeMap<String, String>,
    exec_log: Vec<ExecCall>,
    active: HashSet<String>,
    values: HashMap<String, String>,
    prompt_answers: VecDeque<Option<String>>,
    prompt_log: Vec<String>,
    focused: Option<usize>,
    rejected_tags: HashSet<String>,
}

impl State {
    fn alloc(&mut self, kind: NodeKind) -> usize {
        self.nodes.push(Node::new(kind));
        self.nodes.len() - 1
    }

    fn detach(&mut self, id: usize) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|&child| child != id);
        }
    }

    fn append(&mut self, parent: usize, child: usize) {
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    fn is_connected(&self, mut id: usize) -> bool {
        loop {
            if id == self.root {
                return true;
            }
            match self.nodes[id].parent {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    fn descendants(&self, id: usize, out: &mut Vec<usize>) {
        for &child in &self.nodes[id].children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    /// The editable surface commands apply to: the focused element if it is
    /// editable, otherwise the first connected editable element.
    fn editable(&self) -> Option<usize> {
        let is_editable =
            |id: usize| self.nodes[id].attribute("contenteditable") == Some("true");
        if let Some(focused) = self.focused.filter(|&id| is_editable(id)) {
            return Some(focused);
        }
        let mut all = Vec::new();
        self.descendants(self.root, &mut all);
        all.into_iter().find(|&id| is_editable(id))
    }

    fn format_block(&mut self, tag: BlockTag) {
        if let Some(surface) = self.editable() {
            let leading: Vec<usize> = self.nodes[surface]
                .children
                .iter()
                .copied()
                .take_while(|&child| matches!(self.nodes[child].kind, NodeKind::Text(_)))
                .collect();
            if !leading.is_empty() {
                let block = self.alloc(NodeKind::Element {
                    tag: tag.tag_name().into(),
                });
                self.nodes[block].parent = Some(surface);
                let children = &mut self.nodes[surface].children;
                children.drain(..leading.len());
                children.insert(0, block);
                for text in leading {
                    self.nodes[text].parent = Some(block);
                    self.nodes[block].children.push(text);
                }
            }
        }
        self.values
            .insert(FORMAT_BLOCK.to_ascii_lowercase(), tag.tag_name().to_string());
    }

    fn serialize(&self, id: usize, out: &mut String) {
        let node = &self.nodes[id];
        match &node.kind {
            NodeKind::Text(text) | NodeKind::Raw(text) => out.push_str(text),
            NodeKind::Element { tag } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in &node.attributes {
                    out.push_str(&format!(" {name}=\"{value}\""));
                }
                if !node.classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", node.classes.join(" ")));
                }
                if !node.style.is_empty() {
                    let style: Vec<String> = node
                        .style
                        .iter()
                        .map(|(property, value)| format!("{property}: {value};"))
                        .collect();
                    out.push_str(&format!(" style=\"{}\"", style.join(" ")));
                }
                out.push('>');
                for &child in &node.children {
                    self.serialize(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

/// Headless host backed by an in-memory element tree.
///
/// A fresh host holds `<html><body></body></html>`; add a mount element with
/// [`MemoryHost::with_mount`] or [`MemoryHost::add_element`].
#[derive(Debug)]
pub struct MemoryHost {
    state: RefCell<State>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        let mut state = State {
            nodes: Vec::new(),
            root: 0,
            body: 0,
            root_style: BTreeMap::new(),
            exec_log: Vec::new(),
            active: HashSet::new(),
            values: HashMap::new(),
            prompt_answers: VecDeque::new(),
            prompt_log: Vec::new(),
            focused: None,
            rejected_tags: HashSet::new(),
        };
        state.root = state.alloc(NodeKind::Element { tag: "html".into() });
        state.body = state.alloc(NodeKind::Element { tag: "body".into() });
        let (root, body) = (state.root, state.body);
        state.append(root, body);
        Self {
            state: RefCell::new(state),
        }
    }

    /// A host whose body contains an empty `div` with the given id.
    pub fn with_mount(id: &str) -> Self {
        let host = Self::new();
        let body = host.body();
        host.add_element(&body, "div", Some(id));
        host
    }

    pub fn body(&self) -> MemoryElement {
        MemoryElement(self.state.borrow().body)
    }

    /// Create an element under `parent`, optionally with an id.
    pub fn add_element(
        &self,
        parent: &MemoryElement,
        tag: &str,
        id: Option<&str>,
    ) -> MemoryElement {
        let mut state = self.state.borrow_mut();
        let node = state.alloc(NodeKind::Element { tag: tag.into() });
        if let Some(id) = id {
            state.nodes[node]
                .attributes
                .push(("id".into(), id.to_string()));
        }
        state.append(parent.0, node);
        MemoryElement(node)
    }

    /// Append a text node to `parent`, as typing into it would.
    pub fn append_text(&self, parent: &MemoryElement, text: &str) {
        let mut state = self.state.borrow_mut();
        let node = state.alloc(NodeKind::Text(text.to_string()));
        state.append(parent.0, node);
    }

    // === Formatting state ===

    /// Force the state reported for `command`.
    pub fn set_command_state(&self, command: &str, active: bool) {
        let key = command.to_ascii_lowercase();
        let mut state = self.state.borrow_mut();
        if active {
            state.active.insert(key);
        } else {
            state.active.remove(&key);
        }
    }

    /// Force the value reported for `command`.
    pub fn set_command_value(&self, command: &str, value: &str) {
        self.state
            .borrow_mut()
            .values
            .insert(command.to_ascii_lowercase(), value.to_string());
    }

    /// Queue the answer for the next prompt. `None` cancels it.
    pub fn push_prompt_answer(&self, answer: Option<&str>) {
        self.state
            .borrow_mut()
            .prompt_answers
            .push_back(answer.map(str::to_string));
    }

    /// Make `create_element` fail for `tag`.
    pub fn reject_tag(&self, tag: &str) {
        self.state
            .borrow_mut()
            .rejected_tags
            .insert(tag.to_ascii_lowercase());
    }

    // === Inspection ===

    pub fn exec_log(&self) -> Vec<ExecCall> {
        self.state.borrow().exec_log.clone()
    }

    /// Drain the exec log.
    pub fn take_exec_log(&self) -> Vec<ExecCall> {
        std::mem::take(&mut self.state.borrow_mut().exec_log)
    }

    /// Messages shown in prompts so far.
    pub fn prompt_log(&self) -> Vec<String> {
        self.state.borrow().prompt_log.clone()
    }

    pub fn children(&self, element: &MemoryElement) -> Vec<MemoryNode> {
        let state = self.state.borrow();
        state.nodes[element.0]
            .children
            .iter()
            .map(|&child| match &state.nodes[child].kind {
                NodeKind::Text(text) | NodeKind::Raw(text) => MemoryNode::Text(text.clone()),
                NodeKind::Element { .. } => MemoryNode::Element(MemoryElement(child)),
            })
            .collect()
    }

    /// Element children only.
    pub fn child_elements(&self, element: &MemoryElement) -> Vec<MemoryElement> {
        self.children(element)
            .into_iter()
            .filter_map(|node| match node {
                MemoryNode::Element(el) => Some(el),
                MemoryNode::Text(_) => None,
            })
            .collect()
    }

    pub fn parent(&self, element: &MemoryElement) -> Option<MemoryElement> {
        self.state.borrow().nodes[element.0].parent.map(MemoryElement)
    }

    pub fn tag_name(&self, element: &MemoryElement) -> Option<String> {
        match &self.state.borrow().nodes[element.0].kind {
            NodeKind::Element { tag } => Some(tag.to_string()),
            _ => None,
        }
    }

    pub fn attribute(&self, element: &MemoryElement, name: &str) -> Option<String> {
        self.state.borrow().nodes[element.0]
            .attribute(name)
            .map(str::to_string)
    }

    pub fn has_class(&self, element: &MemoryElement, class: &str) -> bool {
        self.state.borrow().nodes[element.0]
            .classes
            .iter()
            .any(|c| c == class)
    }

    pub fn style(&self, element: &MemoryElement, property: &str) -> Option<String> {
        self.state.borrow().nodes[element.0]
            .style
            .get(property)
            .cloned()
    }

    pub fn root_style_property(&self, property: &str) -> Option<String> {
        self.state.borrow().root_style.get(property).cloned()
    }

    pub fn selected_option(&self, select: &MemoryElement) -> Option<usize> {
        self.state.borrow().nodes[select.0].selected_option
    }

    pub fn focused(&self) -> Option<MemoryElement> {
        self.state.borrow().focused.map(MemoryElement)
    }

    pub fn is_connected(&self, element: &MemoryElement) -> bool {
        self.state.borrow().is_connected(element.0)
    }
}

impl CommandHost for MemoryHost {
    fn exec_command(&self, command: &str, value: Option<&str>) {
        let mut state = self.state.borrow_mut();
        state.exec_log.push(ExecCall {
            command: command.to_string(),
            value: value.map(str::to_string),
        });

        let key = command.to_ascii_lowercase();
        match key.as_str() {
            "formatblock" => match value.and_then(BlockTag::from_host_value) {
                Some(tag) => state.format_block(tag),
                None => tracing::debug!(?value, "memory host: unsupported block"),
            },
            "fontsize" => {
                if let Some(value) = value {
                    state.values.insert("fontsize".to_string(), value.to_string());
                }
            }
            "removeformat" => {
                for inline in INLINE_COMMANDS {
                    state.active.remove(inline);
                }
            }
            k if JUSTIFY_COMMANDS.contains(&k) => {
                for justify in JUSTIFY_COMMANDS {
                    state.active.remove(justify);
                }
                state.active.insert(k.to_string());
            }
            k if INLINE_COMMANDS.contains(&k)
                || k == "insertorderedlist"
                || k == "insertunorderedlist" =>
            {
                if !state.active.remove(k) {
                    state.active.insert(k.to_string());
                }
            }
            _ => {}
        }
    }

    fn query_command_state(&self, command: &str) -> bool {
        self.state
            .borrow()
            .active
            .contains(&command.to_ascii_lowercase())
    }

    fn query_command_value(&self, command: &str) -> String {
        self.state
            .borrow()
            .values
            .get(&command.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default()
    }
}

impl DomHost for MemoryHost {
    type Element = MemoryElement;

    fn element_by_id(&self, id: &str) -> Option<MemoryElement> {
        let state = self.state.borrow();
        let mut all = Vec::new();
        state.descendants(state.root, &mut all);
        all.into_iter()
            .find(|&node| state.nodes[node].attribute("id") == Some(id))
            .map(MemoryElement)
    }

    fn create_element(&self, tag: &str) -> Result<MemoryElement, PlatformError> {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PlatformError(format!("invalid tag name {tag:?}")));
        }
        let mut state = self.state.borrow_mut();
        if state.rejected_tags.contains(&tag.to_ascii_lowercase()) {
            return Err(PlatformError(format!("<{tag}> rejected by host")));
        }
        Ok(MemoryElement(state.alloc(NodeKind::Element { tag: tag.into() })))
    }

    fn set_attribute(
        &self,
        element: &MemoryElement,
        name: &str,
        value: &str,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.borrow_mut();
        let attributes = &mut state.nodes[element.0].attributes;
        match attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attributes.push((name.into(), value.to_string())),
        }
        Ok(())
    }

    fn set_inner_html(&self, element: &MemoryElement, html: &str) {
        let mut state = self.state.borrow_mut();
        for child in std::mem::take(&mut state.nodes[element.0].children) {
            state.nodes[child].parent = None;
        }
        let raw = state.alloc(NodeKind::Raw(html.to_string()));
        state.append(element.0, raw);
    }

    fn inner_html(&self, element: &MemoryElement) -> String {
        let state = self.state.borrow();
        let mut out = String::new();
        for &child in &state.nodes[element.0].children {
            state.serialize(child, &mut out);
        }
        out
    }

    fn add_class(&self, element: &MemoryElement, class: &str) -> Result<(), PlatformError> {
        self.set_class(element, class, true)
    }

    fn set_class(
        &self,
        element: &MemoryElement,
        class: &str,
        on: bool,
    ) -> Result<(), PlatformError> {
        if class.is_empty() || class.contains(char::is_whitespace) {
            return Err(PlatformError(format!("invalid class name {class:?}")));
        }
        let mut state = self.state.borrow_mut();
        let classes = &mut state.nodes[element.0].classes;
        let present = classes.iter().any(|c| c == class);
        if on && !present {
            classes.push(class.into());
        } else if !on && present {
            classes.retain(|c| c != class);
        }
        Ok(())
    }

    fn set_style(
        &self,
        element: &MemoryElement,
        property: &str,
        value: &str,
    ) -> Result<(), PlatformError> {
        self.state.borrow_mut().nodes[element.0]
            .style
            .insert(property.into(), value.to_string());
        Ok(())
    }

    fn set_root_style_property(&self, property: &str, value: &str) -> Result<(), PlatformError> {
        if property.trim().is_empty() {
            return Err("empty style property".into());
        }
        self.state
            .borrow_mut()
            .root_style
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn append_child(
        &self,
        parent: &MemoryElement,
        child: &MemoryElement,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.borrow_mut();
        let mut ancestor = Some(parent.0);
        while let Some(id) = ancestor {
            if id == child.0 {
                return Err("cannot append an element inside itself".into());
            }
            ancestor = state.nodes[id].parent;
        }
        state.append(parent.0, child.0);
        Ok(())
    }

    fn remove(&self, element: &MemoryElement) {
        self.state.borrow_mut().detach(element.0);
    }

    fn first_child_is_text(&self, element: &MemoryElement) -> bool {
        let state = self.state.borrow();
        state.nodes[element.0]
            .children
            .first()
            .is_some_and(|&child| matches!(state.nodes[child].kind, NodeKind::Text(_)))
    }

    fn set_selected_option(&self, select: &MemoryElement, index: usize) {
        self.state.borrow_mut().nodes[select.0].selected_option = Some(index);
    }

    fn focus(&self, element: &MemoryElement) {
        self.state.borrow_mut().focused = Some(element.0);
    }
}

impl PromptHost for MemoryHost {
    fn prompt(&self, message: &str) -> Option<String> {
        let mut state = self.state.borrow_mut();
        state.prompt_log.push(message.to_string());
        state.prompt_answers.pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_by_id_only_finds_connected_elements() {
        let host = MemoryHost::with_mount("editor");
        assert!(host.element_by_id("editor").is_some());

        let detached = host.create_element("div").unwrap();
        host.set_attribute(&detached, "id", "floating").unwrap();
        assert!(host.element_by_id("floating").is_none());

        let body = host.body();
        host.append_child(&body, &detached).unwrap();
        assert_eq!(host.element_by_id("floating"), Some(detached));
    }

    #[test]
    fn test_inline_commands_toggle() {
        let host = MemoryHost::new();
        assert!(!host.query_command_state("bold"));
        host.exec_command("bold", None);
        assert!(host.query_command_state("bold"));
        host.exec_command("bold", None);
        assert!(!host.query_command_state("bold"));
    }

    #[test]
    fn test_justify_is_exclusive() {
        let host = MemoryHost::new();
        host.exec_command("justifyLeft", None);
        host.exec_command("justifyCenter", None);
        assert!(!host.query_command_state("justifyLeft"));
        assert!(host.query_command_state("justifyCenter"));
    }

    #[test]
    fn test_format_block_wraps_leading_text() {
        let host = MemoryHost::with_mount("editor");
        let mount = host.element_by_id("editor").unwrap();
        host.set_attribute(&mount, "contenteditable", "true").unwrap();
        host.append_text(&mount, "hello ");
        host.append_text(&mount, "world");

        host.exec_command("formatBlock", Some("<p>"));

        assert!(!host.first_child_is_text(&mount));
        assert_eq!(host.inner_html(&mount), "<p>hello world</p>");
        assert_eq!(host.query_command_value("formatBlock"), "p");
    }

    #[test]
    fn test_append_child_rejects_cycles() {
        let host = MemoryHost::new();
        let outer = host.create_element("div").unwrap();
        let inner = host.create_element("div").unwrap();
        host.append_child(&outer, &inner).unwrap();
        assert!(host.append_child(&inner, &outer).is_err());
    }

    #[test]
    fn test_prompt_answers_are_consumed_in_order() {
        let host = MemoryHost::new();
        host.push_prompt_answer(Some("https://example.com"));
        host.push_prompt_answer(None);
        assert_eq!(host.prompt("url?").as_deref(), Some("https://example.com"));
        assert_eq!(host.prompt("url?"), None);
        assert_eq!(host.prompt("url?"), None);
        assert_eq!(host.prompt_log().len(), 3);
    }
}
