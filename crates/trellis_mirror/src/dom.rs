//! DOM binding layer abstraction.
//!
//! The mirror never touches concrete rendered elements; it drives this
//! trait. Real clients implement it over a browser DOM or a native view
//! hierarchy. `MockDom` is the in-memory implementation used by tests.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use trellis_protocol::{NodeId, Value};

/// Opaque handle to a rendered element, issued by the binding layer.
///
/// The element's lifecycle is owned by the rendering layer; the mirror
/// only stores the relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DomHandle(pub u64);

impl DomHandle {
    /// Creates a handle from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw handle value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DomHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dom:{}", self.0)
    }
}

/// The collaborator that creates, updates, and removes rendered elements.
///
/// Implementations do not need to validate ordering; the mirror calls in
/// a sequence that keeps parents alive before children attach.
pub trait DomBinder {
    /// Returns the handle of the root element the mirror root binds to.
    fn root_handle(&self) -> DomHandle;

    /// Creates a new element with the given tag.
    fn create_element(&mut self, node: NodeId, tag: &str) -> Result<DomHandle, String>;

    /// Sets an attribute on an element.
    fn set_attribute(&mut self, handle: DomHandle, key: &str, value: &Value);

    /// Removes an attribute from an element.
    fn remove_attribute(&mut self, handle: DomHandle, key: &str);

    /// Inserts a child element at the given index.
    fn insert_child(&mut self, parent: DomHandle, child: DomHandle, index: usize);

    /// Moves an existing child element to a new index.
    fn move_child(&mut self, parent: DomHandle, child: DomHandle, index: usize);

    /// Removes an element and its descendants.
    fn remove_element(&mut self, handle: DomHandle);
}

/// One element in the mock DOM.
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Element tag.
    pub tag: String,
    /// Attribute map.
    pub attributes: BTreeMap<String, Value>,
    /// Ordered child handles.
    pub children: Vec<DomHandle>,
}

/// An in-memory DOM for testing the mirror without a browser.
#[derive(Debug)]
pub struct MockDom {
    elements: HashMap<DomHandle, MockElement>,
    next_handle: u64,
}

impl MockDom {
    /// Creates a mock DOM containing only the root element.
    pub fn new() -> Self {
        let mut elements = HashMap::new();
        elements.insert(
            DomHandle::new(0),
            MockElement {
                tag: "body".to_string(),
                attributes: BTreeMap::new(),
                children: Vec::new(),
            },
        );
        Self {
            elements,
            next_handle: 1,
        }
    }

    /// Returns the element behind a handle, if it is still alive.
    pub fn element(&self, handle: DomHandle) -> Option<&MockElement> {
        self.elements.get(&handle)
    }

    /// Returns the number of live elements, the root included.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Returns an attribute of an element, if both exist.
    pub fn attribute(&self, handle: DomHandle, key: &str) -> Option<&Value> {
        self.elements.get(&handle)?.attributes.get(key)
    }

    /// Returns the ordered children of an element.
    pub fn children_of(&self, handle: DomHandle) -> &[DomHandle] {
        self.elements
            .get(&handle)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for MockDom {
    fn default() -> Self {
        Self::new()
    }
}

impl DomBinder for MockDom {
    fn root_handle(&self) -> DomHandle {
        DomHandle::new(0)
    }

    fn create_element(&mut self, _node: NodeId, tag: &str) -> Result<DomHandle, String> {
        if tag.is_empty() {
            return Err("empty tag".to_string());
        }
        let handle = DomHandle::new(self.next_handle);
        self.next_handle += 1;
        self.elements.insert(
            handle,
            MockElement {
                tag: tag.to_string(),
                attributes: BTreeMap::new(),
                children: Vec::new(),
            },
        );
        Ok(handle)
    }

    fn set_attribute(&mut self, handle: DomHandle, key: &str, value: &Value) {
        if let Some(element) = self.elements.get_mut(&handle) {
            element.attributes.insert(key.to_string(), value.clone());
        }
    }

    fn remove_attribute(&mut self, handle: DomHandle, key: &str) {
        if let Some(element) = self.elements.get_mut(&handle) {
            element.attributes.remove(key);
        }
    }

    fn insert_child(&mut self, parent: DomHandle, child: DomHandle, index: usize) {
        if let Some(element) = self.elements.get_mut(&parent) {
            let index = index.min(element.children.len());
            element.children.insert(index, child);
        }
    }

    fn move_child(&mut self, parent: DomHandle, child: DomHandle, index: usize) {
        if let Some(element) = self.elements.get_mut(&parent) {
            if let Some(pos) = element.children.iter().position(|c| *c == child) {
                element.children.remove(pos);
                let index = index.min(element.children.len());
                element.children.insert(index, child);
            }
        }
    }

    fn remove_element(&mut self, handle: DomHandle) {
        // Detach from any parent child list.
        for element in self.elements.values_mut() {
            element.children.retain(|c| *c != handle);
        }
        // Drop the subtree.
        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            if let Some(element) = self.elements.remove(&current) {
                stack.extend(element.children);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_exists() {
        let dom = MockDom::new();
        assert_eq!(dom.element_count(), 1);
        assert_eq!(dom.element(dom.root_handle()).unwrap().tag, "body");
    }

    #[test]
    fn create_and_attach() {
        let mut dom = MockDom::new();
        let root = dom.root_handle();
        let div = dom.create_element(NodeId::new(1), "div").unwrap();
        dom.insert_child(root, div, 0);

        assert_eq!(dom.children_of(root), &[div]);
        assert_eq!(dom.element(div).unwrap().tag, "div");
    }

    #[test]
    fn empty_tag_is_rejected() {
        let mut dom = MockDom::new();
        assert!(dom.create_element(NodeId::new(1), "").is_err());
    }

    #[test]
    fn attributes() {
        let mut dom = MockDom::new();
        let div = dom.create_element(NodeId::new(1), "div").unwrap();
        dom.set_attribute(div, "id", &Value::Text("foo".into()));
        assert_eq!(dom.attribute(div, "id"), Some(&Value::Text("foo".into())));

        dom.remove_attribute(div, "id");
        assert_eq!(dom.attribute(div, "id"), None);
    }

    #[test]
    fn remove_element_drops_subtree() {
        let mut dom = MockDom::new();
        let root = dom.root_handle();
        let outer = dom.create_element(NodeId::new(1), "div").unwrap();
        let inner = dom.create_element(NodeId::new(2), "span").unwrap();
        dom.insert_child(root, outer, 0);
        dom.insert_child(outer, inner, 0);
        assert_eq!(dom.element_count(), 3);

        dom.remove_element(outer);
        assert_eq!(dom.element_count(), 1);
        assert!(dom.children_of(root).is_empty());
    }

    #[test]
    fn move_child_reorders() {
        let mut dom = MockDom::new();
        let root = dom.root_handle();
        let a = dom.create_element(NodeId::new(1), "div").unwrap();
        let b = dom.create_element(NodeId::new(2), "div").unwrap();
        dom.insert_child(root, a, 0);
        dom.insert_child(root, b, 1);

        dom.move_child(root, b, 0);
        assert_eq!(dom.children_of(root), &[b, a]);
    }
}
