//! Arena-backed DOM tree.
//!
//! Nodes live in a flat `Vec` and reference each other by index. Parent and
//! sibling links are navigation only; the arena owns every node, so there is
//! no shared ownership or reference counting anywhere in the tree.

use html5ever::QualName;

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Sentinel for "no node".
    pub(crate) const NONE: NodeId = NodeId(u32::MAX);

    fn index(self) -> usize {
        self.0 as usize
    }

    fn checked(self) -> Option<NodeId> {
        (self != Self::NONE).then_some(self)
    }
}

/// The payload of a node.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// The document root. Exactly one per arena, always at index 0.
    Document,
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
    },
    Text(String),
    Comment(String),
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
}

/// An element attribute. Duplicates are allowed and source order is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// A node plus its tree links.
#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub(crate) parent: NodeId,
    pub(crate) first_child: NodeId,
    pub(crate) last_child: NodeId,
    pub(crate) prev_sibling: NodeId,
    pub(crate) next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// An HTML document tree.
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Create an empty tree holding only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
        }
    }

    /// The document node.
    pub fn document(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a detached element from a plain tag name (html namespace).
    pub fn create_element(&mut self, name: &str, attrs: Vec<Attribute>) -> NodeId {
        let qual = QualName::new(None, html5ever::ns!(html), html5ever::LocalName::from(name));
        self.create_element_qual(qual, attrs)
    }

    /// Create a detached element from a fully qualified name.
    pub(crate) fn create_element_qual(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        self.alloc(NodeData::Element { name, attrs })
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Comment(text.into()))
    }

    pub fn create_doctype(
        &mut self,
        name: impl Into<String>,
        public_id: impl Into<String>,
        system_id: impl Into<String>,
    ) -> NodeId {
        self.alloc(NodeData::Doctype {
            name: name.into(),
            public_id: public_id.into(),
            system_id: system_id.into(),
        })
    }

    /// Append a detached node as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let old_last = self.get(parent).map_or(NodeId::NONE, |n| n.last_child);

        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = old_last;
            node.next_sibling = NodeId::NONE;
        }

        if old_last.checked().is_some() {
            if let Some(last) = self.get_mut(old_last) {
                last.next_sibling = child;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = child;
        }
        if let Some(p) = self.get_mut(parent) {
            p.last_child = child;
        }
    }

    /// Append text to `parent`, merging into a trailing text child if one
    /// exists so the tree never holds two adjacent text nodes from parsing.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(last) = self.last_child(parent)
            && let Some(node) = self.get_mut(last)
            && let NodeData::Text(existing) = &mut node.data
        {
            existing.push_str(text);
            return;
        }
        let child = self.create_text(text);
        self.append(parent, child);
    }

    /// Insert a detached node immediately before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(node) = self.get_mut(new_node) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = sibling;
        }

        if prev.checked().is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = new_node;
        }
        if let Some(s) = self.get_mut(sibling) {
            s.prev_sibling = new_node;
        }
    }

    /// Insert a detached node immediately after `sibling`.
    pub fn insert_after(&mut self, sibling: NodeId, new_node: NodeId) {
        let (parent, next) = match self.get(sibling) {
            Some(n) => (n.parent, n.next_sibling),
            None => return,
        };

        if let Some(node) = self.get_mut(new_node) {
            node.parent = parent;
            node.prev_sibling = sibling;
            node.next_sibling = next;
        }

        if next.checked().is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = new_node;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = new_node;
        }
        if let Some(s) = self.get_mut(sibling) {
            s.next_sibling = new_node;
        }
    }

    /// Unlink a node from its parent and siblings. The node stays in the
    /// arena and can be re-appended elsewhere.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.checked().is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.checked().is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Append an attribute to an element node.
    pub(crate) fn push_attr(&mut self, id: NodeId, attr: Attribute) {
        if let Some(NodeData::Element { attrs, .. }) = self.get_mut(id).map(|n| &mut n.data) {
            attrs.push(attr);
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.checked())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child.checked())
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.last_child.checked())
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling.checked())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling.checked())
    }

    /// Iterate the direct children of a node in source order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            dom: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(
            self.get(id).map(|n| &n.data),
            Some(NodeData::Element { .. })
        )
    }

    pub fn is_comment(&self, id: NodeId) -> bool {
        matches!(self.get(id).map(|n| &n.data), Some(NodeData::Comment(_)))
    }

    /// The local tag name of an element node.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Element { name, .. }) => Some(name.local.as_ref()),
            _ => None,
        }
    }

    /// Attribute list of an element node, empty for everything else.
    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Element { attrs, .. }) => attrs,
            _ => &[],
        }
    }

    /// First attribute with the given name.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Character data of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Text(data)) => Some(data),
            _ => None,
        }
    }

    /// Body of a comment node.
    pub fn comment_text(&self, id: NodeId) -> Option<&str> {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Comment(data)) => Some(data),
            _ => None,
        }
    }

    /// The document's doctype as (name, public id, system id), if any.
    pub fn doctype(&self) -> Option<(&str, &str, &str)> {
        self.children(self.document()).find_map(|id| {
            match self.get(id).map(|n| &n.data) {
                Some(NodeData::Doctype {
                    name,
                    public_id,
                    system_id,
                }) => Some((name.as_str(), public_id.as_str(), system_id.as_str())),
                _ => None,
            }
        })
    }

    /// Depth-first search for the first element with the given tag name.
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        let mut stack = vec![self.document()];
        while let Some(id) = stack.pop() {
            if self.tag_name(id).is_some_and(|t| t.eq_ignore_ascii_case(tag)) {
                return Some(id);
            }
            let children: Vec<NodeId> = self.children(id).collect();
            for &child in children.iter().rev() {
                stack.push(child);
            }
        }
        None
    }
}

/// Iterator over the direct children of a node.
pub struct Children<'a> {
    dom: &'a Dom,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next.checked()?;
        self.next = self.dom.get(current).map_or(NodeId::NONE, |n| n.next_sibling);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_navigate() {
        let mut dom = Dom::new();
        let div = dom.create_element("div", vec![]);
        dom.append(dom.document(), div);

        let a = dom.create_text("a");
        let b = dom.create_element("span", vec![]);
        dom.append(div, a);
        dom.append(div, b);

        assert_eq!(dom.first_child(div), Some(a));
        assert_eq!(dom.last_child(div), Some(b));
        assert_eq!(dom.next_sibling(a), Some(b));
        assert_eq!(dom.prev_sibling(b), Some(a));
        assert_eq!(dom.parent(a), Some(div));
        assert_eq!(dom.children(div).count(), 2);
    }

    #[test]
    fn test_append_text_merges_adjacent() {
        let mut dom = Dom::new();
        let p = dom.create_element("p", vec![]);
        dom.append(dom.document(), p);

        dom.append_text(p, "hello ");
        dom.append_text(p, "world");

        assert_eq!(dom.children(p).count(), 1);
        let text = dom.first_child(p).unwrap();
        assert_eq!(dom.text(text), Some("hello world"));
    }

    #[test]
    fn test_insert_after() {
        let mut dom = Dom::new();
        let parent = dom.create_element("div", vec![]);
        dom.append(dom.document(), parent);

        let a = dom.create_comment("a");
        let c = dom.create_text("c");
        dom.append(parent, a);
        dom.append(parent, c);

        let b = dom.create_element("span", vec![]);
        dom.insert_after(a, b);

        let order: Vec<NodeId> = dom.children(parent).collect();
        assert_eq!(order, vec![a, b, c]);
        assert_eq!(dom.prev_sibling(b), Some(a));
        assert_eq!(dom.next_sibling(b), Some(c));

        // Appending after the last child updates the parent's tail link
        let d = dom.create_text("d");
        dom.insert_after(c, d);
        assert_eq!(dom.last_child(parent), Some(d));
    }

    #[test]
    fn test_detach() {
        let mut dom = Dom::new();
        let parent = dom.create_element("div", vec![]);
        dom.append(dom.document(), parent);

        let a = dom.create_text("a");
        let b = dom.create_text("b");
        dom.append(parent, a);
        dom.append(parent, b);

        dom.detach(a);
        assert_eq!(dom.children(parent).count(), 1);
        assert_eq!(dom.first_child(parent), Some(b));
        assert_eq!(dom.parent(a), None);
    }

    #[test]
    fn test_attributes() {
        let mut dom = Dom::new();
        let div = dom.create_element(
            "div",
            vec![
                Attribute {
                    name: "id".into(),
                    value: "main".into(),
                },
                Attribute {
                    name: "class".into(),
                    value: "container".into(),
                },
            ],
        );
        dom.append(dom.document(), div);

        assert_eq!(dom.attr(div, "id"), Some("main"));
        assert_eq!(dom.attr(div, "class"), Some("container"));
        assert_eq!(dom.attr(div, "href"), None);
        assert!(dom.has_attr(div, "id"));
        assert_eq!(dom.attrs(div).len(), 2);
    }

    #[test]
    fn test_find_by_tag() {
        let mut dom = Dom::new();
        let html = dom.create_element("html", vec![]);
        let body = dom.create_element("body", vec![]);
        let p = dom.create_element("p", vec![]);
        dom.append(dom.document(), html);
        dom.append(html, body);
        dom.append(body, p);

        assert_eq!(dom.find_by_tag("p"), Some(p));
        assert_eq!(dom.find_by_tag("BODY"), Some(body));
        assert_eq!(dom.find_by_tag("table"), None);
    }

    #[test]
    fn test_doctype_lookup() {
        let mut dom = Dom::new();
        let doctype = dom.create_doctype("html", "", "");
        let doc = dom.document();
        dom.append(doc, doctype);

        assert_eq!(dom.doctype(), Some(("html", "", "")));
    }
}
