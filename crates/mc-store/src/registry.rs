//! Association registry
//!
//! Lets independently created UI nodes bind to one `MediaStore` instance
//! without a shared ancestor in code. A node resolves its controller either
//! by a declared `mediacontroller` reference (an id looked up in the root
//! scope) or by walking the tree upward, crossing shadow boundaries,
//! until a controller node is found. Nodes whose element kind has not been
//! defined yet defer association and retry exactly once when the kind is
//! defined.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use mc_state::MediaState;

use crate::store::{MediaStore, Subscription};
use crate::tokens::TokenSet;

/// Attribute naming the controller a node wants to bind to.
pub const CONTROLLER_ATTR: &str = "mediacontroller";

/// Default hotkey tokens a controller responds to until its `hotkeys`
/// attribute is assigned.
pub const DEFAULT_HOTKEYS: &[&str] = &["space", "k", "m", "f", "c", "arrowleft", "arrowright"];

/// Node identifier (index into the tree's arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

type StateCallback = Rc<RefCell<dyn FnMut(&MediaState)>>;

struct Membership {
    controller: NodeId,
    /// Dropping the membership drops the store subscription with it.
    _subscription: Option<Subscription>,
}

struct ControlNode {
    kind: String,
    parent: Option<NodeId>,
    /// Shadow host; the upward walk continues here when the parent chain
    /// ends at a shadow root.
    host: Option<NodeId>,
    attrs: HashMap<String, String>,
    store: Option<MediaStore>,
    members: Vec<NodeId>,
    membership: Option<Membership>,
    on_state: Option<StateCallback>,
}

impl ControlNode {
    fn new(kind: &str, parent: Option<NodeId>, host: Option<NodeId>) -> Self {
        Self {
            kind: kind.to_string(),
            parent,
            host,
            attrs: HashMap::new(),
            store: None,
            members: Vec::new(),
            membership: None,
            on_state: None,
        }
    }
}

/// Widget tree plus the controller association machinery.
#[derive(Default)]
pub struct ControlTree {
    nodes: Vec<ControlNode>,
    definitions: HashSet<String>,
    pending: HashMap<String, Vec<NodeId>>,
}

impl ControlTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_node(&mut self, kind: &str, parent: Option<NodeId>) -> NodeId {
        self.push(ControlNode::new(kind, parent, None))
    }

    /// Create a controller node carrying a store.
    pub fn create_controller(&mut self, parent: Option<NodeId>, store: MediaStore) -> NodeId {
        let mut node = ControlNode::new("media-controller", parent, None);
        node.store = Some(store);
        self.push(node)
    }

    /// Create a shadow root under `host`. Its descendants use normal parent
    /// links; the upward walk crosses back to the host.
    pub fn attach_shadow_root(&mut self, host: NodeId) -> NodeId {
        self.push(ControlNode::new("#shadow-root", None, Some(host)))
    }

    fn push(&mut self, node: ControlNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.node_mut(node)
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node).attrs.get(name).map(String::as_str)
    }

    /// Install the callback that receives state pushes once associated.
    pub fn set_state_callback(
        &mut self,
        node: NodeId,
        callback: impl FnMut(&MediaState) + 'static,
    ) {
        self.node_mut(node).on_state = Some(Rc::new(RefCell::new(callback)));
    }

    pub fn controller_store(&self, controller: NodeId) -> Option<&MediaStore> {
        self.node(controller).store.as_ref()
    }

    pub fn controller_of(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).membership.as_ref().map(|m| m.controller)
    }

    pub fn members(&self, controller: NodeId) -> &[NodeId] {
        &self.node(controller).members
    }

    // Definitions

    pub fn is_defined(&self, kind: &str) -> bool {
        self.definitions.contains(kind)
    }

    /// Define an element kind and retry its deferred associations, each
    /// exactly once.
    pub fn define(&mut self, kind: &str) {
        self.definitions.insert(kind.to_string());
        if let Some(deferred) = self.pending.remove(kind) {
            for node in deferred {
                self.try_associate(node);
            }
        }
    }

    // Association

    /// Associate `node` with its controller. Returns whether the node is
    /// associated when the call returns; an undefined kind defers instead.
    pub fn associate(&mut self, node: NodeId) -> bool {
        let kind = self.node(node).kind.clone();
        if !self.definitions.contains(&kind) {
            let queue = self.pending.entry(kind.clone()).or_default();
            if !queue.contains(&node) {
                queue.push(node);
                tracing::debug!("association of <{}> deferred until defined", kind);
            }
            return false;
        }
        self.try_associate(node)
    }

    pub fn unassociate(&mut self, node: NodeId) {
        if let Some(membership) = self.node_mut(node).membership.take() {
            let controller = membership.controller;
            self.node_mut(controller).members.retain(|n| *n != node);
        }
    }

    fn try_associate(&mut self, node: NodeId) -> bool {
        let Some(controller) = self.resolve_controller(node) else {
            // Fails open: the node simply never receives state.
            tracing::debug!("no controller resolved for node {:?}", node);
            return false;
        };

        let Some(store) = self.node(controller).store.clone() else {
            return false;
        };
        self.unassociate(node);
        self.node_mut(controller).members.push(node);

        let subscription = match self.node(node).on_state.clone() {
            Some(callback) => {
                (&mut *callback.borrow_mut())(&store.get_state());
                let callback = Rc::clone(&callback);
                Some(store.subscribe_with(
                    |state: &MediaState| state.clone(),
                    |a, b| a == b,
                    move |state| (&mut *callback.borrow_mut())(state),
                ))
            }
            None => None,
        };

        self.node_mut(node).membership = Some(Membership {
            controller,
            _subscription: subscription,
        });
        true
    }

    fn resolve_controller(&self, node: NodeId) -> Option<NodeId> {
        if let Some(reference) = self.node(node).attrs.get(CONTROLLER_ATTR) {
            return self
                .find_by_element_id(reference)
                .filter(|c| self.node(*c).store.is_some());
        }

        let mut current = self.parent_or_host(node);
        while let Some(ancestor) = current {
            if self.node(ancestor).store.is_some() {
                return Some(ancestor);
            }
            current = self.parent_or_host(ancestor);
        }
        None
    }

    fn find_by_element_id(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.attrs.get("id").is_some_and(|v| v == id))
            .map(|index| NodeId(index as u32))
    }

    fn parent_or_host(&self, node: NodeId) -> Option<NodeId> {
        let node = self.node(node);
        node.parent.or(node.host)
    }

    // Hotkeys

    /// The controller's hotkey token set, falling back to `DEFAULT_HOTKEYS`
    /// while the attribute is unassigned.
    pub fn hotkeys(&self, controller: NodeId) -> TokenSet {
        TokenSet::from_attr(
            self.attribute(controller, "hotkeys"),
            DEFAULT_HOTKEYS.iter().copied(),
        )
    }

    /// Write a modified hotkey set back to the controller's attribute.
    pub fn set_hotkeys(&mut self, controller: NodeId, hotkeys: &TokenSet) {
        if let Some(value) = hotkeys.assigned_value() {
            self.set_attribute(controller, "hotkeys", &value);
        }
    }

    fn node(&self, id: NodeId) -> &ControlNode {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut ControlNode {
        &mut self.nodes[id.0 as usize]
    }
}
