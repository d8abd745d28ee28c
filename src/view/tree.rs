//! Tree operations: insert, attach, detach, move, remove, walk.

use std::collections::{HashMap, VecDeque};

use slotmap::{SecondaryMap, SlotMap};

use super::node::{ViewData, ViewId};
use crate::error::{Error, Result};

/// Empty slice constant for returning when a view has no children.
const EMPTY_CHILDREN: &[ViewId] = &[];

/// The view tree of one session, backed by a slotmap arena.
///
/// Containers own their children through the `children` map; the `parent`
/// map is a back-reference for lookup only. A view has at most one parent.
pub struct ViewTree {
    nodes: SlotMap<ViewId, ViewData>,
    children: SecondaryMap<ViewId, Vec<ViewId>>,
    parent: SecondaryMap<ViewId, ViewId>,
    handles: HashMap<u64, ViewId>,
    root: Option<ViewId>,
}

impl ViewTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            handles: HashMap::new(),
            root: None,
        }
    }

    /// Insert a detached view.
    pub fn insert(&mut self, data: ViewData) -> ViewId {
        let handle = data.handle;
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.handles.insert(handle, id);
        id
    }

    /// Attach the detached view `child` under `parent` at `position`
    /// (clamped; `None` appends). Returns the position actually used.
    pub fn attach(&mut self, child: ViewId, parent: ViewId, position: Option<usize>) -> Result<usize> {
        if !self.nodes.contains_key(child) {
            return Err(Error::ViewNotFound(format!("{child:?}")));
        }
        if self.parent.contains_key(child) {
            return Err(Error::InvalidTreeOperation(format!(
                "{child:?} already has a parent"
            )));
        }
        if child == parent || self.is_descendant(parent, child) {
            return Err(Error::InvalidTreeOperation(format!(
                "{child:?} cannot be placed inside its own subtree"
            )));
        }
        let container = self.nodes.get(parent).map(|data| data.container);
        match container {
            None => return Err(Error::ViewNotFound(format!("{parent:?}"))),
            Some(false) => {
                return Err(Error::InvalidTreeOperation(format!(
                    "{parent:?} is not a container"
                )))
            }
            Some(true) => {}
        }
        let siblings = self
            .children
            .get_mut(parent)
            .ok_or_else(|| Error::InvalidTreeOperation(format!("{parent:?} has no child list")))?;
        let position = position.map_or(siblings.len(), |p| p.min(siblings.len()));
        siblings.insert(position, child);
        self.parent.insert(child, parent);
        Ok(position)
    }

    /// Detach `child` from its parent, keeping its subtree. Returns the old
    /// parent and position.
    pub fn detach(&mut self, child: ViewId) -> Option<(ViewId, usize)> {
        let parent = self.parent.remove(child)?;
        let siblings = self.children.get_mut(parent)?;
        let position = siblings.iter().position(|&c| c == child)?;
        siblings.remove(position);
        Some((parent, position))
    }

    /// Move `node` (with its subtree) under `new_parent` at `position`.
    ///
    /// Moving a view under itself or one of its descendants is rejected and
    /// leaves the tree unchanged.
    pub fn move_to(&mut self, node: ViewId, new_parent: ViewId, position: Option<usize>) -> Result<usize> {
        if !self.nodes.contains_key(node) {
            return Err(Error::ViewNotFound(format!("{node:?}")));
        }
        if node == new_parent || self.is_descendant(new_parent, node) {
            return Err(Error::InvalidTreeOperation(format!(
                "cannot move {node:?} under its own subtree"
            )));
        }
        if !self.nodes.get(new_parent).is_some_and(|data| data.container) {
            return Err(Error::InvalidTreeOperation(format!(
                "{new_parent:?} is not a container"
            )));
        }
        let old = self.detach(node);
        self.attach(node, new_parent, position).inspect_err(|_| {
            if let Some((parent, at)) = old {
                if let Some(siblings) = self.children.get_mut(parent) {
                    siblings.insert(at.min(siblings.len()), node);
                    self.parent.insert(node, parent);
                }
            }
        })
    }

    /// Remove a view and all its descendants.
    ///
    /// Returns the removed views in breadth-first order, starting with `id`;
    /// empty if `id` did not exist.
    pub fn remove(&mut self, id: ViewId) -> Vec<(ViewId, ViewData)> {
        if !self.nodes.contains_key(id) {
            return Vec::new();
        }

        self.detach(id);
        if self.root == Some(id) {
            self.root = None;
        }

        let mut removed = Vec::new();
        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            if let Some(data) = self.nodes.remove(current) {
                self.handles.remove(&data.handle);
                removed.push((current, data));
            }
        }
        removed
    }

    /// Get the parent of a view, if it has one.
    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.parent.get(id).copied()
    }

    /// Children of a view. Empty if the view has none or does not exist.
    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Position of `child` among its siblings.
    pub fn position(&self, child: ViewId) -> Option<usize> {
        let parent = self.parent(child)?;
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Ancestors from the immediate parent up to the topmost view.
    pub fn ancestors(&self, id: ViewId) -> Vec<ViewId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Whether `node` lies strictly inside the subtree of `ancestor`.
    pub fn is_descendant(&self, node: ViewId, ancestor: ViewId) -> bool {
        let mut current = node;
        while let Some(p) = self.parent.get(current).copied() {
            if p == ancestor {
                return true;
            }
            current = p;
        }
        false
    }

    /// Immutable access to a view's data.
    pub fn get(&self, id: ViewId) -> Option<&ViewData> {
        self.nodes.get(id)
    }

    /// Mutable access to a view's data.
    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut ViewData> {
        self.nodes.get_mut(id)
    }

    /// Resolve a renderer handle.
    pub fn by_handle(&self, handle: u64) -> Option<ViewId> {
        self.handles.get(&handle).copied()
    }

    /// The session root, if set.
    pub fn root(&self) -> Option<ViewId> {
        self.root
    }

    /// Make `id` the root.
    pub fn set_root(&mut self, id: ViewId) {
        self.root = Some(id);
    }

    /// Number of views in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the arena contains a view with the given id.
    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Whether `id` is the root or attached beneath it.
    pub fn is_attached(&self, id: ViewId) -> bool {
        match self.root {
            Some(root) => id == root || self.is_descendant(id, root),
            None => false,
        }
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: ViewId) -> Vec<ViewId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Drop every view.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.children.clear();
        self.parent.clear();
        self.handles.clear();
        self.root = None;
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}
