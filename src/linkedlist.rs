//! Doubly-linked lists over generation-checked arena keys.
//!
//! Two flavours are provided:
//!
//! - **Generic lists**: the element embeds a [`Link`] and lives in the
//!   caller's [`SlotMap`]; the list itself is just a [`ListRoot`]. Widget
//!   siblings use this form, with each children list root stored in the
//!   parent widget.
//! - **Multi lists** ([`MultiList`]): the list owns small wrapper nodes that
//!   point at an external payload, so the same object (a widget handle, a
//!   data series) can sit in several independent lists.
//!
//! `ListRoot` is `Copy` so a root stored inside an arena element can be read
//! out, mutated together with the arena, and written back.
//!
//! Ordering convention: `first` is the bottom of the paint order, `last` the
//! top. "Up" moves toward `first`, "down" toward `last`.

use slotmap::{Key, SlotMap, new_key_type};

/// Previous/next links embedded in a list element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link<K: Key> {
    pub prev: Option<K>,
    pub next: Option<K>,
}

impl<K: Key> Default for Link<K> {
    fn default() -> Self {
        Self {
            prev: None,
            next: None,
        }
    }
}

/// First/last element of a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListRoot<K: Key> {
    pub first: Option<K>,
    pub last: Option<K>,
}

impl<K: Key> Default for ListRoot<K> {
    fn default() -> Self {
        Self {
            first: None,
            last: None,
        }
    }
}

impl<K: Key> ListRoot<K> {
    #[inline]
    pub const fn is_empty(&self) -> bool { self.first.is_none() }
}

/// Element that embeds a [`Link`].
pub trait Linked<K: Key> {
    fn link(&self) -> &Link<K>;
    fn link_mut(&mut self) -> &mut Link<K>;
}

#[inline]
fn link_of<K: Key, T: Linked<K>>(
    nodes: &SlotMap<K, T>,
    key: K,
) -> Link<K> {
    nodes.get(key).map(|n| *n.link()).unwrap_or_default()
}

#[inline]
fn set_prev<K: Key, T: Linked<K>>(
    nodes: &mut SlotMap<K, T>,
    key: K,
    prev: Option<K>,
) {
    if let Some(n) = nodes.get_mut(key) {
        n.link_mut().prev = prev;
    }
}

#[inline]
fn set_next<K: Key, T: Linked<K>>(
    nodes: &mut SlotMap<K, T>,
    key: K,
    next: Option<K>,
) {
    if let Some(n) = nodes.get_mut(key) {
        n.link_mut().next = next;
    }
}

/// Append `key` at the end of the list.
pub fn add<K: Key, T: Linked<K>>(
    nodes: &mut SlotMap<K, T>,
    root: &mut ListRoot<K>,
    key: K,
) {
    let prev = root.last;
    if let Some(n) = nodes.get_mut(key) {
        *n.link_mut() = Link { prev, next: None };
    } else {
        return;
    }
    match prev {
        Some(last) => set_next(nodes, last, Some(key)),
        None => root.first = Some(key),
    }
    root.last = Some(key);
}

/// Unlink `key`, leaving its neighbours connected.
pub fn remove<K: Key, T: Linked<K>>(
    nodes: &mut SlotMap<K, T>,
    root: &mut ListRoot<K>,
    key: K,
) {
    let Link { prev, next } = link_of(nodes, key);
    match prev {
        Some(p) => set_next(nodes, p, next),
        None => {
            if root.first == Some(key) {
                root.first = next;
            }
        }
    }
    match next {
        Some(n) => set_prev(nodes, n, prev),
        None => {
            if root.last == Some(key) {
                root.last = prev;
            }
        }
    }
    if let Some(n) = nodes.get_mut(key) {
        *n.link_mut() = Link::default();
    }
}

/// Next element.
///
/// With `node == None` this returns the first element of `root` (or `None`
/// when there is no root); otherwise the element after `node`.
pub fn get_next<K: Key, T: Linked<K>>(
    nodes: &SlotMap<K, T>,
    root: Option<&ListRoot<K>>,
    node: Option<K>,
) -> Option<K> {
    match node {
        None => root.and_then(|r| r.first),
        Some(n) => nodes.get(n).and_then(|n| n.link().next),
    }
}

/// Previous element, mirroring [`get_next`] from the list end.
pub fn get_prev<K: Key, T: Linked<K>>(
    nodes: &SlotMap<K, T>,
    root: Option<&ListRoot<K>>,
    node: Option<K>,
) -> Option<K> {
    match node {
        None => root.and_then(|r| r.last),
        Some(n) => nodes.get(n).and_then(|n| n.link().prev),
    }
}

/// Element at `index`, counted from the first element.
pub fn get_by_index<K: Key, T: Linked<K>>(
    nodes: &SlotMap<K, T>,
    root: &ListRoot<K>,
    index: usize,
) -> Option<K> {
    iter(nodes, root).nth(index)
}

/// Swap `key` with its next element. Returns `false` when already last.
pub fn move_down<K: Key, T: Linked<K>>(
    nodes: &mut SlotMap<K, T>,
    root: &mut ListRoot<K>,
    key: K,
) -> bool {
    let Link { prev, next } = link_of(nodes, key);
    let Some(next) = next else {
        return false;
    };
    let next_next = link_of(nodes, next).next;

    // prev <-> next <-> key <-> next_next
    match prev {
        Some(p) => set_next(nodes, p, Some(next)),
        None => root.first = Some(next),
    }
    set_prev(nodes, next, prev);
    set_next(nodes, next, Some(key));
    set_prev(nodes, key, Some(next));
    set_next(nodes, key, next_next);
    match next_next {
        Some(nn) => set_prev(nodes, nn, Some(key)),
        None => root.last = Some(key),
    }
    true
}

/// Swap `key` with its previous element. Returns `false` when already first.
pub fn move_up<K: Key, T: Linked<K>>(
    nodes: &mut SlotMap<K, T>,
    root: &mut ListRoot<K>,
    key: K,
) -> bool {
    match link_of(nodes, key).prev {
        Some(prev) => move_down(nodes, root, prev),
        None => false,
    }
}

/// Iterate from first to last.
pub fn iter<'a, K: Key, T: Linked<K>>(
    nodes: &'a SlotMap<K, T>,
    root: &ListRoot<K>,
) -> Iter<'a, K, T> {
    Iter {
        nodes,
        cursor: root.first,
        reverse: false,
    }
}

/// Iterate from last to first.
pub fn iter_rev<'a, K: Key, T: Linked<K>>(
    nodes: &'a SlotMap<K, T>,
    root: &ListRoot<K>,
) -> Iter<'a, K, T> {
    Iter {
        nodes,
        cursor: root.last,
        reverse: true,
    }
}

/// Key iterator over a generic list.
pub struct Iter<'a, K: Key, T> {
    nodes: &'a SlotMap<K, T>,
    cursor: Option<K>,
    reverse: bool,
}

impl<K: Key, T: Linked<K>> Iterator for Iter<'_, K, T> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let key = self.cursor?;
        let link = self.nodes.get(key)?.link();
        self.cursor = if self.reverse { link.prev } else { link.next };
        Some(key)
    }
}

// =============================================================================
// Multi List
// =============================================================================

new_key_type! {
    /// Key of a wrapper node inside a [`MultiList`].
    pub struct MultiKey;
}

struct MultiNode<T> {
    link: Link<MultiKey>,
    element: T,
}

impl<T> Linked<MultiKey> for MultiNode<T> {
    fn link(&self) -> &Link<MultiKey> { &self.link }

    fn link_mut(&mut self) -> &mut Link<MultiKey> { &mut self.link }
}

/// List of wrapper nodes pointing at external elements.
pub struct MultiList<T> {
    nodes: SlotMap<MultiKey, MultiNode<T>>,
    root: ListRoot<MultiKey>,
}

impl<T> MultiList<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: ListRoot::default(),
        }
    }

    /// Append `element` in a new wrapper node.
    pub fn add(
        &mut self,
        element: T,
    ) -> MultiKey {
        let key = self.nodes.insert(MultiNode {
            link: Link::default(),
            element,
        });
        add(&mut self.nodes, &mut self.root, key);
        key
    }

    /// Unlink and free a wrapper node, returning its element.
    pub fn remove(
        &mut self,
        key: MultiKey,
    ) -> Option<T> {
        if !self.nodes.contains_key(key) {
            return None;
        }
        remove(&mut self.nodes, &mut self.root, key);
        self.nodes.remove(key).map(|n| n.element)
    }

    pub fn get(
        &self,
        key: MultiKey,
    ) -> Option<&T> {
        self.nodes.get(key).map(|n| &n.element)
    }

    pub fn get_mut(
        &mut self,
        key: MultiKey,
    ) -> Option<&mut T> {
        self.nodes.get_mut(key).map(|n| &mut n.element)
    }

    /// Wrapper node after `key`, or the first node when `key` is `None`.
    pub fn next(
        &self,
        key: Option<MultiKey>,
    ) -> Option<MultiKey> {
        get_next(&self.nodes, Some(&self.root), key)
    }

    /// Wrapper node before `key`, or the last node when `key` is `None`.
    pub fn prev(
        &self,
        key: Option<MultiKey>,
    ) -> Option<MultiKey> {
        get_prev(&self.nodes, Some(&self.root), key)
    }

    pub fn key_at(
        &self,
        index: usize,
    ) -> Option<MultiKey> {
        get_by_index(&self.nodes, &self.root, index)
    }

    #[inline]
    pub fn len(&self) -> usize { self.nodes.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Iterate elements from first to last.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        iter(&self.nodes, &self.root).filter_map(move |k| self.get(k))
    }

    /// Iterate `(key, element)` pairs from first to last.
    pub fn entries(&self) -> impl Iterator<Item = (MultiKey, &T)> + '_ {
        iter(&self.nodes, &self.root).filter_map(move |k| self.get(k).map(|e| (k, e)))
    }
}

impl<T: PartialEq> MultiList<T> {
    /// Remove every node whose element equals `element`. Returns the count.
    pub fn find_remove(
        &mut self,
        element: &T,
    ) -> usize {
        let mut removed = 0;
        let mut cursor = self.root.first;
        while let Some(key) = cursor {
            cursor = link_of(&self.nodes, key).next;
            if self.get(key) == Some(element) {
                self.remove(key);
                removed += 1;
            }
        }
        removed
    }
}

impl<T> Default for MultiList<T> {
    fn default() -> Self { Self::new() }
}
