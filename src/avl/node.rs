//! Entry nodes and the recursive AVL algorithms.
//!
//! Every structural operation works on a [`Link`], the owning slot a subtree
//! root lives in. A recursive step restructures the subtree below it and then
//! writes the (possibly new) subtree root back into that slot, so parents are
//! rebuilt bottom-up without back-references.

use std::borrow::Borrow;
use std::cmp::Ordering;

use super::error::DuplicateKeyError;

// =============================================================================
// Node Definition
// =============================================================================

/// An owning, possibly empty, subtree.
pub(super) type Link<K, V> = Option<Box<Node<K, V>>>;

/// A single entry of the tree.
///
/// The node exclusively owns both children. `height` caches the height of the
/// subtree rooted here (a leaf has height 1) and is refreshed whenever the
/// children change.
#[derive(Clone)]
pub(super) struct Node<K, V> {
    pub(super) key: K,
    pub(super) value: V,
    height: u8,
    pub(super) left: Link<K, V>,
    pub(super) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    /// Creates a node with no children.
    const fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        }
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// `height(left) - height(right)`.
    fn balance_factor(&self) -> i16 {
        i16::from(height(&self.left)) - i16::from(height(&self.right))
    }
}

/// Height of a subtree; an empty subtree has height 0.
pub(super) fn height<K, V>(link: &Link<K, V>) -> u8 {
    link.as_ref().map_or(0, |node| node.height)
}

fn balance_factor<K, V>(link: &Link<K, V>) -> i16 {
    link.as_ref().map_or(0, |node| node.balance_factor())
}

// =============================================================================
// Rotations
// =============================================================================

/// Rotates the subtree to the right around `node`.
///
/// The left child becomes the subtree root, `node` becomes its right child,
/// and the left child's former right subtree becomes `node`'s left subtree.
fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut left) = node.left.take() else {
        return node;
    };
    node.left = left.right.take();
    node.update_height();
    left.right = Some(node);
    left.update_height();
    tracing::trace!(rotation = "right", height = left.height, "rotated subtree");
    left
}

/// Mirror image of [`rotate_right`].
fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut right) = node.right.take() else {
        return node;
    };
    node.right = right.left.take();
    node.update_height();
    right.left = Some(node);
    right.update_height();
    tracing::trace!(rotation = "left", height = right.height, "rotated subtree");
    right
}

/// Replaces the subtree in `link` with the result of `rotation`.
fn rotate_link<K, V, F>(link: &mut Link<K, V>, rotation: F)
where
    F: FnOnce(Box<Node<K, V>>) -> Box<Node<K, V>>,
{
    *link = link.take().map(rotation);
}

// =============================================================================
// Insert
// =============================================================================

/// Inserts a new entry below `link` and rebalances on the way back up.
///
/// On success returns the direction the key took at the root of this subtree:
/// `Less`/`Greater` when it descended, `Equal` when the subtree was empty and
/// the new leaf now sits in `link`. Parents use that direction to tell the
/// single-rotation cases from the double-rotation ones.
///
/// A duplicate is detected while descending, before any node is created, and
/// every level returns early, so the tree is left untouched.
pub(super) fn insert<K: Ord, V>(
    link: &mut Link<K, V>,
    key: K,
    value: V,
) -> Result<Ordering, DuplicateKeyError<K, V>> {
    let node = match link {
        Some(node) => node,
        None => {
            *link = Some(Box::new(Node::leaf(key, value)));
            return Ok(Ordering::Equal);
        }
    };

    let direction = key.cmp(&node.key);
    let child_direction = match direction {
        Ordering::Less => insert(&mut node.left, key, value)?,
        Ordering::Greater => insert(&mut node.right, key, value)?,
        Ordering::Equal => return Err(DuplicateKeyError { key, value }),
    };

    node.update_height();
    match (node.balance_factor(), child_direction) {
        // Left-Left
        (2.., Ordering::Less) => rotate_link(link, rotate_right),
        // Left-Right
        (2.., Ordering::Greater) => {
            rotate_link(&mut node.left, rotate_left);
            rotate_link(link, rotate_right);
        }
        // Right-Right
        (..=-2, Ordering::Greater) => rotate_link(link, rotate_left),
        // Right-Left
        (..=-2, Ordering::Less) => {
            rotate_link(&mut node.right, rotate_right);
            rotate_link(link, rotate_left);
        }
        _ => {}
    }

    Ok(direction)
}

// =============================================================================
// Remove
// =============================================================================

/// Removes the entry for `key` below `link`, rebalancing every ancestor.
///
/// Returns `None` and leaves the subtree untouched when the key is absent.
pub(super) fn remove<K, V, Q>(link: &mut Link<K, V>, key: &Q) -> Option<(K, V)>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let node = link.as_mut()?;
    let removed = match key.cmp(node.key.borrow()) {
        Ordering::Less => remove(&mut node.left, key)?,
        Ordering::Greater => remove(&mut node.right, key)?,
        Ordering::Equal => unlink(link)?,
    };
    rebalance_after_remove(link);
    Some(removed)
}

/// Takes the node in `link` out of the tree and puts its replacement in the
/// slot: nothing for a leaf, the only child for a single-child node, and the
/// in-order successor for a node with two children.
fn unlink<K, V>(link: &mut Link<K, V>) -> Option<(K, V)> {
    let node = link.take()?;
    let Node {
        key,
        value,
        left,
        right,
        ..
    } = *node;

    match (left, right) {
        (None, None) => {}
        (Some(child), None) | (None, Some(child)) => *link = Some(child),
        (Some(left), Some(right)) => {
            let mut right = Some(right);
            *link = match take_min(&mut right) {
                Some(mut successor) => {
                    successor.left = Some(left);
                    successor.right = right;
                    successor.update_height();
                    Some(successor)
                }
                None => Some(left),
            };
        }
    }

    Some((key, value))
}

/// Detaches the leftmost node below `link`, rebalancing along the left spine.
///
/// The detached node comes back with no children; its right subtree takes
/// its former place.
fn take_min<K, V>(link: &mut Link<K, V>) -> Option<Box<Node<K, V>>> {
    let node = link.as_mut()?;
    if node.left.is_some() {
        let min = take_min(&mut node.left);
        rebalance_after_remove(link);
        min
    } else {
        let mut min = link.take()?;
        *link = min.right.take();
        min.update_height();
        Some(min)
    }
}

/// Restores the balance property at the root of `link` after a removal.
///
/// Ties go to the single rotation: a left-heavy node whose left child is
/// itself balanced is fixed with one right rotation (and symmetrically).
fn rebalance_after_remove<K, V>(link: &mut Link<K, V>) {
    let Some(node) = link.as_mut() else {
        return;
    };
    node.update_height();
    match node.balance_factor() {
        2.. => {
            if balance_factor(&node.left) < 0 {
                rotate_link(&mut node.left, rotate_left);
            }
            rotate_link(link, rotate_right);
        }
        ..=-2 => {
            if balance_factor(&node.right) > 0 {
                rotate_link(&mut node.right, rotate_right);
            }
            rotate_link(link, rotate_left);
        }
        _ => {}
    }
}

// =============================================================================
// Queries
// =============================================================================

/// Finds the node holding `key`.
pub(super) fn find<'a, K, V, Q>(link: &'a Link<K, V>, key: &Q) -> Option<&'a Node<K, V>>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    link.as_deref()
        .and_then(|node| match key.cmp(node.key.borrow()) {
            Ordering::Less => find(&node.left, key),
            Ordering::Greater => find(&node.right, key),
            Ordering::Equal => Some(node),
        })
}

pub(super) fn find_mut<'a, K, V, Q>(link: &'a mut Link<K, V>, key: &Q) -> Option<&'a mut V>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    link.as_deref_mut()
        .and_then(|node| match key.cmp(node.key.borrow()) {
            Ordering::Less => find_mut(&mut node.left, key),
            Ordering::Greater => find_mut(&mut node.right, key),
            Ordering::Equal => Some(&mut node.value),
        })
}

/// Number of entries below `link`, counted node by node.
pub(super) fn count<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref()
        .map_or(0, |node| 1 + count(&node.left) + count(&node.right))
}

pub(super) fn leftmost<K, V>(link: &Link<K, V>) -> Option<&Node<K, V>> {
    let node = link.as_deref()?;
    leftmost(&node.left).or(Some(node))
}

pub(super) fn rightmost<K, V>(link: &Link<K, V>) -> Option<&Node<K, V>> {
    let node = link.as_deref()?;
    rightmost(&node.right).or(Some(node))
}

/// Collects, left to right, the slot of every position at `depth` below
/// `link`: `Some(key)` for a node, `None` for a missing child whose parent
/// sits one level up.
pub(super) fn collect_row<'a, K, V>(
    link: &'a Link<K, V>,
    depth: usize,
    row: &mut Vec<Option<&'a K>>,
) {
    if depth == 0 {
        row.push(link.as_ref().map(|node| &node.key));
    } else if let Some(node) = link {
        collect_row(&node.left, depth - 1, row);
        collect_row(&node.right, depth - 1, row);
    }
}

/// In-order traversal.
pub(super) fn collect_in_order<'a, K, V>(link: &'a Link<K, V>, entries: &mut Vec<(&'a K, &'a V)>) {
    if let Some(node) = link {
        collect_in_order(&node.left, entries);
        entries.push((&node.key, &node.value));
        collect_in_order(&node.right, entries);
    }
}

/// In-order traversal that consumes the tree.
pub(super) fn drain_in_order<K, V>(link: Link<K, V>, entries: &mut Vec<(K, V)>) {
    if let Some(node) = link {
        let Node {
            key,
            value,
            left,
            right,
            ..
        } = *node;
        drain_in_order(left, entries);
        entries.push((key, value));
        drain_in_order(right, entries);
    }
}

/// Recomputes every height from scratch and returns the height of `link`
/// when each node is balanced and carries an accurate cached height.
pub(super) fn checked_height<K, V>(link: &Link<K, V>) -> Option<u8> {
    let Some(node) = link else {
        return Some(0);
    };
    let left = checked_height(&node.left)?;
    let right = checked_height(&node.right)?;
    let expected = 1 + left.max(right);
    (left.abs_diff(right) <= 1 && node.height == expected).then_some(expected)
}

// =============================================================================
// Tests
// =============================================================================
