//! Tentative labels, the key order used for every bound, and the shared
//! distance/predecessor table.
use std::cmp::Ordering;

use crate::graph::{Node, Weight};

/// Length of the best known path together with its edge count.
/// Ordered by distance, then hops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Label {
    pub dist: Weight,
    pub hops: usize,
}

impl Label {
    pub const UNREACHED: Label = Label { dist: Weight::INFINITY, hops: usize::MAX };
    pub const ORIGIN: Label = Label { dist: 0.0, hops: 0 };

    #[inline]
    pub fn extend(self, w: Weight) -> Label {
        Label { dist: self.dist + w, hops: self.hops.saturating_add(1) }
    }

    #[inline]
    pub fn is_reached(&self) -> bool { self.dist.is_finite() }

    #[inline]
    pub fn order(&self, other: &Label) -> Ordering {
        self.dist.total_cmp(&other.dist).then(self.hops.cmp(&other.hops))
    }
}

/// Total order over vertices: `(dist, hops, vertex)`. Distinct vertices never
/// compare equal, and a vertex always sorts after its predecessor.
#[derive(Clone, Copy, Debug)]
pub struct Key {
    pub dist: Weight,
    pub hops: usize,
    pub vertex: Node,
}

impl Key {
    pub const INFINITY: Key = Key { dist: Weight::INFINITY, hops: usize::MAX, vertex: Node::MAX };

    #[inline]
    pub fn new(label: Label, vertex: Node) -> Key {
        Key { dist: label.dist, hops: label.hops, vertex }
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then(self.hops.cmp(&other.hops))
            .then(self.vertex.cmp(&other.vertex))
    }
}
impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}
impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}
impl Eq for Key {}

/// Labels and predecessors for every vertex of the working graph, shared by
/// the whole recursion. Labels never increase.
///
/// A vertex is *stale* while its label has improved since its out-edges were
/// last relaxed unconditionally.
#[derive(Clone, Debug)]
pub struct DistanceTable {
    labels: Vec<Label>,
    pred: Vec<Option<Node>>,
    stale: Vec<bool>,
    relaxations: u64,
}

impl DistanceTable {
    pub fn new(n: usize, origin: Node) -> Self {
        let mut table = Self {
            labels: vec![Label::UNREACHED; n],
            pred: vec![None; n],
            stale: vec![false; n],
            relaxations: 0,
        };
        table.labels[origin] = Label::ORIGIN;
        table.stale[origin] = true;
        table
    }

    #[inline] pub fn label(&self, v: Node) -> Label { self.labels[v] }
    #[cfg(test)]
    pub fn dist(&self, v: Node) -> Weight { self.labels[v].dist }
    #[inline] pub fn key(&self, v: Node) -> Key { Key::new(self.labels[v], v) }
    #[inline] pub fn pred(&self, v: Node) -> Option<Node> { self.pred[v] }
    #[inline] pub fn is_stale(&self, v: Node) -> bool { self.stale[v] }
    pub fn relaxations(&self) -> u64 { self.relaxations }

    /// Relaxes `u -> v` when the extended label is not worse than `v`'s.
    /// Returns `v`'s key if the label was written.
    #[inline]
    pub fn relax(&mut self, u: Node, v: Node, w: Weight) -> Option<Key> {
        let candidate = self.labels[u].extend(w);
        self.write_if_not_worse(u, v, candidate)
    }

    /// Like [`DistanceTable::relax`], but only when the candidate key stays below `bound`.
    #[inline]
    pub fn relax_below(&mut self, u: Node, v: Node, w: Weight, bound: Key) -> Option<Key> {
        let candidate = self.labels[u].extend(w);
        if Key::new(candidate, v) >= bound {
            return None;
        }
        self.write_if_not_worse(u, v, candidate)
    }

    /// Relaxes `u -> v` only on strict improvement. Returns the new key and
    /// whether the distance itself (not just the hop count) went down.
    #[inline]
    pub fn improve(&mut self, u: Node, v: Node, w: Weight) -> Option<(Key, bool)> {
        let candidate = self.labels[u].extend(w);
        if candidate.order(&self.labels[v]) != Ordering::Less {
            return None;
        }
        let shorter = candidate.dist < self.labels[v].dist;
        self.write_if_not_worse(u, v, candidate).map(|key| (key, shorter))
    }

    fn write_if_not_worse(&mut self, u: Node, v: Node, candidate: Label) -> Option<Key> {
        if !candidate.is_reached() {
            return None;
        }
        match candidate.order(&self.labels[v]) {
            Ordering::Greater => None,
            ord => {
                if ord == Ordering::Less {
                    self.stale[v] = true;
                }
                self.labels[v] = candidate;
                self.pred[v] = Some(u);
                self.relaxations += 1;
                Some(Key::new(candidate, v))
            }
        }
    }

    /// Records that every out-edge of `u` was just relaxed at its current label.
    #[inline]
    pub fn mark_scanned(&mut self, u: Node) { self.stale[u] = false; }

    pub fn stale_vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.stale
            .iter()
            .enumerate()
            .filter(move |&(v, &s)| s && self.labels[v].is_reached())
            .map(|(v, _)| v)
    }

    pub fn into_parts(self) -> (Vec<Label>, Vec<Option<Node>>) { (self.labels, self.pred) }

    #[cfg(test)]
    pub(crate) fn seed(&mut self, v: Node, label: Label) {
        self.labels[v] = label;
        self.stale[v] = true;
    }
}
