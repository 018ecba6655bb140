use std::collections::{HashMap, HashSet};

use crate::graph::Node;
use crate::labels::Key;

use super::Engine;

impl Engine<'_> {
    /// Runs up to `k` rounds of relaxation from `sources` below `bound`.
    ///
    /// Returns `(pivots, witnesses)`. When the witness set grows past
    /// `k·|S|` every source is a pivot; otherwise the pivots are the sources
    /// rooting at least `k` vertices in the forest of tight edges inside the
    /// witness set.
    pub(crate) fn find_pivots(&mut self, bound: Key, sources: &[Node]) -> (Vec<Node>, Vec<Node>) {
        let k = self.params.k;
        let graph = self.graph;
        let mut witnesses: Vec<Node> = sources.to_vec();
        let mut in_witnesses: HashSet<Node> = sources.iter().copied().collect();
        let mut frontier = sources.to_vec();

        for _ in 0..k {
            let mut next = Vec::new();
            let mut in_next = HashSet::new();
            for &u in &frontier {
                for &(v, w) in &graph.adj[u] {
                    let Some(key) = self.table.relax(u, v, w) else { continue };
                    if key < bound {
                        if in_next.insert(v) {
                            next.push(v);
                        }
                        if in_witnesses.insert(v) {
                            witnesses.push(v);
                        }
                    }
                }
                self.table.mark_scanned(u);
            }
            if witnesses.len() > k.saturating_mul(sources.len()) {
                return (sources.to_vec(), witnesses);
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        let children = self.tight_forest(&witnesses, &in_witnesses);
        let mut sizes: HashMap<Node, usize> = HashMap::new();
        let pivots = sources
            .iter()
            .copied()
            .filter(|&s| subtree_size(s, &children, &mut sizes) >= k)
            .collect();
        (pivots, witnesses)
    }

    /// Children lists of the forest formed by witness edges `u -> v` that
    /// realise `v`'s label and match its predecessor entry.
    fn tight_forest(&self, witnesses: &[Node], in_witnesses: &HashSet<Node>) -> HashMap<Node, Vec<Node>> {
        let mut children: HashMap<Node, Vec<Node>> = HashMap::new();
        let mut has_parent: HashSet<Node> = HashSet::new();
        for &u in witnesses {
            let from = self.table.label(u);
            for &(v, w) in &self.graph.adj[u] {
                if in_witnesses.contains(&v)
                    && self.table.pred(v) == Some(u)
                    && self.table.label(v) == from.extend(w)
                    && has_parent.insert(v)
                {
                    children.entry(u).or_default().push(v);
                }
            }
        }
        children
    }
}

fn subtree_size(root: Node, children: &HashMap<Node, Vec<Node>>, sizes: &mut HashMap<Node, usize>) -> usize {
    if let Some(&size) = sizes.get(&root) {
        return size;
    }
    let mut stack = vec![(root, false)];
    while let Some((v, expanded)) = stack.pop() {
        if sizes.contains_key(&v) {
            continue;
        }
        let kids = children.get(&v).map(Vec::as_slice).unwrap_or(&[]);
        if expanded {
            let size = 1 + kids.iter().map(|c| sizes.get(c).copied().unwrap_or(0)).sum::<usize>();
            sizes.insert(v, size);
        } else {
            stack.push((v, true));
            stack.extend(kids.iter().filter(|c| !sizes.contains_key(*c)).map(|&c| (c, false)));
        }
    }
    sizes.get(&root).copied().unwrap_or(1)
}
