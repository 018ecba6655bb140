//! Block-structured frontier queue.
//!
//! Entries live in two sequences of blocks: `prepended`, fed by
//! [`FrontierQueue::batch_prepend`], and `sorted`, fed one entry at a time by
//! [`FrontierQueue::insert`]. Blocks of `sorted` carry an upper-bound marker
//! so an insert finds its block by binary search; a block that outgrows the
//! capacity is split at its median. [`FrontierQueue::pull`] hands out the
//! smallest entries a block prefix at a time.
//!
//! Entries and blocks are stored in arenas and linked by index, so removing
//! an arbitrary entry is O(1) and deleting an emptied block only renumbers
//! the blocks behind it.
use std::collections::HashMap;
use std::ops::Range;

use crate::graph::Node;

const NIL: usize = usize::MAX;

type EntryId = usize;
type BlockId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sequence {
    Prepended,
    Sorted,
}

#[derive(Clone, Debug)]
struct Entry<K> {
    vertex: Node,
    key: K,
    prev: EntryId,
    next: EntryId,
    block: BlockId,
}

#[derive(Clone, Debug)]
struct Block {
    head: EntryId,
    tail: EntryId,
    len: usize,
    sequence: Sequence,
    position: usize,
}

#[derive(Clone, Debug)]
pub struct FrontierQueue<K> {
    capacity: usize,
    bound: K,
    entries: Vec<Entry<K>>,
    free_entries: Vec<EntryId>,
    blocks: Vec<Block>,
    free_blocks: Vec<BlockId>,
    prepended: Vec<BlockId>,
    sorted: Vec<BlockId>,
    /// Upper-bound marker per block of `sorted`; the last one is always `bound`.
    upper: Vec<K>,
    live: HashMap<Node, EntryId>,
}

impl<K: Copy + Ord> FrontierQueue<K> {
    /// `capacity` is the block size `M` (at least 1); every key must stay below `bound`.
    pub fn new(capacity: usize, bound: K) -> Self {
        Self {
            capacity: capacity.max(1),
            bound,
            entries: Vec::new(),
            free_entries: Vec::new(),
            blocks: Vec::new(),
            free_blocks: Vec::new(),
            prepended: Vec::new(),
            sorted: Vec::new(),
            upper: Vec::new(),
            live: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize { self.capacity }
    pub fn bound(&self) -> K { self.bound }
    pub fn len(&self) -> usize { self.live.len() }
    pub fn is_empty(&self) -> bool { self.live.is_empty() }

    /// Key of the live entry for `vertex`, if any.
    pub fn key_of(&self, vertex: Node) -> Option<K> {
        self.live.get(&vertex).map(|&id| self.entries[id].key)
    }

    /// Adds `vertex` with `key`, replacing a live entry only if `key` is smaller.
    pub fn insert(&mut self, vertex: Node, key: K) {
        debug_assert!(key < self.bound);
        if let Some(&id) = self.live.get(&vertex) {
            if self.entries[id].key <= key {
                return;
            }
            self.remove_entry(id);
        }
        if self.sorted.is_empty() {
            let block = self.alloc_block(Sequence::Sorted, 0);
            self.sorted.push(block);
            self.upper.push(self.bound);
        }
        let pos = self.upper.partition_point(|u| *u < key).min(self.sorted.len() - 1);
        let block = self.sorted[pos];
        self.push_entry(block, vertex, key);
        if self.blocks[block].len > self.capacity {
            self.split(pos);
        }
    }

    /// Prepends a batch whose keys are all smaller than anything already
    /// prepended. A pair is dropped when its vertex already holds a strictly
    /// smaller key.
    pub fn batch_prepend<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (Node, K)>,
    {
        let mut survivors: Vec<(Node, K)> = Vec::new();
        let mut slot: HashMap<Node, usize> = HashMap::new();
        for (vertex, key) in items {
            if let Some(&i) = slot.get(&vertex) {
                if key < survivors[i].1 {
                    survivors[i].1 = key;
                }
                continue;
            }
            if let Some(&id) = self.live.get(&vertex) {
                if self.entries[id].key < key {
                    continue;
                }
                self.remove_entry(id);
            }
            slot.insert(vertex, survivors.len());
            survivors.push((vertex, key));
        }
        if survivors.is_empty() {
            return;
        }

        let mut ranges = Vec::new();
        partition_by_median(&mut survivors, self.capacity, 0, &mut ranges);
        let mut fresh = Vec::with_capacity(ranges.len());
        for range in ranges {
            let block = self.alloc_block(Sequence::Prepended, 0);
            for &(vertex, key) in &survivors[range] {
                self.push_entry(block, vertex, key);
            }
            fresh.push(block);
        }
        self.prepended.splice(0..0, fresh);
        renumber(&mut self.blocks, &self.prepended, 0);
    }

    /// Removes and returns up to `M` smallest vertices together with a bound
    /// that is at most every key still held (`bound()` once the queue drains).
    pub fn pull(&mut self) -> (K, Vec<Node>) {
        let mut collected = self.collect_prefix(Sequence::Prepended);
        collected.extend(self.collect_prefix(Sequence::Sorted));

        let returned: Vec<EntryId> = if collected.len() <= self.capacity {
            collected
        } else {
            let entries = &self.entries;
            collected.sort_unstable_by(|&a, &b| entries[a].key.cmp(&entries[b].key));
            collected.truncate(self.capacity);
            collected
        };

        let vertices: Vec<Node> = returned.iter().map(|&id| self.entries[id].vertex).collect();
        for id in returned {
            self.remove_entry(id);
        }
        let next = self.min_key().unwrap_or(self.bound);
        (next, vertices)
    }

    /// Whole blocks from the front of one sequence until at least `M` entries.
    fn collect_prefix(&self, sequence: Sequence) -> Vec<EntryId> {
        let ids = match sequence {
            Sequence::Prepended => &self.prepended,
            Sequence::Sorted => &self.sorted,
        };
        let mut out = Vec::new();
        for &block in ids {
            if out.len() >= self.capacity {
                break;
            }
            out.extend(self.block_entries(block));
        }
        out
    }

    /// Smallest key held. Both sequences are ordered across blocks, so only
    /// their first blocks need scanning.
    fn min_key(&self) -> Option<K> {
        let first = |ids: &Vec<BlockId>| {
            ids.first()
                .and_then(|&b| self.block_entries(b).map(|id| self.entries[id].key).min())
        };
        match (first(&self.prepended), first(&self.sorted)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn block_entries(&self, block: BlockId) -> impl Iterator<Item = EntryId> + '_ {
        let mut cur = self.blocks[block].head;
        std::iter::from_fn(move || {
            if cur == NIL {
                return None;
            }
            let id = cur;
            cur = self.entries[id].next;
            Some(id)
        })
    }

    /// Splits `sorted[pos]` around its median key; the lower half keeps the slot.
    fn split(&mut self, pos: usize) {
        let block = self.sorted[pos];
        let mut ids: Vec<EntryId> = self.block_entries(block).collect();
        if ids.len() < 2 {
            return;
        }
        let mid = ids.len() / 2;
        let entries = &self.entries;
        ids.select_nth_unstable_by(mid, |&a, &b| entries[a].key.cmp(&entries[b].key));
        let left_max = ids[..mid].iter().map(|&id| self.entries[id].key).max();

        let right = self.alloc_block(Sequence::Sorted, pos + 1);
        for &id in &ids[mid..] {
            self.unlink(id);
            self.link(right, id);
        }
        let old_upper = self.upper[pos];
        if let Some(max) = left_max {
            self.upper[pos] = max;
        }
        self.sorted.insert(pos + 1, right);
        self.upper.insert(pos + 1, old_upper);
        renumber(&mut self.blocks, &self.sorted, pos + 1);
    }

    fn alloc_block(&mut self, sequence: Sequence, position: usize) -> BlockId {
        let block = Block { head: NIL, tail: NIL, len: 0, sequence, position };
        match self.free_blocks.pop() {
            Some(id) => {
                self.blocks[id] = block;
                id
            }
            None => {
                self.blocks.push(block);
                self.blocks.len() - 1
            }
        }
    }

    fn push_entry(&mut self, block: BlockId, vertex: Node, key: K) -> EntryId {
        let entry = Entry { vertex, key, prev: NIL, next: NIL, block };
        let id = match self.free_entries.pop() {
            Some(id) => {
                self.entries[id] = entry;
                id
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        };
        self.link(block, id);
        self.live.insert(vertex, id);
        id
    }

    /// Appends an unlinked entry to the tail of `block`.
    fn link(&mut self, block: BlockId, id: EntryId) {
        let tail = self.blocks[block].tail;
        {
            let e = &mut self.entries[id];
            e.block = block;
            e.prev = tail;
            e.next = NIL;
        }
        if tail == NIL {
            self.blocks[block].head = id;
        } else {
            self.entries[tail].next = id;
        }
        self.blocks[block].tail = id;
        self.blocks[block].len += 1;
    }

    /// Detaches an entry from its block without touching `live` or freeing it.
    fn unlink(&mut self, id: EntryId) -> BlockId {
        let Entry { prev, next, block, .. } = self.entries[id];
        if prev == NIL {
            self.blocks[block].head = next;
        } else {
            self.entries[prev].next = next;
        }
        if next == NIL {
            self.blocks[block].tail = prev;
        } else {
            self.entries[next].prev = prev;
        }
        self.blocks[block].len -= 1;
        block
    }

    fn remove_entry(&mut self, id: EntryId) {
        let block = self.unlink(id);
        self.live.remove(&self.entries[id].vertex);
        self.free_entries.push(id);
        if self.blocks[block].len == 0 {
            self.remove_block(block);
        }
    }

    fn remove_block(&mut self, block: BlockId) {
        let Block { sequence, position, .. } = self.blocks[block];
        match sequence {
            Sequence::Prepended => {
                self.prepended.remove(position);
                renumber(&mut self.blocks, &self.prepended, position);
            }
            Sequence::Sorted => {
                self.sorted.remove(position);
                self.upper.remove(position);
                if position == self.sorted.len() {
                    if let Some(last) = self.upper.last_mut() {
                        *last = self.bound;
                    }
                }
                renumber(&mut self.blocks, &self.sorted, position);
            }
        }
        self.free_blocks.push(block);
    }
}

fn renumber(blocks: &mut [Block], ids: &[BlockId], from: usize) {
    for (position, &id) in ids.iter().enumerate().skip(from) {
        blocks[id].position = position;
    }
}

/// Splits `items` around medians until every part holds at most `capacity`
/// entries; parts are emitted in increasing key order.
fn partition_by_median<K: Copy + Ord>(
    items: &mut [(Node, K)],
    capacity: usize,
    offset: usize,
    out: &mut Vec<Range<usize>>,
) {
    if items.len() <= capacity {
        if !items.is_empty() {
            out.push(offset..offset + items.len());
        }
        return;
    }
    let mid = items.len() / 2;
    items.select_nth_unstable_by(mid, |a, b| a.1.cmp(&b.1));
    let (left, right) = items.split_at_mut(mid);
    partition_by_median(left, capacity, offset, out);
    partition_by_median(right, capacity, offset + mid, out);
}
