/*!
A chained hash table over slot-keyed entries.

Entries are stored in a [SlotMap] and linked into singly linked bucket chains by stable [EntryKey]s.
Emptied slots are recycled by the slot map, bounding allocation churn, while keys held elsewhere stay valid until their entry is removed.

Buckets are a power of two; an entry's bucket is obtained by avalanche-mixing its stored hash and masking to the table size.
The table doubles when occupancy reaches a configured share of the buckets, rehashing every entry by its stored hash.

Chains preserve insertion order within a bucket only in the sense that new entries are linked at the head; order *within* an entry's value is the business of the caller.

```rust
# use tableau_core::generic::chained::ChainedTable;
let mut table: ChainedTable<Vec<u32>> = ChainedTable::new(4, 75);

let key = table.insert(11, vec![1]);
table.get_mut(key).push(2);

assert_eq!(table.find(11, |v| v.first() == Some(&1)), Some(key));
assert_eq!(table.unlink(key), Some(vec![1, 2]));
assert_eq!(table.find(11, |_| true), None);
```
*/

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// A stable key to an entry of a [ChainedTable].
    pub struct EntryKey;
}

/// An entry: a stored hash, a chain link, and the caller's value.
struct ChainEntry<T> {
    hash: u32,
    next: Option<EntryKey>,
    value: T,
}

/// A chained hash table over slot-keyed entries.
pub struct ChainedTable<T> {
    /// Heads of the bucket chains.
    buckets: Vec<Option<EntryKey>>,

    /// The entries, addressed by stable keys.
    entries: SlotMap<EntryKey, ChainEntry<T>>,

    /// A count of linked entries.
    count: usize,

    /// Occupancy at which the table doubles.
    threshold: usize,

    /// The share of buckets (in percent) used to derive the threshold.
    load_factor_percent: usize,
}

/// Avalanche mix, so digests which differ only in high bits spread over the buckets.
fn mix(hash: u32) -> u32 {
    let mut hash = hash.wrapping_add(!(hash << 9));
    hash ^= hash >> 14;
    hash = hash.wrapping_add(hash << 4);
    hash ^= hash >> 10;
    hash
}

fn index_for(hash: u32, bucket_count: usize) -> usize {
    mix(hash) as usize & (bucket_count - 1)
}

impl<T> ChainedTable<T> {
    /// A fresh table with (at least) the given bucket count, doubling at `load_factor_percent` occupancy.
    pub fn new(initial_buckets: usize, load_factor_percent: usize) -> Self {
        let bucket_count = initial_buckets.next_power_of_two();
        ChainedTable {
            buckets: vec![None; bucket_count],
            entries: SlotMap::with_key(),
            count: 0,
            threshold: (bucket_count * load_factor_percent) / 100,
            load_factor_percent,
        }
    }

    /// A count of linked entries.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Drop every entry, keeping the current bucket count.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|bucket| *bucket = None);
        self.entries.clear();
        self.count = 0;
    }

    /// Link a fresh entry for `hash` at the head of its bucket.
    pub fn insert(&mut self, hash: u32, value: T) -> EntryKey {
        let bucket = index_for(hash, self.buckets.len());
        let key = self.entries.insert(ChainEntry {
            hash,
            next: self.buckets[bucket],
            value,
        });
        self.buckets[bucket] = Some(key);
        self.count += 1;
        if self.count >= self.threshold {
            self.resize(self.buckets.len() * 2);
        }
        key
    }

    /// The first entry in `hash`'s bucket with a matching hash and a value satisfying `matches`.
    pub fn find(&self, hash: u32, mut matches: impl FnMut(&T) -> bool) -> Option<EntryKey> {
        let bucket = index_for(hash, self.buckets.len());
        let mut link = self.buckets[bucket];
        while let Some(key) = link {
            let entry = &self.entries[key];
            if entry.hash == hash && matches(&entry.value) {
                return Some(key);
            }
            link = entry.next;
        }
        None
    }

    /// The value of the entry at `key`.
    ///
    /// # Panics
    /// If no entry exists for the key --- keys are stable until [unlink](Self::unlink), so this indicates misuse.
    pub fn get(&self, key: EntryKey) -> &T {
        &self.entries[key].value
    }

    /// The value of the entry at `key`, mutably.
    pub fn get_mut(&mut self, key: EntryKey) -> &mut T {
        &mut self.entries[key].value
    }

    /// Detach the entry at `key` from its chain and recycle its slot, returning the value.
    ///
    /// Returns None --- without removing the entry --- if the entry is not linked into the chain its stored hash names.
    ///
    /// # Panics
    /// If no entry exists for the key.
    pub fn unlink(&mut self, key: EntryKey) -> Option<T> {
        let bucket = index_for(self.entries[key].hash, self.buckets.len());

        let mut link = self.buckets[bucket];
        let mut previous: Option<EntryKey> = None;
        loop {
            match link {
                None => return None,
                Some(current) if current == key => break,
                Some(current) => {
                    previous = Some(current);
                    link = self.entries[current].next;
                }
            }
        }

        let next = self.entries[key].next;
        match previous {
            None => self.buckets[bucket] = next,
            Some(previous) => self.entries[previous].next = next,
        }

        self.count -= 1;
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// The values of every linked entry, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values().map(|entry| &entry.value)
    }

    /// Double the buckets and rehash every entry by its stored hash.
    fn resize(&mut self, bucket_count: usize) {
        let mut buckets: Vec<Option<EntryKey>> = vec![None; bucket_count];
        let mut keys: Vec<EntryKey> = self.entries.keys().collect();
        // Relink in reverse so chain heads end up in a deterministic order.
        while let Some(key) = keys.pop() {
            let hash = self.entries[key].hash;
            let bucket = index_for(hash, bucket_count);
            self.entries[key].next = buckets[bucket];
            buckets[bucket] = Some(key);
        }
        self.buckets = buckets;
        self.threshold = (bucket_count * self.load_factor_percent) / 100;
    }
}
