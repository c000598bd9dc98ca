//! ProbeTable: open-addressing engine with tombstone deletion and growth by doubling.

use crate::config::TableConfig;
use crate::error::{InsertError, TableError};
use crate::reentrancy::BusyFlag;
use crate::strategy::Strategy;
use core::fmt;
use slotmap::{DefaultKey, SlotMap};

/// Default key extractor type: a plain function returning a borrowed field.
pub type KeyFn<R> = fn(&R) -> &str;

/// Stable, generational reference to a stored record.
///
/// Survives resizes; stops resolving once the record is deleted, even if the
/// arena reuses its storage.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub fn record<'a, R, F>(&self, table: &'a ProbeTable<R, F>) -> Option<&'a R>
    where
        F: Fn(&R) -> &str,
    {
        table.get(*self)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Slot {
    Empty,
    Tombstone,
    Occupied(DefaultKey),
}

/// The slot array and its occupancy counters.
pub(crate) struct Slots {
    pub(crate) slots: Vec<Slot>,
    len: usize,
    tombstones: usize,
}

impl Slots {
    fn allocate(capacity: usize) -> Result<Self, TableError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| TableError::Allocation {
                requested: capacity,
            })?;
        slots.resize(capacity, Slot::Empty);
        Ok(Self {
            slots,
            len: 0,
            tombstones: 0,
        })
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn over_threshold(&self, load_factor: f64) -> bool {
        (self.len + 1) as f64 / self.capacity() as f64 >= load_factor
    }

    /// First empty or tombstone slot on `key`'s probe path.
    fn vacant_for(&self, strategy: Strategy, key: &str) -> Option<usize> {
        strategy
            .probe(key, self.capacity())
            .find(|&pos| !matches!(self.slots[pos], Slot::Occupied(_)))
    }

    /// First live record on `key`'s probe path whose key equals `key`.
    /// An empty slot ends the search; tombstones are skipped.
    fn position<R, F>(
        &self,
        strategy: Strategy,
        key: &str,
        records: &SlotMap<DefaultKey, R>,
        key_of: &F,
    ) -> Option<(usize, DefaultKey)>
    where
        F: Fn(&R) -> &str,
    {
        for pos in strategy.probe(key, self.capacity()) {
            match self.slots[pos] {
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Occupied(k) => {
                    if records.get(k).map(|r| key_of(r) == key).unwrap_or(false) {
                        return Some((pos, k));
                    }
                }
            }
        }
        None
    }

    fn occupy(&mut self, pos: usize, k: DefaultKey) {
        debug_assert!(!matches!(self.slots[pos], Slot::Occupied(_)));
        if self.slots[pos] == Slot::Tombstone {
            self.tombstones -= 1;
        }
        self.slots[pos] = Slot::Occupied(k);
        self.len += 1;
    }

    fn vacate(&mut self, pos: usize) {
        debug_assert!(matches!(self.slots[pos], Slot::Occupied(_)));
        self.slots[pos] = Slot::Tombstone;
        self.len -= 1;
        self.tombstones += 1;
    }

    fn reset(&mut self) {
        self.slots.fill(Slot::Empty);
        self.len = 0;
        self.tombstones = 0;
    }

    /// Grow until admitting one more record keeps the load below `load_factor`.
    fn reserve_one<R, F>(
        &mut self,
        load_factor: f64,
        strategy: Strategy,
        records: &SlotMap<DefaultKey, R>,
        key_of: &F,
    ) -> Result<(), TableError>
    where
        F: Fn(&R) -> &str,
    {
        while self.over_threshold(load_factor) {
            self.grow(strategy, records, key_of)?;
        }
        Ok(())
    }

    /// Double the capacity and re-place every live record through its probe
    /// path in the new array, in ascending old-slot order. Tombstones are
    /// dropped. The old array is only replaced once the new one is complete,
    /// so a failed allocation leaves `self` untouched.
    fn grow<R, F>(
        &mut self,
        strategy: Strategy,
        records: &SlotMap<DefaultKey, R>,
        key_of: &F,
    ) -> Result<(), TableError>
    where
        F: Fn(&R) -> &str,
    {
        let old_capacity = self.capacity();
        let mut capacity = old_capacity;
        loop {
            capacity = capacity.checked_mul(2).ok_or(TableError::Allocation {
                requested: usize::MAX,
            })?;
            let mut next = Slots::allocate(capacity)?;
            if next.rehash_from(self, strategy, records, key_of) {
                log::debug!(
                    "probe table resized {} -> {} slots ({} live, {} tombstones dropped)",
                    old_capacity,
                    capacity,
                    next.len,
                    self.tombstones
                );
                *self = next;
                return Ok(());
            }
            log::warn!(
                "rehash into {} slots exhausted a probe path, doubling again",
                capacity
            );
        }
    }

    fn rehash_from<R, F>(
        &mut self,
        old: &Slots,
        strategy: Strategy,
        records: &SlotMap<DefaultKey, R>,
        key_of: &F,
    ) -> bool
    where
        F: Fn(&R) -> &str,
    {
        for slot in &old.slots {
            let Slot::Occupied(k) = *slot else { continue };
            let key = key_of(&records[k]);
            match self.vacant_for(strategy, key) {
                Some(pos) => self.occupy(pos, k),
                None => return false,
            }
        }
        true
    }
}

/// Open-addressing hash table over records identified by a string key.
///
/// Records are owned by the table. The key is read through `key_of` on every
/// probe, so the extractor should be a cheap field access. Keys are not
/// checked for uniqueness: inserting a second record with a live key stores
/// both, and `lookup` returns whichever comes first on the probe path.
pub struct ProbeTable<R, F = KeyFn<R>> {
    // Declared before `slots`: records are released before the slot array.
    records: SlotMap<DefaultKey, R>,
    pub(crate) slots: Slots,
    key_of: F,
    load_factor: f64,
    strategy: Strategy,
    busy: BusyFlag,
}

impl<R, F> ProbeTable<R, F>
where
    F: Fn(&R) -> &str,
{
    pub fn new(key_of: F, config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;
        let slots = Slots::allocate(config.initial_capacity()?)?;
        Ok(Self {
            records: SlotMap::with_key(),
            slots,
            key_of,
            load_factor: config.load_factor,
            strategy: config.strategy,
            busy: BusyFlag::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len
    }

    pub fn is_empty(&self) -> bool {
        self.slots.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub fn tombstones(&self) -> usize {
        self.slots.tombstones
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Take ownership of `record`.
    ///
    /// Grows first while `(len + 1) / capacity >= load_factor`, then claims the
    /// first empty or tombstone slot on the record's probe path. If the path
    /// has none, the table grows once more and the insert is retried a single
    /// time. On error the record is handed back inside the [`InsertError`].
    pub fn insert(&mut self, record: R) -> Result<Handle, InsertError<R>> {
        let _g = self.busy.enter("insert");
        let mut forced = false;
        let pos = loop {
            if let Err(e) =
                self.slots
                    .reserve_one(self.load_factor, self.strategy, &self.records, &self.key_of)
            {
                return Err(InsertError::new(e, record));
            }
            let key = (self.key_of)(&record);
            if let Some(pos) = self.slots.vacant_for(self.strategy, key) {
                log::trace!("key {:?} placed in slot {} of {}", key, pos, self.slots.capacity());
                break pos;
            }
            let capacity = self.slots.capacity();
            if forced {
                return Err(InsertError::new(
                    TableError::ProbeExhausted { capacity },
                    record,
                ));
            }
            log::warn!(
                "no free slot for key {:?} at capacity {}, forcing resize",
                key,
                capacity
            );
            if let Err(e) = self.slots.grow(self.strategy, &self.records, &self.key_of) {
                return Err(InsertError::new(e, record));
            }
            forced = true;
        };
        let k = self.records.insert(record);
        self.slots.occupy(pos, k);
        Ok(Handle(k))
    }

    pub fn lookup(&self, key: &str) -> Option<&R> {
        let _g = self.busy.enter("lookup");
        let (_, k) = self
            .slots
            .position(self.strategy, key, &self.records, &self.key_of)?;
        self.records.get(k)
    }

    pub fn find(&self, key: &str) -> Option<Handle> {
        let _g = self.busy.enter("find");
        self.slots
            .position(self.strategy, key, &self.records, &self.key_of)
            .map(|(_, k)| Handle(k))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        let _g = self.busy.enter("contains_key");
        self.slots
            .position(self.strategy, key, &self.records, &self.key_of)
            .is_some()
    }

    pub fn get(&self, handle: Handle) -> Option<&R> {
        let _g = self.busy.enter("get");
        self.records.get(handle.0)
    }

    /// Unlink the first live record keyed `key` and return it. Its slot
    /// becomes a tombstone.
    pub fn remove(&mut self, key: &str) -> Option<R> {
        let _g = self.busy.enter("remove");
        let (pos, k) = self
            .slots
            .position(self.strategy, key, &self.records, &self.key_of)?;
        log::trace!("key {:?} removed, slot {} is now a tombstone", key, pos);
        self.slots.vacate(pos);
        self.records.remove(k)
    }

    /// Remove and drop the first live record keyed `key`. Returns whether one
    /// was found.
    pub fn delete(&mut self, key: &str) -> bool {
        // The record is dropped once the table is no longer busy, so its `Drop`
        // may touch the table again.
        self.remove(key).is_some()
    }

    /// Drop every record and mark all slots empty. Capacity is kept.
    pub fn clear(&mut self) {
        let released: Vec<R> = {
            let _g = self.busy.enter("clear");
            self.slots.reset();
            self.records.drain().map(|(_, r)| r).collect()
        };
        drop(released);
    }

    /// Live records in slot-array order.
    pub fn iter(&self) -> Iter<'_, R> {
        Iter {
            slots: self.slots.slots.iter(),
            records: &self.records,
        }
    }
}

impl<R, F> fmt::Debug for ProbeTable<R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeTable")
            .field("len", &self.slots.len)
            .field("capacity", &self.slots.capacity())
            .field("tombstones", &self.slots.tombstones)
            .field("load_factor", &self.load_factor)
            .field("strategy", &self.strategy)
            .finish()
    }
}

/// Iterator over live records in slot-array order.
pub struct Iter<'a, R> {
    slots: core::slice::Iter<'a, Slot>,
    records: &'a SlotMap<DefaultKey, R>,
}

impl<'a, R> Iterator for Iter<'a, R> {
    type Item = (Handle, &'a R);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(k) = *slot {
                if let Some(r) = self.records.get(k) {
                    return Some((Handle(k), r));
                }
            }
        }
        None
    }
}

impl<'a, R, F> IntoIterator for &'a ProbeTable<R, F>
where
    F: Fn(&R) -> &str,
{
    type Item = (Handle, &'a R);
    type IntoIter = Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
