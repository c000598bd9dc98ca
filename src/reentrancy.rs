//! Catches key extractors that call back into their own table.
//!
//! Insert, lookup, find, contains_key, get, remove and clear mark the table
//! busy for their duration. The key extractor runs inside those calls, and
//! during insert it may run halfway through a rehash, when the slot array
//! holds only part of the live records. A second call arriving while the
//! table is busy panics, naming both operations. Release builds compile the
//! check away.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

/// Name of the table operation currently running, if any.
#[derive(Debug)]
pub(crate) struct BusyFlag {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // Not Send or Sync.
    _single_thread: PhantomData<*mut ()>,
}

impl BusyFlag {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _single_thread: PhantomData,
        }
    }

    /// Mark the table busy with `op` until the returned token drops.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> Busy<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.replace(Some(op)) {
                // Restore before unwinding so the outer call still clears it.
                self.active.set(Some(outer));
                panic!("probe table: `{op}` called from the key extractor during `{outer}`");
            }
            Busy { flag: self }
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            Busy {
                _flag: PhantomData,
            }
        }
    }
}

pub(crate) struct Busy<'a> {
    #[cfg(debug_assertions)]
    flag: &'a BusyFlag,
    #[cfg(not(debug_assertions))]
    _flag: PhantomData<&'a BusyFlag>,
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.flag.active.set(None);
    }
}
