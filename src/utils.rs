//! Utilities module.

use std::marker::PhantomData;
use std::mem::MaybeUninit;

/// A slice of uninitialized slots that many threads may fill concurrently, each slot
/// exactly once.
///
/// It holds a raw pointer to the slots so it can be shared between the workers of one
/// build stage. Callers must guarantee that no slot is written twice and that a slot is
/// only read after its write happened-before the read.
pub(crate) struct WriteOnceSlice<'a, V> {
    ptr: *mut MaybeUninit<V>,
    len: usize,
    marker: PhantomData<&'a mut [MaybeUninit<V>]>,
}

impl<'a, V> WriteOnceSlice<'a, V> {
    pub(crate) fn new(slots: &'a mut [MaybeUninit<V>]) -> WriteOnceSlice<'a, V> {
        WriteOnceSlice {
            ptr: slots.as_mut_ptr(),
            len: slots.len(),
            marker: PhantomData,
        }
    }

    /// Writes `value` into slot `index`.
    ///
    /// # Safety
    /// No other thread may access slot `index` while it is written.
    pub(crate) unsafe fn write(&self, index: usize, value: V) {
        assert!(index < self.len);
        (*self.ptr.add(index)).write(value);
    }

    /// Reads slot `index`.
    ///
    /// # Safety
    /// Slot `index` must have been written, and that write must happen-before this read.
    pub(crate) unsafe fn read(&self, index: usize) -> V
    where
        V: Copy,
    {
        assert!(index < self.len);
        (*self.ptr.add(index)).assume_init()
    }
}

unsafe impl<V: Send> Send for WriteOnceSlice<'_, V> {}
unsafe impl<V: Send + Sync> Sync for WriteOnceSlice<'_, V> {}
