//! Self-managed slot region with growth, shrink and overlap-safe shifting.
//!
//! A `ManagedArray` owns exactly one zero-filled allocation of
//! `capacity * slot_width` bytes obtained from the global allocator. The
//! pointer never leaves this module: typed layers see the region through
//! bounds-checked slices.

use crate::array::slot::Slot;
use crate::core::{ArrayConfig, ArrayError, Result};
use std::alloc::{self, Layout};
use std::ptr::{self, NonNull};
use std::sync::atomic::{AtomicU64, Ordering};

/// Alignment of every region; covers all slot types.
const SLOT_ALIGN: usize = 8;

/// Regions currently allocated across the process.
static LIVE_REGIONS: AtomicU64 = AtomicU64::new(0);

/// Returns the number of slot regions currently allocated.
///
/// Diagnostic gauge: a value that keeps growing while containers are being
/// dropped points at a leak in the caller.
pub fn live_regions() -> u64 {
    LIVE_REGIONS.load(Ordering::Acquire)
}

/// Direction of a slot shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    /// Move the run one slot toward higher indices
    Right,
    /// Move the run one slot toward lower indices
    Left,
}

/// Outcome of a roll-right
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Roll {
    /// A slot was opened and the size grew by one
    Opened,
    /// The array was fixed and full; the last slot was overwritten and the
    /// size is unchanged
    Evicted,
}

/// Owned allocation backing a `ManagedArray`.
struct Region {
    ptr: NonNull<u8>,
    bytes: usize,
}

// SAFETY: the region is uniquely owned and only mutated through `&mut`.
unsafe impl Send for Region {}
unsafe impl Sync for Region {}

impl Region {
    fn layout(bytes: usize) -> Result<Layout> {
        Layout::from_size_align(bytes, SLOT_ALIGN)
            .map_err(|_| ArrayError::overflow(bytes, isize::MAX as usize))
    }

    /// Allocate `bytes` zeroed bytes.
    fn zeroed(bytes: usize) -> Result<Self> {
        let ptr = if bytes == 0 {
            dangling()
        } else {
            let layout = Self::layout(bytes)?;
            // SAFETY: layout has a non-zero size.
            let raw = unsafe { alloc::alloc_zeroed(layout) };
            NonNull::new(raw).unwrap_or_else(|| alloc::handle_alloc_error(layout))
        };
        LIVE_REGIONS.fetch_add(1, Ordering::AcqRel);
        tracing::trace!(bytes, "allocated slot region");
        Ok(Region { ptr, bytes })
    }

    /// Resize in place or by moving, zero-filling any newly added bytes.
    fn resize(&mut self, new_bytes: usize) -> Result<()> {
        if new_bytes == self.bytes {
            return Ok(());
        }

        if self.bytes == 0 {
            let fresh = Region::zeroed(new_bytes)?;
            // The old zero-byte region still counts as live until replaced.
            *self = fresh;
            return Ok(());
        }

        let old_layout = Self::layout(self.bytes)?;
        if new_bytes == 0 {
            // SAFETY: ptr was allocated with old_layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr(), old_layout) };
            self.ptr = dangling();
            self.bytes = 0;
            return Ok(());
        }

        let new_layout = Self::layout(new_bytes)?;
        // SAFETY: ptr was allocated with old_layout and new_bytes is non-zero
        // and fits the layout rules checked above.
        let raw = unsafe { alloc::realloc(self.ptr.as_ptr(), old_layout, new_bytes) };
        let ptr = NonNull::new(raw).unwrap_or_else(|| alloc::handle_alloc_error(new_layout));
        if new_bytes > self.bytes {
            // SAFETY: the tail [old, new) lies inside the new allocation.
            unsafe { ptr::write_bytes(ptr.as_ptr().add(self.bytes), 0, new_bytes - self.bytes) };
        }
        self.ptr = ptr;
        self.bytes = new_bytes;
        Ok(())
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        if self.bytes > 0 {
            if let Ok(layout) = Region::layout(self.bytes) {
                // SAFETY: ptr was allocated with this layout and is freed once.
                unsafe { alloc::dealloc(self.ptr.as_ptr(), layout) };
            }
        }
        LIVE_REGIONS.fetch_sub(1, Ordering::AcqRel);
        tracing::trace!(bytes = self.bytes, "released slot region");
    }
}

fn dangling() -> NonNull<u8> {
    // An aligned, non-null address that is never dereferenced for zero bytes.
    NonNull::<u64>::dangling().cast()
}

/// A resizable array of fixed-width slots over a self-managed region.
pub struct ManagedArray {
    region: Option<Region>,
    config: ArrayConfig,
    slot_width: usize,
    capacity: usize,
    size: usize,
}

impl ManagedArray {
    /// Allocate and zero-fill `config.initial_capacity` slots of `slot_width` bytes.
    pub fn new(config: ArrayConfig, slot_width: usize) -> Result<Self> {
        config.validate()?;
        if slot_width == 0 || slot_width > SLOT_ALIGN || SLOT_ALIGN % slot_width != 0 {
            return Err(ArrayError::config(format!(
                "slot width {} must divide {}",
                slot_width, SLOT_ALIGN
            )));
        }
        let capacity = config.initial_capacity;
        let bytes = Self::bytes_for(capacity, slot_width, config.max_capacity)?;
        let region = Region::zeroed(bytes)?;
        Ok(ManagedArray {
            region: Some(region),
            config,
            slot_width,
            capacity,
            size: 0,
        })
    }

    fn bytes_for(slots: usize, slot_width: usize, max: usize) -> Result<usize> {
        slots
            .checked_mul(slot_width)
            .filter(|bytes| *bytes <= isize::MAX as usize)
            .ok_or_else(|| ArrayError::overflow(slots, max))
    }

    /// Largest capacity permitted by both the configuration and the platform.
    fn ceiling(&self) -> usize {
        let platform = (isize::MAX as usize) / self.slot_width;
        self.config.max_capacity.min(platform)
    }

    fn region(&self) -> Result<&Region> {
        self.region.as_ref().ok_or(ArrayError::UseAfterRelease)
    }

    /// Fails with `UseAfterRelease` once the region has been destroyed.
    pub fn ensure_live(&self) -> Result<()> {
        self.region().map(|_| ())
    }

    /// Returns true while the region is allocated
    pub fn is_live(&self) -> bool {
        self.region.is_some()
    }

    /// Number of logically populated slots
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if no slot is populated
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of allocated slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Width of one slot in bytes
    pub fn slot_width(&self) -> usize {
        self.slot_width
    }

    /// Construction parameters
    pub fn config(&self) -> &ArrayConfig {
        &self.config
    }

    /// Returns true if the array is maintained in sorted order
    pub fn sorted(&self) -> bool {
        self.config.sorted
    }

    /// Returns true if the array has a fixed capacity ceiling
    pub fn fixed(&self) -> bool {
        self.config.fixed
    }

    /// Capacity ceiling
    pub fn max_capacity(&self) -> usize {
        self.config.max_capacity
    }

    /// Capacity floor
    pub fn min_capacity(&self) -> usize {
        self.config.min_capacity
    }

    /// Growth step
    pub fn allocation_increment(&self) -> usize {
        self.config.allocation_increment
    }

    /// Free-slot count that triggers a shrink
    pub fn cleared_slots_free_threshold(&self) -> usize {
        self.config.cleared_slots_free_threshold
    }

    /// Returns true if a roll-right would overwrite the last slot instead of
    /// growing. A fixed array never grows on roll-right, whatever its current
    /// capacity.
    pub fn evicts_on_roll(&self) -> bool {
        self.config.fixed && self.size == self.capacity
    }

    /// Checks that `index` addresses a populated slot.
    pub fn check_index(&self, index: usize) -> Result<()> {
        self.ensure_live()?;
        if index >= self.size {
            return Err(ArrayError::invalid_index(index, self.size));
        }
        Ok(())
    }

    /// Grow capacity so that `items` more slots fit after `size`.
    ///
    /// Capacity grows in steps of `allocation_increment` and never passes
    /// `max_capacity`. When the request cannot be met, fails with
    /// `AllocationOverflow` unless `allow_truncate` is set, in which case the
    /// array grows as far as permitted and the number of items that still do
    /// not fit is returned.
    pub fn extend(&mut self, allow_truncate: bool, items: usize) -> Result<usize> {
        self.ensure_live()?;
        let ceiling = self.ceiling();
        let target = self
            .size
            .checked_add(items)
            .ok_or_else(|| ArrayError::overflow(usize::MAX, ceiling))?;
        if target <= self.capacity {
            return Ok(0);
        }

        let (goal, truncated) = if target > ceiling {
            if !allow_truncate {
                return Err(ArrayError::overflow(target, self.config.max_capacity));
            }
            (ceiling, target - ceiling)
        } else {
            (target, 0)
        };

        let mut new_capacity = self.capacity;
        while new_capacity < goal {
            let step = self.config.allocation_increment.min(ceiling - new_capacity);
            new_capacity += step;
        }
        if new_capacity != self.capacity {
            self.resize(new_capacity)?;
            tracing::debug!(
                capacity = self.capacity,
                size = self.size,
                "extended slot region"
            );
        }
        if truncated > 0 {
            tracing::warn!(truncated, max = self.config.max_capacity, "extend truncated at max capacity");
        }
        Ok(truncated)
    }

    /// Release free slots once `cleared_slots_free_threshold` of them have
    /// accumulated, leaving `min_capacity` free slots. Returns the number of
    /// slots released.
    pub fn shrink(&mut self) -> Result<usize> {
        self.ensure_live()?;
        let free = self.capacity - self.size;
        let min = self.config.min_capacity;
        if free >= self.config.cleared_slots_free_threshold && free > min {
            let released = free - min;
            self.resize(self.capacity - released)?;
            tracing::debug!(released, capacity = self.capacity, "shrank slot region");
            return Ok(released);
        }
        Ok(0)
    }

    fn resize(&mut self, new_capacity: usize) -> Result<()> {
        let bytes = Self::bytes_for(new_capacity, self.slot_width, self.config.max_capacity)?;
        self.region
            .as_mut()
            .ok_or(ArrayError::UseAfterRelease)?
            .resize(bytes)?;
        self.capacity = new_capacity;
        Ok(())
    }

    /// Move the run of `count` slots starting at `from` one slot in `direction`.
    ///
    /// Source and destination overlap; the copy has memmove semantics. The
    /// destination range is validated against `capacity`, not `size`.
    pub fn shift_elements(&mut self, from: usize, count: usize, direction: Shift) -> Result<()> {
        let capacity = self.capacity;
        let width = self.slot_width;
        let region = self.region.as_mut().ok_or(ArrayError::UseAfterRelease)?;
        if count == 0 {
            return Ok(());
        }

        let end = from
            .checked_add(count)
            .ok_or_else(|| ArrayError::invalid_index(usize::MAX, capacity))?;
        let dest = match direction {
            Shift::Right => {
                if end >= capacity {
                    return Err(ArrayError::invalid_index(end, capacity));
                }
                from + 1
            },
            Shift::Left => {
                if from == 0 || end > capacity {
                    return Err(ArrayError::invalid_index(from.max(end), capacity));
                }
                from - 1
            },
        };

        // SAFETY: [from, from + count) and [dest, dest + count) both lie within
        // `capacity` slots of the live region; ptr::copy tolerates overlap.
        unsafe {
            let base = region.ptr.as_ptr();
            ptr::copy(base.add(from * width), base.add(dest * width), count * width);
        }
        Ok(())
    }

    /// Open a slot at `index` by shifting `index..size` one slot right.
    ///
    /// Grows the region when full, except for a fixed array: there the last
    /// slot is dropped and `Roll::Evicted` returned.
    /// The opened slot keeps its previous contents until the caller writes it.
    pub fn roll_right(&mut self, index: usize) -> Result<Roll> {
        self.ensure_live()?;
        if index > self.size {
            return Err(ArrayError::invalid_index(index, self.size + 1));
        }

        if self.evicts_on_roll() {
            if index >= self.size {
                return Err(ArrayError::invalid_index(index, self.size));
            }
            self.shift_elements(index, self.size - index - 1, Shift::Right)?;
            return Ok(Roll::Evicted);
        }

        if self.size == self.capacity {
            self.extend(false, 1)?;
        }
        self.shift_elements(index, self.size - index, Shift::Right)?;
        self.size += 1;
        Ok(Roll::Opened)
    }

    /// Close the slot at `index` by shifting `index+1..size` one slot left,
    /// optionally checking for a shrink afterwards.
    pub fn roll_left(&mut self, index: usize, shrink: bool) -> Result<()> {
        self.check_index(index)?;
        self.shift_elements(index + 1, self.size - index - 1, Shift::Left)?;
        self.size -= 1;
        if shrink {
            self.shrink()?;
        }
        Ok(())
    }

    /// Remove every value and shrink if applicable.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.size = 0;
        self.shrink()?;
        Ok(())
    }

    /// Replace the contents with little-endian slot `bytes`, reallocating the
    /// region to fit.
    ///
    /// The new capacity is the number of loaded slots, raised to `min_capacity`.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_live()?;
        if bytes.len() % self.slot_width != 0 {
            return Err(ArrayError::MalformedBytes {
                len: bytes.len(),
                width: self.slot_width,
            });
        }
        let slots = bytes.len() / self.slot_width;
        if slots > self.ceiling() {
            return Err(ArrayError::overflow(slots, self.config.max_capacity));
        }

        let capacity = slots.max(self.config.min_capacity);
        let region = Region::zeroed(Self::bytes_for(capacity, self.slot_width, self.config.max_capacity)?)?;
        if !bytes.is_empty() {
            // SAFETY: the fresh region holds at least bytes.len() bytes and
            // cannot overlap a borrowed slice.
            unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), region.ptr.as_ptr(), bytes.len()) };
        }
        self.region = Some(region);
        #[cfg(target_endian = "big")]
        {
            let width = self.slot_width;
            if let Some(region) = self.region.as_mut() {
                // SAFETY: the region holds `slots * width` initialized bytes.
                let loaded = unsafe { std::slice::from_raw_parts_mut(region.ptr.as_ptr(), slots * width) };
                loaded.chunks_exact_mut(width).for_each(<[u8]>::reverse);
            }
        }
        self.capacity = capacity;
        self.size = slots;
        tracing::debug!(size = slots, capacity, "reloaded slot region from bytes");
        Ok(())
    }

    /// The populated slots as raw bytes in native byte order.
    pub fn populated_bytes(&self) -> Result<&[u8]> {
        let region = self.region()?;
        // SAFETY: size * width bytes of the region are initialized.
        Ok(unsafe { std::slice::from_raw_parts(region.ptr.as_ptr(), self.size * self.slot_width) })
    }

    /// Release the region now. Idempotent; afterwards every operation fails
    /// with `UseAfterRelease`.
    pub fn destroy(&mut self) {
        if self.region.take().is_some() {
            tracing::debug!(capacity = self.capacity, "destroyed slot region");
        }
        self.size = 0;
        self.capacity = 0;
    }

    /// Copy into a brand-new, independently owned region.
    pub fn try_clone(&self) -> Result<Self> {
        let source = self.region()?;
        let bytes = Self::bytes_for(self.capacity, self.slot_width, self.config.max_capacity)?;
        let region = Region::zeroed(bytes)?;
        let populated = self.size * self.slot_width;
        if populated > 0 {
            // SAFETY: both regions hold at least `populated` bytes and are
            // distinct allocations.
            unsafe {
                ptr::copy_nonoverlapping(source.ptr.as_ptr(), region.ptr.as_ptr(), populated);
            }
        }
        Ok(ManagedArray {
            region: Some(region),
            config: self.config.clone(),
            slot_width: self.slot_width,
            capacity: self.capacity,
            size: self.size,
        })
    }

    /// Set the logical size after the caller has written slots `0..size`.
    pub(crate) fn set_size(&mut self, size: usize) {
        debug_assert!(size <= self.capacity);
        self.size = size;
    }

    /// Typed view of the populated slots.
    pub(crate) fn slots<T: Slot>(&self) -> Result<&[T]> {
        self.view(self.size)
    }

    /// Mutable typed view of the populated slots.
    pub(crate) fn slots_mut<T: Slot>(&mut self) -> Result<&mut [T]> {
        self.view_mut(self.size)
    }

    /// Typed view of every allocated slot, populated or not.
    pub(crate) fn allocated<T: Slot>(&self) -> Result<&[T]> {
        self.view(self.capacity)
    }

    /// Mutable typed view of every allocated slot.
    pub(crate) fn allocated_mut<T: Slot>(&mut self) -> Result<&mut [T]> {
        self.view_mut(self.capacity)
    }

    fn view<T: Slot>(&self, len: usize) -> Result<&[T]> {
        debug_assert_eq!(T::WIDTH, self.slot_width);
        let region = self.region()?;
        // SAFETY: the region is SLOT_ALIGN-aligned, zero-initialized on every
        // allocation and growth, holds at least `len` slots of T::WIDTH bytes,
        // and every bit pattern is a valid i64/f64.
        Ok(unsafe { std::slice::from_raw_parts(region.ptr.as_ptr().cast::<T>(), len) })
    }

    fn view_mut<T: Slot>(&mut self, len: usize) -> Result<&mut [T]> {
        debug_assert_eq!(T::WIDTH, self.slot_width);
        let region = self.region.as_mut().ok_or(ArrayError::UseAfterRelease)?;
        // SAFETY: as in `view`, and `&mut self` guarantees exclusive access.
        Ok(unsafe { std::slice::from_raw_parts_mut(region.ptr.as_ptr().cast::<T>(), len) })
    }
}

impl Drop for ManagedArray {
    fn drop(&mut self) {
        if self.region.is_some() {
            tracing::trace!(capacity = self.capacity, "slot region released by scope exit");
        }
    }
}

impl std::fmt::Debug for ManagedArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedArray")
            .field("live", &self.is_live())
            .field("size", &self.size)
            .field("capacity", &self.capacity)
            .field("slot_width", &self.slot_width)
            .field("config", &self.config)
            .finish()
    }
}
