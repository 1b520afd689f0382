//! Item height production, caching, and in-flight async resolution.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::sync::atomic::{AtomicBool, Ordering};
use core::task::{Context, Poll};

use futures_task::ArcWake;

/// Future returned by an asynchronous height producer.
pub type HeightFuture = Pin<Box<dyn Future<Output = Result<f64, HeightError>> + Send>>;

/// Synchronous per-index height function.
pub type SyncHeightFn = Arc<dyn Fn(usize) -> f64 + Send + Sync>;

/// Asynchronous per-index height function.
pub type AsyncHeightFn = Arc<dyn Fn(usize) -> HeightFuture + Send + Sync>;

/// Where item heights come from.
///
/// The variant is declared explicitly at the configuration boundary and the
/// engine matches on it exhaustively, so there is no runtime inspection of
/// what a callback happens to return.
#[derive(Clone)]
pub enum HeightProducer {
    /// Every item has the same height.
    Fixed(f64),
    /// Height is computed synchronously per index.
    Sync(SyncHeightFn),
    /// Height resolves asynchronously per index.
    Async(AsyncHeightFn),
}

impl HeightProducer {
    pub fn fixed(height: f64) -> Self {
        Self::Fixed(height)
    }

    pub fn sync_fn(f: impl Fn(usize) -> f64 + Send + Sync + 'static) -> Self {
        Self::Sync(Arc::new(f))
    }

    pub fn async_fn(f: impl Fn(usize) -> HeightFuture + Send + Sync + 'static) -> Self {
        Self::Async(Arc::new(f))
    }

    /// True when both producers are the same source: equal fixed heights,
    /// or the same `Arc`-ed function.
    pub(crate) fn same_source(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fixed(a), Self::Fixed(b)) => a == b,
            (Self::Sync(a), Self::Sync(b)) => Arc::ptr_eq(a, b),
            (Self::Async(a), Self::Async(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for HeightProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(height) => f.debug_tuple("Fixed").field(height).finish(),
            Self::Sync(_) => f.write_str("Sync(..)"),
            Self::Async(_) => f.write_str("Async(..)"),
        }
    }
}

/// Error carried by a failed asynchronous height resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeightError {
    message: String,
}

impl HeightError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HeightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "height resolution failed: {}", self.message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HeightError {}

/// Cache slot for one item height.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeightSlot {
    /// The producer has not been consulted for this index yet.
    #[default]
    Unresolved,
    /// An async resolution is in flight; layout uses 0 meanwhile.
    Pending,
    /// The resolution failed; layout uses 0 and the slot is final.
    Failed,
    /// The height is known.
    Resolved(f64),
}

impl HeightSlot {
    /// Height the packer uses for this slot, 0 unless resolved.
    pub fn layout_height(&self) -> f64 {
        match self {
            Self::Resolved(height) => *height,
            _ => 0.0,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Per-index height slots with strict memoization.
///
/// A slot that has left [`HeightSlot::Unresolved`] is never handed back to a
/// producer; pending and failed slots count as consulted. The cache only
/// empties wholesale, when the item count drops to zero.
#[derive(Clone, Debug, Default)]
pub struct HeightCache {
    slots: Vec<HeightSlot>,
}

impl HeightCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Grows or truncates to `count` slots. New slots start unresolved;
    /// surviving slots keep their state.
    pub(crate) fn resize(&mut self, count: usize) {
        self.slots.resize(count, HeightSlot::Unresolved);
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    /// Slot for `index`, unresolved when out of range.
    pub fn slot(&self, index: usize) -> HeightSlot {
        self.slots.get(index).copied().unwrap_or_default()
    }

    /// Writes a slot. Resolved heights are clamped to be non-negative
    /// (`NaN` collapses to 0).
    pub(crate) fn set(&mut self, index: usize, slot: HeightSlot) {
        if index >= self.slots.len() {
            return;
        }
        self.slots[index] = match slot {
            HeightSlot::Resolved(height) => HeightSlot::Resolved(height.max(0.0)),
            other => other,
        };
    }

    /// Height the packer uses for `index`.
    pub fn layout_height(&self, index: usize) -> f64 {
        self.slot(index).layout_height()
    }

    /// Layout heights for every slot, in index order.
    pub fn layout_heights(&self) -> Vec<f64> {
        self.slots.iter().map(HeightSlot::layout_height).collect()
    }

    /// True while any slot is awaiting an async resolution.
    pub fn has_pending(&self) -> bool {
        self.slots.iter().any(HeightSlot::is_pending)
    }

    /// True once every slot holds a resolved or failed height.
    pub fn is_settled(&self) -> bool {
        self.slots
            .iter()
            .all(|slot| matches!(slot, HeightSlot::Resolved(_) | HeightSlot::Failed))
    }
}

struct WakeSignal {
    woken: AtomicBool,
}

impl ArcWake for WakeSignal {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.woken.store(true, Ordering::Release);
    }
}

struct HeightTask {
    index: usize,
    future: HeightFuture,
}

/// Pool of in-flight asynchronous height resolutions.
///
/// Tasks are polled cooperatively from the host loop; dropping an entry is
/// the cancellation path, so a truncated index can never write a height
/// back into the cache.
pub(crate) struct HeightTasks {
    tasks: Vec<HeightTask>,
    signal: Arc<WakeSignal>,
}

impl HeightTasks {
    pub(crate) fn new() -> Self {
        Self {
            tasks: Vec::new(),
            signal: Arc::new(WakeSignal {
                woken: AtomicBool::new(false),
            }),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }

    pub(crate) fn spawn(&mut self, index: usize, future: HeightFuture) {
        self.tasks.push(HeightTask { index, future });
        self.signal.woken.store(true, Ordering::Release);
    }

    /// Drops every task whose index is no longer part of the item sequence.
    pub(crate) fn cancel_from(&mut self, count: usize) {
        self.tasks.retain(|task| task.index < count);
    }

    pub(crate) fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Polls the pool once and drains completed tasks.
    ///
    /// Skips the poll entirely when nothing was spawned or woken since the
    /// previous call.
    pub(crate) fn poll_completed(&mut self) -> Vec<(usize, Result<f64, HeightError>)> {
        if !self.signal.woken.swap(false, Ordering::AcqRel) {
            return Vec::new();
        }
        let waker = futures_task::waker(self.signal.clone());
        let mut cx = Context::from_waker(&waker);
        let mut completed = Vec::new();
        let mut i = 0;
        while i < self.tasks.len() {
            match self.tasks[i].future.as_mut().poll(&mut cx) {
                Poll::Ready(result) => {
                    let task = self.tasks.swap_remove(i);
                    completed.push((task.index, result));
                }
                Poll::Pending => i += 1,
            }
        }
        completed
    }
}

impl fmt::Debug for HeightTasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeightTasks")
            .field("tasks", &self.tasks.len())
            .finish_non_exhaustive()
    }
}
