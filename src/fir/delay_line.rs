use crate::error::{FirError, Result};

/// Fixed-capacity circular history of the most recent input samples
///
/// All wraparound arithmetic for the sample history lives here. The
/// capacity is set once in [`DelayLine::new`] and never changes.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    /// Slot that receives the next write; also the oldest retained sample
    head: usize,
}

impl DelayLine {
    /// Allocate a zeroed delay line holding `capacity` samples
    ///
    /// # Errors
    /// Returns `FirError::Allocation` if the storage cannot be reserved.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            buffer: try_zeroed(capacity, capacity)?,
            head: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Store a sample at the cursor and advance the cursor
    #[inline]
    pub fn write(&mut self, sample: f32) {
        if self.buffer.is_empty() {
            return;
        }
        self.buffer[self.head] = sample;
        self.head += 1;
        if self.head == self.buffer.len() {
            self.head = 0;
        }
    }

    /// Sample written `k` writes before the most recent one
    ///
    /// `k = 0` is the most recent sample. Offsets at or beyond the capacity
    /// wrap around. Returns 0.0 for an empty delay line.
    #[inline]
    pub fn read_relative(&self, k: usize) -> f32 {
        let n = self.buffer.len();
        if n == 0 {
            return 0.0;
        }
        let back = k % n + 1;
        let idx = if back <= self.head {
            self.head - back
        } else {
            self.head + n - back
        };
        self.buffer[idx]
    }

    /// Walk the history from the most recent sample to the oldest
    ///
    /// Iterates the ring as two contiguous reverse ranges so the caller's
    /// inner loop carries no modulo arithmetic.
    #[inline]
    pub fn newest_first(&self) -> impl Iterator<Item = f32> + '_ {
        let (recent, stale) = self.buffer.split_at(self.head);
        recent.iter().rev().chain(stale.iter().rev()).copied()
    }

    /// Walk the history from the oldest retained sample to the most recent
    #[inline]
    pub fn oldest_first(&self) -> impl Iterator<Item = f32> + '_ {
        let (recent, stale) = self.buffer.split_at(self.head);
        stale.iter().chain(recent.iter()).copied()
    }

    /// Zero the history and rewind the cursor
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.head = 0;
    }
}

/// Zeroed engine state of `len` samples, reported against a `taps`-long filter
///
/// Reserves without aborting, so a filter too large for the available memory
/// surfaces as `FirError::Allocation` instead of a panic.
pub(crate) fn try_zeroed(len: usize, taps: usize) -> Result<Vec<f32>> {
    let mut state = Vec::new();
    state
        .try_reserve_exact(len)
        .map_err(|_| FirError::Allocation { taps })?;
    state.resize(len, 0.0);
    Ok(state)
}
