//! Output sinks the [`BufferWriter`](super::BufferWriter) writes into.
//!
//! A sink hands out writable regions and is told afterwards how many bytes of
//! the last region were really used. The writer never assumes anything else
//! about the backing storage, so the same writer drives the connection's
//! outbound buffer and the in-memory sinks used by tests and benchmarks.

use bytes::BytesMut;

/// Default number of bytes handed out by a single [`OutputBuffer`] claim
pub const DEFAULT_SEGMENT_SIZE: usize = 4 * 1024;

/// A byte sink able to lend out writable memory.
///
/// The protocol is "claim, write, commit":
///
/// 1. [`claim`](OutputSink::claim) a region of at least `min_size` bytes
/// 2. fill a prefix of the region (re-borrowing it through [`claimed`](OutputSink::claimed))
/// 3. report the filled prefix with [`advance`](OutputSink::advance)
///
/// Bytes that were written into a region but never advanced are not part of
/// the output.
pub trait OutputSink {
    /// Returns a writable region of at least `min_size` bytes.
    ///
    /// Any previously claimed but not advanced bytes are discarded.
    fn claim(&mut self, min_size: usize) -> &mut [u8];

    /// Returns the part of the last claimed region that has not been advanced yet.
    fn claimed(&mut self) -> &mut [u8];

    /// Commits the first `count` bytes of the claimed region.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds the length of [`claimed`](OutputSink::claimed).
    fn advance(&mut self, count: usize);
}

/// An in-memory [`OutputSink`] backed by [`BytesMut`].
///
/// A claim hands back the initialized space behind the committed bytes when
/// it holds at least `min_size` bytes, otherwise it grows that space to
/// `max(min_size, segment_size)` bytes. Both the allocation and the
/// initialized space survive [`clear`](OutputBuffer::clear), so a connection
/// reaches a steady state where claiming neither allocates nor zeroes memory.
#[derive(Debug)]
pub struct OutputBuffer {
    buf: BytesMut,
    committed: usize,
    segment_size: usize,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::with_segment_size(DEFAULT_SEGMENT_SIZE)
    }

    /// Creates a buffer whose claims are `segment_size` bytes long unless a
    /// larger minimum is requested.
    ///
    /// # Panics
    ///
    /// Panics if `segment_size` is zero.
    pub fn with_segment_size(segment_size: usize) -> Self {
        assert!(segment_size > 0, "segment size must be positive");
        Self { buf: BytesMut::with_capacity(segment_size), committed: 0, segment_size }
    }

    /// The bytes committed so far.
    #[inline]
    pub fn committed(&self) -> &[u8] {
        &self.buf[..self.committed]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.committed
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.committed == 0
    }

    #[inline]
    pub fn segment_size(&self) -> usize {
        self.segment_size
    }

    /// Drops every committed byte, keeping the allocation for the next claims.
    pub fn clear(&mut self) {
        self.committed = 0;
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for OutputBuffer {
    fn claim(&mut self, min_size: usize) -> &mut [u8] {
        let spare = self.buf.len() - self.committed;
        if spare == 0 || spare < min_size {
            let size = min_size.max(self.segment_size);
            self.buf.resize(self.committed + size, 0);
        }
        &mut self.buf[self.committed..]
    }

    #[inline]
    fn claimed(&mut self) -> &mut [u8] {
        &mut self.buf[self.committed..]
    }

    #[inline]
    fn advance(&mut self, count: usize) {
        let claimed = self.buf.len() - self.committed;
        assert!(count <= claimed, "advance {count} bytes exceeds the claimed region of {claimed} bytes");
        self.committed += count;
    }
}
