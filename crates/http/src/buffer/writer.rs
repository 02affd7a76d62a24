//! The batching writer sitting in front of an [`OutputSink`].

use crate::buffer::OutputSink;

/// Batches small writes into the region claimed from an [`OutputSink`].
///
/// Writes land directly in sink memory, the sink is only told about them on
/// [`commit`](BufferWriter::commit). A connection creates one writer per
/// drained read batch and commits once at the end of the batch, so a burst of
/// pipelined responses costs a single claim and a single commit in the common
/// case.
///
/// Dropping the writer commits whatever is still buffered, the sink never
/// loses bytes that were advanced.
#[derive(Debug)]
pub struct BufferWriter<'a, S: OutputSink + ?Sized> {
    sink: &'a mut S,
    /// bytes left in the current region
    available: usize,
    /// bytes written into the current region but not reported to the sink
    buffered: usize,
}

impl<'a, S: OutputSink + ?Sized> BufferWriter<'a, S> {
    /// Creates a writer and claims an initial region of at least `size_hint` bytes.
    pub fn new(sink: &'a mut S, size_hint: usize) -> Self {
        let available = sink.claim(size_hint).len();
        Self { sink, available, buffered: 0 }
    }

    /// The writable part of the current region.
    #[inline]
    pub fn span(&mut self) -> &mut [u8] {
        let buffered = self.buffered;
        &mut self.sink.claimed()[buffered..buffered + self.available]
    }

    /// Number of bytes that can be written before a new region is needed.
    #[inline]
    pub fn available(&self) -> usize {
        self.available
    }

    /// Number of bytes written but not committed yet.
    #[inline]
    pub fn buffered(&self) -> usize {
        self.buffered
    }

    /// Reports every buffered byte to the sink.
    #[inline]
    pub fn commit(&mut self) {
        let buffered = self.buffered;
        if buffered > 0 {
            self.buffered = 0;
            self.sink.advance(buffered);
        }
    }

    /// Marks the first `count` bytes of [`span`](BufferWriter::span) as written.
    ///
    /// # Panics
    ///
    /// Panics if `count` is larger than the available space.
    #[inline]
    pub fn advance(&mut self, count: usize) {
        assert!(count <= self.available, "advance {count} bytes exceeds the {} available", self.available);
        self.buffered += count;
        self.available -= count;
    }

    /// Makes sure at least `min_size` bytes are available, claiming a fresh
    /// region (and committing the current one) only when they are not.
    #[inline]
    pub fn claim(&mut self, min_size: usize) {
        if self.available < min_size {
            self.claim_more(min_size);
        }
    }

    /// Copies `src` into the sink, spreading it over as many regions as needed.
    #[inline]
    pub fn write(&mut self, src: &[u8]) {
        if self.available >= src.len() {
            self.span()[..src.len()].copy_from_slice(src);
            self.advance(src.len());
        } else {
            self.write_multi_buffer(src);
        }
    }

    #[inline(never)]
    fn claim_more(&mut self, min_size: usize) {
        self.commit();
        self.available = self.sink.claim(min_size).len();
    }

    #[cold]
    fn write_multi_buffer(&mut self, mut src: &[u8]) {
        while !src.is_empty() {
            if self.available == 0 {
                self.claim_more(1);
            }

            let writable = src.len().min(self.available);
            self.span()[..writable].copy_from_slice(&src[..writable]);
            src = &src[writable..];
            self.advance(writable);
        }
    }
}

impl<S: OutputSink + ?Sized> Drop for BufferWriter<'_, S> {
    fn drop(&mut self) {
        self.commit();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::buffer::OutputBuffer;
    use proptest::prelude::*;

    /// A sink that records every commit and checks it never exceeds the
    /// bytes of the region claimed last.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink {
        segment_size: usize,
        region: Vec<u8>,
        advanced: usize,
        pub(crate) output: Vec<u8>,
        pub(crate) commits: Vec<usize>,
        pub(crate) claims: usize,
    }

    impl RecordingSink {
        pub(crate) fn with_segment_size(segment_size: usize) -> Self {
            Self { segment_size, ..Default::default() }
        }
    }

    impl OutputSink for RecordingSink {
        fn claim(&mut self, min_size: usize) -> &mut [u8] {
            self.claims += 1;
            self.region = vec![0; min_size.max(self.segment_size)];
            self.advanced = 0;
            &mut self.region[..]
        }

        fn claimed(&mut self) -> &mut [u8] {
            &mut self.region[self.advanced..]
        }

        fn advance(&mut self, count: usize) {
            assert!(self.advanced + count <= self.region.len(), "sink over-committed");
            self.output.extend_from_slice(&self.region[self.advanced..self.advanced + count]);
            self.advanced += count;
            self.commits.push(count);
        }
    }

    #[derive(Debug, Clone)]
    enum Op {
        Write(Vec<u8>),
        Claim(usize),
        Advance(usize),
        Commit,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            proptest::collection::vec(any::<u8>(), 0..48).prop_map(Op::Write),
            (1usize..40).prop_map(Op::Claim),
            (0usize..12).prop_map(Op::Advance),
            Just(Op::Commit),
        ]
    }

    #[test]
    fn write_fits_in_one_region() {
        let mut sink = OutputBuffer::with_segment_size(64);
        {
            let mut writer = BufferWriter::new(&mut sink, 16);
            writer.write(b"hello ");
            writer.write(b"world");
            assert_eq!(writer.buffered(), 11);
            assert_eq!(writer.available(), 64 - 11);
            // nothing reaches the sink before the commit
            assert!(writer.sink.committed().is_empty());
            writer.commit();
            assert_eq!(writer.buffered(), 0);
        }
        assert_eq!(sink.committed(), b"hello world");
    }

    #[test]
    fn write_spreads_over_segments() {
        let mut sink = RecordingSink::with_segment_size(4);
        {
            let mut writer = BufferWriter::new(&mut sink, 1);
            writer.write(b"0123456789");
        }

        assert_eq!(sink.output, b"0123456789");
        assert_eq!(sink.commits, vec![4, 4, 2]);
        assert_eq!(sink.claims, 3);
    }

    #[test]
    fn claim_is_a_no_op_when_space_is_left() {
        let mut sink = RecordingSink::with_segment_size(8);
        let mut writer = BufferWriter::new(&mut sink, 1);
        writer.write(b"abc");

        writer.claim(1);
        writer.claim(5);
        assert_eq!(writer.buffered(), 3);

        // asking for more than is left commits first
        writer.claim(6);
        assert_eq!(writer.buffered(), 0);
        assert!(writer.available() >= 6);
        drop(writer);

        assert_eq!(sink.claims, 2);
        assert_eq!(sink.commits, vec![3]);
    }

    #[test]
    fn drop_commits_pending_bytes() {
        let mut sink = OutputBuffer::with_segment_size(16);
        {
            let mut writer = BufferWriter::new(&mut sink, 16);
            writer.write(b"pending");
        }
        assert_eq!(sink.committed(), b"pending");
    }

    #[test]
    fn commit_without_writes_does_not_touch_the_sink() {
        let mut sink = RecordingSink::with_segment_size(8);
        {
            let mut writer = BufferWriter::new(&mut sink, 8);
            writer.commit();
            writer.commit();
        }
        assert!(sink.commits.is_empty());
    }

    #[test]
    fn advance_after_writing_into_span() {
        let mut sink = OutputBuffer::with_segment_size(8);
        {
            let mut writer = BufferWriter::new(&mut sink, 8);
            writer.span()[..2].copy_from_slice(b"ok");
            writer.advance(2);
        }
        assert_eq!(sink.committed(), b"ok");
    }

    #[test]
    #[should_panic(expected = "exceeds the")]
    fn advance_beyond_span_panics() {
        let mut sink = OutputBuffer::with_segment_size(4);
        let mut writer = BufferWriter::new(&mut sink, 4);
        writer.advance(5);
    }

    proptest! {
        #[test]
        fn segmented_writes_arrive_in_order(
            data in proptest::collection::vec(any::<u8>(), 0..512),
            segment_size in 1usize..64,
        ) {
            let mut sink = RecordingSink::with_segment_size(segment_size);
            {
                let mut writer = BufferWriter::new(&mut sink, 1);
                writer.write(&data);
            }

            prop_assert_eq!(&sink.output, &data);
            prop_assert!(sink.commits.iter().all(|&count| count <= segment_size));
            prop_assert_eq!(sink.commits.iter().sum::<usize>(), data.len());
        }

        #[test]
        fn interleaved_operations_never_over_commit(
            ops in proptest::collection::vec(op(), 0..64),
            segment_size in 1usize..32,
        ) {
            let mut sink = RecordingSink::with_segment_size(segment_size);
            let mut expected = Vec::new();
            {
                let mut writer = BufferWriter::new(&mut sink, 1);
                for op in ops {
                    match op {
                        Op::Write(bytes) => {
                            writer.write(&bytes);
                            expected.extend_from_slice(&bytes);
                        }
                        Op::Claim(min_size) => {
                            writer.claim(min_size);
                            prop_assert!(writer.available() >= min_size);
                        }
                        Op::Advance(count) => {
                            let count = count.min(writer.available());
                            let span = writer.span();
                            span[..count].fill(b'#');
                            expected.extend(std::iter::repeat_n(b'#', count));
                            writer.advance(count);
                        }
                        Op::Commit => {
                            writer.commit();
                            prop_assert_eq!(writer.buffered(), 0);
                        }
                    }
                }
            }

            prop_assert_eq!(sink.output, expected);
        }
    }
}
