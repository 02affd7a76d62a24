//! ASCII decimal rendering straight into a [`BufferWriter`].

use crate::buffer::{BufferWriter, OutputSink};

/// Longest decimal rendering of a `u64`, the scratch is sized for it.
const MAX_ULONG_BYTE_LENGTH: usize = 20;

const ASCII_DIGIT_START: u8 = b'0';

impl<S: OutputSink + ?Sized> BufferWriter<'_, S> {
    /// Appends `number` in canonical decimal form, `0` renders as a single digit.
    ///
    /// Values below 1000 are rendered in place when three bytes of the
    /// current region are free. Everything else goes through a stack scratch
    /// buffer and [`write`](BufferWriter::write), which may span regions.
    #[inline]
    pub fn write_numeric(&mut self, number: u32) {
        let advance_by = if self.available() >= 3 { write_small(self.span(), number) } else { 0 };

        if advance_by > 0 {
            self.advance(advance_by);
        } else {
            self.write_numeric_multi_write(number);
        }
    }

    #[inline(never)]
    pub(crate) fn write_numeric_multi_write(&mut self, number: u32) {
        let mut scratch = [0u8; MAX_ULONG_BYTE_LENGTH];
        let mut position = MAX_ULONG_BYTE_LENGTH;
        let mut value = number;
        loop {
            let quotient = value / 10;
            position -= 1;
            scratch[position] = ASCII_DIGIT_START + digit(value - quotient * 10);
            value = quotient;
            if value == 0 {
                break;
            }
        }

        self.write(&scratch[position..]);
    }
}

/// Renders `number` into `span` if it has at most three digits and returns
/// the number of bytes written, zero otherwise.
///
/// The divisions use multiply/shift pairs: `(n * 205) >> 11` equals `n / 10`
/// for `n <= 1028` and `(n * 41) >> 12` equals `n / 100` for `n <= 1098`.
#[inline]
fn write_small(span: &mut [u8], number: u32) -> usize {
    debug_assert!(span.len() >= 3);
    match number {
        0..10 => {
            span[0] = ASCII_DIGIT_START + digit(number);
            1
        }
        10..100 => {
            let tens = (number * 205) >> 11;
            span[0] = ASCII_DIGIT_START + digit(tens);
            span[1] = ASCII_DIGIT_START + digit(number - tens * 10);
            2
        }
        100..1000 => {
            let hundreds = (number * 41) >> 12;
            let tens_and_hundreds = (number * 205) >> 11;
            span[0] = ASCII_DIGIT_START + digit(hundreds);
            span[1] = ASCII_DIGIT_START + digit(tens_and_hundreds - hundreds * 10);
            span[2] = ASCII_DIGIT_START + digit(number - tens_and_hundreds * 10);
            3
        }
        _ => 0,
    }
}

#[inline(always)]
#[allow(clippy::cast_possible_truncation, reason = "callers only pass values below 10")]
fn digit(value: u32) -> u8 {
    debug_assert!(value < 10);
    value as u8
}
