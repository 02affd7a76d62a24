//! Internal helper macros.

/// Returns `Err($error)` early when `$predicate` does not hold.
///
/// ```text
/// ensure!(consumed <= MAX_HEADER_BYTES, ParseError::too_large_header(consumed, MAX_HEADER_BYTES));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
