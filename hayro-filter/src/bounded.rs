//! Support for decoding only the start of a stream.

/// Whether a decoder that has produced `buf_len` bytes should keep going.
///
/// A negative `max_len` means that everything should be decoded.
#[inline]
pub fn check_buf_len(buf_len: usize, max_len: i64) -> bool {
    max_len < 0 || (buf_len as u64) < max_len as u64
}

/// Cut `buf` down to at most `max_len` bytes.
pub(crate) fn truncate(mut buf: Vec<u8>, max_len: i64) -> Vec<u8> {
    if let Ok(max_len) = usize::try_from(max_len) {
        buf.truncate(max_len);
    }

    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_decoding() {
        assert!(check_buf_len(100, -1));
        assert!(check_buf_len(0, -1));
        assert!(check_buf_len(50, 100));
        assert!(!check_buf_len(100, 100));
        assert!(!check_buf_len(150, 100));
        assert!(!check_buf_len(0, 0));
        assert!(check_buf_len(0, 10));
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate(vec![1, 2, 3], -1), [1, 2, 3]);
        assert_eq!(truncate(vec![1, 2, 3], 2), [1, 2]);
        assert_eq!(truncate(vec![1, 2, 3], 10), [1, 2, 3]);
        assert!(truncate(vec![1, 2, 3], 0).is_empty());
    }
}
