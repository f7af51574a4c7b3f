/// Xor of all the bytes, as expected in a line's `*` field.
///
/// Senders using [`ChecksumPolicy::IncludeMarker`](crate::ChecksumPolicy::IncludeMarker) must
/// include the `*` itself in `bytes`.
pub fn xor_sum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |sum, b| sum ^ b)
}

#[cfg(test)]
mod test {
    use super::xor_sum;

    #[test]
    fn xor_sum_folds_every_byte() {
        assert_eq!(xor_sum(&[]), 0);
        assert_eq!(xor_sum(&[1, 2, 4, 8, 16, 32, 64, 128]), 0xFF);
        assert_eq!(xor_sum(b"N1 G1"), b'N' ^ b'1' ^ b' ' ^ b'G' ^ b'1');
        assert_eq!(xor_sum(b"AA"), 0);
    }
}
