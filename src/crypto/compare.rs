use subtle::ConstantTimeEq;

/// Compare two byte slices without short-circuiting on the first mismatch.
///
/// Slices of different length are unequal. For equal lengths every byte is
/// XORed and the differences are OR-accumulated; the result is inspected only
/// after the full scan.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
