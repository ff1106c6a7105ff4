//! Host byte-order detection and in-place swapping.
//!
//! Chunk files are stored little-endian. Fixed-size records are read with their
//! native bit pattern and swapped afterwards when the running host is big-endian.

/// `true` when compiled for a big-endian target.
pub const HOST_IS_BIG_ENDIAN: bool = cfg!(target_endian = "big");

/// Reverse the byte order of every multi-byte field in place.
///
/// Implementations must be involutions: swapping twice yields the original value.
pub trait SwapEndian {
    fn swap_endianness(&mut self);
}

impl SwapEndian for u32 {
    #[inline]
    fn swap_endianness(&mut self) {
        *self = self.swap_bytes();
    }
}

impl<T: SwapEndian> SwapEndian for [T] {
    fn swap_endianness(&mut self) {
        for item in self {
            item.swap_endianness();
        }
    }
}

/// Convert a little-endian on-disk value to host order.
#[inline]
pub fn from_disk<T: SwapEndian + ?Sized>(value: &mut T) {
    if HOST_IS_BIG_ENDIAN {
        value.swap_endianness();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_u32() {
        let mut v = 0x1122_3344u32;
        v.swap_endianness();
        assert_eq!(v, 0x4433_2211);
        v.swap_endianness();
        assert_eq!(v, 0x1122_3344);
    }

    #[test]
    fn test_swap_slice() {
        let mut values = [0x0000_00FFu32, 0xFF00_0000];
        values.swap_endianness();
        assert_eq!(values, [0xFF00_0000, 0x0000_00FF]);
    }

    #[test]
    fn test_from_disk_matches_le_decoding() {
        let bytes = [0x44u8, 0x33, 0x22, 0x11];
        let mut v = u32::from_ne_bytes(bytes);
        from_disk(&mut v);
        assert_eq!(v, u32::from_le_bytes(bytes));
    }
}
