//! Prefix masking of IPv4 and IPv6 addresses.
//!
//! IPv4 addresses are plain `u32` values, IPv6 addresses are [`Ipv6Words`]:
//! `[0]` holds the high (network) half, `[1]` the low half.

/// Maximum prefix length for an IPv4 address (32 bits).
pub const MAX_LENGTH_V4: u8 = 32;

/// Maximum prefix length for an IPv6 address (128 bits).
pub const MAX_LENGTH_V6: u8 = 128;

/// An IPv6 address as two 64-bit words, high word first.
pub type Ipv6Words = [u64; 2];

/// Convert a prefix length to an IPv4 netmask.
///
/// Prefixes longer than 32 saturate to a full mask.
///
/// # Examples
/// ```
/// use flow_netmask::masking::cidr_mask_v4;
/// assert_eq!(cidr_mask_v4(24), 0xFFFFFF00);
/// assert_eq!(cidr_mask_v4(0), 0);
/// ```
pub fn cidr_mask_v4(len: u8) -> u32 {
    match len {
        0 => 0,
        len if len >= MAX_LENGTH_V4 => u32::MAX,
        len => u32::MAX << (MAX_LENGTH_V4 - len),
    }
}

/// Convert a prefix length to an IPv6 netmask, high word first.
///
/// Prefixes longer than 128 saturate to a full mask.
pub fn cidr_mask_v6(len: u8) -> Ipv6Words {
    match len {
        0 => [0, 0],
        1..=63 => [u64::MAX << (64 - len), 0],
        64 => [u64::MAX, 0],
        len if len >= MAX_LENGTH_V6 => [u64::MAX, u64::MAX],
        len => [u64::MAX, u64::MAX << (128 - len)],
    }
}

/// Zero the host bits of an IPv4 address, keeping `len` leading bits.
///
/// # Examples
/// ```
/// use flow_netmask::masking::mask_ipv4;
/// assert_eq!(mask_ipv4(0xC0A80182, 24), 0xC0A80100);
/// ```
pub fn mask_ipv4(addr: u32, len: u8) -> u32 {
    addr & cidr_mask_v4(len)
}

/// Zero the host bits of an IPv6 address, keeping `len` leading bits.
///
/// With `len <= 64` the low word is always cleared; above 64 the high word
/// passes through unchanged.
pub fn mask_ipv6(addr: Ipv6Words, len: u8) -> Ipv6Words {
    let mask = cidr_mask_v6(len);
    [addr[0] & mask[0], addr[1] & mask[1]]
}

#[cfg(test)]
mod tests {
    use super::*;

    const V6: Ipv6Words = [0x2001_0db8_0000_0001, 0x0000_0000_0000_abcd];

    #[test]
    fn test_cidr_mask_v4() {
        assert_eq!(cidr_mask_v4(0), 0x00000000);
        assert_eq!(cidr_mask_v4(1), 0x80000000);
        assert_eq!(cidr_mask_v4(8), 0xFF000000);
        assert_eq!(cidr_mask_v4(16), 0xFFFF0000);
        assert_eq!(cidr_mask_v4(24), 0xFFFFFF00);
        assert_eq!(cidr_mask_v4(32), 0xFFFFFFFF);
        assert_eq!(cidr_mask_v4(33), 0xFFFFFFFF);
    }

    #[test]
    fn test_cidr_mask_v6() {
        assert_eq!(cidr_mask_v6(0), [0, 0]);
        assert_eq!(cidr_mask_v6(1), [0x8000_0000_0000_0000, 0]);
        assert_eq!(cidr_mask_v6(48), [0xFFFF_FFFF_FFFF_0000, 0]);
        assert_eq!(cidr_mask_v6(64), [u64::MAX, 0]);
        assert_eq!(cidr_mask_v6(65), [u64::MAX, 0x8000_0000_0000_0000]);
        assert_eq!(cidr_mask_v6(128), [u64::MAX, u64::MAX]);
        assert_eq!(cidr_mask_v6(200), [u64::MAX, u64::MAX]);
    }

    #[test]
    fn test_mask_ipv4() {
        assert_eq!(mask_ipv4(0xC0A80182, 24), 0xC0A80100);
        assert_eq!(mask_ipv4(0xC0A80182, 16), 0xC0A80000);
        assert_eq!(mask_ipv4(0xC0A80182, 32), 0xC0A80182);
        assert_eq!(mask_ipv4(0xC0A80182, 0), 0);
        assert_eq!(mask_ipv4(0xFFFFFFFF, 1), 0x80000000);
    }

    #[test]
    fn test_mask_ipv4_keeps_top_bits() {
        let addr = 0xDEADBEEF_u32;
        for len in 1..=32u8 {
            let masked = mask_ipv4(addr, len);
            let keep = 32 - len as u32;
            assert_eq!(masked >> keep, addr >> keep, "top bits differ at /{len}");
            if keep > 0 {
                assert_eq!(masked & ((1u32 << keep) - 1), 0, "host bits set at /{len}");
            }
            assert_eq!(mask_ipv4(masked, len), masked, "not idempotent at /{len}");
        }
    }

    #[test]
    fn test_mask_ipv6_example() {
        assert_eq!(mask_ipv6(V6, 48), [0x2001_0db8_0000_0000, 0]);
    }

    #[test]
    fn test_mask_ipv6_boundaries() {
        assert_eq!(mask_ipv6(V6, 0), [0, 0]);
        assert_eq!(mask_ipv6(V6, 64), [V6[0], 0]);
        assert_eq!(mask_ipv6(V6, 128), V6);
        assert_eq!(mask_ipv6(V6, 120), [V6[0], 0xab00]);
    }

    #[test]
    fn test_mask_ipv6_all_lengths() {
        let addr = [u64::MAX, u64::MAX];
        for len in 1..=128u8 {
            let masked = mask_ipv6(addr, len);
            if len <= 64 {
                assert_eq!(masked[1], 0, "low word set at /{len}");
                assert_eq!(masked[0].count_ones(), len as u32);
            } else {
                assert_eq!(masked[0], addr[0], "high word changed at /{len}");
                assert_eq!(masked[1].count_ones(), (len - 64) as u32);
            }
            assert_eq!(mask_ipv6(masked, len), masked, "not idempotent at /{len}");
        }
    }
}
