//! Address conversions and serde helpers for raw address fields.
//!
//! Flow records keep addresses as integers so the masking code can work on
//! bits directly; JSON carries them as the usual dotted / colon notation.

use crate::masking::Ipv6Words;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Split an [`Ipv6Addr`] into its high and low 64-bit words.
pub fn ipv6_to_words(addr: Ipv6Addr) -> Ipv6Words {
    let bits = u128::from(addr);
    [(bits >> 64) as u64, bits as u64]
}

/// Join two 64-bit words, high word first, into an [`Ipv6Addr`].
pub fn words_to_ipv6(words: Ipv6Words) -> Ipv6Addr {
    Ipv6Addr::from(((words[0] as u128) << 64) | words[1] as u128)
}

/// Serde adapter for a `u32` IPv4 address written as `"a.b.c.d"`.
pub mod v4_addr {
    use super::*;
    use serde::de;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S>(addr: &u32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&Ipv4Addr::from(*addr).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let addr = Ipv4Addr::from_str(s.trim())
            .map_err(|_| de::Error::custom(format!("invalid IPv4 address: {s}")))?;
        Ok(u32::from(addr))
    }
}

/// Serde adapter for [`Ipv6Words`] written as a textual IPv6 address.
pub mod v6_addr {
    use super::*;
    use serde::de;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S>(words: &Ipv6Words, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&words_to_ipv6(*words).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Ipv6Words, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let addr = Ipv6Addr::from_str(s.trim())
            .map_err(|_| de::Error::custom(format!("invalid IPv6 address: {s}")))?;
        Ok(ipv6_to_words(addr))
    }
}
