//! Ring token and the key-hashing function.
//!
//! Unlike a general-purpose consistent-hashing library, this ring has exactly
//! one hash function: every peer in the cluster must agree bit-for-bit on
//! where a key lands, so the function is fixed rather than pluggable
//! (swapping it out per node would make peers silently disagree about key
//! ownership). The wire contract is: MD5 the UTF-8 bytes of the input, take
//! the first 8 hex digits of the digest, parse as a big-endian `u32`.

use md5::{Digest, Md5};

/// A 32-bit position on the hash ring.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Token(pub u32);

impl Token {
    pub const MIN: Token = Token(u32::MIN);
    pub const MAX: Token = Token(u32::MAX);
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Hash an arbitrary string to its ring token.
///
/// Reproduces `int(hashlib.md5(s.encode()).hexdigest()[:8], 16)`: the first
/// 8 hex digits of the MD5 digest, read as a big-endian `u32`. Any
/// implementation that wants to interoperate with this ring must match this
/// bit-exactly.
pub fn hash_key(s: &str) -> Token {
    let digest = Md5::digest(s.as_bytes());
    let bytes: [u8; 4] = digest[0..4].try_into().expect("md5 digest is 16 bytes");
    Token(u32::from_be_bytes(bytes))
}

/// Token for the `i`-th virtual node of `node_url`, via `"{node_url}#{i}"`.
pub fn vnode_token(node_url: &str, i: usize) -> Token {
    hash_key(&format!("{node_url}#{i}"))
}
