use num_bigint::BigUint;
use sha3::{Digest, Sha3_256};

/// SHA3-256 digest of `msg` read as a big-endian unsigned integer.
pub fn hash_message(msg: &[u8]) -> BigUint {
    let mut hasher = Sha3_256::new();
    hasher.update(msg);
    BigUint::from_bytes_be(&hasher.finalize())
}

#[cfg(test)]
mod test {
    use super::*;

    fn from_hex(hex: &[u8]) -> BigUint {
        BigUint::parse_bytes(hex, 16).unwrap()
    }

    #[test]
    fn known_digests() {
        assert_eq!(
            hash_message(b""),
            from_hex(b"a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a")
        );
        assert_eq!(
            hash_message(b"abc"),
            from_hex(b"3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532")
        );
    }

    #[test]
    fn digest_fits_256_bits() {
        let msg = b"000fa0fdaffdaaeeeee0012342aaaaaaaaaa098756224235635242342325";
        assert!(hash_message(msg).bits() <= 256);
        assert_ne!(hash_message(b"hello world"), hash_message(b"hello world!"));
    }
}
