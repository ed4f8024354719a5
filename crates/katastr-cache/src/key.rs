use std::fmt::Display;

use sha2::{Digest, Sha256};

const KEY_NAMESPACE: &str = "cuzk";

/// Builds `cuzk:{prefix}:{hash}` where `hash` is the hex of the first 8 bytes
/// of SHA-256 over every param rendered as `{param}:`.
pub fn cache_key(prefix: &str, params: &[&dyn Display]) -> String {
    let mut hasher = Sha256::new();
    for param in params {
        hasher.update(format!("{}:", param).as_bytes());
    }
    let digest = hasher.finalize();
    format!("{}:{}:{}", KEY_NAMESPACE, prefix, hex::encode(&digest[..8]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_key() {
        assert_eq!(cache_key("parcel", &[&123456i64]), "cuzk:parcel:6ee90040808954d9");
        assert_eq!(
            cache_key("parcels:search", &[&730955u32, &"1024"]),
            "cuzk:parcels:search:3dfe856b550bc345"
        );
    }

    #[test]
    fn test_deterministic() {
        let a = cache_key("parcels:polygon", &[&1042959.15, &742825.76, &5]);
        let b = cache_key("parcels:polygon", &[&1042959.15, &742825.76, &5]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_params_and_prefix_distinguish_keys() {
        assert_ne!(cache_key("parcel", &[&1]), cache_key("parcel", &[&2]));
        assert_ne!(cache_key("parcel", &[&1]), cache_key("building", &[&1]));
        // The separator keeps "12","3" apart from "1","23".
        assert_ne!(cache_key("x", &[&"12", &"3"]), cache_key("x", &[&"1", &"23"]));
    }
}
