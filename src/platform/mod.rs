//! Platform abstraction layer
//!
//! Browser/native differences that more than one module needs.

/// LocalStorage as a JSON key/value store (web only)
#[cfg(target_arch = "wasm32")]
pub mod storage {
    use serde::Serialize;
    use serde::de::DeserializeOwned;

    fn local_storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }

    /// Read and parse `key`; None if it is missing or malformed
    pub fn load<T: DeserializeOwned>(key: &str) -> Option<T> {
        let json = local_storage()?.get_item(key).ok()??;
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Discarding stored {}: {}", key, e);
                None
            }
        }
    }

    /// Serialize `value` under `key`; returns false if nothing was written
    pub fn save<T: Serialize>(key: &str, value: &T) -> bool {
        let Some(storage) = local_storage() else {
            return false;
        };
        match serde_json::to_string(value) {
            Ok(json) => storage.set_item(key, &json).is_ok(),
            Err(e) => {
                log::warn!("Could not serialize {}: {}", key, e);
                false
            }
        }
    }
}
