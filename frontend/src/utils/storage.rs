use std::cell::RefCell;
use std::collections::HashMap;

/// Key/value store backing the session context. The browser implementation
/// wraps `localStorage`; the in-memory one backs tests and host builds.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

pub struct BrowserStore {
    storage: web_sys::Storage,
}

impl BrowserStore {
    pub fn open() -> Result<Self, String> {
        let window = web_sys::window().ok_or_else(|| "no window object".to_string())?;
        let storage = window
            .local_storage()
            .map_err(|_| "localStorage access denied".to_string())?
            .ok_or_else(|| "localStorage missing".to_string())?;
        Ok(Self { storage })
    }
}

impl SessionStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let _ = self.storage.set_item(key, value);
    }

    fn remove(&self, key: &str) {
        let _ = self.storage.remove_item(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryStore::default();
        assert!(store.get("token").is_none());

        store.set("token", "abc");
        assert_eq!(store.get("token").as_deref(), Some("abc"));

        store.set("token", "def");
        assert_eq!(store.get("token").as_deref(), Some("def"));

        store.remove("token");
        assert!(store.get("token").is_none());
    }

    #[test]
    fn memory_store_keys_are_independent() {
        let store = MemoryStore::default();
        store.set("a", "1");
        store.set("b", "2");
        store.remove("a");
        assert!(store.get("a").is_none());
        assert_eq!(store.get("b").as_deref(), Some("2"));
    }
}
