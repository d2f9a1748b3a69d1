//! Session token lifecycle, backed by a single persistent key-value slot.

const TOKEN_KEY: &str = "token";

/// One persistent string slot. localStorage in the browser, in-memory in tests.
pub trait TokenSlot {
    fn read(&self) -> Option<String>;
    fn write(&self, token: &str);
    fn clear(&self);
}

#[derive(Clone, Default, PartialEq)]
pub struct LocalStorageSlot;

impl TokenSlot for LocalStorageSlot {
    fn read(&self) -> Option<String> {
        if let Some(window) = web_sys::window() {
            if let Ok(Some(storage)) = window.local_storage() {
                if let Ok(token) = storage.get_item(TOKEN_KEY) {
                    return token;
                }
            }
        }
        None
    }

    fn write(&self, token: &str) {
        if let Some(window) = web_sys::window() {
            if let Ok(Some(storage)) = window.local_storage() {
                let _ = storage.set_item(TOKEN_KEY, token);
            }
        }
    }

    fn clear(&self) {
        if let Some(window) = web_sys::window() {
            if let Ok(Some(storage)) = window.local_storage() {
                let _ = storage.remove_item(TOKEN_KEY);
            }
        }
    }
}

/// In-memory token plus its durable slot. The token is read from the slot once
/// at construction; presence of a token is the sole authorization gate.
#[derive(Clone, PartialEq)]
pub struct SessionStore<S: TokenSlot = LocalStorageSlot> {
    slot: S,
    token: Option<String>,
}

impl<S: TokenSlot> SessionStore<S> {
    pub fn new(slot: S) -> Self {
        // An empty persisted value counts as anonymous.
        let token = slot.read().filter(|t| !t.is_empty());
        Self { slot, token }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Stores the token in memory and in the slot. Empty tokens are ignored.
    pub fn set_token(&mut self, token: String) {
        if token.is_empty() {
            return;
        }
        self.slot.write(&token);
        self.token = Some(token);
    }

    pub fn clear(&mut self) {
        self.slot.clear();
        self.token = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemorySlot(Rc<RefCell<Option<String>>>);

    impl TokenSlot for MemorySlot {
        fn read(&self) -> Option<String> {
            self.0.borrow().clone()
        }

        fn write(&self, token: &str) {
            *self.0.borrow_mut() = Some(token.to_string());
        }

        fn clear(&self) {
            *self.0.borrow_mut() = None;
        }
    }

    #[test]
    fn token_survives_a_fresh_init() {
        let slot = MemorySlot::default();
        let mut session = SessionStore::new(slot.clone());
        session.set_token("abc".to_string());

        let reloaded = SessionStore::new(slot);
        assert_eq!(reloaded.token(), Some("abc"));
    }

    #[test]
    fn clear_removes_memory_and_slot() {
        let slot = MemorySlot::default();
        let mut session = SessionStore::new(slot.clone());
        session.set_token("abc".to_string());
        session.clear();

        assert_eq!(session.token(), None);
        assert_eq!(slot.read(), None);
        assert_eq!(SessionStore::new(slot).token(), None);
    }

    #[test]
    fn empty_persisted_value_is_anonymous() {
        let slot = MemorySlot::default();
        slot.write("");
        assert_eq!(SessionStore::new(slot).token(), None);
    }

    #[test]
    fn empty_token_is_not_stored() {
        let slot = MemorySlot::default();
        let mut session = SessionStore::new(slot.clone());
        session.set_token(String::new());
        assert_eq!(session.token(), None);
        assert_eq!(slot.read(), None);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn local_storage_round_trip() {
        let slot = LocalStorageSlot;
        slot.write("abc");
        assert_eq!(SessionStore::new(LocalStorageSlot).token(), Some("abc"));
        slot.clear();
        assert_eq!(SessionStore::new(LocalStorageSlot).token(), None);
    }
}
