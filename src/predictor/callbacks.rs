/// Receives one scalar measurement, such as an inference time or a frame rate.
pub type FloatResultCallback = Box<dyn FnMut(f32) + Send>;

/// Holds at most one callback. Registering again replaces the previous one.
#[derive(Default)]
pub struct CallbackSlot(Option<FloatResultCallback>);

impl std::fmt::Debug for CallbackSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CallbackSlot")
            .field(&if self.is_set() { "set" } else { "empty" })
            .finish()
    }
}

impl CallbackSlot {
    /// Replaces the registered callback, `None` clears the slot.
    pub fn set(&mut self, callback: Option<FloatResultCallback>) {
        self.0 = callback;
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub fn emit(&mut self, value: f32) {
        if let Some(callback) = self.0.as_mut() {
            callback(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn last_registration_wins() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut slot = CallbackSlot::default();

        let first = Arc::clone(&seen);
        slot.set(Some(Box::new(move |v| first.lock().unwrap().push(("first", v)))));
        slot.emit(1.);

        let second = Arc::clone(&seen);
        slot.set(Some(Box::new(move |v| second.lock().unwrap().push(("second", v)))));
        slot.emit(2.);

        slot.set(None);
        slot.emit(3.);

        assert_eq!(*seen.lock().unwrap(), vec![("first", 1.), ("second", 2.)]);
        assert!(!slot.is_set());
    }
}
