// ============================================================================
// REACTIVITY - Valor compartido + subscribers
// ============================================================================
// Los clones comparten valor y subscribers: cualquier copia puede notificar.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

type Callback = Rc<dyn Fn()>;

pub struct ReactiveState<T> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<Vec<Callback>>>,
}

impl<T> ReactiveState<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Leer el valor sin clonarlo
    pub fn with<R>(&self, reader: impl FnOnce(&T) -> R) -> R {
        reader(&self.value.borrow())
    }

    /// Establecer nuevo valor y notificar subscribers
    pub fn set(&self, new_value: T) {
        *self.value.borrow_mut() = new_value;
        self.notify();
    }

    /// Actualizar valor usando closure y notificar
    pub fn update<F>(&self, updater: F)
    where
        F: FnOnce(&mut T),
    {
        updater(&mut self.value.borrow_mut());
        self.notify();
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(callback));
    }

    fn notify(&self) {
        // Copia: un callback puede suscribir a otros sin romper el borrow
        let subscribers: Vec<Callback> = self.subscribers.borrow().clone();
        for callback in subscribers {
            callback();
        }
    }
}

impl<T> Clone for ReactiveState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn update_notifies_every_subscriber() {
        let state = ReactiveState::new(vec![1]);
        let hits = Rc::new(Cell::new(0));
        for _ in 0..2 {
            let hits = hits.clone();
            state.subscribe(move || hits.set(hits.get() + 1));
        }
        state.update(|values| values.push(2));
        assert_eq!(hits.get(), 2);
        assert_eq!(state.with(|values| values.clone()), vec![1, 2]);
    }

    #[test]
    fn clones_share_value_and_subscribers() {
        let state = ReactiveState::new(0u32);
        let copy = state.clone();
        let seen = Rc::new(Cell::new(0u32));
        {
            let seen = seen.clone();
            let reader = state.clone();
            state.subscribe(move || seen.set(reader.with(|value| *value)));
        }
        copy.set(7);
        assert_eq!(seen.get(), 7);
        assert_eq!(state.with(|value| *value), 7);
    }
}
