use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::trace;

type Callback<T> = Box<dyn Fn(&T)>;
type Listeners<T> = Rc<RefCell<Vec<Option<Callback<T>>>>>;

/// Single-threaded broadcast channel splitting the write side from the read
/// side, so the board logic can hold an [`EventEmitter`] while presentation
/// code holds only an [`EventObserver`].
pub struct Channel<T: std::fmt::Debug> {
    _marker: std::marker::PhantomData<T>,
}

impl<T: std::fmt::Debug> Channel<T> {
    pub fn new() -> (EventEmitter<T>, EventObserver<T>) {
        let listeners: Listeners<T> = Rc::new(RefCell::new(Vec::new()));
        (
            EventEmitter {
                listeners: Rc::clone(&listeners),
            },
            EventObserver { listeners },
        )
    }
}

pub struct EventEmitter<T: std::fmt::Debug> {
    listeners: Listeners<T>,
}

impl<T: std::fmt::Debug> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<T: std::fmt::Debug> EventEmitter<T> {
    pub fn emit(&self, data: &T) {
        let listeners = self.listeners.borrow();
        trace!(
            target: "events",
            "emitting to {} listeners: {:?}",
            listeners.iter().flatten().count(),
            data
        );
        for listener in listeners.iter().flatten() {
            listener(data);
        }
    }
}

pub struct EventObserver<T: std::fmt::Debug> {
    listeners: Listeners<T>,
}

impl<T: std::fmt::Debug> Clone for EventObserver<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<T: std::fmt::Debug> EventObserver<T> {
    /// Register a listener. Dropping the returned [`Unsubscriber`] keeps the
    /// subscription alive; call [`Unsubscriber::unsubscribe`] to detach.
    pub fn subscribe<F>(&self, callback: F) -> Unsubscriber<T>
    where
        F: Fn(&T) + 'static,
    {
        let mut listeners = self.listeners.borrow_mut();
        listeners.push(Some(Box::new(callback)));
        Unsubscriber {
            listeners: Rc::downgrade(&self.listeners),
            slot: listeners.len() - 1,
        }
    }
}

/// Handle for detaching a single listener from its channel.
pub struct Unsubscriber<T: std::fmt::Debug> {
    listeners: Weak<RefCell<Vec<Option<Callback<T>>>>>,
    slot: usize,
}

impl<T: std::fmt::Debug> Unsubscriber<T> {
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut()[self.slot] = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_subscribe_and_emit() {
        let (emitter, observer) = Channel::<i32>::new();
        let sum = Rc::new(Cell::new(0));

        let sum_listener = Rc::clone(&sum);
        observer.subscribe(move |data: &i32| {
            sum_listener.set(sum_listener.get() + data);
        });

        emitter.emit(&5);
        emitter.emit(&7);
        assert_eq!(sum.get(), 12);
    }

    #[test]
    fn test_every_listener_sees_each_event() {
        let (emitter, observer) = Channel::<i32>::new();
        let count = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let count_listener = Rc::clone(&count);
            observer.subscribe(move |_| {
                count_listener.set(count_listener.get() + 1);
            });
        }

        emitter.emit(&1);
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_unsubscribe_detaches_only_its_listener() {
        let (emitter, observer) = Channel::<i32>::new();
        let count = Rc::new(Cell::new(0));

        let count_first = Rc::clone(&count);
        let first = observer.subscribe(move |_| {
            count_first.set(count_first.get() + 1);
        });
        let count_second = Rc::clone(&count);
        observer.subscribe(move |_| {
            count_second.set(count_second.get() + 1);
        });

        first.unsubscribe();
        emitter.emit(&1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_cloned_endpoints_share_the_channel() {
        let (emitter, observer) = Channel::<i32>::new();
        let count = Rc::new(Cell::new(0));

        let count_listener = Rc::clone(&count);
        observer.clone().subscribe(move |_| {
            count_listener.set(count_listener.get() + 1);
        });

        emitter.clone().emit(&1);
        emitter.emit(&1);
        assert_eq!(count.get(), 2);
    }
}
