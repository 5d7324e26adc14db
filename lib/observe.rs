//! Single-threaded observable values with scoped subscriptions.
//!
//! Every [`Observable`] owns its own observer list; nothing is shared between
//! instances. Observers are held weakly and are removed either when their
//! [`Subscription`] is dropped or when they have been dropped themselves.
//!
//! Notification happens after a mutation has been committed and the value's
//! borrow has been released, so observers may read the value they are being
//! notified about.
//!
//! ```
//! use std::{ cell::Cell, rc::Rc };
//! use qtunnel::observe::{ Observable, Observer };
//!
//! struct Counter(Cell<usize>);
//! impl Observer for Counter {
//!     fn changed(&self) { self.0.set(self.0.get() + 1); }
//! }
//!
//! let value = Observable::new(1.0_f64);
//! let counter = Rc::new(Counter(Cell::new(0)));
//! let sub = value.subscribe(&counter);
//! value.set(2.0);
//! value.with_notifications_suppressed(|| { value.set(3.0); value.set(4.0); });
//! assert_eq!(counter.0.get(), 2);
//! drop(sub);
//! value.set(5.0);
//! assert_eq!(counter.0.get(), 2);
//! ```

use std::{
    cell::{ Cell, Ref, RefCell },
    rc::{ Rc, Weak },
};

/// Receives change notifications from an [`Observable`].
pub trait Observer {
    fn changed(&self);
}

#[derive(Default)]
struct ObserverList {
    entries: RefCell<Vec<(usize, Weak<dyn Observer>)>>,
    next_id: Cell<usize>,
}

impl ObserverList {
    fn add(&self, observer: Weak<dyn Observer>) -> usize {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, observer));
        id
    }

    fn remove(&self, id: usize) {
        self.entries.borrow_mut().retain(|(k, _)| *k != id);
    }

    fn live(&self) -> Vec<Rc<dyn Observer>> {
        let mut entries = self.entries.borrow_mut();
        entries.retain(|(_, obs)| obs.strong_count() > 0);
        entries.iter().filter_map(|(_, obs)| obs.upgrade()).collect()
    }

    fn len(&self) -> usize {
        self.entries.borrow().iter()
            .filter(|(_, obs)| obs.strong_count() > 0)
            .count()
    }
}

/// Handle to a registered observer.
///
/// Dropping the handle unsubscribes the observer.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    list: Weak<ObserverList>,
    id: usize,
}

impl Subscription {
    /// Unsubscribe now.
    pub fn cancel(self) { }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(list) = self.list.upgrade() {
            list.remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// A value that notifies its observers whenever it changes.
pub struct Observable<T> {
    value: RefCell<T>,
    observers: Rc<ObserverList>,
    suppress_depth: Cell<usize>,
    pending: Cell<bool>,
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            observers: Rc::new(ObserverList::default()),
            suppress_depth: Cell::new(0),
            pending: Cell::new(false),
        }
    }

    /// Borrow the current value.
    ///
    /// *Panics if called while the value is being modified, i.e. from inside
    /// the closure passed to [`Self::update`]*.
    pub fn get(&self) -> Ref<'_, T> { self.value.borrow() }

    /// Replace the value and notify.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.notify_observers();
    }

    /// Modify the value in place with a fallible closure, notifying only if it
    /// succeeds.
    ///
    /// The closure is expected to validate before it mutates, so that an error
    /// leaves the value unchanged.
    pub fn update<F, R, E>(&self, f: F) -> Result<R, E>
    where F: FnOnce(&mut T) -> Result<R, E>
    {
        let res = f(&mut self.value.borrow_mut());
        if res.is_ok() { self.notify_observers(); }
        res
    }

    /// Register an observer, holding it weakly.
    pub fn subscribe<O>(&self, observer: &Rc<O>) -> Subscription
    where O: Observer + 'static
    {
        let weak: Weak<O> = Rc::downgrade(observer);
        self.subscribe_weak(weak)
    }

    /// Register an already-downgraded observer.
    pub fn subscribe_weak(&self, observer: Weak<dyn Observer>) -> Subscription {
        let id = self.observers.add(observer);
        Subscription { list: Rc::downgrade(&self.observers), id }
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize { self.observers.len() }

    /// Notify every live observer, or defer the notification if inside
    /// [`Self::with_notifications_suppressed`].
    pub fn notify_observers(&self) {
        if self.suppress_depth.get() > 0 {
            self.pending.set(true);
            return;
        }
        // collect first so that observers may (un)subscribe while notified
        for observer in self.observers.live() {
            observer.changed();
        }
    }

    /// Run `f` with notifications from `self` suppressed.
    ///
    /// If anything would have been notified inside the scope, observers are
    /// notified once when the outermost scope exits.
    pub fn with_notifications_suppressed<F, R>(&self, f: F) -> R
    where F: FnOnce() -> R
    {
        struct Depth<'a>(&'a Cell<usize>);
        impl Drop for Depth<'_> {
            fn drop(&mut self) { self.0.set(self.0.get() - 1); }
        }

        self.suppress_depth.set(self.suppress_depth.get() + 1);
        let res = {
            let _depth = Depth(&self.suppress_depth);
            f()
        };
        if self.suppress_depth.get() == 0 && self.pending.replace(false) {
            self.notify_observers();
        }
        res
    }
}

impl<T: Clone> Observable<T> {
    /// Clone out the current value.
    pub fn snapshot(&self) -> T { self.value.borrow().clone() }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("observers", &self.observers.len())
            .finish()
    }
}
