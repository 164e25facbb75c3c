//! View models and the observer mechanism screens subscribe through.

mod profile;
mod records;

pub use profile::*;
pub use records::*;

/// Handle returned by [`StateHolder::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<S> = Box<dyn FnMut(&S)>;

/// Current state plus subscribers notified synchronously on every change.
pub struct StateHolder<S> {
    state: S,
    subscribers: Vec<(SubscriptionId, Subscriber<S>)>,
    next_id: u64,
}

impl<S> StateHolder<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get(&self) -> &S {
        &self.state
    }

    /// Register `subscriber` and call it once with the current state.
    pub fn subscribe<F>(&mut self, mut subscriber: F) -> SubscriptionId
    where
        F: FnMut(&S) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        subscriber(&self.state);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Mutate the state in place, then notify every subscriber.
    pub fn update<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut S),
    {
        mutate(&mut self.state);
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.state);
        }
    }

    pub fn set(&mut self, state: S) {
        self.update(|current| *current = state);
    }
}

impl<S: Default> Default for StateHolder<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<i32>>>, impl FnMut(&i32) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |value: &i32| sink.borrow_mut().push(*value))
    }

    #[test]
    fn test_subscribe_gets_current_state() {
        let mut holder = StateHolder::new(1);
        let (seen, subscriber) = recorder();
        holder.subscribe(subscriber);
        assert_eq!(*seen.borrow(), vec![1]);
    }

    #[test]
    fn test_update_notifies_in_order() {
        let mut holder = StateHolder::new(0);
        let (seen, subscriber) = recorder();
        holder.subscribe(subscriber);

        holder.update(|n| *n += 5);
        holder.set(9);
        assert_eq!(*seen.borrow(), vec![0, 5, 9]);
        assert_eq!(*holder.get(), 9);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut holder = StateHolder::new(0);
        let (seen, subscriber) = recorder();
        let id = holder.subscribe(subscriber);

        assert!(holder.unsubscribe(id));
        assert!(!holder.unsubscribe(id));
        holder.set(3);
        assert_eq!(*seen.borrow(), vec![0]);
        assert_eq!(holder.subscriber_count(), 0);
    }
}
