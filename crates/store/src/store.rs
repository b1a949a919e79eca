use std::sync::Arc;

use crate::ids::ConversationId;
use crate::state::ChatState;
use crate::types::Message;

type Subscriber = Box<dyn FnMut(&ChatState)>;

/// Handle returned by [`ChatStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Owner of the current [`ChatState`] snapshot.
///
/// Each mutation reads the whole previous snapshot, computes the next one,
/// publishes it and then notifies every subscriber once. The store has a single
/// writer, enforced by `&mut self`.
pub struct ChatStore {
    state: Arc<ChatState>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription_id: u64,
}

impl ChatStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(ChatState::new()),
            subscribers: Vec::new(),
            next_subscription_id: 1,
        }
    }

    /// Current snapshot. Later mutations never alter a returned snapshot.
    pub fn snapshot(&self) -> Arc<ChatState> {
        self.state.clone()
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&ChatState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id = self.next_subscription_id.saturating_add(1);
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Returns false when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(subscription_id, _)| *subscription_id != id);
        self.subscribers.len() != before
    }

    /// Creates an empty conversation with a fresh id, selects it and returns the id.
    pub fn create_new_conversation(&mut self) -> ConversationId {
        let id = ConversationId::new_v7();
        self.apply(|state| state.create_new_conversation(id));
        id
    }

    pub fn select_conversation(&mut self, id: ConversationId) {
        self.apply(|state| state.select_conversation(id));
    }

    pub fn add_message(&mut self, conversation_id: ConversationId, message: Message) {
        self.apply(|state| state.add_message(conversation_id, message));
    }

    pub fn delete_conversation(&mut self, id: ConversationId) {
        self.apply(|state| state.delete_conversation(id));
    }

    fn apply(&mut self, transition: impl FnOnce(ChatState) -> ChatState) {
        let previous = ChatState::clone(&self.state);
        self.state = Arc::new(transition(previous));

        let snapshot = self.state.clone();
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&snapshot);
        }
    }
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::Local;

    use super::*;

    fn recorder(store: &mut ChatStore) -> (SubscriptionId, Rc<RefCell<Vec<ChatState>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let id = store.subscribe(move |state| sink.borrow_mut().push(state.clone()));
        (id, seen)
    }

    #[test]
    fn every_mutation_notifies_once_with_the_published_snapshot() {
        let mut store = ChatStore::new();
        let (_, seen) = recorder(&mut store);

        let id = store.create_new_conversation();
        store.add_message(id, Message::user("hi", Local::now()));
        store.select_conversation(id);
        store.delete_conversation(id);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0].current_conversation_id(), Some(id));
        assert_eq!(
            seen[1]
                .conversation(id)
                .map(|conversation| conversation.messages.len()),
            Some(1)
        );
        assert_eq!(seen.last(), Some(store.state()));
    }

    #[test]
    fn no_op_mutations_still_publish_an_unchanged_snapshot() {
        let mut store = ChatStore::new();
        store.create_new_conversation();
        let before = store.snapshot();
        let (_, seen) = recorder(&mut store);

        store.add_message(ConversationId::placeholder(), Message::user("x", Local::now()));
        store.delete_conversation(ConversationId::new_v7());

        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(*store.snapshot(), *before);
    }

    #[test]
    fn snapshots_are_not_affected_by_later_mutations() {
        let mut store = ChatStore::new();
        let id = store.create_new_conversation();
        let before = store.snapshot();

        store.add_message(id, Message::user("hi", Local::now()));

        assert!(
            before
                .conversation(id)
                .is_some_and(|conversation| conversation.messages.is_empty())
        );
        assert_eq!(
            store
                .snapshot()
                .conversation(id)
                .map(|conversation| conversation.messages.len()),
            Some(1)
        );
    }

    #[test]
    fn unsubscribed_callbacks_stop_receiving() {
        let mut store = ChatStore::new();
        let (first, first_seen) = recorder(&mut store);
        let (_, second_seen) = recorder(&mut store);

        store.create_new_conversation();
        assert!(store.unsubscribe(first));
        assert!(!store.unsubscribe(first));
        store.create_new_conversation();

        assert_eq!(first_seen.borrow().len(), 1);
        assert_eq!(second_seen.borrow().len(), 2);
    }

    #[test]
    fn created_conversations_are_newest_first() {
        let mut store = ChatStore::new();
        let ids = (0..5)
            .map(|_| store.create_new_conversation())
            .collect::<Vec<_>>();

        let listed = store
            .state()
            .conversations()
            .iter()
            .map(|conversation| conversation.id)
            .collect::<Vec<_>>();
        let expected = ids.iter().rev().copied().collect::<Vec<_>>();
        assert_eq!(listed, expected);
    }
}
