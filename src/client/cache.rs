use uuid::Uuid;

use crate::dto::{TodoResponse, UpdateTodoRequest};

/// Proof that a background list refresh was started. The refresh's result is
/// only applied if no prediction happened in the meantime.
#[derive(Debug)]
pub struct RefreshTicket {
    generation: u64,
}

/// Snapshot of the cache taken immediately before a predicted mutation was
/// applied. Rolling back with this ticket restores exactly that state.
///
/// Each ticket captures the state right before its own prediction, so two
/// rapid mutations racing can roll back to the first one's pre-state and drop
/// the second's effect. Callers that need stronger guarantees must serialize
/// their mutations.
#[derive(Debug)]
pub struct MutationTicket {
    snapshot: Vec<TodoResponse>,
}

/// The client's local mirror of the server's todo list. All mutations follow
/// the same shape: cancel in-flight refreshes, snapshot, patch immediately,
/// then either reconcile with server truth or roll back to the snapshot.
pub struct TodoListCache {
    todos: Vec<TodoResponse>,
    owner_user_id: Uuid,
    refresh_generation: u64,
}

impl TodoListCache {
    /// Creates an empty cache mirroring the given user's todo list
    pub fn new(owner_user_id: Uuid) -> TodoListCache {
        TodoListCache {
            todos: Vec::new(),
            owner_user_id,
            refresh_generation: 0,
        }
    }

    /// The currently cached list, newest first (predicted entries included)
    pub fn todos(&self) -> &[TodoResponse] {
        &self.todos
    }

    /// Registers the start of a background list refresh
    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket {
            generation: self.refresh_generation,
        }
    }

    /// Applies the result of a background refresh. Returns false and discards
    /// the list if the refresh was cancelled by a prediction that happened
    /// after the ticket was issued, preventing a stale response from
    /// overwriting the predicted state.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        authoritative: Vec<TodoResponse>,
    ) -> bool {
        if ticket.generation != self.refresh_generation {
            return false;
        }

        self.todos = authoritative;
        true
    }

    /// Predicts a successful create: a record with a client-generated temporary
    /// ID appears at the head of the list. Returns the rollback ticket and the
    /// temporary ID.
    pub fn predict_create(&mut self, title: &str) -> (MutationTicket, Uuid) {
        let ticket = self.take_snapshot();

        let temp_id = Uuid::new_v4();
        self.todos
            .insert(0, TodoResponse::predicted(temp_id, title, self.owner_user_id));

        (ticket, temp_id)
    }

    /// Predicts a successful partial update applied in place. Predicting an
    /// update for an ID that isn't cached still snapshots, but changes nothing.
    pub fn predict_update(&mut self, todo_id: Uuid, patch: &UpdateTodoRequest) -> MutationTicket {
        let ticket = self.take_snapshot();

        if let Some(todo) = self.todos.iter_mut().find(|todo| todo.id == todo_id) {
            if let Some(ref new_title) = patch.title {
                todo.title = new_title.clone();
            }
            if let Some(new_completed) = patch.completed {
                todo.completed = new_completed;
            }
        }

        ticket
    }

    /// Predicts a successful delete by removing the record immediately
    pub fn predict_delete(&mut self, todo_id: Uuid) -> MutationTicket {
        let ticket = self.take_snapshot();
        self.todos.retain(|todo| todo.id != todo_id);

        ticket
    }

    /// Unconditionally replaces the cache with authoritative server state
    pub fn reconcile(&mut self, authoritative: Vec<TodoResponse>) {
        self.cancel_inflight_refreshes();
        self.todos = authoritative;
    }

    /// Restores the exact state captured when the ticket's prediction was made
    pub fn roll_back(&mut self, ticket: MutationTicket) {
        self.todos = ticket.snapshot;
    }

    /// Cancels in-flight refreshes and captures the pre-prediction state
    fn take_snapshot(&mut self) -> MutationTicket {
        self.cancel_inflight_refreshes();
        MutationTicket {
            snapshot: self.todos.clone(),
        }
    }

    fn cancel_inflight_refreshes(&mut self) {
        self.refresh_generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use speculoos::prelude::*;

    fn cached_todo(title: &str, owner: Uuid) -> TodoResponse {
        TodoResponse {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            completed: false,
            created_at: Utc::now().to_rfc3339(),
            owner_user_id: owner,
        }
    }

    #[test]
    fn refresh_applies_when_nothing_intervened() {
        let owner = Uuid::new_v4();
        let mut cache = TodoListCache::new(owner);

        let ticket = cache.begin_refresh();
        let applied = cache.complete_refresh(ticket, vec![cached_todo("buy milk", owner)]);

        assert!(applied);
        assert_that!(cache.todos().to_vec()).has_length(1);
    }

    #[test]
    fn prediction_cancels_inflight_refresh() {
        let owner = Uuid::new_v4();
        let mut cache = TodoListCache::new(owner);

        let stale_ticket = cache.begin_refresh();
        cache.predict_create("buy milk");

        // The stale response must not overwrite the prediction
        let applied = cache.complete_refresh(stale_ticket, Vec::new());
        assert!(!applied);
        assert_that!(cache.todos().to_vec()).has_length(1);
        assert_eq!("buy milk", cache.todos()[0].title);
    }

    #[test]
    fn predicted_create_is_visible_immediately_at_head() {
        let owner = Uuid::new_v4();
        let mut cache = TodoListCache::new(owner);
        cache.reconcile(vec![cached_todo("older todo", owner)]);

        let (_ticket, temp_id) = cache.predict_create("buy milk");

        assert_eq!(2, cache.todos().len());
        assert_eq!(temp_id, cache.todos()[0].id);
        assert_eq!("buy milk", cache.todos()[0].title);
        assert!(!cache.todos()[0].completed);
    }

    #[test]
    fn rollback_restores_pre_prediction_state() {
        let owner = Uuid::new_v4();
        let mut cache = TodoListCache::new(owner);
        cache.reconcile(vec![cached_todo("buy milk", owner)]);
        let before = cache.todos().to_vec();

        let ticket = cache.predict_delete(cache.todos()[0].id);
        assert_that!(cache.todos().to_vec()).is_empty();

        cache.roll_back(ticket);
        assert_eq!(before, cache.todos());
    }

    #[test]
    fn predicted_update_patches_in_place() {
        let owner = Uuid::new_v4();
        let mut cache = TodoListCache::new(owner);
        cache.reconcile(vec![cached_todo("buy milk", owner)]);
        let todo_id = cache.todos()[0].id;

        cache.predict_update(
            todo_id,
            &UpdateTodoRequest {
                title: None,
                completed: Some(true),
            },
        );

        assert!(cache.todos()[0].completed);
        assert_eq!("buy milk", cache.todos()[0].title);
    }

    #[test]
    fn racing_mutations_roll_back_to_first_pre_state() {
        let owner = Uuid::new_v4();
        let mut cache = TodoListCache::new(owner);
        cache.reconcile(vec![cached_todo("buy milk", owner)]);
        let pristine = cache.todos().to_vec();
        let todo_id = cache.todos()[0].id;

        // Two predictions race: the second snapshots the first's predicted state
        let first_ticket = cache.predict_update(
            todo_id,
            &UpdateTodoRequest {
                title: None,
                completed: Some(true),
            },
        );
        cache.predict_create("walk the dog");

        // Rolling back the first mutation drops the second's effect too
        cache.roll_back(first_ticket);
        assert_eq!(pristine, cache.todos());
    }

    #[test]
    fn reconcile_replaces_predictions_with_server_truth() {
        let owner = Uuid::new_v4();
        let mut cache = TodoListCache::new(owner);

        let (_ticket, temp_id) = cache.predict_create("buy milk");
        let server_record = cached_todo("buy milk", owner);
        let server_id = server_record.id;
        cache.reconcile(vec![server_record]);

        assert_eq!(1, cache.todos().len());
        assert_eq!(server_id, cache.todos()[0].id);
        assert_ne!(temp_id, cache.todos()[0].id);
    }
}
