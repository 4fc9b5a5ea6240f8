use uuid::Uuid;

use crate::client::cache::TodoListCache;
use crate::client::transport::{ApiError, TodoTransport};
use crate::dto::{NewTodoRequest, TodoResponse, UpdateTodoRequest};

/// Drives the optimistic-update protocol for each mutation: predict the new
/// state into the cache, call the server, then reconcile with authoritative
/// data on success or roll the cache back to its snapshot on failure.
pub struct TodoClient<T: TodoTransport> {
    transport: T,
    cache: TodoListCache,
}

impl<T: TodoTransport> TodoClient<T> {
    pub fn new(transport: T, user_id: Uuid) -> TodoClient<T> {
        TodoClient {
            transport,
            cache: TodoListCache::new(user_id),
        }
    }

    /// The locally cached list, newest first. Reflects predictions immediately,
    /// before the server has confirmed them.
    pub fn todos(&self) -> &[TodoResponse] {
        self.cache.todos()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Refreshes the cache from the server. The result is discarded if a
    /// mutation was predicted while the fetch was in flight.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let ticket = self.cache.begin_refresh();
        let authoritative = self.transport.fetch_todos().await?;
        self.cache.complete_refresh(ticket, authoritative);

        Ok(())
    }

    /// Creates a todo, optimistically showing it at the head of the list
    pub async fn create(&mut self, title: &str) -> Result<(), ApiError> {
        let (ticket, _temp_id) = self.cache.predict_create(title);

        let request = NewTodoRequest {
            title: title.to_owned(),
        };
        match self.transport.create_todo(&request).await {
            Ok(_) => self.reconcile_with_server().await,
            Err(err) => {
                self.cache.roll_back(ticket);
                Err(err)
            }
        }
    }

    /// Applies a partial update, optimistically patching the cached record in place
    pub async fn update(&mut self, todo_id: Uuid, patch: UpdateTodoRequest) -> Result<(), ApiError> {
        let ticket = self.cache.predict_update(todo_id, &patch);

        match self.transport.update_todo(todo_id, &patch).await {
            Ok(_) => self.reconcile_with_server().await,
            Err(err) => {
                self.cache.roll_back(ticket);
                Err(err)
            }
        }
    }

    /// Marks a todo complete or incomplete
    pub async fn set_completed(&mut self, todo_id: Uuid, completed: bool) -> Result<(), ApiError> {
        self.update(
            todo_id,
            UpdateTodoRequest {
                title: None,
                completed: Some(completed),
            },
        )
        .await
    }

    /// Deletes a todo, optimistically removing it from the list
    pub async fn delete(&mut self, todo_id: Uuid) -> Result<(), ApiError> {
        let ticket = self.cache.predict_delete(todo_id);

        match self.transport.delete_todo(todo_id).await {
            Ok(_) => self.reconcile_with_server().await,
            Err(err) => {
                self.cache.roll_back(ticket);
                Err(err)
            }
        }
    }

    /// After a confirmed mutation the prediction is always replaced wholesale
    /// with a fresh authoritative list, picking up server-assigned IDs and
    /// timestamps. If the re-fetch itself fails the prediction stays in place
    /// until the next successful refresh.
    async fn reconcile_with_server(&mut self) -> Result<(), ApiError> {
        let authoritative = self.transport.fetch_todos().await?;
        self.cache.reconcile(authoritative);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::test_util::InMemoryTodoServer;
    use crate::domain::test_util::Connectivity;
    use speculoos::prelude::*;
    use std::sync::RwLock;
    use uuid::Uuid;

    async fn client_with_todos(titles: &[&str]) -> TodoClient<RwLock<InMemoryTodoServer>> {
        let user_id = Uuid::new_v4();
        let mut client = TodoClient::new(InMemoryTodoServer::new_locked(user_id), user_id);
        for title in titles {
            client.create(title).await.expect("seeding todo failed");
        }

        client
    }

    #[tokio::test]
    async fn successful_create_converges_to_server_state() {
        let mut client = client_with_todos(&[]).await;

        let create_result = client.create("buy milk").await;
        assert_that!(create_result).is_ok();

        let server_truth = client.transport().fetch_todos().await.expect("fetch failed");
        assert_eq!(server_truth, client.todos());
        // The temporary prediction ID was replaced by the server-assigned one
        assert_eq!(server_truth[0].id, client.todos()[0].id);
    }

    #[tokio::test]
    async fn full_scenario_create_toggle_delete() {
        let mut client = client_with_todos(&[]).await;

        client.create("buy milk").await.expect("create failed");
        assert!(matches!(client.todos(), [TodoResponse { title, completed: false, .. }] if title == "buy milk"));

        let todo_id = client.todos()[0].id;
        client
            .set_completed(todo_id, true)
            .await
            .expect("toggle failed");
        assert!(matches!(client.todos(), [TodoResponse { completed: true, .. }]));

        client.delete(todo_id).await.expect("delete failed");
        assert_that!(client.todos().to_vec()).is_empty();
    }

    #[tokio::test]
    async fn list_stays_newest_first_after_reconciliation() {
        let client = client_with_todos(&["first", "second", "third"]).await;

        let titles: Vec<&str> = client.todos().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(vec!["third", "second", "first"], titles);
    }

    #[tokio::test]
    async fn rejected_create_rolls_back_to_snapshot() {
        let mut client = client_with_todos(&["buy milk"]).await;
        let before = client.todos().to_vec();

        let create_result = client.create("").await;
        let Err(ApiError::Validation) = create_result else {
            panic!("Expected a validation failure, got: {create_result:#?}");
        };

        assert_eq!(before, client.todos());
    }

    #[tokio::test]
    async fn failed_mutation_rolls_back_to_snapshot() {
        let mut client = client_with_todos(&["buy milk"]).await;
        let todo_id = client.todos()[0].id;
        let before = client.todos().to_vec();

        {
            let mut server = client.transport().write().expect("server rw lock poisoned");
            server.connected = Connectivity::Disconnected;
        }

        let toggle_result = client.set_completed(todo_id, true).await;
        let Err(ApiError::Internal) = toggle_result else {
            panic!("Expected an internal failure, got: {toggle_result:#?}");
        };

        // The optimistic patch was reverted exactly
        assert_eq!(before, client.todos());
        assert!(!client.todos()[0].completed);
    }

    #[tokio::test]
    async fn deleting_unknown_todo_is_not_found_and_rolls_back() {
        let mut client = client_with_todos(&["buy milk"]).await;
        let before = client.todos().to_vec();

        let delete_result = client.delete(Uuid::new_v4()).await;
        let Err(ApiError::NotFound) = delete_result else {
            panic!("Expected NotFound, got: {delete_result:#?}");
        };

        assert_eq!(before, client.todos());
    }

    #[tokio::test]
    async fn refresh_pulls_server_changes() {
        let mut client = client_with_todos(&["buy milk"]).await;

        // Another device completes the todo behind this client's back
        {
            let mut server = client.transport().write().expect("server rw lock poisoned");
            server.todos[0].completed = true;
        }
        assert!(!client.todos()[0].completed);

        client.refresh().await.expect("refresh failed");
        assert!(client.todos()[0].completed);
    }
}
