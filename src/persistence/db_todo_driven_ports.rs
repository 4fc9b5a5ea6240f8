use anyhow::{Context, Error};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain;
use crate::domain::todo::{NewTodo, Todo, TodoPatch};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};

#[derive(FromRow)]
struct TodoRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    completed: bool,
    created_at: DateTime<Utc>,
}

impl From<TodoRow> for Todo {
    fn from(value: TodoRow) -> Self {
        Todo {
            id: value.id,
            owner_user_id: value.user_id,
            title: value.title,
            completed: value.completed,
            created_at: value.created_at,
        }
    }
}

pub struct DbTodoReader;

impl domain::todo::driven_ports::TodoReader for DbTodoReader {
    async fn todos_for_user(
        &self,
        owner_user_id: Uuid,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<Todo>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todos: Vec<Todo> = sqlx::query_as::<_, TodoRow>(
            "SELECT id, user_id, title, completed, created_at \
             FROM todos \
             WHERE user_id = $1 \
             ORDER BY created_at DESC",
        )
        .bind(owner_user_id)
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to fetch a user's todos")?
        .into_iter()
        .map(Todo::from)
        .collect();

        Ok(todos)
    }
}

pub struct DbTodoWriter;

impl domain::todo::driven_ports::TodoWriter for DbTodoWriter {
    async fn create_todo(
        &self,
        owner_user_id: Uuid,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Todo, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let created = sqlx::query_as::<_, TodoRow>(
            "INSERT INTO todos (user_id, title) \
             VALUES ($1, $2) \
             RETURNING id, user_id, title, completed, created_at",
        )
        .bind(owner_user_id)
        .bind(&new_todo.title)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new todo into the database")?;

        Ok(created.into())
    }

    async fn update_todo(
        &self,
        owner_user_id: Uuid,
        todo_id: Uuid,
        patch: &TodoPatch,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<Todo>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        // COALESCE applies only the provided patch fields in one atomic statement
        let updated = sqlx::query_as::<_, TodoRow>(
            "UPDATE todos \
             SET title = COALESCE($3, title), completed = COALESCE($4, completed) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING id, user_id, title, completed, created_at",
        )
        .bind(todo_id)
        .bind(owner_user_id)
        .bind(&patch.title)
        .bind(patch.completed)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to update a todo in the database")?;

        Ok(updated.map(Todo::from))
    }

    async fn delete_todo(
        &self,
        owner_user_id: Uuid,
        todo_id: Uuid,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<u64, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let delete_result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(todo_id)
            .bind(owner_user_id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a todo from the database")?;

        Ok(delete_result.rows_affected())
    }
}
