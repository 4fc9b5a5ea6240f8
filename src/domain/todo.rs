use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::domain::todo::driving_ports::TodoError;
use crate::external_connections::ExternalConnectivity;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A single todo item owned by an authenticated user. Records are only ever
/// visible to and mutable by their owner.
#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct Todo {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg_attr(test, derive(Clone))]
pub struct NewTodo {
    pub title: String,
}

/// Partial update for a todo. Absent fields are left untouched.
#[derive(Default)]
#[cfg_attr(test, derive(Clone))]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

pub mod driven_ports {
    use super::*;

    pub trait TodoReader {
        /// Fetch all of a user's todos, newest first
        async fn todos_for_user(
            &self,
            owner_user_id: Uuid,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<Todo>, anyhow::Error>;
    }

    pub trait TodoWriter {
        async fn create_todo(
            &self,
            owner_user_id: Uuid,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Todo, anyhow::Error>;

        /// Applies [patch] to the matching record, returning None when no record
        /// matches the (id, owner) pair
        async fn update_todo(
            &self,
            owner_user_id: Uuid,
            todo_id: Uuid,
            patch: &TodoPatch,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<Todo>, anyhow::Error>;

        /// Removes the matching record, returning the number of records removed
        async fn delete_todo(
            &self,
            owner_user_id: Uuid,
            todo_id: Uuid,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<u64, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum TodoError {
        #[error("Todo titles must contain at least one non-whitespace character.")]
        TitleEmpty,
        #[error("The specified todo does not exist.")]
        NotFound,
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }


    pub trait TodoPort {
        async fn todos_for_user(
            &self,
            owner_user_id: Uuid,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<Vec<Todo>, TodoError>;
        async fn create_todo(
            &self,
            owner_user_id: Uuid,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<Todo, TodoError>;
        async fn update_todo(
            &self,
            owner_user_id: Uuid,
            todo_id: Uuid,
            patch: &TodoPatch,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<Todo, TodoError>;
        async fn delete_todo(
            &self,
            owner_user_id: Uuid,
            todo_id: Uuid,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<(), TodoError>;
    }
}

pub struct TodoService {}

impl driving_ports::TodoPort for TodoService {
    async fn todos_for_user(
        &self,
        owner_user_id: Uuid,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<Vec<Todo>, TodoError> {
        let todos = todo_read.todos_for_user(owner_user_id, &mut *ext_cxn).await?;

        Ok(todos)
    }

    async fn create_todo(
        &self,
        owner_user_id: Uuid,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<Todo, TodoError> {
        if new_todo.title.trim().is_empty() {
            return Err(TodoError::TitleEmpty);
        }

        let created = todo_write
            .create_todo(owner_user_id, new_todo, &mut *ext_cxn)
            .await?;
        Ok(created)
    }

    async fn update_todo(
        &self,
        owner_user_id: Uuid,
        todo_id: Uuid,
        patch: &TodoPatch,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<Todo, TodoError> {
        if patch
            .title
            .as_ref()
            .is_some_and(|new_title| new_title.trim().is_empty())
        {
            return Err(TodoError::TitleEmpty);
        }

        let update_result = todo_write
            .update_todo(owner_user_id, todo_id, patch, &mut *ext_cxn)
            .await?;
        match update_result {
            Some(updated) => Ok(updated),
            None => Err(TodoError::NotFound),
        }
    }

    async fn delete_todo(
        &self,
        owner_user_id: Uuid,
        todo_id: Uuid,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<(), TodoError> {
        let records_removed = todo_write
            .delete_todo(owner_user_id, todo_id, &mut *ext_cxn)
            .await?;

        // Deleting something that was never there is reported explicitly rather
        // than silently succeeding
        if records_removed == 0 {
            return Err(TodoError::NotFound);
        }

        Ok(())
    }
}
