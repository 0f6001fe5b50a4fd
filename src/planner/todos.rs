//! Todo board: todos with their decisions.

use super::{Backend, position, required, settle};
use crate::{
    core::{decision, todo},
    errors::Result,
    models::{Decision, Todo},
    storage::TODOS_KEY,
};
use tracing::instrument;

/// Todos, newest first, mirrored to one backend.
#[derive(Debug)]
pub struct TodoBoard {
    items: Vec<Todo>,
    backend: Backend,
}

impl TodoBoard {
    /// Reads every todo from the backend.
    pub async fn load(backend: Backend) -> Result<Self> {
        let items = match &backend {
            Backend::Local(storage) => storage.load(TODOS_KEY, Vec::new(), None),
            Backend::Remote(remote) => todo::get_all(&remote.db, &remote.user.id).await?,
        };
        Ok(Self { items, backend })
    }

    /// Todos, newest first, each with its decisions.
    #[must_use]
    pub fn todos(&self) -> &[Todo] {
        &self.items
    }

    /// Todo by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Todo> {
        self.items.iter().find(|t| t.id == id)
    }

    /// The decision with `decision_id` and the todo it belongs to.
    #[must_use]
    pub fn find_decision(&self, decision_id: &str) -> Option<(&Todo, &Decision)> {
        self.items.iter().find_map(|todo| {
            todo.decisions
                .iter()
                .find(|d| d.id == decision_id)
                .map(|decision| (todo, decision))
        })
    }

    /// Number of todos marked done.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|t| t.completed).count()
    }

    /// Adds an incomplete todo at the top of the board.
    #[instrument(skip(self))]
    pub async fn add(&mut self, title: &str) -> Result<Todo> {
        let title = required(title, "Todo title")?;
        let snapshot = self.items.clone();
        let provisional = Todo::new(&title);
        self.items.insert(0, provisional.clone());

        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(TODOS_KEY, &self.items).map(|()| provisional),
            Backend::Remote(remote) => todo::create(&remote.db, &remote.user.id, &title).await,
        };
        let created = settle(&mut self.items, snapshot, outcome, "add todo")?;
        self.items[0] = created.clone();
        Ok(created)
    }

    /// Flips a todo's completed flag, returning the new value.
    #[instrument(skip(self))]
    pub async fn toggle(&mut self, id: &str) -> Result<bool> {
        let index = position(&self.items, id, "todo", |t| t.id.as_str())?;
        let snapshot = self.items.clone();
        let completed = !self.items[index].completed;
        self.items[index].completed = completed;

        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(TODOS_KEY, &self.items),
            Backend::Remote(remote) => {
                todo::set_completed(&remote.db, &remote.user.id, id, completed).await
            }
        };
        settle(&mut self.items, snapshot, outcome, "toggle todo")?;
        Ok(completed)
    }

    /// Changes a todo's title. Blank titles are rejected.
    #[instrument(skip(self))]
    pub async fn rename(&mut self, id: &str, title: &str) -> Result<()> {
        let title = required(title, "Todo title")?;
        let index = position(&self.items, id, "todo", |t| t.id.as_str())?;
        let snapshot = self.items.clone();
        self.items[index].title.clone_from(&title);

        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(TODOS_KEY, &self.items),
            Backend::Remote(remote) => todo::rename(&remote.db, &remote.user.id, id, &title).await,
        };
        settle(&mut self.items, snapshot, outcome, "rename todo")
    }

    /// Deletes a todo together with its decisions.
    #[instrument(skip(self))]
    pub async fn remove(&mut self, id: &str) -> Result<Todo> {
        let index = position(&self.items, id, "todo", |t| t.id.as_str())?;
        let snapshot = self.items.clone();
        let removed = self.items.remove(index);

        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(TODOS_KEY, &self.items),
            Backend::Remote(remote) => todo::delete(&remote.db, &remote.user.id, id).await,
        };
        settle(&mut self.items, snapshot, outcome, "delete todo")?;
        Ok(removed)
    }

    /// Appends a decision to a todo.
    #[instrument(skip(self))]
    pub async fn add_decision(&mut self, todo_id: &str, text: &str) -> Result<Decision> {
        let text = required(text, "Decision")?;
        let index = position(&self.items, todo_id, "todo", |t| t.id.as_str())?;
        let snapshot = self.items.clone();
        let provisional = Decision::new(&text);
        self.items[index].decisions.push(provisional.clone());

        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(TODOS_KEY, &self.items).map(|()| provisional),
            Backend::Remote(remote) => {
                decision::create(&remote.db, &remote.user.id, todo_id, &text).await
            }
        };
        let created = settle(&mut self.items, snapshot, outcome, "add decision")?;
        if let Some(last) = self.items[index].decisions.last_mut() {
            *last = created.clone();
        }
        Ok(created)
    }

    /// Rewrites the text of one decision.
    #[instrument(skip(self))]
    pub async fn edit_decision(&mut self, todo_id: &str, decision_id: &str, text: &str) -> Result<()> {
        let text = required(text, "Decision")?;
        let index = position(&self.items, todo_id, "todo", |t| t.id.as_str())?;
        let slot = position(&self.items[index].decisions, decision_id, "decision", |d| d.id.as_str())?;
        let snapshot = self.items.clone();
        self.items[index].decisions[slot].text.clone_from(&text);

        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(TODOS_KEY, &self.items),
            Backend::Remote(remote) => {
                decision::update(&remote.db, &remote.user.id, todo_id, decision_id, &text).await
            }
        };
        settle(&mut self.items, snapshot, outcome, "update decision")
    }

    /// Deletes one decision from a todo.
    #[instrument(skip(self))]
    pub async fn remove_decision(&mut self, todo_id: &str, decision_id: &str) -> Result<()> {
        let index = position(&self.items, todo_id, "todo", |t| t.id.as_str())?;
        let slot = position(&self.items[index].decisions, decision_id, "decision", |d| d.id.as_str())?;
        let snapshot = self.items.clone();
        self.items[index].decisions.remove(slot);

        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(TODOS_KEY, &self.items),
            Backend::Remote(remote) => {
                decision::delete(&remote.db, &remote.user.id, todo_id, decision_id).await
            }
        };
        settle(&mut self.items, snapshot, outcome, "delete decision")
    }

    /// Replaces the whole board, used by backup restore.
    pub async fn replace_all(&mut self, todos: Vec<Todo>) -> Result<()> {
        let snapshot = std::mem::replace(&mut self.items, todos);
        let outcome = match &self.backend {
            Backend::Local(storage) => storage.save(TODOS_KEY, &self.items),
            Backend::Remote(remote) => {
                todo::replace_all(&remote.db, &remote.user.id, &self.items).await
            }
        };
        settle(&mut self.items, snapshot, outcome, "restore todos")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::Error, test_utils::*};

    #[tokio::test]
    async fn test_todo_flow_remote() -> Result<()> {
        let mut board = TodoBoard::load(remote_backend().await?).await?;

        let first = board.add("Book venue").await?;
        let second = board.add("  Order pizza  ").await?;
        assert_eq!(board.todos()[0].id, second.id);
        assert_eq!(second.title, "Order pizza");

        assert!(board.toggle(&first.id).await?);
        assert_eq!(board.completed_count(), 1);

        board.rename(&first.id, "Book main hall").await?;
        let decision = board.add_decision(&first.id, "Hall B, 200 seats").await?;
        let deposit = board.add_decision(&first.id, "Deposit paid").await?;
        assert_eq!(
            board.find_decision(&deposit.id).map(|(todo, _)| todo.id.as_str()),
            Some(first.id.as_str())
        );
        board.edit_decision(&first.id, &decision.id, "Hall B, 250 seats").await?;

        let todo = board.find(&first.id).ok_or_else(|| Error::not_found("todo", &first.id))?;
        assert_eq!(todo.title, "Book main hall");
        assert_eq!(todo.decisions.len(), 2);
        assert_eq!(todo.decisions[0].text, "Hall B, 250 seats");

        board.remove_decision(&first.id, &decision.id).await?;
        board.remove(&second.id).await?;
        assert_eq!(board.todos().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_local_changes_survive_reload() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut board = TodoBoard::load(local_backend(dir.path())).await?;
        let todo = board.add("Print badges").await?;
        board.add_decision(&todo.id, "Use lanyards").await?;
        board.toggle(&todo.id).await?;

        let reloaded = TodoBoard::load(local_backend(dir.path())).await?;
        assert_eq!(reloaded.todos().len(), 1);
        assert!(reloaded.todos()[0].completed);
        assert_eq!(reloaded.todos()[0].decisions[0].text, "Use lanyards");

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_insert_rolls_back() -> Result<()> {
        let mut board = TodoBoard {
            items: Vec::new(),
            backend: failing_remote_backend(),
        };

        assert!(board.add("Book venue").await.is_err());
        assert!(board.todos().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_update_and_delete_roll_back() -> Result<()> {
        let existing = Todo::new("Book venue");
        let mut board = TodoBoard {
            items: vec![existing.clone()],
            backend: failing_remote_backend(),
        };

        assert!(board.toggle(&existing.id).await.is_err());
        assert!(board.remove(&existing.id).await.is_err());
        assert_eq!(board.todos().to_vec(), vec![existing]);

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_local_save_rolls_back() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut board = TodoBoard::load(failing_local_backend(dir.path())?).await?;

        assert!(matches!(board.add("Book venue").await, Err(Error::Io(_))));
        assert!(board.todos().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected() -> Result<()> {
        let mut board = TodoBoard::load(remote_backend().await?).await?;
        assert!(matches!(board.add("   ").await, Err(Error::Validation { .. })));

        let todo = board.add("Book venue").await?;
        assert!(board.add_decision(&todo.id, "").await.is_err());
        assert!(board.rename(&todo.id, "\t").await.is_err());
        assert!(matches!(
            board.toggle("missing").await,
            Err(Error::NotFound { entity: "todo", .. })
        ));

        Ok(())
    }
}
