use crate::api::TodoApi;
use crate::error::ShellError;
use crate::models::{FormState, NewTask, StatusFilter, StatusLabel, SubmitMode, Task, TaskUpdate};
use crate::store::{PrimaryAction, Store};

/// Mediates between user actions and the remote collection. Every mutation is
/// followed by a full refetch; the working list is only ever what the server
/// last returned.
pub struct Shell<A> {
    api: A,
    store: Store,
}

impl<A: TodoApi> Shell<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            store: Store::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Fetch the collection for `filter` and replace the working list.
    pub async fn list(&mut self, filter: StatusFilter) -> Result<(), ShellError> {
        self.store.clear_error();
        self.fetch(filter).await
    }

    pub fn begin_create(&mut self) {
        self.store.begin_create();
    }

    pub fn begin_edit(&mut self, task: &Task) {
        log::debug!("editing task {}", task.id);
        self.store.begin_edit(task);
    }

    pub fn cancel(&mut self) {
        self.store.cancel();
    }

    /// The "new task / confirm" control: opens the form when it is closed,
    /// submits it otherwise.
    pub async fn press_primary(&mut self) -> Result<PrimaryAction, ShellError> {
        let action = self.store.primary_action();
        match action {
            PrimaryAction::Open => self.begin_create(),
            PrimaryAction::SubmitCreate | PrimaryAction::SubmitEdit => self.submit().await?,
        }
        Ok(action)
    }

    /// Validate the draft and send it. A closed form submits as a create.
    /// Once the request succeeds the submit counts as done, even if the
    /// refetch after it fails.
    pub async fn submit(&mut self) -> Result<(), ShellError> {
        self.store.clear_error();
        self.store.validate()?;

        let draft = self.store.draft();
        let (mode, sent) = match self.store.form() {
            FormState::Edit(task) => {
                let update = TaskUpdate::from_draft(task.id.clone(), draft);
                log::debug!("updating task {}", update.id);
                (SubmitMode::Edit, self.api.update(&update).await)
            }
            FormState::Create | FormState::Closed => {
                let new_task = NewTask::from_draft(draft);
                log::debug!("creating task {:?}", new_task.name);
                (SubmitMode::Create, self.api.create(&new_task).await)
            }
        };

        if let Err(source) = sent {
            return Err(self.fail(ShellError::Submit { mode, source }));
        }

        log::info!("{mode:?} submit succeeded");
        self.store.finish_submit();
        // The task was saved; a failed refetch only shows on the error line.
        let _ = self.refresh().await;
        Ok(())
    }

    /// Send the status that `label` stands for, then refetch no matter how the
    /// update went.
    pub async fn toggle_status(&mut self, task: &Task, label: StatusLabel) -> Result<(), ShellError> {
        self.store.clear_error();
        let update = TaskUpdate::status(task.id.clone(), label.is_completed());
        log::debug!("setting task {} to {label}", task.id);

        let sent = self.api.update(&update).await;
        let sent = sent.map_err(|source| self.fail(ShellError::StatusUpdate(source)));
        let refreshed = self.refresh().await;
        sent.and(refreshed)
    }

    /// Delete the task, then refetch no matter how the delete went.
    pub async fn delete(&mut self, task: &Task) -> Result<(), ShellError> {
        self.store.clear_error();
        log::debug!("deleting task {}", task.id);

        let sent = self.api.delete(&task.id).await;
        let sent = sent.map_err(|source| self.fail(ShellError::Delete(source)));
        let refreshed = self.refresh().await;
        sent.and(refreshed)
    }

    /// Refetch after a mutation. Always the unfiltered collection.
    async fn refresh(&mut self) -> Result<(), ShellError> {
        self.fetch(StatusFilter::All).await
    }

    async fn fetch(&mut self, filter: StatusFilter) -> Result<(), ShellError> {
        match self.api.list(filter.status_query()).await {
            Ok(tasks) => {
                log::info!("loaded {} task(s) for filter {}", tasks.len(), filter.label());
                self.store.replace_tasks(filter, tasks);
                Ok(())
            }
            Err(source) => Err(self.fail(ShellError::Refresh(source))),
        }
    }

    fn fail(&mut self, err: ShellError) -> ShellError {
        match std::error::Error::source(&err) {
            Some(source) => log::warn!("{err} ({source})"),
            None => log::warn!("{err}"),
        }
        self.store.set_error(&err);
        err
    }
}
