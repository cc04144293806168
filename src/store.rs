use crate::error::ShellError;
use crate::models::{FormDraft, FormState, StatusFilter, Task};

/// What the single "new task / confirm" control does in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    Open,
    SubmitCreate,
    SubmitEdit,
}

/// All client-side state. Transitions here are pure; the shell performs the
/// network calls and feeds results back in.
#[derive(Debug, Default)]
pub struct Store {
    tasks: Vec<Task>,
    filter: StatusFilter,
    form: FormState,
    draft: FormDraft,
    error: Option<String>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected(&self) -> Option<&Task> {
        self.form.selected()
    }

    pub fn is_form_open(&self) -> bool {
        self.form.is_open()
    }

    /// Swap in a freshly fetched list. The working list is never patched in
    /// place.
    pub fn replace_tasks(&mut self, filter: StatusFilter, tasks: Vec<Task>) {
        self.filter = filter;
        self.tasks = tasks;
    }

    pub fn begin_create(&mut self) {
        self.form = FormState::Create;
        self.draft = FormDraft::default();
        self.error = None;
    }

    pub fn begin_edit(&mut self, task: &Task) {
        self.draft = FormDraft::from_task(task);
        self.form = FormState::Edit(task.clone());
    }

    pub fn cancel(&mut self) {
        self.form = FormState::Closed;
        self.draft = FormDraft::default();
    }

    pub fn primary_action(&self) -> PrimaryAction {
        match self.form {
            FormState::Closed => PrimaryAction::Open,
            FormState::Create => PrimaryAction::SubmitCreate,
            FormState::Edit(_) => PrimaryAction::SubmitEdit,
        }
    }

    pub fn validate(&mut self) -> Result<(), ShellError> {
        if self.draft.is_complete() {
            Ok(())
        } else {
            let err = ShellError::Validation;
            self.set_error(&err);
            Err(err)
        }
    }

    pub fn finish_submit(&mut self) {
        self.form = FormState::Closed;
        self.draft = FormDraft::default();
        self.error = None;
    }

    pub fn set_error(&mut self, err: &ShellError) {
        self.error = Some(err.to_string());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn push_char(&mut self, c: char) {
        let focus = self.draft.focus;
        self.draft.field_mut(focus).push(c);
    }

    pub fn pop_char(&mut self) {
        let focus = self.draft.focus;
        self.draft.field_mut(focus).pop();
    }

    pub fn next_field(&mut self) {
        self.draft.focus = self.draft.focus.next();
    }

    pub fn draft_mut(&mut self) -> &mut FormDraft {
        &mut self.draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DueDate, FormField, TaskId};
    use pretty_assertions::assert_eq;

    fn task(id: i64, name: &str) -> Task {
        Task {
            id: TaskId::Number(id),
            name: name.to_string(),
            description: format!("{name} description"),
            due_date: DueDate::parse("2024-03-01T00:00:00Z").unwrap(),
            status: false,
        }
    }

    #[test]
    fn starts_closed_and_empty() {
        let store = Store::new();
        assert_eq!(store.form(), &FormState::Closed);
        assert_eq!(store.primary_action(), PrimaryAction::Open);
        assert!(store.tasks().is_empty());
        assert_eq!(store.filter(), StatusFilter::All);
        assert_eq!(store.error(), None);
    }

    #[test]
    fn primary_action_follows_form_state() {
        let mut store = Store::new();
        store.begin_create();
        assert_eq!(store.primary_action(), PrimaryAction::SubmitCreate);
        store.begin_edit(&task(1, "a"));
        assert_eq!(store.primary_action(), PrimaryAction::SubmitEdit);
        store.cancel();
        assert_eq!(store.primary_action(), PrimaryAction::Open);
    }

    #[test]
    fn begin_create_resets_draft_and_error() {
        let mut store = Store::new();
        store.draft_mut().name = "left over".into();
        let _ = store.validate();
        assert!(store.error().is_some());

        store.begin_create();
        assert_eq!(store.draft(), &FormDraft::default());
        assert_eq!(store.error(), None);
    }

    #[test]
    fn begin_edit_fills_draft_with_date_only() {
        let mut store = Store::new();
        let target = task(3, "Walk");
        store.begin_edit(&target);

        assert_eq!(store.selected(), Some(&target));
        assert_eq!(store.draft().name, "Walk");
        assert_eq!(store.draft().description, "Walk description");
        assert_eq!(store.draft().due_date, "2024-03-01");
    }

    #[test]
    fn new_edit_supersedes_selection() {
        let mut store = Store::new();
        store.begin_edit(&task(1, "first"));
        store.begin_edit(&task(2, "second"));
        assert_eq!(store.selected().map(|t| t.id.clone()), Some(TaskId::Number(2)));
        assert_eq!(store.draft().name, "second");
    }

    #[test]
    fn validation_failure_sets_message_and_keeps_form() {
        let mut store = Store::new();
        store.begin_create();
        store.draft_mut().name = "only a name".into();

        assert!(matches!(store.validate(), Err(ShellError::Validation)));
        assert_eq!(store.error(), Some("Please fill in all fields."));
        assert_eq!(store.form(), &FormState::Create);
        assert_eq!(store.draft().name, "only a name");
    }

    #[test]
    fn finish_submit_clears_everything() {
        let mut store = Store::new();
        store.begin_edit(&task(1, "a"));
        store.finish_submit();
        assert_eq!(store.form(), &FormState::Closed);
        assert_eq!(store.selected(), None);
        assert_eq!(store.draft(), &FormDraft::default());
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut store = Store::new();
        store.begin_create();
        for c in "ab".chars() {
            store.push_char(c);
        }
        store.next_field();
        store.push_char('x');
        store.pop_char();
        store.push_char('y');
        store.next_field();
        assert_eq!(store.draft().focus, FormField::DueDate);
        assert_eq!(store.draft().name, "ab");
        assert_eq!(store.draft().description, "y");
    }

    #[test]
    fn replace_tasks_swaps_the_whole_list() {
        let mut store = Store::new();
        store.replace_tasks(StatusFilter::All, vec![task(1, "a"), task(2, "b")]);
        store.replace_tasks(StatusFilter::Pending, vec![task(3, "c")]);
        assert_eq!(store.filter(), StatusFilter::Pending);
        assert_eq!(store.tasks(), &[task(3, "c")]);
    }
}
