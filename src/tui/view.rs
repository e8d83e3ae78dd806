use std::fmt;

use crate::catalog::{Catalog, Record};

/// The product form, if any, and what it is editing
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Closed,
    Create,
    Edit { file: String, record: Record },
}

/// Everything the interactive screen renders
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Set while a git operation runs; only the spinner renders
    pub loading: bool,
    pub modal: Modal,
    /// Whether a checkout is available at all
    pub connected: bool,
    pub branch: String,
    pub main_branch: String,
    pub branches: Vec<String>,
    pub catalog: Catalog,
}

/// Menu entries offered below the cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SwitchWorkspace,
    NewWorkspace,
    AddProduct,
    EditProduct,
    DeleteProduct,
    MergeToMain,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::SwitchWorkspace => "Switch workspace",
            Action::NewWorkspace => "New workspace",
            Action::AddProduct => "+ Add product",
            Action::EditProduct => "Edit product",
            Action::DeleteProduct => "Delete product",
            Action::MergeToMain => "Merge → Deploy",
            Action::Quit => "Quit",
        };
        f.write_str(label)
    }
}

impl ViewState {
    pub fn new(main_branch: impl Into<String>) -> Self {
        let main_branch = main_branch.into();
        Self {
            loading: true,
            modal: Modal::Closed,
            connected: false,
            branch: main_branch.clone(),
            main_branch,
            branches: Vec::new(),
            catalog: Catalog::default(),
        }
    }

    pub fn on_main(&self) -> bool {
        self.branch == self.main_branch
    }

    /// Tab label: the deployment branch is shown as PROD
    pub fn tab_label<'a>(&self, branch: &'a str) -> &'a str {
        if branch == self.main_branch {
            "PROD"
        } else {
            branch
        }
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    pub fn end_loading(&mut self) {
        self.loading = false;
    }

    pub fn open_create(&mut self) {
        self.modal = Modal::Create;
    }

    /// Open the form on an existing card; unknown files leave the modal closed
    pub fn open_edit(&mut self, file: &str) -> bool {
        match self.catalog.find(file) {
            Some(entry) => {
                self.modal = Modal::Edit {
                    file: entry.file.clone(),
                    record: entry.record.clone(),
                };
                true
            }
            None => false,
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
    }

    /// Replace the snapshot after a branch switch, save or merge
    pub fn refresh(&mut self, branch: String, branches: Vec<String>, catalog: Catalog) {
        self.connected = true;
        self.branch = branch;
        self.branches = branches;
        self.catalog = catalog;
    }

    /// The clone failed: keep going with nothing loaded
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.branches.clear();
        self.catalog = Catalog::default();
        self.modal = Modal::Closed;
    }

    pub fn actions(&self) -> Vec<Action> {
        if !self.connected {
            return vec![Action::Quit];
        }

        let mut actions = vec![Action::SwitchWorkspace, Action::NewWorkspace, Action::AddProduct];
        if !self.catalog.is_empty() {
            actions.push(Action::EditProduct);
            actions.push(Action::DeleteProduct);
        }
        if !self.on_main() {
            actions.push(Action::MergeToMain);
        }
        actions.push(Action::Quit);
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, Modal, ViewState};
    use crate::catalog::{Catalog, CatalogEntry, Record};

    fn catalog_with(file: &str, record: Record) -> Catalog {
        Catalog {
            entries: vec![CatalogEntry {
                file: file.to_string(),
                record,
            }],
            skipped: Vec::new(),
        }
    }

    #[test]
    fn starts_loading_with_closed_modal() {
        let view = ViewState::new("main");

        assert!(view.loading);
        assert!(!view.connected);
        assert_eq!(view.modal, Modal::Closed);
        assert_eq!(view.actions(), vec![Action::Quit]);
    }

    #[test]
    fn modal_transitions() {
        let mut view = ViewState::new("main");
        let record = Record::new("p1", "One");
        view.refresh(
            "main".to_string(),
            vec!["main".to_string()],
            catalog_with("one.yaml", record.clone()),
        );

        view.open_create();
        assert_eq!(view.modal, Modal::Create);

        assert!(view.open_edit("one.yaml"));
        assert_eq!(
            view.modal,
            Modal::Edit {
                file: "one.yaml".to_string(),
                record
            }
        );

        view.close_modal();
        assert!(!view.open_edit("missing.yaml"));
        assert_eq!(view.modal, Modal::Closed);
    }

    #[test]
    fn merge_offered_only_off_main() {
        let mut view = ViewState::new("main");
        view.refresh("main".to_string(), vec!["main".to_string()], Catalog::default());
        assert!(!view.actions().contains(&Action::MergeToMain));
        assert!(!view.actions().contains(&Action::EditProduct));

        view.refresh(
            "draft".to_string(),
            vec!["draft".to_string(), "main".to_string()],
            catalog_with("p1.yaml", Record::new("p1", "One")),
        );
        let actions = view.actions();
        assert!(actions.contains(&Action::MergeToMain));
        assert!(actions.contains(&Action::EditProduct));
        assert_eq!(actions.last(), Some(&Action::Quit));
    }

    #[test]
    fn disconnect_clears_state() {
        let mut view = ViewState::new("main");
        view.refresh(
            "main".to_string(),
            vec!["main".to_string()],
            catalog_with("p1.yaml", Record::new("p1", "One")),
        );
        view.open_create();

        view.disconnect();

        assert!(view.catalog.is_empty());
        assert!(view.branches.is_empty());
        assert_eq!(view.modal, Modal::Closed);
    }

    #[test]
    fn main_tab_is_prod() {
        let view = ViewState::new("main");

        assert_eq!(view.tab_label("main"), "PROD");
        assert_eq!(view.tab_label("draft"), "draft");
    }
}
