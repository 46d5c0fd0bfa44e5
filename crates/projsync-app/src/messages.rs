// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Deserialize;

use crate::{ApiError, FormMode, ProjectId};

/// User-facing string table. Every notification, prompt, and label shown by
/// the UI comes from here so the whole copy can be replaced from config.
///
/// Templates use `{id}`, `{status}`, and `{message}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Messages {
    pub app_title: String,
    pub loading: String,
    pub empty_state: String,
    pub form_title_create: String,
    pub form_title_edit: String,
    pub confirm_delete: String,
    pub created: String,
    pub updated: String,
    pub deleted: String,
    pub http_error: String,
    pub load_failed: String,
    pub save_failed: String,
    pub delete_failed: String,
    pub unknown_project: String,
    pub form_not_open: String,
    pub no_selection: String,
    pub table_hints: String,
    pub form_hints: String,
    pub confirm_hints: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            app_title: "projects".to_owned(),
            loading: "loading...".to_owned(),
            empty_state: "no projects yet -- press n to create one".to_owned(),
            form_title_create: "new project".to_owned(),
            form_title_edit: "edit project {id}".to_owned(),
            confirm_delete: "delete project {id}?".to_owned(),
            created: "project created".to_owned(),
            updated: "project updated".to_owned(),
            deleted: "project deleted".to_owned(),
            http_error: "Error {status}: {message}".to_owned(),
            load_failed: "could not load projects".to_owned(),
            save_failed: "could not save project".to_owned(),
            delete_failed: "could not delete project".to_owned(),
            unknown_project: "project {id} is not in the current list -- refresh and retry"
                .to_owned(),
            form_not_open: "open a form with n or e before saving".to_owned(),
            no_selection: "no project selected".to_owned(),
            table_hints: "r refresh | n new | e edit | d delete | q quit".to_owned(),
            form_hints: "tab next field | ctrl+s save | esc cancel".to_owned(),
            confirm_hints: "y delete | n keep".to_owned(),
        }
    }
}

impl Messages {
    pub fn form_title(&self, mode: FormMode) -> String {
        match mode {
            FormMode::Edit(id) => {
                fill(&self.form_title_edit, &[("id", id.to_string().as_str())])
            }
            FormMode::Create | FormMode::Closed => self.form_title_create.clone(),
        }
    }

    pub fn confirm_delete(&self, id: ProjectId) -> String {
        fill(&self.confirm_delete, &[("id", id.to_string().as_str())])
    }

    pub fn unknown_project(&self, id: ProjectId) -> String {
        fill(&self.unknown_project, &[("id", id.to_string().as_str())])
    }

    /// HTTP failures are shown with their status and server message; anything
    /// else falls back to the action-specific copy.
    pub fn describe_failure(&self, error: &ApiError, fallback: &str) -> String {
        match error {
            ApiError::Http { status, message } => fill(
                &self.http_error,
                &[
                    ("status", status.to_string().as_str()),
                    ("message", message.as_str()),
                ],
            ),
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Encode(_) => {
                fallback.to_owned()
            }
        }
    }
}

fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_owned();
    for (key, value) in values {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}
