// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ApiError, ProjectField, ProjectId, ProjectPayload, ProjectRecord, ProjectService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Closed,
    Create,
    Edit(ProjectId),
}

impl FormMode {
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub const fn bound_id(self) -> Option<ProjectId> {
        match self {
            Self::Edit(id) => Some(id),
            Self::Closed | Self::Create => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub description: String,
    pub status: String,
    pub responsible: String,
}

impl FormFields {
    pub fn from_record(record: &ProjectRecord) -> Self {
        let value = |field| record.field(field).unwrap_or_default().to_owned();
        Self {
            name: value(ProjectField::Name),
            description: value(ProjectField::Description),
            status: value(ProjectField::Status),
            responsible: value(ProjectField::Responsible),
        }
    }

    pub fn get(&self, field: ProjectField) -> &str {
        match field {
            ProjectField::Name => &self.name,
            ProjectField::Description => &self.description,
            ProjectField::Status => &self.status,
            ProjectField::Responsible => &self.responsible,
        }
    }

    pub fn get_mut(&mut self, field: ProjectField) -> &mut String {
        match field {
            ProjectField::Name => &mut self.name,
            ProjectField::Description => &mut self.description,
            ProjectField::Status => &mut self.status,
            ProjectField::Responsible => &mut self.responsible,
        }
    }

    /// Trims every field and maps blank values to absent.
    pub fn to_payload(&self) -> ProjectPayload {
        ProjectPayload {
            name: normalize(&self.name),
            description: normalize(&self.description),
            status: normalize(&self.status),
            responsible: normalize(&self.responsible),
        }
    }
}

fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Created(Option<ProjectRecord>),
    Updated(ProjectId, Option<ProjectRecord>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("no form is open")]
    NotOpen,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Create/edit state machine for the project form.
///
/// Every transition into `Closed` or `Create` clears the fields; entering
/// `Edit` copies them from the target record. A failed submit leaves both the
/// mode and the unsaved fields untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormController {
    mode: FormMode,
    fields: FormFields,
    focus: usize,
}

impl Default for FormController {
    fn default() -> Self {
        Self {
            mode: FormMode::Closed,
            fields: FormFields::default(),
            focus: 0,
        }
    }
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode.is_open()
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn focused_field(&self) -> ProjectField {
        ProjectField::ALL[self.focus.min(ProjectField::ALL.len() - 1)]
    }

    pub fn open_create(&mut self) {
        self.mode = FormMode::Create;
        self.fields = FormFields::default();
        self.focus = 0;
    }

    pub fn open_edit(&mut self, record: &ProjectRecord) {
        self.mode = FormMode::Edit(record.id);
        self.fields = FormFields::from_record(record);
        self.focus = 0;
    }

    /// Returns whether a form was open before the call.
    pub fn cancel(&mut self) -> bool {
        let was_open = self.is_open();
        self.close();
        was_open
    }

    fn close(&mut self) {
        self.mode = FormMode::Closed;
        self.fields = FormFields::default();
        self.focus = 0;
    }

    pub fn focus_next(&mut self) -> ProjectField {
        self.shift_focus(1)
    }

    pub fn focus_prev(&mut self) -> ProjectField {
        self.shift_focus(-1)
    }

    fn shift_focus(&mut self, delta: isize) -> ProjectField {
        let len = ProjectField::ALL.len() as isize;
        self.focus = (self.focus as isize + delta).rem_euclid(len) as usize;
        self.focused_field()
    }

    pub fn on_last_field(&self) -> bool {
        self.focus + 1 >= ProjectField::ALL.len()
    }

    pub fn set_field(&mut self, field: ProjectField, value: impl Into<String>) {
        if self.is_open() {
            *self.fields.get_mut(field) = value.into();
        }
    }

    pub fn push_char(&mut self, ch: char) {
        if self.is_open() {
            let field = self.focused_field();
            self.fields.get_mut(field).push(ch);
        }
    }

    pub fn pop_char(&mut self) {
        if self.is_open() {
            let field = self.focused_field();
            self.fields.get_mut(field).pop();
        }
    }

    pub fn payload(&self) -> ProjectPayload {
        self.fields.to_payload()
    }

    /// Sends exactly one create or update, chosen by the bound id, and closes
    /// the form only when the service accepted it.
    pub fn submit<S>(&mut self, service: &mut S) -> Result<Submission, FormError>
    where
        S: ProjectService + ?Sized,
    {
        let payload = self.payload();
        let submission = match self.mode {
            FormMode::Closed => return Err(FormError::NotOpen),
            FormMode::Create => {
                tracing::debug!("submitting new project");
                Submission::Created(service.create(&payload)?)
            }
            FormMode::Edit(id) => {
                tracing::debug!(project_id = id.get(), "submitting project update");
                Submission::Updated(id, service.update(id, &payload)?)
            }
        };
        self.close();
        Ok(submission)
    }
}
