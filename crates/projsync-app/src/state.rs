// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{FormMode, ProjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub loading: bool,
    pub notification: Option<Notification>,
    pub pending_delete: Option<ProjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    ShowLoading,
    HideLoading,
    Notify(Notification),
    ClearNotification,
    RequestDelete(ProjectId),
    ResolveDelete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    LoadingShown,
    LoadingHidden,
    Notified(Notification),
    NotificationCleared,
    ConfirmationRequested(ProjectId),
    ConfirmationResolved(ProjectId),
    ListRendered { rows: usize },
    FormChanged(FormMode),
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::ShowLoading => {
                self.loading = true;
                vec![AppEvent::LoadingShown]
            }
            AppCommand::HideLoading => {
                self.loading = false;
                vec![AppEvent::LoadingHidden]
            }
            AppCommand::Notify(notification) => {
                self.notification = Some(notification.clone());
                vec![AppEvent::Notified(notification)]
            }
            AppCommand::ClearNotification => {
                if self.notification.take().is_some() {
                    vec![AppEvent::NotificationCleared]
                } else {
                    Vec::new()
                }
            }
            AppCommand::RequestDelete(id) => {
                self.pending_delete = Some(id);
                vec![AppEvent::ConfirmationRequested(id)]
            }
            AppCommand::ResolveDelete => match self.pending_delete.take() {
                Some(id) => vec![AppEvent::ConfirmationResolved(id)],
                None => Vec::new(),
            },
        }
    }
}
