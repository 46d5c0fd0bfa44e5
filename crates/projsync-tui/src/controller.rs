// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use projsync_app::{
    ApiError, AppCommand, AppEvent, AppState, FormController, FormError, Messages, Notification,
    ProjectId, ProjectRecord, ProjectService, Submission,
};

use crate::ListView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Refresh,
    New,
    Edit(ProjectId),
    Delete(ProjectId),
    Confirm,
    Decline,
    Submit,
    Cancel,
}

impl UserAction {
    /// Whether handling the action may block on the service.
    pub const fn hits_service(self) -> bool {
        matches!(self, Self::Refresh | Self::Confirm | Self::Submit)
    }
}

/// Owns every piece of UI state and wires user actions to the form, the
/// service, and the list. Each call to [`Controller::handle`] runs to
/// completion and returns the events it produced, in order.
pub struct Controller<S> {
    service: S,
    state: AppState,
    form: FormController,
    list: ListView,
    records: Vec<ProjectRecord>,
    messages: Messages,
}

impl<S: ProjectService> Controller<S> {
    pub fn new(service: S, messages: Messages) -> Self {
        Self {
            service,
            state: AppState::default(),
            form: FormController::new(),
            list: ListView::new(),
            records: Vec::new(),
            messages,
        }
    }

    /// Initial load, run once after construction.
    pub fn start(&mut self) -> Vec<AppEvent> {
        self.handle(UserAction::Refresh)
    }

    pub fn handle(&mut self, action: UserAction) -> Vec<AppEvent> {
        match action {
            UserAction::Refresh => self.refresh(),
            UserAction::New => {
                self.form.open_create();
                vec![AppEvent::FormChanged(self.form.mode())]
            }
            UserAction::Edit(id) => self.open_edit(id),
            UserAction::Delete(id) => self.state.dispatch(AppCommand::RequestDelete(id)),
            UserAction::Confirm => self.confirm_delete(),
            UserAction::Decline => self.state.dispatch(AppCommand::ResolveDelete),
            UserAction::Submit => self.submit(),
            UserAction::Cancel => {
                if self.form.cancel() {
                    vec![AppEvent::FormChanged(self.form.mode())]
                } else {
                    Vec::new()
                }
            }
        }
    }

    pub fn notify(&mut self, notification: Notification) -> Vec<AppEvent> {
        self.state.dispatch(AppCommand::Notify(notification))
    }

    pub fn clear_notification(&mut self) -> Vec<AppEvent> {
        self.state.dispatch(AppCommand::ClearNotification)
    }

    fn refresh(&mut self) -> Vec<AppEvent> {
        let mut events = self.state.dispatch(AppCommand::ShowLoading);
        match self.service.list() {
            Ok(records) => {
                tracing::debug!(count = records.len(), "projects loaded");
                self.records = records;
                let rows = self.list.render(&self.records);
                events.push(AppEvent::ListRendered { rows });
            }
            Err(error) => {
                let fallback = self.messages.load_failed.clone();
                events.extend(self.fail("list projects", &error, &fallback));
            }
        }
        events.extend(self.state.dispatch(AppCommand::HideLoading));
        events
    }

    fn open_edit(&mut self, id: ProjectId) -> Vec<AppEvent> {
        match self.records.iter().find(|record| record.id == id) {
            Some(record) => {
                self.form.open_edit(record);
                vec![AppEvent::FormChanged(self.form.mode())]
            }
            None => {
                tracing::error!(project_id = id.get(), "edit target missing from list");
                let message = self.messages.unknown_project(id);
                self.notify(Notification::error(message))
            }
        }
    }

    fn confirm_delete(&mut self) -> Vec<AppEvent> {
        let Some(id) = self.state.pending_delete else {
            return Vec::new();
        };
        let mut events = self.state.dispatch(AppCommand::ResolveDelete);
        match self.service.remove(id) {
            Ok(()) => {
                tracing::info!(project_id = id.get(), "project deleted");
                let message = self.messages.deleted.clone();
                events.extend(self.notify(Notification::success(message)));
                events.extend(self.refresh());
            }
            Err(error) => {
                let fallback = self.messages.delete_failed.clone();
                events.extend(self.fail("delete project", &error, &fallback));
            }
        }
        events
    }

    fn submit(&mut self) -> Vec<AppEvent> {
        match self.form.submit(&mut self.service) {
            Ok(submission) => {
                let message = match &submission {
                    Submission::Created(record) => {
                        tracing::info!(
                            project_id = record.as_ref().map(|record| record.id.get()),
                            "project created"
                        );
                        self.messages.created.clone()
                    }
                    Submission::Updated(id, _) => {
                        tracing::info!(project_id = id.get(), "project updated");
                        self.messages.updated.clone()
                    }
                };
                let mut events = self.notify(Notification::success(message));
                events.push(AppEvent::FormChanged(self.form.mode()));
                events.extend(self.refresh());
                events
            }
            Err(FormError::NotOpen) => {
                tracing::error!("submit without an open form");
                let message = self.messages.form_not_open.clone();
                self.notify(Notification::error(message))
            }
            Err(FormError::Api(error)) => {
                let fallback = self.messages.save_failed.clone();
                self.fail("save project", &error, &fallback)
            }
        }
    }

    fn fail(&mut self, operation: &str, error: &ApiError, fallback: &str) -> Vec<AppEvent> {
        tracing::error!(operation, %error, "request failed");
        let message = self.messages.describe_failure(error, fallback);
        self.notify(Notification::error(message))
    }
}

impl<S> Controller<S> {
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController {
        &mut self.form
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView {
        &mut self.list
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }
}

#[cfg(test)]
mod tests {
    use super::{Controller, UserAction};
    use projsync_app::{
        ApiError, AppEvent, FormFields, FormMode, Messages, Notification, NotificationKind,
        ProjectField, ProjectId, ProjectPayload, ProjectRecord,
    };
    use projsync_testkit::{RecordingService, ServiceCall, sample_project};

    fn controller_with(records: Vec<ProjectRecord>) -> Controller<RecordingService> {
        let mut controller =
            Controller::new(RecordingService::with_projects(records), Messages::default());
        controller.start();
        controller.service_mut().clear_calls();
        controller
    }

    fn beta() -> ProjectRecord {
        ProjectRecord {
            name: Some("Beta".to_owned()),
            description: Some("x".to_owned()),
            status: Some("open".to_owned()),
            responsible: Some("bob".to_owned()),
            ..ProjectRecord::new(ProjectId::new(7))
        }
    }

    fn boom() -> ApiError {
        ApiError::Http {
            status: 500,
            message: "boom".to_owned(),
        }
    }

    fn last_error(controller: &Controller<RecordingService>) -> String {
        let notification = controller
            .state()
            .notification
            .clone()
            .expect("a notification should be shown");
        assert_eq!(notification.kind, NotificationKind::Error);
        notification.message
    }

    #[test]
    fn start_loads_and_renders_list() {
        let mut controller = Controller::new(
            RecordingService::with_projects([sample_project(1, "Alpha")]),
            Messages::default(),
        );
        let events = controller.start();

        assert_eq!(
            events,
            vec![
                AppEvent::LoadingShown,
                AppEvent::ListRendered { rows: 1 },
                AppEvent::LoadingHidden,
            ]
        );
        assert_eq!(controller.service().calls(), &[ServiceCall::List]);
        assert_eq!(controller.records().len(), 1);
        assert!(!controller.state().loading);
    }

    #[test]
    fn empty_list_shows_empty_state() {
        let controller = controller_with(Vec::new());
        assert!(controller.list().is_empty_visible());
        assert!(controller.list().rows().is_empty());
    }

    #[test]
    fn refresh_failure_keeps_previous_list_and_hides_loading() {
        let mut controller = controller_with(vec![sample_project(1, "Alpha")]);
        controller.service_mut().fail_next(boom());

        let events = controller.handle(UserAction::Refresh);

        assert_eq!(events.first(), Some(&AppEvent::LoadingShown));
        assert_eq!(events.last(), Some(&AppEvent::LoadingHidden));
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, AppEvent::ListRendered { .. }))
        );
        assert_eq!(controller.list().rows().len(), 1);
        assert!(!controller.state().loading);
        let message = last_error(&controller);
        assert!(message.contains("500") && message.contains("boom"));
    }

    #[test]
    fn unchanged_edit_round_trips() {
        let original = sample_project(3, "Gamma");
        let mut controller = controller_with(vec![original.clone()]);

        controller.handle(UserAction::Edit(ProjectId::new(3)));
        controller.handle(UserAction::Submit);

        let expected = ProjectPayload {
            name: original.name.clone(),
            description: original.description.clone(),
            status: original.status.clone(),
            responsible: original.responsible.clone(),
        };
        assert_eq!(
            controller.service().calls(),
            &[
                ServiceCall::Update(ProjectId::new(3), expected),
                ServiceCall::List,
            ]
        );
        assert_eq!(controller.records(), &[original]);
    }

    #[test]
    fn edit_payload_is_trimmed() {
        let padded = ProjectRecord {
            name: Some("  Gamma  ".to_owned()),
            responsible: Some(" ".to_owned()),
            ..sample_project(3, "Gamma")
        };
        let mut controller = controller_with(vec![padded]);

        controller.handle(UserAction::Edit(ProjectId::new(3)));
        controller.handle(UserAction::Submit);

        let Some(ServiceCall::Update(_, payload)) = controller.service().calls().first() else {
            panic!("expected an update call");
        };
        assert_eq!(payload.name.as_deref(), Some("Gamma"));
        assert_eq!(payload.responsible, None);
    }

    #[test]
    fn create_submits_nulls_and_refreshes_once() {
        let mut controller = controller_with(Vec::new());

        controller.handle(UserAction::New);
        controller.form_mut().set_field(ProjectField::Name, "Alpha");
        let events = controller.handle(UserAction::Submit);

        assert_eq!(
            controller.service().calls(),
            &[
                ServiceCall::Create(ProjectPayload {
                    name: Some("Alpha".to_owned()),
                    ..ProjectPayload::default()
                }),
                ServiceCall::List,
            ]
        );
        assert_eq!(controller.service().list_calls(), 1);
        assert_eq!(controller.form().mode(), FormMode::Closed);
        assert_eq!(
            events,
            vec![
                AppEvent::Notified(Notification::success("project created")),
                AppEvent::FormChanged(FormMode::Closed),
                AppEvent::LoadingShown,
                AppEvent::ListRendered { rows: 1 },
                AppEvent::LoadingHidden,
            ]
        );
        assert!(!controller.list().is_empty_visible());
    }

    #[test]
    fn edit_prefills_from_retained_record_and_patches_by_id() {
        let mut controller = controller_with(vec![sample_project(1, "Alpha"), beta()]);

        let events = controller.handle(UserAction::Edit(ProjectId::new(7)));
        assert_eq!(
            events,
            vec![AppEvent::FormChanged(FormMode::Edit(ProjectId::new(7)))]
        );
        let fields = controller.form().fields();
        assert_eq!(fields.name, "Beta");
        assert_eq!(fields.description, "x");
        assert_eq!(fields.status, "open");
        assert_eq!(fields.responsible, "bob");
        assert!(controller.service().calls().is_empty());

        controller.handle(UserAction::Submit);
        assert!(matches!(
            controller.service().calls().first(),
            Some(ServiceCall::Update(id, _)) if *id == ProjectId::new(7)
        ));
    }

    #[test]
    fn edit_of_unknown_id_reports_and_keeps_form_closed() {
        let mut controller = controller_with(vec![sample_project(1, "Alpha")]);

        controller.handle(UserAction::Edit(ProjectId::new(99)));

        assert_eq!(controller.form().mode(), FormMode::Closed);
        assert!(last_error(&controller).contains("99"));
        assert!(controller.service().calls().is_empty());
    }

    #[test]
    fn declined_delete_makes_no_call() {
        let mut controller = controller_with(vec![sample_project(1, "Alpha")]);

        let requested = controller.handle(UserAction::Delete(ProjectId::new(1)));
        assert_eq!(
            requested,
            vec![AppEvent::ConfirmationRequested(ProjectId::new(1))]
        );
        let declined = controller.handle(UserAction::Decline);
        assert_eq!(
            declined,
            vec![AppEvent::ConfirmationResolved(ProjectId::new(1))]
        );

        assert!(controller.service().calls().is_empty());
        assert_eq!(controller.list().rows().len(), 1);
        assert_eq!(controller.state().pending_delete, None);
    }

    #[test]
    fn confirmed_delete_removes_then_lists_once() {
        let mut controller = controller_with(vec![sample_project(1, "Alpha"), beta()]);

        controller.handle(UserAction::Delete(ProjectId::new(7)));
        controller.handle(UserAction::Confirm);

        assert_eq!(
            controller.service().calls(),
            &[ServiceCall::Remove(ProjectId::new(7)), ServiceCall::List]
        );
        assert_eq!(controller.list().rows().len(), 1);
        assert_eq!(
            controller.state().notification,
            Some(Notification::success("project deleted"))
        );
    }

    #[test]
    fn confirm_without_pending_delete_is_ignored() {
        let mut controller = controller_with(vec![sample_project(1, "Alpha")]);
        assert!(controller.handle(UserAction::Confirm).is_empty());
        assert!(controller.service().calls().is_empty());
    }

    #[test]
    fn server_errors_surface_status_and_message_for_every_operation() {
        let mut controller = controller_with(vec![beta()]);

        controller.service_mut().fail_next(boom());
        controller.handle(UserAction::Refresh);
        assert!(last_error(&controller).contains("500"));
        assert_eq!(controller.list().rows().len(), 1);

        controller.handle(UserAction::New);
        controller.form_mut().set_field(ProjectField::Name, "Alpha");
        controller.service_mut().fail_next(boom());
        controller.handle(UserAction::Submit);
        assert!(last_error(&controller).contains("boom"));
        assert_eq!(controller.form().mode(), FormMode::Create);
        assert_eq!(controller.form().fields().name, "Alpha");
        controller.handle(UserAction::Cancel);

        controller.handle(UserAction::Edit(ProjectId::new(7)));
        controller.form_mut().set_field(ProjectField::Status, "done");
        controller.service_mut().fail_next(boom());
        controller.handle(UserAction::Submit);
        assert!(last_error(&controller).contains("Error 500: boom"));
        assert_eq!(controller.form().mode(), FormMode::Edit(ProjectId::new(7)));
        assert_eq!(controller.form().fields().status, "done");
        controller.handle(UserAction::Cancel);

        controller.handle(UserAction::Delete(ProjectId::new(7)));
        controller.service_mut().fail_next(boom());
        controller.handle(UserAction::Confirm);
        assert!(last_error(&controller).contains("boom"));
        assert_eq!(controller.list().rows().len(), 1);
        assert_eq!(controller.service().list_calls(), 1);
    }

    #[test]
    fn cancel_always_closes_without_calls() {
        let mut controller = controller_with(vec![beta()]);

        controller.handle(UserAction::New);
        controller.form_mut().set_field(ProjectField::Name, "draft");
        assert_eq!(
            controller.handle(UserAction::Cancel),
            vec![AppEvent::FormChanged(FormMode::Closed)]
        );
        assert_eq!(controller.form().fields(), &FormFields::default());

        controller.handle(UserAction::Edit(ProjectId::new(7)));
        controller.form_mut().push_char('!');
        controller.handle(UserAction::Cancel);
        assert_eq!(controller.form().mode(), FormMode::Closed);
        assert_eq!(controller.form().fields(), &FormFields::default());

        assert!(controller.handle(UserAction::Cancel).is_empty());
        assert!(controller.service().calls().is_empty());
    }

    #[test]
    fn submit_without_form_reports_error() {
        let mut controller = controller_with(Vec::new());
        controller.handle(UserAction::Submit);
        assert_eq!(
            last_error(&controller),
            Messages::default().form_not_open
        );
        assert!(controller.service().calls().is_empty());
    }

    #[test]
    fn transport_failures_use_action_copy() {
        let mut controller = controller_with(Vec::new());
        controller
            .service_mut()
            .fail_next(ApiError::Transport("connection refused".to_owned()));
        controller.handle(UserAction::Refresh);
        assert_eq!(last_error(&controller), Messages::default().load_failed);
    }
}
