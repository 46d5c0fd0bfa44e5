// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ApiError, ProjectId, ProjectPayload, ProjectRecord};

/// The remote project collection. Implemented over HTTP by `projsync-api`
/// and in memory by `projsync-testkit`.
///
/// Each call either resolves once or fails once; implementations never retry.
pub trait ProjectService {
    fn list(&mut self) -> Result<Vec<ProjectRecord>, ApiError>;
    fn create(&mut self, payload: &ProjectPayload) -> Result<Option<ProjectRecord>, ApiError>;
    fn update(
        &mut self,
        id: ProjectId,
        payload: &ProjectPayload,
    ) -> Result<Option<ProjectRecord>, ApiError>;
    fn remove(&mut self, id: ProjectId) -> Result<(), ApiError>;
}

impl<S: ProjectService + ?Sized> ProjectService for Box<S> {
    fn list(&mut self) -> Result<Vec<ProjectRecord>, ApiError> {
        (**self).list()
    }

    fn create(&mut self, payload: &ProjectPayload) -> Result<Option<ProjectRecord>, ApiError> {
        (**self).create(payload)
    }

    fn update(
        &mut self,
        id: ProjectId,
        payload: &ProjectPayload,
    ) -> Result<Option<ProjectRecord>, ApiError> {
        (**self).update(id, payload)
    }

    fn remove(&mut self, id: ProjectId) -> Result<(), ApiError> {
        (**self).remove(id)
    }
}
