// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use projsync_app::{ApiError, ProjectId, ProjectPayload, ProjectRecord, ProjectService};
use std::collections::{BTreeMap, VecDeque};
use time::{Duration, PrimitiveDateTime};

use crate::{ProjectFaker, reference_start};

const DEFAULT_STATUS: &str = "NEW";

/// In-memory stand-in for the project server.
///
/// Mirrors the server's behavior: ids are assigned in sequence, a missing
/// status becomes `NEW` on create, updates only touch fields present in the
/// payload, and unknown ids answer 404. Timestamps come from a clock that
/// advances one minute per write, so results are reproducible.
#[derive(Debug, Clone)]
pub struct MemoryService {
    projects: BTreeMap<ProjectId, ProjectRecord>,
    next_id: i64,
    clock: PrimitiveDateTime,
}

impl Default for MemoryService {
    fn default() -> Self {
        Self {
            projects: BTreeMap::new(),
            next_id: 1,
            clock: reference_start(),
        }
    }
}

impl MemoryService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = ProjectRecord>) -> Self {
        let mut service = Self::default();
        for record in records {
            service.next_id = service.next_id.max(record.id.get().saturating_add(1));
            service.projects.insert(record.id, record);
        }
        service
    }

    /// A populated collection for `--demo` sessions.
    pub fn seeded(seed: u64, count: usize) -> Self {
        let mut faker = ProjectFaker::new(seed);
        let mut service = Self::default();
        for _ in 0..count {
            service.insert(faker.payload());
        }
        service
    }

    pub fn snapshot(&self) -> Vec<ProjectRecord> {
        self.projects.values().cloned().collect()
    }

    pub fn get(&self, id: ProjectId) -> Option<&ProjectRecord> {
        self.projects.get(&id)
    }

    fn tick(&mut self) -> PrimitiveDateTime {
        self.clock = self.clock.saturating_add(Duration::minutes(1));
        self.clock
    }

    fn insert(&mut self, payload: ProjectPayload) -> ProjectRecord {
        let id = ProjectId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let now = self.tick();
        let record = ProjectRecord {
            name: payload.name,
            description: payload.description,
            status: payload
                .status
                .or_else(|| Some(DEFAULT_STATUS.to_owned())),
            responsible: payload.responsible,
            created_at: Some(now),
            updated_at: Some(now),
            ..ProjectRecord::new(id)
        };
        self.projects.insert(id, record.clone());
        record
    }
}

fn not_found() -> ApiError {
    ApiError::Http {
        status: 404,
        message: "Project not found".to_owned(),
    }
}

fn merge(slot: &mut Option<String>, value: &Option<String>) -> bool {
    match value {
        Some(value) if slot.as_ref() != Some(value) => {
            *slot = Some(value.clone());
            true
        }
        Some(_) | None => false,
    }
}

impl ProjectService for MemoryService {
    fn list(&mut self) -> Result<Vec<ProjectRecord>, ApiError> {
        Ok(self.snapshot())
    }

    fn create(&mut self, payload: &ProjectPayload) -> Result<Option<ProjectRecord>, ApiError> {
        let record = self.insert(payload.clone());
        tracing::debug!(project_id = record.id.get(), "created in-memory project");
        Ok(Some(record))
    }

    fn update(
        &mut self,
        id: ProjectId,
        payload: &ProjectPayload,
    ) -> Result<Option<ProjectRecord>, ApiError> {
        let now = self.clock.saturating_add(Duration::minutes(1));
        let record = self.projects.get_mut(&id).ok_or_else(not_found)?;
        let mut changed = merge(&mut record.name, &payload.name);
        changed |= merge(&mut record.description, &payload.description);
        changed |= merge(&mut record.status, &payload.status);
        changed |= merge(&mut record.responsible, &payload.responsible);
        if changed {
            record.updated_at = Some(now);
        }
        let updated = record.clone();
        if changed {
            self.clock = now;
        }
        tracing::debug!(project_id = id.get(), changed, "updated in-memory project");
        Ok(Some(updated))
    }

    fn remove(&mut self, id: ProjectId) -> Result<(), ApiError> {
        self.projects.remove(&id).ok_or_else(not_found)?;
        tracing::debug!(project_id = id.get(), "removed in-memory project");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    List,
    Create(ProjectPayload),
    Update(ProjectId, ProjectPayload),
    Remove(ProjectId),
}

/// Wraps a [`MemoryService`], records every call it receives, and fails the
/// next calls on demand. A call that is made to fail is still recorded.
#[derive(Debug, Clone, Default)]
pub struct RecordingService {
    inner: MemoryService,
    calls: Vec<ServiceCall>,
    failures: VecDeque<ApiError>,
}

impl RecordingService {
    pub fn new(inner: MemoryService) -> Self {
        Self {
            inner,
            calls: Vec::new(),
            failures: VecDeque::new(),
        }
    }

    pub fn with_projects(records: impl IntoIterator<Item = ProjectRecord>) -> Self {
        Self::new(MemoryService::from_records(records))
    }

    pub fn fail_next(&mut self, error: ApiError) {
        self.failures.push_back(error);
    }

    pub fn calls(&self) -> &[ServiceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn list_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ServiceCall::List))
            .count()
    }

    pub fn inner(&self) -> &MemoryService {
        &self.inner
    }

    fn record(&mut self, call: ServiceCall) -> Result<(), ApiError> {
        self.calls.push(call);
        match self.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl ProjectService for RecordingService {
    fn list(&mut self) -> Result<Vec<ProjectRecord>, ApiError> {
        self.record(ServiceCall::List)?;
        self.inner.list()
    }

    fn create(&mut self, payload: &ProjectPayload) -> Result<Option<ProjectRecord>, ApiError> {
        self.record(ServiceCall::Create(payload.clone()))?;
        self.inner.create(payload)
    }

    fn update(
        &mut self,
        id: ProjectId,
        payload: &ProjectPayload,
    ) -> Result<Option<ProjectRecord>, ApiError> {
        self.record(ServiceCall::Update(id, payload.clone()))?;
        self.inner.update(id, payload)
    }

    fn remove(&mut self, id: ProjectId) -> Result<(), ApiError> {
        self.record(ServiceCall::Remove(id))?;
        self.inner.remove(id)
    }
}
