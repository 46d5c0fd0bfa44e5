// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod memory;

pub use memory::{MemoryService, RecordingService, ServiceCall};

use projsync_app::{ProjectId, ProjectPayload, ProjectRecord};
use time::PrimitiveDateTime;
use time::macros::datetime;

const PROJECT_NAMES: [&str; 16] = [
    "Billing revamp",
    "Customer portal",
    "Data warehouse migration",
    "Mobile onboarding",
    "Search relevance",
    "Payments retry queue",
    "Support inbox triage",
    "Audit log export",
    "Partner API v2",
    "Warehouse scanner app",
    "Pricing experiments",
    "Access review tooling",
    "Docs site refresh",
    "Status page",
    "Load test harness",
    "Invoice OCR",
];

const STATUSES: [&str; 5] = ["NEW", "IN_PROGRESS", "BLOCKED", "REVIEW", "DONE"];

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];

const DESCRIPTION_WORDS: [&str; 24] = [
    "migrate", "legacy", "service", "rollout", "customers", "dashboard", "latency", "backlog",
    "release", "pipeline", "review", "integration", "reporting", "cleanup", "schema", "alerts",
    "automation", "handoff", "budget", "vendor", "pilot", "metrics", "security", "launch",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator for plausible project payloads.
#[derive(Debug, Clone)]
pub struct ProjectFaker {
    rng: DeterministicRng,
}

impl ProjectFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn payload(&mut self) -> ProjectPayload {
        let description = if self.rng.bool() {
            Some(self.sentence(3, 8))
        } else {
            None
        };
        ProjectPayload {
            name: Some(self.pick(&PROJECT_NAMES).to_owned()),
            description,
            status: Some(self.pick(&STATUSES).to_owned()),
            responsible: Some(format!(
                "{} {}",
                self.pick(&FIRST_NAMES),
                self.pick(&LAST_NAMES)
            )),
        }
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        let span = max_words.saturating_sub(min_words) + 1;
        let count = min_words + self.rng.int_n(span);
        let mut words = Vec::with_capacity(count);
        for _ in 0..count {
            words.push(self.pick(&DESCRIPTION_WORDS));
        }
        let mut out = words.join(" ");
        if let Some(first) = out.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        out
    }
}

/// A record with every string field set, for tests that do not care about
/// the exact values.
pub fn sample_project(id: i64, name: &str) -> ProjectRecord {
    ProjectRecord {
        name: Some(name.to_owned()),
        description: Some(format!("{name} description")),
        status: Some("NEW".to_owned()),
        responsible: Some("Avery Walker".to_owned()),
        created_at: Some(fixture_datetime()),
        updated_at: Some(fixture_datetime()),
        ..ProjectRecord::new(ProjectId::new(id))
    }
}

pub fn fixture_datetime() -> PrimitiveDateTime {
    reference_start()
}

fn reference_start() -> PrimitiveDateTime {
    datetime!(2026-01-05 9:00)
}
