// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod error;
pub mod forms;
pub mod ids;
pub mod messages;
pub mod model;
pub mod service;
pub mod state;

pub use error::*;
pub use forms::*;
pub use ids::*;
pub use messages::*;
pub use model::*;
pub use service::*;
pub use state::*;
