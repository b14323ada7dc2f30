use serde::Serialize;
use smpcore::prelude::DriftEstimate;
use smpcore::sidebar::EventOutcome;
use smpcore::telemetry::MetricsSnapshot;

/// Response body for `POST /event`.
#[derive(Debug, Clone, Serialize)]
pub struct EventReply {
    pub status: EventOutcome,
    pub metrics: MetricsSnapshot,
}

/// Short description of the open session for `GET /status`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub profile: Option<String>,
    pub samples: usize,
    pub markers: usize,
    pub drift: Option<DriftEstimate>,
    pub metrics: MetricsSnapshot,
}
