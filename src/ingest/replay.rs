use crate::error::{Result, TopologyError};
use crate::ingest::endpoint::Endpoint;
use crate::ingest::globalping::{Measurement, PingRequest};
use crate::ingest::source::MeasurementSource;
use crate::store::{PairKey, Sample};
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use tracing::{debug, info};

/// One recorded Globalping measurement for a directed pair
#[derive(Debug, Clone, Deserialize)]
pub struct Recording {
    pub from: String,
    pub to: String,
    pub measurement: Measurement,
}

/// Replays previously captured Globalping measurements.
///
/// Recordings are consumed in file order, per pair. Once a pair runs dry the
/// source answers `Ok(None)` for it.
pub struct RecordedSource {
    queues: Mutex<HashMap<PairKey, VecDeque<Measurement>>>,
}

impl RecordedSource {
    pub fn new(recordings: Vec<Recording>) -> Self {
        let mut queues: HashMap<PairKey, VecDeque<Measurement>> = HashMap::new();
        for recording in recordings {
            queues
                .entry(PairKey::new(recording.from, recording.to))
                .or_default()
                .push_back(recording.measurement);
        }
        Self {
            queues: Mutex::new(queues),
        }
    }

    /// Parse a JSON array of recordings
    pub fn from_json(json: &str) -> Result<Self> {
        let recordings: Vec<Recording> = serde_json::from_str(json)?;
        Ok(Self::new(recordings))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let source = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            recordings = source.remaining(),
            "Loaded recorded measurements"
        );
        Ok(source)
    }

    /// Recordings not yet replayed
    pub fn remaining(&self) -> usize {
        self.queues.lock().values().map(VecDeque::len).sum()
    }
}

impl MeasurementSource for RecordedSource {
    fn measure(&self, from: &Endpoint, to: &Endpoint) -> Result<Option<Sample>> {
        let next = self
            .queues
            .lock()
            .get_mut(&PairKey::new(from.id.as_str(), to.id.as_str()))
            .and_then(VecDeque::pop_front);

        let Some(measurement) = next else {
            debug!(from = %from.id, to = %to.id, "No recording left for pair");
            return Ok(None);
        };

        if !measurement.is_finished() {
            return Err(TopologyError::Source(format!(
                "measurement {} did not finish (status {})",
                measurement.id, measurement.status
            )));
        }

        let request = PingRequest::new(from, to);
        if let Some(target) = measurement.target.as_deref() {
            if target != request.target {
                return Err(TopologyError::Source(format!(
                    "measurement {} pinged {}, expected {} for {} -> {}",
                    measurement.id, target, request.target, from.id, to.id
                )));
            }
        }

        measurement.to_sample(from, to).map(Some).ok_or_else(|| {
            TopologyError::Source(format!(
                "measurement {} has no usable result (status {})",
                measurement.id, measurement.status
            ))
        })
    }
}
