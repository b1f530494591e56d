//! The ground truth the evaluator compares observations against: one [`InjectedFlight`]
//! per USS, owned by the evaluator for the lifetime of a run.

use crate::payload::TestFlight;

#[derive(Debug, Clone)]
pub struct InjectedFlight {
    pub uss_name: String,
    pub flight: TestFlight,
}

impl InjectedFlight {
    /// The flight id from the primary details response (§9 policy hook).
    pub fn flight_id(&self) -> Option<&str> {
        self.flight
            .details_responses
            .first()
            .map(|d| d.details.id.as_str())
    }
}
