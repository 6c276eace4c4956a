// self
use crate::{
	obs::{FlowKind, FlowOutcome},
	strategy::UnauthorizedAction,
};

/// Counter incremented for every stage outcome, labeled by `flow` and `outcome`.
pub const FLOW_COUNTER: &str = "ptpkg_auth_flow_total";
/// Counter incremented for every `401` answer to a signed request, labeled by `action`.
pub const UNAUTHORIZED_COUNTER: &str = "ptpkg_auth_unauthorized_total";

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(FLOW_COUNTER, "flow" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (kind, outcome);
}

/// Records how the session reacted to a `401` from the API.
pub fn record_unauthorized(action: UnauthorizedAction) {
	#[cfg(feature = "metrics")]
	metrics::counter!(UNAUTHORIZED_COUNTER, "action" => action.as_str()).increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = action;
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_are_noops_without_a_recorder() {
		record_flow_outcome(FlowKind::Refresh, FlowOutcome::Failure);
		record_unauthorized(UnauthorizedAction::Retry);

		assert_ne!(FLOW_COUNTER, UNAUTHORIZED_COUNTER);
	}
}
