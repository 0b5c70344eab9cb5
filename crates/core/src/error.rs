use thiserror::Error;

/// Rejections raised before any collaborator is contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("destination must not be empty")]
    EmptyDestination,
    #[error("end time must be strictly after start time")]
    InvalidTimeWindow,
    #[error("budget must be a positive amount")]
    NonPositiveBudget,
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    InvalidRequest(#[from] RequestError),
    /// Both the drafting and the optimization call failed outright. This is the
    /// only failure that withholds a plan; everything else degrades in place.
    #[error("itinerary generation is unavailable")]
    GenerationUnavailable,
}
