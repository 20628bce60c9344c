//! The single result type every orchestrated lookup resolves to.

/// Result of one orchestrated request.
///
/// Exactly one variant holds per request. `Success` is only produced when
/// every upstream fetch the operation needed succeeded before the deadline and
/// before cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// All upstream fetches succeeded.
    Success(T),
    /// The product is unknown locally or an upstream confirmed it is absent.
    NotFound(String),
    /// An upstream could not answer usefully (unreachable, timed out, malformed).
    UpstreamUnavailable(String),
    /// The caller's cancellation signal fired before the fetches settled.
    Cancelled,
}

impl<T> Outcome<T> {
    /// Transforms the success value, keeping failure variants as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::NotFound(reason) => Outcome::NotFound(reason),
            Outcome::UpstreamUnavailable(reason) => Outcome::UpstreamUnavailable(reason),
            Outcome::Cancelled => Outcome::Cancelled,
        }
    }

    /// Splits into the success value or the failure re-typed for another operation.
    pub fn into_result<U>(self) -> Result<T, Outcome<U>> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::NotFound(reason) => Err(Outcome::NotFound(reason)),
            Outcome::UpstreamUnavailable(reason) => Err(Outcome::UpstreamUnavailable(reason)),
            Outcome::Cancelled => Err(Outcome::Cancelled),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Short, stable label used in metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::NotFound(_) => "not_found",
            Outcome::UpstreamUnavailable(_) => "upstream_unavailable",
            Outcome::Cancelled => "cancelled",
        }
    }
}
