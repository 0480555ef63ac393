//! Errors raised by the series store, the indicator registry and the session.

use thiserror::Error;

use crate::analysis::IndicatorError;
use crate::models::indicator::{IndicatorId, IndicatorKind};

#[derive(Debug, Error)]
pub enum ChartError {
    /// Bad parameters or a series that breaks the time-ordering invariant.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A realtime bar that is not newer than the current last bar.
    #[error("out of order bar: time {attempted} is not after last bar time {last}")]
    OutOfOrder {
        /// Time of the current last bar.
        last: i64,
        /// Time of the rejected bar.
        attempted: i64,
    },

    /// Lookup or removal of an id the registry does not hold.
    #[error("indicator {0} not found")]
    NotFound(IndicatorId),

    /// The store holds no price data to compute from.
    #[error("no price data available for indicator calculation")]
    NoData,

    /// An indicator math failure raised while adding an indicator.
    #[error("could not add {kind} indicator: {source}")]
    Computation {
        kind: IndicatorKind,
        #[source]
        source: IndicatorError,
    },

    /// The renderer refused a series or overlay request.
    #[error("renderer failure: {0}")]
    Render(String),
}

impl ChartError {
    /// Wraps a renderer failure, keeping its full context chain in the message.
    pub fn render(err: anyhow::Error) -> Self {
        ChartError::Render(format!("{err:#}"))
    }
}
