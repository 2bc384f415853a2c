use std::error::Error;
use std::fmt::{Display, Formatter};

const ERROR_MESSAGE_MAXIMUM_SIZE_GT_ZERO: &str = "Maximum size of the cache must be greater than zero";
const ERROR_MESSAGE_WINDOW_PERCENTAGE_IN_RANGE: &str = "Window percentage must be between 0 and 100 (inclusive)";
const ERROR_MESSAGE_ADAPTIVE_WINDOW_NEEDS_MAIN_REGION: &str = "Adaptive window requires a main region, window percentage must be less than 100";
const ERROR_MESSAGE_PIVOT_GT_ZERO: &str = "Pivot must move at least one unit of capacity, pivot * maximum size must round to a value greater than zero";
const ERROR_MESSAGE_SAMPLE_MULTIPLIER_GT_ZERO: &str = "Sample multiplier must be greater than zero";
const ERROR_MESSAGE_SAMPLE_SIZE_GT_ZERO: &str = "Sample size must be greater than zero";
const ERROR_MESSAGE_TOTAL_COUNTERS_GT_ZERO: &str = "Total number of counters must be greater than zero";
const ERROR_MESSAGE_ENTRY_SIZE_GT_ZERO: &str = "Size of the recorded entry must be greater than zero";
const ERROR_MESSAGE_SIMULATION_PANICKED: &str = "Simulation thread panicked before completing the trace";
const ERROR_MESSAGE_DEGENERATE_STATS: &str = "Stats are undefined before the first access, hits + misses is zero";

/// Errors enum define various application errors.
/// Errors are categorized either as ConfigError, OperationError or TraceError under [`ErrorType`] enum.
#[derive(Eq, PartialEq, Debug)]
pub enum Errors {
    MaximumSizeGtZero,
    WindowPercentageInRange,
    AdaptiveWindowNeedsMainRegion,
    PivotGtZero,
    SampleMultiplierGtZero,
    SampleSizeGtZero,
    TotalCountersGtZero,
    EntrySizeGtZero(&'static str),
    DegenerateStats,
    TraceParse(usize, String),
    TraceUnavailable(String),
    SimulationPanicked(&'static str),
}

pub(crate) enum ErrorType {
    ConfigError,
    OperationError(&'static str),
    TraceError(usize),
}

impl Display for ErrorType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorType::ConfigError =>
                write!(formatter, "Config error"),
            ErrorType::OperationError(operation) =>
                write!(formatter, "Operation {}", operation),
            ErrorType::TraceError(line) =>
                write!(formatter, "Trace line {}", line),
        }
    }
}

impl Display for Errors {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Errors::MaximumSizeGtZero =>
                write!(formatter, "[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_MAXIMUM_SIZE_GT_ZERO),
            Errors::WindowPercentageInRange =>
                write!(formatter, "[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_WINDOW_PERCENTAGE_IN_RANGE),
            Errors::AdaptiveWindowNeedsMainRegion =>
                write!(formatter, "[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_ADAPTIVE_WINDOW_NEEDS_MAIN_REGION),
            Errors::PivotGtZero =>
                write!(formatter, "[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_PIVOT_GT_ZERO),
            Errors::SampleMultiplierGtZero =>
                write!(formatter, "[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_SAMPLE_MULTIPLIER_GT_ZERO),
            Errors::SampleSizeGtZero =>
                write!(formatter, "[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_SAMPLE_SIZE_GT_ZERO),
            Errors::TotalCountersGtZero =>
                write!(formatter, "[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_TOTAL_COUNTERS_GT_ZERO),
            Errors::EntrySizeGtZero(operation) =>
                write!(formatter, "[{}]: {}", ErrorType::OperationError(operation), ERROR_MESSAGE_ENTRY_SIZE_GT_ZERO),
            Errors::DegenerateStats =>
                write!(formatter, "[{}]: {}", ErrorType::OperationError("stats"), ERROR_MESSAGE_DEGENERATE_STATS),
            Errors::TraceParse(line, reason) =>
                write!(formatter, "[{}]: {}", ErrorType::TraceError(*line), reason),
            Errors::TraceUnavailable(reason) =>
                write!(formatter, "[{}]: {}", ErrorType::OperationError("trace"), reason),
            Errors::SimulationPanicked(policy) =>
                write!(formatter, "[{}]: {} ({})", ErrorType::OperationError("simulation"), ERROR_MESSAGE_SIMULATION_PANICKED, policy),
        }
    }
}

impl Error for Errors {}

#[cfg(test)]
mod tests {
    use crate::cache::errors::{ERROR_MESSAGE_ADAPTIVE_WINDOW_NEEDS_MAIN_REGION, ERROR_MESSAGE_DEGENERATE_STATS};
    use crate::cache::errors::ERROR_MESSAGE_ENTRY_SIZE_GT_ZERO;
    use crate::cache::errors::ERROR_MESSAGE_MAXIMUM_SIZE_GT_ZERO;
    use crate::cache::errors::ERROR_MESSAGE_PIVOT_GT_ZERO;
    use crate::cache::errors::ERROR_MESSAGE_SAMPLE_MULTIPLIER_GT_ZERO;
    use crate::cache::errors::ERROR_MESSAGE_SAMPLE_SIZE_GT_ZERO;
    use crate::cache::errors::ERROR_MESSAGE_SIMULATION_PANICKED;
    use crate::cache::errors::ERROR_MESSAGE_TOTAL_COUNTERS_GT_ZERO;
    use crate::cache::errors::ERROR_MESSAGE_WINDOW_PERCENTAGE_IN_RANGE;
    use crate::cache::errors::Errors;
    use crate::cache::errors::ErrorType;

    #[test]
    fn error_maximum_size() {
        let error = Errors::MaximumSizeGtZero;
        assert_eq!(format!("[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_MAXIMUM_SIZE_GT_ZERO), error.to_string());
    }

    #[test]
    fn error_window_percentage() {
        let error = Errors::WindowPercentageInRange;
        assert_eq!(format!("[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_WINDOW_PERCENTAGE_IN_RANGE), error.to_string());
    }

    #[test]
    fn error_adaptive_window() {
        let error = Errors::AdaptiveWindowNeedsMainRegion;
        assert_eq!(format!("[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_ADAPTIVE_WINDOW_NEEDS_MAIN_REGION), error.to_string());
    }

    #[test]
    fn error_pivot() {
        let error = Errors::PivotGtZero;
        assert_eq!(format!("[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_PIVOT_GT_ZERO), error.to_string());
    }

    #[test]
    fn error_sample_multiplier() {
        let error = Errors::SampleMultiplierGtZero;
        assert_eq!(format!("[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_SAMPLE_MULTIPLIER_GT_ZERO), error.to_string());
    }

    #[test]
    fn error_sample_size() {
        let error = Errors::SampleSizeGtZero;
        assert_eq!(format!("[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_SAMPLE_SIZE_GT_ZERO), error.to_string());
    }

    #[test]
    fn error_total_counters() {
        let error = Errors::TotalCountersGtZero;
        assert_eq!(format!("[{}]: {}", ErrorType::ConfigError, ERROR_MESSAGE_TOTAL_COUNTERS_GT_ZERO), error.to_string());
    }

    #[test]
    fn error_entry_size() {
        let error = Errors::EntrySizeGtZero("record");
        assert_eq!(format!("[{}]: {}", ErrorType::OperationError("record"), ERROR_MESSAGE_ENTRY_SIZE_GT_ZERO), error.to_string());
    }

    #[test]
    fn error_degenerate_stats() {
        let error = Errors::DegenerateStats;
        assert_eq!(format!("[{}]: {}", ErrorType::OperationError("stats"), ERROR_MESSAGE_DEGENERATE_STATS), error.to_string());
    }

    #[test]
    fn error_trace_parse() {
        let error = Errors::TraceParse(7, "invalid key 'abc'".to_string());
        assert_eq!("[Trace line 7]: invalid key 'abc'", error.to_string());
    }

    #[test]
    fn error_trace_unavailable() {
        let error = Errors::TraceUnavailable("No such file or directory".to_string());
        assert_eq!("[Operation trace]: No such file or directory", error.to_string());
    }

    #[test]
    fn error_simulation_panicked() {
        let error = Errors::SimulationPanicked("LRU");
        assert_eq!(format!("[{}]: {} (LRU)", ErrorType::OperationError("simulation"), ERROR_MESSAGE_SIMULATION_PANICKED), error.to_string());
    }
}
