//! Evaluation options shared by a filter tree and its per-thread state.

/// Default number of rows a selection buffer is sized for.
pub const DEFAULT_BATCH_CAPACITY: usize = 1024;

/// Options controlling filter evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    pub(crate) initial_capacity: usize,
    pub(crate) short_circuit: bool,
    pub(crate) validate_output: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            initial_capacity: DEFAULT_BATCH_CAPACITY,
            short_circuit: true,
            validate_output: cfg!(debug_assertions),
        }
    }
}

impl FilterOptions {
    /// Rows each selection buffer reserves up front.
    pub fn initial_capacity(self, initial_capacity: usize) -> Self {
        FilterOptions {
            initial_capacity,
            ..self
        }
    }

    /// Stop composite evaluation early once the outcome is decided.
    ///
    /// Only affects cost; the produced selection is identical either way.
    pub fn short_circuit(self, short_circuit: bool) -> Self {
        FilterOptions {
            short_circuit,
            ..self
        }
    }

    /// Check the root output for ordering and range violations after each batch.
    pub fn validate_output(self, validate_output: bool) -> Self {
        FilterOptions {
            validate_output,
            ..self
        }
    }

    /// Returns the configured buffer capacity.
    pub fn capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Returns true when composites may stop early.
    pub fn is_short_circuit(&self) -> bool {
        self.short_circuit
    }

    /// Returns true when root output is validated after each batch.
    pub fn is_validating(&self) -> bool {
        self.validate_output
    }
}
