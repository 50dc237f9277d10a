//! Indicator trait definitions.

/// Streaming indicator that maintains internal state.
///
/// Each update is O(1) amortized. Before the indicator has seen `period`
/// inputs its value is computed over the partial window and `is_ready`
/// reports `false`; callers decide whether such values are actionable.
pub trait StreamingIndicator: Send + Sync {
    /// The value fed on each update.
    type Input;

    /// Update the indicator with a new input and return the current value.
    fn update(&mut self, input: Self::Input) -> f64;

    /// Get the current value without adding new data.
    fn value(&self) -> f64;

    /// Reset the indicator state.
    fn reset(&mut self);

    /// Check if the indicator has enough data to produce stable values.
    fn is_ready(&self) -> bool;

    /// Get the minimum inputs required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}
