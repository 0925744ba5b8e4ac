//! Configurable values for the edge cases of the percentage calculations.

/// The values used where a percentage has no meaningful denominator, plus the
/// threshold for flagging unusual spending.
///
/// By default a zero budget is 0% used, unbudgeted spending is 100% used,
/// the change from a month with no spending is 100% and increases above 50%
/// are unusual.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticsPolicy {
    /// Percent used reported for a budget of zero.
    pub zero_budget_percent_used: f64,
    /// Percent used reported for a category with spending but no budget.
    pub unbudgeted_percent_used: f64,
    /// Month-over-month change reported when nothing was spent last month.
    pub no_previous_month_change: f64,
    /// A category is flagged when its spending grows by strictly more than
    /// this percentage compared to last month.
    pub unusual_increase_threshold: f64,
}

impl Default for AnalyticsPolicy {
    fn default() -> Self {
        Self {
            zero_budget_percent_used: 0.0,
            unbudgeted_percent_used: 100.0,
            no_previous_month_change: 100.0,
            unusual_increase_threshold: 50.0,
        }
    }
}
