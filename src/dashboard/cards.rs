//! Card components for the dashboard summary and the insights panel.
//!
//! Provides:
//! - Summary cards for the total spent, the selected month and the monthly average
//! - The month-over-month change
//! - Insight cards for over-budget categories, unusual spending, savings
//!   opportunities, the largest expense and the top category

use maud::{Markup, html};

use crate::{
    analytics::AnalyticsReport,
    html::{format_currency, format_percentage},
    insights::SpendingInsights,
};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";
const CARD_TITLE_STYLE: &str = "text-sm font-medium text-gray-600 dark:text-gray-400";
const CARD_VALUE_STYLE: &str = "text-3xl font-bold mt-1";
const INCREASE_STYLE: &str = "text-red-600 dark:text-red-400";
const DECREASE_STYLE: &str = "text-green-600 dark:text-green-400";

/// Prefix positive changes with a plus sign, e.g. "+12.5%".
fn format_change(change: f64) -> String {
    let formatted = format_percentage(change);

    if formatted.starts_with('-') || formatted == "0.0%" {
        formatted
    } else {
        format!("+{formatted}")
    }
}

fn summary_card(title: &str, value: &str, detail: Option<Markup>) -> Markup {
    html! {
        div class=(CARD_STYLE) aria-label=(title)
        {
            h4 class=(CARD_TITLE_STYLE) { (title) }
            div class=(CARD_VALUE_STYLE) { (value) }

            @if let Some(detail) = detail {
                div class="text-sm mt-2" { (detail) }
            }
        }
    }
}

/// Renders the row of summary cards at the top of the dashboard.
pub(super) fn summary_cards_view(report: &AnalyticsReport) -> Markup {
    let change = report.month_over_month_change;
    let change_style = if change > 0.0 {
        INCREASE_STYLE
    } else {
        DECREASE_STYLE
    };
    let change_detail = html! {
        span class=(change_style) { (format_change(change)) }
        " vs " (report.period.previous().label())
    };

    html! {
        section
            id="summary"
            class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4 w-full mb-8"
        {
            (summary_card("Total Spent", &format_currency(report.total_spent), None))
            (summary_card(
                &report.period.label(),
                &format_currency(report.current_month_spent),
                Some(change_detail),
            ))
            (summary_card(
                "Average Monthly",
                &format_currency(report.average_monthly_spend),
                None,
            ))
            (summary_card(
                "Month over Month",
                &format_change(change),
                None,
            ))
        }
    }
}

fn insight_card(title: &str, body: Markup) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h4 class="text-lg font-semibold mb-3" { (title) }
            (body)
        }
    }
}

fn color_dot(color: &str) -> Markup {
    html! {
        span
            class="inline-block w-3 h-3 mr-2 rounded-full"
            style={"background-color: " (color)}
        {}
    }
}

fn over_budget_card(insights: &SpendingInsights) -> Markup {
    insight_card(
        "Over Budget",
        html! {
            @if insights.over_budget.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Every category is within its budget."
                }
            } @else {
                ul class="space-y-2 text-sm"
                {
                    @for item in &insights.over_budget {
                        li class="flex justify-between"
                        {
                            span { (color_dot(item.color)) (item.name) }
                            span class=(INCREASE_STYLE)
                            {
                                (format_currency(item.over_by)) " over "
                                (format_currency(item.budget))
                            }
                        }
                    }
                }
            }
        },
    )
}

fn unusual_spending_card(insights: &SpendingInsights) -> Markup {
    insight_card(
        "Unusual Spending",
        html! {
            @if insights.unusual_spending.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "No unusual increases since last month."
                }
            } @else {
                ul class="space-y-2 text-sm"
                {
                    @for item in &insights.unusual_spending {
                        li class="flex justify-between"
                        {
                            span { (color_dot(item.color)) (item.name) }
                            span class=(INCREASE_STYLE)
                            {
                                (format_change(item.percent_increase))
                                " (" (format_currency(item.previous_amount)) " → "
                                (format_currency(item.amount)) ")"
                            }
                        }
                    }
                }
            }
        },
    )
}

fn savings_card(insights: &SpendingInsights) -> Markup {
    insight_card(
        "Savings Opportunities",
        html! {
            @if insights.savings_opportunities.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "No discretionary spending this month."
                }
            } @else {
                ul class="space-y-2 text-sm"
                {
                    @for item in &insights.savings_opportunities {
                        li class="flex justify-between"
                        {
                            span { (color_dot(item.color)) (item.name) }
                            span { (format_currency(item.amount)) }
                        }
                    }
                }
            }
        },
    )
}

fn highlights_card(insights: &SpendingInsights) -> Markup {
    insight_card(
        "Highlights",
        html! {
            dl class="space-y-2 text-sm"
            {
                dt class=(CARD_TITLE_STYLE) { "Largest expense" }
                dd
                {
                    @if let Some(expense) = &insights.largest_expense {
                        (format_currency(expense.amount)) ", " (expense.description)
                        " on " (expense.date)
                    } @else {
                        "None"
                    }
                }

                dt class=(CARD_TITLE_STYLE) { "Top category" }
                dd
                {
                    @if let Some(category) = &insights.top_category {
                        (color_dot(category.color)) (category.name) ", "
                        (format_currency(category.amount))
                    } @else {
                        "None"
                    }
                }
            }
        },
    )
}

/// Renders the insights panel for the selected month.
pub(super) fn insights_view(insights: &SpendingInsights) -> Markup {
    html! {
        section id="insights" class="w-full mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Insights" }

            div class="grid grid-cols-1 md:grid-cols-2 gap-4"
            {
                (over_budget_card(insights))
                (unusual_spending_card(insights))
                (savings_card(insights))
                (highlights_card(insights))
            }
        }
    }
}
