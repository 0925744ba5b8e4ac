//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for spending data:
//! - **Monthly Expenses**: total spent per month of the selected year
//! - **Spending by Category**: pie chart of the year's spending per category
//! - **Budget vs Actual**: grouped bars per category for the selected month
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, JsFunction, Tooltip, Trigger,
    },
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    analytics::{BudgetComparison, CategoryTotal, Period, month_abbreviation},
    html::HeadElement,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Bar chart of the total spent in each month of `year`.
pub(super) fn monthly_expenses_chart(monthly_totals: &[f64; 12], year: i32) -> Chart {
    let (labels, totals) = monthly_series(monthly_totals);

    Chart::new()
        .title(
            Title::new()
                .text("Monthly Expenses")
                .subtext(format!("{year}")),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Spent").data(totals))
}

/// The month labels and totals plotted by [monthly_expenses_chart].
fn monthly_series(monthly_totals: &[f64; 12]) -> (Vec<&'static str>, Vec<f64>) {
    let labels = (0..12).map(month_abbreviation).collect();

    (labels, monthly_totals.to_vec())
}

/// Pie chart of the spending per category, colored with the category colors.
pub(super) fn category_breakdown_chart(breakdown: &[CategoryTotal], year: i32) -> Chart {
    let colors: Vec<Color> = breakdown
        .iter()
        .map(|total| Color::from(total.color))
        .collect();
    let data: Vec<(f64, &str)> = breakdown
        .iter()
        .map(|total| (total.amount, total.name))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Spending by Category")
                .subtext(format!("{year}")),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .formatter("{b}: ${c} ({d}% of total)"),
        )
        .legend(Legend::new().bottom("0%"))
        .color(colors)
        .series(
            Pie::new()
                .name("Spent")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

/// Grouped bar chart of the budgeted and actual amounts per category.
pub(super) fn budget_vs_actual_chart(comparisons: &[BudgetComparison], period: Period) -> Chart {
    let BudgetSeries {
        labels,
        budgets,
        actuals,
    } = budget_series(comparisons);

    Chart::new()
        .title(
            Title::new()
                .text("Budget vs Actual")
                .subtext(period.label()),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(70)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Budget").data(budgets))
        .series(Bar::new().name("Actual").data(actuals))
}

/// The category labels and the two bar series of [budget_vs_actual_chart].
#[derive(Debug, PartialEq)]
struct BudgetSeries {
    labels: Vec<&'static str>,
    budgets: Vec<f64>,
    actuals: Vec<f64>,
}

fn budget_series(comparisons: &[BudgetComparison]) -> BudgetSeries {
    BudgetSeries {
        labels: comparisons.iter().map(|comparison| comparison.name).collect(),
        budgets: comparisons.iter().map(|comparison| comparison.budget).collect(),
        actuals: comparisons.iter().map(|comparison| comparison.actual).collect(),
    }
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::analytics::{BudgetComparison, CategoryTotal, Period};

    use super::{
        BudgetSeries, DashboardChart, budget_series, budget_vs_actual_chart,
        category_breakdown_chart, charts_script, monthly_expenses_chart, monthly_series,
    };

    // Only valid for charts without `JsFunction` options.
    fn chart_json(chart: charming::Chart) -> Value {
        serde_json::from_str(&chart.to_string()).unwrap()
    }

    #[test]
    fn monthly_series_has_twelve_bars() {
        let mut totals = [0.0; 12];
        totals[0] = 120.0;
        totals[1] = 50.0;

        let (labels, data) = monthly_series(&totals);

        assert_eq!(labels.len(), 12);
        assert_eq!(labels[0], "Jan");
        assert_eq!(labels[11], "Dec");
        assert_eq!(data.len(), 12);
        assert_eq!(data[0], 120.0);
        assert_eq!(data[1], 50.0);
        assert_eq!(data[2..], [0.0; 10]);
    }

    #[test]
    fn monthly_chart_embeds_currency_formatter() {
        let options = monthly_expenses_chart(&[0.0; 12], 2023).to_string();

        assert!(options.contains("Monthly Expenses"));
        assert!(options.contains("Intl.NumberFormat"));
    }

    #[test]
    fn category_chart_uses_category_colors() {
        let breakdown = vec![
            CategoryTotal {
                category_id: "groceries".to_owned(),
                name: "Groceries",
                color: "#4CAF50",
                amount: 120.0,
            },
            CategoryTotal {
                category_id: "dining".to_owned(),
                name: "Dining",
                color: "#F44336",
                amount: 80.0,
            },
        ];

        let json = chart_json(category_breakdown_chart(&breakdown, 2023));

        assert_eq!(json["color"][0], "#4CAF50");
        assert_eq!(json["color"][1], "#F44336");
        assert_eq!(json["series"][0]["data"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn budget_series_pairs_budget_and_actual() {
        let comparisons = vec![
            BudgetComparison {
                category_id: "dining".to_owned(),
                name: "Dining",
                color: "#F44336",
                budget: 100.0,
                actual: 120.0,
                difference: -20.0,
                percent_used: 120.0,
                budgeted: true,
            },
            BudgetComparison {
                category_id: "travel".to_owned(),
                name: "Travel",
                color: "#00BCD4",
                budget: 0.0,
                actual: 40.0,
                difference: -40.0,
                percent_used: 100.0,
                budgeted: false,
            },
        ];

        assert_eq!(
            budget_series(&comparisons),
            BudgetSeries {
                labels: vec!["Dining", "Travel"],
                budgets: vec![100.0, 0.0],
                actuals: vec![120.0, 40.0],
            }
        );

        let options = budget_vs_actual_chart(
            &comparisons,
            Period {
                year: 2024,
                month: 2,
            },
        )
        .to_string();
        assert!(options.contains("March 2024"));
        assert!(options.contains("Budget"));
        assert!(options.contains("Actual"));
    }

    #[test]
    fn script_initialises_every_chart() {
        let charts = [
            DashboardChart {
                id: "first-chart",
                options: "{}".to_owned(),
            },
            DashboardChart {
                id: "second-chart",
                options: "{}".to_owned(),
            },
        ];

        let crate::html::HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("want inline script");
        };

        assert!(script.0.contains("document.getElementById(\"first-chart\")"));
        assert!(script.0.contains("document.getElementById(\"second-chart\")"));
    }
}
