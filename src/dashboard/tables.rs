//! Table views for the top categories and the most recent transactions.

use maud::{Markup, html};

use crate::{
    analytics::{CategoryTotal, category_share},
    endpoints,
    html::{
        LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, category_badge,
        format_currency, format_percentage,
    },
    transaction::Transaction,
};

const TABLE_STYLE: &str = "w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400";
const AMOUNT_CELL_STYLE: &str = "px-6 py-4 text-right tabular-nums";

/// Renders the categories with the highest lifetime spending and their share
/// of `total_spent`.
pub(super) fn top_categories_table(top_categories: &[CategoryTotal], total_spent: f64) -> Markup {
    html! {
        div id="top-categories" class="w-full overflow-x-auto dark:bg-gray-800"
        {
            h3 class="text-xl font-semibold mb-4" { "Top Categories" }

            table class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-3 text-right" { "Spent" }
                        th scope="col" class="px-6 py-3 text-right" { "Share" }
                    }
                }

                tbody
                {
                    @for total in top_categories {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class=(TABLE_CELL_STYLE)
                            {
                                span
                                    class="inline-flex items-center px-2.5 py-0.5 text-xs
                                        font-semibold text-white rounded-full"
                                    style={"background-color: " (total.color)}
                                {
                                    (total.name)
                                }
                            }
                            td class=(AMOUNT_CELL_STYLE) { (format_currency(total.amount)) }
                            td class=(AMOUNT_CELL_STYLE)
                            {
                                (format_percentage(category_share(total.amount, total_spent)))
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the latest transactions, newest first.
pub(super) fn recent_transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div id="recent-transactions" class="w-full overflow-x-auto dark:bg-gray-800"
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h3 class="text-xl font-semibold" { "Recent Transactions" }
                a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "View all" }
            }

            table class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                time datetime=(transaction.date) { (transaction.date) }
                            }
                            td class=(TABLE_CELL_STYLE) { (transaction.description) }
                            td class=(TABLE_CELL_STYLE) { (category_badge(transaction.category())) }
                            td class=(AMOUNT_CELL_STYLE) { (format_currency(transaction.amount)) }
                        }
                    }
                }
            }
        }
    }
}
