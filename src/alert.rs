//! Alert messages shown to the user after a form submission.
//!
//! Alerts are rendered as HTML fragments that HTMX swaps into the
//! `#alert-container` element defined in [crate::html::base].

use maud::{Markup, html};

/// A success or error message with some details.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The operation succeeded.
    Success {
        /// A short headline.
        message: String,
        /// A longer explanation.
        details: String,
    },
    /// The operation failed.
    Error {
        /// A short headline.
        message: String,
        /// A longer explanation, ideally telling the user how to fix the problem.
        details: String,
    },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::Success { message, details } => (
                "border-green-300 bg-green-50 text-green-800 \
                dark:border-green-800 dark:bg-gray-800 dark:text-green-400",
                message,
                details,
            ),
            Alert::Error { message, details } => (
                "border-red-300 bg-red-50 text-red-800 \
                dark:border-red-800 dark:bg-gray-800 dark:text-red-400",
                message,
                details,
            ),
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    role="alert"
                    class={"p-4 mb-4 text-sm border rounded-lg " (container_style)}
                {
                    div class="flex items-center justify-between"
                    {
                        span class="font-medium" { (message) }

                        button
                            type="button"
                            class="ms-4 font-bold"
                            aria-label="Close"
                            onclick="this.closest('[role=alert]').remove()"
                        {
                            "×"
                        }
                    }

                    @if !details.is_empty() {
                        p class="mt-1" { (details) }
                    }
                }
            }
        }
    }
}
