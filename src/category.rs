//! The fixed set of spending categories.
//!
//! Categories are not user-editable. Transactions and budgets refer to a
//! category by its string ID, and any ID that is not in the registry is
//! treated as [OTHER] when it is read back. Lookups therefore never fail.

use axum::{http::StatusCode, response::Response};
use serde::Serialize;

use crate::api;

/// A label for classifying transactions, with a color used as a display hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// The ID stored on transactions and budgets, e.g. "groceries".
    pub id: &'static str,
    /// The human readable name, e.g. "Groceries".
    pub name: &'static str,
    /// A hex color string, e.g. "#4CAF50".
    pub color: &'static str,
}

/// The catch-all category used for unknown category IDs.
pub const OTHER: Category = Category {
    id: "other",
    name: "Other",
    color: "#9E9E9E",
};

/// Every category, in display order. [OTHER] is always last.
pub const CATEGORIES: [Category; 11] = [
    Category {
        id: "groceries",
        name: "Groceries",
        color: "#4CAF50",
    },
    Category {
        id: "transportation",
        name: "Transportation",
        color: "#2196F3",
    },
    Category {
        id: "utilities",
        name: "Utilities",
        color: "#FF9800",
    },
    Category {
        id: "housing",
        name: "Housing",
        color: "#9C27B0",
    },
    Category {
        id: "entertainment",
        name: "Entertainment",
        color: "#E91E63",
    },
    Category {
        id: "healthcare",
        name: "Healthcare",
        color: "#00BCD4",
    },
    Category {
        id: "dining",
        name: "Dining",
        color: "#F44336",
    },
    Category {
        id: "education",
        name: "Education",
        color: "#3F51B5",
    },
    Category {
        id: "shopping",
        name: "Shopping",
        color: "#795548",
    },
    Category {
        id: "travel",
        name: "Travel",
        color: "#607D8B",
    },
    OTHER,
];

/// Categories whose spending is considered optional and worth cutting back on.
pub const DISCRETIONARY_CATEGORY_IDS: [&str; 3] = ["entertainment", "dining", "shopping"];

/// Get the category with the ID `id`, or [OTHER] if there is no such category.
pub fn lookup_category(id: &str) -> &'static Category {
    CATEGORIES
        .iter()
        .find(|category| category.id == id)
        .unwrap_or(&OTHER)
}

/// A route handler that responds with every category, in display order.
pub async fn get_categories_endpoint() -> Response {
    api::ok(StatusCode::OK, CATEGORIES)
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::endpoints;

    use super::{
        CATEGORIES, DISCRETIONARY_CATEGORY_IDS, OTHER, get_categories_endpoint, lookup_category,
    };

    #[test]
    fn finds_known_category() {
        let category = lookup_category("dining");

        assert_eq!(category.name, "Dining");
        assert_eq!(category.color, "#F44336");
    }

    #[test]
    fn unknown_id_falls_back_to_other() {
        assert_eq!(lookup_category("crypto"), &OTHER);
        assert_eq!(lookup_category(""), &OTHER);
    }

    #[test]
    fn other_is_last() {
        assert_eq!(CATEGORIES.last(), Some(&OTHER));
    }

    #[test]
    fn ids_are_unique() {
        for (i, category) in CATEGORIES.iter().enumerate() {
            assert!(
                CATEGORIES[i + 1..].iter().all(|c| c.id != category.id),
                "duplicate category ID {}",
                category.id
            );
        }
    }

    #[test]
    fn discretionary_categories_are_known() {
        for id in DISCRETIONARY_CATEGORY_IDS {
            assert_eq!(lookup_category(id).id, id, "{id} is not a known category");
        }
    }

    #[tokio::test]
    async fn api_lists_registry_in_order() {
        let app = Router::new().route(endpoints::CATEGORIES_API, get(get_categories_endpoint));
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let body = server.get(endpoints::CATEGORIES_API).await.json::<Value>();

        assert_eq!(body["success"], json!(true));
        let categories = body["data"].as_array().unwrap();
        assert_eq!(categories.len(), CATEGORIES.len());
        assert_eq!(
            categories[0],
            json!({"id": "groceries", "name": "Groceries", "color": "#4CAF50"})
        );
        assert_eq!(categories.last().unwrap()["id"], json!("other"));
    }
}
