//! # Catalog
//!
//! Read-only reference data the selectors filter and display: contact lists,
//! individual contacts and products with their variants.
//!
//! The built-in catalog is static mock data. A JSON file with the same shape
//! can replace it at startup (see [`load_catalog`]).
//!
//! List `count` values are the only source of recipient totals. Nothing else
//! in the crate keeps its own copy of those numbers.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContactList {
    pub id: String,
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Variant {
    pub id: String,
    pub name: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub price: String,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Product {
    /// Look up one of this product's variants by id.
    pub fn variant(&self, variant_id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }
}

/// All reference data, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Catalog {
    #[serde(default)]
    pub lists: Vec<ContactList>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Catalog {
    pub fn list(&self, id: &str) -> Option<&ContactList> {
        self.lists.iter().find(|l| l.id == id)
    }

    pub fn contact(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Resolve a variant only if it belongs to the given product.
    pub fn variant(&self, product_id: &str, variant_id: &str) -> Option<&Variant> {
        self.product(product_id)?.variant(variant_id)
    }

    /// The mock data set shipped with the binary.
    pub fn builtin() -> Self {
        let list = |id: &str, count| ContactList {
            id: id.to_string(),
            name: id.to_string(),
            count,
        };
        let contact = |id: &str, name: &str, phone: &str| Contact {
            id: id.to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
        };
        let variant = |id: &str, name: &str, price: &str| Variant {
            id: id.to_string(),
            name: name.to_string(),
            price: price.to_string(),
        };
        let product = |id: &str, name: &str, price: &str, variants| Product {
            id: id.to_string(),
            name: name.to_string(),
            image: PLACEHOLDER_IMAGE.to_string(),
            price: price.to_string(),
            variants,
        };

        Self {
            lists: vec![
                list("join", 557),
                list("tt", 261),
                list("mcp", 817),
                list("devteam", 2),
            ],
            contacts: vec![
                contact("contact1", "Teobaldo Vásquez", "+13057838505"),
                contact("contact2", "Donald J Paulin", "+14016179944"),
                contact("contact3", "Tom Emigh", "+16164819185"),
                contact("contact4", "Richard O'Neill", "+12026029943"),
                contact("contact5", "Donald Williams", "+19077381427"),
                contact("contact6", "María García", "+15551234567"),
                contact("contact7", "Carlos López", "+15559876543"),
                contact("contact8", "Ana Martínez", "+15555555555"),
            ],
            products: vec![
                product(
                    "prod1",
                    "Smartphone Pro Max",
                    "$999.99",
                    vec![
                        variant("var1", "128GB Negro", "$999.99"),
                        variant("var2", "256GB Negro", "$1099.99"),
                        variant("var3", "128GB Blanco", "$999.99"),
                    ],
                ),
                product(
                    "prod2",
                    "Laptop Gaming Ultra",
                    "$1599.99",
                    vec![
                        variant("var4", "16GB RAM - RTX 4060", "$1599.99"),
                        variant("var5", "32GB RAM - RTX 4070", "$1899.99"),
                    ],
                ),
                product(
                    "prod3",
                    "Audífonos Inalámbricos",
                    "$299.99",
                    vec![
                        variant("var6", "Negro", "$299.99"),
                        variant("var7", "Blanco", "$299.99"),
                        variant("var8", "Azul", "$319.99"),
                    ],
                ),
            ],
        }
    }
}

const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=60&width=60";

// ============================================================================
// Filtering
// ============================================================================

fn name_matches(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

/// Lists whose name contains `query`, ignoring case. Empty query keeps all.
pub fn filter_lists<'a>(lists: &'a [ContactList], query: &str) -> Vec<&'a ContactList> {
    lists.iter().filter(|l| name_matches(&l.name, query)).collect()
}

/// Contacts whose name contains `query` ignoring case, or whose phone
/// contains it verbatim.
pub fn filter_contacts<'a>(contacts: &'a [Contact], query: &str) -> Vec<&'a Contact> {
    contacts
        .iter()
        .filter(|c| name_matches(&c.name, query) || c.phone.contains(query))
        .collect()
}

pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| name_matches(&p.name, query))
        .collect()
}

// ============================================================================
// Loading
// ============================================================================

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "catalog I/O error: {e}"),
            CatalogError::Parse(e) => write!(f, "catalog parse error: {e}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Parse a catalog from its JSON representation.
pub fn parse_catalog(json: &str) -> Result<Catalog, CatalogError> {
    serde_json::from_str(json).map_err(CatalogError::Parse)
}

/// Read a JSON catalog file.
pub fn read_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let contents = fs::read_to_string(path).map_err(CatalogError::Io)?;
    parse_catalog(&contents)
}

/// Load the catalog for this run: the file if one is configured and readable,
/// otherwise the built-in data.
pub fn load_catalog(path: Option<&Path>) -> Catalog {
    let Some(path) = path else {
        return Catalog::builtin();
    };
    match read_catalog(path) {
        Ok(catalog) => {
            info!(
                "Loaded catalog from {} ({} lists, {} contacts, {} products)",
                path.display(),
                catalog.lists.len(),
                catalog.contacts.len(),
                catalog.products.len()
            );
            catalog
        }
        Err(e) => {
            warn!(
                "Failed to load catalog {}: {}. Using built-in catalog",
                path.display(),
                e
            );
            Catalog::builtin()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_returns_everything() {
        let catalog = Catalog::builtin();
        assert_eq!(filter_lists(&catalog.lists, "").len(), 4);
        assert_eq!(filter_contacts(&catalog.contacts, "").len(), 8);
        assert_eq!(filter_products(&catalog.products, "").len(), 3);
    }

    #[test]
    fn test_list_filter_ignores_case() {
        let catalog = Catalog::builtin();
        let found = filter_lists(&catalog.lists, "MC");
        let ids: Vec<&str> = found.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["mcp"]);
    }

    #[test]
    fn test_contact_filter_matches_name_or_phone() {
        let catalog = Catalog::builtin();

        let by_name = filter_contacts(&catalog.contacts, "donald");
        let ids: Vec<&str> = by_name.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["contact2", "contact5"]);

        let by_phone = filter_contacts(&catalog.contacts, "+1555");
        let ids: Vec<&str> = by_phone.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["contact6", "contact7", "contact8"]);
    }

    #[test]
    fn test_contact_filter_handles_accents() {
        let catalog = Catalog::builtin();
        let found = filter_contacts(&catalog.contacts, "GARCÍA");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "contact6");
    }

    #[test]
    fn test_filter_is_exact_subset() {
        // Every query yields exactly the catalog entries that match it.
        let catalog = Catalog::builtin();
        for query in ["", "o", "ON", "zzz", "+1", "555", "a", "PRO", "team", "í"] {
            let lowered = query.to_lowercase();

            let expected: Vec<&Contact> = catalog
                .contacts
                .iter()
                .filter(|c| c.name.to_lowercase().contains(&lowered) || c.phone.contains(query))
                .collect();
            assert_eq!(filter_contacts(&catalog.contacts, query), expected);

            let expected: Vec<&ContactList> = catalog
                .lists
                .iter()
                .filter(|l| l.name.to_lowercase().contains(&lowered))
                .collect();
            assert_eq!(filter_lists(&catalog.lists, query), expected);

            let expected: Vec<&Product> = catalog
                .products
                .iter()
                .filter(|p| p.name.to_lowercase().contains(&lowered))
                .collect();
            assert_eq!(filter_products(&catalog.products, query), expected);
        }
    }

    #[test]
    fn test_no_match_is_empty() {
        let catalog = Catalog::builtin();
        assert!(filter_products(&catalog.products, "tablet").is_empty());
    }

    #[test]
    fn test_product_filter() {
        let catalog = Catalog::builtin();
        let found = filter_products(&catalog.products, "laptop");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "prod2");
    }

    #[test]
    fn test_variant_lookup_is_scoped_to_product() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.variant("prod1", "var2").map(|v| v.name.as_str()),
            Some("256GB Negro")
        );
        assert!(catalog.variant("prod2", "var2").is_none());
        assert!(catalog.variant("gone", "var2").is_none());
    }

    #[test]
    fn test_parse_sparse_catalog() {
        let json = r#"{ "lists": [{ "id": "vip", "name": "VIP", "count": 12 }] }"#;
        let catalog = parse_catalog(json).unwrap();
        assert_eq!(catalog.list("vip").map(|l| l.count), Some(12));
        assert!(catalog.contacts.is_empty());
        assert!(catalog.products.is_empty());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = parse_catalog("{ not json").unwrap_err();
        assert!(err.to_string().starts_with("catalog parse error"));
    }

    #[test]
    fn test_missing_file_falls_back_to_builtin() {
        let catalog = load_catalog(Some(Path::new("/definitely/not/here.json")));
        assert_eq!(catalog, Catalog::builtin());
    }
}
