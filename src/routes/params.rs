use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::Statut;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

// Pagination fields are declared inline rather than through a flattened
// struct: serde_urlencoded hands flattened values to serde as strings, which
// fails Option<i64> deserialization and turns every ?page= request into a 400.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CommandeListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Canonical statut label, e.g. "Validée Par Assistant".
    pub statut: Option<Statut>,
    pub sort_order: Option<SortOrder>,
}

impl CommandeListQuery {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    fn parse(uri: &str) -> CommandeListQuery {
        let uri: Uri = uri.parse().unwrap();
        let Query(query) = Query::<CommandeListQuery>::try_from_uri(&uri).unwrap();
        query
    }

    #[test]
    fn numeric_pagination_params_deserialize() {
        let query = parse("/api/commandes?page=2&per_page=10&sort_order=asc");
        assert_eq!(query.page, Some(2));
        assert_eq!(query.per_page, Some(10));
        assert_eq!(query.normalize(), (2, 10, 10));
    }

    #[test]
    fn statut_filter_deserializes_from_canonical_label() {
        // "Acceptée", percent-encoded.
        let query = parse("/api/commandes?statut=Accept%C3%A9e");
        assert_eq!(query.statut, Some(Statut::Acceptee));
    }

    #[test]
    fn missing_params_fall_back_to_defaults() {
        let query = parse("/api/commandes");
        assert_eq!(query.normalize(), (1, 20, 0));
        assert!(query.statut.is_none());
    }

    #[test]
    fn out_of_range_pagination_is_clamped() {
        let query = parse("/api/commandes?page=0&per_page=1000");
        assert_eq!(query.normalize(), (1, 100, 0));
    }
}
