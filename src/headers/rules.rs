//! Header rule table and evaluation.

use axum::http::{header, HeaderMap, HeaderValue, Method};
use uuid::Uuid;

use super::{LOCATION_METADATA, X_LINEAGE_ID, X_META_DATA, X_REQUEST_ID};

/// Normalized input to rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRuleContext {
    /// Lower-cased path, always starting with `/`, query string removed.
    pub path: String,
    pub method: Method,
}

impl HeaderRuleContext {
    pub fn new(path: &str, method: Method) -> Self {
        let path = path.split('?').next().unwrap_or_default().to_lowercase();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        Self { path, method }
    }

    fn contains(&self, needle: &str) -> bool {
        self.path.contains(needle)
    }
}

/// What a matching rule does to the header set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderEffect {
    /// Insert a fixed value.
    Static {
        header: &'static str,
        value: &'static str,
    },
    /// Insert a freshly generated identifier unless an earlier rule already did.
    FreshId { header: &'static str },
}

impl HeaderEffect {
    fn apply(&self, headers: &mut HeaderMap) {
        match *self {
            HeaderEffect::Static { header, value } => {
                headers.insert(header, HeaderValue::from_static(value));
            }
            HeaderEffect::FreshId { header } => {
                headers.entry(header).or_insert_with(fresh_id);
            }
        }
    }
}

/// A single partner header requirement.
#[derive(Debug, Clone, Copy)]
pub struct HeaderRule {
    /// Rule identifier for logging.
    pub name: &'static str,
    pub applies: fn(&HeaderRuleContext) -> bool,
    pub effect: HeaderEffect,
}

/// Partner header rules, evaluated in order.
pub static RULES: &[HeaderRule] = &[
    HeaderRule {
        name: "location-hotels-metadata",
        applies: is_location_hotel_list,
        effect: HeaderEffect::Static {
            header: X_META_DATA,
            value: LOCATION_METADATA,
        },
    },
    HeaderRule {
        name: "inventory-search-lineage",
        applies: is_inventory_search,
        effect: HeaderEffect::FreshId {
            header: X_LINEAGE_ID,
        },
    },
    HeaderRule {
        name: "detail-lineage",
        applies: is_detail,
        effect: HeaderEffect::FreshId {
            header: X_LINEAGE_ID,
        },
    },
    HeaderRule {
        name: "booking-lineage",
        applies: is_confirmed_booking,
        effect: HeaderEffect::FreshId {
            header: X_LINEAGE_ID,
        },
    },
];

// `/locations` must not match, so the hotel segment is part of the needle.
fn is_location_hotel_list(ctx: &HeaderRuleContext) -> bool {
    ctx.contains("/location/hotels")
}

fn is_inventory_search(ctx: &HeaderRuleContext) -> bool {
    ctx.contains("search") && !ctx.contains("location")
}

fn is_detail(ctx: &HeaderRuleContext) -> bool {
    ctx.contains("detail")
}

fn is_confirmed_booking(ctx: &HeaderRuleContext) -> bool {
    ctx.contains("book") && !ctx.contains("provisional")
}

/// Derive the partner headers for a hotel relay call.
///
/// Always sets `content-type` and a fresh `x-request-id`; the rule table adds
/// the rest.
pub fn derive_headers(path: &str, method: Method) -> HeaderMap {
    let ctx = HeaderRuleContext::new(path, method);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(X_REQUEST_ID, fresh_id());

    for rule in RULES {
        if (rule.applies)(&ctx) {
            tracing::trace!(rule = rule.name, path = %ctx.path, method = %ctx.method, "Header rule matched");
            rule.effect.apply(&mut headers);
        }
    }

    headers
}

/// A random v4 UUID as a header value.
pub(crate) fn fresh_id() -> HeaderValue {
    let mut buffer = Uuid::encode_buffer();
    let id = Uuid::new_v4().hyphenated().encode_lower(&mut buffer);
    HeaderValue::from_str(id).expect("hyphenated UUID is a valid header value")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::X_META_DATA;

    fn lineage(headers: &HeaderMap) -> Option<&str> {
        headers.get(X_LINEAGE_ID).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_always_sets_content_type_and_request_id() {
        let headers = derive_headers("/hotels/api/v1/content", Method::GET);
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
        let id = headers.get(X_REQUEST_ID).unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_fresh_id_is_lowercase_hyphenated_uuid() {
        let value = fresh_id();
        let id = value.to_str().unwrap();
        assert_eq!(id.len(), 36);
        assert_eq!(id, id.to_lowercase());
        assert_eq!(Uuid::parse_str(id).unwrap().get_version_num(), 4);
    }

    #[test]
    fn test_request_ids_are_fresh() {
        let a = derive_headers("/x", Method::GET);
        let b = derive_headers("/x", Method::GET);
        assert_ne!(a.get(X_REQUEST_ID), b.get(X_REQUEST_ID));
    }

    #[test]
    fn test_metadata_only_on_location_hotel_list() {
        let listing = derive_headers("/hotels/api/v2/location/hotels", Method::GET);
        assert_eq!(listing.get(X_META_DATA).unwrap(), LOCATION_METADATA);

        let bare = derive_headers("/location/hotels", Method::GET);
        assert!(bare.contains_key(X_META_DATA));

        let locations = derive_headers("/locations", Method::GET);
        assert!(!locations.contains_key(X_META_DATA));

        let location_root = derive_headers("/hotels/api/v2/location", Method::GET);
        assert!(!location_root.contains_key(X_META_DATA));
    }

    #[test]
    fn test_path_is_case_insensitive_and_slash_tolerant() {
        let headers = derive_headers("Hotels/API/Location/Hotels?cityId=1", Method::GET);
        assert!(headers.contains_key(X_META_DATA));
    }

    #[test]
    fn test_lineage_on_inventory_paths() {
        for path in [
            "/hotels/api/v1/search",
            "/hotels/api/v1/hotel-detail",
            "/hotels/api/v1/details/123",
            "/hotels/api/v1/book",
            "/hotels/api/v1/booking/confirm",
        ] {
            let headers = derive_headers(path, Method::POST);
            assert!(lineage(&headers).is_some(), "expected lineage on {}", path);
        }
    }

    #[test]
    fn test_no_lineage_on_excluded_paths() {
        for path in [
            "/hotels/api/v1/provisional-book",
            "/hotels/api/v1/locations/search",
            "/hotels/api/v1/location-search?q=goa",
            "/hotels/api/v1/locations",
            "/hotels/api/v1/content",
        ] {
            let headers = derive_headers(path, Method::POST);
            assert!(lineage(&headers).is_none(), "unexpected lineage on {}", path);
        }
    }

    #[test]
    fn test_query_string_does_not_trigger_rules() {
        let headers = derive_headers("/hotels/api/v1/content?next=search", Method::GET);
        assert!(lineage(&headers).is_none());
    }

    #[test]
    fn test_lineage_distinct_per_call_and_from_request_id() {
        let a = derive_headers("/hotels/api/v1/search", Method::POST);
        let b = derive_headers("/hotels/api/v1/search", Method::POST);
        assert_ne!(lineage(&a), lineage(&b));
        assert_ne!(lineage(&a), a.get(X_REQUEST_ID).and_then(|v| v.to_str().ok()));
    }

    #[test]
    fn test_lineage_set_once_when_several_rules_match() {
        let headers = derive_headers("/search/detail/book", Method::POST);
        assert_eq!(headers.get_all(X_LINEAGE_ID).iter().count(), 1);
    }
}
