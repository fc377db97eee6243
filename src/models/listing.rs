use serde::{Deserialize, Serialize};

use crate::Route;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "imageUrls", default)]
    pub image_urls: Vec<String>,
}

impl Listing {
    pub fn cover(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }

    pub fn detail_route(&self) -> Route {
        Route::Listing {
            id: self.id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yew_router::Routable;

    #[test]
    fn reads_listing_document() {
        let body = r#"{
            "_id": "l-1",
            "name": "Cottage by the lake",
            "imageUrls": ["https://cdn.example.com/a.jpg", "https://cdn.example.com/b.jpg"],
            "regularPrice": 1200,
            "userRef": "65a1"
        }"#;
        let listing: Listing = serde_json::from_str(body).unwrap();
        assert_eq!(listing.id, "l-1");
        assert_eq!(listing.cover(), Some("https://cdn.example.com/a.jpg"));
    }

    #[test]
    fn listing_without_images_has_no_cover() {
        let listing: Listing = serde_json::from_str(r#"{ "_id": "l-2", "name": "Lot" }"#).unwrap();
        assert_eq!(listing.cover(), None);
    }

    #[test]
    fn detail_route_points_at_listing_page() {
        let listing = Listing {
            id: "l-1".to_string(),
            name: "Cottage".to_string(),
            image_urls: vec![],
        };
        assert_eq!(listing.detail_route().to_path(), "/listing/l-1");
    }
}
