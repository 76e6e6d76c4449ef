use serde::{Deserialize, Serialize};

use super::{BrandId, ChainId, ServerTimestamp};

/// A brand as returned by the server.
///
/// `brand_id`, `chain_name` and the timestamps are owned by the server; the
/// client only displays them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub brand_id: BrandId,
    pub brand_name: String,
    pub chain_id: ChainId,
    #[serde(default)]
    pub chain_name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<ServerTimestamp>,
    #[serde(default)]
    pub updated_at: Option<ServerTimestamp>,
}

impl Brand {
    /// Case-insensitive substring match on the brand name or its company name.
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        self.brand_name.to_lowercase().contains(needle_lower)
            || self.chain_name.to_lowercase().contains(needle_lower)
    }
}

fn default_active() -> bool {
    true
}

/// Body of `POST /brands`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrandRequest {
    pub brand_name: String,
    pub chain_id: ChainId,
}

/// Body of `PUT /brands/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBrandRequest {
    pub brand_name: String,
    pub chain_id: ChainId,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_server_brand() {
        let brand: Brand = serde_json::from_value(json!({
            "brandId": 7,
            "brandName": "Alpha",
            "chainId": 2,
            "chainName": "Acme",
            "isActive": true,
            "createdAt": "2024-03-05T10:15:30",
            "updatedAt": null
        }))
        .unwrap();

        assert_eq!(brand.brand_id, 7);
        assert_eq!(brand.chain_name, "Acme");
        assert_eq!(
            brand.created_at.as_ref().map(|ts| ts.as_str()),
            Some("2024-03-05T10:15:30")
        );
        assert!(brand.updated_at.is_none());
    }

    #[test]
    fn missing_active_flag_defaults_to_true() {
        let brand: Brand = serde_json::from_value(json!({
            "brandId": 1,
            "brandName": "Beta",
            "chainId": 4
        }))
        .unwrap();
        assert!(brand.is_active);
        assert_eq!(brand.chain_name, "");
    }

    #[test]
    fn request_bodies_use_camel_case() {
        let create = serde_json::to_value(CreateBrandRequest {
            brand_name: "Alpha".into(),
            chain_id: 3,
        })
        .unwrap();
        assert_eq!(create, json!({"brandName": "Alpha", "chainId": 3}));

        let update = serde_json::to_value(UpdateBrandRequest {
            brand_name: "Alpha".into(),
            chain_id: 3,
            is_active: false,
        })
        .unwrap();
        assert_eq!(
            update,
            json!({"brandName": "Alpha", "chainId": 3, "isActive": false})
        );
    }
}
