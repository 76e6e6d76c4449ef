use crate::models::Brand;

/// Client-side search over the loaded list.
///
/// A brand matches when its name or its company's name contains `text`,
/// ignoring case. An empty `text` matches every brand. Order is preserved.
pub fn search_brands<'a>(brands: &'a [Brand], text: &str) -> Vec<&'a Brand> {
    if text.is_empty() {
        return brands.iter().collect();
    }
    let needle = text.to_lowercase();
    brands
        .iter()
        .filter(|brand| brand.matches_search(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brand(id: i64, name: &str, chain: &str) -> Brand {
        Brand {
            brand_id: id,
            brand_name: name.to_string(),
            chain_id: id * 10,
            chain_name: chain.to_string(),
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn matches_name_or_company_ignoring_case() {
        let brands = vec![brand(1, "Alpha", "Acme"), brand(2, "Beta", "Globex")];

        let ids = |text: &str| {
            search_brands(&brands, text)
                .into_iter()
                .map(|b| b.brand_id)
                .collect::<Vec<_>>()
        };

        assert_eq!(ids("alp"), vec![1]);
        assert_eq!(ids("GLOB"), vec![2]);
        assert_eq!(ids("a"), vec![1, 2]);
        assert_eq!(ids(""), vec![1, 2]);
        assert!(ids("zeta").is_empty());
    }
}
