use super::response::ApiError;

const SHOP_DOMAIN_SUFFIX: &str = ".myshopify.com";

/// Validates a shop domain of the form `<subdomain>.myshopify.com`.
pub fn validate_shop_domain(shop: &str) -> Result<(), ApiError> {
    let Some(subdomain) = shop.strip_suffix(SHOP_DOMAIN_SUFFIX) else {
        return Err(invalid_domain());
    };

    if subdomain.is_empty()
        || !subdomain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(invalid_domain());
    }

    Ok(())
}

fn invalid_domain() -> ApiError {
    ApiError::bad_request("Invalid shop domain. Must be a .myshopify.com domain")
}
