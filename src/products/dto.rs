use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Absent means "keep the stored image url".
    pub image_url: Option<String>,
}

pub fn validate_fields(name: &str, price: f64) -> Result<(), ApiError> {
    if name.trim().chars().count() < 2 {
        return Err(ApiError::Validation(
            "Name must be at least 2 characters".into(),
        ));
    }
    // Also rejects NaN.
    if !(price >= 0.0) {
        return Err(ApiError::Validation("Price cannot be negative".into()));
    }
    Ok(())
}
