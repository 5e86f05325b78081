use axum::{
    async_trait,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

use super::json::ApiJson;

/// Drop empty-string values from every object nested one level under the body root.
///
/// `{"recipe": {"name": "", "cuisine": "thai"}}` becomes `{"recipe": {"cuisine": "thai"}}`,
/// so a blank form field never clears a stored value.
pub fn remove_blank_fields(body: &mut Value) {
    if let Value::Object(top) = body {
        for value in top.values_mut() {
            if let Value::Object(fields) = value {
                fields.retain(|_, v| v.as_str() != Some(""));
            }
        }
    }
}

/// JSON body extractor that applies [`remove_blank_fields`] before deserializing
#[derive(Debug)]
pub struct NonBlankJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for NonBlankJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let ApiJson(mut body) = ApiJson::<Value>::from_request(req, state).await?;

        remove_blank_fields(&mut body);

        serde_json::from_value(body)
            .map(NonBlankJson)
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_empty_strings_from_nested_objects() {
        let mut body = json!({ "recipe": { "name": "", "cuisine": "thai", "calories": 0 } });
        remove_blank_fields(&mut body);
        assert_eq!(body, json!({ "recipe": { "cuisine": "thai", "calories": 0 } }));
    }

    #[test]
    fn keeps_whitespace_false_and_null_values() {
        let mut body = json!({ "recipe": { "name": " ", "favorite": false, "type": null } });
        let expected = body.clone();
        remove_blank_fields(&mut body);
        assert_eq!(body, expected);
    }

    #[test]
    fn leaves_top_level_scalars_alone() {
        let mut body = json!({ "note": "", "recipe": {} });
        remove_blank_fields(&mut body);
        assert_eq!(body, json!({ "note": "", "recipe": {} }));
    }
}
