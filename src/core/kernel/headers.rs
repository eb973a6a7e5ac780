use crate::core::kernel::signer::AuthHeaders;

pub const CONTENT_TYPE_HEADER: &str = "content-type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Headers for one dispatch: content type first, then the auth values if signed.
pub fn build_headers(auth: Option<&AuthHeaders>) -> Vec<(String, String)> {
    let mut headers = vec![(CONTENT_TYPE_HEADER.to_string(), JSON_CONTENT_TYPE.to_string())];

    if let Some(auth) = auth {
        headers.extend(
            auth.to_pairs()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value)),
        );
    }

    headers
}
