use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollMfaResponse {
    /// Base32 secret for manual entry into an authenticator app.
    pub secret: String,
    /// otpauth:// URL for QR-code display on the client.
    pub otpauth_url: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyMfaRequest {
    #[validate(length(equal = 6))]
    #[schema(example = "123456")]
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MfaStatusResponse {
    pub mfa_enabled: bool,
}
