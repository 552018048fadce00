//! Core records exchanged with the portal backend.
//!
//! This module defines every type that crosses the wire between the
//! client and the REST API, plus the persisted shape of the signed-in
//! user. The backend speaks camelCase JSON, so the wire-facing types
//! carry `#[serde(rename_all = "camelCase")]` where field names differ.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// The two account kinds the portal knows about.
///
/// The role shows up in three places, all with the lowercase spelling:
/// - in URL paths (`/auth/enhanced/login/doctor`),
/// - as the key of the role-specific record in login responses
///   (`{ "token": ..., "doctor": {...} }`),
/// - inside the persisted [`User`] record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// A practitioner account.
    Doctor,
    /// A patient account.
    Client,
}

impl UserRole {
    /// The lowercase wire spelling, as used in URL paths and JSON keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// User records
// ---------------------------------------------------------------------------

/// The role-specific account record as the backend returns it.
///
/// Only the fields every account carries are typed. Everything else —
/// `ville`, `telephone`, `specialite`, `default_price`, whatever a
/// given role's record includes — lands in `extra` via
/// `#[serde(flatten)]`, so no backend field is ever dropped on a
/// deserialize/serialize round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Backend-assigned account id.
    pub id: i64,

    /// Display name.
    pub nom: String,

    /// Contact email. Not all endpoints include it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Every other field of the record, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A signed-in user: a profile tagged with the role it signed in as.
///
/// This is the shape persisted under the `user` storage key and held in
/// the authenticated session state. Serialized, the role sits alongside
/// the profile fields (`{"id":5,"nom":"A","role":"client",...}`) —
/// the same flat object the original portal stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Which side of the portal this account belongs to.
    pub role: UserRole,

    /// The account record itself.
    #[serde(flatten)]
    pub profile: UserProfile,
}

// ---------------------------------------------------------------------------
// Authentication flows
// ---------------------------------------------------------------------------

/// The state needed to finish a login whose first factor was accepted
/// but whose second factor is still outstanding.
///
/// The backend hands this back instead of a real token. Holding on to
/// it lets the client complete the second factor without re-sending the
/// password. It is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaChallenge {
    /// Short-lived credential proving the first factor succeeded.
    pub temp_token: String,
    /// Account the challenge belongs to.
    pub user_id: i64,
    /// Role the login was attempted as.
    pub user_type: UserRole,
}

/// The request body for completing a second factor.
///
/// Wire field names follow the backend: the authenticator code travels
/// as `token`, the first-factor proof as `tempToken`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaVerification {
    pub user_id: i64,
    pub user_type: UserRole,
    /// The 6-digit authenticator code (passed through unvalidated —
    /// format checks are the presentation layer's job).
    pub token: String,
    pub temp_token: String,
}

/// A freshly issued credential plus the account record it belongs to.
///
/// Produced by successful logins and registrations. The profile is not
/// yet tagged with a role — the session layer merges in the role the
/// caller asked for, mirroring how the original portal spread
/// `{ ...userData, role }` before storing it.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthPayload {
    /// Opaque bearer token for subsequent requests.
    pub token: String,
    /// The role-specific account record.
    pub profile: UserProfile,
}

/// What a login attempt can come back with (short of an error).
///
/// Either the backend issued a session outright, or it wants a second
/// factor first. A sum type rather than a struct of optionals, so the
/// session layer can't half-handle a branch.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginResponse {
    /// Credentials accepted, session issued.
    Authenticated(AuthPayload),
    /// Credentials accepted, second factor outstanding.
    MfaRequired(MfaChallenge),
}

/// The response to a successful second-factor verification.
///
/// Unlike login, the verify endpoint returns the user record under a
/// fixed `user` key, role included.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MfaVerifyResponse {
    pub token: String,
    pub user: User,
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// A registration form, passed through to the backend uninterpreted.
///
/// Field-format validation (email shape, password length, phone format)
/// happens in the presentation layer before this is built. Role-specific
/// fields — `specialite` and `default_price` for doctors, for example —
/// ride in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub nom: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ville: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// MFA management (settings surface)
// ---------------------------------------------------------------------------

/// Enrollment material returned when an account turns on MFA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaSetup {
    /// The shared secret, for manual entry into an authenticator app.
    pub secret: String,
    /// A data-URI QR code encoding the otpauth URL.
    pub qr_code: String,
}

/// One entry of the account's authentication history.
///
/// The backend owns this record's shape; only the fields the settings
/// page renders are typed, the rest is preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthLogEntry {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Tests for the wire shapes.
    //!
    //! The backend's JSON is the contract. These tests pin the exact
    //! field names and spellings our serde attributes produce, because
    //! a mismatch means the backend can't parse our requests (or we
    //! can't parse its responses).

    use super::*;

    fn profile(id: i64, nom: &str) -> UserProfile {
        UserProfile {
            id,
            nom: nom.to_string(),
            email: None,
            extra: Map::new(),
        }
    }

    // =====================================================================
    // UserRole
    // =====================================================================

    #[test]
    fn test_user_role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&UserRole::Doctor).unwrap(),
            "\"doctor\""
        );
        assert_eq!(
            serde_json::to_string(&UserRole::Client).unwrap(),
            "\"client\""
        );
    }

    #[test]
    fn test_user_role_deserializes_from_lowercase() {
        let role: UserRole = serde_json::from_str("\"client\"").unwrap();
        assert_eq!(role, UserRole::Client);
    }

    #[test]
    fn test_user_role_rejects_unknown_value() {
        let result: Result<UserRole, _> = serde_json::from_str("\"admin\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_user_role_display_matches_wire_spelling() {
        assert_eq!(UserRole::Doctor.to_string(), "doctor");
        assert_eq!(UserRole::Client.to_string(), "client");
    }

    // =====================================================================
    // UserProfile / User
    // =====================================================================

    #[test]
    fn test_user_profile_preserves_unknown_fields() {
        // Role-specific fields we don't type must survive a round trip.
        let json = r#"{
            "id": 7,
            "nom": "Dr. Mortimer",
            "email": "m@clinic.example",
            "specialite": "cardiology",
            "default_price": 80
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.id, 7);
        assert_eq!(profile.nom, "Dr. Mortimer");
        assert_eq!(profile.email.as_deref(), Some("m@clinic.example"));
        assert_eq!(profile.extra["specialite"], "cardiology");
        assert_eq!(profile.extra["default_price"], 80);

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["specialite"], "cardiology");
        assert_eq!(back["default_price"], 80);
    }

    #[test]
    fn test_user_profile_email_is_optional() {
        // Login responses sometimes omit the email entirely.
        let profile: UserProfile =
            serde_json::from_str(r#"{"id":5,"nom":"A"}"#).unwrap();
        assert_eq!(profile.email, None);

        // And `None` must not serialize as `"email": null`.
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("email").is_none());
    }

    #[test]
    fn test_user_serializes_flat_with_role() {
        // The persisted user is one flat object, role alongside the
        // profile fields — the same shape the storage key always held.
        let user = User {
            role: UserRole::Client,
            profile: profile(5, "A"),
        };
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["role"], "client");
        assert_eq!(json["id"], 5);
        assert_eq!(json["nom"], "A");
    }

    #[test]
    fn test_user_round_trips_through_storage_shape() {
        let mut extra = Map::new();
        extra.insert("ville".into(), "Lyon".into());
        let user = User {
            role: UserRole::Doctor,
            profile: UserProfile {
                id: 2,
                nom: "B".into(),
                email: Some("b@x.example".into()),
                extra,
            },
        };

        let raw = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&raw).unwrap();
        assert_eq!(user, back);
    }

    // =====================================================================
    // MFA types
    // =====================================================================

    #[test]
    fn test_mfa_challenge_uses_camel_case() {
        let json = r#"{"tempToken":"X","userId":5,"userType":"client"}"#;
        let challenge: MfaChallenge = serde_json::from_str(json).unwrap();

        assert_eq!(challenge.temp_token, "X");
        assert_eq!(challenge.user_id, 5);
        assert_eq!(challenge.user_type, UserRole::Client);
    }

    #[test]
    fn test_mfa_verification_wire_shape() {
        // The verify endpoint expects exactly these four camelCase keys,
        // with the authenticator code under `token`.
        let attempt = MfaVerification {
            user_id: 5,
            user_type: UserRole::Client,
            token: "123456".into(),
            temp_token: "X".into(),
        };
        let json = serde_json::to_value(&attempt).unwrap();

        assert_eq!(json["userId"], 5);
        assert_eq!(json["userType"], "client");
        assert_eq!(json["token"], "123456");
        assert_eq!(json["tempToken"], "X");
        assert_eq!(json.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_mfa_verify_response_user_carries_role() {
        let json = r#"{
            "token": "T2",
            "user": { "id": 5, "nom": "A", "role": "client" }
        }"#;
        let resp: MfaVerifyResponse = serde_json::from_str(json).unwrap();

        assert_eq!(resp.token, "T2");
        assert_eq!(resp.user.role, UserRole::Client);
        assert_eq!(resp.user.profile.id, 5);
    }

    #[test]
    fn test_mfa_setup_parses_qr_code_key() {
        let json = r#"{"secret":"JBSWY3DP","qrCode":"data:image/png;base64,AAAA"}"#;
        let setup: MfaSetup = serde_json::from_str(json).unwrap();
        assert_eq!(setup.secret, "JBSWY3DP");
        assert!(setup.qr_code.starts_with("data:image/png"));
    }

    // =====================================================================
    // Registration
    // =====================================================================

    #[test]
    fn test_registration_carries_role_specific_fields() {
        let mut extra = Map::new();
        extra.insert("specialite".into(), "dermatology".into());
        let form = Registration {
            nom: "Dr. C".into(),
            email: "c@x.example".into(),
            password: "longenough".into(),
            telephone: Some("+33123456789".into()),
            ville: None,
            extra,
        };
        let json = serde_json::to_value(&form).unwrap();

        assert_eq!(json["specialite"], "dermatology");
        assert_eq!(json["telephone"], "+33123456789");
        assert!(json.get("ville").is_none());
    }

    // =====================================================================
    // AuthLogEntry
    // =====================================================================

    #[test]
    fn test_auth_log_entry_tolerates_sparse_records() {
        let entry: AuthLogEntry =
            serde_json::from_str(r#"{"action":"login"}"#).unwrap();
        assert_eq!(entry.action, "login");
        assert_eq!(entry.created_at, None);
        assert_eq!(entry.ip_address, None);
    }
}
