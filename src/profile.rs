//! Profile read/update and password change

use serde_json::Value;

use crate::api::client::{checked, payload};
use crate::api::types::{PasswordChange, ProfileUpdate, User};
use crate::api::{ApiClient, PASSWORD_ENDPOINT, PROFILE_ENDPOINT};
use crate::error::{LinkrecError, Result};

/// Profile operations for the logged-in user.
///
/// Every call requires a session; without one it fails with
/// [`LinkrecError::NotAuthenticated`] and nothing is sent.
pub struct ProfileService {
    client: ApiClient,
}

impl ProfileService {
    /// Create the service over an authenticated client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the current profile.
    pub async fn get(&self) -> Result<User> {
        self.client.require_token().await?;
        let value: Value = self.client.get(PROFILE_ENDPOINT).await?;
        payload(value)
    }

    /// Send the supplied fields. Blank values count as not supplied.
    ///
    /// Returns the updated profile; when the backend answers without a
    /// body the profile is fetched again.
    ///
    /// # Errors
    ///
    /// [`LinkrecError::Validation`] when no field is supplied.
    pub async fn update(&self, update: ProfileUpdate) -> Result<User> {
        let update = ProfileUpdate {
            name: non_blank(update.name),
            email: non_blank(update.email),
            bio: update.bio,
        };
        if update.is_empty() {
            return Err(LinkrecError::Validation("Nothing to update".to_string()).into());
        }

        self.client.require_token().await?;
        tracing::info!(?update, "Updating profile");

        let value: Value = self.client.put(PROFILE_ENDPOINT, &update).await?;
        let value = checked(value)?;
        let value = value.get("user").cloned().unwrap_or(value);
        match serde_json::from_value::<User>(value) {
            Ok(user) if !user.email.is_empty() || !user.name.is_empty() => Ok(user),
            _ => self.get().await,
        }
    }

    /// Change the account password.
    ///
    /// # Errors
    ///
    /// [`LinkrecError::Validation`] when any field is empty or the
    /// confirmation does not match; no request is sent in that case.
    pub async fn change_password(&self, current: &str, new: &str, confirm: &str) -> Result<()> {
        if current.is_empty() || new.is_empty() || confirm.is_empty() {
            return Err(LinkrecError::Validation("Please fill in all fields".to_string()).into());
        }
        if new != confirm {
            return Err(LinkrecError::Validation("New passwords do not match".to_string()).into());
        }

        self.client.require_token().await?;
        tracing::info!("Changing password");

        let body = PasswordChange {
            current_password: current.to_string(),
            new_password: new.to_string(),
        };
        let value: Value = self.client.put(PASSWORD_ENDPOINT, &body).await?;
        checked(value)?;
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
