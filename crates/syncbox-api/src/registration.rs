// Registration (pairing) endpoints
//
// A fresh token is obtained by POSTing to /registrations while the user holds
// the button on the box. Until then the device answers with code 16.

use std::time::Duration;

use reqwest::Method;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::client::{SyncBoxClient, decode};
use crate::error::Error;

/// Result of a successful pairing.
#[derive(Debug, Clone)]
pub struct Registration {
    pub registration_id: String,
    pub access_token: SecretString,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationRequest<'a> {
    app_name: &'a str,
    instance_name: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationResponse {
    registration_id: String,
    access_token: String,
}

impl SyncBoxClient {
    /// Check whether the current token is accepted.
    ///
    /// `GET /registrations`. An authorization failure yields `false`, other
    /// failures propagate. A closed transport cannot confirm anything and
    /// yields `false`.
    pub async fn is_registered(&self) -> Result<bool, Error> {
        match self.get("/registrations").await {
            Ok(Some(_)) => Ok(true),
            Ok(None) => Ok(!self.is_closed().await),
            Err(e) if e.is_unauthorized() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Pair with the box.
    ///
    /// `POST /registrations`, sent without the current token: a stale token
    /// would make the box reject the call before it looks at the button.
    /// Fails with [`Error::InvalidState`] until the button has been pressed.
    /// With `use_registered_token` the new token replaces the current one.
    pub async fn register(
        &self,
        application_name: &str,
        instance_name: &str,
        use_registered_token: bool,
    ) -> Result<Option<Registration>, Error> {
        let body = serde_json::to_value(RegistrationRequest {
            app_name: application_name,
            instance_name,
        })
        .map_err(Error::Encode)?;

        let Some(data) = self
            .execute(Method::POST, "/registrations", Some(&body), false)
            .await?
        else {
            return Ok(None);
        };

        let response: RegistrationResponse = decode(&data)?;
        let registration = Registration {
            registration_id: response.registration_id,
            access_token: SecretString::from(response.access_token),
        };
        info!(registration_id = %registration.registration_id, "registered with sync box");

        if use_registered_token {
            self.set_access_token(Some(registration.access_token.clone()));
        }

        Ok(Some(registration))
    }

    /// Poll [`register`](Self::register) until the button is pressed or
    /// `timeout` elapses.
    ///
    /// Only [`Error::InvalidState`] is retried. When the deadline passes the
    /// last `InvalidState` error is returned.
    pub async fn wait_for_registration(
        &self,
        application_name: &str,
        instance_name: &str,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<Option<Registration>, Error> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.register(application_name, instance_name, true).await {
                Err(e) if e.is_invalid_state() && Instant::now() + poll_interval < deadline => {
                    debug!("waiting for the pairing button");
                    tokio::time::sleep(poll_interval).await;
                }
                other => return other,
            }
        }
    }

    /// Revoke a registration.
    ///
    /// `DELETE /registrations/{id}`. The box only accepts this with the
    /// token that belongs to that registration.
    pub async fn unregister(&self, registration_id: &str) -> Result<(), Error> {
        let url = self.item_url("/registrations", registration_id)?;
        self.execute_url(Method::DELETE, url, None, true).await?;
        info!(registration_id, "unregistered from sync box");
        Ok(())
    }
}
