//! Pairing, token checks and unregistration.

use secrecy::ExposeSecret;
use serde::Serialize;

use syncbox_core::SyncBox;

use crate::cli::{GlobalOpts, RegisterArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationOutput {
    registration_id: String,
    access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_to: Option<String>,
}

/// `syncbox register`: poll until the button is pressed, then print or
/// save the new token.
pub async fn register(args: &RegisterArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config()?;
    let (profile_name, resolved) = config::resolve_for_registration(global, &cfg)?;
    let sync_box = SyncBox::new(&resolved)?;

    let spinner = util::spinner(
        "Hold the button on the sync box until the LED blinks green",
        global.quiet,
    );
    let outcome = sync_box
        .wait_for_registration(&args.app, &args.instance, args.poll_interval, args.wait)
        .await;
    spinner.finish_and_clear();
    sync_box.close().await;

    let registration = match outcome {
        Ok(Some(registration)) => registration,
        Ok(None) => {
            return Err(CliError::UnexpectedResponse {
                message: "connection closed before pairing finished".into(),
            });
        }
        Err(e) if e.is_invalid_state() => {
            return Err(CliError::NotReady {
                message: format!(
                    "button not pressed within {}",
                    config::describe_timeout(args.wait)
                ),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let saved_to = if args.save {
        // Edit the file as written. A profile that exists only in the
        // environment is created from the settings used to pair.
        let mut file_cfg = config::load_config_file()?;
        let base = file_cfg
            .profiles
            .get(&profile_name)
            .or_else(|| cfg.profiles.get(&profile_name));
        let mut profile = config::merged_profile(global, base);
        profile.token = Some(registration.access_token.expose_secret().to_owned());
        profile.registration_id = Some(registration.registration_id.clone());
        file_cfg.profiles.insert(profile_name.clone(), profile);
        if file_cfg.default_profile.is_none() {
            file_cfg.default_profile = Some(profile_name.clone());
        }
        config::save_config(&file_cfg)?;
        Some(profile_name)
    } else {
        None
    };

    let result = RegistrationOutput {
        registration_id: registration.registration_id,
        access_token: registration.access_token.expose_secret().to_owned(),
        saved_to,
    };
    let color = output::should_color(global.color);
    let out = output::render_single(global.output, &result, |r| {
        let detail = output::Detail::new(color).row("Registration", &r.registration_id);
        match r.saved_to {
            Some(ref profile) => detail
                .row("Saved to", format!("profile '{profile}'"))
                .render(),
            None => detail.row("Access token", &r.access_token).render(),
        }
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// `syncbox unregister [id]`: revoke a registration. The id defaults to
/// the one saved with the active profile, whose token is then forgotten.
pub async fn unregister(
    sync_box: &SyncBox,
    registration_id: Option<String>,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let profile_name = config::active_profile_name(global, cfg);
    let saved_id = cfg
        .profiles
        .get(&profile_name)
        .and_then(|p| p.registration_id.clone());

    let Some(id) = registration_id.or_else(|| saved_id.clone()) else {
        return Err(CliError::Validation {
            field: "registration_id".into(),
            reason: format!("none given and profile '{profile_name}' has none saved"),
        });
    };

    sync_box.unregister(&id).await?;

    if saved_id.as_deref() == Some(id.as_str()) {
        let mut file_cfg = config::load_config_file()?;
        if let Some(profile) = file_cfg
            .profiles
            .get_mut(&profile_name)
            .filter(|p| p.registration_id.as_deref() == Some(id.as_str()))
        {
            profile.token = None;
            profile.registration_id = None;
            config::save_config(&file_cfg)?;
        }
    }

    output::print_output(&format!("Unregistered {id}"), global.quiet);
    Ok(())
}

/// `syncbox check`: succeed only when the token is accepted.
pub async fn check(sync_box: &SyncBox, global: &GlobalOpts) -> Result<(), CliError> {
    if sync_box.access_token().is_none() {
        return Err(CliError::AuthFailed {
            message: "no access token configured".into(),
        });
    }
    if !sync_box.is_registered().await? {
        return Err(CliError::AuthFailed {
            message: "token not accepted".into(),
        });
    }
    output::print_output("Registered", global.quiet);
    Ok(())
}
