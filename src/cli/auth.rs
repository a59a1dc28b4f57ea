use reqwest::Client;

use crate::{cli::context, error, spotify, success};

pub async fn login() {
    let client = Client::new();
    let credentials = context::credential_store(&client);

    if let Err(e) = spotify::auth::login(&credentials).await {
        error!("Login failed. Err: {}", e);
    }
}

pub async fn logout() {
    let client = Client::new();
    let credentials = context::credential_store(&client);

    match credentials.logout().await {
        Ok(()) => success!("Logged out."),
        Err(e) => error!("{}", e),
    }
}
