use std::sync::Arc;

use crate::{api::AppState, error, server};

pub async fn serve() {
    let state = match AppState::from_env() {
        Ok(state) => Arc::new(state),
        Err(e) => error!("Cannot configure backend. Err: {}", e),
    };

    if let Err(e) = server::start_backend(state).await {
        error!("Backend stopped. Err: {}", e);
    }
}
