use std::time::{Duration, Instant};

use reqwest::Client;

use crate::{
    cli::{context, songs::print_songs},
    completion::BackendCompletionClient,
    config, error,
    pipeline::{ResolveOptions, Resolver},
    presentation::{Filters, GenerationState, SortKey},
    success, warning,
};

/// Turns `prompt` into a song list, stores it in the session and prints it.
pub async fn generate(prompt: &str, annotate: bool, sort: SortKey, filters: &Filters) {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        error!("Prompt must not be empty.");
    }

    let options = match (config::completion_fanout(), config::resolve_timeout()) {
        (Ok(fanout), Ok(timeout)) => ResolveOptions {
            fanout,
            timeout,
            annotate,
            ..ResolveOptions::default()
        },
        (Err(e), _) | (_, Err(e)) => error!("{}", e),
    };

    let client = Client::new();
    let credentials = context::credential_store(&client);
    let access_token = context::access_token(&credentials).await;
    let catalog = context::catalog(&client, &access_token);
    let completions = BackendCompletionClient::new(client.clone(), &config::backend_url());

    let mut manager = context::load_session().await;
    let mut state = GenerationState::default();

    state.start();
    let pb = context::spinner("Promptifying, please be patient...");
    let result = Resolver::new(&completions, &catalog, options)
        .resolve(prompt)
        .await;

    let resolution = match result {
        Ok(resolution) => {
            state.finish();
            pb.finish_and_clear();
            resolution
        }
        Err(e) => {
            state.fail(Instant::now());
            pb.set_message(format!("Something went wrong: {e}"));
            while state.error_visible(Instant::now()) {
                tokio::time::sleep(Duration::from_millis(250)).await;
            }
            pb.finish_and_clear();
            error!("Cannot generate songs for '{}'. Err: {}", prompt, e);
        }
    };

    for reason in &resolution.failed_completions {
        warning!("A completion request failed: {}", reason);
    }
    for line in &resolution.skipped_lines {
        warning!("Skipping unparseable suggestion: {}", line);
    }
    for (query, reason) in &resolution.failed_searches {
        warning!("Search for '{}' failed: {}", query, reason);
    }
    if !resolution.failed_searches.is_empty() {
        warning!(
            "{} of {} searches failed.",
            resolution.failed_searches.len(),
            resolution.candidates
        );
    }
    if let Some(reason) = &resolution.annotation_error {
        warning!("Cannot fetch library status: {}", reason);
    }
    if resolution.unauthorized {
        match credentials.refresh().await {
            Ok(_) => warning!("Access token was rejected and has been refreshed. Run the command again for complete results."),
            Err(e) => warning!("{}", e),
        }
    }

    if resolution.songs.is_empty() {
        warning!("No songs found for '{}'.", prompt);
        return;
    }

    manager.set_songs(resolution.songs);
    context::persist_session(&manager).await;

    print_songs(&manager.session().songs, sort, filters);
    success!(
        "Found {} songs for {} suggestions.",
        manager.session().songs.len(),
        resolution.candidates
    );
}

