use social_gql::{
    routes::{routes, run_server},
    setup::{setup_sentry, setup_tracing},
    state::AppState,
    store::seed::seed_demo_data,
};
use tracing::info;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Initialize Sentry for error tracking
    let _sentry_guard = setup_sentry();

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()?
        .block_on(async { run_application().await })
}

async fn run_application() -> color_eyre::Result<()> {
    setup_tracing("social_gql")?;

    let app_state = AppState::from_env()?;

    if is_feature_enabled("SEED") {
        seed_demo_data(&app_state.store).await?;
    } else {
        info!("Demo data disabled");
    }

    let futures = spawn_application_tasks(app_state);
    futures::future::try_join_all(futures)
        .await?
        .into_iter()
        .collect::<color_eyre::Result<Vec<()>>>()?;

    Ok(())
}

/// Spawn all application background tasks
fn spawn_application_tasks(
    app_state: AppState,
) -> Vec<tokio::task::JoinHandle<color_eyre::Result<()>>> {
    let mut futures = vec![];

    if is_feature_enabled("SERVER") {
        info!("Server Enabled");
        futures.push(tokio::spawn(run_server(routes(app_state))));
    } else {
        info!("Server Disabled");
    }

    info!("All application tasks spawned successfully");
    futures
}

/// Check if a feature is enabled based on environment variables
fn is_feature_enabled(feature: &str) -> bool {
    std::env::var(format!("{}_DISABLED", feature)).unwrap_or_else(|_| "false".to_string()) != "true"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_is_feature_enabled_when_env_var_not_set() {
        env::remove_var("TEST_UNSET_FEATURE_DISABLED");

        assert!(is_feature_enabled("TEST_UNSET_FEATURE"));
    }

    #[test]
    fn test_is_feature_disabled_when_env_var_is_true() {
        env::set_var("TEST_OFF_FEATURE_DISABLED", "true");

        assert!(!is_feature_enabled("TEST_OFF_FEATURE"));

        env::remove_var("TEST_OFF_FEATURE_DISABLED");
    }

    #[test]
    fn test_is_feature_enabled_with_other_values() {
        env::set_var("TEST_OTHER_FEATURE_DISABLED", "yes");

        // Only the exact string "true" disables a feature
        assert!(is_feature_enabled("TEST_OTHER_FEATURE"));

        env::remove_var("TEST_OTHER_FEATURE_DISABLED");
    }
}
