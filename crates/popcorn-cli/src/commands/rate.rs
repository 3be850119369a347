use super::{wait_for, Session};
use crate::output::{Output, OutputFormat};
use crate::render;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_core::AppError;
use serde_json::json;

/// Open `id`, apply `ratings` in order, then add it to the watched list
pub async fn run_rate(session: &Session, id: &str, ratings: &[u8], output: &Output) -> Result<()> {
    let mut app = session.open_app().await?;

    let handle = app
        .select(id)
        .ok_or_else(|| eyre!("Failed to open movie {}", id))?;
    wait_for(handle, "Loading...", output).await;

    let state = app.detail().state();
    if state.detail_for(id).is_none() {
        output.error(state.error.unwrap_or_else(|| format!("No details for {}", id)));
        return Ok(());
    }

    for &rating in ratings {
        match app.rate(rating) {
            Ok(_) => {}
            Err(AppError::AlreadyWatched { rating, .. }) => {
                output.warn(format!("You rated this movie {} 🌟", rating));
                return Ok(());
            }
            Err(e) => {
                output.error(e.to_string());
                return Ok(());
            }
        }
    }

    match app.add_watched().await {
        Ok(entry) => {
            if output.format() == OutputFormat::Human {
                output.success(format!(
                    "Added {} with rating {} ({} rating changes)",
                    entry.title, entry.user_rating, entry.rating_revision_count
                ));
                render::summary(output, &app.summary());
            } else {
                output.json(&json!({
                    "type": "added",
                    "entry": entry,
                    "summary": app.summary(),
                }));
            }
            Ok(())
        }
        Err(AppError::Storage(e)) => Err(eyre!("Failed to save watched list: {}", e)),
        Err(e) => {
            output.error(e.to_string());
            Ok(())
        }
    }
}
