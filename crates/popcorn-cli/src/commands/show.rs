use super::{wait_for, Session};
use crate::output::Output;
use crate::render;
use color_eyre::eyre::eyre;
use color_eyre::Result;

pub async fn run_show(session: &Session, id: &str, output: &Output) -> Result<()> {
    let mut app = session.open_app().await?;

    let handle = app
        .select(id)
        .ok_or_else(|| eyre!("Failed to open movie {}", id))?;
    wait_for(handle, "Loading...", output).await;

    let state = app.detail().state();
    match (state.detail_for(id), state.error.as_deref()) {
        (Some(detail), _) => render::detail(output, detail, app.watched_rating()),
        (None, Some(error)) => output.error(error),
        (None, None) => output.error(format!("No details for {}", id)),
    }
    Ok(())
}
