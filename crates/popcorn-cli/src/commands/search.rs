use super::{wait_for, Session};
use crate::output::Output;
use crate::render;
use color_eyre::Result;

pub async fn run_search(session: &Session, query: String, output: &Output) -> Result<()> {
    let mut app = session.open_app().await?;

    let Some(handle) = app.set_query(&query) else {
        output.warn(format!(
            "Type at least {} characters to search",
            app.search().min_query_len()
        ));
        return Ok(());
    };
    wait_for(handle, &format!("Searching \"{}\"...", query.trim()), output).await;

    let state = app.search().state();
    match state.error {
        Some(error) => output.error(error),
        None => render::results(output, &state.results),
    }
    Ok(())
}
