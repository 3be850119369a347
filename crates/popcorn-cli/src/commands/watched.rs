use super::Session;
use crate::output::Output;
use crate::render;
use crate::WatchedCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;

pub async fn run_watched(session: &Session, cmd: WatchedCommands, output: &Output) -> Result<()> {
    let mut watchlist = session.open_watchlist().await?;

    match cmd {
        WatchedCommands::List => {
            render::watched(output, watchlist.entries(), &watchlist.summary());
        }
        WatchedCommands::Summary => {
            render::summary(output, &watchlist.summary());
        }
        WatchedCommands::Remove { id } => {
            let title = watchlist.get(&id).map(|e| e.title.clone());
            let removed = watchlist
                .remove(&id)
                .await
                .map_err(|e| eyre!("Failed to save watched list: {}", e))?;

            if removed {
                output.success(format!("Removed {} from the watched list", title.unwrap_or(id)));
            } else {
                output.warn(format!("{} is not in the watched list", id));
            }
        }
    }
    Ok(())
}
