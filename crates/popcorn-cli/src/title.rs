use popcorn_core::{DetailState, ViewObserver};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_TITLE: &str = "popcorn";

type TitleSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Sets the terminal title to the open movie and restores it on close
pub struct TerminalTitle {
    sink: TitleSink,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl TerminalTitle {
    pub fn new() -> Self {
        Self::with_sink(Arc::new(write_terminal_title))
    }

    fn with_sink(sink: TitleSink) -> Self {
        Self {
            sink,
            watcher: Mutex::new(None),
        }
    }

    fn replace_watcher(&self, watcher: Option<JoinHandle<()>>) {
        let mut slot = self.watcher.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = std::mem::replace(&mut *slot, watcher) {
            previous.abort();
        }
    }
}

impl ViewObserver for TerminalTitle {
    fn on_open(&self, id: &str, mut detail: watch::Receiver<DetailState>) {
        let sink = Arc::clone(&self.sink);
        let id = id.to_string();

        // Details arrive after the view opens; wait for the ones belonging to this id
        let watcher = tokio::spawn(async move {
            loop {
                let title = detail
                    .borrow_and_update()
                    .detail_for(&id)
                    .map(|d| d.title.clone());
                if let Some(title) = title {
                    sink(&format!("Movie | {}", title));
                    return;
                }
                if detail.changed().await.is_err() {
                    return;
                }
            }
        });
        self.replace_watcher(Some(watcher));
    }

    fn on_close(&self, _id: &str) {
        self.replace_watcher(None);
        (self.sink)(DEFAULT_TITLE);
    }
}

fn emit_title(out: &mut impl Write, title: &str) -> io::Result<()> {
    write!(out, "\x1b]0;{}\x07", title)?;
    out.flush()
}

fn write_terminal_title(title: &str) {
    if let Err(e) = emit_title(&mut io::stdout(), title) {
        debug!(error = %e, "Failed to set terminal title");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popcorn_models::MovieDetail;
    use std::time::Duration;

    fn recording() -> (TerminalTitle, Arc<Mutex<Vec<String>>>) {
        let titles = Arc::new(Mutex::new(Vec::new()));
        let sink_titles = Arc::clone(&titles);
        let observer = TerminalTitle::with_sink(Arc::new(move |title: &str| {
            sink_titles.lock().unwrap().push(title.to_string());
        }));
        (observer, titles)
    }

    fn inception() -> MovieDetail {
        MovieDetail {
            id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            poster_url: String::new(),
            runtime_minutes: Some(148),
            imdb_rating: Some(8.8),
            plot: String::new(),
            released: String::new(),
            actors: String::new(),
            director: String::new(),
            genre: String::new(),
        }
    }

    async fn wait_for_titles(titles: &Arc<Mutex<Vec<String>>>, count: usize) {
        for _ in 0..100 {
            if titles.lock().unwrap().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_title_follows_loaded_detail() {
        let (observer, titles) = recording();
        let (tx, rx) = watch::channel(DetailState {
            id: Some("tt1375666".to_string()),
            loading: true,
            ..DetailState::default()
        });

        observer.on_open("tt1375666", rx);
        tx.send_modify(|s| {
            s.loading = false;
            s.detail = Some(inception());
        });
        wait_for_titles(&titles, 1).await;
        assert_eq!(*titles.lock().unwrap(), vec!["Movie | Inception".to_string()]);

        observer.on_close("tt1375666");
        assert_eq!(titles.lock().unwrap().last().map(String::as_str), Some(DEFAULT_TITLE));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_emit_title_escape_sequence() {
        let mut out = Vec::new();
        emit_title(&mut out, "Movie | Inception").unwrap();
        assert_eq!(out, b"\x1b]0;Movie | Inception\x07");
    }

    #[test]
    fn test_emit_title_reports_write_failure() {
        let err = emit_title(&mut ClosedPipe, DEFAULT_TITLE).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[tokio::test]
    async fn test_close_before_load_only_restores() {
        let (observer, titles) = recording();
        let (_tx, rx) = watch::channel(DetailState::default());

        observer.on_open("tt1375666", rx);
        observer.on_close("tt1375666");
        assert_eq!(*titles.lock().unwrap(), vec![DEFAULT_TITLE.to_string()]);
    }
}
