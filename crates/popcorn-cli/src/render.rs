use crate::output::{Output, OutputFormat};
use comfy_table::{Attribute, Cell, Table};
use owo_colors::OwoColorize;
use popcorn_models::{MovieDetail, SearchResult, WatchedEntry, WatchedSummary};
use serde_json::json;

fn table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(label).add_attribute(Attribute::Bold))
        .collect()
}

pub fn results(output: &Output, results: &[SearchResult]) {
    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return;
            }

            println!("Found {} results", results.len().to_string().bright_cyan().bold());
            let mut table = table();
            table.set_header(header(&["#", "Title", "Year", "IMDb id"]));
            for (index, result) in results.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(index + 1),
                    Cell::new(&result.title),
                    Cell::new(format!("🗓 {}", result.year)),
                    Cell::new(&result.id),
                ]);
            }
            println!("{}", table);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "type": "results",
                "count": results.len(),
                "results": results,
            }));
        }
    }
}

/// `watched_rating` is the stored rating when the movie is already in the list
pub fn detail(output: &Output, detail: &MovieDetail, watched_rating: Option<u8>) {
    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return;
            }

            println!();
            println!("{} ({})", detail.title.bright_cyan().bold(), detail.year);

            let mut table = table();
            table.add_row(vec![Cell::new("Released").add_attribute(Attribute::Bold), Cell::new(&detail.released)]);
            table.add_row(vec![Cell::new("Runtime").add_attribute(Attribute::Bold), Cell::new(detail.runtime_label())]);
            table.add_row(vec![Cell::new("Genre").add_attribute(Attribute::Bold), Cell::new(&detail.genre)]);
            table.add_row(vec![
                Cell::new("IMDb rating").add_attribute(Attribute::Bold),
                Cell::new(format!("⭐ {}", detail.imdb_rating_label())),
            ]);
            table.add_row(vec![Cell::new("Starring").add_attribute(Attribute::Bold), Cell::new(&detail.actors)]);
            table.add_row(vec![Cell::new("Directed by").add_attribute(Attribute::Bold), Cell::new(&detail.director)]);
            println!("{}", table);
            println!("{}", detail.plot.italic());

            if let Some(rating) = watched_rating {
                println!("You rated this movie {} 🌟", rating.to_string().bright_yellow().bold());
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "type": "detail",
                "detail": detail,
                "watched_rating": watched_rating,
            }));
        }
    }
}

pub fn watched(output: &Output, entries: &[WatchedEntry], summary: &WatchedSummary) {
    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return;
            }

            print_summary(summary);
            if entries.is_empty() {
                println!("No watched movies yet");
                return;
            }

            let mut table = table();
            table.set_header(header(&["#", "Title", "Year", "⭐ IMDb", "🌟 Yours", "⏳ Runtime", "IMDb id"]));
            for (index, entry) in entries.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(index + 1),
                    Cell::new(&entry.title),
                    Cell::new(&entry.year),
                    Cell::new(format!("{:.1}", entry.imdb_rating)),
                    Cell::new(entry.user_rating),
                    Cell::new(format!("{} min", entry.runtime_minutes)),
                    Cell::new(&entry.id),
                ]);
            }
            println!("{}", table);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "type": "watched",
                "summary": summary,
                "watched": entries,
            }));
        }
    }
}

pub fn summary(output: &Output, summary: &WatchedSummary) {
    match output.format() {
        OutputFormat::Human => {
            if !output.is_quiet() {
                print_summary(summary);
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "type": "summary",
                "summary": summary,
            }));
        }
    }
}

fn print_summary(summary: &WatchedSummary) {
    let mut table = table();
    table.set_header(header(&["Movies you watched", "⭐ IMDb", "🌟 Yours", "⏳ Runtime"]));
    table.add_row(vec![
        Cell::new(format!("#️⃣ {} movies", summary.count)),
        Cell::new(WatchedSummary::label(summary.avg_imdb_rating)),
        Cell::new(WatchedSummary::label(summary.avg_user_rating)),
        Cell::new(match summary.avg_runtime_minutes {
            Some(_) => format!("{} min", WatchedSummary::label(summary.avg_runtime_minutes)),
            None => WatchedSummary::label(None),
        }),
    ]);
    println!("{}", table);
}
