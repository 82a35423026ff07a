//! `fetch` command.

use console::style;
use futures::future::join_all;

use problem_acquire::{EngineConfig, ProblemDetails, ProblemFetcher};

/// Fetch every URL through one engine and print the results in input order.
pub async fn cmd_fetch(config: &EngineConfig, urls: &[String], json: bool) -> anyhow::Result<()> {
    let fetcher = ProblemFetcher::new(config)?;

    if !json {
        println!(
            "{} Fetching {} problem(s), at most one request every {:?}",
            style("→").cyan(),
            urls.len(),
            config.min_request_interval()
        );
    }

    let results = join_all(urls.iter().map(|url| fetcher.get_problem_details(url))).await;

    if json {
        let entries: Vec<serde_json::Value> = urls
            .iter()
            .zip(&results)
            .map(|(url, details)| serde_json::json!({ "url": url, "details": details }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (url, details) in urls.iter().zip(&results) {
        print_details(url, details);
    }

    Ok(())
}

fn print_details(url: &str, details: &ProblemDetails) {
    println!();
    if details.is_sentinel() {
        println!("{} {}", style("✗").red(), url);
        println!("  Could not fetch problem details");
        return;
    }

    println!("{} {}", style("✓").green(), style(&details.title).bold());
    println!("  {:<12} {}", "URL:", url);
    if let Some(id) = &details.numeric_id {
        println!("  {:<12} {}", "Number:", id);
    }
    println!("  {:<12} {}", "Difficulty:", details.difficulty);
    if !details.tags.is_empty() {
        println!("  {:<12} {}", "Tags:", details.tags.join(", "));
    }
    println!(
        "  {:<12} {} bytes of HTML",
        "Description:",
        details.description_html.len()
    );
}
