//! `locate` command.

use console::style;

use problem_acquire::locator;

pub fn cmd_locate(url: &str) -> anyhow::Result<()> {
    let identity = locator::parse(url);

    println!("{:<12} {}", "Cache key:", locator::cache_key(url));
    match &identity.slug {
        Some(slug) => println!("{:<12} {}", "Slug:", slug),
        None => println!(
            "{:<12} {} (structured query will be skipped)",
            "Slug:",
            style("none").yellow()
        ),
    }
    println!(
        "{:<12} {}",
        "Number:",
        identity.numeric_id.as_deref().unwrap_or("-")
    );
    Ok(())
}
