//! Browse recipes with the builder API
//!
//! Searches, sorts and pages through the public recipe API, printing each
//! page as it is applied.

use recipe_browser::{format, RecipeBrowser, SortField, SortOrder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut browser = RecipeBrowser::builder().page_size(4).build()?;

    println!("=== First page ===");
    browser.mount();
    browser.settle().await;
    println!("{}", format::screen(browser.state()));

    println!("=== Search 'chicken', best rated first ===");
    browser.set_search("chicken");
    browser.set_sort(SortField::Rating, SortOrder::Desc);
    browser.settle().await;
    println!("{}", format::screen(browser.state()));

    println!("=== Next page ===");
    browser.next_page();
    browser.settle().await;
    println!("{}", format::screen(browser.state()));

    if let Some(id) = browser.state().recipes().first().map(|r| r.id) {
        if let Some(recipe) = browser.select(id) {
            println!("{}", format::detail(recipe));
        }
    }

    Ok(())
}
