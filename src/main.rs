use clap::Parser;
use log::{debug, error};
use recipe_browser::{
    format, BrowserConfig, BrowserError, Completion, QueryState, RecipeBrowser, RecipeId,
    SortField, SortOrder,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "recipe-browser")]
#[command(about = "Browse, search and sort recipes from a recipe API")]
struct Args {
    /// Search text (empty means no filter)
    #[arg(short, long)]
    search: Option<String>,

    /// Attribute to sort by (e.g. name, rating, caloriesPerServing)
    #[arg(long)]
    sort_by: Option<SortField>,

    /// Sort order: asc or desc
    #[arg(long)]
    order: Option<SortOrder>,

    /// Zero-based page index
    #[arg(short, long, default_value_t = 0)]
    page: u32,

    /// Recipes per page
    #[arg(long)]
    page_size: Option<u32>,

    /// Base URL of the recipe API
    #[arg(long)]
    base_url: Option<String>,

    /// Show the details of the recipe with this id
    #[arg(long)]
    show: Option<u64>,

    /// Disable the search control
    #[arg(long)]
    no_search: bool,

    /// Disable the sort control
    #[arg(long)]
    no_sort: bool,

    /// Disable pagination
    #[arg(long)]
    no_pagination: bool,

    /// Read commands from stdin and re-render after every change
    #[arg(short, long)]
    interactive: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Search(String),
    Sort(SortField, Option<SortOrder>),
    Next,
    Prev,
    Page(u32),
    Show(RecipeId),
    Close,
    Refresh,
    Help,
    Quit,
}

const HELP: &str = "Commands:
  search <text>            filter by text (empty clears the filter)
  sort <field> [asc|desc]  sort by a recipe attribute (repeat to flip the order)
  next | prev | page <n>   change page (1-based)
  show <id> | close        open or close the detail view
  refresh                  fetch again
  quit";

fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match word {
        "search" | "s" => Ok(Command::Search(rest.to_string())),
        "sort" => {
            let mut parts = rest.split_whitespace();
            let field = parts
                .next()
                .ok_or("sort needs a field")?
                .parse::<SortField>()
                .map_err(|e| e.to_string())?;
            let order = parts
                .next()
                .map(|o| o.parse::<SortOrder>())
                .transpose()
                .map_err(|e| e.to_string())?;
            Ok(Command::Sort(field, order))
        }
        "next" | "n" => Ok(Command::Next),
        "prev" | "p" => Ok(Command::Prev),
        "page" => {
            let page: u32 = rest.parse().map_err(|_| format!("invalid page '{}'", rest))?;
            Ok(Command::Page(page.saturating_sub(1)))
        }
        "show" => rest
            .parse::<u64>()
            .map(|id| Command::Show(RecipeId(id)))
            .map_err(|_| format!("invalid recipe id '{}'", rest)),
        "close" => Ok(Command::Close),
        "refresh" | "r" => Ok(Command::Refresh),
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(format!("unknown command '{}', try 'help'", other)),
    }
}

fn build_browser(args: &Args) -> Result<RecipeBrowser, BrowserError> {
    let config = BrowserConfig::load()?;
    debug!("Loaded configuration: {:?}", config);

    let mut builder = RecipeBrowser::builder().config(&config);
    if let Some(base_url) = &args.base_url {
        builder = builder.base_url(base_url.clone());
    }
    if let Some(page_size) = args.page_size {
        builder = builder.page_size(page_size);
    }
    if args.no_search {
        builder = builder.search(false);
    }
    if args.no_sort {
        builder = builder.sort(false);
    }
    if args.no_pagination {
        builder = builder.pagination(false);
    }
    if args.sort_by.is_some() || args.order.is_some() {
        builder = builder.initial_sort(
            args.sort_by.unwrap_or(config.default_sort),
            args.order.unwrap_or(config.default_order),
        );
    }

    if let Some(search) = &args.search {
        builder = builder.initial_search(search.clone());
    }

    builder.initial_page(args.page).build()
}

/// Order for `sort <field>`: an explicit order wins, sorting again by the
/// current field flips it, a new field keeps the current order.
fn sort_order_for(query: &QueryState, field: SortField, order: Option<SortOrder>) -> SortOrder {
    match order {
        Some(order) => order,
        None if field == query.sort_field() => query.sort_order().reversed(),
        None => query.sort_order(),
    }
}

/// Apply one command; returns false when the user asked to quit.
fn apply(browser: &mut RecipeBrowser, command: Command) -> bool {
    match command {
        Command::Search(text) => {
            browser.set_search(text);
        }
        Command::Sort(field, order) => {
            let order = sort_order_for(browser.state().query(), field, order);
            browser.set_sort(field, order);
        }
        Command::Next => {
            browser.next_page();
        }
        Command::Prev => {
            browser.previous_page();
        }
        Command::Page(page) => {
            browser.go_to_page(page);
        }
        Command::Show(id) => {
            if browser.select(id).is_none() {
                println!("No recipe {} on this page.", id);
            }
        }
        Command::Close => browser.dismiss(),
        Command::Refresh => browser.refresh(),
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
    }
    true
}

async fn run_interactive(mut browser: RecipeBrowser) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    browser.mount();
    println!("{}", HELP);
    println!("{}", format::screen(browser.state()));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(command) => {
                        if !apply(&mut browser, command) {
                            break;
                        }
                        println!("{}", format::screen(browser.state()));
                    }
                    Err(message) => println!("{}", message),
                }
            }
            completion = browser.next_completion() => {
                if completion == Completion::Applied {
                    println!("{}", format::screen(browser.state()));
                }
            }
        }
    }
    Ok(())
}

async fn run_once(
    mut browser: RecipeBrowser,
    show: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    browser.mount();
    browser.settle().await;

    if let Some(message) = browser.state().error() {
        error!("{}", message);
        return Err(message.into());
    }

    if let Some(id) = show {
        match browser.select(RecipeId(id)) {
            Some(recipe) => println!("{}", format::detail(recipe)),
            None => println!("No recipe {} on this page.", id),
        }
        return Ok(());
    }

    println!("{}", format::screen(browser.state()));
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let browser = build_browser(&args)?;

    if args.interactive {
        run_interactive(browser).await
    } else {
        run_once(browser, args.show).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("search chicken curry"),
            Ok(Command::Search("chicken curry".to_string()))
        );
        assert_eq!(parse_command("search"), Ok(Command::Search(String::new())));
        assert_eq!(
            parse_command("sort rating desc"),
            Ok(Command::Sort(SortField::Rating, Some(SortOrder::Desc)))
        );
        assert_eq!(
            parse_command("sort calories_per_serving"),
            Ok(Command::Sort(SortField::CaloriesPerServing, None))
        );
        assert_eq!(parse_command("page 3"), Ok(Command::Page(2)));
        assert_eq!(parse_command("page 0"), Ok(Command::Page(0)));
        assert_eq!(parse_command("show 12"), Ok(Command::Show(RecipeId(12))));
        assert_eq!(parse_command("  q  "), Ok(Command::Quit));
    }

    #[test]
    fn test_sort_order_for() {
        let query = QueryState::new().with_sort(SortField::Rating, SortOrder::Asc);
        assert_eq!(
            sort_order_for(&query, SortField::Rating, None),
            SortOrder::Desc
        );
        assert_eq!(sort_order_for(&query, SortField::Name, None), SortOrder::Asc);
        assert_eq!(
            sort_order_for(&query, SortField::Rating, Some(SortOrder::Asc)),
            SortOrder::Asc
        );
    }

    #[test]
    fn test_parse_command_errors() {
        assert!(parse_command("sort").is_err());
        assert!(parse_command("sort colour").is_err());
        assert!(parse_command("sort name sideways").is_err());
        assert!(parse_command("page two").is_err());
        assert!(parse_command("dance").is_err());
    }
}
