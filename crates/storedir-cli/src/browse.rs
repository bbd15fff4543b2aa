//! Interactive `browse` session: a line-oriented front-end for the storefront.

use std::str::FromStr;

use storedir_browser::{
    Applied, JsonFileStore, KeyValueStore, LikedStores, RecordingNotifier, StoreSource, Storefront,
    END_OF_LIST_MESSAGE,
};
use storedir_client::StoreApiClient;
use storedir_core::{AppConfig, CategoryId, FlagFilter, SortField, StoreId, StoreStatus};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render;

const HELP: &str = "\
commands:
  search <text>       search by name (no text clears the search)
  status <s|all>      active, coming-soon, discontinued, or all
  letter <A-Z>        toggle the alphabet filter
  flag <name>         toggle cashback, promoted or sharable
  sort <field|none>   name, featured, popularity, cashback
  cat <id>            toggle a category
  more                load the next page
  like <id>           like or unlike a store
  back | forward      move through history
  retry               re-issue the last failed request
  show                print the current listing
  url                 print the current query string
  help                this text
  quit                leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BrowseCommand {
    Search(String),
    Status(Option<StoreStatus>),
    Letter(char),
    Flag(FlagFilter),
    Sort(Option<SortField>),
    Category(CategoryId),
    More,
    Like(StoreId),
    Back,
    Forward,
    Retry,
    Show,
    Url,
    Help,
    Quit,
}

impl FromStr for BrowseCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        let command = match word.to_ascii_lowercase().as_str() {
            "search" | "s" => BrowseCommand::Search(rest.to_owned()),
            "status" => BrowseCommand::Status(match rest {
                "" | "all" => None,
                other => Some(other.parse()?),
            }),
            "letter" => {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() => BrowseCommand::Letter(c),
                    _ => anyhow::bail!("letter expects a single A-Z character"),
                }
            }
            "flag" => BrowseCommand::Flag(rest.parse()?),
            "sort" => BrowseCommand::Sort(match rest {
                "" | "none" => None,
                other => Some(other.parse()?),
            }),
            "cat" | "category" => BrowseCommand::Category(
                rest.parse()
                    .map_err(|_| anyhow::anyhow!("cat expects a category id"))?,
            ),
            "more" | "m" => BrowseCommand::More,
            "like" => BrowseCommand::Like(
                rest.parse()
                    .map_err(|_| anyhow::anyhow!("like expects a store id"))?,
            ),
            "back" => BrowseCommand::Back,
            "forward" => BrowseCommand::Forward,
            "retry" => BrowseCommand::Retry,
            "show" | "ls" => BrowseCommand::Show,
            "url" => BrowseCommand::Url,
            "help" | "?" => BrowseCommand::Help,
            "quit" | "exit" | "q" => BrowseCommand::Quit,
            "" => anyhow::bail!("empty command"),
            other => anyhow::bail!("unknown command {other:?}; type `help`"),
        };
        Ok(command)
    }
}

/// Runs the interactive session until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if the client cannot be built or stdin cannot be read.
pub(crate) async fn run_browse(config: &AppConfig, query: &str) -> anyhow::Result<()> {
    let client = StoreApiClient::new(config)?;
    let liked = LikedStores::load(JsonFileStore::new(&config.liked_stores_path));
    let mut front = Storefront::new(client, liked, RecordingNotifier::new());

    let applied = front.mount(query).await;
    print_categories(&front);
    report(&front, applied);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<BrowseCommand>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        if command == BrowseCommand::Quit {
            break;
        }
        execute(&mut front, command).await;
    }

    Ok(())
}

async fn execute<S, K>(front: &mut Storefront<S, K, RecordingNotifier>, command: BrowseCommand)
where
    S: StoreSource + Clone,
    K: KeyValueStore,
{
    let applied = match command {
        BrowseCommand::Search(text) => front.browser_mut().set_search(&text).await,
        BrowseCommand::Status(status) => front.browser_mut().set_status(status).await,
        BrowseCommand::Letter(letter) => front.browser_mut().toggle_letter(letter).await,
        BrowseCommand::Flag(flag) => front.browser_mut().toggle_flag(flag).await,
        BrowseCommand::Sort(sort) => front.browser_mut().set_sort(sort).await,
        BrowseCommand::Category(id) => front.click_category(id).await,
        BrowseCommand::More => {
            if !front.browser().has_more() {
                println!("{END_OF_LIST_MESSAGE}");
                return;
            }
            front.browser_mut().load_more().await
        }
        BrowseCommand::Like(id) => {
            let liked = front.toggle_like(id);
            println!("{} store {id}.", if liked { "Liked" } else { "Unliked" });
            return;
        }
        BrowseCommand::Back => front.back().await,
        BrowseCommand::Forward => front.forward().await,
        BrowseCommand::Retry => front.browser_mut().retry().await,
        BrowseCommand::Show => {
            print_categories(front);
            print_listing(front);
            return;
        }
        BrowseCommand::Url => {
            println!("?{}", front.browser().location());
            return;
        }
        BrowseCommand::Help => {
            println!("{HELP}");
            return;
        }
        BrowseCommand::Quit => return,
    };
    report(front, applied);
}

fn report<S, K>(front: &Storefront<S, K, RecordingNotifier>, applied: Applied)
where
    S: StoreSource + Clone,
    K: KeyValueStore,
{
    for notice in front.notifier().take() {
        eprintln!("! {notice}");
    }

    let browser = front.browser();
    match applied {
        Applied::Replaced(_) => print_listing(front),
        Applied::Appended(count) => {
            let stores = browser.stores();
            for store in stores.iter().skip(stores.len().saturating_sub(count)) {
                println!("{}", render::store_line(store, browser.is_liked(store.id)));
            }
            if !browser.has_more() {
                println!("{END_OF_LIST_MESSAGE}");
            }
        }
        Applied::Failed => {
            let message = browser.last_error().unwrap_or_default();
            eprintln!("error: {message} (type `retry` to try again)");
        }
        Applied::Stale | Applied::Unchanged => println!("(no change)"),
    }
}

fn print_categories<S, K>(front: &Storefront<S, K, RecordingNotifier>)
where
    S: StoreSource + Clone,
    K: KeyValueStore,
{
    let selector = front.selector();
    if selector.categories().is_empty() {
        return;
    }
    println!("categories:");
    for category in selector.categories() {
        println!(
            "  {}",
            render::category_line(category, selector.is_selected(category.id))
        );
    }
}

fn print_listing<S, K>(front: &Storefront<S, K, RecordingNotifier>)
where
    S: StoreSource + Clone,
    K: KeyValueStore,
{
    let browser = front.browser();
    println!(
        "-- {} --",
        render::filter_summary(browser.filters(), browser.search_query())
    );
    if browser.stores().is_empty() {
        if browser.last_error().is_none() {
            println!("No stores found.");
        }
        return;
    }
    for store in browser.stores() {
        println!("{}", render::store_line(store, browser.is_liked(store.id)));
    }
    if !browser.has_more() {
        println!("{END_OF_LIST_MESSAGE}");
    }
}
