use crate::aggregate;
use crate::config::Config;
use crate::prelude::{eprintln, print, println, *};
use crate::zotero::ZoteroClient;
use colored::Colorize;
use prettytable::{row, Table};
use zotproxy_core::collection::{Collection, CollectionMap};

#[derive(Debug, clap::Parser)]
#[command(name = "collections")]
#[command(about = "Query collections, items and bibliographies from the terminal")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List every collection in the group
    #[clap(name = "list")]
    List(ListOptions),

    /// Show the collection tree below a collection
    #[clap(name = "tree")]
    Tree(KeyOptions),

    /// List a collection and all of its sub-collections
    #[clap(name = "descendants")]
    Descendants(KeyOptions),

    /// Print the items of a collection and its sub-collections as JSON
    #[clap(name = "items")]
    Items(ExportOptions),

    /// Print the biblatex bibliography of a collection and its sub-collections
    #[clap(name = "bib")]
    Bib(ExportOptions),
}

#[derive(Debug, clap::Args)]
pub struct ListOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args)]
pub struct KeyOptions {
    /// Collection key
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args)]
pub struct ExportOptions {
    /// Collection key
    #[arg(value_name = "KEY")]
    pub key: String,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let config = Config::from(&global);
    if global.verbose {
        eprintln!("Zotero API: {} (group {})", config.base_url, config.group);
        eprintln!();
    }

    let client = ZoteroClient::new(&config)?;

    match app.command {
        Commands::List(options) => {
            let collections = client.fetch_all_collections().await?;
            if options.json {
                println!("{}", to_json(&collections)?);
            } else {
                collections_table(&collections).printstd();
            }
        }
        Commands::Tree(options) => {
            let tree = aggregate::collection_tree(&client, &options.key).await?;
            if global.verbose {
                eprintln!("{} collection(s) under {}", tree.node_count(), options.key);
            }
            if options.json {
                println!("{}", to_json(&tree)?);
            } else {
                print!("{}", format_tree_text(&tree));
            }
        }
        Commands::Descendants(options) => {
            let collections = aggregate::collection_descendants(&client, &options.key).await?;
            if options.json {
                println!("{}", to_json(&collections)?);
            } else {
                collections_table(&collections).printstd();
            }
        }
        Commands::Items(options) => {
            let items =
                aggregate::items_in_collection(&client, &options.key, config.concurrency).await?;
            if global.verbose {
                eprintln!("{} item(s)", items.len());
            }
            println!("{}", to_json(&items)?);
        }
        Commands::Bib(options) => {
            let bib =
                aggregate::bib_in_collection(&client, &options.key, config.concurrency).await?;
            println!("{}", bib);
        }
    }

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

/// Tabulate collections in their given order
fn collections_table(collections: &[Collection]) -> Table {
    let mut table = new_table();
    table.set_titles(row![b->"KEY", b->"NAME", b->"PARENT"]);
    for collection in collections {
        table.add_row(row![
            collection.key,
            collection.name,
            collection.parent.as_deref().unwrap_or("-")
        ]);
    }

    table
}

/// Render a collection tree as indented lines, one collection per line
fn format_tree_text(tree: &CollectionMap) -> String {
    let mut result = String::new();
    let mut pending: Vec<(&CollectionMap, usize)> = vec![(tree, 0)];

    while let Some((node, depth)) = pending.pop() {
        let marker = if depth == 0 { "" } else { "└─ " };
        result.push_str(&format!(
            "{}{}{} {}\n",
            "   ".repeat(depth.saturating_sub(1)),
            marker.bright_black(),
            node.collection.name.white().bold(),
            format!("[{}]", node.collection.key).cyan()
        ));

        // Reversed so the first child is rendered first.
        for child in node.children.iter().rev() {
            pending.push((child, depth + 1));
        }
    }

    result
}
