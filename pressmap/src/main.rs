use clap::ArgMatches;
use commands::command_argument_builder;
use indicatif::{ProgressBar, ProgressStyle};
use pressmap_core::companies::load_companies;
use pressmap_core::crawl::{CrawlProgressCallback, crawl_companies, summarize};
use pressmap_core::data::Database;
use pressmap_core::explore::Explorer;
use pressmap_scraper::PageClient;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use url::Url;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();

    match chosen_command.subcommand() {
        Some(("init", primary_command)) => handle_init(primary_command),
        Some(("crawl", primary_command)) => handle_crawl(primary_command).await,
        Some(("path", primary_command)) => handle_path(primary_command).await,
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

fn handle_init(args: &ArgMatches) {
    let config_dir = args.get_one::<String>("PATH").unwrap();
    let force = args.get_flag("force");
    let expanded_config_dir = shellexpand::tilde(config_dir);
    let pressmap_config_dir = Path::new(expanded_config_dir.as_ref());
    let db_loc = pressmap_config_dir.join("pressmap.db");
    let db_path = db_loc.as_path();

    if Database::exists(db_path) && !force {
        println!("A database already exists at: {}", db_path.display());
        print!("Overwrite it? [y/N]: ");
        io::stdout().flush().unwrap();

        let mut response = String::new();
        io::stdin().read_line(&mut response).unwrap();
        let response = response.trim().to_lowercase();

        if response != "y" && response != "yes" {
            println!("\nInitialization cancelled.");
            return;
        }
    }

    std::fs::create_dir_all(pressmap_config_dir).expect("Failed to create config directory");
    if Database::exists(db_path) {
        Database::drop(db_path);
    }
    Database::new(db_path).expect("Failed to create database");

    println!("✓ Pressmap initialization complete!");
    println!("✓ Database: {}", db_path.display());
}

async fn handle_crawl(sub_matches: &ArgMatches) {
    tracing_subscriber::fmt::init();

    let companies_path = sub_matches.get_one::<PathBuf>("companies").unwrap();
    let db_arg = sub_matches.get_one::<String>("database").unwrap();
    let base_url = sub_matches.get_one::<Url>("base-url").unwrap();
    let max_pages = *sub_matches.get_one::<u32>("max-pages").unwrap();

    let expanded_db_path = shellexpand::tilde(db_arg);
    let db_path = Path::new(expanded_db_path.as_ref());
    let db = match Database::new(db_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("✗ Failed to open database {}: {}", db_path.display(), e);
            std::process::exit(1);
        }
    };

    let mut companies = match load_companies(companies_path) {
        Ok(companies) => companies,
        Err(e) => {
            eprintln!(
                "✗ Failed to read company list {}: {}",
                companies_path.display(),
                e
            );
            std::process::exit(1);
        }
    };
    if let Some(symbol) = sub_matches.get_one::<String>("symbol") {
        companies.retain(|c| &c.symbol == symbol);
        if companies.is_empty() {
            eprintln!("✗ Symbol {} not found in company list", symbol);
            std::process::exit(1);
        }
    }

    let client = match build_client(sub_matches) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("✗ Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    println!("\nCrawling news for {} companies\n", companies.len());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    let pb = spinner.clone();
    let progress_callback: CrawlProgressCallback = Arc::new(move |msg| pb.set_message(msg));

    let started = Instant::now();
    match crawl_companies(
        &client,
        &db,
        &companies,
        base_url.as_str(),
        max_pages,
        Some(progress_callback),
    )
    .await
    {
        Ok(reports) => {
            spinner.finish_and_clear();
            print!("{}", summarize(&reports));
            println!("Elapsed time: {:.3}s", started.elapsed().as_secs_f64());
        }
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("✗ Crawl failed: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_path(sub_matches: &ArgMatches) {
    tracing_subscriber::fmt::init();

    let start = sub_matches.get_one::<String>("start").unwrap();
    let term = sub_matches.get_one::<String>("term").unwrap();
    let base_url = sub_matches.get_one::<String>("base-url").unwrap();
    let max_depth = *sub_matches.get_one::<usize>("max-depth").unwrap();

    let client = match build_client(sub_matches) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("✗ Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let mut explorer = Explorer::new(base_url.trim_end_matches('/'));
    let started = Instant::now();

    match explorer.find_connection(&client, start, term, max_depth).await {
        Ok((trace, true)) => {
            println!("\n✓ Found '{}' after {} pages:", term, trace.len());
            for (step, url) in trace.iter().enumerate() {
                println!("  {}. {}", step + 1, url);
            }
        }
        Ok((_, false)) => {
            println!(
                "\n{} steps were not enough to reach '{}' ({} pages visited).",
                max_depth,
                term,
                explorer.visited_count()
            );
        }
        Err(e) => {
            eprintln!("✗ Search failed: {}", e);
            std::process::exit(1);
        }
    }
    println!("Elapsed time: {:.3}s", started.elapsed().as_secs_f64());
}

fn build_client(sub_matches: &ArgMatches) -> pressmap_scraper::Result<PageClient> {
    let mut builder = PageClient::builder();
    if let Some(proxy) = sub_matches.get_one::<String>("proxy") {
        builder = builder.proxy(proxy);
    }
    // The path subcommand has no control channel argument.
    if let Ok(Some(addr)) = sub_matches.try_get_one::<String>("control-addr") {
        builder = builder.control_addr(addr);
    }
    builder.build()
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
