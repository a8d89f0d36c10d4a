use crate::CLAP_STYLING;
use clap::{arg, command};
use pressmap_core::explore::DEFAULT_BASE_URL;
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("pressmap")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("pressmap")
        .styles(CLAP_STYLING)
        .subcommand_required(true)
        .subcommand(
            command!("init")
                .about("Initializes the pressmap database on your filesystem")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location to store the pressmap database")
                        .default_value("~/.config/pressmap/"),
                )
                .arg(
                    arg!(-f - -"force")
                        .help(
                            "Forces the overwriting of any existing database at the specified \
                        location.",
                        )
                        .required(false),
                ),
        )
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl the news search history for every company in a list, persisting \
                article excerpts.",
                )
                .arg(
                    arg!(-c --"companies" <PATH>)
                        .required(true)
                        .help("Semicolon-delimited company list (symbol;isin;name;sector)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-d --"database" <PATH>)
                        .required(false)
                        .help("Path to the article database")
                        .default_value("~/.config/pressmap/pressmap.db"),
                )
                .arg(
                    arg!(-b --"base-url" <URL>)
                        .required(true)
                        .help("Base URL of the news search")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-s --"symbol" <SYMBOL>)
                        .required(false)
                        .help("Restrict the crawl to a single symbol from the list"),
                )
                .arg(
                    arg!(--"max-pages" <NUM>)
                        .required(false)
                        .help("Result-page ceiling per company")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("100"),
                )
                .arg(
                    arg!(--"proxy" <URL>)
                        .required(false)
                        .help("Route all requests through this proxy, e.g. socks5://127.0.0.1:9050"),
                )
                .arg(
                    arg!(--"control-addr" <ADDR>)
                        .required(false)
                        .help("Control channel used to request a new identity after a failed request, e.g. 127.0.0.1:9051"),
                ),
        )
        .subcommand(
            command!("path")
                .about(
                    "Search the encyclopedia link graph for a path from a start page to a \
                search term.",
                )
                .arg(
                    arg!(--"start" <PATH>)
                        .required(true)
                        .help("Start page path, e.g. /wiki/Apple"),
                )
                .arg(
                    arg!(--"term" <TERM>)
                        .required(true)
                        .help("Case-insensitive term to look for in link targets and texts"),
                )
                .arg(
                    arg!(-b --"base-url" <URL>)
                        .required(false)
                        .help("Base URL of the explored site")
                        .default_value(DEFAULT_BASE_URL),
                )
                .arg(
                    arg!(--"max-depth" <NUM>)
                        .required(false)
                        .help("Maximum number of pages to follow away from the start page")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("7"),
                )
                .arg(
                    arg!(--"proxy" <URL>)
                        .required(false)
                        .help("Route all requests through this proxy"),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder_is_consistent() {
        command_argument_builder().debug_assert();
    }
}
