//! Chat command parsing and dispatch.
//!
//! A chat message is a command if it starts with the configured prefix,
//! e.g. `!games catan`. Every command produces exactly one [Reply]; catalog
//! failures only ever show up as "not found" replies.

mod reply;

use std::time::Instant;

use deskovky_catalog::{ClientTrait, Record, SearchLimit};
use thiserror::Error;
use tracing::{debug, instrument};

pub use self::reply::Reply;

/// How many games a list reply shows.
const SHOWN_GAMES: usize = 5;
/// How many categories the categories reply shows.
const SHOWN_CATEGORIES: usize = 10;

const POWERED_BY: &str = "Powered by zatrolene-hry.cz API";

struct CommandHelp {
    name: &'static str,
    usage: &'static str,
    help: &'static str,
}

const COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "help",
        usage: "[command]",
        help: "Show available commands",
    },
    CommandHelp {
        name: "info",
        usage: "",
        help: "Display bot information",
    },
    CommandHelp {
        name: "ping",
        usage: "",
        help: "Check if the bot is responsive",
    },
    CommandHelp {
        name: "games",
        usage: "<query>",
        help: "Search for board games",
    },
    CommandHelp {
        name: "gameinfo",
        usage: "<game_id>",
        help: "Get detailed information about a game",
    },
    CommandHelp {
        name: "categories",
        usage: "",
        help: "List available game categories",
    },
    CommandHelp {
        name: "category",
        usage: "<category_id>",
        help: "List games in a category",
    },
    CommandHelp {
        name: "popular",
        usage: "",
        help: "List popular games",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Help { command: Option<String> },
    Info,
    Ping,
    Games { query: String },
    GameInfo { game_id: String },
    Categories,
    Category { category_id: String },
    Popular,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("command '{0}' not found")]
    NotFound(String),
    #[error("missing required argument for '{0}'")]
    MissingArgument(&'static str),
}

impl BotCommand {
    /// Parse a chat message.
    ///
    /// Returns [None] if the message is not addressed to the bot.
    pub fn parse(prefix: &str, message: &str) -> Option<Result<BotCommand, CommandError>> {
        let rest = message.trim().strip_prefix(prefix)?;
        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };
        if name.is_empty() {
            return None;
        }

        let first_arg = args.split_whitespace().next().map(str::to_string);

        let command = match name {
            "help" => Ok(BotCommand::Help { command: first_arg }),
            "info" => Ok(BotCommand::Info),
            "ping" => Ok(BotCommand::Ping),
            "games" if args.is_empty() => Err(CommandError::MissingArgument("games")),
            "games" => Ok(BotCommand::Games {
                query: args.to_string(),
            }),
            "gameinfo" => first_arg
                .map(|game_id| BotCommand::GameInfo { game_id })
                .ok_or(CommandError::MissingArgument("gameinfo")),
            "categories" => Ok(BotCommand::Categories),
            "category" => first_arg
                .map(|category_id| BotCommand::Category { category_id })
                .ok_or(CommandError::MissingArgument("category")),
            "popular" => Ok(BotCommand::Popular),
            other => Err(CommandError::NotFound(other.to_string())),
        };
        Some(command)
    }

    /// Message shown while a slow command is running.
    pub fn progress_message(&self) -> Option<String> {
        match self {
            BotCommand::Games { query } => {
                Some(format!("🔍 Searching for games matching: {query}..."))
            },
            BotCommand::GameInfo { game_id } => {
                Some(format!("🔍 Fetching information for game ID: {game_id}..."))
            },
            BotCommand::Categories => Some("📚 Fetching categories...".to_string()),
            BotCommand::Category { category_id } => {
                Some(format!("🔍 Fetching games in category: {category_id}..."))
            },
            BotCommand::Popular => Some("🔥 Fetching popular games...".to_string()),
            BotCommand::Help { .. } | BotCommand::Info | BotCommand::Ping => None,
        }
    }
}

/// Answers chat commands using a catalog client it owns.
pub struct Bot<C> {
    client: C,
    prefix: String,
    search_limit: SearchLimit,
}

impl<C: ClientTrait> Bot<C> {
    pub fn new(client: C, prefix: impl Into<String>, search_limit: SearchLimit) -> Self {
        Self {
            client,
            prefix: prefix.into(),
            search_limit,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn parse(&self, message: &str) -> Option<Result<BotCommand, CommandError>> {
        BotCommand::parse(&self.prefix, message)
    }

    /// Parse and answer a chat message, ignoring messages that are not
    /// commands.
    pub async fn handle_message(&self, message: &str) -> Option<Reply> {
        let received = Instant::now();
        let parsed = self.parse(message)?;
        Some(self.respond(parsed, received).await)
    }

    /// Answer a parsed command or explain why it could not be parsed.
    ///
    /// `received` is when the message arrived; `ping` reports the time since.
    pub async fn respond(
        &self,
        parsed: Result<BotCommand, CommandError>,
        received: Instant,
    ) -> Reply {
        match parsed {
            Ok(command) => self.run(command, received).await,
            Err(err) => {
                debug!(%err, "invalid command");
                self.error_reply(&err)
            },
        }
    }

    #[instrument(skip(self, received))]
    pub async fn run(&self, command: BotCommand, received: Instant) -> Reply {
        match command {
            BotCommand::Help { command } => self.help(command.as_deref()),
            BotCommand::Info => self.info(),
            BotCommand::Ping => Reply::text(format!(
                "🏓 Pong! Latency: {}ms",
                received.elapsed().as_millis()
            )),
            BotCommand::Games { query } => {
                let games = self.client.search(&query, self.search_limit).await;
                if games.is_empty() {
                    return Reply::text("❌ No games found matching your query.");
                }
                game_list(format!("Search Results for '{query}'"), &games)
            },
            BotCommand::GameInfo { game_id } => match self.client.detail(&game_id).await {
                Some(game) => game_details(&game),
                None => Reply::text(format!("❌ Game with ID {game_id} not found.")),
            },
            BotCommand::Categories => {
                let categories = self.client.categories().await;
                if categories.is_empty() {
                    return Reply::text("❌ No categories found.");
                }
                category_list(&categories)
            },
            BotCommand::Category { category_id } => {
                let games = self
                    .client
                    .by_category(&category_id, self.search_limit)
                    .await;
                if games.is_empty() {
                    return Reply::text(format!("❌ No games found in category {category_id}."));
                }
                game_list(format!("Games in Category '{category_id}'"), &games)
            },
            BotCommand::Popular => {
                let games = self.client.popular(self.search_limit).await;
                if games.is_empty() {
                    return Reply::text("❌ No popular games found.");
                }
                game_list("Popular Games".to_string(), &games)
            },
        }
    }

    /// Release the catalog client's resources.
    pub fn close(&self) {
        self.client.close();
    }

    fn help(&self, command: Option<&str>) -> Reply {
        let prefix = &self.prefix;

        let Some(name) = command else {
            return COMMANDS
                .iter()
                .fold(Reply::embed("Commands", "Available commands:"), |reply, cmd| {
                    reply.field(usage_line(prefix, cmd), cmd.help)
                })
                .footer(format!("Use {prefix}help <command> for more info on a command."));
        };

        match COMMANDS.iter().find(|cmd| cmd.name == name) {
            Some(cmd) => Reply::embed(usage_line(prefix, cmd), cmd.help),
            None => self.error_reply(&CommandError::NotFound(name.to_string())),
        }
    }

    fn info(&self) -> Reply {
        Reply::embed(
            "Board Game Bot",
            "A bot for managing and discovering board games",
        )
        .inline_field("Prefix", &self.prefix)
        .inline_field("Commands", COMMANDS.len().to_string())
        .footer(POWERED_BY)
    }

    fn error_reply(&self, err: &CommandError) -> Reply {
        let prefix = &self.prefix;
        match err {
            CommandError::NotFound(_) => Reply::text(format!(
                "❌ Command not found. Use `{prefix}help` to see available commands."
            )),
            CommandError::MissingArgument(command) => Reply::text(format!(
                "❌ Missing required argument. Use `{prefix}help {command}` for usage."
            )),
        }
    }
}

fn usage_line(prefix: &str, cmd: &CommandHelp) -> String {
    if cmd.usage.is_empty() {
        format!("{prefix}{}", cmd.name)
    } else {
        format!("{prefix}{} {}", cmd.name, cmd.usage)
    }
}

fn game_list(title: String, games: &[Record]) -> Reply {
    let reply = games.iter().take(SHOWN_GAMES).enumerate().fold(
        Reply::embed(title, format!("Found {} game(s)", games.len())),
        |reply, (i, game)| {
            let name = game.get_display("name").unwrap_or_else(|| "Unknown".to_string());
            let id = game.get_display("id").unwrap_or_else(|| "N/A".to_string());
            reply.field(format!("{}. {name}", i + 1), format!("ID: {id}"))
        },
    );

    if games.len() > SHOWN_GAMES {
        reply.footer(format!("Showing {SHOWN_GAMES} of {} results", games.len()))
    } else {
        reply
    }
}

fn game_details(game: &Record) -> Reply {
    let title = game
        .get_display("name")
        .unwrap_or_else(|| "Unknown Game".to_string());
    let description = game
        .get_display("description")
        .unwrap_or_else(|| "No description available".to_string());

    [
        ("Players", "players"),
        ("Playtime", "playtime"),
        ("Age", "age"),
        ("Year", "year"),
    ]
    .into_iter()
    .fold(Reply::embed(title, description), |reply, (name, key)| {
        match game.get_display(key) {
            Some(value) => reply.inline_field(name, value),
            None => reply,
        }
    })
}

fn category_list(categories: &[Record]) -> Reply {
    let names = categories
        .iter()
        .take(SHOWN_CATEGORIES)
        .map(|category| {
            let name = category
                .get_display("name")
                .unwrap_or_else(|| "Unknown".to_string());
            format!("• {name}")
        })
        .collect::<Vec<_>>()
        .join("\n");

    let reply = Reply::embed(
        "Board Game Categories",
        format!("Total: {} categories", categories.len()),
    )
    .field("Categories", names);

    if categories.len() > SHOWN_CATEGORIES {
        reply.footer(format!(
            "Showing {SHOWN_CATEGORIES} of {} categories",
            categories.len()
        ))
    } else {
        reply
    }
}

#[cfg(test)]
mod tests {
    use deskovky_catalog::{CatalogClient, CatalogClientConfig, Client, MockClient, MockResponse};
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use std::time::Duration;

    use super::reply::Field;
    use super::*;

    fn records(value: Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    fn games(n: usize) -> Vec<Record> {
        (1..=n)
            .map(|i| {
                Record::from_value(json!({"id": i.to_string(), "name": format!("Game {i}")}))
                    .unwrap()
            })
            .collect()
    }

    fn bot(responses: impl IntoIterator<Item = MockResponse>) -> Bot<MockClient> {
        Bot::new(MockClient::new(responses), "!", 10)
    }

    #[test]
    fn parses_commands_and_arguments() {
        let parse = |message| BotCommand::parse("!", message);

        assert_eq!(
            parse("!games ticket to ride"),
            Some(Ok(BotCommand::Games {
                query: "ticket to ride".to_string()
            }))
        );
        assert_eq!(
            parse("  !gameinfo 42 extra"),
            Some(Ok(BotCommand::GameInfo {
                game_id: "42".to_string()
            }))
        );
        assert_eq!(parse("!categories"), Some(Ok(BotCommand::Categories)));
        assert_eq!(
            parse("!help games"),
            Some(Ok(BotCommand::Help {
                command: Some("games".to_string())
            }))
        );
    }

    #[test]
    fn ignores_messages_without_prefix() {
        assert_eq!(BotCommand::parse("!", "games catan"), None);
        assert_eq!(BotCommand::parse("!", "!"), None);
        assert_eq!(BotCommand::parse("!", "! games"), None);
        assert_eq!(BotCommand::parse("?", "!games catan"), None);
    }

    #[test]
    fn reports_missing_arguments_and_unknown_commands() {
        assert_eq!(
            BotCommand::parse("!", "!games   "),
            Some(Err(CommandError::MissingArgument("games")))
        );
        assert_eq!(
            BotCommand::parse("!", "!gameinfo"),
            Some(Err(CommandError::MissingArgument("gameinfo")))
        );
        assert_eq!(
            BotCommand::parse("!", "!dance"),
            Some(Err(CommandError::NotFound("dance".to_string())))
        );
    }

    #[tokio::test]
    async fn search_shows_first_five_games() {
        let bot = bot([MockResponse::Search(games(7))]);

        let reply = bot.handle_message("!games game").await.unwrap();

        assert_eq!(reply.title.as_deref(), Some("Search Results for 'game'"));
        assert_eq!(reply.description.as_deref(), Some("Found 7 game(s)"));
        assert_eq!(reply.fields.len(), 5);
        assert_eq!(reply.fields[0], Field {
            name: "1. Game 1".to_string(),
            value: "ID: 1".to_string(),
            inline: false,
        });
        assert_eq!(reply.footer.as_deref(), Some("Showing 5 of 7 results"));
    }

    #[tokio::test]
    async fn search_without_results_is_not_found() {
        let bot = bot([]);

        let reply = bot.handle_message("!games nothing").await.unwrap();

        assert_eq!(reply, Reply::text("❌ No games found matching your query."));
    }

    #[tokio::test]
    async fn list_entries_without_fields_are_shown_as_unknown() {
        let bot = bot([MockResponse::Popular(records(json!([{"rank": 1}])))]);

        let reply = bot.run(BotCommand::Popular, Instant::now()).await;

        assert_eq!(reply.fields[0].name, "1. Unknown");
        assert_eq!(reply.fields[0].value, "ID: N/A");
        assert_eq!(reply.footer, None);
    }

    #[tokio::test]
    async fn game_info_shows_known_fields() {
        let game = Record::from_value(json!({
            "id": "12",
            "name": "Azul",
            "players": "2-4",
            "year": 2017,
        }))
        .unwrap();
        let bot = bot([MockResponse::Detail(Some(game))]);

        let reply = bot.handle_message("!gameinfo 12").await.unwrap();

        assert_eq!(
            reply,
            Reply::embed("Azul", "No description available")
                .inline_field("Players", "2-4")
                .inline_field("Year", "2017")
        );
    }

    #[tokio::test]
    async fn game_info_not_found() {
        let bot = bot([MockResponse::Detail(None)]);

        let reply = bot.handle_message("!gameinfo 404").await.unwrap();

        assert_eq!(reply, Reply::text("❌ Game with ID 404 not found."));
    }

    #[tokio::test]
    async fn categories_show_first_ten_names() {
        let categories = (1..=12)
            .map(|i| Record::from_value(json!({"name": format!("Cat {i}")})).unwrap())
            .collect();
        let bot = bot([MockResponse::Categories(categories)]);

        let reply = bot.run(BotCommand::Categories, Instant::now()).await;

        assert_eq!(reply.description.as_deref(), Some("Total: 12 categories"));
        assert_eq!(reply.fields.len(), 1);
        assert_eq!(reply.fields[0].value.lines().count(), 10);
        assert!(reply.fields[0].value.starts_with("• Cat 1\n• Cat 2"));
        assert_eq!(reply.footer.as_deref(), Some("Showing 10 of 12 categories"));
    }

    #[tokio::test]
    async fn category_without_games_is_not_found() {
        let bot = bot([MockResponse::ByCategory(vec![])]);

        let reply = bot.handle_message("!category party").await.unwrap();

        assert_eq!(reply, Reply::text("❌ No games found in category party."));
    }

    #[tokio::test]
    async fn error_replies_point_to_help() {
        let bot = Bot::new(MockClient::default(), "?", 10);

        assert_eq!(
            bot.handle_message("?dance").await,
            Some(Reply::text(
                "❌ Command not found. Use `?help` to see available commands."
            ))
        );
        assert_eq!(
            bot.handle_message("?category").await,
            Some(Reply::text(
                "❌ Missing required argument. Use `?help category` for usage."
            ))
        );
        assert_eq!(bot.handle_message("!games catan").await, None);
    }

    #[tokio::test]
    async fn help_lists_every_command() {
        let bot = bot([]);

        let reply = bot.run(BotCommand::Help { command: None }, Instant::now()).await;

        let names = reply.fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, [
            "!help [command]",
            "!info",
            "!ping",
            "!games <query>",
            "!gameinfo <game_id>",
            "!categories",
            "!category <category_id>",
            "!popular",
        ]);

        let help = BotCommand::Help {
            command: Some("gameinfo".to_string()),
        };
        let reply = bot.run(help, Instant::now()).await;
        assert_eq!(
            reply,
            Reply::embed("!gameinfo <game_id>", "Get detailed information about a game")
        );
    }

    #[tokio::test]
    async fn ping_and_info_do_not_use_the_catalog() {
        let client = MockClient::new([MockResponse::Popular(games(1))]);
        let bot = Bot::new(client, "!", 10);

        let pong = bot.run(BotCommand::Ping, Instant::now()).await;
        assert!(pong.to_string().starts_with("🏓 Pong! Latency: "));

        let info = bot.run(BotCommand::Info, Instant::now()).await;
        assert_eq!(info.footer.as_deref(), Some(POWERED_BY));
        assert_eq!(bot.client.remaining(), 1);
    }

    #[tokio::test]
    async fn ping_reports_time_since_message_arrived() {
        let bot = bot([]);
        let received = Instant::now() - Duration::from_millis(250);

        let pong = bot.run(BotCommand::Ping, received).await.to_string();

        let latency = pong
            .trim_end()
            .strip_prefix("🏓 Pong! Latency: ")
            .and_then(|rest| rest.strip_suffix("ms"))
            .and_then(|ms| ms.parse::<u128>().ok())
            .unwrap();
        assert!(latency >= 250, "latency {latency}ms in {pong:?}");
    }

    #[test]
    fn only_catalog_commands_report_progress() {
        assert_eq!(
            BotCommand::Games {
                query: "go".to_string()
            }
            .progress_message()
            .as_deref(),
            Some("🔍 Searching for games matching: go...")
        );
        assert_eq!(BotCommand::Ping.progress_message(), None);
    }

    #[tokio::test]
    async fn answers_from_live_catalog() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.path("/search").query_param("query", "chess");
            then.status(200).json_body(json!({"id": "42", "name": "Chess"}));
        });

        let client = CatalogClient::new(CatalogClientConfig::new(server.base_url())).unwrap();
        let bot = Bot::new(Client::from(client), "!", 10);

        let reply = bot.handle_message("!games chess").await.unwrap();
        bot.close();

        assert_eq!(
            reply,
            Reply::embed("Search Results for 'chess'", "Found 1 game(s)")
                .field("1. Chess", "ID: 42")
        );
    }
}
