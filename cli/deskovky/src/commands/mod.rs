mod catalog;
mod chat;

use std::time::Instant;

use anyhow::Result;
use bpaf::Bpaf;
use deskovky_catalog::ClientTrait;
use indoc::indoc;
use tracing::debug;

use crate::bot::{Bot, BotCommand};
use crate::config::Config;
use crate::utils::init::init_catalog_client;
use crate::utils::message;

static DESKOVKY_DESCRIPTION: &'_ str = indoc! {"
    Deskovky answers board game questions from the zatrolene-hry.cz catalog.\n\n

    Run 'deskovky chat' to answer chat commands such as '!games catan' read from stdin,
    or use one of the commands below for a single answer."
};

fn vec_len<T>(x: Vec<T>) -> usize {
    Vec::len(&x)
}

#[derive(Bpaf, Clone, Copy, Debug)]
pub enum Verbosity {
    Verbose(
        /// Increase logging verbosity
        ///
        /// Invoke multiple times for increasing detail.
        #[bpaf(short('v'), long("verbose"), req_flag(()), many, map(vec_len))]
        usize,
    ),

    /// Silence logs except for errors
    #[bpaf(short, long)]
    Quiet,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Verbose(0)
    }
}

#[derive(Bpaf)]
#[bpaf(options, descr(DESKOVKY_DESCRIPTION))]
pub struct DeskovkyCli(#[bpaf(external(deskovky_args))] pub DeskovkyArgs);

/// Main deskovky args parser
#[derive(Debug, Bpaf)]
#[bpaf(ignore_rustdoc)] // we don't want this struct to be interpreted as a group
pub struct DeskovkyArgs {
    /// Verbose mode
    ///
    /// Invoke multiple times for increasing detail.
    #[bpaf(external, fallback(Default::default()))]
    pub verbosity: Verbosity,

    /// Base URL of the catalog API, overrides the configured one
    #[bpaf(long, argument("URL"))]
    pub catalog_url: Option<String>,

    #[bpaf(external(commands))]
    command: Commands,
}

impl DeskovkyArgs {
    /// Build the bot for the configured catalog and run the command.
    ///
    /// The catalog client is closed once the command is done, whether it
    /// succeeded or not.
    pub async fn handle(self, config: Config) -> Result<()> {
        let client = init_catalog_client(&config)?;
        let bot = Bot::new(client, config.command_prefix.clone(), config.search_limit);

        let result = self.command.handle(&bot).await;

        debug!("closing catalog client");
        bot.close();
        result
    }
}

#[derive(Bpaf, Clone, Debug)]
enum Commands {
    /// Answer chat commands read line by line from stdin
    #[bpaf(command)]
    Chat(#[bpaf(external(chat::chat))] chat::Chat),

    /// Search for board games
    #[bpaf(command)]
    Games(#[bpaf(external(catalog::games))] catalog::Games),

    /// Show details about a single game
    #[bpaf(command("gameinfo"))]
    GameInfo(#[bpaf(external(catalog::game_info))] catalog::GameInfo),

    /// List available game categories
    #[bpaf(command)]
    Categories(#[bpaf(external(catalog::categories))] catalog::Categories),

    /// List games in a category
    #[bpaf(command)]
    Category(#[bpaf(external(catalog::category))] catalog::Category),

    /// List popular games
    #[bpaf(command)]
    Popular(#[bpaf(external(catalog::popular))] catalog::Popular),
}

impl Commands {
    async fn handle<C: ClientTrait>(self, bot: &Bot<C>) -> Result<()> {
        match self {
            Commands::Chat(args) => args.handle(bot).await?,
            Commands::Games(args) => answer_once(bot, args.into()).await,
            Commands::GameInfo(args) => answer_once(bot, args.into()).await,
            Commands::Categories(args) => answer_once(bot, args.into()).await,
            Commands::Category(args) => answer_once(bot, args.into()).await,
            Commands::Popular(args) => answer_once(bot, args.into()).await,
        }
        Ok(())
    }
}

/// Answer a single command the same way it would be answered in chat.
async fn answer_once<C: ClientTrait>(bot: &Bot<C>, command: BotCommand) {
    let received = Instant::now();
    if let Some(progress) = command.progress_message() {
        message::plain(progress);
    }
    let reply = bot.run(command, received).await;
    print!("{reply}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> DeskovkyArgs {
        let DeskovkyCli(args) = deskovky_cli().run_inner(args).unwrap();
        args
    }

    #[test]
    fn parses_one_shot_commands() {
        let args = parse(&["--catalog-url", "http://localhost/api", "gameinfo", "42"]);
        assert_eq!(args.catalog_url.as_deref(), Some("http://localhost/api"));
        assert!(
            matches!(&args.command, Commands::GameInfo(info) if BotCommand::from(info.clone()) == BotCommand::GameInfo { game_id: "42".to_string() }),
            "found: {:?}",
            args.command
        );

        let args = parse(&["-vv", "games", "ticket to ride"]);
        assert!(matches!(args.verbosity, Verbosity::Verbose(2)));
        assert!(matches!(&args.command, Commands::Games(_)));
    }

    #[test]
    fn parses_chat_and_quiet() {
        let args = parse(&["-q", "chat"]);
        assert!(matches!(args.verbosity, Verbosity::Quiet));
        assert!(matches!(args.command, Commands::Chat(_)));
    }

    #[test]
    fn command_is_required() {
        assert!(deskovky_cli().run_inner(&[] as &[&str]).is_err());
        assert!(deskovky_cli().run_inner(&["gameinfo"][..]).is_err());
    }
}
