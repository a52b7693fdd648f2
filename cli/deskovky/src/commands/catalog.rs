//! One-shot counterparts of the catalog chat commands.

use bpaf::Bpaf;

use crate::bot::BotCommand;

// Search for board games
#[derive(Debug, Bpaf, Clone)]
pub struct Games {
    /// What to search for, quote multiple words
    #[bpaf(positional("query"))]
    pub query: String,
}

impl From<Games> for BotCommand {
    fn from(args: Games) -> Self {
        BotCommand::Games { query: args.query }
    }
}

#[derive(Debug, Bpaf, Clone)]
pub struct GameInfo {
    /// ID of the game
    #[bpaf(positional("game-id"))]
    pub game_id: String,
}

impl From<GameInfo> for BotCommand {
    fn from(args: GameInfo) -> Self {
        BotCommand::GameInfo {
            game_id: args.game_id,
        }
    }
}

#[derive(Debug, Bpaf, Clone)]
pub struct Categories {}

impl From<Categories> for BotCommand {
    fn from(_: Categories) -> Self {
        BotCommand::Categories
    }
}

#[derive(Debug, Bpaf, Clone)]
pub struct Category {
    /// ID of the category
    #[bpaf(positional("category-id"))]
    pub category_id: String,
}

impl From<Category> for BotCommand {
    fn from(args: Category) -> Self {
        BotCommand::Category {
            category_id: args.category_id,
        }
    }
}

#[derive(Debug, Bpaf, Clone)]
pub struct Popular {}

impl From<Popular> for BotCommand {
    fn from(_: Popular) -> Self {
        BotCommand::Popular
    }
}
