use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "newsdesk", version, about = "News content lookup client")]
pub struct Cli {
    #[arg(long, short, global = true, help = "Log debug output")]
    pub verbose: bool,
    #[arg(long, global = true, help = "Config file (defaults to the user config dir)")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Items related to a primary item.
    Related {
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value = "")]
        language: String,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        district: Option<String>,
        #[arg(long, help = "Id of the primary item, never returned")]
        exclude: String,
        #[arg(long)]
        max: Option<usize>,
    },
    /// One article, with a placeholder when the service is unavailable.
    Article {
        id: String,
    },
    Categories {
        #[arg(long)]
        language: Option<String>,
    },
    Languages,
    /// First item to open for a category.
    CategoryLead {
        category_id: String,
        #[arg(long)]
        language: Option<String>,
    },
    Language {
        #[command(subcommand)]
        command: LanguageCommands,
    },
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum LanguageCommands {
    Show,
    Set {
        id: String,
        code: String,
        name: String,
    },
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    Set { token: String },
    Clear,
}
