use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::localization::{Language, Theme};
use crate::meal_model::{Day, Slot};

#[derive(Parser, Debug)]
#[command(author, version, about = "Weekly meal planner with an aggregated shopping list", long_about = None)]
pub struct Cli {
    /// Planner data file (overrides MEAL_PLANNER_DATA)
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the weekly plan
    Show,
    /// Show the summary of one day (today by default)
    Today { day: Option<Day> },
    /// Plan a meal; an empty title and no ingredients clears the slot
    Set {
        day: Day,
        slot: Slot,
        title: String,
        /// Comma separated ingredients
        #[arg(short, long)]
        ingredients: Option<String>,
        #[arg(short, long)]
        recipe: Option<String>,
        /// Photo search keywords
        #[arg(short = 'k', long)]
        keywords: Option<String>,
    },
    /// Remove the meal of a slot
    Clear { day: Day, slot: Slot },
    /// Remove every meal of the week
    ClearWeek,
    /// Move a meal, swapping with the meal already at the target
    Move { id: String, day: Day, slot: Slot },
    /// Generate ingredients, recipe and nutrition with AI
    Fill {
        day: Day,
        slot: Slot,
        /// Dish name, defaults to the planned meal's title
        title: Option<String>,
    },
    /// Look up a photo for a planned meal
    Image { day: Day, slot: Slot },
    /// Print the shopping list
    Shopping {
        /// Clean the list up with AI before printing
        #[arg(long)]
        smart: bool,
    },
    /// Toggle the purchased mark of an ingredient
    Check { name: String },
    /// Remove purchased ingredients from the list
    ClearPurchased,
    /// List favourite recipes
    Recipes,
    /// Remove a favourite recipe
    RemoveRecipe { id: String },
    /// AI nutrition analysis of the week
    Analyze,
    /// Set the display language, or toggle it when omitted
    Language { language: Option<Language> },
    /// Set the colour theme
    Theme { theme: Theme },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
