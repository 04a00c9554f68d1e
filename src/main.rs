use anyhow::{Context, Result};
use tracing::{info, warn};

use meal_planner::cli::{parse_args, Command};
use meal_planner::config::AppConfig;
use meal_planner::localization::{LocalizationManager, Translator};
use meal_planner::meal_assistant::WeeklyReport;
use meal_planner::meal_model::{split_ingredient_input, Day, MealEdit, Slot};
use meal_planner::persistence::{JsonFileStore, KeyValueStore};
use meal_planner::planner::MealPlanner;
use meal_planner::shopping_list::ShoppingItem;

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "meal_planner=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = parse_args();
    let mut config = AppConfig::from_env()?;
    if let Some(data) = cli.data {
        config.data_file = data;
    }

    info!(data_file = %config.data_file.display(), "Starting meal planner");
    let store = JsonFileStore::open(&config.data_file)
        .with_context(|| format!("Failed to open {}", config.data_file.display()))?;
    let mut planner = MealPlanner::load(store);
    let localization = LocalizationManager::new().context("Failed to load translations")?;

    run(cli.command, &config, &mut planner, &localization).await
}

fn day_label(tr: &Translator<'_>, day: Day) -> String {
    tr.t(day.as_str())
}

fn slot_label(tr: &Translator<'_>, slot: Slot) -> String {
    tr.t(slot.as_str())
}

fn print_items(items: &[ShoppingItem]) {
    for item in items {
        let mark = if item.checked { "x" } else { " " };
        if item.count > 1 {
            println!("  [{mark}] {} x{}", item.name, item.count);
        } else {
            println!("  [{mark}] {}", item.name);
        }
    }
}

async fn run<S: KeyValueStore>(
    command: Command,
    config: &AppConfig,
    planner: &mut MealPlanner<S>,
    localization: &LocalizationManager,
) -> Result<()> {
    let tr = localization.translator(planner.language());

    match command {
        Command::Show => {
            println!("{}", tr.t("planner-title"));
            for day in Day::ALL {
                println!("\n{}", day_label(&tr, day));
                for slot in Slot::ALL {
                    match planner.meal(day, slot) {
                        Some(meal) => {
                            println!("  {}: {} ({})", slot_label(&tr, slot), meal.title, meal.id);
                            if !meal.ingredients.is_empty() {
                                println!("      {}", meal.ingredients.join(", "));
                            }
                        }
                        None => println!("  {}: -", slot_label(&tr, slot)),
                    }
                }
            }
        }
        Command::Today { day } => {
            let day = day.unwrap_or_else(Day::today);
            let summary = planner.today_summary(day);
            println!("{}", tr.t("home-greeting"));
            println!("{}", tr.t_args("home-summary", &[("day", day_label(&tr, day).as_str())]));
            println!("\n{}", tr.t("home-todays-menu"));
            for (slot, meal) in &summary.slots {
                match meal {
                    Some(meal) => {
                        println!("  {}: {}", slot_label(&tr, *slot), meal.title);
                        if let Some(nutrition) = &meal.nutrition {
                            println!(
                                "      {} / C {} / P {} / F {}",
                                nutrition.calories, nutrition.carbs, nutrition.protein, nutrition.fat
                            );
                        }
                    }
                    None => println!("  {}: {}", slot_label(&tr, *slot), tr.t("home-not-planned")),
                }
            }
            println!("\n{}", tr.t("home-ingredients-title"));
            if summary.ingredients.is_empty() {
                println!("  {}", tr.t("home-no-ingredients"));
            } else {
                print_items(&summary.ingredients);
            }
            println!(
                "\n{}",
                tr.t_args("home-items-needed", &[("count", summary.items_needed.to_string().as_str())])
            );
        }
        Command::Set {
            day,
            slot,
            title,
            ingredients,
            recipe,
            keywords,
        } => {
            let edit = MealEdit::new(day, slot, title.trim())
                .with_ingredients(split_ingredient_input(&ingredients.unwrap_or_default()))
                .with_recipe(recipe.as_deref().unwrap_or_default())
                .with_image_keywords(keywords.as_deref().unwrap_or_default().trim());
            let clearing = edit.is_empty();
            planner.save_meal(edit)?;

            let args = [("day", day_label(&tr, day)), ("slot", slot_label(&tr, slot))];
            let args: Vec<(&str, &str)> = args.iter().map(|(k, v)| (*k, v.as_str())).collect();
            if clearing {
                println!("{}", tr.t_args("meal-cleared", &args));
                return Ok(());
            }
            println!("{}", tr.t_args("meal-saved", &args));

            let needs_image = planner.meal(day, slot).is_some_and(|m| m.image_url.is_none());
            if needs_image {
                match config.image_search() {
                    Ok(search) => {
                        planner.refresh_image(&search, day, slot).await?;
                    }
                    Err(e) => info!(error = %e, "Skipping photo lookup"),
                }
            }
        }
        Command::Clear { day, slot } => {
            planner.clear_meal(day, slot)?;
            let (day, slot) = (day_label(&tr, day), slot_label(&tr, slot));
            println!("{}", tr.t_args("meal-cleared", &[("day", day.as_str()), ("slot", slot.as_str())]));
        }
        Command::ClearWeek => {
            planner.clear_week()?;
            println!("{}", tr.t("plan-cleared"));
        }
        Command::Move { id, day, slot } => {
            if planner.move_meal(&id, day, slot)? {
                let (day, slot) = (day_label(&tr, day), slot_label(&tr, slot));
                println!("{}", tr.t_args("meal-moved", &[("day", day.as_str()), ("slot", slot.as_str())]));
            } else {
                println!("{}", tr.t_args("meal-not-found", &[("id", id.as_str())]));
            }
        }
        Command::Fill { day, slot, title } => {
            let has_title = title.as_deref().is_some_and(|t| !t.trim().is_empty())
                || planner.meal(day, slot).is_some_and(|m| !m.title.trim().is_empty());
            if !has_title {
                println!("{}", tr.t("meal-needs-title"));
                return Ok(());
            }

            let filled = match config.text_generator() {
                Ok(generator) => planner.fill_meal(&generator, day, slot, title.as_deref()).await?,
                Err(e) => {
                    warn!(error = %e, "Text generation is not available");
                    false
                }
            };
            match planner.meal(day, slot).filter(|_| filled) {
                Some(meal) => {
                    println!("{}", tr.t_args("meal-filled", &[("title", meal.title.as_str())]));
                    println!("  {}", meal.ingredients.join(", "));
                    if !meal.recipe.is_empty() {
                        println!("\n{}", meal.recipe);
                    }
                }
                None => println!("{}", tr.t("meal-fill-failed")),
            }
        }
        Command::Image { day, slot } => {
            let updated = match config.image_search() {
                Ok(search) => planner.refresh_image(&search, day, slot).await?,
                Err(e) => {
                    warn!(error = %e, "Image search is not available");
                    false
                }
            };
            match planner.meal(day, slot).filter(|_| updated) {
                Some(meal) => {
                    println!("{}", tr.t_args("image-updated", &[("title", meal.title.as_str())]));
                    if let Some(url) = &meal.image_url {
                        println!("  {url}");
                    }
                }
                None => println!("{}", tr.t("image-not-found")),
            }
        }
        Command::Shopping { smart } => {
            if smart {
                let merged = match config.text_generator() {
                    Ok(generator) => planner.smart_merge(&generator).await,
                    Err(e) => {
                        warn!(error = %e, "Text generation is not available");
                        false
                    }
                };
                if !merged {
                    println!("{}", tr.t("shopping-merge-failed"));
                }
            }

            let title = if planner.is_smart_merged() { "shopping-smart-title" } else { "shopping-title" };
            println!("{}", tr.t(title));
            let items = planner.displayed_shopping_list();
            if items.is_empty() {
                println!("  {}", tr.t("shopping-empty"));
            } else {
                print_items(&items);
            }
        }
        Command::Check { name } => {
            let key = if planner.toggle_checked(&name)? { "shopping-checked" } else { "shopping-unchecked" };
            println!("{}", tr.t_args(key, &[("name", name.as_str())]));
        }
        Command::ClearPurchased => {
            let count = planner.clear_purchased()?;
            println!("{}", tr.t_args("shopping-cleared", &[("count", count.to_string().as_str())]));
        }
        Command::Recipes => {
            println!("{}", tr.t("recipes-title"));
            if planner.recipes().is_empty() {
                println!("  {}", tr.t("recipes-empty"));
            }
            for recipe in planner.recipes().recipes() {
                println!("\n{} ({})", recipe.name, recipe.id);
                if !recipe.ingredients.is_empty() {
                    println!("  {}", recipe.ingredients.join(", "));
                }
                println!("  {}", recipe.instructions);
            }
        }
        Command::RemoveRecipe { id } => {
            let key = if planner.remove_recipe(&id)? { "recipes-removed" } else { "recipes-not-found" };
            println!("{}", tr.t_args(key, &[("id", id.as_str())]));
        }
        Command::Analyze => {
            let report = match config.text_generator() {
                Ok(generator) => planner.analyze_week(&generator).await,
                Err(e) if planner.meals().is_empty() => {
                    info!(error = %e, "No meals, analysis skipped");
                    WeeklyReport::NoMeals
                }
                Err(e) => {
                    warn!(error = %e, "Text generation is not available");
                    WeeklyReport::Failed
                }
            };
            match report {
                WeeklyReport::NoMeals => println!("{}", tr.t("analysis-no-meals")),
                WeeklyReport::Failed => println!("{}", tr.t("analysis-failed")),
                WeeklyReport::Ready(analysis) => {
                    println!("{}\n\n{}", tr.t("analysis-title"), analysis.analysis);
                    if !analysis.advice.is_empty() {
                        println!("\n{}", tr.t("analysis-advice"));
                        for tip in &analysis.advice {
                            println!("  - {tip}");
                        }
                    }
                }
            }
        }
        Command::Language { language } => {
            let language = match language {
                Some(language) => {
                    planner.set_language(language)?;
                    language
                }
                None => planner.toggle_language()?,
            };
            let tr = localization.translator(language);
            println!("{}", tr.t_args("settings-language", &[("language", language.code())]));
        }
        Command::Theme { theme } => {
            planner.set_theme(theme)?;
            println!("{}", tr.t_args("settings-theme", &[("theme", theme.display_name())]));
        }
    }

    Ok(())
}
