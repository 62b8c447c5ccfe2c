use clap::{ArgGroup, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "plant-catalog")]
#[command(about = "Run and manage the plant store catalog")]
pub struct Cli {
    /// Catalog API root used by the client commands (overrides PLANT_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Keep the catalog in memory instead of MongoDB, pre-loaded with the sample plants
        #[arg(long)]
        in_memory: bool,
    },
    /// Replace the MongoDB catalog with the sample plants
    Seed,
    /// List plants, filtered and sorted
    List(ListArgs),
    /// Show one plant by ID
    Show {
        /// ID of the plant (ObjectId)
        #[arg(long)]
        id: String,
    },
    /// Add a new plant
    Add(AddArgs),
    /// Update fields of an existing plant
    Update(UpdateArgs),
    /// Flip a plant between in stock and out of stock
    ToggleStock {
        /// ID of the plant (ObjectId)
        #[arg(long)]
        id: String,
    },
    /// Remove a plant
    Remove {
        /// ID of the plant to remove (ObjectId)
        #[arg(long)]
        id: String,
    },
    /// Print the category tags
    Categories,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("stock").args(["in_stock", "out_of_stock"])))]
pub struct ListArgs {
    /// Match names, categories and descriptions containing this text
    #[arg(short, long)]
    pub search: Option<String>,
    /// Only plants tagged with this category
    #[arg(short, long)]
    pub category: Option<String>,
    #[arg(long)]
    pub min_price: Option<f64>,
    #[arg(long)]
    pub max_price: Option<f64>,
    #[arg(long)]
    pub in_stock: bool,
    #[arg(long)]
    pub out_of_stock: bool,
    /// name, price or careLevel
    #[arg(long, default_value = "name")]
    pub sort_by: String,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
    /// Print only IDs and names
    #[arg(long)]
    pub ids: bool,
}

impl ListArgs {
    pub fn stock_available(&self) -> Option<bool> {
        match (self.in_stock, self.out_of_stock) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Name of the plant
    #[arg(short = 'n', long = "name")]
    pub name: String,
    /// Price in rupees
    #[arg(short = 'p', long = "price")]
    pub price: f64,
    /// Category tags separated by commas, e.g. "Indoor,Air Purifying"
    #[arg(short = 'c', long = "categories")]
    pub categories: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub image_url: Option<String>,
    /// Easy, Medium or Hard
    #[arg(long)]
    pub care_level: Option<String>,
    /// Low, Medium or High
    #[arg(long)]
    pub water_needs: Option<String>,
    /// Low Light, Indirect Light, Bright Light or Full Sun
    #[arg(long)]
    pub light_needs: Option<String>,
    /// Add the plant as out of stock
    #[arg(long)]
    pub out_of_stock: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// ID of the plant to update (ObjectId)
    #[arg(long)]
    pub id: String,
    /// New name (optional)
    #[arg(short, long)]
    pub name: Option<String>,
    /// New price (optional)
    #[arg(short, long)]
    pub price: Option<f64>,
    /// Replacement category tags separated by commas (optional)
    #[arg(short, long)]
    pub categories: Option<String>,
    /// New description (optional)
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    /// Remove the description
    #[arg(long)]
    pub clear_description: bool,
    #[arg(long)]
    pub image_url: Option<String>,
    #[arg(long)]
    pub care_level: Option<String>,
    #[arg(long)]
    pub water_needs: Option<String>,
    #[arg(long)]
    pub light_needs: Option<String>,
    /// Set stock availability (true/false)
    #[arg(long)]
    pub stock_available: Option<bool>,
}

/// Splits a comma-separated tag list, dropping blanks.
pub fn split_categories(categories: &str) -> Vec<String> {
    categories
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
