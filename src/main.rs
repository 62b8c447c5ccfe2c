use anyhow::{Context, Result};
use clap::Parser;
use plant_catalog::api::{self, AppState};
use plant_catalog::client::{CatalogClient, ClientError};
use plant_catalog::config::Config;
use plant_catalog::query::{PlantQuery, SortOrder};
use plant_catalog::schema::PlantInput;
use plant_catalog::store::{InMemoryPlantStore, MongoPlantStore, PlantStore};
use plant_catalog::view::{render_card, CatalogView};
use plant_catalog::{seed, telemetry};
use serde_json::{json, Value};
use tokio::net::TcpListener;

mod cli;
use cli::{split_categories, AddArgs, Cli, Commands, ListArgs, UpdateArgs};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }

    match cli.command {
        Commands::Serve { in_memory } => {
            telemetry::init(config.environment);
            if in_memory {
                let store = InMemoryPlantStore::new();
                store.replace_all(seed::sample_plants()?).await?;
                serve(store, config.port).await
            } else {
                let store = MongoPlantStore::connect(&config.mongo_uri, &config.mongo_db).await?;
                serve(store, config.port).await
            }
        }
        Commands::Seed => {
            telemetry::init(config.environment);
            let store = MongoPlantStore::connect(&config.mongo_uri, &config.mongo_db).await?;
            let inserted = store.replace_all(seed::sample_plants()?).await?;
            println!("Seeded {inserted} plants");
            Ok(())
        }
        command => {
            let client = CatalogClient::new(&config.api_url)?;
            if let Err(e) = run_client(&client, command).await {
                eprintln!("Error: {}", e.user_message());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

async fn serve<S: PlantStore>(store: S, port: u16) -> Result<()> {
    let app = api::router(AppState::new(store));
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    tracing::info!("plant catalog listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}

async fn run_client(client: &CatalogClient, command: Commands) -> Result<(), ClientError> {
    match command {
        Commands::List(args) => list(client, args).await?,
        Commands::Show { id } => {
            let plant = client.get_plant(&id).await?;
            print!("{}", render_card(&plant));
        }
        Commands::Add(args) => {
            let plant = client.create_plant(&add_input(args)).await?;
            println!("Plant added, ID: {}", plant.id);
        }
        Commands::Update(args) => {
            let id = args.id.clone();
            let input = update_input(args);
            if input == PlantInput::default() {
                println!("No changes given for plant {id}");
                return Ok(());
            }
            let plant = client.update_plant(&id, &input).await?;
            println!("Plant ID {} updated", plant.id);
        }
        Commands::ToggleStock { id } => {
            let plant = client.get_plant(&id).await?;
            let input = PlantInput {
                stock_available: Some(json!(!plant.stock_available)),
                ..Default::default()
            };
            let plant = client.update_plant(&id, &input).await?;
            let state = if plant.stock_available {
                "in stock"
            } else {
                "out of stock"
            };
            println!("'{}' is now {state}", plant.name);
        }
        Commands::Remove { id } => {
            let message = client.delete_plant(&id).await?;
            println!("{message}: {id}");
        }
        Commands::Categories => {
            for category in client.categories().await? {
                println!("{category}");
            }
        }
        // Run against the store directly in main.
        Commands::Serve { .. } | Commands::Seed => {}
    }
    Ok(())
}

/// Price band and stock are filtered by the server; search, category and
/// sort run over the fetched set, so the summary counts against it.
async fn list(client: &CatalogClient, args: ListArgs) -> Result<(), ClientError> {
    let query = PlantQuery {
        min_price: args.min_price.map(|p| p.to_string()),
        max_price: args.max_price.map(|p| p.to_string()),
        stock_available: args.stock_available().map(|s| s.to_string()),
        ..Default::default()
    };
    let listing = client.list_plants(&query).await?;

    let mut view = CatalogView::new();
    view.replace(listing.plants);
    view.search = args.search.unwrap_or_default();
    if let Some(category) = args.category {
        view.category = category;
    }
    // Reuse the query parser so an unknown sort field falls back the same way.
    let sort = PlantQuery {
        sort_by: Some(args.sort_by),
        ..Default::default()
    }
    .parse();
    view.sort_by = sort.sort_by;
    view.sort_order = if args.desc {
        SortOrder::Desc
    } else {
        SortOrder::Asc
    };

    print!("{}", view.render(args.ids));
    Ok(())
}

fn add_input(args: AddArgs) -> PlantInput {
    PlantInput {
        name: Some(Value::from(args.name)),
        price: Some(json!(args.price)),
        categories: Some(json!(split_categories(&args.categories))),
        stock_available: Some(Value::Bool(!args.out_of_stock)),
        description: args.description.map(Value::from),
        image_url: args.image_url.map(Value::from),
        care_level: args.care_level.map(Value::from),
        water_needs: args.water_needs.map(Value::from),
        light_needs: args.light_needs.map(Value::from),
    }
}

fn update_input(args: UpdateArgs) -> PlantInput {
    let description = if args.clear_description {
        Some(Value::Null)
    } else {
        args.description.map(Value::from)
    };
    PlantInput {
        name: args.name.map(Value::from),
        price: args.price.map(|p| json!(p)),
        categories: args
            .categories
            .map(|c| json!(split_categories(&c))),
        stock_available: args.stock_available.map(Value::Bool),
        description,
        image_url: args.image_url.map(Value::from),
        care_level: args.care_level.map(Value::from),
        water_needs: args.water_needs.map(Value::from),
        light_needs: args.light_needs.map(Value::from),
    }
}
