use rusty_library_loans::{
    adapters::{
        memory::InMemoryLoanStore,
        mock::{
            BookService as MockBookService, IdentityProvider as MockIdentityProvider,
            UserService as MockUserService,
        },
        postgres::PostgresLoanStore,
        system_clock::SystemClock,
    },
    api::{handlers::AppState, router::create_router},
    application::loan::{RentalLocks, ServiceDependencies},
    config::AppConfig,
    domain::value_objects::{BookId, UserId},
    ports::loan_store::LoanStore,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// デモ用に利用者・書籍・トークンを登録する
fn seed_demo_data(
    users: &MockUserService,
    books: &MockBookService,
    identity: &MockIdentityProvider,
) {
    for name in ["reader1", "reader2"] {
        let user_id = UserId::new();
        let token = format!("{}-token", name);
        users.add_user(user_id);
        identity.issue_token(token.clone(), user_id);
        tracing::info!(%user_id, %token, "Seeded demo user {}", name);
    }

    for _ in 0..3 {
        let book_id = BookId::new();
        books.add_available_book(book_id);
        tracing::info!(%book_id, "Seeded demo book");
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Loan store: PostgreSQL when configured, otherwise in-memory
    let loan_store: Arc<dyn LoanStore> = match &config.database_url {
        Some(database_url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await?;

            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Connected to PostgreSQL, migrations applied");

            Arc::new(PostgresLoanStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, loans are kept in memory only");
            Arc::new(InMemoryLoanStore::new())
        }
    };

    // External collaborators (catalog, identity)
    let user_service = Arc::new(MockUserService::new());
    let book_service = Arc::new(MockBookService::new());
    let identity_provider = Arc::new(MockIdentityProvider::new());

    if config.seed_demo_data {
        seed_demo_data(&user_service, &book_service, &identity_provider);
    }

    // Create service dependencies
    let service_deps = ServiceDependencies {
        loan_store,
        user_service,
        book_service,
        clock: Arc::new(SystemClock),
        rental_locks: Arc::new(RentalLocks::new()),
    };

    // Create application state
    let app_state = Arc::new(AppState {
        service_deps,
        identity_provider,
    });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
