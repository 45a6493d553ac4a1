use std::net::SocketAddr;

use trip_server::access::MembershipPolicy;
use trip_server::routing::{RoutingClient, RoutingConfig};
use trip_server::schedule::ScheduleService;
use trip_server::store::MemoryStore;
use trip_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("trip_server=info,tower_http=info")
            }),
        )
        .init();

    // Get credentials from environment
    let api_key = std::env::var("ROUTING_API_KEY").unwrap_or_else(|_| {
        eprintln!("Warning: ROUTING_API_KEY not set. Travel time lookups will fail.");
        String::new()
    });

    // Create routing client
    let routing_config = RoutingConfig::new(&api_key);
    let routing = RoutingClient::new(routing_config).expect("Failed to create routing client");

    // Create store and schedule service
    let store = MemoryStore::new();
    let service = ScheduleService::new(store.clone(), routing, MembershipPolicy);

    // Build app state
    let state = AppState::new(service, store);

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    println!("Itinerary scheduler listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET    /health                            - Health check");
    println!("  POST   /trips                             - Create a trip");
    println!("  GET    /trips/:id                         - Fetch a trip");
    println!("  GET    /trips/:id/schedule                - Whole schedule, grouped by day");
    println!("  GET    /trips/:id/days/:day/stops         - One day's stops");
    println!("  POST   /trips/:id/stops                   - Insert a stop");
    println!("  PATCH  /trips/:id/stops/:stop_id          - Edit a stop");
    println!("  PATCH  /trips/:id/stops/:stop_id/move     - Move a stop");
    println!("  DELETE /trips/:id/stops/:stop_id          - Delete a stop");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
