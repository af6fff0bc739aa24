use std::net::SocketAddr;

use clap::Parser;
use shelflife::cli::{Args, build_config, init_logging, load_secret, open_database};
use shelflife::create_app;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    let Some(access_secret) = load_secret("JWT_ACCESS_SECRET", args.access_secret_file.as_deref())
    else {
        std::process::exit(1);
    };

    let Some(refresh_secret) =
        load_secret("JWT_REFRESH_SECRET", args.refresh_secret_file.as_deref())
    else {
        std::process::exit(1);
    };

    // One secret signing both token kinds would let a refresh token pass as
    // an access token.
    if access_secret == refresh_secret {
        error!("JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must differ");
        std::process::exit(1);
    }

    let Some(db) = open_database(&args.database).await else {
        std::process::exit(1);
    };

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    let local_addr = listener.local_addr().unwrap();

    let cors_origin = if args.no_cors {
        None
    } else {
        Some(args.cors_origin)
    };

    let config = build_config(
        db,
        access_secret,
        refresh_secret,
        args.secure_cookies,
        cors_origin,
    );
    let app = create_app(&config);

    info!(address = %local_addr, "Listening");

    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
    if let Err(e) = axum::serve(listener, make_service).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
