use actix_web::{App, HttpServer};
use actix_cors::Cors;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use log4rs::init_file;

mod apis;
mod configs;
mod cores;
mod errors;
mod utils;

use crate::configs::settings::{GLOBAL_CONFIG, PORTRAIT_MODELS};
use crate::apis::api_doc::ApiDoc;

#[cfg(test)]
mod test;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    let config = &*GLOBAL_CONFIG;

    let config_path = format!("{}/src/configs/log4rs.yaml", env!("CARGO_MANIFEST_DIR"));
    init_file(&config_path, Default::default()).unwrap();

    // Load the model table up front so a broken registry fails the boot, not a request
    log::info!("Registered portrait models: {}", PORTRAIT_MODELS.models.len());
    if !config.api_token_configured() {
        log::warn!("REPLICATE_API_TOKEN is not configured; generation endpoints will fail");
    }

    // Set the port number
    let port = config.port;
    println!("Starting server on port {}", port);

    // Start the HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin() // cors
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec!["Content-Type", "Authorization", "User-Agent"])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .configure(apis::portraits::configure)
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
