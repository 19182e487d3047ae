use std::sync::Arc;

use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;
use pushkind_common::middleware::RedirectUnauthorized;
use pushkind_common::routes::{logout, not_assigned};

use pushkind_moving::config::ServerConfig;
use pushkind_moving::geo::{GeoResolver, GoogleMapsResolver};
use pushkind_moving::repository::DieselRepository;
use pushkind_moving::routes::SharedGeo;
use pushkind_moving::routes::customers::{add_customer, list_customers, show_customer};
use pushkind_moving::routes::estimates::{
    add_estimate, calculate_estimate, delete_estimate, edit_estimate, list_estimates,
    replace_inventory, replace_residence_sizes, replace_services, show_estimate, show_sizing,
};
use pushkind_moving::routes::intake::{
    list_intake_residence_sizes, list_intake_sources, submit_lead,
};
use pushkind_moving::routes::line_items::{
    add_line_item, delete_line_item, edit_line_item, list_line_items, recompute_total,
};
use pushkind_moving::routes::settings::{
    add_additional_service, add_assignment_rule, add_fuel_tier, add_inventory_item,
    add_lead_source, add_mover_team, add_residence_size, add_truck, delete_additional_service,
    delete_assignment_rule, delete_fuel_tier, delete_inventory_item, delete_lead_source,
    delete_mover_team, delete_residence_size, delete_truck, edit_additional_service, edit_assignment_rule,
    edit_fuel_tier, edit_hub_settings, edit_mover_team, edit_truck, show_catalog,
    show_hub_settings, show_rates,
};
use pushkind_moving::routes::stops::{add_stop, delete_stop, edit_stop, reorder_stops};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let secret_key = match &config.secret_key {
        Some(key) => Key::from(key.as_bytes()),
        None => Key::generate(),
    };
    let common_config = config.common();

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let api_key = config.google_maps_api_key.clone();
    if api_key.is_none() {
        log::warn!(
            "GOOGLE_MAPS_API_KEY not set; only hubs with their own key get route lookups"
        );
    }
    let base_url = config.google_maps_base_url.clone();
    // The blocking HTTP client must be built off the async runtime.
    let resolver = web::block(move || match api_key {
        Some(api_key) => GoogleMapsResolver::with_base_url(api_key, &base_url),
        None => GoogleMapsResolver::unkeyed(&base_url),
    })
    .await;
    let geo: SharedGeo = match resolver {
        Ok(Ok(resolver)) => Some(Arc::new(resolver) as Arc<dyn GeoResolver>),
        Ok(Err(e)) => {
            log::error!("Failed to configure geo lookups: {e}");
            std::process::exit(1);
        }
        Err(e) => {
            log::error!("Failed to configure geo lookups: {e}");
            std::process::exit(1);
        }
    };

    let domain = config.domain.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(not_assigned)
            .service(submit_lead)
            .service(list_intake_sources)
            .service(list_intake_residence_sizes)
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(list_estimates)
                    .service(add_estimate)
                    .service(show_estimate)
                    .service(edit_estimate)
                    .service(delete_estimate)
                    .service(calculate_estimate)
                    .service(show_sizing)
                    .service(replace_inventory)
                    .service(replace_residence_sizes)
                    .service(replace_services)
                    .service(reorder_stops)
                    .service(add_stop)
                    .service(edit_stop)
                    .service(delete_stop)
                    .service(list_line_items)
                    .service(add_line_item)
                    .service(edit_line_item)
                    .service(delete_line_item)
                    .service(recompute_total)
                    .service(list_customers)
                    .service(add_customer)
                    .service(show_customer)
                    .service(show_rates)
                    .service(add_mover_team)
                    .service(edit_mover_team)
                    .service(delete_mover_team)
                    .service(add_assignment_rule)
                    .service(edit_assignment_rule)
                    .service(delete_assignment_rule)
                    .service(add_truck)
                    .service(edit_truck)
                    .service(delete_truck)
                    .service(add_fuel_tier)
                    .service(edit_fuel_tier)
                    .service(delete_fuel_tier)
                    .service(add_additional_service)
                    .service(edit_additional_service)
                    .service(delete_additional_service)
                    .service(show_hub_settings)
                    .service(edit_hub_settings)
                    .service(show_catalog)
                    .service(add_inventory_item)
                    .service(delete_inventory_item)
                    .service(add_residence_size)
                    .service(delete_residence_size)
                    .service(add_lead_source)
                    .service(delete_lead_source)
                    .service(logout),
            )
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(geo.clone()))
            .app_data(web::Data::new(common_config.clone()))
    })
    .bind((config.address.clone(), config.port))?
    .run()
    .await
}
