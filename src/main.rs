mod context;
mod core;
mod database;
mod error;
mod handlers;
mod impls;
mod middlewares;
mod request;
mod response;

use actix_web::web::{delete, get, post, put, resource, scope, Data};
use actix_web::HttpServer;
use sqlx::postgres::PgPoolOptions;

use database::postgres::PgStore;
use middlewares::jwt::Jwt;
use middlewares::role::RequireRole;

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();
    std::env::set_var("RUST_LOG", "actix_web=info");
    env_logger::init();
    let database_url = dotenv::var("DATABASE_URL").expect("environment variable DATABASE_URL not been set");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to database");
    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(PgStore::new(pool.clone())))
            .service(resource("login").route(post().to(handlers::login)))
            .service(resource("signup").route(post().to(handlers::signup)))
            .service(resource("surveys/{survey_id}/responses").route(post().to(handlers::submission::submit)))
            .service(
                scope("")
                    .wrap(Jwt)
                    .service(
                        scope("surveys")
                            .service(resource("").route(get().to(handlers::survey::list)))
                            .service(resource("{survey_id}").route(get().to(handlers::survey::detail))),
                    )
                    .service(resource("departments").route(get().to(handlers::department::list)))
                    .service(
                        scope("admin")
                            .wrap(RequireRole::admin())
                            .service(
                                scope("surveys")
                                    .service(resource("").route(post().to(handlers::survey::create)))
                                    .service(
                                        resource("{survey_id}")
                                            .route(put().to(handlers::survey::update))
                                            .route(delete().to(handlers::survey::delete_survey)),
                                    )
                                    .service(resource("{survey_id}/sections").route(post().to(handlers::section::create)))
                                    .service(resource("{survey_id}/responses").route(get().to(handlers::submission::list)))
                                    .service(resource("{survey_id}/analytics").route(get().to(handlers::analytics::survey_analytics)))
                                    .service(
                                        resource("{survey_id}/audit-questions")
                                            .route(post().to(handlers::audit::create_question))
                                            .route(get().to(handlers::audit::questions)),
                                    )
                                    .service(
                                        resource("{survey_id}/audit-responses")
                                            .route(put().to(handlers::audit::submit_responses))
                                            .route(get().to(handlers::audit::responses)),
                                    ),
                            )
                            .service(
                                scope("sections/{section_id}")
                                    .service(
                                        resource("")
                                            .route(put().to(handlers::section::update))
                                            .route(delete().to(handlers::section::delete_section)),
                                    )
                                    .service(resource("questions").route(post().to(handlers::question::create))),
                            )
                            .service(
                                scope("questions/{question_id}")
                                    .service(
                                        resource("")
                                            .route(put().to(handlers::question::update))
                                            .route(delete().to(handlers::question::delete_question)),
                                    )
                                    .service(resource("options").route(post().to(handlers::option::add_options))),
                            )
                            .service(
                                resource("options/{option_id}")
                                    .route(put().to(handlers::option::update))
                                    .route(delete().to(handlers::option::delete_option)),
                            )
                            .service(
                                resource("audit-questions/{question_id}")
                                    .route(put().to(handlers::audit::update_question))
                                    .route(delete().to(handlers::audit::delete_question)),
                            )
                            .service(
                                scope("departments")
                                    .service(resource("").route(post().to(handlers::department::create)))
                                    .service(resource("{department_id}").route(delete().to(handlers::department::delete_department))),
                            )
                            .service(
                                scope("users")
                                    .wrap(RequireRole::super_admin())
                                    .service(resource("").route(get().to(handlers::user::list)))
                                    .service(resource("{user_id}/role").route(put().to(handlers::user::set_role))),
                            ),
                    ),
            )
    })
    .bind(("0.0.0.0", 8000))?
    .run()
    .await
}
