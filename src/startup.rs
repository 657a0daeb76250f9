use actix_session::storage::RedisSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::dev::Server;
use actix_web::web;
use actix_web::App;
use actix_web::HttpServer;
use actix_web_flash_messages::storage::CookieMessageStore;
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_lab::middleware::from_fn;
use secrecy::{ExposeSecret, Secret};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::authentication::load_current_user;
use crate::configuration::DatabaseSettings;
use crate::configuration::Settings;
use crate::routes::{
    health_check, home, log_out, login, login_form, signup, signup_form,
};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);

        migrate(&configuration.database, &connection_pool).await?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();
        tracing::info!("app listening on {}:{}", configuration.application.host, port);
        let server = run(
            listener,
            connection_pool,
            configuration.application.hmac_secret,
            configuration.redis_uri,
        )
        .await?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    // A more expressive name that makes it clear that
    // this function only returns when the application is stopped
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .connect_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(configuration.with_db())
}

async fn migrate(
    configuration: &DatabaseSettings,
    connection_pool: &PgPool,
) -> Result<(), MigrateError> {
    if configuration.migrate {
        tracing::info!("migrating postgres");
        sqlx::migrate!("./migrations").run(connection_pool).await
    } else {
        Ok(())
    }
}

pub async fn run(
    listener: TcpListener,
    connection_pool: PgPool,
    hmac_secret: Secret<String>,
    redis_uri: Secret<String>,
) -> Result<Server, anyhow::Error> {
    let connection_pool = web::Data::new(connection_pool);
    let secret_key = Key::from(hmac_secret.expose_secret().as_bytes());
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();
    let redis_store = RedisSessionStore::new(redis_uri.expose_secret()).await?;
    let server = HttpServer::new(move || {
        App::new()
            // Middlewares are added using the `wrap` method on `App`
            .wrap(message_framework.clone())
            .wrap(SessionMiddleware::new(
                redis_store.clone(),
                secret_key.clone(),
            ))
            .wrap(TracingLogger::default())
            .route("/", web::get().to(login_form))
            .route("/", web::post().to(login))
            .route("/signup/", web::get().to(signup_form))
            .route("/signup/", web::post().to(signup))
            .route("/logout/", web::get().to(log_out))
            .route("/logout/", web::post().to(log_out))
            .service(
                web::resource("/home/")
                    .wrap(from_fn(load_current_user))
                    .route(web::get().to(home)),
            )
            .route("/health_check", web::get().to(health_check))
            .app_data(connection_pool.clone())
    })
    .listen(listener)?
    .run();
    // No .await here
    Ok(server)
}
