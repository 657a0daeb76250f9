use uuid::Uuid;

use crate::helpers::{assert_is_redirect_to, spawn_app};

#[tokio::test]
async fn an_error_flash_message_is_set_on_failure() {
    // Arrange
    let app = spawn_app().await;

    // Act - Part 1 - Try to login
    let login_body = serde_json::json!({
        "username": "random-username",
        "password": "random-password"
    });
    let response = app.post_login(&login_body).await;

    // Assert
    assert_is_redirect_to(&response, "/");

    // Act - Part 2 - Follow the redirect
    let html_page = app.get_login_html().await;
    assert!(html_page
        .contains("<p><i>Please enter a correct username and password.</i></p>"));

    // Act - Part 3 - Reload the login page
    let html_page = app.get_login_html().await;
    assert!(!html_page
        .contains("<p><i>Please enter a correct username and password.</i></p>"));
}

#[tokio::test]
async fn a_wrong_password_for_a_known_user_is_rejected() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .post_login(&serde_json::json!({
            "username": &app.test_user.username,
            "password": Uuid::new_v4().to_string()
        }))
        .await;

    // Assert
    assert_is_redirect_to(&response, "/");
    let html_page = app.get_home_html().await;
    assert!(html_page.contains("You are not logged in."));
}

#[tokio::test]
async fn redirect_to_home_after_login_success() {
    // Arrange
    let app = spawn_app().await;

    // Act - Part 1 - Login
    let response = app.login_test_user().await;
    assert_is_redirect_to(&response, "/home/");

    // Act - Part 2 - Follow the redirect
    let html_page = app.get_home_html().await;
    assert!(html_page.contains(&format!("Welcome {}!", app.test_user.username)));
}

#[tokio::test]
async fn login_records_the_last_login_time() {
    // Arrange
    let app = spawn_app().await;

    // Act
    app.login_test_user().await;

    // Assert
    let last_login: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar::<_, Option<chrono::DateTime<chrono::Utc>>>("SELECT last_login FROM users WHERE user_id = $1")
            .bind(app.test_user.user_id)
            .fetch_one(&app.db_pool)
            .await
            .expect("Failed to fetch last login.");
    assert!(last_login.is_some());
}

#[tokio::test]
async fn a_failure_after_valid_credentials_does_not_log_in() {
    // Arrange
    let app = spawn_app().await;
    // Sabotage the database
    sqlx::query("ALTER TABLE users DROP COLUMN last_login")
        .execute(&app.db_pool)
        .await
        .unwrap();

    // Act - Part 1 - Login
    let response = app.login_test_user().await;
    assert_is_redirect_to(&response, "/");

    // Act - Part 2 - Follow the redirect
    let html_page = app.get_login_html().await;
    assert!(html_page.contains("<p><i>Something went wrong.</i></p>"));

    // Act - Part 3 - The session was never written
    let html_page = app.get_home_html().await;
    assert!(html_page.contains("You are not logged in."));
}
