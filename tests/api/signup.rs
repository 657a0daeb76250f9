use uuid::Uuid;

use crate::helpers::{assert_is_redirect_to, spawn_app};

fn signup_body(username: &str, phone_number: &str) -> serde_json::Value {
    serde_json::json!({
        "username": username,
        "password1": "earthsea-trilogy",
        "password2": "earthsea-trilogy",
        "phone_number": phone_number,
    })
}

#[tokio::test]
async fn signup_creates_a_logged_in_customer() {
    // Arrange
    let app = spawn_app().await;
    let username = format!("ursula_{}", Uuid::new_v4().to_simple());

    // Act - Part 1 - Sign up
    let response = app.post_signup(&signup_body(&username, "555 0100")).await;
    assert_is_redirect_to(&response, "/home/");

    // Act - Part 2 - Follow the redirect
    let html_page = app.get_home_html().await;
    assert!(html_page.contains(&format!("Welcome {}!", username)));
    assert!(html_page.contains(r#"data-user-type="customer""#));

    // Assert - the profile was stored alongside the user
    let (phone_number,): (Option<String>,) = sqlx::query_as(
        r#"
        SELECT c.phone_number
        FROM customers c
        JOIN users u ON u.user_id = c.user_id
        WHERE u.username = $1
        "#,
    )
    .bind(&username)
    .fetch_one(&app.db_pool)
    .await
    .expect("Failed to fetch the customer profile.");
    assert_eq!(phone_number.as_deref(), Some("555 0100"));
}

#[tokio::test]
async fn a_blank_phone_number_is_stored_as_null() {
    // Arrange
    let app = spawn_app().await;
    let username = format!("ged_{}", Uuid::new_v4().to_simple());

    // Act
    let response = app.post_signup(&signup_body(&username, "")).await;

    // Assert
    assert_is_redirect_to(&response, "/home/");
    let (phone_number,): (Option<String>,) = sqlx::query_as(
        r#"
        SELECT c.phone_number
        FROM customers c
        JOIN users u ON u.user_id = c.user_id
        WHERE u.username = $1
        "#,
    )
    .bind(&username)
    .fetch_one(&app.db_pool)
    .await
    .expect("Failed to fetch the customer profile.");
    assert!(phone_number.is_none());
}

#[tokio::test]
async fn signup_can_log_in_afterwards() {
    // Arrange
    let app = spawn_app().await;
    let username = format!("tenar_{}", Uuid::new_v4().to_simple());
    app.post_signup(&signup_body(&username, "")).await;
    app.post_logout().await;

    // Act
    let response = app
        .post_login(&serde_json::json!({
            "username": &username,
            "password": "earthsea-trilogy"
        }))
        .await;

    // Assert
    assert_is_redirect_to(&response, "/home/");
}

#[tokio::test]
async fn a_failed_login_after_signup_still_reports_the_account() {
    // Arrange
    let app = spawn_app().await;
    let username = format!("ogion_{}", Uuid::new_v4().to_simple());
    // Sabotage the database
    sqlx::query("ALTER TABLE users DROP COLUMN last_login")
        .execute(&app.db_pool)
        .await
        .unwrap();

    // Act - Part 1 - Sign up
    let response = app.post_signup(&signup_body(&username, "")).await;
    assert_is_redirect_to(&response, "/");

    // Act - Part 2 - Follow the redirect
    let html_page = app.get_login_html().await;
    assert!(html_page.contains("<p><i>Your account was created. Please log in.</i></p>"));

    // Assert - the account exists but nobody is logged in
    let html_page = app.get_home_html().await;
    assert!(html_page.contains("You are not logged in."));
    let count: i64 = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM customers c
        JOIN users u ON u.user_id = c.user_id
        WHERE u.username = $1
        "#,
    )
    .bind(&username)
    .fetch_one(&app.db_pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn invalid_signups_are_rejected_with_a_message() {
    // Arrange
    let app = spawn_app().await;
    let test_cases = vec![
        (
            serde_json::json!({
                "username": "ursula",
                "password1": "earthsea-trilogy",
                "password2": "another-password",
            }),
            "The two password fields didn",
        ),
        (
            serde_json::json!({
                "username": "ursula le guin",
                "password1": "earthsea-trilogy",
                "password2": "earthsea-trilogy",
            }),
            "is not a valid username.",
        ),
        (
            serde_json::json!({
                "username": "ursula",
                "password1": "short",
                "password2": "short",
            }),
            "This password is too short.",
        ),
        (
            signup_body("ursula", "1234567890123456"),
            "Numbers are limited to 15 characters.",
        ),
        (
            signup_body(&app.test_user.username, ""),
            "A user with that username already exists.",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        // Act - Part 1 - Submit the form
        let response = app.post_signup(&invalid_body).await;
        assert_is_redirect_to(&response, "/signup/");

        // Act - Part 2 - Follow the redirect
        let html_page = app.get_signup_html().await;
        assert!(
            html_page.contains(error_message),
            "The signup page did not show `{}` for {}.",
            error_message,
            invalid_body
        );
    }

    // No account was created for the rejected username
    let count: i64 = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE username = 'ursula'",
    )
    .fetch_one(&app.db_pool)
    .await
    .unwrap();
    assert_eq!(count, 0);
}
