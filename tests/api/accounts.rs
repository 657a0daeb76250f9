use claim::{assert_none, assert_some};

use rolehome::accounts::{
    delete_user, get_admin_user, get_customer, insert_customer,
};
use rolehome::domain::ContactNumber;

use crate::helpers::spawn_app;

#[tokio::test]
async fn role_records_display_as_the_username() {
    // Arrange
    let app = spawn_app().await;
    app.make_test_user_a_customer(Some("555 0100")).await;
    app.make_test_user_an_admin(Some("ADM-0042")).await;

    // Act
    let customer = get_customer(app.test_user.user_id, &app.db_pool)
        .await
        .unwrap()
        .unwrap();
    let admin = get_admin_user(app.test_user.user_id, &app.db_pool)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(customer.to_string(), app.test_user.username);
    assert_eq!(admin.to_string(), app.test_user.username);
    assert_eq!(customer.phone_number.as_deref(), Some("555 0100"));
    assert_eq!(admin.admin_number.as_deref(), Some("ADM-0042"));
}

#[tokio::test]
async fn a_user_has_at_most_one_customer_profile() {
    // Arrange
    let app = spawn_app().await;
    app.make_test_user_a_customer(None).await;

    // Act
    let number = ContactNumber::parse("555 0199".to_string()).unwrap();
    let outcome =
        insert_customer(&app.db_pool, app.test_user.user_id, Some(&number)).await;

    // Assert
    assert!(outcome.is_err());
}

#[tokio::test]
async fn deleting_a_user_removes_its_role_records() {
    // Arrange
    let app = spawn_app().await;
    app.make_test_user_a_customer(None).await;
    app.make_test_user_an_admin(None).await;
    assert_some!(get_customer(app.test_user.user_id, &app.db_pool).await.unwrap());

    // Act
    let deleted = delete_user(app.test_user.user_id, &app.db_pool).await.unwrap();

    // Assert
    assert!(deleted);
    assert_none!(get_customer(app.test_user.user_id, &app.db_pool).await.unwrap());
    assert_none!(get_admin_user(app.test_user.user_id, &app.db_pool).await.unwrap());
}
