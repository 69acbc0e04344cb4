use herald_core::*;
use herald_test_utils::*;

fn raise_from_deep_call_site(message: &str) -> Result<NotificationId, HeraldError> {
    let center = current()?;
    Ok(center.success_for(message, 0))
}

#[test]
fn test_current_without_session_errors() {
    let err = current().unwrap_err();
    assert!(matches!(err, HeraldError::OutsideSession));
    assert_eq!(err.to_string(), "notifications must be used within an active session");
}

#[test]
fn test_deep_call_site_outside_session() {
    let result = raise_from_deep_call_site("lost");
    assert!(result.unwrap_err().is_usage_error());
}

#[tokio::test(start_paused = true)]
async fn test_deep_call_site_inside_scope() {
    let session = setup_test_session();

    let id = session
        .scope(async { raise_from_deep_call_site("Guest added") })
        .await
        .unwrap();

    assert!(session.center().contains(id));
    assert_visible(session.center(), "Guest added");
}

#[tokio::test(start_paused = true)]
async fn test_scope_does_not_leak() {
    let session = setup_test_session();
    session.scope(async {}).await;
    assert!(current().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_explicit_center_outlives_session() {
    let session = setup_test_session();
    let center = session.center().clone();
    center.info("pending");

    drop(session);

    assert!(center.is_closed());
    assert!(center.is_empty());
    assert_eq!(center.pending_timers(), 0);

    // Defined no-ops once closed
    let id = center.success("too late");
    assert!(!center.contains(id));
    assert!(!center.dismiss(id));
    center.clear();

    advance_ms(5000).await;
    assert!(center.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_renderer_follows_session() {
    let session = setup_test_session();
    let mut subscription = session.center().subscribe();

    session.center().success("First");
    let snapshot = subscription.changed().await.unwrap();
    assert_eq!(snapshot.messages(), vec!["First"]);

    advance_ms(3000).await;
    let snapshot = subscription.changed().await.unwrap();
    assert!(snapshot.is_empty());

    drop(session);
    let last = subscription.changed().await.unwrap();
    assert!(last.is_empty());
    assert!(subscription.changed().await.is_none());
}
