mod support;

use common::{DlrPayload, MessageStatus};
use service::BroadcastService;
use store::DlrApply;
use support::{AcceptingGateway, RecordingPublisher, fresh_service};
use uuid::Uuid;

/// Drive one message through intake, publish, and send, returning its row id
/// and provider id.
async fn sent_message(svc: &BroadcastService) -> (Uuid, Uuid) {
    svc.create_broadcast("n", "hi", &["+15551234567".into()])
        .await
        .unwrap();

    let broker = RecordingPublisher::default();
    svc.publish_pending(&broker, 100).await.unwrap();
    let msg = broker.published.lock().unwrap().remove(0);

    let provider_id = Uuid::new_v4();
    let gateway = AcceptingGateway::with_ids([provider_id.to_string()]);
    svc.send_message(&gateway, &msg).await.unwrap();

    (msg.id, provider_id)
}

#[tokio::test]
async fn full_pipeline_ends_delivered() {
    let svc = fresh_service().await;
    let (id, provider_id) = sent_message(&svc).await;

    let dlr = DlrPayload::new(provider_id, MessageStatus::Delivered).unwrap();
    assert_eq!(svc.handle_dlr(&dlr).await.unwrap(), DlrApply::Applied);

    let row = svc.repository().message(id).await.unwrap();
    assert_eq!(row.status, MessageStatus::Delivered);
}

#[tokio::test]
async fn failed_receipt_ends_failed() {
    let svc = fresh_service().await;
    let (id, provider_id) = sent_message(&svc).await;

    let dlr = DlrPayload::new(provider_id, MessageStatus::Failed).unwrap();
    assert_eq!(svc.handle_dlr(&dlr).await.unwrap(), DlrApply::Applied);

    let row = svc.repository().message(id).await.unwrap();
    assert_eq!(row.status, MessageStatus::Failed);
}

#[tokio::test]
async fn replayed_receipt_changes_nothing() {
    let svc = fresh_service().await;
    let (id, provider_id) = sent_message(&svc).await;

    let dlr = DlrPayload::new(provider_id, MessageStatus::Delivered).unwrap();
    assert_eq!(svc.handle_dlr(&dlr).await.unwrap(), DlrApply::Applied);
    let after_first = svc.repository().message(id).await.unwrap();

    assert_eq!(
        svc.handle_dlr(&dlr).await.unwrap(),
        DlrApply::AlreadyTerminal
    );
    let after_second = svc.repository().message(id).await.unwrap();

    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn conflicting_receipt_after_terminal_is_ignored() {
    let svc = fresh_service().await;
    let (id, provider_id) = sent_message(&svc).await;

    let delivered = DlrPayload::new(provider_id, MessageStatus::Delivered).unwrap();
    svc.handle_dlr(&delivered).await.unwrap();

    let failed = DlrPayload::new(provider_id, MessageStatus::Failed).unwrap();
    assert_eq!(
        svc.handle_dlr(&failed).await.unwrap(),
        DlrApply::AlreadyTerminal
    );

    let row = svc.repository().message(id).await.unwrap();
    assert_eq!(row.status, MessageStatus::Delivered);
}

#[tokio::test]
async fn unknown_provider_id_is_reported_not_fatal() {
    let svc = fresh_service().await;

    let dlr = DlrPayload::new(Uuid::new_v4(), MessageStatus::Delivered).unwrap();
    assert_eq!(svc.handle_dlr(&dlr).await.unwrap(), DlrApply::Unknown);
}

#[tokio::test]
async fn receipt_racing_the_sent_transition_still_applies() {
    let svc = fresh_service().await;
    svc.create_broadcast("n", "hi", &["+1".into()])
        .await
        .unwrap();

    let broker = RecordingPublisher::default();
    svc.publish_pending(&broker, 100).await.unwrap();
    let msg = broker.published.lock().unwrap().remove(0);

    // Gateway raced the worker's status update: the provider id is recorded
    // but the row is still queued when the receipt arrives.
    let provider_id = Uuid::new_v4();
    svc.repository()
        .set_provider_id(msg.id, &provider_id.to_string())
        .await
        .unwrap();

    let dlr = DlrPayload::new(provider_id, MessageStatus::Delivered).unwrap();
    assert_eq!(svc.handle_dlr(&dlr).await.unwrap(), DlrApply::Applied);

    let row = svc.repository().message(msg.id).await.unwrap();
    assert_eq!(row.status, MessageStatus::Delivered);
}
